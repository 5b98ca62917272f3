//! Scrollable page of stacked sections and their visibility events.
//!
//! The morph engine reacts to sections scrolling into view. [`ScrollPage`]
//! is a plain model of that page: sections stacked top to bottom, a viewport
//! of fixed height, and a scroll offset. Every observed section reports a
//! [`VisibilityEvent`] when observation starts and whenever its visible
//! ratio crosses the observation threshold.

use rustc_hash::FxHashMap;

/// One visibility crossing for a section.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEvent {
    /// Section id.
    pub section: String,
    /// Whether the section is now at or above its visibility threshold.
    pub is_intersecting: bool,
    /// Visible fraction of the section's box, in [0, 1].
    pub ratio: f32,
}

impl VisibilityEvent {
    /// An entering event for `section`, fully visible.
    #[must_use]
    pub fn entering(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            is_intersecting: true,
            ratio: 1.0,
        }
    }

    /// A leaving event for `section`, not visible.
    #[must_use]
    pub fn leaving(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// Something that can watch sections and report threshold crossings.
pub trait VisibilitySource {
    /// Start reporting crossings of `threshold` for `section`.
    fn observe(&mut self, section: &str, threshold: f32);
    /// Stop reporting for `section`.
    fn unobserve(&mut self, section: &str);
}

/// A section's box on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSection {
    /// Section id.
    pub id: String,
    /// Offset of the section's top edge from the page top.
    pub top: f32,
    /// Section height.
    pub height: f32,
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    threshold: f32,
    intersecting: bool,
}

/// Stacked sections viewed through a scrolling viewport.
#[derive(Debug, Clone)]
pub struct ScrollPage {
    sections: Vec<PageSection>,
    viewport_height: f32,
    scroll: f32,
    observed: FxHashMap<String, Observation>,
    pending: Vec<VisibilityEvent>,
}

impl ScrollPage {
    /// Empty page with a viewport `viewport_height` tall.
    #[must_use]
    pub fn new(viewport_height: f32) -> Self {
        Self {
            sections: Vec::new(),
            viewport_height: viewport_height.max(1.0),
            scroll: 0.0,
            observed: FxHashMap::default(),
            pending: Vec::new(),
        }
    }

    /// Page of equally tall sections, one viewport high each.
    #[must_use]
    pub fn stacked<I, S>(ids: I, viewport_height: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut page = Self::new(viewport_height);
        let height = page.viewport_height;
        for id in ids {
            let _ = page.push_section(id, height);
        }
        page
    }

    /// Append a section below the existing ones. Returns its top offset.
    pub fn push_section(&mut self, id: impl Into<String>, height: f32) -> f32 {
        let top = self.page_height();
        self.sections.push(PageSection {
            id: id.into(),
            top,
            height: height.max(0.0),
        });
        top
    }

    /// Sections in page order.
    pub fn sections(&self) -> &[PageSection] {
        &self.sections
    }

    /// Total height of all sections.
    pub fn page_height(&self) -> f32 {
        self.sections.last().map_or(0.0, |s| s.top + s.height)
    }

    /// Viewport height.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Current scroll offset from the page top.
    pub fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.page_height() - self.viewport_height).max(0.0)
    }

    /// Change the viewport height. Sections reflow with it: every top,
    /// height and the scroll offset scale by the same factor, so a page of
    /// viewport-tall sections stays one viewport per section.
    pub fn resize(&mut self, viewport_height: f32) {
        let viewport_height = viewport_height.max(1.0);
        let factor = viewport_height / self.viewport_height;
        self.viewport_height = viewport_height;
        for section in &mut self.sections {
            section.top *= factor;
            section.height *= factor;
        }
        self.scroll_to(self.scroll * factor);
    }

    /// Scroll to `offset`, clamped to the page.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll = offset.clamp(0.0, self.max_scroll());
        self.update_observations();
    }

    /// Scroll by `delta` (positive moves down the page).
    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll + delta);
    }

    /// Scroll so `section`'s top is at the viewport top. Returns `false` for
    /// unknown sections.
    pub fn scroll_to_section(&mut self, section: &str) -> bool {
        match self.sections.iter().find(|s| s.id == section) {
            Some(s) => {
                let top = s.top;
                self.scroll_to(top);
                true
            }
            None => false,
        }
    }

    /// Index of the section under the viewport's vertical center.
    pub fn current_section(&self) -> Option<usize> {
        let center = self.scroll + self.viewport_height / 2.0;
        self.sections
            .iter()
            .position(|s| center >= s.top && center < s.top + s.height)
            .or_else(|| self.sections.len().checked_sub(1))
    }

    /// Jump `steps` sections down (negative: up) from the current one.
    pub fn step_section(&mut self, steps: isize) {
        let Some(current) = self.current_section() else {
            return;
        };
        let last = self.sections.len() - 1;
        let target = current.saturating_add_signed(steps).min(last);
        let top = self.sections[target].top;
        self.scroll_to(top);
    }

    /// Visible fraction of `section`'s box at the current offset.
    pub fn visible_ratio(&self, section: &str) -> Option<f32> {
        self.sections
            .iter()
            .find(|s| s.id == section)
            .map(|s| self.ratio_of(s))
    }

    /// Drain the events produced since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<VisibilityEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Whether `section` is currently observed.
    pub fn is_observed(&self, section: &str) -> bool {
        self.observed.contains_key(section)
    }

    fn ratio_of(&self, section: &PageSection) -> f32 {
        if section.height <= 0.0 {
            return 0.0;
        }
        let view_top = self.scroll;
        let view_bottom = self.scroll + self.viewport_height;
        let overlap = (section.top + section.height).min(view_bottom)
            - section.top.max(view_top);
        (overlap.max(0.0) / section.height).min(1.0)
    }

    fn update_observations(&mut self) {
        for section in &self.sections {
            let Some(observation) = self.observed.get(&section.id).copied()
            else {
                continue;
            };
            let ratio = self.ratio_of(section);
            let intersecting = crosses(ratio, observation.threshold);
            if intersecting != observation.intersecting {
                let _ = self.observed.insert(
                    section.id.clone(),
                    Observation {
                        intersecting,
                        ..observation
                    },
                );
                self.pending.push(VisibilityEvent {
                    section: section.id.clone(),
                    is_intersecting: intersecting,
                    ratio,
                });
            }
        }
    }
}

impl VisibilitySource for ScrollPage {
    fn observe(&mut self, section: &str, threshold: f32) {
        let Some(ratio) = self.visible_ratio(section) else {
            log::warn!("observing unknown page section {section:?}");
            return;
        };
        let intersecting = crosses(ratio, threshold);
        let _ = self.observed.insert(
            section.to_owned(),
            Observation {
                threshold,
                intersecting,
            },
        );
        self.pending.push(VisibilityEvent {
            section: section.to_owned(),
            is_intersecting: intersecting,
            ratio,
        });
    }

    fn unobserve(&mut self, section: &str) {
        let _ = self.observed.remove(section);
        self.pending.retain(|event| event.section != section);
    }
}

fn crosses(ratio: f32, threshold: f32) -> bool {
    ratio > 0.0 && ratio >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ScrollPage {
        ScrollPage::stacked(["Section1", "Section2", "Section3"], 100.0)
    }

    fn observe_all(page: &mut ScrollPage) {
        for id in ["Section1", "Section2", "Section3"] {
            page.observe(id, 0.5);
        }
    }

    #[test]
    fn observe_reports_initial_state() {
        let mut page = page();
        observe_all(&mut page);
        let events = page.take_events();
        let states: Vec<_> = events
            .iter()
            .map(|e| (e.section.as_str(), e.is_intersecting))
            .collect();
        assert_eq!(
            states,
            vec![("Section1", true), ("Section2", false), ("Section3", false)]
        );
        assert!(page.take_events().is_empty());
    }

    #[test]
    fn threshold_crossings_only() {
        let mut page = page();
        observe_all(&mut page);
        let _ = page.take_events();

        // Section2 is 40% visible: no crossing yet.
        page.scroll_to(40.0);
        assert!(page.take_events().is_empty());

        // 60% visible: Section1 leaves, Section2 enters, in page order.
        page.scroll_to(60.0);
        let events = page.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].section, "Section1");
        assert!(!events[0].is_intersecting);
        assert_eq!(events[1].section, "Section2");
        assert!(events[1].is_intersecting);
        assert!((events[1].ratio - 0.6).abs() < 1e-6);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut page = page();
        page.scroll_by(1_000.0);
        assert_eq!(page.scroll_offset(), 200.0);
        page.scroll_by(-1_000.0);
        assert_eq!(page.scroll_offset(), 0.0);
    }

    #[test]
    fn fast_scroll_reports_each_section() {
        let mut page = page();
        observe_all(&mut page);
        let _ = page.take_events();
        page.scroll_to(100.0);
        page.scroll_to(200.0);
        let entering: Vec<_> = page
            .take_events()
            .into_iter()
            .filter(|e| e.is_intersecting)
            .map(|e| e.section)
            .collect();
        assert_eq!(entering, vec!["Section2", "Section3"]);
    }

    #[test]
    fn unobserved_sections_are_silent() {
        let mut page = page();
        page.observe("Section2", 0.5);
        page.unobserve("Section2");
        assert!(page.take_events().is_empty());
        page.scroll_to(100.0);
        assert!(page.take_events().is_empty());
        assert!(!page.is_observed("Section2"));
    }

    #[test]
    fn resize_reflows_sections() {
        let mut page =
            ScrollPage::stacked(["Section1", "Section2", "Section3"], 1000.0);
        observe_all(&mut page);
        let _ = page.take_events();

        page.resize(400.0);
        assert!(page.take_events().is_empty());
        assert_eq!(page.sections()[1].top, 400.0);
        assert_eq!(page.sections()[1].height, 400.0);
        assert_eq!(page.max_scroll(), 800.0);

        assert!(page.scroll_to_section("Section2"));
        assert_eq!(page.visible_ratio("Section2"), Some(1.0));
        let entering: Vec<_> = page
            .take_events()
            .into_iter()
            .filter(|e| e.is_intersecting)
            .map(|e| e.section)
            .collect();
        assert_eq!(entering, vec!["Section2"]);
    }

    #[test]
    fn resize_keeps_relative_position() {
        let mut page = page();
        page.scroll_to(150.0);
        page.resize(200.0);
        assert_eq!(page.scroll_offset(), 300.0);
        assert_eq!(page.current_section(), Some(2));
    }

    #[test]
    fn section_steps() {
        let mut page = page();
        assert_eq!(page.current_section(), Some(0));
        page.step_section(1);
        assert_eq!(page.scroll_offset(), 100.0);
        page.step_section(5);
        assert_eq!(page.current_section(), Some(2));
        page.step_section(-10);
        assert_eq!(page.scroll_offset(), 0.0);
        assert!(page.scroll_to_section("Section3"));
        assert!(!page.scroll_to_section("Nope"));
    }
}
