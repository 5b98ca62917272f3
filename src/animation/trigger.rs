//! Section trigger: turns visibility events into morph requests.
//!
//! The trigger owns the name of the shape the last completed directed morph
//! ended on. Entering a section mapped to that same shape asks for a bounce;
//! entering any other mapped section asks for a directed morph from the
//! displayed shape.

use rustc_hash::FxHashMap;

use crate::page::VisibilityEvent;

/// A morph the engine should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MorphRequest {
    /// Morph `from → to`.
    Directed {
        /// Shape displayed when the request was made.
        from: String,
        /// Shape to morph into.
        to: String,
    },
    /// Bounce `shape → noise → shape`.
    Bounce {
        /// Shape being bounced.
        shape: String,
    },
}

impl MorphRequest {
    /// Shape the morph ends on.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Directed { to, .. } => to,
            Self::Bounce { shape } => shape,
        }
    }

    /// Shape the morph starts from.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Directed { from, .. } => from,
            Self::Bounce { shape } => shape,
        }
    }
}

/// Section → shape mapping plus the displayed-shape session state.
#[derive(Debug, Clone)]
pub struct SectionTrigger {
    shapes: FxHashMap<String, String>,
    order: Vec<String>,
    displayed: String,
}

impl SectionTrigger {
    /// Trigger showing `default_shape` with the given `(section, shape)`
    /// mapping. A repeated section id keeps its first position and its last
    /// shape.
    #[must_use]
    pub fn new<I, S, T>(default_shape: impl Into<String>, sections: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut shapes = FxHashMap::default();
        let mut order = Vec::new();
        for (section, shape) in sections {
            let section = section.into();
            if !shapes.contains_key(&section) {
                order.push(section.clone());
            }
            let _ = shapes.insert(section, shape.into());
        }
        Self {
            shapes,
            order,
            displayed: default_shape.into(),
        }
    }

    /// Name of the shape the last completed directed morph ended on.
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Section ids in configuration order.
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Shape mapped to `section`.
    pub fn shape_for(&self, section: &str) -> Option<&str> {
        self.shapes.get(section).map(String::as_str)
    }

    /// Request that shows `target`: a bounce if it is already displayed,
    /// otherwise a directed morph from the displayed shape.
    #[must_use]
    pub fn request_for(&self, target: &str) -> MorphRequest {
        if target == self.displayed {
            MorphRequest::Bounce {
                shape: target.to_owned(),
            }
        } else {
            MorphRequest::Directed {
                from: self.displayed.clone(),
                to: target.to_owned(),
            }
        }
    }

    /// Request for a batch of events delivered together.
    ///
    /// Leaving events and unmapped sections are ignored. Of the entering
    /// events that remain, the last one in delivery order wins.
    #[must_use]
    pub fn resolve(&self, events: &[VisibilityEvent]) -> Option<MorphRequest> {
        let target = events
            .iter()
            .filter(|event| event.is_intersecting)
            .filter_map(|event| {
                let shape = self.shape_for(&event.section);
                if shape.is_none() {
                    log::trace!("ignoring unmapped section {:?}", event.section);
                }
                shape
            })
            .last()?;
        Some(self.request_for(target))
    }

    /// Record that `request` ran to completion. Only directed morphs change
    /// the displayed shape.
    pub fn record_completion(&mut self, request: &MorphRequest) {
        if let MorphRequest::Directed { to, .. } = request {
            self.displayed.clone_from(to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(displayed: &str) -> SectionTrigger {
        SectionTrigger::new(
            displayed,
            [
                ("Section1", "First"),
                ("Section2", "Second"),
                ("Section3", "Third"),
            ],
        )
    }

    #[test]
    fn entering_other_section_is_directed() {
        let trigger = trigger("First");
        let request = trigger.resolve(&[VisibilityEvent::entering("Section2")]);
        assert_eq!(
            request,
            Some(MorphRequest::Directed {
                from: "First".into(),
                to: "Second".into(),
            })
        );
    }

    #[test]
    fn reentering_displayed_section_bounces() {
        let trigger = trigger("Second");
        let request = trigger.resolve(&[VisibilityEvent::entering("Section2")]);
        assert_eq!(
            request,
            Some(MorphRequest::Bounce {
                shape: "Second".into()
            })
        );
    }

    #[test]
    fn leaving_events_are_ignored() {
        let trigger = trigger("First");
        assert_eq!(
            trigger.resolve(&[
                VisibilityEvent::leaving("Section2"),
                VisibilityEvent::leaving("Section3"),
            ]),
            None
        );
    }

    #[test]
    fn last_entering_event_wins() {
        let trigger = trigger("First");
        let request = trigger.resolve(&[
            VisibilityEvent::entering("Section2"),
            VisibilityEvent::entering("Section3"),
            VisibilityEvent::leaving("Section2"),
            VisibilityEvent::entering("Unmapped"),
        ]);
        assert_eq!(request.as_ref().map(MorphRequest::target), Some("Third"));
    }

    #[test]
    fn only_directed_completion_updates_displayed() {
        let mut trigger = trigger("Second");
        trigger.record_completion(&MorphRequest::Bounce {
            shape: "Second".into(),
        });
        assert_eq!(trigger.displayed(), "Second");

        let request = trigger.request_for("Third");
        trigger.record_completion(&request);
        assert_eq!(trigger.displayed(), "Third");
    }

    #[test]
    fn section_order_is_preserved() {
        let trigger = SectionTrigger::new(
            "a",
            [("s2", "x"), ("s1", "y"), ("s2", "z")],
        );
        assert_eq!(trigger.section_ids().collect::<Vec<_>>(), vec!["s2", "s1"]);
        assert_eq!(trigger.shape_for("s2"), Some("z"));
    }
}
