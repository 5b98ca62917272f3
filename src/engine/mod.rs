//! The per-frame morph engine.
//!
//! [`MorphEngine`] is the single driver of the scene. Each [`tick`] polls the
//! background shape load, advances the orbit camera, runs the active morph's
//! queued tick, and finally issues exactly one render call. Visibility events
//! feed into it between frames.
//!
//! [`tick`]: MorphEngine::tick

mod accessors;
mod morph;
mod visibility;

use rand::rngs::StdRng;
use rand::SeedableRng;
use web_time::Instant;

use crate::animation::{
    MorphId, MorphRequest, MorphRunner, SectionTrigger, TickScheduler,
};
use crate::camera::orbit::OrbitCamera;
use crate::error::MorphError;
use crate::options::{MorphOptions, Options};
use crate::renderer::{InstanceHandle, InstanceRenderer};
use crate::shape::loader::{LoadStatus, ShapeLoader};
use crate::shape::ShapeStore;

/// Where the shape store stands.
#[derive(Debug)]
enum Shapes {
    Loading(ShapeLoader),
    Ready(ShapeStore),
    Failed,
}

/// The running morph and the instance set it writes to.
#[derive(Debug)]
struct ActiveMorph {
    runner: MorphRunner,
    request: MorphRequest,
    handle: InstanceHandle,
}

/// Animation loop tying shapes, trigger, camera and renderer together.
pub struct MorphEngine<R: InstanceRenderer> {
    renderer: R,
    camera: OrbitCamera,
    trigger: SectionTrigger,
    shapes: Shapes,
    scheduler: TickScheduler,
    active: Option<ActiveMorph>,
    /// The one instance set attached to the scene.
    displayed: Option<InstanceHandle>,
    /// Request made before shapes resolved; the latest one wins.
    pending: Option<MorphRequest>,
    next_id: MorphId,
    morph: MorphOptions,
    visibility_threshold: f32,
    rng: StdRng,
}

impl<R: InstanceRenderer> MorphEngine<R> {
    /// Engine that loads `options.shapes` in the background.
    ///
    /// Rendering can start right away; the scene stays empty until loading
    /// finishes.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::OptionsParse`] if the options fail validation
    /// and [`MorphError::ThreadSpawn`] if the loader cannot be started.
    pub fn new(
        options: &Options,
        renderer: R,
        width: u32,
        height: u32,
    ) -> Result<Self, MorphError> {
        options.validate()?;
        let loader = ShapeLoader::spawn(options.shape_specs())?;
        Ok(Self::with_loader(options, renderer, loader, width, height))
    }

    /// Engine over shapes that are already in memory. They are picked up on
    /// the first [`tick`](Self::tick).
    #[must_use]
    pub fn with_store(
        options: &Options,
        renderer: R,
        store: ShapeStore,
        width: u32,
        height: u32,
    ) -> Self {
        Self::with_loader(
            options,
            renderer,
            ShapeLoader::ready(store),
            width,
            height,
        )
    }

    fn with_loader(
        options: &Options,
        renderer: R,
        loader: ShapeLoader,
        width: u32,
        height: u32,
    ) -> Self {
        let rng = match options.morph.noise_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            renderer,
            camera: OrbitCamera::new(
                &options.camera,
                options.viewport.crop(),
                width,
                height,
            ),
            trigger: SectionTrigger::new(
                options.default_shape.clone(),
                options.section_shapes(),
            ),
            shapes: Shapes::Loading(loader),
            scheduler: TickScheduler::new(),
            active: None,
            displayed: None,
            pending: None,
            next_id: MorphId::FIRST,
            morph: options.morph.clone(),
            visibility_threshold: options.visibility_threshold,
            rng,
        }
    }

    /// Run one frame at timestamp `now`.
    ///
    /// Order within the frame: shape-load poll, camera advance, morph
    /// writes, then the single render call.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error if the frame cannot be drawn.
    pub fn tick(&mut self, now: Instant) -> Result<(), MorphError> {
        self.poll_shapes();
        let _ = self.camera.advance();
        self.tick_morphs(now);
        self.renderer.render(self.camera.camera())
    }

    /// Resize the view the camera projects into.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Block until background shape loading finishes, then show the default
    /// shape. Does nothing if loading already finished.
    pub fn wait_for_shapes(&mut self) {
        if let Shapes::Loading(loader) = &mut self.shapes {
            let status = loader.wait();
            self.apply_load_status(status);
        }
    }

    fn poll_shapes(&mut self) {
        if let Shapes::Loading(loader) = &mut self.shapes {
            let status = loader.poll();
            self.apply_load_status(status);
        }
    }

    fn apply_load_status(&mut self, status: LoadStatus) {
        match status {
            LoadStatus::Pending => {}
            LoadStatus::Ready(store) => {
                log::info!("loaded {} shapes: {:?}", store.len(), store.names());
                self.shapes = Shapes::Ready(store);
                self.show_displayed_shape();
                if let Some(request) = self.pending.take() {
                    if let Err(e) = self.request(request) {
                        log::warn!("deferred morph refused: {e}");
                    }
                }
            }
            LoadStatus::Failed(e) => {
                log::error!("shape loading failed, scene stays empty: {e}");
                self.shapes = Shapes::Failed;
                self.pending = None;
            }
            LoadStatus::Taken => {
                log::error!("shape loader result already consumed");
                self.shapes = Shapes::Failed;
                self.pending = None;
            }
        }
    }

    /// Attach the first instance set, showing the trigger's displayed shape.
    fn show_displayed_shape(&mut self) {
        let Shapes::Ready(store) = &self.shapes else {
            return;
        };
        match store.require(self.trigger.displayed()) {
            Ok(shape) => {
                let handle = self
                    .renderer
                    .create_instance_set(&shape.positions, shape.color);
                self.renderer.attach(handle);
                if let Some(old) = self.displayed.replace(handle) {
                    self.renderer.detach(old);
                }
            }
            Err(e) => log::error!("cannot show initial shape: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use web_time::Duration;

    use super::*;
    use crate::animation::BounceColor;
    use crate::options::{SectionOptions, ShapeOptions};
    use crate::page::{ScrollPage, VisibilityEvent};
    use crate::renderer::headless::HeadlessRenderer;
    use crate::shape::Shape;

    const FRAME: Duration = Duration::from_millis(16);

    fn options() -> Options {
        Options {
            default_shape: "First".into(),
            shapes: ["First", "Second", "Third", "Odd"]
                .into_iter()
                .map(|name| ShapeOptions::new(name, format!("{name}.txt")))
                .collect(),
            sections: vec![
                SectionOptions::new("Section1", "First"),
                SectionOptions::new("Section2", "Second"),
                SectionOptions::new("Section3", "Third"),
                SectionOptions::new("Section4", "Odd"),
            ],
            morph: MorphOptions {
                directed_ms: 100,
                bounce_ms: 200,
                noise_seed: Some(3),
                ..MorphOptions::default()
            },
            ..Options::default()
        }
    }

    fn store() -> ShapeStore {
        ShapeStore::from_shapes([
            Shape::new(
                "First",
                vec![Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)],
                Vec3::ONE,
            ),
            Shape::new(
                "Second",
                vec![Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0)],
                Vec3::ZERO,
            ),
            Shape::new(
                "Third",
                vec![Vec3::new(-2.0, 0.5, 1.0), Vec3::new(3.0, 3.0, 3.0)],
                Vec3::new(0.2, 0.4, 0.8),
            ),
            Shape::new("Odd", vec![Vec3::ZERO], Vec3::ONE),
        ])
    }

    struct Harness {
        engine: MorphEngine<HeadlessRenderer>,
        now: Instant,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_options(&options())
        }

        fn with_options(options: &Options) -> Self {
            let mut harness = Self {
                engine: MorphEngine::with_store(
                    options,
                    HeadlessRenderer::new(),
                    store(),
                    800,
                    600,
                ),
                now: Instant::now(),
            };
            harness.frame();
            harness
        }

        fn frame(&mut self) {
            self.engine.tick(self.now).unwrap();
            self.now += FRAME;
        }

        fn frames(&mut self, n: usize) {
            for _ in 0..n {
                self.frame();
            }
        }

        fn enter(&mut self, section: &str) -> Option<MorphId> {
            self.engine
                .handle_visibility(&[VisibilityEvent::entering(section)])
        }

        fn run_until_idle(&mut self) {
            for _ in 0..1_000 {
                if !self.engine.is_animating() {
                    break;
                }
                self.frame();
            }
            assert!(!self.engine.is_animating(), "morph never finished");
        }

        fn renderer(&self) -> &HeadlessRenderer {
            self.engine.renderer()
        }
    }

    #[test]
    fn initial_shape_is_attached_after_load() {
        let h = Harness::new();
        let handle = h.engine.displayed_set().unwrap();
        assert_eq!(h.renderer().attached(), &[handle]);
        assert_eq!(
            h.renderer().committed_positions(handle).unwrap(),
            store().get("First").unwrap().positions.as_slice()
        );
        assert_eq!(h.engine.displayed_shape(), "First");
    }

    #[test]
    fn directed_morph_completes_exactly() {
        let mut h = Harness::new();
        assert!(h.enter("Section2").is_some());
        h.run_until_idle();

        let second = store().get("Second").unwrap().clone();
        let handle = h.engine.displayed_set().unwrap();
        assert_eq!(
            h.renderer().committed_positions(handle).unwrap(),
            second.positions.as_slice()
        );
        assert_eq!(h.renderer().committed_color(handle), Some(second.color));
        assert_eq!(h.engine.displayed_shape(), "Second");
    }

    #[test]
    fn bounce_keeps_displayed_shape() {
        let mut h = Harness::new();
        let _ = h.enter("Section2");
        h.run_until_idle();
        assert_eq!(h.engine.displayed_shape(), "Second");

        let _ = h.enter("Section2");
        assert!(h.engine.active_morph().unwrap().is_bounce());
        h.run_until_idle();
        assert_eq!(h.engine.displayed_shape(), "Second");

        let handle = h.engine.displayed_set().unwrap();
        assert_eq!(
            h.renderer().committed_positions(handle).unwrap(),
            store().get("Second").unwrap().positions.as_slice()
        );
    }

    #[test]
    fn random_color_bounce_returns_to_shape_color() {
        let mut options = options();
        options.morph.bounce_color = BounceColor::Random;
        let mut h = Harness::with_options(&options);

        let _ = h.enter("Section1");
        let runner = h.engine.active_morph().unwrap();
        assert!(runner.is_bounce());
        // At the noise waypoint the color is random, never the shape's white.
        assert_ne!(runner.sample(0.5).color, Vec3::ONE);

        h.frames(3);
        let handle = h.engine.displayed_set().unwrap();
        assert_ne!(h.renderer().committed_color(handle), Some(Vec3::ONE));

        h.run_until_idle();
        let first = store().get("First").unwrap().clone();
        assert_eq!(h.renderer().committed_color(handle), Some(first.color));
        assert_eq!(
            h.renderer().committed_positions(handle).unwrap(),
            first.positions.as_slice()
        );
        assert_eq!(h.engine.displayed_shape(), "First");
    }

    #[test]
    fn superseded_morph_never_writes_again() {
        let mut h = Harness::new();
        let _ = h.enter("Section2");
        h.frames(3);
        let first_set = h.engine.displayed_set().unwrap();
        let first_writes = h.renderer().write_count(first_set);
        assert!(first_writes > 0);

        let _ = h.enter("Section3");
        let second_set = h.engine.displayed_set().unwrap();
        assert_ne!(first_set, second_set);
        h.run_until_idle();

        assert_eq!(h.renderer().rejected_writes(), 0);
        assert_eq!(h.renderer().write_count(first_set), 0);
        assert!(h.renderer().write_count(second_set) > 0);
        // The directed morph to Second never completed.
        assert_eq!(h.engine.displayed_shape(), "Third");
    }

    #[test]
    fn every_frame_has_exactly_one_set_once_loaded() {
        let mut h = Harness::new();
        for section in ["Section2", "Section3", "Section3", "Section1"] {
            let _ = h.enter(section);
            h.frames(2);
        }
        h.run_until_idle();
        for frame in h.renderer().frames() {
            assert_eq!(frame.attached.len(), 1);
        }
        assert_eq!(h.renderer().live_sets(), 1);
    }

    #[test]
    fn mismatched_request_is_refused() {
        let mut h = Harness::new();
        let before = h.engine.displayed_set();
        assert!(h.enter("Section4").is_none());
        assert!(!h.engine.is_animating());
        assert_eq!(h.engine.displayed_set(), before);
        assert_eq!(h.engine.displayed_shape(), "First");

        let err = h
            .engine
            .request(MorphRequest::Directed {
                from: "First".into(),
                to: "Missing".into(),
            })
            .unwrap_err();
        assert!(matches!(err, MorphError::UnknownShape(name) if name == "Missing"));
    }

    #[test]
    fn only_last_entering_event_starts_a_morph() {
        let mut h = Harness::new();
        let id = h.engine.handle_visibility(&[
            VisibilityEvent::entering("Section2"),
            VisibilityEvent::entering("Section3"),
            VisibilityEvent::leaving("Section1"),
        ]);
        assert!(id.is_some());
        assert_eq!(h.engine.active_morph().unwrap().end_shape().name, "Third");

        let none = h
            .engine
            .handle_visibility(&[VisibilityEvent::leaving("Section3")]);
        assert!(none.is_none());
    }

    #[test]
    fn camera_orbits_while_idle() {
        let mut h = Harness::new();
        h.frames(5);
        let frames = h.renderer().frames();
        let eyes: Vec<_> = frames.iter().map(|f| f.eye).collect();
        assert!(eyes.windows(2).all(|w| w[0] != w[1]));
        assert!(eyes.iter().all(|eye| (eye.length() - 3.0).abs() < 1e-4));
    }

    #[test]
    fn load_failure_leaves_scene_empty() {
        let options = Options {
            asset_root: std::env::temp_dir().join("morpho-no-such-assets"),
            ..options()
        };
        let mut engine =
            MorphEngine::new(&options, HeadlessRenderer::new(), 800, 600)
                .unwrap();
        let _ = engine.request(MorphRequest::Directed {
            from: "First".into(),
            to: "Second".into(),
        });
        engine.wait_for_shapes();
        let now = Instant::now();
        engine.tick(now).unwrap();
        engine.tick(now + FRAME).unwrap();

        assert!(engine.load_failed());
        assert!(!engine.is_animating());
        assert!(engine.renderer().attached().is_empty());
        assert_eq!(engine.renderer().live_sets(), 0);
        assert_eq!(engine.renderer().frames().len(), 2);
    }

    #[test]
    fn request_before_load_is_deferred() {
        let mut engine = MorphEngine::with_store(
            &options(),
            HeadlessRenderer::new(),
            store(),
            800,
            600,
        );
        let first = engine.handle_visibility(&[VisibilityEvent::entering(
            "Section2",
        )]);
        let second = engine.handle_visibility(&[VisibilityEvent::entering(
            "Section3",
        )]);
        assert!(first.is_none() && second.is_none());
        assert!(engine.renderer().live_sets() == 0);

        engine.tick(Instant::now()).unwrap();
        assert!(engine.is_animating());
        assert_eq!(engine.active_morph().unwrap().end_shape().name, "Third");
        assert_eq!(engine.renderer().attached().len(), 1);
    }

    #[test]
    fn start_and_stop_manage_observation() {
        let mut h = Harness::new();
        let mut page = ScrollPage::stacked(
            ["Section1", "Section2", "Section3", "Section4"],
            100.0,
        );
        h.engine.start(&mut page);
        assert!(page.is_observed("Section3"));
        let initial = page.take_events();
        // Section1 is in view: re-entering the displayed shape bounces.
        assert!(h.engine.handle_visibility(&initial).is_some());
        assert!(h.engine.active_morph().unwrap().is_bounce());

        page.scroll_to(100.0);
        let events = page.take_events();
        let _ = h.engine.handle_visibility(&events);
        assert_eq!(h.engine.active_morph().unwrap().end_shape().name, "Second");

        h.engine.stop(&mut page);
        assert!(!page.is_observed("Section1"));
        assert!(!h.engine.is_animating());
        assert!(h.engine.displayed_set().is_none());
        assert!(h.renderer().attached().is_empty());
        h.frame();
        assert_eq!(h.renderer().rejected_writes(), 0);
    }
}
