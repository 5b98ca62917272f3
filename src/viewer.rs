//! Standalone morph window backed by winit.
//!
//! The window shows the morph scene while an invisible page of sections is
//! scrolled with the mouse wheel or the arrow / page keys. Sections that
//! scroll into view trigger morphs exactly as a scrolling web page would.
//!
//! ```no_run
//! # use morpho::Viewer;
//! Viewer::builder()
//!     .with_title("Morpho")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    camera::viewport::ViewportCrop, engine::MorphEngine, error::MorphError,
    gpu::render_context::RenderContext, options::Options, page::ScrollPage,
    renderer::gpu::GpuInstanceRenderer, util::frame_timing::FrameTiming,
};

/// Page pixels scrolled per wheel line.
const LINE_HEIGHT: f32 = 60.0;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "Morpho", default
    /// options).
    fn new() -> Self {
        Self {
            options: None,
            title: "Morpho".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that runs the morph engine.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::OptionsParse`] for invalid options and
    /// [`MorphError::Viewer`] if the event loop cannot be created or fails.
    pub fn run(self) -> Result<(), MorphError> {
        self.options.validate()?;
        let event_loop =
            EventLoop::new().map_err(|e| MorphError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            page: None,
            timing: FrameTiming::new(self.options.display.target_fps),
            crop: self.options.viewport.crop(),
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| MorphError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<MorphEngine<GpuInstanceRenderer>>,
    page: Option<ScrollPage>,
    timing: FrameTiming,
    crop: ViewportCrop,
    options: Options,
    title: String,
}

/// Window size, never zero.
fn window_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn create_engine(
        &self,
        window: &Arc<Window>,
    ) -> Result<MorphEngine<GpuInstanceRenderer>, MorphError> {
        let (width, height) = window_size(window.inner_size());
        let context = pollster::block_on(RenderContext::new(
            Arc::clone(window),
            self.crop.surface_size(width, height),
        ))?;
        let renderer = GpuInstanceRenderer::new(
            context,
            self.options.display.instance_size,
            self.options.display.background,
        );
        MorphEngine::new(&self.options, renderer, width, height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let surface = self.crop.surface_size(width, height);
        if let Some(engine) = &mut self.engine {
            engine.renderer_mut().resize(surface.0, surface.1);
            engine.resize(width, height);
        }
        if let Some(page) = &mut self.page {
            page.resize(height as f32);
        }
    }

    fn handle_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let steps = match code {
            KeyCode::ArrowDown | KeyCode::PageDown | KeyCode::Space => 1,
            KeyCode::ArrowUp | KeyCode::PageUp => -1,
            KeyCode::Escape => {
                self.shutdown(event_loop);
                return;
            }
            _ => return,
        };
        if let Some(page) = &mut self.page {
            page.step_section(steps);
        }
    }

    fn frame(&mut self) {
        let now = Instant::now();
        if !self.timing.should_render(now) {
            return;
        }
        let (Some(engine), Some(page)) = (&mut self.engine, &mut self.page)
        else {
            return;
        };
        let events = page.take_events();
        if !events.is_empty() {
            let _ = engine.handle_visibility(&events);
        }
        if let Err(e) = engine.tick(now) {
            log::error!("render error: {e}");
        }
        self.timing.end_frame(now);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let (Some(engine), Some(page)) = (&mut self.engine, &mut self.page) {
            engine.stop(page);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut engine = match self.create_engine(&window) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        let (_, height) = window_size(window.inner_size());
        let mut page = ScrollPage::stacked(
            engine.trigger().section_ids().map(str::to_owned).collect::<Vec<_>>(),
            height as f32,
        );
        engine.start(&mut page);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        self.page = Some(page);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.shutdown(event_loop);
            return;
        }

        // Guard: window, engine and page must be initialised.
        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (width, height) = window_size(size);
                self.resize(width, height);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                if let Some(page) = &mut self.page {
                    page.scroll_by(dy);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(&event, event_loop);
            }

            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
