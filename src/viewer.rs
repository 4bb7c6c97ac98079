//! Standalone window backed by winit.
//!
//! ```no_run
//! # use sphere_swarm::{Options, Viewer};
//! Viewer::builder()
//!     .with_options(Options::default())
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    engine::SwarmEngine, error::SwarmError, input::InputEvent,
    input::MouseButton, options::Options,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Options,
    title: String,
    size: (u32, u32),
}

impl ViewerBuilder {
    /// Default options, title "Sphere Swarm", 800×600 logical pixels.
    fn new() -> Self {
        Self {
            options: Options::default(),
            title: "Sphere Swarm".into(),
            size: (800, 600),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the base window title; live stats are appended to it.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options,
            title: self.title,
            size: self.size,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the swarm.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
    size: (u32, u32),
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
    /// [`SwarmError::Viewer`] if the event loop cannot start or exits
    /// abnormally; an engine that fails to initialize is returned as its
    /// own error.
    pub fn run(self) -> Result<(), SwarmError> {
        let event_loop =
            EventLoop::new().map_err(|e| SwarmError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            options: Some(self.options),
            title: self.title,
            size: self.size,
            init_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| SwarmError::Viewer(e.to_string()))?;
        app.init_error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<SwarmEngine>,
    options: Option<Options>,
    title: String,
    size: (u32, u32),
    init_error: Option<SwarmError>,
}

/// Surface size for a window's inner size.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width, inner.height)
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SwarmError) {
        log::error!("{error}");
        self.init_error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };

        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (w, h) = viewport_size(window.inner_size());
                engine.resize(w, h);
                engine.reconfigure();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }

        if let Some(stats) = engine.take_title_update() {
            window.set_title(&format!("{} | {stats}", self.title));
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(options) = self.options.take() else {
            return;
        };

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, SwarmError::Viewer(e.to_string()));
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        match pollster::block_on(SwarmEngine::new(
            Arc::clone(&window),
            size,
            options,
        )) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        if matches!(event, WindowEvent::RedrawRequested) {
            self.redraw();
            return;
        }

        let Some(engine) = &mut self.engine else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                let (w, h) = viewport_size(size);
                engine.resize(w, h);
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let _ = engine.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let _ = engine.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                let _ = engine.handle_input(InputEvent::Scroll { delta: scroll });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let _ = engine.handle_key_press(&format!("{code:?}"));
            }

            _ => (),
        }
    }
}
