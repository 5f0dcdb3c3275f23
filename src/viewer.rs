//! Standalone multi-viewport window backed by winit.
//!
//! ```no_run
//! # use prism::viewer::Viewer;
//! Viewer::builder()
//!     .with_model_path("assets/models/robot.glb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{path::PathBuf, sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    camera::input::InputHandler,
    error::ViewerError,
    gpu::{GpuRenderer, RenderContext},
    loader::{AssetLoader, LoadRequest},
    options::Options,
    render::RenderManager,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    model_path: Option<PathBuf>,
    options: Options,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with default options and the title "Prism".
    fn new() -> Self {
        Self {
            model_path: None,
            options: Options::default(),
            title: "Prism".into(),
        }
    }

    /// Load this model instead of the one configured in
    /// `assets.model`. The path is used as given.
    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
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
            model_path: self.model_path,
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window showing one model in every configured view.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    model_path: Option<PathBuf>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// The asset load this viewer will start once its window exists.
    #[must_use]
    pub fn load_request(&self) -> LoadRequest {
        LoadRequest {
            model_path: self
                .model_path
                .clone()
                .unwrap_or_else(|| self.options.assets.model_path()),
            environment_path: self.options.assets.environment_path(),
            materials: self.options.materials.clone(),
        }
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOptions`] for an unusable view list,
    /// [`ViewerError::Viewer`] if the event loop fails, or the error that
    /// stopped window/GPU initialization.
    pub fn run(self) -> Result<(), ViewerError> {
        self.options.validate()?;
        let event_loop =
            EventLoop::new().map_err(|e| ViewerError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            manager: None,
            loader: None,
            input: InputHandler::new(),
            last_frame_time: Instant::now(),
            request: self.load_request(),
            options: self.options,
            title: self.title,
            failure: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewerError::Viewer(e.to_string()))?;
        app.failure.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    manager: Option<RenderManager<GpuRenderer>>,
    loader: Option<AssetLoader>,
    input: InputHandler,
    last_frame_time: Instant,
    request: LoadRequest,
    options: Options,
    title: String,
    /// Initialization error reported from [`Viewer::run`].
    failure: Option<ViewerError>,
}

/// Surface size for a window, never zero.
fn surface_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{error}");
        self.failure = Some(error);
        event_loop.exit();
    }

    /// Hand a finished asset load to the viewports.
    fn poll_loader(&mut self) {
        let Some(assets) = self.loader.as_mut().and_then(AssetLoader::try_recv) else {
            return;
        };
        self.loader = None;
        let Some(manager) = &mut self.manager else {
            return;
        };
        match &assets.model {
            Ok(loaded) => log::info!(
                "loaded {} meshes, {} materials",
                loaded.model.meshes().len(),
                loaded.model.materials().len()
            ),
            Err(e) => log::error!("{}: {e}", self.request.model_path.display()),
        }
        if assets.environment.is_some() {
            log::info!("environment applied to realistic views");
        }
        match manager.apply_assets(&assets, &self.options) {
            Some(planes) => log::info!(
                "clip planes fitted: near {:.4}, far {:.4}",
                planes.near,
                planes.far
            ),
            None if assets.model.is_ok() => {
                log::warn!("model bounds are degenerate; clip planes unchanged");
            }
            None => {}
        }
    }

    fn resize_to_window(&mut self) {
        let (Some(window), Some(manager)) = (&self.window, &mut self.manager) else {
            return;
        };
        let (width, height) = surface_size(window.inner_size());
        let _ = manager.handle_resize(width, height);
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
            let logical_w = (mon_size.width as f64 / scale * 0.75) as u32;
            let logical_h = (mon_size.height as f64 / scale * 0.75) as u32;
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
                self.fail(event_loop, ViewerError::Viewer(format!("failed to create window: {e}")));
                return;
            }
        };

        let (width, height) = surface_size(window.inner_size());
        let context = match pollster::block_on(RenderContext::new(
            window.clone(),
            (width, height),
        )) {
            Ok(context) => context,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let manager = match GpuRenderer::new(context)
            .and_then(|renderer| RenderManager::from_options(renderer, &self.options))
        {
            Ok(manager) => manager,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };

        log::info!("loading {}", self.request.model_path.display());
        match AssetLoader::spawn(self.request.clone()) {
            Ok(loader) => self.loader = Some(loader),
            // Keep the window open with empty viewports.
            Err(e) => log::error!("{e}"),
        }

        window.request_redraw();
        self.window = Some(window);
        self.manager = Some(manager);
        self.resize_to_window();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(loader) = &mut self.loader {
                loader.cancel();
            }
            event_loop.exit();
            return;
        }

        // Guard: both window and manager must be initialised.
        if self.window.is_none() || self.manager.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.resize_to_window();
            }

            WindowEvent::RedrawRequested => {
                self.poll_loader();

                let now = Instant::now();
                let dt = now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                if let Some(manager) = &mut self.manager {
                    match manager.animate(dt) {
                        Ok(()) => {}
                        Err(
                            wgpu::SurfaceError::Outdated
                            | wgpu::SurfaceError::Lost,
                        ) => manager.renderer_mut().recover_surface(),
                        Err(e) => {
                            log::error!("render error: {e:?}");
                        }
                    }
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput { .. }
            | WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::CursorLeft { .. }
            | WindowEvent::ModifiersChanged(_) => {
                let Some(primary) = self.manager.as_mut().and_then(RenderManager::primary_mut) else {
                    return;
                };
                let consumed = self.input.handle_event(
                    &mut primary.controller,
                    &primary.camera,
                    primary.rect.height,
                    &event,
                );
                if consumed {
                    if let Some(w) = &self.window {
                        w.request_redraw();
                    }
                }
            }

            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_model_path_overrides_configured_one() {
        let viewer = Viewer::builder().with_model_path("robot.glb").build();
        let request = viewer.load_request();
        assert_eq!(request.model_path, PathBuf::from("robot.glb"));
        assert_eq!(
            request.environment_path,
            Options::default().assets.environment_path()
        );
    }

    #[test]
    fn configured_model_path_resolves_against_base_dir() {
        let mut options = Options::default();
        options.assets.base_dir = PathBuf::from("data");
        options.assets.model = PathBuf::from("ship.gltf");
        options.assets.environment = None;
        let request = Viewer::builder().with_options(options).build().load_request();
        assert_eq!(request.model_path, PathBuf::from("data/ship.gltf"));
        assert!(request.environment_path.is_none());
    }
}
