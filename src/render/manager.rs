//! Viewport ownership and the per-frame and resize protocols.
//!
//! The manager is generic over [`ViewportRenderer`] so the drawing
//! backend can be swapped: the wgpu renderer in the binary, a recording
//! double in tests.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::layout::{equal_columns, Rect};
use crate::camera::clip::{fit_clip_planes, ClipPlanes};
use crate::camera::controller::OrbitController;
use crate::camera::core::Camera;
use crate::camera::sync::sync_camera;
use crate::error::ViewerError;
use crate::loader::LoadedAssets;
use crate::options::{Options, ViewDescriptor, ViewKind};
use crate::scene::content;
use crate::scene::factory::{create_view, ViewParts};
use crate::scene::{Scene, SceneId};

/// Drawing backend driven by [`RenderManager`].
///
/// Calls arrive in a fixed order each frame: one `clear`, then per
/// viewport `set_viewport`, `set_scissor`, `set_scissor_test(true)` and
/// `render`, then `set_scissor_test(false)` and `present`.
pub trait ViewportRenderer {
    /// Error raised when a frame cannot be started.
    type Error;

    /// Resize the output to the full window.
    fn set_size(&mut self, width: u32, height: u32);
    /// Begin a frame and clear the whole framebuffer.
    ///
    /// # Errors
    ///
    /// Returns the backend error if no frame could be acquired; the rest
    /// of the frame is skipped.
    fn clear(&mut self) -> Result<(), Self::Error>;
    /// Set the draw rectangle.
    fn set_viewport(&mut self, rect: Rect);
    /// Set the clip rectangle.
    fn set_scissor(&mut self, rect: Rect);
    /// Enable or disable clip testing.
    fn set_scissor_test(&mut self, enabled: bool);
    /// Draw one scene through one camera into the current rectangle.
    fn render(&mut self, scene: &Scene, camera: &Camera);
    /// Finish and show the frame.
    fn present(&mut self);
}

/// Lifecycle of a [`RenderManager`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// No viewports yet.
    Idle,
    /// At least one viewport, no frame animated yet.
    Configured,
    /// The frame loop is running.
    Running,
}

/// One view's rectangle, scene, camera and controller.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Configured name and kind.
    pub view: ViewDescriptor,
    /// What the viewport draws.
    pub scene: Scene,
    /// Camera the scene is drawn through.
    pub camera: Camera,
    /// Orbit controller moving the camera.
    pub controller: OrbitController,
    /// Screen rectangle, updated on resize.
    pub rect: Rect,
}

/// Owns every viewport and drives the renderer.
pub struct RenderManager<R> {
    renderer: R,
    viewports: Vec<Viewport>,
    primary: Option<usize>,
    state: ManagerState,
    last_size: Option<(u32, u32)>,
}

impl<R: ViewportRenderer> RenderManager<R> {
    /// Empty manager in the [`Idle`](ManagerState::Idle) state.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            viewports: Vec::new(),
            primary: None,
            state: ManagerState::Idle,
            last_size: None,
        }
    }

    /// One viewport per configured view, with the configured primary.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOptions`] if the view list is invalid.
    pub fn from_options(renderer: R, options: &Options) -> Result<Self, ViewerError> {
        options.views.validate()?;
        let mut manager = Self::new(renderer);
        for (i, view) in options.views.list.iter().enumerate() {
            let parts = create_view(SceneId(i as u32), view, options);
            let _ = manager.add_viewport(view.clone(), parts);
        }
        if let Some(index) = options.views.primary_index() {
            manager.primary = Some(index);
        }
        Ok(manager)
    }

    /// Append a viewport at the right. The first viewport becomes primary
    /// until [`set_primary`](Self::set_primary) says otherwise.
    ///
    /// Returns the viewport's index.
    pub fn add_viewport(&mut self, view: ViewDescriptor, parts: ViewParts) -> usize {
        let ViewParts {
            scene,
            camera,
            controller,
        } = parts;
        self.viewports.push(Viewport {
            view,
            scene,
            camera,
            controller,
            rect: Rect::default(),
        });
        if self.state == ManagerState::Idle {
            self.state = ManagerState::Configured;
        }
        let _ = self.primary.get_or_insert(0);
        if let Some((width, height)) = self.last_size {
            self.layout(width, height);
        }
        self.viewports.len() - 1
    }

    /// Make the named viewport drive every other camera.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOptions`] if no viewport has that name.
    pub fn set_primary(&mut self, name: &str) -> Result<(), ViewerError> {
        let index = self
            .viewports
            .iter()
            .position(|v| v.view.name == name)
            .ok_or_else(|| ViewerError::InvalidOptions(format!("no view named '{name}'")))?;
        self.primary = Some(index);
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ManagerState {
        self.state
    }

    /// Viewports in insertion order.
    #[must_use]
    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    /// Index of the primary viewport.
    #[must_use]
    pub fn primary_index(&self) -> Option<usize> {
        self.primary
    }

    /// The primary viewport.
    #[must_use]
    pub fn primary(&self) -> Option<&Viewport> {
        self.viewports.get(self.primary?)
    }

    /// The primary viewport, mutably (input is routed here).
    pub fn primary_mut(&mut self) -> Option<&mut Viewport> {
        self.viewports.get_mut(self.primary?)
    }

    /// The backend.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The backend, mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Last window size seen by [`handle_resize`](Self::handle_resize).
    #[must_use]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.last_size
    }

    /// Step every controller, consuming queued input and damping.
    ///
    /// Returns `true` if any camera moved.
    pub fn update_controls(&mut self, dt: f32) -> bool {
        let mut moved = false;
        for viewport in &mut self.viewports {
            moved |= viewport.controller.update(&mut viewport.camera, dt);
        }
        moved
    }

    /// Copy the primary camera's pose and target to every other viewport.
    pub fn sync_cameras(&mut self) {
        let Some(primary_index) = self.primary else {
            return;
        };
        let Some(primary) = self.viewports.get(primary_index) else {
            return;
        };
        let source = primary.camera.clone();
        let target = primary.controller.target;
        for (i, viewport) in self.viewports.iter_mut().enumerate() {
            if i != primary_index {
                sync_camera(&source, target, &mut viewport.camera, &mut viewport.controller);
            }
        }
    }

    /// Draw every viewport once, in insertion order.
    ///
    /// # Errors
    ///
    /// Propagates the backend error from [`ViewportRenderer::clear`].
    pub fn render(&mut self) -> Result<(), R::Error> {
        self.renderer.clear()?;
        for viewport in &self.viewports {
            self.renderer.set_viewport(viewport.rect);
            self.renderer.set_scissor(viewport.rect);
            self.renderer.set_scissor_test(true);
            self.renderer.render(&viewport.scene, &viewport.camera);
        }
        self.renderer.set_scissor_test(false);
        self.renderer.present();
        Ok(())
    }

    /// One frame: update controls, sync cameras, render.
    ///
    /// # Errors
    ///
    /// Propagates the backend error from [`render`](Self::render).
    pub fn animate(&mut self, dt: f32) -> Result<(), R::Error> {
        if self.state == ManagerState::Configured {
            log::debug!("render loop running with {} viewports", self.viewports.len());
            self.state = ManagerState::Running;
        }
        let _ = self.update_controls(dt);
        self.sync_cameras();
        self.render()
    }

    /// Re-layout for a new window size.
    ///
    /// Returns `false` without touching anything if the size matches the
    /// last one seen.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> bool {
        if self.last_size == Some((width, height)) {
            return false;
        }
        self.last_size = Some((width, height));
        self.layout(width, height);
        self.renderer.set_size(width, height);
        true
    }

    fn layout(&mut self, width: u32, height: u32) {
        let rects = equal_columns(width, height, self.viewports.len());
        for (viewport, rect) in self.viewports.iter_mut().zip(rects) {
            viewport.rect = rect;
            if let Some(aspect) = rect.aspect() {
                viewport.camera.aspect = aspect;
                viewport.camera.update_projection_matrix();
            }
        }
    }

    /// Apply a finished load. The environment reaches the realistic views
    /// whether or not the model loaded. A usable model then fills every
    /// viewport with content, fits shared clip planes to its bounds and
    /// aims the primary controller at its center.
    ///
    /// Returns the fitted planes, or `None` if the model failed or its
    /// bounds were degenerate.
    pub fn apply_assets(&mut self, assets: &LoadedAssets, options: &Options) -> Option<ClipPlanes> {
        if let Some(environment) = &assets.environment {
            for viewport in &mut self.viewports {
                if viewport.view.kind == ViewKind::Realistic {
                    viewport
                        .scene
                        .set_environment(environment.clone(), options.lighting.environment_strength);
                }
            }
        }

        let Ok(loaded) = &assets.model else {
            return None;
        };
        let mut rng = options
            .particles
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        for viewport in &mut self.viewports {
            let generated = content::for_view(
                viewport.view.kind,
                &loaded.model,
                loaded.first_mesh,
                &options.materials,
                &options.particles,
                &mut rng,
            );
            viewport.scene.clear_content();
            viewport.scene.extend(generated);
            log::debug!(
                "view '{}' populated with {} items",
                viewport.view.name,
                viewport.scene.content().len()
            );
        }

        let bounds = loaded.model.bounds();
        let planes = fit_clip_planes(
            self.viewports.iter_mut().map(|v| &mut v.camera),
            &bounds,
            &options.clipping,
        );
        if planes.is_some() {
            self.retarget(bounds.center());
        }
        planes
    }

    /// Move the primary orbit pivot; secondaries follow on the next sync.
    pub fn retarget(&mut self, target: Vec3) {
        if let Some(primary) = self.primary_mut() {
            primary.controller.target = target;
            let _ = primary.controller.update(&mut primary.camera, 0.0);
        }
        self.sync_cameras();
    }
}
