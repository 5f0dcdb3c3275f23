//! The wgpu implementation of [`ViewportRenderer`].
//!
//! One frame is one render pass over the swapchain texture. `clear`
//! acquires the frame and opens the pass; each `render` records into the
//! current viewport/scissor rectangle; `present` ends the pass, submits
//! and presents.

use rustc_hash::FxHashMap;

use super::pipelines::Pipelines;
use super::render_context::RenderContext;
use super::resources::{BuildContext, ModelCache, SceneResources};
use super::texture::GpuTexture;
use super::uniforms::SceneUniform;
use crate::camera::core::Camera;
use crate::error::ViewerError;
use crate::render::{Rect, ViewportRenderer};
use crate::scene::{Scene, SceneId};

/// Framebuffer clear color (linear).
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

struct Frame {
    // Dropped before the encoder is finished.
    pass: Option<wgpu::RenderPass<'static>>,
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
}

/// Draws viewports into the window surface.
pub struct GpuRenderer {
    context: RenderContext,
    pipelines: Pipelines,
    depth: GpuTexture,
    black: GpuTexture,
    white: GpuTexture,
    models: ModelCache,
    scenes: FxHashMap<SceneId, SceneResources>,
    frame: Option<Frame>,
    viewport: Rect,
    scissor: Rect,
}

impl GpuRenderer {
    /// Build pipelines and fallback textures for `context`'s surface.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if a pipeline shader fails to
    /// compose.
    pub fn new(context: RenderContext) -> Result<Self, ViewerError> {
        let device = &context.device;
        let pipelines = Pipelines::new(device, context.format())?;
        let depth = GpuTexture::depth(device, context.width(), context.height());
        let black = GpuTexture::solid(device, &context.queue, "Black Fallback", [0, 0, 0, 255]);
        let white = GpuTexture::solid(device, &context.queue, "White Fallback", [255; 4]);
        Ok(Self {
            context,
            pipelines,
            depth,
            black,
            white,
            models: ModelCache::default(),
            scenes: FxHashMap::default(),
            frame: None,
            viewport: Rect::default(),
            scissor: Rect::default(),
        })
    }

    /// The GPU context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Reconfigure the surface at its current size after it was lost or
    /// became outdated.
    pub fn recover_surface(&mut self) {
        self.frame = None;
        self.context.reconfigure();
    }

    fn target_size(&self) -> (f32, f32) {
        (self.context.width() as f32, self.context.height() as f32)
    }

    /// Intersect a rectangle with the framebuffer, in whole pixels.
    fn clamp_to_target(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let (x, y, w, h) = rect.to_pixels();
        let x = x.min(self.context.width());
        let y = y.min(self.context.height());
        let w = w.min(self.context.width() - x);
        let h = h.min(self.context.height() - y);
        (w > 0 && h > 0).then_some((x, y, w, h))
    }

    fn prepare_scene(&mut self, scene: &Scene) {
        let stale = self
            .scenes
            .get(&scene.id())
            .is_none_or(|r| r.revision() != scene.revision());
        if !stale {
            return;
        }
        let ctx = BuildContext {
            device: &self.context.device,
            queue: &self.context.queue,
            pipelines: &self.pipelines,
            black: &self.black,
            white: &self.white,
        };
        let resources = SceneResources::new(&ctx, &mut self.models, scene);
        log::debug!("rebuilt GPU resources for scene {}", scene.id().0);
        let _ = self.scenes.insert(scene.id(), resources);
        let scenes = &self.scenes;
        self.models
            .retain(|key| scenes.values().any(|s| s.models().contains(&key)));
    }
}

impl ViewportRenderer for GpuRenderer {
    type Error = wgpu::SurfaceError;

    fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.frame = None;
        self.context.resize(width, height);
        self.depth = GpuTexture::depth(&self.context.device, width, height);
    }

    fn clear(&mut self) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.context.get_next_frame()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Viewport Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();
        self.frame = Some(Frame {
            pass: Some(pass),
            encoder,
            surface_texture,
        });
        let (width, height) = self.target_size();
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.scissor = self.viewport;
        Ok(())
    }

    fn set_viewport(&mut self, rect: Rect) {
        self.viewport = rect;
        let Some((x, y, w, h)) = self.clamp_to_target(rect) else {
            return;
        };
        if let Some(pass) = self.frame.as_mut().and_then(|f| f.pass.as_mut()) {
            pass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
        }
    }

    fn set_scissor(&mut self, rect: Rect) {
        self.scissor = rect;
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        let rect = if enabled {
            self.scissor
        } else {
            let (width, height) = self.target_size();
            Rect::new(0.0, 0.0, width, height)
        };
        let Some((x, y, w, h)) = self.clamp_to_target(rect) else {
            return;
        };
        if let Some(pass) = self.frame.as_mut().and_then(|f| f.pass.as_mut()) {
            pass.set_scissor_rect(x, y, w, h);
        }
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) {
        if self.frame.is_none() || self.clamp_to_target(self.viewport).is_none() {
            return;
        }
        self.prepare_scene(scene);
        let Some(resources) = self.scenes.get(&scene.id()) else {
            return;
        };
        resources.write_uniform(
            &self.context.queue,
            &SceneUniform::new(scene, camera, self.viewport),
        );
        if let Some(pass) = self.frame.as_mut().and_then(|f| f.pass.as_mut()) {
            resources.draw(pass, &self.pipelines, &self.models);
        }
    }

    fn present(&mut self) {
        let Some(mut frame) = self.frame.take() else {
            return;
        };
        drop(frame.pass.take());
        self.context.submit(frame.encoder);
        frame.surface_texture.present();
    }
}
