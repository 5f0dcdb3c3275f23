//! CPU-side layouts of the uniform and vertex data the shaders read.
//!
//! Every struct is `#[repr(C)]` + `Pod` and mirrors a WGSL struct in
//! `assets/shaders/common.wgsl` or the pipeline-specific shader.

use glam::{Mat4, Vec3};

use crate::camera::core::{Camera, CameraUniform};
use crate::render::Rect;
use crate::scene::content::PointStyle;
use crate::scene::material::ResolvedMaterial;
use crate::scene::{Background, Light, Scene};

/// Point lights beyond this count are ignored.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Background modes understood by `background.wgsl`.
const BACKGROUND_NONE: f32 = 0.0;
const BACKGROUND_COLOR: f32 = 1.0;
const BACKGROUND_ENVIRONMENT: f32 = 2.0;

/// Interleaved mesh vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Mesh-space position.
    pub position: [f32; 3],
    /// Mesh-space normal.
    pub normal: [f32; 3],
    /// First UV set.
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Per-vertex buffer layout.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Interleave a primitive's attribute streams.
    #[must_use]
    pub fn interleave(
        positions: &[[f32; 3]],
        normals: &[[f32; 3]],
        uvs: &[[f32; 2]],
    ) -> Vec<Self> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Self {
                position,
                normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: uvs.get(i).copied().unwrap_or([0.0; 2]),
            })
            .collect()
    }
}

/// Per-instance point position for the billboard pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    /// Cloud-space position.
    pub position: [f32; 3],
}

impl PointInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    /// Per-instance buffer layout.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera, lights, background and viewport for one scene.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    /// Camera matrices and basis.
    pub camera: CameraUniform,
    /// Summed ambient radiance (rgb) and environment strength (w).
    pub ambient: [f32; 4],
    /// Direction toward the key light (xyz); w is 1 when present.
    pub key_direction: [f32; 4],
    /// Key light radiance.
    pub key_color: [f32; 4],
    /// Point light positions (xyz).
    pub point_positions: [[f32; 4]; MAX_POINT_LIGHTS],
    /// Point light radiance (rgb).
    pub point_colors: [[f32; 4]; MAX_POINT_LIGHTS],
    /// Background color (rgb) and mode (w).
    pub background: [f32; 4],
    /// Viewport width, height in pixels, point light count, unused.
    pub viewport: [f32; 4],
}

impl SceneUniform {
    /// Pack a scene as seen through `camera` in `rect`.
    #[must_use]
    pub fn new(scene: &Scene, camera: &Camera, rect: Rect) -> Self {
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(camera);

        let mut ambient = Vec3::ZERO;
        let mut key_direction = [0.0; 4];
        let mut key_color = [0.0; 4];
        let mut point_positions = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut point_colors = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut point_count = 0;

        for light in scene.lights() {
            match *light {
                Light::Ambient { color, intensity } => {
                    ambient += Vec3::from_array(color) * intensity;
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    ..
                } if key_direction[3] == 0.0 => {
                    let dir = position.normalize_or(Vec3::Y);
                    key_direction = [dir.x, dir.y, dir.z, 1.0];
                    let c = Vec3::from_array(color) * intensity;
                    key_color = [c.x, c.y, c.z, 1.0];
                }
                Light::Directional { .. } => {
                    log::debug!("only the first directional light is shaded");
                }
                Light::Point {
                    color,
                    intensity,
                    position,
                } if point_count < MAX_POINT_LIGHTS => {
                    point_positions[point_count] = [position.x, position.y, position.z, 1.0];
                    let c = Vec3::from_array(color) * intensity;
                    point_colors[point_count] = [c.x, c.y, c.z, 1.0];
                    point_count += 1;
                }
                Light::Point { .. } => {
                    log::debug!("point light limit of {MAX_POINT_LIGHTS} reached");
                }
            }
        }

        let mut environment_strength = 0.0;
        if let Some(environment) = scene.environment() {
            environment_strength = scene.environment_strength();
            ambient += Vec3::from_array(environment.average_radiance()) * environment_strength;
        }

        let background = match scene.background() {
            Background::None => [0.0, 0.0, 0.0, BACKGROUND_NONE],
            Background::Color([r, g, b]) => [*r, *g, *b, BACKGROUND_COLOR],
            Background::Environment(_) => [0.0, 0.0, 0.0, BACKGROUND_ENVIRONMENT],
        };

        Self {
            camera: camera_uniform,
            ambient: [ambient.x, ambient.y, ambient.z, environment_strength],
            key_direction,
            key_color,
            point_positions,
            point_colors,
            background,
            viewport: [rect.width, rect.height, point_count as f32, 0.0],
        }
    }

    /// Whether the background pass draws anything.
    #[must_use]
    pub fn has_background(&self) -> bool {
        self.background[3] != BACKGROUND_NONE
    }
}

/// Transform and material for one mesh primitive draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    /// Mesh-to-world transform.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model` for normals.
    pub normal: [[f32; 4]; 4],
    /// Linear base color.
    pub base_color: [f32; 4],
    /// Emissive (rgb); w is 1 when lit.
    pub emissive: [f32; 4],
    /// Metalness, roughness, texture flag, unused.
    pub params: [f32; 4],
}

impl DrawUniform {
    /// Pack a world transform and resolved material.
    #[must_use]
    pub fn new(world: Mat4, material: &ResolvedMaterial, has_texture: bool) -> Self {
        let [er, eg, eb] = material.emissive;
        Self {
            model: world.to_cols_array_2d(),
            normal: world.inverse().transpose().to_cols_array_2d(),
            base_color: material.base_color,
            emissive: [er, eg, eb, if material.lit { 1.0 } else { 0.0 }],
            params: [
                material.metalness,
                material.roughness,
                if has_texture { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }
}

/// Transform and style for one point cloud.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointUniform {
    /// Cloud-to-world transform.
    pub model: [[f32; 4]; 4],
    /// Color (rgb) and opacity (a).
    pub color: [f32; 4],
    /// Size, attenuation flag, unused, unused.
    pub params: [f32; 4],
}

impl PointUniform {
    /// Pack a cloud's transform and style.
    #[must_use]
    pub fn new(transform: Mat4, style: &PointStyle) -> Self {
        let [r, g, b] = style.color;
        Self {
            model: transform.to_cols_array_2d(),
            color: [r, g, b, style.opacity],
            params: [
                style.size,
                if style.size_attenuation { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::options::LightingOptions;
    use crate::scene::light::{basic_rig, realistic_rig};
    use crate::scene::material::{Material, MaterialOverride};
    use crate::scene::{EnvironmentMap, SceneId};

    fn camera() -> Camera {
        let mut camera = Camera::new(60.0, 1.0, 0.1, 100.0);
        camera.position = Vec3::new(0.0, 0.0, 5.0);
        camera
    }

    #[test]
    fn uniform_sizes_are_sixteen_byte_aligned() {
        assert_eq!(size_of::<CameraUniform>() % 16, 0);
        assert_eq!(size_of::<SceneUniform>() % 16, 0);
        assert_eq!(size_of::<DrawUniform>() % 16, 0);
        assert_eq!(size_of::<PointUniform>() % 16, 0);
        assert_eq!(size_of::<MeshVertex>(), 32);
    }

    #[test]
    fn realistic_rig_packs_key_and_points() {
        let mut scene = Scene::new(SceneId(0));
        scene.set_lights(realistic_rig(&LightingOptions::default()));
        let uniform = SceneUniform::new(&scene, &camera(), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!((uniform.ambient[0] - 0.8).abs() < 1e-6);
        assert_eq!(uniform.key_direction[3], 1.0);
        let dir = Vec3::new(uniform.key_direction[0], uniform.key_direction[1], uniform.key_direction[2]);
        assert!(dir.abs_diff_eq(Vec3::new(10.0, 15.0, 10.0).normalize(), 1e-5));
        assert_eq!(uniform.viewport, [200.0, 100.0, 2.0, 0.0]);
        assert!(!uniform.has_background());
    }

    #[test]
    fn basic_rig_has_no_key_light() {
        let mut scene = Scene::new(SceneId(0));
        scene.set_lights(basic_rig(&LightingOptions::default()));
        scene.set_background(Background::Color([0.1, 0.2, 0.3]));
        let uniform = SceneUniform::new(&scene, &camera(), Rect::default());
        assert_eq!(uniform.key_direction[3], 0.0);
        assert_eq!(uniform.viewport[2], 1.0);
        assert_eq!(uniform.background, [0.1, 0.2, 0.3, BACKGROUND_COLOR]);
    }

    #[test]
    fn environment_adds_ambient_and_sets_mode() {
        let mut scene = Scene::new(SceneId(0));
        let map = EnvironmentMap::new(1, 1, vec![[2.0, 2.0, 2.0, 1.0]]).unwrap();
        scene.set_environment(Arc::new(map), 0.5);
        let uniform = SceneUniform::new(&scene, &camera(), Rect::default());
        assert_eq!(uniform.ambient, [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(uniform.background[3], BACKGROUND_ENVIRONMENT);
    }

    #[test]
    fn extra_point_lights_are_dropped() {
        let mut scene = Scene::new(SceneId(0));
        let point = Light::Point {
            color: [1.0; 3],
            intensity: 1.0,
            position: Vec3::ONE,
        };
        scene.set_lights(vec![point; MAX_POINT_LIGHTS + 2]);
        let uniform = SceneUniform::new(&scene, &camera(), Rect::default());
        assert_eq!(uniform.viewport[2], MAX_POINT_LIGHTS as f32);
    }

    #[test]
    fn draw_uniform_flags_unlit_and_textured() {
        let resolved = MaterialOverride::Unlit {
            color: [0.5; 3],
            side: crate::scene::material::Side::Front,
        }
        .resolve(&Material::default());
        let uniform = DrawUniform::new(Mat4::IDENTITY, &resolved, false);
        assert_eq!(uniform.emissive[3], 0.0);
        assert_eq!(uniform.params[2], 0.0);
        let lit = MaterialOverride::None.resolve(&Material::default());
        assert_eq!(DrawUniform::new(Mat4::IDENTITY, &lit, true).params[2], 1.0);
    }

    #[test]
    fn interleave_fills_missing_attributes() {
        let vertices = MeshVertex::interleave(&[[1.0, 2.0, 3.0]], &[], &[]);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[0].uv, [0.0, 0.0]);
    }
}
