//! Every render pipeline the viewports draw with, plus the bind group
//! layouts and samplers they share.

use super::pipeline_helpers::{
    create_screen_space_pipeline, depth_state, filtering_sampler, linear_sampler,
    repeat_sampler, texture_2d, uniform_buffer,
};
use super::shader_composer::ShaderComposer;
use super::uniforms::{MeshVertex, PointInstance};
use crate::error::ViewerError;
use crate::scene::material::{Side, Topology};

/// Pipelines and layouts, created once per device.
pub struct Pipelines {
    /// Group 0: scene uniform, environment texture, sampler.
    pub scene_layout: wgpu::BindGroupLayout,
    /// Group 1 for meshes: draw uniform, base-color texture, sampler.
    pub draw_layout: wgpu::BindGroupLayout,
    /// Group 1 for point clouds: point uniform.
    pub point_layout: wgpu::BindGroupLayout,
    /// Clamp sampler for the environment map.
    pub environment_sampler: wgpu::Sampler,
    /// Repeat sampler for model textures.
    pub texture_sampler: wgpu::Sampler,
    background: wgpu::RenderPipeline,
    mesh_culled: wgpu::RenderPipeline,
    mesh_double: wgpu::RenderPipeline,
    mesh_lines: wgpu::RenderPipeline,
    points: wgpu::RenderPipeline,
}

impl Pipelines {
    /// Build every pipeline for the given surface format.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if a pipeline shader fails to
    /// compose.
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, ViewerError> {
        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[uniform_buffer(0), texture_2d(1), filtering_sampler(2)],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[uniform_buffer(0), texture_2d(1), filtering_sampler(2)],
        });
        let point_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point Bind Group Layout"),
            entries: &[uniform_buffer(0)],
        });

        let mut composer = ShaderComposer::new()?;
        let background_shader = composer.compose(
            device,
            "Background Shader",
            include_str!("../../assets/shaders/background.wgsl"),
            "background.wgsl",
        )?;
        let mesh_shader = composer.compose(
            device,
            "Mesh Shader",
            include_str!("../../assets/shaders/mesh.wgsl"),
            "mesh.wgsl",
        )?;
        let point_shader = composer.compose(
            device,
            "Point Shader",
            include_str!("../../assets/shaders/points.wgsl"),
            "points.wgsl",
        )?;

        let background = create_screen_space_pipeline(
            device,
            "Background",
            &background_shader,
            format,
            &[&scene_layout],
        );

        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &draw_layout],
            push_constant_ranges: &[],
        });
        let mesh = |label: &str, topology, cull_mode| {
            create_geometry_pipeline(
                device,
                label,
                &mesh_layout,
                &mesh_shader,
                format,
                MeshVertex::layout(),
                wgpu::PrimitiveState {
                    topology,
                    cull_mode,
                    ..Default::default()
                },
                None,
                true,
            )
        };
        let mesh_culled = mesh(
            "Mesh Culled",
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::Face::Back),
        );
        let mesh_double = mesh("Mesh Double", wgpu::PrimitiveTopology::TriangleList, None);
        let mesh_lines = mesh("Mesh Lines", wgpu::PrimitiveTopology::LineList, None);

        let point_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Point Pipeline Layout"),
                bind_group_layouts: &[&scene_layout, &point_layout],
                push_constant_ranges: &[],
            });
        let points = create_geometry_pipeline(
            device,
            "Points",
            &point_pipeline_layout,
            &point_shader,
            format,
            PointInstance::layout(),
            wgpu::PrimitiveState::default(),
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );

        Ok(Self {
            scene_layout,
            draw_layout,
            point_layout,
            environment_sampler: linear_sampler(device, "Environment Sampler"),
            texture_sampler: repeat_sampler(device, "Texture Sampler"),
            background,
            mesh_culled,
            mesh_double,
            mesh_lines,
            points,
        })
    }

    /// Fullscreen background pipeline.
    #[must_use]
    pub fn background(&self) -> &wgpu::RenderPipeline {
        &self.background
    }

    /// Mesh pipeline for a face culling mode and topology.
    #[must_use]
    pub fn mesh(&self, side: Side, topology: Topology) -> &wgpu::RenderPipeline {
        match (topology, side) {
            (Topology::Edges, _) => &self.mesh_lines,
            (Topology::Triangles, Side::Front) => &self.mesh_culled,
            (Topology::Triangles, Side::Double) => &self.mesh_double,
        }
    }

    /// Instanced point billboard pipeline.
    #[must_use]
    pub fn points(&self) -> &wgpu::RenderPipeline {
        &self.points
    }
}

fn create_geometry_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    primitive: wgpu::PrimitiveState,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} Pipeline")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive,
        depth_stencil: Some(depth_state(depth_write, wgpu::CompareFunction::Less)),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
