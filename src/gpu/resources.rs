//! GPU copies of models and per-scene draw lists.
//!
//! Model geometry is uploaded once per [`ModelAsset`] and shared by every
//! scene that shows it. Each scene keeps only its uniforms, bind groups and
//! point instance buffers, rebuilt when the scene's revision changes.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use super::pipelines::Pipelines;
use super::texture::GpuTexture;
use super::uniforms::{DrawUniform, MeshVertex, PointInstance, PointUniform, SceneUniform};
use crate::scene::content::wireframe_edges;
use crate::scene::material::{MaterialOverride, Side, Topology};
use crate::scene::{Background, Content, ModelAsset, PointCloud, Scene};

/// Identity of a shared model, stable while an `Arc` to it is held.
pub type ModelKey = usize;

/// Key for a model by address.
#[must_use]
pub fn model_key(model: &Arc<ModelAsset>) -> ModelKey {
    Arc::as_ptr(model) as usize
}

/// One primitive's vertex data plus its index lists.
struct PrimitiveBuffers {
    vertices: wgpu::Buffer,
    triangles: wgpu::Buffer,
    triangle_count: u32,
    /// Edge list, built the first time a wireframe view needs it.
    edges: Option<(wgpu::Buffer, u32)>,
    source_indices: Vec<u32>,
}

/// GPU copy of a shared model.
pub struct ModelBuffers {
    // Held so the address used as key cannot be reused.
    _model: Arc<ModelAsset>,
    /// Indexed by mesh, then primitive.
    primitives: Vec<Vec<PrimitiveBuffers>>,
    textures: Vec<GpuTexture>,
}

impl ModelBuffers {
    /// Upload every primitive and texture of `model`.
    #[must_use]
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, model: &Arc<ModelAsset>) -> Self {
        let primitives = model
            .meshes()
            .iter()
            .enumerate()
            .map(|(m, mesh)| {
                mesh.primitives
                    .iter()
                    .enumerate()
                    .map(|(p, primitive)| {
                        let vertices = MeshVertex::interleave(
                            &primitive.positions,
                            &primitive.normals,
                            &primitive.tex_coords,
                        );
                        PrimitiveBuffers {
                            vertices: device.create_buffer_init(
                                &wgpu::util::BufferInitDescriptor {
                                    label: Some(&format!("Mesh {m} Primitive {p} Vertices")),
                                    contents: bytemuck::cast_slice(&vertices),
                                    usage: wgpu::BufferUsages::VERTEX,
                                },
                            ),
                            triangles: device.create_buffer_init(
                                &wgpu::util::BufferInitDescriptor {
                                    label: Some(&format!("Mesh {m} Primitive {p} Indices")),
                                    contents: bytemuck::cast_slice(&primitive.indices),
                                    usage: wgpu::BufferUsages::INDEX,
                                },
                            ),
                            triangle_count: primitive.indices.len() as u32,
                            edges: None,
                            source_indices: primitive.indices.clone(),
                        }
                    })
                    .collect()
            })
            .collect();
        let textures = model
            .textures()
            .iter()
            .enumerate()
            .map(|(i, image)| GpuTexture::from_image(device, queue, &format!("Model Texture {i}"), image))
            .collect();
        log::debug!(
            "uploaded {} meshes and {} textures",
            model.meshes().len(),
            model.textures().len()
        );
        Self {
            _model: Arc::clone(model),
            primitives,
            textures,
        }
    }

    fn ensure_edges(&mut self, device: &wgpu::Device, mesh: usize, primitive: usize) {
        let Some(buffers) = self.primitives.get_mut(mesh).and_then(|p| p.get_mut(primitive)) else {
            return;
        };
        if buffers.edges.is_none() {
            let lines = wireframe_edges(&buffers.source_indices);
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Mesh {mesh} Primitive {primitive} Edges")),
                contents: bytemuck::cast_slice(&lines),
                usage: wgpu::BufferUsages::INDEX,
            });
            buffers.edges = Some((buffer, lines.len() as u32));
        }
    }
}

/// Upload cache for every model any scene references.
#[derive(Default)]
pub struct ModelCache {
    models: FxHashMap<ModelKey, ModelBuffers>,
}

impl ModelCache {
    /// Upload `model` if it is not cached yet.
    pub fn ensure(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, model: &Arc<ModelAsset>) {
        let _ = self
            .models
            .entry(model_key(model))
            .or_insert_with(|| ModelBuffers::new(device, queue, model));
    }

    /// Drop models no scene references any more.
    pub fn retain(&mut self, live: impl Fn(ModelKey) -> bool) {
        self.models.retain(|key, _| live(*key));
    }

    fn get(&self, key: ModelKey) -> Option<&ModelBuffers> {
        self.models.get(&key)
    }

    fn get_mut(&mut self, key: ModelKey) -> Option<&mut ModelBuffers> {
        self.models.get_mut(&key)
    }
}

/// One primitive draw within a scene.
struct MeshDraw {
    model: ModelKey,
    mesh: usize,
    primitive: usize,
    side: Side,
    topology: Topology,
    bind_group: wgpu::BindGroup,
    // Keeps the uniform alive for the bind group.
    _uniform: wgpu::Buffer,
}

/// One point cloud draw within a scene.
struct PointDraw {
    instances: wgpu::Buffer,
    count: u32,
    bind_group: wgpu::BindGroup,
    _uniform: wgpu::Buffer,
}

/// Everything needed to draw one scene.
pub struct SceneResources {
    revision: u64,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    has_background: bool,
    meshes: Vec<MeshDraw>,
    points: Vec<PointDraw>,
    models: Vec<ModelKey>,
    // Keeps the environment texture alive for the bind group.
    _environment: Option<GpuTexture>,
}

/// Context shared by scene builds.
pub struct BuildContext<'a> {
    /// The device.
    pub device: &'a wgpu::Device,
    /// The queue.
    pub queue: &'a wgpu::Queue,
    /// Layouts and samplers.
    pub pipelines: &'a Pipelines,
    /// Bound when a scene has no environment.
    pub black: &'a GpuTexture,
    /// Bound when a draw has no base-color texture.
    pub white: &'a GpuTexture,
}

impl SceneResources {
    /// Build draw lists and bind groups for `scene`, uploading any model it
    /// shows into `models`.
    #[must_use]
    pub fn new(ctx: &BuildContext<'_>, models: &mut ModelCache, scene: &Scene) -> Self {
        let device = ctx.device;
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Scene {} Uniform", scene.id().0)),
            size: size_of::<SceneUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let environment = scene
            .environment()
            .map(|map| GpuTexture::from_environment(device, ctx.queue, map));
        let environment_view = environment.as_ref().map_or(&ctx.black.view, |t| &t.view);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Scene {} Bind Group", scene.id().0)),
            layout: &ctx.pipelines.scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(environment_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&ctx.pipelines.environment_sampler),
                },
            ],
        });

        let mut resources = Self {
            revision: scene.revision(),
            uniform,
            bind_group,
            has_background: !matches!(scene.background(), Background::None),
            meshes: Vec::new(),
            points: Vec::new(),
            models: Vec::new(),
            _environment: environment,
        };
        for content in scene.content() {
            match content {
                Content::Model { model, material } => {
                    resources.add_model(ctx, models, model, *material);
                }
                Content::Points(cloud) => resources.add_points(ctx, cloud),
            }
        }
        resources
    }

    fn add_model(
        &mut self,
        ctx: &BuildContext<'_>,
        models: &mut ModelCache,
        model: &Arc<ModelAsset>,
        material: MaterialOverride,
    ) {
        models.ensure(ctx.device, ctx.queue, model);
        let key = model_key(model);
        self.models.push(key);
        for instance in model.mesh_instances() {
            let world = model.world_transform(instance.node);
            let Some(mesh) = model.mesh(instance.mesh) else {
                continue;
            };
            for (p, primitive) in mesh.primitives.iter().enumerate() {
                let Some(source) = model.materials().get(primitive.material) else {
                    continue;
                };
                let resolved = material.resolve(source);
                if resolved.topology == Topology::Edges {
                    if let Some(buffers) = models.get_mut(key) {
                        buffers.ensure_edges(ctx.device, instance.mesh, p);
                    }
                }
                let texture = resolved.base_color_texture.and_then(|t| {
                    models.get(key).and_then(|buffers| buffers.textures.get(t))
                });
                let uniform_data = DrawUniform::new(world, &resolved, texture.is_some());
                let uniform = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Draw Uniform"),
                    contents: bytemuck::bytes_of(&uniform_data),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let view = texture.map_or(&ctx.white.view, |t| &t.view);
                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Draw Bind Group"),
                    layout: &ctx.pipelines.draw_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&ctx.pipelines.texture_sampler),
                        },
                    ],
                });
                self.meshes.push(MeshDraw {
                    model: key,
                    mesh: instance.mesh,
                    primitive: p,
                    side: resolved.side,
                    topology: resolved.topology,
                    bind_group,
                    _uniform: uniform,
                });
            }
        }
    }

    fn add_points(&mut self, ctx: &BuildContext<'_>, cloud: &PointCloud) {
        if cloud.positions.is_empty() {
            return;
        }
        let instances: Vec<PointInstance> = cloud
            .positions
            .iter()
            .map(|&position| PointInstance { position })
            .collect();
        let instances = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Instances"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_data = PointUniform::new(cloud.transform, &cloud.style);
        let uniform = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Uniform"),
            contents: bytemuck::bytes_of(&uniform_data),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Bind Group"),
            layout: &ctx.pipelines.point_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });
        self.points.push(PointDraw {
            instances,
            count: cloud.positions.len() as u32,
            bind_group,
            _uniform: uniform,
        });
    }

    /// Revision of the scene these resources were built from.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Models this scene draws.
    #[must_use]
    pub fn models(&self) -> &[ModelKey] {
        &self.models
    }

    /// Refresh the camera, lights and viewport size.
    pub fn write_uniform(&self, queue: &wgpu::Queue, uniform: &SceneUniform) {
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(uniform));
    }

    /// Record background, meshes, then points.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipelines: &Pipelines, models: &ModelCache) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        if self.has_background {
            pass.set_pipeline(pipelines.background());
            pass.draw(0..3, 0..1);
        }

        for draw in &self.meshes {
            let Some(buffers) = models
                .get(draw.model)
                .and_then(|m| m.primitives.get(draw.mesh))
                .and_then(|p| p.get(draw.primitive))
            else {
                continue;
            };
            let (indices, count) = match draw.topology {
                Topology::Triangles => (&buffers.triangles, buffers.triangle_count),
                Topology::Edges => match &buffers.edges {
                    Some((edges, count)) => (edges, *count),
                    None => continue,
                },
            };
            if count == 0 {
                continue;
            }
            pass.set_pipeline(pipelines.mesh(draw.side, draw.topology));
            pass.set_bind_group(1, &draw.bind_group, &[]);
            pass.set_vertex_buffer(0, buffers.vertices.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..count, 0, 0..1);
        }

        if !self.points.is_empty() {
            pass.set_pipeline(pipelines.points());
            for draw in &self.points {
                pass.set_bind_group(1, &draw.bind_group, &[]);
                pass.set_vertex_buffer(0, draw.instances.slice(..));
                pass.draw(0..6, 0..draw.count);
            }
        }
    }
}
