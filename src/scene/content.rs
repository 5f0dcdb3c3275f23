//! Per-view content generated from the shared model.
//!
//! Each generator is a pure function of the model: the model itself is
//! never cloned or mutated. Model-backed content carries a
//! [`MaterialOverride`] that the renderer applies per draw.

use std::sync::Arc;

use glam::Mat4;
use rand::Rng;
use rustc_hash::FxHashSet;

use super::material::{color_from_hex, MaterialOverride, Side};
use super::model::{MeshRef, ModelAsset};
use super::sampler::SurfaceSampler;
use crate::options::{MaterialOptions, ParticleOptions, ViewKind};

/// Appearance shared by every point in a cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Point size in world units.
    pub size: f32,
    /// Alpha in `[0, 1]`.
    pub opacity: f32,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
}

impl PointStyle {
    fn new(options: &ParticleOptions, size: f32) -> Self {
        Self {
            color: color_from_hex(options.color),
            size,
            opacity: options.opacity,
            size_attenuation: options.size_attenuation,
        }
    }
}

/// A set of points drawn with one style under one rigid transform.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    /// Positions in cloud space.
    pub positions: Vec<[f32; 3]>,
    /// Cloud-to-world transform.
    pub transform: Mat4,
    /// Appearance.
    pub style: PointStyle,
}

/// Something a view renders.
#[derive(Debug, Clone)]
pub enum Content {
    /// The shared model drawn through a material override.
    Model {
        /// Shared model.
        model: Arc<ModelAsset>,
        /// Per-view material substitution.
        material: MaterialOverride,
    },
    /// A point cloud owned by the view.
    Points(PointCloud),
}

/// The model with its own materials.
#[must_use]
pub fn realistic(model: &Arc<ModelAsset>) -> Content {
    Content::Model {
        model: Arc::clone(model),
        material: MaterialOverride::None,
    }
}

/// The model as accent-colored, glowing triangle edges.
#[must_use]
pub fn wireframe(model: &Arc<ModelAsset>, options: &MaterialOptions) -> Content {
    let accent = color_from_hex(options.accent_color);
    Content::Model {
        model: Arc::clone(model),
        material: MaterialOverride::Wireframe {
            color: accent,
            emissive: accent,
            emissive_intensity: options.wireframe_emissive_intensity,
        },
    }
}

/// The model in unlit, single-sided flat gray.
#[must_use]
pub fn minimal(model: &Arc<ModelAsset>, options: &MaterialOptions) -> Content {
    Content::Model {
        model: Arc::clone(model),
        material: MaterialOverride::Unlit {
            color: color_from_hex(options.minimal_color),
            side: Side::Front,
        },
    }
}

/// Exactly `options.count` points sampled uniformly by area over the mesh
/// surface, in world space.
///
/// A mesh with no triangle area yields `count` copies of the mesh origin.
pub fn surface_particles<R: Rng + ?Sized>(
    model: &ModelAsset,
    mesh: MeshRef,
    options: &ParticleOptions,
    rng: &mut R,
) -> PointCloud {
    let world = model.world_transform(mesh.node);
    let sampler = model
        .mesh(mesh.mesh)
        .map_or_else(|| SurfaceSampler::from_triangles(Vec::new()), SurfaceSampler::new);
    if sampler.has_area() {
        log::debug!(
            "sampling {} surface points over area {:.4}",
            options.count,
            sampler.total_area()
        );
    } else {
        log::warn!("mesh has no surface area; surface particles collapse to its origin");
    }
    let positions = sampler
        .sample_n(rng, options.count)
        .into_iter()
        .map(|p| world.transform_point3(p).to_array())
        .collect();
    PointCloud {
        positions,
        transform: Mat4::IDENTITY,
        style: PointStyle::new(options, options.size),
    }
}

/// One point per mesh vertex, positions copied verbatim, placed by the
/// mesh node's world transform.
#[must_use]
pub fn vertex_particles(model: &ModelAsset, mesh: MeshRef, options: &ParticleOptions) -> PointCloud {
    let positions = model
        .mesh(mesh.mesh)
        .map(|m| {
            m.primitives
                .iter()
                .flat_map(|p| p.positions.iter().copied())
                .collect()
        })
        .unwrap_or_default();
    PointCloud {
        positions,
        transform: model.world_transform(mesh.node),
        style: PointStyle::new(options, options.vertex_size),
    }
}

/// Content for one view kind. Particle views sample `mesh`, the model's
/// first mesh with geometry.
pub fn for_view<R: Rng + ?Sized>(
    kind: ViewKind,
    model: &Arc<ModelAsset>,
    mesh: MeshRef,
    materials: &MaterialOptions,
    particles: &ParticleOptions,
    rng: &mut R,
) -> Vec<Content> {
    match kind {
        ViewKind::Realistic => vec![realistic(model)],
        ViewKind::Wireframe => vec![wireframe(model, materials)],
        ViewKind::Minimal => vec![minimal(model, materials)],
        ViewKind::SurfaceParticles => {
            vec![Content::Points(surface_particles(model, mesh, particles, rng))]
        }
        ViewKind::VertexParticles => {
            vec![Content::Points(vertex_particles(model, mesh, particles))]
        }
    }
}

/// Line-list indices for every distinct triangle edge.
///
/// Edges shared by adjacent triangles are emitted once, in first-seen
/// order.
#[must_use]
pub fn wireframe_edges(indices: &[u32]) -> Vec<u32> {
    let mut seen = FxHashSet::default();
    let mut lines = Vec::with_capacity(indices.len() * 2);
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if a != b && seen.insert((a.min(b), a.max(b))) {
                lines.extend_from_slice(&[a, b]);
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::scene::bounds::Aabb;
    use crate::scene::model::tests::cube_model;
    use crate::scene::model::{Mesh, Node};
    use crate::scene::material::Material;

    fn shared_cube() -> Arc<ModelAsset> {
        Arc::new(cube_model(1.0, Vec3::new(0.0, 3.0, 0.0)))
    }

    #[test]
    fn surface_particles_count_and_placement() {
        let model = shared_cube();
        let mesh = model.first_mesh().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let cloud = surface_particles(&model, mesh, &ParticleOptions::default(), &mut rng);
        assert_eq!(cloud.positions.len(), 10_000);
        assert_eq!(cloud.transform, Mat4::IDENTITY);
        let world = Aabb::new(Vec3::new(-1.0, 2.0, -1.0), Vec3::new(1.0, 4.0, 1.0));
        for p in &cloud.positions {
            let p = Vec3::from_array(*p);
            assert!(p.cmpge(world.min - 1e-4).all() && p.cmple(world.max + 1e-4).all());
            // On the surface: at least one coordinate sits on a face.
            let local = p - Vec3::new(0.0, 3.0, 0.0);
            assert!((local.abs().max_element() - 1.0).abs() < 1e-4);
        }
        assert_eq!(cloud.style.size, 0.02);
        assert_eq!(cloud.style.opacity, 0.9);
        assert!(cloud.style.size_attenuation);
    }

    #[test]
    fn surface_particles_on_empty_mesh_do_not_panic() {
        let model = ModelAsset::new(
            vec![Node {
                mesh: Some(0),
                local_transform: Mat4::from_translation(Vec3::X),
                ..Node::empty("flat")
            }],
            vec![0],
            vec![Mesh::default()],
            vec![Material::default()],
            Vec::new(),
        );
        let mesh = MeshRef { node: 0, mesh: 0 };
        let options = ParticleOptions {
            count: 16,
            ..ParticleOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let cloud = surface_particles(&model, mesh, &options, &mut rng);
        assert_eq!(cloud.positions.len(), 16);
        assert!(cloud.positions.iter().all(|p| *p == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn vertex_particles_copy_positions_verbatim() {
        let model = shared_cube();
        let mesh = model.first_mesh().unwrap();
        let cloud = vertex_particles(&model, mesh, &ParticleOptions::default());
        let source = &model.meshes()[0].primitives[0].positions;
        assert_eq!(&cloud.positions, source);
        assert_eq!(cloud.transform, model.world_transform(mesh.node));
    }

    #[test]
    fn model_content_shares_the_model() {
        let model = shared_cube();
        let views = [
            realistic(&model),
            wireframe(&model, &MaterialOptions::default()),
            minimal(&model, &MaterialOptions::default()),
        ];
        for content in &views {
            let Content::Model { model: shared, .. } = content else {
                panic!("expected model content");
            };
            assert!(Arc::ptr_eq(shared, &model));
        }
        assert_eq!(Arc::strong_count(&model), 4);
    }

    #[test]
    fn minimal_is_unlit_front_sided() {
        let model = shared_cube();
        let Content::Model { material, .. } = minimal(&model, &MaterialOptions::default()) else {
            panic!("expected model content");
        };
        let resolved = material.resolve(&model.materials()[0]);
        assert!(!resolved.lit);
        assert_eq!(resolved.side, Side::Front);
    }

    #[test]
    fn particle_views_sample_the_given_mesh() {
        let model = shared_cube();
        let mesh = MeshRef { node: 1, mesh: 0 };
        let mut rng = StdRng::seed_from_u64(0);
        let content = for_view(
            ViewKind::VertexParticles,
            &model,
            mesh,
            &MaterialOptions::default(),
            &ParticleOptions::default(),
            &mut rng,
        );
        let [Content::Points(cloud)] = content.as_slice() else {
            panic!("expected one point cloud");
        };
        assert_eq!(cloud.positions.len(), 24);
        assert_eq!(cloud.transform, model.world_transform(1));
    }

    #[test]
    fn shared_edges_are_emitted_once() {
        // Two triangles sharing edge 0-2.
        let lines = wireframe_edges(&[0, 1, 2, 0, 2, 3]);
        assert_eq!(lines.len(), 10);
        let mut edges: Vec<_> = lines
            .chunks_exact(2)
            .map(|e| (e[0].min(e[1]), e[0].max(e[1])))
            .collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 1), (0, 2), (0, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn split_vertex_cube_keeps_edges_per_face() {
        let model = shared_cube();
        let indices = &model.meshes()[0].primitives[0].indices;
        // 6 faces x (4 border + 1 diagonal), no sharing with split vertices.
        assert_eq!(wireframe_edges(indices).len() / 2, 30);
    }
}
