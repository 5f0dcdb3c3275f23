//! Immutable model arena shared by every view.
//!
//! Nodes, meshes, materials and textures are stored once in flat vectors
//! and referenced by index. World transforms are resolved at construction.

use glam::{Mat4, Vec3};

use super::bounds::Aabb;
use super::material::{Material, Side};

/// A scene-graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Name from the source file, if any.
    pub name: Option<String>,
    /// Transform relative to the parent.
    pub local_transform: Mat4,
    /// Child node indices, in source order.
    pub children: Vec<usize>,
    /// Mesh instanced at this node.
    pub mesh: Option<usize>,
}

impl Node {
    /// Node with an identity transform and no mesh.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            local_transform: Mat4::IDENTITY,
            children: Vec::new(),
            mesh: None,
        }
    }
}

/// One draw-call's worth of geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Primitive {
    /// Vertex positions in mesh space.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals; same length as `positions` (flat +Y when absent).
    pub normals: Vec<[f32; 3]>,
    /// First UV set; same length as `positions` (zeros when absent).
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle-list indices.
    pub indices: Vec<u32>,
    /// Index into the model's materials.
    pub material: usize,
}

impl Primitive {
    /// Triangles as position triples, skipping out-of-range indices.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let get = |i: u32| self.positions.get(i as usize).copied().map(Vec3::from_array);
            Some([get(tri[0])?, get(tri[1])?, get(tri[2])?])
        })
    }
}

/// A named group of primitives.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Name from the source file, if any.
    pub name: Option<String>,
    /// Primitives, each with its own material.
    pub primitives: Vec<Primitive>,
}

impl Mesh {
    /// Total vertices across all primitives.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.positions.len()).sum()
    }

    /// Whether any primitive carries vertex positions.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.primitives.iter().any(|p| !p.positions.is_empty())
    }

    /// All triangles across all primitives, in mesh space.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.primitives.iter().flat_map(Primitive::triangles)
    }
}

/// Decoded RGBA8 texture image.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major.
    pub pixels: Vec<u8>,
}

/// A mesh instance located in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRef {
    /// Node that instances the mesh.
    pub node: usize,
    /// Index into the model's meshes.
    pub mesh: usize,
}

/// A loaded model: scene graph plus the resources it references.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    textures: Vec<TextureImage>,
    world_transforms: Vec<Mat4>,
}

impl ModelAsset {
    /// Assemble a model and resolve world transforms from `roots` down.
    ///
    /// Nodes unreachable from `roots` keep an identity world transform and
    /// are skipped by [`traverse`](Self::traverse).
    #[must_use]
    pub fn new(
        nodes: Vec<Node>,
        roots: Vec<usize>,
        meshes: Vec<Mesh>,
        materials: Vec<Material>,
        textures: Vec<TextureImage>,
    ) -> Self {
        let mut model = Self {
            world_transforms: vec![Mat4::IDENTITY; nodes.len()],
            nodes,
            roots,
            meshes,
            materials,
            textures,
        };
        model.resolve_world_transforms();
        model
    }

    fn resolve_world_transforms(&mut self) {
        let mut stack: Vec<(usize, Mat4)> =
            self.roots.iter().rev().map(|&r| (r, Mat4::IDENTITY)).collect();
        let mut visited = vec![false; self.nodes.len()];
        while let Some((index, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            let world = parent * node.local_transform;
            self.world_transforms[index] = world;
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
    }

    /// All nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All meshes.
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// All materials.
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// All textures.
    #[must_use]
    pub fn textures(&self) -> &[TextureImage] {
        &self.textures
    }

    /// Mesh by index.
    #[must_use]
    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    /// World transform of a node.
    #[must_use]
    pub fn world_transform(&self, node: usize) -> Mat4 {
        self.world_transforms
            .get(node)
            .copied()
            .unwrap_or(Mat4::IDENTITY)
    }

    /// Visit reachable nodes depth-first, parents before children, in
    /// source order. Each node is visited at most once.
    pub fn traverse(&self, mut visit: impl FnMut(usize, &Node)) {
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        let mut visited = vec![false; self.nodes.len()];
        while let Some(index) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            visit(index, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Every mesh instance in traversal order.
    #[must_use]
    pub fn mesh_instances(&self) -> Vec<MeshRef> {
        let mut out = Vec::new();
        self.traverse(|index, node| {
            if let Some(mesh) = node.mesh {
                if mesh < self.meshes.len() {
                    out.push(MeshRef { node: index, mesh });
                }
            }
        });
        out
    }

    /// First mesh instance (depth-first) whose mesh has vertex positions.
    ///
    /// Empty transforms, lights and geometry-less meshes are skipped.
    #[must_use]
    pub fn first_mesh(&self) -> Option<MeshRef> {
        self.mesh_instances()
            .into_iter()
            .find(|r| self.meshes[r.mesh].has_geometry())
    }

    /// World-space bounds of every mesh instance's vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for instance in self.mesh_instances() {
            let world = self.world_transform(instance.node);
            for primitive in &self.meshes[instance.mesh].primitives {
                for p in &primitive.positions {
                    bounds.extend(world.transform_point3(Vec3::from_array(*p)));
                }
            }
        }
        bounds
    }

    /// Force every material used by a reachable mesh to render front faces
    /// only and, when it is a metallic-roughness material, override its
    /// metalness and roughness.
    ///
    /// Returns the number of materials touched.
    pub fn normalize_materials(&mut self, metalness: f32, roughness: f32) -> usize {
        let mut used = vec![false; self.materials.len()];
        for instance in self.mesh_instances() {
            for primitive in &self.meshes[instance.mesh].primitives {
                if let Some(flag) = used.get_mut(primitive.material) {
                    *flag = true;
                }
            }
        }
        let mut touched = 0;
        for (material, _) in self.materials.iter_mut().zip(used).filter(|(_, u)| *u) {
            material.side = Side::Front;
            if material.is_pbr() {
                material.metalness = metalness;
                material.roughness = roughness;
            }
            touched += 1;
        }
        touched
    }
}
