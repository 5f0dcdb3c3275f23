use std::path::Path;

use glam::Mat4;
use gltf::mesh::Mode;

use crate::error::ViewerError;
use crate::options::MaterialOptions;
use crate::scene::material::{Material, Shading, Side};
use crate::scene::model::{Mesh, ModelAsset, Node, Primitive, TextureImage};

/// Import a glTF/GLB file and normalize its materials.
///
/// Every material referenced by a mesh is made single-sided and
/// metallic-roughness materials get the configured metalness and
/// roughness.
pub fn load_model(path: &Path, options: &MaterialOptions) -> Result<ModelAsset, ViewerError> {
    log::info!("loading model {}", path.display());
    let (document, buffers, images) = gltf::import(path)
        .map_err(|e| ViewerError::ModelLoad(format!("{}: {e}", path.display())))?;

    let textures: Vec<TextureImage> = images.iter().map(convert_image).collect();
    let mut materials: Vec<Material> = document
        .materials()
        .map(|m| convert_material(&m, textures.len()))
        .collect();
    // Index of the glTF default material, appended on first use.
    let mut default_material = None;

    let meshes: Vec<Mesh> = document
        .meshes()
        .map(|mesh| {
            let primitives = mesh
                .primitives()
                .filter_map(|primitive| {
                    if primitive.mode() != Mode::Triangles {
                        log::debug!(
                            "skipping {:?} primitive in mesh {:?}",
                            primitive.mode(),
                            mesh.name()
                        );
                        return None;
                    }
                    let reader =
                        primitive.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));
                    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
                    let normals = reader
                        .read_normals()
                        .map_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()], Iterator::collect);
                    let tex_coords = reader.read_tex_coords(0).map_or_else(
                        || vec![[0.0; 2]; positions.len()],
                        |tc| tc.into_f32().collect(),
                    );
                    let indices = reader.read_indices().map_or_else(
                        || (0..positions.len() as u32).collect(),
                        |i| i.into_u32().collect(),
                    );
                    let material = primitive.material().index().unwrap_or_else(|| {
                        *default_material.get_or_insert_with(|| {
                            materials.push(Material::default());
                            materials.len() - 1
                        })
                    });
                    Some(Primitive {
                        positions,
                        normals,
                        tex_coords,
                        indices,
                        material,
                    })
                })
                .collect();
            Mesh {
                name: mesh.name().map(str::to_owned),
                primitives,
            }
        })
        .collect();

    let nodes: Vec<Node> = document
        .nodes()
        .map(|node| Node {
            name: node.name().map(str::to_owned),
            local_transform: Mat4::from_cols_array_2d(&node.transform().matrix()),
            children: node.children().map(|c| c.index()).collect(),
            mesh: node.mesh().map(|m| m.index()),
        })
        .collect();

    let roots: Vec<usize> = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .map(|scene| scene.nodes().map(|n| n.index()).collect())
        .unwrap_or_default();

    let mut model = ModelAsset::new(nodes, roots, meshes, materials, textures);
    let touched = model.normalize_materials(options.metalness, options.roughness);
    log::info!(
        "loaded {} nodes, {} meshes, {} materials ({} normalized)",
        model.nodes().len(),
        model.meshes().len(),
        model.materials().len(),
        touched
    );
    Ok(model)
}

fn convert_material(material: &gltf::Material<'_>, texture_count: usize) -> Material {
    let pbr = material.pbr_metallic_roughness();
    Material {
        name: material.name().map(str::to_owned),
        base_color: pbr.base_color_factor(),
        base_color_texture: pbr
            .base_color_texture()
            .map(|info| info.texture().source().index())
            .filter(|&i| i < texture_count),
        emissive: material.emissive_factor(),
        metalness: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        side: if material.double_sided() {
            Side::Double
        } else {
            Side::Front
        },
        shading: if material.unlit() {
            Shading::Unlit
        } else {
            Shading::MetallicRoughness
        },
    }
}

/// Expand any 8- or 16-bit glTF image to RGBA8. Unsupported formats
/// become a single white pixel so texture indices stay valid.
fn convert_image(image: &gltf::image::Data) -> TextureImage {
    use gltf::image::Format;

    let expand = |channels: usize, bytes_per_channel: usize| -> Vec<u8> {
        let stride = channels * bytes_per_channel;
        let mut out = Vec::with_capacity(image.pixels.len() / stride * 4);
        for px in image.pixels.chunks_exact(stride) {
            // Little-endian 16-bit: keep the high byte.
            let c = |i: usize| px[i * bytes_per_channel + bytes_per_channel - 1];
            let rgba = match channels {
                1 => [c(0), c(0), c(0), 255],
                2 => [c(0), c(1), 0, 255],
                3 => [c(0), c(1), c(2), 255],
                _ => [c(0), c(1), c(2), c(3)],
            };
            out.extend_from_slice(&rgba);
        }
        out
    };

    let pixels = match image.format {
        Format::R8G8B8A8 => Some(image.pixels.clone()),
        Format::R8G8B8 => Some(expand(3, 1)),
        Format::R8G8 => Some(expand(2, 1)),
        Format::R8 => Some(expand(1, 1)),
        Format::R16G16B16A16 => Some(expand(4, 2)),
        Format::R16G16B16 => Some(expand(3, 2)),
        Format::R16G16 => Some(expand(2, 2)),
        Format::R16 => Some(expand(1, 2)),
        other => {
            log::warn!("unsupported texture format {other:?}; using white");
            None
        }
    };
    match pixels {
        Some(pixels) if pixels.len() == image.width as usize * image.height as usize * 4 => {
            TextureImage {
                width: image.width,
                height: image.height,
                pixels,
            }
        }
        _ => TextureImage {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        },
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use glam::Vec3;

    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn loads_nested_mesh_with_normalized_material() {
        let model = load_model(&fixture("quad.gltf"), &MaterialOptions::default()).unwrap();
        assert_eq!(model.nodes().len(), 2);
        assert_eq!(model.meshes().len(), 1);

        let first = model.first_mesh().unwrap();
        assert_eq!(first.node, 1);
        let primitive = &model.meshes()[first.mesh].primitives[0];
        assert_eq!(primitive.positions.len(), 4);
        assert_eq!(primitive.indices, vec![0, 1, 2, 0, 2, 3]);

        let material = &model.materials()[primitive.material];
        assert_eq!(material.side, Side::Front);
        assert_eq!(material.metalness, 0.3);
        assert_eq!(material.roughness, 0.4);
        assert_eq!(material.name.as_deref(), Some("panel"));
    }

    #[test]
    fn bounds_include_parent_translation() {
        let model = load_model(&fixture("quad.gltf"), &MaterialOptions::default()).unwrap();
        let bounds = model.bounds();
        // Root is translated by +2 on Y; the quad spans [-1, 1] in X and Y.
        assert!(bounds.min.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
        assert!(bounds.max.abs_diff_eq(Vec3::new(1.0, 3.0, 0.0), 1e-5));
    }

    #[test]
    fn model_without_meshes_has_no_first_mesh() {
        let model = load_model(&fixture("empty.gltf"), &MaterialOptions::default()).unwrap();
        assert!(model.first_mesh().is_none());
        assert!(model.bounds().is_empty());
    }

    #[test]
    fn malformed_file_is_a_model_load_error() {
        let err = load_model(&fixture("malformed.gltf"), &MaterialOptions::default());
        assert!(matches!(err, Err(ViewerError::ModelLoad(_))));
    }

    #[test]
    fn missing_file_is_a_model_load_error() {
        let err = load_model(&fixture("does-not-exist.glb"), &MaterialOptions::default());
        assert!(matches!(err, Err(ViewerError::ModelLoad(_))));
    }

    #[test]
    fn rgb_images_expand_to_rgba() {
        let data = gltf::image::Data {
            pixels: vec![10, 20, 30, 40, 50, 60],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let texture = convert_image(&data);
        assert_eq!(texture.pixels, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn sixteen_bit_images_keep_high_byte() {
        let data = gltf::image::Data {
            pixels: vec![0x34, 0x12],
            format: gltf::image::Format::R16,
            width: 1,
            height: 1,
        };
        assert_eq!(convert_image(&data).pixels, vec![0x12, 0x12, 0x12, 255]);
    }
}
