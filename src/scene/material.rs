//! Surface materials and the per-view overrides applied at draw time.

/// Which triangle faces are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Front faces only (back-face culling on).
    #[default]
    Front,
    /// Both faces.
    Double,
}

/// Lighting model of a source material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// glTF metallic-roughness.
    #[default]
    MetallicRoughness,
    /// `KHR_materials_unlit`: base color only.
    Unlit,
}

/// How a draw is assembled from index data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Filled triangles.
    Triangles,
    /// Deduplicated triangle edges.
    Edges,
}

/// A material as loaded from the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Name from the source file, if any.
    pub name: Option<String>,
    /// Linear RGBA base color factor.
    pub base_color: [f32; 4],
    /// Index into the model's textures.
    pub base_color_texture: Option<usize>,
    /// Linear emissive color.
    pub emissive: [f32; 3],
    /// Metalness factor.
    pub metalness: f32,
    /// Roughness factor.
    pub roughness: f32,
    /// Face culling.
    pub side: Side,
    /// Lighting model.
    pub shading: Shading,
}

impl Default for Material {
    /// The glTF default material: white, fully metallic and rough.
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0; 4],
            base_color_texture: None,
            emissive: [0.0; 3],
            metalness: 1.0,
            roughness: 1.0,
            side: Side::Front,
            shading: Shading::MetallicRoughness,
        }
    }
}

impl Material {
    /// Whether the material exposes metalness/roughness parameters.
    #[must_use]
    pub fn is_pbr(&self) -> bool {
        self.shading == Shading::MetallicRoughness
    }
}

/// Everything the GPU needs to shade one primitive in one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMaterial {
    /// Linear RGBA base color.
    pub base_color: [f32; 4],
    /// Texture sampled and multiplied into the base color.
    pub base_color_texture: Option<usize>,
    /// Linear emissive color, intensity already applied.
    pub emissive: [f32; 3],
    /// Metalness factor.
    pub metalness: f32,
    /// Roughness factor.
    pub roughness: f32,
    /// Whether lights affect the surface.
    pub lit: bool,
    /// Face culling.
    pub side: Side,
    /// Triangles or edges.
    pub topology: Topology,
}

/// A per-view substitute for the model's own materials.
///
/// The model is shared by every view; instead of cloning it, each view
/// carries one of these and the renderer resolves it against the source
/// material when building draws.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MaterialOverride {
    /// Render the source materials unchanged.
    #[default]
    None,
    /// Lit wireframe in a single color with emissive glow.
    Wireframe {
        /// Linear line color.
        color: [f32; 3],
        /// Linear emissive color.
        emissive: [f32; 3],
        /// Emissive multiplier.
        emissive_intensity: f32,
    },
    /// Flat, unlit color.
    Unlit {
        /// Linear surface color.
        color: [f32; 3],
        /// Face culling.
        side: Side,
    },
}

impl MaterialOverride {
    /// Combine this override with a source material.
    #[must_use]
    pub fn resolve(&self, source: &Material) -> ResolvedMaterial {
        match *self {
            Self::None => ResolvedMaterial {
                base_color: source.base_color,
                base_color_texture: source.base_color_texture,
                emissive: source.emissive,
                metalness: source.metalness,
                roughness: source.roughness,
                lit: source.shading == Shading::MetallicRoughness,
                side: source.side,
                topology: Topology::Triangles,
            },
            Self::Wireframe {
                color,
                emissive,
                emissive_intensity,
            } => ResolvedMaterial {
                base_color: [color[0], color[1], color[2], 1.0],
                base_color_texture: None,
                emissive: emissive.map(|c| c * emissive_intensity),
                metalness: 0.0,
                roughness: 1.0,
                lit: true,
                side: Side::Double,
                topology: Topology::Edges,
            },
            Self::Unlit { color, side } => ResolvedMaterial {
                base_color: [color[0], color[1], color[2], 1.0],
                base_color_texture: None,
                emissive: [0.0; 3],
                metalness: 0.0,
                roughness: 1.0,
                lit: false,
                side,
                topology: Topology::Triangles,
            },
        }
    }
}

/// Convert one sRGB-encoded channel to linear.
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decode `0xRRGGBB` (sRGB) to linear RGB.
#[must_use]
pub fn color_from_hex(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_decoding_is_linear() {
        let white = color_from_hex(0xff_ff_ff);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-5));
        assert_eq!(color_from_hex(0x00_00_00), [0.0, 0.0, 0.0]);
        let mid = color_from_hex(0x80_80_80);
        assert!((mid[0] - 0.2158).abs() < 1e-3);
        let accent = color_from_hex(0x00_ff_88);
        assert_eq!(accent[0], 0.0);
        assert!((accent[1] - 1.0).abs() < 1e-5);
        assert!(accent[2] > 0.0 && accent[2] < accent[1]);
    }

    #[test]
    fn no_override_passes_source_through() {
        let source = Material {
            base_color_texture: Some(2),
            metalness: 0.3,
            ..Material::default()
        };
        let resolved = MaterialOverride::None.resolve(&source);
        assert_eq!(resolved.base_color_texture, Some(2));
        assert_eq!(resolved.metalness, 0.3);
        assert!(resolved.lit);
        assert_eq!(resolved.topology, Topology::Triangles);
    }

    #[test]
    fn wireframe_replaces_color_and_scales_emissive() {
        let source = Material {
            base_color_texture: Some(0),
            ..Material::default()
        };
        let resolved = MaterialOverride::Wireframe {
            color: [0.0, 1.0, 0.5],
            emissive: [0.0, 1.0, 0.5],
            emissive_intensity: 0.5,
        }
        .resolve(&source);
        assert_eq!(resolved.base_color, [0.0, 1.0, 0.5, 1.0]);
        assert_eq!(resolved.base_color_texture, None);
        assert_eq!(resolved.emissive, [0.0, 0.5, 0.25]);
        assert_eq!(resolved.topology, Topology::Edges);
    }

    #[test]
    fn unlit_override_is_flat_and_single_sided() {
        let source = Material {
            side: Side::Double,
            ..Material::default()
        };
        let resolved = MaterialOverride::Unlit {
            color: [0.2; 3],
            side: Side::Front,
        }
        .resolve(&source);
        assert!(!resolved.lit);
        assert_eq!(resolved.side, Side::Front);
        assert_eq!(resolved.base_color, [0.2, 0.2, 0.2, 1.0]);
    }
}
