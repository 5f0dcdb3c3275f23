use glam::Vec3;

use super::material::color_from_hex;
use crate::options::LightingOptions;

/// Pink fill light color.
const FILL_COLOR: u32 = 0xff_6b_9d;
/// Cyan rim light color.
const RIM_COLOR: u32 = 0x00_d4_ff;

/// A light source in one view's scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient {
        /// Linear color.
        color: [f32; 3],
        /// Intensity multiplier.
        intensity: f32,
    },
    /// Parallel rays shining from `position` toward the origin.
    Directional {
        /// Linear color.
        color: [f32; 3],
        /// Intensity multiplier.
        intensity: f32,
        /// Position the rays come from.
        position: Vec3,
        /// Whether the light is flagged as a shadow caster.
        casts_shadow: bool,
    },
    /// Omnidirectional light at a point.
    Point {
        /// Linear color.
        color: [f32; 3],
        /// Intensity multiplier.
        intensity: f32,
        /// World-space position.
        position: Vec3,
    },
}

/// Ambient, shadow-flagged key light and two colored accent lights.
#[must_use]
pub fn realistic_rig(options: &LightingOptions) -> Vec<Light> {
    vec![
        Light::Ambient {
            color: [1.0; 3],
            intensity: options.ambient,
        },
        Light::Directional {
            color: [1.0; 3],
            intensity: options.key_intensity,
            position: Vec3::from_array(options.key_position),
            casts_shadow: true,
        },
        Light::Point {
            color: color_from_hex(FILL_COLOR),
            intensity: options.accent_intensity,
            position: Vec3::new(-10.0, 5.0, 5.0),
        },
        Light::Point {
            color: color_from_hex(RIM_COLOR),
            intensity: options.accent_intensity,
            position: Vec3::new(10.0, 5.0, -5.0),
        },
    ]
}

/// Dim ambient plus one white point light.
#[must_use]
pub fn basic_rig(options: &LightingOptions) -> Vec<Light> {
    vec![
        Light::Ambient {
            color: [1.0; 3],
            intensity: options.basic_ambient,
        },
        Light::Point {
            color: [1.0; 3],
            intensity: options.basic_point_intensity,
            position: Vec3::new(5.0, 5.0, 5.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realistic_rig_has_four_lights_with_one_shadow_caster() {
        let lights = realistic_rig(&LightingOptions::default());
        assert_eq!(lights.len(), 4);
        let casters = lights
            .iter()
            .filter(|l| matches!(l, Light::Directional { casts_shadow: true, .. }))
            .count();
        assert_eq!(casters, 1);
        assert!(matches!(
            lights[0],
            Light::Ambient { intensity, .. } if intensity == 0.8
        ));
    }

    #[test]
    fn basic_rig_is_ambient_plus_point() {
        let lights = basic_rig(&LightingOptions::default());
        assert_eq!(lights.len(), 2);
        assert!(matches!(
            lights[1],
            Light::Point { intensity, position, .. }
                if intensity == 0.8 && position == Vec3::splat(5.0)
        ));
    }
}
