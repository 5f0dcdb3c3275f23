/// Decoded equirectangular HDR image.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Linear RGBA pixels, row-major, alpha always 1.
    pub pixels: Vec<[f32; 4]>,
}

impl EnvironmentMap {
    /// Wrap decoded pixels. Returns `None` when the pixel count does not
    /// match the dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>) -> Option<Self> {
        (width > 0 && height > 0 && pixels.len() == width as usize * height as usize).then_some(
            Self {
                width,
                height,
                pixels,
            },
        )
    }

    /// Mean radiance over the whole map, used as the realistic view's
    /// image-based ambient term.
    #[must_use]
    pub fn average_radiance(&self) -> [f32; 3] {
        if self.pixels.is_empty() {
            return [0.0; 3];
        }
        let mut sum = [0.0_f64; 3];
        for p in &self.pixels {
            for (s, c) in sum.iter_mut().zip(p) {
                *s += f64::from(*c);
            }
        }
        let n = self.pixels.len() as f64;
        sum.map(|s| (s / n) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_pixel_count() {
        assert!(EnvironmentMap::new(2, 2, vec![[0.0; 4]; 3]).is_none());
        assert!(EnvironmentMap::new(0, 0, Vec::new()).is_none());
    }

    #[test]
    fn average_radiance_is_per_channel_mean() {
        let map = EnvironmentMap::new(2, 1, vec![[1.0, 0.0, 2.0, 1.0], [3.0, 0.0, 0.0, 1.0]])
            .unwrap();
        assert_eq!(map.average_radiance(), [2.0, 0.0, 1.0]);
    }
}
