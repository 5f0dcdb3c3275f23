use std::path::Path;

use crate::error::ViewerError;
use crate::scene::EnvironmentMap;

/// Read and decode an equirectangular Radiance HDR file.
pub fn load_environment(path: &Path) -> Result<EnvironmentMap, ViewerError> {
    log::info!("loading environment {}", path.display());
    let data = std::fs::read(path)
        .map_err(|e| ViewerError::EnvironmentLoad(format!("{}: {e}", path.display())))?;
    decode_environment(&data)
}

/// Decode HDR bytes into linear RGBA f32 pixels with alpha 1.
pub fn decode_environment(data: &[u8]) -> Result<EnvironmentMap, ViewerError> {
    let rgb = image::load_from_memory(data)
        .map_err(|e| ViewerError::EnvironmentLoad(e.to_string()))?
        .to_rgb32f();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| [p[0], p[1], p[2], 1.0]).collect();
    EnvironmentMap::new(width, height, pixels).ok_or_else(|| {
        ViewerError::EnvironmentLoad(format!("decoded image has unusable size {width}x{height}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_radiance_pixels() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tiny.hdr");
        let map = load_environment(&path).unwrap();
        assert_eq!((map.width, map.height), (2, 1));
        assert_eq!(map.pixels[0], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(map.pixels[1], [0.5, 0.25, 0.0, 1.0]);
    }

    #[test]
    fn garbage_is_an_environment_error() {
        let err = decode_environment(b"definitely not an image");
        assert!(matches!(err, Err(ViewerError::EnvironmentLoad(_))));
    }

    #[test]
    fn missing_file_is_an_environment_error() {
        let err = load_environment(Path::new("/nonexistent/sky.hdr"));
        assert!(matches!(err, Err(ViewerError::EnvironmentLoad(_))));
    }
}
