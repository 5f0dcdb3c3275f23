//! Depth target and sampled-texture uploads.

use half::f16;

use super::pipeline_helpers::DEPTH_FORMAT;
use crate::scene::model::TextureImage;
use crate::scene::EnvironmentMap;

/// A texture and its default view.
pub struct GpuTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    fn create(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Full-window depth attachment.
    #[must_use]
    pub fn depth(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::create(
            device,
            "Depth Texture",
            width.max(1),
            height.max(1),
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        )
    }

    /// sRGB base-color texture from decoded RGBA8 pixels.
    #[must_use]
    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, image: &TextureImage) -> Self {
        Self::upload(
            device,
            queue,
            label,
            (image.width, image.height),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            4,
            &image.pixels,
        )
    }

    /// Half-float equirectangular environment texture.
    #[must_use]
    pub fn from_environment(device: &wgpu::Device, queue: &wgpu::Queue, map: &EnvironmentMap) -> Self {
        let data = environment_texels(map);
        Self::upload(
            device,
            queue,
            "Environment Map",
            (map.width, map.height),
            wgpu::TextureFormat::Rgba16Float,
            8,
            &data,
        )
    }

    /// 1x1 texture of a single RGBA8 color, bound when a draw has no
    /// texture of its own.
    #[must_use]
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, rgba: [u8; 4]) -> Self {
        Self::upload(
            device,
            queue,
            label,
            (1, 1),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            4,
            &rgba,
        )
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        bytes_per_texel: u32,
        data: &[u8],
    ) -> Self {
        let texture = Self::create(
            device,
            label,
            width,
            height,
            format,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * bytes_per_texel),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        texture
    }
}

/// Pack linear RGBA f32 pixels as little-endian f16 texels.
fn environment_texels(map: &EnvironmentMap) -> Vec<u8> {
    let mut data = Vec::with_capacity(map.pixels.len() * 8);
    for pixel in &map.pixels {
        for channel in pixel {
            // f16 tops out at 65504; brighter HDR samples saturate.
            data.extend_from_slice(&f16::from_f32(channel.min(f16::MAX.to_f32())).to_le_bytes());
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_texels_are_half_floats() {
        let map = EnvironmentMap::new(1, 1, vec![[1.0, 0.5, 1.0e6, 1.0]]).unwrap();
        let data = environment_texels(&map);
        assert_eq!(data.len(), 8);
        let channel = |i: usize| f16::from_le_bytes([data[i * 2], data[i * 2 + 1]]).to_f32();
        assert_eq!(channel(0), 1.0);
        assert_eq!(channel(1), 0.5);
        assert_eq!(channel(2), 65504.0);
        assert_eq!(channel(3), 1.0);
    }
}
