use spincube_scene::{Filter, SamplerState, TextureImage};

const PLACEHOLDER_TEXEL: [u8; 4] = [255, 255, 255, 255];

/// A sampled 2D texture plus its bind group.
pub struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    placeholder: bool,
}

pub fn filter_mode(filter: Filter) -> wgpu::FilterMode {
    match filter {
        Filter::Point => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    }
}

/// Whether a `width` x `height` image can be created as a 2D texture on a
/// device whose largest 2D dimension is `max_dimension`.
pub fn fits_device(width: u32, height: u32, max_dimension: u32) -> bool {
    width > 0 && height > 0 && width <= max_dimension && height <= max_dimension
}

pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("texture_bind_group_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

impl GpuTexture {
    /// Upload `image`, or a 1x1 white placeholder when there is none or the
    /// device cannot hold it. The placeholder keeps the bind group valid so
    /// untextured frames need no separate pipeline.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: Option<&TextureImage>,
        sampler_state: SamplerState,
    ) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let image = image.filter(|img| {
            let fits = fits_device(img.width, img.height, max_dimension);
            if !fits {
                tracing::warn!(
                    width = img.width,
                    height = img.height,
                    max_dimension,
                    "texture exceeds device limits, drawing untextured"
                );
            }
            fits
        });
        let (width, height, pixels, bytes_per_row): (u32, u32, &[u8], u32) = match image {
            Some(img) => (img.width, img.height, img.rgba.as_slice(), img.bytes_per_row()),
            None => (1, 1, &PLACEHOLDER_TEXEL[..], 4),
        };
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(if image.is_some() {
                "scene_texture"
            } else {
                "placeholder_texture"
            }),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: filter_mode(sampler_state.mag),
            min_filter: filter_mode(sampler_state.min),
            mipmap_filter: filter_mode(sampler_state.mip),
            ..Default::default()
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        tracing::debug!(width, height, placeholder = image.is_none(), "texture uploaded");
        Self {
            texture,
            bind_group,
            placeholder: image.is_none(),
        }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn destroy(self) {
        self.texture.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_map_to_wgpu() {
        assert_eq!(filter_mode(Filter::Linear), wgpu::FilterMode::Linear);
        assert_eq!(filter_mode(Filter::Point), wgpu::FilterMode::Nearest);
    }

    #[test]
    fn oversized_images_do_not_fit() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        assert!(fits_device(256, 256, max));
        assert!(fits_device(max, max, max));
        assert!(!fits_device(max + 1, 1, max));
        assert!(!fits_device(1, max + 1, max));
        assert!(!fits_device(0, 4, max));
    }
}
