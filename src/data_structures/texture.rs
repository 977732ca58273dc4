//! GPU textures with a mip chain and mutable sampler state.
//!
//! A [`Texture`] is created once from decoded RGBA pixels. Creation uploads the
//! base level together with a full box-filtered mip chain, so the chain exists
//! before the texture is first sampled. Pixels, mip chain and wrap mode never
//! change afterwards; only the sampler state can be replaced through
//! [`Texture::apply_sampler_state`].

use anyhow::*;
use image::RgbaImage;

use crate::{
    data_structures::mipmap::mip_chain,
    error::SetupError,
    filter::{SamplerState, WrapMode},
};

/// Bind group layout shared by every scene texture: the image and its sampler.
pub fn texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("texture_bind_group_layout"),
    })
}

/// A sampled 2D texture and the bind group exposing it to the fragment shader.
#[derive(Debug)]
pub struct Texture {
    pub label: String,
    #[allow(unused)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    wrap: WrapMode,
    sampler_state: SamplerState,
    mip_level_count: u32,
}

impl Texture {
    /// Scene textures hold colour data and are sampled as sRGB.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Create a texture from a raw, tightly packed RGBA8 buffer.
    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        pixels: &[u8],
        width: u32,
        height: u32,
        wrap: WrapMode,
        label: &str,
    ) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(SetupError::PixelBufferSize {
                label: label.to_string(),
                width,
                height,
                expected,
                actual: pixels.len(),
            }
            .into());
        }
        let img = RgbaImage::from_raw(width, height, pixels.to_vec())
            .ok_or_else(|| anyhow!("pixel buffer of `{label}` does not match its size"))?;
        Self::from_image(device, queue, layout, &img, wrap, label)
    }

    /// Create a texture from a decoded image, generating its mip chain.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        img: &RgbaImage,
        wrap: WrapMode,
        label: &str,
    ) -> Result<Self> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(SetupError::EmptyImage(label.to_string()).into());
        }

        let levels = mip_chain(img);
        let mip_level_count = levels.len() as u32;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            let (level_width, level_height) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level_width),
                    rows_per_image: Some(level_height),
                },
                wgpu::Extent3d {
                    width: level_width,
                    height: level_height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler_state = SamplerState::default();
        let bind_group = mk_bind_group(device, layout, &view, &sampler_state, wrap, label);
        log::info!("loaded texture `{label}` ({width}x{height}, {mip_level_count} mip levels, {wrap:?})");

        Ok(Self {
            label: label.to_string(),
            texture,
            view,
            layout: layout.clone(),
            bind_group,
            wrap,
            sampler_state,
            mip_level_count,
        })
    }

    /// Replace the sampler parameters of this texture.
    ///
    /// Idempotent and cheap to call every frame: applying the state the texture
    /// already has leaves the GPU sampler untouched.
    pub fn apply_sampler_state(&mut self, device: &wgpu::Device, state: SamplerState) {
        if state == self.sampler_state {
            return;
        }
        log::debug!(
            "texture `{}`: sampler {:?} -> {:?}",
            self.label,
            self.sampler_state,
            state
        );
        self.bind_group = mk_bind_group(
            device,
            &self.layout,
            &self.view,
            &state,
            self.wrap,
            &self.label,
        );
        self.sampler_state = state;
    }

    pub fn sampler_state(&self) -> SamplerState {
        self.sampler_state
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    pub fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    state: &SamplerState,
    wrap: WrapMode,
    label: &str,
) -> wgpu::BindGroup {
    let sampler = device.create_sampler(&state.descriptor(wrap));
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some(&format!("{label} bind group")),
    })
}

/// Depth attachment of the scene pass.
///
/// Cleared to 1.0 every frame. The scene pipelines compare with `Always` and
/// never write, so it never rejects a fragment.
#[derive(Debug)]
pub struct DepthTexture {
    #[allow(unused)]
    texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    size: [u32; 2],
}

impl DepthTexture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn create(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = [size[0].max(1), size[1].max(1)];
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size[0],
                height: size[1],
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            size,
        }
    }

    /// Whether this texture can serve as the depth attachment of a `size` target.
    pub fn matches(&self, size: [u32; 2]) -> bool {
        self.size == [size[0].max(1), size[1].max(1)]
    }
}
