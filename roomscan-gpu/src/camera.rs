//! Camera texture bridge
//!
//! Converts the frame's planar YCbCr camera image into two GPU textures
//! (R8 luma, RG8 chroma). The handles are transient: they are valid for one
//! command buffer and get dropped in that buffer's completion callback.

use crate::device::GpuContext;
use roomscan_core::{Error, Result};

/// Borrowed view of one plane of the camera image.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// 1 for the luma plane, 2 for the interleaved chroma plane.
    pub bytes_per_pixel: u32,
}

/// Per-frame camera textures and the bind group sampling them.
pub struct CameraTextureBridge {
    sampler: wgpu::Sampler,
    textures: Option<(wgpu::Texture, wgpu::Texture)>,
    bind_group: Option<wgpu::BindGroup>,
}

impl CameraTextureBridge {
    pub fn new(ctx: &GpuContext) -> Self {
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Camera Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Self {
            sampler,
            textures: None,
            bind_group: None,
        }
    }

    /// Replace the frame textures with ones built from this frame's planes.
    pub fn update(
        &mut self,
        ctx: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        luma: PlaneView<'_>,
        chroma: PlaneView<'_>,
    ) -> Result<()> {
        let y_texture = upload_plane(ctx, "Camera Y Texture", wgpu::TextureFormat::R8Unorm, luma)?;
        let cbcr_texture = upload_plane(
            ctx,
            "Camera CbCr Texture",
            wgpu::TextureFormat::Rg8Unorm,
            chroma,
        )?;

        let y_view = y_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let cbcr_view = cbcr_texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&y_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cbcr_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }));
        self.textures = Some((y_texture, cbcr_texture));
        Ok(())
    }

    /// The bind group for the current frame, if an image was uploaded.
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    /// Hand the frame's texture handles over to the completion callback,
    /// which drops them once the GPU has finished with the command buffer.
    pub fn take_frame_textures(&mut self) -> Option<(wgpu::Texture, wgpu::Texture)> {
        self.bind_group = None;
        self.textures.take()
    }
}

fn upload_plane(
    ctx: &GpuContext,
    label: &str,
    format: wgpu::TextureFormat,
    plane: PlaneView<'_>,
) -> Result<wgpu::Texture> {
    let expected = (plane.width * plane.bytes_per_pixel * plane.height) as usize;
    if plane.data.len() < expected {
        return Err(Error::InvalidData(format!(
            "camera plane holds {} bytes, expected {}",
            plane.data.len(),
            expected
        )));
    }

    let size = wgpu::Extent3d {
        width: plane.width,
        height: plane.height,
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        plane.data,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(plane.width * plane.bytes_per_pixel),
            rows_per_image: Some(plane.height),
        },
        size,
    );

    Ok(texture)
}
