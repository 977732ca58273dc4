//! Frame composition and execution.
//!
//! Every frame is first described by a [`FramePlan`], a plain value holding the
//! viewport, clear values, camera uniform, ordered draw steps and the sampler
//! state to push onto the ground texture. [`Renderer::render_frame`] then
//! executes the plan on the GPU.
//!
//! # Lifecycle
//!
//! A [`Renderer`] only exists in the ready state: [`Renderer::initialize`] is
//! the transition out of the uninitialised state and may succeed once per
//! process.

use std::{
    iter,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::Context as _;
use image::RgbaImage;
use winit::dpi::PhysicalSize;

use crate::{
    camera::{CameraResources, CameraUniform, Projection},
    data_structures::{
        geometry::{DrawGeometry, Geometry},
        scene::{DrawOrder, SceneObject, billboard_quad, ground_quad},
        texture::{DepthTexture, Texture, texture_bind_group_layout},
    },
    error::SetupError,
    filter::{FilterParameterState, SamplerState},
    pipelines::{BlendMode, ScenePipelines},
    resources::{SceneAssets, compile_program},
    settings::CLEAR_COLOUR,
};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Claim the one renderer initialisation this process is allowed.
///
/// The first call succeeds; every later call fails with
/// [`SetupError::AlreadyInitialized`].
pub fn ensure_initialize_only_once() -> Result<(), SetupError> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(SetupError::AlreadyInitialized);
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn full(size: PhysicalSize<u32>) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width.max(1) as f32,
            height: size.height.max(1) as f32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawStep {
    pub object: DrawOrder,
    pub blend: BlendMode,
}

/// Everything one frame does, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub viewport: Viewport,
    pub clear_colour: wgpu::Color,
    pub clear_depth: f32,
    pub projection: Projection,
    pub camera: CameraUniform,
    /// Draws sorted by [`DrawOrder`]; only blended objects use [`BlendMode::AlphaBlend`].
    pub draws: Vec<DrawStep>,
    /// Applied to the ground texture after the draws.
    pub ground_sampler: SamplerState,
}

impl FramePlan {
    pub fn new(
        size: PhysicalSize<u32>,
        params: &FilterParameterState,
        objects: &[DrawOrder],
    ) -> Self {
        let projection = Projection::new(size.width, size.height);
        let mut draws: Vec<DrawStep> = objects
            .iter()
            .map(|&object| DrawStep {
                object,
                blend: if object.is_blended() {
                    BlendMode::AlphaBlend
                } else {
                    BlendMode::Opaque
                },
            })
            .collect();
        draws.sort_by_key(|step| step.object);

        Self {
            viewport: Viewport::full(size),
            clear_colour: CLEAR_COLOUR,
            clear_depth: 1.0,
            camera: CameraUniform::new(&projection, params.camera_pan),
            projection,
            draws,
            ground_sampler: SamplerState::from_params(params),
        }
    }
}

/// Owns the scene program, both scene objects and the camera uniform.
#[derive(Debug)]
pub struct Renderer {
    pipelines: ScenePipelines,
    camera: CameraResources,
    depth: DepthTexture,
    objects: Vec<SceneObject>,
    color_format: wgpu::TextureFormat,
}

impl Renderer {
    /// Compile the program and create both scene objects.
    ///
    /// Fails with [`SetupError::AlreadyInitialized`] when a renderer was
    /// already initialised in this process, before any GPU resource is created.
    pub fn initialize(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        assets: &SceneAssets,
        size: PhysicalSize<u32>,
    ) -> anyhow::Result<Self> {
        ensure_initialize_only_once()?;

        let program = compile_program(device, &assets.vertex_src, &assets.fragment_src);
        let texture_layout = texture_bind_group_layout(device);
        let projection = Projection::new(size.width, size.height);
        let camera = CameraResources::new(device, CameraUniform::new(&projection, 0.0));
        let pipelines = ScenePipelines::new(
            device,
            color_format,
            &texture_layout,
            &camera.bind_group_layout,
            &program,
        );

        let mut objects = Vec::with_capacity(2);
        for (order, data, image) in [
            (
                DrawOrder::Billboard,
                billboard_quad().context("invalid billboard geometry")?,
                &assets.billboard,
            ),
            (
                DrawOrder::Ground,
                ground_quad().context("invalid ground geometry")?,
                &assets.ground,
            ),
        ] {
            let label = order.label();
            let texture = Texture::from_image(
                device,
                queue,
                &texture_layout,
                image,
                order.wrap_mode(),
                label,
            )
            .with_context(|| format!("failed to create {label} texture"))?;
            objects.push(SceneObject {
                order,
                geometry: Geometry::create(device, label, &data),
                texture,
            });
        }
        objects.sort_by_key(|object| object.order);

        log::info!("renderer ready ({color_format:?}, {}x{})", size.width, size.height);
        Ok(Self {
            pipelines,
            camera,
            depth: DepthTexture::create(device, [size.width, size.height], "depth_texture"),
            objects,
            color_format,
        })
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    pub fn object(&self, order: DrawOrder) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.order == order)
    }

    pub fn plan(&self, size: PhysicalSize<u32>, params: &FilterParameterState) -> FramePlan {
        let orders: Vec<DrawOrder> = self.objects.iter().map(|object| object.order).collect();
        FramePlan::new(size, params, &orders)
    }

    /// Record one frame into `encoder`, targeting `target`.
    ///
    /// The ground texture's sampler is updated after the draws, so a change
    /// made this frame becomes visible from the next one on.
    pub fn render_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size: PhysicalSize<u32>,
        params: &FilterParameterState,
    ) -> FramePlan {
        let plan = self.plan(size, params);
        self.camera.update(queue, plan.camera);
        if !self.depth.matches([size.width, size.height]) {
            self.depth = DepthTexture::create(device, [size.width, size.height], "depth_texture");
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear_depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            let viewport = plan.viewport;
            render_pass.set_viewport(
                viewport.x,
                viewport.y,
                viewport.width,
                viewport.height,
                0.0,
                1.0,
            );
            render_pass.set_bind_group(1, &self.camera.bind_group, &[]);

            for step in &plan.draws {
                let Some(object) = self.objects.iter().find(|o| o.order == step.object) else {
                    continue;
                };
                render_pass.set_pipeline(self.pipelines.get(step.blend));
                render_pass.set_bind_group(0, object.texture.bind_group(), &[]);
                render_pass.bind_geometry(&object.geometry);
                render_pass.draw_geometry(&object.geometry);
            }
        }

        // Only the ground follows the user's filter selection.
        for object in self.objects.iter_mut() {
            if object.order == DrawOrder::Ground {
                object.texture.apply_sampler_state(device, plan.ground_sampler);
            }
        }
        plan
    }

    /// Render one frame offscreen and read it back as RGBA.
    pub async fn capture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: PhysicalSize<u32>,
        params: &FilterParameterState,
    ) -> anyhow::Result<RgbaImage> {
        let width = size.width.max(1);
        let height = size.height.max(1);
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Capture Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.color_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let unpadded_bytes_per_row = 4 * width;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;
        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Capture Buffer"),
            size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Capture Encoder"),
        });
        self.render_frame(device, queue, &mut encoder, &view, size, params);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            extent,
        );
        queue.submit(iter::once(encoder.finish()));

        let buffer_slice = output_buffer.slice(..);
        // The mapping has to be requested before polling, or the poll never sees it.
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .context("failed to wait for the capture copy")?;
        rx.receive()
            .await
            .context("capture buffer mapping was dropped")?
            .context("failed to map the capture buffer")?;

        let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);
        {
            let data = buffer_slice.get_mapped_range();
            for row in data.chunks(padded_bytes_per_row as usize) {
                pixels.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
            }
        }
        output_buffer.unmap();

        if matches!(
            self.color_format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        ) {
            for pixel in pixels.chunks_exact_mut(4) {
                pixel.swap(0, 2);
            }
        }

        RgbaImage::from_raw(width, height, pixels)
            .context("captured frame does not match its dimensions")
    }
}
