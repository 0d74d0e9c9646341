//! wgpu backend for a [`DisplayList`].
//!
//! Each redraw uploads the recorded circles and lines as instance buffers
//! and draws them with instanced six-vertex quads, links first and particles
//! on top. The draw goes into a [`BackingStore`] sized by the list's
//! [`SurfaceSize`](crate::surface::SurfaceSize), with coordinates mapped from
//! its logical size, and the backing texture is then stretched over the
//! swapchain. Until the debounced resize reconfigures the list, the previous
//! backing store is simply stretched to the new window size.

mod backing;

use std::sync::Arc;

use tracing::info;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::GpuError;
use crate::shader::{
    backing_extent, circle_instances, line_instances, CircleInstance, LineInstance, Uniforms,
    CIRCLE_SHADER, LINE_SHADER,
};
use crate::surface::{Color, DisplayList};

use backing::BackingStore;

/// Instance slots allocated up front. 56 particles link in at most 1540 pairs.
const INITIAL_CIRCLES: usize = 64;
const INITIAL_LINES: usize = 2048;

/// Growable vertex buffer of per-instance data.
struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    stride: usize,
    capacity: usize,
    len: u32,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &'static str, stride: usize, capacity: usize) -> Self {
        Self {
            label,
            buffer: create_instance_buffer(device, label, stride, capacity),
            stride,
            capacity,
            len: 0,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let count = bytes.len() / self.stride;
        if count > self.capacity {
            self.capacity = count.next_power_of_two();
            self.buffer = create_instance_buffer(device, self.label, self.stride, self.capacity);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = count as u32;
    }
}

fn create_instance_buffer(
    device: &wgpu::Device,
    label: &str,
    stride: usize,
    capacity: usize,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (stride * capacity.max(1)) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    circle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    circles: InstanceBuffer,
    lines: InstanceBuffer,
    backing: BackingStore,
    background: wgpu::Color,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, background: Color) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            "GPU adapter selected: {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Ambient Field Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colors are CSS-style gamma values; blending them without an sRGB
        // conversion matches how a browser canvas composites.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniforms = Uniforms {
            viewport: [1.0, 1.0],
            _pad: [0.0; 2],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Field Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let circle_attributes = [
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(CircleInstance, center) as wgpu::BufferAddress,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(CircleInstance, radius) as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32,
            },
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(CircleInstance, color) as wgpu::BufferAddress,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ];
        let circle_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            "Circle",
            CIRCLE_SHADER,
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<CircleInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &circle_attributes,
            },
            config.format,
        );

        let line_attributes = [
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(LineInstance, start) as wgpu::BufferAddress,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(LineInstance, end) as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(LineInstance, color) as wgpu::BufferAddress,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: std::mem::offset_of!(LineInstance, width) as wgpu::BufferAddress,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32,
            },
        ];
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            "Line",
            LINE_SHADER,
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &line_attributes,
            },
            config.format,
        );

        let circles = InstanceBuffer::new(
            &device,
            "Circle Instance Buffer",
            std::mem::size_of::<CircleInstance>(),
            INITIAL_CIRCLES,
        );
        let lines = InstanceBuffer::new(
            &device,
            "Line Instance Buffer",
            std::mem::size_of::<LineInstance>(),
            INITIAL_LINES,
        );

        let backing = BackingStore::new(&device, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            circle_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            circles,
            lines,
            backing,
            background: wgpu::Color {
                r: background.r as f64,
                g: background.g as f64,
                b: background.b as f64,
                a: background.a as f64,
            },
        })
    }

    /// Follow the window's new physical size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure at the current size after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Clear to the background and draw `list`, if it has been configured.
    pub fn render(&mut self, list: Option<&DisplayList>) -> Result<(), wgpu::SurfaceError> {
        let max_dimension = self.device.limits().max_texture_dimension_2d;
        let frame = list.and_then(|list| {
            let size = list.size()?;
            let extent = backing_extent(size, max_dimension)?;
            Some((list, size, extent))
        });

        if let Some((list, size, (width, height))) = frame {
            self.queue.write_buffer(
                &self.uniform_buffer,
                0,
                bytemuck::cast_slice(&[Uniforms::for_surface(size)]),
            );
            let circles = circle_instances(list);
            let lines = line_instances(list);
            self.circles
                .upload(&self.device, &self.queue, bytemuck::cast_slice(&circles));
            self.lines
                .upload(&self.device, &self.queue, bytemuck::cast_slice(&lines));
            self.backing.ensure(&self.device, width, height);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let backing_view = frame.and(self.backing.view());
        if let Some(target) = backing_view {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Field Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if self.lines.len > 0 {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, self.lines.buffer.slice(..));
                render_pass.draw(0..6, 0..self.lines.len);
            }
            if self.circles.len > 0 {
                render_pass.set_pipeline(&self.circle_pipeline);
                render_pass.set_vertex_buffer(0, self.circles.buffer.slice(..));
                render_pass.draw(0..6, 0..self.circles.len);
            }
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if backing_view.is_some() {
                self.backing.present(&mut render_pass);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    label: &str,
    source: &str,
    instance_layout: wgpu::VertexBufferLayout<'_>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", label)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", label)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
