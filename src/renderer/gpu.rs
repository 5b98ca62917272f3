//! wgpu instance renderer.
//!
//! Each instance set owns a storage buffer of positions and a small uniform
//! holding its color and primitive size. Every attached set is drawn with one
//! `draw(0..12, 0..count)` call; the tetrahedron's corners come from the
//! vertex index, so there is no vertex buffer.
//!
//! Writes are staged on the CPU and uploaded on [`commit`], so queue writes
//! for a set land together before the next submitted frame.
//!
//! [`commit`]: InstanceRenderer::commit

use glam::Vec3;
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use super::{pipeline_util, InstanceHandle, InstanceRenderer};
use crate::camera::core::{Camera, CameraUniform};
use crate::error::MorphError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTexture;

/// Vertices per tetrahedron (4 faces × 3).
const VERTICES_PER_INSTANCE: u32 = 12;

/// One instance position, padded to 16 bytes for storage-buffer layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuInstance {
    position: [f32; 3],
    _pad: f32,
}

impl GpuInstance {
    fn new(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            _pad: 0.0,
        }
    }
}

/// Per-set uniform: rgb color plus circumradius in `w`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SetUniform {
    color_size: [f32; 4],
}

impl SetUniform {
    fn new(color: Vec3, size: f32) -> Self {
        Self {
            color_size: color.extend(size).to_array(),
        }
    }
}

struct GpuSet {
    staged: Vec<GpuInstance>,
    staged_color: Vec3,
    positions: TypedBuffer<GpuInstance>,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Instanced tetrahedron renderer on a window surface.
pub struct GpuInstanceRenderer {
    context: RenderContext,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    camera_uniform: CameraUniform,
    set_layout: wgpu::BindGroupLayout,
    depth: DepthTexture,
    sets: FxHashMap<InstanceHandle, GpuSet>,
    attached: Vec<InstanceHandle>,
    next_handle: u64,
    instance_size: f32,
    background: wgpu::Color,
}

impl GpuInstanceRenderer {
    /// Build the pipeline on `context`.
    ///
    /// `instance_size` is each tetrahedron's circumradius; `background` the
    /// clear color.
    #[must_use]
    pub fn new(
        context: RenderContext,
        instance_size: f32,
        background: [f32; 3],
    ) -> Self {
        let device = &context.device;
        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform"),
                contents: bytemuck::bytes_of(&camera_uniform),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Layout"),
                entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let set_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Instance Set Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage {
                                read_only: true,
                            },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    uniform_entry(
                        1,
                        wgpu::ShaderStages::VERTEX
                            | wgpu::ShaderStages::FRAGMENT,
                    ),
                ],
            });

        let pipeline = create_pipeline(&context, &camera_layout, &set_layout);
        let (width, height) = context.size();
        let depth = DepthTexture::new(device, width, height);

        Self {
            context,
            pipeline,
            camera_buffer,
            camera_bind_group,
            camera_uniform,
            set_layout,
            depth,
            sets: FxHashMap::default(),
            attached: Vec::new(),
            next_handle: 0,
            instance_size,
            background: wgpu::Color {
                r: f64::from(background[0]),
                g: f64::from(background[1]),
                b: f64::from(background[2]),
                a: 1.0,
            },
        }
    }

    /// Resize the drawing surface and depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        let size = self.context.size();
        if self.depth.size() != size {
            self.depth = DepthTexture::new(&self.context.device, size.0, size.1);
        }
    }

    /// The render context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    fn create_bind_group(
        &self,
        positions: &TypedBuffer<GpuInstance>,
        uniform: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        self.context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Instance Set Bind Group"),
                layout: &self.set_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: positions.buffer().as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: uniform.as_entire_binding(),
                    },
                ],
            })
    }

    fn draw_frame(&self, view: &wgpu::TextureView) {
        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Instance Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view,
                            resolve_target: None,
                            depth_slice: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(self.background),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for handle in &self.attached {
                let Some(set) = self.sets.get(handle) else {
                    continue;
                };
                let count = set.positions.count() as u32;
                if count == 0 {
                    continue;
                }
                pass.set_bind_group(1, &set.bind_group, &[]);
                pass.draw(0..VERTICES_PER_INSTANCE, 0..count);
            }
        }
        self.context.submit(encoder);
    }
}

impl InstanceRenderer for GpuInstanceRenderer {
    fn create_instance_set(
        &mut self,
        positions: &[Vec3],
        color: Vec3,
    ) -> InstanceHandle {
        self.next_handle += 1;
        let handle = InstanceHandle::from_raw(self.next_handle);
        let device = &self.context.device;

        let staged: Vec<GpuInstance> =
            positions.iter().copied().map(GpuInstance::new).collect();
        let label = format!("Instance Set {handle}");
        let buffer = TypedBuffer::new_with_data(
            device,
            &label,
            &staged,
            wgpu::BufferUsages::STORAGE,
        );
        let uniform =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Uniform")),
                contents: bytemuck::bytes_of(&SetUniform::new(
                    color,
                    self.instance_size,
                )),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = self.create_bind_group(&buffer, &uniform);

        let _ = self.sets.insert(
            handle,
            GpuSet {
                staged,
                staged_color: color,
                positions: buffer,
                uniform,
                bind_group,
            },
        );
        handle
    }

    fn set_instance_transform(
        &mut self,
        handle: InstanceHandle,
        index: usize,
        position: Vec3,
    ) {
        if let Some(slot) = self
            .sets
            .get_mut(&handle)
            .and_then(|set| set.staged.get_mut(index))
        {
            *slot = GpuInstance::new(position);
        }
    }

    fn set_color(&mut self, handle: InstanceHandle, color: Vec3) {
        if let Some(set) = self.sets.get_mut(&handle) {
            set.staged_color = color;
        }
    }

    fn commit(&mut self, handle: InstanceHandle) {
        let Some(mut set) = self.sets.remove(&handle) else {
            log::trace!("commit to released instance set {handle}");
            return;
        };
        let reallocated = set.positions.write(
            &self.context.device,
            &self.context.queue,
            &set.staged,
        );
        if reallocated {
            set.bind_group = self.create_bind_group(&set.positions, &set.uniform);
        }
        self.context.queue.write_buffer(
            &set.uniform,
            0,
            bytemuck::bytes_of(&SetUniform::new(
                set.staged_color,
                self.instance_size,
            )),
        );
        let _ = self.sets.insert(handle, set);
    }

    fn attach(&mut self, handle: InstanceHandle) {
        if self.sets.contains_key(&handle) && !self.attached.contains(&handle) {
            self.attached.push(handle);
        }
    }

    fn detach(&mut self, handle: InstanceHandle) {
        self.attached.retain(|attached| *attached != handle);
        let _ = self.sets.remove(&handle);
    }

    fn render(&mut self, camera: &Camera) -> Result<(), MorphError> {
        self.camera_uniform.update_view_proj(camera);
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera_uniform),
        );

        let frame = match self.context.get_next_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(MorphError::Render(e.to_string())),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.draw_frame(&view);
        frame.present();
        Ok(())
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    context: &RenderContext,
    camera_layout: &wgpu::BindGroupLayout,
    set_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let device = &context.device;
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Instance Shader"),
        source: wgpu::ShaderSource::Wgsl(
            include_str!("../../assets/shaders/instance.wgsl").into(),
        ),
    });
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Instance Pipeline Layout"),
            bind_group_layouts: &[camera_layout, set_layout],
            push_constant_ranges: &[],
        });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Instance Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &pipeline_util::color_targets(context.format()),
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(pipeline_util::depth_stencil_state()),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
