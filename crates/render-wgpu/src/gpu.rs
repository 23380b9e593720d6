use crate::shaders::{FRAGMENT_ENTRY, VERTEX_ENTRY};
use bytemuck::{Pod, Zeroable};
use rubik_common::FaceColor;
use rubik_render::{
    BackendError, DrawUniforms, MeshData, MeshHandle, ProgramHandle, RenderBackend, ShaderStage,
};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_DRAW_SLOTS: u32 = 64;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

impl From<&DrawUniforms> for Uniforms {
    fn from(u: &DrawUniforms) -> Self {
        Self {
            model: u.model.to_cols_array_2d(),
            view: u.view.to_cols_array_2d(),
            projection: u.projection.to_cols_array_2d(),
        }
    }
}

/// Round `size` up to a multiple of `alignment`.
fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

struct GpuMesh {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct PendingDraw {
    program: ProgramHandle,
    mesh: MeshHandle,
    uniforms: Uniforms,
}

struct PendingFrame {
    clear: FaceColor,
    draws: Vec<PendingDraw>,
}

/// Uniform buffer holding one `Uniforms` slot per draw of a frame.
struct UniformSlots {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u32,
}

impl UniformSlots {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, capacity: u32) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = align_to(std::mem::size_of::<Uniforms>() as u64, alignment);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniform_buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_uniform_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<Uniforms>() as u64),
                }),
            }],
        });
        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }
}

/// wgpu implementation of [`RenderBackend`] drawing into a window surface.
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    uniform_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniforms: UniformSlots,
    programs: HashMap<ProgramHandle, wgpu::RenderPipeline>,
    meshes: HashMap<MeshHandle, GpuMesh>,
    next_id: u64,
    frame: Option<PendingFrame>,
}

impl WgpuBackend {
    /// Take ownership of a surface and its device, and configure it.
    pub fn new(
        surface: wgpu::Surface<'static>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
    ) -> Self {
        surface.configure(&device, &config);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Uniforms>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let uniforms = UniformSlots::new(&device, &uniform_layout, INITIAL_DRAW_SLOTS);
        let depth_texture = Self::create_depth_texture(&device, config.width, config.height);

        Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            uniform_layout,
            pipeline_layout,
            uniforms,
            programs: HashMap::new(),
            meshes: HashMap::new(),
            next_id: 0,
            frame: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            Self::create_depth_texture(&self.device, self.config.width, self.config.height);
        tracing::debug!("surface resized to {}x{}", self.config.width, self.config.height);
    }

    /// Width over height of the current surface.
    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn next_handle(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn ensure_draw_slots(&mut self, draws: usize) {
        if draws as u32 <= self.uniforms.capacity {
            return;
        }
        let capacity = (draws as u32).next_power_of_two();
        tracing::debug!("growing draw uniform buffer to {capacity} slots");
        self.uniforms = UniformSlots::new(&self.device, &self.uniform_layout, capacity);
    }

    fn create_shader_module(
        &self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<wgpu::ShaderModule, BackendError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(match stage {
                    ShaderStage::Vertex => "cube_vertex_shader",
                    ShaderStage::Fragment => "cube_fragment_shader",
                }),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => Err(BackendError::ShaderCompile {
                stage,
                log: err.to_string(),
            }),
            None => Ok(module),
        }
    }

    fn create_buffer(
        &self,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl RenderBackend for WgpuBackend {
    fn compile_and_link_shader(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError> {
        let vertex = self.create_shader_module(ShaderStage::Vertex, vertex_source)?;
        let fragment = self.create_shader_module(ShaderStage::Fragment, fragment_source)?;

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("cube_pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex,
                    entry_point: Some(VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: &[
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                        },
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<[f32; 4]>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![1 => Float32x4],
                        },
                    ],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment,
                    entry_point: Some(FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(BackendError::ShaderLink {
                log: err.to_string(),
            });
        }

        let handle = ProgramHandle(self.next_handle());
        self.programs.insert(handle, pipeline);
        tracing::info!("shader program {handle:?} linked");
        Ok(handle)
    }

    fn create_mesh(&mut self, mesh: &MeshData) -> Result<(MeshHandle, u32), BackendError> {
        if mesh.positions.len() != mesh.colors.len() {
            return Err(BackendError::ResourceCreation(format!(
                "{} positions but {} colors",
                mesh.positions.len(),
                mesh.colors.len()
            )));
        }
        if mesh.indices.is_empty() {
            return Err(BackendError::ResourceCreation("mesh has no indices".into()));
        }

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let positions = self.create_buffer(
            "cube_position_buffer",
            bytemuck::cast_slice(&mesh.positions),
            wgpu::BufferUsages::VERTEX,
        );
        let colors = self.create_buffer(
            "cube_color_buffer",
            bytemuck::cast_slice(&mesh.colors),
            wgpu::BufferUsages::VERTEX,
        );
        let indices = self.create_buffer(
            "cube_index_buffer",
            bytemuck::cast_slice(&mesh.indices),
            wgpu::BufferUsages::INDEX,
        );
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(BackendError::ResourceCreation(err.to_string()));
        }

        let handle = MeshHandle(self.next_handle());
        let index_count = mesh.index_count();
        self.meshes.insert(
            handle,
            GpuMesh {
                positions,
                colors,
                indices,
                index_count,
            },
        );
        Ok((handle, index_count))
    }

    fn begin_frame(&mut self, clear: FaceColor) -> Result<(), BackendError> {
        self.frame = Some(PendingFrame {
            clear,
            draws: Vec::new(),
        });
        Ok(())
    }

    fn draw(
        &mut self,
        program: ProgramHandle,
        mesh: MeshHandle,
        uniforms: &DrawUniforms,
    ) -> Result<(), BackendError> {
        if !self.programs.contains_key(&program) {
            return Err(BackendError::UnknownProgram(program));
        }
        if !self.meshes.contains_key(&mesh) {
            return Err(BackendError::UnknownMesh(mesh));
        }
        let frame = self.frame.as_mut().ok_or(BackendError::FrameNotStarted)?;
        frame.draws.push(PendingDraw {
            program,
            mesh,
            uniforms: Uniforms::from(uniforms),
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        let frame = self.frame.take().ok_or(BackendError::FrameNotStarted)?;

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                tracing::debug!("surface reconfigured, frame skipped");
                return Ok(());
            }
            Err(e) => return Err(BackendError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ensure_draw_slots(frame.draws.len());
        if !frame.draws.is_empty() {
            let stride = self.uniforms.stride as usize;
            let mut staging = vec![0u8; stride * frame.draws.len()];
            for (slot, draw) in frame.draws.iter().enumerate() {
                let bytes = bytemuck::bytes_of(&draw.uniforms);
                staging[slot * stride..slot * stride + bytes.len()].copy_from_slice(bytes);
            }
            self.queue.write_buffer(&self.uniforms.buffer, 0, &staging);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let [r, g, b, a] = frame.clear.rgba().map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            for (slot, draw) in frame.draws.iter().enumerate() {
                // Handles were checked in `draw`; a release in between drops the draw.
                let (Some(pipeline), Some(mesh)) =
                    (self.programs.get(&draw.program), self.meshes.get(&draw.mesh))
                else {
                    tracing::warn!("skipping draw of released resource {:?}", draw.mesh);
                    continue;
                };
                let offset = (slot as u64 * self.uniforms.stride) as u32;
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &self.uniforms.bind_group, &[offset]);
                pass.set_vertex_buffer(0, mesh.positions.slice(..));
                pass.set_vertex_buffer(1, mesh.colors.slice(..));
                pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        match self.meshes.remove(&mesh) {
            Some(gpu) => {
                gpu.positions.destroy();
                gpu.colors.destroy();
                gpu.indices.destroy();
            }
            None => tracing::warn!("release of unknown mesh {mesh:?}"),
        }
    }

    fn release_program(&mut self, program: ProgramHandle) {
        if self.programs.remove(&program).is_none() {
            tracing::warn!("release of unknown program {program:?}");
        }
    }
}

impl Drop for WgpuBackend {
    fn drop(&mut self) {
        if !self.meshes.is_empty() || !self.programs.is_empty() {
            tracing::warn!(
                meshes = self.meshes.len(),
                programs = self.programs.len(),
                "backend dropped with live resources"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    #[test]
    fn uniform_slots_respect_offset_alignment() {
        let size = std::mem::size_of::<Uniforms>() as u64;
        assert_eq!(size, 192);
        assert_eq!(align_to(size, 256), 256);
        assert_eq!(align_to(size, 64), 192);
        assert_eq!(align_to(256, 256), 256);
    }

    #[test]
    fn uniforms_are_column_major() {
        let draw = DrawUniforms {
            model: Mat4::from_translation(Vec3::new(1.1, -1.1, 0.0)),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        let u = Uniforms::from(&draw);
        assert_eq!(u.model[3][0], 1.1);
        assert_eq!(u.model[3][1], -1.1);
        assert_eq!(u.view[0][0], 1.0);
    }
}
