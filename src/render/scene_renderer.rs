use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, ShaderModule, TextureView};
use winit::event::WindowEvent;
use winit::window::Window;

use super::{GpuContext, Hud, HudStats, Renderer};
use crate::assets::TextureData;
use crate::camera::PerspectiveCamera;
use crate::scene::{
    Background, Blending, GeometryKey, Material, MeshData, NodeId, SceneGraph, Shading, Side,
    TextureChannel, TextureHandle, TextureMaps, Topology, Vertex,
};
use crate::shader::{DrawUniforms, GlobalUniforms, BACKGROUND_SHADER, GLOW_SHADER, MESH_SHADER};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CHANNELS: [TextureChannel; 4] = [
    TextureChannel::Map,
    TextureChannel::BumpMap,
    TextureChannel::SpecularMap,
    TextureChannel::AlphaMap,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Program {
    Mesh,
    Glow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: Program,
    topology: Topology,
    side: Side,
    blending: Blending,
    transparent: bool,
    depth_write: bool,
}

impl PipelineKey {
    fn new(material: &Material, topology: Topology) -> Self {
        let program = match material.shading {
            Shading::Glow { .. } => Program::Glow,
            _ => Program::Mesh,
        };
        Self {
            program,
            topology,
            side: material.side,
            blending: material.blending,
            transparent: material.is_transparent(),
            depth_write: material.depth_write,
        }
    }

    fn blend(&self) -> wgpu::BlendState {
        match (self.blending, self.transparent) {
            (Blending::Additive, _) => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
            (Blending::Normal, true) => wgpu::BlendState::ALPHA_BLENDING,
            (Blending::Normal, false) => wgpu::BlendState::REPLACE,
        }
    }

    fn cull_mode(&self) -> Option<wgpu::Face> {
        match self.side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }

    fn primitive_topology(&self) -> wgpu::PrimitiveTopology {
        match self.topology {
            Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
            Topology::Lines => wgpu::PrimitiveTopology::LineList,
        }
    }
}

/// Draw order within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Opaque,
    Transparent,
    Glow,
}

struct DrawItem {
    node: NodeId,
    stage: Stage,
    depth: f32,
    pipeline: PipelineKey,
    geometry: GeometryKey,
    maps: Option<TextureMaps>,
}

struct GpuMesh {
    vertices: Buffer,
    indices: Buffer,
    index_count: u32,
    topology: Topology,
}

struct DrawSlot {
    buffer: Buffer,
    bind_group: BindGroup,
}

/// Forward renderer for a [`SceneGraph`], with an optional egui overlay.
///
/// Meshes, textures, per-node uniforms and pipelines are created the first time
/// they are seen and cached for the rest of the run.
pub struct SceneRenderer {
    gpu: GpuContext,
    hud: Option<Hud>,
    stats: HudStats,
    depth_view: TextureView,

    globals_buffer: Buffer,
    globals_bind_group: BindGroup,
    draw_layout: BindGroupLayout,
    material_layout: BindGroupLayout,
    background_layout: BindGroupLayout,

    mesh_shader: ShaderModule,
    glow_shader: ShaderModule,
    mesh_pipeline_layout: wgpu::PipelineLayout,
    glow_pipeline_layout: wgpu::PipelineLayout,
    background_pipeline: RenderPipeline,

    sampler: wgpu::Sampler,
    white: TextureView,

    pipelines: HashMap<PipelineKey, RenderPipeline>,
    meshes: HashMap<GeometryKey, GpuMesh>,
    draws: HashMap<NodeId, DrawSlot>,
    textures: HashMap<(TextureHandle, bool), TextureView>,
    rejected_textures: HashSet<(TextureHandle, bool)>,
    material_groups: HashMap<TextureMaps, BindGroup>,
    default_material_group: BindGroup,
    background: Option<(TextureHandle, BindGroup)>,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>, show_hud: bool) -> Result<Self> {
        let gpu = GpuContext::new(window.clone()).await?;
        let device = &gpu.device;

        let globals_layout = uniform_layout(device, "Globals Layout");
        let draw_layout = uniform_layout(device, "Draw Layout");
        let material_layout = material_layout(device);
        let background_layout = background_layout(device);

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<GlobalUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(MESH_SHADER.into()),
        });
        let glow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Glow Shader"),
            source: wgpu::ShaderSource::Wgsl(GLOW_SHADER.into()),
        });

        let mesh_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let glow_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Glow Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout],
            push_constant_ranges: &[],
        });
        let background_pipeline = create_background_pipeline(device, &background_layout, gpu.format());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let white = upload_texture(
            device,
            &gpu.queue,
            &TextureData::solid(1, 1, [255, 255, 255, 255]),
            false,
        );
        let default_material_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Default Material Bind Group"),
            layout: &material_layout,
            entries: &material_entries([&white, &white, &white, &white], &sampler),
        });

        let (width, height) = gpu.size();
        let depth_view = create_depth_view(device, width, height);
        let hud = show_hud.then(|| Hud::new(&window, device, gpu.format()));

        Ok(Self {
            gpu,
            hud,
            stats: HudStats::default(),
            depth_view,
            globals_buffer,
            globals_bind_group,
            draw_layout,
            material_layout,
            background_layout,
            mesh_shader,
            glow_shader,
            mesh_pipeline_layout,
            glow_pipeline_layout,
            background_pipeline,
            sampler,
            white,
            pipelines: HashMap::new(),
            meshes: HashMap::new(),
            draws: HashMap::new(),
            textures: HashMap::new(),
            rejected_textures: HashSet::new(),
            material_groups: HashMap::new(),
            default_material_group,
            background: None,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        self.gpu.window()
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    /// Let the overlay see the event first; true when it consumed it
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let window = self.gpu.window().clone();
        self.hud
            .as_mut()
            .map(|hud| hud.handle_event(&window, event))
            .unwrap_or(false)
    }

    /// Upload whatever this frame needs and return the ordered draw list
    fn prepare(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Vec<DrawItem> {
        let globals = GlobalUniforms::new(
            camera.view(),
            camera.projection(),
            camera.position,
            &scene.lights(),
        );
        self.gpu
            .queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        if let Background::Texture(handle) = scene.background() {
            self.prepare_background(scene, handle);
        }

        let view = camera.view();
        let mut items = Vec::new();
        for visited in scene.visible_meshes() {
            let geometry = visited.mesh.geometry.key();
            if !self.meshes.contains_key(&geometry) {
                let data = visited.mesh.geometry.build();
                if data.indices.is_empty() {
                    continue;
                }
                let mesh = upload_mesh(&self.gpu.device, &data);
                self.meshes.insert(geometry, mesh);
            }
            let Some(topology) = self.meshes.get(&geometry).map(|mesh| mesh.topology) else {
                continue;
            };

            let material = &visited.mesh.material;
            let pipeline = PipelineKey::new(material, topology);
            if !self.pipelines.contains_key(&pipeline) {
                let created = self.create_pipeline(pipeline);
                self.pipelines.insert(pipeline, created);
            }

            let maps = match pipeline.program {
                Program::Mesh => {
                    self.prepare_material(scene, material.maps);
                    Some(material.maps)
                }
                Program::Glow => None,
            };

            let uniforms = DrawUniforms::new(visited.world, material);
            self.write_draw(visited.id, &uniforms);

            let stage = match pipeline.program {
                Program::Glow => Stage::Glow,
                Program::Mesh if pipeline.transparent => Stage::Transparent,
                Program::Mesh => Stage::Opaque,
            };
            let depth = view.transform_point3(visited.world.w_axis.truncate()).z;

            items.push(DrawItem {
                node: visited.id,
                stage,
                depth,
                pipeline,
                geometry,
                maps,
            });
        }

        // Opaque in scene order, blended layers back to front (view-space z grows toward the camera)
        items.sort_by(|a, b| {
            a.stage.cmp(&b.stage).then_with(|| match a.stage {
                Stage::Opaque => std::cmp::Ordering::Equal,
                _ => a.depth.total_cmp(&b.depth),
            })
        });
        items
    }

    fn write_draw(&mut self, node: NodeId, uniforms: &DrawUniforms) {
        if !self.draws.contains_key(&node) {
            let buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Draw Buffer"),
                size: std::mem::size_of::<DrawUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Draw Bind Group"),
                layout: &self.draw_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.draws.insert(node, DrawSlot { buffer, bind_group });
        }
        if let Some(slot) = self.draws.get(&node) {
            self.gpu
                .queue
                .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(uniforms));
        }
    }

    fn prepare_texture(&mut self, scene: &SceneGraph, handle: TextureHandle, srgb: bool) {
        let key = (handle, srgb);
        if self.textures.contains_key(&key) || self.rejected_textures.contains(&key) {
            return;
        }
        let Some(data) = scene.texture(handle) else {
            return;
        };

        let max_dimension = self.gpu.device.limits().max_texture_dimension_2d;
        let Some(fitted) = data.fit_within(max_dimension) else {
            log::error!(
                "Texture {} ({}x{}, {} bytes) cannot be uploaded, keeping the default",
                handle.0,
                data.width,
                data.height,
                data.byte_len()
            );
            self.rejected_textures.insert(key);
            return;
        };
        if fitted.width != data.width || fitted.height != data.height {
            log::warn!(
                "Texture {} downscaled from {}x{} to {}x{} (device limit {})",
                handle.0,
                data.width,
                data.height,
                fitted.width,
                fitted.height,
                max_dimension
            );
        }

        let view = upload_texture(&self.gpu.device, &self.gpu.queue, &fitted, srgb);
        self.textures.insert(key, view);
    }

    fn prepare_material(&mut self, scene: &SceneGraph, maps: TextureMaps) {
        if maps == TextureMaps::default() || self.material_groups.contains_key(&maps) {
            return;
        }
        for channel in CHANNELS {
            if let Some(handle) = maps.get(channel) {
                self.prepare_texture(scene, handle, channel.is_color());
            }
        }

        let views = CHANNELS.map(|channel| {
            maps.get(channel)
                .and_then(|handle| self.textures.get(&(handle, channel.is_color())))
                .unwrap_or(&self.white)
        });
        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &self.material_layout,
            entries: &material_entries(views, &self.sampler),
        });
        self.material_groups.insert(maps, bind_group);
    }

    fn prepare_background(&mut self, scene: &SceneGraph, handle: TextureHandle) {
        if matches!(&self.background, Some((current, _)) if *current == handle) {
            return;
        }
        self.prepare_texture(scene, handle, true);
        let Some(view) = self.textures.get(&(handle, true)) else {
            return;
        };
        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Background Bind Group"),
            layout: &self.background_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.background = Some((handle, bind_group));
    }

    fn create_pipeline(&self, key: PipelineKey) -> RenderPipeline {
        let (label, module, layout) = match key.program {
            Program::Mesh => ("Mesh Pipeline", &self.mesh_shader, &self.mesh_pipeline_layout),
            Program::Glow => ("Glow Pipeline", &self.glow_shader, &self.glow_pipeline_layout),
        };
        log::debug!("Creating {} for {:?}", label, key);

        self.gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.gpu.format(),
                        blend: Some(key.blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: key.primitive_topology(),
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: key.cull_mode(),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: key.depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }

    fn clear_color(scene: &SceneGraph) -> wgpu::Color {
        match scene.background() {
            Background::Color(color) => wgpu::Color {
                r: color.r as f64,
                g: color.g as f64,
                b: color.b as f64,
                a: 1.0,
            },
            Background::Texture(_) => wgpu::Color::BLACK,
        }
    }
}

impl Renderer for SceneRenderer {
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<()> {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let items = self.prepare(scene, camera);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(Self::clear_color(scene)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (Background::Texture(handle), Some((current, bind_group))) =
                (scene.background(), &self.background)
            {
                if handle == *current {
                    pass.set_pipeline(&self.background_pipeline);
                    pass.set_bind_group(0, bind_group, &[]);
                    pass.draw(0..3, 0..1);
                }
            }

            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for item in &items {
                let (Some(pipeline), Some(mesh), Some(draw)) = (
                    self.pipelines.get(&item.pipeline),
                    self.meshes.get(&item.geometry),
                    self.draws.get(&item.node),
                ) else {
                    continue;
                };

                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, &draw.bind_group, &[]);
                if let Some(maps) = item.maps {
                    let material = self
                        .material_groups
                        .get(&maps)
                        .unwrap_or(&self.default_material_group);
                    pass.set_bind_group(2, material, &[]);
                }
                pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        if let Some(hud) = self.hud.as_mut() {
            let window = self.gpu.window().clone();
            let size = self.gpu.size();
            hud.draw(
                &window,
                &self.gpu.device,
                &self.gpu.queue,
                &mut encoder,
                &view,
                size,
                &self.stats,
            );
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.depth_view = create_depth_view(&self.gpu.device, width, height);
        }
    }

    fn set_stats(&mut self, stats: HudStats) {
        self.stats = stats;
    }
}

fn uniform_layout(device: &Device, label: &str) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn material_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Layout"),
        entries: &[
            texture_entry(0),
            texture_entry(1),
            texture_entry(2),
            texture_entry(3),
            sampler_entry(4),
        ],
    })
}

fn background_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Background Layout"),
        entries: &[texture_entry(0), sampler_entry(1)],
    })
}

fn material_entries<'a>(
    views: [&'a TextureView; 4],
    sampler: &'a wgpu::Sampler,
) -> [wgpu::BindGroupEntry<'a>; 5] {
    [
        wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(views[0]),
        },
        wgpu::BindGroupEntry {
            binding: 1,
            resource: wgpu::BindingResource::TextureView(views[1]),
        },
        wgpu::BindGroupEntry {
            binding: 2,
            resource: wgpu::BindingResource::TextureView(views[2]),
        },
        wgpu::BindGroupEntry {
            binding: 3,
            resource: wgpu::BindingResource::TextureView(views[3]),
        },
        wgpu::BindGroupEntry {
            binding: 4,
            resource: wgpu::BindingResource::Sampler(sampler),
        },
    ]
}

fn create_background_pipeline(
    device: &Device,
    layout: &BindGroupLayout,
    format: wgpu::TextureFormat,
) -> RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Background Shader"),
        source: wgpu::ShaderSource::Wgsl(BACKGROUND_SHADER.into()),
    });
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Background Pipeline Layout"),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Background Pipeline"),
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
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_view(device: &Device, width: u32, height: u32) -> TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
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
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_mesh(device: &Device, data: &MeshData) -> GpuMesh {
    GpuMesh {
        vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        }),
        index_count: data.indices.len() as u32,
        topology: data.topology,
    }
}

fn upload_texture(device: &Device, queue: &wgpu::Queue, data: &TextureData, srgb: bool) -> TextureView {
    let format = if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    };
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("Scene Texture"),
            size: wgpu::Extent3d {
                width: data.width,
                height: data.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &data.data,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
