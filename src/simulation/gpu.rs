//! wgpu implementation of the compute contracts
//!
//! [`WgpuLibrary`] allocates backend particle arrays as storage buffers in one
//! of two layouts; [`WgpuPhysics`] owns one compute pipeline per layout and
//! dispatches it. Submission is fire-and-forget: nothing here polls the
//! device or waits for completion.

use super::traits::{ComputeLibrary, ComputeMethod, PhysicsModule};
use crate::error::ComputeError;
use log::{info, warn};
use rand::Rng;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, BufferUsages, ComputePipeline, Device, Queue};

/// Threads per workgroup in both kernels
pub const WORKGROUP_SIZE: u32 = 64;

/// Packed particle record, shared by the host mirror and the interleaved buffer
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuParticle {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub mass: f32,
    pub _padding: f32,
}

/// Uniforms written before every dispatch
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PhysicsUniforms {
    delta_time: f32,
    gravity: f32,
    speed: f32,
    particle_count: u32,
}

/// Driver-facing physics parameters
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicsParams {
    pub delta_time: f32,
    /// Pull toward the canvas center
    pub gravity: f32,
    /// Speed limit for every particle
    pub speed: f32,
}

impl PhysicsParams {
    pub fn new(delta_time: f32, gravity: f32, speed: f32) -> Self {
        Self {
            delta_time,
            gravity,
            speed,
        }
    }
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 500.0, 300.0)
    }
}

/// Host copy of the state a duplicate was seeded with
#[derive(Debug, Clone, Default)]
pub struct HostParticleMirror {
    pub particles: Vec<GpuParticle>,
}

/// Device-resident particle arrays for one duplicate
pub struct DeviceParticleArrays {
    method: ComputeMethod,
    particle_count: usize,
    buffers: Vec<Buffer>,
    uniforms: Buffer,
    bind_group: BindGroup,
}

impl DeviceParticleArrays {
    pub fn method(&self) -> ComputeMethod {
        self.method
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    /// Storage buffers in binding order
    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }
}

/// Seeds `count` particles at random positions on the virtual canvas
pub fn seed_particles<R: Rng>(count: usize, rng: &mut R) -> Vec<GpuParticle> {
    (0..count)
        .map(|_| GpuParticle {
            position: [rng.random_range(0.0..1000.0), rng.random_range(0.0..800.0)],
            velocity: [rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0)],
            mass: rng.random_range(1.0..10.0),
            _padding: 0.0,
        })
        .collect()
}

/// Array allocator backed by a wgpu device
#[derive(Clone)]
pub struct WgpuLibrary {
    device: Arc<Device>,
    queue: Arc<Queue>,
    interleaved_layout: Arc<BindGroupLayout>,
    planar_layout: Arc<BindGroupLayout>,
    limits: wgpu::Limits,
}

impl WgpuLibrary {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>) -> Self {
        let interleaved_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Interleaved Particle Layout"),
            entries: &[storage_entry(0), uniform_entry(1)],
        });
        let planar_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Planar Particle Layout"),
            entries: &[
                storage_entry(0),
                storage_entry(1),
                storage_entry(2),
                uniform_entry(3),
            ],
        });

        Self {
            limits: device.limits(),
            device,
            queue,
            interleaved_layout: Arc::new(interleaved_layout),
            planar_layout: Arc::new(planar_layout),
        }
    }

    /// Requests a headless device (no surface) and blocks until it is ready
    pub fn request() -> Result<Self, ComputeError> {
        pollster::block_on(Self::request_async())
    }

    pub async fn request_async() -> Result<Self, ComputeError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Stress Compute Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        info!("Compute device ready: {}", adapter.get_info().name);
        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn limits(&self) -> &wgpu::Limits {
        &self.limits
    }

    /// Largest particle count whose widest storage binding fits the device
    pub fn max_particles(&self, method: ComputeMethod) -> usize {
        let stride = match method {
            ComputeMethod::Interleaved => std::mem::size_of::<GpuParticle>(),
            ComputeMethod::Planar => std::mem::size_of::<[f32; 2]>(),
        } as u64;
        let bytes = (self.limits.max_storage_buffer_binding_size as u64).min(self.limits.max_buffer_size);
        (bytes / stride).min(u32::MAX as u64) as usize
    }

    fn layout(&self, method: ComputeMethod) -> &BindGroupLayout {
        match method {
            ComputeMethod::Interleaved => &self.interleaved_layout,
            ComputeMethod::Planar => &self.planar_layout,
        }
    }

    fn storage_buffer<T: bytemuck::Pod + bytemuck::Zeroable>(&self, label: &str, data: &[T]) -> Buffer {
        // Zero-sized storage bindings are invalid, keep one zeroed element.
        let fallback = [T::zeroed()];
        let contents = if data.is_empty() { &fallback[..] } else { data };
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST | BufferUsages::COPY_SRC,
        })
    }
}

impl ComputeLibrary for WgpuLibrary {
    type Arrays = DeviceParticleArrays;
    type Mirror = HostParticleMirror;

    fn setup_arrays(
        &self,
        method: ComputeMethod,
        particle_count: usize,
    ) -> (DeviceParticleArrays, HostParticleMirror) {
        let max_particles = self.max_particles(method);
        if particle_count > max_particles {
            warn!(
                "{} particles exceed the {} binding limit, allocating {}",
                particle_count, method, max_particles
            );
        }
        let particle_count = particle_count.min(max_particles);
        let particles = seed_particles(particle_count, &mut rand::rng());

        let buffers = match method {
            ComputeMethod::Interleaved => vec![self.storage_buffer("Particle Records", &particles)],
            ComputeMethod::Planar => {
                let positions: Vec<[f32; 2]> = particles.iter().map(|p| p.position).collect();
                let velocities: Vec<[f32; 2]> = particles.iter().map(|p| p.velocity).collect();
                let masses: Vec<f32> = particles.iter().map(|p| p.mass).collect();
                vec![
                    self.storage_buffer("Particle Positions", &positions),
                    self.storage_buffer("Particle Velocities", &velocities),
                    self.storage_buffer("Particle Masses", &masses),
                ]
            }
        };

        let uniforms = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Physics Uniforms"),
            size: std::mem::size_of::<PhysicsUniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut entries: Vec<wgpu::BindGroupEntry> = buffers
            .iter()
            .enumerate()
            .map(|(binding, buffer)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource: buffer.as_entire_binding(),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: buffers.len() as u32,
            resource: uniforms.as_entire_binding(),
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Backend Particle Bind Group"),
            layout: self.layout(method),
            entries: &entries,
        });

        let arrays = DeviceParticleArrays {
            method,
            particle_count,
            buffers,
            uniforms,
            bind_group,
        };
        (arrays, HostParticleMirror { particles })
    }
}

/// Compute kernels for both array layouts
pub struct WgpuPhysics {
    interleaved: ComputePipeline,
    planar: ComputePipeline,
}

impl WgpuPhysics {
    pub fn new(library: &WgpuLibrary) -> Self {
        Self {
            interleaved: create_pipeline(
                library.device(),
                INTERLEAVED_SHADER,
                "Interleaved Physics",
                library.layout(ComputeMethod::Interleaved),
            ),
            planar: create_pipeline(
                library.device(),
                PLANAR_SHADER,
                "Planar Physics",
                library.layout(ComputeMethod::Planar),
            ),
        }
    }

    fn pipeline(&self, method: ComputeMethod) -> &ComputePipeline {
        match method {
            ComputeMethod::Interleaved => &self.interleaved,
            ComputeMethod::Planar => &self.planar,
        }
    }
}

impl PhysicsModule<WgpuLibrary> for WgpuPhysics {
    type Params = PhysicsParams;

    fn run_particle_physics(
        &self,
        method: ComputeMethod,
        arrays: &mut DeviceParticleArrays,
        params: &PhysicsParams,
        library: &WgpuLibrary,
    ) {
        if arrays.particle_count == 0 {
            return;
        }

        let uniforms = PhysicsUniforms {
            delta_time: params.delta_time,
            gravity: params.gravity,
            speed: params.speed,
            particle_count: arrays.particle_count as u32,
        };
        library
            .queue()
            .write_buffer(&arrays.uniforms, 0, bytemuck::bytes_of(&uniforms));

        let mut encoder = library
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stress Compute Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Stress Compute Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(self.pipeline(method));
            compute_pass.set_bind_group(0, &arrays.bind_group, &[]);
            let (groups_x, groups_y) = dispatch_grid(
                arrays.particle_count,
                library.limits().max_compute_workgroups_per_dimension,
            );
            compute_pass.dispatch_workgroups(groups_x, groups_y, 1);
        }

        library.queue().submit(std::iter::once(encoder.finish()));
    }
}

/// Workgroups needed to cover `particle_count` invocations
pub fn workgroup_count(particle_count: usize) -> u32 {
    (particle_count.min(u32::MAX as usize) as u32).div_ceil(WORKGROUP_SIZE)
}

/// Folds the workgroup count into an `x * y` grid with `x <= max_per_dimension`
///
/// Kernels rebuild the flat index as `id.x + id.y * num_workgroups.x * 64`.
pub fn dispatch_grid(particle_count: usize, max_per_dimension: u32) -> (u32, u32) {
    let groups = workgroup_count(particle_count);
    let max_per_dimension = max_per_dimension.max(1);
    if groups <= max_per_dimension {
        (groups, 1)
    } else {
        (max_per_dimension, groups.div_ceil(max_per_dimension))
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &Device,
    shader_source: &str,
    label: &str,
    bind_group_layout: &BindGroupLayout,
) -> ComputePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        module: &shader,
        entry_point: Some("main"),
        compilation_options: Default::default(),
        cache: None,
    })
}

const INTERLEAVED_SHADER: &str = r#"
struct Particle {
    position: vec2<f32>,
    velocity: vec2<f32>,
    mass: f32,
    _padding: f32,
}

struct Params {
    delta_time: f32,
    gravity: f32,
    speed: f32,
    particle_count: u32,
}

@group(0) @binding(0) var<storage, read_write> particles: array<Particle>;
@group(0) @binding(1) var<uniform> params: Params;

@compute @workgroup_size(64, 1, 1)
fn main(
    @builtin(global_invocation_id) global_id: vec3<u32>,
    @builtin(num_workgroups) num_groups: vec3<u32>,
) {
    let index = global_id.x + global_id.y * num_groups.x * 64u;
    if (index >= params.particle_count) {
        return;
    }

    var p = particles[index];
    let to_center = vec2<f32>(500.0, 400.0) - p.position;
    let dist_sq = max(dot(to_center, to_center), 100.0);
    let pull = to_center / sqrt(dist_sq) * params.gravity * 1000.0 / (dist_sq * p.mass);

    var velocity = p.velocity + pull * params.delta_time;
    let speed = length(velocity);
    if (speed > params.speed) {
        velocity = velocity * (params.speed / speed);
    }

    var position = p.position + velocity * params.delta_time;
    if (position.x < 0.0 || position.x > 1000.0) {
        velocity.x = -velocity.x;
        position.x = clamp(position.x, 0.0, 1000.0);
    }
    if (position.y < 0.0 || position.y > 800.0) {
        velocity.y = -velocity.y;
        position.y = clamp(position.y, 0.0, 800.0);
    }

    p.position = position;
    p.velocity = velocity;
    particles[index] = p;
}
"#;

const PLANAR_SHADER: &str = r#"
struct Params {
    delta_time: f32,
    gravity: f32,
    speed: f32,
    particle_count: u32,
}

@group(0) @binding(0) var<storage, read_write> positions: array<vec2<f32>>;
@group(0) @binding(1) var<storage, read_write> velocities: array<vec2<f32>>;
@group(0) @binding(2) var<storage, read_write> masses: array<f32>;
@group(0) @binding(3) var<uniform> params: Params;

@compute @workgroup_size(64, 1, 1)
fn main(
    @builtin(global_invocation_id) global_id: vec3<u32>,
    @builtin(num_workgroups) num_groups: vec3<u32>,
) {
    let index = global_id.x + global_id.y * num_groups.x * 64u;
    if (index >= params.particle_count) {
        return;
    }

    let to_center = vec2<f32>(500.0, 400.0) - positions[index];
    let dist_sq = max(dot(to_center, to_center), 100.0);
    let pull = to_center / sqrt(dist_sq) * params.gravity * 1000.0 / (dist_sq * masses[index]);

    var velocity = velocities[index] + pull * params.delta_time;
    let speed = length(velocity);
    if (speed > params.speed) {
        velocity = velocity * (params.speed / speed);
    }

    var position = positions[index] + velocity * params.delta_time;
    if (position.x < 0.0 || position.x > 1000.0) {
        velocity.x = -velocity.x;
        position.x = clamp(position.x, 0.0, 1000.0);
    }
    if (position.y < 0.0 || position.y > 800.0) {
        velocity.y = -velocity.y;
        position.y = clamp(position.y, 0.0, 800.0);
    }

    positions[index] = position;
    velocities[index] = velocity;
}
"#;
