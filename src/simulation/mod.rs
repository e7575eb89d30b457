// src/simulation/mod.rs
//! Simulation system
//!
//! Frame data exchanged with the visualizer, the compute contracts a backend
//! implements, the wgpu backend itself, and the stress multiplier that
//! duplicates backend workloads.

pub mod frame;
pub mod gpu;
pub mod stress;
pub mod traits;

pub use frame::{InfluenceBoundary, ParticleColor, ParticleFrame, ParticleRecord};
pub use gpu::{PhysicsParams, WgpuLibrary, WgpuPhysics};
pub use stress::BackendStressManager;
pub use traits::{ComputeLibrary, ComputeMethod, PhysicsModule};
