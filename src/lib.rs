// src/lib.rs
//! Particle Visualizer
//!
//! Real-time 2D view of a particle simulation with an interactive control
//! panel, plus a backend stress multiplier that duplicates GPU workloads.

pub mod config;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod prelude;
pub mod simulation;
pub mod ui;
pub mod visualizer;

// Re-export main types for convenience
pub use config::VisualizerConfig;
pub use error::ComputeError;
pub use visualizer::{create_visualizer, ParticleVisualizer};
