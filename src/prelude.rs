//! # Particle Visualizer Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use particle_viz::prelude::*;
//!
//! let mut viz = ParticleVisualizer::new(VisualizerConfig::default(), Some(DrawList::new(1600, 1000)));
//! let frame: ParticleFrame = vec![ParticleRecord::new(500.0, 400.0, 1.0)].into_iter().collect();
//! viz.render_frame(&frame, &[], 1, 1, 60.0, 0.0, 0.0);
//! ```

// Re-export core visualizer types
pub use crate::config::VisualizerConfig;
pub use crate::error::ComputeError;
pub use crate::visualizer::{create_visualizer, ParticleVisualizer};

// Re-export graphics types
pub use crate::gfx::{Color, DrawList, DrawSurface, DrawSurfaceExt, FrameCompositor};

// Re-export simulation framework
pub use crate::simulation::{
    BackendStressManager, ComputeLibrary, ComputeMethod, InfluenceBoundary, ParticleColor,
    ParticleFrame, ParticleRecord, PhysicsModule, PhysicsParams, WgpuLibrary, WgpuPhysics,
};

// Re-export UI types
pub use crate::ui::{ControlPanel, ControlValues, KeyInput, PointerButton, PointerEvent, SpawnRequest};

// Re-export performance monitoring
pub use crate::performance::{FrameTimer, StatsSnapshot};

// Re-export common external dependencies
pub use cgmath::Vector2;
