//! Compute backend contracts
//!
//! The stress multiplier never allocates or dispatches on its own. It asks a
//! [`ComputeLibrary`] for array sets and hands them to a [`PhysicsModule`].
//! Both are keyed by [`ComputeMethod`], which selects the array layout and
//! the matching kernel.

use crate::error::ComputeError;
use std::fmt;
use std::str::FromStr;

/// Known backend array layouts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComputeMethod {
    /// One storage buffer of packed particle records
    Interleaved,
    /// Separate position, velocity and mass buffers
    Planar,
}

impl ComputeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeMethod::Interleaved => "interleaved",
            ComputeMethod::Planar => "planar",
        }
    }
}

impl fmt::Display for ComputeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputeMethod {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interleaved" => Ok(ComputeMethod::Interleaved),
            "planar" => Ok(ComputeMethod::Planar),
            other => Err(ComputeError::UnknownMethod(other.to_string())),
        }
    }
}

/// Array allocator for one compute library
///
/// Called once per required duplicate. Returns the device-resident arrays
/// and the host-side mirror they were seeded from.
pub trait ComputeLibrary {
    /// Opaque device-resident array set
    type Arrays;
    /// Host copy of the initial particle state
    type Mirror;

    fn setup_arrays(&self, method: ComputeMethod, particle_count: usize)
        -> (Self::Arrays, Self::Mirror);
}

/// Physics kernel able to advance arrays produced by `L`
///
/// Dispatch is side-effecting and fire-and-forget; nothing is returned and
/// implementations must not wait for device completion.
pub trait PhysicsModule<L: ComputeLibrary> {
    type Params;

    fn run_particle_physics(
        &self,
        method: ComputeMethod,
        arrays: &mut L::Arrays,
        params: &Self::Params,
        library: &L,
    );
}
