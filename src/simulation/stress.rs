//! Backend stress multiplier
//!
//! Emulates N times the GPU compute load without drawing N times the
//! particles. The primary arrays count as 1x, so a multiplier of N keeps
//! N-1 duplicate array sets alive and runs the physics kernel on each of them
//! every tick. What ends up on screen is unaffected.
//!
//! Every multiplier change throws the whole duplicate set away and allocates
//! a fresh one. Handles from a previous set are never reused.

use super::traits::{ComputeLibrary, ComputeMethod, PhysicsModule};
use log::{debug, info, warn};

/// Lowest accepted multiplier (no duplicates)
pub const MIN_MULTIPLIER: u32 = 1;
/// Highest accepted multiplier
pub const MAX_MULTIPLIER: u32 = 100;

/// Clamps a requested multiplier into `[MIN_MULTIPLIER, MAX_MULTIPLIER]`
pub fn clamp_multiplier(requested: i64) -> u32 {
    requested.clamp(MIN_MULTIPLIER as i64, MAX_MULTIPLIER as i64) as u32
}

/// Owns the duplicate backend array sets and dispatches work against them
pub struct BackendStressManager<L: ComputeLibrary> {
    backend_arrays: Vec<L::Arrays>,
    multiplier: u32,
    method_name: Option<String>,
    method: Option<ComputeMethod>,
    library: Option<L>,
    particle_count: usize,
}

impl<L: ComputeLibrary> BackendStressManager<L> {
    pub fn new() -> Self {
        Self {
            backend_arrays: Vec::new(),
            multiplier: MIN_MULTIPLIER,
            method_name: None,
            method: None,
            library: None,
            particle_count: 0,
        }
    }

    /// Configures the backend and allocates `multiplier - 1` duplicates
    ///
    /// An unrecognized `method` is not an error: every allocation is skipped
    /// and the duplicate list stays empty.
    pub fn initialize(&mut self, method: &str, library: L, particle_count: usize, multiplier: i64) {
        self.method_name = Some(method.to_string());
        self.method = method.parse().ok();
        self.library = Some(library);
        self.particle_count = particle_count;
        self.multiplier = clamp_multiplier(multiplier);

        self.rebuild();

        if self.multiplier > 1 {
            info!(
                "[Backend Stress] Initialized {}x multiplier ({} total particles on GPU, {} duplicate sets)",
                self.multiplier,
                self.total_simulated_particles(),
                self.backend_arrays.len()
            );
        }
    }

    /// Clamps the new multiplier, then tears down and rebuilds every duplicate
    ///
    /// Before [`initialize`](Self::initialize) this only records the value.
    pub fn update_multiplier(&mut self, new_multiplier: i64, particle_count: usize) {
        let old_multiplier = self.multiplier;
        self.multiplier = clamp_multiplier(new_multiplier);
        self.particle_count = particle_count;

        self.rebuild();

        if self.multiplier > 1 && self.library.is_some() {
            info!(
                "[Backend Stress] Updated multiplier: {}x -> {}x ({} total particles)",
                old_multiplier,
                self.multiplier,
                self.total_simulated_particles()
            );
        }
    }

    fn rebuild(&mut self) {
        // Old handles are dropped before anything new is allocated.
        self.backend_arrays.clear();

        let Some(library) = &self.library else {
            return;
        };
        if self.multiplier <= 1 {
            return;
        }

        let duplicates = (self.multiplier - 1) as usize;
        match self.method {
            Some(method) => {
                self.backend_arrays.reserve(duplicates);
                for _ in 0..duplicates {
                    let (arrays, _mirror) = library.setup_arrays(method, self.particle_count);
                    self.backend_arrays.push(arrays);
                }
                debug!(
                    "[Backend Stress] Allocated {} {} array sets of {} particles",
                    duplicates, method, self.particle_count
                );
            }
            None => {
                warn!(
                    "[Backend Stress] Unrecognized method '{}', skipped {} duplicate allocations",
                    self.method_name.as_deref().unwrap_or(""),
                    duplicates
                );
            }
        }
    }

    /// Dispatches the kernel once per duplicate, in list order
    pub fn run_physics<P>(&mut self, physics_module: &P, params: &P::Params, library: &L)
    where
        P: PhysicsModule<L>,
    {
        let Some(method) = self.method else {
            return;
        };
        for arrays in self.backend_arrays.iter_mut() {
            physics_module.run_particle_physics(method, arrays, params, library);
        }
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Number of live duplicate sets; `multiplier - 1` unless allocations were skipped
    pub fn array_count(&self) -> usize {
        self.backend_arrays.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.library.is_some()
    }

    pub fn method(&self) -> Option<ComputeMethod> {
        self.method
    }

    pub fn library(&self) -> Option<&L> {
        self.library.as_ref()
    }

    /// Particles the backend is simulating across primary and duplicate arrays
    pub fn total_simulated_particles(&self) -> usize {
        self.multiplier as usize * self.particle_count
    }
}

impl<L: ComputeLibrary> Default for BackendStressManager<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct TrackedArrays {
        id: usize,
        len: usize,
        steps: u32,
        drops: Rc<Cell<usize>>,
    }

    impl Drop for TrackedArrays {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[derive(Default)]
    struct CountingLibrary {
        allocations: Cell<usize>,
        drops: Rc<Cell<usize>>,
    }

    impl ComputeLibrary for CountingLibrary {
        type Arrays = TrackedArrays;
        type Mirror = Vec<f32>;

        fn setup_arrays(&self, _method: ComputeMethod, particle_count: usize) -> (TrackedArrays, Vec<f32>) {
            let id = self.allocations.get();
            self.allocations.set(id + 1);
            let arrays = TrackedArrays {
                id,
                len: particle_count,
                steps: 0,
                drops: self.drops.clone(),
            };
            (arrays, vec![0.0; particle_count])
        }
    }

    #[derive(Default)]
    struct RecordingKernel {
        dispatched: RefCell<Vec<(ComputeMethod, usize)>>,
    }

    impl PhysicsModule<CountingLibrary> for RecordingKernel {
        type Params = f32;

        fn run_particle_physics(
            &self,
            method: ComputeMethod,
            arrays: &mut TrackedArrays,
            _params: &f32,
            _library: &CountingLibrary,
        ) {
            arrays.steps += 1;
            self.dispatched.borrow_mut().push((method, arrays.id));
        }
    }

    fn initialized(method: &str, count: usize, multiplier: i64) -> BackendStressManager<CountingLibrary> {
        let mut manager = BackendStressManager::new();
        manager.initialize(method, CountingLibrary::default(), count, multiplier);
        manager
    }

    #[test]
    fn test_multiplier_is_clamped() {
        let mut manager = initialized("interleaved", 10, 1);
        manager.update_multiplier(150, 10);
        assert_eq!(manager.multiplier(), 100);
        assert_eq!(manager.array_count(), 99);

        manager.update_multiplier(0, 10);
        assert_eq!(manager.multiplier(), 1);
        assert_eq!(manager.array_count(), 0);

        manager.update_multiplier(-7, 10);
        assert_eq!(manager.multiplier(), 1);
    }

    #[test]
    fn test_initialize_clamps_too() {
        let manager = initialized("planar", 10, 500);
        assert_eq!(manager.multiplier(), MAX_MULTIPLIER);
        assert_eq!(manager.array_count(), 99);
    }

    #[test]
    fn test_recognized_method_allocates_all_duplicates() {
        let mut manager = initialized("planar", 1000, 1);
        manager.update_multiplier(5, 1000);
        assert_eq!(manager.array_count(), 4);
        assert!(manager.backend_arrays.iter().all(|a| a.len == 1000));
        assert_eq!(manager.total_simulated_particles(), 5000);
    }

    #[test]
    fn test_multiplier_one_has_no_overhead() {
        let manager = initialized("interleaved", 1000, 1);
        assert_eq!(manager.array_count(), 0);
        assert_eq!(manager.library().map(|l| l.allocations.get()), Some(0));
    }

    #[test]
    fn test_unrecognized_method_skips_allocation() {
        let mut manager = initialized("cupy", 1000, 5);
        assert!(manager.is_initialized());
        assert_eq!(manager.method(), None);
        assert_eq!(manager.multiplier(), 5);
        assert_eq!(manager.array_count(), 0);

        manager.update_multiplier(8, 1000);
        assert_eq!(manager.array_count(), 0);
    }

    #[test]
    fn test_update_before_initialize_only_records() {
        let mut manager: BackendStressManager<CountingLibrary> = BackendStressManager::new();
        manager.update_multiplier(12, 100);
        assert!(!manager.is_initialized());
        assert_eq!(manager.multiplier(), 12);
        assert_eq!(manager.array_count(), 0);
    }

    #[test]
    fn test_update_rebuilds_from_scratch() {
        let mut manager = initialized("interleaved", 64, 4);
        let drops = manager.library().map(|l| l.drops.clone()).unwrap();
        assert_eq!(manager.array_count(), 3);

        manager.update_multiplier(3, 128);
        // All three previous sets are gone, two fresh ones replace them.
        assert_eq!(drops.get(), 3);
        let ids: Vec<usize> = manager.backend_arrays.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(manager.backend_arrays.iter().all(|a| a.len == 128 && a.steps == 0));
    }

    #[test]
    fn test_run_physics_dispatches_each_duplicate_in_order() {
        let library = CountingLibrary::default();
        let kernel = RecordingKernel::default();
        let mut manager = initialized("planar", 32, 4);

        manager.run_physics(&kernel, &0.016, &library);
        manager.run_physics(&kernel, &0.016, &library);

        let dispatched = kernel.dispatched.borrow();
        assert_eq!(dispatched.len(), 6);
        assert_eq!(
            dispatched[..3],
            [
                (ComputeMethod::Planar, 0),
                (ComputeMethod::Planar, 1),
                (ComputeMethod::Planar, 2)
            ]
        );
        assert!(manager.backend_arrays.iter().all(|a| a.steps == 2));
    }

    #[test]
    fn test_run_physics_without_duplicates_is_noop() {
        let library = CountingLibrary::default();
        let kernel = RecordingKernel::default();

        let mut empty: BackendStressManager<CountingLibrary> = BackendStressManager::new();
        empty.run_physics(&kernel, &0.016, &library);

        let mut single = initialized("interleaved", 32, 1);
        single.run_physics(&kernel, &0.016, &library);

        assert!(kernel.dispatched.borrow().is_empty());
    }
}
