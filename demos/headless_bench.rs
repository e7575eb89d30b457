//! # Headless Benchmark
//!
//! Drives the visualizer into a recording surface and, when a GPU adapter is
//! available, runs the backend stress multiplier alongside it.
//!
//! ```text
//! RUST_LOG=info cargo run --example headless_bench -- 25
//! ```
//!
//! The optional argument is the backend multiplier (clamped to 1..=100).

use anyhow::Context;
use log::{info, warn};
use particle_viz::prelude::*;
use particle_viz::ui::panel::{GRAVITY, SMALL_BALL_SPEED};
use rand::Rng;

const TICKS: usize = 240;
const PARTICLES: usize = 5000;
const DELTA_TIME: f32 = 1.0 / 60.0;

fn random_frame<R: Rng>(rng: &mut R, count: usize) -> ParticleFrame {
    (0..count)
        .map(|i| {
            let mass = if i < 3 { 1000.0 } else { rng.random_range(1.0..10.0) };
            ParticleRecord::new(rng.random_range(0.0..1000.0), rng.random_range(0.0..800.0), mass)
                .with_color(ParticleColor::State(rng.random_range(0.0..1.0)))
                .with_glow(rng.random_range(0.0..1.0))
        })
        .collect()
}

fn jitter<R: Rng>(rng: &mut R, frame: &ParticleFrame, speed: f64) -> ParticleFrame {
    let step = speed * DELTA_TIME as f64;
    frame
        .iter()
        .map(|particle| {
            let mut moved = particle.clone();
            moved.position.x = (moved.position.x + rng.random_range(-step..=step)).clamp(0.0, 1000.0);
            moved.position.y = (moved.position.y + rng.random_range(-step..=step)).clamp(0.0, 800.0);
            moved
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let multiplier = match std::env::args().nth(1) {
        Some(raw) => raw
            .parse::<i64>()
            .with_context(|| format!("multiplier must be an integer, got '{}'", raw))?,
        None => 10,
    };

    let config = VisualizerConfig::from_env();
    let (width, height) = config.window_size;
    let mut viz = ParticleVisualizer::new(config, Some(DrawList::new(width, height)));
    let mut rng = rand::rng();
    let mut frame = random_frame(&mut rng, PARTICLES);

    let mut stress = match WgpuLibrary::request() {
        Ok(library) => {
            let physics = WgpuPhysics::new(&library);
            let mut manager = BackendStressManager::new();
            manager.initialize(ComputeMethod::Interleaved.as_str(), library, PARTICLES, multiplier);
            viz.set_backend_multiplier(manager.multiplier());
            Some((manager, physics))
        }
        Err(err) => {
            warn!("Running without backend stress: {}", err);
            None
        }
    };

    let mut timer = FrameTimer::new();
    let started = std::time::Instant::now();

    for tick in 0..TICKS {
        timer.begin_frame();

        let values = viz.slider_values();
        let gravity = values.slider(GRAVITY).unwrap_or(500.0);
        let speed = values.slider(SMALL_BALL_SPEED).unwrap_or(300.0);

        if let Some((manager, physics)) = stress.as_mut() {
            let params = PhysicsParams::new(DELTA_TIME, gravity as f32, speed as f32);
            if let Some(library) = manager.library().cloned() {
                manager.run_physics(&*physics, &params, &library);
            }
        }

        frame = jitter(&mut rng, &frame, speed);
        let boundaries: Vec<InfluenceBoundary> = frame
            .iter()
            .filter(|particle| particle.mass >= 1000.0)
            .map(|anchor| InfluenceBoundary::new(anchor.position.x, anchor.position.y, 120.0))
            .collect();

        let active = frame.len().min(values.max_balls_cap);
        viz.render_frame(
            &frame,
            &boundaries,
            frame.len(),
            active,
            timer.fps(),
            0.0,
            started.elapsed().as_secs_f64(),
        );

        let commands = viz
            .surface_mut()
            .map(|surface| surface.take_commands().len())
            .unwrap_or(0);
        timer.end_frame();

        if tick % 60 == 0 {
            if let Some(stats) = viz.last_stats() {
                info!(
                    "tick {:>3}: {} | {} draw commands",
                    tick,
                    stats.lines().join(" | "),
                    commands
                );
            }
        }
    }

    let total = stress
        .as_ref()
        .map(|(manager, _)| manager.total_simulated_particles())
        .unwrap_or(PARTICLES);
    info!(
        "Finished {} ticks, avg frame {:?}, {} particles simulated per tick",
        TICKS,
        timer.average_frame_time().unwrap_or_default(),
        total
    );

    Ok(())
}
