//! # Frame Compositor
//!
//! Turns a [`ParticleFrame`] into screen-space draw calls.
//!
//! ## Coordinate system
//!
//! The simulation lives on a fixed virtual canvas of 1000x800 units. Each
//! axis is scaled independently to the window, so the aspect ratio is not
//! preserved:
//!
//! ```text
//! screen_x = world_x * window_width  / 1000
//! screen_y = world_y * window_height / 800
//! ```
//!
//! ## Draw order
//!
//! 1. Clear (optional, see [`FrameCompositor::with_clear`])
//! 2. Influence boundary rings
//! 3. Subtractive trail overlay across the whole canvas
//! 4. Particles, halo first then core
//!
//! Rings are drawn before the fade so they trail; particles are drawn after
//! it so the current frame always stays crisp.

use super::surface::{BlendMode, Color, DrawSurface, Stroke};
use crate::simulation::frame::{InfluenceBoundary, ParticleColor, ParticleFrame, ParticleRecord};
use cgmath::Vector2;

/// Virtual canvas width in world units
pub const CANVAS_WIDTH: f64 = 1000.0;
/// Virtual canvas height in world units
pub const CANVAS_HEIGHT: f64 = 800.0;

/// Particles at or above this mass are drawn as anchors
pub const ANCHOR_MASS: f64 = 1000.0;
pub const ANCHOR_RADIUS: i32 = 36;
pub const PARTICLE_RADIUS: i32 = 8;

pub const BACKGROUND: Color = Color::rgb(5, 5, 15);
pub const TRAIL_OVERLAY: Color = Color::rgba(5, 5, 15, 8);
pub const DEFAULT_PARTICLE_COLOR: Color = Color::rgb(180, 180, 200);

const BOUNDARY_COLOR: Color = Color::rgb(255, 255, 255);
const ANCHOR_RING_COLOR: Color = Color::rgb(200, 200, 200);
const BOUNDARY_MIN_RADIUS: i32 = 10;
const BOUNDARY_SKIP_RADIUS: i32 = 5;

/// World to screen mapping for one window size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ScreenTransform {
    pub fn for_window(width: u32, height: u32) -> Self {
        Self {
            scale_x: width as f64 / CANVAS_WIDTH,
            scale_y: height as f64 / CANVAS_HEIGHT,
        }
    }

    /// Maps a world position to integer pixels (truncating)
    pub fn to_screen(&self, world: Vector2<f64>) -> (i32, i32) {
        ((world.x * self.scale_x) as i32, (world.y * self.scale_y) as i32)
    }

    /// Inverse mapping, used to place spawn requests
    pub fn to_world(&self, screen: (f64, f64)) -> Vector2<f64> {
        let x = if self.scale_x != 0.0 { screen.0 / self.scale_x } else { 0.0 };
        let y = if self.scale_y != 0.0 { screen.1 / self.scale_y } else { 0.0 };
        Vector2::new(x, y)
    }

    /// Uniform scale used for ring radii
    pub fn min_scale(&self) -> f64 {
        self.scale_x.min(self.scale_y)
    }
}

/// Resolved on-screen appearance of one particle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleStyle {
    pub radius: i32,
    pub color: Color,
    pub halo_radius: i32,
    pub halo_color: Color,
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 255.0) as u8
    }
}

/// Two-tier radius: anchors are large, everything else is small
pub fn particle_radius(mass: f64) -> i32 {
    if mass >= ANCHOR_MASS {
        ANCHOR_RADIUS
    } else {
        PARTICLE_RADIUS
    }
}

/// Explicit RGB, then scalar state gradient, then the neutral default
pub fn base_color(color: &ParticleColor) -> Color {
    match *color {
        ParticleColor::Rgb([r, g, b]) => Color::rgb(
            channel(r as f64 * 255.0),
            channel(g as f64 * 255.0),
            channel(b as f64 * 255.0),
        ),
        ParticleColor::State(s) => {
            let s = s as f64;
            Color::rgb(
                channel(180.0 + 75.0 * s),
                channel(180.0 - 180.0 * s),
                channel(200.0 - 200.0 * s),
            )
        }
        ParticleColor::None => DEFAULT_PARTICLE_COLOR,
    }
}

/// Halo radius and color for a base particle at the given glow
///
/// Both are non-decreasing in `glow`.
pub fn halo(base: Color, base_radius: i32, glow: f32) -> (i32, Color) {
    let glow = if glow.is_nan() { 0.0 } else { glow.clamp(0.0, 1.0) as f64 };

    let brighten = |c: u8| channel(c as f64 * 1.3);
    let intensity = 0.8 + 0.4 * glow;
    let scale = |c: u8| channel(brighten(c) as f64 * intensity);

    let radius = base_radius + (3.0 + 5.0 * glow) as i32;
    (radius, Color::rgb(scale(base.r), scale(base.g), scale(base.b)))
}

pub fn particle_style(particle: &ParticleRecord) -> ParticleStyle {
    let radius = particle_radius(particle.mass);
    let color = base_color(&particle.color);
    let (halo_radius, halo_color) = halo(color, radius, particle.glow);
    ParticleStyle {
        radius,
        color,
        halo_radius,
        halo_color,
    }
}

/// Screen radius of a boundary ring, `None` when too small to draw
pub fn boundary_ring_radius(radius: f64, transform: &ScreenTransform) -> Option<i32> {
    let scaled = (radius * transform.min_scale()) as i32;
    let ring = scaled.max(BOUNDARY_MIN_RADIUS);
    (ring > BOUNDARY_SKIP_RADIUS).then_some(ring)
}

/// Draws the scene portion of a frame (no UI, no present)
#[derive(Clone, Debug)]
pub struct FrameCompositor {
    clear_each_frame: bool,
}

impl Default for FrameCompositor {
    fn default() -> Self {
        Self {
            clear_each_frame: true,
        }
    }
}

impl FrameCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// With clearing disabled the trail overlay fades the previous frame
    /// instead of a freshly cleared one, leaving visible motion trails.
    pub fn with_clear(mut self, clear_each_frame: bool) -> Self {
        self.clear_each_frame = clear_each_frame;
        self
    }

    /// Draws boundaries, trail and up to `max_particles` particles.
    ///
    /// Returns the number of particles actually drawn.
    pub fn compose<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        transform: &ScreenTransform,
        particles: &ParticleFrame,
        influence_boundaries: &[InfluenceBoundary],
        max_particles: usize,
    ) -> usize {
        if self.clear_each_frame {
            surface.clear(BACKGROUND);
        }

        self.draw_boundaries(surface, transform, influence_boundaries);
        surface.blend_fill(TRAIL_OVERLAY, BlendMode::Subtract);

        let mut rendered = 0;
        for particle in particles.iter().take(max_particles) {
            let center = transform.to_screen(particle.position);
            let style = particle_style(particle);
            surface.draw_circle(center, style.halo_radius, style.halo_color, Stroke::Fill);
            surface.draw_circle(center, style.radius, style.color, Stroke::Fill);
            rendered += 1;
        }
        rendered
    }

    fn draw_boundaries<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        transform: &ScreenTransform,
        influence_boundaries: &[InfluenceBoundary],
    ) {
        let anchor_ring = (ANCHOR_RADIUS as f64 * transform.min_scale()) as i32;
        for boundary in influence_boundaries {
            let center = transform.to_screen(boundary.center);
            if let Some(radius) = boundary_ring_radius(boundary.radius, transform) {
                surface.draw_circle(center, radius, BOUNDARY_COLOR, Stroke::Outline(3));
            }
            surface.draw_circle(center, anchor_ring, ANCHOR_RING_COLOR, Stroke::Outline(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::draw_list::{DrawCommand, DrawList};

    #[test]
    fn test_canvas_center_maps_to_window_center() {
        let transform = ScreenTransform::for_window(1600, 1000);
        assert_eq!(transform.to_screen(Vector2::new(500.0, 400.0)), (800, 500));
        assert_eq!(transform.to_screen(Vector2::new(0.0, 0.0)), (0, 0));
        assert_eq!(transform.to_screen(Vector2::new(1000.0, 800.0)), (1600, 1000));
    }

    #[test]
    fn test_scaling_is_non_uniform() {
        let transform = ScreenTransform::for_window(1600, 1000);
        assert_eq!(transform.scale_x, 1.6);
        assert_eq!(transform.scale_y, 1.25);
        assert_eq!(transform.min_scale(), 1.25);
    }

    #[test]
    fn test_inverse_mapping() {
        let transform = ScreenTransform::for_window(1600, 1000);
        let world = transform.to_world((800.0, 500.0));
        assert!((world.x - 500.0).abs() < 1e-9);
        assert!((world.y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_tier_radius() {
        assert_eq!(particle_radius(1000.0), 36);
        assert_eq!(particle_radius(5000.0), 36);
        assert_eq!(particle_radius(999.9), 8);
        assert_eq!(particle_radius(1.0), 8);
    }

    #[test]
    fn test_color_priority() {
        assert_eq!(base_color(&ParticleColor::Rgb([1.0, 0.5, 0.0])), Color::rgb(255, 127, 0));
        assert_eq!(base_color(&ParticleColor::State(0.0)), Color::rgb(180, 180, 200));
        assert_eq!(base_color(&ParticleColor::State(1.0)), Color::rgb(255, 0, 0));
        assert_eq!(base_color(&ParticleColor::State(0.5)), Color::rgb(217, 90, 100));
        assert_eq!(base_color(&ParticleColor::None), DEFAULT_PARTICLE_COLOR);
    }

    #[test]
    fn test_halo_values() {
        let (radius, color) = halo(Color::rgb(100, 100, 100), 8, 0.0);
        assert_eq!(radius, 11);
        assert_eq!(color, Color::rgb(104, 104, 104));

        let (radius, color) = halo(Color::rgb(100, 200, 10), 8, 1.0);
        assert_eq!(radius, 16);
        assert_eq!(color, Color::rgb(156, 255, 15));
    }

    #[test]
    fn test_halo_monotonic_in_glow() {
        for base in [Color::rgb(180, 180, 200), Color::rgb(255, 0, 0), Color::rgb(13, 77, 140)] {
            for radius in [PARTICLE_RADIUS, ANCHOR_RADIUS] {
                let mut previous = halo(base, radius, 0.0);
                for step in 1..=100 {
                    let current = halo(base, radius, step as f32 / 100.0);
                    assert!(current.0 >= previous.0);
                    assert!(current.1.r >= previous.1.r);
                    assert!(current.1.g >= previous.1.g);
                    assert!(current.1.b >= previous.1.b);
                    previous = current;
                }
            }
        }
    }

    #[test]
    fn test_boundary_ring_radius() {
        let transform = ScreenTransform::for_window(1600, 1000);
        assert_eq!(boundary_ring_radius(100.0, &transform), Some(125));
        // Floors to 10px, which is always above the skip threshold.
        assert_eq!(boundary_ring_radius(1.0, &transform), Some(10));
        assert_eq!(boundary_ring_radius(0.0, &transform), Some(10));
    }

    #[test]
    fn test_compose_order() {
        let mut list = DrawList::new(1600, 1000);
        let transform = ScreenTransform::for_window(1600, 1000);
        let frame = ParticleFrame::new(vec![
            ParticleRecord::new(500.0, 400.0, 2000.0).with_glow(1.0),
            ParticleRecord::new(100.0, 80.0, 1.0),
        ]);
        let boundaries = [InfluenceBoundary::new(500.0, 400.0, 100.0)];

        let rendered = FrameCompositor::new().compose(&mut list, &transform, &frame, &boundaries, 2000);
        assert_eq!(rendered, 2);

        let commands = list.commands();
        assert_eq!(commands[0], DrawCommand::Clear(BACKGROUND));
        assert!(matches!(
            commands[1],
            DrawCommand::Circle { center: (800, 500), radius: 125, stroke: Stroke::Outline(3), .. }
        ));
        assert!(matches!(
            commands[2],
            DrawCommand::Circle { radius: 45, stroke: Stroke::Outline(1), .. }
        ));
        assert_eq!(
            commands[3],
            DrawCommand::Blend {
                color: TRAIL_OVERLAY,
                mode: BlendMode::Subtract
            }
        );
        // Halo before core for every particle.
        assert!(matches!(commands[4], DrawCommand::Circle { radius: 44, .. }));
        assert!(matches!(commands[5], DrawCommand::Circle { radius: 36, .. }));
        assert!(matches!(commands[6], DrawCommand::Circle { center: (160, 100), radius: 11, .. }));
        assert!(matches!(commands[7], DrawCommand::Circle { center: (160, 100), radius: 8, .. }));
        assert_eq!(commands.len(), 8);
    }

    #[test]
    fn test_compose_respects_render_cap() {
        let mut list = DrawList::new(1000, 800);
        let transform = ScreenTransform::for_window(1000, 800);
        let frame: ParticleFrame = (0..10)
            .map(|i| ParticleRecord::new(i as f64, i as f64, 1.0))
            .collect();

        let rendered = FrameCompositor::new()
            .with_clear(false)
            .compose(&mut list, &transform, &frame, &[], 3);

        assert_eq!(rendered, 3);
        // No clear: trail overlay first, then 3 halo/core pairs.
        assert!(matches!(list.commands()[0], DrawCommand::Blend { .. }));
        assert_eq!(list.commands().len(), 7);
    }
}
