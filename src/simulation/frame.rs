//! Particle snapshots handed to the renderer
//!
//! The driver produces one [`ParticleFrame`] per tick; the visualizer only
//! ever borrows it.

use cgmath::Vector2;

/// Per-particle color as produced by the physics driver
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ParticleColor {
    /// Explicit color, channels in `[0, 1]`
    Rgb([f32; 3]),
    /// Scalar state in `[0, 1]`, mapped onto a fixed gradient at draw time
    State(f32),
    /// No color information, drawn with the neutral default
    #[default]
    None,
}

/// Single particle in world space (virtual 1000x800 canvas)
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleRecord {
    pub position: Vector2<f64>,
    pub mass: f64,
    pub color: ParticleColor,
    /// Glow intensity in `[0, 1]`
    pub glow: f32,
}

impl ParticleRecord {
    pub fn new(x: f64, y: f64, mass: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            mass,
            color: ParticleColor::None,
            glow: 0.0,
        }
    }

    pub fn with_color(mut self, color: ParticleColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_glow(mut self, glow: f32) -> Self {
        self.glow = glow;
        self
    }
}

/// Immutable, ordered snapshot of all particles for one tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleFrame {
    particles: Vec<ParticleRecord>,
}

impl ParticleFrame {
    pub fn new(particles: Vec<ParticleRecord>) -> Self {
        Self { particles }
    }

    pub fn particles(&self) -> &[ParticleRecord] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParticleRecord> {
        self.particles.iter()
    }
}

impl FromIterator<ParticleRecord> for ParticleFrame {
    fn from_iter<I: IntoIterator<Item = ParticleRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Circular region of effect around a simulation anchor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfluenceBoundary {
    pub center: Vector2<f64>,
    pub radius: f64,
}

impl InfluenceBoundary {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: Vector2::new(x, y),
            radius,
        }
    }
}
