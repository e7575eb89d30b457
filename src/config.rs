//! Visualizer configuration
//!
//! Window size and the on-screen particle cap are supplied by the caller.
//! Anything missing or malformed falls back to the defaults below.

use log::warn;

/// Default window size used when the caller supplies none
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1600, 1000);

/// Default maximum number of particles drawn per frame
pub const DEFAULT_MAX_RENDER_PARTICLES: usize = 2000;

const WINDOW_ENV: &str = "PARTICLE_VIZ_WINDOW";
const MAX_RENDER_ENV: &str = "PARTICLE_VIZ_MAX_RENDER";

/// Shared configuration for the renderer and the control panel
#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerConfig {
    pub window_size: (u32, u32),
    pub max_render_particles: usize,
    pub title: String,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            max_render_particles: DEFAULT_MAX_RENDER_PARTICLES,
            title: "GPU Particle Simulation - Benchmark Visualization".to_string(),
        }
    }
}

impl VisualizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_max_render_particles(mut self, max: usize) -> Self {
        self.max_render_particles = max;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builds a config from `PARTICLE_VIZ_WINDOW` ("WxH") and
    /// `PARTICLE_VIZ_MAX_RENDER`, keeping defaults for unset or bad values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(WINDOW_ENV) {
            match parse_window_size(&raw) {
                Some(size) => config.window_size = size,
                None => warn!(
                    "Ignoring {}='{}', using {}x{}",
                    WINDOW_ENV, raw, DEFAULT_WINDOW_SIZE.0, DEFAULT_WINDOW_SIZE.1
                ),
            }
        }

        if let Some(raw) = lookup(MAX_RENDER_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(max) => config.max_render_particles = max,
                Err(_) => warn!(
                    "Ignoring {}='{}', using {}",
                    MAX_RENDER_ENV, raw, DEFAULT_MAX_RENDER_PARTICLES
                ),
            }
        }

        config
    }
}

fn parse_window_size(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    let width = w.trim().parse::<u32>().ok()?;
    let height = h.trim().parse::<u32>().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VisualizerConfig::default();
        assert_eq!(config.window_size, (1600, 1000));
        assert_eq!(config.max_render_particles, 2000);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = VisualizerConfig::from_lookup(|key| match key {
            WINDOW_ENV => Some("1280x720".to_string()),
            MAX_RENDER_ENV => Some("500".to_string()),
            _ => None,
        });
        assert_eq!(config.window_size, (1280, 720));
        assert_eq!(config.max_render_particles, 500);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = VisualizerConfig::from_lookup(|key| match key {
            WINDOW_ENV => Some("wide".to_string()),
            MAX_RENDER_ENV => Some("-3".to_string()),
            _ => None,
        });
        assert_eq!(config, VisualizerConfig::default());
        assert_eq!(parse_window_size("0x100"), None);
    }
}
