//! Particle visualizer
//!
//! Owns the draw surface, the frame compositor and the control panel, and
//! produces one complete frame per [`ParticleVisualizer::render_frame`] call.
//! Without a surface every call is a no-op, so a headless simulation can keep
//! the same driver loop.

use crate::config::VisualizerConfig;
use crate::gfx::compositor::{FrameCompositor, ScreenTransform};
use crate::gfx::surface::DrawSurface;
use crate::performance::StatsSnapshot;
use crate::simulation::frame::{InfluenceBoundary, ParticleFrame};
use crate::ui::draw::{draw_panel, draw_stats};
use crate::ui::input::{InputEvent, InputTranslator, KeyInput, PointerEvent};
use crate::ui::panel::{ControlPanel, ControlValues, SpawnRequest};
use log::{debug, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

pub struct ParticleVisualizer<S: DrawSurface> {
    config: VisualizerConfig,
    surface: Option<S>,
    compositor: FrameCompositor,
    panel: ControlPanel,
    translator: InputTranslator,
    backend_multiplier: u32,
    last_stats: Option<StatsSnapshot>,
}

impl<S: DrawSurface> ParticleVisualizer<S> {
    /// Creates a visualizer; `None` for the surface puts it in the disabled state
    pub fn new(config: VisualizerConfig, surface: Option<S>) -> Self {
        let window_size = match &surface {
            Some(surface) => {
                info!("Visualizer '{}' ready at {:?}", config.title, surface.size());
                surface.size()
            }
            None => {
                warn!("No display surface available, visualization disabled");
                config.window_size
            }
        };

        Self {
            panel: ControlPanel::new(window_size),
            compositor: FrameCompositor::new(),
            translator: InputTranslator::new(),
            backend_multiplier: 1,
            last_stats: None,
            config,
            surface,
        }
    }

    pub fn with_compositor(mut self, compositor: FrameCompositor) -> Self {
        self.compositor = compositor;
        self
    }

    pub fn is_available(&self) -> bool {
        self.surface.is_some()
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Draws one frame: scene, stats panel, widgets, then presents.
    #[allow(clippy::too_many_arguments)]
    pub fn render_frame(
        &mut self,
        particles: &ParticleFrame,
        influence_boundaries: &[InfluenceBoundary],
        total_count: usize,
        active_count: usize,
        fps: f64,
        gpu_util: f64,
        elapsed_time: f64,
    ) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let (width, height) = surface.size();
        // Spawn mapping and widget layout follow whatever size we draw at.
        if self.panel.window_size() != (width, height) {
            self.panel.layout((width, height));
        }
        let transform = ScreenTransform::for_window(width, height);
        let rendered = self.compositor.compose(
            surface,
            &transform,
            particles,
            influence_boundaries,
            self.config.max_render_particles,
        );

        let stats = StatsSnapshot {
            total: total_count,
            active: active_count,
            rendered,
            backend_multiplier: self.backend_multiplier,
            fps,
            gpu_util,
            elapsed: elapsed_time,
        };
        draw_stats(surface, &stats);
        draw_panel(surface, &self.panel);
        surface.present();

        self.last_stats = Some(stats);
    }

    /// Stats shown in the most recently rendered frame
    pub fn last_stats(&self) -> Option<&StatsSnapshot> {
        self.last_stats.as_ref()
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.is_available() && self.panel.handle_pointer(event)
    }

    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        self.is_available() && self.panel.handle_key(key)
    }

    /// Routes a winit event; returns whether the panel consumed it
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        if !self.is_available() {
            return false;
        }

        match event {
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.resize(*width, *height);
                false
            }
            WindowEvent::CloseRequested => {
                self.close();
                false
            }
            _ => {
                let mut consumed = false;
                for input in self.translator.translate(event) {
                    consumed |= match input {
                        InputEvent::Pointer(pointer) => self.panel.handle_pointer(pointer),
                        InputEvent::Key(key) => self.panel.handle_key(key),
                    };
                }
                consumed
            }
        }
    }

    /// Current control values; reads through even when disabled
    pub fn slider_values(&mut self) -> ControlValues {
        self.panel.slider_values()
    }

    pub fn split_enabled(&self) -> bool {
        self.panel.split_enabled()
    }

    pub fn max_balls_cap_text(&self) -> &str {
        self.panel.max_balls_cap_text()
    }

    pub fn take_spawn_requests(&mut self) -> Vec<SpawnRequest> {
        self.panel.take_spawn_requests()
    }

    /// Multiplier reported in the stats panel
    pub fn set_backend_multiplier(&mut self, multiplier: u32) {
        self.backend_multiplier = multiplier.max(1);
    }

    pub fn backend_multiplier(&self) -> u32 {
        self.backend_multiplier
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        debug!("Visualizer resized to {}x{}", width, height);
        self.config.window_size = (width, height);
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
        self.panel.layout((width, height));
    }

    /// Drops the surface; later calls become no-ops
    pub fn close(&mut self) {
        if self.surface.take().is_some() {
            info!("Visualizer closed");
        }
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ControlPanel {
        &mut self.panel
    }
}

/// Builds a visualizer only when visualization is enabled
pub fn create_visualizer<S: DrawSurface>(
    enabled: bool,
    config: VisualizerConfig,
    surface: Option<S>,
) -> Option<ParticleVisualizer<S>> {
    if !enabled {
        info!("Visualization disabled");
        return None;
    }
    Some(ParticleVisualizer::new(config, surface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::draw_list::{DrawCommand, DrawList};
    use crate::gfx::surface::BlendMode;
    use crate::simulation::frame::ParticleRecord;
    use crate::ui::input::PointerButton;
    use winit::event::{DeviceId, ElementState, MouseButton};

    fn visualizer() -> ParticleVisualizer<DrawList> {
        ParticleVisualizer::new(VisualizerConfig::default(), Some(DrawList::new(1600, 1000)))
    }

    fn frame(count: usize) -> ParticleFrame {
        (0..count)
            .map(|i| ParticleRecord::new(i as f64, 100.0, 1.0))
            .collect()
    }

    #[test]
    fn test_frame_order() {
        let mut viz = visualizer();
        let boundaries = [InfluenceBoundary::new(500.0, 400.0, 100.0)];
        viz.render_frame(&frame(1), &boundaries, 1, 1, 60.0, 50.0, 1.0);

        let commands = viz.surface().unwrap().commands();
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
        assert!(matches!(commands[1], DrawCommand::Circle { .. }));
        assert!(matches!(commands[2], DrawCommand::Circle { .. }));
        assert!(matches!(
            commands[3],
            DrawCommand::Blend { mode: BlendMode::Subtract, .. }
        ));
        assert!(matches!(commands[4], DrawCommand::Circle { .. }));
        assert!(matches!(commands[5], DrawCommand::Circle { .. }));
        assert!(matches!(commands[6], DrawCommand::Rect { .. }));
        assert_eq!(commands.last(), Some(&DrawCommand::Present));

        let texts = viz.surface().unwrap().texts();
        let title = texts.iter().position(|t| *t == "Simulation Stats").unwrap();
        let widget = texts.iter().position(|t| *t == "Big Ball Gravity").unwrap();
        assert!(title < widget);
    }

    #[test]
    fn test_render_cap_counts() {
        let config = VisualizerConfig::default().with_max_render_particles(3);
        let mut viz = ParticleVisualizer::new(config, Some(DrawList::new(1600, 1000)));
        viz.set_backend_multiplier(10);
        viz.render_frame(&frame(5), &[], 5000, 4500, 30.0, 0.0, 2.0);

        let stats = viz.last_stats().unwrap();
        assert_eq!(stats.rendered, 3);
        let texts = viz.surface().unwrap().texts();
        assert!(texts.contains(&"Active: 4,500 / 5,000"));
        assert!(texts.contains(&"Rendered: 3"));
        assert!(texts.contains(&"Backend: 10x  Total: 50,000"));
    }

    #[test]
    fn test_disabled_is_noop() {
        let mut viz: ParticleVisualizer<DrawList> =
            ParticleVisualizer::new(VisualizerConfig::default(), None);
        assert!(!viz.is_available());
        viz.render_frame(&frame(3), &[], 3, 3, 60.0, 0.0, 0.0);
        assert!(viz.last_stats().is_none());
        assert!(!viz.handle_pointer(PointerEvent::Pressed {
            position: (100.0, 920.0),
            button: PointerButton::Primary,
        }));
        assert_eq!(viz.slider_values().max_balls_cap, 100_000);
    }

    #[test]
    fn test_create_visualizer_respects_flag() {
        assert!(create_visualizer::<DrawList>(false, VisualizerConfig::default(), None).is_none());
        let viz = create_visualizer(true, VisualizerConfig::default(), Some(DrawList::new(800, 600)));
        assert!(viz.is_some_and(|viz| viz.is_available()));
    }

    #[test]
    fn test_window_events_reach_panel() {
        let device_id = unsafe { DeviceId::dummy() };
        let mut viz = visualizer();

        viz.handle_window_event(&WindowEvent::CursorMoved {
            device_id,
            position: winit::dpi::PhysicalPosition::new(1250.0, 930.0),
        });
        let consumed = viz.handle_window_event(&WindowEvent::MouseInput {
            device_id,
            state: ElementState::Pressed,
            button: MouseButton::Left,
        });
        assert!(consumed);
        assert!(viz.split_enabled());
    }

    #[test]
    fn test_resize_keeps_draw_and_spawn_mappings_aligned() {
        let mut viz = visualizer();
        viz.handle_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 500)));
        assert_eq!(viz.surface().unwrap().size(), (800, 500));

        let particles: ParticleFrame = vec![ParticleRecord::new(500.0, 400.0, 1.0)].into_iter().collect();
        viz.render_frame(&particles, &[], 1, 1, 60.0, 0.0, 0.0);

        let drawn = viz
            .surface()
            .unwrap()
            .commands()
            .iter()
            .find_map(|command| match command {
                DrawCommand::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .unwrap();
        assert_eq!(drawn, (400, 250));

        viz.handle_pointer(PointerEvent::Pressed {
            position: (drawn.0 as f64, drawn.1 as f64),
            button: PointerButton::Secondary,
        });
        let requests = viz.take_spawn_requests();
        assert_eq!(requests.len(), 1);
        assert!((requests[0].position.x - 500.0).abs() < 1e-9);
        assert!((requests[0].position.y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_follows_surface_size() {
        let mut viz = visualizer();
        viz.surface_mut().unwrap().resize(1200, 700);
        viz.render_frame(&ParticleFrame::default(), &[], 0, 0, 0.0, 0.0, 0.0);
        assert_eq!(viz.panel().window_size(), (1200, 700));
        assert_eq!(viz.panel().widgets().slider("gravity").unwrap().position, (40.0, 620.0));
    }

    #[test]
    fn test_resize_relayouts_and_close_disables() {
        let mut viz = visualizer();
        viz.handle_window_event(&WindowEvent::Resized(PhysicalSize::new(1200, 700)));
        assert_eq!(viz.config().window_size, (1200, 700));
        assert_eq!(viz.panel().widgets().slider("gravity").unwrap().position, (40.0, 620.0));

        viz.handle_window_event(&WindowEvent::CloseRequested);
        assert!(!viz.is_available());
    }
}
