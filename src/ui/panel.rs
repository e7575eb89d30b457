// src/ui/panel.rs
//! Control panel state and pointer interaction
//!
//! Owns every widget and turns pointer/keyboard input into widget mutations.
//! The driver reads sanitized values back through [`ControlPanel::slider_values`]
//! once per tick.
//!
//! Slider drag state machine:
//!
//! ```text
//! IDLE --primary press on slider hit-box--> DRAGGING(slider)
//! DRAGGING --pointer move--> DRAGGING (value follows pointer x)
//! DRAGGING --primary release--> IDLE
//! DRAGGING(a) --primary press on slider b--> DRAGGING(b)
//! ```

use super::input::{InputEvent, KeyInput, PointerButton, PointerEvent};
use super::widget::{
    CycleButtonState, SliderState, TextInputState, ToggleState, Widget, WidgetRegistry,
    DEFAULT_MAX_BALLS_CAP,
};
use crate::gfx::compositor::ScreenTransform;
use cgmath::Vector2;
use indexmap::IndexMap;
use log::debug;

pub const GRAVITY: &str = "gravity";
pub const SMALL_BALL_SPEED: &str = "small_ball_speed";
pub const INITIAL_BALLS: &str = "initial_balls";
pub const MAX_BALLS_CAP: &str = "max_balls_cap";
pub const MULTIPLIER: &str = "multiplier";
pub const SPLIT: &str = "split";

/// Reported alongside slider values; not adjustable from the panel
pub const COMPANION_BACKEND_MULTIPLIER: u32 = 1;
/// Reported alongside slider values; not adjustable from the panel
pub const COMPANION_BIG_BALL_COUNT: u32 = 3;

pub const MULTIPLIER_LEVELS: [u32; 4] = [1, 10, 100, 1000];

const LAYOUT_MARGIN: f64 = 40.0;
const LAYOUT_SPACING: f64 = 18.0;
const LAYOUT_SLIDER_WIDTH: f64 = 300.0;
const LAYOUT_TEXT_INPUT_WIDTH: f64 = 120.0;
const LAYOUT_CYCLE_BUTTON_WIDTH: f64 = 60.0;
const LAYOUT_TOGGLE_WIDTH: f64 = 140.0;
const LAYOUT_BUTTON_HEIGHT: f64 = 30.0;

/// A user request to add a particle at a world-space position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub position: Vector2<f64>,
}

/// Sanitized values handed to the simulation driver
#[derive(Clone, Debug, PartialEq)]
pub struct ControlValues {
    pub sliders: IndexMap<String, f64>,
    pub max_balls_cap: usize,
    pub backend_multiplier: u32,
    pub big_ball_count: u32,
}

impl ControlValues {
    pub fn slider(&self, id: &str) -> Option<f64> {
        self.sliders.get(id).copied()
    }
}

/// Widget registry plus interaction state
pub struct ControlPanel {
    widgets: WidgetRegistry,
    dragging: Option<String>,
    spawn_requests: Vec<SpawnRequest>,
    window_size: (u32, u32),
}

impl ControlPanel {
    /// Panel with the default simulation controls, laid out for `window_size`
    pub fn new(window_size: (u32, u32)) -> Self {
        let mut widgets = WidgetRegistry::new();
        widgets.insert(
            GRAVITY,
            Widget::Slider(SliderState::new("Big Ball Gravity", 500.0, 0.0, 10000.0)),
        );
        widgets.insert(
            SMALL_BALL_SPEED,
            Widget::Slider(SliderState::new("Small Ball Speed", 300.0, 50.0, 600.0)),
        );
        widgets.insert(
            INITIAL_BALLS,
            Widget::Slider(SliderState::new("Initial Balls", 1.0, 1.0, 10.0).integer()),
        );
        widgets.insert(
            MAX_BALLS_CAP,
            Widget::TextInput(TextInputState::new("Max Cap", "100000")),
        );
        widgets.insert(
            MULTIPLIER,
            Widget::CycleButton(CycleButtonState::new(MULTIPLIER_LEVELS.to_vec()).scaling(INITIAL_BALLS)),
        );
        widgets.insert(SPLIT, Widget::Toggle(ToggleState::new("Ball Splitting", false)));

        Self::with_widgets(widgets, window_size)
    }

    /// Panel over a caller-built registry
    pub fn with_widgets(widgets: WidgetRegistry, window_size: (u32, u32)) -> Self {
        let mut panel = Self {
            widgets,
            dragging: None,
            spawn_requests: Vec::new(),
            window_size,
        };
        panel.layout(window_size);
        panel
    }

    /// Places widgets left to right along the bottom edge of the window
    pub fn layout(&mut self, window_size: (u32, u32)) {
        self.window_size = window_size;
        let control_y = (window_size.1 as f64 - 80.0).max(40.0);
        let mut x = LAYOUT_MARGIN;

        for (_, widget) in self.widgets.iter_mut() {
            let width = match widget {
                Widget::Slider(slider) => {
                    slider.position = (x, control_y);
                    slider.width = LAYOUT_SLIDER_WIDTH;
                    slider.width
                }
                Widget::TextInput(input) => {
                    input.position = (x, control_y);
                    input.width = LAYOUT_TEXT_INPUT_WIDTH;
                    input.height = LAYOUT_BUTTON_HEIGHT;
                    input.width
                }
                Widget::CycleButton(button) => {
                    button.position = (x, control_y);
                    button.width = LAYOUT_CYCLE_BUTTON_WIDTH;
                    button.height = LAYOUT_BUTTON_HEIGHT;
                    button.width
                }
                Widget::Toggle(toggle) => {
                    toggle.position = (x, control_y);
                    toggle.width = LAYOUT_TOGGLE_WIDTH;
                    toggle.height = LAYOUT_BUTTON_HEIGHT;
                    toggle.width
                }
            };
            x += width + LAYOUT_SPACING;
        }
    }

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.widgets
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Id of the slider currently being dragged
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Routes one input event; returns whether the panel consumed it
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Pressed {
                position,
                button: PointerButton::Primary,
            } => self.handle_click(position),
            PointerEvent::Pressed {
                position,
                button: PointerButton::Secondary,
            } => {
                if self.widgets.hit(position.0, position.1).is_some() {
                    return true;
                }
                let transform = ScreenTransform::for_window(self.window_size.0, self.window_size.1);
                self.push_spawn_request(SpawnRequest {
                    position: transform.to_world(position),
                });
                false
            }
            PointerEvent::Pressed { .. } => false,
            PointerEvent::Moved { position } => self.handle_drag(position),
            PointerEvent::Released {
                button: PointerButton::Primary,
                ..
            } => self.dragging.take().is_some(),
            PointerEvent::Released { .. } => false,
        }
    }

    fn handle_click(&mut self, (x, y): (f64, f64)) -> bool {
        let mut consumed = false;

        for input in self.widgets.text_inputs_mut() {
            input.focused = input.contains(x, y);
            consumed |= input.focused;
        }

        // The first slider under the pointer wins and replaces any prior drag.
        let hit_slider = self
            .widgets
            .sliders()
            .find(|(_, slider)| slider.hit_test(x, y))
            .map(|(id, _)| id.to_string());
        if let Some(id) = hit_slider {
            if let Some(slider) = self.widgets.slider_mut(&id) {
                slider.update_from_pointer(x);
            }
            self.dragging = Some(id);
            return true;
        }

        let mut scale_request = None;
        for (_, widget) in self.widgets.iter_mut() {
            match widget {
                Widget::Toggle(toggle) if toggle.contains(x, y) => {
                    toggle.toggle();
                    consumed = true;
                }
                Widget::CycleButton(button) if button.contains(x, y) => {
                    let level = button.advance();
                    if let Some(target) = &button.scales {
                        scale_request = Some((target.clone(), level));
                    }
                    consumed = true;
                }
                _ => {}
            }
        }

        if let Some((target, level)) = scale_request {
            if let Some(slider) = self.widgets.slider_mut(&target) {
                slider.set_max(slider.base_max() * level as f64);
                debug!("Scaled '{}' max to {} (x{})", target, slider.max(), level);
            }
        }

        consumed
    }

    fn handle_drag(&mut self, (x, _): (f64, f64)) -> bool {
        let Some(id) = &self.dragging else {
            return false;
        };
        if let Some(slider) = self.widgets.slider_mut(id) {
            slider.update_from_pointer(x);
        }
        true
    }

    /// Applies a key to the focused text input, if any
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        let Some(input) = self.widgets.text_inputs_mut().find(|input| input.focused) else {
            return false;
        };
        match key {
            KeyInput::Char(c) => {
                input.insert_char(c);
            }
            KeyInput::Backspace => {
                input.backspace();
            }
            KeyInput::Enter | KeyInput::Escape => input.focused = false,
        }
        true
    }

    /// Sanitized slider values, parsed cap and the fixed companion values
    pub fn slider_values(&mut self) -> ControlValues {
        let sliders = self
            .widgets
            .sliders_mut()
            .map(|(id, slider)| (id.to_string(), slider.revalidate()))
            .collect();

        ControlValues {
            sliders,
            max_balls_cap: self
                .widgets
                .text_input(MAX_BALLS_CAP)
                .map(TextInputState::parse_cap)
                .unwrap_or(DEFAULT_MAX_BALLS_CAP),
            backend_multiplier: COMPANION_BACKEND_MULTIPLIER,
            big_ball_count: COMPANION_BIG_BALL_COUNT,
        }
    }

    pub fn split_enabled(&self) -> bool {
        self.widgets.toggle(SPLIT).is_some_and(|toggle| toggle.enabled)
    }

    /// Raw, unparsed cap text
    pub fn max_balls_cap_text(&self) -> &str {
        self.widgets
            .text_input(MAX_BALLS_CAP)
            .map(|input| input.value.as_str())
            .unwrap_or("")
    }

    /// Current level of the multiplier button
    pub fn multiplier_level(&self) -> u32 {
        self.widgets
            .cycle_button(MULTIPLIER)
            .map(CycleButtonState::level)
            .unwrap_or(1)
    }

    pub fn push_spawn_request(&mut self, request: SpawnRequest) {
        self.spawn_requests.push(request);
    }

    /// Returns every queued request and empties the queue
    pub fn take_spawn_requests(&mut self) -> Vec<SpawnRequest> {
        std::mem::take(&mut self.spawn_requests)
    }
}
