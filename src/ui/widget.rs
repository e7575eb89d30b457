//! Widget state and the registry that owns it
//!
//! Every control lives in a [`WidgetRegistry`] under a unique id, tagged by
//! kind. Registry order is hit-test order and layout order.

use indexmap::IndexMap;

/// Cap used when the cap text is empty or not a number
pub const DEFAULT_MAX_BALLS_CAP: usize = 100_000;

/// Vertical slack above the slider track that still counts as a hit
pub const SLIDER_HIT_ABOVE: f64 = 12.0;
/// Vertical slack below the slider track that still counts as a hit
pub const SLIDER_HIT_BELOW: f64 = 32.0;

/// Horizontal value slider
///
/// Invariant: after any write `min <= value <= max`, and the value is never
/// NaN or infinite.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderState {
    pub label: String,
    value: f64,
    min: f64,
    max: f64,
    /// Upper bound before any cycle-button scaling
    base_max: f64,
    pub position: (f64, f64),
    pub width: f64,
    pub is_int: bool,
}

impl SliderState {
    pub fn new(label: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        let mut slider = Self {
            label: label.into(),
            value: min,
            min,
            max,
            base_max: max,
            position: (0.0, 0.0),
            width: 220.0,
            is_int: false,
        };
        slider.set_value(value);
        slider
    }

    /// Integer slider: values are rounded to the nearest whole number
    pub fn integer(mut self) -> Self {
        self.is_int = true;
        self.set_value(self.value);
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn base_max(&self) -> f64 {
        self.base_max
    }

    /// Applies the NaN guard, integer rounding and range clamp
    pub fn sanitize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let value = if self.is_int { value.round() } else { value };
        // max/min instead of clamp: never panics on inverted bounds
        value.max(self.min).min(self.max)
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = self.sanitize(value);
    }

    /// Changes the upper bound and re-clamps the current value
    pub fn set_max(&mut self, max: f64) {
        if max.is_finite() {
            self.max = max;
        }
        self.set_value(self.value);
    }

    /// Re-applies the guard to the stored value and returns it
    pub fn revalidate(&mut self) -> f64 {
        self.set_value(self.value);
        self.value
    }

    /// Inside `[x, x+width]` horizontally and the extended vertical hit-box
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        let (sx, sy) = self.position;
        x >= sx && x <= sx + self.width && y >= sy - SLIDER_HIT_ABOVE && y <= sy + SLIDER_HIT_BELOW
    }

    /// Maps a pointer x coordinate onto the slider range
    pub fn update_from_pointer(&mut self, pointer_x: f64) {
        let (x, _) = self.position;
        let clamped = pointer_x.max(x).min(x + self.width);
        let normalized = (clamped - x) / self.width;
        let value = self.min + normalized * (self.max - self.min);
        // Zero-width sliders produce NaN here; sanitize maps it to min.
        self.set_value(value);
    }

    /// Fill fraction for drawing, in `[0, 1]`
    pub fn normalized(&self) -> f64 {
        let span = (self.max - self.min).max(1e-9);
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// On/off button
#[derive(Clone, Debug, PartialEq)]
pub struct ToggleState {
    pub label: String,
    pub enabled: bool,
    pub position: (f64, f64),
    pub width: f64,
    pub height: f64,
}

impl ToggleState {
    pub fn new(label: impl Into<String>, enabled: bool) -> Self {
        Self {
            label: label.into(),
            enabled,
            position: (0.0, 0.0),
            width: 160.0,
            height: 30.0,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        rect_contains(self.position, self.width, self.height, x, y)
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn display_label(&self) -> String {
        format!("{}: {}", self.label, if self.enabled { "ON" } else { "OFF" })
    }
}

/// Single-line text field, parsed lazily
#[derive(Clone, Debug, PartialEq)]
pub struct TextInputState {
    pub label: String,
    pub value: String,
    pub focused: bool,
    pub position: (f64, f64),
    pub width: f64,
    pub height: f64,
}

impl TextInputState {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            focused: false,
            position: (0.0, 0.0),
            width: 100.0,
            height: 30.0,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        rect_contains(self.position, self.width, self.height, x, y)
    }

    /// Parses the text as a cap, falling back to [`DEFAULT_MAX_BALLS_CAP`]
    pub fn parse_cap(&self) -> usize {
        parse_cap(&self.value)
    }

    /// Appends a character; ignored unless focused
    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.focused || c.is_control() {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if !self.focused {
            return false;
        }
        self.value.pop();
        true
    }
}

/// Parses cap text; empty or non-numeric text yields the default
pub fn parse_cap(text: &str) -> usize {
    text.trim().parse::<usize>().unwrap_or(DEFAULT_MAX_BALLS_CAP)
}

/// Button cycling through a fixed list of levels
///
/// When `scales` names a slider, that slider's max becomes
/// `base_max * level` whenever the level changes.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleButtonState {
    levels: Vec<u32>,
    index: usize,
    pub scales: Option<String>,
    pub position: (f64, f64),
    pub width: f64,
    pub height: f64,
}

impl CycleButtonState {
    pub fn new(levels: Vec<u32>) -> Self {
        let levels = if levels.is_empty() { vec![1] } else { levels };
        Self {
            levels,
            index: 0,
            scales: None,
            position: (0.0, 0.0),
            width: 80.0,
            height: 30.0,
        }
    }

    pub fn scaling(mut self, slider_id: impl Into<String>) -> Self {
        self.scales = Some(slider_id.into());
        self
    }

    pub fn level(&self) -> u32 {
        self.levels[self.index]
    }

    pub fn advance(&mut self) -> u32 {
        self.index = (self.index + 1) % self.levels.len();
        self.level()
    }

    pub fn label(&self) -> String {
        format!("x{}", self.level())
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        rect_contains(self.position, self.width, self.height, x, y)
    }
}

fn rect_contains(position: (f64, f64), width: f64, height: f64, x: f64, y: f64) -> bool {
    let (rx, ry) = position;
    x >= rx && x <= rx + width && y >= ry && y <= ry + height
}

/// Tagged widget state
#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    Slider(SliderState),
    Toggle(ToggleState),
    TextInput(TextInputState),
    CycleButton(CycleButtonState),
}

impl Widget {
    /// Whether a point falls on this widget's interactive area
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        match self {
            Widget::Slider(slider) => slider.hit_test(x, y),
            Widget::Toggle(toggle) => toggle.contains(x, y),
            Widget::TextInput(input) => input.contains(x, y),
            Widget::CycleButton(button) => button.contains(x, y),
        }
    }
}

/// Insertion-ordered map from widget id to widget state
#[derive(Clone, Debug, Default)]
pub struct WidgetRegistry {
    widgets: IndexMap<String, Widget>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a widget, keeping the original position on replace
    pub fn insert(&mut self, id: impl Into<String>, widget: Widget) -> Option<Widget> {
        self.widgets.insert(id.into(), widget)
    }

    pub fn get(&self, id: &str) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Widget)> {
        self.widgets.iter().map(|(id, widget)| (id.as_str(), widget))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Widget)> {
        self.widgets.iter_mut().map(|(id, widget)| (id.as_str(), widget))
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn slider(&self, id: &str) -> Option<&SliderState> {
        match self.widgets.get(id)? {
            Widget::Slider(slider) => Some(slider),
            _ => None,
        }
    }

    pub fn slider_mut(&mut self, id: &str) -> Option<&mut SliderState> {
        match self.widgets.get_mut(id)? {
            Widget::Slider(slider) => Some(slider),
            _ => None,
        }
    }

    pub fn toggle(&self, id: &str) -> Option<&ToggleState> {
        match self.widgets.get(id)? {
            Widget::Toggle(toggle) => Some(toggle),
            _ => None,
        }
    }

    pub fn text_input(&self, id: &str) -> Option<&TextInputState> {
        match self.widgets.get(id)? {
            Widget::TextInput(input) => Some(input),
            _ => None,
        }
    }

    pub fn text_input_mut(&mut self, id: &str) -> Option<&mut TextInputState> {
        match self.widgets.get_mut(id)? {
            Widget::TextInput(input) => Some(input),
            _ => None,
        }
    }

    pub fn cycle_button(&self, id: &str) -> Option<&CycleButtonState> {
        match self.widgets.get(id)? {
            Widget::CycleButton(button) => Some(button),
            _ => None,
        }
    }

    pub fn sliders(&self) -> impl Iterator<Item = (&str, &SliderState)> {
        self.iter().filter_map(|(id, widget)| match widget {
            Widget::Slider(slider) => Some((id, slider)),
            _ => None,
        })
    }

    pub fn sliders_mut(&mut self) -> impl Iterator<Item = (&str, &mut SliderState)> {
        self.iter_mut().filter_map(|(id, widget)| match widget {
            Widget::Slider(slider) => Some((id, slider)),
            _ => None,
        })
    }

    pub fn text_inputs_mut(&mut self) -> impl Iterator<Item = &mut TextInputState> {
        self.widgets.values_mut().filter_map(|widget| match widget {
            Widget::TextInput(input) => Some(input),
            _ => None,
        })
    }

    /// First widget (in registry order) under the point
    pub fn hit(&self, x: f64, y: f64) -> Option<&str> {
        self.iter()
            .find(|(_, widget)| widget.hit_test(x, y))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn placed(slider: SliderState, x: f64, y: f64, width: f64) -> SliderState {
        let mut slider = slider;
        slider.position = (x, y);
        slider.width = width;
        slider
    }

    #[test]
    fn test_slider_value_always_in_range() {
        let mut rng = rand::rng();
        for _ in 0..2000 {
            let a: f64 = rng.random_range(-1e4..1e4);
            let b: f64 = rng.random_range(-1e4..1e4);
            let (min, max) = (a.min(b), a.max(b));
            let mut slider = placed(SliderState::new("s", min, min, max), 40.0, 900.0, 300.0);

            let pointer_x: f64 = rng.random_range(-2000.0..2000.0);
            slider.update_from_pointer(pointer_x);
            assert!(slider.value() >= min && slider.value() <= max);
        }
    }

    #[test]
    fn test_integer_slider_always_integral() {
        let mut rng = rand::rng();
        for _ in 0..2000 {
            let min = rng.random_range(-50..50) as f64;
            let max = min + rng.random_range(0..100) as f64;
            let mut slider = placed(SliderState::new("n", min, min, max).integer(), 0.0, 0.0, 300.0);
            slider.update_from_pointer(rng.random_range(-100.0..400.0));
            assert_eq!(slider.value().fract(), 0.0);
            assert!(slider.value() >= min && slider.value() <= max);
        }
    }

    #[test]
    fn test_zero_width_slider_resets_to_min() {
        let mut slider = placed(SliderState::new("s", 5.0, 1.0, 10.0), 10.0, 10.0, 0.0);
        slider.update_from_pointer(10.0);
        assert_eq!(slider.value(), 1.0);
    }

    #[test]
    fn test_non_finite_writes_rejected() {
        let mut slider = SliderState::new("s", 3.0, 2.0, 8.0);
        slider.set_value(f64::NAN);
        assert_eq!(slider.value(), 2.0);
        slider.set_value(f64::INFINITY);
        assert_eq!(slider.value(), 2.0);
        slider.set_value(f64::NEG_INFINITY);
        assert_eq!(slider.value(), 2.0);
    }

    #[test]
    fn test_pointer_mapping() {
        let mut slider = placed(SliderState::new("g", 0.0, 0.0, 10000.0), 40.0, 920.0, 300.0);
        slider.update_from_pointer(190.0);
        assert_eq!(slider.value(), 5000.0);
        slider.update_from_pointer(-50.0);
        assert_eq!(slider.value(), 0.0);
        slider.update_from_pointer(9999.0);
        assert_eq!(slider.value(), 10000.0);
    }

    #[test]
    fn test_slider_hit_box() {
        let slider = placed(SliderState::new("s", 0.0, 0.0, 1.0), 40.0, 100.0, 300.0);
        assert!(slider.hit_test(40.0, 88.0));
        assert!(slider.hit_test(340.0, 132.0));
        assert!(!slider.hit_test(39.9, 100.0));
        assert!(!slider.hit_test(100.0, 87.9));
        assert!(!slider.hit_test(100.0, 132.1));
    }

    #[test]
    fn test_set_max_reclamps() {
        let mut slider = SliderState::new("balls", 40.0, 1.0, 100.0).integer();
        slider.set_max(10.0);
        assert_eq!(slider.value(), 10.0);
        assert_eq!(slider.base_max(), 100.0);
    }

    #[test]
    fn test_cap_parsing() {
        assert_eq!(parse_cap(""), 100_000);
        assert_eq!(parse_cap("abc"), 100_000);
        assert_eq!(parse_cap("5000"), 5000);
        assert_eq!(parse_cap(" 42 "), 42);
        assert_eq!(parse_cap("-5"), 100_000);
    }

    #[test]
    fn test_text_input_edits_require_focus() {
        let mut input = TextInputState::new("Cap", "12");
        assert!(!input.insert_char('3'));
        assert!(!input.backspace());
        assert_eq!(input.value, "12");

        input.focused = true;
        assert!(input.insert_char('3'));
        assert!(!input.insert_char('\u{8}'));
        assert_eq!(input.parse_cap(), 123);
        input.backspace();
        input.backspace();
        input.backspace();
        assert_eq!(input.value, "");
        assert!(input.backspace());
        assert_eq!(input.parse_cap(), DEFAULT_MAX_BALLS_CAP);
    }

    #[test]
    fn test_cycle_button_wraps() {
        let mut button = CycleButtonState::new(vec![1, 10, 100, 1000]);
        assert_eq!(button.label(), "x1");
        assert_eq!(button.advance(), 10);
        assert_eq!(button.advance(), 100);
        assert_eq!(button.advance(), 1000);
        assert_eq!(button.advance(), 1);
    }

    #[test]
    fn test_registry_typed_access() {
        let mut registry = WidgetRegistry::new();
        registry.insert("speed", Widget::Slider(SliderState::new("Speed", 1.0, 0.0, 2.0)));
        registry.insert("split", Widget::Toggle(ToggleState::new("Split", false)));

        assert!(registry.slider("speed").is_some());
        assert!(registry.slider("split").is_none());
        assert!(registry.toggle("split").is_some());
        assert_eq!(registry.sliders().count(), 1);
        assert_eq!(registry.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec!["speed", "split"]);
    }
}
