//! Widget and stats panel drawing
//!
//! Stateless functions that paint panel state onto any [`DrawSurface`].
//! Rounded shapes go through [`DrawSurfaceExt::rounded_rect`] so surfaces
//! without corner rounding still get plain rectangles.

use super::panel::ControlPanel;
use super::widget::{CycleButtonState, SliderState, TextInputState, ToggleState, Widget};
use crate::gfx::surface::{Color, DrawSurface, DrawSurfaceExt, Rect, Stroke};
use crate::performance::StatsSnapshot;

pub const FONT_SIZE: u32 = 28;
pub const SMALL_FONT_SIZE: u32 = 20;

const TEXT_COLOR: Color = Color::rgb(230, 230, 230);
const MUTED_TEXT: Color = Color::rgb(150, 150, 150);
const LABEL_TEXT: Color = Color::rgb(180, 180, 180);

const TRACK_HEIGHT: i32 = 18;
const TRACK_COLOR: Color = Color::rgb(36, 38, 44);
const TRACK_FILL: Color = Color::rgb(60, 140, 220);
const TICK_COLOR: Color = Color::rgb(70, 75, 80);
const TICK_DIVISIONS: i32 = 5;
const HANDLE_RADIUS: i32 = 11;
const HANDLE_COLOR: Color = Color::rgb(245, 245, 245);
const HANDLE_SHADOW_RADIUS: i32 = 15;
const HANDLE_SHADOW: Color = Color::rgb(16, 18, 20);
const VALUE_BOX: Color = Color::rgb(28, 32, 36);

const INPUT_ACTIVE: Color = Color::rgb(36, 40, 46);
const INPUT_BORDER: Color = Color::rgb(60, 70, 80);

const BUTTON_FILL: Color = Color::rgb(30, 36, 44);
const BUTTON_BORDER: Color = Color::rgb(70, 100, 160);

const TOGGLE_ON: Color = Color::rgb(90, 180, 120);
const TOGGLE_OFF: Color = Color::rgb(100, 110, 140);
const TOGGLE_BORDER: Color = Color::rgb(30, 30, 30);

pub const STATS_PANEL_WIDTH: i32 = 300;
pub const STATS_PANEL_HEIGHT: i32 = 160;
const STATS_PADDING: i32 = 12;
const STATS_TEXT_INSET: i32 = 14;
const STATS_TITLE_OFFSET: i32 = 10;
const STATS_LINES_OFFSET: i32 = 40;
const STATS_LINE_STEP: i32 = 22;
const STATS_TITLE: Color = Color::rgb(245, 245, 245);
const STATS_TEXT: Color = Color::rgb(200, 200, 200);
const STATS_BACKGROUND: Color = Color::rgba(22, 24, 28, 220);

/// Slider values print as integers or with one decimal
pub fn format_slider_value(value: f64, is_int: bool) -> String {
    if is_int {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn pixel(position: (f64, f64)) -> (i32, i32) {
    (position.0 as i32, position.1 as i32)
}

pub fn draw_slider<S: DrawSurface + ?Sized>(surface: &mut S, slider: &SliderState) {
    let (x, y) = pixel(slider.position);
    let width = slider.width as i32;

    surface.draw_text(&slider.label, SMALL_FONT_SIZE, TEXT_COLOR, (x, y - 28));
    surface.rounded_rect(Rect::new(x, y, width, TRACK_HEIGHT), TRACK_COLOR, Stroke::Fill, 10);

    let tick_top = y + TRACK_HEIGHT + 4;
    for i in 0..=TICK_DIVISIONS {
        let tick_x = x + width * i / TICK_DIVISIONS;
        surface.draw_line((tick_x, tick_top), (tick_x, tick_top + 6), TICK_COLOR, 1);
    }

    let label_y = y + TRACK_HEIGHT + 12;
    surface.draw_text(
        &format_slider_value(slider.min(), slider.is_int),
        SMALL_FONT_SIZE,
        MUTED_TEXT,
        (x, label_y),
    );
    let max_label = surface.render_text(
        &format_slider_value(slider.max(), slider.is_int),
        SMALL_FONT_SIZE,
        MUTED_TEXT,
    );
    surface.blit(&max_label, (x + width - max_label.width as i32, label_y));

    let filled = (slider.normalized() * slider.width) as i32;
    if filled > 0 {
        surface.rounded_rect(Rect::new(x, y, filled, TRACK_HEIGHT), TRACK_FILL, Stroke::Fill, 10);
    }

    let handle = (x + filled, y + TRACK_HEIGHT / 2);
    surface.draw_circle(handle, HANDLE_SHADOW_RADIUS, HANDLE_SHADOW, Stroke::Fill);
    surface.draw_circle(handle, HANDLE_RADIUS, HANDLE_COLOR, Stroke::Fill);

    let value_box = Rect::new(x + width + 12, y - 1, 64, 20);
    surface.rounded_rect(value_box, VALUE_BOX, Stroke::Fill, 6);
    surface.draw_text_centered(
        &format_slider_value(slider.value(), slider.is_int),
        SMALL_FONT_SIZE,
        TEXT_COLOR,
        value_box,
    );
}

pub fn draw_text_input<S: DrawSurface + ?Sized>(surface: &mut S, input: &TextInputState) {
    let (x, y) = pixel(input.position);
    let rect = Rect::new(x, y, input.width as i32, input.height as i32);
    let background = if input.focused { INPUT_ACTIVE } else { VALUE_BOX };

    surface.rounded_rect(rect, background, Stroke::Fill, 6);
    surface.rounded_rect(rect, INPUT_BORDER, Stroke::Outline(1), 6);
    surface.draw_text(&input.label, SMALL_FONT_SIZE, LABEL_TEXT, (x, y - 20));

    let text = surface.render_text(&input.value, SMALL_FONT_SIZE, TEXT_COLOR);
    let text_y = y + (rect.height - text.height as i32) / 2;
    surface.blit(&text, (x + 8, text_y));
}

pub fn draw_cycle_button<S: DrawSurface + ?Sized>(surface: &mut S, button: &CycleButtonState) {
    let (x, y) = pixel(button.position);
    let rect = Rect::new(x, y, button.width as i32, button.height as i32);

    surface.rounded_rect(rect, BUTTON_FILL, Stroke::Fill, 8);
    surface.rounded_rect(rect, BUTTON_BORDER, Stroke::Outline(2), 8);
    surface.draw_text_centered(&button.label(), SMALL_FONT_SIZE, TEXT_COLOR, rect);
}

pub fn draw_toggle<S: DrawSurface + ?Sized>(surface: &mut S, toggle: &ToggleState) {
    let (x, y) = pixel(toggle.position);
    let rect = Rect::new(x, y, toggle.width as i32, toggle.height as i32);
    let (fill, text) = if toggle.enabled {
        (TOGGLE_ON, Color::rgb(18, 18, 18))
    } else {
        (TOGGLE_OFF, TEXT_COLOR)
    };

    surface.rounded_rect(rect, fill, Stroke::Fill, 8);
    surface.rounded_rect(rect, TOGGLE_BORDER, Stroke::Outline(2), 8);
    surface.draw_text_centered(&toggle.display_label(), SMALL_FONT_SIZE, text, rect);
}

pub fn draw_widget<S: DrawSurface + ?Sized>(surface: &mut S, widget: &Widget) {
    match widget {
        Widget::Slider(slider) => draw_slider(surface, slider),
        Widget::TextInput(input) => draw_text_input(surface, input),
        Widget::CycleButton(button) => draw_cycle_button(surface, button),
        Widget::Toggle(toggle) => draw_toggle(surface, toggle),
    }
}

/// Draws every widget in registry order
pub fn draw_panel<S: DrawSurface + ?Sized>(surface: &mut S, panel: &ControlPanel) {
    for (_, widget) in panel.widgets().iter() {
        draw_widget(surface, widget);
    }
}

/// Stats box anchored to the top-right corner
pub fn stats_panel_rect(window_width: u32) -> Rect {
    Rect::new(
        window_width as i32 - STATS_PANEL_WIDTH - STATS_PADDING,
        STATS_PADDING,
        STATS_PANEL_WIDTH,
        STATS_PANEL_HEIGHT,
    )
}

pub fn draw_stats<S: DrawSurface + ?Sized>(surface: &mut S, stats: &StatsSnapshot) {
    let (width, _) = surface.size();
    let rect = stats_panel_rect(width);
    surface.rounded_rect(rect, STATS_BACKGROUND, Stroke::Fill, 8);

    let x = rect.x + STATS_TEXT_INSET;
    surface.draw_text("Simulation Stats", FONT_SIZE, STATS_TITLE, (x, rect.y + STATS_TITLE_OFFSET));
    let mut y = rect.y + STATS_LINES_OFFSET;
    for line in stats.lines() {
        surface.draw_text(&line, FONT_SIZE, STATS_TEXT, (x, y));
        y += STATS_LINE_STEP;
    }
}
