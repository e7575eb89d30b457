//! # User Interface Module
//!
//! Retained-mode control panel drawn over the particle canvas.
//!
//! ## Architecture
//!
//! - [`widget`] - Widget state and the [`WidgetRegistry`] keyed by id
//! - [`panel`] - [`ControlPanel`]: layout, drag state, focus, spawn queue
//! - [`input`] - Translation from winit window events to panel input
//! - [`draw`] - Painting widgets and the stats box onto a draw surface
//!
//! ## Input Handling
//!
//! The panel reports whether it consumed each event. A secondary click that
//! lands on no widget is turned into a [`SpawnRequest`] at the matching
//! world position; the driver drains those once per tick.

pub mod draw;
pub mod input;
pub mod panel;
pub mod widget;

// Re-export main types
pub use input::{InputEvent, InputTranslator, KeyInput, PointerButton, PointerEvent};
pub use panel::{ControlPanel, ControlValues, SpawnRequest};
pub use widget::{
    CycleButtonState, SliderState, TextInputState, ToggleState, Widget, WidgetRegistry,
};
