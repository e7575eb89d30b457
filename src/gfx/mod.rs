//! # Graphics Module
//!
//! Everything that ends up on screen goes through here.
//!
//! ## Architecture Overview
//!
//! - **Draw Surface** ([`surface`]) - The drawing capability the renderer is given
//! - **Draw List** ([`draw_list`]) - A surface that records commands for replay
//! - **Compositor** ([`compositor`]) - World-to-screen mapping and the scene pass
//!
//! The compositor never owns a window or a GPU context. Callers hand it any
//! [`DrawSurface`] and it issues primitive draw calls in a fixed order.

pub mod compositor;
pub mod draw_list;
pub mod surface;

// Re-export commonly used types
pub use compositor::{FrameCompositor, ScreenTransform};
pub use draw_list::{DrawCommand, DrawList};
pub use surface::{BlendMode, Color, DrawSurface, DrawSurfaceExt, Rect, Stroke, TextBitmap};
