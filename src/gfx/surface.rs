//! Drawing capability injected into the compositor
//!
//! The renderer never talks to a graphics library directly. Everything it
//! draws goes through [`DrawSurface`], so a window backend, an offscreen
//! rasterizer or the recording [`DrawList`](super::draw_list::DrawList) can
//! sit behind it.

/// 8-bit RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Sum of the color channels, used as a brightness measure
    pub fn luminance_sum(&self) -> u32 {
        self.r as u32 + self.g as u32 + self.b as u32
    }
}

/// Integer pixel rectangle, origin at top-left
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Fill or outline of a given pixel width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stroke {
    Fill,
    Outline(u32),
}

/// How a full-canvas overlay combines with what is already drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Plain alpha blending
    Alpha,
    /// Channel-wise subtraction, used for the trail fade
    Subtract,
}

/// Rendered text ready to be blitted
#[derive(Clone, Debug, PartialEq)]
pub struct TextBitmap {
    pub text: String,
    pub color: Color,
    pub font_size: u32,
    pub width: u32,
    pub height: u32,
}

/// Rendering primitives the compositor and widget drawing rely on
pub trait DrawSurface {
    /// Drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// Adopts a new drawable size after the window changed
    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self, color: Color);

    fn draw_circle(&mut self, center: (i32, i32), radius: i32, color: Color, stroke: Stroke);

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Color, width: u32);

    /// Draws a rectangle, optionally with rounded corners.
    ///
    /// Returns `false` without drawing anything when `corner_radius > 0` and
    /// the surface cannot round corners.
    fn draw_rect(&mut self, rect: Rect, color: Color, stroke: Stroke, corner_radius: u32) -> bool;

    fn render_text(&mut self, text: &str, font_size: u32, color: Color) -> TextBitmap;

    fn blit(&mut self, bitmap: &TextBitmap, position: (i32, i32));

    /// Blends `color` over the whole canvas
    fn blend_fill(&mut self, color: Color, mode: BlendMode);

    /// Shows the finished frame
    fn present(&mut self);
}

/// Convenience helpers available on every [`DrawSurface`]
pub trait DrawSurfaceExt: DrawSurface {
    /// Rounded rectangle with a plain-rectangle fallback
    fn rounded_rect(&mut self, rect: Rect, color: Color, stroke: Stroke, corner_radius: u32) {
        if !self.draw_rect(rect, color, stroke, corner_radius) {
            self.draw_rect(rect, color, stroke, 0);
        }
    }

    /// Renders and blits text in one step, returning the bitmap for layout
    fn draw_text(&mut self, text: &str, font_size: u32, color: Color, position: (i32, i32)) -> TextBitmap {
        let bitmap = self.render_text(text, font_size, color);
        self.blit(&bitmap, position);
        bitmap
    }

    /// Draws text centered inside `rect`
    fn draw_text_centered(&mut self, text: &str, font_size: u32, color: Color, rect: Rect) {
        let bitmap = self.render_text(text, font_size, color);
        let (cx, cy) = rect.center();
        let position = (cx - bitmap.width as i32 / 2, cy - bitmap.height as i32 / 2);
        self.blit(&bitmap, position);
    }
}

impl<T: DrawSurface + ?Sized> DrawSurfaceExt for T {}
