//! Recording draw surface
//!
//! [`DrawList`] implements [`DrawSurface`] by appending [`DrawCommand`]s. A
//! presenter replays the list on its own backend; tests inspect it directly.

use super::surface::{BlendMode, Color, DrawSurface, Rect, Stroke, TextBitmap};

/// One recorded drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Circle {
        center: (i32, i32),
        radius: i32,
        color: Color,
        stroke: Stroke,
    },
    Line {
        from: (i32, i32),
        to: (i32, i32),
        color: Color,
        width: u32,
    },
    Rect {
        rect: Rect,
        color: Color,
        stroke: Stroke,
        corner_radius: u32,
    },
    Text {
        bitmap: TextBitmap,
        position: (i32, i32),
    },
    Blend {
        color: Color,
        mode: BlendMode,
    },
    Present,
}

/// Command-recording surface
pub struct DrawList {
    size: (u32, u32),
    rounded_corners: bool,
    commands: Vec<DrawCommand>,
    frames_presented: u64,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            rounded_corners: true,
            commands: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Disables rounded rectangles so callers exercise their fallback path
    pub fn without_rounded_corners(mut self) -> Self {
        self.rounded_corners = false;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hands the recorded commands to the caller and starts a fresh list
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Text of every blitted bitmap, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { bitmap, .. } => Some(bitmap.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for DrawList {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_circle(&mut self, center: (i32, i32), radius: i32, color: Color, stroke: Stroke) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            stroke,
        });
    }

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Color, width: u32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, stroke: Stroke, corner_radius: u32) -> bool {
        if corner_radius > 0 && !self.rounded_corners {
            return false;
        }
        self.commands.push(DrawCommand::Rect {
            rect,
            color,
            stroke,
            corner_radius,
        });
        true
    }

    fn render_text(&mut self, text: &str, font_size: u32, color: Color) -> TextBitmap {
        // Fixed-advance estimate: half an em per character.
        let advance = (font_size / 2).max(1);
        TextBitmap {
            text: text.to_string(),
            color,
            font_size,
            width: advance * text.chars().count() as u32,
            height: font_size,
        }
    }

    fn blit(&mut self, bitmap: &TextBitmap, position: (i32, i32)) {
        self.commands.push(DrawCommand::Text {
            bitmap: bitmap.clone(),
            position,
        });
    }

    fn blend_fill(&mut self, color: Color, mode: BlendMode) {
        self.commands.push(DrawCommand::Blend { color, mode });
    }

    fn present(&mut self) {
        self.frames_presented += 1;
        self.commands.push(DrawCommand::Present);
    }
}
