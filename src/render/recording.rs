//! Surface that records draw calls instead of rasterizing them.

use super::{Color, ImageInfo, Surface};
use crate::viewport::PixelRect;

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Image(PixelRect),
    Stroke(PixelRect, Color),
    Fill(PixelRect, Color),
}

/// In-memory surface for tests and headless hosts.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Commands since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Stroked rectangles since the last clear, in draw order.
    pub fn strokes(&self) -> Vec<(PixelRect, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Stroke(rect, color) => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles since the last clear, in draw order.
    pub fn fills(&self) -> Vec<(PixelRect, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Fill(rect, color) => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    type Image = ImageInfo;

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_image(&mut self, _image: &ImageInfo, dest: PixelRect) {
        self.commands.push(DrawCommand::Image(dest));
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color) {
        self.commands.push(DrawCommand::Stroke(rect, color));
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }
}
