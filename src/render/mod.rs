//! Drawing surface abstraction and region styling.
//!
//! The controller never owns a window or a canvas. It draws through the
//! [`Surface`] trait, which the host implements on top of whatever it renders
//! with. Two implementations ship with the crate: [`RasterSurface`] renders
//! into an RGBA buffer, [`RecordingSurface`] records draw calls for tests.

mod raster;
mod recording;

pub use raster::{RasterSurface, RenderError};
pub use recording::{DrawCommand, RecordingSurface};

use serde::{Deserialize, Serialize};

use crate::viewport::PixelRect;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GREEN: Color = Color::rgb(0x00, 0xFF, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GRAY: Color = Color::rgb(0x66, 0x66, 0x66);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b]
    }
}

/// Stroke colors for the four region states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Selected region and its markers
    #[serde(default = "default_selected")]
    pub selected: Color,
    /// Hovered, non-selected region
    #[serde(default = "default_focused")]
    pub focused: Color,
    /// Every other region
    #[serde(default = "default_neutral")]
    pub neutral: Color,
    /// Region currently being drawn
    #[serde(default = "default_editing")]
    pub editing: Color,
}

fn default_selected() -> Color {
    Color::GREEN
}

fn default_focused() -> Color {
    Color::BLUE
}

fn default_neutral() -> Color {
    Color::GRAY
}

fn default_editing() -> Color {
    Color::RED
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            selected: default_selected(),
            focused: default_focused(),
            neutral: default_neutral(),
            editing: default_editing(),
        }
    }
}

/// Anything with pixel dimensions that a surface can draw as the base image.
pub trait ImageSize {
    fn dimensions(&self) -> (u32, u32);
}

impl<T: ImageSize + ?Sized> ImageSize for std::rc::Rc<T> {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}

impl ImageSize for image::RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Bare image dimensions, for hosts that draw the image themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl ImageSize for ImageInfo {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A 2D drawing target supplied by the host.
pub trait Surface {
    /// Image type the host draws as the background.
    type Image: ImageSize;

    /// Surface size in pixels.
    fn size(&self) -> (f64, f64);

    /// Erase everything.
    fn clear(&mut self);

    /// Draw the base image scaled into `dest`.
    fn draw_image(&mut self, image: &Self::Image, dest: PixelRect);

    /// Draw a one-pixel outline.
    fn stroke_rect(&mut self, rect: PixelRect, color: Color);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: PixelRect, color: Color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#00FF00"), Some(Color::GREEN));
        assert_eq!(Color::from_hex("666666"), Some(Color::GRAY));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
    }

    #[test]
    fn test_palette_serializes_as_rgb_arrays() {
        let json = serde_json::to_string(&Palette::default()).unwrap();
        assert!(json.contains("\"selected\":[0,255,0]"));

        let palette: Palette = serde_json::from_str(r#"{"selected": [1, 2, 3]}"#).unwrap();
        assert_eq!(palette.selected, Color::rgb(1, 2, 3));
        assert_eq!(palette.editing, Color::RED);
    }

    #[test]
    fn test_rc_image_size() {
        let image = std::rc::Rc::new(ImageInfo::new(640, 480));
        assert_eq!(image.dimensions(), (640, 480));
    }
}
