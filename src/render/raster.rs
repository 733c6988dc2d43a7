//! CPU raster surface backed by an `image::RgbaImage`.

use std::path::Path;
use std::rc::Rc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use super::{Color, Surface};
use crate::viewport::PixelRect;

/// Errors from loading or saving raster images.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Image could not be decoded or encoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Surface with zero width or height
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Renders the editor into an in-memory RGBA buffer.
pub struct RasterSurface {
    canvas: RgbaImage,
    background: Color,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        Ok(Self {
            canvas: RgbaImage::from_pixel(width, height, Rgba(background.to_rgba())),
            background,
        })
    }

    /// Decode an image file into a shareable handle.
    pub fn load_image(path: &Path) -> Result<Rc<RgbaImage>, RenderError> {
        let img = image::open(path)?.to_rgba8();
        log::debug!(
            "Loaded image {:?} ({}x{})",
            path,
            img.width(),
            img.height()
        );
        Ok(Rc::new(img))
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// Write the canvas to disk; format is picked from the extension.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.canvas.save(path)?;
        log::info!("Saved render to {:?}", path);
        Ok(())
    }

    /// Pixel-space bounds of `rect` clipped to the canvas, as half-open ranges.
    fn clip(&self, rect: PixelRect) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = (f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        let x0 = rect.x.round().clamp(0.0, w);
        let y0 = rect.y.round().clamp(0.0, h);
        let x1 = rect.right().round().clamp(0.0, w);
        let y1 = rect.bottom().round().clamp(0.0, h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl Surface for RasterSurface {
    type Image = Rc<RgbaImage>;

    fn size(&self) -> (f64, f64) {
        (
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }

    fn clear(&mut self) {
        let px = Rgba(self.background.to_rgba());
        for pixel in self.canvas.pixels_mut() {
            *pixel = px;
        }
    }

    fn draw_image(&mut self, image: &Rc<RgbaImage>, dest: PixelRect) {
        let width = dest.width.round() as u32;
        let height = dest.height.round() as u32;
        if width == 0 || height == 0 {
            return;
        }
        let scaled = imageops::resize(image.as_ref(), width, height, FilterType::Triangle);
        imageops::overlay(
            &mut self.canvas,
            &scaled,
            dest.x.round() as i64,
            dest.y.round() as i64,
        );
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color) {
        // Outline as four one-pixel fills; a zero-width side still draws a line
        let width = rect.width.max(1.0);
        let height = rect.height.max(1.0);
        self.fill_rect(PixelRect::new(rect.x, rect.y, width, 1.0), color);
        self.fill_rect(PixelRect::new(rect.x, rect.bottom() - 1.0, width, 1.0), color);
        self.fill_rect(PixelRect::new(rect.x, rect.y, 1.0, height), color);
        self.fill_rect(PixelRect::new(rect.right() - 1.0, rect.y, 1.0, height), color);
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let px = Rgba(color.to_rgba());
        for y in y0..y1 {
            for x in x0..x1 {
                self.canvas.put_pixel(x, y, px);
            }
        }
    }
}
