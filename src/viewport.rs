//! Letterbox mapping between surface pixels and normalized image space.
//!
//! The drawing surface rarely has the image's aspect ratio. The image is
//! scaled uniformly to fit, centered, and surrounded by margins that are at
//! least `min_margin` pixels on each side. The same mapping is used for
//! hit-testing pointer input and for drawing, so it must be recomputed
//! whenever the surface is resized or a new image is loaded.

use crate::model::Rectangle;

/// Rectangle in surface pixels. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned from `(x, y)` by a signed extent.
    ///
    /// A negative `dx`/`dy` extends left/up from the origin.
    pub fn from_signed(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self::new(x.min(x + dx), y.min(y + dy), dx.abs(), dy.abs())
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Margins and scaled image extent within a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Letterbox {
    pub margin_left: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    /// Scaled image width in surface pixels
    pub image_width: f64,
    /// Scaled image height in surface pixels
    pub image_height: f64,
}

impl Letterbox {
    /// Fit an image into a surface.
    ///
    /// Returns `None` when the image has no area (nothing to fit).
    pub fn compute(
        surface_width: f64,
        surface_height: f64,
        image_width: f64,
        image_height: f64,
        min_margin: f64,
    ) -> Option<Self> {
        if image_width <= 0.0 || image_height <= 0.0 {
            return None;
        }

        let ratio = (surface_width / image_width).min(surface_height / image_height);

        let margin_horizontal = (surface_width - image_width * ratio).max(min_margin * 2.0);
        let margin_vertical = (surface_height - image_height * ratio).max(min_margin * 2.0);

        let margin_top = margin_vertical / 2.0;
        let margin_left = margin_horizontal / 2.0;

        Some(Self {
            margin_left,
            margin_top,
            margin_right: margin_horizontal - margin_left,
            margin_bottom: margin_vertical - margin_top,
            image_width: surface_width - margin_horizontal,
            image_height: surface_height - margin_vertical,
        })
    }

    /// Surface x coordinate to normalized image x, clamped to `[0, 1]`.
    pub fn x_ratio(&self, offset_x: f64) -> f64 {
        normalize(offset_x - self.margin_left, self.image_width)
    }

    /// Surface y coordinate to normalized image y, clamped to `[0, 1]`.
    pub fn y_ratio(&self, offset_y: f64) -> f64 {
        normalize(offset_y - self.margin_top, self.image_height)
    }

    /// Normalized image x to surface x.
    pub fn surface_x(&self, x: f64) -> f64 {
        x * self.image_width + self.margin_left
    }

    /// Normalized image y to surface y.
    pub fn surface_y(&self, y: f64) -> f64 {
        y * self.image_height + self.margin_top
    }

    /// Where the image itself is drawn.
    pub fn image_bounds(&self) -> PixelRect {
        PixelRect::new(
            self.margin_left,
            self.margin_top,
            self.image_width,
            self.image_height,
        )
    }

    /// A normalized rectangle scaled into surface pixels.
    pub fn project(&self, rect: &Rectangle) -> PixelRect {
        PixelRect::new(
            self.surface_x(rect.left()),
            self.surface_y(rect.top()),
            rect.width() * self.image_width,
            rect.height() * self.image_height,
        )
    }
}

fn normalize(offset: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    (offset / extent).clamp(0.0, 1.0)
}
