use crate::foundation::error::{ThumbError, ThumbResult};

pub use kurbo::{BezPath, Point, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed thumbnail size every preview is rendered at.
    pub const THUMBNAIL: Canvas = Canvas {
        width: 1280,
        height: 720,
    };

    /// Create a validated canvas. Both sides must be non-zero and fit a `u16` pixmap.
    pub fn new(width: u32, height: u32) -> ThumbResult<Self> {
        if width == 0 || height == 0 {
            return Err(ThumbError::validation("canvas dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(ThumbError::validation("canvas dimensions must fit in u16"));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Length of a tightly packed RGBA8 buffer for this canvas.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * 4
    }

    /// Point at fractional coordinates of the canvas (`0.0..=1.0` on each axis).
    pub fn at_fraction(self, fx: f64, fy: f64) -> Point {
        Point::new(f64::from(self.width) * fx, f64::from(self.height) * fy)
    }

    pub(crate) fn dims_u16(self) -> ThumbResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| ThumbError::render("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| ThumbError::render("canvas height exceeds u16"))?;
        Ok((w, h))
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 255,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn premultiply(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// Componentwise linear interpolation, `t` clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Rgba8, t: f32) -> Rgba8 {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f32::from(a);
            let bf = f32::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgba8 {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_canvas_is_1280_by_720() {
        assert_eq!(Canvas::THUMBNAIL.width, 1280);
        assert_eq!(Canvas::THUMBNAIL.height, 720);
        assert_eq!(Canvas::THUMBNAIL.byte_len(), 1280 * 720 * 4);
    }

    #[test]
    fn canvas_rejects_zero_and_oversized() {
        assert!(Canvas::new(0, 10).is_err());
        assert!(Canvas::new(10, 0).is_err());
        assert!(Canvas::new(70_000, 10).is_err());
        assert!(Canvas::new(64, 36).is_ok());
    }

    #[test]
    fn at_fraction_scales_both_axes() {
        let p = Canvas::THUMBNAIL.at_fraction(0.3, 0.4);
        assert_eq!(p, Point::new(384.0, 288.0));
    }

    #[test]
    fn from_hex_splits_channels() {
        assert_eq!(Rgba8::from_hex(0x0F2027), Rgba8::new(0x0F, 0x20, 0x27, 255));
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgba8::new(0, 10, 20, 255);
        let b = Rgba8::new(100, 110, 120, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba8::new(50, 60, 70, 255));
    }

    #[test]
    fn premultiply_scales_color_by_alpha() {
        let p = Rgba8::WHITE.with_alpha(128).premultiply();
        assert_eq!(p.to_array(), [128, 128, 128, 128]);
        assert_eq!(Rgba8::BLACK.premultiply().to_array(), [0, 0, 0, 255]);
    }
}
