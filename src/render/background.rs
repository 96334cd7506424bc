use kurbo::Shape as _;

use crate::assets::decode::BackgroundImage;
use crate::composite_cpu;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::render::cpu::{bezpath_to_cpu, render_layer};
use crate::render::surface::RenderSurface;

/// Corner-to-corner gradient stops, `(offset, color)`.
pub const GRADIENT_STOPS: [(f32, Rgba8); 3] = [
    (0.0, Rgba8::from_hex(0x0F2027)),
    (0.5, Rgba8::from_hex(0x203A43)),
    (1.0, Rgba8::from_hex(0x2C5364)),
];

/// A soft circle drawn over the procedural gradient.
#[derive(Clone, Copy, Debug)]
pub struct Accent {
    /// Centre as a fraction of canvas width/height.
    pub center: (f64, f64),
    /// Radius as a fraction of canvas height.
    pub radius: f64,
    pub opacity: f32,
}

pub const ACCENTS: [Accent; 2] = [
    Accent {
        center: (0.3, 0.4),
        radius: 200.0 / 720.0,
        opacity: 0.10,
    },
    Accent {
        center: (0.7, 0.6),
        radius: 150.0 / 720.0,
        opacity: 0.08,
    },
];

/// Overlay alpha at the top and bottom edge of a photo background.
pub const OVERLAY_ALPHA: (u8, u8) = (0, 128);

/// What to paint under the text layer.
#[derive(Clone, Copy, Debug)]
pub enum Background<'a> {
    Procedural,
    Image(&'a BackgroundImage),
}

pub fn compose_background(surface: &mut RenderSurface, background: Background<'_>) -> ThumbResult<()> {
    match background {
        Background::Procedural => compose_procedural(surface),
        Background::Image(image) => compose_image(surface, image),
    }
}

/// Gradient plus accent circles. Leaves every pixel opaque.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compose_procedural(surface: &mut RenderSurface) -> ThumbResult<()> {
    let canvas = surface.canvas();
    fill_diagonal_gradient(surface.data_mut(), canvas);

    let height = f64::from(canvas.height);
    let layer = render_layer(canvas, |ctx| {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for accent in ACCENTS {
            let center = canvas.at_fraction(accent.center.0, accent.center.1);
            let circle = kurbo::Circle::new(center, accent.radius * height);
            ctx.push_opacity_layer(accent.opacity);
            ctx.fill_path(&bezpath_to_cpu(&circle.to_path(0.1)));
            ctx.pop_layer();
        }
        Ok(())
    })?;
    composite_cpu::over_in_place(surface.data_mut(), layer.data_as_u8_slice())
}

/// Stretched photo under a vertical darkening overlay.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compose_image(surface: &mut RenderSurface, image: &BackgroundImage) -> ThumbResult<()> {
    let canvas = surface.canvas();
    if image.canvas != canvas || image.rgba8_premul.len() != canvas.byte_len() {
        return Err(ThumbError::render(
            "background image was not prepared for this canvas",
        ));
    }

    let data = surface.data_mut();
    composite_cpu::fill(data, Rgba8::BLACK.premultiply().to_array());
    composite_cpu::over_in_place(data, &image.rgba8_premul)?;

    let overlay = vertical_overlay(canvas);
    composite_cpu::over_in_place(data, &overlay)
}

/// Gradient color at `t` along the diagonal, `t` in `0.0..=1.0`.
pub fn gradient_color_at(t: f32) -> Rgba8 {
    let t = t.clamp(0.0, 1.0);
    for pair in GRADIENT_STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let span = (t1 - t0).max(f32::EPSILON);
            return c0.lerp(c1, (t - t0) / span);
        }
    }
    GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1
}

/// Position of pixel `(x, y)` along the top-left to bottom-right diagonal.
pub fn diagonal_t(canvas: Canvas, x: u32, y: u32) -> f32 {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let px = f64::from(x) + 0.5;
    let py = f64::from(y) + 0.5;
    ((px * w + py * h) / (w * w + h * h)) as f32
}

fn fill_diagonal_gradient(data: &mut [u8], canvas: Canvas) {
    let width = canvas.width as usize;
    for (i, px) in data.chunks_exact_mut(4).enumerate() {
        let x = (i % width) as u32;
        let y = (i / width) as u32;
        let c = gradient_color_at(diagonal_t(canvas, x, y)).premultiply();
        px.copy_from_slice(&c.to_array());
    }
}

fn vertical_overlay(canvas: Canvas) -> Vec<u8> {
    let (top, bottom) = OVERLAY_ALPHA;
    let rows = canvas.height.max(2) - 1;
    let row_len = canvas.width as usize * 4;
    let mut out = vec![0u8; canvas.byte_len()];
    for (y, row) in out.chunks_exact_mut(row_len).enumerate() {
        let t = y as f32 / rows as f32;
        let alpha = Rgba8::BLACK
            .with_alpha(top)
            .lerp(Rgba8::BLACK.with_alpha(bottom), t)
            .a;
        for px in row.chunks_exact_mut(4) {
            px[3] = alpha;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn small() -> Canvas {
        Canvas::new(128, 72).unwrap()
    }

    #[test]
    fn gradient_hits_its_stops() {
        assert_eq!(gradient_color_at(0.0), GRADIENT_STOPS[0].1);
        assert_eq!(gradient_color_at(0.5), GRADIENT_STOPS[1].1);
        assert_eq!(gradient_color_at(1.0), GRADIENT_STOPS[2].1);
        assert_eq!(gradient_color_at(7.0), GRADIENT_STOPS[2].1);
    }

    #[test]
    fn diagonal_runs_corner_to_corner() {
        let c = Canvas::THUMBNAIL;
        assert!(diagonal_t(c, 0, 0) < 0.01);
        assert!(diagonal_t(c, 1279, 719) > 0.99);
        let mid = diagonal_t(c, 640, 360);
        assert!((mid - 0.5).abs() < 0.01);
    }

    #[test]
    fn procedural_background_is_fully_opaque() {
        let mut surface = RenderSurface::new(small());
        compose_procedural(&mut surface).unwrap();
        assert!(surface.is_opaque());
    }

    #[test]
    fn procedural_corners_follow_the_gradient() {
        let mut surface = RenderSurface::new(small());
        compose_procedural(&mut surface).unwrap();

        let tl = surface.pixel(0, 0).unwrap();
        let br = surface.pixel(127, 71).unwrap();
        let start = GRADIENT_STOPS[0].1;
        let end = GRADIENT_STOPS[2].1;
        assert!((i32::from(tl[2]) - i32::from(start.b)).abs() <= 3);
        assert!((i32::from(br[2]) - i32::from(end.b)).abs() <= 3);
    }

    #[test]
    fn accents_lighten_the_gradient_at_their_centres() {
        let canvas = small();
        let mut surface = RenderSurface::new(canvas);
        compose_procedural(&mut surface).unwrap();

        for accent in ACCENTS {
            let p = canvas.at_fraction(accent.center.0, accent.center.1);
            let (x, y) = (p.x as u32, p.y as u32);
            let plain = gradient_color_at(diagonal_t(canvas, x, y));
            let drawn = surface.pixel(x, y).unwrap();
            assert!(drawn[0] > plain.r, "accent at {x},{y} did not lighten");
        }
    }

    #[test]
    fn image_background_darkens_towards_the_bottom() {
        let canvas = small();
        let image = BackgroundImage {
            canvas,
            source_width: 1,
            source_height: 1,
            rgba8_premul: Arc::new([200u8, 40, 40, 255].repeat(canvas.pixel_count())),
        };
        let mut surface = RenderSurface::new(canvas);
        compose_image(&mut surface, &image).unwrap();

        assert!(surface.is_opaque());
        let top = surface.pixel(10, 0).unwrap();
        let bottom = surface.pixel(10, 71).unwrap();
        assert_eq!(top, [200, 40, 40, 255]);
        assert!((i32::from(bottom[0]) - 100).abs() <= 2);
    }

    #[test]
    fn image_for_another_canvas_is_rejected() {
        let image = BackgroundImage {
            canvas: Canvas::new(2, 2).unwrap(),
            source_width: 2,
            source_height: 2,
            rgba8_premul: Arc::new(vec![255; 16]),
        };
        let mut surface = RenderSurface::new(small());
        assert!(compose_image(&mut surface, &image).is_err());
        assert!(surface.is_blank());
    }
}
