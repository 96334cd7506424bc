use crate::assets::fonts::{CAPTION_WEIGHT, FontFace, FontSet, TITLE_WEIGHT};
use crate::assets::layout::{TextBrushRgba8, TextLayoutEngine, first_baseline};
use crate::blur_cpu::{blur_rgba8_premul_in_place, sigma_for_radius};
use crate::composite_cpu;
use crate::foundation::core::{BezPath, Canvas, Point, Rgba8};
use crate::foundation::error::ThumbResult;
use crate::render::surface::RenderSurface;
use crate::render::text::{TextBackend, TextPlan, TextRun};

/// Text backend rasterizing glyphs with `vello_cpu`.
///
/// The drop shadow is an offscreen layer: the title is filled in the shadow color, blurred,
/// and composited before the glyph layer.
pub struct CpuTextBackend {
    title: ShapedFace,
    caption: ShapedFace,
}

struct ShapedFace {
    face: FontFace,
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    weight: u16,
}

impl ShapedFace {
    fn new(face: &FontFace, weight: u16) -> ThumbResult<Self> {
        let engine = TextLayoutEngine::for_face(face)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
            face.index,
        );
        Ok(Self {
            face: face.clone(),
            engine,
            font,
            weight,
        })
    }

    fn layout(&mut self, run: &TextRun) -> ThumbResult<parley::Layout<TextBrushRgba8>> {
        self.engine
            .layout_line(&run.text, run.size_px, self.weight, run.color.into())
    }
}

impl CpuTextBackend {
    pub fn new(fonts: &FontSet) -> ThumbResult<Self> {
        Ok(Self {
            title: ShapedFace::new(&fonts.title, TITLE_WEIGHT)?,
            caption: ShapedFace::new(&fonts.caption, CAPTION_WEIGHT)?,
        })
    }

    /// `(family, face)` for the title and caption, for diagnostics.
    pub fn faces(&self) -> [(&str, &FontFace); 2] {
        [
            (self.title.engine.family_name(), &self.title.face),
            (self.caption.engine.family_name(), &self.caption.face),
        ]
    }
}

impl TextBackend for CpuTextBackend {
    fn draw_text(&mut self, surface: &mut RenderSurface, plan: &TextPlan) -> ThumbResult<()> {
        let canvas = surface.canvas();
        let title = self.title.layout(&plan.title)?;
        let caption = self.caption.layout(&plan.caption)?;
        let title_origin = layout_origin(plan.title.baseline, &title);
        let caption_origin = layout_origin(plan.caption.baseline, &caption);

        let title_font = &self.title.font;
        let caption_font = &self.caption.font;

        let mut shadow = render_layer(canvas, |ctx| {
            paint_layout(
                ctx,
                &title,
                title_font,
                title_origin + plan.shadow.offset,
                Some(plan.shadow.color),
            );
            Ok(())
        })?;
        blur_rgba8_premul_in_place(
            shadow.data_as_u8_slice_mut(),
            canvas,
            plan.shadow.blur_radius_px,
            sigma_for_radius(plan.shadow.blur_radius_px),
        )?;
        composite_cpu::over_in_place(surface.data_mut(), shadow.data_as_u8_slice())?;

        let glyphs = render_layer(canvas, |ctx| {
            paint_layout(ctx, &title, title_font, title_origin, None);
            paint_layout(ctx, &caption, caption_font, caption_origin, None);
            Ok(())
        })?;
        composite_cpu::over_in_place(surface.data_mut(), glyphs.data_as_u8_slice())
    }
}

/// Top-left origin that puts the layout's first baseline on `baseline`.
fn layout_origin(baseline: Point, layout: &parley::Layout<TextBrushRgba8>) -> Point {
    Point::new(baseline.x, baseline.y - f64::from(first_baseline(layout)))
}

fn paint_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    origin: Point,
    color_override: Option<Rgba8>,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let color = color_override.unwrap_or_else(|| {
                let b = run.style().brush;
                Rgba8::new(b.r, b.g, b.b, b.a)
            });
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));

            let mut x = run.offset();
            let y = run.baseline();
            let glyphs = run.glyphs().map(move |g| {
                let glyph = vello_cpu::Glyph {
                    id: g.id,
                    x: x + g.x,
                    y: y - g.y,
                };
                x += g.advance;
                glyph
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

/// Draw into a fresh transparent layer the size of `canvas`.
pub(crate) fn render_layer(
    canvas: Canvas,
    draw: impl FnOnce(&mut vello_cpu::RenderContext) -> ThumbResult<()>,
) -> ThumbResult<vello_cpu::Pixmap> {
    let (w, h) = canvas.dims_u16()?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx)?;
    ctx.flush();
    let mut layer = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut layer);
    Ok(layer)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::Shape as _;

    use super::*;

    #[test]
    fn empty_layer_is_transparent() {
        let canvas = Canvas::new(16, 8).unwrap();
        let layer = render_layer(canvas, |_| Ok(())).unwrap();
        assert_eq!(layer.width(), 16);
        assert_eq!(layer.height(), 8);
        assert!(layer.data_as_u8_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn filled_rect_covers_its_pixels_only() {
        let canvas = Canvas::new(16, 16).unwrap();
        let rect = kurbo::Rect::new(4.0, 4.0, 12.0, 12.0).to_path(0.1);
        let layer = render_layer(canvas, |ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 0, 0, 255));
            ctx.fill_path(&bezpath_to_cpu(&rect));
            Ok(())
        })
        .unwrap();

        let px = |x: usize, y: usize| {
            let i = (y * 16 + x) * 4;
            &layer.data_as_u8_slice()[i..i + 4]
        };
        assert_eq!(px(8, 8), &[255, 0, 0, 255]);
        assert_eq!(px(0, 0), &[0, 0, 0, 0]);
    }
}
