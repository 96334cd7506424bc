use crate::assets::fonts::FontFace;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ThumbError, ThumbResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Shapes single-line text against one registered face.
///
/// Each engine owns its own font collection, so the face it was built from is the only
/// candidate Parley can pick and glyph ids always match that face's bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    pub fn for_face(face: &FontFace) -> ThumbResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ThumbError::font("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ThumbError::font("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Lay out `text` on one unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        weight: u16,
        brush: TextBrushRgba8,
    ) -> ThumbResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ThumbError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

/// Distance from the layout's top edge to the first baseline.
pub fn first_baseline(layout: &parley::Layout<TextBrushRgba8>) -> f32 {
    layout
        .lines()
        .next()
        .map(|line| line.metrics().baseline)
        .unwrap_or(0.0)
}
