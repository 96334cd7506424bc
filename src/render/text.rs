use crate::foundation::core::{Canvas, Point, Rgba8, Vec2};
use crate::foundation::error::ThumbResult;
use crate::render::surface::RenderSurface;

/// Titles longer than this many characters are cut and get [`ELLIPSIS`] appended.
pub const TITLE_MAX_CHARS: usize = 25;
pub const ELLIPSIS: &str = "...";
/// Fixed hook drawn under the title.
pub const CAPTION: &str = "¡No te lo pierdas!";

pub const TITLE_SIZE_PX: f32 = 72.0;
pub const CAPTION_SIZE_PX: f32 = 36.0;
/// Title baseline distance from the left and bottom edges.
pub const TITLE_INSET: Vec2 = Vec2::new(80.0, 160.0);
/// Caption baseline distance below the title baseline.
pub const CAPTION_GAP_PX: f64 = 60.0;

pub const SHADOW_BLUR_PX: u32 = 14;

/// Rasterizes a [`TextPlan`] onto a surface.
///
/// Implementations draw over whatever is already on the surface and must not clear it.
pub trait TextBackend {
    fn draw_text(&mut self, surface: &mut RenderSurface, plan: &TextPlan) -> ThumbResult<()>;
}

impl<T: TextBackend + ?Sized> TextBackend for Box<T> {
    fn draw_text(&mut self, surface: &mut RenderSurface, plan: &TextPlan) -> ThumbResult<()> {
        (**self).draw_text(surface, plan)
    }
}

/// One line of text with its baseline anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub size_px: f32,
    /// Left end of the baseline, in canvas pixels.
    pub baseline: Point,
    pub color: Rgba8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowSpec {
    pub color: Rgba8,
    pub blur_radius_px: u32,
    pub offset: Vec2,
}

/// Everything the text layer draws, decided up front and independent of fonts.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPlan {
    pub title: TextRun,
    pub caption: TextRun,
    /// Applied to the title only.
    pub shadow: ShadowSpec,
}

impl TextPlan {
    pub fn for_title(title: &str, canvas: Canvas) -> Self {
        let title_baseline = Point::new(
            TITLE_INSET.x,
            f64::from(canvas.height) - TITLE_INSET.y,
        );
        Self {
            title: TextRun {
                text: display_title(title),
                size_px: TITLE_SIZE_PX,
                baseline: title_baseline,
                color: Rgba8::WHITE,
            },
            caption: TextRun {
                text: CAPTION.to_string(),
                size_px: CAPTION_SIZE_PX,
                baseline: title_baseline + Vec2::new(0.0, CAPTION_GAP_PX),
                color: Rgba8::WHITE.with_alpha(217),
            },
            shadow: ShadowSpec {
                color: Rgba8::BLACK.with_alpha(178),
                blur_radius_px: SHADOW_BLUR_PX,
                offset: Vec2::new(0.0, 4.0),
            },
        }
    }
}

/// Title as drawn: cut to [`TITLE_MAX_CHARS`] characters plus [`ELLIPSIS`] when longer,
/// then upper-cased. The input is left untouched.
pub fn display_title(title: &str) -> String {
    let mut chars = title.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    let shown = if chars.next().is_some() {
        format!("{head}{ELLIPSIS}")
    } else {
        head
    };
    shown.to_uppercase()
}

/// Draw the title block for `title`. Always the last step of a render pass.
pub fn compose_text<B: TextBackend + ?Sized>(
    surface: &mut RenderSurface,
    title: &str,
    backend: &mut B,
) -> ThumbResult<TextPlan> {
    let plan = TextPlan::for_title(title, surface.canvas());
    backend.draw_text(surface, &plan)?;
    Ok(plan)
}
