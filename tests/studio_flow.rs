use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thumbforge::{
    BackgroundSource, Canvas, GENERIC_FAILURE, NoSuggestions, Notice, RenderOutcome,
    RenderSurface, Studio, SuggestionSource, TextBackend, TextPlan, ThumbError, ThumbResult,
    ThumbnailRenderer, Topic,
};

struct FixedSuggestions(Vec<&'static str>);

#[async_trait::async_trait]
impl SuggestionSource for FixedSuggestions {
    async fn suggestions(&self, topic: &Topic) -> Vec<String> {
        self.0.iter().map(|s| format!("{s} {topic}")).collect()
    }
}

/// Counts draws; fails every draw while `broken` is set.
#[derive(Clone, Default)]
struct Flaky {
    broken: Arc<AtomicBool>,
    draws: Arc<std::sync::atomic::AtomicUsize>,
}

impl TextBackend for Flaky {
    fn draw_text(&mut self, surface: &mut RenderSurface, plan: &TextPlan) -> ThumbResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(ThumbError::render("glyph cache exploded"));
        }
        self.draws.fetch_add(1, Ordering::SeqCst);
        // Mark the top-left pixel so the test can tell passes apart.
        let shade = plan.title.text.len().min(255) as u8;
        surface.data_mut()[..4].copy_from_slice(&[shade, shade, shade, 255]);
        Ok(())
    }
}

fn canvas() -> Canvas {
    Canvas::new(48, 27).unwrap()
}

#[tokio::test]
async fn full_flow_produces_titles_suggestions_prompt_and_preview() {
    let renderer = ThumbnailRenderer::new(canvas(), Flaky::default());
    let mut studio = Studio::new(renderer, FixedSuggestions(vec!["mejores", "raros"]));

    let titles = studio.submit_topic("  insectos venenosos ").unwrap().clone();
    assert_eq!(titles.len(), 5);

    let suggestions = studio.refresh_suggestions().await.to_vec();
    assert_eq!(
        suggestions,
        vec!["mejores insectos venenosos", "raros insectos venenosos"]
    );

    let prompt = studio.prompt().unwrap();
    assert!(prompt.as_str().starts_with("Miniatura de YouTube sobre insectos venenosos,"));

    let outcome = studio.render_preview(titles.first()).await.unwrap();
    assert_eq!(outcome, RenderOutcome::Drawn);
    assert!(studio.surface().is_opaque());
    assert!(studio.notice().is_none());
}

#[tokio::test]
async fn blank_topic_is_rejected_before_generation() {
    let renderer = ThumbnailRenderer::new(canvas(), Flaky::default());
    let mut studio = Studio::new(renderer, NoSuggestions);

    let notice = studio.submit_topic(" \t ").unwrap_err();

    assert!(matches!(notice, Notice::Invalid(_)));
    assert!(!notice.to_string().is_empty());
    assert!(studio.titles().is_none());
    assert!(studio.prompt().is_none());
    assert!(studio.refresh_suggestions().await.is_empty());
}

#[tokio::test]
async fn unexpected_failure_keeps_the_last_good_preview() {
    let backend = Flaky::default();
    let broken = Arc::clone(&backend.broken);
    let renderer = ThumbnailRenderer::new(canvas(), backend);
    let mut studio = Studio::new(renderer, NoSuggestions);

    studio.render_preview("primero").await.unwrap();
    let good = studio.surface().clone();

    broken.store(true, Ordering::SeqCst);
    let notice = studio.render_preview("segundo intento").await.unwrap_err();

    assert_eq!(notice, Notice::Failed);
    assert_eq!(notice.to_string(), GENERIC_FAILURE);
    assert_eq!(studio.notice(), Some(&Notice::Failed));
    assert_eq!(studio.surface(), &good);

    broken.store(false, Ordering::SeqCst);
    studio.render_preview("tercero intento").await.unwrap();
    assert!(studio.notice().is_none());
    assert_ne!(studio.surface(), &good);
}

#[tokio::test]
async fn undecodable_background_keeps_the_surface_and_draws_text_once() {
    let backend = Flaky::default();
    let draws = Arc::clone(&backend.draws);
    let renderer = ThumbnailRenderer::new(canvas(), backend);
    let mut studio = Studio::new(renderer, NoSuggestions);

    studio.render_preview("hola").await.unwrap();
    let before = studio.surface().clone();
    assert_eq!(draws.load(Ordering::SeqCst), 1);

    studio.set_background(BackgroundSource::from_bytes(b"GIF89a garbage".to_vec()));
    let outcome = studio.render_preview("hola").await.unwrap();

    assert_eq!(outcome, RenderOutcome::DecodeFailed);
    assert_eq!(studio.surface(), &before);
    assert_eq!(draws.load(Ordering::SeqCst), 1);
    assert!(studio.notice().is_none());
}

#[tokio::test]
async fn data_url_backgrounds_render() {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 255, 255]));
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    use base64::Engine as _;
    let url = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    );

    let renderer = ThumbnailRenderer::new(canvas(), Flaky::default());
    let mut studio = Studio::new(renderer, NoSuggestions);
    studio.set_background_data_url(&url).unwrap();

    let outcome = studio.render_preview("azul").await.unwrap();
    assert_eq!(outcome, RenderOutcome::Drawn);
    let px = studio.surface().pixel(20, 1).unwrap();
    assert!(px[2] > 240 && px[0] == 0, "{px:?}");
}
