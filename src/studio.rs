//! Caller-owned application state and the user-facing error boundary.
//!
//! Every operation either succeeds or leaves titles, suggestions and the preview surface at
//! their last good values and records a [`Notice`] for the user.

use crate::assets::source::BackgroundSource;
use crate::foundation::error::ThumbError;
use crate::prompt::ThumbnailPrompt;
use crate::render::cpu::CpuTextBackend;
use crate::render::renderer::{RenderOutcome, RenderRequest, ThumbnailRenderer};
use crate::render::surface::RenderSurface;
use crate::render::text::TextBackend;
use crate::suggest::SuggestionSource;
use crate::titles::{self, TitleVariants, Topic};

/// Shown for every failure that is not the user's input.
pub const GENERIC_FAILURE: &str = "Algo salió mal. Inténtalo de nuevo.";

/// Single user-visible message produced by a failed operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    #[error("{0}")]
    Invalid(String),
    #[error("{}", GENERIC_FAILURE)]
    Failed,
}

impl Notice {
    /// Validation errors keep their message; everything else becomes [`Notice::Failed`].
    pub fn from_error(err: &ThumbError) -> Self {
        match err {
            ThumbError::Validation(msg) => Self::Invalid(msg.clone()),
            _ => Self::Failed,
        }
    }
}

pub struct Studio<S: SuggestionSource, B: TextBackend = CpuTextBackend> {
    renderer: ThumbnailRenderer<B>,
    suggestions: S,
    surface: RenderSurface,
    topic: Option<Topic>,
    titles: Option<TitleVariants>,
    suggested: Vec<String>,
    background: BackgroundSource,
    notice: Option<Notice>,
}

impl<S: SuggestionSource, B: TextBackend> Studio<S, B> {
    pub fn new(renderer: ThumbnailRenderer<B>, suggestions: S) -> Self {
        let surface = RenderSurface::new(renderer.canvas());
        Self {
            renderer,
            suggestions,
            surface,
            topic: None,
            titles: None,
            suggested: Vec::new(),
            background: BackgroundSource::Procedural,
            notice: None,
        }
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn renderer(&self) -> &ThumbnailRenderer<B> {
        &self.renderer
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    pub fn titles(&self) -> Option<&TitleVariants> {
        self.titles.as_ref()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggested
    }

    pub fn background(&self) -> &BackgroundSource {
        &self.background
    }

    /// Message left by the last operation, if it failed.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Validate `raw` and generate titles for it.
    pub fn submit_topic(&mut self, raw: &str) -> Result<&TitleVariants, Notice> {
        let topic = match Topic::parse(raw) {
            Ok(topic) => topic,
            Err(err) => return Err(self.fail(&err)),
        };
        let titles = titles::generate(&topic);
        tracing::info!(topic = %topic, "titles generated");
        self.topic = Some(topic);
        self.notice = None;
        Ok(self.titles.insert(titles))
    }

    /// Generate again for the current topic. Output is identical to the previous call.
    pub fn regenerate(&mut self) -> Result<&TitleVariants, Notice> {
        let Some(topic) = self.topic.as_ref() else {
            return Err(self.fail(&ThumbError::validation("Escribe un tema para generar títulos.")));
        };
        let titles = titles::generate(topic);
        self.notice = None;
        Ok(self.titles.insert(titles))
    }

    /// Ask the suggestions source about the current topic. Empty without a topic.
    pub async fn refresh_suggestions(&mut self) -> &[String] {
        self.suggested = match self.topic.as_ref() {
            Some(topic) => self.suggestions.suggestions(topic).await,
            None => Vec::new(),
        };
        &self.suggested
    }

    pub fn prompt(&self) -> Option<ThumbnailPrompt> {
        self.topic.as_ref().map(ThumbnailPrompt::for_topic)
    }

    /// Use `source` for subsequent previews.
    pub fn set_background(&mut self, source: BackgroundSource) {
        self.background = source;
    }

    /// Parse a `data:image/...;base64,` URL and use it as the background.
    pub fn set_background_data_url(&mut self, url: &str) -> Result<(), Notice> {
        match BackgroundSource::from_data_url(url) {
            Ok(source) => {
                self.background = source;
                self.notice = None;
                Ok(())
            }
            Err(err) => Err(self.fail(&err)),
        }
    }

    /// Render `title` over the current background into the preview surface.
    pub async fn render_preview(&mut self, title: &str) -> Result<RenderOutcome, Notice> {
        let request = RenderRequest::new(title, self.background.clone());
        match self.renderer.render(&mut self.surface, request).await {
            Ok(outcome) => {
                self.notice = None;
                Ok(outcome)
            }
            Err(err) => Err(self.fail(&err)),
        }
    }

    /// Redraw the preview text after a title edit, reusing the composed background.
    pub fn retitle(&mut self, title: &str) -> Result<bool, Notice> {
        match self.renderer.retitle(&mut self.surface, title) {
            Ok(drawn) => Ok(drawn),
            Err(err) => Err(self.fail(&err)),
        }
    }

    fn fail(&mut self, err: &ThumbError) -> Notice {
        if err.is_validation() {
            tracing::debug!(error = %err, "rejected input");
        } else {
            tracing::error!(error = %err, "operation failed");
        }
        let notice = Notice::from_error(err);
        self.notice = Some(notice.clone());
        notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Canvas;
    use crate::foundation::error::ThumbResult;
    use crate::render::text::TextPlan;
    use crate::suggest::NoSuggestions;

    struct Blank;

    impl TextBackend for Blank {
        fn draw_text(&mut self, _: &mut RenderSurface, _: &TextPlan) -> ThumbResult<()> {
            Ok(())
        }
    }

    fn studio() -> Studio<NoSuggestions, Blank> {
        let canvas = Canvas::new(32, 18).unwrap();
        Studio::new(ThumbnailRenderer::new(canvas, Blank), NoSuggestions)
    }

    #[test]
    fn notice_messages() {
        assert_eq!(Notice::Failed.to_string(), GENERIC_FAILURE);
        assert_eq!(
            Notice::from_error(&ThumbError::validation("falta el tema")).to_string(),
            "falta el tema"
        );
        assert_eq!(Notice::from_error(&ThumbError::render("boom")), Notice::Failed);
    }

    #[test]
    fn blank_topic_keeps_previous_titles() {
        let mut s = studio();
        let first = s.submit_topic("gatos").unwrap().clone();
        let err = s.submit_topic("   ").unwrap_err();
        assert!(matches!(err, Notice::Invalid(_)));
        assert_eq!(s.notice(), Some(&err));
        assert_eq!(s.titles(), Some(&first));
        assert_eq!(s.topic().map(Topic::as_str), Some("gatos"));
    }

    #[test]
    fn regenerate_is_deterministic() {
        let mut s = studio();
        assert!(s.regenerate().is_err());
        let first = s.submit_topic("drones").unwrap().clone();
        assert_eq!(s.regenerate().unwrap(), &first);
        assert!(s.notice().is_none());
    }

    #[test]
    fn bad_data_url_is_a_validation_notice() {
        let mut s = studio();
        let err = s.set_background_data_url("data:text/plain;base64,aGk=").unwrap_err();
        assert!(matches!(err, Notice::Invalid(_)));
        assert!(s.background().is_procedural());
    }

    #[tokio::test]
    async fn preview_draws_into_the_owned_surface() {
        let mut s = studio();
        assert!(s.surface().is_blank());
        let outcome = s.render_preview("hola").await.unwrap();
        assert_eq!(outcome, RenderOutcome::Drawn);
        assert!(s.surface().is_opaque());
        assert!(s.retitle("hola!").unwrap());
        assert!(s.refresh_suggestions().await.is_empty());
    }
}
