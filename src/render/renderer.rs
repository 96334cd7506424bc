use tokio::task::JoinHandle;

use crate::assets::decode::{BackgroundImage, decode_background};
use crate::assets::fonts::FontSet;
use crate::assets::source::{BackgroundKey, BackgroundSource};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::render::background::{Background, compose_background};
use crate::render::cpu::CpuTextBackend;
use crate::render::surface::RenderSurface;
use crate::render::text::{TextBackend, compose_text};

/// Identifies one render invocation. Later requests always carry larger tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderToken(u64);

impl RenderToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub title: String,
    pub background: BackgroundSource,
}

impl RenderRequest {
    pub fn new(title: impl Into<String>, background: BackgroundSource) -> Self {
        Self {
            title: title.into(),
            background,
        }
    }
}

/// Result of [`ThumbnailRenderer::request`].
#[derive(Debug)]
pub enum RenderTicket {
    /// The pass finished synchronously.
    Drawn(RenderToken),
    /// An image is decoding; hand this to [`ThumbnailRenderer::complete`].
    Pending(PendingRender),
}

impl RenderTicket {
    pub fn token(&self) -> RenderToken {
        match self {
            Self::Drawn(token) => *token,
            Self::Pending(pending) => pending.token,
        }
    }
}

/// A render suspended on an image decode.
///
/// Dropping it abandons the pass; nothing is drawn for it.
#[derive(Debug)]
pub struct PendingRender {
    token: RenderToken,
    key: BackgroundKey,
    decode: JoinHandle<ThumbResult<BackgroundImage>>,
}

impl PendingRender {
    pub fn token(&self) -> RenderToken {
        self.token
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Drawn,
    /// A newer request was issued while this one was decoding; its result was dropped.
    Superseded,
    /// The image could not be decoded. The surface was left as it was.
    DecodeFailed,
}

struct CachedBackground {
    key: BackgroundKey,
    pixels: RenderSurface,
}

/// Draws thumbnails into a caller-owned [`RenderSurface`].
///
/// Each pass composes the background and then the text layer on a scratch frame, and only
/// copies the frame to the caller's surface once both steps succeeded.
pub struct ThumbnailRenderer<B: TextBackend = CpuTextBackend> {
    canvas: Canvas,
    backend: B,
    next_token: u64,
    latest: Option<RenderToken>,
    title: String,
    background: Option<CachedBackground>,
}

impl ThumbnailRenderer<CpuTextBackend> {
    pub fn with_fonts(canvas: Canvas, fonts: &FontSet) -> ThumbResult<Self> {
        Ok(Self::new(canvas, CpuTextBackend::new(fonts)?))
    }
}

impl<B: TextBackend> ThumbnailRenderer<B> {
    pub fn new(canvas: Canvas, backend: B) -> Self {
        Self {
            canvas,
            backend,
            next_token: 0,
            latest: None,
            title: String::new(),
            background: None,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Most recently issued token, if any.
    pub fn latest_token(&self) -> Option<RenderToken> {
        self.latest
    }

    /// Title drawn by the current pass.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Start a render pass.
    ///
    /// Procedural and already-composed backgrounds are drawn before returning. An encoded
    /// image is decoded on the blocking pool, so this must run inside a Tokio runtime.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn request(
        &mut self,
        surface: &mut RenderSurface,
        request: RenderRequest,
    ) -> ThumbResult<RenderTicket> {
        self.check_surface(surface)?;
        let token = self.issue_token();
        self.title = request.title;

        let key = request.background.key();
        if self.background.as_ref().is_some_and(|c| c.key == key) {
            tracing::debug!(token = token.0, "reusing composed background");
            self.redraw(surface)?;
            return Ok(RenderTicket::Drawn(token));
        }

        match request.background {
            BackgroundSource::Procedural => {
                let mut pixels = RenderSurface::new(self.canvas);
                compose_background(&mut pixels, Background::Procedural)?;
                self.background = Some(CachedBackground { key, pixels });
                self.redraw(surface)?;
                Ok(RenderTicket::Drawn(token))
            }
            BackgroundSource::Encoded(bytes) => {
                let canvas = self.canvas;
                let decode = tokio::task::spawn_blocking(move || decode_background(&bytes, canvas));
                tracing::debug!(token = token.0, "background decode started");
                Ok(RenderTicket::Pending(PendingRender { token, key, decode }))
            }
        }
    }

    /// Finish a pass started by [`request`](Self::request).
    ///
    /// Nothing is drawn when a newer request was issued in the meantime or the decode failed.
    #[tracing::instrument(level = "debug", skip_all, fields(token = pending.token.0))]
    pub async fn complete(
        &mut self,
        surface: &mut RenderSurface,
        pending: PendingRender,
    ) -> ThumbResult<RenderOutcome> {
        self.check_surface(surface)?;
        let PendingRender { token, key, decode } = pending;

        let decoded = match decode.await {
            Ok(result) => result,
            Err(join) => Err(ThumbError::decode(format!("decode task failed: {join}"))),
        };

        if self.latest != Some(token) {
            tracing::debug!("discarding superseded render");
            return Ok(RenderOutcome::Superseded);
        }

        let image = match decoded {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(error = %err, "background image could not be decoded");
                return Ok(RenderOutcome::DecodeFailed);
            }
        };

        let mut pixels = RenderSurface::new(self.canvas);
        compose_background(&mut pixels, Background::Image(&image))?;
        self.background = Some(CachedBackground { key, pixels });
        self.redraw(surface)?;
        Ok(RenderOutcome::Drawn)
    }

    /// [`request`](Self::request) followed by [`complete`](Self::complete) when needed.
    pub async fn render(
        &mut self,
        surface: &mut RenderSurface,
        request: RenderRequest,
    ) -> ThumbResult<RenderOutcome> {
        match self.request(surface, request)? {
            RenderTicket::Drawn(_) => Ok(RenderOutcome::Drawn),
            RenderTicket::Pending(pending) => self.complete(surface, pending).await,
        }
    }

    /// Redraw the text layer over the last composed background.
    ///
    /// Issues no token, so a decode in flight still lands and picks up this title.
    /// Returns `false` when no background has been composed yet.
    pub fn retitle(&mut self, surface: &mut RenderSurface, title: &str) -> ThumbResult<bool> {
        self.check_surface(surface)?;
        self.title = title.to_string();
        if self.background.is_none() {
            return Ok(false);
        }
        self.redraw(surface)?;
        Ok(true)
    }

    fn issue_token(&mut self) -> RenderToken {
        self.next_token += 1;
        let token = RenderToken(self.next_token);
        self.latest = Some(token);
        token
    }

    fn check_surface(&self, surface: &RenderSurface) -> ThumbResult<()> {
        let got = surface.canvas();
        if got != self.canvas {
            return Err(ThumbError::render(format!(
                "surface is {}x{}, renderer draws {}x{}",
                got.width, got.height, self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }

    fn redraw(&mut self, surface: &mut RenderSurface) -> ThumbResult<()> {
        let Some(cached) = self.background.as_ref() else {
            return Err(ThumbError::render("no background composed"));
        };
        let mut frame = cached.pixels.clone();
        compose_text(&mut frame, &self.title, &mut self.backend)?;
        surface.copy_from(&frame)
    }
}
