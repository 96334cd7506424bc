#![forbid(unsafe_code)]

pub mod assets;
pub mod blur_cpu;
pub mod composite_cpu;
pub mod config;
pub mod foundation;
pub mod prompt;
pub mod render;
pub mod studio;
pub mod suggest;
pub mod titles;

pub use assets::{BackgroundImage, BackgroundKey, BackgroundSource, FontFace, FontSet};
pub use config::StudioConfig;
pub use foundation::core::{Canvas, Rgba8, Rgba8Premul};
pub use foundation::error::{ThumbError, ThumbResult};
pub use prompt::ThumbnailPrompt;
pub use render::{
    CpuTextBackend, PendingRender, RenderOutcome, RenderRequest, RenderSurface, RenderTicket,
    RenderToken, TextBackend, TextPlan, ThumbnailRenderer,
};
pub use studio::{GENERIC_FAILURE, Notice, Studio};
pub use suggest::{NoSuggestions, SuggestionSource, SuggestionsClient};
pub use titles::{TitleVariants, Topic, generate};
