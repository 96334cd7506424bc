pub mod background;
pub mod cpu;
pub mod renderer;
pub mod surface;
pub mod text;

pub use background::{Background, compose_background};
pub use cpu::CpuTextBackend;
pub use renderer::{
    PendingRender, RenderOutcome, RenderRequest, RenderTicket, RenderToken, ThumbnailRenderer,
};
pub use surface::RenderSurface;
pub use text::{ShadowSpec, TextBackend, TextPlan, TextRun, compose_text, display_title};
