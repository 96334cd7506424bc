pub mod decode;
pub mod fonts;
pub mod layout;
pub mod source;

pub use decode::{BackgroundImage, decode_background};
pub use fonts::{FontFace, FontOrigin, FontSet};
pub use layout::{TextBrushRgba8, TextLayoutEngine};
pub use source::{BackgroundKey, BackgroundSource};
