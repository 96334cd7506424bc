use crate::titles::Topic;

const STYLE_DIRECTIVE: &str =
    "estilo llamativo, colores vibrantes, alto contraste, 1280x720, sin texto";

/// Text prompt for an external image generator. Never sent anywhere by this crate.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ThumbnailPrompt(String);

impl ThumbnailPrompt {
    pub fn for_topic(topic: &Topic) -> Self {
        Self(format!(
            "Miniatura de YouTube sobre {topic}, {STYLE_DIRECTIVE}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThumbnailPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
