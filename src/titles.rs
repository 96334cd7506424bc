//! Deterministic title variants.
//!
//! Titles pair hook template `i` with power word `i`, both indexed modulo their table length,
//! so either table can grow without breaking the pairing.

use crate::foundation::error::{ThumbError, ThumbResult};

/// Number of variants produced per topic.
pub const TITLE_COUNT: usize = 5;

const TOPIC_SLOT: &str = "{topic}";

/// Sentence patterns; each embeds the topic exactly once.
pub const HOOKS: [&str; 5] = [
    "Los {topic} que no conocías",
    "Cómo dominar {topic} en 5 pasos",
    "Top 5 {topic} que sorprenden",
    "{topic}: guía completa y consejos",
    "¿Por qué {topic} está cambiando TODO?",
];

/// Emphasis words prefixed to each hook.
pub const POWER_WORDS: [&str; 5] = [
    "Increíble",
    "Impresionante",
    "Secreto",
    "Asombroso",
    "Impactante",
];

/// A validated, whitespace-trimmed, non-empty topic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Topic(String);

impl Topic {
    pub fn parse(raw: &str) -> ThumbResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ThumbError::validation("Escribe un tema para generar títulos."));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Topic {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The ordered titles generated for one topic. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TitleVariants([String; TITLE_COUNT]);

impl TitleVariants {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        TITLE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::ops::Index<usize> for TitleVariants {
    type Output = String;

    fn index(&self, i: usize) -> &String {
        &self.0[i]
    }
}

impl<'a> IntoIterator for &'a TitleVariants {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Generate the title variants for `topic`.
///
/// Pure and deterministic: the same topic always yields the same titles in the same order.
pub fn generate(topic: &Topic) -> TitleVariants {
    TitleVariants(std::array::from_fn(|i| {
        let power = POWER_WORDS[i % POWER_WORDS.len()];
        let hook = HOOKS[i % HOOKS.len()].replacen(TOPIC_SLOT, topic.as_str(), 1);
        format!("{power} — {hook}")
    }))
}
