use std::sync::Arc;

use base64::Engine as _;

use crate::foundation::error::{ThumbError, ThumbResult};

/// Where the thumbnail background comes from.
#[derive(Clone, Debug, Default)]
pub enum BackgroundSource {
    /// Procedural gradient plus accent shapes.
    #[default]
    Procedural,
    /// An opaque encoded still image (PNG, JPEG, WebP, ...). Decoded lazily by the renderer.
    Encoded(Arc<[u8]>),
}

/// Identity of a background, used to reuse an already composed background between passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackgroundKey {
    Procedural,
    Encoded { len: usize, hash: u64 },
}

impl BackgroundSource {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Encoded(Arc::from(bytes.into()))
    }

    /// Parse a `data:image/<kind>;base64,<payload>` URL, as produced by a browser file picker.
    pub fn from_data_url(url: &str) -> ThumbResult<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| ThumbError::validation("data url must start with 'data:'"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ThumbError::validation("data url is missing its ',' separator"))?;

        let mut parts = header.split(';');
        let mime = parts.next().unwrap_or_default();
        if !mime.starts_with("image/") {
            return Err(ThumbError::validation(format!(
                "data url must carry an image, got '{mime}'"
            )));
        }
        if !parts.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(ThumbError::validation("only base64 data urls are supported"));
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ThumbError::validation(format!("invalid base64 payload: {e}")))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn is_procedural(&self) -> bool {
        matches!(self, Self::Procedural)
    }

    pub fn key(&self) -> BackgroundKey {
        match self {
            Self::Procedural => BackgroundKey::Procedural,
            Self::Encoded(bytes) => BackgroundKey::Encoded {
                len: bytes.len(),
                hash: xxhash_rust::xxh3::xxh3_64(bytes),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trips_payload_bytes() {
        let src = BackgroundSource::from_data_url("data:image/png;base64,AAECAw==").unwrap();
        let BackgroundSource::Encoded(bytes) = src else {
            panic!("expected encoded source");
        };
        assert_eq!(&bytes[..], &[0, 1, 2, 3]);
    }

    #[test]
    fn data_url_rejects_non_images_and_non_base64() {
        assert!(BackgroundSource::from_data_url("data:text/plain;base64,AAAA").is_err());
        assert!(BackgroundSource::from_data_url("data:image/png,%00%01").is_err());
        assert!(BackgroundSource::from_data_url("image/png;base64,AAAA").is_err());
        assert!(BackgroundSource::from_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn keys_follow_payload_identity() {
        let a = BackgroundSource::from_bytes(vec![1, 2, 3]);
        let b = BackgroundSource::from_bytes(vec![1, 2, 3]);
        let c = BackgroundSource::from_bytes(vec![3, 2, 1]);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!(BackgroundSource::default().key(), BackgroundKey::Procedural);
    }
}
