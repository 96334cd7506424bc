use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use sha2::Digest as _;

use crate::foundation::error::{ThumbError, ThumbResult};

/// Weight used for the title line.
pub const TITLE_WEIGHT: u16 = 700;
/// Weight used for the caption line.
pub const CAPTION_WEIGHT: u16 = 600;

/// Raw font data for one face plus where it came from.
#[derive(Clone)]
pub struct FontFace {
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file; 0 for plain TTF/OTF.
    pub index: u32,
    /// Family reported by the font database, when known.
    pub family: Option<String>,
    pub origin: FontOrigin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    File(PathBuf),
    System,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .field("origin", &self.origin)
            .finish()
    }
}

impl FontFace {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index: 0,
            family: None,
            origin: FontOrigin::System,
        }
    }

    pub fn from_file(path: &Path) -> ThumbResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Ok(Self {
            bytes: Arc::new(bytes),
            index: 0,
            family: None,
            origin: FontOrigin::File(path.to_path_buf()),
        })
    }

    /// Hex SHA-256 of the font bytes, for diagnostics.
    pub fn sha256_hex(&self) -> String {
        let digest = sha2::Sha256::digest(self.bytes.as_slice());
        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }
}

/// The two faces the text layer draws with.
#[derive(Clone, Debug)]
pub struct FontSet {
    pub title: FontFace,
    pub caption: FontFace,
}

impl FontSet {
    /// Resolve fonts: explicit files win, otherwise query the system font database.
    pub fn resolve(title_path: Option<&Path>, caption_path: Option<&Path>) -> ThumbResult<Self> {
        let mut db: Option<usvg::fontdb::Database> = None;
        let mut system = |weight: u16| -> ThumbResult<FontFace> {
            let db = db.get_or_insert_with(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                db
            });
            system_face(db, weight)
        };

        let title = match title_path {
            Some(p) => FontFace::from_file(p)?,
            None => system(TITLE_WEIGHT)?,
        };
        let caption = match caption_path {
            Some(p) => FontFace::from_file(p)?,
            None => match title_path {
                // A single explicit file serves both lines.
                Some(_) => title.clone(),
                None => system(CAPTION_WEIGHT)?,
            },
        };

        tracing::debug!(
            title_family = title.family.as_deref().unwrap_or("unknown"),
            caption_family = caption.family.as_deref().unwrap_or("unknown"),
            "resolved thumbnail fonts"
        );
        Ok(Self { title, caption })
    }
}

fn system_face(db: &usvg::fontdb::Database, weight: u16) -> ThumbResult<FontFace> {
    let families = [
        usvg::fontdb::Family::SansSerif,
        usvg::fontdb::Family::Name("DejaVu Sans"),
        usvg::fontdb::Family::Name("Liberation Sans"),
        usvg::fontdb::Family::Name("Noto Sans"),
    ];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight(weight),
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| ThumbError::font("no usable font face found on this system"))?;

    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()));
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| ThumbError::font("font face data could not be loaded"))?;

    Ok(FontFace {
        bytes: Arc::new(bytes),
        index,
        family,
        origin: FontOrigin::System,
    })
}
