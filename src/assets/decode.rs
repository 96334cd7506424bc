use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ThumbError, ThumbResult};

/// A background photo decoded and stretched to the output canvas, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct BackgroundImage {
    pub canvas: Canvas,
    /// Dimensions of the encoded image before stretching.
    pub source_width: u32,
    pub source_height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode an encoded still image and stretch it to exactly `canvas`.
///
/// Aspect ratio is not preserved and nothing is cropped.
pub fn decode_background(bytes: &[u8], canvas: Canvas) -> ThumbResult<BackgroundImage> {
    if bytes.is_empty() {
        return Err(ThumbError::decode("image payload is empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| ThumbError::decode(format!("{e:#}")))?;
    let (source_width, source_height) = (dyn_img.width(), dyn_img.height());

    let stretched = if (source_width, source_height) == (canvas.width, canvas.height) {
        dyn_img.to_rgba8()
    } else {
        image::imageops::resize(
            &dyn_img.to_rgba8(),
            canvas.width,
            canvas.height,
            image::imageops::FilterType::Triangle,
        )
    };

    let mut rgba8_premul = stretched.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(BackgroundImage {
        canvas,
        source_width,
        source_height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((u16::from(px[0]) * a + 127) / 255) as u8;
        px[1] = ((u16::from(px[1]) * a + 127) / 255) as u8;
        px[2] = ((u16::from(px[2]) * a + 127) / 255) as u8;
    }
}
