use std::path::Path;

use anyhow::Context;

use crate::composite_cpu;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ThumbError, ThumbResult};

/// Caller-owned drawing target: premultiplied RGBA8, row-major, tightly packed.
///
/// Starts fully transparent. The renderer writes whole frames into it and never resizes it.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderSurface {
    canvas: Canvas,
    data: Vec<u8>,
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("canvas", &self.canvas)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new(Canvas::THUMBNAIL)
    }
}

impl RenderSurface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0u8; canvas.byte_len()],
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let idx = ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// `true` when no pixel has partial or zero alpha.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }

    /// `true` when every pixel is transparent black, i.e. nothing has been drawn yet.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Overwrite this surface with `other`'s pixels. Canvases must match.
    pub fn copy_from(&mut self, other: &RenderSurface) -> ThumbResult<()> {
        if self.canvas != other.canvas {
            return Err(ThumbError::render(format!(
                "surface size mismatch: {}x{} vs {}x{}",
                self.canvas.width, self.canvas.height, other.canvas.width, other.canvas.height
            )));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Straight-alpha copy of the pixels, ready for encoding.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        composite_cpu::unpremultiply(&self.data)
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> ThumbResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(
            self.canvas.width,
            self.canvas.height,
            self.to_rgba8_straight(),
        )
        .ok_or_else(|| ThumbError::render("surface buffer does not match its canvas"))?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .context("encode surface as png")?;
        Ok(out)
    }

    /// Write the surface to `path` as PNG, creating parent directories as needed.
    pub fn save_png(&self, path: &Path) -> ThumbResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.to_rgba8_straight(),
            self.canvas.width,
            self.canvas.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}
