use crate::foundation::error::{ThumbError, ThumbResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255 - u16::from(sa);
            std::array::from_fn(|i| src[i].saturating_add(mul_div255(u16::from(dst[i]), inv)))
        }
    }
}

/// Composite a whole premultiplied layer over `dst`. Both buffers must cover the same canvas.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> ThumbResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ThumbError::render(format!(
            "layer size mismatch: {} bytes over {} bytes",
            src.len(),
            dst.len()
        )));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Fill every pixel of a premultiplied buffer with `px`.
pub fn fill(dst: &mut [u8], px: PremulRgba8) {
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

/// Convert a premultiplied buffer to straight alpha for encoding.
pub fn unpremultiply(src: &[u8]) -> Vec<u8> {
    let mut out = src.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_src_is_noop() {
        let dst = [10, 20, 30, 40];
        assert_eq!(over(dst, [0, 0, 0, 0]), dst);
    }

    #[test]
    fn opaque_src_replaces_dst() {
        assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
    }

    #[test]
    fn half_black_over_white_halves_the_color() {
        let out = over([255, 255, 255, 255], [0, 0, 0, 128]);
        assert_eq!(out, [127, 127, 127, 255]);
    }

    #[test]
    fn opaque_dst_stays_opaque() {
        assert_eq!(over([20, 30, 40, 255], [5, 5, 5, 77])[3], 255);
    }

    #[test]
    fn over_in_place_rejects_length_mismatch() {
        let mut dst = vec![0u8; 8];
        let err = over_in_place(&mut dst, &[0u8; 4]).unwrap_err();
        assert!(err.to_string().contains("layer size mismatch"));
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut dst = vec![0u8; 12];
        fill(&mut dst, [1, 2, 3, 4]);
        assert!(dst.chunks_exact(4).all(|px| px == [1, 2, 3, 4]));
    }

    #[test]
    fn unpremultiply_restores_straight_color() {
        let out = unpremultiply(&[64, 32, 0, 128, 10, 20, 30, 255, 0, 0, 0, 0]);
        assert_eq!(&out[0..4], &[128, 64, 0, 128]);
        assert_eq!(&out[4..8], &[10, 20, 30, 255]);
        assert_eq!(&out[8..12], &[0, 0, 0, 0]);
    }
}
