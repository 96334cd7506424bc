use crate::foundation::core::Canvas;
use crate::foundation::error::{ThumbError, ThumbResult};

/// Gaussian sigma matching a canvas-style `shadowBlur` radius.
pub fn sigma_for_radius(radius: u32) -> f32 {
    (radius as f32 / 2.0).max(0.5)
}

/// Separable Gaussian blur over a premultiplied RGBA8 layer, in place.
///
/// Edges clamp, so a uniform layer is left unchanged.
pub fn blur_rgba8_premul_in_place(
    layer: &mut [u8],
    canvas: Canvas,
    radius: u32,
    sigma: f32,
) -> ThumbResult<()> {
    if layer.len() != canvas.byte_len() {
        return Err(ThumbError::render(
            "blur expects a layer matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; layer.len()];
    blur_pass(layer, &mut tmp, canvas, &kernel, Axis::Horizontal);
    blur_pass(&tmp, layer, canvas, &kernel, Axis::Vertical);
    Ok(())
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ThumbResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ThumbError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ThumbError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();

    // Push the rounding error into the centre tap so the kernel sums to exactly 1.0 in q16.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn blur_pass(src: &[u8], dst: &mut [u8], canvas: Canvas, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i32;
    let w = canvas.width as i32;
    let h = canvas.height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i32 - radius;
                let (sx, sy) = match axis {
                    Axis::Horizontal => ((x + d).clamp(0, w - 1), y),
                    Axis::Vertical => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::new(w, h).unwrap()
    }

    #[test]
    fn blur_radius_0_is_identity() {
        let mut layer = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        blur_rgba8_premul_in_place(&mut layer, canvas(1, 2), 0, 1.0).unwrap();
        assert_eq!(layer, vec![1u8, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn blur_uniform_layer_is_identity() {
        let px = [10u8, 20u8, 30u8, 40u8];
        let src = px.repeat(12);
        let mut layer = src.clone();
        blur_rgba8_premul_in_place(&mut layer, canvas(4, 3), 3, 2.0).unwrap();
        assert_eq!(layer, src);
    }

    #[test]
    fn blur_spreads_a_single_pixel_and_keeps_its_energy() {
        let c = canvas(5, 5);
        let mut layer = vec![0u8; c.byte_len()];
        let center = ((2 * 5 + 2) * 4) as usize;
        layer[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

        blur_rgba8_premul_in_place(&mut layer, c, 2, 1.2).unwrap();

        let nonzero = layer.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1);
        let sum_a: u32 = layer.chunks_exact(4).map(|px| u32::from(px[3])).sum();
        assert!((sum_a as i32 - 255).abs() <= 10);
    }

    #[test]
    fn blur_rejects_mismatched_layer() {
        let mut layer = vec![0u8; 12];
        assert!(blur_rgba8_premul_in_place(&mut layer, canvas(2, 2), 1, 1.0).is_err());
    }

    #[test]
    fn sigma_tracks_half_the_radius() {
        assert_eq!(sigma_for_radius(14), 7.0);
        assert_eq!(sigma_for_radius(0), 0.5);
    }
}
