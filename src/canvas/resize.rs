//! Bilinear resize with pixel-center alignment.
//!
//! Source coordinate for destination pixel `d` is `(d + 0.5) * src / dst - 0.5`,
//! clamped to the border. No prefilter is applied when shrinking, so each
//! output pixel blends exactly the four nearest input pixels.

use image::RgbImage;

/// Per-axis source index pair and weight of the second sample.
#[derive(Clone, Copy, Debug)]
struct Tap {
    i0: usize,
    i1: usize,
    frac: f32,
}

fn taps(src_len: u32, dst_len: u32) -> Vec<Tap> {
    let scale = src_len as f64 / dst_len as f64;
    let last = src_len as usize - 1;
    (0..dst_len)
        .map(|d| {
            let pos = (d as f64 + 0.5) * scale - 0.5;
            if pos <= 0.0 {
                return Tap { i0: 0, i1: 0, frac: 0.0 };
            }
            let i0 = pos.floor() as usize;
            if i0 >= last {
                return Tap { i0: last, i1: last, frac: 0.0 };
            }
            Tap {
                i0,
                i1: i0 + 1,
                frac: (pos - i0 as f64) as f32,
            }
        })
        .collect()
}

/// Resize to exactly `width` x `height`, ignoring aspect ratio.
///
/// Resizing to the current size returns an identical copy. An empty source
/// yields a black image of the requested size.
pub fn resize_bilinear(src: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = src.dimensions();
    if (src_w, src_h) == (width, height) {
        return src.clone();
    }
    if src_w == 0 || src_h == 0 {
        return RgbImage::new(width, height);
    }

    let xs = taps(src_w, width);
    let ys = taps(src_h, height);

    let mut out = RgbImage::new(width, height);
    for (y, ty) in ys.iter().enumerate() {
        for (x, tx) in xs.iter().enumerate() {
            let p00 = src.get_pixel(tx.i0 as u32, ty.i0 as u32).0;
            let p01 = src.get_pixel(tx.i1 as u32, ty.i0 as u32).0;
            let p10 = src.get_pixel(tx.i0 as u32, ty.i1 as u32).0;
            let p11 = src.get_pixel(tx.i1 as u32, ty.i1 as u32).0;
            let px = out.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                let top = p00[c] as f32 + tx.frac * (p01[c] as f32 - p00[c] as f32);
                let bottom = p10[c] as f32 + tx.frac * (p11[c] as f32 - p10[c] as f32);
                let v = top + ty.frac * (bottom - top);
                px.0[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}
