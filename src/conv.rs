//! Direct 2D convolution over an edge-replicated image.

use ndarray::{Array2, ArrayView2};

use crate::float_trait::Bm3dFloat;

/// Convolve `image` with `kernel`, anchored at the kernel's top-left tap.
///
/// Reads past the image boundary replicate the nearest edge pixel; the
/// accumulated value is rounded and clamped to the 8-bit pixel range.
pub fn convolve2d<F: Bm3dFloat>(image: ArrayView2<u8>, kernel: ArrayView2<F>) -> Array2<u8> {
    let (rows, cols) = image.dim();
    let (k_rows, k_cols) = kernel.dim();

    let mut output = Array2::zeros((rows, cols));
    for r in 0..rows {
        for c in 0..cols {
            let mut acc = F::zero();
            for kr in 0..k_rows {
                let src_r = (r + kr).min(rows - 1);
                for kc in 0..k_cols {
                    let src_c = (c + kc).min(cols - 1);
                    acc += kernel[[kr, kc]] * F::u8_as(image[[src_r, src_c]]);
                }
            }
            output[[r, c]] = quantize_pixel(acc);
        }
    }
    output
}

#[inline]
fn quantize_pixel<F: Bm3dFloat>(value: F) -> u8 {
    let clamped = value.round().max(F::zero()).min(F::PIXEL_MAX);
    clamped.to_u8().unwrap_or(0)
}
