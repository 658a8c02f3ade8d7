//! Structural similarity (SSIM) image-quality metric.
//!
//! Mean SSIM over the image with an 11-tap Gaussian window (radius 5,
//! sigma 1.5), separable filtering, and edge replication. Stability
//! constants follow the standard choice for 8-bit dynamic range.

use ndarray::{Array2, ArrayView2};

use crate::error::MetricError;
use crate::float_trait::Bm3dFloat;

/// Gaussian window radius; the window spans `2 * RADIUS + 1` taps.
const WINDOW_RADIUS: usize = 5;

/// Gaussian window standard deviation.
const WINDOW_SIGMA: f64 = 1.5;

/// Luminance stability constant: `(0.01 * 255)^2`.
const C1: f64 = 6.5025;

/// Contrast stability constant: `(0.03 * 255)^2`.
const C2: f64 = 58.5225;

/// Mean SSIM score between two images of equal dimensions.
///
/// Scores are clamped to at most 1 per pixel before averaging; identical
/// images score exactly 1.
pub fn ssim<F: Bm3dFloat>(a: ArrayView2<u8>, b: ArrayView2<u8>) -> Result<F, MetricError> {
    if a.dim() != b.dim() {
        let (rows_a, cols_a) = a.dim();
        let (rows_b, cols_b) = b.dim();
        return Err(MetricError::DimensionMismatch {
            rows_a,
            cols_a,
            rows_b,
            cols_b,
        });
    }
    if a.is_empty() {
        return Err(MetricError::EmptyImage);
    }

    let window = gaussian_window::<F>();
    let (rows, cols) = a.dim();

    let af = Array2::from_shape_fn((rows, cols), |(r, c)| F::u8_as(a[[r, c]]));
    let bf = Array2::from_shape_fn((rows, cols), |(r, c)| F::u8_as(b[[r, c]]));

    // Local means via separable filtering.
    let mu_a = blur(&af, &window);
    let mu_b = blur(&bf, &window);

    // Mean-corrected images and their local (co)variances.
    let mc_a = &af - &mu_a;
    let mc_b = &bf - &mu_b;
    let sig_a = blur(&(&mc_a * &mc_a), &window);
    let sig_b = blur(&(&mc_b * &mc_b), &window);
    let sig_ab = blur(&(&mc_a * &mc_b), &window);

    let c1 = F::from_f64_c(C1);
    let c2 = F::from_f64_c(C2);
    let two = F::from_f64_c(2.0);

    let mut total = F::zero();
    for r in 0..rows {
        for c in 0..cols {
            let mu_ab = mu_a[[r, c]] * mu_b[[r, c]];
            let mu_aa = mu_a[[r, c]] * mu_a[[r, c]];
            let mu_bb = mu_b[[r, c]] * mu_b[[r, c]];
            let num = (two * mu_ab + c1) * (two * sig_ab[[r, c]] + c2);
            let den = (mu_aa + mu_bb + c1) * (sig_a[[r, c]] + sig_b[[r, c]] + c2);
            total += (num / den).min(F::one());
        }
    }

    Ok(total / F::usize_as(rows * cols))
}

/// Normalized 11-tap Gaussian window: `exp(-((n^2)/sigma^2)/2)`, n in
/// `[-RADIUS, RADIUS]`, scaled to unit sum.
fn gaussian_window<F: Bm3dFloat>() -> Vec<F> {
    let taps = 2 * WINDOW_RADIUS + 1;
    let mut window = Vec::with_capacity(taps);
    let mut sum = 0.0f64;
    for i in 0..taps {
        let n = i as f64 - WINDOW_RADIUS as f64;
        let w = (-((n * n) / (WINDOW_SIGMA * WINDOW_SIGMA)) / 2.0).exp();
        window.push(w);
        sum += w;
    }
    window.into_iter().map(|w| F::from_f64_c(w / sum)).collect()
}

/// Separable Gaussian blur with edge replication.
fn blur<F: Bm3dFloat>(input: &Array2<F>, window: &[F]) -> Array2<F> {
    let (rows, cols) = input.dim();
    let radius = window.len() / 2;

    // Horizontal pass.
    let mut horizontal = Array2::zeros((rows, cols));
    for r in 0..rows {
        for c in 0..cols {
            let mut acc = F::zero();
            for (k, &w) in window.iter().enumerate() {
                let src = replicate_index(c as isize + radius as isize - k as isize, cols);
                acc += w * input[[r, src]];
            }
            horizontal[[r, c]] = acc;
        }
    }

    // Vertical pass.
    let mut output = Array2::zeros((rows, cols));
    for r in 0..rows {
        for c in 0..cols {
            let mut acc = F::zero();
            for (k, &w) in window.iter().enumerate() {
                let src = replicate_index(r as isize + radius as isize - k as isize, rows);
                acc += w * horizontal[[src, c]];
            }
            output[[r, c]] = acc;
        }
    }
    output
}

#[inline]
fn replicate_index(idx: isize, len: usize) -> usize {
    idx.max(0).min(len as isize - 1) as usize
}
