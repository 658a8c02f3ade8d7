//! Whole-image orthonormal DCT-II and its inverse.
//!
//! Standalone utilities over full M x N images (non-square bases per axis),
//! independent of the block pipeline: they consume and produce plain
//! pixel/coefficient arrays.

use ndarray::{Array2, ArrayView2};

use crate::float_trait::Bm3dFloat;
use crate::transforms::DctBasis;

/// Orthonormal 2D DCT-II of an entire image.
pub fn dct2d<F: Bm3dFloat>(image: ArrayView2<u8>) -> Array2<F> {
    let (rows, cols) = image.dim();
    let row_basis = DctBasis::<F>::new(rows);
    let col_basis = DctBasis::<F>::new(cols);

    // Column-direction pass: work[[i, q]] = sum_j colC[q, j] * I[i, j]
    let mut work = Array2::zeros((rows, cols));
    for i in 0..rows {
        for q in 0..cols {
            let mut acc = F::zero();
            for j in 0..cols {
                acc += col_basis.get(q, j) * F::u8_as(image[[i, j]]);
            }
            work[[i, q]] = acc;
        }
    }

    // Row-direction pass: coeff[[p, q]] = sum_i rowC[p, i] * work[[i, q]]
    let mut coeff = Array2::zeros((rows, cols));
    for p in 0..rows {
        for q in 0..cols {
            let mut acc = F::zero();
            for i in 0..rows {
                acc += row_basis.get(p, i) * work[[i, q]];
            }
            coeff[[p, q]] = acc;
        }
    }
    coeff
}

/// Inverse of [`dct2d`], rounded and clamped back to 8-bit pixels.
pub fn idct2d<F: Bm3dFloat>(coeff: ArrayView2<F>) -> Array2<u8> {
    let (rows, cols) = coeff.dim();
    let row_basis = DctBasis::<F>::new(rows);
    let col_basis = DctBasis::<F>::new(cols);

    // work[[i, q]] = sum_p rowC[p, i] * coeff[[p, q]]
    let mut work = Array2::zeros((rows, cols));
    for i in 0..rows {
        for q in 0..cols {
            let mut acc = F::zero();
            for p in 0..rows {
                acc += row_basis.get(p, i) * coeff[[p, q]];
            }
            work[[i, q]] = acc;
        }
    }

    let mut image = Array2::zeros((rows, cols));
    for i in 0..rows {
        for j in 0..cols {
            let mut acc = F::zero();
            for q in 0..cols {
                acc += col_basis.get(q, j) * work[[i, q]];
            }
            image[[i, j]] = quantize_pixel(acc);
        }
    }
    image
}

#[inline]
fn quantize_pixel<F: Bm3dFloat>(value: F) -> u8 {
    let clamped = value.round().max(F::zero()).min(F::PIXEL_MAX);
    clamped.to_u8().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// The original generator's sample image: 5x4 with a near-zero last row.
    fn sample_image() -> Array2<u8> {
        let data = [
            [10u8, 20, 30, 20],
            [23, 34, 45, 56],
            [32, 43, 54, 65],
            [11, 22, 33, 44],
            [0, 0, 1, 0],
        ];
        Array2::from_shape_fn((5, 4), |(r, c)| data[r][c])
    }

    #[test]
    fn test_roundtrip_reproduces_pixels() {
        let image = sample_image();
        let coeff = dct2d::<f64>(image.view());
        let restored = idct2d(coeff.view());
        assert_eq!(restored, image);
    }

    #[test]
    fn test_roundtrip_square_image() {
        let image = Array2::from_shape_fn((8, 8), |(r, c)| ((r * 8 + c) * 3 % 256) as u8);
        let coeff = dct2d::<f64>(image.view());
        let restored = idct2d(coeff.view());
        assert_eq!(restored, image);
    }

    #[test]
    fn test_constant_image_concentrates_dc() {
        let image = Array2::<u8>::from_elem((4, 4), 10);
        let coeff = dct2d::<f64>(image.view());

        // DC = value * sqrt(M*N); every AC coefficient vanishes.
        assert!((coeff[[0, 0]] - 40.0).abs() < 1e-10);
        for p in 0..4 {
            for q in 0..4 {
                if p == 0 && q == 0 {
                    continue;
                }
                assert!(
                    coeff[[p, q]].abs() < 1e-10,
                    "AC coefficient [{},{}] should vanish",
                    p,
                    q
                );
            }
        }
    }

    #[test]
    fn test_energy_preserved() {
        let image = sample_image();
        let coeff = dct2d::<f64>(image.view());

        let energy_in: f64 = image.iter().map(|&v| (v as f64).powi(2)).sum();
        let energy_out: f64 = coeff.iter().map(|v| v * v).sum();
        assert!(
            (energy_in - energy_out).abs() / energy_in < 1e-10,
            "orthonormal transform must preserve energy: {} vs {}",
            energy_in,
            energy_out
        );
    }

    #[test]
    fn test_idct_clamps_out_of_range_coefficients() {
        // A wildly negative DC drives the reconstruction below zero; the
        // output must clamp rather than wrap.
        let mut coeff = Array2::<f64>::zeros((4, 4));
        coeff[[0, 0]] = -1000.0;
        let image = idct2d(coeff.view());
        for v in image.iter() {
            assert_eq!(*v, 0);
        }

        let mut coeff = Array2::<f64>::zeros((4, 4));
        coeff[[0, 0]] = 100000.0;
        let image = idct2d(coeff.view());
        for v in image.iter() {
            assert_eq!(*v, 255);
        }
    }
}
