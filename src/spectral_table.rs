//! Per-origin spectral block table.
//!
//! For every pixel origin `(row, col)` of the input image, the table holds
//! the B x B orthonormal DCT-II coefficients of the block whose top-left
//! corner is that origin. Pixel reads past the image boundary replicate the
//! nearest edge pixel (no wrapping, no zero padding), so every origin in the
//! image has a full block.
//!
//! The table is a pure function of the image. It is built once per run,
//! parallel over rows, and is read-only afterwards: the distance engine
//! never mutates it, so concurrent readers need no locks.

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Array4, ArrayView2, Axis};

use crate::float_trait::Bm3dFloat;
use crate::transforms::DctBasis;

/// Read-only table of per-origin block spectra: `coeffs[[row, col, p, q]]`.
pub struct SpectralTable<F: Bm3dFloat> {
    rows: usize,
    cols: usize,
    block_size: usize,
    coeffs: Array4<F>,
}

impl<F: Bm3dFloat> SpectralTable<F> {
    /// Build the table for `image` using `basis` (block size = basis length).
    pub fn build(image: ArrayView2<u8>, basis: &DctBasis<F>) -> Self {
        let (rows, cols) = image.dim();
        let block_size = basis.size();

        let mut coeffs = Array4::zeros((rows, cols, block_size, block_size));
        coeffs
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, mut row_plane)| {
                let mut block = Array2::zeros((block_size, block_size));
                let mut work = Array2::zeros((block_size, block_size));
                for col in 0..cols {
                    extract_block_replicated(image, (row, col), &mut block);
                    let out = row_plane.index_axis_mut(Axis(0), col);
                    basis.forward_2d_into(block.view(), &mut work, out);
                }
            });

        Self {
            rows,
            cols,
            block_size,
            coeffs,
        }
    }

    /// Image dimensions the table was built for.
    pub fn image_dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Block size B.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Spectral coefficients of the block at `(row, col)`.
    #[inline]
    pub fn block(&self, row: usize, col: usize) -> ArrayView2<F> {
        self.coeffs
            .index_axis(Axis(0), row)
            .index_axis_move(Axis(0), col)
    }
}

/// Copy the B x B block at `origin` into `out`, replicating edge pixels for
/// reads past the image boundary.
fn extract_block_replicated<F: Bm3dFloat>(
    image: ArrayView2<u8>,
    origin: (usize, usize),
    out: &mut Array2<F>,
) {
    let (rows, cols) = image.dim();
    let (block_rows, block_cols) = out.dim();
    for i in 0..block_rows {
        let r = (origin.0 + i).min(rows - 1);
        for j in 0..block_cols {
            let c = (origin.1 + j).min(cols - 1);
            out[[i, j]] = F::u8_as(image[[r, c]]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn ramp_image(rows: usize, cols: usize) -> Array2<u8> {
        Array2::from_shape_fn((rows, cols), |(r, c)| (r * cols + c) as u8)
    }

    #[test]
    fn test_table_dimensions() {
        let image = ramp_image(12, 10);
        let basis = DctBasis::<f64>::new(4);
        let table = SpectralTable::build(image.view(), &basis);

        assert_eq!(table.image_dim(), (12, 10));
        assert_eq!(table.block_size(), 4);
        assert_eq!(table.block(0, 0).dim(), (4, 4));
        assert_eq!(table.block(11, 9).dim(), (4, 4));
    }

    #[test]
    fn test_interior_block_matches_direct_transform() {
        let image = ramp_image(16, 16);
        let basis = DctBasis::<f64>::new(4);
        let table = SpectralTable::build(image.view(), &basis);

        let mut block = Array2::zeros((4, 4));
        for i in 0..4 {
            for j in 0..4 {
                block[[i, j]] = image[[3 + i, 5 + j]] as f64;
            }
        }
        let expected = basis.forward_2d(block.view());

        let got = table.block(3, 5);
        for p in 0..4 {
            for q in 0..4 {
                assert!(
                    (got[[p, q]] - expected[[p, q]]).abs() < 1e-12,
                    "coefficient mismatch at ({},{})",
                    p,
                    q
                );
            }
        }
    }

    #[test]
    fn test_edge_block_replicates_pixels() {
        // Origin on the last row/col: the block is filled from the edge
        // pixel, so the spatial block is constant along the overhang.
        let image = ramp_image(8, 8);
        let basis = DctBasis::<f64>::new(4);
        let table = SpectralTable::build(image.view(), &basis);

        let mut block = Array2::zeros((4, 4));
        for i in 0..4 {
            let r = (7 + i).min(7);
            for j in 0..4 {
                let c = (6 + j).min(7);
                block[[i, j]] = image[[r, c]] as f64;
            }
        }
        let expected = basis.forward_2d(block.view());

        let got = table.block(7, 6);
        for p in 0..4 {
            for q in 0..4 {
                assert!(
                    (got[[p, q]] - expected[[p, q]]).abs() < 1e-12,
                    "edge coefficient mismatch at ({},{})",
                    p,
                    q
                );
            }
        }
    }

    #[test]
    fn test_corner_block_is_constant_dc_only() {
        // Bottom-right corner origin: every read replicates the corner
        // pixel, so only the DC coefficient survives.
        let image = ramp_image(8, 8);
        let basis = DctBasis::<f64>::new(4);
        let table = SpectralTable::build(image.view(), &basis);

        let corner = image[[7, 7]] as f64;
        let got = table.block(7, 7);
        assert!((got[[0, 0]] - 4.0 * corner).abs() < 1e-10);
        for p in 0..4 {
            for q in 0..4 {
                if p == 0 && q == 0 {
                    continue;
                }
                assert!(
                    got[[p, q]].abs() < 1e-10,
                    "corner block AC coefficient [{},{}] should be 0",
                    p,
                    q
                );
            }
        }
    }

    #[test]
    fn test_roundtrip_through_table() {
        let image = ramp_image(10, 10);
        let basis = DctBasis::<f64>::new(4);
        let table = SpectralTable::build(image.view(), &basis);

        let pixels = basis.inverse_2d(table.block(2, 3));
        for i in 0..4 {
            for j in 0..4 {
                let expected = image[[2 + i, 3 + j]] as f64;
                assert!(
                    (pixels[[i, j]] - expected).abs() < 1e-9,
                    "roundtrip mismatch at ({},{}): {} vs {}",
                    i,
                    j,
                    pixels[[i, j]],
                    expected
                );
            }
        }
    }
}
