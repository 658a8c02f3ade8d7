use ndarray::{Array2, Array3, ArrayView2, ArrayViewMut2};

use crate::float_trait::Bm3dFloat;

/// Precomputed orthonormal type-II DCT basis for transform length `n`.
///
/// Stores `basis[[k, i]] = alpha(k) * sqrt(2/n) * cos(pi*k*(2i+1)/(2n))`
/// with `alpha(0) = 1/sqrt(2)` and `alpha(k>0) = 1`, where `k` is the
/// frequency index and `i` the spatial index. The scaling makes the matrix
/// orthonormal (`C · Cᵀ = I`), so the inverse transform is the transpose.
///
/// A basis of length 1 is the 1x1 identity: `alpha(0)*sqrt(2/1)*cos(0) = 1`.
pub struct DctBasis<F: Bm3dFloat> {
    size: usize,
    basis: Array2<F>,
}

impl<F: Bm3dFloat> DctBasis<F> {
    /// Precompute the basis matrix for transform length `size`.
    pub fn new(size: usize) -> Self {
        let mut basis = Array2::zeros((size, size));
        if size > 0 {
            let n = F::usize_as(size);
            let two = F::from_f64_c(2.0);
            let scale = (two / n).sqrt();
            let dc_scale = scale / two.sqrt();
            for k in 0..size {
                let row_scale = if k == 0 { dc_scale } else { scale };
                for i in 0..size {
                    let angle =
                        F::PI * F::usize_as(k) * F::usize_as(2 * i + 1) / (two * n);
                    basis[[k, i]] = row_scale * angle.cos();
                }
            }
        }
        Self { size, basis }
    }

    /// Transform length this basis was built for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Basis entry for frequency `k`, spatial index `i`.
    #[inline]
    pub fn get(&self, k: usize, i: usize) -> F {
        self.basis[[k, i]]
    }

    /// 2D forward transform of a square block: `T = C · X · Cᵀ`.
    pub fn forward_2d(&self, block: ArrayView2<F>) -> Array2<F> {
        let mut work = Array2::zeros((self.size, self.size));
        let mut out = Array2::zeros((self.size, self.size));
        self.forward_2d_into(block, &mut work, out.view_mut());
        out
    }

    /// 2D inverse transform of a square coefficient block: `X = Cᵀ · T · C`.
    pub fn inverse_2d(&self, coeff: ArrayView2<F>) -> Array2<F> {
        let mut work = Array2::zeros((self.size, self.size));
        let mut out = Array2::zeros((self.size, self.size));
        self.inverse_2d_into(coeff, &mut work, out.view_mut());
        out
    }

    /// 2D forward transform writing into caller-owned buffers.
    ///
    /// `work` holds the intermediate row pass; both buffers must be
    /// `size x size`. Allocation-free so the table builder can reuse
    /// per-worker scratch.
    pub fn forward_2d_into(
        &self,
        block: ArrayView2<F>,
        work: &mut Array2<F>,
        out: ArrayViewMut2<F>,
    ) {
        self.sandwich_into(block, false, work, out);
    }

    /// 2D inverse transform writing into caller-owned buffers.
    pub fn inverse_2d_into(
        &self,
        coeff: ArrayView2<F>,
        work: &mut Array2<F>,
        out: ArrayViewMut2<F>,
    ) {
        self.sandwich_into(coeff, true, work, out);
    }

    /// `M · X · Mᵀ` where `M = C` (forward) or `M = Cᵀ` (inverse).
    fn sandwich_into(
        &self,
        input: ArrayView2<F>,
        transpose: bool,
        work: &mut Array2<F>,
        mut out: ArrayViewMut2<F>,
    ) {
        let n = self.size;
        debug_assert_eq!(input.dim(), (n, n));
        debug_assert_eq!(work.dim(), (n, n));
        debug_assert_eq!(out.dim(), (n, n));

        // Left pass: work = M · input
        for k in 0..n {
            for j in 0..n {
                let mut acc = F::zero();
                for i in 0..n {
                    let m = if transpose {
                        self.basis[[i, k]]
                    } else {
                        self.basis[[k, i]]
                    };
                    acc += m * input[[i, j]];
                }
                work[[k, j]] = acc;
            }
        }

        // Right pass: out = work · Mᵀ
        for k in 0..n {
            for q in 0..n {
                let mut acc = F::zero();
                for j in 0..n {
                    let m = if transpose {
                        self.basis[[j, q]]
                    } else {
                        self.basis[[q, j]]
                    };
                    acc += work[[k, j]] * m;
                }
                out[[k, q]] = acc;
            }
        }
    }

    /// Forward 1D transform along axis 0 of a `K x B x B` group, in place.
    ///
    /// `scratch` must hold at least `K` elements; `K` must equal this
    /// basis's transform length.
    pub fn forward_axis0(&self, group: &mut Array3<F>, scratch: &mut [F]) {
        self.transform_axis0(group, scratch, false);
    }

    /// Inverse 1D transform along axis 0 of a `K x B x B` group, in place.
    pub fn inverse_axis0(&self, group: &mut Array3<F>, scratch: &mut [F]) {
        self.transform_axis0(group, scratch, true);
    }

    fn transform_axis0(&self, group: &mut Array3<F>, scratch: &mut [F], transpose: bool) {
        let (k_len, rows, cols) = group.dim();
        debug_assert_eq!(k_len, self.size);
        debug_assert!(scratch.len() >= k_len);

        for r in 0..rows {
            for c in 0..cols {
                for z in 0..k_len {
                    scratch[z] = group[[z, r, c]];
                }
                for k in 0..k_len {
                    let mut acc = F::zero();
                    for z in 0..k_len {
                        let m = if transpose {
                            self.basis[[z, k]]
                        } else {
                            self.basis[[k, z]]
                        };
                        acc += m * scratch[z];
                    }
                    group[[k, r, c]] = acc;
                }
            }
        }
    }
}
