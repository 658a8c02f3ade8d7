//! Windowed spectral distance engine and match-set assembly.
//!
//! For one reference origin the engine scores every candidate origin inside
//! a clipped search window against the reference, entirely in the spectral
//! domain: `score = (1/B^2) * sum((T_ref - T_cand)^2)` over the block table.
//! The full score grid for a reference is the synchronization point of the
//! pipeline — ranking cannot start until every score is known — but
//! different reference blocks are independent and run concurrently.

use ndarray::Array2;

use crate::argsort::argsort_stable;
use crate::float_trait::Bm3dFloat;
use crate::spectral_table::SpectralTable;

/// A matched block origin with its spectral distance to the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockMatch<F: Bm3dFloat> {
    pub row: usize,
    pub col: usize,
    pub distance: F,
}

/// Clipped search window in block-origin space, bounds inclusive.
///
/// Placement: the unclamped window starts at `ref - (W - B)/2` and spans
/// `W` origins per axis; each axis is then clamped (min/max) into
/// `[0, extent - B]`. Near an image edge the window shrinks — it never
/// wraps and it never slides to keep its full size. The reference origin is
/// always inside the clipped window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
    size: usize,
}

impl SearchWindow {
    /// Center a window of `window_size` origins on `ref_pos` and clip it to
    /// the valid origin range of an image of `image_dim` pixels.
    pub fn centered(
        ref_pos: (usize, usize),
        image_dim: (usize, usize),
        block_size: usize,
        window_size: usize,
    ) -> Self {
        let half = (window_size.saturating_sub(block_size) / 2) as isize;
        let row_extent = image_dim.0.saturating_sub(block_size) as isize;
        let col_extent = image_dim.1.saturating_sub(block_size) as isize;

        let row_start_u = ref_pos.0 as isize - half;
        let col_start_u = ref_pos.1 as isize - half;
        let row_end_u = row_start_u + window_size as isize - 1;
        let col_end_u = col_start_u + window_size as isize - 1;

        Self {
            row_start: row_start_u.max(0) as usize,
            row_end: row_end_u.min(row_extent).max(0) as usize,
            col_start: col_start_u.max(0) as usize,
            col_end: col_end_u.min(col_extent).max(0) as usize,
            size: window_size,
        }
    }

    /// Flattened window extent W (origins per axis before clipping).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Candidate origin for flattened slot `(wr, wc)`, or `None` when the
    /// slot falls outside the clipped range.
    #[inline]
    pub fn origin_at(&self, wr: usize, wc: usize) -> Option<(usize, usize)> {
        let row = self.row_start + wr;
        let col = self.col_start + wc;
        (row <= self.row_end && col <= self.col_end).then_some((row, col))
    }

    /// Number of valid candidate origins after clipping.
    pub fn valid_candidates(&self) -> usize {
        (self.row_end - self.row_start + 1) * (self.col_end - self.col_start + 1)
    }
}

/// Complete score grid of one reference block's search window.
///
/// Scores are stored in the flattened fixed-size `W x W` layout, row-major
/// scan order; slots outside the clipped window carry the sentinel `+inf`
/// so they sort last and are never selected.
pub struct WindowScores<F: Bm3dFloat> {
    window: SearchWindow,
    ref_pos: (usize, usize),
    scores: Array2<F>,
}

impl<F: Bm3dFloat> WindowScores<F> {
    pub fn window(&self) -> &SearchWindow {
        &self.window
    }

    pub fn ref_pos(&self) -> (usize, usize) {
        self.ref_pos
    }

    /// Score for flattened slot `(wr, wc)`.
    #[inline]
    pub fn get(&self, wr: usize, wc: usize) -> F {
        self.scores[[wr, wc]]
    }

    /// Row-major flat view of the score grid.
    pub fn as_flat(&self) -> &[F] {
        self.scores
            .as_slice()
            .expect("score grid is freshly allocated and contiguous")
    }

    /// Flattened slot index of the reference origin.
    fn ref_slot(&self) -> usize {
        let wr = self.ref_pos.0 - self.window.row_start;
        let wc = self.ref_pos.1 - self.window.col_start;
        wr * self.window.size + wc
    }
}

/// Spectral distance between two block origins:
/// `(1/B^2) * sum_{p,q} (T(a,p,q) - T(b,p,q))^2`.
pub fn spectral_distance<F: Bm3dFloat>(
    table: &SpectralTable<F>,
    a: (usize, usize),
    b: (usize, usize),
) -> F {
    let block_a = table.block(a.0, a.1);
    let block_b = table.block(b.0, b.1);
    let mut sum_sq = F::zero();
    for (x, y) in block_a.iter().zip(block_b.iter()) {
        let diff = *x - *y;
        sum_sq += diff * diff;
    }
    let b_f = F::usize_as(table.block_size());
    sum_sq / (b_f * b_f)
}

/// Score every candidate slot of the clipped window centered on `ref_pos`.
pub fn compute_window_scores<F: Bm3dFloat>(
    table: &SpectralTable<F>,
    ref_pos: (usize, usize),
    window_size: usize,
) -> WindowScores<F> {
    let window = SearchWindow::centered(
        ref_pos,
        table.image_dim(),
        table.block_size(),
        window_size,
    );

    let mut scores = Array2::from_elem((window_size, window_size), F::infinity());
    for wr in 0..window_size {
        for wc in 0..window_size {
            if let Some(origin) = window.origin_at(wr, wc) {
                scores[[wr, wc]] = spectral_distance(table, ref_pos, origin);
            }
        }
    }

    WindowScores {
        window,
        ref_pos,
        scores,
    }
}

/// Assemble the Match Set for one reference block: up to `max_matches`
/// origins, ascending by score.
///
/// The reference origin is pinned at rank 0 — it is always its own best
/// match — and the remaining candidates follow the stable ascending order,
/// so candidates sharing a score rank in row-major scan order of the
/// window. Sentinel and NaN slots are never selected. The returned length
/// is `min(max_matches, valid candidates in the window)`.
pub fn select_matches<F: Bm3dFloat>(
    scores: &WindowScores<F>,
    max_matches: usize,
) -> Vec<BlockMatch<F>> {
    let flat = scores.as_flat();
    let order = argsort_stable(flat, flat.len());
    let window = scores.window();
    let ref_slot = scores.ref_slot();
    let (ref_row, ref_col) = scores.ref_pos();

    let mut matches = Vec::with_capacity(max_matches.min(flat.len()));
    if max_matches == 0 {
        return matches;
    }
    matches.push(BlockMatch {
        row: ref_row,
        col: ref_col,
        distance: F::zero(),
    });

    for idx in order {
        if matches.len() == max_matches {
            break;
        }
        if idx == ref_slot {
            continue;
        }
        let score = flat[idx];
        if !score.is_finite() {
            // Sorted ascending with NaN ranked as +inf: nothing selectable
            // remains past the first non-finite slot.
            break;
        }
        let (row, col) = window
            .origin_at(idx / window.size(), idx % window.size())
            .expect("finite score implies a valid window slot");
        matches.push(BlockMatch {
            row,
            col,
            distance: score,
        });
    }

    matches
}
