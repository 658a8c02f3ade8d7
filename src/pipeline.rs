//! Pipeline driver: configuration, validation, and the per-block kernel.
//!
//! The driver wires the stages strictly forward: image -> spectral table ->
//! windowed distances -> stable top-K selection -> group stack -> z-axis
//! transform -> optional hard threshold -> inverse transforms -> per-match
//! pixel estimates. Every sampled reference block runs the chain
//! independently over the shared read-only table, so reference blocks are
//! processed in parallel. Aggregating the overlapping estimates into one
//! denoised image is left to the caller.

use log::debug;
use ndarray::{s, Array2, Array3, ArrayView2, Axis};
use rayon::prelude::*;

use crate::block_matching::{compute_window_scores, select_matches, BlockMatch};
use crate::error::ConfigError;
use crate::filtering::{hard_threshold, Thresholding};
use crate::float_trait::Bm3dFloat;
use crate::spectral_table::SpectralTable;
use crate::transforms::DctBasis;

// =============================================================================
// Default Configuration
// =============================================================================

/// Default block size B.
const DEFAULT_BLOCK_SIZE: usize = 8;

/// Default stride between sampled reference origins.
const DEFAULT_STEP_SIZE: usize = 3;

/// Default search window size (origins per axis).
const DEFAULT_SEARCH_WINDOW: usize = 39;

/// Default maximum matches per group.
const DEFAULT_MAX_MATCHES: usize = 16;

/// Pipeline configuration.
///
/// Owned by the caller; validated against the image dimensions before any
/// computation starts.
#[derive(Debug, Clone, Copy)]
pub struct Bm3dConfig<F: Bm3dFloat> {
    /// Block size B. Default: 8
    pub block_size: usize,
    /// Stride between sampled reference origins. Default: 3
    pub step_size: usize,
    /// Search window size W (origins per axis, W >= B). Default: 39
    pub search_window: usize,
    /// Maximum matched blocks per group. Default: 16
    pub max_matches: usize,
    /// Group-spectrum attenuation switch. Default: disabled
    pub thresholding: Thresholding<F>,
}

impl<F: Bm3dFloat> Default for Bm3dConfig<F> {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            step_size: DEFAULT_STEP_SIZE,
            search_window: DEFAULT_SEARCH_WINDOW,
            max_matches: DEFAULT_MAX_MATCHES,
            thresholding: Thresholding::Disabled,
        }
    }
}

impl<F: Bm3dFloat> Bm3dConfig<F> {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration against the image dimensions.
    pub fn validate(&self, image_dim: (usize, usize)) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.step_size == 0 {
            return Err(ConfigError::ZeroStepSize);
        }
        if self.max_matches == 0 {
            return Err(ConfigError::ZeroMaxMatches);
        }
        if self.search_window < self.block_size {
            return Err(ConfigError::WindowSmallerThanBlock {
                window: self.search_window,
                block: self.block_size,
            });
        }
        let (rows, cols) = image_dim;
        if rows < self.block_size || cols < self.block_size {
            return Err(ConfigError::ImageSmallerThanBlock {
                rows,
                cols,
                block: self.block_size,
            });
        }
        if let Thresholding::Hard { lambda, sigma } = self.thresholding {
            if lambda < F::zero() || sigma < F::zero() {
                return Err(ConfigError::NegativeThreshold);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// Matches and estimates for one sampled reference block.
#[derive(Debug, Clone)]
pub struct BlockResult<F: Bm3dFloat> {
    /// Reference origin (top-left pixel of the reference block).
    pub ref_row: usize,
    pub ref_col: usize,
    /// Ordered match set, ascending by distance, reference first.
    pub matches: Vec<BlockMatch<F>>,
    /// One reconstructed B x B pixel block per matched rank: `[rank, i, j]`.
    pub estimates: Array3<u8>,
    /// Group-spectrum coefficients that survived attenuation (the full
    /// group when thresholding is disabled).
    pub retained: usize,
}

/// Full pipeline output: the match-set grid and estimate tensor over all
/// sampled reference origins, row-major.
#[derive(Debug, Clone)]
pub struct Bm3dOutput<F: Bm3dFloat> {
    pub ref_rows: usize,
    pub ref_cols: usize,
    blocks: Vec<BlockResult<F>>,
}

impl<F: Bm3dFloat> Bm3dOutput<F> {
    /// Result for the reference block at grid position `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> &BlockResult<F> {
        &self.blocks[i * self.ref_cols + j]
    }

    /// All per-block results in row-major grid order.
    pub fn blocks(&self) -> &[BlockResult<F>] {
        &self.blocks
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Run the full spectral pipeline over `image`.
///
/// Builds the spectral table once, then processes every sampled reference
/// origin (stride `step_size` on both axes over `[0, extent - B]`) in
/// parallel. Fails fast with [`ConfigError`] before touching any pixels.
pub fn run_block_estimates<F: Bm3dFloat>(
    image: ArrayView2<u8>,
    config: &Bm3dConfig<F>,
) -> Result<Bm3dOutput<F>, ConfigError> {
    config.validate(image.dim())?;

    let (rows, cols) = image.dim();
    let block_size = config.block_size;

    let basis = DctBasis::new(block_size);
    let table = SpectralTable::build(image, &basis);
    debug!(
        "spectral table built: {}x{} origins, block size {}",
        rows, cols, block_size
    );

    // Same per-K pre-computation as the transform plans: group lengths vary
    // with the clipped window, so one basis per possible K.
    let group_bases: Vec<DctBasis<F>> = (1..=config.max_matches).map(DctBasis::new).collect();

    let row_extent = rows - block_size;
    let col_extent = cols - block_size;
    let ref_rows = row_extent / config.step_size + 1;
    let ref_cols = col_extent / config.step_size + 1;
    let total_refs = ref_rows * ref_cols;

    let blocks: Vec<BlockResult<F>> = (0..total_refs)
        .into_par_iter()
        .map(|ref_index| {
            let ref_r = (ref_index / ref_cols) * config.step_size;
            let ref_c = (ref_index % ref_cols) * config.step_size;
            process_reference_block(&table, &basis, &group_bases, (ref_r, ref_c), config)
        })
        .collect();

    debug!(
        "processed {} reference blocks ({}x{} grid)",
        total_refs, ref_rows, ref_cols
    );

    Ok(Bm3dOutput {
        ref_rows,
        ref_cols,
        blocks,
    })
}

/// Distance -> select -> group -> z-transform -> threshold -> invert for a
/// single reference block. Selection is the only intra-block barrier: it
/// needs the complete score set before ranking.
fn process_reference_block<F: Bm3dFloat>(
    table: &SpectralTable<F>,
    block_basis: &DctBasis<F>,
    group_bases: &[DctBasis<F>],
    ref_pos: (usize, usize),
    config: &Bm3dConfig<F>,
) -> BlockResult<F> {
    let block_size = config.block_size;

    let scores = compute_window_scores(table, ref_pos, config.search_window);
    let matches = select_matches(&scores, config.max_matches);
    let k = matches.len();

    // Stack the matched spectra along the group axis: G[z] = T(match[z]).
    let mut group = Array3::zeros((k, block_size, block_size));
    for (z, m) in matches.iter().enumerate() {
        group.slice_mut(s![z, .., ..]).assign(&table.block(m.row, m.col));
    }

    let group_basis = &group_bases[k - 1];
    let mut scratch = vec![F::zero(); k];
    group_basis.forward_axis0(&mut group, &mut scratch);

    let retained = match config.thresholding.tau() {
        Some(tau) => hard_threshold(&mut group, tau),
        None => group.len(),
    };

    group_basis.inverse_axis0(&mut group, &mut scratch);

    // Back to the pixel domain, one block per matched rank.
    let mut work = Array2::zeros((block_size, block_size));
    let mut plane = Array2::zeros((block_size, block_size));
    let mut estimates = Array3::<u8>::zeros((k, block_size, block_size));
    for z in 0..k {
        block_basis.inverse_2d_into(group.index_axis(Axis(0), z), &mut work, plane.view_mut());
        for i in 0..block_size {
            for j in 0..block_size {
                estimates[[z, i, j]] = to_pixel(plane[[i, j]]);
            }
        }
    }

    BlockResult {
        ref_row: ref_pos.0,
        ref_col: ref_pos.1,
        matches,
        estimates,
        retained,
    }
}

/// Round and clamp a reconstructed value to the 8-bit pixel range.
#[inline]
fn to_pixel<F: Bm3dFloat>(value: F) -> u8 {
    let clamped = value.round().max(F::zero()).min(F::PIXEL_MAX);
    clamped.to_u8().unwrap_or(0)
}
