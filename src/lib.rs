//! BM3D Spectral Core Library
//!
//! Pure Rust implementation of the computational core of a BM3D
//! (Block-Matching and 3D filtering) image denoiser: per-origin block
//! spectra, windowed block matching with stable top-K selection, and
//! collaborative filtering of matched-block groups in a joint spectral
//! domain. Aggregation of overlapping block estimates into a final image is
//! an external concern and is not part of this crate.

pub mod argsort;
pub mod block_matching;
pub mod conv;
pub mod error;
pub mod filtering;
pub mod float_trait;
pub mod image_dct;
pub mod pipeline;
pub mod spectral_table;
pub mod ssim;
pub mod transforms;

// Re-export commonly used types at the crate root
pub use argsort::argsort_stable;
pub use block_matching::{
    compute_window_scores, select_matches, spectral_distance, BlockMatch, SearchWindow,
    WindowScores,
};
pub use error::{ConfigError, MetricError};
pub use filtering::{hard_threshold, Thresholding};
pub use float_trait::Bm3dFloat;
pub use pipeline::{run_block_estimates, BlockResult, Bm3dConfig, Bm3dOutput};
pub use spectral_table::SpectralTable;
pub use transforms::DctBasis;
