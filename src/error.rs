//! Error types for the spectral core.
//!
//! Only configuration problems are user-visible failures: boundary reads
//! are resolved by edge replication and invalid window slots by sentinel
//! scores, neither of which is an error.

use thiserror::Error;

/// Invalid pipeline configuration, detected before any computation starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("block_size must be > 0")]
    ZeroBlockSize,

    #[error("step_size must be > 0")]
    ZeroStepSize,

    #[error("max_matches must be > 0")]
    ZeroMaxMatches,

    #[error("search_window {window} is smaller than block_size {block}")]
    WindowSmallerThanBlock { window: usize, block: usize },

    #[error("image size ({rows}, {cols}) is smaller than block_size {block}")]
    ImageSmallerThanBlock {
        rows: usize,
        cols: usize,
        block: usize,
    },

    #[error("threshold multiplier and sigma must be >= 0")]
    NegativeThreshold,
}

/// Invalid input to an image-quality metric.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error("image dimensions differ: ({rows_a}, {cols_a}) vs ({rows_b}, {cols_b})")]
    DimensionMismatch {
        rows_a: usize,
        cols_a: usize,
        rows_b: usize,
        cols_b: usize,
    },

    #[error("metric input image is empty")]
    EmptyImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::WindowSmallerThanBlock {
            window: 4,
            block: 8,
        };
        assert_eq!(
            err.to_string(),
            "search_window 4 is smaller than block_size 8"
        );

        let err = ConfigError::ImageSmallerThanBlock {
            rows: 6,
            cols: 6,
            block: 8,
        };
        assert_eq!(
            err.to_string(),
            "image size (6, 6) is smaller than block_size 8"
        );
    }

    #[test]
    fn test_metric_error_messages() {
        let err = MetricError::DimensionMismatch {
            rows_a: 2,
            cols_a: 3,
            rows_b: 4,
            cols_b: 5,
        };
        assert_eq!(err.to_string(), "image dimensions differ: (2, 3) vs (4, 5)");
    }
}
