//! Float trait abstraction for f32/f64 support.
//!
//! This module provides a unified trait for floating-point operations,
//! enabling the BM3D spectral core to work with both f32 and f64 precision.

use num_traits::{Float, FromPrimitive, NumAssign};
use std::fmt::Debug;
use std::iter::Sum;

/// Trait alias for floating point types supported by the spectral core.
///
/// This trait combines all the bounds needed for the pipeline:
/// - Basic float operations (Float, NumAssign)
/// - Conversion from primitive types (FromPrimitive)
/// - Iteration support (Sum)
/// - Debug printing
pub trait Bm3dFloat:
    Float + FromPrimitive + NumAssign + Sum + Debug + Send + Sync + 'static
{
    /// The constant PI for this float type.
    const PI: Self;

    /// Largest representable pixel intensity (255.0).
    const PIXEL_MAX: Self;

    /// Create a value from an f64 constant.
    fn from_f64_c(val: f64) -> Self;

    /// Create a value from a usize constant.
    fn usize_as(val: usize) -> Self;

    /// Create a value from an 8-bit pixel intensity.
    fn u8_as(val: u8) -> Self;
}

impl Bm3dFloat for f32 {
    const PI: Self = std::f32::consts::PI;
    const PIXEL_MAX: Self = 255.0;

    #[inline]
    fn from_f64_c(val: f64) -> Self {
        val as f32
    }

    #[inline]
    fn usize_as(val: usize) -> Self {
        val as f32
    }

    #[inline]
    fn u8_as(val: u8) -> Self {
        val as f32
    }
}

impl Bm3dFloat for f64 {
    const PI: Self = std::f64::consts::PI;
    const PIXEL_MAX: Self = 255.0;

    #[inline]
    fn from_f64_c(val: f64) -> Self {
        val
    }

    #[inline]
    fn usize_as(val: usize) -> Self {
        val as f64
    }

    #[inline]
    fn u8_as(val: u8) -> Self {
        val as f64
    }
}
