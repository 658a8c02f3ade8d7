//! Coefficient attenuation for group spectra.

use ndarray::Array3;

use crate::float_trait::Bm3dFloat;

/// Attenuation switch for the 3D group spectrum.
///
/// Whether thresholding runs at all is an explicit configuration choice,
/// not an implicit default: `Disabled` is an all-pass (the forward/inverse
/// chain reproduces the matched blocks), `Hard` zeroes every coefficient
/// whose magnitude falls below `tau = lambda * sigma`, where `sigma` is the
/// caller-supplied noise standard deviation and `lambda` a tunable
/// multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Thresholding<F: Bm3dFloat> {
    /// Leave every coefficient untouched.
    #[default]
    Disabled,
    /// Hard threshold at `tau = lambda * sigma`.
    Hard { lambda: F, sigma: F },
}

impl<F: Bm3dFloat> Thresholding<F> {
    /// Effective threshold, `None` when attenuation is disabled.
    pub fn tau(&self) -> Option<F> {
        match *self {
            Thresholding::Disabled => None,
            Thresholding::Hard { lambda, sigma } => Some(lambda * sigma),
        }
    }
}

/// Zero every coefficient with `|v| < tau`, in place.
///
/// Returns the number of retained (non-zeroed) coefficients. Retention is
/// monotone in `tau`: a larger threshold never keeps more coefficients.
pub fn hard_threshold<F: Bm3dFloat>(spectrum: &mut Array3<F>, tau: F) -> usize {
    let mut retained = 0usize;
    spectrum.map_inplace(|v| {
        if v.abs() < tau {
            *v = F::zero();
        } else {
            retained += 1;
        }
    });
    retained
}
