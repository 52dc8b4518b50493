//! SVD inversion of a blur operator.

use nalgebra::DMatrix;
use tracing::{debug, instrument};

use crate::deblur_pipeline::blur;
use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::image::Image;
use crate::deblur_pipeline::psf::{LinearOperator, Operator};

/// Exact inverse of an [`Operator`], assembled as `V · Σ⁻¹ · Uᵗ`
#[derive(Debug, Clone, PartialEq)]
pub struct InverseOperator {
    matrix: DMatrix<f64>,
    condition_number: f64,
}

impl InverseOperator {
    /// Ratio of the largest to the smallest singular value of the source operator.
    pub fn condition_number(&self) -> f64 {
        self.condition_number
    }
}

impl LinearOperator for InverseOperator {
    fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }
}

/// Invert `operator` through its singular value decomposition.
///
/// No truncation or regularization is applied: a singular value that is
/// zero, non-finite, or below `max(σ) · size · ε` makes the operator
/// singular and is reported as [`DeblurError::SingularOperator`].
#[instrument(skip(operator), fields(size = operator.size()))]
pub fn invert(operator: &Operator) -> Result<InverseOperator> {
    let size = operator.size();
    let svd = operator.matrix().clone().svd(true, true);

    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(DeblurError::SingularOperator(
            "singular value decomposition did not produce U and Vᵗ".to_string(),
        ));
    };
    let sigma = svd.singular_values;

    if sigma.iter().any(|s| !s.is_finite()) {
        return Err(DeblurError::SingularOperator(
            "operator has non-finite singular values".to_string(),
        ));
    }
    let max = sigma.max();
    let min = sigma.min();
    let tolerance = max * size as f64 * f64::EPSILON;
    debug!(max, min, tolerance, "Singular value range");

    if max <= 0.0 || min <= tolerance {
        return Err(DeblurError::SingularOperator(format!(
            "smallest singular value {min:e} is below tolerance {tolerance:e}"
        )));
    }

    let mut sigma_inv = DMatrix::<f64>::zeros(size, size);
    for (i, s) in sigma.iter().enumerate() {
        sigma_inv[(i, i)] = 1.0 / s;
    }
    let matrix = v_t.transpose() * sigma_inv * u.transpose();

    Ok(InverseOperator {
        matrix,
        condition_number: max / min,
    })
}

/// Recover an image blurred by the operator that `inverse` was built from.
pub fn deconvolve(inverse: &InverseOperator, blurred: &Image, is_color: bool) -> Result<Image> {
    blur::apply(inverse, blurred, is_color)
}
