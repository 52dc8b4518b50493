//! Applying an operator to an image.
//!
//! The operator multiplies each channel from the left, so the blur acts along
//! the vertical axis only; columns are transformed independently.

use tracing::debug;

use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::image::{ColorMode, Image};
use crate::deblur_pipeline::psf::LinearOperator;

/// Return `operator × image` computed channel by channel.
///
/// `is_color` is the configured layout; an image whose channel count
/// disagrees with it is rejected.
pub fn apply<O: LinearOperator + ?Sized>(operator: &O, image: &Image, is_color: bool) -> Result<Image> {
    let expected = ColorMode::from_color_flag(is_color);
    if image.mode() != expected || image.channels() != expected.channels() {
        return Err(DeblurError::ShapeMismatch(format!(
            "image has {} channel(s) but {:?} was configured",
            image.channels(),
            expected
        )));
    }

    let matrix = operator.matrix();
    if matrix.ncols() != image.height() {
        return Err(DeblurError::ShapeMismatch(format!(
            "operator of size {}x{} cannot be applied to an image with {} rows",
            matrix.nrows(),
            matrix.ncols(),
            image.height()
        )));
    }

    debug!(
        rows = image.height(),
        cols = image.width(),
        channels = image.channels(),
        "Applying operator"
    );
    let planes = image.planes().iter().map(|plane| matrix * plane).collect();
    Ok(Image::from_planes(planes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deblur_pipeline::psf::{Operator, PsfKind};
    use nalgebra::DMatrix;

    #[test]
    fn test_identity_kernel_is_noop() {
        let kernel = PsfKind::Defocus.synthesize(1, 1.0).unwrap();
        let op = Operator::build(&kernel, 4).unwrap();
        let image = Image::grayscale(DMatrix::from_fn(4, 6, |r, c| (r * 6 + c) as f64 / 24.0));

        let result = apply(&op, &image, false).unwrap();
        assert!(result.mean_abs_diff(&image).unwrap() < 1e-15);
    }

    #[test]
    fn test_columns_blurred_independently() {
        let kernel = PsfKind::Defocus.synthesize(3, 1.0).unwrap();
        let op = Operator::build(&kernel, 3).unwrap();
        // a single bright pixel in the middle of the first column
        let mut plane = DMatrix::zeros(3, 2);
        plane[(1, 0)] = 1.0;

        let result = apply(&op, &Image::grayscale(plane), false).unwrap();
        let out = &result.planes()[0];
        for r in 0..3 {
            assert!((out[(r, 0)] - 1.0 / 3.0).abs() < 1e-12);
            assert_eq!(out[(r, 1)], 0.0);
        }
    }

    #[test]
    fn test_color_channels_use_same_operator() {
        let kernel = PsfKind::Gaussian.synthesize(3, 1.0).unwrap();
        let op = Operator::build(&kernel, 4).unwrap();
        let base = DMatrix::from_fn(4, 3, |r, c| (r + c) as f64 / 10.0);
        let image = Image::color([base.clone(), base.scale(0.5), base.scale(0.25)]).unwrap();

        let result = apply(&op, &image, true).unwrap();
        let expected = op.matrix() * &base;
        assert_eq!(result.channels(), 3);
        assert!((&result.planes()[0] - &expected).abs().max() < 1e-12);
        assert!((&result.planes()[1] - expected.scale(0.5)).abs().max() < 1e-12);
        assert!((&result.planes()[2] - expected.scale(0.25)).abs().max() < 1e-12);
    }

    #[test]
    fn test_channel_mismatch() {
        let kernel = PsfKind::Gaussian.synthesize(3, 1.0).unwrap();
        let op = Operator::build(&kernel, 4).unwrap();
        let image = Image::grayscale(DMatrix::zeros(4, 4));

        assert!(matches!(apply(&op, &image, true), Err(DeblurError::ShapeMismatch(_))));
    }

    #[test]
    fn test_row_count_mismatch() {
        let kernel = PsfKind::Gaussian.synthesize(3, 1.0).unwrap();
        let op = Operator::build(&kernel, 5).unwrap();
        let image = Image::grayscale(DMatrix::zeros(4, 4));

        assert!(matches!(apply(&op, &image, false), Err(DeblurError::ShapeMismatch(_))));
    }
}
