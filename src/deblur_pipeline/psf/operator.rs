//! Dense matrix realization of a PSF.
//!
//! The kernel is laid out as a band around the diagonal of an
//! `image_size × image_size` matrix. Rows near the border keep only the taps
//! that fall inside the image and are not renormalized, so the blur loses
//! energy at the edges. Memory is O(image_size²) and inverting it is
//! O(image_size³); the representation is only practical for small images.

use nalgebra::DMatrix;
use tracing::debug;

use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::psf::kernel::Kernel;

/// A square matrix applied along the row axis of an image.
pub trait LinearOperator {
    fn matrix(&self) -> &DMatrix<f64>;

    fn size(&self) -> usize {
        self.matrix().nrows()
    }
}

/// Banded blur operator built from a [`Kernel`]
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    matrix: DMatrix<f64>,
}

impl Operator {
    /// Expand `kernel` into an `image_size × image_size` banded matrix.
    pub fn build(kernel: &Kernel, image_size: usize) -> Result<Self> {
        if image_size == 0 {
            return Err(DeblurError::InvalidParameter(
                "image size must be positive".to_string(),
            ));
        }
        if kernel.len() > image_size {
            return Err(DeblurError::ShapeMismatch(format!(
                "kernel of length {} exceeds image dimension {}",
                kernel.len(),
                image_size
            )));
        }

        let mid = kernel.mid();
        let mut matrix = DMatrix::<f64>::zeros(image_size, image_size);
        for i in 0..image_size {
            for (j, &tap) in kernel.taps().iter().enumerate() {
                // column i + j - mid, skipped when it falls outside the image
                let Some(col) = (i + j).checked_sub(mid) else {
                    continue;
                };
                if col < image_size {
                    matrix[(i, col)] = tap;
                }
            }
        }

        debug!(image_size, kernel_len = kernel.len(), "Built PSF operator");
        Ok(Self { matrix })
    }

    /// Wrap an arbitrary square matrix, e.g. a hand-made degenerate operator.
    pub fn from_matrix(matrix: DMatrix<f64>) -> Result<Self> {
        if !matrix.is_square() || matrix.nrows() == 0 {
            return Err(DeblurError::ShapeMismatch(format!(
                "operator must be a non-empty square matrix, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        Ok(Self { matrix })
    }
}

impl LinearOperator for Operator {
    fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deblur_pipeline::psf::kernel::PsfKind;

    #[test]
    fn test_band_placement() {
        let kernel = PsfKind::Gaussian.synthesize(3, 1.0).unwrap();
        let op = Operator::build(&kernel, 5).unwrap();
        let taps = kernel.taps();
        let m = op.matrix();

        assert_eq!(m.shape(), (5, 5));
        // first row loses the left tap
        assert_eq!(m[(0, 0)], taps[1]);
        assert_eq!(m[(0, 1)], taps[2]);
        assert_eq!(m.row(0).iter().filter(|v| **v != 0.0).count(), 2);
        // interior rows carry the whole kernel
        assert_eq!(m[(2, 1)], taps[0]);
        assert_eq!(m[(2, 2)], taps[1]);
        assert_eq!(m[(2, 3)], taps[2]);
        // last row loses the right tap
        assert_eq!(m[(4, 3)], taps[0]);
        assert_eq!(m[(4, 4)], taps[1]);
        assert!(m.row(4).sum() < 1.0);
    }

    #[test]
    fn test_row_support_matches_truncation_rule() {
        for (kind, n, param) in [
            (PsfKind::Gaussian, 5, 2.0),
            (PsfKind::Gaussian, 4, 1.0),
            (PsfKind::Defocus, 7, 10.0),
            (PsfKind::Defocus, 1, 1.0),
        ] {
            let kernel = kind.synthesize(n, param).unwrap();
            let size = 9;
            let mid = kernel.mid() as isize;
            let op = Operator::build(&kernel, size).unwrap();

            for i in 0..size {
                let lo = (i as isize - mid).max(0) as usize;
                let hi = (i as isize - mid + n as isize).min(size as isize) as usize;
                let row = op.matrix().row(i);
                let nonzero: Vec<usize> = (0..size).filter(|&c| row[c] != 0.0).collect();

                assert!(nonzero.len() <= n);
                assert!(nonzero.iter().all(|&c| c >= lo && c < hi), "row {i}: {nonzero:?}");
            }
        }
    }

    #[test]
    fn test_kernel_longer_than_image() {
        let kernel = PsfKind::Gaussian.synthesize(9, 1.0).unwrap();
        assert!(matches!(Operator::build(&kernel, 8), Err(DeblurError::ShapeMismatch(_))));
    }

    #[test]
    fn test_zero_image_size() {
        let kernel = PsfKind::Gaussian.synthesize(1, 1.0).unwrap();
        assert!(matches!(Operator::build(&kernel, 0), Err(DeblurError::InvalidParameter(_))));
    }

    #[test]
    fn test_from_matrix_requires_square() {
        assert!(Operator::from_matrix(DMatrix::zeros(3, 3)).is_ok());
        assert!(matches!(
            Operator::from_matrix(DMatrix::zeros(3, 4)),
            Err(DeblurError::ShapeMismatch(_))
        ));
    }
}
