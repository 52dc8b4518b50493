//! Point-spread function module
//!
//! This module synthesizes 1-D PSF kernels and expands them into the dense
//! operators used for blurring and deblurring.

pub mod kernel;
pub mod operator;

pub use kernel::{Kernel, PsfKind};
pub use operator::{LinearOperator, Operator};
