//! Pipeline orchestration module
//!
//! This module wires the PSF, blur, noise and deconvolution stages together
//! with the image reading, writing and display collaborators.

mod deblur;
pub mod timing;

pub use deblur::{DeblurOutcome, DeblurPipeline};
pub use timing::{PipelineTimings, StageTiming, Timer};
