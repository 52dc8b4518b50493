use std::io::Write;
use crate::deblur_pipeline::common::error::Result;
use crate::deblur_pipeline::image::types::Image;
use crate::deblur_pipeline::image::output::OutputConfig;

pub trait ImageWriter {
    fn write_image(&self, image: &Image, output: &mut dyn Write, config: &OutputConfig) -> Result<()>;
}
