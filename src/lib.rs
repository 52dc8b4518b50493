pub mod deblur_pipeline;
pub mod logger;
