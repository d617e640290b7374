pub mod utils;
pub mod query;
pub mod studio;
pub mod storage;
pub mod detector;
pub mod pipeline;
pub mod annotator;
pub mod assembler;
pub mod ultralytics;
pub mod gstreamer_encoder;
