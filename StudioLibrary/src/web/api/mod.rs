pub mod log;
pub mod video;
pub mod config;
pub mod default;
pub mod results;
