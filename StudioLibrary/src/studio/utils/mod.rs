pub mod frame;
pub mod submission;
pub mod uploaded_image;
pub mod video_info;

pub use Common::studio::utils::*;
