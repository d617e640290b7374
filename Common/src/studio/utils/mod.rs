pub mod bounding_box;
pub mod detection_result;
