use serde::{Serialize, Deserialize};
use crate::studio::utils::bounding_box::BoundingBox;

/// One reply line of the detector worker, `{"Ok": [...]}` or `{"Err": "..."}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(transparent)]
pub struct DetectionResult {
    pub result: Result<Vec<BoundingBox>, String>,
}

impl DetectionResult {
    pub fn into(self) -> Result<Vec<BoundingBox>, String> {
        self.result
    }
}
