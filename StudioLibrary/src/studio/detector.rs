use tokio::fs;
use std::sync::Arc;
use async_trait::async_trait;
use crate::utils::logging::*;
use crate::utils::config::Config;
use crate::studio::utils::frame::Frame;
use crate::studio::ultralytics::UltralyticsDetector;
use crate::studio::utils::bounding_box::BoundingBox;

/// Locates objects of interest in a single frame.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<Vec<BoundingBox>, VideoEntry>;

    async fn shutdown(&self) {}
}

/// Loads the detection model once for the whole process. `None` disables annotation.
pub async fn load_detector(config: &Config) -> Option<Arc<dyn Detector>> {
    if !fs::try_exists(&config.model_path).await.unwrap_or(false) {
        logging_notice!(VideoEntry::ModelUnavailable(config.model_path.clone()));
        return None;
    }
    match UltralyticsDetector::load(config).await {
        Ok(detector) => {
            logging_information!(VideoEntry::ModelLoaded(config.model_path.clone()));
            Some(Arc::new(detector))
        }
        Err(err) => {
            logging_warning!(err);
            None
        }
    }
}
