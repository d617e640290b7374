use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoEntry {
    #[error("No image files provided")]
    NoFilesProvided,
    #[error("No valid images, accepted extensions are png, jpg, jpeg and bmp")]
    NoValidImages,
    #[error("Detection model {0} not found, annotation disabled")]
    ModelUnavailable(String),
    #[error("Detection model {0} loaded")]
    ModelLoaded(String),
    #[error("Detector worker output: {0}")]
    WorkerOutput(String),
    #[error("Failed to load detection model: {0}")]
    ModelLoadError(String),
    #[error("Detection failed on {0}: {1}")]
    DetectionFailure(String, String),
    #[error("Label font unavailable, labels will be skipped: {0}")]
    FontUnavailable(String),
    #[error("Failed to decode frame {0}: {1}")]
    FrameDecodeError(String, String),
    #[error("Frame {path} is {actual_width}x{actual_height}, expected {width}x{height}")]
    FrameDimensionMismatch {
        path: String,
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("Cannot assemble a video without frames")]
    EmptyFrameSequence,
    #[error("Video assembly failed: {0}")]
    AssemblyFailure(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Failed to clean up staging directory {0}: {1}")]
    CleanupFailure(String, IoError),
    #[error("No video found")]
    NotFound,
    #[error("Invalid file name")]
    InvalidFileName,
    #[error("Submission {0}: {1}")]
    StateChanged(String, String),
    #[error("Video {0} published with {1} frames")]
    VideoPublished(String, usize),
}

impl From<VideoEntry> for String {
    #[inline(always)]
    fn from(value: VideoEntry) -> Self {
        value.to_string()
    }
}
