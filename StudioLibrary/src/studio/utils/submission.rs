use std::fmt::Display;
use serde::Serialize;

#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Received,
    Staged,
    Sorted,
    Annotated(usize),
    Assembled,
    CleanedUp,
    Reported,
    Failed,
}

impl Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Received => write!(f, "Received"),
            SubmissionStatus::Staged => write!(f, "Staged"),
            SubmissionStatus::Sorted => write!(f, "Sorted"),
            SubmissionStatus::Annotated(index) => write!(f, "Annotated frame {index}"),
            SubmissionStatus::Assembled => write!(f, "Assembled"),
            SubmissionStatus::CleanedUp => write!(f, "Cleaned up"),
            SubmissionStatus::Reported => write!(f, "Reported"),
            SubmissionStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Outcome of a successful submission, as reported to the client.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatedVideo {
    pub video_url: String,
    pub patient_name: String,
    pub frame_count: usize,
}
