use std::sync::Arc;
use std::path::PathBuf;
use tokio::task::spawn_blocking;
use crate::utils::logging::*;
use crate::utils::config::Config;
use crate::studio::query;
use crate::studio::utils::frame::Frame;
use crate::studio::utils::video_info::VideoInfo;
use crate::studio::utils::uploaded_image::UploadedImage;
use crate::studio::assembler::{VideoAssembler, VideoEncoder};
use crate::studio::annotator::{AnnotationStyle, FrameAnnotator};
use crate::studio::utils::submission::{CreatedVideo, SubmissionStatus};
use crate::studio::storage::{is_allowed_image, sanitize_file_name, StagingDirectory, StorageLayout, DEFAULT_PATIENT_NAME};

/// Turns a batch of uploaded images into a published video.
///
/// A submission moves through `Received`, `Staged`, `Sorted`, `Annotated(i)`, `Assembled`,
/// `CleanedUp` and `Reported`; any failure ends it in `Failed`. The staging directory is
/// removed on every path.
pub struct Pipeline {
    storage: StorageLayout,
    annotator: FrameAnnotator,
    encoder: Arc<dyn VideoEncoder>,
}

impl Pipeline {
    pub fn new(storage: StorageLayout, annotator: FrameAnnotator, encoder: Arc<dyn VideoEncoder>) -> Self {
        Self {
            storage,
            annotator,
            encoder,
        }
    }

    pub fn storage(&self) -> &StorageLayout {
        &self.storage
    }

    pub fn annotator(&self) -> &FrameAnnotator {
        &self.annotator
    }

    pub async fn create_video(&self, config: &Config, patient_name: &str, uploads: Vec<UploadedImage>) -> Result<CreatedVideo, VideoEntry> {
        let patient_name = if patient_name.trim().is_empty() { DEFAULT_PATIENT_NAME } else { patient_name };
        Self::transition(patient_name, SubmissionStatus::Received).await;
        if uploads.is_empty() {
            return Err(VideoEntry::NoFilesProvided);
        }
        if !uploads.iter().any(|upload| is_allowed_image(&sanitize_file_name(&upload.file_name))) {
            return Err(VideoEntry::NoValidImages);
        }
        let staging = self.storage.stage(patient_name).await?;
        let stem = staging.stem().to_string();
        Self::transition(&stem, SubmissionStatus::Staged).await;
        let result = self.process(config, &staging, &uploads).await;
        match staging.cleanup().await {
            Ok(_) => Self::transition(&stem, SubmissionStatus::CleanedUp).await,
            Err(err) => logging_error!(err),
        }
        match result {
            Ok((file_name, frame_count)) => {
                logging_information!(VideoEntry::VideoPublished(file_name.clone(), frame_count));
                Self::transition(&stem, SubmissionStatus::Reported).await;
                Ok(CreatedVideo {
                    video_url: StorageLayout::video_url(&file_name),
                    patient_name: patient_name.to_string(),
                    frame_count,
                })
            }
            Err(err) => {
                Self::transition(&stem, SubmissionStatus::Failed).await;
                Err(err)
            }
        }
    }

    async fn process(&self, config: &Config, staging: &StagingDirectory, uploads: &[UploadedImage]) -> Result<(String, usize), VideoEntry> {
        let mut image_paths = Vec::new();
        for upload in uploads {
            if let Some(image_path) = staging.persist(upload).await? {
                image_paths.push(image_path);
            }
        }
        if image_paths.is_empty() {
            return Err(VideoEntry::NoValidImages);
        }
        image_paths.sort();
        Self::transition(staging.stem(), SubmissionStatus::Sorted).await;
        let style = AnnotationStyle::from_config(config);
        let mut assembler = VideoAssembler::new(self.encoder.clone(), staging.encode_path(), config.frame_rate);
        for image_path in image_paths {
            let frame = Self::decode_frame(image_path).await?;
            let annotated = self.annotator.annotate(&frame, &style).await;
            let index = assembler.frame_count();
            assembler.push(&frame.path, &annotated)?;
            Self::transition(staging.stem(), SubmissionStatus::Annotated(index)).await;
        }
        let frame_count = assembler.finish().await?;
        Self::transition(staging.stem(), SubmissionStatus::Assembled).await;
        let file_name = self.storage.publish(&staging.encode_path(), staging.stem()).await?;
        Ok((file_name, frame_count))
    }

    async fn decode_frame(image_path: PathBuf) -> Result<Frame, VideoEntry> {
        spawn_blocking(move || -> Result<Frame, VideoEntry> {
            let image = image::open(&image_path)
                .map_err(|err| VideoEntry::FrameDecodeError(image_path.display().to_string(), err.to_string()))?
                .to_rgb8();
            Ok(Frame::new(image_path, image))
        }).await
            .map_err(|err| VideoEntry::AssemblyFailure(SystemEntry::TaskPanickedError(err).into()))?
    }

    async fn transition(submission: &str, status: SubmissionStatus) {
        logging_debug!(VideoEntry::StateChanged(submission.to_string(), status.to_string()));
    }

    pub async fn latest_video(&self) -> Result<VideoInfo, VideoEntry> {
        query::latest_video(self.storage.results_folder()).await
    }

    pub async fn result_path(&self, file_name: &str) -> Result<PathBuf, VideoEntry> {
        query::result_path(self.storage.results_folder(), file_name).await
    }
}
