#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

use StudioLibrary::studio::annotator::FrameAnnotator;
use StudioLibrary::studio::assembler::{VideoEncoder, VideoWriter};
use StudioLibrary::studio::detector::Detector;
use StudioLibrary::studio::pipeline::Pipeline;
use StudioLibrary::studio::storage::StorageLayout;
use StudioLibrary::studio::utils::bounding_box::BoundingBox;
use StudioLibrary::studio::utils::frame::Frame;
use StudioLibrary::utils::logging::VideoEntry;

pub const BOUNDARY: &str = "studio-test-boundary";

/// Encoder that keeps every written frame in memory and writes a placeholder container on finish.
#[derive(Default)]
pub struct MemoryEncoder {
    pub frames: Arc<Mutex<Vec<RgbImage>>>,
    pub outputs: Arc<Mutex<Vec<PathBuf>>>,
}

impl MemoryEncoder {
    pub fn frames(&self) -> Vec<RgbImage> {
        self.frames.lock().unwrap().clone()
    }
}

struct MemoryWriter {
    output_path: PathBuf,
    frames: Arc<Mutex<Vec<RgbImage>>>,
}

impl VideoEncoder for MemoryEncoder {
    fn open(&self, output_path: &Path, _frame_rate: u32, _width: u32, _height: u32) -> Result<Box<dyn VideoWriter>, VideoEntry> {
        self.outputs.lock().unwrap().push(output_path.to_path_buf());
        Ok(Box::new(MemoryWriter {
            output_path: output_path.to_path_buf(),
            frames: self.frames.clone(),
        }))
    }
}

impl VideoWriter for MemoryWriter {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoEntry> {
        self.frames.lock().unwrap().push(frame.clone());
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<(), VideoEntry> {
        std::fs::write(&self.output_path, b"mp4")
            .map_err(|err| VideoEntry::AssemblyFailure(err.to_string()))
    }
}

pub struct FixedDetector(pub Vec<BoundingBox>);

#[async_trait]
impl Detector for FixedDetector {
    async fn detect(&self, _frame: &Frame) -> Result<Vec<BoundingBox>, VideoEntry> {
        Ok(self.0.clone())
    }
}

pub struct FailingDetector;

#[async_trait]
impl Detector for FailingDetector {
    async fn detect(&self, frame: &Frame) -> Result<Vec<BoundingBox>, VideoEntry> {
        Err(VideoEntry::DetectionFailure(frame.file_name(), "worker is gone".to_string()))
    }
}

pub struct TestStudio {
    pub root: TempDir,
    pub encoder: Arc<MemoryEncoder>,
    pub pipeline: Pipeline,
}

impl TestStudio {
    pub async fn new(detector: Option<Arc<dyn Detector>>) -> Self {
        let root = TempDir::new().unwrap();
        let storage = StorageLayout::new(root.path().join("uploads"), root.path().join("results"));
        storage.initialize().await.unwrap();
        let encoder = Arc::new(MemoryEncoder::default());
        let pipeline = Pipeline::new(storage, FrameAnnotator::new(detector, None), encoder.clone());
        Self {
            root,
            encoder,
            pipeline,
        }
    }

    pub fn upload_entries(&self) -> usize {
        std::fs::read_dir(self.pipeline.storage().upload_folder()).unwrap().count()
    }

    pub fn result_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.pipeline.storage().results_folder()).unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

pub fn solid_image(width: u32, height: u32, value: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([value, value, value]))
}

pub fn png_bytes(width: u32, height: u32, value: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    solid_image(width, height, value)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Builds a `multipart/form-data` body with an optional `patient_name` field and one `images` part per file.
pub fn multipart_body(patient_name: Option<&str>, files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(patient_name) = patient_name {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"patient_name\"\r\n\r\n");
        body.extend_from_slice(patient_name.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (file_name, data) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\n").as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
