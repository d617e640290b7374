use image::RgbImage;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use std::path::{Path, PathBuf};
use crate::utils::logging::*;

/// Opens an output container for a fixed frame size and rate.
pub trait VideoEncoder: Send + Sync {
    fn open(&self, output_path: &Path, frame_rate: u32, width: u32, height: u32) -> Result<Box<dyn VideoWriter>, VideoEntry>;
}

/// An open container. Frames are appended in call order; `finish` finalizes the file.
pub trait VideoWriter: Send {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoEntry>;

    fn finish(self: Box<Self>) -> Result<(), VideoEntry>;
}

pub struct VideoAssembler {
    encoder: Arc<dyn VideoEncoder>,
    output_path: PathBuf,
    frame_rate: u32,
    writer: Option<Box<dyn VideoWriter>>,
    dimensions: Option<(u32, u32)>,
    frame_count: usize,
}

impl VideoAssembler {
    pub fn new<P: Into<PathBuf>>(encoder: Arc<dyn VideoEncoder>, output_path: P, frame_rate: u32) -> Self {
        Self {
            encoder,
            output_path: output_path.into(),
            frame_rate,
            writer: None,
            dimensions: None,
            frame_count: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Appends one frame. The first frame fixes the video dimensions and opens the container.
    pub fn push(&mut self, source_path: &Path, frame: &RgbImage) -> Result<(), VideoEntry> {
        let (actual_width, actual_height) = frame.dimensions();
        match self.dimensions {
            Some((width, height)) if (width, height) != (actual_width, actual_height) => {
                return Err(VideoEntry::FrameDimensionMismatch {
                    path: source_path.display().to_string(),
                    width,
                    height,
                    actual_width,
                    actual_height,
                });
            }
            Some(_) => {}
            None => {
                let writer = self.encoder.open(&self.output_path, self.frame_rate, actual_width, actual_height)?;
                self.writer = Some(writer);
                self.dimensions = Some((actual_width, actual_height));
            }
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.write_frame(frame)?;
        }
        self.frame_count += 1;
        Ok(())
    }

    /// Finalizes the container and returns the number of frames written.
    pub async fn finish(self) -> Result<usize, VideoEntry> {
        let writer = self.writer.ok_or(VideoEntry::EmptyFrameSequence)?;
        let frame_count = self.frame_count;
        spawn_blocking(move || writer.finish()).await
            .map_err(|err| VideoEntry::AssemblyFailure(SystemEntry::TaskPanickedError(err).into()))??;
        Ok(frame_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingEncoder {
        opened: Mutex<Vec<(u32, u32, u32)>>,
        frames: Arc<Mutex<Vec<Rgb<u8>>>>,
        finished: Arc<Mutex<bool>>,
    }

    struct RecordingWriter {
        frames: Arc<Mutex<Vec<Rgb<u8>>>>,
        finished: Arc<Mutex<bool>>,
    }

    impl VideoEncoder for RecordingEncoder {
        fn open(&self, _output_path: &Path, frame_rate: u32, width: u32, height: u32) -> Result<Box<dyn VideoWriter>, VideoEntry> {
            self.opened.lock().unwrap().push((frame_rate, width, height));
            Ok(Box::new(RecordingWriter {
                frames: self.frames.clone(),
                finished: self.finished.clone(),
            }))
        }
    }

    impl VideoWriter for RecordingWriter {
        fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoEntry> {
            self.frames.lock().unwrap().push(*frame.get_pixel(0, 0));
            Ok(())
        }

        fn finish(self: Box<Self>) -> Result<(), VideoEntry> {
            *self.finished.lock().unwrap() = true;
            Ok(())
        }
    }

    fn solid(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    #[tokio::test]
    async fn writes_frames_in_push_order() {
        let encoder = Arc::new(RecordingEncoder::default());
        let mut assembler = VideoAssembler::new(encoder.clone(), "out.mp4", 10);
        for value in [3, 1, 2] {
            assembler.push(Path::new("frame.png"), &solid(4, 2, value)).unwrap();
        }
        assert_eq!(assembler.finish().await.unwrap(), 3);
        assert_eq!(*encoder.opened.lock().unwrap(), vec![(10, 4, 2)]);
        let values: Vec<u8> = encoder.frames.lock().unwrap().iter().map(|pixel| pixel[0]).collect();
        assert_eq!(values, vec![3, 1, 2]);
        assert!(*encoder.finished.lock().unwrap());
    }

    #[tokio::test]
    async fn empty_sequence_is_rejected() {
        let encoder = Arc::new(RecordingEncoder::default());
        let assembler = VideoAssembler::new(encoder.clone(), "out.mp4", 10);
        assert!(matches!(assembler.finish().await, Err(VideoEntry::EmptyFrameSequence)));
        assert!(encoder.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn mismatched_dimensions_fail() {
        let encoder = Arc::new(RecordingEncoder::default());
        let mut assembler = VideoAssembler::new(encoder, "out.mp4", 10);
        assembler.push(Path::new("a.png"), &solid(4, 4, 0)).unwrap();
        let result = assembler.push(Path::new("b.png"), &solid(8, 4, 0));
        match result {
            Err(VideoEntry::FrameDimensionMismatch { path, width, actual_width, .. }) => {
                assert_eq!(path, "b.png");
                assert_eq!(width, 4);
                assert_eq!(actual_width, 8);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(assembler.frame_count(), 1);
    }
}
