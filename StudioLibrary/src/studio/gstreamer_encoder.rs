use std::path::Path;
use gstreamer_app::AppSrc;
use gstreamer::prelude::*;
use image::{RgbImage, RgbaImage};
use image::buffer::ConvertBuffer;
use crate::utils::logging::*;
use crate::studio::assembler::{VideoEncoder, VideoWriter};
use gstreamer::{Bin, Buffer, Caps, ClockTime, Element, Fraction, MessageView, State};

/// H.264/MP4 encoder backed by `appsrc ! videoconvert ! x264enc ! mp4mux ! filesink`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GStreamerEncoder;

impl VideoEncoder for GStreamerEncoder {
    fn open(&self, output_path: &Path, frame_rate: u32, width: u32, height: u32) -> Result<Box<dyn VideoWriter>, VideoEntry> {
        GStreamerWriter::new(output_path, frame_rate, width, height)
            .map(|writer| Box::new(writer) as Box<dyn VideoWriter>)
            .map_err(|err| VideoEntry::AssemblyFailure(err.into()))
    }
}

pub struct GStreamerWriter {
    pipeline: Element,
    source: AppSrc,
    frame_rate: u64,
    frame_index: u64,
    finished: bool,
}

impl GStreamerWriter {
    fn new(output_path: &Path, frame_rate: u32, width: u32, height: u32) -> Result<Self, GStreamerEntry> {
        let pipeline_string = format!(
            "appsrc name=source is-live=false format=time ! videoconvert ! x264enc ! \
            video/x-h264,profile=high ! mp4mux ! filesink location={:?}",
            output_path
        );
        let pipeline = gstreamer::parse::launch(&pipeline_string)
            .map_err(GStreamerEntry::CreatePipelineError)?;
        let source = pipeline.clone()
            .downcast::<Bin>().ok()
            .and_then(|bin| bin.by_name("source"))
            .and_then(|element| element.downcast::<AppSrc>().ok())
            .ok_or(GStreamerEntry::GetElementError("source"))?;
        let caps = Caps::builder("video/x-raw")
            .field("format", "RGBA")
            .field("width", width as i32)
            .field("height", height as i32)
            .field("framerate", Fraction::new(frame_rate as i32, 1))
            .build();
        source.set_caps(Some(&caps));
        pipeline.set_state(State::Playing)
            .map_err(GStreamerEntry::PipelineSetStateError)?;
        Ok(Self {
            pipeline,
            source,
            frame_rate: u64::from(frame_rate),
            frame_index: 0,
            finished: false,
        })
    }

    fn push(&mut self, frame: &RgbImage) -> Result<(), GStreamerEntry> {
        let rgba: RgbaImage = frame.convert();
        let mut buffer = Buffer::from_mut_slice(rgba.into_raw());
        if let Some(buffer) = buffer.get_mut() {
            buffer.set_pts(ClockTime::from_nseconds(self.frame_index * 1_000_000_000 / self.frame_rate));
            buffer.set_duration(ClockTime::from_nseconds(1_000_000_000 / self.frame_rate));
        }
        self.source.push_buffer(buffer)
            .map_err(|err| GStreamerEntry::PushBufferError(self.frame_index, err))?;
        self.frame_index += 1;
        Ok(())
    }

    fn drain(&mut self) -> Result<(), GStreamerEntry> {
        self.source.end_of_stream()
            .map_err(GStreamerEntry::EndOfStreamError)?;
        let bus = self.pipeline.bus().ok_or(GStreamerEntry::GetBusError)?;
        let mut result = Ok(());
        for message in bus.iter_timed(ClockTime::NONE) {
            match message.view() {
                MessageView::Eos(..) => break,
                MessageView::Error(err) => {
                    let source = err.src().map(|source| source.path_string().to_string()).unwrap_or_default();
                    result = Err(GStreamerEntry::InternalError(source, err.error()));
                    break;
                }
                _ => {}
            }
        }
        self.finished = true;
        self.pipeline.set_state(State::Null)
            .map_err(GStreamerEntry::PipelineSetStateError)?;
        result
    }
}

impl VideoWriter for GStreamerWriter {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), VideoEntry> {
        self.push(frame).map_err(|err| VideoEntry::AssemblyFailure(err.into()))
    }

    fn finish(mut self: Box<Self>) -> Result<(), VideoEntry> {
        self.drain().map_err(|err| VideoEntry::AssemblyFailure(err.into()))
    }
}

impl Drop for GStreamerWriter {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.pipeline.set_state(State::Null);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    #[ignore = "requires the x264 and mp4mux GStreamer plugins"]
    fn encodes_frames_into_mp4() {
        gstreamer::init().unwrap();
        let root = TempDir::new().unwrap();
        let output_path = root.path().join("clip.mp4");
        let mut writer = GStreamerEncoder.open(&output_path, 10, 64, 48).unwrap();
        for value in 0..5_u8 {
            writer.write_frame(&RgbImage::from_pixel(64, 48, Rgb([value * 40, 0, 0]))).unwrap();
        }
        writer.finish().unwrap();
        assert!(std::fs::metadata(&output_path).unwrap().len() > 0);
    }
}
