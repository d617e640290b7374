use tokio::fs;
use std::sync::Arc;
use std::path::Path;
use image::{Rgb, RgbImage};
use imageproc::rect::Rect;
use ab_glyph::{FontArc, PxScale};
use crate::utils::logging::*;
use crate::utils::config::Config;
use crate::studio::detector::Detector;
use crate::studio::utils::frame::Frame;
use crate::studio::utils::bounding_box::BoundingBox;
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStyle {
    pub label: String,
    pub border_color: Rgb<u8>,
    pub text_color: Rgb<u8>,
    pub border_width: u32,
    pub font_size: f32,
    pub label_offset: u32,
}

impl AnnotationStyle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            label: config.label.clone(),
            border_color: Rgb(config.border_color),
            text_color: Rgb(config.text_color),
            border_width: config.border_width,
            font_size: config.font_size,
            label_offset: config.label_offset,
        }
    }
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Burns detections into frames. Without a detector, or when detection fails, frames pass
/// through untouched.
#[derive(Clone, Default)]
pub struct FrameAnnotator {
    detector: Option<Arc<dyn Detector>>,
    font: Option<FontArc>,
}

impl FrameAnnotator {
    pub fn new(detector: Option<Arc<dyn Detector>>, font: Option<FontArc>) -> Self {
        Self {
            detector,
            font,
        }
    }

    pub fn detector(&self) -> Option<&Arc<dyn Detector>> {
        self.detector.as_ref()
    }

    pub async fn annotate(&self, frame: &Frame, style: &AnnotationStyle) -> RgbImage {
        let Some(detector) = &self.detector else {
            return frame.image.clone();
        };
        match detector.detect(frame).await {
            Ok(bounding_boxes) => draw_bounding_boxes(&frame.image, &bounding_boxes, style, self.font.as_ref()),
            Err(err) => {
                logging_warning!(err);
                frame.image.clone()
            }
        }
    }
}

pub async fn load_font(font_path: &str) -> Option<FontArc> {
    let font_data = match fs::read(font_path).await {
        Ok(font_data) => font_data,
        Err(err) => {
            logging_warning!(VideoEntry::FontUnavailable(IOEntry::ReadFileError(Path::new(font_path).display(), err).into()));
            return None;
        }
    };
    match FontArc::try_from_vec(font_data) {
        Ok(font) => Some(font),
        Err(err) => {
            logging_warning!(VideoEntry::FontUnavailable(format!("{font_path}: {err}")));
            None
        }
    }
}

pub fn draw_bounding_boxes(image: &RgbImage, bounding_boxes: &[BoundingBox], style: &AnnotationStyle, font: Option<&FontArc>) -> RgbImage {
    let mut canvas = image.clone();
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return canvas;
    }
    for bounding_box in bounding_boxes {
        let (x1, y1, x2, y2) = bounding_box.clamp_to(width, height);
        let base_rectangle = Rect::at(x1 as i32, y1 as i32).of_size(x2 - x1 + 1, y2 - y1 + 1);
        //Grow the outline outwards, one ring per pixel of border width.
        for i in 0..style.border_width {
            let offset_rect = Rect::at(base_rectangle.left() - i as i32, base_rectangle.top() - i as i32)
                .of_size(base_rectangle.width() + 2 * i, base_rectangle.height() + 2 * i);
            draw_hollow_rect_mut(&mut canvas, offset_rect, style.border_color);
        }
        if let Some(font) = font {
            let position_x = x1 as i32;
            let position_y = y1 as i32 - style.label_offset as i32 - style.font_size as i32;
            draw_text_mut(&mut canvas, style.text_color, position_x, position_y, PxScale::from(style.font_size), font, &style.label);
        }
    }
    canvas
}
