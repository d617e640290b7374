use image::RgbImage;
use std::path::PathBuf;

/// A decoded image together with the staged file it was read from.
#[derive(Debug, Clone)]
pub struct Frame {
    pub path: PathBuf,
    pub image: RgbImage,
}

impl Frame {
    pub fn new(path: PathBuf, image: RgbImage) -> Self {
        Self { path, image }
    }

    pub fn file_name(&self) -> String {
        self.path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
