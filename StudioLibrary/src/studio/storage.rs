use chrono::Local;
use tokio::fs;
use std::io::ErrorKind;
use sanitize_filename::sanitize;
use std::path::{Path, PathBuf};
use crate::utils::logging::*;
use crate::utils::config::Config;
use crate::studio::utils::uploaded_image::UploadedImage;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
pub const DEFAULT_PATIENT_NAME: &str = "Unknown";

/// Owns the upload staging area and the results area.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    upload_folder: PathBuf,
    results_folder: PathBuf,
}

impl StorageLayout {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(upload_folder: P, results_folder: Q) -> Self {
        Self {
            upload_folder: upload_folder.into(),
            results_folder: results_folder.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.upload_folder, &config.results_folder)
    }

    pub fn upload_folder(&self) -> &Path {
        &self.upload_folder
    }

    pub fn results_folder(&self) -> &Path {
        &self.results_folder
    }

    pub async fn initialize(&self) -> Result<(), VideoEntry> {
        for folder in [&self.upload_folder, &self.results_folder] {
            fs::create_dir_all(folder).await
                .map_err(|err| VideoEntry::StorageError(IOEntry::CreateDirectoryError(folder.display(), err).into()))?;
        }
        Ok(())
    }

    pub fn video_file_name(stem: &str) -> String {
        format!("{stem}.mp4")
    }

    pub fn video_url(file_name: &str) -> String {
        format!("/results/{file_name}")
    }

    pub fn video_path(&self, stem: &str) -> PathBuf {
        self.results_folder.join(Self::video_file_name(stem))
    }

    /// Claims `uploads/{patient}_{YYYYMMDD_HHMMSS}` for a new submission.
    pub async fn stage(&self, patient_name: &str) -> Result<StagingDirectory, VideoEntry> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let base_stem = format!("{}_{}", patient_stem(patient_name), timestamp);
        self.claim(&base_stem).await
    }

    async fn claim(&self, base_stem: &str) -> Result<StagingDirectory, VideoEntry> {
        let mut attempt = 0_usize;
        loop {
            let stem = if attempt == 0 { base_stem.to_string() } else { format!("{base_stem}_{attempt}") };
            attempt += 1;
            if fs::try_exists(self.video_path(&stem)).await.unwrap_or(false) {
                continue;
            }
            let path = self.upload_folder.join(&stem);
            match fs::create_dir(&path).await {
                Ok(_) => return Ok(StagingDirectory::new(stem, path)),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(VideoEntry::StorageError(IOEntry::CreateDirectoryError(path.display(), err).into())),
            }
        }
    }

    /// Moves a finalized video into the results area under its public name.
    pub async fn publish(&self, encoded_path: &Path, stem: &str) -> Result<String, VideoEntry> {
        let file_name = Self::video_file_name(stem);
        let destination_path = self.results_folder.join(&file_name);
        if fs::rename(encoded_path, &destination_path).await.is_err() {
            //Different mount points, fall back to copying.
            fs::copy(encoded_path, &destination_path).await
                .map_err(|err| VideoEntry::StorageError(IOEntry::MoveFileError(encoded_path.display(), destination_path.display(), err).into()))?;
        }
        Ok(file_name)
    }

    /// Removes every leftover staging directory.
    pub async fn sweep(&self) -> Result<usize, VideoEntry> {
        let mut removed = 0_usize;
        let mut entries = fs::read_dir(&self.upload_folder).await
            .map_err(|err| VideoEntry::StorageError(IOEntry::ReadDirectoryError(self.upload_folder.display(), err).into()))?;
        while let Some(entry) = entries.next_entry().await
            .map_err(|err| VideoEntry::StorageError(IOEntry::ReadDirectoryError(self.upload_folder.display(), err).into()))?
        {
            let path = entry.path();
            if path.is_dir() {
                fs::remove_dir_all(&path).await
                    .map_err(|err| VideoEntry::CleanupFailure(path.display().to_string(), err))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Per-submission staging directory. Removed by [`StagingDirectory::cleanup`], or on drop
/// when a submission is abandoned before reaching cleanup.
#[derive(Debug)]
pub struct StagingDirectory {
    stem: String,
    path: PathBuf,
    cleaned: bool,
}

impl StagingDirectory {
    fn new(stem: String, path: PathBuf) -> Self {
        Self {
            stem,
            path,
            cleaned: false,
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encode_path(&self) -> PathBuf {
        self.path.join(StorageLayout::video_file_name(&self.stem))
    }

    /// Writes an upload under its sanitized name. Returns `None` for uploads whose name is
    /// empty after sanitizing or whose extension is not an accepted image type.
    pub async fn persist(&self, upload: &UploadedImage) -> Result<Option<PathBuf>, VideoEntry> {
        let file_name = sanitize_file_name(&upload.file_name);
        if file_name.is_empty() || !is_allowed_image(&file_name) {
            return Ok(None);
        }
        let file_path = self.unique_path(&file_name).await;
        fs::write(&file_path, &upload.data).await
            .map_err(|err| VideoEntry::StorageError(IOEntry::WriteFileError(file_path.display(), err).into()))?;
        Ok(Some(file_path))
    }

    async fn unique_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.path.join(file_name);
        if !fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        let path = Path::new(file_name);
        let stem = path.file_stem().map(|stem| stem.to_string_lossy().to_string()).unwrap_or_default();
        let extension = path.extension().map(|extension| extension.to_string_lossy().to_string()).unwrap_or_default();
        let mut index = 1_usize;
        loop {
            let candidate = self.path.join(format!("{stem}_{index}.{extension}"));
            if !fs::try_exists(&candidate).await.unwrap_or(false) {
                return candidate;
            }
            index += 1;
        }
    }

    pub async fn cleanup(mut self) -> Result<(), VideoEntry> {
        self.cleaned = true;
        fs::remove_dir_all(&self.path).await
            .map_err(|err| VideoEntry::CleanupFailure(self.path.display().to_string(), err))
    }
}

impl Drop for StagingDirectory {
    fn drop(&mut self) {
        if !self.cleaned {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

/// Reduces an uploaded file name to a safe single path component.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base_name = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let collapsed = base_name.split_whitespace().collect::<Vec<_>>().join("_");
    sanitize(collapsed).trim_start_matches('.').to_string()
}

pub fn is_allowed_image(file_name: &str) -> bool {
    Path::new(file_name).extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| ALLOWED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn patient_stem(patient_name: &str) -> String {
    let stem = sanitize_file_name(patient_name);
    if stem.is_empty() { DEFAULT_PATIENT_NAME.to_string() } else { stem }
}
