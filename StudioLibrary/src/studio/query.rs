use tokio::fs;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::time::SystemTime;
use chrono::{DateTime, Local};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio_stream::wrappers::ReadDirStream;
use crate::utils::logging::*;
use crate::studio::utils::video_info::VideoInfo;
use crate::studio::storage::{sanitize_file_name, StorageLayout};

pub const CREATED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reports the most recently created `*.mp4` in `results_folder`.
pub async fn latest_video(results_folder: &Path) -> Result<VideoInfo, VideoEntry> {
    let read_dir = match fs::read_dir(results_folder).await {
        Ok(read_dir) => read_dir,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(VideoEntry::NotFound),
        Err(err) => return Err(VideoEntry::StorageError(IOEntry::ReadDirectoryError(results_folder.display(), err).into())),
    };
    let mut entries = ReadDirStream::new(read_dir);
    let mut latest: Option<(SystemTime, String, u64)> = None;
    while let Some(entry) = entries.next().await {
        let entry = entry
            .map_err(|err| VideoEntry::StorageError(IOEntry::ReadDirectoryError(results_folder.display(), err).into()))?;
        let path = entry.path();
        if path.extension().and_then(OsStr::to_str) != Some("mp4") {
            continue;
        }
        let metadata = entry.metadata().await
            .map_err(|err| VideoEntry::StorageError(IOEntry::ReadFileError(path.display(), err).into()))?;
        if !metadata.is_file() {
            continue;
        }
        //Not every filesystem records birth time.
        let created = metadata.created().or_else(|_| metadata.modified())
            .map_err(|err| VideoEntry::StorageError(IOEntry::ReadFileError(path.display(), err).into()))?;
        let video_name = entry.file_name().to_string_lossy().to_string();
        let newer = match &latest {
            Some((latest_created, latest_name, _)) => (created, &video_name) > (*latest_created, latest_name),
            None => true,
        };
        if newer {
            latest = Some((created, video_name, metadata.len()));
        }
    }
    let (created, video_name, file_size) = latest.ok_or(VideoEntry::NotFound)?;
    Ok(VideoInfo {
        video_url: StorageLayout::video_url(&video_name),
        video_name,
        file_size,
        created_time: DateTime::<Local>::from(created).format(CREATED_TIME_FORMAT).to_string(),
    })
}

/// Resolves a public video name to its file. Names that would change under sanitizing are refused.
pub async fn result_path(results_folder: &Path, file_name: &str) -> Result<PathBuf, VideoEntry> {
    if file_name.is_empty() || sanitize_file_name(file_name) != file_name {
        return Err(VideoEntry::InvalidFileName);
    }
    let path = results_folder.join(file_name);
    match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => Ok(path),
        _ => Err(VideoEntry::NotFound),
    }
}
