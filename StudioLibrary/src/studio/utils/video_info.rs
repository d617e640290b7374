use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub video_url: String,
    pub video_name: String,
    pub file_size: u64,
    pub created_time: String,
}
