mod common;

use StudioLibrary::studio::utils::uploaded_image::UploadedImage;
use StudioLibrary::utils::config::Config;
use StudioLibrary::utils::logging::VideoEntry;

use common::{png_bytes, TestStudio};

#[tokio::test]
async fn no_videos_is_not_found() {
    let studio = TestStudio::new(None).await;
    assert!(matches!(studio.pipeline.latest_video().await, Err(VideoEntry::NotFound)));
}

#[tokio::test]
async fn latest_video_follows_creation_order() {
    let studio = TestStudio::new(None).await;
    let config = Config::default();
    let first = studio.pipeline.create_video(&config, "Jane", vec![UploadedImage::new("a.png", png_bytes(8, 8, 0))]).await.unwrap();
    let latest = studio.pipeline.latest_video().await.unwrap();
    assert_eq!(latest.video_url, first.video_url);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let second = studio.pipeline.create_video(&config, "Joe", vec![UploadedImage::new("a.png", png_bytes(8, 8, 0))]).await.unwrap();
    let latest = studio.pipeline.latest_video().await.unwrap();
    assert_eq!(latest.video_url, second.video_url);
    assert_eq!(latest.file_size, 3);
    assert!(latest.video_name.starts_with("Joe_"));
}

#[tokio::test]
async fn result_path_resolves_published_videos() {
    let studio = TestStudio::new(None).await;
    let created = studio.pipeline.create_video(&Config::default(), "Jane", vec![UploadedImage::new("a.png", png_bytes(8, 8, 0))]).await.unwrap();
    let video_name = created.video_url.trim_start_matches("/results/");
    let path = studio.pipeline.result_path(video_name).await.unwrap();
    assert!(path.is_file());
    assert!(matches!(studio.pipeline.result_path("../Cargo.toml").await, Err(VideoEntry::InvalidFileName)));
}
