mod common;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
use actix_web::{web::Data, App};
use serde_json::Value;

use StudioLibrary::web;

use common::{multipart_body, multipart_content_type, png_bytes, TestStudio};

macro_rules! studio_app {
    ($studio:expr) => {
        init_service(
            App::new()
                .app_data(Data::new($studio.pipeline))
                .configure(web::configure),
        )
        .await
    };
}

fn create_request(patient_name: Option<&str>, files: &[(&str, Vec<u8>)]) -> TestRequest {
    TestRequest::post()
        .uri("/api/create_video")
        .insert_header((CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(patient_name, files))
}

#[actix_web::test]
async fn create_video_reports_frames() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let files = [("a.png", png_bytes(8, 8, 1)), ("b.png", png_bytes(8, 8, 2)), ("c.png", png_bytes(8, 8, 3))];
    let response = call_service(&app, create_request(Some("Jane"), &files).to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["frame_count"], 3);
    assert_eq!(body["patient_name"], "Jane");
    assert!(body["video_url"].as_str().unwrap().starts_with("/results/Jane_"));
}

#[actix_web::test]
async fn create_video_without_files_is_bad_request() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let response = call_service(&app, create_request(Some("Jane"), &[]).to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No image files provided");
}

#[actix_web::test]
async fn create_video_with_only_text_files_is_bad_request() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let response = call_service(&app, create_request(None, &[("notes.txt", b"hello".to_vec())]).to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn latest_video_is_not_found_before_any_upload() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let response = call_service(&app, TestRequest::get().uri("/api/get_latest_video").to_request()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No video found");
}

#[actix_web::test]
async fn latest_video_can_be_downloaded() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let response = call_service(&app, create_request(None, &[("a.png", png_bytes(8, 8, 0))]).to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = call_service(&app, TestRequest::get().uri("/api/get_latest_video").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["file_size"], 3);
    assert!(body["video_name"].as_str().unwrap().starts_with("Unknown_"));

    let video_url = body["video_url"].as_str().unwrap();
    let response = call_service(&app, TestRequest::get().uri(video_url).to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "video/mp4");
}

#[actix_web::test]
async fn unknown_result_is_not_found() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let response = call_service(&app, TestRequest::get().uri("/results/missing.mp4").to_request()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = call_service(&app, TestRequest::get().uri("/results/..%2Fsecret.mp4").to_request()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn static_assets_are_served() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let response = call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap().starts_with("text/html"));

    let response = call_service(&app, TestRequest::get().uri("/script.js").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = call_service(&app, TestRequest::get().uri("/missing.css").to_request()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn config_is_exposed_as_json() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let response = call_service(&app, TestRequest::get().uri("/config/get").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert!(body["frame_rate"].is_u64());
    assert!(body["label"].is_string());
}

#[actix_web::test]
async fn system_log_is_served() {
    let studio = TestStudio::new(None).await;
    let app = studio_app!(studio);
    let response = call_service(&app, TestRequest::get().uri("/log/system_log").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = call_service(&app, TestRequest::get().uri("/log/system_log/since/not-a-date").to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
