use futures::{StreamExt, TryStreamExt};
use actix_web::http::StatusCode;
use actix_multipart::{Field, Multipart};
use actix_web::http::header::ContentDisposition;
use actix_web::{get, post, web, HttpResponse, Scope};
use crate::utils::logging::*;
use crate::utils::config::Config;
use crate::studio::pipeline::Pipeline;
use crate::studio::utils::uploaded_image::UploadedImage;
use crate::web::utils::response::{error_response, failure, status_code, success};

pub fn initialize() -> Scope {
    web::scope("/api")
        .service(create_video)
        .service(get_latest_video)
}

#[post("/create_video")]
async fn create_video(pipeline: web::Data<Pipeline>, mut payload: Multipart) -> HttpResponse {
    let mut patient_name = String::new();
    let mut uploads = Vec::new();
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return failure(StatusCode::BAD_REQUEST, format!("Invalid payload: {err}")),
        };
        let (field_name, file_name) = match field.content_disposition() {
            Some(content_disposition) => (get_field_name(content_disposition), get_file_name(content_disposition)),
            None => return failure(StatusCode::BAD_REQUEST, "Invalid payload."),
        };
        let data = match read_field(&mut field).await {
            Ok(data) => data,
            Err(err) => return failure(StatusCode::BAD_REQUEST, format!("Invalid payload: {err}")),
        };
        match (field_name.as_deref(), file_name) {
            (Some("patient_name"), _) => patient_name = String::from_utf8_lossy(&data).trim().to_string(),
            //Browsers send an empty part when no file was chosen.
            (Some("images"), Some(file_name)) if !file_name.is_empty() => uploads.push(UploadedImage::new(file_name, data)),
            _ => {}
        }
    }
    let config = Config::now().await;
    match pipeline.create_video(&config, &patient_name, uploads).await {
        Ok(created_video) => success(created_video),
        Err(err) => {
            let response = error_response(&err);
            if status_code(&err).is_client_error() {
                logging_notice!(err);
            } else {
                logging_error!(err);
            }
            response
        }
    }
}

#[get("/get_latest_video")]
async fn get_latest_video(pipeline: web::Data<Pipeline>) -> HttpResponse {
    match pipeline.latest_video().await {
        Ok(video_info) => success(video_info),
        Err(err) => error_response(&err),
    }
}

fn get_field_name(content_disposition: &ContentDisposition) -> Option<String> {
    content_disposition.get_name().map(|field_name| field_name.to_string())
}

fn get_file_name(content_disposition: &ContentDisposition) -> Option<String> {
    content_disposition.get_filename().map(|file_name| file_name.to_string())
}

async fn read_field(field: &mut Field) -> Result<Vec<u8>, String> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| err.to_string())?;
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
