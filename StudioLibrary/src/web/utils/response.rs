use serde::Serialize;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use crate::utils::logging::VideoEntry;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationStatus {
    pub fn failure<T: Into<String>>(error: T) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
struct Success<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

pub fn success<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Success {
        success: true,
        data,
    })
}

pub fn failure<T: Into<String>>(status: StatusCode, error: T) -> HttpResponse {
    HttpResponse::build(status).json(OperationStatus::failure(error))
}

pub fn status_code(entry: &VideoEntry) -> StatusCode {
    match entry {
        VideoEntry::NoFilesProvided | VideoEntry::NoValidImages => StatusCode::BAD_REQUEST,
        VideoEntry::NotFound | VideoEntry::InvalidFileName => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(entry: &VideoEntry) -> HttpResponse {
    failure(status_code(entry), entry.to_string())
}
