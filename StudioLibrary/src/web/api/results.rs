use actix_files::NamedFile;
use actix_web::{get, web, HttpRequest, HttpResponse, Scope};
use crate::studio::pipeline::Pipeline;
use crate::web::utils::response::error_response;

pub fn initialize() -> Scope {
    web::scope("/results")
        .service(download_video)
}

#[get("/{file_name}")]
async fn download_video(req: HttpRequest, pipeline: web::Data<Pipeline>, file_name: web::Path<String>) -> HttpResponse {
    let file_path = match pipeline.result_path(&file_name.into_inner()).await {
        Ok(file_path) => file_path,
        Err(err) => return error_response(&err),
    };
    match NamedFile::open_async(&file_path).await {
        Ok(named_file) => named_file
            .set_content_type(mime_guess::from_path(&file_path).first_or_octet_stream())
            .into_response(&req),
        Err(_) => HttpResponse::NotFound().finish(),
    }
}
