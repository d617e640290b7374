use actix_web::{get, web, Responder, Scope};
use crate::utils::config::Config;

pub fn initialize() -> Scope {
    web::scope("/config")
        .service(get_config)
}

#[get("/get")]
async fn get_config() -> impl Responder {
    web::Json(Config::now().await)
}
