pub mod api;
pub mod utils;

use actix_web::web::{route, ServiceConfig};
use crate::web::api::{config, default, log, results, video};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(video::initialize())
        .service(results::initialize())
        .service(config::initialize())
        .service(log::initialize())
        .default_service(route().to(default::default_route));
}
