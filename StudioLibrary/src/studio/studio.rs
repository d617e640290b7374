use std::sync::Arc;
use tokio::time::sleep;
use std::time::Duration;
use actix_cors::Cors;
use lazy_static::lazy_static;
use actix_web::{web::Data, App, HttpServer};
use tokio::sync::{RwLock, RwLockWriteGuard};
use crate::web;
use crate::utils::logging::*;
use crate::utils::config::Config;
use crate::studio::pipeline::Pipeline;
use crate::studio::storage::StorageLayout;
use crate::studio::detector::load_detector;
use crate::studio::gstreamer_encoder::GStreamerEncoder;
use crate::studio::annotator::{load_font, FrameAnnotator};

lazy_static! {
    static ref STUDIO: RwLock<Studio> = RwLock::new(Studio::new());
}

pub struct Studio {
    pipeline: Option<Data<Pipeline>>,
}

impl Studio {
    fn new() -> Self {
        Self {
            pipeline: None,
        }
    }

    pub async fn instance_mut() -> RwLockWriteGuard<'static, Self> {
        STUDIO.write().await
    }

    pub async fn run() {
        let pipeline = match Self::initialize().await {
            Ok(pipeline) => pipeline,
            Err(err) => {
                logging_emergency!(err);
                return;
            }
        };
        let http_server = loop {
            let config = Config::now().await;
            let pipeline = pipeline.clone();
            let http_server = HttpServer::new(move || {
                let cors = Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                App::new()
                    .wrap(cors)
                    .app_data(pipeline.clone())
                    .configure(web::configure)
            }).bind(format!("0.0.0.0:{}", config.http_server_bind_port));
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    logging_critical!(SystemEntry::BindPortError(err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                },
            }
        };
        logging_information!(SystemEntry::WebReady);
        logging_information!(SystemEntry::Online);
        if let Err(err) = http_server.run().await {
            logging_emergency!(SystemEntry::WebPanic(err));
        }
    }

    async fn initialize() -> Result<Data<Pipeline>, VideoEntry> {
        logging_information!(SystemEntry::Initializing);
        let config = Config::now().await;
        let storage = StorageLayout::from_config(&config);
        storage.initialize().await?;
        if let Err(err) = gstreamer::init() {
            logging_critical!(GStreamerEntry::InitializeError(err));
        }
        let font = load_font(&config.font_path).await;
        let detector = load_detector(&config).await;
        let annotator = FrameAnnotator::new(detector, font);
        let pipeline = Data::new(Pipeline::new(storage, annotator, Arc::new(GStreamerEncoder)));
        Self::instance_mut().await.pipeline = Some(pipeline.clone());
        logging_information!(SystemEntry::InitializeComplete);
        Ok(pipeline)
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        let pipeline = Self::instance_mut().await.pipeline.take();
        if let Some(pipeline) = pipeline {
            if let Some(detector) = pipeline.annotator().detector() {
                detector.shutdown().await;
            }
            logging_information!(SystemEntry::Cleaning);
            match pipeline.storage().sweep().await {
                Ok(_) => logging_information!(SystemEntry::CleanComplete),
                Err(err) => logging_error!(err),
            }
        }
        logging_information!(SystemEntry::TerminateComplete);
    }
}
