use std::fs;
use tokio::sync::RwLock;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use crate::utils::logging::*;

pub const CONFIG_PATH: &str = "./studio.toml";

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::new());
}

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub http_server_bind_port: u16, //port
    pub bind_retry_duration: u64, //seconds
    pub upload_folder: String, //path
    pub results_folder: String, //path
    pub frame_rate: u32, //frames per second
    pub model_path: String, //path
    pub python_interpreter: String, //executable
    pub detector_script: String, //path
    pub model_load_timeout: u64, //seconds
    pub detection_timeout: u64, //seconds
    pub font_path: String, //path
    pub font_size: f32, //pixels
    pub border_width: u32, //pixels
    pub border_color: [u8; 3], //RGB
    pub text_color: [u8; 3], //RGB
    pub label: String,
    pub label_offset: u32, //pixels above the box
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_server_bind_port: 5000,
            bind_retry_duration: 5,
            upload_folder: "uploads".to_string(),
            results_folder: "results".to_string(),
            frame_rate: 10,
            model_path: "model/best.pt".to_string(),
            python_interpreter: "python3".to_string(),
            detector_script: "Script/detect.py".to_string(),
            model_load_timeout: 120,
            detection_timeout: 30,
            font_path: "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string(),
            font_size: 24_f32,
            border_width: 2,
            border_color: [255, 0, 0],
            text_color: [255, 0, 0],
            label: "Tumor".to_string(),
            label_offset: 10,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        //A broken configuration file must stop the program, a missing one falls back to defaults.
        match fs::read_to_string(CONFIG_PATH) {
            Ok(toml_string) => match Self::parse(&toml_string) {
                Ok(config) => config,
                Err(entry) => {
                    logging_console!(emergency_entry!(entry));
                    panic!("Invalid configuration file");
                }
            },
            Err(err) => {
                logging_console!(notice_entry!(SystemEntry::ConfigNotFound, format!("{CONFIG_PATH}: {err}")));
                Self::default()
            }
        }
    }

    pub fn parse(toml_string: &str) -> Result<Self, SystemEntry> {
        let config = toml::from_str::<ConfigTable>(toml_string)
            .map_err(|err| SystemEntry::ConfigParseError(err.to_string()))?
            .config;
        if !Self::validate(&config) {
            return Err(SystemEntry::InvalidConfig);
        }
        Ok(config)
    }

    pub async fn now() -> Config {
        CONFIG.read().await.clone()
    }

    pub fn validate(config: &Config) -> bool {
        Config::validate_frame_rate(config.frame_rate)
            && Config::validate_second(config.bind_retry_duration)
            && Config::validate_second(config.model_load_timeout)
            && Config::validate_second(config.detection_timeout)
            && Config::validate_folder(&config.upload_folder)
            && Config::validate_folder(&config.results_folder)
            && config.upload_folder != config.results_folder
            && Config::validate_font_size(config.font_size)
            && Config::validate_border_width(config.border_width)
            && !config.label.is_empty()
    }

    fn validate_frame_rate(frame_rate: u32) -> bool {
        (1..=120).contains(&frame_rate)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_folder(folder: &str) -> bool {
        !folder.trim().is_empty()
    }

    fn validate_border_width(width: u32) -> bool {
        width > 0_u32
    }

    fn validate_font_size(size: f32) -> bool {
        size > 0_f32
    }
}
