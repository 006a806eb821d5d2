use crate::verses::DEFAULT_API_BASE;
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub mapping_path: PathBuf,
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        Self {
            port,
            data_path: path_var("APP_DATA_PATH", "data/progress.json"),
            mapping_path: path_var("HIZB_MAPPING_PATH", "data/hizb.json"),
            api_base: env::var("QURAN_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into()),
        }
    }
}

fn path_var(name: &str, default: &str) -> PathBuf {
    env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
