pub mod app;
pub mod config;
pub mod controller;
pub mod errors;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod reader;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod verses;

pub use app::router;
pub use config::Config;
pub use state::{AppState, Session};
pub use storage::{ProgressStore, load_mapping};
