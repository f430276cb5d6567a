pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logbook;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod summary;
pub mod ui;

pub use app::router;
pub use config::{load_config, resolve_config_path, ScoutConfig};
pub use state::AppState;
pub use storage::{load_store, resolve_data_path};
