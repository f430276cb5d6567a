use crate::config::ScoutConfig;
use crate::logbook::Logbook;
use crate::models::KeyValueStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// The persisted store and the log parsed out of it, always updated together.
#[derive(Debug, Default)]
pub struct ScoutData {
    pub store: KeyValueStore,
    pub log: Logbook,
}

impl ScoutData {
    pub fn load(store: KeyValueStore) -> Self {
        let log = Logbook::load(&store);
        Self { store, log }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub config: Arc<ScoutConfig>,
    pub data: Arc<Mutex<ScoutData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, config: ScoutConfig, store: KeyValueStore) -> Self {
        Self {
            data_path,
            config: Arc::new(config),
            data: Arc::new(Mutex::new(ScoutData::load(store))),
        }
    }
}
