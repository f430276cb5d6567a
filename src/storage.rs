use crate::errors::AppError;
use crate::models::KeyValueStore;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{debug, error};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/store.json"))
}

pub async fn load_store(path: &Path) -> KeyValueStore {
    match fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => KeyValueStore::default(),
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                error!("failed to parse store file: {err}");
                KeyValueStore::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("no store file at {}, starting empty", path.display());
            KeyValueStore::default()
        }
        Err(err) => {
            error!("failed to read store file: {err}");
            KeyValueStore::default()
        }
    }
}

pub async fn persist_store(path: &Path, store: &KeyValueStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(store).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
