use std::path::PathBuf;

use tokio::fs;

use crate::error::StorageError;

mod cleanup;
pub use cleanup::*;

#[async_trait::async_trait]
pub trait FileStorage: Send + Sync {
    async fn store_result_file(&self, file_name: &str, bytes: &[u8]) -> Result<(), StorageError>;
    async fn open_result_file(&self, file_name: &str) -> Result<fs::File, StorageError>;
}

/// Stores generated packages under one local directory, looked up by exact
/// name. Growth is unbounded unless the expiry sweep is enabled.
pub struct LocalFileStorage {
    output_dir: PathBuf,
}

impl LocalFileStorage {
    pub async fn build(output_dir: PathBuf) -> Result<LocalFileStorage, StorageError> {
        fs::create_dir_all(&output_dir)
            .await
            .map_err(|source| StorageError::Write { path: output_dir.clone(), source })?;
        Ok(LocalFileStorage { output_dir })
    }

    /// Service-generated names are plain alphanumerics plus one extension
    /// dot; anything that could traverse out of the directory is rejected.
    fn validate_name(file_name: &str) -> Result<(), StorageError> {
        let plain = !file_name.is_empty()
            && !file_name.contains("..")
            && file_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');
        if plain {
            Ok(())
        } else {
            Err(StorageError::InvalidName { name: file_name.to_string() })
        }
    }
}

#[async_trait::async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_result_file(&self, file_name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        Self::validate_name(file_name)?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Write { path, source })
    }

    async fn open_result_file(&self, file_name: &str) -> Result<fs::File, StorageError> {
        Self::validate_name(file_name)?;
        let path = self.output_dir.join(file_name);
        fs::File::open(&path)
            .await
            .map_err(|_| StorageError::NotFound { name: file_name.to_string() })
    }
}
