use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::deck::{DeckService, DeckServiceImpl};
use crate::download::DownloadServiceImpl;
use crate::error::StorageError;
use crate::persistence::{spawn_expiry_sweep, FileStorage, LocalFileStorage};
use crate::pptx::ThemeRegistry;

pub type Services = Arc<ServiceCollection>;

/// Immutable startup configuration, assembled from the environment in main.
pub struct Settings {
    pub output_dir: PathBuf,
    pub public_base_url: String,
    pub fetch_timeout: Duration,
    /// When set, generated files older than this are swept periodically.
    pub max_age: Option<Duration>,
}

pub struct ServiceCollection {
    pub deck_service: Arc<dyn DeckService>,
    pub file_storage: Arc<dyn FileStorage>,
    pub public_base_url: String,
}

impl ServiceCollection {
    pub async fn build(settings: Settings) -> Result<Services, StorageError> {
        let file_storage: Arc<dyn FileStorage> =
            Arc::new(LocalFileStorage::build(settings.output_dir.clone()).await?);
        let deck_service = Arc::new(DeckServiceImpl {
            download_service: Arc::new(DownloadServiceImpl),
            file_storage: file_storage.clone(),
            themes: ThemeRegistry::builtin(),
            fetch_timeout: settings.fetch_timeout,
        });
        if let Some(max_age) = settings.max_age {
            spawn_expiry_sweep(settings.output_dir, max_age);
        }
        Ok(Arc::new(ServiceCollection {
            deck_service,
            file_storage,
            public_base_url: settings.public_base_url,
        }))
    }
}
