//! Optional expiry sweep for the output directory. The original service
//! kept generated files forever; this keeps that default but lets
//! deployments bound the growth with MAX_AGE_SECONDS.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tracing::{info, warn};

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

pub fn spawn_expiry_sweep(output_dir: PathBuf, max_age: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match sweep_once(&output_dir, max_age).await {
                Ok(removed) if removed > 0 => info!("Removed {} expired generated files", removed),
                Ok(_) => {}
                Err(err) => warn!("Could not sweep '{}': {}", output_dir.display(), err),
            }
        }
    });
}

pub async fn sweep_once(output_dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    let mut removed = 0;
    let mut entries = fs::read_dir(output_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let expired = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .map(|age| age >= max_age)
            .unwrap_or(false);
        if expired {
            fs::remove_file(entry.path()).await?;
            removed += 1;
        }
    }
    Ok(removed)
}
