use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};

use crate::error::FetchError;

/// Identifying user-agent; some image CDNs refuse requests without a
/// browser-looking one.
static BROWSER_USER_AGENT: &str = "Mozilla/5.0 (compatible; pptxgen/0.1)";
static IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

/// Raw bytes as the origin served them, before any normalization.
#[derive(Debug)]
pub struct FetchedResource {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub source_url: String,
}

#[async_trait::async_trait]
pub trait DownloadService: Send + Sync {
    async fn download_image(&self, client: &reqwest::Client, source_url: &str) -> Result<FetchedResource, FetchError>;
}

pub struct DownloadServiceImpl;

#[async_trait::async_trait]
impl DownloadService for DownloadServiceImpl {
    /// Single GET, redirects followed by the client, no retries.
    async fn download_image(&self, client: &reqwest::Client, source_url: &str) -> Result<FetchedResource, FetchError> {
        let response = client
            .get(source_url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, IMAGE_ACCEPT)
            .send()
            .await
            .map_err(|source| FetchError::Request { url: source_url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: source_url.to_string(), status });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .filter(|value| !value.is_empty());

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Body { url: source_url.to_string(), source })?;

        Ok(FetchedResource {
            bytes,
            content_type,
            source_url: source_url.to_string(),
        })
    }
}
