use std::path::PathBuf;

use thiserror::Error;

/// Failure while retrieving a remote image. Always attributed to one URL,
/// recovered per-image by the deck builder.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not reach '{url}': {source}")]
    Request { url: String, source: reqwest::Error },
    #[error("'{url}' answered with status {status}")]
    Status { url: String, status: reqwest::StatusCode },
    #[error("could not read body of '{url}': {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Failure while converting fetched bytes into an embeddable raster format.
/// Recovered per-image by the deck builder.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unsupported image type: {content_type}")]
    UnsupportedType { content_type: String },
    #[error("svg image found but no rasterizer is compiled into this build")]
    RasterizerUnavailable,
    #[error("could not rasterize svg: {reason}")]
    Rasterize { reason: String },
    #[error("could not decode image: {source}")]
    Decode {
        #[source]
        source: image::ImageError,
    },
    #[error("could not encode png: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },
}

/// Umbrella for the two per-image failure classes. Its rendering ends up
/// verbatim in the placeholder bullet, so messages stay short.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Malformed request payload. Fatal to the request, raised before any
/// fetching starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid image url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no such file: {name}")]
    NotFound { name: String },
    #[error("invalid file name: {name}")]
    InvalidName { name: String },
    #[error("could not write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("could not assemble package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("could not assemble package: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a deck build can terminate with. Per-image fetch/format
/// failures never show up here, they become placeholder bullets instead.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Package(#[from] PackageError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
