use axum::body::StreamBody;
use axum::extract::{Path, State};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::get;
use axum::Router;
use reqwest::{header, StatusCode};
use tokio_util::io::ReaderStream;

use crate::consts::PPTX_CONTENT_TYPE;
use crate::state::Services;

pub fn create_route(services: Services) -> Router {
    Router::new().route("/files/:file_name", get(file)).with_state(services)
}

#[tracing::instrument(skip(services))]
pub async fn file(Path(file_name): Path<String>, State(services): State<Services>) -> impl IntoResponse {
    match services.file_storage.open_result_file(&file_name).await {
        Ok(file) => {
            let stream = ReaderStream::new(file);
            let body = StreamBody::new(stream);
            let headers = AppendHeaders([
                (header::CONTENT_TYPE, PPTX_CONTENT_TYPE.to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", &file_name)),
            ]);
            Ok((headers, body))
        }
        Err(err) => Err((StatusCode::NOT_FOUND, err.to_string())),
    }
}

pub fn file_route(file_name: &str) -> String {
    format!("/files/{}", file_name)
}
