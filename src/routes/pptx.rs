use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::StatusCode;

use crate::error::DeckError;
use crate::models::{CreateDeckDto, CreateDeckResultDto};
use crate::routes::files::file_route;
use crate::state::Services;

pub fn create_route(services: Services) -> Router {
    Router::new().route("/pptx/create", post(create_pptx)).with_state(services)
}

#[tracing::instrument(skip(services, create_deck))]
pub async fn create_pptx(State(services): State<Services>, Json(create_deck): Json<CreateDeckDto>) -> impl IntoResponse {
    match services.deck_service.build_deck(create_deck).await {
        Ok(file_name) => {
            let download_url = format!("{}{}", &services.public_base_url, file_route(&file_name));
            Ok(Json(CreateDeckResultDto { download_url, file_name }))
        }
        Err(DeckError::Validation(err)) => Err((StatusCode::BAD_REQUEST, err.to_string())),
        Err(err) => Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string())),
    }
}
