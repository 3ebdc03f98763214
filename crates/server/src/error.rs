use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_core::GameError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Game(#[from] GameError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Game(e) => {
                tracing::debug!("Rejected request: {e}");
                (StatusCode::BAD_REQUEST, e.to_string())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
