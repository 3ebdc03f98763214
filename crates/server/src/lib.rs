//! HTTP and WebSocket front for the Ajedrez game session.

pub mod ai;
pub mod clients;
pub mod config;
pub mod error;
pub mod events;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Game
        .route("/api/game", get(routes::game::get_game))
        .route("/api/game/new", post(routes::game::new_game))
        .route("/api/game/reset", post(routes::game::reset_game))
        .route("/api/game/flip", post(routes::game::flip_board))
        .route("/api/game/move", post(routes::game::make_move))
        .route("/api/game/pgn", get(routes::game::get_pgn))
        // Alternative input
        .route("/api/game/tap", post(routes::input::tap))
        .route("/api/game/key", post(routes::input::key))
        .route("/api/layout", post(routes::layout::layout))
        // Push channel
        .route("/api/game/ws", get(routes::ws::ws_handler))
        .layer(Extension(state))
        .layer(cors)
}
