use axum::{http::header, response::IntoResponse, Extension, Json};
use chess_core::pgn::{to_pgn, PgnHeaders};
use chess_core::{GameMode, GameView, MoveInput, PlayerKind};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/game
pub async fn get_game(Extension(state): Extension<AppState>) -> Json<GameView> {
    Json(state.snapshot())
}

#[derive(Deserialize)]
pub struct NewGameBody {
    pub mode: GameMode,
}

/// POST /api/game/new
pub async fn new_game(
    Extension(state): Extension<AppState>,
    Json(body): Json<NewGameBody>,
) -> Json<GameView> {
    Json(state.restart(Some(body.mode)))
}

/// POST /api/game/reset
/// Same players, initial position. Abandons a pending AI reply.
pub async fn reset_game(Extension(state): Extension<AppState>) -> Json<GameView> {
    Json(state.restart(None))
}

/// POST /api/game/flip
pub async fn flip_board(Extension(state): Extension<AppState>) -> Json<GameView> {
    state.session().flip_orientation();
    Json(state.publish_snapshot())
}

#[derive(Deserialize)]
pub struct MoveBody {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub promotion: Option<String>,
}

#[derive(Serialize)]
pub struct MoveResponse {
    /// `false` means the piece goes back where it came from.
    pub accepted: bool,
    pub game: GameView,
}

/// POST /api/game/move
/// Drag-and-drop intake. Malformed squares are a 400; legal-looking input that
/// the position refuses is `accepted: false`.
pub async fn make_move(
    Extension(state): Extension<AppState>,
    Json(body): Json<MoveBody>,
) -> Result<Json<MoveResponse>, AppError> {
    let input = MoveInput::coordinates(&body.from, &body.to, body.promotion.as_deref())?;
    let accepted = state.session().apply_move(input);
    let game = if accepted {
        state.input().tap.clear();
        state.after_change()
    } else {
        state.snapshot()
    };
    Ok(Json(MoveResponse { accepted, game }))
}

fn player_name(kind: PlayerKind) -> &'static str {
    match kind {
        PlayerKind::Human => "Jugador",
        PlayerKind::Ai => "Gemini-Chess",
    }
}

/// GET /api/game/pgn
pub async fn get_pgn(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let pgn = {
        let session = state.session();
        let players = session.players();
        let headers = PgnHeaders {
            event: "Ajedrez".to_string(),
            site: "-".to_string(),
            date: chrono::Local::now().date_naive(),
            white: player_name(players.white).to_string(),
            black: player_name(players.black).to_string(),
        };
        to_pgn(&headers, session.history(), session.status().result())
    };
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], pgn)
}
