//! Tap-to-move and remote-control (D-pad) intake.

use axum::{Extension, Json};
use chess_core::input::{ControlButton, CursorAction, FocusArea, Key, MoveIntent};
use chess_core::rules::parse_square;
use chess_core::GameView;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TapBody {
    pub square: String,
}

#[derive(Serialize)]
pub struct TapResponse {
    /// Square currently picked up, if any.
    pub selected: Option<String>,
    pub moved: bool,
    pub game: GameView,
}

/// Play `intent` for the human. Returns whether it was accepted.
fn play_intent(state: &AppState, intent: MoveIntent) -> bool {
    let accepted = state.session().apply_move(intent.into());
    if !accepted {
        debug!(from = %intent.from, to = %intent.to, "Selected move rejected");
    }
    accepted
}

/// POST /api/game/tap
pub async fn tap(
    Extension(state): Extension<AppState>,
    Json(body): Json<TapBody>,
) -> Result<Json<TapResponse>, AppError> {
    let square = parse_square(&body.square)?;
    let selectable = state.session().is_selectable(square);
    let (intent, selected) = {
        let mut input = state.input();
        let intent = input.tap.tap(square, selectable);
        (intent, input.tap.selected())
    };

    let moved = intent.is_some_and(|intent| play_intent(&state, intent));
    let game = if moved {
        state.after_change()
    } else {
        state.snapshot()
    };
    Ok(Json(TapResponse {
        selected: selected.map(|s| s.to_string()),
        moved,
        game,
    }))
}

#[derive(Deserialize)]
pub struct KeyBody {
    pub key: Key,
}

#[derive(Serialize)]
pub struct KeyResponse {
    pub area: FocusArea,
    pub focus: String,
    pub button: ControlButton,
    pub selected: Option<String>,
    pub moved: bool,
    pub game: GameView,
}

/// POST /api/game/key
pub async fn key(
    Extension(state): Extension<AppState>,
    Json(body): Json<KeyBody>,
) -> Json<KeyResponse> {
    let action = {
        let session = state.session();
        let orientation = session.orientation();
        let mut input = state.input();
        input
            .cursor
            .press(body.key, orientation, |sq| session.is_selectable(sq))
    };

    let mut moved = false;
    let game = match action {
        CursorAction::None => state.snapshot(),
        CursorAction::Move(intent) => {
            moved = play_intent(&state, intent);
            if moved {
                state.after_change()
            } else {
                state.snapshot()
            }
        }
        CursorAction::Activate(ControlButton::NewGame) => state.restart(None),
        CursorAction::Activate(ControlButton::FlipBoard) => {
            state.session().flip_orientation();
            state.publish_snapshot()
        }
    };

    let cursor = state.input().cursor;
    Json(KeyResponse {
        area: cursor.area(),
        focus: cursor.focus().to_string(),
        button: cursor.button(),
        selected: cursor.selected().map(|s| s.to_string()),
        moved,
        game,
    })
}
