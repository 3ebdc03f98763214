//! Events pushed to connected board clients.

use chess_core::{GameView, SoundCue, SoundEffects};
use serde::Serialize;
use tokio::sync::broadcast;

pub const EVENT_CAPACITY: usize = 64;

/// Shown when the move generator could not be reached.
pub const AI_FAILED_MESSAGE: &str =
    "Ocurrió un error al obtener el movimiento de la IA. Por favor, inténtalo de nuevo.";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Snapshot { game: GameView },
    Sound { cue: SoundCue, asset: &'static str },
    AiError { message: String },
}

/// Forwards the session's sound cues to the event stream.
pub struct BroadcastSounds(pub broadcast::Sender<GameEvent>);

impl SoundEffects for BroadcastSounds {
    fn play(&self, cue: SoundCue) {
        // No subscribers is fine.
        let _ = self.0.send(GameEvent::Sound {
            cue,
            asset: cue.asset(),
        });
    }
}
