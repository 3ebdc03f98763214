//! Shared server state: the one game session, its event stream and the AI bridge.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chess_core::input::{BoardCursor, TapSelection};
use chess_core::{GameMode, GameSession, GameView};
use tokio::sync::broadcast;

use crate::ai::{AiBridge, AiSettings, MoveGenerator};
use crate::events::{BroadcastSounds, GameEvent, EVENT_CAPACITY};

pub type SharedSession = Arc<Mutex<GameSession>>;

/// Lock the session. Never hold the guard across an `.await`.
pub fn lock(session: &SharedSession) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pending tap selection and D-pad focus for the board.
#[derive(Debug, Default)]
pub struct InputState {
    pub tap: TapSelection,
    pub cursor: BoardCursor,
}

#[derive(Clone)]
pub struct AppState {
    session: SharedSession,
    events: broadcast::Sender<GameEvent>,
    bridge: AiBridge,
    input: Arc<Mutex<InputState>>,
}

impl AppState {
    pub fn new(mode: GameMode, generator: Arc<dyn MoveGenerator>, settings: AiSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let session = GameSession::for_mode(mode).with_sounds(BroadcastSounds(events.clone()));
        let session = Arc::new(Mutex::new(session));
        let bridge = AiBridge::new(session.clone(), generator, events.clone(), settings);
        Self {
            session,
            events,
            bridge,
            input: Arc::new(Mutex::new(InputState::default())),
        }
    }

    // Lock order: session before input.
    pub fn session(&self) -> MutexGuard<'_, GameSession> {
        lock(&self.session)
    }

    pub fn input(&self) -> MutexGuard<'_, InputState> {
        self.input.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn bridge(&self) -> &AiBridge {
        &self.bridge
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> GameView {
        self.session().snapshot()
    }

    pub fn publish_snapshot(&self) -> GameView {
        let game = self.snapshot();
        let _ = self.events.send(GameEvent::Snapshot { game: game.clone() });
        game
    }

    /// Call after any accepted change: push the new state, then let the AI
    /// take its turn if it is due. Returns the state as of the change.
    pub fn after_change(&self) -> GameView {
        let game = self.publish_snapshot();
        self.bridge.schedule();
        game
    }

    /// Reset the game, or start a new one in `mode`. Any AI request in flight
    /// is abandoned and pending selections are dropped.
    pub fn restart(&self, mode: Option<GameMode>) -> GameView {
        self.bridge.cancel();
        {
            let mut session = self.session();
            match mode {
                Some(mode) => session.new_game(mode),
                None => session.reset(),
            }
        }
        {
            let mut input = self.input();
            input.tap.clear();
            input.cursor.clear_selection();
        }
        self.after_change()
    }
}
