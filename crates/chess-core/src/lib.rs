//! Game orchestration for the Ajedrez board.
//!
//! The rules themselves come from shakmaty behind the [`rules::RulesEngine`]
//! seam; this crate owns what sits on top of it: the session that accepts
//! moves, the derived status and captured-piece tally, and the helpers that
//! decide layout and translate taps or remote-control keys into moves.

pub mod captured;
pub mod device;
pub mod error;
pub mod input;
pub mod pgn;
pub mod rules;
pub mod session;
pub mod sound;
pub mod status;
pub mod types;

pub use captured::CapturedPieces;
pub use error::GameError;
pub use rules::{MoveInput, PlayedMove, RulesEngine, StandardChess};
pub use session::{AiMoveOutcome, AiTicket, GameSession, GameView};
pub use sound::{SoundCue, SoundEffects};
pub use status::{DrawReason, GameStatus};
pub use types::{GameMode, Orientation, PieceKind, PlayerKind, Players, Side};
