//! The game state orchestrator.
//!
//! [`GameSession`] owns the rules engine and everything layered on it: who
//! plays each side, board orientation and the AI "thinking" flag. Status and
//! the captured tally are never stored; they are derived from the engine each
//! time they are read, so they cannot drift from the last accepted move.

use std::fmt;

use serde::Serialize;
use shakmaty::Square;
use tracing::{debug, info};

use crate::captured::CapturedPieces;
use crate::error::GameError;
use crate::rules::{MoveInput, PlayedMove, RulesEngine, StandardChess};
use crate::sound::{Silent, SoundCue, SoundEffects};
use crate::status::GameStatus;
use crate::types::{GameMode, Orientation, PlayerKind, Players, Side};

/// Claim on one AI turn, handed out by [`GameSession::begin_ai_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiTicket {
    /// Session epoch at claim time; a reset invalidates the ticket.
    pub epoch: u64,
    pub side: Side,
    pub fen: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiMoveOutcome {
    Applied(PlayedMove),
    Rejected(GameError),
    /// The game was reset or the turn moved on while the AI was thinking.
    Stale,
}

/// Everything the board renderer needs, in one serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub fen: String,
    pub turn: Side,
    pub orientation: Orientation,
    pub players: Players,
    pub mode: Option<GameMode>,
    pub status: GameStatus,
    pub captured: CapturedPieces,
    pub is_ai_thinking: bool,
    pub last_move: Option<PlayedMove>,
    pub moves: Vec<String>,
}

pub struct GameSession<R: RulesEngine = StandardChess> {
    rules: R,
    players: Players,
    orientation: Orientation,
    thinking: bool,
    epoch: u64,
    sounds: Box<dyn SoundEffects>,
}

impl GameSession<StandardChess> {
    pub fn new(players: Players) -> Self {
        Self::with_rules(StandardChess::new(), players)
    }

    pub fn for_mode(mode: GameMode) -> Self {
        Self::new(mode.players())
    }
}

impl<R: RulesEngine> GameSession<R> {
    pub fn with_rules(rules: R, players: Players) -> Self {
        Self {
            rules,
            players,
            orientation: Orientation::default(),
            thinking: false,
            epoch: 0,
            sounds: Box::new(Silent),
        }
    }

    pub fn with_sounds(mut self, sounds: impl SoundEffects + 'static) -> Self {
        self.sounds = Box::new(sounds);
        self
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn players(&self) -> Players {
        self.players
    }

    pub fn game_mode(&self) -> Option<GameMode> {
        GameMode::from_players(self.players)
    }

    /// Hand either side to a human or the AI without touching the position.
    /// A pending AI answer is invalidated.
    pub fn set_players(&mut self, players: Players) {
        if players == self.players {
            return;
        }
        self.players = players;
        self.thinking = false;
        self.epoch += 1;
        info!(?players, "Players changed");
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn fen(&self) -> String {
        self.rules.fen()
    }

    pub fn turn(&self) -> Side {
        self.rules.turn()
    }

    pub fn history(&self) -> &[PlayedMove] {
        self.rules.history()
    }

    pub fn status(&self) -> GameStatus {
        GameStatus::derive(&self.rules)
    }

    pub fn captured(&self) -> CapturedPieces {
        CapturedPieces::from_history(self.rules.history())
    }

    pub fn snapshot(&self) -> GameView {
        let history = self.rules.history();
        GameView {
            fen: self.rules.fen(),
            turn: self.rules.turn(),
            orientation: self.orientation,
            players: self.players,
            mode: self.game_mode(),
            status: self.status(),
            captured: self.captured(),
            is_ai_thinking: self.thinking,
            last_move: history.last().cloned(),
            moves: history.iter().map(|m| m.san.clone()).collect(),
        }
    }

    fn human_to_move(&self) -> bool {
        self.players.for_side(self.rules.turn()) == PlayerKind::Human
    }

    /// Whether a human may pick up the piece on `square` right now.
    pub fn is_selectable(&self, square: Square) -> bool {
        !self.thinking
            && self.human_to_move()
            && !self.rules.is_checkmate()
            && matches!(self.rules.piece_at(square), Some((side, _)) if side == self.rules.turn())
    }

    /// Move intake from the board. `false` means the widget should snap the
    /// piece back; nothing in the session changed.
    pub fn apply_move(&mut self, input: MoveInput) -> bool {
        match self.try_apply_move(input) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Move rejected");
                false
            }
        }
    }

    pub fn try_apply_move(&mut self, input: MoveInput) -> Result<PlayedMove, GameError> {
        if self.thinking {
            return Err(GameError::AiThinking);
        }
        if !self.human_to_move() {
            return Err(GameError::NotYourTurn);
        }
        self.commit(&input)
    }

    /// Only checkmate closes the board. A drawn position still takes moves
    /// from a human; the AI stops on draws through [`Self::ai_turn_due`].
    fn commit(&mut self, input: &MoveInput) -> Result<PlayedMove, GameError> {
        if self.rules.is_checkmate() {
            return Err(GameError::GameOver);
        }
        let played = self.rules.play(input)?;
        if played.captured.is_some() {
            self.sounds.play(SoundCue::Capture);
        } else {
            self.sounds.play(SoundCue::Move);
        }
        Ok(played)
    }

    /// Back to the initial position with the same players.
    pub fn reset(&mut self) {
        self.rules.reset();
        self.orientation = Orientation::default();
        self.thinking = false;
        self.epoch += 1;
        info!(epoch = self.epoch, "Game reset");
    }

    pub fn new_game(&mut self, mode: GameMode) {
        self.players = mode.players();
        self.reset();
    }

    pub fn flip_orientation(&mut self) {
        self.orientation = self.orientation.flipped();
    }

    /// AI controls the side to move, the game is live and no request is out.
    pub fn ai_turn_due(&self) -> bool {
        !self.thinking && !self.human_to_move() && !self.rules.is_game_over()
    }

    /// Claim the AI turn and raise the thinking flag.
    pub fn begin_ai_turn(&mut self) -> Option<AiTicket> {
        if !self.ai_turn_due() {
            return None;
        }
        self.thinking = true;
        Some(AiTicket {
            epoch: self.epoch,
            side: self.rules.turn(),
            fen: self.rules.fen(),
        })
    }

    pub fn is_current(&self, ticket: &AiTicket) -> bool {
        ticket.epoch == self.epoch && ticket.side == self.rules.turn()
    }

    /// Clear the thinking flag, unless the claim belongs to an older game.
    pub fn finish_thinking(&mut self, epoch: u64) {
        if epoch == self.epoch {
            self.thinking = false;
        }
    }

    /// Apply the token returned by the move generator for `ticket`.
    pub fn apply_ai_move(&mut self, ticket: &AiTicket, token: &str) -> AiMoveOutcome {
        if !self.is_current(ticket) {
            return AiMoveOutcome::Stale;
        }
        match self.commit(&MoveInput::notation(token)) {
            Ok(played) => AiMoveOutcome::Applied(played),
            Err(e) => AiMoveOutcome::Rejected(e),
        }
    }
}

impl<R: RulesEngine> fmt::Debug for GameSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("fen", &self.rules.fen())
            .field("players", &self.players)
            .field("orientation", &self.orientation)
            .field("thinking", &self.thinking)
            .field("epoch", &self.epoch)
            .finish()
    }
}
