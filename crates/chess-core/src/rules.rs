//! The rules-engine seam.
//!
//! Everything the session needs from chess itself goes through
//! [`RulesEngine`]: move execution, termination predicates and the replayable
//! history. [`StandardChess`] backs it with shakmaty.

use std::collections::HashMap;

use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position, Role, Square};

use crate::error::GameError;
use crate::types::{PieceKind, Side};

/// Halfmove clock value at which the fifty-move rule applies.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// A move request, either from board coordinates or a notation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveInput {
    Coordinates {
        from: Square,
        to: Square,
        promotion: Option<Role>,
    },
    /// SAN (`Nf3`, `exd5`, `O-O`, `e8=Q+`) or UCI (`g1f3`).
    Notation(String),
}

impl MoveInput {
    /// Build a coordinate move from strings such as `"e2"`, `"e4"`, `Some("q")`.
    pub fn coordinates(from: &str, to: &str, promotion: Option<&str>) -> Result<Self, GameError> {
        let from = parse_square(from)?;
        let to = parse_square(to)?;
        let promotion = match promotion.map(str::trim).filter(|p| !p.is_empty()) {
            None => None,
            Some(p) => Some(parse_promotion(p)?),
        };
        Ok(MoveInput::Coordinates { from, to, promotion })
    }

    pub fn notation(token: impl Into<String>) -> Self {
        MoveInput::Notation(token.into())
    }
}

pub fn parse_square(s: &str) -> Result<Square, GameError> {
    s.trim()
        .to_ascii_lowercase()
        .parse::<Square>()
        .map_err(|_| GameError::InvalidSquare(s.to_string()))
}

fn parse_promotion(p: &str) -> Result<Role, GameError> {
    let mut chars = p.chars();
    let role = match (chars.next(), chars.next()) {
        (Some(c), None) => Role::from_char(c.to_ascii_lowercase()),
        _ => None,
    };
    match role {
        Some(r @ (Role::Knight | Role::Bishop | Role::Rook | Role::Queen)) => Ok(r),
        _ => Err(GameError::InvalidPromotion(p.to_string())),
    }
}

/// One accepted move as recorded in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayedMove {
    pub side: Side,
    /// SAN including the `+` / `#` suffix.
    pub san: String,
    pub uci: String,
    pub from: String,
    pub to: String,
    pub piece: PieceKind,
    /// Set for every capture, en passant included.
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub fen_after: String,
}

pub trait RulesEngine {
    /// Position encoding (FEN) of the current position.
    fn fen(&self) -> String;

    fn turn(&self) -> Side;

    /// Piece on a square, if any.
    fn piece_at(&self, square: Square) -> Option<(Side, PieceKind)>;

    /// Execute a move. On error the position is untouched.
    fn play(&mut self, input: &MoveInput) -> Result<PlayedMove, GameError>;

    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_threefold_repetition(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;
    fn is_fifty_move_rule(&self) -> bool;
    fn is_check(&self) -> bool;

    fn is_draw(&self) -> bool {
        self.is_stalemate()
            || self.is_threefold_repetition()
            || self.is_insufficient_material()
            || self.is_fifty_move_rule()
    }

    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    fn history(&self) -> &[PlayedMove];

    /// Back to the standard starting position with an empty history.
    fn reset(&mut self);
}

/// Standard chess on top of shakmaty.
#[derive(Debug, Clone)]
pub struct StandardChess {
    pos: Chess,
    history: Vec<PlayedMove>,
    /// Occurrences of every position reached, keyed by Zobrist hash.
    seen: HashMap<Zobrist64, u32>,
}

impl Default for StandardChess {
    fn default() -> Self {
        Self::from_position(Chess::default())
    }
}

impl StandardChess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary FEN. History begins empty.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|_| GameError::InvalidFen(fen.to_string()))?;
        let pos = parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| GameError::InvalidFen(format!("{fen}: {e}")))?;
        Ok(Self::from_position(pos))
    }

    fn from_position(pos: Chess) -> Self {
        let mut engine = Self {
            pos,
            history: Vec::new(),
            seen: HashMap::new(),
        };
        engine.record_position();
        engine
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    fn position_key(&self) -> Zobrist64 {
        self.pos.zobrist_hash::<Zobrist64>(EnPassantMode::Legal)
    }

    fn record_position(&mut self) {
        *self.seen.entry(self.position_key()).or_insert(0) += 1;
    }

    fn resolve(&self, input: &MoveInput) -> Result<Move, GameError> {
        match input {
            MoveInput::Coordinates {
                from,
                to,
                promotion,
            } => self
                .pos
                .legal_moves()
                .into_iter()
                .find(|m| match m.to_uci(CastlingMode::Standard) {
                    // A hint on a non-promoting move is ignored; a promoting
                    // move needs the matching hint.
                    UciMove::Normal {
                        from: f,
                        to: t,
                        promotion: p,
                    } => f == *from && t == *to && (p.is_none() || p == *promotion),
                    _ => false,
                })
                .ok_or_else(|| GameError::IllegalMove(format!("{from}{to}"))),
            MoveInput::Notation(token) => self.resolve_token(token),
        }
    }

    fn resolve_token(&self, token: &str) -> Result<Move, GameError> {
        let mut parsed = false;

        if let Ok(san) = token.parse::<SanPlus>() {
            parsed = true;
            if let Ok(m) = san.san.to_move(&self.pos) {
                return Ok(m);
            }
        }

        if let Ok(uci) = token.parse::<UciMove>() {
            parsed = true;
            if let Ok(m) = uci.to_move(&self.pos) {
                return Ok(m);
            }
        }

        if parsed {
            Err(GameError::IllegalMove(token.to_string()))
        } else {
            Err(GameError::UnreadableMove(token.to_string()))
        }
    }
}

impl RulesEngine for StandardChess {
    fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    fn turn(&self) -> Side {
        self.pos.turn().into()
    }

    fn piece_at(&self, square: Square) -> Option<(Side, PieceKind)> {
        self.pos
            .board()
            .piece_at(square)
            .map(|p| (p.color.into(), p.role.into()))
    }

    fn play(&mut self, input: &MoveInput) -> Result<PlayedMove, GameError> {
        let m = self.resolve(input)?;

        let side = self.turn();
        let san = San::from_move(&self.pos, m.clone()).to_string();
        let (from, to) = match m.to_uci(CastlingMode::Standard) {
            UciMove::Normal { from, to, .. } => (from.to_string(), to.to_string()),
            other => (String::new(), other.to_string()),
        };
        let uci = m.to_uci(CastlingMode::Standard).to_string();

        self.pos.play_unchecked(m.clone());
        self.record_position();

        let suffix = if self.pos.is_checkmate() {
            "#"
        } else if self.pos.is_check() {
            "+"
        } else {
            ""
        };

        let played = PlayedMove {
            side,
            san: format!("{san}{suffix}"),
            uci,
            from,
            to,
            piece: m.role().into(),
            captured: m.capture().map(PieceKind::from),
            promotion: m.promotion().map(PieceKind::from),
            fen_after: self.fen(),
        };
        self.history.push(played.clone());
        Ok(played)
    }

    fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.pos.is_stalemate()
    }

    fn is_threefold_repetition(&self) -> bool {
        self.seen.get(&self.position_key()).copied().unwrap_or(0) >= 3
    }

    fn is_insufficient_material(&self) -> bool {
        self.pos.is_insufficient_material()
    }

    fn is_fifty_move_rule(&self) -> bool {
        self.pos.halfmoves() >= FIFTY_MOVE_HALFMOVES
    }

    fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    fn history(&self) -> &[PlayedMove] {
        &self.history
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
