//! Status derived from the rules engine on every position change.

use std::fmt;

use serde::Serialize;

use crate::rules::RulesEngine;
use crate::types::Side;

/// Why a game ended drawn. Serialized as the text shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawReason {
    #[serde(rename = "Rey ahogado")]
    Stalemate,
    #[serde(rename = "Triple repetición")]
    ThreefoldRepetition,
    #[serde(rename = "Material insuficiente")]
    InsufficientMaterial,
    #[serde(rename = "Regla de los 50 movimientos")]
    FiftyMoveRule,
}

impl DrawReason {
    pub fn label(self) -> &'static str {
        match self {
            DrawReason::Stalemate => "Rey ahogado",
            DrawReason::ThreefoldRepetition => "Triple repetición",
            DrawReason::InsufficientMaterial => "Material insuficiente",
            DrawReason::FiftyMoveRule => "Regla de los 50 movimientos",
        }
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    pub is_checkmate: bool,
    pub is_draw: bool,
    /// Also true on checkmate.
    pub is_check: bool,
    pub winner: Option<Side>,
    pub reason: Option<DrawReason>,
    pub display_message: String,
}

impl GameStatus {
    /// Checkmate wins over everything else. Only one draw reason is reported,
    /// picked in the order stalemate, repetition, material, fifty moves.
    pub fn derive<R: RulesEngine + ?Sized>(rules: &R) -> Self {
        let turn = rules.turn();
        let is_checkmate = rules.is_checkmate();
        let is_check = rules.is_check();

        let reason = if rules.is_stalemate() {
            Some(DrawReason::Stalemate)
        } else if rules.is_threefold_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else if rules.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if rules.is_fifty_move_rule() {
            Some(DrawReason::FiftyMoveRule)
        } else {
            None
        };
        let is_draw = !is_checkmate && reason.is_some();
        let reason = if is_draw { reason } else { None };

        let winner = is_checkmate.then(|| turn.opponent());

        let display_message = match (winner, reason) {
            (Some(side), _) => format!("¡Jaque mate! {} ganan.", side.label()),
            (None, Some(reason)) => format!("¡Empate! ({reason})"),
            (None, None) if is_check => format!("¡Jaque! Turno de las {}", turn.label()),
            (None, None) => format!("Turno de las {}", turn.label()),
        };

        Self {
            is_checkmate,
            is_draw,
            is_check,
            winner,
            reason,
            display_message,
        }
    }

    pub fn is_over(&self) -> bool {
        self.is_checkmate || self.is_draw
    }

    /// PGN result tag.
    pub fn result(&self) -> &'static str {
        match (self.winner, self.is_draw) {
            (Some(Side::White), _) => "1-0",
            (Some(Side::Black), _) => "0-1",
            (None, true) => "1/2-1/2",
            (None, false) => "*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{MoveInput, StandardChess};

    fn status_of(fen: &str) -> GameStatus {
        GameStatus::derive(&StandardChess::from_fen(fen).unwrap())
    }

    #[test]
    fn test_opening_turn_message() {
        let status = GameStatus::derive(&StandardChess::new());
        assert_eq!(status.display_message, "Turno de las Blancas");
        assert!(!status.is_over());
        assert_eq!(status.result(), "*");
    }

    #[test]
    fn test_check_message() {
        let mut chess = StandardChess::new();
        for token in ["e4", "f5", "Qh5+"] {
            chess.play(&MoveInput::notation(token)).unwrap();
        }
        let status = GameStatus::derive(&chess);
        assert!(status.is_check);
        assert_eq!(status.winner, None);
        assert_eq!(status.display_message, "¡Jaque! Turno de las Negras");
    }

    #[test]
    fn test_checkmate() {
        let mut chess = StandardChess::new();
        for token in ["f3", "e5", "g4", "Qh4#"] {
            chess.play(&MoveInput::notation(token)).unwrap();
        }
        let status = GameStatus::derive(&chess);
        assert!(status.is_checkmate);
        assert!(status.is_check);
        assert!(!status.is_draw);
        assert_eq!(status.winner, Some(Side::Black));
        assert_eq!(status.display_message, "¡Jaque mate! Negras ganan.");
        assert_eq!(status.result(), "0-1");
    }

    #[test]
    fn test_stalemate_outranks_insufficient_material() {
        // King and bishop against a stalemated king: both conditions hold.
        let status = status_of("k7/2K5/1B6/8/8/8/8/8 b - - 0 1");
        assert!(status.is_draw);
        assert_eq!(status.reason, Some(DrawReason::Stalemate));
        assert_eq!(status.display_message, "¡Empate! (Rey ahogado)");
        assert_eq!(status.result(), "1/2-1/2");
    }

    #[test]
    fn test_insufficient_material() {
        let status = status_of("8/8/8/4k3/8/8/8/4K3 w - - 0 1");
        assert_eq!(status.reason, Some(DrawReason::InsufficientMaterial));
    }

    #[test]
    fn test_fifty_move_rule() {
        let status = status_of("8/8/8/4k3/8/8/3R4/4K3 w - - 100 80");
        assert_eq!(status.reason.map(DrawReason::label), Some("Regla de los 50 movimientos"));
    }

    #[test]
    fn test_reason_serializes_as_label() {
        let status = status_of("8/8/8/4k3/8/8/8/4K3 w - - 0 1");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["reason"], "Material insuficiente");
        assert_eq!(json["isDraw"], true);
        assert_eq!(json["winner"], serde_json::Value::Null);
    }
}
