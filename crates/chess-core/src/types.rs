//! Small value types shared by the session, the tally and the wire format.

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Role};

/// A side of the board. Serialized as `"w"` / `"b"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Plural label used in status messages ("Turno de las Blancas").
    pub fn label(self) -> &'static str {
        match self {
            Side::White => "Blancas",
            Side::Black => "Negras",
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Piece kind, ordered pawn → king. Serialized as the lowercase letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    #[serde(rename = "p")]
    Pawn,
    #[serde(rename = "n")]
    Knight,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "k")]
    King,
}

impl PieceKind {
    pub fn char(self) -> char {
        Role::from(self).char()
    }
}

impl From<Role> for PieceKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King,
        }
    }
}

impl From<PieceKind> for Role {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => Role::Pawn,
            PieceKind::Knight => Role::Knight,
            PieceKind::Bishop => Role::Bishop,
            PieceKind::Rook => Role::Rook,
            PieceKind::Queen => Role::Queen,
            PieceKind::King => Role::King,
        }
    }
}

/// Which side is drawn at the bottom of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    #[serde(rename = "w")]
    pub white: PlayerKind,
    #[serde(rename = "b")]
    pub black: PlayerKind,
}

impl Players {
    pub fn for_side(&self, side: Side) -> PlayerKind {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }
}

/// The two modes offered on the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Human plays white, the AI answers with black.
    HumanVsAi,
    /// Two players sharing one device.
    HumanVsHuman,
}

impl GameMode {
    pub fn players(self) -> Players {
        match self {
            GameMode::HumanVsAi => Players {
                white: PlayerKind::Human,
                black: PlayerKind::Ai,
            },
            GameMode::HumanVsHuman => Players {
                white: PlayerKind::Human,
                black: PlayerKind::Human,
            },
        }
    }

    /// The mode matching `players`, if it is one of the offered ones.
    pub fn from_players(players: Players) -> Option<Self> {
        [GameMode::HumanVsAi, GameMode::HumanVsHuman]
            .into_iter()
            .find(|mode| mode.players() == players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Side::White).unwrap(), "\"w\"");
        assert_eq!(serde_json::to_string(&Side::Black).unwrap(), "\"b\"");
        assert_eq!(Side::White.opponent(), Side::Black);
    }

    #[test]
    fn test_game_mode_players() {
        let players = GameMode::HumanVsAi.players();
        assert_eq!(players.for_side(Side::White), PlayerKind::Human);
        assert_eq!(players.for_side(Side::Black), PlayerKind::Ai);

        let mode: GameMode = serde_json::from_str("\"human-vs-human\"").unwrap();
        assert_eq!(mode, GameMode::HumanVsHuman);
    }

    #[test]
    fn test_orientation_flip() {
        assert_eq!(Orientation::default(), Orientation::White);
        assert_eq!(Orientation::White.flipped(), Orientation::Black);
        assert_eq!(Orientation::White.flipped().flipped(), Orientation::White);
    }
}
