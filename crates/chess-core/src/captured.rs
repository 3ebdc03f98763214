//! Captured-piece tally, rebuilt from the move history.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rules::PlayedMove;
use crate::types::{PieceKind, Side};

/// Pieces each side has lost, by kind.
///
/// `w` lists white pieces taken by black, `b` black pieces taken by white.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapturedPieces {
    pub w: BTreeMap<PieceKind, u32>,
    pub b: BTreeMap<PieceKind, u32>,
}

impl CapturedPieces {
    /// Replay the whole history. A capture is charged to the side that did
    /// not make the move.
    pub fn from_history(history: &[PlayedMove]) -> Self {
        let mut captured = Self::default();
        for mv in history {
            if let Some(kind) = mv.captured {
                *captured.lost_by_mut(mv.side.opponent()).entry(kind).or_insert(0) += 1;
            }
        }
        captured
    }

    pub fn lost_by(&self, side: Side) -> &BTreeMap<PieceKind, u32> {
        match side {
            Side::White => &self.w,
            Side::Black => &self.b,
        }
    }

    fn lost_by_mut(&mut self, side: Side) -> &mut BTreeMap<PieceKind, u32> {
        match side {
            Side::White => &mut self.w,
            Side::Black => &mut self.b,
        }
    }

    pub fn count(&self, side: Side, kind: PieceKind) -> u32 {
        self.lost_by(side).get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self, side: Side) -> u32 {
        self.lost_by(side).values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_empty() && self.b.is_empty()
    }
}
