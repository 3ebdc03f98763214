//! AI opponent: the move-generator seam and the bridge that drives it.

pub mod bridge;

use std::future::Future;
use std::pin::Pin;

pub use bridge::{AiBridge, AiSettings, AiTurnReport};

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Move generator not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("The model returned an empty move")]
    EmptyResponse,
}

pub type MoveFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiError>> + Send + 'a>>;

/// Something that answers a position (FEN) with a single move token.
pub trait MoveGenerator: Send + Sync {
    fn request_move<'a>(&'a self, fen: &'a str) -> MoveFuture<'a>;
}
