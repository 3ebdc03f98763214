use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid promotion piece: {0}")]
    InvalidPromotion(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Unreadable move: {0}")]
    UnreadableMove(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("The game is over")]
    GameOver,

    #[error("The side to move is not controlled by a human")]
    NotYourTurn,

    #[error("Waiting for the AI to move")]
    AiThinking,
}
