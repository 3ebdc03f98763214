pub mod game;
pub mod health;
pub mod input;
pub mod layout;
pub mod ws;
