pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod player;
pub mod position;
pub mod status;
