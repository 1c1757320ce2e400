pub mod action;
pub mod commentary;
pub mod config;
pub mod console;
pub mod dice;
pub mod error;
pub mod events;
mod game_logic;
pub mod game_state;
pub mod host;
pub mod peer;
pub mod player;
pub mod split;
pub mod utils;

pub use game_logic::MIN_PLAYERS;
