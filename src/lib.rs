//! Per-group Wordle for group chats.
//!
//! One game runs per chat group at a time. Members guess by prefixing a word
//! with `#` or `!`; the engine evaluates each guess against the target word,
//! tracks the shared guess history, and hands a board snapshot to whatever
//! renderer the host platform provides (falling back to emoji text).
//!
//! The interesting parts live in [`engine`] (the game state machine),
//! [`game`] (guess evaluation), [`words`] (the word banks) and [`store`]
//! (per-group state with an optional MongoDB tier behind an in-memory one).

pub mod config;
pub mod engine;
pub mod game;
pub mod logging;
pub mod render;
pub mod router;
pub mod store;
pub mod translate;
pub mod words;

pub use engine::GameEngine;
pub use store::GameStore;
pub use words::WordBank;
