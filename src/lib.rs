pub mod abilities;
pub mod config;
pub mod constants;
pub mod entities;
pub mod game;
pub mod phase;
pub mod rendering;
pub mod terminal_io;
pub mod types;
