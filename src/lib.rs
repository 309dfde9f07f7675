pub mod card;
pub mod config;
pub mod engine;
pub mod feed;
pub mod tui;
