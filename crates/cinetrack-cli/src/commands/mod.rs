pub mod config;
pub mod context;
pub mod discover;
pub mod entries;
pub mod filmography;
pub mod library;
pub mod progress;
pub mod prompts;
pub mod seasons;
pub mod stats;
pub mod watch;
