pub mod cache;
pub mod cli;
pub mod config;
pub mod feed;
pub mod geo;
pub mod logging;
pub mod notifier;
pub mod scheduler;
pub mod watcher;
