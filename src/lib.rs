pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod schedule;
pub mod store;
pub mod theme;
pub mod tui;
