// City weather: caching weather proxy service and terminal map viewer.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod server;
pub mod state;
pub mod ui;
