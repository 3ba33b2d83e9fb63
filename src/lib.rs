pub mod app;
pub mod cache;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
