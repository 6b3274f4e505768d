//! Anime Rating Dashboard
//!
//! Loads `anime.csv` and `rating.csv`, joins each anime with its mean user
//! rating, and renders a fixed set of charts with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
