pub mod action;
pub mod client;
pub mod config;
pub mod logging;
pub mod model;
pub mod render;
pub mod store;
pub mod worker;

#[cfg(feature = "tui")]
pub mod tui;
