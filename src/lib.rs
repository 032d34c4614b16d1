pub mod config;
pub mod core;
pub mod models;
pub mod render;
pub mod utils;
pub mod views;
