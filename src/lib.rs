pub mod api;
pub mod app_context;
pub mod config;
pub mod core;
pub mod data;
pub mod debouncer;
pub mod services;
pub mod tui_app;
pub mod utils;
pub mod widget_traits;
pub mod widgets;
