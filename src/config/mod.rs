//! Configuration module
//!
//! This module contains all configuration-related functionality
//! including settings and key bindings.

pub mod config;
pub mod key_bindings;

pub use config::Config;
pub use key_bindings::{AppAction, KeyBinding, KeyBindingManager};
