//! Configuration module for hindsight
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::Settings;
