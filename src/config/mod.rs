//! Configuration module for Eventra
//!
//! - path resolution for the data directory
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::EventraPaths;
pub use settings::Settings;
