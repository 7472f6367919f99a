//! Configuration utilities

pub mod config;

pub use config::{ConfigurationManager, ConfigError, HeliostatConfig, MirrorLayout, TrackingConfig};
