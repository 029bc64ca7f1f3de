//! Configuration: defaults, environment overrides, validation.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::{AppConfig, CaptionMode};
pub use validation::validate;
