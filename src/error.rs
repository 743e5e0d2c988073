//! # Si4703 Error Handling
//!
//! This module defines the error types surfaced by the si4703-rs crate.
//! Bus-level failures originate in the HAL as [`HalError`] and are wrapped
//! into [`RadioError`] by the register transport and driver.

use crate::radio::hal::HalError;
use thiserror::Error;

/// Represents the different error types that can occur while driving the radio.
#[derive(Debug, Error)]
pub enum RadioError {
    /// Indicates a failure in the underlying bus or GPIO collaborator.
    #[error("HAL error: {0}")]
    Hal(#[from] HalError),

    /// Indicates every attempt to write the register range back failed.
    #[error("Register update failed after {attempts} attempts")]
    WriteFailed { attempts: u8 },

    /// Indicates the chip never reported seek/tune completion.
    #[error("Tuning timed out after {polls} status polls")]
    TuneTimeout { polls: u32 },

    /// Indicates a requested channel lies outside the configured band or off its spacing grid.
    #[error("Channel {channel} not tunable in band {min}..={max}")]
    InvalidChannel { channel: u16, min: u16, max: u16 },

    /// Indicates an invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating a [`crate::config::RadioConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for this schema.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
