//! # Radio Configuration
//!
//! Configuration for the Si4703 driver and its Raspberry Pi HAL. The
//! configuration can be loaded from JSON:
//!
//! ```json
//! {
//!   "i2c_bus": 1,
//!   "reset_pin": 23,
//!   "sdio_pin": 2,
//!   "band": "us_europe",
//!   "spacing": "khz100",
//!   "de_emphasis": "eu50"
//! }
//! ```
//!
//! Missing fields fall back to [`RadioConfig::default`].

use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// FM band selection (SYSCONFIG2 BAND field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// 87.5-108 MHz
    UsEurope,
    /// 76-108 MHz
    JapanWide,
    /// 76-90 MHz
    Japan,
}

impl Band {
    /// Raw value of the BAND field
    pub fn bits(self) -> u16 {
        match self {
            Band::UsEurope => 0b00,
            Band::JapanWide => 0b01,
            Band::Japan => 0b10,
        }
    }

    /// Lowest frequency of the band in kHz
    pub fn bottom_khz(self) -> u32 {
        match self {
            Band::UsEurope => 87_500,
            Band::JapanWide | Band::Japan => 76_000,
        }
    }

    /// Highest frequency of the band in kHz
    pub fn top_khz(self) -> u32 {
        match self {
            Band::UsEurope | Band::JapanWide => 108_000,
            Band::Japan => 90_000,
        }
    }
}

/// Channel spacing (SYSCONFIG2 SPACE field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSpacing {
    /// 200 kHz (USA, Australia)
    Khz200,
    /// 100 kHz (Europe, Japan)
    Khz100,
    /// 50 kHz
    Khz50,
}

impl ChannelSpacing {
    /// Raw value of the SPACE field
    pub fn bits(self) -> u16 {
        match self {
            ChannelSpacing::Khz200 => 0b00,
            ChannelSpacing::Khz100 => 0b01,
            ChannelSpacing::Khz50 => 0b10,
        }
    }

    pub fn khz(self) -> u32 {
        match self {
            ChannelSpacing::Khz200 => 200,
            ChannelSpacing::Khz100 => 100,
            ChannelSpacing::Khz50 => 50,
        }
    }
}

/// Regional de-emphasis time constant (SYSCONFIG1 DE bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeEmphasis {
    /// 75 µs (USA)
    Us75,
    /// 50 µs (Europe, Australia, Japan)
    Eu50,
}

impl DeEmphasis {
    /// Whether the DE bit is set for this time constant
    pub fn is_50us(self) -> bool {
        matches!(self, DeEmphasis::Eu50)
    }
}

/// Configuration for the Si4703 driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    /// I2C bus number (e.g. 1 for `/dev/i2c-1`)
    pub i2c_bus: u8,
    /// 7-bit I2C address of the tuner (default: 0x10)
    pub i2c_address: u16,
    /// GPIO pin wired to RST (BCM numbering, default: 23)
    pub reset_pin: u8,
    /// GPIO pin wired to SDIO, shared with I2C SDA (BCM numbering, default: 2)
    pub sdio_pin: u8,
    /// FM band
    pub band: Band,
    /// Channel spacing
    pub spacing: ChannelSpacing,
    /// De-emphasis used by the CLI when powering on
    pub de_emphasis: DeEmphasis,
    /// Route RDS-ready interrupts to GPIO2
    pub rds_interrupt: bool,
    /// Host GPIO wired to the tuner's GPIO2 (BCM numbering); requires `rds_interrupt`
    pub rds_interrupt_pin: Option<u8>,
    /// Seek RSSI threshold; `None` leaves the chip default
    pub seek_threshold: Option<u8>,
    /// Bus write attempts per register update
    pub write_retries: u8,
    /// Delay between seek/tune status polls
    pub poll_interval_ms: u32,
    /// Upper bound on a single seek or tune
    pub tune_timeout_ms: u32,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            i2c_address: SI4703_I2C_ADDRESS,
            reset_pin: 23,
            sdio_pin: 2,
            band: Band::UsEurope,
            spacing: ChannelSpacing::Khz100,
            de_emphasis: DeEmphasis::Us75,
            rds_interrupt: false,
            rds_interrupt_pin: None,
            seek_threshold: None,
            write_retries: DEFAULT_WRITE_RETRIES,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            tune_timeout_ms: DEFAULT_TUNE_TIMEOUT_MS,
        }
    }
}

impl RadioConfig {
    /// Parse a configuration from a JSON string and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RadioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Check value ranges that the driver relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.i2c_address > 0x7F {
            return Err(ConfigError::Invalid(format!(
                "i2c_address 0x{:02X} is not a 7-bit address",
                self.i2c_address
            )));
        }
        if let (Some(pin), false) = (self.rds_interrupt_pin, self.rds_interrupt) {
            return Err(ConfigError::Invalid(format!(
                "rds_interrupt_pin {pin} set but rds_interrupt is disabled"
            )));
        }
        if self.write_retries == 0 {
            return Err(ConfigError::Invalid(
                "write_retries must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.tune_timeout_ms < self.poll_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "tune_timeout_ms ({}) shorter than poll_interval_ms ({})",
                self.tune_timeout_ms, self.poll_interval_ms
            )));
        }
        Ok(())
    }

    /// Number of status polls allowed for one seek or tune
    pub fn max_tune_polls(&self) -> u32 {
        (self.tune_timeout_ms / self.poll_interval_ms.max(1)).max(1)
    }

    /// Lowest tunable channel in 100 kHz units
    pub fn min_channel(&self) -> u16 {
        (self.band.bottom_khz() / 100) as u16
    }

    /// Highest tunable channel in 100 kHz units
    pub fn max_channel(&self) -> u16 {
        (self.band.top_khz() / 100) as u16
    }

    /// Convert a channel in 100 kHz units to the raw CHAN field value.
    ///
    /// Returns `None` when the channel lies outside the configured band or
    /// between two spacing steps (98.0 MHz with 200 kHz spacing in the
    /// 87.5 MHz band).
    pub fn channel_to_raw(&self, channel: u16) -> Option<u16> {
        let khz = u32::from(channel) * 100;
        if khz < self.band.bottom_khz() || khz > self.band.top_khz() {
            return None;
        }
        let offset = khz - self.band.bottom_khz();
        if offset % self.spacing.khz() != 0 {
            return None;
        }
        Some((offset / self.spacing.khz()) as u16)
    }

    /// Convert a raw READCHAN value to a channel in 100 kHz units.
    ///
    /// Channels that fall between 100 kHz steps (50 kHz spacing) round down.
    pub fn raw_to_channel(&self, raw: u16) -> u16 {
        let khz = self.band.bottom_khz() + u32::from(raw) * self.spacing.khz();
        (khz / 100) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RadioConfig::default().validate().is_ok());
    }

    #[test]
    fn test_channel_conversion_europe() {
        let config = RadioConfig::default();
        assert_eq!(config.channel_to_raw(875), Some(0));
        assert_eq!(config.channel_to_raw(973), Some(98));
        assert_eq!(config.raw_to_channel(98), 973);
        assert_eq!(config.channel_to_raw(1080), Some(205));
        assert_eq!(config.channel_to_raw(874), None);
        assert_eq!(config.channel_to_raw(1081), None);
    }

    #[test]
    fn test_channel_conversion_us_spacing() {
        let config = RadioConfig {
            spacing: ChannelSpacing::Khz200,
            ..RadioConfig::default()
        };
        assert_eq!(config.channel_to_raw(1011), Some(68));
        assert_eq!(config.raw_to_channel(68), 1011);
        assert_eq!(config.channel_to_raw(980), None);
    }

    #[test]
    fn test_channel_conversion_japan() {
        let config = RadioConfig {
            band: Band::Japan,
            spacing: ChannelSpacing::Khz50,
            ..RadioConfig::default()
        };
        assert_eq!(config.min_channel(), 760);
        assert_eq!(config.max_channel(), 900);
        assert_eq!(config.channel_to_raw(800), Some(80));
        assert_eq!(config.raw_to_channel(81), 800);
        assert_eq!(config.channel_to_raw(950), None);
    }

    #[test]
    fn test_max_tune_polls() {
        let config = RadioConfig {
            poll_interval_ms: 10,
            tune_timeout_ms: 1_000,
            ..RadioConfig::default()
        };
        assert_eq!(config.max_tune_polls(), 100);
    }

    #[test]
    fn test_validate_rejects_zero_retries() {
        let config = RadioConfig {
            write_retries: 0,
            ..RadioConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_interrupt_pin_without_interrupt() {
        let config = RadioConfig {
            rds_interrupt_pin: Some(24),
            ..RadioConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = RadioConfig {
            rds_interrupt: true,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RadioConfig::from_json(r#"{ "band": "japan_wide", "rds_interrupt": true }"#)
            .unwrap();
        assert_eq!(config.band, Band::JapanWide);
        assert!(config.rds_interrupt);
        assert_eq!(config.write_retries, DEFAULT_WRITE_RETRIES);
        assert_eq!(config.spacing, ChannelSpacing::Khz100);
    }
}
