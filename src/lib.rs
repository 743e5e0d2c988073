//! # si4703-rs - A Rust Crate for the Si4703 FM Radio Receiver
//!
//! The si4703-rs crate drives the Silicon Labs Si4703 FM tuner over its
//! two-wire (I2C) interface and decodes the RDS station name and radiotext
//! broadcast alongside the audio.
//!
//! ## Features
//!
//! - Power-up sequence with oscillator start and band/spacing/de-emphasis setup
//! - Direct tuning and wrap-around seek with bounded STC polling
//! - Volume and mute control
//! - RDS group decoding for the programme service name (group 0) and
//!   radiotext (group 2, versions A and B)
//! - Register-level mock for host testing, Raspberry Pi HAL behind the
//!   `raspberry-pi` feature
//! - JSON configuration and logging through the `log` facade
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! si4703-rs = "0.1.0"
//! ```
//!
//! ```rust
//! use si4703_rs::{
//!     MockSi4703, Pull, RadioConfig, RadioError, SeekDirection, Si4703Driver,
//! };
//!
//! let mock = MockSi4703::new();
//! mock.set_seek_result(11, false);
//!
//! let mut radio = Si4703Driver::new(mock, RadioConfig::default())?;
//! radio.power_on(false)?;
//! let found = radio.seek(SeekDirection::Up)?;
//! assert_eq!(found, Some(886));
//! assert!(radio.station_name().is_pending());
//! # Ok::<(), RadioError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod radio;
pub mod rds;
pub mod util;

pub use crate::config::{Band, ChannelSpacing, DeEmphasis, RadioConfig};
pub use crate::error::{ConfigError, RadioError};
pub use crate::logging::{init_logger_with_default, log_info};

// Driver and register access
pub use radio::hal::{Hal, HalError, MockSi4703};
pub use radio::{RegisterImage, RegisterSnapshot, RegisterTransport, SeekDirection, Si4703Driver, Status};

#[cfg(feature = "raspberry-pi")]
pub use radio::hal::RaspberryPiHal;

// RDS decoding
pub use rds::{GroupKind, GroupVersion, Pull, RdsDecoder, RdsGroup, RdsStats};
