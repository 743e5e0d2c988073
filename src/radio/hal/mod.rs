//! # Hardware Abstraction Layer for the Si4703
//!
//! This module defines the HAL trait the register transport talks to and
//! provides platform implementations. The Si4703's two-wire interface has a
//! fixed geometry: reads always start at STATUSRSSI (0x0A) and wrap around
//! the 16-register space, writes always start at POWERCFG (0x02). Words are
//! transferred most-significant byte first.

use thiserror::Error;

/// Errors that can occur during HAL operations
#[derive(Debug, Error)]
pub enum HalError {
    #[error("I2C bus error: {0}")]
    Bus(String),

    #[error("Device did not acknowledge")]
    Nack,

    #[error("GPIO operation error: {0}")]
    Gpio(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Hardware Abstraction Layer trait for Si4703 register access
pub trait Hal {
    /// Read `buf.len()` words starting at the chip's fixed read offset.
    ///
    /// The first word is STATUSRSSI (0x0A); register addresses wrap from
    /// 0x0F to 0x00.
    fn read_words(&mut self, buf: &mut [u16]) -> Result<(), HalError>;

    /// Write `words` to consecutive registers starting at `first_register`.
    ///
    /// A single attempt; retrying is the transport's job.
    fn write_words(&mut self, first_register: u8, words: &[u16]) -> Result<(), HalError>;

    /// Block the caller for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Whether the RDS interrupt line has fired since the last call.
    ///
    /// `None` means the HAL has no interrupt line and the caller has to read
    /// STATUSRSSI to find out.
    fn rds_interrupt_pending(&mut self) -> Option<bool> {
        None
    }
}

// Register-level chip simulator for tests and host development
pub mod mock;

// Platform implementations
#[cfg(feature = "raspberry-pi")]
pub mod raspberry_pi;

pub use mock::MockSi4703;

#[cfg(feature = "raspberry-pi")]
pub use raspberry_pi::RaspberryPiHal;
