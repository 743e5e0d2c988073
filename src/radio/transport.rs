//! # Register Transport
//!
//! Owns the in-memory register image and mediates every chip access through
//! the [`Hal`]. Two rules from the hardware are enforced here:
//!
//! - Never write a register without having just read it. Unrelated bits in
//!   the same register must survive the write, so every write consumes a
//!   [`RegisterSnapshot`] produced by [`RegisterTransport::read_all`].
//! - The chip occasionally fails to acknowledge a write. Writes are retried
//!   a bounded number of times before the update is reported as failed.

use crate::constants::*;
use crate::error::RadioError;
use crate::radio::hal::Hal;
use crate::radio::registers::{RegisterImage, RegisterSnapshot};
use crate::util::logging::{log_registers, LogThrottle};
use log::{debug, trace, warn};

/// Register transport over a HAL implementation
pub struct RegisterTransport<H: Hal> {
    /// Bus collaborator
    hal: H,
    /// Mirror of the last successful read and write
    image: RegisterImage,
    /// Write attempts per update
    write_retries: u8,
    /// Limits retry warnings on a noisy bus
    retry_throttle: LogThrottle,
}

impl<H: Hal> RegisterTransport<H> {
    /// Create a transport with an empty register image
    ///
    /// # Arguments
    /// * `hal` - Bus collaborator
    /// * `write_retries` - Write attempts per update (at least one is made)
    pub fn new(hal: H, write_retries: u8) -> Self {
        Self {
            hal,
            image: RegisterImage::default(),
            write_retries: write_retries.max(1),
            retry_throttle: LogThrottle::new(60_000, 5),
        }
    }

    /// Read all sixteen registers.
    ///
    /// The chip answers starting at STATUSRSSI (0x0A) and wraps through
    /// 0x0F to 0x00..0x09; the words are stored by address. On failure the
    /// image keeps its previous contents.
    ///
    /// # Returns
    /// * `Ok(RegisterSnapshot)` - Freshly read registers, ready to be edited
    /// * `Err(RadioError::Hal)` - Bus read failed
    pub fn read_all(&mut self) -> Result<RegisterSnapshot, RadioError> {
        let mut raw = [0u16; REGISTER_COUNT];
        self.hal.read_words(&mut raw)?;
        self.image = RegisterImage::from_read_order(&raw);
        trace!("Read registers: {}", self.image.hex_dump());
        Ok(RegisterSnapshot::from_image(self.image))
    }

    /// Write POWERCFG..=TEST1 from a snapshot back to the chip.
    ///
    /// The bus write is attempted up to `write_retries` times. The image is
    /// only updated once a write succeeds, so a failed update leaves it as
    /// it was before the call.
    ///
    /// # Returns
    /// * `Ok(())` - Registers written
    /// * `Err(RadioError::WriteFailed)` - Every attempt failed
    pub fn update_registers(&mut self, snapshot: RegisterSnapshot) -> Result<(), RadioError> {
        let words = snapshot.image().write_range();

        for attempt in 1..=self.write_retries {
            match self.hal.write_words(WRITE_START_REGISTER, &words) {
                Ok(()) => {
                    if attempt > 1 {
                        debug!("Register update succeeded on attempt {attempt}");
                    }
                    self.image.commit_write_range(&words);
                    log_registers("Wrote registers", &words);
                    return Ok(());
                }
                Err(e) => {
                    if self.retry_throttle.allow() {
                        warn!(
                            "Register write attempt {attempt}/{} failed: {e}",
                            self.write_retries
                        );
                    }
                }
            }
        }

        Err(RadioError::WriteFailed {
            attempts: self.write_retries,
        })
    }

    /// Last known register contents
    pub fn image(&self) -> &RegisterImage {
        &self.image
    }

    /// Block for `ms` milliseconds using the HAL's delay
    pub fn delay_ms(&mut self, ms: u32) {
        self.hal.delay_ms(ms);
    }

    /// Access the HAL directly
    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Give the HAL back
    pub fn into_hal(self) -> H {
        self.hal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::hal::MockSi4703;

    #[test]
    fn test_read_all_maps_wrap_order() {
        let mock = MockSi4703::new();
        mock.set_register(STATUSRSSI, 0x0123);
        mock.set_register(POWERCFG, 0x4001);
        let mut transport = RegisterTransport::new(mock, 10);

        let snapshot = transport.read_all().unwrap();
        assert_eq!(snapshot.image().word(STATUSRSSI), 0x0123);
        assert_eq!(snapshot.image().word(POWERCFG), 0x4001);
        assert_eq!(snapshot.image().word(DEVICEID), 0x1242);
        assert_eq!(transport.image(), snapshot.image());
    }

    #[test]
    fn test_update_writes_power_config_through_test1() {
        let mock = MockSi4703::new();
        let mut transport = RegisterTransport::new(mock.clone(), 10);

        let mut snapshot = transport.read_all().unwrap();
        snapshot.set_volume(7);
        transport.update_registers(snapshot).unwrap();

        let writes = mock.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, POWERCFG);
        assert_eq!(writes[0].1.len(), WRITE_REGISTER_COUNT);
        assert_eq!(mock.register(SYSCONFIG2) & 0x000F, 7);
        assert_eq!(transport.image().volume(), 7);
    }

    #[test]
    fn test_update_retries_then_succeeds() {
        let mock = MockSi4703::new();
        let mut transport = RegisterTransport::new(mock.clone(), 10);
        let snapshot = transport.read_all().unwrap();

        mock.fail_next_writes(9);
        transport.update_registers(snapshot).unwrap();
        assert_eq!(mock.write_attempts(), 10);
    }

    #[test]
    fn test_update_fails_after_all_attempts_and_keeps_image() {
        let mock = MockSi4703::new();
        let mut transport = RegisterTransport::new(mock.clone(), 10);
        let mut snapshot = transport.read_all().unwrap();
        let before = *transport.image();

        snapshot.set_volume(15);
        snapshot.set_enable(true);
        mock.fail_next_writes(10);
        let result = transport.update_registers(snapshot);

        assert!(matches!(result, Err(RadioError::WriteFailed { attempts: 10 })));
        assert_eq!(mock.write_attempts(), 10);
        assert_eq!(*transport.image(), before);
    }

    #[test]
    fn test_failed_read_keeps_image() {
        let mock = MockSi4703::new();
        let mut transport = RegisterTransport::new(mock.clone(), 10);
        transport.read_all().unwrap();
        let before = *transport.image();

        mock.set_register(STATUSRSSI, 0xFFFF);
        mock.fail_next_reads(1);
        assert!(matches!(transport.read_all(), Err(RadioError::Hal(_))));
        assert_eq!(*transport.image(), before);
    }
}
