//! # Si4703 Radio Driver
//!
//! This module provides the high-level driver for the Silicon Labs Si4703
//! FM receiver. Every chip interaction goes through the
//! [`RegisterTransport`]: read the registers, edit the bits of interest on
//! the returned snapshot, write the snapshot back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │        Application Layer        │
//! ├─────────────────────────────────┤
//! │   Si4703Driver (this file)      │──── RdsDecoder
//! ├─────────────────────────────────┤
//! │       RegisterTransport         │
//! ├─────────────────────────────────┤
//! │      HAL Abstraction Layer      │
//! └─────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use si4703_rs::{MockSi4703, Pull, RadioConfig, Si4703Driver};
//!
//! let mut radio = Si4703Driver::new(MockSi4703::new(), RadioConfig::default())?;
//! radio.power_on(true)?;
//! radio.set_volume(5)?;
//! radio.set_channel(973)?;
//!
//! if radio.rds_available()? {
//!     if let Pull::Ready(name) = radio.station_name() {
//!         println!("Station: {name}");
//!     }
//! }
//! # Ok::<(), si4703_rs::RadioError>(())
//! ```

use crate::config::RadioConfig;
use crate::constants::*;
use crate::error::RadioError;
use crate::radio::hal::Hal;
use crate::radio::registers::{RegisterImage, RegisterSnapshot, Status};
use crate::radio::transport::RegisterTransport;
use crate::rds::{Pull, RdsDecoder, RdsGroup, RdsStats};
use log::{debug, info, warn};

/// Seek direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Down,
    Up,
}

/// Main driver structure for the Si4703
pub struct Si4703Driver<H: Hal> {
    /// Register image and bus access
    transport: RegisterTransport<H>,
    /// Band, spacing, retry and polling settings
    config: RadioConfig,
    /// Station name and radiotext state
    rds: RdsDecoder,
}

impl<H: Hal> Si4703Driver<H> {
    /// Create a new driver instance.
    ///
    /// Reset and bus selection are the HAL's responsibility; the chip must
    /// already be in two-wire mode.
    ///
    /// # Returns
    /// * `Ok(Si4703Driver)` - Driver ready for [`Self::power_on`]
    /// * `Err(RadioError::Config)` - Configuration failed validation
    pub fn new(hal: H, config: RadioConfig) -> Result<Self, RadioError> {
        config.validate()?;
        Ok(Self {
            transport: RegisterTransport::new(hal, config.write_retries),
            config,
            rds: RdsDecoder::new(),
        })
    }

    /// Start the oscillator and power up the receiver.
    ///
    /// # Arguments
    /// * `de_emphasis_50us` - `true` selects 50 µs de-emphasis (Europe,
    ///   Australia, Japan), `false` selects 75 µs (USA)
    pub fn power_on(&mut self, de_emphasis_50us: bool) -> Result<(), RadioError> {
        info!("Powering on Si4703");

        let mut snapshot = self.transport.read_all()?;
        snapshot.set_word(TEST1, TEST1_XOSC_ENABLE);
        self.transport.update_registers(snapshot)?;
        self.transport.delay_ms(OSCILLATOR_SETTLE_MS);

        let mut snapshot = self.transport.read_all()?;
        snapshot.set_word(POWERCFG, 0);
        snapshot.set_mute_disabled(true);
        snapshot.set_enable(true);
        snapshot.set_rds_enabled(true);
        snapshot.set_de_emphasis_50us(de_emphasis_50us);
        if self.config.rds_interrupt {
            snapshot.set_rds_interrupt(true);
        }
        snapshot.set_band_bits(self.config.band.bits());
        snapshot.set_spacing_bits(self.config.spacing.bits());
        if let Some(threshold) = self.config.seek_threshold {
            snapshot.set_seek_threshold(threshold);
        }
        snapshot.set_volume(1);
        self.transport.update_registers(snapshot)?;
        self.transport.delay_ms(POWERUP_SETTLE_MS);

        let snapshot = self.transport.read_all()?;
        let image = snapshot.image();
        debug!(
            "Si4703 part 0x{:X} manufacturer 0x{:03X} rev {} firmware {}",
            image.part_number(),
            image.manufacturer_id(),
            image.revision(),
            image.firmware()
        );
        Ok(())
    }

    /// Power on unless the chip already reports ENABLE.
    ///
    /// Leaves volume, mute and tuning of a running receiver untouched.
    ///
    /// # Returns
    /// * `Ok(true)` - The power-on sequence ran
    /// * `Ok(false)` - The receiver was already enabled
    pub fn power_on_if_needed(&mut self, de_emphasis_50us: bool) -> Result<bool, RadioError> {
        let snapshot = self.transport.read_all()?;
        if snapshot.image().enabled() {
            debug!("Si4703 already enabled, skipping power-on");
            return Ok(false);
        }
        self.power_on(de_emphasis_50us)?;
        Ok(true)
    }

    /// Tune to `channel`, given in 100 kHz units (973 = 97.3 MHz).
    ///
    /// # Returns
    /// * `Ok(channel)` - Channel reported by the chip after tuning
    /// * `Err(RadioError::InvalidChannel)` - Channel outside the configured band
    /// * `Err(RadioError::TuneTimeout)` - STC never asserted
    pub fn set_channel(&mut self, channel: u16) -> Result<u16, RadioError> {
        let raw = self
            .config
            .channel_to_raw(channel)
            .ok_or(RadioError::InvalidChannel {
                channel,
                min: self.config.min_channel(),
                max: self.config.max_channel(),
            })?;

        let mut snapshot = self.transport.read_all()?;
        snapshot.set_channel_raw(raw);
        snapshot.set_tune(true);
        self.transport.update_registers(snapshot)?;

        let mut snapshot = self.wait_for_stc(true)?;
        snapshot.set_tune(false);
        self.transport.update_registers(snapshot)?;
        self.wait_for_stc(false)?;

        let tuned = self.channel();
        info!("Tuned to {}.{} MHz", tuned / 10, tuned % 10);
        Ok(tuned)
    }

    /// Seek to the next station above the current channel
    pub fn seek_up(&mut self) -> Result<Option<u16>, RadioError> {
        self.seek(SeekDirection::Up)
    }

    /// Seek to the next station below the current channel
    pub fn seek_down(&mut self) -> Result<Option<u16>, RadioError> {
        self.seek(SeekDirection::Down)
    }

    /// Seek in `direction`, wrapping at the band edge.
    ///
    /// # Returns
    /// * `Ok(Some(channel))` - A station was found
    /// * `Ok(None)` - The chip reported seek failure / band limit
    /// * `Err(RadioError::TuneTimeout)` - STC never asserted
    pub fn seek(&mut self, direction: SeekDirection) -> Result<Option<u16>, RadioError> {
        let mut snapshot = self.transport.read_all()?;
        snapshot.set_seek_stop_at_limit(false);
        snapshot.set_seek_up(direction == SeekDirection::Up);
        snapshot.set_seek(true);
        self.transport.update_registers(snapshot)?;

        let mut snapshot = self.wait_for_stc(true)?;
        let failed = snapshot
            .image()
            .status()
            .contains(Status::SEEK_FAIL_BAND_LIMIT);
        snapshot.set_seek(false);
        self.transport.update_registers(snapshot)?;
        self.wait_for_stc(false)?;

        if failed {
            warn!("Seek {direction:?} failed: no station found");
            return Ok(None);
        }
        let channel = self.channel();
        info!("Seek {direction:?} found {}.{} MHz", channel / 10, channel % 10);
        Ok(Some(channel))
    }

    /// Set the output volume (0-15); larger values are clamped to 15
    pub fn set_volume(&mut self, volume: u8) -> Result<(), RadioError> {
        if volume > MAX_VOLUME {
            warn!("Volume {volume} out of range, using {MAX_VOLUME}");
        }
        let mut snapshot = self.transport.read_all()?;
        snapshot.set_volume(volume.min(MAX_VOLUME));
        self.transport.update_registers(snapshot)
    }

    /// Mute or unmute the audio outputs
    pub fn set_mute(&mut self, muted: bool) -> Result<(), RadioError> {
        let mut snapshot = self.transport.read_all()?;
        snapshot.set_mute_disabled(!muted);
        self.transport.update_registers(snapshot)
    }

    /// Poll for a new RDS group and feed it to the decoder.
    ///
    /// Must be called often enough to keep up with the broadcast group rate
    /// (about 11 groups per second); groups that arrive between polls are
    /// lost.
    ///
    /// With `rds_interrupt` configured and a HAL that exposes the GPIO2
    /// line, an idle line answers `false` without a bus transfer.
    ///
    /// # Returns
    /// * `Ok(true)` - A group was decoded during this call
    /// * `Ok(false)` - No group was ready
    pub fn rds_available(&mut self) -> Result<bool, RadioError> {
        if self.config.rds_interrupt
            && self.transport.hal_mut().rds_interrupt_pending() == Some(false)
        {
            return Ok(false);
        }
        let snapshot = self.transport.read_all()?;
        if !snapshot.image().status().contains(Status::RDS_READY) {
            return Ok(false);
        }
        self.rds.decode(RdsGroup::from(snapshot.image().rds_blocks()));
        Ok(true)
    }

    /// Take the station name once all four segments have been received
    pub fn station_name(&mut self) -> Pull<String> {
        self.rds.station_name()
    }

    /// Take the radiotext once the message is complete
    pub fn radio_text(&mut self) -> Pull<String> {
        self.rds.radio_text()
    }

    /// Refresh the register image (RSSI, stereo, channel)
    pub fn read_registers(&mut self) -> Result<(), RadioError> {
        self.transport.read_all().map(|_| ())
    }

    /// Received signal strength from the last read
    pub fn rssi(&self) -> u8 {
        self.transport.image().rssi()
    }

    /// Stereo indicator from the last read
    pub fn stereo(&self) -> bool {
        self.transport.image().stereo()
    }

    /// Tuned channel from the last read, in 100 kHz units
    pub fn channel(&self) -> u16 {
        self.config
            .raw_to_channel(self.transport.image().read_channel())
    }

    /// Last known register contents
    pub fn registers(&self) -> &RegisterImage {
        self.transport.image()
    }

    pub fn rds_stats(&self) -> RdsStats {
        self.rds.stats()
    }

    pub fn rds_decoder(&self) -> &RdsDecoder {
        &self.rds
    }

    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Give the HAL back
    pub fn release(self) -> H {
        self.transport.into_hal()
    }

    /// Poll STATUSRSSI until STC equals `complete`, bounded by the
    /// configured tune timeout.
    fn wait_for_stc(&mut self, complete: bool) -> Result<RegisterSnapshot, RadioError> {
        let max_polls = self.config.max_tune_polls();
        for poll in 1..=max_polls {
            let snapshot = self.transport.read_all()?;
            let stc = snapshot
                .image()
                .status()
                .contains(Status::SEEK_TUNE_COMPLETE);
            if stc == complete {
                if poll > 1 {
                    debug!("STC={} after {poll} polls", u8::from(complete));
                }
                return Ok(snapshot);
            }
            self.transport.delay_ms(self.config.poll_interval_ms);
        }
        warn!("STC did not reach {complete} within {max_polls} polls");
        Err(RadioError::TuneTimeout { polls: max_polls })
    }
}
