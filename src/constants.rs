//! Si4703 Constants
//!
//! Register addresses, bus geometry and timing constants for the Si4703
//! broadcast FM radio tuner, taken from the Si4702/03-C19 datasheet and
//! AN230 programming guide.

/// 7-bit I2C address of the Si4703
pub const SI4703_I2C_ADDRESS: u16 = 0x10;

/// Number of 16-bit registers on the chip
pub const REGISTER_COUNT: usize = 16;

/// Register the chip starts at on every bus read (reads wrap at 0x0F)
pub const READ_START_REGISTER: u8 = STATUSRSSI;

/// Register the chip starts at on every bus write
pub const WRITE_START_REGISTER: u8 = POWERCFG;

/// Number of registers written back by an update (POWERCFG through TEST1)
pub const WRITE_REGISTER_COUNT: usize = 6;

/// Bus write attempts before an update is reported as failed
pub const DEFAULT_WRITE_RETRIES: u8 = 10;

/// Delay between seek/tune status polls
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// Upper bound on a seek or tune operation.
///
/// The datasheet gives 60 ms per channel for a seek; a full sweep of the
/// widest band at 50 kHz spacing visits 640 channels.
pub const DEFAULT_TUNE_TIMEOUT_MS: u32 = 40_000;

/// Crystal oscillator start-up time after setting XOSCEN
pub const OSCILLATOR_SETTLE_MS: u32 = 500;

/// Power-up time after setting ENABLE
pub const POWERUP_SETTLE_MS: u32 = 110;

/// Highest volume step
pub const MAX_VOLUME: u8 = 15;

/// Value written to TEST1 to start the 32.768 kHz crystal oscillator
pub const TEST1_XOSC_ENABLE: u16 = 0x8100;

// =============================================================================
// Register Addresses
// =============================================================================

/// Device ID (part number and manufacturer)
pub const DEVICEID: u8 = 0x00;

/// Chip ID (revision, device and firmware)
pub const CHIPID: u8 = 0x01;

/// Power configuration: mute, seek control, enable
pub const POWERCFG: u8 = 0x02;

/// Tune control and channel select
pub const CHANNEL: u8 = 0x03;

/// RDS/interrupt enables, de-emphasis, GPIO configuration
pub const SYSCONFIG1: u8 = 0x04;

/// Seek threshold, band, spacing and volume
pub const SYSCONFIG2: u8 = 0x05;

/// Soft mute and seek quality settings
pub const SYSCONFIG3: u8 = 0x06;

/// Crystal oscillator enable
pub const TEST1: u8 = 0x07;

/// Reserved test register
pub const TEST2: u8 = 0x08;

/// Reserved boot configuration register
pub const BOOTCONFIG: u8 = 0x09;

/// Status flags and received signal strength
pub const STATUSRSSI: u8 = 0x0A;

/// Currently tuned channel
pub const READCHAN: u8 = 0x0B;

/// RDS block A
pub const RDSA: u8 = 0x0C;

/// RDS block B
pub const RDSB: u8 = 0x0D;

/// RDS block C
pub const RDSC: u8 = 0x0E;

/// RDS block D
pub const RDSD: u8 = 0x0F;

// =============================================================================
// RDS Constants
// =============================================================================

/// Characters in a programme service (station) name
pub const STATION_NAME_LEN: usize = 8;

/// Maximum characters in a radiotext message
pub const RADIO_TEXT_LEN: usize = 64;

/// Radiotext end-of-message marker
pub const RADIO_TEXT_TERMINATOR: u8 = 0x0D;
