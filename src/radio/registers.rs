//! # Si4703 Register Image and Bit Fields
//!
//! The chip exposes sixteen 16-bit registers. [`RegisterImage`] mirrors them
//! in memory and offers typed accessors so call sites never deal with raw bit
//! positions. Mutation only happens on a [`RegisterSnapshot`], which can only
//! be obtained from a successful bulk read (see
//! [`crate::radio::transport::RegisterTransport::read_all`]). Writing a
//! snapshot back therefore always preserves the bits the chip last reported.
//!
//! ## Field Map
//!
//! ```text
//! Reg  │ Name        │ Fields used by the driver
//! ─────┼─────────────┼──────────────────────────────────────────────
//! 0x02 │ POWERCFG    │ DSMUTE 15, DMUTE 14, SKMODE 10, SEEKUP 9,
//!      │             │ SEEK 8, ENABLE 0
//! 0x03 │ CHANNEL     │ TUNE 15, CHAN 9:0
//! 0x04 │ SYSCONFIG1  │ RDSIEN 15, STCIEN 14, RDS 12, DE 11, GPIO2 3:2
//! 0x05 │ SYSCONFIG2  │ SEEKTH 15:8, BAND 7:6, SPACE 5:4, VOLUME 3:0
//! 0x07 │ TEST1       │ XOSCEN 15
//! 0x0A │ STATUSRSSI  │ RDSR 15, STC 14, SF/BL 13, AFCRL 12, RDSS 11,
//!      │             │ ST 8, RSSI 7:0
//! 0x0B │ READCHAN    │ READCHAN 9:0
//! ```

use crate::constants::*;
use bitflags::bitflags;

bitflags! {
    /// Status flags in STATUSRSSI (0x0A)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Status: u16 {
        /// A new RDS group is available in RDSA..RDSD
        const RDS_READY            = 1 << 15;
        /// Seek or tune has completed
        const SEEK_TUNE_COMPLETE   = 1 << 14;
        /// Seek failed or hit the band limit
        const SEEK_FAIL_BAND_LIMIT = 1 << 13;
        /// AFC rail
        const AFC_RAIL             = 1 << 12;
        /// RDS decoder synchronised
        const RDS_SYNCHRONIZED     = 1 << 11;
        /// Stereo pilot detected
        const STEREO               = 1 << 8;
    }
}

// POWERCFG
const DSMUTE: u16 = 15;
const DMUTE: u16 = 14;
const SKMODE: u16 = 10;
const SEEKUP: u16 = 9;
const SEEK: u16 = 8;
const ENABLE: u16 = 0;

// CHANNEL
const TUNE: u16 = 15;

// SYSCONFIG1
const RDSIEN: u16 = 15;
const RDS: u16 = 12;
const DE: u16 = 11;

/// Mask of `width` low bits
const fn mask(width: u16) -> u16 {
    if width >= 16 {
        u16::MAX
    } else {
        (1 << width) - 1
    }
}

/// In-memory mirror of the sixteen chip registers, indexed by address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterImage {
    words: [u16; REGISTER_COUNT],
}

impl RegisterImage {
    /// Build an image from words already ordered by register address
    pub fn from_words(words: [u16; REGISTER_COUNT]) -> Self {
        Self { words }
    }

    /// Build an image from a bus read, which starts at STATUSRSSI and wraps
    pub fn from_read_order(raw: &[u16; REGISTER_COUNT]) -> Self {
        let mut words = [0u16; REGISTER_COUNT];
        for (i, word) in raw.iter().enumerate() {
            words[(READ_START_REGISTER as usize + i) % REGISTER_COUNT] = *word;
        }
        Self { words }
    }

    /// Raw value of a register
    pub fn word(&self, addr: u8) -> u16 {
        self.words[addr as usize % REGISTER_COUNT]
    }

    /// All registers ordered by address
    pub fn words(&self) -> &[u16; REGISTER_COUNT] {
        &self.words
    }

    /// The contiguous range the chip accepts on a write (POWERCFG..=TEST1)
    pub fn write_range(&self) -> [u16; WRITE_REGISTER_COUNT] {
        let mut out = [0u16; WRITE_REGISTER_COUNT];
        let start = WRITE_START_REGISTER as usize;
        out.copy_from_slice(&self.words[start..start + WRITE_REGISTER_COUNT]);
        out
    }

    pub(crate) fn commit_write_range(&mut self, words: &[u16; WRITE_REGISTER_COUNT]) {
        let start = WRITE_START_REGISTER as usize;
        self.words[start..start + WRITE_REGISTER_COUNT].copy_from_slice(words);
    }

    fn field(&self, addr: u8, shift: u16, width: u16) -> u16 {
        (self.word(addr) >> shift) & mask(width)
    }

    fn flag(&self, addr: u8, bit: u16) -> bool {
        self.field(addr, bit, 1) != 0
    }

    /// Status flags from STATUSRSSI
    pub fn status(&self) -> Status {
        Status::from_bits_truncate(self.word(STATUSRSSI))
    }

    /// Received signal strength, STATUSRSSI bits 7:0 (dBµV)
    pub fn rssi(&self) -> u8 {
        self.field(STATUSRSSI, 0, 8) as u8
    }

    /// Stereo indicator, STATUSRSSI bit 8
    pub fn stereo(&self) -> bool {
        self.status().contains(Status::STEREO)
    }

    /// Raw tuned channel, READCHAN bits 9:0
    pub fn read_channel(&self) -> u16 {
        self.field(READCHAN, 0, 10)
    }

    /// The four RDS blocks A..D as presented by the last read
    pub fn rds_blocks(&self) -> [u16; 4] {
        [
            self.word(RDSA),
            self.word(RDSB),
            self.word(RDSC),
            self.word(RDSD),
        ]
    }

    /// Part number, DEVICEID bits 15:12
    pub fn part_number(&self) -> u8 {
        self.field(DEVICEID, 12, 4) as u8
    }

    /// Manufacturer id, DEVICEID bits 11:0
    pub fn manufacturer_id(&self) -> u16 {
        self.field(DEVICEID, 0, 12)
    }

    /// Chip revision, CHIPID bits 15:10
    pub fn revision(&self) -> u8 {
        self.field(CHIPID, 10, 6) as u8
    }

    /// Device variant, CHIPID bits 9:6 (0b0001 = Si4703 powered up)
    pub fn device(&self) -> u8 {
        self.field(CHIPID, 6, 4) as u8
    }

    /// Firmware version, CHIPID bits 5:0
    pub fn firmware(&self) -> u8 {
        self.field(CHIPID, 0, 6) as u8
    }

    /// Output volume, SYSCONFIG2 bits 3:0
    pub fn volume(&self) -> u8 {
        self.field(SYSCONFIG2, 0, 4) as u8
    }

    /// Mute disabled, POWERCFG bit 14
    pub fn mute_disabled(&self) -> bool {
        self.flag(POWERCFG, DMUTE)
    }

    /// Softmute disabled, POWERCFG bit 15
    pub fn softmute_disabled(&self) -> bool {
        self.flag(POWERCFG, DSMUTE)
    }

    /// Chip enabled, POWERCFG bit 0
    pub fn enabled(&self) -> bool {
        self.flag(POWERCFG, ENABLE)
    }

    /// Seek in progress, POWERCFG bit 8
    pub fn seeking(&self) -> bool {
        self.flag(POWERCFG, SEEK)
    }

    /// Tune in progress, CHANNEL bit 15
    pub fn tuning(&self) -> bool {
        self.flag(CHANNEL, TUNE)
    }

    /// RDS enabled, SYSCONFIG1 bit 12
    pub fn rds_enabled(&self) -> bool {
        self.flag(SYSCONFIG1, RDS)
    }

    /// 50 µs de-emphasis selected, SYSCONFIG1 bit 11
    pub fn de_emphasis_50us(&self) -> bool {
        self.flag(SYSCONFIG1, DE)
    }

    /// Hex dump of all registers in address order
    pub fn hex_dump(&self) -> String {
        let bytes: Vec<u8> = self.words.iter().flat_map(|w| w.to_be_bytes()).collect();
        hex::encode_upper(bytes)
    }
}

/// A register image obtained from a successful bulk read.
///
/// There is no public constructor: the only way to get one is
/// [`crate::radio::transport::RegisterTransport::read_all`], and the only way
/// to write registers is to hand a snapshot back to
/// [`crate::radio::transport::RegisterTransport::update_registers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSnapshot {
    image: RegisterImage,
}

impl RegisterSnapshot {
    pub(crate) fn from_image(image: RegisterImage) -> Self {
        Self { image }
    }

    /// Registers as read (plus any local edits)
    pub fn image(&self) -> &RegisterImage {
        &self.image
    }

    fn set_field(&mut self, addr: u8, shift: u16, width: u16, value: u16) {
        let m = mask(width) << shift;
        let word = &mut self.image.words[addr as usize % REGISTER_COUNT];
        *word = (*word & !m) | ((value << shift) & m);
    }

    fn set_flag(&mut self, addr: u8, bit: u16, on: bool) {
        self.set_field(addr, bit, 1, u16::from(on));
    }

    /// Overwrite a whole register
    pub fn set_word(&mut self, addr: u8, value: u16) {
        self.set_field(addr, 0, 16, value);
    }

    /// POWERCFG DSMUTE: `true` disables softmute
    pub fn set_softmute_disabled(&mut self, disabled: bool) {
        self.set_flag(POWERCFG, DSMUTE, disabled);
    }

    /// POWERCFG DMUTE: `true` disables mute (audio on)
    pub fn set_mute_disabled(&mut self, disabled: bool) {
        self.set_flag(POWERCFG, DMUTE, disabled);
    }

    /// POWERCFG SKMODE: `true` stops seeking at the band limit, `false` wraps
    pub fn set_seek_stop_at_limit(&mut self, stop: bool) {
        self.set_flag(POWERCFG, SKMODE, stop);
    }

    /// POWERCFG SEEKUP
    pub fn set_seek_up(&mut self, up: bool) {
        self.set_flag(POWERCFG, SEEKUP, up);
    }

    /// POWERCFG SEEK
    pub fn set_seek(&mut self, seek: bool) {
        self.set_flag(POWERCFG, SEEK, seek);
    }

    /// POWERCFG ENABLE
    pub fn set_enable(&mut self, enable: bool) {
        self.set_flag(POWERCFG, ENABLE, enable);
    }

    /// CHANNEL TUNE
    pub fn set_tune(&mut self, tune: bool) {
        self.set_flag(CHANNEL, TUNE, tune);
    }

    /// CHANNEL CHAN (raw 10-bit channel)
    pub fn set_channel_raw(&mut self, raw: u16) {
        self.set_field(CHANNEL, 0, 10, raw);
    }

    /// SYSCONFIG1 RDS
    pub fn set_rds_enabled(&mut self, enabled: bool) {
        self.set_flag(SYSCONFIG1, RDS, enabled);
    }

    /// SYSCONFIG1 DE: `true` selects 50 µs de-emphasis
    pub fn set_de_emphasis_50us(&mut self, on: bool) {
        self.set_flag(SYSCONFIG1, DE, on);
    }

    /// SYSCONFIG1 RDSIEN and GPIO2 = 01 (interrupt output)
    pub fn set_rds_interrupt(&mut self, enabled: bool) {
        self.set_flag(SYSCONFIG1, RDSIEN, enabled);
        self.set_field(SYSCONFIG1, 2, 2, if enabled { 0b01 } else { 0b00 });
    }

    /// SYSCONFIG2 SEEKTH
    pub fn set_seek_threshold(&mut self, threshold: u8) {
        self.set_field(SYSCONFIG2, 8, 8, u16::from(threshold));
    }

    /// SYSCONFIG2 BAND
    pub fn set_band_bits(&mut self, bits: u16) {
        self.set_field(SYSCONFIG2, 6, 2, bits);
    }

    /// SYSCONFIG2 SPACE
    pub fn set_spacing_bits(&mut self, bits: u16) {
        self.set_field(SYSCONFIG2, 4, 2, bits);
    }

    /// SYSCONFIG2 VOLUME (clamped to 4 bits)
    pub fn set_volume(&mut self, volume: u8) {
        self.set_field(SYSCONFIG2, 0, 4, u16::from(volume.min(MAX_VOLUME)));
    }
}
