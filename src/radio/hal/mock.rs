//! Mock Si4703 implementation for testing
//!
//! This module provides a register-level simulation of the Si4703 that can be
//! used to exercise the driver without hardware. It honours the chip's bus
//! geometry (reads start at 0x0A and wrap, writes start at 0x02), completes
//! seek and tune operations after a configurable number of status polls, and
//! replays queued RDS groups one per read.

use crate::constants::*;
use crate::radio::hal::{Hal, HalError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const STC: u16 = 1 << 14;
const SFBL: u16 = 1 << 13;
const RDSR: u16 = 1 << 15;
const STEREO: u16 = 1 << 8;
const TUNE: u16 = 1 << 15;
const SEEK: u16 = 1 << 8;

/// Shared state behind a [`MockSi4703`] handle
#[derive(Debug)]
pub struct MockState {
    /// Register file indexed by address
    pub registers: [u16; REGISTER_COUNT],
    /// Every successful write, as (first register, words)
    pub writes: Vec<(u8, Vec<u16>)>,
    /// Number of write attempts, successful or not
    pub write_attempts: u32,
    /// Number of reads performed
    pub reads: u32,
    /// Delays requested by the driver
    pub delays: Vec<u32>,
    /// Fail this many upcoming writes with a NACK
    pub failing_writes: u32,
    /// Fail this many upcoming reads with a NACK
    pub failing_reads: u32,
    /// Reads after a seek/tune starts before STC is raised
    pub stc_after_polls: u32,
    /// Never raise STC (simulates a hung tuner)
    pub stc_stuck: bool,
    /// READCHAN value reported when a seek completes
    pub seek_target: u16,
    /// Raise SF/BL when a seek completes
    pub seek_band_limit: bool,
    /// RDS groups delivered one per read
    pub rds_queue: VecDeque<[u16; 4]>,
    /// Simulate a wired GPIO2 interrupt line
    pub rds_interrupt_line: bool,
    /// Interrupt line queries answered so far
    pub interrupt_checks: u32,
    pending_polls: Option<u32>,
    pending_sfbl: bool,
}

impl Default for MockState {
    fn default() -> Self {
        let mut registers = [0u16; REGISTER_COUNT];
        registers[DEVICEID as usize] = 0x1242;
        registers[CHIPID as usize] = 0x1253;
        Self {
            registers,
            writes: Vec::new(),
            write_attempts: 0,
            reads: 0,
            delays: Vec::new(),
            failing_writes: 0,
            failing_reads: 0,
            stc_after_polls: 1,
            stc_stuck: false,
            seek_target: 0,
            seek_band_limit: false,
            rds_queue: VecDeque::new(),
            rds_interrupt_line: false,
            interrupt_checks: 0,
            pending_polls: None,
            pending_sfbl: false,
        }
    }
}

/// Mock Si4703 that simulates register-level behaviour
#[derive(Clone, Default)]
pub struct MockSi4703 {
    state: Arc<Mutex<MockState>>,
}

impl MockSi4703 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a closure against the shared state
    pub fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Current value of a register
    pub fn register(&self, addr: u8) -> u16 {
        self.with_state(|s| s.registers[addr as usize])
    }

    /// Overwrite a register as if the chip had changed it
    pub fn set_register(&self, addr: u8, value: u16) {
        self.with_state(|s| s.registers[addr as usize] = value);
    }

    /// Set the RSSI and stereo indicator in STATUSRSSI
    pub fn set_signal(&self, rssi: u8, stereo: bool) {
        self.with_state(|s| {
            let status = &mut s.registers[STATUSRSSI as usize];
            *status = (*status & !(0x00FF | STEREO)) | u16::from(rssi);
            if stereo {
                *status |= STEREO;
            }
        });
    }

    /// Queue an RDS group to be presented on a subsequent read
    pub fn queue_rds_group(&self, group: [u16; 4]) {
        self.with_state(|s| s.rds_queue.push_back(group));
    }

    /// Wire (or unwire) the GPIO2 interrupt line; it fires while RDS groups are queued
    pub fn set_rds_interrupt_line(&self, wired: bool) {
        self.with_state(|s| s.rds_interrupt_line = wired);
    }

    pub fn interrupt_checks(&self) -> u32 {
        self.with_state(|s| s.interrupt_checks)
    }

    /// Fail the next `count` writes
    pub fn fail_next_writes(&self, count: u32) {
        self.with_state(|s| s.failing_writes = count);
    }

    /// Fail the next `count` reads
    pub fn fail_next_reads(&self, count: u32) {
        self.with_state(|s| s.failing_reads = count);
    }

    /// Configure the outcome of the next seek
    pub fn set_seek_result(&self, read_channel: u16, band_limit: bool) {
        self.with_state(|s| {
            s.seek_target = read_channel;
            s.seek_band_limit = band_limit;
        });
    }

    /// Reads after a seek/tune starts before STC is raised
    pub fn set_stc_after_polls(&self, polls: u32) {
        self.with_state(|s| s.stc_after_polls = polls);
    }

    /// Keep STC low forever
    pub fn set_stc_stuck(&self, stuck: bool) {
        self.with_state(|s| s.stc_stuck = stuck);
    }

    /// Successful writes recorded so far
    pub fn writes(&self) -> Vec<(u8, Vec<u16>)> {
        self.with_state(|s| s.writes.clone())
    }

    pub fn write_attempts(&self) -> u32 {
        self.with_state(|s| s.write_attempts)
    }

    pub fn reads(&self) -> u32 {
        self.with_state(|s| s.reads)
    }

    pub fn delays(&self) -> Vec<u32> {
        self.with_state(|s| s.delays.clone())
    }
}

impl MockState {
    fn advance_on_read(&mut self) {
        if let Some(remaining) = self.pending_polls {
            if !self.stc_stuck {
                if remaining <= 1 {
                    self.pending_polls = None;
                    let status = &mut self.registers[STATUSRSSI as usize];
                    *status |= STC;
                    if self.pending_sfbl {
                        *status |= SFBL;
                    }
                } else {
                    self.pending_polls = Some(remaining - 1);
                }
            }
        }

        match self.rds_queue.pop_front() {
            Some(group) => {
                self.registers[STATUSRSSI as usize] |= RDSR;
                self.registers[RDSA as usize..=RDSD as usize].copy_from_slice(&group);
            }
            None => self.registers[STATUSRSSI as usize] &= !RDSR,
        }
    }

    fn apply_write(&mut self) {
        let channel = self.registers[CHANNEL as usize];
        let power = self.registers[POWERCFG as usize];
        let tuning = channel & TUNE != 0;
        let seeking = power & SEEK != 0;

        if tuning || seeking {
            if self.pending_polls.is_none()
                && self.registers[STATUSRSSI as usize] & STC == 0
            {
                self.pending_polls = Some(self.stc_after_polls.max(1));
                self.pending_sfbl = seeking && self.seek_band_limit;
                let read_channel = if tuning {
                    channel & 0x03FF
                } else {
                    self.seek_target & 0x03FF
                };
                let readchan = &mut self.registers[READCHAN as usize];
                *readchan = (*readchan & !0x03FF) | read_channel;
            }
        } else {
            self.pending_polls = None;
            self.registers[STATUSRSSI as usize] &= !(STC | SFBL);
        }
    }
}

impl Hal for MockSi4703 {
    fn read_words(&mut self, buf: &mut [u16]) -> Result<(), HalError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(HalError::Nack);
        }
        state.reads += 1;
        state.advance_on_read();
        for (i, word) in buf.iter_mut().enumerate() {
            let addr = (READ_START_REGISTER as usize + i) % REGISTER_COUNT;
            *word = state.registers[addr];
        }
        Ok(())
    }

    fn write_words(&mut self, first_register: u8, words: &[u16]) -> Result<(), HalError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.write_attempts += 1;
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(HalError::Nack);
        }
        if first_register != WRITE_START_REGISTER {
            return Err(HalError::InvalidConfig(format!(
                "writes must start at 0x{WRITE_START_REGISTER:02X}, got 0x{first_register:02X}"
            )));
        }
        for (i, word) in words.iter().enumerate() {
            let addr = (first_register as usize + i) % REGISTER_COUNT;
            // Status, channel readback and RDS registers are read-only
            if addr < STATUSRSSI as usize {
                state.registers[addr] = *word;
            }
        }
        state.writes.push((first_register, words.to_vec()));
        state.apply_write();
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).delays.push(ms);
    }

    fn rds_interrupt_pending(&mut self) -> Option<bool> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.rds_interrupt_line {
            return None;
        }
        state.interrupt_checks += 1;
        Some(!state.rds_queue.is_empty())
    }
}
