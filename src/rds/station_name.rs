//! Programme service (station) name assembly from group 0 fragments.

use crate::constants::STATION_NAME_LEN;
use crate::rds::{decode_chars, Pull};

const ALL_SEGMENTS: u8 = 0b1111;

/// 8-character station name plus one completion bit per 2-character segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationNameBuffer {
    chars: [u8; STATION_NAME_LEN],
    segments: u8,
}

impl Default for StationNameBuffer {
    fn default() -> Self {
        Self {
            chars: [b' '; STATION_NAME_LEN],
            segments: 0,
        }
    }
}

impl StationNameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store two characters at segment `segment` (0..=3).
    ///
    /// Differing content is simply overwritten. Returns `true` when this
    /// fragment completed the name.
    pub fn apply(&mut self, segment: u8, chars: [u8; 2]) -> bool {
        let segment = segment & 0x03;
        let was_ready = self.is_ready();
        let pos = usize::from(segment) * 2;
        self.chars[pos..pos + 2].copy_from_slice(&chars);
        self.segments |= 1 << segment;
        !was_ready && self.is_ready()
    }

    /// All four segments have been received since the last pull
    pub fn is_ready(&self) -> bool {
        self.segments == ALL_SEGMENTS
    }

    /// Completion mask, bit n set once segment n arrived
    pub fn segments(&self) -> u8 {
        self.segments
    }

    /// Hand out a complete name once; `Pending` leaves the buffer untouched
    pub fn pull(&mut self) -> Pull<String> {
        if !self.is_ready() {
            return Pull::Pending;
        }
        self.segments = 0;
        Pull::Ready(decode_chars(&self.chars))
    }
}
