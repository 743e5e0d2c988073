//! # RDS Decoder
//!
//! Reconstructs the programme service name (group 0) and radiotext
//! (group 2) from the RDS groups the Si4703 presents in RDSA..RDSD. Groups
//! arrive one at a time, possibly out of order, repeated or corrupted; the
//! decoder never waits for a particular segment. Each fragment overwrites
//! the position it addresses, and a buffer only becomes available once its
//! structural completion condition holds:
//!
//! - station name: all four 2-character segments received
//! - radiotext: a carriage return written, or every segment received
//!
//! Completed buffers are handed out exactly once through [`Pull`].
//!
//! ## Usage
//!
//! ```rust
//! use si4703_rs::rds::{Pull, RdsDecoder, RdsGroup};
//!
//! let mut decoder = RdsDecoder::new();
//! for (seg, chars) in [(0u16, *b"AB"), (2, *b"EF"), (1, *b"CD"), (3, *b"GH")] {
//!     decoder.decode(RdsGroup::new(0xD3C2, seg, 0, u16::from_be_bytes(chars)));
//! }
//! assert_eq!(decoder.station_name(), Pull::Ready("ABCDEFGH".to_string()));
//! assert_eq!(decoder.station_name(), Pull::Pending);
//! ```

pub mod group;
pub mod radio_text;
pub mod station_name;

pub use group::{GroupKind, GroupVersion, RdsGroup};
pub use radio_text::{RadioTextBuffer, TextUpdate};
pub use station_name::StationNameBuffer;

use log::{debug, info, trace};

/// Outcome of pulling a decoded buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull<T> {
    /// Not complete yet; nothing was consumed
    Pending,
    /// Complete; the buffer has been reset
    Ready(T),
}

impl<T> Pull<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Pull::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Pull::Pending)
    }

    /// Convert into an `Option`, dropping the distinction's name
    pub fn ready(self) -> Option<T> {
        match self {
            Pull::Ready(value) => Some(value),
            Pull::Pending => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Pull<U> {
        match self {
            Pull::Ready(value) => Pull::Ready(f(value)),
            Pull::Pending => Pull::Pending,
        }
    }
}

/// Decoder statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RdsStats {
    /// Groups fed to the decoder
    pub groups: u64,
    /// Group 0 fragments applied
    pub station_name_groups: u64,
    /// Group 2 fragments applied
    pub radio_text_groups: u64,
    /// Groups of other types
    pub ignored_groups: u64,
    /// Radiotext messages discarded by an A/B flag change
    pub text_resets: u64,
    /// Station names completed
    pub names_completed: u64,
    /// Radiotext messages completed
    pub texts_completed: u64,
}

/// RDS station name and radiotext decoder
#[derive(Debug, Clone, Default)]
pub struct RdsDecoder {
    station_name: StationNameBuffer,
    radio_text: RadioTextBuffer,
    last_pi: Option<u16>,
    stats: RdsStats,
}

impl RdsDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one freshly read group
    pub fn decode(&mut self, group: RdsGroup) {
        self.stats.groups += 1;
        if self.last_pi != Some(group.pi()) {
            debug!("RDS programme identification 0x{:04X}", group.pi());
            self.last_pi = Some(group.pi());
        }

        match group.kind() {
            GroupKind::StationName { segment } => {
                self.stats.station_name_groups += 1;
                let chars = group.block_d_chars();
                trace!("PS segment {segment}: {:?}", decode_chars(&chars));
                if self.station_name.apply(segment, chars) {
                    self.stats.names_completed += 1;
                    info!("RDS station name complete");
                }
            }
            GroupKind::RadioText {
                segment,
                text_ab,
                version,
            } => {
                self.stats.radio_text_groups += 1;
                let [c0, c1] = group.block_c_chars();
                let [d0, d1] = group.block_d_chars();
                let update = match version {
                    GroupVersion::A => {
                        self.radio_text.apply(segment, text_ab, version, &[c0, c1, d0, d1])
                    }
                    GroupVersion::B => self.radio_text.apply(segment, text_ab, version, &[d0, d1]),
                };
                trace!("RT segment {segment} (A/B={text_ab}, {version:?})");
                if update.reset {
                    self.stats.text_resets += 1;
                    debug!("RDS radiotext A/B flag changed, starting new message");
                }
                if update.completed {
                    self.stats.texts_completed += 1;
                    info!("RDS radiotext complete");
                }
            }
            GroupKind::Other { group_type, version } => {
                self.stats.ignored_groups += 1;
                trace!("Ignoring RDS group {group_type}{version:?}");
            }
        }
    }

    /// Take the station name if all segments have arrived
    pub fn station_name(&mut self) -> Pull<String> {
        self.station_name.pull()
    }

    /// Take the radiotext if the message is complete
    pub fn radio_text(&mut self) -> Pull<String> {
        self.radio_text.pull()
    }

    /// Programme identification from the most recent group
    pub fn last_pi(&self) -> Option<u16> {
        self.last_pi
    }

    pub fn stats(&self) -> RdsStats {
        self.stats
    }

    pub fn station_name_buffer(&self) -> &StationNameBuffer {
        &self.station_name
    }

    pub fn radio_text_buffer(&self) -> &RadioTextBuffer {
        &self.radio_text
    }
}

/// Render RDS characters one byte per `char` (Latin-1 mapping)
pub(crate) fn decode_chars(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
