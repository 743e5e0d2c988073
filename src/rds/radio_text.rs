//! Radiotext assembly from group 2 fragments.
//!
//! Version A groups carry four characters (blocks C and D) per segment and
//! address up to 64 characters; version B groups carry two (block D) and
//! address up to 32. A message is complete when a carriage return is
//! written or every segment of the capacity has arrived. A change of the
//! text A/B flag starts a new message.

use crate::constants::{RADIO_TEXT_LEN, RADIO_TEXT_TERMINATOR};
use crate::rds::group::GroupVersion;
use crate::rds::{decode_chars, Pull};

const SEGMENT_COUNT: usize = 16;
const ALL_SEGMENTS: u16 = 0xFFFF;

/// Result of applying one fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextUpdate {
    /// The A/B flag changed and the previous message was discarded
    pub reset: bool,
    /// This fragment completed the message
    pub completed: bool,
}

/// Up to 64 characters of radiotext with its availability state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioTextBuffer {
    chars: [u8; RADIO_TEXT_LEN],
    /// Bit n set once segment n arrived for the current message
    segments: u16,
    /// Characters per segment of the most recent fragment (4 or 2)
    segment_width: usize,
    /// Last observed A/B flag
    text_ab: Option<bool>,
    /// Lowest position holding a terminator
    terminator: Option<usize>,
    /// Number of characters handed out on the next pull, once ready
    ready_len: Option<usize>,
}

impl Default for RadioTextBuffer {
    fn default() -> Self {
        Self {
            chars: [b' '; RADIO_TEXT_LEN],
            segments: 0,
            segment_width: 4,
            text_ab: None,
            terminator: None,
            ready_len: None,
        }
    }
}

impl RadioTextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the characters of one group 2 fragment.
    ///
    /// `chars` holds four characters for version A (C hi, C lo, D hi, D lo)
    /// or two for version B (D hi, D lo).
    pub fn apply(&mut self, segment: u8, text_ab: bool, version: GroupVersion, chars: &[u8]) -> TextUpdate {
        let reset = matches!(self.text_ab, Some(prev) if prev != text_ab);
        if reset {
            self.clear();
        }
        self.text_ab = Some(text_ab);

        let width = match version {
            GroupVersion::A => 4,
            GroupVersion::B => 2,
        };
        self.segment_width = width;

        let segment = usize::from(segment) % SEGMENT_COUNT;
        let base = segment * width;
        for (i, &c) in chars.iter().take(width).enumerate() {
            let pos = base + i;
            self.chars[pos] = c;
            if c == RADIO_TEXT_TERMINATOR {
                self.terminator = Some(self.terminator.map_or(pos, |t| t.min(pos)));
            }
        }
        self.segments |= 1 << segment;

        let was_ready = self.ready_len.is_some();
        if let Some(end) = self.terminator {
            self.ready_len = Some(end);
        } else if self.segments == ALL_SEGMENTS {
            self.ready_len = Some(self.capacity());
        }

        TextUpdate {
            reset,
            completed: !was_ready && self.ready_len.is_some(),
        }
    }

    /// Characters addressable with the current group version
    pub fn capacity(&self) -> usize {
        SEGMENT_COUNT * self.segment_width
    }

    pub fn is_ready(&self) -> bool {
        self.ready_len.is_some()
    }

    /// Hand out a complete message once; `Pending` leaves the buffer untouched
    pub fn pull(&mut self) -> Pull<String> {
        let Some(len) = self.ready_len else {
            return Pull::Pending;
        };
        let text = decode_chars(&self.chars[..len]);
        self.segments = 0;
        self.terminator = None;
        self.ready_len = None;
        Pull::Ready(text)
    }

    fn clear(&mut self) {
        self.chars = [b' '; RADIO_TEXT_LEN];
        self.segments = 0;
        self.terminator = None;
        self.ready_len = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_completes_message() {
        let mut text = RadioTextBuffer::new();
        text.apply(0, false, GroupVersion::A, b"HELL");
        let update = text.apply(1, false, GroupVersion::A, b"O\r  ");
        assert!(update.completed);
        assert_eq!(text.pull(), Pull::Ready("HELLO".to_string()));
        assert_eq!(text.pull(), Pull::Pending);
    }

    #[test]
    fn test_version_b_two_chars_per_segment() {
        let mut text = RadioTextBuffer::new();
        text.apply(0, false, GroupVersion::B, b"HE");
        text.apply(1, false, GroupVersion::B, b"LL");
        text.apply(2, false, GroupVersion::B, b"O\r");
        assert_eq!(text.pull(), Pull::Ready("HELLO".to_string()));
    }

    #[test]
    fn test_full_capacity_without_terminator() {
        let mut text = RadioTextBuffer::new();
        for seg in 0..16u8 {
            let c = b'A' + seg;
            let update = text.apply(seg, false, GroupVersion::A, &[c, c, c, c]);
            assert_eq!(update.completed, seg == 15);
        }
        match text.pull() {
            Pull::Ready(s) => {
                assert_eq!(s.len(), RADIO_TEXT_LEN);
                assert!(s.starts_with("AAAABBBB"));
                assert!(s.ends_with("PPPP"));
            }
            Pull::Pending => panic!("expected a complete message"),
        }
    }

    #[test]
    fn test_ab_flag_toggle_discards_previous_message() {
        let mut text = RadioTextBuffer::new();
        text.apply(0, false, GroupVersion::A, b"OLDM");
        text.apply(1, false, GroupVersion::A, b"ESSA");
        let update = text.apply(0, true, GroupVersion::A, b"NEW\r");
        assert!(update.reset);
        assert_eq!(text.pull(), Pull::Ready("NEW".to_string()));
    }

    #[test]
    fn test_pending_pull_has_no_side_effect() {
        let mut text = RadioTextBuffer::new();
        text.apply(3, false, GroupVersion::A, b"ABCD");
        let before = text.clone();
        assert_eq!(text.pull(), Pull::Pending);
        assert_eq!(text, before);
    }

    #[test]
    fn test_earliest_terminator_wins() {
        let mut text = RadioTextBuffer::new();
        text.apply(2, false, GroupVersion::A, b"AB\rC");
        text.apply(0, false, GroupVersion::A, b"X\rYZ");
        assert_eq!(text.pull(), Pull::Ready("X".to_string()));
    }
}
