//! Integration tests for RDS station name and radiotext decoding.

use si4703_rs::{GroupKind, GroupVersion, Pull, RdsDecoder, RdsGroup};

const PI: u16 = 0xC201;

fn ps_group(segment: u16, chars: &[u8]) -> RdsGroup {
    RdsGroup::new(PI, segment & 0x03, 0xE0CD, u16::from_be_bytes([chars[0], chars[1]]))
}

fn rt_a_group(segment: u16, ab: bool, chars: &[u8]) -> RdsGroup {
    let b = 0x2000 | (if ab { 0x0010 } else { 0 }) | (segment & 0x0F);
    RdsGroup::new(
        PI,
        b,
        u16::from_be_bytes([chars[0], chars[1]]),
        u16::from_be_bytes([chars[2], chars[3]]),
    )
}

fn rt_b_group(segment: u16, ab: bool, chars: &[u8]) -> RdsGroup {
    let b = 0x2800 | (if ab { 0x0010 } else { 0 }) | (segment & 0x0F);
    RdsGroup::new(PI, b, PI, u16::from_be_bytes([chars[0], chars[1]]))
}

/// Tests the classic group 0 sequence delivering "ABCDEFGH".
#[test]
fn test_station_name_in_order() {
    let mut decoder = RdsDecoder::new();
    for (segment, chars) in [b"AB", b"CD", b"EF", b"GH"].iter().enumerate() {
        assert!(decoder.station_name().is_pending());
        decoder.decode(ps_group(segment as u16, *chars));
    }
    assert_eq!(decoder.station_name(), Pull::Ready("ABCDEFGH".to_string()));
    assert_eq!(decoder.station_name(), Pull::Pending);
    assert_eq!(decoder.last_pi(), Some(PI));
}

/// Tests that a repeated segment overwrites its characters without completing the name.
#[test]
fn test_station_name_repeat_segment_overwrites() {
    let mut decoder = RdsDecoder::new();
    decoder.decode(ps_group(0, b"XX"));
    decoder.decode(ps_group(0, b"R1"));
    assert!(decoder.station_name().is_pending());
    decoder.decode(ps_group(1, b" R"));
    decoder.decode(ps_group(2, b"AD"));
    decoder.decode(ps_group(3, b"IO"));
    assert_eq!(decoder.station_name().ready().as_deref(), Some("R1 RADIO"));
}

/// Tests that station name bytes above 0x7F map one byte per character.
#[test]
fn test_station_name_latin1_bytes() {
    let mut decoder = RdsDecoder::new();
    decoder.decode(ps_group(0, &[b'C', 0xE9]));
    decoder.decode(ps_group(1, b"  "));
    decoder.decode(ps_group(2, b"  "));
    decoder.decode(ps_group(3, b"  "));
    assert_eq!(decoder.station_name(), Pull::Ready("Cé      ".to_string()));
}

/// Tests a version A radiotext ended by a carriage return.
#[test]
fn test_radio_text_version_a_terminated() {
    let mut decoder = RdsDecoder::new();
    decoder.decode(rt_a_group(0, false, b"NOW "));
    assert!(decoder.radio_text().is_pending());
    decoder.decode(rt_a_group(1, false, b"PLAY"));
    decoder.decode(rt_a_group(2, false, b"ING\r"));
    assert_eq!(decoder.radio_text(), Pull::Ready("NOW PLAYING".to_string()));
    assert_eq!(decoder.radio_text(), Pull::Pending);
    assert_eq!(decoder.stats().texts_completed, 1);
}

/// Tests a version B radiotext, two characters per segment.
#[test]
fn test_radio_text_version_b_terminated() {
    let mut decoder = RdsDecoder::new();
    decoder.decode(rt_b_group(0, false, b"HI"));
    decoder.decode(rt_b_group(1, false, b" !"));
    decoder.decode(rt_b_group(2, false, b"\r "));
    assert_eq!(decoder.radio_text(), Pull::Ready("HI !".to_string()));
}

/// Tests that the earliest carriage return defines the message length.
#[test]
fn test_radio_text_earliest_terminator_wins() {
    let mut decoder = RdsDecoder::new();
    decoder.decode(rt_a_group(1, false, b"AB\rC"));
    decoder.decode(rt_a_group(0, false, b"HI\r "));
    assert_eq!(decoder.radio_text(), Pull::Ready("HI".to_string()));
}

/// Tests that all sixteen version A segments without a terminator yield 64 characters.
#[test]
fn test_radio_text_full_version_a() {
    let mut decoder = RdsDecoder::new();
    let text: Vec<u8> = (0..64u8).map(|i| b'A' + i % 26).collect();
    for (segment, chunk) in text.chunks(4).enumerate() {
        decoder.decode(rt_a_group(segment as u16, true, chunk));
    }
    let expected: String = text.iter().map(|&b| char::from(b)).collect();
    assert_eq!(decoder.radio_text(), Pull::Ready(expected));
}

/// Tests that all sixteen version B segments without a terminator yield 32 characters.
#[test]
fn test_radio_text_full_version_b() {
    let mut decoder = RdsDecoder::new();
    for segment in 0..16u16 {
        decoder.decode(rt_b_group(segment, false, b"xy"));
    }
    assert_eq!(decoder.radio_text(), Pull::Ready("xy".repeat(16)));
}

/// Tests that flipping the text A/B flag discards the previous message.
#[test]
fn test_radio_text_ab_flag_clears() {
    let mut decoder = RdsDecoder::new();
    decoder.decode(rt_a_group(0, false, b"OLD "));
    decoder.decode(rt_a_group(1, false, b"TEXT"));
    decoder.decode(rt_a_group(0, true, b"NEW\r"));

    assert_eq!(decoder.stats().text_resets, 1);
    assert_eq!(decoder.radio_text(), Pull::Ready("NEW".to_string()));
}

/// Tests that a new message needs fresh fragments after a pull.
#[test]
fn test_radio_text_next_message_after_pull() {
    let mut decoder = RdsDecoder::new();
    decoder.decode(rt_a_group(0, false, b"HELL"));
    decoder.decode(rt_a_group(1, false, b"O\r  "));
    assert_eq!(decoder.radio_text(), Pull::Ready("HELLO".to_string()));

    decoder.decode(rt_a_group(0, false, b"JELL"));
    assert!(decoder.radio_text().is_pending());
    decoder.decode(rt_a_group(1, false, b"O\r  "));
    assert_eq!(decoder.radio_text(), Pull::Ready("JELLO".to_string()));
}

/// Tests that groups other than 0 and 2 leave both buffers untouched.
#[test]
fn test_other_groups_ignored() {
    let mut decoder = RdsDecoder::new();
    let clock_time = RdsGroup::new(PI, 0x4000, 0x1234, 0x5678);
    assert_eq!(
        clock_time.kind(),
        GroupKind::Other {
            group_type: 4,
            version: GroupVersion::A
        }
    );
    decoder.decode(clock_time);

    let stats = decoder.stats();
    assert_eq!(stats.groups, 1);
    assert_eq!(stats.ignored_groups, 1);
    assert_eq!(decoder.station_name_buffer().segments(), 0);
    assert!(decoder.station_name().is_pending());
    assert!(decoder.radio_text().is_pending());
}

/// Property-based tests for the decoder state machines
#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_station_name_completes_in_any_order(
            order in Just(vec![0u16, 1, 2, 3]).prop_shuffle(),
            name in proptest::collection::vec(0x20u8..=0x7E, 8),
        ) {
            let mut decoder = RdsDecoder::new();
            for (i, &segment) in order.iter().enumerate() {
                prop_assert!(decoder.station_name().is_pending());
                let pos = usize::from(segment) * 2;
                decoder.decode(ps_group(segment, &name[pos..pos + 2]));
                prop_assert_eq!(decoder.station_name_buffer().is_ready(), i == 3);
            }
            let expected: String = name.iter().map(|&b| char::from(b)).collect();
            prop_assert_eq!(decoder.station_name(), Pull::Ready(expected));
            prop_assert!(decoder.station_name().is_pending());
        }

        #[test]
        fn prop_radio_text_stops_at_terminator(
            text in proptest::collection::vec(0x20u8..=0x7E, 0..63usize),
        ) {
            let mut message = text.clone();
            message.push(b'\r');
            while message.len() % 4 != 0 {
                message.push(b' ');
            }

            let mut decoder = RdsDecoder::new();
            for (segment, chunk) in message.chunks(4).enumerate() {
                decoder.decode(rt_a_group(segment as u16, false, chunk));
            }
            let expected: String = text.iter().map(|&b| char::from(b)).collect();
            prop_assert_eq!(decoder.radio_text(), Pull::Ready(expected));
        }

        #[test]
        fn prop_arbitrary_groups_keep_counts_consistent(
            groups in proptest::collection::vec(any::<[u16; 4]>(), 0..200),
        ) {
            let mut decoder = RdsDecoder::new();
            for blocks in &groups {
                decoder.decode(RdsGroup::from(*blocks));
            }
            let stats = decoder.stats();
            prop_assert_eq!(stats.groups, groups.len() as u64);
            prop_assert_eq!(
                stats.station_name_groups + stats.radio_text_groups + stats.ignored_groups,
                stats.groups
            );
            if let Pull::Ready(text) = decoder.radio_text() {
                prop_assert!(text.chars().count() <= 64);
            }
            if let Pull::Ready(name) = decoder.station_name() {
                prop_assert_eq!(name.chars().count(), 8);
            }
        }
    }
}
