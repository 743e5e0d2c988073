#![no_main]

use libfuzzer_sys::fuzz_target;
use si4703_rs::{Pull, RdsDecoder, RdsGroup};

fuzz_target!(|data: &[u8]| {
    let mut decoder = RdsDecoder::new();

    for chunk in data.chunks_exact(8) {
        let word = |i: usize| u16::from_be_bytes([chunk[i], chunk[i + 1]]);
        decoder.decode(RdsGroup::new(word(0), word(2), word(4), word(6)));

        // Pull on every group so the ready/reset paths interleave with writes
        if let Pull::Ready(name) = decoder.station_name() {
            assert_eq!(name.chars().count(), 8);
        }
        if let Pull::Ready(text) = decoder.radio_text() {
            assert!(text.chars().count() <= 64);
        }
    }

    let stats = decoder.stats();
    assert_eq!(
        stats.station_name_groups + stats.radio_text_groups + stats.ignored_groups,
        stats.groups
    );
});
