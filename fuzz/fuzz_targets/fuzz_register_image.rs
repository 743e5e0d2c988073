#![no_main]

use libfuzzer_sys::fuzz_target;
use si4703_rs::constants::REGISTER_COUNT;
use si4703_rs::RegisterImage;

fuzz_target!(|data: &[u8]| {
    if data.len() < REGISTER_COUNT * 2 {
        return;
    }

    let mut raw = [0u16; REGISTER_COUNT];
    for (word, pair) in raw.iter_mut().zip(data.chunks_exact(2)) {
        *word = u16::from_be_bytes([pair[0], pair[1]]);
    }

    let image = RegisterImage::from_read_order(&raw);
    assert_eq!(image.word(0x0A), raw[0]);
    assert!(image.volume() <= 15);
    assert!(image.read_channel() <= 0x03FF);
    let _ = image.status();
    let _ = image.hex_dump();
    assert_eq!(image.write_range().len(), 6);
});
