#![no_main]

use libfuzzer_sys::fuzz_target;
use md5::{Digest, Md5};
use md5arena::{CancelSignal, Engine, digest_read, read_blocks};

fuzz_target!(|input: (Vec<u8>, u16)| {
    let (data, chunk_size) = input;
    let chunk_size = usize::from(chunk_size);
    let expected = Md5::digest(&data);

    // Verify: chunks are block aligned and cover the input
    let chunks: Vec<_> = read_blocks(std::io::Cursor::new(&data), chunk_size)
        .collect::<std::io::Result<_>>()
        .unwrap();
    for chunk in chunks.iter().rev().skip(1) {
        assert_eq!(chunk.len() % 64, 0);
    }
    assert_eq!(chunks.concat(), data);

    // Verify: digest matches the reference
    let mut engine = Engine::new().unwrap();
    let view = digest_read(std::io::Cursor::new(&data), &mut engine, &CancelSignal::new()).unwrap();
    assert_eq!(view.as_bytes()[..], expected[..]);
});
