#![no_main]

use libfuzzer_sys::fuzz_target;
use md5::{Digest, Md5};
use md5arena::{CancelSignal, Engine, EngineConfig, digest_blocking};

fuzz_target!(|input: (Vec<u8>, Vec<u8>)| {
    let (data, splits) = input;
    let expected = Md5::digest(&data);

    // Block counts per chunk come from the second half of the input
    let mut chunks = Vec::new();
    let mut rest = &data[..];
    for &blocks in &splits {
        let take = (usize::from(blocks) * 64).min(rest.len() - rest.len() % 64);
        let (head, tail) = rest.split_at(take);
        chunks.push(head);
        rest = tail;
    }
    chunks.push(rest);

    let configs = [
        EngineConfig::default(),
        EngineConfig::new(8, 1, 64).unwrap(),
        EngineConfig::new(1024, 2, 64).unwrap(),
    ];

    for config in configs {
        let mut engine = Engine::with_config(config).unwrap();

        // Verify: digest matches the reference regardless of split
        let view = digest_blocking(&chunks, &mut engine, &CancelSignal::new()).unwrap();
        assert_eq!(view.as_bytes()[..], expected[..]);

        // Verify: reuse gives the same digest
        let again = digest_blocking([&data], &mut engine, &CancelSignal::new()).unwrap();
        assert_eq!(again.as_bytes()[..], expected[..]);
    }
});
