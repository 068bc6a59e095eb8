#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let from_buffer = peversion::decode(data);
    let from_stream = peversion::decode_stream(data);

    // Both back-ends must agree whenever the buffer decodes
    if let Ok(info) = from_buffer {
        if let Ok(streamed) = from_stream {
            assert_eq!(info, streamed);
        }
    }
});
