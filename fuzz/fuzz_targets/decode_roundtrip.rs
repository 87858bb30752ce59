#![no_main]
use binac::{decode_bytes, encode_bytes, Order0, StaticModel};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, u16)| {
    let (input, p1) = data;

    // Arbitrary bytes are a valid (if meaningless) stream.
    let garbage = decode_bytes(&mut StaticModel(p1), &input, input.len());
    assert_eq!(garbage.len(), input.len());

    let stream = match encode_bytes(&mut Order0::new(), &input) {
        Ok(stream) => stream,
        Err(_) => return,
    };
    let output = decode_bytes(&mut Order0::new(), &stream, input.len());
    assert_eq!(input, output);
});
