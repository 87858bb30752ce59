use binac::{decode_bytes, encode_bytes, recover, ArithmeticDecoder, Order0, StaticModel};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_order0_roundtrip(input in prop::collection::vec(any::<u8>(), 0..400)) {
        let stream = encode_bytes(&mut Order0::new(), &input).unwrap();
        let output = decode_bytes(&mut Order0::new(), &stream, input.len());
        prop_assert_eq!(input, output);
    }

    #[test]
    fn test_static_model_roundtrip(
        input in prop::collection::vec(any::<u8>(), 0..200),
        p1 in any::<u16>(),
    ) {
        let stream = encode_bytes(&mut StaticModel(p1), &input).unwrap();
        let output = decode_bytes(&mut StaticModel(p1), &stream, input.len());
        prop_assert_eq!(input, output);
    }

    #[test]
    fn test_truncated_decode_is_deterministic(
        input in prop::collection::vec(any::<u8>(), 1..200),
        cut in any::<prop::sample::Index>(),
    ) {
        let stream = encode_bytes(&mut Order0::new(), &input).unwrap();
        let keep = cut.index(stream.len() + 1);
        let prefix = &stream[..keep];

        let first = decode_bytes(&mut Order0::new(), prefix, input.len());
        let second = decode_bytes(&mut Order0::new(), prefix, input.len());
        prop_assert_eq!(first.len(), input.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_arbitrary_bytes_decode(
        stream in prop::collection::vec(any::<u8>(), 0..64),
        probs in prop::collection::vec(any::<u16>(), 0..512),
    ) {
        let mut decoder = ArithmeticDecoder::new(&stream);
        for p in probs {
            let bit = decoder.decode(p);
            prop_assert!(bit <= 1);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_recovery_returns_removed_byte(input in prop::collection::vec(any::<u8>(), 0..120)) {
        let stream = encode_bytes(&mut Order0::new(), &input).unwrap();
        let (&last, truncated) = stream.split_last().unwrap();
        prop_assert_eq!(recover(truncated, &input, Order0::new), Some(last));
    }
}
