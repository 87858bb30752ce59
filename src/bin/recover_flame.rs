use binac::{encode_bytes, recover, Order0};

fn main() {
    let input = (0..4000).map(|i| (i * 31 % 97) as u8).collect::<Vec<_>>();

    for _ in 0..20 {
        let stream = encode_bytes(&mut Order0::new(), &input).unwrap();
        let (&last, truncated) = stream.split_last().unwrap();
        assert_eq!(recover(truncated, &input, Order0::new), Some(last));
    }
}
