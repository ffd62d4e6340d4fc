#![no_main]

use arbitrary::Arbitrary;
use bytes::{Buf, Bytes, BytesMut};
use libfuzzer_sys::fuzz_target;
use wirefield::{Field, FieldOptions, PrefixFormat, SequenceField};

#[derive(Arbitrary, Debug)]
struct Input {
    config: u8,
    data: Vec<u8>,
}

fn options(selector: u8) -> FieldOptions {
    match selector % 7 {
        0 => FieldOptions::new(),
        1 => FieldOptions::new().size_prefix(PrefixFormat::Varint),
        2 => FieldOptions::new().size_prefix(PrefixFormat::big(2)),
        3 => FieldOptions::new().length_prefix(PrefixFormat::little(2)),
        4 => FieldOptions::new().terminator(0x00),
        5 => FieldOptions::new().fixed_count(4),
        _ => FieldOptions::new().trailing(&b"\r\n"[..]),
    }
}

// Arbitrary bytes must never panic the read path, and whatever a read
// accepts must re-encode canonically and decode back to the same value.
fuzz_target!(|input: Input| {
    let opts = options(input.config);
    let mut field = SequenceField::<u8>::new(&opts).expect("static configs are valid");

    let mut buf = Bytes::from(input.data);
    if field.read(&mut buf).is_err() {
        return;
    }

    let mut encoded = BytesMut::new();
    field.write(&mut encoded).expect("accepted value must encode");
    assert_eq!(encoded.len(), field.length());

    let mut decoded = SequenceField::<u8>::new(&opts).expect("static configs are valid");
    let mut reread = encoded.freeze();
    decoded
        .read(&mut reread)
        .expect("canonical encoding must decode");
    assert_eq!(reread.remaining(), 0);
    assert_eq!(decoded, field);
});
