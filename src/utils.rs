use crate::error::Error;
use std::str;

/// A function that takes a hexadecimal representation of bytes
/// back into a stream of bytes. Accepts an optional `0x` prefix.
pub fn hex_str_to_bytes(s: &str) -> Result<Vec<u8>, Error> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    s.as_bytes()
        .chunks(2)
        .map(|ch| {
            str::from_utf8(ch)
                .map_err(Error::InvalidUtf8)
                .and_then(|res| u8::from_str_radix(res, 16).map_err(Error::InvalidHex))
        })
        .collect()
}

pub fn bytes_to_hex_str(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[test]
fn decode_bytes() {
    assert_eq!(
        hex_str_to_bytes("deadbeef").expect("Unable to decode"),
        [222, 173, 190, 239]
    );
}

#[test]
fn decode_prefixed_bytes() {
    assert_eq!(hex_str_to_bytes("0xdeadbeef").unwrap(), [222, 173, 190, 239]);
}

#[test]
fn decode_odd_amount_of_bytes() {
    assert_eq!(hex_str_to_bytes("f").unwrap(), vec![15]);
}

#[test]
fn bytes_raises_decode_error() {
    let e = hex_str_to_bytes("\u{012345}deadbeef").unwrap_err();
    assert!(matches!(e, Error::InvalidUtf8(_)));
}

#[test]
fn bytes_raises_parse_error() {
    let e = hex_str_to_bytes("Lorem ipsum").unwrap_err();
    assert!(matches!(e, Error::InvalidHex(_)));
}

#[test]
fn encode_bytes() {
    assert_eq!(bytes_to_hex_str(&[0xf]), "0f".to_owned());
    assert_eq!(bytes_to_hex_str(&[0xff]), "ff".to_owned());
    assert_eq!(bytes_to_hex_str(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef".to_owned());
}
