use crate::error::Error;
use crate::utils::{bytes_to_hex_str, hex_str_to_bytes};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Representation of an Ethereum address, exactly 20 bytes.
///
/// An address is usually parsed from its textual representation, or
/// taken from the low 20 bytes of a hash.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct Address([u8; 20]);

impl Address {
    /// Creates an `Address` from a slice, which must be exactly
    /// 20 bytes long.
    pub fn from_slice(data: &[u8]) -> Result<Address, Error> {
        if data.len() != 20 {
            return Err(Error::InvalidAddressLength {
                got: data.len(),
                expected: 20,
            });
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(data);
        Ok(Address(bytes))
    }

    /// Get raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(val: [u8; 20]) -> Address {
        Address(val)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", bytes_to_hex_str(&self.0))
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", bytes_to_hex_str(&self.0))
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", bytes_to_hex_str(&self.0).to_uppercase())
    }
}

impl FromStr for Address {
    type Err = Error;

    /// Parses a string into a valid Ethereum address, either `0x`
    /// prefixed or a bare run of 40 hexadecimal characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 40 {
            return Err(Error::InvalidAddressLength {
                got: s.len() / 2,
                expected: 20,
            });
        }
        Address::from_slice(&hex_str_to_bytes(s)?)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[test]
fn decode() {
    let address: Address = "1234567890123456789012345678901234567890".parse().unwrap();

    assert_eq!(
        address,
        Address::from([
            0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78,
            0x90, 0x12, 0x34, 0x56, 0x78, 0x90
        ])
    );
}

#[test]
fn decode_invalid_length() {
    assert!("123".parse::<Address>().is_err());
    assert!("0b9331677e6ebf".parse::<Address>().is_err());
}

#[test]
fn decode_invalid_character() {
    assert!("\u{012345}123456789012345678901234567890123456"
        .parse::<Address>()
        .is_err());
}

#[test]
fn handle_prefixed() {
    let address: Address = "0x000000000000000000000000000b9331677e6ebf".parse().unwrap();
    assert_eq!(
        address,
        Address::from([
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x0b, 0x93, 0x31, 0x67, 0x7e, 0x6e, 0xbf
        ])
    );
}

#[test]
fn to_hex() {
    let address: Address = "1234567890123456789ABCDEF678901234567890".parse().unwrap();

    assert_eq!(format!("{address:x}"), "1234567890123456789abcdef678901234567890");
    assert_eq!(
        format!("{address:#x}"),
        "0x1234567890123456789abcdef678901234567890"
    );
    assert_eq!(
        format!("{address:#X}"),
        "0x1234567890123456789ABCDEF678901234567890"
    );
    assert_eq!(
        address.to_string(),
        "0x1234567890123456789abcdef678901234567890"
    );
}

#[test]
fn ordered() {
    let a: Address = "0x000000000000000000000000000000000000000a".parse().unwrap();
    let b: Address = "0x000000000000000000000000000000000000000b".parse().unwrap();
    let c: Address = "0x000000000000000000000000000000000000000c".parse().unwrap();
    assert!(c > b);
    assert!(b > a);
    assert_ne!(a, b);
    assert_ne!(b, c);
}

#[test]
fn hashed() {
    // One of the use cases for Address could be a key in a HashMap to store some
    // additional values per address.
    use std::collections::HashMap;
    let a: Address = "0x000000000000000000000000000b9331677e6ebf".parse().unwrap();
    let b: Address = "0x00000000000000000000000000000000deadbeef".parse().unwrap();
    let mut map = HashMap::new();
    map.insert(a, "Foo");
    map.insert(b, "Bar");

    assert_eq!(map.get(&a).unwrap(), &"Foo");
    assert_eq!(map.get(&b).unwrap(), &"Bar");
}

#[test]
fn serialize_round_trip() {
    let address: Address = "0x000000000000000000000000000b9331677e6ebf".parse().unwrap();
    let encoded = serde_json::to_string(&address).unwrap();
    assert_eq!(encoded, "\"0x000000000000000000000000000b9331677e6ebf\"");
    let decoded: Address = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, address);
}
