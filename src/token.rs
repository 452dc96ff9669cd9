use crate::address::Address;
use num256::{Int256, Uint256};
use num_bigint::{BigInt, BigUint};

/// A token represents a value of one parameter of a contract call.
///
/// Tokens carry the host side shape of a value; the declared [`Type`]
/// tree decides how a token is laid out on the wire. Numbers are kept
/// as arbitrary precision integers so every declared width from `uint8`
/// to `int256` is range checked against the same representation.
///
/// [`Type`]: crate::Type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unsigned integer of any width
    Uint(BigUint),
    /// Signed integer of any width
    Int(BigInt),
    Address(Address),
    Bool(bool),
    /// Represents a string
    String(String),
    /// Dynamic array of bytes
    DynamicBytes(Vec<u8>),
    /// Fixed size array of bytes, also the shape of `function` values
    /// and 32 byte hashes
    FixedBytes(Vec<u8>),
    /// Homogeneous sequence of values, fills both fixed and dynamic
    /// array declarations
    Array(Vec<Token>),
    /// Struct like value with named fields, fills tuple declarations
    Struct(Vec<StructField>),
}

/// One named field of a [`Token::Struct`] value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    /// Optional alias checked against the declared tuple field name
    /// before the field's own name is considered. A field carrying an
    /// alias never matches by its own name.
    pub abi: Option<String>,
    pub value: Token,
}

impl StructField {
    pub fn new(name: &str, value: Token) -> StructField {
        StructField {
            name: name.to_string(),
            abi: None,
            value,
        }
    }

    /// A field with an explicit alias, the equivalent of tagging a
    /// struct member with `abi:"name"` in a JSON bound interface.
    pub fn aliased(name: &str, abi: &str, value: Token) -> StructField {
        StructField {
            name: name.to_string(),
            abi: Some(abi.to_string()),
            value,
        }
    }
}

impl Token {
    /// Builds a fixed size bytes token from a slice, the counterpart of
    /// a `bytesN` declaration.
    pub fn fixed_bytes(value: &[u8]) -> Token {
        Token::FixedBytes(value.to_vec())
    }

    /// Short name of the token shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Address(_) => "address",
            Token::Bool(_) => "bool",
            Token::String(_) => "string",
            Token::DynamicBytes(_) => "bytes",
            Token::FixedBytes(_) => "fixed bytes",
            Token::Array(_) => "array",
            Token::Struct(_) => "struct",
        }
    }
}

impl From<u8> for Token {
    fn from(v: u8) -> Token {
        Token::Uint(BigUint::from(v))
    }
}

impl From<u16> for Token {
    fn from(v: u16) -> Token {
        Token::Uint(BigUint::from(v))
    }
}

impl From<u32> for Token {
    fn from(v: u32) -> Token {
        Token::Uint(BigUint::from(v))
    }
}

impl From<u64> for Token {
    fn from(v: u64) -> Token {
        Token::Uint(BigUint::from(v))
    }
}

impl From<u128> for Token {
    fn from(v: u128) -> Token {
        Token::Uint(BigUint::from(v))
    }
}

impl From<usize> for Token {
    fn from(v: usize) -> Token {
        Token::Uint(BigUint::from(v))
    }
}

impl From<i8> for Token {
    fn from(v: i8) -> Token {
        Token::Int(BigInt::from(v))
    }
}

impl From<i16> for Token {
    fn from(v: i16) -> Token {
        Token::Int(BigInt::from(v))
    }
}

impl From<i32> for Token {
    fn from(v: i32) -> Token {
        Token::Int(BigInt::from(v))
    }
}

impl From<i64> for Token {
    fn from(v: i64) -> Token {
        Token::Int(BigInt::from(v))
    }
}

impl From<i128> for Token {
    fn from(v: i128) -> Token {
        Token::Int(BigInt::from(v))
    }
}

impl From<isize> for Token {
    fn from(v: isize) -> Token {
        Token::Int(BigInt::from(v))
    }
}

impl From<BigUint> for Token {
    fn from(v: BigUint) -> Token {
        Token::Uint(v)
    }
}

impl From<BigInt> for Token {
    fn from(v: BigInt) -> Token {
        Token::Int(v)
    }
}

impl From<Uint256> for Token {
    fn from(v: Uint256) -> Token {
        Token::Uint(BigUint::from_bytes_be(&v.to_be_bytes()))
    }
}

impl From<Int256> for Token {
    fn from(v: Int256) -> Token {
        Token::Int(BigInt::from_signed_bytes_be(&v.to_be_bytes()))
    }
}

impl From<bool> for Token {
    fn from(v: bool) -> Token {
        Token::Bool(v)
    }
}

impl From<Address> for Token {
    fn from(v: Address) -> Token {
        Token::Address(v)
    }
}

impl From<Vec<u8>> for Token {
    fn from(v: Vec<u8>) -> Token {
        Token::DynamicBytes(v)
    }
}

impl From<&[u8]> for Token {
    fn from(v: &[u8]) -> Token {
        Token::DynamicBytes(v.to_vec())
    }
}

impl From<String> for Token {
    fn from(v: String) -> Token {
        Token::String(v)
    }
}

impl From<&str> for Token {
    fn from(v: &str) -> Token {
        Token::String(v.to_string())
    }
}

impl From<Vec<Token>> for Token {
    fn from(v: Vec<Token>) -> Token {
        Token::Array(v)
    }
}

#[test]
fn converts_host_integers() {
    assert_eq!(Token::from(69u32), Token::Uint(BigUint::from(69u32)));
    assert_eq!(Token::from(-1i8), Token::Int(BigInt::from(-1)));
    assert_eq!(Token::from(u128::MAX), Token::Uint(BigUint::from(u128::MAX)));
}

#[test]
fn converts_uint256() {
    let value: Uint256 = 1_000_000u32.into();
    assert_eq!(Token::from(value), Token::Uint(BigUint::from(1_000_000u32)));
}

#[test]
fn converts_int256_preserving_sign() {
    let value = Int256::from(-42i64);
    assert_eq!(Token::from(value), Token::Int(BigInt::from(-42)));
}
