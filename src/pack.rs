use crate::error::Error;
use crate::token::{StructField, Token};
use crate::types::{Kind, Type};
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed};

/// Size in bytes of a single slot of the wire format
const SLOT: usize = 32;

impl Type {
    /// Packs a single value against this type, producing the canonical
    /// slot layout consumed by the EVM. The output length is always a
    /// multiple of 32 and, for static types, equal to
    /// [`static_size`](Type::static_size).
    pub fn pack(&self, token: &Token) -> Result<Vec<u8>, Error> {
        pack_token(self, token, "arg")
    }
}

fn pack_token(ty: &Type, token: &Token, path: &str) -> Result<Vec<u8>, Error> {
    match ty.kind() {
        Kind::Uint(bits) => match int_value(token) {
            Some(n) => Ok(pack_int(&n, false, *bits, path)?.to_vec()),
            None => Err(mismatch(ty, token, path)),
        },
        Kind::Int(bits) => match int_value(token) {
            Some(n) => Ok(pack_int(&n, true, *bits, path)?.to_vec()),
            None => Err(mismatch(ty, token, path)),
        },
        Kind::Bool => match token {
            Token::Bool(value) => {
                let mut res = [0u8; SLOT];
                res[SLOT - 1] = *value as u8;
                Ok(res.to_vec())
            }
            _ => Err(mismatch(ty, token, path)),
        },
        Kind::Address => match token {
            Token::Address(addr) => Ok(address_slot(addr.as_bytes()).to_vec()),
            Token::FixedBytes(bytes) if bytes.len() == 20 => Ok(address_slot(bytes).to_vec()),
            _ => Err(mismatch(ty, token, path)),
        },
        Kind::FixedBytes(size) => {
            let bytes = byte_content(token).ok_or_else(|| mismatch(ty, token, path))?;
            if bytes.len() != *size {
                return Err(Error::LengthMismatch {
                    path: path.to_string(),
                    expected: *size,
                    got: bytes.len(),
                });
            }
            Ok(left_aligned_slot(bytes).to_vec())
        }
        Kind::Function => {
            let bytes = byte_content(token).ok_or_else(|| mismatch(ty, token, path))?;
            if bytes.len() != 24 {
                return Err(Error::LengthMismatch {
                    path: path.to_string(),
                    expected: 24,
                    got: bytes.len(),
                });
            }
            Ok(left_aligned_slot(bytes).to_vec())
        }
        Kind::Bytes => {
            let bytes = byte_content(token).ok_or_else(|| mismatch(ty, token, path))?;
            Ok(length_prefixed(bytes))
        }
        Kind::String => match token {
            Token::String(value) => Ok(length_prefixed(value.as_bytes())),
            _ => Err(mismatch(ty, token, path)),
        },
        Kind::FixedArray(elem, len) => match token {
            Token::Array(values) => {
                if values.len() != *len {
                    return Err(Error::LengthMismatch {
                        path: path.to_string(),
                        expected: *len,
                        got: values.len(),
                    });
                }
                pack_sequence(elem, values, path)
            }
            _ => Err(mismatch(ty, token, path)),
        },
        Kind::Array(elem) => match token {
            Token::Array(values) => {
                let mut res = unsigned_slot(&BigUint::from(values.len())).to_vec();
                res.extend(pack_sequence(elem, values, path)?);
                Ok(res)
            }
            _ => Err(mismatch(ty, token, path)),
        },
        Kind::Tuple(fields) => match token {
            Token::Struct(sfields) => {
                let resolved = resolve_fields(fields, sfields, path)?;
                let items: Vec<(&Type, &Token, String)> = fields
                    .iter()
                    .enumerate()
                    .zip(resolved)
                    .map(|((idx, (name, field)), value)| {
                        let child = if name.is_empty() {
                            format!("{path}.{idx}")
                        } else {
                            format!("{path}.{name}")
                        };
                        (field, value, child)
                    })
                    .collect();
                pack_elements(&items)
            }
            _ => Err(mismatch(ty, token, path)),
        },
    }
}

/// Encodes the elements of an array, inline when the element type is
/// static, as a head and tail block when it is dynamic.
fn pack_sequence(elem: &Type, values: &[Token], path: &str) -> Result<Vec<u8>, Error> {
    let items: Vec<(&Type, &Token, String)> = values
        .iter()
        .enumerate()
        .map(|(i, value)| (elem, value, format!("{path}[{i}]")))
        .collect();
    pack_elements(&items)
}

/// The head and tail layout shared by arrays and tuples. Static
/// children land in the head verbatim, each dynamic child leaves a 32
/// byte offset slot in the head and appends its encoding to the tail.
/// Offsets are measured from the start of this block, not from the
/// start of the whole message.
fn pack_elements(items: &[(&Type, &Token, String)]) -> Result<Vec<u8>, Error> {
    let mut children = Vec::with_capacity(items.len());
    let mut head_size = 0;
    for (ty, token, path) in items {
        children.push(pack_token(ty, token, path)?);
        head_size += if ty.is_dynamic() { SLOT } else { ty.static_size() };
    }
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();
    for ((ty, _, _), child) in items.iter().zip(children) {
        if ty.is_dynamic() {
            head.extend_from_slice(&unsigned_slot(&BigUint::from(head_size + tail.len())));
            tail.extend(child);
        } else {
            head.extend(child);
        }
    }
    head.extend(tail);
    Ok(head)
}

/// Packs an ordered argument list as a single top level tuple.
pub(crate) fn pack_args(types: &[&Type], tokens: &[Token]) -> Result<Vec<u8>, Error> {
    let items: Vec<(&Type, &Token, String)> = types
        .iter()
        .zip(tokens)
        .enumerate()
        .map(|(i, (ty, token))| (*ty, token, format!("arg[{i}]")))
        .collect();
    pack_elements(&items)
}

/// Matches declared tuple fields to the fields of a struct token.
/// Alias matches win over name matches, names compare case
/// insensitively, and declared fields without a name resolve by
/// position. Every declared field must resolve to exactly one source
/// field.
fn resolve_fields<'a>(
    fields: &[(String, Type)],
    sfields: &'a [StructField],
    path: &str,
) -> Result<Vec<&'a Token>, Error> {
    let mut resolved = Vec::with_capacity(fields.len());
    for (idx, (name, _)) in fields.iter().enumerate() {
        if name.is_empty() {
            let field = sfields.get(idx).ok_or_else(|| Error::FieldNotFound {
                path: path.to_string(),
                field: format!("{idx}"),
            })?;
            resolved.push(&field.value);
            continue;
        }
        let mut aliased = sfields
            .iter()
            .filter(|f| f.abi.as_deref() == Some(name.as_str()));
        let found = match (aliased.next(), aliased.next()) {
            (Some(_), Some(_)) => {
                return Err(Error::AmbiguousField {
                    path: path.to_string(),
                    field: name.clone(),
                })
            }
            (Some(field), None) => Some(field),
            (None, _) => {
                // a field carrying an alias is only addressable through it
                let mut named = sfields
                    .iter()
                    .filter(|f| f.abi.is_none() && f.name.eq_ignore_ascii_case(name));
                match (named.next(), named.next()) {
                    (Some(_), Some(_)) => {
                        return Err(Error::AmbiguousField {
                            path: path.to_string(),
                            field: name.clone(),
                        })
                    }
                    (None, Some(_)) => unreachable!(),
                    (first, None) => first,
                }
            }
        };
        match found {
            Some(field) => resolved.push(&field.value),
            None => {
                return Err(Error::FieldNotFound {
                    path: path.to_string(),
                    field: name.clone(),
                })
            }
        }
    }
    Ok(resolved)
}

/// Packs any integer token as a 256 bit slot using the sign of the
/// host value. Out of range values are reduced modulo 2^256 instead of
/// rejected, so a negative number and its 2^256 complement produce the
/// same slot.
pub fn pack_num(token: &Token) -> Result<[u8; SLOT], Error> {
    let n = int_value(token).ok_or_else(|| Error::TypeMismatch {
        path: "num".to_string(),
        expected: "integer".to_string(),
        got: token.type_name().to_string(),
    })?;
    let modulus: BigInt = BigInt::one() << 256;
    let reduced: BigInt = ((&n % &modulus) + &modulus) % &modulus;
    Ok(unsigned_slot(reduced.magnitude()))
}

/// Encodes an integer into a 32 byte big endian two's complement slot,
/// rejecting values that do not fit the declared width.
fn pack_int(n: &BigInt, signed: bool, bits: usize, path: &str) -> Result<[u8; SLOT], Error> {
    let in_range = if signed {
        let bound = BigInt::one() << (bits - 1);
        *n >= -&bound && *n < bound
    } else {
        !n.is_negative() && *n < (BigInt::one() << bits)
    };
    if !in_range {
        return Err(Error::IntegerOverflow {
            path: path.to_string(),
            value: n.to_string(),
        });
    }
    Ok(twos_complement(n))
}

fn twos_complement(n: &BigInt) -> [u8; SLOT] {
    if n.is_negative() {
        let shifted: BigInt = n + (BigInt::one() << 256);
        unsigned_slot(shifted.magnitude())
    } else {
        unsigned_slot(n.magnitude())
    }
}

fn int_value(token: &Token) -> Option<BigInt> {
    match token {
        Token::Uint(v) => Some(BigInt::from(v.clone())),
        Token::Int(v) => Some(v.clone()),
        _ => None,
    }
}

fn byte_content(token: &Token) -> Option<&[u8]> {
    match token {
        Token::FixedBytes(bytes) | Token::DynamicBytes(bytes) => Some(bytes),
        _ => None,
    }
}

fn mismatch(ty: &Type, token: &Token, path: &str) -> Error {
    Error::TypeMismatch {
        path: path.to_string(),
        expected: ty.canonical(),
        got: token.type_name().to_string(),
    }
}

/// Writes an unsigned value into the low end of a zeroed slot. Callers
/// guarantee the value fits in 256 bits.
fn unsigned_slot(value: &BigUint) -> [u8; SLOT] {
    let bytes = value.to_bytes_be();
    let mut res = [0u8; SLOT];
    res[SLOT - bytes.len()..].copy_from_slice(&bytes);
    res
}

fn left_aligned_slot(bytes: &[u8]) -> [u8; SLOT] {
    let mut res = [0u8; SLOT];
    res[..bytes.len()].copy_from_slice(bytes);
    res
}

fn address_slot(bytes: &[u8]) -> [u8; SLOT] {
    let mut res = [0u8; SLOT];
    res[SLOT - bytes.len()..].copy_from_slice(bytes);
    res
}

/// A 32 byte length slot followed by the raw payload padded with
/// zeros to the next slot boundary. The empty payload gets no padding.
fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut res = unsigned_slot(&BigUint::from(bytes.len())).to_vec();
    res.extend_from_slice(bytes);
    let rem = bytes.len() % SLOT;
    if rem != 0 {
        res.resize(res.len() + SLOT - rem, 0);
    }
    res
}

#[test]
fn pack_number_protocol_limits() {
    use crate::utils::bytes_to_hex_str;
    let cases: Vec<(Token, &str)> = vec![
        (
            0u8.into(),
            "0000000000000000000000000000000000000000000000000000000000000000",
        ),
        (
            1u8.into(),
            "0000000000000000000000000000000000000000000000000000000000000001",
        ),
        (
            (-1i8).into(),
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        ),
    ];
    for (token, expected) in cases {
        assert_eq!(bytes_to_hex_str(&pack_num(&token).unwrap()), expected);
    }
}

#[test]
fn pack_number_width_corners() {
    use crate::utils::bytes_to_hex_str;
    let cases: Vec<(Token, &str)> = vec![
        (
            u8::MAX.into(),
            "00000000000000000000000000000000000000000000000000000000000000ff",
        ),
        (
            u16::MAX.into(),
            "000000000000000000000000000000000000000000000000000000000000ffff",
        ),
        (
            u32::MAX.into(),
            "00000000000000000000000000000000000000000000000000000000ffffffff",
        ),
        (
            u64::MAX.into(),
            "000000000000000000000000000000000000000000000000ffffffffffffffff",
        ),
        (
            i8::MAX.into(),
            "000000000000000000000000000000000000000000000000000000000000007f",
        ),
        (
            i16::MAX.into(),
            "0000000000000000000000000000000000000000000000000000000000007fff",
        ),
        (
            i32::MAX.into(),
            "000000000000000000000000000000000000000000000000000000007fffffff",
        ),
        (
            i64::MAX.into(),
            "0000000000000000000000000000000000000000000000007fffffffffffffff",
        ),
        (
            i8::MIN.into(),
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff80",
        ),
        (
            i16::MIN.into(),
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff8000",
        ),
        (
            i32::MIN.into(),
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffff80000000",
        ),
        (
            i64::MIN.into(),
            "ffffffffffffffffffffffffffffffffffffffffffffffff8000000000000000",
        ),
    ];
    for (token, expected) in cases {
        assert_eq!(bytes_to_hex_str(&pack_num(&token).unwrap()), expected);
    }
}

#[test]
fn pack_number_wraps_modulo_two_pow_256() {
    // a negative value and its 2^256 complement share a representation
    let negative = Token::Int(BigInt::from(-5));
    let shifted: BigInt = BigInt::one() << 256;
    let reduced: BigInt = shifted - 5;
    let complement = Token::Uint(reduced.magnitude().clone());
    assert_eq!(pack_num(&negative).unwrap(), pack_num(&complement).unwrap());
}

#[test]
fn pack_number_rejects_non_integers() {
    assert!(pack_num(&Token::Bool(true)).is_err());
}

#[test]
fn integer_range_checks() {
    let uint8 = Type::new("uint8", &[]).unwrap();
    assert!(uint8.pack(&255u8.into()).is_ok());
    assert!(matches!(
        uint8.pack(&256u16.into()),
        Err(Error::IntegerOverflow { .. })
    ));
    assert!(matches!(
        uint8.pack(&(-1i8).into()),
        Err(Error::IntegerOverflow { .. })
    ));

    let int8 = Type::new("int8", &[]).unwrap();
    assert!(int8.pack(&(-128i16).into()).is_ok());
    assert!(matches!(
        int8.pack(&(-129i16).into()),
        Err(Error::IntegerOverflow { .. })
    ));
    assert!(matches!(
        int8.pack(&128u8.into()),
        Err(Error::IntegerOverflow { .. })
    ));
}

#[test]
fn extreme_widths() {
    use crate::utils::bytes_to_hex_str;
    let uint256 = Type::new("uint256", &[]).unwrap();
    let shifted: BigInt = BigInt::one() << 256;
    let reduced: BigInt = shifted - 1;
    let max = reduced.magnitude().clone();
    assert_eq!(
        bytes_to_hex_str(&uint256.pack(&Token::Uint(max)).unwrap()),
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    );

    let int256 = Type::new("int256", &[]).unwrap();
    let bound: BigInt = BigInt::one() << 255;
    let min: BigInt = -bound;
    assert_eq!(
        bytes_to_hex_str(&int256.pack(&Token::Int(min.clone())).unwrap()),
        "8000000000000000000000000000000000000000000000000000000000000000"
    );
    assert!(int256.pack(&Token::Int(min - 1)).is_err());
}

#[test]
fn empty_dynamic_values() {
    use crate::utils::bytes_to_hex_str;
    let array = Type::new("uint256[]", &[]).unwrap();
    assert_eq!(
        bytes_to_hex_str(&array.pack(&Token::Array(vec![])).unwrap()),
        "0000000000000000000000000000000000000000000000000000000000000000"
    );
    let string = Type::new("string", &[]).unwrap();
    assert_eq!(
        bytes_to_hex_str(&string.pack(&"".into()).unwrap()),
        "0000000000000000000000000000000000000000000000000000000000000000"
    );
}

#[test]
fn static_output_matches_static_size() {
    use crate::types::Component;
    let components = vec![
        Component::new("a", "int64"),
        Component::new("b", "bytes32[2]"),
    ];
    let ty = Type::new("tuple", &components).unwrap();
    let token = Token::Struct(vec![
        StructField::new("a", 1i64.into()),
        StructField::new(
            "b",
            Token::Array(vec![
                Token::fixed_bytes(&[0u8; 32]),
                Token::fixed_bytes(&[0u8; 32]),
            ]),
        ),
    ]);
    let packed = ty.pack(&token).unwrap();
    assert_eq!(packed.len(), ty.static_size());
    // byte identical on a second run
    assert_eq!(packed, ty.pack(&token).unwrap());
}

#[test]
fn error_paths_name_the_position() {
    use crate::types::Component;
    let components = vec![Component::new("b", "uint8[2]")];
    let ty = Type::new("tuple", &components).unwrap();
    let token = Token::Struct(vec![StructField::new(
        "b",
        Token::Array(vec![1u8.into(), 300u16.into()]),
    )]);
    match ty.pack(&token).unwrap_err() {
        Error::IntegerOverflow { path, .. } => assert_eq!(path, "arg.b[1]"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn field_resolution() {
    use crate::types::Component;
    let components = vec![Component::new("a", "uint8"), Component::new("c", "bool")];
    let ty = Type::new("tuple", &components).unwrap();

    // alias wins, capitalized name matches case insensitively
    let token = Token::Struct(vec![
        StructField::aliased("FieldA", "a", 3u8.into()),
        StructField::new("C", true.into()),
    ]);
    assert!(ty.pack(&token).is_ok());

    // unmatched declared field
    let token = Token::Struct(vec![StructField::new("a", 3u8.into())]);
    assert!(matches!(
        ty.pack(&token).unwrap_err(),
        Error::FieldNotFound { .. }
    ));

    // two candidates for the same declared name
    let token = Token::Struct(vec![
        StructField::new("a", 3u8.into()),
        StructField::new("A", 4u8.into()),
        StructField::new("c", true.into()),
    ]);
    assert!(matches!(
        ty.pack(&token).unwrap_err(),
        Error::AmbiguousField { .. }
    ));
}

#[test]
fn wrong_shapes_are_rejected() {
    let uint256 = Type::new("uint256", &[]).unwrap();
    assert!(matches!(
        uint256.pack(&Token::Bool(true)),
        Err(Error::TypeMismatch { .. })
    ));
    let fixed = Type::new("bytes4", &[]).unwrap();
    assert!(matches!(
        fixed.pack(&Token::fixed_bytes(&[1, 2, 3])),
        Err(Error::LengthMismatch { .. })
    ));
    let array = Type::new("uint8[2]", &[]).unwrap();
    assert!(matches!(
        array.pack(&Token::Array(vec![1u8.into()])),
        Err(Error::LengthMismatch { .. })
    ));
}
