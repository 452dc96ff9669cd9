use crate::error::Error;
use crate::pack::pack_args;
use crate::token::Token;
use crate::types::{Component, Type};
use sha3::{Digest, Keccak256};
use std::collections::HashMap;

/// A single named input of a contract method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub type_: Type,
}

impl Param {
    pub fn new(name: &str, descriptor: &str) -> Result<Param, Error> {
        Param::with_components(name, descriptor, &[])
    }

    pub fn with_components(
        name: &str,
        descriptor: &str,
        components: &[Component],
    ) -> Result<Param, Error> {
        Ok(Param {
            name: name.to_string(),
            type_: Type::new(descriptor, components)?,
        })
    }
}

/// A bound contract method, ready to derive its selector and encode
/// calls. Types are parsed once at construction and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub inputs: Vec<Param>,
}

impl Method {
    pub fn new(name: &str, inputs: Vec<Param>) -> Method {
        Method {
            name: name.to_string(),
            inputs,
        }
    }

    /// The canonical textual signature, `name(type1,type2)` with full
    /// width type names and no spaces. Tuples render their components
    /// parenthesized.
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|p| p.type_.canonical()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// The method selector, the first four bytes of the keccak256
    /// digest of the canonical signature.
    pub fn id(&self) -> [u8; 4] {
        let digest = Keccak256::digest(self.signature().as_bytes());
        let mut result = [0u8; 4];
        result.copy_from_slice(&digest[0..4]);
        result
    }

    /// Encodes a call to this method, the selector followed by the
    /// arguments packed as a single tuple.
    pub fn pack(&self, args: &[Token]) -> Result<Vec<u8>, Error> {
        if args.len() != self.inputs.len() {
            return Err(Error::LengthMismatch {
                path: "args".to_string(),
                expected: self.inputs.len(),
                got: args.len(),
            });
        }
        let types: Vec<&Type> = self.inputs.iter().map(|p| &p.type_).collect();
        let mut res = self.id().to_vec();
        res.extend(pack_args(&types, args)?);
        Ok(res)
    }
}

/// A bound contract interface, methods addressable by name.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    methods: HashMap<String, Method>,
}

impl Abi {
    pub fn new(methods: Vec<Method>) -> Abi {
        Abi {
            methods: methods
                .into_iter()
                .map(|method| (method.name.clone(), method))
                .collect(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Encodes a call to the named method.
    pub fn pack(&self, name: &str, args: &[Token]) -> Result<Vec<u8>, Error> {
        match self.methods.get(name) {
            Some(method) => method.pack(args),
            None => Err(Error::MethodNotFound(name.to_string())),
        }
    }
}

/// Packs an ordered list of values as a bare argument tuple, no
/// selector. This is the top level encoding of call data after the
/// first four bytes.
pub fn encode_tokens(types: &[Type], tokens: &[Token]) -> Result<Vec<u8>, Error> {
    if types.len() != tokens.len() {
        return Err(Error::LengthMismatch {
            path: "args".to_string(),
            expected: types.len(),
            got: tokens.len(),
        });
    }
    let types: Vec<&Type> = types.iter().collect();
    pack_args(&types, tokens)
}

/// Given a human readable signature like `transfer(address,uint256)`
/// this derives the full keccak256 digest of its canonical form.
/// Event topics use all 32 bytes of this value.
pub fn derive_signature(signature: &str) -> Result<[u8; 32], Error> {
    let (name, types) = parse_signature(signature)?;
    let canonical: Vec<String> = types.iter().map(Type::canonical).collect();
    let canonical = format!("{}({})", name, canonical.join(","));
    let digest = Keccak256::digest(canonical.as_bytes());
    let mut result = [0u8; 32];
    result.copy_from_slice(&digest);
    Ok(result)
}

/// Given a signature it derives a method id, the four byte selector
/// prefix of encoded call data.
pub fn derive_method_id(signature: &str) -> Result<[u8; 4], Error> {
    let digest = derive_signature(signature)?;
    let mut result = [0u8; 4];
    result.copy_from_slice(&digest[0..4]);
    Ok(result)
}

/// One stop helper for a typical contract call: derives the selector
/// from the signature and packs the provided values as the argument
/// tuple. Tuple types spelled inline, like `swap((address,uint24))`,
/// have unnamed fields and match struct tokens positionally.
pub fn encode_call(signature: &str, tokens: &[Token]) -> Result<Vec<u8>, Error> {
    let (name, types) = parse_signature(signature)?;
    let inputs = types
        .into_iter()
        .map(|type_| Param {
            name: String::new(),
            type_,
        })
        .collect();
    Method::new(&name, inputs).pack(tokens)
}

/// Splits `name(args)` and parses the comma separated argument types,
/// including parenthesized tuple literals with their array suffixes.
fn parse_signature(signature: &str) -> Result<(String, Vec<Type>), Error> {
    let malformed = || Error::InvalidType(format!("malformed signature {signature}"));
    let open = signature.find('(').ok_or_else(malformed)?;
    if open == 0 || !signature.ends_with(')') {
        return Err(malformed());
    }
    let name = &signature[..open];
    let args = &signature[open + 1..signature.len() - 1];
    let mut types = Vec::new();
    for part in split_top_level(args, signature)? {
        types.push(parse_signature_type(part, signature)?);
    }
    Ok((name.to_string(), types))
}

fn parse_signature_type(part: &str, signature: &str) -> Result<Type, Error> {
    if !part.starts_with('(') {
        return Type::new(part, &[]);
    }
    // tuple literal, find the matching close paren first
    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in part.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close =
        close.ok_or_else(|| Error::InvalidType(format!("malformed signature {signature}")))?;
    let inner = &part[1..close];
    if inner.is_empty() {
        return Err(Error::InvalidType(format!(
            "empty tuple in signature {signature}"
        )));
    }
    let mut fields = Vec::new();
    for piece in split_top_level(inner, signature)? {
        fields.push((String::new(), parse_signature_type(piece, signature)?));
    }
    Type::tuple_of(fields).apply_suffixes(&part[close + 1..], signature)
}

/// Splits on commas that sit outside any parentheses.
fn split_top_level<'a>(s: &'a str, signature: &str) -> Result<Vec<&'a str>, Error> {
    let mut parts = Vec::new();
    if s.is_empty() {
        return Ok(parts);
    }
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::InvalidType(format!("malformed signature {signature}"))
                })?;
            }
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::InvalidType(format!(
            "malformed signature {signature}"
        )));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

#[test]
fn derive_baz() {
    use crate::utils::bytes_to_hex_str;
    assert_eq!(
        bytes_to_hex_str(&derive_method_id("baz(uint32,bool)").unwrap()),
        "cdcd77c0"
    );
}

#[test]
fn derive_bar() {
    use crate::utils::bytes_to_hex_str;
    assert_eq!(
        bytes_to_hex_str(&derive_method_id("bar(bytes3[2])").unwrap()),
        "fce353f6"
    );
}

#[test]
fn derive_sam() {
    use crate::utils::bytes_to_hex_str;
    assert_eq!(
        bytes_to_hex_str(&derive_method_id("sam(bytes,bool,uint256[])").unwrap()),
        "a5643bf2"
    );
}

#[test]
fn derive_f() {
    use crate::utils::bytes_to_hex_str;
    assert_eq!(
        bytes_to_hex_str(&derive_method_id("f(uint256,uint32[],bytes10,bytes)").unwrap()),
        "8be65246"
    );
}

#[test]
fn derive_rejects_malformed() {
    assert!(derive_method_id("baz").is_err());
    assert!(derive_method_id("(uint32)").is_err());
    assert!(derive_method_id("baz(uint32").is_err());
    assert!(derive_method_id("baz(uint)").is_err());
    assert!(derive_method_id("baz(uint32))").is_err());
}

#[test]
fn method_id_matches_derived() {
    let method = Method::new(
        "baz",
        vec![
            Param::new("x", "uint32").unwrap(),
            Param::new("y", "bool").unwrap(),
        ],
    );
    assert_eq!(method.signature(), "baz(uint32,bool)");
    assert_eq!(method.id(), derive_method_id("baz(uint32,bool)").unwrap());
}

#[test]
fn tuple_signatures_render_parenthesized() {
    let method = Method::new(
        "g",
        vec![
            Param::with_components(
                "list",
                "tuple[]",
                &[
                    Component::new("a", "uint256"),
                    Component::new("b", "uint256[]"),
                ],
            )
            .unwrap(),
            Param::new("to", "address").unwrap(),
        ],
    );
    assert_eq!(method.signature(), "g((uint256,uint256[])[],address)");
}

#[test]
fn encode_simple_call() {
    use crate::utils::bytes_to_hex_str;
    let result = encode_call("baz(uint32,bool)", &[69u32.into(), true.into()]).unwrap();
    assert_eq!(
        bytes_to_hex_str(&result),
        concat!(
            "cdcd77c0",
            "0000000000000000000000000000000000000000000000000000000000000045",
            "0000000000000000000000000000000000000000000000000000000000000001"
        )
    );
}

#[test]
fn encode_call_agrees_with_method_path() {
    use crate::token::StructField;
    // the inline tuple spelling and the component built method must
    // produce identical bytes
    let components = vec![
        Component::new("price", "uint256"),
        Component::new("payload", "bytes"),
    ];
    let method = Method::new(
        "poke",
        vec![Param::with_components("quote", "tuple", &components).unwrap()],
    );
    let token = Token::Struct(vec![
        StructField::new("price", 42u32.into()),
        StructField::new("payload", vec![1u8, 2, 3].into()),
    ]);
    let by_method = method.pack(&[token.clone()]).unwrap();
    let by_signature = encode_call("poke((uint256,bytes))", &[token]).unwrap();
    assert_eq!(by_method, by_signature);
}

#[test]
fn abi_lookup() {
    let abi = Abi::new(vec![Method::new(
        "balance",
        vec![Param::new("who", "address").unwrap()],
    )]);
    assert!(abi.method("balance").is_some());
    assert!(matches!(
        abi.pack("missing", &[]),
        Err(Error::MethodNotFound(_))
    ));
}

#[test]
fn argument_count_is_checked() {
    let method = Method::new("send", vec![Param::new("amount", "uint256").unwrap()]);
    assert!(matches!(
        method.pack(&[]),
        Err(Error::LengthMismatch { .. })
    ));
}
