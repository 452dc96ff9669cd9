use crate::error::Error;
use std::fmt;

/// One member of a tuple type description, the way JSON contract
/// interfaces spell components out. Nested tuples carry their own
/// component lists.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Component {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Component {
    pub fn new(name: &str, type_: &str) -> Component {
        Component {
            name: name.to_string(),
            type_: type_.to_string(),
            components: Vec::new(),
        }
    }

    pub fn with_components(name: &str, type_: &str, components: Vec<Component>) -> Component {
        Component {
            name: name.to_string(),
            type_: type_.to_string(),
            components,
        }
    }
}

/// The kind of a single node in a parsed type tree.
///
/// Array kinds wrap their element type, so the textual `uint32[2][3]`
/// becomes `FixedArray(FixedArray(Uint(32), 2), 3)` with the outermost
/// node carrying the rightmost suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Unsigned integer with a width in bits, always a multiple of 8
    Uint(usize),
    /// Signed two's complement integer with a width in bits
    Int(usize),
    Bool,
    /// 20 bytes, encoded as a 160 bit unsigned number in a slot
    Address,
    /// `bytesN`, between 1 and 32 bytes stored left aligned
    FixedBytes(usize),
    /// Variable length byte sequence
    Bytes,
    /// UTF-8 string, identical to `Bytes` on the wire
    String,
    /// 20 byte address followed by a 4 byte selector, encoded like `bytes24`
    Function,
    FixedArray(Box<Type>, usize),
    Array(Box<Type>),
    /// Ordered named fields, names may be empty for positional matching
    Tuple(Vec<(String, Type)>),
}

/// A parsed ABI type. Carries the kind of the node plus the
/// classification attributes derived once at construction: whether the
/// encoding has a variable length, and for static types the exact
/// encoded size in bytes (always a multiple of 32).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    kind: Kind,
    dynamic: bool,
    static_size: usize,
}

impl Type {
    /// Parses a textual type descriptor such as `uint256`, `bytes32`,
    /// `string[]` or `uint32[2][3][4]` into a type tree. Tuple
    /// descriptors (`tuple`, `tuple[]`, `tuple[2]`) additionally need
    /// the ordered component list describing their fields.
    pub fn new(descriptor: &str, components: &[Component]) -> Result<Type, Error> {
        let (base, suffixes) = match descriptor.find('[') {
            Some(idx) => (&descriptor[..idx], &descriptor[idx..]),
            None => (descriptor, ""),
        };
        let ty = Type::parse_base(base, components, descriptor)?;
        ty.apply_suffixes(suffixes, descriptor)
    }

    fn parse_base(base: &str, components: &[Component], descriptor: &str) -> Result<Type, Error> {
        let kind = match base {
            "bool" => Kind::Bool,
            "address" => Kind::Address,
            "string" => Kind::String,
            "bytes" => Kind::Bytes,
            "function" => Kind::Function,
            "tuple" => {
                if components.is_empty() {
                    return Err(Error::InvalidType(format!(
                        "tuple descriptor {descriptor} has no components"
                    )));
                }
                let mut fields = Vec::with_capacity(components.len());
                for component in components {
                    let field = Type::new(&component.type_, &component.components)?;
                    fields.push((component.name.clone(), field));
                }
                for (i, (name, _)) in fields.iter().enumerate() {
                    if !name.is_empty() && fields[i + 1..].iter().any(|(other, _)| other == name) {
                        return Err(Error::InvalidType(format!(
                            "duplicate field {name} in tuple descriptor {descriptor}"
                        )));
                    }
                }
                Kind::Tuple(fields)
            }
            _ if base.starts_with("uint") => Kind::Uint(parse_bits(&base[4..], descriptor)?),
            _ if base.starts_with("int") => Kind::Int(parse_bits(&base[3..], descriptor)?),
            _ if base.starts_with("bytes") => {
                let size = parse_digits(&base[5..], descriptor)?;
                if size == 0 || size > 32 {
                    return Err(Error::InvalidType(format!(
                        "fixed bytes size out of range in {descriptor}"
                    )));
                }
                Kind::FixedBytes(size)
            }
            _ => {
                return Err(Error::InvalidType(format!(
                    "unsupported type descriptor {descriptor}"
                )))
            }
        };
        Ok(Type::from_kind(kind))
    }

    /// Wraps a parsed base in array nodes, one per bracket suffix read
    /// left to right. Values are supplied along the textual axes, so the
    /// rightmost suffix must end up outermost.
    pub(crate) fn apply_suffixes(self, suffixes: &str, descriptor: &str) -> Result<Type, Error> {
        let mut ty = self;
        let mut rest = suffixes;
        while !rest.is_empty() {
            if !rest.starts_with('[') {
                return Err(Error::InvalidType(format!(
                    "malformed array suffix in {descriptor}"
                )));
            }
            let close = rest.find(']').ok_or_else(|| {
                Error::InvalidType(format!("unterminated array suffix in {descriptor}"))
            })?;
            let digits = &rest[1..close];
            ty = if digits.is_empty() {
                Type::from_kind(Kind::Array(Box::new(ty)))
            } else {
                let len = parse_digits(digits, descriptor)?;
                Type::from_kind(Kind::FixedArray(Box::new(ty), len))
            };
            rest = &rest[close + 1..];
        }
        Ok(ty)
    }

    /// Builds a tuple type directly from already parsed fields, used by
    /// the signature string parser where fields have no names.
    pub(crate) fn tuple_of(fields: Vec<(String, Type)>) -> Type {
        Type::from_kind(Kind::Tuple(fields))
    }

    fn from_kind(kind: Kind) -> Type {
        let (dynamic, static_size) = match &kind {
            Kind::Bytes | Kind::String | Kind::Array(_) => (true, 0),
            Kind::FixedArray(elem, len) => {
                if elem.is_dynamic() {
                    (true, 0)
                } else {
                    (false, len * elem.static_size())
                }
            }
            Kind::Tuple(fields) => {
                if fields.iter().any(|(_, field)| field.is_dynamic()) {
                    (true, 0)
                } else {
                    (false, fields.iter().map(|(_, field)| field.static_size()).sum())
                }
            }
            _ => (false, 32),
        };
        Type {
            kind,
            dynamic,
            static_size,
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// True when the encoding of this type has a variable length and is
    /// therefore placed in the tail of its enclosing block, behind an
    /// offset slot.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Exact encoded size in bytes of a static type. Zero for dynamic
    /// types, which have no fixed size.
    pub fn static_size(&self) -> usize {
        self.static_size
    }

    /// The canonical textual form used for signature hashing, full
    /// width integer names and parenthesized tuples, no spaces.
    pub fn canonical(&self) -> String {
        match &self.kind {
            Kind::Uint(bits) => format!("uint{bits}"),
            Kind::Int(bits) => format!("int{bits}"),
            Kind::Bool => "bool".to_string(),
            Kind::Address => "address".to_string(),
            Kind::FixedBytes(size) => format!("bytes{size}"),
            Kind::Bytes => "bytes".to_string(),
            Kind::String => "string".to_string(),
            Kind::Function => "function".to_string(),
            Kind::FixedArray(elem, len) => format!("{}[{}]", elem.canonical(), len),
            Kind::Array(elem) => format!("{}[]", elem.canonical()),
            Kind::Tuple(fields) => {
                let fields: Vec<String> =
                    fields.iter().map(|(_, field)| field.canonical()).collect();
                format!("({})", fields.join(","))
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

fn parse_digits(digits: &str, descriptor: &str) -> Result<usize, Error> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidType(format!(
            "expected a number in {descriptor}"
        )));
    }
    digits
        .parse()
        .map_err(|_| Error::InvalidType(format!("number out of range in {descriptor}")))
}

fn parse_bits(digits: &str, descriptor: &str) -> Result<usize, Error> {
    let bits = parse_digits(digits, descriptor)?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(Error::InvalidType(format!(
            "invalid integer width in {descriptor}"
        )));
    }
    Ok(bits)
}

#[test]
fn parse_elementary() {
    assert_eq!(*Type::new("uint256", &[]).unwrap().kind(), Kind::Uint(256));
    assert_eq!(*Type::new("int8", &[]).unwrap().kind(), Kind::Int(8));
    assert_eq!(*Type::new("bool", &[]).unwrap().kind(), Kind::Bool);
    assert_eq!(*Type::new("address", &[]).unwrap().kind(), Kind::Address);
    assert_eq!(*Type::new("bytes32", &[]).unwrap().kind(), Kind::FixedBytes(32));
    assert_eq!(*Type::new("bytes", &[]).unwrap().kind(), Kind::Bytes);
    assert_eq!(*Type::new("string", &[]).unwrap().kind(), Kind::String);
    assert_eq!(*Type::new("function", &[]).unwrap().kind(), Kind::Function);
}

#[test]
fn reject_invalid_descriptors() {
    assert!(Type::new("uint7", &[]).is_err());
    assert!(Type::new("uint264", &[]).is_err());
    assert!(Type::new("uint0", &[]).is_err());
    assert!(Type::new("int12x", &[]).is_err());
    assert!(Type::new("bytes0", &[]).is_err());
    assert!(Type::new("bytes33", &[]).is_err());
    assert!(Type::new("fixed128x18", &[]).is_err());
    assert!(Type::new("uint256[2", &[]).is_err());
    assert!(Type::new("uint256[2]x", &[]).is_err());
    assert!(Type::new("uint256[+2]", &[]).is_err());
    assert!(Type::new("tuple", &[]).is_err());
}

#[test]
fn reject_unqualified_widths() {
    // the legacy aliases for 256 bit integers are not accepted
    assert!(Type::new("uint", &[]).is_err());
    assert!(Type::new("int", &[]).is_err());
    assert!(Type::new("uint[]", &[]).is_err());
}

#[test]
fn array_suffixes_nest_in_reverse() {
    // uint32[2][3][4] is an array of 4 arrays of 3 arrays of 2 numbers
    let ty = Type::new("uint32[2][3][4]", &[]).unwrap();
    match ty.kind() {
        Kind::FixedArray(mid, 4) => match mid.kind() {
            Kind::FixedArray(inner, 3) => {
                assert_eq!(*inner.kind(), Kind::FixedArray(Box::new(Type::new("uint32", &[]).unwrap()), 2));
            }
            other => panic!("expected middle array, got {other:?}"),
        },
        other => panic!("expected outer array, got {other:?}"),
    }
    assert_eq!(ty.canonical(), "uint32[2][3][4]");
    assert!(!ty.is_dynamic());
    assert_eq!(ty.static_size(), 24 * 32);
}

#[test]
fn classify_dynamic() {
    assert!(Type::new("bytes", &[]).unwrap().is_dynamic());
    assert!(Type::new("string", &[]).unwrap().is_dynamic());
    assert!(Type::new("uint256[]", &[]).unwrap().is_dynamic());
    assert!(Type::new("string[2]", &[]).unwrap().is_dynamic());
    assert!(!Type::new("uint256", &[]).unwrap().is_dynamic());
    assert!(!Type::new("bytes32[3]", &[]).unwrap().is_dynamic());
}

#[test]
fn static_sizes() {
    assert_eq!(Type::new("uint8", &[]).unwrap().static_size(), 32);
    assert_eq!(Type::new("bytes32[3]", &[]).unwrap().static_size(), 96);
    let components = vec![
        Component::new("a", "int64"),
        Component::new("b", "bytes32[2]"),
    ];
    let ty = Type::new("tuple", &components).unwrap();
    assert!(!ty.is_dynamic());
    assert_eq!(ty.static_size(), 96);
}

#[test]
fn tuple_components() {
    let components = vec![
        Component::new("a", "uint256"),
        Component::with_components("b", "tuple[]", vec![Component::new("c", "string")]),
    ];
    let ty = Type::new("tuple", &components).unwrap();
    assert!(ty.is_dynamic());
    assert_eq!(ty.canonical(), "(uint256,(string)[])");
}

#[test]
fn duplicate_tuple_fields() {
    let components = vec![Component::new("a", "uint256"), Component::new("a", "bool")];
    assert!(Type::new("tuple", &components).is_err());
}

#[test]
fn components_from_json() {
    // component lists come straight out of JSON interface fragments
    let components: Vec<Component> = serde_json::from_str(
        r#"[
            {"name": "owner", "type": "address"},
            {"name": "balances", "type": "uint256[]"},
            {"name": "nested", "type": "tuple", "components": [{"name": "x", "type": "bytes"}]}
        ]"#,
    )
    .unwrap();
    let ty = Type::new("tuple", &components).unwrap();
    assert_eq!(ty.canonical(), "(address,uint256[],(bytes))");
    assert!(ty.is_dynamic());
}
