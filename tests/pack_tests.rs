//! The encoding corpus: every declared type against a value, compared
//! to the exact byte layout the EVM consumes.

use candor::utils::{bytes_to_hex_str, hex_str_to_bytes};
use candor::{Abi, Address, Component, Method, Param, StructField, Token, Type};

/// An address with the first byte set, the rest zero.
fn addr(first: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = first;
    bytes.into()
}

/// A 32 byte hash value with the first byte set.
fn hash(first: u8) -> Token {
    let mut bytes = [0u8; 32];
    bytes[0] = first;
    Token::fixed_bytes(&bytes)
}

fn check(descriptor: &str, components: &[Component], token: Token, expected: &str) {
    let ty = Type::new(descriptor, components).unwrap();
    let packed = ty.pack(&token).unwrap();
    assert_eq!(bytes_to_hex_str(&packed), expected, "packing {descriptor}");
    assert_eq!(packed.len() % 32, 0, "unaligned output for {descriptor}");
    if !ty.is_dynamic() {
        assert_eq!(packed.len(), ty.static_size(), "size of {descriptor}");
    }
}

#[test]
fn pack_elementary_numbers() {
    let two = "0000000000000000000000000000000000000000000000000000000000000002";
    for descriptor in ["uint8", "uint16", "uint32", "uint64", "uint256"] {
        check(descriptor, &[], 2u8.into(), two);
    }
    for descriptor in ["int8", "int16", "int32", "int64", "int256"] {
        check(descriptor, &[], 2i8.into(), two);
    }
}

#[test]
fn pack_number_slices() {
    let expected = concat!(
        "0000000000000000000000000000000000000000000000000000000000000002",
        "0000000000000000000000000000000000000000000000000000000000000001",
        "0000000000000000000000000000000000000000000000000000000000000002"
    );
    for descriptor in ["uint8[]", "uint16[]", "uint32[]", "uint64[]", "uint256[]"] {
        check(
            descriptor,
            &[],
            Token::Array(vec![1u8.into(), 2u8.into()]),
            expected,
        );
    }
    for descriptor in ["int8[]", "int16[]", "int32[]", "int64[]", "int256[]"] {
        check(
            descriptor,
            &[],
            Token::Array(vec![1i8.into(), 2i8.into()]),
            expected,
        );
    }
}

#[test]
fn pack_fixed_bytes_every_width() {
    // a leading one byte lands left aligned for every declared width
    let expected = "0100000000000000000000000000000000000000000000000000000000000000";
    for n in 1..=32usize {
        let mut value = vec![0u8; n];
        value[0] = 1;
        check(&format!("bytes{n}"), &[], Token::FixedBytes(value), expected);
    }
}

#[test]
fn pack_function() {
    let mut value = [0u8; 24];
    value[0] = 1;
    check(
        "function",
        &[],
        Token::fixed_bytes(&value),
        "0100000000000000000000000000000000000000000000000000000000000000",
    );
}

#[test]
fn pack_reverse_nested_fixed_arrays() {
    // uint32[2][3][4]: the rightmost suffix is the outermost axis, so
    // values are supplied as four blocks of three pairs
    let mut counter = 0u32;
    let mut outer = Vec::new();
    for _ in 0..4 {
        let mut mid = Vec::new();
        for _ in 0..3 {
            let mut inner = Vec::new();
            for _ in 0..2 {
                counter += 1;
                inner.push(counter.into());
            }
            mid.push(Token::Array(inner));
        }
        outer.push(Token::Array(mid));
    }
    let expected: String = (1..=24u32).map(|v| format!("{v:064x}")).collect();
    check("uint32[2][3][4]", &[], Token::Array(outer), &expected);
}

#[test]
fn pack_address_slice() {
    check(
        "address[]",
        &[],
        Token::Array(vec![addr(1).into(), addr(2).into()]),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000100000000000000000000000000000000000000",
            "0000000000000000000000000200000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_hash_slice() {
    check(
        "bytes32[]",
        &[],
        Token::Array(vec![hash(1), hash(2)]),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0100000000000000000000000000000000000000000000000000000000000000",
            "0200000000000000000000000000000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_string() {
    check(
        "string",
        &[],
        "foobar".into(),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000006",
            "666f6f6261720000000000000000000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_string_slice() {
    check(
        "string[]",
        &[],
        Token::Array(vec!["hello".into(), "foobar".into()]),
        concat!(
            // len(array) = 2
            "0000000000000000000000000000000000000000000000000000000000000002",
            // offset 64 to i = 0
            "0000000000000000000000000000000000000000000000000000000000000040",
            // offset 128 to i = 1
            "0000000000000000000000000000000000000000000000000000000000000080",
            // len(str[0]) = 5
            "0000000000000000000000000000000000000000000000000000000000000005",
            // str[0]
            "68656c6c6f000000000000000000000000000000000000000000000000000000",
            // len(str[1]) = 6
            "0000000000000000000000000000000000000000000000000000000000000006",
            // str[1]
            "666f6f6261720000000000000000000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_string_fixed_array() {
    check(
        "string[2]",
        &[],
        Token::Array(vec!["hello".into(), "foobar".into()]),
        concat!(
            // offset to i = 0
            "0000000000000000000000000000000000000000000000000000000000000040",
            // offset to i = 1
            "0000000000000000000000000000000000000000000000000000000000000080",
            "0000000000000000000000000000000000000000000000000000000000000005",
            "68656c6c6f000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000006",
            "666f6f6261720000000000000000000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_nested_hash_slices() {
    let value = Token::Array(vec![
        Token::Array(vec![hash(1), hash(2)]),
        Token::Array(vec![hash(3), hash(4), hash(5)]),
    ]);
    check(
        "bytes32[][]",
        &[],
        value.clone(),
        concat!(
            // len(array) = 2
            "0000000000000000000000000000000000000000000000000000000000000002",
            // offset 64 to i = 0
            "0000000000000000000000000000000000000000000000000000000000000040",
            // offset 160 to i = 1
            "00000000000000000000000000000000000000000000000000000000000000a0",
            // len(array[0]) = 2
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0100000000000000000000000000000000000000000000000000000000000000",
            "0200000000000000000000000000000000000000000000000000000000000000",
            // len(array[1]) = 3
            "0000000000000000000000000000000000000000000000000000000000000003",
            "0300000000000000000000000000000000000000000000000000000000000000",
            "0400000000000000000000000000000000000000000000000000000000000000",
            "0500000000000000000000000000000000000000000000000000000000000000"
        ),
    );
    // the fixed outer form drops the outer length slot
    check(
        "bytes32[][2]",
        &[],
        value,
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000040",
            "00000000000000000000000000000000000000000000000000000000000000a0",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0100000000000000000000000000000000000000000000000000000000000000",
            "0200000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000003",
            "0300000000000000000000000000000000000000000000000000000000000000",
            "0400000000000000000000000000000000000000000000000000000000000000",
            "0500000000000000000000000000000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_static_nested_hashes() {
    check(
        "bytes32[3][2]",
        &[],
        Token::Array(vec![
            Token::Array(vec![hash(1), hash(2), hash(3)]),
            Token::Array(vec![hash(3), hash(4), hash(5)]),
        ]),
        concat!(
            "0100000000000000000000000000000000000000000000000000000000000000",
            "0200000000000000000000000000000000000000000000000000000000000000",
            "0300000000000000000000000000000000000000000000000000000000000000",
            "0300000000000000000000000000000000000000000000000000000000000000",
            "0400000000000000000000000000000000000000000000000000000000000000",
            "0500000000000000000000000000000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_static_tuple() {
    let components = vec![
        Component::new("a", "int64"),
        Component::new("b", "int256"),
        Component::new("c", "int256"),
        Component::new("d", "bool"),
        Component::new("e", "bytes32[3][2]"),
    ];
    let token = Token::Struct(vec![
        StructField::new("a", 1i64.into()),
        StructField::new("b", 1i64.into()),
        StructField::new("c", (-1i64).into()),
        StructField::new("d", true.into()),
        StructField::new(
            "e",
            Token::Array(vec![
                Token::Array(vec![hash(1), hash(2), hash(3)]),
                Token::Array(vec![hash(3), hash(4), hash(5)]),
            ]),
        ),
    ]);
    check(
        "tuple",
        &components,
        token,
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0100000000000000000000000000000000000000000000000000000000000000",
            "0200000000000000000000000000000000000000000000000000000000000000",
            "0300000000000000000000000000000000000000000000000000000000000000",
            "0300000000000000000000000000000000000000000000000000000000000000",
            "0400000000000000000000000000000000000000000000000000000000000000",
            "0500000000000000000000000000000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_dynamic_tuple_with_aliases() {
    let components = vec![
        Component::new("a", "string"),
        Component::new("b", "int64"),
        Component::new("c", "bytes"),
        Component::new("d", "string[]"),
        Component::new("e", "int256[]"),
        Component::new("f", "address[]"),
    ];
    // the first two fields resolve through their aliases, the rest by
    // their capitalized names
    let token = Token::Struct(vec![
        StructField::aliased("FieldA", "a", "foobar".into()),
        StructField::aliased("FieldB", "b", 1i64.into()),
        StructField::new("C", vec![1u8].into()),
        StructField::new("D", Token::Array(vec!["foo".into(), "bar".into()])),
        StructField::new("E", Token::Array(vec![1i64.into(), (-1i64).into()])),
        StructField::new("F", Token::Array(vec![addr(1).into(), addr(2).into()])),
    ]);
    check(
        "tuple",
        &components,
        token,
        concat!(
            // offset of a
            "00000000000000000000000000000000000000000000000000000000000000c0",
            // value of b
            "0000000000000000000000000000000000000000000000000000000000000001",
            // offset of c
            "0000000000000000000000000000000000000000000000000000000000000100",
            // offset of d
            "0000000000000000000000000000000000000000000000000000000000000140",
            // offset of e
            "0000000000000000000000000000000000000000000000000000000000000220",
            // offset of f
            "0000000000000000000000000000000000000000000000000000000000000280",
            // a = "foobar"
            "0000000000000000000000000000000000000000000000000000000000000006",
            "666f6f6261720000000000000000000000000000000000000000000000000000",
            // c = [1]
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0100000000000000000000000000000000000000000000000000000000000000",
            // d = ["foo", "bar"]
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000040",
            "0000000000000000000000000000000000000000000000000000000000000080",
            "0000000000000000000000000000000000000000000000000000000000000003",
            "666f6f0000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000003",
            "6261720000000000000000000000000000000000000000000000000000000000",
            // e = [1, -1]
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            // f = [addr(1), addr(2)]
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000100000000000000000000000000000000000000",
            "0000000000000000000000000200000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_nested_tuple() {
    let components = vec![
        Component::with_components(
            "a",
            "tuple",
            vec![Component::new("a", "uint256"), Component::new("b", "uint256[]")],
        ),
        Component::new("b", "int256[]"),
    ];
    let token = Token::Struct(vec![
        StructField::new(
            "a",
            Token::Struct(vec![
                StructField::aliased("FieldA", "a", 1u8.into()),
                StructField::new("B", Token::Array(vec![1u8.into(), 0u8.into()])),
            ]),
        ),
        StructField::new("b", Token::Array(vec![1i8.into(), 0i8.into()])),
    ]);
    check(
        "tuple",
        &components,
        token,
        concat!(
            // a offset
            "0000000000000000000000000000000000000000000000000000000000000040",
            // b offset
            "00000000000000000000000000000000000000000000000000000000000000e0",
            // a.a value
            "0000000000000000000000000000000000000000000000000000000000000001",
            // a.b offset
            "0000000000000000000000000000000000000000000000000000000000000040",
            // a.b length
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000000",
            // b length
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn pack_tuple_slice() {
    let components = vec![
        Component::new("a", "int256"),
        Component::new("b", "int256[]"),
    ];
    let element = |a: i64, b: Vec<i64>| {
        Token::Struct(vec![
            StructField::new("a", a.into()),
            StructField::new("b", Token::Array(b.into_iter().map(Token::from).collect())),
        ])
    };
    check(
        "tuple[]",
        &components,
        Token::Array(vec![element(-1, vec![1, 0]), element(1, vec![2, -1])]),
        concat!(
            // tuple length
            "0000000000000000000000000000000000000000000000000000000000000002",
            // tuple[0] offset
            "0000000000000000000000000000000000000000000000000000000000000040",
            // tuple[1] offset
            "00000000000000000000000000000000000000000000000000000000000000e0",
            // tuple[0].a
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            // tuple[0].b offset
            "0000000000000000000000000000000000000000000000000000000000000040",
            // tuple[0].b length
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000000",
            // tuple[1].a
            "0000000000000000000000000000000000000000000000000000000000000001",
            // tuple[1].b offset
            "0000000000000000000000000000000000000000000000000000000000000040",
            // tuple[1].b length
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        ),
    );
}

#[test]
fn pack_static_tuple_array() {
    let components = vec![Component::new("a", "int256"), Component::new("b", "int256")];
    let element = |a: i64, b: i64| {
        Token::Struct(vec![
            StructField::new("a", a.into()),
            StructField::new("b", b.into()),
        ])
    };
    check(
        "tuple[2]",
        &components,
        Token::Array(vec![element(-1, 1), element(1, -1)]),
        concat!(
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        ),
    );
}

#[test]
fn pack_dynamic_tuple_array() {
    let components = vec![Component::new("a", "int256[]")];
    let element = |values: Vec<i64>| {
        Token::Struct(vec![StructField::new(
            "a",
            Token::Array(values.into_iter().map(Token::from).collect()),
        )])
    };
    check(
        "tuple[2]",
        &components,
        Token::Array(vec![element(vec![-1, 1]), element(vec![1, -1])]),
        concat!(
            // tuple[0] offset
            "0000000000000000000000000000000000000000000000000000000000000040",
            // tuple[1] offset
            "00000000000000000000000000000000000000000000000000000000000000c0",
            // tuple[0].a offset
            "0000000000000000000000000000000000000000000000000000000000000020",
            // tuple[0].a length
            "0000000000000000000000000000000000000000000000000000000000000002",
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            "0000000000000000000000000000000000000000000000000000000000000001",
            // tuple[1].a offset
            "0000000000000000000000000000000000000000000000000000000000000020",
            // tuple[1].a length
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        ),
    );
}

fn sample_abi() -> Abi {
    Abi::new(vec![
        Method::new("slice", vec![Param::new("inputs", "uint32[]").unwrap()]),
        Method::new(
            "sliceAddress",
            vec![Param::new("inputs", "address[]").unwrap()],
        ),
        Method::new(
            "sliceMultiAddress",
            vec![
                Param::new("a", "address[]").unwrap(),
                Param::new("b", "address[]").unwrap(),
            ],
        ),
        Method::new(
            "nestedArray",
            vec![
                Param::new("a", "uint256[2][2]").unwrap(),
                Param::new("b", "address[]").unwrap(),
            ],
        ),
        Method::new("nestedArray2", vec![Param::new("a", "uint8[][2]").unwrap()]),
        Method::new("nestedSlice", vec![Param::new("a", "uint8[][]").unwrap()]),
        Method::new("balance", vec![]),
    ])
}

fn expect_call(abi: &Abi, name: &str, args: &[Token], body_hex: &str) {
    let packed = abi.pack(name, args).unwrap();
    let mut expected = abi.method(name).unwrap().id().to_vec();
    expected.extend(hex_str_to_bytes(body_hex).unwrap());
    assert_eq!(packed, expected, "packing a call to {name}");
}

#[test]
fn method_pack_slice() {
    expect_call(
        &sample_abi(),
        "slice",
        &[Token::Array(vec![1u32.into(), 2u32.into()])],
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002"
        ),
    );
}

#[test]
fn method_pack_address_slices() {
    let abi = sample_abi();
    expect_call(
        &abi,
        "sliceAddress",
        &[Token::Array(vec![addr(1).into(), addr(2).into()])],
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000100000000000000000000000000000000000000",
            "0000000000000000000000000200000000000000000000000000000000000000"
        ),
    );
    expect_call(
        &abi,
        "sliceMultiAddress",
        &[
            Token::Array(vec![addr(1).into(), addr(2).into()]),
            Token::Array(vec![addr(3).into(), addr(4).into()]),
        ],
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000040",
            "00000000000000000000000000000000000000000000000000000000000000a0",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000100000000000000000000000000000000000000",
            "0000000000000000000000000200000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000300000000000000000000000000000000000000",
            "0000000000000000000000000400000000000000000000000000000000000000"
        ),
    );
}

#[test]
fn method_pack_nested_arrays() {
    let abi = sample_abi();
    expect_call(
        &abi,
        "nestedArray",
        &[
            Token::Array(vec![
                Token::Array(vec![1u8.into(), 1u8.into()]),
                Token::Array(vec![2u8.into(), 0u8.into()]),
            ]),
            Token::Array(vec![addr(3).into(), addr(4).into()]),
        ],
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "00000000000000000000000000000000000000000000000000000000000000a0",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000300000000000000000000000000000000000000",
            "0000000000000000000000000400000000000000000000000000000000000000"
        ),
    );
    expect_call(
        &abi,
        "nestedArray2",
        &[Token::Array(vec![
            Token::Array(vec![1u8.into()]),
            Token::Array(vec![1u8.into()]),
        ])],
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000040",
            "0000000000000000000000000000000000000000000000000000000000000080",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001"
        ),
    );
    expect_call(
        &abi,
        "nestedSlice",
        &[Token::Array(vec![
            Token::Array(vec![1u8.into(), 2u8.into()]),
            Token::Array(vec![1u8.into(), 2u8.into()]),
        ])],
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000040",
            "00000000000000000000000000000000000000000000000000000000000000a0",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002"
        ),
    );
}

#[test]
fn method_pack_no_arguments() {
    let abi = sample_abi();
    let packed = abi.pack("balance", &[]).unwrap();
    assert_eq!(packed, abi.method("balance").unwrap().id().to_vec());
}

#[test]
fn components_parsed_from_json_fragment() {
    // the component list of a tuple comes straight out of a JSON
    // interface description
    let components: Vec<Component> = serde_json::from_str(
        r#"[
            {"name": "a", "type": "uint256"},
            {"name": "b", "type": "string"}
        ]"#,
    )
    .unwrap();
    let token = Token::Struct(vec![
        StructField::new("a", 1u8.into()),
        StructField::new("b", "x".into()),
    ]);
    check(
        "tuple",
        &components,
        token,
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000040",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "7800000000000000000000000000000000000000000000000000000000000000"
        ),
    );
}
