//! # Introduction
//! Candor is a low-level encoder for the Ethereum contract ABI written in
//! pure Rust.
//!
//! ## Features
//! * Textual type descriptors (`uint256`, `bytes32[4]`, `tuple` with
//!   components) parsed into immutable, shareable type trees
//! * The full head/tail slot layout, including nested dynamic arrays and
//!   tuples
//! * Range checked two's complement encoding for every integer width,
//!   backed by arbitrary precision numbers
//! * Struct to tuple field matching with `abi` style aliases
//! * Method selectors derived from canonical signatures
//!
//! ## Getting started
//! Bind a method once, then pack calls against it:
//! ```rust
//! use candor::{Abi, Address, Method, Param};
//!
//! let transfer = Method::new(
//!     "transfer",
//!     vec![
//!         Param::new("dst", "address").unwrap(),
//!         Param::new("amount", "uint256").unwrap(),
//!     ],
//! );
//! assert_eq!(transfer.signature(), "transfer(address,uint256)");
//!
//! let abi = Abi::new(vec![transfer]);
//! let dst: Address = "0x0102030405060708090a0b0c0d0e0f1011121314"
//!     .parse()
//!     .unwrap();
//! let payload = abi.pack("transfer", &[dst.into(), 100u32.into()]).unwrap();
//!
//! // the well known ERC20 transfer selector, then two argument slots
//! assert_eq!(payload[0..4], [0xa9, 0x05, 0x9c, 0xbb]);
//! assert_eq!(payload.len(), 4 + 64);
//! ```
//!
//! One-off calls can skip the method binding entirely:
//! ```rust
//! use candor::encode_call;
//!
//! let payload = encode_call("baz(uint32,bool)", &[69u32.into(), true.into()]).unwrap();
//! assert_eq!(payload.len(), 4 + 64);
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

extern crate num_bigint;
extern crate num_traits;
extern crate serde;
extern crate sha3;
#[macro_use]
extern crate serde_derive;
extern crate num256;

pub mod address;
pub mod error;
pub mod function;
pub mod pack;
pub mod token;
pub mod types;
pub mod utils;

pub use address::Address;
pub use error::Error;
pub use function::{
    derive_method_id, derive_signature, encode_call, encode_tokens, Abi, Method, Param,
};
pub use pack::pack_num;
pub use token::{StructField, Token};
pub use types::{Component, Kind, Type};
