use std::fmt;
use std::num::ParseIntError;
use std::str::Utf8Error;

/// Custom error implementation that describes possible
/// error states.
///
/// This is shared by a whole crate.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// A type descriptor failed to parse or violates an ABI constraint,
    /// the payload names the offending descriptor
    InvalidType(String),
    /// The named method is not part of the bound contract interface
    MethodNotFound(String),
    /// A supplied value has the wrong shape for the declared type
    TypeMismatch {
        path: String,
        expected: String,
        got: String,
    },
    /// A fixed length array or fixed bytes value disagrees with the
    /// declared length
    LengthMismatch {
        path: String,
        expected: usize,
        got: usize,
    },
    /// A numeric value does not fit the declared integer width
    IntegerOverflow { path: String, value: String },
    /// A declared tuple field could not be matched to any struct field
    FieldNotFound { path: String, field: String },
    /// A declared tuple field matched more than one struct field
    AmbiguousField { path: String, field: String },
    InvalidAddressLength { got: usize, expected: usize },
    InvalidUtf8(Utf8Error),
    InvalidHex(ParseIntError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidType(descriptor) => write!(f, "Invalid type {descriptor}"),
            Error::MethodNotFound(name) => write!(f, "Method {name} not found"),
            Error::TypeMismatch {
                path,
                expected,
                got,
            } => write!(f, "Type mismatch at {path}, expected {expected} got {got}"),
            Error::LengthMismatch {
                path,
                expected,
                got,
            } => write!(
                f,
                "Length mismatch at {path}, expected {expected} elements got {got}"
            ),
            Error::IntegerOverflow { path, value } => {
                write!(f, "Integer overflow at {path}, {value} does not fit")
            }
            Error::FieldNotFound { path, field } => {
                write!(f, "No struct field found for {field} at {path}")
            }
            Error::AmbiguousField { path, field } => {
                write!(f, "More than one struct field matches {field} at {path}")
            }
            Error::InvalidAddressLength { got, expected } => {
                write!(f, "Invalid address length, got {got} expected {expected}")
            }
            Error::InvalidUtf8(_) => write!(f, "Failed to parse bytes as utf8"),
            Error::InvalidHex(_) => write!(f, "Invalid hex character"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidUtf8(inner) => Some(inner),
            Error::InvalidHex(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<Utf8Error> for Error {
    fn from(e: Utf8Error) -> Self {
        Error::InvalidUtf8(e)
    }
}

impl From<ParseIntError> for Error {
    fn from(e: ParseIntError) -> Self {
        Error::InvalidHex(e)
    }
}
