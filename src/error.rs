//! Contains result and error type for FBX decoder.

use std::error;
use std::fmt;
use std::io;

use crate::property::PropertyType;


pub type Result<T> = ::std::result::Result<T, Error>;

/// Decode or access error.
///
/// Any error emitted while decoding aborts the whole parse, and no partial document is
/// returned.
#[derive(Debug)]
pub enum Error {
    /// The stream does not start with the FBX binary magic.
    BadHeader,
    /// Format version is outside of the supported range (7400 to 7599).
    UnsupportedVersion(u32),
    /// Reached unexpected EOF in the middle of a field.
    TruncatedInput,
    /// Got a property type tag which is not known.
    ///
    /// The payload length of an unknown property cannot be known, so parsing cannot continue.
    UnrecognizedPropertyTag {
        /// The tag byte.
        tag: u8,
        /// Stream position of the tag byte.
        position: u64,
    },
    /// A typed accessor was called for a property of another type.
    PropertyTypeMismatch {
        /// Type the accessor reads.
        expected: PropertyType,
        /// Actual type of the property.
        actual: PropertyType,
    },
    /// Memory for a buffer of the given byte size could not be allocated.
    AllocationFailure(usize),
    /// No node has the requested name.
    NodeNotFound(String),
    /// Corrupted or inconsistent FBX data detected.
    DataError(String),
    /// Nodes are nested deeper than the configured limit.
    DepthLimitExceeded(usize),
    /// I/O operation error.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::BadHeader => write!(f, "Invalid magic header: Non-FBX or corrupted data?"),
            Error::UnsupportedVersion(v) => write!(f, "Unsupported FBX version: {}", v),
            Error::TruncatedInput => write!(f, "Unexpected EOF"),
            Error::UnrecognizedPropertyTag { tag, position } => {
                write!(f, "Unknown property type code {:#x} at offset {}", tag, position)
            },
            Error::PropertyTypeMismatch { expected, actual } => {
                write!(f, "Property type mismatch: expected {}, but property is {}", expected, actual)
            },
            Error::AllocationFailure(size) => write!(f, "Failed to allocate {} bytes", size),
            Error::NodeNotFound(ref name) => write!(f, "Node not found: {:?}", name),
            Error::DataError(ref err) => write!(f, "Invalid data: {}", err),
            Error::DepthLimitExceeded(depth) => write!(f, "Nodes are nested deeper than {} levels", depth),
            Error::Io(ref err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::TruncatedInput
        } else {
            Error::Io(err)
        }
    }
}
