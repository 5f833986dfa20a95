//! Error types for demo decoding.

use std::fmt;
use std::io;

use aimscan_core::Cancelled;

/// Errors that can occur while decoding or encoding a demo stream.
///
/// Any error aborts the whole decode; no partial [`Replay`](crate::Replay)
/// is ever returned alongside one.
#[derive(Debug)]
pub enum DemoError {
    /// An I/O error other than end-of-stream occurred.
    Io(io::Error),
    /// The stream does not start with the `ETLDEMO2` magic.
    InvalidMagic {
        /// The eight bytes actually found.
        found: [u8; 8],
    },
    /// A record tag byte is not one of the known record kinds.
    UnknownRecordTag {
        /// The unrecognized tag.
        tag: u8,
        /// Byte offset of the tag within the stream.
        offset: u64,
    },
    /// The stream ended in the middle of a record.
    Truncated {
        /// What was being read when the stream ran out.
        detail: String,
    },
    /// An entity index outside `[0, MAX_ENTITIES)`.
    EntityIndexOutOfRange {
        /// The offending index as encoded.
        index: i32,
    },
    /// A NUL-terminated string was unreadable.
    InvalidString {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// Decoding was cancelled through a [`CancelToken`](aimscan_core::CancelToken).
    Cancelled,
}

impl DemoError {
    /// Map a read failure, turning end-of-stream into [`DemoError::Truncated`].
    pub(crate) fn from_read(e: io::Error, what: &str) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated {
                detail: format!("stream ended while reading {what}"),
            }
        } else {
            Self::Io(e)
        }
    }
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic { found } => {
                write!(
                    f,
                    "invalid magic bytes {:?} (expected b\"ETLDEMO2\")",
                    String::from_utf8_lossy(found)
                )
            }
            Self::UnknownRecordTag { tag, offset } => {
                write!(f, "unknown record tag {tag} at offset {offset}")
            }
            Self::Truncated { detail } => write!(f, "truncated demo: {detail}"),
            Self::EntityIndexOutOfRange { index } => {
                write!(f, "entity index {index} out of range")
            }
            Self::InvalidString { detail } => write!(f, "invalid string: {detail}"),
            Self::Cancelled => write!(f, "decoding cancelled"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<Cancelled> for DemoError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
