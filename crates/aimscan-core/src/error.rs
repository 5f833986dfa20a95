//! Shared error types.

use std::error::Error;
use std::fmt;

/// The operation observed a cancelled [`CancelToken`](crate::CancelToken)
/// and stopped without producing a result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation cancelled")
    }
}

impl Error for Cancelled {}
