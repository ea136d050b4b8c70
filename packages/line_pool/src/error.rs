use thiserror::Error;

use crate::{Handle, OCCUPANCY_WORD_BITS};

/// Errors that can occur when constructing or operating a line pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A requested line capacity was zero or not a multiple of [`OCCUPANCY_WORD_BITS`].
    ///
    /// Construction fails as a whole when this is returned. Only the first offending line
    /// is reported.
    #[error(
        "invalid capacity {capacity} for line {line}: must be a positive multiple of {}",
        OCCUPANCY_WORD_BITS
    )]
    InvalidLineCapacity {
        /// Index of the first line with an invalid capacity.
        line: usize,

        /// The capacity that was requested for that line.
        capacity: usize,
    },

    /// An insert targeted a line in which every slot is occupied.
    ///
    /// The pool is left unchanged. The caller may retry against a different line.
    #[error("cannot insert into line {line} because it is full")]
    LineFull {
        /// Index of the full line.
        line: usize,
    },

    /// A line index did not refer to any line of the pool.
    #[error("line {line} is out of range for a pool with {line_count} lines")]
    LineOutOfRange {
        /// The line index that was requested.
        line: usize,

        /// The number of lines in the pool.
        line_count: usize,
    },

    /// A handle did not address an occupied slot of the pool.
    ///
    /// This is reported when the handle lies outside the pool geometry or when it addresses
    /// a vacant slot. A handle whose slot has been removed and then reused by a later insert
    /// cannot be told apart from a valid one.
    #[error("handle {handle} does not refer to an occupied slot")]
    InvalidHandle {
        /// The offending handle.
        handle: Handle,
    },
}

/// A specialized `Result` type for line pool operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
