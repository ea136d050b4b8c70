#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A fixed-capacity object pool that trades lookup convenience for memory density.
//!
//! This crate provides [`LinePool`], a pool of plain `Copy` values stored in preallocated
//! contiguous arrays called lines. Instead of keeping a map from identity to value, each line
//! tracks which of its slots are in use with one bit per slot. Inserting a value returns a
//! [`Handle`] that addresses the slot, and the handle is all that is needed to read or remove
//! the value later.
//!
//! # Key Features
//!
//! - **Fixed geometry**: The number of lines and the capacity of each line are set when the pool
//!   is built and never change. A full line is reported as [`Error::LineFull`], not grown.
//! - **One bit of overhead per slot**: Each line owns `capacity / 64` occupancy words.
//! - **Amortized O(1) insert**: The lowest vacant slot is found with a trailing-zeros scan of
//!   the complemented occupancy word, starting from the lowest word known to have room.
//! - **Deterministic slot assignment**: The lowest-index vacant slot always wins.
//! - **Caller-directed routing**: The caller picks the line for every insert.
//! - **Per-line locking**: [`SyncLinePool`] guards each line with its own lock so that threads
//!   working on different lines never contend.
//!
//! # Line capacity
//!
//! Every line capacity must be a positive multiple of [`OCCUPANCY_WORD_BITS`] (64). Building a
//! pool with any other capacity fails with [`Error::InvalidLineCapacity`], naming the first
//! offending line.
//!
//! # Handles
//!
//! A [`Handle`] is a `(line, entry)` pair. It stays meaningful until the slot is removed. The
//! pool reports handles that fall outside its geometry or point at a vacant slot as
//! [`Error::InvalidHandle`], but it cannot detect a handle whose slot has since been reused
//! by a newer insert.
//!
//! # Example
//!
//! ```rust
//! use line_pool::{Error, LinePool};
//!
//! // Four lines of 64 slots, each holding a 24-byte record.
//! let mut pool = LinePool::builder().lines(4, 64).build([0_u64; 3]).unwrap();
//!
//! assert_eq!(pool.reserved_bytes(), 24 * 256);
//!
//! let handle = pool.insert([2, 1, 0xFFFF_FFFF], 3).unwrap();
//! assert_eq!(pool.get(handle).unwrap(), [2, 1, 0xFFFF_FFFF]);
//!
//! // Fill line 0 completely.
//! for value in 0..64 {
//!     pool.insert([value; 3], 0).unwrap();
//! }
//!
//! assert!(matches!(pool.insert([0; 3], 0), Err(Error::LineFull { line: 0 })));
//!
//! pool.remove(handle).unwrap();
//! assert_eq!(pool.len(), 64);
//! ```

mod builder;
mod constants;
mod error;
mod handle;
mod line;
mod occupancy;
mod pool;
mod sync_pool;

pub use builder::*;
pub(crate) use constants::*;
pub use error::*;
pub use handle::*;
pub(crate) use line::*;
pub(crate) use occupancy::OccupancyMap;
pub use occupancy::OCCUPANCY_WORD_BITS;
pub use pool::*;
pub use sync_pool::*;
