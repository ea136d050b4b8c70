use std::any::type_name;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, trace};

use crate::builder::validate_capacities;
use crate::{ERR_POISONED_LOCK, Error, Handle, Line, LinePoolBuilder, Result};

/// A thread-safe variant of [`LinePool`][crate::LinePool] with one lock per line.
///
/// All operations take `&self`, so the pool can be shared between threads (e.g. via `Arc`).
/// Each line is guarded by its own mutex: operations on different lines never contend, while
/// operations on the same line are serialized. Any thread may access any line.
///
/// Slot assignment, error reporting and size accounting behave exactly as in
/// [`LinePool`][crate::LinePool].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
///
/// use line_pool::SyncLinePool;
///
/// let pool = Arc::new(SyncLinePool::new(0_u64, &[64, 64]).unwrap());
///
/// let workers = (0..2)
///     .map(|line| {
///         let pool = Arc::clone(&pool);
///         thread::spawn(move || pool.insert(line as u64 * 100, line).unwrap())
///     })
///     .collect::<Vec<_>>();
///
/// for worker in workers {
///     let handle = worker.join().unwrap();
///     assert_eq!(pool.get(handle).unwrap(), handle.line() as u64 * 100);
/// }
/// ```
#[derive(Debug)]
pub struct SyncLinePool<T> {
    lines: Box<[Mutex<Line<T>>]>,

    /// Sum of all line capacities. Fixed at construction, so readable without locking.
    capacity: usize,
}

impl<T: Copy> SyncLinePool<T> {
    /// Creates a pool with one line per entry in `capacities`.
    ///
    /// Every slot is initialized with `representative`, which also fixes the item type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLineCapacity`] for the first line whose capacity is zero or
    /// not a multiple of [`OCCUPANCY_WORD_BITS`][crate::OCCUPANCY_WORD_BITS]. No pool is
    /// created in that case.
    pub fn new(representative: T, capacities: &[usize]) -> Result<Self> {
        validate_capacities::<T>(capacities)?;

        let lines = capacities
            .iter()
            .map(|&capacity| Mutex::new(Line::new(representative, capacity)))
            .collect::<Box<[_]>>();

        let pool = Self {
            lines,
            capacity: capacities.iter().sum(),
        };

        debug!(
            item_type = type_name::<T>(),
            line_count = pool.line_count(),
            capacity = pool.capacity(),
            reserved_bytes = pool.reserved_bytes(),
            "created sync line pool"
        );

        Ok(pool)
    }

    /// Starts building a new pool. Finish with
    /// [`build_sync()`][LinePoolBuilder::build_sync] to obtain a [`SyncLinePool`].
    pub fn builder() -> LinePoolBuilder<T> {
        LinePoolBuilder::new()
    }

    /// Stores `value` in the lowest-index vacant slot of `line`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineFull`] if every slot of the line is occupied and
    /// [`Error::LineOutOfRange`] if the pool has no such line. The pool is unchanged
    /// in both cases.
    pub fn insert(&self, value: T, line: usize) -> Result<Handle> {
        let mut target = self.lock_line(line)?;

        let Some(entry) = target.insert(value) else {
            trace!(line, "rejected insert into full line");
            return Err(Error::LineFull { line });
        };

        trace!(line, entry, "inserted item");

        Ok(Handle::new(line, entry))
    }

    /// Returns a copy of the value in the slot addressed by `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if the handle lies outside the pool geometry or its
    /// slot is vacant.
    pub fn get(&self, handle: Handle) -> Result<T> {
        let line = self.lock_line_of(handle)?;

        line.get(handle.entry())
            .ok_or(Error::InvalidHandle { handle })
    }

    /// Frees the slot addressed by `handle` so a later insert may reuse it.
    ///
    /// Removing a slot that is already vacant is accepted and has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if the handle lies outside the pool geometry.
    pub fn remove(&self, handle: Handle) -> Result<()> {
        let mut line = self.lock_line_of(handle)?;

        if handle.entry() >= line.capacity() {
            return Err(Error::InvalidHandle { handle });
        }

        let was_occupied = line.remove(handle.entry());

        trace!(
            line = handle.line(),
            entry = handle.entry(),
            was_occupied,
            "removed item"
        );

        Ok(())
    }

    /// Whether `handle` addresses an occupied slot of this pool.
    ///
    /// The answer may be outdated by the time the caller acts on it if other threads
    /// operate on the same line.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.lock_line(handle.line())
            .is_ok_and(|line| line.is_occupied(handle.entry()))
    }

    /// Bytes of item storage reserved by the pool.
    ///
    /// This reflects the fixed geometry of the pool and does not change as items are
    /// inserted or removed.
    #[must_use]
    pub fn reserved_bytes(&self) -> usize {
        self.object_size()
            .checked_mul(self.capacity)
            .expect("the storage is already allocated, so its size in bytes cannot overflow")
    }

    /// Size in bytes of one stored item.
    #[must_use]
    pub const fn object_size(&self) -> usize {
        size_of::<T>()
    }

    /// Number of lines in the pool.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of slots across all lines.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots in `line`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfRange`] if the pool has no such line.
    pub fn line_capacity(&self, line: usize) -> Result<usize> {
        self.lock_line(line).map(|line| line.capacity())
    }

    /// Number of occupied slots in `line`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfRange`] if the pool has no such line.
    pub fn line_len(&self, line: usize) -> Result<usize> {
        self.lock_line(line).map(|line| line.len())
    }

    /// Whether every slot of `line` is occupied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfRange`] if the pool has no such line.
    pub fn is_line_full(&self, line: usize) -> Result<bool> {
        self.lock_line(line).map(|line| line.is_full())
    }

    /// Number of occupied slots across all lines.
    ///
    /// Lines are inspected one at a time, so the total is not a consistent snapshot
    /// while other threads are inserting or removing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.lock().expect(ERR_POISONED_LOCK).len())
            .sum()
    }

    /// Whether no slot in the pool is occupied.
    ///
    /// Like [`len()`][Self::len], this is not a consistent snapshot under concurrent use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines
            .iter()
            .all(|line| line.lock().expect(ERR_POISONED_LOCK).len() == 0)
    }

    fn lock_line(&self, line: usize) -> Result<MutexGuard<'_, Line<T>>> {
        let mutex = self.lines.get(line).ok_or(Error::LineOutOfRange {
            line,
            line_count: self.line_count(),
        })?;

        Ok(mutex.lock().expect(ERR_POISONED_LOCK))
    }

    fn lock_line_of(&self, handle: Handle) -> Result<MutexGuard<'_, Line<T>>> {
        let mutex = self
            .lines
            .get(handle.line())
            .ok_or(Error::InvalidHandle { handle })?;

        Ok(mutex.lock().expect(ERR_POISONED_LOCK))
    }
}
