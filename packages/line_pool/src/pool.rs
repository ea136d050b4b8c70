use std::any::type_name;

use tracing::{debug, trace};

use crate::builder::validate_capacities;
use crate::{Error, Handle, Line, LinePoolBuilder, Result};

/// A fixed-capacity object pool split into independently addressed lines.
///
/// Each line is a preallocated array of slots paired with an occupancy bitmap holding one bit
/// per slot. The caller chooses the line for every insert; the pool never balances load
/// between lines and a full line never borrows capacity from another.
///
/// Values are copied in on [`insert()`][1] and copied out on [`get()`][2]. The pool never hands
/// out references into its storage.
///
/// # Slot assignment
///
/// Within a line, an insert always takes the lowest-index vacant slot. Given the same sequence
/// of inserts and removes, the same handles are returned every time.
///
/// # Resource usage
///
/// All storage is allocated when the pool is built and the geometry never changes. Use
/// [`reserved_bytes()`][3] to see how much item storage the pool has reserved.
///
/// # Thread safety
///
/// Mutation requires `&mut self`, so concurrent use must be serialized by the caller. Use
/// [`SyncLinePool`][crate::SyncLinePool] to let threads operate on different lines without
/// external locking.
///
/// # Example
///
/// ```rust
/// use line_pool::LinePool;
///
/// let mut pool = LinePool::new(0_u64, &[64, 64]).unwrap();
///
/// let handle = pool.insert(1234, 0).unwrap();
/// assert_eq!(pool.get(handle).unwrap(), 1234);
///
/// pool.remove(handle).unwrap();
/// assert!(pool.is_empty());
/// ```
///
/// [1]: Self::insert
/// [2]: Self::get
/// [3]: Self::reserved_bytes
#[derive(Debug)]
pub struct LinePool<T> {
    lines: Box<[Line<T>]>,
}

impl<T: Copy> LinePool<T> {
    /// Creates a pool with one line per entry in `capacities`.
    ///
    /// Every slot is initialized with `representative`, which also fixes the item type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLineCapacity`] for the first line whose capacity is zero or
    /// not a multiple of [`OCCUPANCY_WORD_BITS`][crate::OCCUPANCY_WORD_BITS]. No pool is
    /// created in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use line_pool::{Error, LinePool};
    ///
    /// let pool = LinePool::new([0_u8; 24], &[64, 64, 64, 64]).unwrap();
    /// assert_eq!(pool.reserved_bytes(), 24 * 256);
    ///
    /// let result = LinePool::new(0_u8, &[64, 63]);
    /// assert!(matches!(
    ///     result,
    ///     Err(Error::InvalidLineCapacity {
    ///         line: 1,
    ///         capacity: 63
    ///     })
    /// ));
    /// ```
    pub fn new(representative: T, capacities: &[usize]) -> Result<Self> {
        validate_capacities::<T>(capacities)?;

        let lines = capacities
            .iter()
            .map(|&capacity| Line::new(representative, capacity))
            .collect::<Box<[_]>>();

        let pool = Self { lines };

        debug!(
            item_type = type_name::<T>(),
            line_count = pool.line_count(),
            capacity = pool.capacity(),
            reserved_bytes = pool.reserved_bytes(),
            "created line pool"
        );

        Ok(pool)
    }

    /// Starts building a new [`LinePool`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use line_pool::LinePool;
    ///
    /// let pool = LinePool::builder().lines(2, 64).build(0_i32).unwrap();
    ///
    /// assert_eq!(pool.line_count(), 2);
    /// ```
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
    ///
    /// # Example
    ///
    /// ```rust
    /// use line_pool::LinePool;
    ///
    /// let mut pool = LinePool::new(0_u32, &[64]).unwrap();
    ///
    /// let first = pool.insert(10, 0).unwrap();
    /// let second = pool.insert(20, 0).unwrap();
    ///
    /// assert_eq!(first.entry(), 0);
    /// assert_eq!(second.entry(), 1);
    /// ```
    pub fn insert(&mut self, value: T, line: usize) -> Result<Handle> {
        let line_count = self.line_count();

        let target = self
            .lines
            .get_mut(line)
            .ok_or(Error::LineOutOfRange { line, line_count })?;

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
    /// slot is vacant. A handle whose slot was removed and then reused by a later insert
    /// returns the newer value; see [`Handle`] for details.
    pub fn get(&self, handle: Handle) -> Result<T> {
        self.lines
            .get(handle.line())
            .and_then(|line| line.get(handle.entry()))
            .ok_or(Error::InvalidHandle { handle })
    }

    /// Frees the slot addressed by `handle` so a later insert may reuse it.
    ///
    /// The stored value is not touched until it is overwritten. Removing a slot that is
    /// already vacant is accepted and has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if the handle lies outside the pool geometry.
    pub fn remove(&mut self, handle: Handle) -> Result<()> {
        let line = self
            .lines
            .get_mut(handle.line())
            .filter(|line| handle.entry() < line.capacity())
            .ok_or(Error::InvalidHandle { handle })?;

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
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.lines
            .get(handle.line())
            .is_some_and(|line| line.is_occupied(handle.entry()))
    }

    /// Bytes of item storage reserved by the pool.
    ///
    /// This is the size of `T` multiplied by the total capacity of all lines. It reflects the
    /// fixed geometry of the pool and does not change as items are inserted or removed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use line_pool::LinePool;
    ///
    /// let mut pool = LinePool::new(0_u64, &[64, 128]).unwrap();
    /// assert_eq!(pool.reserved_bytes(), 8 * 192);
    ///
    /// pool.insert(1, 0).unwrap();
    /// assert_eq!(pool.reserved_bytes(), 8 * 192);
    /// ```
    #[must_use]
    pub fn reserved_bytes(&self) -> usize {
        self.object_size()
            .checked_mul(self.capacity())
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

    /// Number of slots in `line`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfRange`] if the pool has no such line.
    pub fn line_capacity(&self, line: usize) -> Result<usize> {
        self.line(line).map(Line::capacity)
    }

    /// Number of occupied slots in `line`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfRange`] if the pool has no such line.
    pub fn line_len(&self, line: usize) -> Result<usize> {
        self.line(line).map(Line::len)
    }

    /// Whether every slot of `line` is occupied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfRange`] if the pool has no such line.
    pub fn is_line_full(&self, line: usize) -> Result<bool> {
        self.line(line).map(Line::is_full)
    }

    /// Total number of slots across all lines.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lines.iter().map(Line::capacity).sum()
    }

    /// Number of occupied slots across all lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }

    /// Whether no slot in the pool is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.len() == 0)
    }

    fn line(&self, line: usize) -> Result<&Line<T>> {
        self.lines.get(line).ok_or(Error::LineOutOfRange {
            line,
            line_count: self.line_count(),
        })
    }
}
