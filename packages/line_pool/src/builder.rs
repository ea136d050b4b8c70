use std::any::type_name;
use std::iter;
use std::marker::PhantomData;

use num_integer::Integer;
use tracing::debug;

use crate::{Error, LinePool, OCCUPANCY_WORD_BITS, Result, SyncLinePool};

/// Builder for creating an instance of [`LinePool`] or [`SyncLinePool`].
///
/// The builder collects the pool geometry one line at a time. Lines are numbered in the order
/// they are added, starting from zero. Every line capacity must be a positive multiple of
/// [`OCCUPANCY_WORD_BITS`]; this is checked when the pool is built.
///
/// # Examples
///
/// ```
/// use line_pool::LinePool;
///
/// let pool = LinePool::builder()
///     .lines(4, 64)
///     .line(128)
///     .build(0_u64)
///     .unwrap();
///
/// assert_eq!(pool.line_count(), 5);
/// assert_eq!(pool.capacity(), 4 * 64 + 128);
/// ```
#[must_use]
pub struct LinePoolBuilder<T> {
    capacities: Vec<usize>,

    _item: PhantomData<T>,
}

impl<T> std::fmt::Debug for LinePoolBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinePoolBuilder")
            .field(
                "item_type",
                &std::format_args!("{}", type_name::<T>()),
            )
            .field("capacities", &self.capacities)
            .finish()
    }
}

impl<T: Copy> LinePoolBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacities: Vec::new(),
            _item: PhantomData,
        }
    }

    /// Adds one line with the given capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use line_pool::LinePool;
    ///
    /// let pool = LinePool::builder().line(64).line(192).build(0_u8).unwrap();
    ///
    /// assert_eq!(pool.line_capacity(1).unwrap(), 192);
    /// ```
    pub fn line(mut self, capacity: usize) -> Self {
        self.capacities.push(capacity);
        self
    }

    /// Adds `count` lines, each with the given capacity.
    pub fn lines(mut self, count: usize, capacity: usize) -> Self {
        self.capacities.extend(iter::repeat_n(capacity, count));
        self
    }

    /// Adds one line for each capacity yielded by the iterator.
    pub fn capacities(mut self, capacities: impl IntoIterator<Item = usize>) -> Self {
        self.capacities.extend(capacities);
        self
    }

    /// Builds a [`LinePool`] with the configured geometry.
    ///
    /// Every slot is initialized with `representative`, which also fixes the item type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLineCapacity`] for the first line whose capacity is zero or
    /// not a multiple of [`OCCUPANCY_WORD_BITS`]. No pool is created in that case.
    pub fn build(self, representative: T) -> Result<LinePool<T>> {
        LinePool::new(representative, &self.capacities)
    }

    /// Builds a [`SyncLinePool`] with the configured geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLineCapacity`] for the first line whose capacity is zero or
    /// not a multiple of [`OCCUPANCY_WORD_BITS`]. No pool is created in that case.
    pub fn build_sync(self, representative: T) -> Result<SyncLinePool<T>> {
        SyncLinePool::new(representative, &self.capacities)
    }
}

/// Checks that every capacity is a positive multiple of the occupancy word width.
pub(crate) fn validate_capacities<T>(capacities: &[usize]) -> Result<()> {
    for (line, &capacity) in capacities.iter().enumerate() {
        let (_, remainder) = capacity.div_rem(&OCCUPANCY_WORD_BITS);

        if capacity == 0 || remainder != 0 {
            debug!(
                item_type = type_name::<T>(),
                line, capacity, "rejected line pool geometry"
            );

            return Err(Error::InvalidLineCapacity { line, capacity });
        }
    }

    Ok(())
}
