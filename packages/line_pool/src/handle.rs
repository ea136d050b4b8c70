use std::fmt;

/// Addresses one slot of a [`LinePool`][crate::LinePool] or [`SyncLinePool`][crate::SyncLinePool].
///
/// Handles are returned by insertion and are used to read or remove the stored value.
///
/// # Handle reuse
///
/// A handle is only meaningful between the insert that returned it and the remove that
/// frees its slot. After removal, the slot may be handed out again by a later insert, at
/// which point the old handle silently refers to the new value. The pool does not track
/// handle generations, so keeping handles fresh is the caller's responsibility.
///
/// # Example
///
/// ```rust
/// use line_pool::LinePool;
///
/// let mut pool = LinePool::new(0_u64, &[64, 64]).unwrap();
///
/// let handle = pool.insert(42, 1).unwrap();
///
/// assert_eq!(handle.line(), 1);
/// assert_eq!(handle.entry(), 0);
/// assert_eq!(pool.get(handle).unwrap(), 42);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    line: usize,
    entry: usize,
}

impl Handle {
    #[must_use]
    pub(crate) const fn new(line: usize, entry: usize) -> Self {
        Self { line, entry }
    }

    /// Index of the line that holds the slot.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Index of the slot within its line.
    #[must_use]
    pub const fn entry(&self) -> usize {
        self.entry
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(line {}, entry {})", self.line, self.entry)
    }
}
