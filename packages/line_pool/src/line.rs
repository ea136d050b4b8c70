use std::any::type_name;

use crate::OccupancyMap;

/// Fixed-capacity backing storage for one line of a pool.
///
/// Slots are a flat array of `T` pre-filled with a representative value, paired with an
/// occupancy map that decides which slots hold live values. Removing a value only clears its
/// occupancy bit. The stale value stays in the slot until a later insert overwrites it.
#[derive(Debug)]
pub(crate) struct Line<T> {
    slots: Box<[T]>,

    occupancy: OccupancyMap,
}

impl<T: Copy> Line<T> {
    /// Creates a line of `capacity` vacant slots, each initialized to `filler`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a multiple of the occupancy word width.
    #[must_use]
    pub(crate) fn new(filler: T, capacity: usize) -> Self {
        Self {
            slots: vec![filler; capacity].into_boxed_slice(),
            occupancy: OccupancyMap::new(capacity),
        }
    }

    #[must_use]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.occupancy.count_occupied()
    }

    #[must_use]
    pub(crate) fn is_full(&self) -> bool {
        self.occupancy.is_full()
    }

    /// Whether `entry` is in bounds and holds a live value.
    #[must_use]
    pub(crate) fn is_occupied(&self, entry: usize) -> bool {
        entry < self.capacity() && self.occupancy.is_occupied(entry)
    }

    /// Stores the value in the lowest-index vacant slot and returns that slot's index.
    ///
    /// Returns `None` without touching any slot if the line is full.
    pub(crate) fn insert(&mut self, value: T) -> Option<usize> {
        let entry = self.occupancy.first_vacant()?;
        let capacity = self.capacity();

        let slot = self.slots.get_mut(entry).unwrap_or_else(|| {
            panic!(
                "occupancy map offered slot {entry} beyond line capacity {capacity} for {}",
                type_name::<T>()
            )
        });

        *slot = value;

        let was_occupied = self.occupancy.occupy(entry);
        debug_assert!(!was_occupied, "slot {entry} was offered as vacant but was occupied");

        Some(entry)
    }

    /// Returns a copy of the value at `entry`, or `None` if the slot is out of bounds
    /// or vacant.
    #[must_use]
    pub(crate) fn get(&self, entry: usize) -> Option<T> {
        if !self.is_occupied(entry) {
            return None;
        }

        self.slots.get(entry).copied()
    }

    /// Marks the slot at `entry` as vacant, returning whether it was occupied.
    ///
    /// The slot contents are left in place.
    ///
    /// # Panics
    ///
    /// Panics if `entry` is out of bounds.
    pub(crate) fn remove(&mut self, entry: usize) -> bool {
        self.occupancy.vacate(entry)
    }
}
