use num_integer::Integer;

/// The type used for storage words in an occupancy map.
type OccupancyWord = u64;

/// Number of slots tracked by each occupancy word.
///
/// Every line capacity must be a positive multiple of this value.
pub const OCCUPANCY_WORD_BITS: usize = OccupancyWord::BITS as usize;

/// One bit per slot of a line, set when the slot holds a live value.
///
/// The map is sized once at construction and never resized.
///
/// # Finding a vacant slot
///
/// We always hand out the lowest-index vacant slot. To avoid rescanning words that are
/// known to be full, we remember the index of the lowest word that still has a clear bit.
/// Every word before it is full. Filling that word moves the hint forward to the next word
/// with a clear bit; vacating a slot in an earlier word moves the hint back. Within a word,
/// the lowest clear bit is found by complementing the word and counting trailing zeros.
#[derive(Debug)]
pub(crate) struct OccupancyMap {
    words: Box<[OccupancyWord]>,

    /// Index of the lowest word with at least one clear bit.
    /// Equal to `words.len()` if every slot is occupied.
    first_open_word: usize,
}

impl OccupancyMap {
    /// Creates a map for `capacity` slots, all of them vacant.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a multiple of [`OCCUPANCY_WORD_BITS`].
    #[must_use]
    pub(crate) fn new(capacity: usize) -> Self {
        let (word_count, remainder) = capacity.div_rem(&OCCUPANCY_WORD_BITS);

        assert!(
            remainder == 0,
            "occupancy map capacity {capacity} is not a multiple of {OCCUPANCY_WORD_BITS}"
        );

        Self {
            words: vec![0; word_count].into_boxed_slice(),
            first_open_word: 0,
        }
    }

    #[must_use]
    pub(crate) fn capacity(&self) -> usize {
        self.words
            .len()
            .checked_mul(OCCUPANCY_WORD_BITS)
            .expect("the map was created from a usize capacity, so this cannot overflow")
    }

    /// Number of occupied slots.
    #[must_use]
    pub(crate) fn count_occupied(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    #[must_use]
    pub(crate) fn is_full(&self) -> bool {
        self.first_open_word >= self.words.len()
    }

    /// Index of the lowest vacant slot or `None` if all slots are occupied.
    #[must_use]
    pub(crate) fn first_vacant(&self) -> Option<usize> {
        let word = self.words.get(self.first_open_word)?;

        let bit_index = (!*word).trailing_zeros() as usize;

        debug_assert!(
            bit_index < OCCUPANCY_WORD_BITS,
            "word {} was tracked as open but has no clear bit",
            self.first_open_word
        );

        // Cannot overflow because the result is a slot index below our usize capacity.
        Some(
            self.first_open_word
                .wrapping_mul(OCCUPANCY_WORD_BITS)
                .wrapping_add(bit_index),
        )
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[must_use]
    pub(crate) fn is_occupied(&self, index: usize) -> bool {
        let (word_index, bit_index) = self.locate(index);

        let word = self
            .words
            .get(word_index)
            .expect("guarded by bounds check in locate()");

        get_bit(*word, bit_index)
    }

    /// Marks the slot as occupied, returning whether it already was.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub(crate) fn occupy(&mut self, index: usize) -> bool {
        let (word_index, bit_index) = self.locate(index);

        let word = self
            .words
            .get_mut(word_index)
            .expect("guarded by bounds check in locate()");

        let was_occupied = get_bit(*word, bit_index);
        set_bit(word, bit_index);

        let word_is_full = *word == OccupancyWord::MAX;

        if word_is_full && word_index == self.first_open_word {
            self.advance_first_open_word();
        }

        #[cfg(debug_assertions)]
        self.integrity_check();

        was_occupied
    }

    /// Marks the slot as vacant, returning whether it was occupied.
    ///
    /// Vacating an already vacant slot is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub(crate) fn vacate(&mut self, index: usize) -> bool {
        let (word_index, bit_index) = self.locate(index);

        let word = self
            .words
            .get_mut(word_index)
            .expect("guarded by bounds check in locate()");

        let was_occupied = get_bit(*word, bit_index);
        clear_bit(word, bit_index);

        if word_index < self.first_open_word {
            self.first_open_word = word_index;
        }

        #[cfg(debug_assertions)]
        self.integrity_check();

        was_occupied
    }

    fn locate(&self, index: usize) -> (usize, usize) {
        assert!(
            index < self.capacity(),
            "slot {index} out of bounds in occupancy map of capacity {}",
            self.capacity()
        );

        index.div_rem(&OCCUPANCY_WORD_BITS)
    }

    fn advance_first_open_word(&mut self) {
        // Every word before the current one is full, so only later words need a look.
        // Will not wrap because the index never exceeds the word count.
        let search_start = self.first_open_word.wrapping_add(1);

        self.first_open_word = self
            .words
            .iter()
            .skip(search_start)
            .position(|word| *word != OccupancyWord::MAX)
            .map_or(self.words.len(), |offset| search_start.wrapping_add(offset));
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    fn integrity_check(&self) {
        let expected = self
            .words
            .iter()
            .position(|word| *word != OccupancyWord::MAX)
            .unwrap_or(self.words.len());

        assert!(
            self.first_open_word == expected,
            "first open word {} does not match the observed first open word {}",
            self.first_open_word,
            expected
        );
    }
}

fn get_bit(word: OccupancyWord, bit_index: usize) -> bool {
    (word & (1 << bit_index)) != 0
}

fn set_bit(word: &mut OccupancyWord, bit_index: usize) {
    *word |= 1 << bit_index;
}

fn clear_bit(word: &mut OccupancyWord, bit_index: usize) {
    *word &= !(1 << bit_index);
}
