//! A raw hash table using coalesced hashing.
//!
//! The table is a single flat slot array split into a *primary region* (one
//! slot per hash bucket) and a *cellar region* (a shared pool of overflow
//! slots, as large as the primary region). Colliding entries are linked into
//! per-bucket chains through cellar slots handed out from the top of the
//! array downward, rather than being probed for or stored externally.
//!
//! Deletion is lazy: erasing an entry tombstones its slot but leaves the
//! slot threaded into its chain. Chain slots are only reclaimed when the
//! table rehashes, so repeated insert/erase cycles against one bucket
//! lengthen that bucket's chain until the next rehash. This is a deliberate
//! trade for cheap erases and is documented on [`HashTable::remove`];
//! erase-heavy workloads should expect lookup amplification on hot buckets
//! between rehashes.

use alloc::vec::Vec;
use core::fmt::Debug;

/// Primary-region sizes for each capacity tier, ascending primes.
///
/// Growing the table means stepping to the next entry; a table that would
/// need to step past the end has exceeded its design envelope and panics.
const SIZE_SCHEDULE: [usize; 23] = [
    5, 11, 23, 47, 97, 197, 397, 797, 1597, 3203, 6421, 12853, 25717, 51437, 102877, 205759,
    411527, 823117, 1646237, 3292489, 6584983, 13169977, 28973957,
];

/// Tier used for fresh tables and by [`HashTable::clear`].
const MIN_SIZE_TIER: usize = 1;

/// Cellar slots allocated per primary bucket. With a ratio of one the cellar
/// mirrors the primary region and the slot array is twice the bucket count.
const CELLAR_SLOTS_PER_BUCKET: usize = 1;

/// Maximum load factor is 3/10 of the total slot count. All load arithmetic
/// is exact rational math on integers, never floating point.
#[inline]
fn over_load_factor(count: usize, slots: usize) -> bool {
    count * 10 >= slots * 3
}

#[inline]
fn total_slots(primary_size: usize) -> usize {
    primary_size + primary_size * CELLAR_SLOTS_PER_BUCKET
}

/// Entries a table with `slots` total slots can hold before the load factor
/// forces a rehash.
#[inline]
fn capacity_for(slots: usize) -> usize {
    (slots * 3).div_ceil(10) - 1
}

/// Growth decision, kept as a pure function so the trickiest policy in the
/// table is testable in isolation.
///
/// The tier advances only when `count` exceeds 3/10 of the *current*
/// primary-region size. A rehash forced by cellar exhaustion at low count
/// keeps its tier and relies on the rebuilt, fully-reclaimed cellar to make
/// progress.
#[inline]
fn next_size_tier(size_tier: usize, primary_size: usize, count: usize) -> usize {
    if count * 10 > primary_size * 3 {
        size_tier + 1
    } else {
        size_tier
    }
}

/// One storage cell of the table.
///
/// `payload` carries the cached full hash alongside the value and is `None`
/// both for never-written slots and for tombstones. `claimed` is sticky: it
/// is set the first time a slot is written and survives deletion, because
/// insertion walks chains by claim state. `next` is the chain link; `None`
/// terminates the chain.
#[derive(Clone)]
struct Slot<V> {
    payload: Option<(u64, V)>,
    claimed: bool,
    next: Option<usize>,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Slot {
            payload: None,
            claimed: false,
            next: None,
        }
    }
}

/// A hash table using coalesced hashing with a shared overflow cellar.
///
/// `HashTable<V>` stores values of type `V` and provides insertion, lookup,
/// and removal. This is the raw layer: every operation takes the hash value
/// and an equality predicate explicitly; [`crate::HashMap`] and
/// [`crate::HashSet`] put a keyed interface on top.
///
/// Capacity follows a fixed schedule of prime primary-region sizes. The
/// table grows when its load factor crosses 3/10 or when the overflow cellar
/// runs dry, whichever happens first, and only a rehash ever reclaims
/// tombstoned slots.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use coalesced_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
/// #
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     coalesced_hash::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     coalesced_hash::hash_table::Entry::Occupied(_) => {}
/// }
///
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    primary_size: usize,
    cellar_cursor: usize,
    count: usize,
    size_tier: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("primary_size", &self.primary_size)
            .field("slots", &self.slots.len())
            .field("count", &self.count)
            .field("cellar_cursor", &self.cellar_cursor)
            .field("size_tier", &self.size_tier)
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table at the minimum capacity tier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use coalesced_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::new();
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_tier(MIN_SIZE_TIER)
    }

    /// Creates a table sized to hold at least `capacity` entries without
    /// rehashing.
    ///
    /// The table picks the first schedule tier whose load budget covers the
    /// request, so the actual capacity is usually larger than asked for.
    /// Pathological collision patterns can still exhaust the cellar and
    /// force an early rehash.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds what the largest schedule tier can hold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use coalesced_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tier = MIN_SIZE_TIER;
        while capacity_for(total_slots(SIZE_SCHEDULE[tier])) < capacity {
            tier += 1;
            assert!(
                tier < SIZE_SCHEDULE.len(),
                "requested capacity exceeds the growth schedule"
            );
        }
        Self::with_tier(tier)
    }

    fn with_tier(tier: usize) -> Self {
        let mut table = Self {
            slots: Vec::new(),
            primary_size: 0,
            cellar_cursor: 0,
            count: 0,
            size_tier: 0,
        };
        table.reset(tier);
        table
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the table contains no live entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of entries the table can hold before its load
    /// factor forces a rehash.
    ///
    /// Cellar exhaustion under heavy collisions can trigger growth earlier
    /// than this bound suggests.
    pub fn capacity(&self) -> usize {
        capacity_for(self.slots.len())
    }

    /// Removes all entries and resets the table to the minimum capacity
    /// tier, discarding the old slot array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use coalesced_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_u64(1), |&n: &u64| n == 1).or_insert(1);
    /// table.clear();
    /// assert!(table.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.reset(MIN_SIZE_TIER);
    }

    #[inline]
    fn home_index(&self, hash: u64) -> usize {
        (hash % self.primary_size as u64) as usize
    }

    #[inline]
    fn cellar_exhausted(&self) -> bool {
        self.slots[self.cellar_cursor].claimed
    }

    /// Walks the chain rooted at `hash`'s home bucket and returns the index
    /// of the slot holding a live, matching entry.
    ///
    /// The walk is structural: it follows `next` links until the chain
    /// terminates, checking every slot that still has a payload (including
    /// the terminal slot) and stepping over tombstones.
    fn find_index(&self, hash: u64, eq: &impl Fn(&V) -> bool) -> Option<usize> {
        let mut index = self.home_index(hash);
        loop {
            let slot = &self.slots[index];
            if let Some((stored, value)) = &slot.payload {
                if *stored == hash && eq(value) {
                    return Some(index);
                }
            }
            index = slot.next?;
        }
    }

    /// Returns a reference to the value matching `hash` and `eq`, if any.
    ///
    /// Lookup cost is proportional to the home bucket's chain length, not to
    /// the table size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use coalesced_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_u64(7), |&n: &u64| n == 7).or_insert(7);
    ///
    /// assert_eq!(table.find(hash_u64(7), |&n| n == 7), Some(&7));
    /// assert_eq!(table.find(hash_u64(8), |&n| n == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.find_index(hash, &eq)?;
        match &self.slots[index].payload {
            Some((_, value)) => Some(value),
            None => None,
        }
    }

    /// Returns a mutable reference to the value matching `hash` and `eq`.
    ///
    /// The returned reference must not be used to change the value in a way
    /// that alters its hash or equality.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, &eq)?;
        match &mut self.slots[index].payload {
            Some((_, value)) => Some(value),
            None => None,
        }
    }

    /// Removes the value matching `hash` and `eq`, returning it if present.
    ///
    /// Removal only tombstones the slot: the slot's claim flag and chain
    /// links are deliberately left intact, so the chain keeps its shape and
    /// later lookups step over the hole. The slot is reclaimed at the next
    /// rehash. Alternating inserts and removals against one bucket therefore
    /// consume cellar slots without raising `len`, eventually forcing a
    /// same-tier rehash.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use coalesced_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_u64(7), |&n: &u64| n == 7).or_insert(7);
    ///
    /// assert_eq!(table.remove(hash_u64(7), |&n| n == 7), Some(7));
    /// assert_eq!(table.remove(hash_u64(7), |&n| n == 7), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = self.find_index(hash, &eq)?;
        let (_, value) = self.slots[index].payload.take()?;
        self.count -= 1;
        Some(value)
    }

    /// Inserts `value` if no entry matches `hash` and `eq`.
    ///
    /// Returns `true` if the value was inserted. When a match is already
    /// present the table keeps the stored value and drops `value`; this
    /// table never overwrites on insert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use coalesced_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert!(table.insert(7, (7u64, "a"), |&(k, _)| k == 7));
    /// assert!(!table.insert(7, (7u64, "c"), |&(k, _)| k == 7));
    /// assert_eq!(table.find(7, |&(k, _)| k == 7), Some(&(7u64, "a")));
    /// ```
    pub fn insert(&mut self, hash: u64, value: V, eq: impl Fn(&V) -> bool) -> bool {
        match self.entry(hash, eq) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns the entry for the value matching `hash` and `eq`, vacant or
    /// occupied.
    ///
    /// Any growth the next insertion would need happens here, before the
    /// entry is handed out, so inserting through a [`VacantEntry`] can never
    /// move the table out from under the reference it returns.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use coalesced_hash::hash_table::Entry;
    /// # use coalesced_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(hash_str("key"), |s: &String| s == "key") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("key".to_string());
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// assert!(matches!(
    ///     table.entry(hash_str("key"), |s: &String| s == "key"),
    ///     Entry::Occupied(_)
    /// ));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        if let Some(index) = self.find_index(hash, &eq) {
            return Entry::Occupied(OccupiedEntry { table: self, index });
        }
        self.reserve_for_insert();
        Entry::Vacant(VacantEntry { table: self, hash })
    }

    /// Performs any growth owed before the next placement.
    ///
    /// The load check projects `count + 1`, which is the same trigger point
    /// as checking `count` after the insert lands. An exhausted cellar left
    /// behind by the previous placement is repaired here as well.
    fn reserve_for_insert(&mut self) {
        if self.cellar_exhausted() {
            self.rebuild(next_size_tier(self.size_tier, self.primary_size, self.count));
        } else if over_load_factor(self.count + 1, self.slots.len()) {
            self.rebuild(next_size_tier(
                self.size_tier,
                self.primary_size,
                self.count + 1,
            ));
        }
    }

    /// Places a value known to be absent, returning its slot index and
    /// whether the placement pinned the cellar cursor at the region
    /// boundary.
    ///
    /// Callers must have run [`Self::reserve_for_insert`] since the last
    /// placement.
    fn place(&mut self, hash: u64, value: V) -> (usize, bool) {
        debug_assert!(!self.cellar_exhausted());

        // Walk the home chain for a slot that is free to claim: either an
        // unclaimed slot reached mid-walk or the terminal slot.
        let mut index = self.home_index(hash);
        loop {
            let slot = &self.slots[index];
            if !slot.claimed {
                break;
            }
            match slot.next {
                Some(next) => {
                    debug_assert!(next < self.slots.len());
                    index = next;
                }
                None => break,
            }
        }

        if !self.slots[index].claimed {
            // Direct write. The slot's chain links are preserved exactly;
            // writing a value never changes chain topology.
            self.slots[index].claimed = true;
            self.slots[index].payload = Some((hash, value));
            self.count += 1;
            let exhausted = if index == self.cellar_cursor {
                self.advance_cellar_cursor()
            } else {
                false
            };
            return (index, exhausted);
        }

        // The terminal slot is occupied: extend the chain through the
        // cellar slot under the cursor.
        let link = self.cellar_cursor;
        debug_assert!(link >= self.primary_size && !self.slots[link].claimed);
        self.slots[index].next = Some(link);
        self.slots[link].claimed = true;
        self.slots[link].next = None;
        self.slots[link].payload = Some((hash, value));
        self.count += 1;
        (link, self.advance_cellar_cursor())
    }

    /// Moves the cursor down past claimed slots. Returns `true` when the
    /// cursor is pinned on a claimed slot at the primary/cellar boundary,
    /// meaning the cellar is spent and the table must rehash before the next
    /// chain extension.
    fn advance_cellar_cursor(&mut self) -> bool {
        while self.cellar_cursor > self.primary_size && self.slots[self.cellar_cursor].claimed {
            self.cellar_cursor -= 1;
        }
        self.slots[self.cellar_cursor].claimed
    }

    /// Replaces the slot array with a fresh one for `tier` and reinserts
    /// every live entry through the normal placement path.
    ///
    /// This is the only point where tombstones and abandoned chain slots are
    /// reclaimed. If the fresh cellar is spent before every entry lands
    /// (possible when one bucket owns nearly every entry), the tier is
    /// advanced and the rebuild restarts from scratch.
    fn rebuild(&mut self, tier: usize) {
        let mut tier = tier;
        let mut pending: Vec<(u64, V)> = self
            .slots
            .iter_mut()
            .filter_map(|slot| slot.payload.take())
            .collect();

        loop {
            self.reset(tier);

            let mut exhausted = false;
            while let Some((hash, value)) = pending.pop() {
                let (_, pinned) = self.place(hash, value);
                if pinned {
                    exhausted = true;
                    break;
                }
            }
            if !exhausted {
                return;
            }

            // Pull everything back out and retry one tier up.
            pending.extend(self.slots.iter_mut().filter_map(|slot| slot.payload.take()));
            tier += 1;
        }
    }

    /// Installs a fresh, fully-unclaimed slot array for `tier`.
    fn reset(&mut self, tier: usize) {
        assert!(
            tier < SIZE_SCHEDULE.len(),
            "coalesced hash table exceeded its growth schedule"
        );
        self.size_tier = tier;
        self.primary_size = SIZE_SCHEDULE[tier];
        let slots = total_slots(self.primary_size);
        self.slots.clear();
        self.slots.resize_with(slots, Slot::new);
        self.cellar_cursor = slots - 1;
        self.count = 0;
    }

    /// Returns an iterator over all live values.
    ///
    /// Values come out in physical slot order, which is unrelated to
    /// insertion order and changes across rehashes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use coalesced_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// for n in 0..4u64 {
    ///     table.entry(hash_u64(n), |&v: &u64| v == n).or_insert(n);
    /// }
    ///
    /// let mut values: Vec<u64> = table.iter().copied().collect();
    /// values.sort_unstable();
    /// assert_eq!(values, [0, 1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    /// Returns an iterator over all live values, with mutable references.
    ///
    /// The returned references must not be used to change a value's hash or
    /// equality.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
        }
    }

    /// Returns an iterator that removes and yields every live value.
    ///
    /// When the iterator is dropped the table is reset to the minimum
    /// capacity tier, like [`Self::clear`].
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Asserts the table's structural invariants. Test support.
    #[cfg(test)]
    #[track_caller]
    fn check_invariants(&self) {
        let live = self
            .slots
            .iter()
            .filter(|slot| slot.payload.is_some())
            .count();
        assert_eq!(live, self.count, "count does not match live slots");
        assert!(self.primary_size <= self.cellar_cursor && self.cellar_cursor < self.slots.len());

        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(next) = slot.next {
                assert!(next < self.slots.len(), "chain link out of bounds");
            }
            if let Some((hash, _)) = &slot.payload {
                let mut steps = 0;
                let mut walk = self.home_index(*hash);
                while walk != index {
                    steps += 1;
                    assert!(steps <= self.slots.len(), "chain walk failed to terminate");
                    walk = self.slots[walk]
                        .next
                        .expect("live entry unreachable from its home bucket");
                }
            }
        }
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter {
            slots: self.slots.into_iter(),
        }
    }
}

/// A view into a single entry of the table, vacant or occupied.
///
/// Constructed by [`HashTable::entry`].
pub enum Entry<'a, V> {
    /// No matching value is present.
    Vacant(VacantEntry<'a, V>),
    /// A matching value is present.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry of a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts `value` and returns a mutable reference to it.
    ///
    /// The value must satisfy the equality predicate this entry was looked
    /// up with.
    pub fn insert(self, value: V) -> &'a mut V {
        // `entry` already reserved room; a pinned cursor left behind here is
        // repaired by the next `reserve_for_insert`.
        let (index, _) = self.table.place(self.hash, value);
        match &mut self.table.slots[index].payload {
            Some((_, value)) => value,
            None => unreachable!("freshly placed slot has no payload"),
        }
    }
}

/// A view into an occupied entry of a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        match &self.table.slots[self.index].payload {
            Some((_, value)) => value,
            None => unreachable!("occupied entry lost its payload"),
        }
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        match &mut self.table.slots[self.index].payload {
            Some((_, value)) => value,
            None => unreachable!("occupied entry lost its payload"),
        }
    }

    /// Converts the entry into a mutable reference tied to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        match &mut self.table.slots[self.index].payload {
            Some((_, value)) => value,
            None => unreachable!("occupied entry lost its payload"),
        }
    }

    /// Removes the value from the table and returns it.
    ///
    /// Like [`HashTable::remove`], this tombstones the slot without touching
    /// chain topology.
    pub fn remove(self) -> V {
        match self.table.slots[self.index].payload.take() {
            Some((_, value)) => {
                self.table.count -= 1;
                value
            }
            None => unreachable!("occupied entry lost its payload"),
        }
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = self.slots.next()?;
            if let Some((_, value)) = &slot.payload {
                return Some(value);
            }
        }
    }
}

/// A mutable iterator over the values of a [`HashTable`].
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = self.slots.next()?;
            if let Some((_, value)) = &mut slot.payload {
                return Some(value);
            }
        }
    }
}

/// A consuming iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = self.slots.next()?;
            if let Some((_, value)) = slot.payload {
                return Some(value);
            }
        }
    }
}

/// A draining iterator over the values of a [`HashTable`].
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.slots.len() {
            let index = self.index;
            self.index += 1;
            if let Some((_, value)) = self.table.slots[index].payload.take() {
                self.table.count -= 1;
                return Some(value);
            }
        }
        None
    }
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
        self.table.reset(MIN_SIZE_TIER);
    }
}
