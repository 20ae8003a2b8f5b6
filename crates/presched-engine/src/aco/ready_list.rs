//! Ready-candidate list for the ant-colony scheduler
//!
//! A structure-of-arrays container: one logical position indexes four
//! parallel arrays (instruction, ready cycle, static heuristic, pheromone
//! score). Keeping the fields in separate arrays keeps the driver's
//! full-list score scans cache-friendly.
//!
//! Removal swaps the last entry into the removed slot, so positions are NOT
//! stable across removals, and growth reallocates the backing arrays, so
//! positions must not be held across an `add` either.

use crate::graph::InstId;

/// One ready candidate
///
/// Ephemeral: created when the instruction becomes ready, destroyed when it
/// is selected or the list is discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadyListEntry {
    /// The ready instruction
    pub inst: InstId,
    /// Cycle at which the instruction becomes issuable
    pub ready_on: u32,
    /// Static heuristic value, fixed when the entry is created
    pub heuristic: u64,
    /// Dynamic pheromone score, recomputed by the driver
    pub score: f64,
}

/// Growable ready-candidate container
///
/// Backing capacity starts at `max(32, region_size / 4)` and grows by
/// `1.5x + 1` whenever an insertion finds the arrays full. Growth is
/// unbounded; allocation failure is fatal. The sticky [`overflowed`]
/// flag records that the primary estimate was ever exceeded — diagnostic
/// only, never cleared.
///
/// [`overflowed`]: AcoReadyList::overflowed
#[derive(Debug, Clone, Default)]
pub struct AcoReadyList {
    insts: Box<[InstId]>,
    ready_on: Box<[u32]>,
    heur: Box<[u64]>,
    score: Box<[f64]>,
    len: usize,
    capacity: usize,
    primary_capacity: usize,
    overflowed: bool,
}

/// Initial capacity for a region of the given size
///
/// A heuristic: most regions keep well under a quarter of their
/// instructions ready at once, and tiny regions get a fixed floor.
fn primary_capacity(region_size: usize) -> usize {
    std::cmp::max(32, region_size / 4)
}

impl AcoReadyList {
    /// Create a list sized for a scheduling region of `region_size`
    /// instructions
    pub fn new(region_size: usize) -> Self {
        let cap = primary_capacity(region_size);
        AcoReadyList {
            insts: vec![InstId(0); cap].into_boxed_slice(),
            ready_on: vec![0; cap].into_boxed_slice(),
            heur: vec![0; cap].into_boxed_slice(),
            score: vec![0.0; cap].into_boxed_slice(),
            len: 0,
            capacity: cap,
            primary_capacity: cap,
            overflowed: false,
        }
    }

    /// Number of candidates currently held
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True iff the list holds no candidates
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current backing capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True iff the list ever outgrew its initial capacity estimate
    ///
    /// Diagnostic only; never resets.
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Append a candidate, growing the backing arrays if they are full
    pub fn add(&mut self, entry: ReadyListEntry) {
        if self.len == self.capacity {
            let new_cap = self.capacity + self.capacity / 2 + 1;
            self.grow(new_cap);
        }
        self.insts[self.len] = entry.inst;
        self.ready_on[self.len] = entry.ready_on;
        self.heur[self.len] = entry.heuristic;
        self.score[self.len] = entry.score;
        self.len += 1;
    }

    /// Remove and return the candidate at `index`
    ///
    /// O(1): the last entry is moved into the vacated slot, so the relative
    /// order of the remaining entries changes. Panics if `index >= len()`;
    /// an out-of-range removal is a caller defect.
    pub fn remove_at(&mut self, index: usize) -> ReadyListEntry {
        assert!(
            index < self.len,
            "ready-list removal at {} with {} entries",
            index,
            self.len
        );
        let removed = self.get(index);
        let last = self.len - 1;
        self.insts[index] = self.insts[last];
        self.ready_on[index] = self.ready_on[last];
        self.heur[index] = self.heur[last];
        self.score[index] = self.score[last];
        self.len = last;
        removed
    }

    /// Read the candidate at `index`
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> ReadyListEntry {
        assert!(
            index < self.len,
            "ready-list read at {} with {} entries",
            index,
            self.len
        );
        ReadyListEntry {
            inst: self.insts[index],
            ready_on: self.ready_on[index],
            heuristic: self.heur[index],
            score: self.score[index],
        }
    }

    /// Update the pheromone score of the candidate at `index`
    ///
    /// Panics if `index >= len()`.
    pub fn set_score(&mut self, index: usize, score: f64) {
        assert!(
            index < self.len,
            "ready-list write at {} with {} entries",
            index,
            self.len
        );
        self.score[index] = score;
    }

    /// Iterate over all candidates in positional order
    pub fn iter(&self) -> impl Iterator<Item = ReadyListEntry> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// Reallocate every backing array to `new_cap` and mark the overflow
    fn grow(&mut self, new_cap: usize) {
        debug_assert!(new_cap > self.capacity);
        let mut insts = vec![InstId(0); new_cap].into_boxed_slice();
        let mut ready_on = vec![0u32; new_cap].into_boxed_slice();
        let mut heur = vec![0u64; new_cap].into_boxed_slice();
        let mut score = vec![0.0f64; new_cap].into_boxed_slice();

        insts[..self.len].copy_from_slice(&self.insts[..self.len]);
        ready_on[..self.len].copy_from_slice(&self.ready_on[..self.len]);
        heur[..self.len].copy_from_slice(&self.heur[..self.len]);
        score[..self.len].copy_from_slice(&self.score[..self.len]);

        self.insts = insts;
        self.ready_on = ready_on;
        self.heur = heur;
        self.score = score;

        #[cfg(debug_assertions)]
        eprintln!(
            "ready-list overflow: capacity {} -> {} (primary {}, already overflowed: {})",
            self.capacity, new_cap, self.primary_capacity, self.overflowed
        );
        self.capacity = new_cap;
        self.overflowed = true;
    }
}
