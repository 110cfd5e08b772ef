//! Per-thread instrumentation of the sort engine.
//!
//! Only recorded with the `counters` feature (and in this crate's own unit tests). Without it
//! every recording call compiles to nothing and [`snapshot`] always returns zeroes.

/// Counts of the steps taken by sort calls on the current thread since the last [`reset`].
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Counters {
    /// Element swaps done by the pair pass, including the swaps of run reversals.
    pub swaps: u64,
    /// Descending runs reversed by the pair pass, excluding full reversals.
    pub run_reversals: u64,
    /// Pair passes that found the whole range strictly descending.
    pub full_reversals: u64,
    /// Calls into the tail merge.
    pub merge_calls: u64,
    /// Block pairs the tail merge actually had to merge.
    pub block_merges: u64,
    /// Partition steps, one per range split around a pivot.
    pub partitions: u64,
    /// Ranges that hit the depth limit and were sorted with the merge path.
    pub depth_fallbacks: u64,
    /// Scratch buffers allocated.
    pub scratch_allocations: u64,
    /// Largest scratch buffer allocated, in elements.
    pub scratch_capacity: usize,
    /// Largest number of scratch elements live at the same time.
    pub scratch_high_water: usize,
}

#[cfg(any(test, feature = "counters"))]
mod imp {
    use std::cell::Cell;

    use super::Counters;

    thread_local! {
        static COUNTERS: Cell<Counters> = Cell::new(Counters::default());
    }

    pub fn snapshot() -> Counters {
        COUNTERS.with(|c| c.get())
    }

    pub fn reset() {
        COUNTERS.with(|c| c.set(Counters::default()));
    }

    #[inline]
    pub fn record(f: impl FnOnce(&mut Counters)) {
        COUNTERS.with(|c| {
            let mut counters = c.get();
            f(&mut counters);
            c.set(counters);
        });
    }
}

#[cfg(not(any(test, feature = "counters")))]
mod imp {
    use super::Counters;

    pub fn snapshot() -> Counters {
        Counters::default()
    }

    pub fn reset() {}

    #[inline(always)]
    pub fn record(_f: impl FnOnce(&mut Counters)) {}
}

/// Returns the counters of the current thread.
pub fn snapshot() -> Counters {
    imp::snapshot()
}

/// Zeroes the counters of the current thread.
pub fn reset() {
    imp::reset();
}

#[inline(always)]
pub(crate) fn record(f: impl FnOnce(&mut Counters)) {
    imp::record(f);
}

#[inline(always)]
pub(crate) fn record_scratch_use(live: usize) {
    record(|c| c.scratch_high_water = c.scratch_high_water.max(live));
}
