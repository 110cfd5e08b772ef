use std::cmp;

use crate::pairs::{self, PairRuns};
use crate::stats;

/// Sorts `v` with the pair pass followed by a tail merge of the resulting blocks of 2.
///
/// `scratch` needs room for `v.len() / 2` elements.
pub(crate) fn twin_sort<T, F>(v: &mut [T], scratch: &mut [T], is_less: &mut F)
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    if pairs::normalize_pairs(v, is_less) == PairRuns::Pairs {
        tail_merge(v, scratch, 2, is_less);
    }
}

/// Bottom-up merge of the `block` sized sorted runs of `v`.
///
/// The right run of every block pair is copied to `scratch` and merged back starting at the tail
/// ends of the two runs. `scratch` needs room for at most `v.len() / 2` elements.
pub(crate) fn tail_merge<T, F>(v: &mut [T], scratch: &mut [T], mut block: usize, is_less: &mut F)
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(block > 0);
    debug_assert!(scratch.len() >= len / 2);

    stats::record(|c| c.merge_calls += 1);

    while block < len {
        let mut offset = 0;

        while offset + block < len {
            let end = cmp::min(offset + block * 2, len);
            merge_block_pair(&mut v[offset..end], scratch, block, is_less);

            offset += block * 2;
        }

        block *= 2;
    }
}

/// Merges the sorted runs `pair[..mid]` and `pair[mid..]`.
fn merge_block_pair<T, F>(pair: &mut [T], scratch: &mut [T], mid: usize, is_less: &mut F)
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    let last_left = pair[mid - 1];

    if !is_less(&pair[mid], &last_left) {
        return;
    }

    stats::record(|c| c.block_merges += 1);

    // The right tail that is not below the largest left element is already in place.
    let mut end = pair.len();
    while end > mid + 1 && !is_less(&pair[end - 1], &last_left) {
        end -= 1;
    }

    let pending = end - mid;
    scratch[..pending].copy_from_slice(&pair[mid..end]);
    stats::record_scratch_use(pending);

    let left_exhausts_last = !is_less(&scratch[0], &pair[0]);

    let mut hole = MergeHole {
        v: &mut pair[..end],
        buf: &scratch[..pending],
        left_end: mid,
        pending,
    };

    hole.pull_left();

    if left_exhausts_last {
        // The scratch copy runs out first, the rest of the left run is in place.
        while hole.pending > 0 {
            while hole.left_end > 0 && is_less(hole.right(), hole.left()) {
                hole.pull_left();
            }
            hole.pull_right();
        }
    } else {
        // The left run runs out first, dropping `hole` copies what is left of the scratch copy.
        while hole.left_end > 0 {
            while hole.pending > 0 && !is_less(hole.right(), hole.left()) {
                hole.pull_right();
            }

            if hole.pending == 0 {
                break;
            }
            hole.pull_left();
        }
    }
}

/// The gap `v[left_end..left_end + pending]` of a back-to-front merge.
///
/// `buf[..pending]` holds exactly the elements that still belong in the gap. When dropped, copies
/// them into it. This keeps every element present if `is_less` panics.
struct MergeHole<'a, T: Copy> {
    v: &'a mut [T],
    buf: &'a [T],
    left_end: usize,
    pending: usize,
}

impl<'a, T: Copy> MergeHole<'a, T> {
    #[inline]
    fn left(&self) -> &T {
        &self.v[self.left_end - 1]
    }

    #[inline]
    fn right(&self) -> &T {
        &self.buf[self.pending - 1]
    }

    /// Moves the last element of the left run to the back of the gap.
    #[inline]
    fn pull_left(&mut self) {
        self.left_end -= 1;
        self.v[self.left_end + self.pending] = self.v[self.left_end];
    }

    /// Moves the last pending scratch element to the back of the gap.
    #[inline]
    fn pull_right(&mut self) {
        self.pending -= 1;
        self.v[self.left_end + self.pending] = self.buf[self.pending];
    }
}

impl<'a, T: Copy> Drop for MergeHole<'a, T> {
    fn drop(&mut self) {
        let start = self.left_end;
        self.v[start..start + self.pending].copy_from_slice(&self.buf[..self.pending]);
    }
}
