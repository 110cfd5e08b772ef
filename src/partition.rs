use std::ops::Range;

use crate::error::SortError;
use crate::median;
use crate::merge;
use crate::scratch;
use crate::stats;

/// Ranges of at most this many elements are not partitioned but sorted with the pair pass and
/// tail merge.
pub const FLUX_OUT: usize = 64;

/// A range of the slice that still has to be sorted.
#[derive(Clone, Copy, Debug)]
struct Task {
    start: usize,
    len: usize,
    depth: usize,
}

/// Lane sizes produced by one partition step, in slice order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lanes {
    /// `v[..a_size]` is `<= pivot`, the rest `> pivot`.
    Two { a_size: usize },
    /// Like `Two`, with the greater lane split again around a second pivot into
    /// `v[a_size..a_size + b_size]` and the last `s_size` elements.
    Three {
        a_size: usize,
        b_size: usize,
        s_size: usize,
    },
}

/// Stably sorts `v`, using `scratch` as a second partition lane.
///
/// `scratch` must be at least as long as `v`. Fails only if the list of pending ranges can't grow,
/// in which case `v` still holds all of its original elements.
pub(crate) fn flux_sort<T, F>(v: &mut [T], scratch: &mut [T], is_less: &mut F) -> Result<(), SortError>
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < 2 {
        return Ok(());
    }

    // Partitioning deeper than this means the pivots keep splitting off small lanes, switch to the
    // merge path which is O(n * log(n)) regardless of the input.
    let depth_limit = 2 * (len.ilog2() as usize);

    flux_sort_with_limit(v, scratch, depth_limit, is_less)
}

fn flux_sort_with_limit<T, F>(
    v: &mut [T],
    scratch: &mut [T],
    depth_limit: usize,
    is_less: &mut F,
) -> Result<(), SortError>
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(scratch.len() >= v.len());

    let mut pending: Vec<Task> = Vec::new();
    scratch::reserve(&mut pending, 1)?;
    pending.push(Task {
        start: 0,
        len: v.len(),
        depth: 0,
    });

    while let Some(task) = pending.pop() {
        let range = &mut v[task.start..task.start + task.len];

        if task.len <= FLUX_OUT {
            merge::twin_sort(range, scratch, is_less);
            continue;
        }

        if task.depth > depth_limit {
            log::debug!(
                "partition depth {} exceeded for range {}..{}, merging instead",
                depth_limit,
                task.start,
                task.start + task.len
            );
            stats::record(|c| c.depth_fallbacks += 1);

            merge::twin_sort(range, scratch, is_less);
            continue;
        }

        match partition(range, scratch, is_less) {
            Lanes::Two { a_size } => {
                let (lesser, greater) = range.split_at_mut(a_size);
                merge::twin_sort(greater, scratch, is_less);
                merge::twin_sort(lesser, scratch, is_less);
            }
            Lanes::Three {
                a_size,
                b_size,
                s_size,
            } => {
                scratch::reserve(&mut pending, 3)?;

                let depth = task.depth + 1;
                let lanes = [
                    (0, a_size),
                    (a_size, b_size),
                    (a_size + b_size, s_size),
                ];

                // The last lane is pushed last and handled first.
                for (offset, lane_len) in lanes {
                    pending.push(Task {
                        start: task.start + offset,
                        len: lane_len,
                        depth,
                    });
                }
            }
        }
    }

    Ok(())
}

/// Stably partitions `v` around a sampled pivot, using `scratch` for the greater lane.
///
/// If both lanes are larger than [`FLUX_OUT`] the greater lane is partitioned again inside
/// `scratch`, writing its lesser part straight back into `v`:
///
/// ```text
/// ################################ <-- scratch
/// ABCDEFGHABCDEFGHABCDEFGHABCDEFGH <-- v
///
/// EFGHEFGHEFGHEFGH################
/// ABCDABCDABCDABCD################
///
/// GHGHGHGH########################
/// ABCDABCDABCDABCDEFEFEFEF########
///
/// ################################
/// ABCDABCDABCDABCDEFEFEFEFGHGHGHGH
/// ```
fn partition<T, F>(v: &mut [T], scratch: &mut [T], is_less: &mut F) -> Lanes
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let pivot = median::sample_pivot(v, is_less);

    stats::record(|c| c.partitions += 1);

    let mut spill = Spill {
        v,
        scratch,
        filled: 0,
        kept: 0,
        unread: 0..0,
    };

    for i in 0..len {
        let elem = spill.v[i];

        if is_less(&pivot, &elem) {
            spill.scratch[spill.kept] = elem;
            spill.kept += 1;
        } else {
            spill.v[spill.filled] = elem;
            spill.filled += 1;
        }
    }

    let a_size = spill.filled;
    let s_size = spill.kept;
    stats::record_scratch_use(s_size);

    if a_size <= FLUX_OUT || s_size <= FLUX_OUT {
        // Dropping puts the greater lane back behind the lesser one.
        drop(spill);
        return Lanes::Two { a_size };
    }

    let pivot = median::sample_pivot(&spill.scratch[..s_size], is_less);

    spill.kept = 0;
    spill.unread = 0..s_size;

    for i in 0..s_size {
        let elem = spill.scratch[i];

        if is_less(&pivot, &elem) {
            spill.scratch[spill.kept] = elem;
            spill.kept += 1;
        } else {
            spill.v[spill.filled] = elem;
            spill.filled += 1;
        }

        spill.unread.start = i + 1;
    }

    let b_size = spill.filled - a_size;
    let s_size = spill.kept;
    drop(spill);

    Lanes::Three {
        a_size,
        b_size,
        s_size,
    }
}

/// Elements parked in `scratch` while a partition pass rewrites `v`.
///
/// The gap `v[filled..filled + kept + unread.len()]` belongs to `scratch[..kept]` followed by
/// `scratch[unread]`. When dropped, copies both into it. This keeps every element present if
/// `is_less` panics.
struct Spill<'a, T: Copy> {
    v: &'a mut [T],
    scratch: &'a mut [T],
    filled: usize,
    kept: usize,
    unread: Range<usize>,
}

impl<'a, T: Copy> Drop for Spill<'a, T> {
    fn drop(&mut self) {
        let kept_end = self.filled + self.kept;
        self.v[self.filled..kept_end].copy_from_slice(&self.scratch[..self.kept]);

        let unread = self.unread.clone();
        self.v[kept_end..kept_end + unread.len()].copy_from_slice(&self.scratch[unread]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::prelude::*;

    fn random_vec(len: usize, range: std::ops::Range<i32>, seed: u64) -> Vec<i32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen_range(range.clone())).collect()
    }

    fn is_less(a: &i32, b: &i32) -> bool {
        a < b
    }

    #[test]
    fn small_lane_is_two_way() {
        // The sampled pivot is 1, only the 10 large elements are above it.
        let mut v: Vec<i32> = (0..200)
            .map(|i| if i % 20 == 3 { 1000 + i } else { i / 100 })
            .collect();
        let mut scratch = vec![0; v.len()];
        let orig = v.clone();

        let lanes = partition(&mut v, &mut scratch, &mut is_less);

        let Lanes::Two { a_size } = lanes else {
            panic!("expected two lanes, got {lanes:?}");
        };
        assert_eq!(a_size, 190);

        // Both lanes keep the input order.
        let expected_lesser: Vec<i32> = orig.iter().copied().filter(|x| *x < 1000).collect();
        let expected_greater: Vec<i32> = orig.iter().copied().filter(|x| *x >= 1000).collect();
        assert_eq!(&v[..a_size], expected_lesser.as_slice());
        assert_eq!(&v[a_size..], expected_greater.as_slice());
    }

    #[test]
    fn large_lanes_split_three_way() {
        let mut v = random_vec(2_000, 0..1_000_000, 0x5eed);
        let mut scratch = vec![0; v.len()];
        let mut orig = v.clone();

        let lanes = partition(&mut v, &mut scratch, &mut is_less);

        let Lanes::Three {
            a_size,
            b_size,
            s_size,
        } = lanes
        else {
            panic!("expected three lanes, got {lanes:?}");
        };
        assert_eq!(a_size + b_size + s_size, v.len());

        let (a, rest) = v.split_at(a_size);
        let (b, s) = rest.split_at(b_size);

        let a_max = a.iter().max().unwrap();
        let b_min = b.iter().min().unwrap();
        let b_max = b.iter().max().unwrap();
        let s_min = s.iter().min().unwrap();
        assert!(a_max < b_min);
        assert!(b_max < s_min);

        let mut after = v.clone();
        after.sort();
        orig.sort();
        assert_eq!(after, orig);
    }

    #[test]
    fn lanes_are_stable() {
        let keys = random_vec(3_000, 0..50, 7);
        let mut v: Vec<(i32, usize)> = keys.into_iter().zip(0..).collect();
        let mut scratch = vec![(0, 0); v.len()];

        flux_sort(&mut v, &mut scratch, &mut |a: &(i32, usize), b: &(i32, usize)| {
            a.0 < b.0
        })
        .unwrap();

        assert!(v.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn threshold_boundaries() {
        for len in [FLUX_OUT - 1, FLUX_OUT, FLUX_OUT + 1, FLUX_OUT * 2 + 1] {
            let mut v = random_vec(len, -500..500, len as u64);
            let mut expected = v.clone();
            expected.sort();

            let mut scratch = vec![0; len];
            flux_sort(&mut v, &mut scratch, &mut is_less).unwrap();

            assert_eq!(v, expected, "len {len}");
        }
    }

    #[test]
    fn all_equal_terminates() {
        stats::reset();

        let mut v = vec![3; 10_000];
        let mut scratch = vec![0; v.len()];
        flux_sort(&mut v, &mut scratch, &mut is_less).unwrap();

        assert!(v.iter().all(|x| *x == 3));
        assert_eq!(stats::snapshot().partitions, 1);
    }

    #[test]
    fn depth_limit_falls_back_to_merge() {
        let _ = env_logger::builder().is_test(true).try_init();
        stats::reset();

        let mut v = random_vec(5_000, 0..1_000_000, 99);
        let mut expected = v.clone();
        expected.sort();

        let mut scratch = vec![0; v.len()];
        flux_sort_with_limit(&mut v, &mut scratch, 0, &mut is_less).unwrap();

        assert_eq!(v, expected);
        assert!(stats::snapshot().depth_fallbacks > 0);
    }

    #[test]
    fn scratch_use_stays_within_len() {
        stats::reset();

        let len = 20_000;
        let mut v: Vec<i32> = (0..len / 2).chain((0..len / 2).rev()).collect();
        let mut scratch = vec![0; v.len()];
        flux_sort(&mut v, &mut scratch, &mut is_less).unwrap();

        assert!(v.windows(2).all(|w| w[0] <= w[1]));
        assert!(stats::snapshot().scratch_high_water <= len as usize);
    }

    #[test]
    fn panic_in_partition_keeps_every_element() {
        use std::panic::{self, AssertUnwindSafe};

        for limit in [100, 1_000, 2_500, 4_000, 9_000] {
            let mut v = random_vec(2_000, 0..1_000_000, limit);
            let mut orig = v.clone();
            let mut comparisons = 0u64;

            let res = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut scratch = vec![0; v.len()];
                flux_sort(&mut v, &mut scratch, &mut |a: &i32, b: &i32| {
                    comparisons += 1;
                    if comparisons == limit {
                        panic!("comparison limit");
                    }
                    a < b
                })
            }));

            assert!(res.is_err());

            v.sort();
            orig.sort();
            assert_eq!(v, orig);
        }
    }
}
