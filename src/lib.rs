//! Stable hybrid sort for slices of `Copy` elements.
//!
//! The main entry point, [`sort`], partitions around sampled pivots using a scratch buffer as a
//! second lane and sorts small partitions with a pair pass followed by a bottom-up merge.
//! [`merge_sort`] and [`tail_sort`] run only the merge path, [`normalize_pairs`] only the pair
//! pass.
//!
//! All sorts allocate one scratch buffer per call and report allocation failure as
//! [`SortError::OutOfMemory`] instead of aborting.

use std::cmp::Ordering;
use std::mem;

mod error;
mod median;
mod merge;
mod pairs;
mod partition;
mod scratch;

pub mod stats;

pub use error::SortError;
pub use pairs::PairRuns;
pub use partition::FLUX_OUT;

/// Sorts the slice, preserving the initial order of equal elements.
///
/// This sort is stable (i.e., does not reorder equal elements) and allocates a scratch buffer of
/// `v.len()` elements. Slices shorter than 2 are returned untouched without allocating.
///
/// # Current implementation
///
/// The slice is split around the median of three samples into a lesser lane kept in place and a
/// greater lane moved to scratch. A large greater lane is split again around a second pivot
/// before anything is written back, giving a three way split per step. Ranges of at most
/// [`FLUX_OUT`] elements, and ranges that partition too deep, are sorted with the merge path of
/// [`merge_sort`].
///
/// # Errors
///
/// Returns [`SortError::OutOfMemory`] if the scratch buffer can't be allocated. `v` is untouched
/// in that case.
///
/// # Examples
///
/// ```
/// let mut v = [-5, 4, 1, -3, 2];
///
/// fluxsort::sort(&mut v).unwrap();
/// assert_eq!(v, [-5, -3, 1, 2, 4]);
/// ```
#[inline]
pub fn sort<T>(v: &mut [T]) -> Result<(), SortError>
where
    T: Ord + Copy,
{
    flux_sort(v, |a, b| a.lt(b))
}

/// Sorts the slice with a comparator function, preserving the initial order of equal elements.
///
/// The comparator function must define a total ordering for the elements in the slice. If
/// the ordering is not total, the order of the elements is unspecified, but every element is
/// still present exactly once. If the comparator panics, the panic is propagated and the slice
/// holds its original elements in unspecified order.
///
/// # Errors
///
/// Returns [`SortError::OutOfMemory`] if the scratch buffer can't be allocated.
///
/// # Examples
///
/// ```
/// let mut v = [5, 4, 1, 3, 2];
/// fluxsort::sort_by(&mut v, |a, b| a.cmp(b)).unwrap();
/// assert_eq!(v, [1, 2, 3, 4, 5]);
///
/// // reverse sorting
/// fluxsort::sort_by(&mut v, |a, b| b.cmp(a)).unwrap();
/// assert_eq!(v, [5, 4, 3, 2, 1]);
/// ```
#[inline]
pub fn sort_by<T, F>(v: &mut [T], mut compare: F) -> Result<(), SortError>
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    flux_sort(v, |a, b| compare(a, b) == Ordering::Less)
}

/// Sorts the slice with a key extraction function, preserving the initial order of equal
/// elements.
///
/// # Examples
///
/// ```
/// let mut v = [-5i32, 4, 1, -3, 2];
///
/// fluxsort::sort_by_key(&mut v, |k| k.abs()).unwrap();
/// assert_eq!(v, [1, 2, -3, 4, -5]);
/// ```
#[inline]
pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F) -> Result<(), SortError>
where
    T: Copy,
    K: Ord,
    F: FnMut(&T) -> K,
{
    flux_sort(v, |a, b| f(a).lt(&f(b)))
}

/// Sorts the slice with the pair pass and a bottom-up merge only, preserving the initial order
/// of equal elements.
///
/// Predictable *O*(*n* \* log(*n*)) with a scratch buffer of `v.len() / 2` elements. A strictly
/// descending slice is reversed in one pass and needs no scratch at all.
///
/// # Errors
///
/// Returns [`SortError::OutOfMemory`] if the scratch buffer can't be allocated. `v` has then been
/// turned into sorted blocks of 2 elements but is not sorted.
///
/// # Examples
///
/// ```
/// let mut v = [2, 2, 1, 1, 3, 3];
///
/// fluxsort::merge_sort(&mut v).unwrap();
/// assert_eq!(v, [1, 1, 2, 2, 3, 3]);
/// ```
#[inline]
pub fn merge_sort<T>(v: &mut [T]) -> Result<(), SortError>
where
    T: Ord + Copy,
{
    twin_sort(v, |a, b| a.lt(b))
}

/// Like [`merge_sort`], with a comparator function.
///
/// # Errors
///
/// Returns [`SortError::OutOfMemory`] if the scratch buffer can't be allocated.
#[inline]
pub fn merge_sort_by<T, F>(v: &mut [T], mut compare: F) -> Result<(), SortError>
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    twin_sort(v, |a, b| compare(a, b) == Ordering::Less)
}

/// Sorts the slice with a plain bottom-up merge starting from single elements, preserving the
/// initial order of equal elements.
///
/// Unlike [`merge_sort`] there is no pair pass, so descending input isn't special cased. Uses a
/// scratch buffer of `v.len() / 2` elements.
///
/// # Errors
///
/// Returns [`SortError::OutOfMemory`] if the scratch buffer can't be allocated. `v` is untouched
/// in that case.
#[inline]
pub fn tail_sort<T>(v: &mut [T]) -> Result<(), SortError>
where
    T: Ord + Copy,
{
    tail_merge_sort(v, |a, b| a.lt(b))
}

/// Like [`tail_sort`], with a comparator function.
///
/// # Errors
///
/// Returns [`SortError::OutOfMemory`] if the scratch buffer can't be allocated.
#[inline]
pub fn tail_sort_by<T, F>(v: &mut [T], mut compare: F) -> Result<(), SortError>
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    tail_merge_sort(v, |a, b| compare(a, b) == Ordering::Less)
}

/// Turns the slice into sorted blocks of 2 elements, reversing strictly descending runs.
///
/// So `6 5 4 3 2 1` becomes `1 2 3 4 5 6` rather than `5 6 3 4 1 2`. Returns
/// [`PairRuns::Reversed`] if the whole slice was strictly descending, it is then fully sorted.
/// Never allocates.
///
/// # Examples
///
/// ```
/// use fluxsort::PairRuns;
///
/// let mut v = [4, 3, 9, 8, 1, 2, 7];
/// assert_eq!(fluxsort::normalize_pairs(&mut v), PairRuns::Pairs);
/// assert_eq!(v, [3, 4, 8, 9, 1, 2, 7]);
///
/// let mut v = [6, 5, 4, 3, 2, 1];
/// assert_eq!(fluxsort::normalize_pairs(&mut v), PairRuns::Reversed);
/// assert_eq!(v, [1, 2, 3, 4, 5, 6]);
/// ```
#[inline]
pub fn normalize_pairs<T>(v: &mut [T]) -> PairRuns
where
    T: Ord,
{
    pairs::normalize_pairs(v, &mut |a: &T, b: &T| a.lt(b))
}

/// Like [`normalize_pairs`], with a comparator function.
#[inline]
pub fn normalize_pairs_by<T, F>(v: &mut [T], mut compare: F) -> PairRuns
where
    F: FnMut(&T, &T) -> Ordering,
{
    pairs::normalize_pairs(v, &mut |a: &T, b: &T| compare(a, b) == Ordering::Less)
}

// --- IMPL ---

fn flux_sort<T, F>(v: &mut [T], mut is_less: F) -> Result<(), SortError>
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < 2 || mem::size_of::<T>() == 0 {
        return Ok(());
    }

    log::trace!("fluxsort: {} elements of {} bytes", len, mem::size_of::<T>());

    let mut scratch = scratch::alloc(len, v[0])?;
    partition::flux_sort(v, &mut scratch, &mut is_less)
}

fn twin_sort<T, F>(v: &mut [T], mut is_less: F) -> Result<(), SortError>
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < 2 || mem::size_of::<T>() == 0 {
        return Ok(());
    }

    log::trace!("twinsort: {} elements of {} bytes", len, mem::size_of::<T>());

    if pairs::normalize_pairs(v, &mut is_less) == PairRuns::Reversed {
        return Ok(());
    }

    let mut scratch = scratch::alloc(len / 2, v[0])?;
    merge::tail_merge(v, &mut scratch, 2, &mut is_less);

    Ok(())
}

fn tail_merge_sort<T, F>(v: &mut [T], mut is_less: F) -> Result<(), SortError>
where
    T: Copy,
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < 2 || mem::size_of::<T>() == 0 {
        return Ok(());
    }

    log::trace!("tailsort: {} elements of {} bytes", len, mem::size_of::<T>());

    let mut scratch = scratch::alloc(len / 2, v[0])?;
    merge::tail_merge(v, &mut scratch, 1, &mut is_less);

    Ok(())
}
