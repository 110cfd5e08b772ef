use std::mem;

use crate::error::SortError;
use crate::stats;

/// Allocates the scratch buffer for one top-level sort call.
///
/// The buffer holds `len` copies of `fill`, its contents carry no meaning. Allocation failure is
/// reported instead of aborting the process.
pub(crate) fn alloc<T: Copy>(len: usize, fill: T) -> Result<Vec<T>, SortError> {
    let mut scratch = Vec::new();

    if let Err(err) = scratch.try_reserve_exact(len) {
        log::error!(
            "failed to allocate scratch of {} elements ({} bytes each): {}",
            len,
            mem::size_of::<T>(),
            err
        );

        return Err(SortError::OutOfMemory {
            requested: len,
            element_size: mem::size_of::<T>(),
        });
    }

    scratch.resize(len, fill);

    stats::record(|c| {
        c.scratch_allocations += 1;
        c.scratch_capacity = c.scratch_capacity.max(len);
    });

    Ok(scratch)
}

/// Reserves room for `additional` more entries in a work list.
pub(crate) fn reserve<E>(list: &mut Vec<E>, additional: usize) -> Result<(), SortError> {
    list.try_reserve(additional).map_err(|err| {
        log::error!(
            "failed to grow work list of {} entries by {}: {}",
            list.len(),
            additional,
            err
        );

        SortError::OutOfMemory {
            requested: list.len() + additional,
            element_size: mem::size_of::<E>(),
        }
    })
}
