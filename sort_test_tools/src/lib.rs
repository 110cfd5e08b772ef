//! Shared test tooling: input patterns, the generic test suite and the macro that instantiates it
//! for a sort implementation.

/// A sort implementation under test.
///
/// Elements are fixed width `Copy` values, the only kind the sorts in this workspace accept.
/// Implementations are expected to panic if the sort reports an error.
pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord + Copy;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        T: Copy,
        F: FnMut(&T, &T) -> std::cmp::Ordering;
}

pub mod patterns;
