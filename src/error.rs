//! Error type shared by all entry points.

use std::fmt;

/// Errors that can abort a sort call.
///
/// A comparison function that is not a total order is not reported here. In that case the order
/// of the result is unspecified, but every element of the input is still present exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortError {
    /// The scratch buffer, or the work list of pending ranges, could not be allocated.
    ///
    /// `requested` is the number of elements that could not be reserved and `element_size` the
    /// size of one element in bytes.
    OutOfMemory {
        requested: usize,
        element_size: usize,
    },
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::OutOfMemory {
                requested,
                element_size,
            } => {
                write!(
                    f,
                    "out of memory: failed to reserve {} elements of {} bytes",
                    requested, element_size
                )
            }
        }
    }
}

impl std::error::Error for SortError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_request() {
        let err = SortError::OutOfMemory {
            requested: 1024,
            element_size: 8,
        };

        assert_eq!(
            err.to_string(),
            "out of memory: failed to reserve 1024 elements of 8 bytes"
        );
    }
}
