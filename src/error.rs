use thiserror::Error;

/// Fatal conditions raised by map construction, resizing and configuration.
///
/// Missing keys and empty buckets are not errors; see [`crate::Removal`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("capacity must be a positive integer")]
    InvalidCapacity,
    #[error("doubling capacity {0} overflows usize")]
    CapacityOverflow(usize),
    #[error("failed to allocate storage for {0} buckets")]
    AllocationFailed(usize),
    #[error("unknown hash strategy `{0}` (expected `default` or `djb2`)")]
    UnknownHashStrategy(String),
}
