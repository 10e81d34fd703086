use thiserror::Error;

/// Failures reported by the checked accessors and the `pop_*` operations of
/// [`CircVec`](crate::CircVec).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("circular vector is empty")]
    Empty,
}
