use thiserror::Error;

use crate::ViewId;

/// Failure reported by a backing store mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("index {index} is out of bounds for a store of {len} items")]
    IndexOutOfBounds { index: usize, len: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("view {0:?} is not in the tree")]
    UnknownView(ViewId),
    #[error("view {ancestor:?} is not an ancestor of {view:?}")]
    NotAnAncestor { view: ViewId, ancestor: ViewId },
}
