//! Build errors for hierarchy construction.

use thiserror::Error;

/// Errors that can occur when flattening a declared hierarchy.
///
/// These are structural programmer errors; construction is all-or-nothing,
/// so any fault here yields no machine at all.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("state `{state}` is declared more than once in the hierarchy")]
    DuplicateState { state: &'static str },

    #[error("composite state `{state}` declares no children. Declare it with leaf() instead")]
    EmptyComposite { state: &'static str },
}
