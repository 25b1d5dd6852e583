//! File explorer model
//!
//! The flat [`FileStore`] of entries, the path index that derives folder
//! children from paths, and the [`TreeState`] holding expansion and
//! selection for the explorer view.

mod index;
mod store;
mod tree;

pub use store::{validate_name, FileStore, StoreError};
pub use tree::{Selection, TreeRow, TreeState};
