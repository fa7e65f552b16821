//! The BWT primitive (§4.1): a sequence over an integer alphabet plus a
//! cumulative-count array, in a static (build-once) and a dynamic
//! (insert/remove) flavour behind one shared [`Column`] trait.
mod carray;
mod column;
mod dynamic_column;
mod static_column;

pub use carray::CArray;
pub use column::{BuildColumn, Column};
pub use dynamic_column::DynamicColumn;
pub use static_column::StaticColumn;
