// src/model/mod.rs
//! Dimensions, their values, and the rows a dataset query produces.
pub mod dimension;
pub mod list;
pub mod result;

pub use dimension::{Dimension, DimensionList, DimensionValue, RawValue, ValueList};
pub use list::{List, Listed, Lookup};
pub use result::{ResultRow, ResultSet};
