// src/datatypes/mod.rs
//! # Datatype catalogue
//!
//! A datatype is a named vocabulary (`region`, `month`, ...) with a fixed
//! set of allowed values, each of which may have alternate spellings in one
//! or more *dialects* (`scb`, `numerical`, ...).
//!
//! ## On-disk layout
//! ```text
//! <root>/datatypes.csv                      id,value_type,description,allowed_values
//! <root>/values/<domain>.csv                id,label,dialect:<name>,...
//! <root>/values/<domain>/**/<sub>.csv       same columns, nested sub-domains
//! ```
//! `allowed_values` in the master table names the domain; both a file and a
//! directory of that name are read if present. Dialect cells are small
//! comma-separated lists; `\,` and double quotes protect literal commas.
pub mod catalogue;
pub mod dialect;

pub use catalogue::{Catalogue, Datatype};
pub use dialect::{join_spellings, split_spellings};
