// src/lib.rs
//! Navigate statistical data sources as a tree of collections and
//! datasets, fetch their data with per-query caching, and translate
//! categorical values between dialects of a shared datatype catalogue.
//!
//! A source is an [`Adapter`]; a [`Scraper`] drives it.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod adapters;
pub mod config;
pub mod datatypes;
pub mod error;
pub mod export;
pub mod model;
pub mod query;
pub mod scraper;
pub mod tree;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::ScraperConfig;
pub use datatypes::{Catalogue, Datatype};
pub use error::{Error, Result};
pub use model::{Dimension, DimensionValue, RawValue, ResultRow, ResultSet};
pub use query::Query;
pub use scraper::{Adapter, Hook, HookContext, Hooks, Scraper};
pub use tree::{Item, ItemId, ItemKey, ItemKind, ItemList, ItemRef};
