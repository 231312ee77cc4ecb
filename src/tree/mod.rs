// src/tree/mod.rs
//! The Collection/Dataset hierarchy.
//!
//! ```text
//!        ┏━ Collection ━━━ Collection ━┳━ Dataset
//!  ROOT ━╋━ Collection ━┳━ Dataset     ┣━ Dataset
//!        ┗━ Collection  ┣━ Dataset     ┗━ Dataset
//!                       ┗━ Dataset
//! ```
//! Items live in one arena per scraper ([`Tree`]) and refer to each other by
//! [`ItemId`]. Adapters produce detached [`Item`]s; the tree attaches them
//! under their parent the first time a collection's children are asked for.
mod arena;
mod item;
mod view;

pub use arena::Tree;
pub use item::{Item, ItemId, ItemKind};
pub use view::{ItemKey, ItemList, ItemRef};
