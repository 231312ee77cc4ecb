// src/tree/item.rs
use std::fmt;

use serde_json::Value;

/// Stable handle of an attached item inside one scraper's tree.
/// Handles remember their tree, so one from another scraper is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub(crate) tree: u32,
    pub(crate) ix: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Collection,
    Dataset,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Collection => f.write_str("Collection"),
            ItemKind::Dataset => f.write_str("Dataset"),
        }
    }
}

/// An item as an adapter produces it, before it is attached to the tree.
/// It has no parent yet; attaching hands back an [`ItemId`].
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub(crate) id: String,
    pub(crate) kind: ItemKind,
    pub(crate) label: Option<String>,
    pub(crate) blob: Option<Value>,
    pub(crate) dialect: Option<String>,
}

impl Item {
    pub fn collection(id: impl Into<String>) -> Self {
        Self::new(id.into(), ItemKind::Collection)
    }

    pub fn dataset(id: impl Into<String>) -> Self {
        Self::new(id.into(), ItemKind::Dataset)
    }

    fn new(id: String, kind: ItemKind) -> Self {
        Self {
            id,
            kind,
            label: None,
            blob: None,
            dialect: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adapter-owned payload (api ids, urls, ...), never read by the engine.
    pub fn with_blob(mut self, blob: Value) -> Self {
        self.blob = Some(blob);
        self
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}
