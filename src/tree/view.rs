// src/tree/view.rs
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::arena::{NodeState, Tree};
use super::item::{ItemId, ItemKind};
use crate::config::consts::ROOT;
use crate::datatypes::Datatype;
use crate::error::{Error, Result};
use crate::query::Query;

/// Read-only view of one attached item.
#[derive(Clone, Copy)]
pub struct ItemRef<'a> {
    tree: &'a Tree,
    id: ItemId,
}

impl<'a> ItemRef<'a> {
    pub(crate) fn new(tree: &'a Tree, id: ItemId) -> Self {
        Self { tree, id }
    }

    pub fn handle(&self) -> ItemId {
        self.id
    }

    pub fn id(&self) -> &'a str {
        &self.tree.node(self.id).item.id
    }

    pub fn label(&self) -> &'a str {
        self.tree.node(self.id).item.label()
    }

    pub fn blob(&self) -> Option<&'a Value> {
        self.tree.node(self.id).item.blob.as_ref()
    }

    pub fn dialect(&self) -> Option<&'a str> {
        self.tree.node(self.id).item.dialect.as_deref()
    }

    pub fn kind(&self) -> ItemKind {
        self.tree.kind(self.id)
    }

    pub fn is_dataset(&self) -> bool {
        self.kind() == ItemKind::Dataset
    }

    pub fn is_collection(&self) -> bool {
        self.kind() == ItemKind::Collection
    }

    pub fn is_root(&self) -> bool {
        self.id == self.tree.root() && self.id() == ROOT
    }

    pub fn parent(&self) -> Option<ItemRef<'a>> {
        self.tree.parent(self.id).map(|p| ItemRef::new(self.tree, p))
    }

    /// Collections from just below the root down to this item.
    pub fn path(&self) -> Vec<ItemRef<'a>> {
        self.tree
            .path(self.id)
            .into_iter()
            .map(|p| ItemRef::new(self.tree, p))
            .collect()
    }

    /// Children, if this is a collection whose children were fetched.
    pub fn items(&self) -> Option<ItemList<'a>> {
        self.tree.item_list(self.id)
    }

    /// Last query a dataset was fetched with.
    pub fn query(&self) -> Option<&'a Query> {
        match &self.tree.node(self.id).state {
            NodeState::Dataset(state) => state.query.as_ref(),
            NodeState::Collection { .. } => None,
        }
    }

    /// Look a datatype up in the scraper's catalogue.
    pub fn datatype(&self, id: &str) -> Result<Rc<Datatype>> {
        self.tree.datatype(id)
    }
}

impl PartialEq for ItemRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl PartialEq<str> for ItemRef<'_> {
    fn eq(&self, other: &str) -> bool {
        self.id() == other
    }
}

impl PartialEq<&str> for ItemRef<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.id() == *other
    }
}

impl fmt::Debug for ItemRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.kind(), self.id())
    }
}

impl fmt::Display for ItemRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How to pick a child out of an [`ItemList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKey<'k> {
    Id(&'k str),
    Ref(ItemId),
    Index(usize),
}

impl<'k> From<&'k str> for ItemKey<'k> {
    fn from(id: &'k str) -> Self {
        ItemKey::Id(id)
    }
}

impl<'k> From<&'k String> for ItemKey<'k> {
    fn from(id: &'k String) -> Self {
        ItemKey::Id(id.as_str())
    }
}

impl From<ItemId> for ItemKey<'_> {
    fn from(id: ItemId) -> Self {
        ItemKey::Ref(id)
    }
}

impl From<ItemRef<'_>> for ItemKey<'_> {
    fn from(item: ItemRef<'_>) -> Self {
        ItemKey::Ref(item.handle())
    }
}

impl From<usize> for ItemKey<'_> {
    fn from(ix: usize) -> Self {
        ItemKey::Index(ix)
    }
}

impl fmt::Display for ItemKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Id(id) => write!(f, "`{id}`"),
            ItemKey::Ref(id) => write!(f, "item #{}", id.ix),
            ItemKey::Index(ix) => write!(f, "index {ix}"),
        }
    }
}

/// The children of one collection.
#[derive(Clone, Copy)]
pub struct ItemList<'a> {
    tree: &'a Tree,
    ids: &'a [ItemId],
}

impl<'a> ItemList<'a> {
    pub(crate) fn new(tree: &'a Tree, ids: &'a [ItemId]) -> Self {
        Self { tree, ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &'a [ItemId] {
        self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemRef<'a>> + use<'a> {
        let (tree, ids) = (self.tree, self.ids);
        ids.iter().map(move |&id| ItemRef::new(tree, id))
    }

    /// Kind of the first item; `None` when empty.
    pub fn kind(&self) -> Option<ItemKind> {
        self.ids.first().map(|&id| self.tree.kind(id))
    }

    pub fn by_id(&self, id: &str) -> Result<ItemRef<'a>> {
        self.iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| no_such(ItemKey::Id(id)))
    }

    pub fn by_ref(&self, id: ItemId) -> Result<ItemRef<'a>> {
        self.ids
            .contains(&id)
            .then(|| ItemRef::new(self.tree, id))
            .ok_or_else(|| no_such(ItemKey::Ref(id)))
    }

    pub fn at_index(&self, ix: usize) -> Result<ItemRef<'a>> {
        self.ids
            .get(ix)
            .map(|&id| ItemRef::new(self.tree, id))
            .ok_or_else(|| no_such(ItemKey::Index(ix)))
    }

    pub fn get<'k>(&self, key: impl Into<ItemKey<'k>>) -> Result<ItemRef<'a>> {
        match key.into() {
            ItemKey::Id(id) => self.by_id(id),
            ItemKey::Ref(id) => self.by_ref(id),
            ItemKey::Index(ix) => self.at_index(ix),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.iter().any(|item| item.id() == id)
    }

    pub fn get_by_label(&self, label: &str) -> Option<ItemRef<'a>> {
        self.iter().find(|item| item.label() == label)
    }
}

impl fmt::Debug for ItemList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

fn no_such(key: ItemKey<'_>) -> Error {
    Error::NoSuchItem(format!("no item {key} here"))
}
