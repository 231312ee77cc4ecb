// src/tree/arena.rs
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use super::item::{Item, ItemId, ItemKind};
use super::view::{ItemList, ItemRef};
use crate::config::consts::ROOT;
use crate::datatypes::{Catalogue, Datatype};
use crate::error::{Error, Result};
use crate::model::{DimensionList, ResultSet};
use crate::query::Query;

pub(crate) struct Node {
    pub(crate) item: Item,
    pub(crate) parent: Option<ItemId>,
    pub(crate) state: NodeState,
}

pub(crate) enum NodeState {
    /// `None` until the adapter has been asked; an empty list is a real answer.
    Collection { children: Option<Vec<ItemId>> },
    Dataset(DatasetState),
}

#[derive(Default)]
pub(crate) struct DatasetState {
    pub(crate) dimensions: Option<Rc<DimensionList>>,
    pub(crate) results: HashMap<String, Rc<ResultSet>>,
    pub(crate) query: Option<Query>,
}

static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

/// Every item a scraper has seen, owned in one place.
/// Parent and child links are [`ItemId`]s into `nodes`.
pub struct Tree {
    tag: u32,
    nodes: Vec<Node>,
    catalogue_root: PathBuf,
    catalogue: OnceCell<Rc<Catalogue>>,
}

impl Tree {
    pub(crate) fn new(dialect: Option<String>, catalogue_root: PathBuf) -> Self {
        let mut root = Item::collection(ROOT);
        root.dialect = dialect;
        Self {
            tag: NEXT_TAG.fetch_add(1, Ordering::Relaxed),
            nodes: vec![Node {
                item: root,
                parent: None,
                state: NodeState::Collection { children: None },
            }],
            catalogue_root,
            catalogue: OnceCell::new(),
        }
    }

    pub fn root(&self) -> ItemId {
        ItemId { tree: self.tag, ix: 0 }
    }

    /// Panics if `id` comes from another scraper's tree, see [`get`](Self::get).
    pub fn item(&self, id: ItemId) -> ItemRef<'_> {
        ItemRef::new(self, id)
    }

    /// Like [`item`](Self::item), but a foreign handle is a [`Error::NoSuchItem`].
    pub fn get(&self, id: ItemId) -> Result<ItemRef<'_>> {
        self.check(id)?;
        Ok(ItemRef::new(self, id))
    }

    pub fn contains(&self, id: ItemId) -> bool {
        id.tree == self.tag && id.ix < self.nodes.len()
    }

    pub(crate) fn check(&self, id: ItemId) -> Result<()> {
        if self.contains(id) {
            return Ok(());
        }
        Err(Error::NoSuchItem(format!(
            "item #{} belongs to another scraper",
            id.ix
        )))
    }

    pub fn kind(&self, id: ItemId) -> ItemKind {
        self.node(id).item.kind
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.node(id).parent
    }

    /// Collections from just below the root down to `id` itself.
    pub fn path(&self, id: ItemId) -> Vec<ItemId> {
        let mut path = Vec::new();
        let mut node = Some(id);
        while let Some(n) = node {
            if n == self.root() {
                break;
            }
            path.push(n);
            node = self.parent(n);
        }
        path.reverse();
        path
    }

    /// Children already fetched for `id`; `None` for datasets and unfetched collections.
    pub fn children(&self, id: ItemId) -> Option<&[ItemId]> {
        match &self.node(id).state {
            NodeState::Collection { children } => children.as_deref(),
            NodeState::Dataset(_) => None,
        }
    }

    pub fn item_list(&self, id: ItemId) -> Option<ItemList<'_>> {
        self.children(id).map(|ids| ItemList::new(self, ids))
    }

    /// The catalogue this tree's datatypes come from, opened on first use.
    pub fn catalogue(&self) -> Result<Rc<Catalogue>> {
        if let Some(c) = self.catalogue.get() {
            return Ok(Rc::clone(c));
        }
        let c = Rc::new(Catalogue::open(&self.catalogue_root)?);
        let _ = self.catalogue.set(Rc::clone(&c));
        Ok(c)
    }

    pub fn datatype(&self, id: &str) -> Result<Rc<Datatype>> {
        self.catalogue()?.datatype(id)
    }

    /// Attach freshly produced children under `parent`, once.
    /// Children without a dialect inherit the parent's.
    pub(crate) fn attach(&mut self, parent: ItemId, items: Vec<Item>) -> Vec<ItemId> {
        let inherited = self.node(parent).item.dialect.clone();
        let mut seen = HashSet::new();
        let mut ids = Vec::with_capacity(items.len());

        for mut item in items {
            if !seen.insert(item.id.clone()) {
                logw!(
                    "duplicate id `{}` under `{}`; lookups by id find the first",
                    item.id,
                    self.node(parent).item.id
                );
            }
            if item.dialect.is_none() {
                item.dialect = inherited.clone();
            }
            let state = match item.kind {
                ItemKind::Collection => NodeState::Collection { children: None },
                ItemKind::Dataset => NodeState::Dataset(DatasetState::default()),
            };
            let id = ItemId {
                tree: self.tag,
                ix: self.nodes.len(),
            };
            self.nodes.push(Node {
                item,
                parent: Some(parent),
                state,
            });
            ids.push(id);
        }

        if let NodeState::Collection { children } = &mut self.node_mut(parent).state {
            *children = Some(ids.clone());
        }
        ids
    }

    pub(crate) fn node(&self, id: ItemId) -> &Node {
        assert_eq!(id.tree, self.tag, "item handle from another tree");
        &self.nodes[id.ix]
    }

    fn node_mut(&mut self, id: ItemId) -> &mut Node {
        assert_eq!(id.tree, self.tag, "item handle from another tree");
        &mut self.nodes[id.ix]
    }

    pub(crate) fn dataset(&self, id: ItemId) -> Result<&DatasetState> {
        match &self.node(id).state {
            NodeState::Dataset(state) => Ok(state),
            NodeState::Collection { .. } => Err(Error::NotADataset(self.node(id).item.id.clone())),
        }
    }

    pub(crate) fn dataset_mut(&mut self, id: ItemId) -> Result<&mut DatasetState> {
        let node = self.node_mut(id);
        match &mut node.state {
            NodeState::Dataset(state) => Ok(state),
            NodeState::Collection { .. } => Err(Error::NotADataset(node.item.id.clone())),
        }
    }
}
