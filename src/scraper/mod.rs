// src/scraper/mod.rs
//! The engine: one [`Scraper`] owns an adapter, the item tree it produced,
//! a cursor into that tree and the hooks fired when the cursor moves.
//!
//! Everything that needs the adapter to look at a particular item moves the
//! cursor there first (see [`Scraper::teleport`]), so adapters can rely on
//! navigation state such as an open session or a selected page.

pub mod adapter;
pub mod cursor;
pub mod fetch;
pub mod hooks;

pub use adapter::{Adapter, RowStream, rows};
pub use fetch::FetchStream;
pub use hooks::{Hook, HookContext, HookFn, Hooks};

use std::rc::Rc;

use crate::config::ScraperConfig;
use crate::datatypes::{Catalogue, Datatype};
use crate::error::Result;
use crate::tree::{ItemId, ItemRef, Tree};

pub struct Scraper<A: Adapter> {
    adapter: A,
    tree: Tree,
    hooks: Hooks<A>,
    config: ScraperConfig,
    current: ItemId,
}

impl<A: Adapter> Scraper<A> {
    pub fn new(adapter: A) -> Result<Self> {
        Self::with_config(adapter, ScraperConfig::default())
    }

    /// Build the scraper, let the adapter register its hooks, then fire `init`.
    pub fn with_config(adapter: A, config: ScraperConfig) -> Result<Self> {
        let mut hooks = Hooks::new();
        A::register_hooks(&mut hooks);

        let tree = Tree::new(config.dialect.clone(), config.catalogue_root.clone());
        let current = tree.root();
        let mut scraper = Self {
            adapter,
            tree,
            hooks,
            config,
            current,
        };
        scraper.fire(Hook::Init)?;
        Ok(scraper)
    }

    /// Subscribe one more callback after construction. `init` has already fired by then.
    pub fn on<F>(&mut self, hook: Hook, f: F) -> &mut Self
    where
        F: FnMut(&mut A, &HookContext<'_>) -> Result<()> + 'static,
    {
        self.hooks.on(hook, f);
        self
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn item(&self, id: ItemId) -> ItemRef<'_> {
        self.tree.item(id)
    }

    pub fn root(&self) -> ItemRef<'_> {
        self.tree.item(self.tree.root())
    }

    pub fn current(&self) -> ItemRef<'_> {
        self.tree.item(self.current)
    }

    pub fn parent(&self) -> Option<ItemRef<'_>> {
        self.current().parent()
    }

    pub fn path(&self) -> Vec<ItemRef<'_>> {
        self.current().path()
    }

    pub fn catalogue(&self) -> Result<Rc<Catalogue>> {
        self.tree.catalogue()
    }

    pub fn datatype(&self, id: &str) -> Result<Rc<Datatype>> {
        self.tree.datatype(id)
    }

    fn fire(&mut self, hook: Hook) -> Result<()> {
        let ctx = HookContext {
            hook,
            current: self.tree.item(self.current),
            config: &self.config,
        };
        self.hooks.fire(&mut self.adapter, &ctx)
    }
}
