// src/scraper/cursor.rs
use super::adapter::Adapter;
use super::hooks::Hook;
use super::Scraper;
use crate::error::{Error, Result};
use crate::tree::{ItemId, ItemKey, ItemKind, ItemList, ItemRef};

impl<A: Adapter> Scraper<A> {
    /* ---------------- primitives ---------------- */

    pub fn move_to_top(&mut self) -> Result<&mut Self> {
        self.current = self.tree.root();
        logd!("cursor at top");
        self.fire(Hook::Top)?;
        Ok(self)
    }

    /// Step to the parent. At the top this stays put, but `up` (and `top`) still fire.
    pub fn move_up(&mut self) -> Result<&mut Self> {
        if let Some(parent) = self.tree.parent(self.current) {
            self.current = parent;
        }
        logd!("cursor up to `{}`", self.current().id());
        self.fire(Hook::Up)?;
        if self.current == self.tree.root() {
            self.fire(Hook::Top)?;
        }
        Ok(self)
    }

    /// Select a child of the current item by id, handle or position.
    /// On a dataset or a childless collection this does nothing.
    pub fn move_to<'k>(&mut self, key: impl Into<ItemKey<'k>>) -> Result<&mut Self> {
        self.ensure_children(self.current)?;
        let target = match self.tree.item_list(self.current) {
            Some(list) if !list.is_empty() => Some(list.get(key)?.handle()),
            _ => None,
        };
        let Some(target) = target else {
            return Ok(self);
        };
        self.current = target;
        logd!("cursor selected `{}`", self.current().id());
        self.fire(Hook::Select)?;
        Ok(self)
    }

    /// Move the cursor onto `target` from wherever it is, using only the
    /// primitives above so every hook on the way fires.
    ///
    /// A `target` from another scraper is a [`Error::NoSuchItem`].
    pub fn teleport(&mut self, target: ItemId) -> Result<&mut Self> {
        self.tree.check(target)?;
        if target == self.current {
            return Ok(self);
        }
        let target_parent = self.tree.parent(target);
        let current_parent = self.tree.parent(self.current);

        if target_parent == Some(self.current) {
            return self.move_to(target);
        }
        if current_parent == Some(target) {
            return self.move_up();
        }
        if target_parent.is_some() && target_parent == current_parent {
            self.move_up()?;
            return self.move_to(target);
        }

        logd!("cursor jumps to `{}` through the top", self.tree.item(target).id());
        self.move_to_top()?;
        for step in self.tree.path(target) {
            self.move_to(step)?;
        }
        Ok(self)
    }

    /* ---------------- children ---------------- */

    /// Children of the current item, fetched on first access.
    /// `None` for a dataset.
    pub fn items(&mut self) -> Result<Option<ItemList<'_>>> {
        self.ensure_children(self.current)?;
        Ok(self.tree.item_list(self.current))
    }

    /// Children of any collection; the cursor is moved there first.
    pub fn items_of(&mut self, collection: ItemId) -> Result<Option<ItemList<'_>>> {
        self.teleport(collection)?;
        self.items()
    }

    pub fn child<'k>(&mut self, key: impl Into<ItemKey<'k>>) -> Result<ItemRef<'_>> {
        self.ensure_children(self.current)?;
        match self.tree.item_list(self.current) {
            Some(list) => list.get(key),
            None => Err(Error::NoSuchItem(format!(
                "`{}` is a dataset and has no children",
                self.tree.item(self.current).id()
            ))),
        }
    }

    pub fn child_of<'k>(
        &mut self,
        collection: ItemId,
        key: impl Into<ItemKey<'k>>,
    ) -> Result<ItemRef<'_>> {
        self.teleport(collection)?;
        self.child(key)
    }

    /// Every dataset at or below the cursor, depth first. The cursor ends
    /// where it started.
    pub fn descendants(&mut self) -> Result<Vec<ItemId>> {
        let start = self.current;
        let mut found = Vec::new();
        self.walk(start, &mut found)?;
        self.teleport(start)?;
        Ok(found)
    }

    fn walk(&mut self, id: ItemId, found: &mut Vec<ItemId>) -> Result<()> {
        if self.tree.kind(id) == ItemKind::Dataset {
            found.push(id);
            return Ok(());
        }
        self.teleport(id)?;
        self.ensure_children(id)?;
        let children = self.tree.children(id).map(<[ItemId]>::to_vec).unwrap_or_default();
        for child in children {
            self.walk(child, found)?;
        }
        Ok(())
    }

    /// Ask the adapter for the children of `id` unless that was done already.
    pub(crate) fn ensure_children(&mut self, id: ItemId) -> Result<()> {
        if self.tree.kind(id) == ItemKind::Dataset || self.tree.children(id).is_some() {
            return Ok(());
        }
        let items = self.adapter.fetch_children(self.tree.item(id))?;
        logd!("`{}` has {} children", self.tree.item(id).id(), items.len());
        self.tree.attach(id, items);
        Ok(())
    }
}
