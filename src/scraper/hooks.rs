// src/scraper/hooks.rs
use std::collections::HashMap;
use std::fmt;

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::tree::ItemRef;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Once, right after construction.
    Init,
    /// After every `move_up`, also when already at the top.
    Up,
    /// Whenever the cursor lands on the root.
    Top,
    /// After `move_to` selected a child.
    Select,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::Init => "init",
            Hook::Up => "up",
            Hook::Top => "top",
            Hook::Select => "select",
        };
        f.write_str(name)
    }
}

/// What a hook gets to see besides the adapter itself.
pub struct HookContext<'a> {
    pub hook: Hook,
    /// Cursor position after the move.
    pub current: ItemRef<'a>,
    pub config: &'a ScraperConfig,
}

pub type HookFn<A> = Box<dyn FnMut(&mut A, &HookContext<'_>) -> Result<()>>;

/// Per-scraper hook table. Callbacks run in registration order; the first
/// error stops the rest and is returned to whoever moved the cursor.
pub struct Hooks<A> {
    table: HashMap<Hook, Vec<HookFn<A>>>,
}

impl<A> Default for Hooks<A> {
    fn default() -> Self {
        Self { table: HashMap::new() }
    }
}

impl<A> Hooks<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `f` to `hook`. Plain methods work:
    /// `hooks.on(Hook::Init, Self::read_config)`.
    pub fn on<F>(&mut self, hook: Hook, f: F) -> &mut Self
    where
        F: FnMut(&mut A, &HookContext<'_>) -> Result<()> + 'static,
    {
        self.table.entry(hook).or_default().push(Box::new(f));
        self
    }

    pub fn count(&self, hook: Hook) -> usize {
        self.table.get(&hook).map_or(0, Vec::len)
    }

    pub(crate) fn fire(&mut self, adapter: &mut A, ctx: &HookContext<'_>) -> Result<()> {
        let Some(callbacks) = self.table.get_mut(&ctx.hook) else {
            return Ok(());
        };
        logd!("firing {} `{}` hook(s) at `{}`", callbacks.len(), ctx.hook, ctx.current.id());
        for f in callbacks.iter_mut() {
            f(adapter, ctx)?;
        }
        Ok(())
    }
}
