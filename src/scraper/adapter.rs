// src/scraper/adapter.rs
use super::hooks::Hooks;
use crate::error::{Error, Result};
use crate::model::{Dimension, RawValue, ResultRow};
use crate::query::Query;
use crate::tree::{Item, ItemRef};

/// Rows as an adapter produces them, pulled one at a time.
pub type RowStream<'a> = Box<dyn Iterator<Item = Result<ResultRow>> + 'a>;

/// Box already-collected rows as a [`RowStream`].
pub fn rows<'a, I>(rows: I) -> RowStream<'a>
where
    I: IntoIterator<Item = ResultRow>,
    I::IntoIter: 'a,
{
    Box::new(rows.into_iter().map(Ok))
}

/// What a concrete source implements. The engine decides *when* to call;
/// the adapter only knows *how* to talk to its source.
///
/// Callbacks are made with the cursor already positioned on the item they
/// are about (children: the collection; dimensions and data: the dataset).
pub trait Adapter {
    /// Immediate children of `item`. Leaf-only adapters that never report
    /// children may leave this out; calling it then is an error.
    fn fetch_children(&mut self, item: ItemRef<'_>) -> Result<Vec<Item>> {
        let _ = item;
        Err(Error::Unimplemented("fetching list items"))
    }

    /// Dimensions of `dataset`. Defaults to none, with a warning.
    fn fetch_dimensions(&mut self, dataset: ItemRef<'_>) -> Result<Vec<Dimension>> {
        logw!("this scraper has no method for fetching dimensions of `{}`", dataset.id());
        Ok(Vec::new())
    }

    /// Allowed values for a dimension that was declared without them.
    fn fetch_allowed_values(
        &mut self,
        dataset: ItemRef<'_>,
        dimension: &Dimension,
    ) -> Result<Vec<RawValue>> {
        let _ = (dataset, dimension);
        Ok(Vec::new())
    }

    /// Rows of `dataset` for `query`. The stream may only borrow the adapter;
    /// copy out of `dataset` and `query` whatever it needs later.
    fn fetch_data<'a>(
        &'a mut self,
        dataset: ItemRef<'_>,
        query: Option<&Query>,
    ) -> Result<RowStream<'a>> {
        let _ = (dataset, query);
        Err(Error::Unimplemented("fetching data"))
    }

    /// Subscribe methods to navigation events. Called once per scraper, at construction.
    fn register_hooks(hooks: &mut Hooks<Self>)
    where
        Self: Sized,
    {
        let _ = hooks;
    }
}
