// src/scraper/fetch.rs
use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use super::adapter::{Adapter, RowStream};
use super::Scraper;
use crate::error::{Error, Result};
use crate::model::{Dimension, DimensionList, ResultRow, ResultSet};
use crate::query::{Query, query_hash};
use crate::tree::ItemId;

impl<A: Adapter> Scraper<A> {
    /// Dimensions of a dataset, asked from the adapter once.
    pub fn dimensions(&mut self, dataset: ItemId) -> Result<Rc<DimensionList>> {
        self.tree.check(dataset)?;
        if let Some(dims) = &self.tree.dataset(dataset)?.dimensions {
            return Ok(Rc::clone(dims));
        }
        self.teleport(dataset)?;
        let dims = self.adapter.fetch_dimensions(self.tree.item(dataset))?;
        let dims: Rc<DimensionList> = Rc::new(dims.into_iter().map(Rc::new).collect());
        self.tree.dataset_mut(dataset)?.dimensions = Some(Rc::clone(&dims));
        Ok(dims)
    }

    /// One dimension, with its allowed values resolved. Values that neither
    /// the dimension nor its datatype know are fetched from the adapter.
    pub fn dimension(&mut self, dataset: ItemId, id: &str) -> Result<Rc<Dimension>> {
        let dims = self.dimensions(dataset)?;
        let dim = Rc::clone(dims.by_id(id)?);
        if dim.allowed_values().is_none() {
            self.teleport(dataset)?;
            let values = self
                .adapter
                .fetch_allowed_values(self.tree.item(dataset), &dim)?;
            logd!("fetched {} allowed values for `{id}`", values.len());
            dim.fill_allowed_values(values);
        }
        Ok(dim)
    }

    /// Rows of `dataset` for `query`, or for its last query when `None`.
    ///
    /// Results are cached per dataset under the hash of the query, so a
    /// content-equal query returns the very same [`ResultSet`] without
    /// asking the adapter again.
    pub fn fetch(&mut self, dataset: ItemId, query: Option<Query>) -> Result<Rc<ResultSet>> {
        let query = self.store_query(dataset, query)?;
        let hash = query_hash(query.as_ref());
        if let Some(rs) = self.cached(dataset, &hash)? {
            logd!("cache hit for `{}` ({hash})", self.tree.item(dataset).id());
            return Ok(rs);
        }
        logd!("cache miss for `{}` ({hash})", self.tree.item(dataset).id());

        let mut rs = self.empty_result(dataset)?;
        for row in self.adapter.fetch_data(self.tree.item(dataset), query.as_ref())? {
            rs.push(row?)?;
        }
        let rs = Rc::new(rs);
        self.tree
            .dataset_mut(dataset)?
            .results
            .insert(hash, Rc::clone(&rs));
        Ok(rs)
    }

    /// Like [`fetch`](Self::fetch), but hands out each row as the adapter
    /// produces it. The complete set is cached once the stream runs dry;
    /// a stream dropped early or stopped by an error caches nothing.
    pub fn fetch_stream(
        &mut self,
        dataset: ItemId,
        query: Option<Query>,
    ) -> Result<FetchStream<'_>> {
        let query = self.store_query(dataset, query)?;
        let hash = query_hash(query.as_ref());
        if let Some(rs) = self.cached(dataset, &hash)? {
            logd!("cache hit for `{}` ({hash}), replaying", self.tree.item(dataset).id());
            return Ok(FetchStream {
                state: State::Cached { rs, pos: 0 },
            });
        }

        let rs = self.empty_result(dataset)?;
        let Scraper { adapter, tree, .. } = self;
        let rows = adapter.fetch_data(tree.item(dataset), query.as_ref())?;
        let slot = &mut tree.dataset_mut(dataset)?.results;
        Ok(FetchStream {
            state: State::Live {
                rows,
                rs,
                slot,
                hash,
            },
        })
    }

    /// Fetch with whatever query the dataset was last fetched with.
    pub fn data(&mut self, dataset: ItemId) -> Result<Rc<ResultSet>> {
        self.fetch(dataset, None)
    }

    /// `(rows, dimensions)` of the dataset's current data.
    pub fn shape(&mut self, dataset: ItemId) -> Result<(usize, usize)> {
        let rs = self.data(dataset)?;
        if rs.is_empty() {
            return Ok((0, 0));
        }
        let width = rs.dimensions().map_or(0, |d| d.len());
        Ok((rs.len(), width))
    }

    fn store_query(&mut self, dataset: ItemId, query: Option<Query>) -> Result<Option<Query>> {
        self.tree.check(dataset)?;
        let state = self.tree.dataset_mut(dataset)?;
        if let Some(query) = query {
            state.query = Some(query);
        }
        Ok(state.query.clone())
    }

    fn cached(&self, dataset: ItemId, hash: &str) -> Result<Option<Rc<ResultSet>>> {
        Ok(self.tree.dataset(dataset)?.results.get(hash).cloned())
    }

    /// Position on the dataset and set up a result set bound to its dimensions.
    fn empty_result(&mut self, dataset: ItemId) -> Result<ResultSet> {
        self.teleport(dataset)?;
        let dims = self.dimensions(dataset)?;
        let item = self.tree.item(dataset);
        Ok(ResultSet::bound(
            item.id(),
            dims,
            item.dialect().map(str::to_string),
        ))
    }
}

/// Rows of one fetch, pulled lazily. See [`Scraper::fetch_stream`].
pub struct FetchStream<'a> {
    state: State<'a>,
}

enum State<'a> {
    Cached {
        rs: Rc<ResultSet>,
        pos: usize,
    },
    Live {
        rows: RowStream<'a>,
        rs: ResultSet,
        slot: &'a mut HashMap<String, Rc<ResultSet>>,
        hash: String,
    },
    Done,
}

enum Step {
    Yield(ResultRow),
    Fail(Error),
    Finish,
}

impl FetchStream<'_> {
    /// Whether the rows come from an earlier fetch.
    pub fn is_cached(&self) -> bool {
        matches!(self.state, State::Cached { .. })
    }

    fn finish(&mut self) {
        if let State::Live { rs, slot, hash, .. } = mem::replace(&mut self.state, State::Done) {
            logd!("cached {} streamed rows ({hash})", rs.len());
            slot.insert(hash, Rc::new(rs));
        }
    }
}

impl Iterator for FetchStream<'_> {
    type Item = Result<ResultRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match &mut self.state {
            State::Done => return None,
            State::Cached { rs, pos } => match rs.get(*pos) {
                Some(row) => {
                    *pos += 1;
                    return Some(Ok(row.clone()));
                }
                None => Step::Finish,
            },
            State::Live { rows, rs, .. } => match rows.next() {
                Some(Ok(row)) => match rs.push(row) {
                    Ok(()) => match rs.last() {
                        Some(bound) => Step::Yield(bound.clone()),
                        None => Step::Finish,
                    },
                    Err(e) => Step::Fail(e),
                },
                Some(Err(e)) => Step::Fail(e),
                None => Step::Finish,
            },
        };

        match step {
            Step::Yield(row) => Some(Ok(row)),
            Step::Fail(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
            Step::Finish => {
                self.finish();
                None
            }
        }
    }
}
