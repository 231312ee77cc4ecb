// src/adapters/folder.rs
//! A directory of CSV files as a source.
//!
//! ```text
//! root/
//!   health/                        Collection `health`
//!     visits.csv                   Dataset `visits`
//!     visits.dimensions.json       optional column metadata
//!   population.csv                 Dataset `population`
//! ```
//!
//! Every column of a dataset file is a dimension except `value`, which is
//! the measure. The sidecar maps column names to
//! `{"label", "datatype", "dialect", "domain"}`, all optional.
//!
//! A query is a JSON object from column name to a value or a list of
//! values; rows whose raw cell matches are kept.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Number, Value};

use crate::config::consts::{DIMENSIONS_SIDECAR, VALUE_KEY};
use crate::error::{Error, Result};
use crate::model::{Dimension, RawValue, ResultRow};
use crate::query::Query;
use crate::scraper::{Adapter, RowStream};
use crate::tree::{Item, ItemRef};

/// Blob key holding an item's path relative to the folder root.
const PATH_KEY: &str = "path";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ColumnSpec {
    label: Option<String>,
    datatype: Option<String>,
    dialect: Option<String>,
    domain: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Folder {
    root: PathBuf,
}

impl Folder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory or file an item stands for.
    fn path_of(&self, item: ItemRef<'_>) -> PathBuf {
        match item
            .blob()
            .and_then(|b| b.get(PATH_KEY))
            .and_then(Value::as_str)
        {
            Some(rel) => self.root.join(rel),
            None => self.root.clone(),
        }
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn sidecar(&self, file: &Path) -> Result<BTreeMap<String, ColumnSpec>> {
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            return Ok(BTreeMap::new());
        };
        let path = file.with_file_name(join!(stem, DIMENSIONS_SIDECAR));
        if !path.is_file() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let specs = serde_json::from_str(&text).map_err(|e| {
            Error::InvalidData(format!("{}: {e}", path.display()))
        })?;
        Ok(specs)
    }
}

impl Adapter for Folder {
    fn fetch_children(&mut self, item: ItemRef<'_>) -> Result<Vec<Item>> {
        let dir = self.path_of(item);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| Error::io(&dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        let mut items = Vec::new();
        for path in entries {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            let mut blob = Map::new();
            blob.insert(s!(PATH_KEY), Value::String(self.relative(&path)));
            let blob = Value::Object(blob);
            if path.is_dir() {
                items.push(Item::collection(stem).with_blob(blob));
            } else if path.extension().and_then(|s| s.to_str()) == Some("csv") {
                items.push(Item::dataset(stem).with_blob(blob));
            }
        }
        Ok(items)
    }

    fn fetch_dimensions(&mut self, dataset: ItemRef<'_>) -> Result<Vec<Dimension>> {
        let file = self.path_of(dataset);
        let mut reader = open_csv(&file)?;
        let headers = reader.headers().map_err(Error::upstream)?.clone();
        let mut specs = self.sidecar(&file)?;

        let mut dims = Vec::new();
        for column in headers.iter().filter(|h| *h != VALUE_KEY) {
            let spec = specs.remove(column).unwrap_or_default();
            let mut dim = Dimension::new(column)?;
            if let Some(label) = spec.label {
                dim = dim.with_label(label);
            }
            if let Some(datatype) = spec.datatype {
                dim = dim.with_datatype(dataset.datatype(&datatype)?);
            }
            if let Some(dialect) = spec.dialect {
                dim = dim.with_dialect(dialect);
            }
            if let Some(domain) = spec.domain {
                dim = dim.with_domain(domain);
            }
            dims.push(dim);
        }
        for column in specs.keys() {
            logw!("`{}` describes a column `{column}` it does not have", dataset.id());
        }
        Ok(dims)
    }

    /// Distinct cells of the column, in order of appearance.
    fn fetch_allowed_values(
        &mut self,
        dataset: ItemRef<'_>,
        dimension: &Dimension,
    ) -> Result<Vec<RawValue>> {
        let mut reader = open_csv(&self.path_of(dataset))?;
        let headers = reader.headers().map_err(Error::upstream)?.clone();
        let Some(col) = headers.iter().position(|h| h == dimension.id()) else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for rec in reader.records() {
            let rec = rec.map_err(Error::upstream)?;
            if let Some(cell) = rec.get(col) {
                if seen.insert(cell.to_string()) {
                    out.push(RawValue::from(cell));
                }
            }
        }
        Ok(out)
    }

    fn fetch_data<'a>(
        &'a mut self,
        dataset: ItemRef<'_>,
        query: Option<&Query>,
    ) -> Result<RowStream<'a>> {
        let filter = Filter::parse(query)?;
        let mut reader = open_csv(&self.path_of(dataset))?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(Error::upstream)?
            .iter()
            .map(str::to_string)
            .collect();

        let stream = reader.into_records().filter_map(move |rec| {
            let rec = match rec {
                Ok(rec) => rec,
                Err(e) => return Some(Err(Error::upstream(e))),
            };
            if !filter.matches(&headers, &rec) {
                return None;
            }
            let measure = headers
                .iter()
                .position(|h| h == VALUE_KEY)
                .and_then(|i| rec.get(i))
                .map_or(Value::Null, parse_measure);
            let row = headers
                .iter()
                .zip(rec.iter())
                .filter(|(column, _)| *column != VALUE_KEY)
                .fold(ResultRow::new(measure), |row, (column, cell)| {
                    row.with(column.as_str(), cell)
                });
            Some(Ok(row))
        });
        Ok(Box::new(stream))
    }
}

/// Accepted cells per column; an empty filter keeps every row.
#[derive(Debug, Default)]
struct Filter {
    allowed: BTreeMap<String, Vec<String>>,
}

impl Filter {
    fn parse(query: Option<&Query>) -> Result<Self> {
        let Some(query) = query else {
            return Ok(Self::default());
        };
        let map: &Map<String, Value> = match query {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidData(format!(
                    "a folder query must be an object of column filters, got {other}"
                )));
            }
        };

        let mut allowed = BTreeMap::new();
        for (column, wanted) in map {
            let list = match wanted {
                Value::Array(items) => items.iter().map(cell_text).collect(),
                one => vec![cell_text(one)],
            };
            allowed.insert(column.clone(), list);
        }
        Ok(Self { allowed })
    }

    fn matches(&self, headers: &[String], rec: &csv::StringRecord) -> bool {
        self.allowed.iter().all(|(column, wanted)| {
            headers
                .iter()
                .position(|h| h == column)
                .and_then(|i| rec.get(i))
                .is_some_and(|cell| wanted.iter().any(|w| w == cell))
        })
    }
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Integers and floats become JSON numbers, blanks null, anything else stays text.
fn parse_measure(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = cell.parse::<i64>() {
        return Value::from(n);
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(s!(cell))
}

fn open_csv(path: &Path) -> Result<csv::Reader<fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(Error::upstream)
}
