// src/model/result.rs
use std::ops::Index;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::dimension::{DimensionList, DimensionValue, RawValue};
use crate::config::consts::VALUE_KEY;
use crate::error::{Error, Result};

/// One data row: a measure plus the dimension values locating it.
#[derive(Clone, Debug)]
pub struct ResultRow {
    value: Value,
    raw_dimensions: Vec<(String, RawValue)>,
    dimension_values: Vec<DimensionValue>,
}

impl ResultRow {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            raw_dimensions: Vec::new(),
            dimension_values: Vec::new(),
        }
    }

    /// Add one raw dimension value. Later calls for the same id replace earlier ones.
    pub fn with(mut self, dimension: impl Into<String>, raw: impl Into<RawValue>) -> Self {
        let dimension = dimension.into();
        let raw = raw.into();
        match self.raw_dimensions.iter_mut().find(|(k, _)| *k == dimension) {
            Some(slot) => slot.1 = raw,
            None => self.raw_dimensions.push((dimension, raw)),
        }
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn raw_dimensions(&self) -> &[(String, RawValue)] {
        &self.raw_dimensions
    }

    /// Empty until the row has been pushed into a dataset's [`ResultSet`].
    pub fn dimension_values(&self) -> &[DimensionValue] {
        &self.dimension_values
    }

    pub fn get(&self, dimension: &str) -> Option<&DimensionValue> {
        self.dimension_values.iter().find(|v| v.id() == dimension)
    }

    pub fn is_bound(&self) -> bool {
        !self.dimension_values.is_empty()
    }

    /// Flat mapping of dimension id to value, plus [`VALUE_KEY`] for the measure.
    /// Unbound rows report their raw values.
    pub fn record(&self) -> Map<String, Value> {
        let mut out = Map::new();
        if self.is_bound() {
            for v in &self.dimension_values {
                out.insert(v.id().to_string(), Value::String(v.value().to_string()));
            }
        } else {
            for (k, raw) in &self.raw_dimensions {
                out.insert(k.clone(), Value::String(raw.text().to_string()));
            }
        }
        out.insert(s!(VALUE_KEY), self.value.clone());
        out
    }
}

/// The rows one dataset query produced.
///
/// Rows pushed into a set that knows its dataset's dimensions are bound on
/// the way in: each raw value becomes a [`DimensionValue`], normalized from
/// the dimension's dialect to the canonical spelling.
#[derive(Clone, Debug, Default)]
pub struct ResultSet {
    rows: Vec<ResultRow>,
    dataset: Option<String>,
    dialect: Option<String>,
    dimensions: Option<Rc<DimensionList>>,
}

impl ResultSet {
    /// A free-standing set; rows are stored as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set for `dataset`, binding rows against `dimensions`.
    pub fn bound(
        dataset: impl Into<String>,
        dimensions: Rc<DimensionList>,
        dialect: Option<String>,
    ) -> Self {
        Self {
            rows: Vec::new(),
            dataset: Some(dataset.into()),
            dialect,
            dimensions: Some(dimensions),
        }
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    pub fn dialect(&self) -> Option<&str> {
        self.dialect.as_deref()
    }

    pub fn dimensions(&self) -> Option<&Rc<DimensionList>> {
        self.dimensions.as_ref()
    }

    pub fn push(&mut self, mut row: ResultRow) -> Result<()> {
        if let Some(dimensions) = &self.dimensions {
            row.dimension_values = bind(&row, dimensions)?;
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, ix: usize) -> Option<&ResultRow> {
        self.rows.get(ix)
    }

    pub fn last(&self) -> Option<&ResultRow> {
        self.rows.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.rows.iter()
    }

    /// The rows as flat mappings, ready for any table library.
    /// Column order is not meaningful.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows.iter().map(ResultRow::record).collect()
    }

    /// An independent copy with every datatype-backed value re-spelled in `dialect`.
    /// Values without a datatype are kept as they are.
    pub fn translate(&self, dialect: &str) -> Result<ResultSet> {
        let mut out = self.clone();
        out.dialect = Some(dialect.to_string());
        for row in &mut out.rows {
            for v in &mut row.dimension_values {
                if v.datatype().is_some() {
                    let spelled = v.translate(dialect)?;
                    v.set_value(spelled);
                }
            }
        }
        Ok(out)
    }
}

fn bind(row: &ResultRow, dimensions: &DimensionList) -> Result<Vec<DimensionValue>> {
    let mut out = Vec::with_capacity(row.raw_dimensions.len());
    for (key, raw) in &row.raw_dimensions {
        if key == VALUE_KEY {
            return Err(Error::InvalidId(format!(
                "row carries a dimension named `{VALUE_KEY}`"
            )));
        }
        let dimension = dimensions.by_id(key).ok();
        let normalized = match dimension {
            Some(d) => d.normalize(raw.text()),
            None => raw.text().to_string(),
        };
        let value = match (raw, dimension) {
            (RawValue::Value(v), Some(d)) => {
                let mut v = v.clone();
                v.rebind(d);
                v.set_value(normalized);
                v
            }
            (RawValue::Value(v), None) => {
                let mut v = v.clone();
                v.unbind(key);
                v.set_value(normalized);
                v
            }
            (RawValue::Text(_), Some(d)) => DimensionValue::new(normalized, d),
            (RawValue::Text(_), None) => DimensionValue::unbound(key.clone(), normalized),
        };
        out.push(value);
    }
    Ok(out)
}

impl Index<usize> for ResultSet {
    type Output = ResultRow;

    fn index(&self, ix: usize) -> &ResultRow {
        &self.rows[ix]
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
