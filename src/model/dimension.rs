// src/model/dimension.rs
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::list::{List, Listed};
use crate::config::consts::VALUE_KEY;
use crate::datatypes::{Datatype, join_spellings};
use crate::error::{Error, Result};

pub type ValueList = List<DimensionValue>;
pub type DimensionList = List<Rc<Dimension>>;

/// One categorical entry, e.g. `"Umeå kommun"` for dimension `municipality`.
#[derive(Clone, Debug)]
pub struct DimensionValue {
    value: String,
    id: String,
    label: Option<String>,
    dialects: BTreeMap<String, Vec<String>>,
    datatype: Option<Rc<Datatype>>,
    domain: Option<String>,
}

impl DimensionValue {
    /// A value belonging to `dimension`; takes over its id and datatype.
    pub fn new(value: impl Into<String>, dimension: &Dimension) -> Self {
        Self {
            value: value.into(),
            id: dimension.id.clone(),
            label: None,
            dialects: BTreeMap::new(),
            datatype: dimension.datatype.clone(),
            domain: None,
        }
    }

    /// A value for a dimension id the dataset does not declare.
    pub fn unbound(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            id: id.into(),
            label: None,
            dialects: BTreeMap::new(),
            datatype: None,
            domain: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>, spellings: Vec<String>) -> Self {
        self.dialects.insert(dialect.into(), spellings);
        self
    }

    pub(crate) fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Id of the dimension this value belongs to.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn dialects(&self) -> &BTreeMap<String, Vec<String>> {
        &self.dialects
    }

    /// Alternate spellings in `dialect`; empty if none are known.
    pub fn spellings(&self, dialect: &str) -> &[String] {
        self.dialects.get(dialect).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn datatype(&self) -> Option<&Rc<Datatype>> {
        self.datatype.as_ref()
    }

    /// Catalogue sub-domain this value was loaded from, e.g. `region/sweden/municipalities`.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Every spelling of this value in `dialect`, comma-joined, commas escaped.
    pub fn translate(&self, dialect: &str) -> Result<String> {
        let not_translatable = || Error::NotTranslatable {
            value: self.value.clone(),
            dialect: dialect.to_string(),
        };
        let datatype = self.datatype.as_ref().ok_or_else(not_translatable)?;
        let canonical = datatype
            .allowed_values()
            .by_value(&self.value)
            .map_err(|_| not_translatable())?;
        let spellings = canonical.spellings(dialect);
        if spellings.is_empty() {
            return Err(not_translatable());
        }
        Ok(join_spellings(spellings))
    }

    pub(crate) fn rebind(&mut self, dimension: &Dimension) {
        self.id = dimension.id.clone();
        self.datatype = dimension.datatype.clone();
    }

    /// File under an undeclared dimension `id`.
    pub(crate) fn unbind(&mut self, id: &str) {
        self.id = id.to_string();
    }
}

impl PartialEq for DimensionValue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.value == other.value
    }
}

impl PartialEq<str> for DimensionValue {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for DimensionValue {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Listed for DimensionValue {
    const KIND: &'static str = "value";

    fn key(&self) -> &str {
        &self.value
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl List<DimensionValue> {
    pub fn by_value(&self, value: &str) -> Result<&DimensionValue> {
        self.by_key(value)
    }

    pub fn by_value_mut(&mut self, value: &str) -> Result<&mut DimensionValue> {
        self.by_key_mut(value)
    }
}

/// A dimension value as an adapter hands it over: plain text, or an
/// already-built [`DimensionValue`].
#[derive(Clone, Debug)]
pub enum RawValue {
    Text(String),
    Value(DimensionValue),
}

impl RawValue {
    pub fn text(&self) -> &str {
        match self {
            RawValue::Text(s) => s,
            RawValue::Value(v) => v.value(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<&String> for RawValue {
    fn from(s: &String) -> Self {
        RawValue::Text(s.clone())
    }
}

impl From<DimensionValue> for RawValue {
    fn from(v: DimensionValue) -> Self {
        RawValue::Value(v)
    }
}

/// A named categorical axis of a dataset.
#[derive(Clone, Debug)]
pub struct Dimension {
    id: String,
    label: Option<String>,
    datatype: Option<Rc<Datatype>>,
    dialect: Option<String>,
    domain: Option<String>,
    allowed_values: OnceCell<ValueList>,
}

impl Dimension {
    /// Fails with [`Error::InvalidId`] if `id` is the reserved value column.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id == VALUE_KEY {
            return Err(Error::InvalidId(format!(
                "`{VALUE_KEY}` is reserved for the measure and can not be a dimension id"
            )));
        }
        Ok(Self {
            id,
            label: None,
            datatype: None,
            dialect: None,
            domain: None,
            allowed_values: OnceCell::new(),
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_datatype(mut self, datatype: Rc<Datatype>) -> Self {
        self.datatype = Some(datatype);
        self
    }

    /// Spelling convention the raw data for this dimension arrives in.
    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }

    /// Narrow the datatype's values to one sub-domain, e.g. `sweden/municipalities`.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        let list = self.bind_values(values);
        self.allowed_values = OnceCell::from(list);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display label; the id when none was given.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn datatype(&self) -> Option<&Rc<Datatype>> {
        self.datatype.as_ref()
    }

    pub fn dialect(&self) -> Option<&str> {
        self.dialect.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Explicit values, else the datatype's (domain-filtered) values.
    /// `None` means they must be fetched from the adapter, see
    /// [`Scraper::dimension`](crate::scraper::Scraper::dimension).
    pub fn allowed_values(&self) -> Option<&ValueList> {
        if let Some(list) = self.allowed_values.get() {
            return Some(list);
        }
        let datatype = self.datatype.as_ref()?;
        Some(self.allowed_values.get_or_init(|| self.values_from(datatype)))
    }

    pub fn allowed_values_mut(&mut self) -> Option<&mut ValueList> {
        if self.allowed_values.get().is_none() {
            let datatype = self.datatype.clone()?;
            let list = self.values_from(&datatype);
            self.allowed_values = OnceCell::from(list);
        }
        self.allowed_values.get_mut()
    }

    pub(crate) fn fill_allowed_values<I, V>(&self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        let list = self.bind_values(values);
        let _ = self.allowed_values.set(list);
    }

    /// Replace a raw spelling in this dimension's dialect by the canonical value.
    /// The datatype's table is searched, within this dimension's domain.
    /// No match leaves it unchanged; with several matches the first wins.
    pub fn normalize(&self, raw: &str) -> String {
        let (Some(dialect), Some(datatype)) = (self.dialect.as_deref(), self.datatype.as_ref())
        else {
            return raw.to_string();
        };
        if !datatype.has_dialect(dialect) {
            return raw.to_string();
        }
        let mut hits = self
            .in_domain(datatype)
            .filter(|v| v.spellings(dialect).iter().any(|s| s == raw));
        let Some(first) = hits.next() else {
            return raw.to_string();
        };
        if let Some(other) = hits.next() {
            logw!(
                "`{raw}` is ambiguous in dialect `{dialect}` of `{}` (`{}`, `{}`, ...); using the first",
                datatype.id(),
                first.value(),
                other.value()
            );
        }
        first.value().to_string()
    }

    fn bind_values<I, V>(&self, values: I) -> ValueList
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        values
            .into_iter()
            .map(|v| match v.into() {
                RawValue::Text(text) => DimensionValue::new(text, self),
                RawValue::Value(value) => value,
            })
            .collect()
    }

    /// The datatype's values, narrowed to this dimension's domain if it has one.
    fn in_domain<'d>(
        &self,
        datatype: &'d Datatype,
    ) -> impl Iterator<Item = &'d DimensionValue> + use<'d> {
        let prefix = match (&self.domain, datatype.domain()) {
            (Some(sub), Some(base)) => Some(join!(base, "/", sub)),
            (Some(sub), None) => Some(sub.clone()),
            _ => None,
        };
        datatype
            .allowed_values()
            .iter()
            .filter(move |v| match (&prefix, v.domain()) {
                (None, _) => true,
                (Some(p), Some(d)) => d == p || d.starts_with(&join!(p, "/")),
                (Some(_), None) => false,
            })
    }

    fn values_from(&self, datatype: &Rc<Datatype>) -> ValueList {
        self.in_domain(datatype)
            .map(|v| {
                let mut v = v.clone();
                v.rebind(self);
                v
            })
            .collect()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl Listed for Dimension {
    const KIND: &'static str = "dimension";

    fn key(&self) -> &str {
        &self.id
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl List<Rc<Dimension>> {
    pub fn by_id(&self, id: &str) -> Result<&Rc<Dimension>> {
        self.by_key(id)
    }
}
