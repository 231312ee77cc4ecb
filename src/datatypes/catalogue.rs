// src/datatypes/catalogue.rs
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;

use super::dialect::split_spellings;
use crate::config::consts::{DATATYPES_FILE, DIALECT_PREFIX, VALUES_DIR};
use crate::config::options::default_catalogue_root;
use crate::error::{Error, Result};
use crate::model::{DimensionValue, ValueList};

/// One row of `datatypes.csv`.
#[derive(Clone, Debug, Deserialize)]
struct DatatypeRecord {
    id: String,
    #[serde(default)]
    value_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    allowed_values: String,
}

/// A catalogued vocabulary.
#[derive(Debug)]
pub struct Datatype {
    id: String,
    value_type: String,
    description: String,
    domain: Option<String>,
    allowed_values: ValueList,
    dialects: BTreeSet<String>,
}

impl Datatype {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Value domain declared in the master table, if any.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Every known value; empty for datatypes without a domain.
    pub fn allowed_values(&self) -> &ValueList {
        &self.allowed_values
    }

    pub fn dialects(&self) -> &BTreeSet<String> {
        &self.dialects
    }

    pub fn has_dialect(&self, dialect: &str) -> bool {
        self.dialects.contains(dialect)
    }

    /// First allowed value spelled `spelling` in `dialect`.
    pub fn resolve(&self, dialect: &str, spelling: &str) -> Option<&DimensionValue> {
        self.allowed_values
            .iter()
            .find(|v| v.spellings(dialect).iter().any(|s| s == spelling))
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// The datatype master table plus lazily loaded value domains.
/// Each datatype is loaded at most once per catalogue.
#[derive(Debug)]
pub struct Catalogue {
    root: PathBuf,
    records: HashMap<String, DatatypeRecord>,
    loaded: RefCell<HashMap<String, Rc<Datatype>>>,
}

impl Catalogue {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let master = root.join(DATATYPES_FILE);
        let mut reader = reader_for(&master)?;

        let mut records = HashMap::new();
        for rec in reader.deserialize::<DatatypeRecord>() {
            let rec = rec.map_err(|e| catalogue_err(&master, e))?;
            records.insert(rec.id.clone(), rec);
        }
        logf!("opened datatype catalogue {} ({} datatypes)", root.display(), records.len());

        Ok(Self {
            root,
            records,
            loaded: RefCell::new(HashMap::new()),
        })
    }

    /// Open `$STATSCRAPER_DATATYPES`, or the catalogue bundled with the crate.
    pub fn open_default() -> Result<Self> {
        Self::open(default_catalogue_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Datatype ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn datatype(&self, id: &str) -> Result<Rc<Datatype>> {
        if let Some(dt) = self.loaded.borrow().get(id) {
            return Ok(Rc::clone(dt));
        }
        let rec = self
            .records
            .get(id)
            .ok_or_else(|| Error::NoSuchDatatype(id.to_string()))?;

        let domain = Some(rec.allowed_values.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let (allowed_values, dialects) = match &domain {
            Some(d) => self.load_domain(&rec.id, d)?,
            None => (ValueList::new(), BTreeSet::new()),
        };
        logd!("loaded datatype `{id}` ({} values)", allowed_values.len());

        let dt = Rc::new(Datatype {
            id: rec.id.clone(),
            value_type: rec.value_type.clone(),
            description: rec.description.clone(),
            domain,
            allowed_values,
            dialects,
        });
        self.loaded.borrow_mut().insert(id.to_string(), Rc::clone(&dt));
        Ok(dt)
    }

    fn load_domain(&self, id: &str, domain: &str) -> Result<(ValueList, BTreeSet<String>)> {
        let mut values = ValueList::new();
        let mut dialects = BTreeSet::new();
        for (path, sub) in self.domain_files(domain)? {
            read_values(&path, id, &sub, &mut values, &mut dialects)?;
        }
        Ok((values, dialects))
    }

    /// `values/<domain>.csv` and every csv under `values/<domain>/`, with the
    /// sub-domain each one stands for.
    fn domain_files(&self, domain: &str) -> Result<Vec<(PathBuf, String)>> {
        let base = self.root.join(VALUES_DIR);
        let mut out = Vec::new();

        let file = base.join(join!(domain, ".csv"));
        if file.is_file() {
            out.push((file, domain.to_string()));
        }
        let dir = base.join(domain);
        if dir.is_dir() {
            collect_csv(&dir, domain, &mut out)?;
        }
        if out.is_empty() {
            logw!("datatype domain `{domain}` has no value files under {}", base.display());
        }
        Ok(out)
    }
}

fn collect_csv(dir: &Path, prefix: &str, out: &mut Vec<(PathBuf, String)>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        let sub = join!(prefix, "/", &name);
        if path.is_dir() {
            collect_csv(&path, &sub, out)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("csv") {
            out.push((path, sub));
        }
    }
    Ok(())
}

fn read_values(
    path: &Path,
    datatype: &str,
    sub: &str,
    values: &mut ValueList,
    dialects: &mut BTreeSet<String>,
) -> Result<()> {
    let mut reader = reader_for(path)?;
    let headers = reader.headers().map_err(|e| catalogue_err(path, e))?.clone();

    let col = |name: &str| headers.iter().position(|h| h == name);
    let id_col = col("id").ok_or_else(|| {
        Error::InvalidData(format!("{}: value table has no `id` column", path.display()))
    })?;
    let label_col = col("label");
    let dialect_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| h.strip_prefix(DIALECT_PREFIX).map(|d| (i, d.to_string())))
        .collect();

    for rec in reader.records() {
        let rec = rec.map_err(|e| catalogue_err(path, e))?;
        let Some(id) = rec.get(id_col).filter(|s| !s.is_empty()) else {
            continue;
        };

        let mut spellings = BTreeMap::new();
        for (i, dialect) in &dialect_cols {
            let list = split_spellings(rec.get(*i).unwrap_or(""));
            if !list.is_empty() {
                spellings.insert(dialect.clone(), list);
            }
        }

        let mut value = DimensionValue::unbound(datatype, id).with_domain(sub);
        if let Some(label) = label_col.and_then(|i| rec.get(i)).filter(|s| !s.is_empty()) {
            value = value.with_label(label);
        }
        for (dialect, list) in spellings {
            value = value.with_dialect(dialect, list);
        }
        values.push(value);
    }

    dialects.extend(dialect_cols.into_iter().map(|(_, d)| d));
    Ok(())
}

fn reader_for(path: &Path) -> Result<csv::Reader<fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| catalogue_err(path, e))
}

fn catalogue_err(path: &Path, source: csv::Error) -> Error {
    Error::Catalogue {
        path: path.to_path_buf(),
        source,
    }
}
