// src/export.rs
use std::collections::BTreeSet;
use std::io::{self, Write};

use serde_json::{Map, Value};

use crate::config::consts::VALUE_KEY;
use crate::error::Result;
use crate::model::ResultSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    /// Field separator; `None` for non-delimited formats.
    pub fn delim(&self) -> Option<char> {
        match self {
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
            ExportFormat::Json => None,
        }
    }
}

/* ---------------- Columns ---------------- */

/// Header of a delimited export: every dimension id in any row, sorted,
/// then the measure.
pub fn columns(rs: &ResultSet) -> Vec<String> {
    let mut dims: BTreeSet<String> = rs
        .dimensions()
        .map(|list| list.iter().map(|d| d.id().to_string()).collect())
        .unwrap_or_default();
    for row in rs {
        if row.is_bound() {
            dims.extend(row.dimension_values().iter().map(|v| v.id().to_string()));
        } else {
            dims.extend(row.raw_dimensions().iter().map(|(k, _)| k.clone()));
        }
    }
    dims.remove(VALUE_KEY);
    let mut out: Vec<String> = dims.into_iter().collect();
    out.push(s!(VALUE_KEY));
    out
}

fn cell(record: &Map<String, Value>, column: &str) -> String {
    match record.get(column) {
        None | Some(Value::Null) => s!(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{sep}")?;
        } else {
            first = false;
        }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/// Header plus one line per row. Missing cells are left empty.
pub fn write_delimited<W: Write>(mut w: W, rs: &ResultSet, sep: char) -> io::Result<()> {
    let columns = columns(rs);
    write_row(&mut w, &columns, sep)?;
    for record in rs.records() {
        let line: Vec<String> = columns.iter().map(|c| cell(&record, c)).collect();
        write_row(&mut w, &line, sep)?;
    }
    Ok(())
}

pub fn to_delimited(rs: &ResultSet, sep: char) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec can not fail.
    let _ = write_delimited(&mut buf, rs, sep);
    String::from_utf8_lossy(&buf).into_owned()
}

/// The records as a pretty-printed JSON array.
pub fn to_json(rs: &ResultSet) -> Result<String> {
    let records: Vec<Value> = rs.records().into_iter().map(Value::Object).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

pub fn render(rs: &ResultSet, format: ExportFormat) -> Result<String> {
    match format.delim() {
        Some(sep) => Ok(to_delimited(rs, sep)),
        None => to_json(rs),
    }
}
