// tests/export.rs
//
// Flat records and the CSV/TSV/JSON renderings of a result set.
//
use std::rc::Rc;

use serde_json::{Value, json};
use statscraper::export::{ExportFormat, columns, render, to_delimited, to_json};
use statscraper::model::DimensionList;
use statscraper::{Dimension, ResultRow, ResultSet};

fn sample() -> ResultSet {
    let dims: DimensionList = vec![
        Rc::new(Dimension::new("year").unwrap()),
        Rc::new(Dimension::new("municipality").unwrap()),
    ]
    .into();
    let mut rs = ResultSet::bound("visits", Rc::new(dims), None);
    rs.push(ResultRow::new(12).with("year", "2016").with("municipality", "Umeå kommun"))
        .unwrap();
    rs.push(ResultRow::new(1.5).with("year", "2017").with("municipality", "Rå, Sweden"))
        .unwrap();
    rs.push(ResultRow::new(Value::Null).with("year", "2018")).unwrap();
    rs
}

#[test]
fn records_carry_the_measure_under_value() {
    let records = sample().records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["value"], json!(12));
    assert_eq!(records[0]["municipality"], json!("Umeå kommun"));
    assert_eq!(records[0]["year"], json!("2016"));
    assert!(!records[2].contains_key("municipality"));
    assert_eq!(records[2]["value"], Value::Null);
}

#[test]
fn unbound_rows_report_raw_values() {
    let row = ResultRow::new(3).with("year", "2016");
    let record = row.record();
    assert_eq!(record["year"], json!("2016"));
    assert_eq!(record["value"], json!(3));
}

#[test]
fn columns_are_sorted_dimensions_then_value() {
    assert_eq!(columns(&sample()), ["municipality", "year", "value"]);
}

#[test]
fn csv_output() {
    let text = to_delimited(&sample(), ',');
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "municipality,year,value",
            "Umeå kommun,2016,12",
            "\"Rå, Sweden\",2017,1.5",
            ",2018,",
        ]
    );
}

#[test]
fn tsv_output() {
    let text = render(&sample(), ExportFormat::Tsv).unwrap();
    assert!(text.starts_with("municipality\tyear\tvalue\n"));
    assert!(text.contains("Rå, Sweden\t2017\t1.5\n"));
}

#[test]
fn json_output_parses_back() {
    let text = to_json(&sample()).unwrap();
    let back: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(back.len(), 3);
    assert_eq!(back[1]["municipality"], "Rå, Sweden");
    assert_eq!(back[1]["value"], 1.5);
}

#[test]
fn formats_know_their_extension() {
    assert_eq!(ExportFormat::Csv.ext(), "csv");
    assert_eq!(ExportFormat::Tsv.delim(), Some('\t'));
    assert_eq!(ExportFormat::Json.delim(), None);
    assert_eq!(ExportFormat::default(), ExportFormat::Csv);
}
