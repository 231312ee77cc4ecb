// tests/folder.rs
//
// The directory-of-CSV source, end to end.
//
use std::fs;
use std::path::PathBuf;

use serde_json::json;
use statscraper::adapters::Folder;
use statscraper::config::consts::DEFAULT_CATALOGUE_DIR;
use statscraper::export::{ExportFormat, render};
use statscraper::{Error, ItemId, ItemKind, Scraper, ScraperConfig};

fn fixture(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("statscraper_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("health")).unwrap();

    fs::write(
        root.join("health/visits.csv"),
        "municipality,year,value\n\
         2480 Umeå kommun,2016,12\n\
         2409 Robertsfors kommun,2016,7\n\
         2480 Umeå kommun,2017,15\n",
    )
    .unwrap();
    fs::write(
        root.join("health/visits.dimensions.json"),
        r#"{"municipality": {"label": "Kommun", "datatype": "region",
            "dialect": "scb", "domain": "sweden/municipalities"}}"#,
    )
    .unwrap();
    fs::write(root.join("population.csv"), "gender,year,value\nfemale,2016,100\nmale,2016,98\n").unwrap();
    fs::write(root.join("notes.txt"), "not a dataset").unwrap();
    root
}

fn scraper(root: PathBuf) -> Scraper<Folder> {
    let config = ScraperConfig::default().with_catalogue_root(DEFAULT_CATALOGUE_DIR);
    Scraper::with_config(Folder::new(root), config).unwrap()
}

fn visits(s: &mut Scraper<Folder>) -> ItemId {
    let health = s.child("health").unwrap().handle();
    s.child_of(health, "visits").unwrap().handle()
}

#[test]
fn directories_and_csv_files_become_items() {
    let mut s = scraper(fixture("items"));
    let list = s.items().unwrap().unwrap();
    let found: Vec<(String, ItemKind)> = list.iter().map(|i| (i.id().to_string(), i.kind())).collect();
    assert_eq!(
        found,
        [
            ("health".to_string(), ItemKind::Collection),
            ("population".to_string(), ItemKind::Dataset),
        ]
    );

    s.move_to("health").unwrap();
    let inner: Vec<String> = s.items().unwrap().unwrap().iter().map(|i| i.id().to_string()).collect();
    assert_eq!(inner, ["visits"]);
}

#[test]
fn header_and_sidecar_describe_dimensions() {
    let mut s = scraper(fixture("dims"));
    let ds = visits(&mut s);
    let dims = s.dimensions(ds).unwrap();
    assert_eq!(dims.len(), 2);

    let m = dims.by_id("municipality").unwrap();
    assert_eq!(m.label(), "Kommun");
    assert_eq!(m.datatype().unwrap().id(), "region");
    assert_eq!(m.dialect(), Some("scb"));
    assert_eq!(dims.by_id("year").unwrap().label(), "year");
    assert!(dims.by_id("value").is_err());
}

#[test]
fn rows_come_back_normalized() {
    let mut s = scraper(fixture("rows"));
    let ds = visits(&mut s);
    let rs = s.data(ds).unwrap();
    assert_eq!(rs.len(), 3);
    assert_eq!(rs[0].get("municipality").unwrap(), "Umeå kommun");
    assert_eq!(rs[1].get("municipality").unwrap(), "Robertsfors kommun");
    assert_eq!(rs[0].value(), 12);

    let numerical = rs.translate("numerical").unwrap();
    assert_eq!(numerical[0].get("municipality").unwrap(), "2480");
}

#[test]
fn queries_filter_rows() {
    let mut s = scraper(fixture("query"));
    let ds = visits(&mut s);

    let one_year = s.fetch(ds, Some(json!({"year": "2017"}))).unwrap();
    assert_eq!(one_year.len(), 1);
    assert_eq!(one_year[0].value(), 15);

    let both = s.fetch(ds, Some(json!({"year": [2016, 2017]}))).unwrap();
    assert_eq!(both.len(), 3);

    let raw = s
        .fetch(ds, Some(json!({"municipality": "2409 Robertsfors kommun"})))
        .unwrap();
    assert_eq!(raw.len(), 1);

    assert!(matches!(s.fetch(ds, Some(json!("2016"))), Err(Error::InvalidData(_))));
}

#[test]
fn allowed_values_from_column_or_datatype() {
    let mut s = scraper(fixture("values"));
    let ds = visits(&mut s);

    let year = s.dimension(ds, "year").unwrap();
    let years: Vec<&str> = year.allowed_values().unwrap().iter().map(|v| v.value()).collect();
    assert_eq!(years, ["2016", "2017"]);

    let m = s.dimension(ds, "municipality").unwrap();
    let values = m.allowed_values().unwrap();
    assert!(values.contains("Kiruna kommun"));
    assert!(!values.contains("eu"));
}

#[test]
fn datasets_without_sidecar_render() {
    let mut s = scraper(fixture("render"));
    let ds = s.child("population").unwrap().handle();
    let rs = s.data(ds).unwrap();
    let csv = render(&rs, ExportFormat::Csv).unwrap();
    assert_eq!(csv, "gender,year,value\nfemale,2016,100\nmale,2016,98\n");
}
