// tests/datatypes.rs
//
// The bundled datatype catalogue.
//
use std::rc::Rc;

use statscraper::config::consts::DEFAULT_CATALOGUE_DIR;
use statscraper::{Catalogue, Error};

fn catalogue() -> Catalogue {
    Catalogue::open(DEFAULT_CATALOGUE_DIR).unwrap()
}

#[test]
fn unknown_datatype() {
    let err = catalogue().datatype("donkey_power").unwrap_err();
    assert!(matches!(err, Error::NoSuchDatatype(ref id) if id == "donkey_power"));
    assert!(err.is_not_found());
}

#[test]
fn master_table_fields() {
    let c = catalogue();
    assert!(c.contains("region"));
    assert!(c.ids().contains(&"month"));

    let year = c.datatype("year").unwrap();
    assert_eq!(year.value_type(), "int");
    assert_eq!(year.description(), "Calendar year");
    assert!(year.domain().is_none());
    assert!(year.allowed_values().is_empty());
}

#[test]
fn region_loads_every_sub_domain() {
    let region = catalogue().datatype("region").unwrap();
    let values = region.allowed_values();
    assert!(values.contains("Växjö kommun"));
    assert!(values.contains("Kronobergs län"));
    assert!(values.contains("eu"));

    let eu = values.by_value("eu").unwrap();
    assert_eq!(eu.label(), Some("European Union"));
    assert_eq!(eu.domain(), Some("region/supranational"));
    assert_eq!(
        values.by_value("Umeå kommun").unwrap().domain(),
        Some("region/sweden/municipalities")
    );
}

#[test]
fn dialect_columns_become_dialects() {
    let region = catalogue().datatype("region").unwrap();
    for dialect in ["numerical", "scb", "short", "iso"] {
        assert!(region.has_dialect(dialect), "{dialect}");
    }
    let gotland = region.allowed_values().by_value("Region Gotland").unwrap();
    assert_eq!(
        gotland.spellings("scb"),
        ["0980 Region Gotland", "0980 Gotlands kommun"]
    );
    assert!(gotland.spellings("iso").is_empty());
}

#[test]
fn resolve_finds_the_canonical_value() {
    let month = catalogue().datatype("month").unwrap();
    assert_eq!(month.resolve("swedish", "maj").unwrap(), "may");
    assert_eq!(month.resolve("numerical", "05").unwrap(), "may");
    assert!(month.resolve("swedish", "May").is_none());
}

#[test]
fn datatypes_load_once_per_catalogue() {
    let c = catalogue();
    let a = c.datatype("gender").unwrap();
    let b = c.datatype("gender").unwrap();
    assert!(Rc::ptr_eq(&a, &b));
}

#[test]
fn missing_catalogue_is_an_error() {
    let dir = std::env::temp_dir().join("statscraper_no_catalogue_here");
    assert!(matches!(Catalogue::open(&dir), Err(Error::Catalogue { .. })));
}
