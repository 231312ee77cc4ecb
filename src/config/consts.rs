// src/config/consts.rs

// Tree
pub const ROOT: &str = "<root>"; // id of the synthetic top Collection

// Results
pub const VALUE_KEY: &str = "value"; // reserved column for the measure

// Datatype catalogue
pub const CATALOGUE_ENV: &str = "STATSCRAPER_DATATYPES";
pub const DEFAULT_CATALOGUE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/datatypes");
pub const DATATYPES_FILE: &str = "datatypes.csv";
pub const VALUES_DIR: &str = "values";
pub const DIALECT_PREFIX: &str = "dialect:";

// Folder adapter
pub const DIMENSIONS_SIDECAR: &str = ".dimensions.json"; // appended to the dataset's file stem
