// src/cli.rs
//! Browse a folder of CSV files from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, bail};

use crate::adapters::Folder;
use crate::config::ScraperConfig;
use crate::export::{ExportFormat, render};
use crate::query::Query;
use crate::scraper::Scraper;
use crate::tree::ItemId;

#[derive(Debug, Parser)]
#[command(name = "statscraper", version, about = "Navigate and query a statistical data source")]
pub struct Args {
    /// Directory to read collections (sub-directories) and datasets (*.csv) from
    #[arg(short, long)]
    pub source: PathBuf,

    /// Datatype catalogue root; defaults to $STATSCRAPER_DATATYPES or the bundled one
    #[arg(long)]
    pub catalogue: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the items below PATH (default: the top)
    Ls { path: Option<String> },
    /// Show the dimensions of a dataset
    Dims { path: String },
    /// Fetch a dataset and print its rows
    Show {
        path: String,
        /// JSON query handed to the source, e.g. '{"year": "2016"}'
        #[arg(short, long)]
        query: Option<String>,
        /// Re-spell datatype-backed values in this dialect
        #[arg(short, long)]
        dialect: Option<String>,
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
    },
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    crate::log::init();
    run_with(Args::parse())
}

pub fn run_with(args: Args) -> Result<()> {
    let mut config = ScraperConfig::default();
    if let Some(root) = args.catalogue {
        config = config.with_catalogue_root(root);
    }
    let mut scraper = Scraper::with_config(Folder::new(args.source), config)?;

    match args.command {
        Command::Ls { path } => {
            let target = resolve(&mut scraper, path.as_deref().unwrap_or(""))?;
            match scraper.items()? {
                Some(list) => {
                    for item in list.iter() {
                        println!("{}\t{}\t{}", item.kind(), item.id(), item.label());
                    }
                }
                None => {
                    let item = scraper.item(target);
                    println!("{}\t{}\t{}", item.kind(), item.id(), item.label());
                }
            }
        }
        Command::Dims { path } => {
            let ds = dataset(&mut scraper, &path)?;
            let dims = scraper.dimensions(ds)?;
            for dim in dims.iter() {
                let dim = scraper.dimension(ds, dim.id())?;
                let values = dim.allowed_values().map_or(0, |v| v.len());
                println!(
                    "{}\t{}\t{}\t{}\t{values} values",
                    dim.id(),
                    dim.label(),
                    dim.datatype().map_or("-", |d| d.id()),
                    dim.dialect().unwrap_or("-"),
                );
            }
        }
        Command::Show {
            path,
            query,
            dialect,
            format,
        } => {
            let ds = dataset(&mut scraper, &path)?;
            let query: Option<Query> = query.as_deref().map(serde_json::from_str).transpose()?;
            let rs = scraper.fetch(ds, query)?;
            let out = match dialect {
                Some(d) => render(&rs.translate(&d)?, format)?,
                None => render(&rs, format)?,
            };
            print!("{out}");
        }
    }
    Ok(())
}

/// Walk a `/`-separated path of ids down from the top.
fn resolve(scraper: &mut Scraper<Folder>, path: &str) -> Result<ItemId> {
    scraper.move_to_top()?;
    for step in path.split('/').filter(|s| !s.is_empty()) {
        if scraper.current().is_dataset() {
            bail!("`{}` is a dataset; `{step}` can not be below it", scraper.current().id());
        }
        scraper.move_to(step)?;
    }
    Ok(scraper.current().handle())
}

fn dataset(scraper: &mut Scraper<Folder>, path: &str) -> Result<ItemId> {
    let id = resolve(scraper, path)?;
    if !scraper.item(id).is_dataset() {
        bail!("`{path}` is not a dataset");
    }
    Ok(id)
}
