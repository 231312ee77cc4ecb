// benches/fetch.rs
use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use statscraper::config::consts::DEFAULT_CATALOGUE_DIR;
use statscraper::model::DimensionList;
use statscraper::scraper::{Adapter, RowStream, rows};
use statscraper::{
    Catalogue, Dimension, Item, ItemRef, Query, Result, ResultRow, ResultSet, Scraper,
};

const MUNICIPALITIES: [&str; 4] = [
    "0180 Stockholms kommun",
    "2409 Robertsfors kommun",
    "2480 Umeå kommun",
    "0780 Växjö kommun",
];

struct Synthetic;

impl Adapter for Synthetic {
    fn fetch_children(&mut self, _item: ItemRef<'_>) -> Result<Vec<Item>> {
        Ok(vec![Item::dataset("synthetic")])
    }

    fn fetch_data<'a>(
        &'a mut self,
        _dataset: ItemRef<'_>,
        _query: Option<&Query>,
    ) -> Result<RowStream<'a>> {
        Ok(rows((0..1_000).map(|i| ResultRow::new(i).with("n", i.to_string()))))
    }
}

fn bench_cache_hit(c: &mut Criterion) {
    let mut s = Scraper::new(Synthetic).expect("scraper");
    let ds = s.child("synthetic").expect("dataset").handle();
    s.fetch(ds, Some(json!({"a": 1}))).expect("warm cache");

    c.bench_function("fetch_cache_hit", |b| {
        b.iter(|| {
            let rs = s.fetch(ds, Some(json!({"a": 1}))).expect("fetch");
            black_box(rs.len())
        })
    });
}

fn bench_normalize(c: &mut Criterion) {
    let catalogue = Catalogue::open(DEFAULT_CATALOGUE_DIR).expect("catalogue");
    let dim = Dimension::new("municipality")
        .expect("dimension")
        .with_datatype(catalogue.datatype("region").expect("region"))
        .with_domain("sweden/municipalities")
        .with_dialect("scb");
    let dims: Rc<DimensionList> = Rc::new(vec![Rc::new(dim)].into());

    c.bench_function("push_with_normalization", |b| {
        b.iter(|| {
            let mut rs = ResultSet::bound("bench", Rc::clone(&dims), None);
            for (i, raw) in MUNICIPALITIES.iter().cycle().take(400).enumerate() {
                rs.push(ResultRow::new(i).with("municipality", *raw)).expect("push");
            }
            black_box(rs.len())
        })
    });
}

criterion_group!(benches, bench_cache_hit, bench_normalize);
criterion_main!(benches);
