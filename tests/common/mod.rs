// tests/common/mod.rs
//
// A small in-memory source shared by the integration tests:
//
//   <root> ┳━ Collection_1 ━━ Dataset_1
//          ┗━ Collection_2 ┳━ Dataset_2
//                          ┗━ Dataset_3
//
#![allow(dead_code)]

use statscraper::config::consts::ROOT;
use statscraper::scraper::{Adapter, Hook, HookContext, Hooks, RowStream, rows};
use statscraper::{Dimension, Item, ItemRef, Query, Result, ResultRow};

#[derive(Default)]
pub struct Nested {
    /// Where the hooks last saw the cursor.
    pub position: String,
    /// `<hook>:<item>` for every hook fired, in order.
    pub events: Vec<String>,
    pub init_calls: usize,
    pub children_calls: usize,
    pub dimension_calls: usize,
    /// `<dataset>@<cursor position>` for every data request.
    pub data_calls: Vec<String>,
    pub queries: Vec<Option<Query>>,
    pub greeting: Option<String>,
}

impl Nested {
    pub fn data_call_count(&self) -> usize {
        self.data_calls.len()
    }

    fn track(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        self.position = ctx.current.id().to_string();
        self.events.push(format!("{}:{}", ctx.hook, ctx.current.id()));
        Ok(())
    }
}

pub fn rows_for(dataset: &str) -> Vec<ResultRow> {
    match dataset {
        "Dataset_1" => vec![
            ResultRow::new(12).with("municipality", "Umeå kommun").with("year", "2016"),
            ResultRow::new(7).with("municipality", "Robertsfors kommun").with("year", "2016"),
        ],
        "Dataset_2" => vec![ResultRow::new(3).with("municipality", "Växjö kommun").with("year", "2015")],
        _ => Vec::new(),
    }
}

impl Adapter for Nested {
    fn fetch_children(&mut self, item: ItemRef<'_>) -> Result<Vec<Item>> {
        self.children_calls += 1;
        let items = match item.id() {
            ROOT => vec![
                Item::collection("Collection_1").with_label("First collection"),
                Item::collection("Collection_2").with_label("Second collection"),
            ],
            "Collection_1" => vec![Item::dataset("Dataset_1").with_label("First dataset")],
            "Collection_2" => vec![
                Item::dataset("Dataset_2"),
                Item::dataset("Dataset_3").with_dialect("numerical"),
            ],
            _ => Vec::new(),
        };
        Ok(items)
    }

    fn fetch_dimensions(&mut self, _dataset: ItemRef<'_>) -> Result<Vec<Dimension>> {
        self.dimension_calls += 1;
        Ok(vec![
            Dimension::new("municipality")?.with_label("Municipality"),
            Dimension::new("year")?,
        ])
    }

    fn fetch_data<'a>(
        &'a mut self,
        dataset: ItemRef<'_>,
        query: Option<&Query>,
    ) -> Result<RowStream<'a>> {
        self.data_calls.push(format!("{}@{}", dataset.id(), self.position));
        self.queries.push(query.cloned());
        Ok(rows(rows_for(dataset.id())))
    }

    fn register_hooks(hooks: &mut Hooks<Self>) {
        hooks
            .on(Hook::Init, |a: &mut Nested, ctx: &HookContext<'_>| {
                a.init_calls += 1;
                a.position = ctx.current.id().to_string();
                a.greeting = ctx.config.arg("greeting").map(str::to_string);
                Ok(())
            })
            .on(Hook::Top, Self::track)
            .on(Hook::Up, Self::track)
            .on(Hook::Select, Self::track);
    }
}
