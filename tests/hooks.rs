// tests/hooks.rs
//
// Hook firing order, init arguments and per-instance hook tables.
//
mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::Nested;
use statscraper::{Error, Hook, HookContext, Scraper, ScraperConfig};

#[test]
fn init_fires_once_with_the_config() {
    let config = ScraperConfig::default().with_arg("greeting", "hej");
    let mut s = Scraper::with_config(Nested::default(), config).unwrap();
    s.move_to("Collection_1").unwrap().move_up().unwrap();
    assert_eq!(s.adapter().init_calls, 1);
    assert_eq!(s.adapter().greeting.as_deref(), Some("hej"));
}

#[test]
fn moves_fire_in_order() {
    let mut s = Scraper::new(Nested::default()).unwrap();
    s.move_to("Collection_2")
        .unwrap()
        .move_to("Dataset_3")
        .unwrap()
        .move_up()
        .unwrap()
        .move_up()
        .unwrap();
    assert_eq!(
        s.adapter().events,
        [
            "select:Collection_2",
            "select:Dataset_3",
            "up:Collection_2",
            "up:<root>",
            "top:<root>",
        ]
    );
}

#[test]
fn up_at_the_top_still_fires() {
    let mut s = Scraper::new(Nested::default()).unwrap();
    s.move_up().unwrap();
    assert_eq!(s.adapter().events, ["up:<root>", "top:<root>"]);
    s.move_to_top().unwrap();
    assert_eq!(s.adapter().events.last().unwrap(), "top:<root>");
}

#[test]
fn callbacks_run_in_registration_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut s = Scraper::new(Nested::default()).unwrap();
    for n in 1..=3 {
        let seen = Rc::clone(&seen);
        s.on(Hook::Select, move |_, ctx: &HookContext<'_>| {
            seen.borrow_mut().push(format!("{n}:{}", ctx.current.id()));
            Ok(())
        });
    }
    s.move_to("Collection_1").unwrap();
    assert_eq!(*seen.borrow(), ["1:Collection_1", "2:Collection_1", "3:Collection_1"]);
}

#[test]
fn hook_errors_reach_the_caller() {
    let mut s = Scraper::new(Nested::default()).unwrap();
    s.on(Hook::Select, |_, ctx: &HookContext<'_>| {
        if ctx.current.id() == "Collection_2" {
            return Err(Error::InvalidData("login expired".to_string()));
        }
        Ok(())
    });
    assert!(s.move_to("Collection_1").is_ok());
    s.move_up().unwrap();
    let err = s.move_to("Collection_2").err().unwrap();
    assert!(matches!(err, Error::InvalidData(ref msg) if msg == "login expired"));
    // The move itself happened before the hook ran.
    assert_eq!(s.current().id(), "Collection_2");
}

#[test]
fn hook_tables_are_per_scraper() {
    let counter = Rc::new(RefCell::new(0));
    let mut a = Scraper::new(Nested::default()).unwrap();
    let mut b = Scraper::new(Nested::default()).unwrap();
    {
        let counter = Rc::clone(&counter);
        a.on(Hook::Top, move |_, _| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
    }
    b.move_to_top().unwrap();
    assert_eq!(*counter.borrow(), 0);
    a.move_to_top().unwrap();
    assert_eq!(*counter.borrow(), 1);
}
