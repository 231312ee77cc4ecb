// src/adapters/mod.rs
//! Concrete sources.

pub mod folder;

pub use folder::Folder;
