//! Core types and operations for the deficit symptom checker.
//!
//! Holds the reference catalog, the scoring engine, and the history store.
//! Storage is reached only through the [`store::KeyValueStore`] trait, so this
//! crate carries no database or terminal dependencies.

pub mod browse;
pub mod catalog;
pub mod error;
pub mod history;
pub mod scoring;
pub mod selection;
pub mod store;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
