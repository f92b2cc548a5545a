//! Filter & sort query engine for typed record tables
//!
//! One filter tree and one sort spec drive two targets: a parameterized SQL
//! fragment for the record store and an in-memory evaluator/comparator for
//! cached records. Both select and order the same rows.

pub mod app;
pub mod core;
pub mod filters;
pub mod model;
pub mod query;
pub mod sort;
pub mod sql;
pub mod utils;
