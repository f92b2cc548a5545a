//! Query facade over the filter and sort engines

mod engine;
mod types;

pub use engine::QueryEngine;
pub use types::{QueryOptions, QueryRequest, StoreQuery};
