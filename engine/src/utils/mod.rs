pub mod file;
pub mod json;
pub mod sql;
pub mod time;
