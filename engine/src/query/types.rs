use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::constants::RECORDS_TABLE;
use crate::model::Field;
use crate::sql::{Backend, SqlValue};

/// Caller paging and visibility options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default)]
    pub include_deleted: bool,
}

/// Everything one query needs, as read from a query file
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub table_id: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub filters: JsonValue,
    #[serde(default)]
    pub sorts: JsonValue,
    #[serde(default)]
    pub options: QueryOptions,
}

/// Query fragments for the backing store, ready to hand to a store client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreQuery {
    pub backend: Backend,
    /// Full WHERE predicate, table scoping included
    pub predicate: String,
    /// Positional parameters in placeholder order
    pub params: Vec<SqlValue>,
    /// ORDER BY terms without the keyword
    pub order_by: String,
    pub limit: u32,
    pub offset: u32,
}

impl StoreQuery {
    /// Render a complete statement selecting matching record ids
    pub fn to_select_sql(&self) -> String {
        format!(
            "SELECT id FROM {} WHERE {} ORDER BY {} {}",
            RECORDS_TABLE,
            self.predicate,
            self.order_by,
            self.backend.dialect().limit_offset(self.limit, self.offset)
        )
    }
}
