//! Query facade
//!
//! The one place that knows the caller's default policies: deleted rows are
//! hidden unless asked for, invalid filters are ignored with a warning, and
//! invalid sort entries or entries for unknown fields are dropped. Store
//! queries always get a page size; in-memory queries only when the caller
//! asks for one. Everything below this layer is policy-free.

use serde_json::Value as JsonValue;

use super::types::{QueryOptions, StoreQuery};
use crate::core::config::{EngineConfig, PagingConfig};
use crate::core::constants::{DELETED_AT_COLUMN, TABLE_ID_COLUMN};
use crate::filters::{
    Evaluator, FilterConfig, FilterLimits, PredicateCompiler, check_config, optimize, parse_filter_config,
};
use crate::model::{Field, FieldIndex, Record};
use crate::sort::{RecordComparator, SortSpec, compile_order_by, normalize, parse_sort_spec_lenient};
use crate::sql::{Backend, SqlParams};

#[derive(Debug, Clone)]
pub struct QueryEngine {
    backend: Backend,
    limits: FilterLimits,
    paging: PagingConfig,
}

impl QueryEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            backend: config.dialect,
            limits: config.limits,
            paging: config.paging,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Compile a query into fragments for the backing store
    pub fn build_store_query(
        &self,
        table_id: &str,
        raw_filters: Option<&JsonValue>,
        raw_sorts: Option<&JsonValue>,
        fields: &[Field],
        options: &QueryOptions,
    ) -> StoreQuery {
        let mut params = SqlParams::new(self.backend);
        let mut conditions: Vec<String> = Vec::new();

        conditions.push(format!("{} = {}", TABLE_ID_COLUMN, params.push(table_id)));
        if !options.include_deleted {
            conditions.push(format!("{} IS NULL", DELETED_AT_COLUMN));
        }

        if let Some(filter) = self.resolve_filter(raw_filters, fields) {
            let compiler = PredicateCompiler::new(self.backend, fields);
            conditions.push(compiler.compile_group(&filter.root, &mut params));
        }

        let sort = self.resolve_sort(raw_sorts, fields);
        let order_by = compile_order_by(&sort, fields, self.backend);
        let (limit, offset) = self.store_page(options);

        tracing::debug!(
            table_id,
            backend = %self.backend,
            params = params.len(),
            limit,
            offset,
            "Built store query"
        );

        StoreQuery {
            backend: self.backend,
            predicate: conditions.join(" AND "),
            params: params.into_values(),
            order_by,
            limit,
            offset,
        }
    }

    /// Filter, sort and page already-loaded records.
    ///
    /// Without `options.limit` every matching record is returned; an explicit
    /// limit is clamped to the configured maximum.
    pub fn query_records<'r>(
        &self,
        raw_filters: Option<&JsonValue>,
        raw_sorts: Option<&JsonValue>,
        fields: &[Field],
        records: &'r [Record],
        options: &QueryOptions,
    ) -> Vec<&'r Record> {
        let visible = records
            .iter()
            .filter(|record| options.include_deleted || !record.is_deleted());

        let matched: Vec<&'r Record> = match self.resolve_filter(raw_filters, fields) {
            Some(filter) => Evaluator::new(fields).filter_records(visible, &filter.root),
            None => visible.collect(),
        };

        let sort = self.resolve_sort(raw_sorts, fields);
        let sorted = RecordComparator::new(&sort, fields).sort(matched);

        let limit = options.limit.map(|limit| self.paging.resolve_limit(Some(limit)));
        let offset = options.offset.unwrap_or(0);
        tracing::debug!(
            total = records.len(),
            matched = sorted.len(),
            limit,
            offset,
            "Queried records in memory"
        );

        let page = sorted.into_iter().skip(offset as usize);
        match limit {
            Some(limit) => page.take(limit as usize).collect(),
            None => page.collect(),
        }
    }

    /// Parse, optimize and validate; `None` means "no filter"
    fn resolve_filter(&self, raw: Option<&JsonValue>, fields: &[Field]) -> Option<FilterConfig> {
        let raw = raw.filter(|value| !value.is_null())?;

        let parsed = match parse_filter_config(raw, &self.limits) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unparseable filter");
                return None;
            }
        };

        let config = optimize(&parsed);
        if config.is_empty() {
            return None;
        }

        if let Err(e) = check_config(&config, fields) {
            tracing::warn!(error = %e, "Ignoring invalid filter");
            return None;
        }
        Some(config)
    }

    /// Parse and keep only valid entries for known fields; never fails
    fn resolve_sort(&self, raw: Option<&JsonValue>, fields: &[Field]) -> SortSpec {
        let Some(raw) = raw else {
            return SortSpec::default();
        };

        let parsed = match parse_sort_spec_lenient(raw) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid sort, ordering by row_index");
                return SortSpec::default();
            }
        };

        let index = FieldIndex::new(fields);
        let (known, unknown): (Vec<_>, Vec<_>) = parsed
            .entries
            .into_iter()
            .partition(|entry| index.contains(&entry.field_id));

        if !unknown.is_empty() {
            let dropped: Vec<&str> = unknown.iter().map(|e| e.field_id.as_str()).collect();
            tracing::warn!(fields = ?dropped, "Dropping sort entries for unknown fields");
        }

        normalize(&SortSpec {
            entries: known,
            version: parsed.version,
        })
    }

    fn store_page(&self, options: &QueryOptions) -> (u32, u32) {
        (self.paging.resolve_limit(options.limit), options.offset.unwrap_or(0))
    }
}
