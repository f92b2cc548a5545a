//! Command-line application

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::cli::{self, Commands};
use crate::core::config::EngineConfig;
use crate::core::constants::{APP_LOG_TARGET, ENV_LOG};
use crate::filters::{FilterOperator, OperatorMetadata, metadata_of, operators_for};
use crate::model::{FieldType, Record};
use crate::query::{QueryEngine, QueryRequest, StoreQuery};

pub struct TabulaApp {
    pub config: EngineConfig,
    pub engine: QueryEngine,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompileOutput<'a> {
    #[serde(flatten)]
    query: &'a StoreQuery,
    sql: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OperatorEntry {
    operator: FilterOperator,
    #[serde(flatten)]
    metadata: OperatorMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldTypeOperators {
    field_type: FieldType,
    operators: Vec<OperatorEntry>,
}

impl TabulaApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = EngineConfig::load(&cli_config)?;
        let app = Self::new(config);
        app.execute(command)
    }

    pub fn new(config: EngineConfig) -> Self {
        let engine = QueryEngine::new(&config);
        Self { config, engine }
    }

    fn execute(&self, command: Commands) -> Result<()> {
        let output = match command {
            Commands::Compile { query } => self.compile(&query)?,
            Commands::Run { query, records } => self.run_in_memory(&query, &records)?,
            Commands::Operators { field_type } => Self::list_operators(field_type)?,
        };
        println!("{}", output);
        Ok(())
    }

    fn compile(&self, query_path: &Path) -> Result<String> {
        let request: QueryRequest = read_json(query_path)?;
        let query = self.engine.build_store_query(
            &request.table_id,
            Some(&request.filters),
            Some(&request.sorts),
            &request.fields,
            &request.options,
        );
        let output = CompileOutput {
            sql: query.to_select_sql(),
            query: &query,
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn run_in_memory(&self, query_path: &Path, records_path: &Path) -> Result<String> {
        let request: QueryRequest = read_json(query_path)?;
        let records: Vec<Record> = read_json(records_path)?;
        tracing::debug!(count = records.len(), table_id = %request.table_id, "Loaded records");

        let selected = self.engine.query_records(
            Some(&request.filters),
            Some(&request.sorts),
            &request.fields,
            &records,
            &request.options,
        );
        Ok(serde_json::to_string_pretty(&selected)?)
    }

    fn list_operators(field_type: Option<FieldType>) -> Result<String> {
        let types: Vec<FieldType> = match field_type {
            Some(t) => vec![t],
            None => FieldType::ALL.to_vec(),
        };

        let listing: Vec<FieldTypeOperators> = types
            .into_iter()
            .map(|field_type| FieldTypeOperators {
                field_type,
                operators: operators_for(field_type)
                    .iter()
                    .map(|&operator| OperatorEntry {
                        operator,
                        metadata: metadata_of(operator),
                    })
                    .collect(),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&listing)?)
    }

    fn init_logging() {
        let default_filter = format!("warn,{}=info", APP_LOG_TARGET);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries the JSON result
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
