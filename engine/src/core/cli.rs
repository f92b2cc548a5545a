use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DEFAULT_LIMIT, ENV_DIALECT, ENV_MAX_LIMIT};
use crate::model::FieldType;
use crate::sql::Backend;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(version, about = "Filter & sort query engine for typed record tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// SQL dialect to compile for (postgres or duckdb)
    #[arg(long, short = 'd', global = true, env = ENV_DIALECT, value_parser = parse_dialect)]
    pub dialect: Option<Backend>,

    /// Page size when a query gives no limit
    #[arg(long, global = true, env = ENV_DEFAULT_LIMIT)]
    pub default_limit: Option<u32>,

    /// Upper bound on any requested page size
    #[arg(long, global = true, env = ENV_MAX_LIMIT)]
    pub max_limit: Option<u32>,
}

/// Parse SQL dialect from CLI/env string
fn parse_dialect(s: &str) -> Result<Backend, String> {
    s.parse()
}

/// Parse field type from CLI string
fn parse_field_type(s: &str) -> Result<FieldType, String> {
    s.parse()
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile a query file into SQL and print it with its parameters
    Compile {
        /// Query JSON: {tableId, fields, filters, sorts, options}
        query: PathBuf,
    },
    /// Run a query file against a JSON array of records in memory
    Run {
        /// Query JSON: {tableId, fields, filters, sorts, options}
        query: PathBuf,

        /// JSON array of records: [{id, row_index, fields}]
        #[arg(long, short = 'r')]
        records: PathBuf,
    },
    /// List filter operators, optionally for one field type
    Operators {
        #[arg(long, short = 't', value_parser = parse_field_type)]
        field_type: Option<FieldType>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub dialect: Option<Backend>,
    pub default_limit: Option<u32>,
    pub max_limit: Option<u32>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        dialect: cli.dialect,
        default_limit: cli.default_limit,
        max_limit: cli.max_limit,
    };
    (config, cli.command)
}
