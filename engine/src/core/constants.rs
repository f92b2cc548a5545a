// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths, identifiers and the log filter)
pub const APP_NAME_LOWER: &str = "tabula";

/// Crate target name used in the default log filter
pub const APP_LOG_TARGET: &str = "tabula_engine";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".tabula";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "tabula.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TABULA_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TABULA_LOG";

/// Environment variable for the SQL dialect (postgres or duckdb)
pub const ENV_DIALECT: &str = "TABULA_DIALECT";

/// Environment variable for the default page size
pub const ENV_DEFAULT_LIMIT: &str = "TABULA_DEFAULT_LIMIT";

/// Environment variable for the maximum page size
pub const ENV_MAX_LIMIT: &str = "TABULA_MAX_LIMIT";

// =============================================================================
// Filter Limits
// =============================================================================

/// Maximum size of filter JSON in bytes (64KB)
pub const DEFAULT_MAX_FILTER_JSON_BYTES: usize = 64 * 1024;

/// Maximum number of conditions in one filter tree
pub const DEFAULT_MAX_CONDITIONS: usize = 200;

/// Maximum group nesting depth (the root counts as 1)
pub const DEFAULT_MAX_FILTER_DEPTH: usize = 16;

// =============================================================================
// Paging
// =============================================================================

/// Page size when the caller gives none
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Upper bound on any requested page size
pub const DEFAULT_MAX_PAGE_LIMIT: u32 = 1000;

// =============================================================================
// Record Storage Layout
// =============================================================================

/// Table holding every record of every user table
pub const RECORDS_TABLE: &str = "records";

/// JSON document column with the record's field values
pub const FIELDS_COLUMN: &str = "fields";

pub const TABLE_ID_COLUMN: &str = "table_id";

pub const ROW_INDEX_COLUMN: &str = "row_index";

pub const DELETED_AT_COLUMN: &str = "deleted_at";
