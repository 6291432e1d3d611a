use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Deserialize;
use tracing::info;

/// Path that opens a private in-memory database instead of a file.
pub const MEMORY_PATH: &str = ":memory:";

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "tracker.db";

/// Schema definition for the SQLite database
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }

    /// DDL for every table and index, safe to run against an existing database.
    pub fn create_sql(&self) -> String {
        let mut sql = String::new();
        for table in &self.tables {
            sql.push_str(&table.create_sql());
            sql.push('\n');
            for index in &table.indexes {
                sql.push_str(&index.create_sql(&table.name));
                sql.push('\n');
            }
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    /// Table-level (composite) key. Leave empty when a column carries
    /// [`ColumnConstraint::PrimaryKey`].
    pub primary_key: Vec<String>,
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            indexes: Vec::new(),
        }
    }
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }
    pub fn with_index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(|c| c.sql()).collect();
        if !self.primary_key.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            parts.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
        }
    }
    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataType {
    Integer,
    Text,
    Blob,
}

impl DataType {
    fn as_sql(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Blob => "BLOB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey,
    /// Only valid directly after `PrimaryKey` on an INTEGER column.
    Autoincrement,
    NotNull,
}

impl ColumnConstraint {
    fn as_sql(&self) -> &'static str {
        match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY",
            ColumnConstraint::Autoincrement => "AUTOINCREMENT",
            ColumnConstraint::NotNull => "NOT NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexDefinition {
    pub fn create_sql(&self, table: &str) -> String {
        format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {}({});",
            if self.unique { "UNIQUE " } else { "" },
            self.name,
            table,
            self.columns.join(", ")
        )
    }
}

/// The `parcel` table and its client index.
pub fn parcel_schema() -> Schema {
    let table = TableDefinition::new("parcel")
        .with_column(
            ColumnDefinition::new("number", DataType::Integer)
                .with_constraint(ColumnConstraint::PrimaryKey)
                .with_constraint(ColumnConstraint::Autoincrement),
        )
        .with_column(
            ColumnDefinition::new("client", DataType::Integer)
                .with_constraint(ColumnConstraint::NotNull),
        )
        .with_column(
            ColumnDefinition::new("status", DataType::Text)
                .with_constraint(ColumnConstraint::NotNull),
        )
        .with_column(
            ColumnDefinition::new("address", DataType::Text)
                .with_constraint(ColumnConstraint::NotNull),
        )
        .with_column(
            ColumnDefinition::new("created_at", DataType::Text)
                .with_constraint(ColumnConstraint::NotNull),
        )
        .with_index(IndexDefinition {
            name: "idx_parcel_client".to_string(),
            columns: vec!["client".to_string()],
            unique: false,
        });
    Schema::new().add_table(table)
}

/// SQLite configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file, or [`MEMORY_PATH`]
    pub db_path: String,
    /// Schema created on open
    #[serde(skip_deserializing, default = "parcel_schema")]
    pub schema: Schema,
}

impl SqliteConfig {
    /// Create a new SQLite config with path and schema
    pub fn new(db_path: impl Into<String>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            schema,
        }
    }

    /// In-memory database with the parcel schema.
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH, parcel_schema())
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == MEMORY_PATH
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH, parcel_schema())
    }
}

/// Open the configured database and make sure its schema exists.
pub fn open_connection(config: &SqliteConfig) -> Result<Connection> {
    let conn = if config.is_in_memory() {
        Connection::open_in_memory().context("Failed to open in-memory database")?
    } else {
        Connection::open(&config.db_path)
            .with_context(|| format!("Failed to open database at {:?}", config.db_path))?
    };
    initialize_schema(&conn, &config.schema)
        .with_context(|| format!("Failed to initialize schema in {:?}", config.db_path))?;
    info!("opened sqlite database at {}", config.db_path);
    Ok(conn)
}

/// Create every table and index of `schema` that does not exist yet.
pub fn initialize_schema(conn: &Connection, schema: &Schema) -> rusqlite::Result<()> {
    conn.execute_batch(&schema.create_sql())
}
