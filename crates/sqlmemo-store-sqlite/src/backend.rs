//! SQLite implementation of `ToolBackend`.

use rusqlite::{Batch, Connection, Params};
use serde_json::{Map, Value};
use tracing::{debug, info};

use sqlmemo_types::{MemoError, ToolBackend, ToolName};

use crate::error::StoreError;
use crate::row_mapping::row_to_object;

/// One result row keyed by column name.
pub type RowObject = Map<String, Value>;

/// Tables in catalog order.
const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY rowid";

/// Column metadata, with the table name bound rather than interpolated.
const DESCRIBE_TABLE_SQL: &str =
    "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)";

/// SQLite-backed relational tools over a single connection.
pub struct SqliteBackend {
    conn: Connection,
    path: String,
}

impl SqliteBackend {
    /// Opens or creates a SQLite database at the given path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the file cannot be opened or created.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        info!(path, "database opened");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open {
            path: ":memory:".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            conn,
            path: ":memory:".to_string(),
        })
    }

    /// Path the connection was opened against.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runs one named tool and renders its result as text.
    ///
    /// # Errors
    ///
    /// `Forbidden` when the statement does not match the tool's capability,
    /// `UnknownTool` for tools this backend does not serve, and engine
    /// errors otherwise.
    pub fn call(&self, tool: ToolName, argument: &str) -> Result<String, StoreError> {
        if let Some(capability) = tool.capability() {
            if !capability.permits(argument) {
                return Err(StoreError::Forbidden {
                    tool,
                    rule: capability.rule(),
                });
            }
        }
        debug!(%tool, "executing relational tool");

        match tool {
            ToolName::ReadQuery => {
                let rows = self.execute_query(argument, [])?;
                serde_json::to_string(&rows).map_err(|e| StoreError::Encode {
                    message: e.to_string(),
                })
            }
            ToolName::WriteQuery => {
                let affected = self.execute_batch(argument)?;
                Ok(format!("Affected rows: {affected}"))
            }
            ToolName::CreateTable => {
                self.execute_batch(argument)?;
                Ok("Table created successfully".to_string())
            }
            ToolName::ListTables => Ok(self.list_tables()?.join(", ")),
            ToolName::DescribeTable => {
                let column = self.describe_table(argument)?;
                serde_json::to_string(&column).map_err(|e| StoreError::Encode {
                    message: e.to_string(),
                })
            }
            ToolName::AppendInsight => Err(StoreError::UnknownTool {
                name: tool.to_string(),
            }),
        }
    }

    /// Executes a statement and collects every row in order.
    pub fn execute_query<P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<RowObject>, StoreError> {
        let mut stmt = self.conn.prepare(sql).map_err(query_err)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params).map_err(query_err)?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().map_err(query_err)? {
            results.push(row_to_object(row, &columns).map_err(query_err)?);
        }
        Ok(results)
    }

    /// Executes a mutating statement and returns the affected row count.
    pub fn execute_write<P: Params>(&self, sql: &str, params: P) -> Result<usize, StoreError> {
        self.conn.execute(sql, params).map_err(write_err)
    }

    /// Runs every statement in `sql` in order and returns the number of rows
    /// they changed together.
    ///
    /// Rows produced by a statement (`RETURNING`, pragmas) are stepped
    /// through and discarded. Statements before a failing one stay applied.
    pub fn execute_batch(&self, sql: &str) -> Result<u64, StoreError> {
        let before = self.conn.total_changes();
        let mut batch = Batch::new(&self.conn, sql);
        while let Some(mut stmt) = batch.next().map_err(write_err)? {
            let mut rows = stmt.raw_query();
            while rows.next().map_err(write_err)?.is_some() {}
        }
        Ok(self.conn.total_changes().saturating_sub(before))
    }

    /// Returns table names in catalog order.
    pub fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(LIST_TABLES_SQL).map_err(query_err)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;
        Ok(names)
    }

    /// Returns the descriptor of the table's first column.
    ///
    /// # Errors
    ///
    /// `TableNotFound` when the table reports no columns, which is also
    /// what SQLite reports for a table that does not exist.
    pub fn describe_table(&self, table: &str) -> Result<RowObject, StoreError> {
        self.execute_query(DESCRIBE_TABLE_SQL, [table])?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::TableNotFound {
                table: table.to_string(),
            })
    }

    /// Closes the connection, reporting any error SQLite returns.
    pub fn close(self) -> Result<(), StoreError> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| StoreError::Close {
            message: e.to_string(),
        })?;
        info!(path = %path, "database closed");
        Ok(())
    }
}

impl ToolBackend for SqliteBackend {
    fn call(&mut self, tool: ToolName, argument: &str) -> Result<String, MemoError> {
        SqliteBackend::call(self, tool, argument).map_err(MemoError::from)
    }

    fn close(self: Box<Self>) -> Result<(), MemoError> {
        SqliteBackend::close(*self).map_err(MemoError::from)
    }
}

fn write_err(e: rusqlite::Error) -> StoreError {
    StoreError::Write {
        message: e.to_string(),
    }
}

/// Maps a `rusqlite::Error` to a `StoreError::Query`.
fn query_err(e: rusqlite::Error) -> StoreError {
    StoreError::Query {
        message: e.to_string(),
    }
}
