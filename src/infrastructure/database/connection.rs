use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use tracing::{debug, error};

/// Primary manager for SQLite database operations; provides async-friendly access to the synchronous rusqlite connection using tokio's spawn_blocking.
#[derive(Clone)]
pub struct DatabaseManager {
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseManager {
    /// Open (or create) the database file and configure it for better performance.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref();
        let connection = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database at {}", path.display()))?;

        // Enable foreign keys and WAL mode for better concurrency and performance.
        connection.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Ok(Self::from_connection(connection))
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self::from_connection(connection))
    }

    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    /// Execute a blocking database operation in a tokio-aware manner; moves the operation to a blocking thread pool to avoid blocking the async runtime.
    pub async fn execute_blocking<F, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || -> Result<T> {
            let conn = connection
                .lock()
                .map_err(|_| anyhow!("SQLite connection mutex poisoned"))?;
            operation(&conn).context("Database operation failed")
        })
        .await
        .context("Failed to execute blocking database operation - task join error")?
    }

    /// Initialize the database by creating all the tables; reads and executes schema.sql to set up the database structure.
    pub async fn initialize_database(&self) -> Result<()> {
        let schema = include_str!("schema.sql");

        self.execute_blocking(move |connection| {
            let statements: Vec<&str> = schema.split(';').collect();
            for (i, statement) in statements.iter().enumerate() {
                let trimmed = statement.trim();

                // Skip empty statements and comments.
                if trimmed.is_empty() || trimmed.lines().all(|l| l.trim_start().starts_with("--")) {
                    continue;
                }

                let preview: String = trimmed.chars().take(50).collect();
                debug!("Executing schema statement {}: {}", i + 1, preview);

                if let Err(e) = connection.execute(trimmed, []) {
                    error!("Schema statement {} failed: {}\n{}", i + 1, e, trimmed);
                    return Err(e);
                }
            }
            Ok(())
        })
        .await
    }
}
