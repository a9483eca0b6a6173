use rusqlite::{Connection, Result as SqliteResult};
use std::path::{Path, PathBuf};

use crate::domain::entities::LogEntry;

/// SQLite file holding the request statistics. Every call opens its own
/// connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> SqliteResult<Connection> {
        Connection::open(&self.path)
    }

    pub fn init_tables(&self) -> SqliteResult<()> {
        let conn = self.connect()?;
        Self::create_tables(&conn)
    }

    fn create_tables(conn: &Connection) -> SqliteResult<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS statistics (
                user_name TEXT,
                city TEXT,
                date TEXT,
                forecast_type TEXT
            )",
            [],
        )?;
        Ok(())
    }

    pub fn insert_request(&self, entry: &LogEntry) -> SqliteResult<()> {
        let mut conn = self.connect()?;
        Self::create_tables(&conn)?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO statistics (user_name, city, date, forecast_type) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                &entry.user_name,
                &entry.city,
                &entry.timestamp,
                entry.forecast_type.as_str()
            ],
        )?;
        tx.commit()
    }
}
