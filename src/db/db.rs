use crate::db::migrations::MigrationManager;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "dexus.db";

/// Owns the SQLite connection. Repositories borrow `&db.conn`, or a
/// transaction started from it.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the configured database file (or the default one in the data
    /// directory) and brings its schema up to date.
    pub fn new() -> Result<Db> {
        let path = match Config::load()?.database_path() {
            Some(path) => path,
            None => DataStorage::new().get_path(DB_FILE_NAME)?,
        };
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db> {
        let mut conn = Connection::open(path)?;
        Self::configure(&conn)?;
        MigrationManager::new().run_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    pub fn open_in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        MigrationManager::new().run_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Raw connection for inspecting the migration state.
    pub fn new_without_migrations() -> Result<Connection> {
        let path = match Config::load()?.database_path() {
            Some(path) => path,
            None => DataStorage::new().get_path(DB_FILE_NAME)?,
        };
        Ok(Connection::open(path)?)
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        Ok(())
    }
}
