//! Versioned schema migrations.
//!
//! Each migration runs once, in version order, inside the same transaction as
//! the other pending ones. Applied versions are recorded in the `migrations`
//! table.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row, Transaction};

/// `CURRENT_TIMESTAMP` text as SQLite writes it.
const APPLIED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const SCHEMA_CATALOGS: &str = "
CREATE TABLE IF NOT EXISTS modalities (
    id INTEGER PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS services (
    id INTEGER PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS consultants (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT,
    email TEXT,
    expertise TEXT,
    hourly_rate REAL
);
CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN ('F', 'J')),
    document TEXT NOT NULL UNIQUE,
    legal_name TEXT NOT NULL,
    trade_name TEXT,
    city TEXT,
    state TEXT,
    contact TEXT,
    order_email TEXT,
    invoice_email TEXT,
    modality_id INTEGER REFERENCES modalities(id),
    hourly_rate REAL
);
CREATE INDEX IF NOT EXISTS idx_clients_modality ON clients(modality_id);
";

const SCHEMA_ORDERS: &str = "
CREATE TABLE IF NOT EXISTS service_orders (
    id INTEGER PRIMARY KEY,
    client_id INTEGER NOT NULL REFERENCES clients(id),
    modality_id INTEGER REFERENCES modalities(id),
    on_site_contact TEXT,
    date DATE NOT NULL,
    start_time TEXT,
    end_time TEXT,
    discount_time TEXT,
    transfer_time TEXT,
    total_time TEXT,
    service_id INTEGER NOT NULL REFERENCES services(id),
    consultant_id INTEGER NOT NULL REFERENCES consultants(id),
    detail TEXT,
    sent TEXT NOT NULL DEFAULT 'N' CHECK (sent IN ('N', 'S')),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS order_relations (
    order_id INTEGER PRIMARY KEY REFERENCES service_orders(id),
    date DATE NOT NULL,
    client_id INTEGER NOT NULL,
    total_time TEXT,
    invoiced TEXT NOT NULL DEFAULT 'N' CHECK (invoiced IN ('S', 'N')),
    collected TEXT NOT NULL DEFAULT 'N' CHECK (collected IN ('S', 'N'))
);
CREATE INDEX IF NOT EXISTS idx_orders_date ON service_orders(date);
CREATE INDEX IF NOT EXISTS idx_orders_client ON service_orders(client_id);
CREATE INDEX IF NOT EXISTS idx_orders_service ON service_orders(service_id);
CREATE INDEX IF NOT EXISTS idx_orders_consultant ON service_orders(consultant_id);
CREATE INDEX IF NOT EXISTS idx_relations_date ON order_relations(date);
CREATE INDEX IF NOT EXISTS idx_relations_client ON order_relations(client_id);
";

// One relation row per order, kept in step with the order's date, client and total.
const RELATION_TRIGGERS: &str = "
CREATE TRIGGER IF NOT EXISTS trg_orders_relation_insert
AFTER INSERT ON service_orders
BEGIN
    INSERT INTO order_relations (order_id, date, client_id, total_time)
    VALUES (NEW.id, NEW.date, NEW.client_id, NEW.total_time);
END;
CREATE TRIGGER IF NOT EXISTS trg_orders_relation_update
AFTER UPDATE OF date, client_id, total_time ON service_orders
BEGIN
    UPDATE order_relations
    SET date = NEW.date, client_id = NEW.client_id, total_time = NEW.total_time
    WHERE order_id = NEW.id;
END;
";

const LOCK_TRIGGERS: &str = "
CREATE TRIGGER IF NOT EXISTS trg_orders_locked_update
BEFORE UPDATE ON service_orders
WHEN OLD.sent = 'S'
BEGIN
    SELECT RAISE(ABORT, 'service order already sent');
END;
CREATE TRIGGER IF NOT EXISTS trg_orders_locked_delete
BEFORE DELETE ON service_orders
WHEN OLD.sent = 'S'
BEGIN
    SELECT RAISE(ABORT, 'service order already sent');
END;
";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        self.add_migration(1, "create_catalog_tables", |tx| {
            tx.execute_batch(SCHEMA_CATALOGS)?;
            Ok(())
        });

        self.add_migration(2, "create_order_tables", |tx| {
            tx.execute_batch(SCHEMA_ORDERS)?;
            Ok(())
        });

        // Backfills relations for orders that predate the triggers.
        self.add_migration(3, "add_relation_triggers", |tx| {
            tx.execute_batch(RELATION_TRIGGERS)?;
            tx.execute(
                "INSERT OR IGNORE INTO order_relations (order_id, date, client_id, total_time)
                 SELECT id, date, client_id, total_time FROM service_orders",
                [],
            )?;
            Ok(())
        });

        self.add_migration(4, "lock_sent_orders", |tx| {
            tx.execute_batch(LOCK_TRIGGERS)?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Applied migrations in version order; empty before the first run.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<AppliedMigration>> {
        if self.get_current_version(conn)? == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], AppliedMigration::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    /// Versions and names of the migrations the database has not run yet.
    pub fn pending_migrations(&self, conn: &Connection) -> Result<Vec<(u32, &'static str)>> {
        let current = self.get_current_version(conn)?;
        Ok(self
            .migrations
            .iter()
            .filter(|m| m.version > current)
            .map(|m| (m.version, m.name))
            .collect())
    }
}

/// One row of the `migrations` table.
#[derive(Debug, Clone)]
pub struct AppliedMigration {
    pub version: u32,
    pub name: String,
    pub applied_at: Option<NaiveDateTime>,
}

impl AppliedMigration {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let applied_at: Option<String> = row.get(2)?;
        Ok(AppliedMigration {
            version: row.get(0)?,
            name: row.get(1)?,
            applied_at: applied_at.and_then(|t| NaiveDateTime::parse_from_str(&t, APPLIED_AT_FORMAT).ok()),
        })
    }
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
