//! Schema maintenance for the dexus database.

use crate::{
    db::{
        db::Db,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{messages::Message, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show the schema version and any pending migrations
    Status,
    /// List applied migrations with the day they ran
    History,
    /// Apply pending migrations now
    Apply,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    // Opened raw so inspecting the schema never upgrades it.
    let conn = Db::new_without_migrations()?;
    let manager = MigrationManager::new();

    match args.command {
        MigrationsCommand::Status => {
            msg_print!(Message::SchemaVersion(get_db_version(&conn)?, manager.latest_version()));

            let pending = manager.pending_migrations(&conn)?;
            if pending.is_empty() {
                msg_info!(Message::DatabaseUpToDate);
                return Ok(());
            }
            msg_info!(Message::DatabaseNeedsUpdate);
            for (version, name) in pending {
                msg_print!(Message::PendingMigration(version, name.to_string()));
            }
        }
        MigrationsCommand::History => {
            let history = manager.get_migration_history(&conn)?;
            if history.is_empty() {
                msg_info!(Message::NoMigrationsApplied);
                return Ok(());
            }
            msg_print!(Message::MigrationHistory, true);
            View::migrations(&history);
        }
        MigrationsCommand::Apply => {
            if !needs_migration(&conn)? {
                msg_info!(Message::DatabaseUpToDate);
                return Ok(());
            }
            drop(conn);

            let db = Db::new()?;
            msg_success!(Message::MigrationsApplied(get_db_version(&db.conn)?));
        }
    }

    Ok(())
}
