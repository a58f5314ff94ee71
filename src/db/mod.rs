//! SQLite persistence.
//!
//! [`db::Db`] opens the database and applies migrations. Every repository is
//! a thin struct over a borrowed `&Connection`, so a caller holding a
//! `Transaction` can pass it straight in:
//!
//! ```rust,no_run
//! use dexus::db::{db::Db, modalities::{Modalities, Modality}};
//!
//! let db = Db::new()?;
//! let id = Modalities::new(&db.conn).create(&Modality::new("Remote"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup and the `Db` handle.
pub mod db;

/// Versioned schema, including the triggers that maintain order relations
/// and lock sent orders.
pub mod migrations;

pub mod query;

pub mod clients;
pub mod consultants;
pub mod modalities;
pub mod services;

/// Service orders and their sent/locked lifecycle.
pub mod orders;

/// Invoicing and collection flags, listings and statistics.
pub mod relations;

pub mod dashboard;
