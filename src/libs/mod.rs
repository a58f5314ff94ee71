//! Domain logic and supporting services.
//!
//! The pure core lives in [`duration`] and [`statistics`]; both are free of
//! I/O and never fail. The rest wraps configuration, rendering and export
//! around the repositories in [`crate::db`].

pub mod config;
pub mod data_storage;
pub mod dates;
pub mod duration;
pub mod error;
pub mod export;
pub mod lookup;
pub mod messages;
pub mod pagination;
pub mod pdf;
pub mod statistics;
pub mod status;
pub mod validation;
pub mod view;
