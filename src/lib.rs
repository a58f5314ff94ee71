//! # Dexus
//!
//! Back office for a consulting firm: clients, consultants, service catalogs
//! and service orders, with invoicing and collection tracking.
//!
//! ## Features
//!
//! - **Service orders**: worked time derived from start, end, discount and
//!   transfer, with midnight rollover. Orders lock once sent.
//! - **Order relations**: invoiced/collected flags per order, with statistics
//!   segmented by both flags and by client.
//! - **Documents**: printable service orders and relation reports as PDF.
//! - **Interfaces**: a JSON API for the browser front end and a CLI.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clap::Parser;
//! use dexus::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::parse().menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
