//! Command-line interface.
//!
//! Each subcommand lives in its own module with a clap `Args` struct and a
//! `cmd` entry point. Listing commands share [`PageArgs`]; delete commands
//! share the confirmation prompt in [`confirm_delete`].

pub mod client;
pub mod consultant;
pub mod dashboard;
pub mod export;
pub mod init;
pub mod migrations;
pub mod modality;
pub mod order;
pub mod relation;
pub mod serve;
pub mod service;

use crate::libs::config::Config;
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{PageInfo, Pagination};
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init,
    #[command(about = "Manage clients")]
    Client(client::ClientArgs),
    #[command(about = "Manage consultants")]
    Consultant(consultant::ConsultantArgs),
    #[command(about = "Manage the service catalog")]
    Service(service::ServiceArgs),
    #[command(about = "Manage modalities")]
    Modality(modality::ModalityArgs),
    #[command(about = "Manage service orders")]
    Order(order::OrderArgs),
    #[command(about = "Order relations: invoicing, collection and reports")]
    Relation(relation::RelationArgs),
    #[command(about = "Export order relations to CSV, JSON or Excel")]
    Export(export::ExportArgs),
    #[command(about = "Show dashboard counters")]
    Dashboard,
    #[command(about = "Run the HTTP API server")]
    Serve(serve::ServeArgs),
    #[command(about = "Inspect database migrations")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve(_))
    }

    pub async fn menu(self) -> Result<()> {
        match self.command {
            Commands::Init => init::cmd(),
            Commands::Client(args) => client::cmd(args).await,
            Commands::Consultant(args) => consultant::cmd(args),
            Commands::Service(args) => service::cmd(args),
            Commands::Modality(args) => modality::cmd(args),
            Commands::Order(args) => order::cmd(args),
            Commands::Relation(args) => relation::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Dashboard => dashboard::cmd(),
            Commands::Serve(args) => serve::cmd(args).await,
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// `--page` and `--per-page` for listing commands.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: i64,
    /// Rows per page; defaults to `report.per_page` from the config
    #[arg(long)]
    pub per_page: Option<i64>,
}

impl PageArgs {
    pub fn pagination(&self) -> Result<Pagination> {
        let per_page = match self.per_page {
            Some(per_page) => per_page,
            None => Config::load()?.report().per_page,
        };
        Ok(Pagination::new(self.page, per_page))
    }
}

/// Prints the "Showing x-y of n" line under a listing.
pub fn print_page(page: &PageInfo) {
    msg_print!(Message::PageSummary(page.start, page.end, page.total, page.page, page.total_pages));
}

/// Asks before deleting unless `yes` is set. Prints the cancellation itself.
pub fn confirm_delete(entity: Entity, id: i64, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDelete(entity, id).to_string())
        .default(false)
        .interact()?;

    if !confirmed {
        msg_info!(Message::OperationCancelled);
    }
    Ok(confirmed)
}
