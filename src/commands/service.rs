use super::{confirm_delete, print_page, PageArgs};
use crate::{
    db::{
        db::Db,
        services::{Service, ServiceFilter, Services},
    },
    libs::{
        messages::{Entity, Message},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[command(subcommand)]
    command: ServiceCommand,
}

#[derive(Debug, Subcommand)]
enum ServiceCommand {
    /// List services
    List {
        /// Filter by id
        #[arg(long)]
        code: Option<i64>,
        /// Filter by description (partial match)
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one service
    Show { id: i64 },
    /// Create a service
    Create { description: String },
    /// Rename a service
    Update { id: i64, description: String },
    /// Delete a service no order uses
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Check whether a service can be deleted
    CanDelete { id: i64 },
}

pub fn cmd(args: ServiceArgs) -> Result<()> {
    let db = Db::new()?;
    let services = Services::new(&db.conn);

    match args.command {
        ServiceCommand::List { code, description, page } => {
            let filter = ServiceFilter { code, description };
            let paged = services.list(&filter, page.pagination()?)?;
            if paged.items.is_empty() {
                msg_info!(Message::NoRecordsFound(Entity::Service));
                return Ok(());
            }
            msg_print!(Message::RecordsHeader(Entity::Service), true);
            View::services(&paged.items);
            print_page(&paged.page);
        }
        ServiceCommand::Show { id } => View::services(&[services.get(id)?]),
        ServiceCommand::Create { description } => {
            let id = services.create(&Service::new(&description))?;
            msg_success!(Message::RecordCreated(Entity::Service, id));
        }
        ServiceCommand::Update { id, description } => {
            services.update(id, &Service::new(&description))?;
            msg_success!(Message::RecordUpdated(Entity::Service, id));
        }
        ServiceCommand::Delete { id, yes } => {
            if confirm_delete(Entity::Service, id, yes)? {
                services.delete(id)?;
                msg_success!(Message::RecordDeleted(Entity::Service, id));
            }
        }
        ServiceCommand::CanDelete { id } => {
            msg_print!(Message::RecordCanBeDeleted(Entity::Service, id, services.can_delete(id)?));
        }
    }

    Ok(())
}
