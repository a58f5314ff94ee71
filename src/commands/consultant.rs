use super::{confirm_delete, print_page, PageArgs};
use crate::{
    db::{
        consultants::{Consultant, ConsultantFilter, Consultants},
        db::Db,
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
pub struct ConsultantArgs {
    #[command(subcommand)]
    command: ConsultantCommand,
}

#[derive(Debug, Clone, Args)]
struct ConsultantFields {
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Area of practice
    #[arg(long)]
    expertise: Option<String>,
    #[arg(long)]
    hourly_rate: Option<f64>,
}

impl ConsultantFields {
    fn into_consultant(self, name: &str) -> Consultant {
        Consultant {
            phone: self.phone,
            email: self.email,
            expertise: self.expertise,
            hourly_rate: self.hourly_rate,
            ..Consultant::new(name)
        }
    }
}

#[derive(Debug, Subcommand)]
enum ConsultantCommand {
    /// List consultants
    List {
        #[arg(long)]
        code: Option<i64>,
        /// Partial name match
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        expertise: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one consultant
    Show { id: i64 },
    /// Register a consultant
    Create {
        name: String,
        #[command(flatten)]
        fields: ConsultantFields,
    },
    /// Replace a consultant's data
    Update {
        id: i64,
        name: String,
        #[command(flatten)]
        fields: ConsultantFields,
    },
    /// Delete a consultant with no orders
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Check whether a consultant can be deleted
    CanDelete { id: i64 },
}

pub fn cmd(args: ConsultantArgs) -> Result<()> {
    let db = Db::new()?;
    let consultants = Consultants::new(&db.conn);

    match args.command {
        ConsultantCommand::List {
            code,
            name,
            email,
            expertise,
            page,
        } => {
            let filter = ConsultantFilter {
                code,
                name,
                email,
                expertise,
            };
            let paged = consultants.list(&filter, page.pagination()?)?;
            if paged.items.is_empty() {
                msg_info!(Message::NoRecordsFound(Entity::Consultant));
                return Ok(());
            }
            msg_print!(Message::RecordsHeader(Entity::Consultant), true);
            View::consultants(&paged.items);
            print_page(&paged.page);
        }
        ConsultantCommand::Show { id } => View::consultants(&[consultants.get(id)?]),
        ConsultantCommand::Create { name, fields } => {
            let id = consultants.create(&fields.into_consultant(&name))?;
            msg_success!(Message::RecordCreated(Entity::Consultant, id));
        }
        ConsultantCommand::Update { id, name, fields } => {
            consultants.update(id, &fields.into_consultant(&name))?;
            msg_success!(Message::RecordUpdated(Entity::Consultant, id));
        }
        ConsultantCommand::Delete { id, yes } => {
            if confirm_delete(Entity::Consultant, id, yes)? {
                consultants.delete(id)?;
                msg_success!(Message::RecordDeleted(Entity::Consultant, id));
            }
        }
        ConsultantCommand::CanDelete { id } => {
            msg_print!(Message::RecordCanBeDeleted(Entity::Consultant, id, consultants.can_delete(id)?));
        }
    }

    Ok(())
}
