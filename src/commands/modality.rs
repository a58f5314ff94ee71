use super::{confirm_delete, print_page, PageArgs};
use crate::{
    db::{
        db::Db,
        modalities::{Modalities, Modality, ModalityFilter},
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
pub struct ModalityArgs {
    #[command(subcommand)]
    command: ModalityCommand,
}

#[derive(Debug, Subcommand)]
enum ModalityCommand {
    /// List modalities
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
    /// Show one modality
    Show { id: i64 },
    /// Create a modality
    Create { description: String },
    /// Rename a modality
    Update { id: i64, description: String },
    /// Delete a modality that nothing references
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Check whether a modality can be deleted
    CanDelete { id: i64 },
}

pub fn cmd(args: ModalityArgs) -> Result<()> {
    let db = Db::new()?;
    let modalities = Modalities::new(&db.conn);

    match args.command {
        ModalityCommand::List { code, description, page } => {
            let filter = ModalityFilter { code, description };
            let paged = modalities.list(&filter, page.pagination()?)?;
            if paged.items.is_empty() {
                msg_info!(Message::NoRecordsFound(Entity::Modality));
                return Ok(());
            }
            msg_print!(Message::RecordsHeader(Entity::Modality), true);
            View::modalities(&paged.items);
            print_page(&paged.page);
        }
        ModalityCommand::Show { id } => View::modalities(&[modalities.get(id)?]),
        ModalityCommand::Create { description } => {
            let id = modalities.create(&Modality::new(&description))?;
            msg_success!(Message::RecordCreated(Entity::Modality, id));
        }
        ModalityCommand::Update { id, description } => {
            modalities.update(id, &Modality::new(&description))?;
            msg_success!(Message::RecordUpdated(Entity::Modality, id));
        }
        ModalityCommand::Delete { id, yes } => {
            if confirm_delete(Entity::Modality, id, yes)? {
                modalities.delete(id)?;
                msg_success!(Message::RecordDeleted(Entity::Modality, id));
            }
        }
        ModalityCommand::CanDelete { id } => {
            msg_print!(Message::RecordCanBeDeleted(Entity::Modality, id, modalities.can_delete(id)?));
        }
    }

    Ok(())
}
