use super::{print_page, PageArgs};
use crate::{
    db::{
        db::Db,
        relations::{RelationFilter, Relations},
    },
    libs::{
        config::Config,
        messages::{Entity, Message},
        pdf::PdfRenderer,
        status::Flag,
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::time::Duration;

#[derive(Debug, Args)]
pub struct RelationArgs {
    #[command(subcommand)]
    command: RelationCommand,
}

/// Filters shared by the relation listing, report and export.
#[derive(Debug, Clone, Default, Args)]
pub struct RelationFilterArgs {
    #[arg(long)]
    number: Option<i64>,
    /// First date, inclusive
    #[arg(long)]
    from: Option<String>,
    /// Last date, inclusive
    #[arg(long)]
    to: Option<String>,
    #[arg(long)]
    client: Option<i64>,
    /// S or N
    #[arg(long)]
    invoiced: Option<String>,
    /// S or N
    #[arg(long)]
    collected: Option<String>,
}

impl From<RelationFilterArgs> for RelationFilter {
    fn from(args: RelationFilterArgs) -> Self {
        RelationFilter {
            number: args.number,
            date_from: args.from,
            date_to: args.to,
            client: args.client,
            invoiced: args.invoiced,
            collected: args.collected,
        }
    }
}

#[derive(Debug, Subcommand)]
enum RelationCommand {
    /// List relations with the invoicing and collection summary
    List {
        #[command(flatten)]
        filter: RelationFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show only the summary
    Stats {
        #[command(flatten)]
        filter: RelationFilterArgs,
    },
    /// Mark an order as invoiced (S) or not (N)
    Invoice { id: i64, value: String },
    /// Mark an order as collected (S) or not (N)
    Collect { id: i64, value: String },
    /// Render the relation report PDF
    Pdf {
        #[command(flatten)]
        filter: RelationFilterArgs,
    },
}

pub fn cmd(args: RelationArgs) -> Result<()> {
    let db = Db::new()?;
    let relations = Relations::new(&db.conn);

    match args.command {
        RelationCommand::List { filter, page } => {
            let list = relations.list(&filter.into(), page.pagination()?)?;
            if list.rows.items.is_empty() {
                msg_info!(Message::NoRecordsFound(Entity::Relation));
                return Ok(());
            }
            msg_print!(Message::RecordsHeader(Entity::Relation), true);
            View::relations(&list.rows.items);
            print_page(&list.rows.page);
            msg_print!(Message::StatisticsHeader, true);
            View::statistics(&list.statistics);
        }
        RelationCommand::Stats { filter } => {
            msg_print!(Message::StatisticsHeader, true);
            View::statistics(&relations.statistics(&filter.into()));
        }
        RelationCommand::Invoice { id, value } => {
            let flag: Flag = value.parse()?;
            relations.set_invoiced(id, flag)?;
            msg_success!(Message::RelationInvoicedSet(id, flag));
        }
        RelationCommand::Collect { id, value } => {
            let flag: Flag = value.parse()?;
            relations.set_collected(id, flag)?;
            msg_success!(Message::RelationCollectedSet(id, flag));
        }
        RelationCommand::Pdf { filter } => {
            let config = Config::load()?;
            let renderer = PdfRenderer::from_config(&config)?;

            let max_age = Duration::from_secs(config.report().pdf_max_age_hours * 3600);
            match renderer.cleanup_pdf_files(max_age) {
                Ok(0) => {}
                Ok(removed) => msg_info!(Message::PdfFilesRemoved(removed)),
                Err(e) => msg_warning!(Message::PdfCleanupFailed(e.to_string())),
            }

            let filter: RelationFilter = filter.into();
            let path = renderer.save_relations(&relations.all(&filter)?, &relations.statistics(&filter), &relations.applied(&filter)?)?;
            msg_success!(Message::PdfSaved(path.display().to_string()));
        }
    }

    Ok(())
}
