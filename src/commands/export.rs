//! Export of the order relation listing.
//!
//! Writes every relation matching the filters, followed by the invoicing and
//! collection summary for the same filters.
//!
//! ```bash
//! dexus export --format excel --from 01/01/2025 --to 31/01/2025
//! dexus export -f json --client 3 --invoiced N -o pending.json
//! ```

use super::relation::RelationFilterArgs;
use crate::{
    db::{db::Db, relations::{RelationFilter, Relations}},
    libs::{
        export::{ExportFormat, Exporter},
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Output file; defaults to `dexus_relations_<timestamp>.<ext>` in the
    /// current directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    filter: RelationFilterArgs,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let db = Db::new()?;
    let relations = Relations::new(&db.conn);
    let filter: RelationFilter = args.filter.into();

    let exporter = Exporter::new(args.format, args.output);
    msg_info!(Message::ExportingRelations(args.format.extension().to_uppercase()));

    let path = exporter.export(&relations.all(&filter)?, &relations.statistics(&filter))?;
    msg_success!(Message::ExportCompleted(path.display().to_string()));
    Ok(())
}
