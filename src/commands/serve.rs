//! Runs the JSON API.
//!
//! Host and port come from the flags, then `DEXUS_HOST`/`DEXUS_PORT`, then
//! the `server` config section.

use crate::{
    api::{self, AppState},
    db::db::Db,
    libs::{config::Config, messages::Message},
    msg_info, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(short, long)]
    port: Option<u16>,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    let config = Config::load()?;
    let server = config.server();
    let host = args.host.unwrap_or(server.host);
    let port = args.port.unwrap_or(server.port);

    let state = AppState::from_config(Db::new()?.conn, &config)?;

    let max_age = Duration::from_secs(config.report().pdf_max_age_hours * 3600);
    match state.renderer.cleanup_pdf_files(max_age) {
        Ok(0) => {}
        Ok(removed) => msg_info!(Message::PdfFilesRemoved(removed)),
        Err(e) => msg_warning!(Message::PdfCleanupFailed(e.to_string())),
    }

    api::serve(state, &host, port).await
}
