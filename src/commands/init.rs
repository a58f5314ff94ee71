//! Interactive configuration wizard.

use crate::{
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;

/// Runs the wizard and writes `config.json` to the data directory.
pub fn cmd() -> Result<()> {
    Config::init()?.save()?;

    msg_success!(Message::ConfigSaved);
    Ok(())
}
