use crate::{
    db::{dashboard::Dashboard, db::Db},
    libs::{messages::Message, view::View},
    msg_print,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let db = Db::new()?;
    let stats = Dashboard::new(&db.conn).stats()?;

    msg_print!(Message::DashboardHeader, true);
    View::dashboard(&stats);
    Ok(())
}
