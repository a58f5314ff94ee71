use super::{confirm_delete, print_page, PageArgs};
use crate::{
    db::{
        db::Db,
        orders::{OrderFilter, OrderInput, Orders},
    },
    libs::{
        config::Config,
        messages::{Entity, Message},
        pdf::PdfRenderer,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    command: OrderCommand,
}

/// Order fields. On update only the given ones change.
#[derive(Debug, Clone, Default, Args)]
struct OrderFields {
    #[arg(long)]
    client: Option<i64>,
    #[arg(long)]
    service: Option<i64>,
    #[arg(long)]
    consultant: Option<i64>,
    #[arg(long)]
    modality: Option<i64>,
    /// DD/MM/YYYY or YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    /// HH:MM
    #[arg(long)]
    start: Option<String>,
    /// HH:MM; earlier than start means the work ran past midnight
    #[arg(long)]
    end: Option<String>,
    /// Break time to subtract, HH:MM
    #[arg(long)]
    discount: Option<String>,
    /// Travel time to add, HH:MM
    #[arg(long)]
    transfer: Option<String>,
    /// Total time; computed from the other times when omitted
    #[arg(long)]
    total: Option<String>,
    /// Person who received the consultant on site
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    detail: Option<String>,
}

impl OrderFields {
    fn apply(self, input: &mut OrderInput) {
        let times_changed = self.start.is_some() || self.end.is_some() || self.discount.is_some() || self.transfer.is_some();
        if times_changed && self.total.is_none() {
            input.total_time = None;
        }

        replace(&mut input.client_id, self.client);
        replace(&mut input.service_id, self.service);
        replace(&mut input.consultant_id, self.consultant);
        replace(&mut input.modality_id, self.modality);
        replace(&mut input.date, self.date);
        replace(&mut input.start_time, self.start);
        replace(&mut input.end_time, self.end);
        replace(&mut input.discount_time, self.discount);
        replace(&mut input.transfer_time, self.transfer);
        replace(&mut input.total_time, self.total);
        replace(&mut input.on_site_contact, self.contact);
        replace(&mut input.detail, self.detail);
    }
}

fn replace<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

#[derive(Debug, Subcommand)]
enum OrderCommand {
    /// List service orders, newest first
    List {
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
        #[arg(long)]
        modality: Option<i64>,
        #[arg(long)]
        service: Option<i64>,
        #[arg(long)]
        consultant: Option<i64>,
        /// S for sent, N for pending
        #[arg(long)]
        sent: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one order
    Show { id: i64 },
    /// Open a new order
    Create {
        #[command(flatten)]
        fields: OrderFields,
    },
    /// Change a pending order
    Update {
        id: i64,
        #[command(flatten)]
        fields: OrderFields,
    },
    /// Delete a pending order and its relation
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Render the order PDF and lock the order
    Send { id: i64 },
    /// Render the order PDF without sending it
    Pdf {
        id: i64,
        /// Write here instead of the configured PDF directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check whether an order can still be changed
    CanModify { id: i64 },
}

pub fn cmd(args: OrderArgs) -> Result<()> {
    let db = Db::new()?;
    let orders = Orders::new(&db.conn);

    match args.command {
        OrderCommand::List {
            number,
            from,
            to,
            client,
            modality,
            service,
            consultant,
            sent,
            page,
        } => {
            let filter = OrderFilter {
                number,
                date_from: from,
                date_to: to,
                client,
                modality,
                service,
                consultant,
                sent,
            };
            let paged = orders.list(&filter, page.pagination()?)?;
            if paged.items.is_empty() {
                msg_info!(Message::NoRecordsFound(Entity::Order));
                return Ok(());
            }
            msg_print!(Message::RecordsHeader(Entity::Order), true);
            View::orders(&paged.items);
            print_page(&paged.page);
        }
        OrderCommand::Show { id } => View::order(&orders.get(id)?),
        OrderCommand::Create { fields } => {
            let mut input = OrderInput::default();
            fields.apply(&mut input);
            let id = orders.create(&input)?;
            msg_success!(Message::RecordCreated(Entity::Order, id));
        }
        OrderCommand::Update { id, fields } => {
            let current = orders.get(id)?;
            current.sent.ensure_mutable(id)?;
            let mut input = OrderInput::from(&current);
            fields.apply(&mut input);
            orders.update(id, &input)?;
            msg_success!(Message::RecordUpdated(Entity::Order, id));
        }
        OrderCommand::Delete { id, yes } => {
            orders.status(id)?.ensure_mutable(id)?;
            if confirm_delete(Entity::Order, id, yes)? {
                orders.delete(id)?;
                msg_success!(Message::RecordDeleted(Entity::Order, id));
            }
        }
        OrderCommand::Send { id } => {
            let renderer = PdfRenderer::from_config(&Config::load()?)?;
            let path = orders.send(id, &renderer)?;
            let email = orders.get(id)?.client_order_email.unwrap_or_default();
            msg_success!(Message::OrderSent(id, email));
            msg_info!(Message::PdfSaved(path.display().to_string()));
        }
        OrderCommand::Pdf { id, output } => {
            let renderer = PdfRenderer::from_config(&Config::load()?)?;
            let order = orders.get(id)?;
            let path = match output {
                Some(path) => {
                    fs::write(&path, renderer.order_pdf(&order)?)?;
                    path
                }
                None => renderer.save_order(&order)?,
            };
            msg_success!(Message::PdfSaved(path.display().to_string()));
        }
        OrderCommand::CanModify { id } => {
            msg_print!(Message::OrderCanModify(id, orders.can_modify(id)?));
        }
    }

    Ok(())
}
