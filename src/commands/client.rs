use super::{confirm_delete, print_page, PageArgs};
use crate::{
    db::{
        clients::{Client, ClientFilter, Clients, PersonKind},
        db::Db,
    },
    libs::{
        config::Config,
        lookup::DocumentLookup,
        messages::{Entity, Message},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ClientArgs {
    #[command(subcommand)]
    command: ClientCommand,
}

#[derive(Debug, Clone, Args)]
struct ClientFields {
    /// F for a person (CPF), J for a company (CNPJ)
    #[arg(long, default_value = "J")]
    kind: String,
    #[arg(long)]
    trade_name: Option<String>,
    #[arg(long)]
    city: Option<String>,
    /// Two-letter state code
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    /// Recipient of sent service orders
    #[arg(long)]
    order_email: Option<String>,
    #[arg(long)]
    invoice_email: Option<String>,
    #[arg(long)]
    modality: Option<i64>,
    #[arg(long)]
    hourly_rate: Option<f64>,
}

impl ClientFields {
    fn into_client(self, document: &str, legal_name: &str) -> Result<Client> {
        let kind: PersonKind = self.kind.parse()?;
        Ok(Client {
            trade_name: self.trade_name,
            city: self.city,
            state: self.state,
            contact: self.contact,
            order_email: self.order_email,
            invoice_email: self.invoice_email,
            modality_id: self.modality,
            hourly_rate: self.hourly_rate,
            ..Client::new(kind, document, legal_name)
        })
    }
}

#[derive(Debug, Subcommand)]
enum ClientCommand {
    /// List clients
    List {
        #[arg(long)]
        code: Option<i64>,
        /// F or J
        #[arg(long)]
        kind: Option<String>,
        /// Partial legal name match
        #[arg(long)]
        name: Option<String>,
        /// Partial document match, punctuation ignored
        #[arg(long)]
        document: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        modality: Option<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one client
    Show { id: i64 },
    /// Register a client
    Create {
        /// CPF or CNPJ, with or without punctuation
        document: String,
        legal_name: String,
        #[command(flatten)]
        fields: ClientFields,
    },
    /// Replace a client's data
    Update {
        id: i64,
        document: String,
        legal_name: String,
        #[command(flatten)]
        fields: ClientFields,
    },
    /// Delete a client with no orders
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Check whether a client can be deleted
    CanDelete { id: i64 },
    /// Look a CNPJ up in the public registry
    Lookup { document: String },
}

pub async fn cmd(args: ClientArgs) -> Result<()> {
    if let ClientCommand::Lookup { document } = &args.command {
        return handle_lookup(document).await;
    }

    let db = Db::new()?;
    let clients = Clients::new(&db.conn);

    match args.command {
        ClientCommand::List {
            code,
            kind,
            name,
            document,
            city,
            state,
            modality,
            page,
        } => {
            let filter = ClientFilter {
                code,
                kind,
                legal_name: name,
                document,
                city,
                state,
                modality,
            };
            let paged = clients.list(&filter, page.pagination()?)?;
            if paged.items.is_empty() {
                msg_info!(Message::NoRecordsFound(Entity::Client));
                return Ok(());
            }
            msg_print!(Message::RecordsHeader(Entity::Client), true);
            View::clients(&paged.items);
            print_page(&paged.page);
        }
        ClientCommand::Show { id } => View::client(&clients.get(id)?),
        ClientCommand::Create {
            document,
            legal_name,
            fields,
        } => {
            let id = clients.create(&fields.into_client(&document, &legal_name)?)?;
            msg_success!(Message::RecordCreated(Entity::Client, id));
        }
        ClientCommand::Update {
            id,
            document,
            legal_name,
            fields,
        } => {
            clients.update(id, &fields.into_client(&document, &legal_name)?)?;
            msg_success!(Message::RecordUpdated(Entity::Client, id));
        }
        ClientCommand::Delete { id, yes } => {
            if confirm_delete(Entity::Client, id, yes)? {
                clients.delete(id)?;
                msg_success!(Message::RecordDeleted(Entity::Client, id));
            }
        }
        ClientCommand::CanDelete { id } => {
            msg_print!(Message::RecordCanBeDeleted(Entity::Client, id, clients.can_delete(id)?));
        }
        ClientCommand::Lookup { .. } => {}
    }

    Ok(())
}

async fn handle_lookup(document: &str) -> Result<()> {
    let lookup = DocumentLookup::new(&Config::load()?.lookup());
    let record = lookup.lookup(document).await?;

    let mut client = Client::new(PersonKind::Company, &record.document, &record.legal_name);
    client.trade_name = record.trade_name;
    client.city = record.city;
    client.state = record.state;
    View::client(&client);
    Ok(())
}
