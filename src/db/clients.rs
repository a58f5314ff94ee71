use crate::db::query::{exists, optional_id, WhereClause};
use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use crate::libs::validation::{blank_to_none, format_document, only_digits, validate_cnpj, validate_cpf, validate_email, validate_uf};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const INSERT_CLIENT: &str = "INSERT INTO clients
    (kind, document, legal_name, trade_name, city, state, contact, order_email, invoice_email, modality_id, hourly_rate)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

const UPDATE_CLIENT: &str = "UPDATE clients SET
    kind = ?2, document = ?3, legal_name = ?4, trade_name = ?5, city = ?6, state = ?7,
    contact = ?8, order_email = ?9, invoice_email = ?10, modality_id = ?11, hourly_rate = ?12
    WHERE id = ?1";

const DELETE_CLIENT: &str = "DELETE FROM clients WHERE id = ?1";

const SELECT_CLIENT: &str = "SELECT c.id, c.kind, c.document, c.legal_name, c.trade_name, c.city, c.state, c.contact,
    c.order_email, c.invoice_email, c.modality_id, c.hourly_rate, m.description
    FROM clients c
    LEFT JOIN modalities m ON m.id = c.modality_id";

const FIND_DOCUMENT_OWNER: &str = "SELECT id FROM clients WHERE document = ?1 AND id <> ?2";

const COUNT_CLIENT_ORDERS: &str = "SELECT COUNT(*) FROM service_orders WHERE client_id = ?1";

/// Natural person (`F`, CPF) or company (`J`, CNPJ).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonKind {
    #[serde(rename = "F")]
    Individual,
    #[default]
    #[serde(rename = "J")]
    Company,
}

impl PersonKind {
    pub fn code(&self) -> &'static str {
        match self {
            PersonKind::Individual => "F",
            PersonKind::Company => "J",
        }
    }

    pub fn accepts(&self, document: &str) -> bool {
        match self {
            PersonKind::Individual => validate_cpf(document),
            PersonKind::Company => validate_cnpj(document),
        }
    }
}

impl FromStr for PersonKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "F" => Ok(PersonKind::Individual),
            "J" => Ok(PersonKind::Company),
            _ => Err(AppError::Validation(Message::InvalidPersonKind(s.to_string()))),
        }
    }
}

impl ToSql for PersonKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for PersonKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|_| FromSqlError::InvalidType)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: Option<i64>,
    pub kind: PersonKind,
    /// CPF or CNPJ digits.
    pub document: String,
    pub legal_name: String,
    #[serde(default)]
    pub trade_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Person responsible on the client side.
    #[serde(default)]
    pub contact: Option<String>,
    /// Where sent service orders go.
    #[serde(default)]
    pub order_email: Option<String>,
    #[serde(default)]
    pub invoice_email: Option<String>,
    #[serde(default)]
    pub modality_id: Option<i64>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default, skip_deserializing)]
    pub modality_description: Option<String>,
}

impl Client {
    pub fn new(kind: PersonKind, document: &str, legal_name: &str) -> Self {
        Client {
            kind,
            document: document.to_string(),
            legal_name: legal_name.to_string(),
            ..Default::default()
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Client {
            id: row.get(0)?,
            kind: row.get(1)?,
            document: row.get(2)?,
            legal_name: row.get(3)?,
            trade_name: row.get(4)?,
            city: row.get(5)?,
            state: row.get(6)?,
            contact: row.get(7)?,
            order_email: row.get(8)?,
            invoice_email: row.get(9)?,
            modality_id: row.get(10)?,
            hourly_rate: row.get(11)?,
            modality_description: row.get(12)?,
        })
    }

    fn normalized(&self) -> AppResult<Client> {
        let legal_name = self.legal_name.trim();
        if legal_name.is_empty() {
            return Err(AppError::Validation(Message::FieldRequired("legal_name")));
        }

        let document = only_digits(&self.document);
        if document.is_empty() {
            return Err(AppError::Validation(Message::FieldRequired("document")));
        }
        if !self.kind.accepts(&document) {
            return Err(AppError::Validation(Message::InvalidDocument(self.document.clone())));
        }

        let state = blank_to_none(self.state.as_deref()).map(|s| s.to_uppercase());
        if let Some(state) = &state {
            if !validate_uf(state) {
                return Err(AppError::Validation(Message::InvalidField("state", state.clone())));
            }
        }

        let order_email = checked_email("order_email", self.order_email.as_deref())?;
        let invoice_email = checked_email("invoice_email", self.invoice_email.as_deref())?;

        Ok(Client {
            id: self.id,
            kind: self.kind,
            document,
            legal_name: legal_name.to_string(),
            trade_name: blank_to_none(self.trade_name.as_deref()),
            city: blank_to_none(self.city.as_deref()),
            state,
            contact: blank_to_none(self.contact.as_deref()),
            order_email,
            invoice_email,
            modality_id: self.modality_id,
            hourly_rate: self.hourly_rate,
            modality_description: None,
        })
    }
}

fn checked_email(field: &'static str, value: Option<&str>) -> AppResult<Option<String>> {
    let email = blank_to_none(value);
    if let Some(email) = &email {
        if !validate_email(email) {
            return Err(AppError::Validation(Message::InvalidField(field, email.clone())));
        }
    }
    Ok(email)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientFilter {
    #[serde(default, deserialize_with = "optional_id")]
    pub code: Option<i64>,
    pub kind: Option<String>,
    pub legal_name: Option<String>,
    pub document: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub modality: Option<i64>,
}

impl ClientFilter {
    fn where_clause(&self) -> WhereClause {
        let document = self.document.as_deref().map(only_digits);
        let kind = self.kind.as_deref().map(str::to_uppercase);
        let state = self.state.as_deref().map(str::to_uppercase);

        let mut clause = WhereClause::new();
        clause
            .eq_opt("c.id", self.code)
            .eq_text("c.kind", kind.as_deref())
            .like("c.legal_name", self.legal_name.as_deref())
            .like("c.document", document.as_deref())
            .like("c.city", self.city.as_deref())
            .eq_text("c.state", state.as_deref())
            .eq_opt("c.modality_id", self.modality);
        clause
    }
}

pub struct Clients<'a> {
    conn: &'a Connection,
}

impl<'a> Clients<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Clients { conn }
    }

    pub fn create(&self, client: &Client) -> AppResult<i64> {
        let c = self.checked(None, client)?;
        self.conn.execute(
            INSERT_CLIENT,
            params![
                c.kind,
                c.document,
                c.legal_name,
                c.trade_name,
                c.city,
                c.state,
                c.contact,
                c.order_email,
                c.invoice_email,
                c.modality_id,
                c.hourly_rate
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&self, id: i64, client: &Client) -> AppResult<()> {
        self.get(id)?;
        let c = self.checked(Some(id), client)?;
        self.conn.execute(
            UPDATE_CLIENT,
            params![
                id,
                c.kind,
                c.document,
                c.legal_name,
                c.trade_name,
                c.city,
                c.state,
                c.contact,
                c.order_email,
                c.invoice_email,
                c.modality_id,
                c.hourly_rate
            ],
        )?;
        Ok(())
    }

    /// Field checks plus the uniqueness and reference checks that need the store.
    fn checked(&self, id: Option<i64>, client: &Client) -> AppResult<Client> {
        let c = client.normalized()?;

        let owner: Option<i64> = self
            .conn
            .query_row(FIND_DOCUMENT_OWNER, params![c.document, id.unwrap_or(0)], |row| row.get(0))
            .optional()?;
        if owner.is_some() {
            return Err(AppError::Conflict(Message::DocumentTaken(format_document(&c.document))));
        }

        if let Some(modality_id) = c.modality_id {
            if !exists(self.conn, "modalities", modality_id)? {
                return Err(AppError::Validation(Message::InvalidField("modality_id", modality_id.to_string())));
            }
        }

        Ok(c)
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id)?;
        if !self.can_delete(id)? {
            return Err(AppError::Conflict(Message::RecordInUse(Entity::Client, id)));
        }
        self.conn.execute(DELETE_CLIENT, params![id])?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> AppResult<Client> {
        self.conn
            .query_row(&format!("{} WHERE c.id = ?1", SELECT_CLIENT), params![id], Client::from_row)
            .optional()?
            .ok_or(AppError::NotFound(Message::RecordNotFound(Entity::Client, id)))
    }

    pub fn list(&self, filter: &ClientFilter, pagination: Pagination) -> AppResult<Paged<Client>> {
        let clause = filter.where_clause();
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM clients c{}", clause.sql()),
            params_from_iter(clause.params()),
            |row| row.get(0),
        )?;
        let page = pagination.resolve(total);

        let mut stmt = self
            .conn
            .prepare(&format!("{}{} ORDER BY c.legal_name LIMIT ? OFFSET ?", SELECT_CLIENT, clause.sql()))?;
        let items = stmt
            .query_map(params_from_iter(clause.params_with_page(page.per_page, page.offset)), Client::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged { items, page })
    }

    pub fn all(&self) -> AppResult<Vec<Client>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY c.legal_name", SELECT_CLIENT))?;
        let items = stmt.query_map([], Client::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Legal name of a client, if it exists.
    pub fn name(&self, id: i64) -> AppResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT legal_name FROM clients WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?)
    }

    pub fn can_delete(&self, id: i64) -> AppResult<bool> {
        let orders: i64 = self.conn.query_row(COUNT_CLIENT_ORDERS, params![id], |row| row.get(0))?;
        Ok(orders == 0)
    }
}
