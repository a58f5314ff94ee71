//! Service orders and their sent/locked lifecycle.
//!
//! An order is freely editable while [`SentStatus::Pending`]. Sending it
//! renders the PDF and moves it to [`SentStatus::Sent`], after which updates
//! and deletes fail with [`AppError::Locked`]. The schema carries the same
//! rule as a trigger, so writes that bypass this module are refused too.
//!
//! Each order owns exactly one row in `order_relations`. Insert and update
//! triggers keep that row's date, client and total in step with the order.

use crate::db::query::{exists, optional_id, WhereClause};
use crate::libs::dates::{parse_date, to_storage_date, to_user_date, STORAGE_DATE_FORMAT};
use crate::libs::duration::compute_total_duration;
use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use crate::libs::pdf::PdfRenderer;
use crate::libs::status::SentStatus;
use crate::libs::validation::{blank_to_none, validate_duration, validate_time};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const INSERT_ORDER: &str = "INSERT INTO service_orders
    (client_id, modality_id, on_site_contact, date, start_time, end_time, discount_time, transfer_time,
     total_time, service_id, consultant_id, detail, sent)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

const UPDATE_ORDER: &str = "UPDATE service_orders SET
    client_id = ?2, modality_id = ?3, on_site_contact = ?4, date = ?5, start_time = ?6, end_time = ?7,
    discount_time = ?8, transfer_time = ?9, total_time = ?10, service_id = ?11, consultant_id = ?12, detail = ?13
    WHERE id = ?1";

const UPDATE_SENT: &str = "UPDATE service_orders SET sent = ?2 WHERE id = ?1";

const DELETE_RELATION: &str = "DELETE FROM order_relations WHERE order_id = ?1";

const DELETE_ORDER: &str = "DELETE FROM service_orders WHERE id = ?1";

const SELECT_STATUS: &str = "SELECT sent FROM service_orders WHERE id = ?1";

const SELECT_ORDER: &str = "SELECT o.id, o.client_id, c.legal_name, c.document, c.order_email,
    o.modality_id, m.description, o.on_site_contact, o.date, o.start_time, o.end_time,
    o.discount_time, o.transfer_time, o.total_time, o.service_id, s.description,
    o.consultant_id, k.name, o.detail, o.sent, o.created_at
    FROM service_orders o
    JOIN clients c ON c.id = o.client_id
    LEFT JOIN modalities m ON m.id = o.modality_id
    JOIN services s ON s.id = o.service_id
    JOIN consultants k ON k.id = o.consultant_id";

/// Fields a caller submits to create or update an order.
///
/// Everything is optional at the type level so that a partially filled form
/// reports the first missing field instead of failing to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderInput {
    pub client_id: Option<i64>,
    pub modality_id: Option<i64>,
    pub on_site_contact: Option<String>,
    /// `DD/MM/YYYY` or `YYYY-MM-DD`.
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub discount_time: Option<String>,
    pub transfer_time: Option<String>,
    /// Derived from the other times when left empty.
    pub total_time: Option<String>,
    pub service_id: Option<i64>,
    pub consultant_id: Option<i64>,
    pub detail: Option<String>,
}

/// Checked input, ready to bind.
struct OrderFields {
    client_id: i64,
    modality_id: Option<i64>,
    on_site_contact: Option<String>,
    date: String,
    start_time: Option<String>,
    end_time: Option<String>,
    discount_time: Option<String>,
    transfer_time: Option<String>,
    total_time: Option<String>,
    service_id: i64,
    consultant_id: i64,
    detail: Option<String>,
}

fn checked_clock(field: &'static str, value: Option<&str>) -> AppResult<Option<String>> {
    let value = blank_to_none(value);
    if let Some(v) = &value {
        if !validate_time(v) {
            return Err(AppError::Validation(Message::InvalidTime(field, v.clone())));
        }
    }
    Ok(value)
}

fn checked_span(field: &'static str, value: Option<&str>) -> AppResult<Option<String>> {
    let value = blank_to_none(value);
    if let Some(v) = &value {
        if !validate_duration(v) {
            return Err(AppError::Validation(Message::InvalidTime(field, v.clone())));
        }
    }
    Ok(value)
}

impl OrderInput {
    fn checked(&self, conn: &Connection) -> AppResult<OrderFields> {
        let client_id = self.client_id.ok_or(AppError::Validation(Message::FieldRequired("client_id")))?;
        let service_id = self.service_id.ok_or(AppError::Validation(Message::FieldRequired("service_id")))?;
        let consultant_id = self.consultant_id.ok_or(AppError::Validation(Message::FieldRequired("consultant_id")))?;

        let date_text = blank_to_none(self.date.as_deref()).ok_or(AppError::Validation(Message::FieldRequired("date")))?;
        let date = parse_date(&date_text).ok_or(AppError::Validation(Message::InvalidDate(date_text.clone())))?;

        let start_time = checked_clock("start_time", self.start_time.as_deref())?;
        let end_time = checked_clock("end_time", self.end_time.as_deref())?;
        let discount_time = checked_span("discount_time", self.discount_time.as_deref())?;
        let transfer_time = checked_span("transfer_time", self.transfer_time.as_deref())?;

        let total_time = match checked_span("total_time", self.total_time.as_deref())? {
            Some(total) => Some(total),
            None => match (&start_time, &end_time) {
                (Some(start), Some(end)) => {
                    Some(compute_total_duration(start, end, discount_time.as_deref(), transfer_time.as_deref()))
                }
                _ => None,
            },
        };

        for (table, field, id) in [
            ("clients", "client_id", Some(client_id)),
            ("services", "service_id", Some(service_id)),
            ("consultants", "consultant_id", Some(consultant_id)),
            ("modalities", "modality_id", self.modality_id),
        ] {
            if let Some(id) = id {
                if !exists(conn, table, id)? {
                    return Err(AppError::Validation(Message::InvalidField(field, id.to_string())));
                }
            }
        }

        Ok(OrderFields {
            client_id,
            modality_id: self.modality_id,
            on_site_contact: blank_to_none(self.on_site_contact.as_deref()),
            date: date.format(STORAGE_DATE_FORMAT).to_string(),
            start_time,
            end_time,
            discount_time,
            transfer_time,
            total_time,
            service_id,
            consultant_id,
            detail: blank_to_none(self.detail.as_deref()),
        })
    }
}

/// A stored order with the labels of everything it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOrder {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub client_document: String,
    pub client_order_email: Option<String>,
    pub modality_id: Option<i64>,
    pub modality_description: Option<String>,
    pub on_site_contact: Option<String>,
    /// `DD/MM/YYYY`.
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub discount_time: Option<String>,
    pub transfer_time: Option<String>,
    pub total_time: Option<String>,
    pub service_id: i64,
    pub service_description: String,
    pub consultant_id: i64,
    pub consultant_name: String,
    pub detail: Option<String>,
    pub sent: SentStatus,
    pub created_at: Option<String>,
}

impl ServiceOrder {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let date: String = row.get(8)?;
        Ok(ServiceOrder {
            id: row.get(0)?,
            client_id: row.get(1)?,
            client_name: row.get(2)?,
            client_document: row.get(3)?,
            client_order_email: row.get(4)?,
            modality_id: row.get(5)?,
            modality_description: row.get(6)?,
            on_site_contact: row.get(7)?,
            date: to_user_date(&date),
            start_time: row.get(9)?,
            end_time: row.get(10)?,
            discount_time: row.get(11)?,
            transfer_time: row.get(12)?,
            total_time: row.get(13)?,
            service_id: row.get(14)?,
            service_description: row.get(15)?,
            consultant_id: row.get(16)?,
            consultant_name: row.get(17)?,
            detail: row.get(18)?,
            sent: row.get(19)?,
            created_at: row.get(20)?,
        })
    }

    /// Order number as printed: zero-padded to four digits.
    pub fn number(&self) -> String {
        format!("{:04}", self.id)
    }
}

impl From<&ServiceOrder> for OrderInput {
    fn from(order: &ServiceOrder) -> Self {
        OrderInput {
            client_id: Some(order.client_id),
            modality_id: order.modality_id,
            on_site_contact: order.on_site_contact.clone(),
            date: Some(order.date.clone()),
            start_time: order.start_time.clone(),
            end_time: order.end_time.clone(),
            discount_time: order.discount_time.clone(),
            transfer_time: order.transfer_time.clone(),
            total_time: order.total_time.clone(),
            service_id: Some(order.service_id),
            consultant_id: Some(order.consultant_id),
            detail: order.detail.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default, deserialize_with = "optional_id")]
    pub number: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub client: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub modality: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub service: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub consultant: Option<i64>,
    /// `S` or `N`; anything else is ignored.
    pub sent: Option<String>,
}

impl OrderFilter {
    fn where_clause(&self) -> WhereClause {
        let date_from = self.date_from.as_deref().map(|d| to_storage_date(d.trim()));
        let date_to = self.date_to.as_deref().map(|d| to_storage_date(d.trim()));
        let sent = self.sent.as_deref().and_then(|s| SentStatus::from_code(s.trim()));

        let mut clause = WhereClause::new();
        clause
            .eq_opt("o.id", self.number)
            .gte("o.date", date_from.as_deref())
            .lte("o.date", date_to.as_deref())
            .eq_opt("o.client_id", self.client)
            .eq_opt("o.modality_id", self.modality)
            .eq_opt("o.service_id", self.service)
            .eq_opt("o.consultant_id", self.consultant)
            .eq_text("o.sent", sent.as_ref().map(SentStatus::code));
        clause
    }
}

pub struct Orders<'a> {
    conn: &'a Connection,
}

impl<'a> Orders<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Orders { conn }
    }

    pub fn create(&self, input: &OrderInput) -> AppResult<i64> {
        let f = input.checked(self.conn)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            INSERT_ORDER,
            params![
                f.client_id,
                f.modality_id,
                f.on_site_contact,
                f.date,
                f.start_time,
                f.end_time,
                f.discount_time,
                f.transfer_time,
                f.total_time,
                f.service_id,
                f.consultant_id,
                f.detail,
                SentStatus::Pending
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    pub fn update(&self, id: i64, input: &OrderInput) -> AppResult<()> {
        self.status(id)?.ensure_mutable(id)?;
        let f = input.checked(self.conn)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            UPDATE_ORDER,
            params![
                id,
                f.client_id,
                f.modality_id,
                f.on_site_contact,
                f.date,
                f.start_time,
                f.end_time,
                f.discount_time,
                f.transfer_time,
                f.total_time,
                f.service_id,
                f.consultant_id,
                f.detail
            ],
        )?;
        tx.commit()?;

        Ok(())
    }

    /// Removes the order and its relation row together.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.status(id)?.ensure_mutable(id)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(DELETE_RELATION, params![id])?;
        tx.execute(DELETE_ORDER, params![id])?;
        tx.commit()?;

        Ok(())
    }

    pub fn get(&self, id: i64) -> AppResult<ServiceOrder> {
        self.conn
            .query_row(&format!("{} WHERE o.id = ?1", SELECT_ORDER), params![id], ServiceOrder::from_row)
            .optional()?
            .ok_or(AppError::NotFound(Message::RecordNotFound(Entity::Order, id)))
    }

    pub fn list(&self, filter: &OrderFilter, pagination: Pagination) -> AppResult<Paged<ServiceOrder>> {
        let clause = filter.where_clause();
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM service_orders o{}", clause.sql()),
            params_from_iter(clause.params()),
            |row| row.get(0),
        )?;
        let page = pagination.resolve(total);

        let mut stmt = self
            .conn
            .prepare(&format!("{}{} ORDER BY o.id DESC LIMIT ? OFFSET ?", SELECT_ORDER, clause.sql()))?;
        let items = stmt
            .query_map(params_from_iter(clause.params_with_page(page.per_page, page.offset)), ServiceOrder::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged { items, page })
    }

    pub fn status(&self, id: i64) -> AppResult<SentStatus> {
        self.conn
            .query_row(SELECT_STATUS, params![id], |row| row.get(0))
            .optional()?
            .ok_or(AppError::NotFound(Message::RecordNotFound(Entity::Order, id)))
    }

    pub fn can_modify(&self, id: i64) -> AppResult<bool> {
        Ok(!self.status(id)?.is_locked())
    }

    /// Renders the order PDF and marks the order as sent.
    ///
    /// The client must have a service-order email. Returns the path of the
    /// rendered file. The status is left untouched if rendering fails, and no
    /// file is left behind if the status update fails.
    pub fn send(&self, id: i64, renderer: &PdfRenderer) -> AppResult<PathBuf> {
        let order = self.get(id)?;
        let next = order.sent.send(id)?;

        if blank_to_none(order.client_order_email.as_deref()).is_none() {
            return Err(AppError::Validation(Message::ClientWithoutOrderEmail(order.client_id)));
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(UPDATE_SENT, params![id, next])?;
        let path = renderer.save_order(&order)?;
        if let Err(e) = tx.commit() {
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        Ok(path)
    }
}
