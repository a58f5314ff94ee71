//! Order relations: one mirror row per service order, kept in step with the
//! order by schema triggers.
//!
//! The row carries the invoiced and collected flags, which stay editable after
//! the order is sent. [`RelationQuery`] implements [`RelationSource`] so the
//! statistics aggregator can read a filtered selection metric by metric.

use crate::db::clients::Clients;
use crate::db::query::{optional_id, WhereClause};
use crate::libs::dates::{to_storage_date, to_user_date};
use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use crate::libs::statistics::{RelationRecord, RelationSource, Segment, StatisticsSummary};
use crate::libs::status::{Flag, SentStatus};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const SELECT_RELATION: &str = "SELECT r.order_id, r.date, r.client_id, c.legal_name, m.description, s.description,
    k.name, r.total_time, r.invoiced, r.collected, o.sent
    FROM order_relations r
    JOIN service_orders o ON o.id = r.order_id
    LEFT JOIN clients c ON c.id = r.client_id
    LEFT JOIN modalities m ON m.id = o.modality_id
    LEFT JOIN services s ON s.id = o.service_id
    LEFT JOIN consultants k ON k.id = o.consultant_id";

const SELECT_RECORDS: &str = "SELECT r.client_id, c.legal_name, r.total_time, r.invoiced, r.collected
    FROM order_relations r
    LEFT JOIN clients c ON c.id = r.client_id";

const UPDATE_INVOICED: &str = "UPDATE order_relations SET invoiced = ?2 WHERE order_id = ?1";

const UPDATE_COLLECTED: &str = "UPDATE order_relations SET collected = ?2 WHERE order_id = ?1";

/// One listing row: the relation plus the labels of its order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationRow {
    pub number: i64,
    /// `DD/MM/YYYY`.
    pub date: String,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub modality_description: Option<String>,
    pub service_description: Option<String>,
    pub consultant_name: Option<String>,
    pub total_time: Option<String>,
    pub invoiced: Flag,
    pub collected: Flag,
    pub sent: SentStatus,
}

impl RelationRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let date: String = row.get(1)?;
        Ok(RelationRow {
            number: row.get(0)?,
            date: to_user_date(&date),
            client_id: row.get(2)?,
            client_name: row.get(3)?,
            modality_description: row.get(4)?,
            service_description: row.get(5)?,
            consultant_name: row.get(6)?,
            total_time: row.get(7)?,
            invoiced: row.get(8)?,
            collected: row.get(9)?,
            sent: row.get(10)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationFilter {
    #[serde(default, deserialize_with = "optional_id")]
    pub number: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub client: Option<i64>,
    /// Applied only when `S` or `N`.
    pub invoiced: Option<String>,
    /// Applied only when `S` or `N`.
    pub collected: Option<String>,
}

fn flag_of(value: Option<&str>) -> Option<Flag> {
    value.and_then(|v| Flag::from_code(&v.trim().to_uppercase()))
}

impl RelationFilter {
    fn where_clause(&self) -> WhereClause {
        let date_from = self.date_from.as_deref().map(|d| to_storage_date(d.trim()));
        let date_to = self.date_to.as_deref().map(|d| to_storage_date(d.trim()));
        let invoiced = flag_of(self.invoiced.as_deref());
        let collected = flag_of(self.collected.as_deref());

        let mut clause = WhereClause::new();
        clause
            .eq_opt("r.order_id", self.number)
            .gte("r.date", date_from.as_deref())
            .lte("r.date", date_to.as_deref())
            .eq_opt("r.client_id", self.client)
            .eq_text("r.invoiced", invoiced.as_ref().map(Flag::code))
            .eq_text("r.collected", collected.as_ref().map(Flag::code));
        clause
    }

    /// True when no field narrows the selection.
    pub fn is_empty(&self) -> bool {
        self.where_clause().params().is_empty()
    }
}

/// The filter as applied, with the client's name resolved for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppliedFilters {
    #[serde(flatten)]
    pub filter: RelationFilter,
    pub client_name: Option<String>,
}

/// A page of relations with statistics over every row the filter matches.
#[derive(Debug, Clone, Serialize)]
pub struct RelationList {
    #[serde(flatten)]
    pub rows: Paged<RelationRow>,
    pub statistics: StatisticsSummary,
    pub filters: AppliedFilters,
}

/// Store-backed [`RelationSource`] for one filter.
pub struct RelationQuery<'a> {
    conn: &'a Connection,
    clause: WhereClause,
}

impl<'a> RelationQuery<'a> {
    pub fn new(conn: &'a Connection, filter: &RelationFilter) -> Self {
        RelationQuery {
            conn,
            clause: filter.where_clause(),
        }
    }
}

impl RelationSource for RelationQuery<'_> {
    fn count(&self, segment: Segment) -> AppResult<i64> {
        let mut clause = self.clause.clone();
        match segment {
            Segment::All => {}
            Segment::Invoiced => {
                clause.raw("r.invoiced = 'S'");
            }
            Segment::Collected => {
                clause.raw("r.collected = 'S'");
            }
        }

        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM order_relations r{}", clause.sql()),
            params_from_iter(clause.params()),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn records(&self) -> AppResult<Vec<RelationRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{}{} ORDER BY r.order_id", SELECT_RECORDS, self.clause.sql()))?;
        let records = stmt
            .query_map(params_from_iter(self.clause.params()), |row| {
                Ok(RelationRecord {
                    client_id: row.get(0)?,
                    client_name: row.get(1)?,
                    total_time: row.get(2)?,
                    invoiced: row.get(3)?,
                    collected: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

pub struct Relations<'a> {
    conn: &'a Connection,
}

impl<'a> Relations<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Relations { conn }
    }

    pub fn list(&self, filter: &RelationFilter, pagination: Pagination) -> AppResult<RelationList> {
        let clause = filter.where_clause();
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM order_relations r{}", clause.sql()),
            params_from_iter(clause.params()),
            |row| row.get(0),
        )?;
        let page = pagination.resolve(total);

        let mut stmt = self
            .conn
            .prepare(&format!("{}{} ORDER BY r.order_id DESC LIMIT ? OFFSET ?", SELECT_RELATION, clause.sql()))?;
        let items = stmt
            .query_map(params_from_iter(clause.params_with_page(page.per_page, page.offset)), RelationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RelationList {
            rows: Paged { items, page },
            statistics: self.statistics(filter),
            filters: self.applied(filter)?,
        })
    }

    /// Every matching row, newest first.
    pub fn all(&self, filter: &RelationFilter) -> AppResult<Vec<RelationRow>> {
        let clause = filter.where_clause();
        let mut stmt = self
            .conn
            .prepare(&format!("{}{} ORDER BY r.order_id DESC", SELECT_RELATION, clause.sql()))?;
        let items = stmt
            .query_map(params_from_iter(clause.params()), RelationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn get(&self, id: i64) -> AppResult<RelationRow> {
        self.conn
            .query_row(&format!("{} WHERE r.order_id = ?1", SELECT_RELATION), params![id], RelationRow::from_row)
            .optional()?
            .ok_or(AppError::NotFound(Message::RecordNotFound(Entity::Relation, id)))
    }

    pub fn statistics(&self, filter: &RelationFilter) -> StatisticsSummary {
        StatisticsSummary::aggregate(&RelationQuery::new(self.conn, filter))
    }

    pub fn applied(&self, filter: &RelationFilter) -> AppResult<AppliedFilters> {
        let client_name = match filter.client {
            Some(id) => Clients::new(self.conn).name(id)?,
            None => None,
        };
        Ok(AppliedFilters {
            filter: filter.clone(),
            client_name,
        })
    }

    /// Sets the invoiced flag. Sent orders are not locked against this.
    pub fn set_invoiced(&self, id: i64, flag: Flag) -> AppResult<()> {
        self.set_flag(UPDATE_INVOICED, id, flag)
    }

    /// Sets the collected flag. Sent orders are not locked against this.
    pub fn set_collected(&self, id: i64, flag: Flag) -> AppResult<()> {
        self.set_flag(UPDATE_COLLECTED, id, flag)
    }

    fn set_flag(&self, sql: &str, id: i64, flag: Flag) -> AppResult<()> {
        let affected = self.conn.execute(sql, params![id, flag])?;
        if affected == 0 {
            return Err(AppError::NotFound(Message::RecordNotFound(Entity::Relation, id)));
        }
        Ok(())
    }
}
