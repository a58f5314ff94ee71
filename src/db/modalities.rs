use crate::db::query::{optional_id, WhereClause};
use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_MODALITY: &str = "INSERT INTO modalities (description) VALUES (?1)";

const UPDATE_MODALITY: &str = "UPDATE modalities SET description = ?2 WHERE id = ?1";

const DELETE_MODALITY: &str = "DELETE FROM modalities WHERE id = ?1";

const SELECT_MODALITY: &str = "SELECT id, description FROM modalities";

const COUNT_MODALITY_REFERENCES: &str = "SELECT
    (SELECT COUNT(*) FROM clients WHERE modality_id = ?1) +
    (SELECT COUNT(*) FROM service_orders WHERE modality_id = ?1)";

/// Service arrangement a client is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modality {
    #[serde(default)]
    pub id: Option<i64>,
    pub description: String,
}

impl Modality {
    pub fn new(description: &str) -> Self {
        Modality {
            id: None,
            description: description.to_string(),
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Modality {
            id: row.get(0)?,
            description: row.get(1)?,
        })
    }

    fn validate(&self) -> AppResult<String> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(AppError::Validation(Message::FieldRequired("description")));
        }
        Ok(description.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModalityFilter {
    #[serde(default, deserialize_with = "optional_id")]
    pub code: Option<i64>,
    pub description: Option<String>,
}

impl ModalityFilter {
    fn where_clause(&self) -> WhereClause {
        let mut clause = WhereClause::new();
        clause.eq_opt("id", self.code).like("description", self.description.as_deref());
        clause
    }
}

pub struct Modalities<'a> {
    conn: &'a Connection,
}

impl<'a> Modalities<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Modalities { conn }
    }

    pub fn create(&self, modality: &Modality) -> AppResult<i64> {
        let description = modality.validate()?;
        self.conn.execute(INSERT_MODALITY, params![description])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&self, id: i64, modality: &Modality) -> AppResult<()> {
        let description = modality.validate()?;
        let affected = self.conn.execute(UPDATE_MODALITY, params![id, description])?;

        if affected == 0 {
            return Err(AppError::NotFound(Message::RecordNotFound(Entity::Modality, id)));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id)?;
        if !self.can_delete(id)? {
            return Err(AppError::Conflict(Message::RecordInUse(Entity::Modality, id)));
        }
        self.conn.execute(DELETE_MODALITY, params![id])?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> AppResult<Modality> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_MODALITY), params![id], Modality::from_row)
            .optional()?
            .ok_or(AppError::NotFound(Message::RecordNotFound(Entity::Modality, id)))
    }

    pub fn list(&self, filter: &ModalityFilter, pagination: Pagination) -> AppResult<Paged<Modality>> {
        let clause = filter.where_clause();
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM modalities{}", clause.sql()),
            params_from_iter(clause.params()),
            |row| row.get(0),
        )?;
        let page = pagination.resolve(total);

        let mut stmt = self.conn.prepare(&format!("{}{} ORDER BY description LIMIT ? OFFSET ?", SELECT_MODALITY, clause.sql()))?;
        let items = stmt
            .query_map(params_from_iter(clause.params_with_page(page.per_page, page.offset)), Modality::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged { items, page })
    }

    /// Every modality, for pickers.
    pub fn all(&self) -> AppResult<Vec<Modality>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY description", SELECT_MODALITY))?;
        let items = stmt.query_map([], Modality::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// False while a client or a service order refers to the modality.
    pub fn can_delete(&self, id: i64) -> AppResult<bool> {
        let references: i64 = self.conn.query_row(COUNT_MODALITY_REFERENCES, params![id], |row| row.get(0))?;
        Ok(references == 0)
    }
}
