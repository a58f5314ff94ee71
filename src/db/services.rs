use crate::db::query::{optional_id, WhereClause};
use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_SERVICE: &str = "INSERT INTO services (description) VALUES (?1)";

const UPDATE_SERVICE: &str = "UPDATE services SET description = ?2 WHERE id = ?1";

const DELETE_SERVICE: &str = "DELETE FROM services WHERE id = ?1";

const SELECT_SERVICE: &str = "SELECT id, description FROM services";

const COUNT_SERVICE_REFERENCES: &str = "SELECT COUNT(*) FROM service_orders WHERE service_id = ?1";

/// Catalog entry for the kind of work performed on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub id: Option<i64>,
    pub description: String,
}

impl Service {
    pub fn new(description: &str) -> Self {
        Service {
            id: None,
            description: description.to_string(),
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Service {
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
pub struct ServiceFilter {
    #[serde(default, deserialize_with = "optional_id")]
    pub code: Option<i64>,
    pub description: Option<String>,
}

impl ServiceFilter {
    fn where_clause(&self) -> WhereClause {
        let mut clause = WhereClause::new();
        clause.eq_opt("id", self.code).like("description", self.description.as_deref());
        clause
    }
}

pub struct Services<'a> {
    conn: &'a Connection,
}

impl<'a> Services<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Services { conn }
    }

    pub fn create(&self, service: &Service) -> AppResult<i64> {
        let description = service.validate()?;
        self.conn.execute(INSERT_SERVICE, params![description])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&self, id: i64, service: &Service) -> AppResult<()> {
        let description = service.validate()?;
        let affected = self.conn.execute(UPDATE_SERVICE, params![id, description])?;

        if affected == 0 {
            return Err(AppError::NotFound(Message::RecordNotFound(Entity::Service, id)));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id)?;
        if !self.can_delete(id)? {
            return Err(AppError::Conflict(Message::RecordInUse(Entity::Service, id)));
        }
        self.conn.execute(DELETE_SERVICE, params![id])?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> AppResult<Service> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_SERVICE), params![id], Service::from_row)
            .optional()?
            .ok_or(AppError::NotFound(Message::RecordNotFound(Entity::Service, id)))
    }

    pub fn list(&self, filter: &ServiceFilter, pagination: Pagination) -> AppResult<Paged<Service>> {
        let clause = filter.where_clause();
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM services{}", clause.sql()),
            params_from_iter(clause.params()),
            |row| row.get(0),
        )?;
        let page = pagination.resolve(total);

        let mut stmt = self.conn.prepare(&format!("{}{} ORDER BY description LIMIT ? OFFSET ?", SELECT_SERVICE, clause.sql()))?;
        let items = stmt
            .query_map(params_from_iter(clause.params_with_page(page.per_page, page.offset)), Service::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged { items, page })
    }

    pub fn all(&self) -> AppResult<Vec<Service>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY description", SELECT_SERVICE))?;
        let items = stmt.query_map([], Service::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// False while a service order refers to the service.
    pub fn can_delete(&self, id: i64) -> AppResult<bool> {
        let references: i64 = self.conn.query_row(COUNT_SERVICE_REFERENCES, params![id], |row| row.get(0))?;
        Ok(references == 0)
    }
}
