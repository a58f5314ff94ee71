use crate::db::query::{optional_id, WhereClause};
use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use crate::libs::validation::{blank_to_none, only_digits, validate_email, validate_phone};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_CONSULTANT: &str = "INSERT INTO consultants (name, phone, email, expertise, hourly_rate) VALUES (?1, ?2, ?3, ?4, ?5)";

const UPDATE_CONSULTANT: &str = "UPDATE consultants SET name = ?2, phone = ?3, email = ?4, expertise = ?5, hourly_rate = ?6 WHERE id = ?1";

const DELETE_CONSULTANT: &str = "DELETE FROM consultants WHERE id = ?1";

const SELECT_CONSULTANT: &str = "SELECT id, name, phone, email, expertise, hourly_rate FROM consultants";

const COUNT_CONSULTANT_ORDERS: &str = "SELECT COUNT(*) FROM service_orders WHERE consultant_id = ?1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Consultant {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Area of practice.
    #[serde(default)]
    pub expertise: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
}

impl Consultant {
    pub fn new(name: &str) -> Self {
        Consultant {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Consultant {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            email: row.get(3)?,
            expertise: row.get(4)?,
            hourly_rate: row.get(5)?,
        })
    }

    /// Trims text fields, drops blanks and checks formats.
    fn normalized(&self) -> AppResult<Consultant> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(Message::FieldRequired("name")));
        }

        let phone = blank_to_none(self.phone.as_deref()).map(|p| only_digits(&p));
        if let Some(phone) = &phone {
            if !validate_phone(phone) {
                return Err(AppError::Validation(Message::InvalidField("phone", phone.clone())));
            }
        }

        let email = blank_to_none(self.email.as_deref());
        if let Some(email) = &email {
            if !validate_email(email) {
                return Err(AppError::Validation(Message::InvalidField("email", email.clone())));
            }
        }

        Ok(Consultant {
            id: self.id,
            name: name.to_string(),
            phone,
            email,
            expertise: blank_to_none(self.expertise.as_deref()),
            hourly_rate: self.hourly_rate,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultantFilter {
    #[serde(default, deserialize_with = "optional_id")]
    pub code: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub expertise: Option<String>,
}

impl ConsultantFilter {
    fn where_clause(&self) -> WhereClause {
        let mut clause = WhereClause::new();
        clause
            .eq_opt("id", self.code)
            .like("name", self.name.as_deref())
            .like("email", self.email.as_deref())
            .like("expertise", self.expertise.as_deref());
        clause
    }
}

pub struct Consultants<'a> {
    conn: &'a Connection,
}

impl<'a> Consultants<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Consultants { conn }
    }

    pub fn create(&self, consultant: &Consultant) -> AppResult<i64> {
        let c = consultant.normalized()?;
        self.conn
            .execute(INSERT_CONSULTANT, params![c.name, c.phone, c.email, c.expertise, c.hourly_rate])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&self, id: i64, consultant: &Consultant) -> AppResult<()> {
        let c = consultant.normalized()?;
        let affected = self
            .conn
            .execute(UPDATE_CONSULTANT, params![id, c.name, c.phone, c.email, c.expertise, c.hourly_rate])?;

        if affected == 0 {
            return Err(AppError::NotFound(Message::RecordNotFound(Entity::Consultant, id)));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id)?;
        if !self.can_delete(id)? {
            return Err(AppError::Conflict(Message::RecordInUse(Entity::Consultant, id)));
        }
        self.conn.execute(DELETE_CONSULTANT, params![id])?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> AppResult<Consultant> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_CONSULTANT), params![id], Consultant::from_row)
            .optional()?
            .ok_or(AppError::NotFound(Message::RecordNotFound(Entity::Consultant, id)))
    }

    pub fn list(&self, filter: &ConsultantFilter, pagination: Pagination) -> AppResult<Paged<Consultant>> {
        let clause = filter.where_clause();
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM consultants{}", clause.sql()),
            params_from_iter(clause.params()),
            |row| row.get(0),
        )?;
        let page = pagination.resolve(total);

        let mut stmt = self
            .conn
            .prepare(&format!("{}{} ORDER BY name LIMIT ? OFFSET ?", SELECT_CONSULTANT, clause.sql()))?;
        let items = stmt
            .query_map(params_from_iter(clause.params_with_page(page.per_page, page.offset)), Consultant::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged { items, page })
    }

    pub fn all(&self) -> AppResult<Vec<Consultant>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY name", SELECT_CONSULTANT))?;
        let items = stmt.query_map([], Consultant::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn can_delete(&self, id: i64) -> AppResult<bool> {
        let orders: i64 = self.conn.query_row(COUNT_CONSULTANT_ORDERS, params![id], |row| row.get(0))?;
        Ok(orders == 0)
    }
}
