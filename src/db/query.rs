//! Builds parameterized `WHERE` clauses from optional filter fields.
//!
//! Blank text and `None` values add no condition, so a filter struct can be
//! passed through as-is. Placeholders are positional (`?`); callers append
//! their own trailing parameters (limit, offset) after [`WhereClause::params`].

use crate::libs::error::AppResult;
use rusqlite::types::Value;
use rusqlite::{params, Connection};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdParam {
    Number(i64),
    Text(String),
}

/// Reads an optional id from either a number or text; blank text is `None`.
///
/// Query strings deliver every value as text and forms often submit empty
/// fields, so filter ids go through this instead of plain `Option<i64>`.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdParam>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdParam::Number(id)) => Ok(Some(id)),
        Some(IdParam::Text(text)) => match text.trim() {
            "" => Ok(None),
            t => t.parse().map(Some).map_err(serde::de::Error::custom),
        },
    }
}

/// True when `table` has a row with primary key `id`.
///
/// `table` must be a literal table name, never user input.
pub fn exists(conn: &Connection, table: &str, id: i64) -> AppResult<bool> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {} WHERE id = ?1", table), params![id], |row| row.get(0))?;
    Ok(count > 0)
}

#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq<V: Into<Value>>(&mut self, column: &str, value: V) -> &mut Self {
        self.conditions.push(format!("{} = ?", column));
        self.params.push(value.into());
        self
    }

    pub fn eq_opt<V: Into<Value>>(&mut self, column: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.eq(column, value);
        }
        self
    }

    pub fn eq_text(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = non_blank(value) {
            self.eq(column, value.to_string());
        }
        self
    }

    pub fn like(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = non_blank(value) {
            self.conditions.push(format!("{} LIKE ?", column));
            self.params.push(Value::Text(format!("%{}%", value)));
        }
        self
    }

    pub fn gte(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = non_blank(value) {
            self.conditions.push(format!("{} >= ?", column));
            self.params.push(Value::Text(value.to_string()));
        }
        self
    }

    pub fn lte(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = non_blank(value) {
            self.conditions.push(format!("{} <= ?", column));
            self.params.push(Value::Text(value.to_string()));
        }
        self
    }

    /// Adds a literal condition without parameters.
    pub fn raw(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// ` WHERE 1=1 AND ...`, ready to append after a `FROM` clause.
    pub fn sql(&self) -> String {
        let mut sql = String::from(" WHERE 1=1");
        for condition in &self.conditions {
            sql.push_str(" AND ");
            sql.push_str(condition);
        }
        sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameters followed by `LIMIT ? OFFSET ?` values.
    pub fn params_with_page(&self, limit: i64, offset: i64) -> Vec<Value> {
        let mut params = self.params.clone();
        params.push(Value::Integer(limit));
        params.push(Value::Integer(offset));
        params
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
