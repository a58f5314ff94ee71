//! Two-valued status codes stored as `S`/`N`.
//!
//! [`SentStatus`] is the lifecycle of a service order: it starts `Pending`,
//! moves to `Sent` through [`SentStatus::send`] and never leaves that state.
//! Every mutating order operation calls [`SentStatus::ensure_mutable`] first.
//!
//! [`Flag`] is the plain yes/no marker used for invoicing and collection.

use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::Message;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentStatus {
    #[default]
    #[serde(rename = "N")]
    Pending,
    #[serde(rename = "S")]
    Sent,
}

impl SentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            SentStatus::Pending => "N",
            SentStatus::Sent => "S",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(SentStatus::Pending),
            "S" => Some(SentStatus::Sent),
            _ => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, SentStatus::Sent)
    }

    /// Fails with [`AppError::Locked`] once the order has been sent.
    pub fn ensure_mutable(&self, order_id: i64) -> AppResult<()> {
        match self {
            SentStatus::Pending => Ok(()),
            SentStatus::Sent => Err(AppError::Locked(Message::OrderLocked(order_id))),
        }
    }

    /// The only transition: `Pending -> Sent`.
    pub fn send(self, order_id: i64) -> AppResult<SentStatus> {
        match self {
            SentStatus::Pending => Ok(SentStatus::Sent),
            SentStatus::Sent => Err(AppError::Locked(Message::OrderAlreadySent(order_id))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    #[serde(rename = "S")]
    Yes,
    #[default]
    #[serde(rename = "N")]
    No,
}

impl Flag {
    pub fn code(&self) -> &'static str {
        match self {
            Flag::Yes => "S",
            Flag::No => "N",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Flag::Yes),
            "N" => Some(Flag::No),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Flag::Yes)
    }

    /// Label printed on reports.
    pub fn label(&self) -> &'static str {
        match self {
            Flag::Yes => "Sim",
            Flag::No => "Não",
        }
    }
}

impl fmt::Display for SentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Flag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flag::from_code(s.trim()).ok_or_else(|| AppError::Validation(Message::InvalidFlag(s.to_string())))
    }
}

impl FromStr for SentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SentStatus::from_code(s.trim()).ok_or_else(|| AppError::Validation(Message::InvalidFlag(s.to_string())))
    }
}

impl ToSql for SentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for SentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        SentStatus::from_code(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

impl ToSql for Flag {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Flag {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Flag::from_code(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}
