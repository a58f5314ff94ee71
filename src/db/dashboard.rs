use crate::libs::dates::STORAGE_DATE_FORMAT;
use crate::libs::error::AppResult;
use chrono::{Datelike, Local, Months, NaiveDate};
use rusqlite::{params, Connection};
use serde::Serialize;

const COUNT_CLIENTS: &str = "SELECT COUNT(*) FROM clients";

const COUNT_ORDERS_BETWEEN: &str = "SELECT COUNT(*) FROM service_orders WHERE date >= ?1 AND date < ?2";

const COUNT_PENDING_ORDERS: &str = "SELECT COUNT(*) FROM service_orders WHERE sent = 'N'";

const COUNT_NOT_INVOICED: &str = "SELECT COUNT(*) FROM order_relations WHERE invoiced = 'N'";

const COUNT_NOT_COLLECTED: &str = "SELECT COUNT(*) FROM order_relations WHERE collected = 'N'";

const MONTHS_SHOWN: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// `MM/YYYY`.
    pub month: String,
    pub orders: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub orders_this_month: i64,
    pub pending_orders: i64,
    pub not_invoiced: i64,
    pub not_collected: i64,
    /// Oldest month first, ending with the current one.
    pub monthly_orders: Vec<MonthCount>,
}

pub struct Dashboard<'a> {
    conn: &'a Connection,
}

impl<'a> Dashboard<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Dashboard { conn }
    }

    pub fn stats(&self) -> AppResult<DashboardStats> {
        self.stats_at(Local::now().date_naive())
    }

    /// Figures as seen on `today`.
    pub fn stats_at(&self, today: NaiveDate) -> AppResult<DashboardStats> {
        let current = first_of_month(today);

        let mut monthly_orders = Vec::with_capacity(MONTHS_SHOWN as usize);
        for back in (0..MONTHS_SHOWN).rev() {
            let start = current - Months::new(back);
            monthly_orders.push(MonthCount {
                month: start.format("%m/%Y").to_string(),
                orders: self.orders_between(start, start + Months::new(1))?,
            });
        }

        Ok(DashboardStats {
            total_clients: self.count(COUNT_CLIENTS)?,
            orders_this_month: self.orders_between(current, current + Months::new(1))?,
            pending_orders: self.count(COUNT_PENDING_ORDERS)?,
            not_invoiced: self.count(COUNT_NOT_INVOICED)?,
            not_collected: self.count(COUNT_NOT_COLLECTED)?,
            monthly_orders,
        })
    }

    fn count(&self, sql: &str) -> AppResult<i64> {
        Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
    }

    fn orders_between(&self, from: NaiveDate, until: NaiveDate) -> AppResult<i64> {
        Ok(self.conn.query_row(
            COUNT_ORDERS_BETWEEN,
            params![from.format(STORAGE_DATE_FORMAT).to_string(), until.format(STORAGE_DATE_FORMAT).to_string()],
            |row| row.get(0),
        )?)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.day0()))
}
