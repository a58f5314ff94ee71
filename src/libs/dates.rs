//! Conversion between the user-facing `DD/MM/YYYY` form and the storage form
//! `YYYY-MM-DD`.
//!
//! Both conversions are plain text transforms guarded by a format check.
//! Input that does not match the expected shape is returned unchanged.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

pub const USER_DATE_FORMAT: &str = "%d/%m/%Y";
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const USER_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Shape of a `DD/MM/YYYY` date; captures day, month and year.
pub static USER_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").unwrap());
static STORAGE_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());

/// `DD/MM/YYYY` to `YYYY-MM-DD`.
pub fn to_storage_date(date: &str) -> String {
    match USER_DATE.captures(date) {
        Some(caps) => format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]),
        None => date.to_string(),
    }
}

/// `YYYY-MM-DD` to `DD/MM/YYYY`.
pub fn to_user_date(date: &str) -> String {
    match STORAGE_DATE.captures(date) {
        Some(caps) => format!("{}/{}/{}", &caps[3], &caps[2], &caps[1]),
        None => date.to_string(),
    }
}

/// Reads a calendar date given in either text form.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, STORAGE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(date, USER_DATE_FORMAT))
        .ok()
}
