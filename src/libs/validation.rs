//! Format checks and display formatters for Brazilian business data.
//!
//! Every `validate_*` helper returns a plain `bool`; callers decide whether a
//! failed check rejects the input. Formatters return the input digits
//! unchanged when the length does not fit the mask.

use crate::libs::dates::USER_DATE;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

pub const STATE_CODES: [&str; 27] = [
    "AC", "AL", "AM", "AP", "BA", "CE", "DF", "ES", "GO", "MA", "MG", "MS", "MT", "PA", "PB", "PE", "PI", "PR", "RJ", "RN", "RO",
    "RR", "RS", "SC", "SE", "SP", "TO",
];

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").unwrap());
static CLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2})$").unwrap());
static SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{2,6}):(\d{2})$").unwrap());

/// Trimmed text, or `None` when blank.
pub fn blank_to_none(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Strips everything but ASCII digits.
pub fn only_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn digits_of(text: &str) -> Vec<u32> {
    text.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_equal(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// CPF: 11 digits with two mod-11 check digits. Punctuation is ignored.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits = digits_of(cpf);
    if digits.len() != 11 || all_equal(&digits) {
        return false;
    }

    let first = check_digit(&digits[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&digits[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);

    digits[9] == first && digits[10] == second
}

/// CNPJ: 14 digits with two weighted mod-11 check digits.
pub fn validate_cnpj(cnpj: &str) -> bool {
    let digits = digits_of(cnpj);
    if digits.len() != 14 || all_equal(&digits) {
        return false;
    }

    let first = check_digit(&digits[..12], &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&digits[..13], &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);

    digits[12] == first && digits[13] == second
}

pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// `DD/MM/YYYY` naming a real calendar day.
pub fn validate_date(date: &str) -> bool {
    let Some(caps) = USER_DATE.captures(date) else {
        return false;
    };
    let (Ok(day), Ok(month), Ok(year)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>(), caps[3].parse::<i32>()) else {
        return false;
    };
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Wall-clock `HH:MM` with hour 0-23 and minute 0-59.
pub fn validate_time(time: &str) -> bool {
    match CLOCK.captures(time) {
        Some(caps) => {
            let hour: u32 = caps[1].parse().unwrap_or(99);
            let minute: u32 = caps[2].parse().unwrap_or(99);
            hour <= 23 && minute <= 59
        }
        None => false,
    }
}

/// Elapsed `HH:MM`; hours may exceed 23.
pub fn validate_duration(duration: &str) -> bool {
    match SPAN.captures(duration) {
        Some(caps) => caps[2].parse::<u32>().map(|m| m <= 59).unwrap_or(false),
        None => false,
    }
}

pub fn validate_phone(phone: &str) -> bool {
    let len = only_digits(phone).len();
    (10..=11).contains(&len)
}

pub fn validate_cep(cep: &str) -> bool {
    only_digits(cep).len() == 8
}

pub fn validate_uf(uf: &str) -> bool {
    STATE_CODES.contains(&uf.trim().to_uppercase().as_str())
}

pub fn format_cpf(cpf: &str) -> String {
    let d = only_digits(cpf);
    if d.len() != 11 {
        return d;
    }
    format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
}

pub fn format_cnpj(cnpj: &str) -> String {
    let d = only_digits(cnpj);
    if d.len() != 14 {
        return d;
    }
    format!("{}.{}.{}/{}-{}", &d[0..2], &d[2..5], &d[5..8], &d[8..12], &d[12..14])
}

/// Picks the CPF or CNPJ mask by digit count.
pub fn format_document(document: &str) -> String {
    match only_digits(document).len() {
        11 => format_cpf(document),
        14 => format_cnpj(document),
        _ => document.to_string(),
    }
}

pub fn format_phone(phone: &str) -> String {
    let d = only_digits(phone);
    match d.len() {
        11 => format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..11]),
        10 => format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..10]),
        _ => d,
    }
}

pub fn format_cep(cep: &str) -> String {
    let d = only_digits(cep);
    if d.len() != 8 {
        return d;
    }
    format!("{}-{}", &d[0..5], &d[5..8])
}

/// `R$ 1.234,56`: dot thousands separator, comma decimals.
pub fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();

    let units = (cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, c) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("R$ {}{},{:02}", sign, grouped, cents % 100)
}
