use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Leading float as accepted by a lenient numeric parser: `-12.5abc` → `-12.5`.
static LEADING_FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?(\d+\.?\d*|\.\d+)").expect("valid float pattern"));

/// Separator conventions used for grouped numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-PH".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

/// Formats `value` with `precision` fraction digits and thousands grouping.
pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let mut body = format!("{:.*}", precision as usize, normalize_zero(value));
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    let (int_part, fraction) = match body.find(locale.decimal_separator) {
        Some(pos) => body.split_at(pos),
        None => (body.as_str(), ""),
    };
    let grouped = match int_part.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits, locale.grouping_separator)),
        None => group_digits(int_part, locale.grouping_separator),
    };
    format!("{}{}", grouped, fraction)
}

/// Grouped rendering with up to three fraction digits and no trailing zeros.
pub fn format_plain_number(locale: &LocaleConfig, value: f64) -> String {
    let rendered = format_number(locale, value, 3);
    if !rendered.contains(locale.decimal_separator) {
        return rendered;
    }
    rendered
        .trim_end_matches('0')
        .trim_end_matches(locale.decimal_separator)
        .to_string()
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Fixed two-decimal rendering without grouping, e.g. `800.00`.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", normalize_zero(value))
}

/// Two-decimal rendering with grouping, e.g. `1,000.00`.
pub fn format_grouped_amount(locale: &LocaleConfig, value: f64) -> String {
    format_number(locale, value, 2)
}

/// Parses the leading float of `text` after dropping everything except digits,
/// `.` and `-`. Returns `None` when nothing numeric remains.
pub fn parse_loose_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    parse_leading_float(&cleaned)
}

/// Parses an amount the way totals read it: only digits and `.` survive, so a
/// minus sign is dropped along with currency symbols and separators.
pub fn parse_unsigned_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    parse_leading_float(&cleaned)
}

/// Parses the numeric prefix of `text`, ignoring whatever follows it.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let found = LEADING_FLOAT.find(text.trim_start())?;
    found
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Sums amounts read with [`parse_unsigned_amount`], counting anything
/// unparsable as zero.
pub fn sum_loose<'a>(values: impl IntoIterator<Item = &'a str>) -> f64 {
    values
        .into_iter()
        .map(|value| parse_unsigned_amount(value).unwrap_or(0.0))
        .sum()
}

/// Currency formatting with a single fixed symbol and locale convention.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormatter {
    symbol: String,
    passthrough_markers: Vec<String>,
    locale: LocaleConfig,
}

impl CurrencyFormatter {
    pub fn new(
        symbol: impl Into<String>,
        passthrough_markers: Vec<String>,
        locale: LocaleConfig,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            passthrough_markers,
            locale,
        }
    }

    pub fn locale(&self) -> &LocaleConfig {
        &self.locale
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Formats a raw cell as currency. Text that already carries a currency
    /// marker is returned as-is; unparsable text is returned unchanged.
    pub fn format(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return "-".to_string();
        }
        if self.has_marker(trimmed) {
            return trimmed.to_string();
        }
        match parse_loose_number(trimmed) {
            Some(value) => self.format_value(value),
            None => trimmed.to_string(),
        }
    }

    /// Formats an already-parsed amount.
    pub fn format_value(&self, value: f64) -> String {
        let body = format_grouped_amount(&self.locale, value.abs());
        if value < 0.0 {
            format!("-{}{}", self.symbol, body)
        } else {
            format!("{}{}", self.symbol, body)
        }
    }

    pub fn has_marker(&self, text: &str) -> bool {
        text.contains(self.symbol.as_str())
            || self
                .passthrough_markers
                .iter()
                .any(|marker| !marker.is_empty() && text.contains(marker.as_str()))
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(
            "₱",
            vec!["$".into(), "₱".into(), "PHP".into()],
            LocaleConfig::default(),
        )
    }
}

/// Parses the calendar date at the start of `text`.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS`, naive ISO timestamps and
/// plain `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Some(stamp.date());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Renders a date as `DD/Mon/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{:02}/{}/{}",
        date.day(),
        month_label(date.month()),
        date.year()
    )
}

/// Formats date text as `DD/Mon/YYYY`, falling back to the original text.
pub fn format_date_text(text: &str) -> String {
    match parse_date(text) {
        Some(date) => format_date(date),
        None => text.to_string(),
    }
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
