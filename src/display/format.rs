use once_cell::sync::Lazy;
use regex::Regex;

use super::field_type::contains_any;
use super::model::{DisplayColumn, FieldType, Tone};
use crate::currency::{
    format_date_text, format_plain_number, parse_leading_float, sum_loose, CurrencyFormatter,
};
use crate::form::{Row, Scalar};

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid camel-case pattern"));

/// Identifier-like terms that disqualify a column from totals.
pub const EXCLUDED_TOTAL_TERMS: &[&str] = &[
    "id", "number", "num", "code", "reference", "ref", "index", "sequence", "seq", "order",
];

/// Renders typed values as display strings. Never fails: anything it cannot
/// interpret comes back as the original text.
#[derive(Debug, Clone, Default)]
pub struct CellFormatter {
    currency: CurrencyFormatter,
}

impl CellFormatter {
    pub fn new(currency: CurrencyFormatter) -> Self {
        Self { currency }
    }

    pub fn currency(&self) -> &CurrencyFormatter {
        &self.currency
    }

    pub fn format_cell(&self, value: &Scalar, field_type: FieldType) -> String {
        if value.is_blank() {
            return "-".to_string();
        }
        match field_type {
            FieldType::Date => format_date_text(&value.to_text()),
            FieldType::Currency => self.format_currency(value),
            FieldType::Boolean => {
                if value.is_truthy() {
                    "Yes".to_string()
                } else {
                    "No".to_string()
                }
            }
            FieldType::Number => self.format_number(value),
            FieldType::Text | FieldType::Email | FieldType::Url => value.to_text(),
        }
    }

    /// Same as [`Self::format_cell`] for a missing cell: renders `-`.
    pub fn format_optional(&self, value: Option<&Scalar>, field_type: FieldType) -> String {
        match value {
            Some(value) => self.format_cell(value, field_type),
            None => "-".to_string(),
        }
    }

    pub fn format_currency(&self, value: &Scalar) -> String {
        match value {
            Scalar::Null => "-".to_string(),
            Scalar::Number(number) => self.currency.format_value(*number),
            other => self.currency.format(&other.to_text()),
        }
    }

    fn format_number(&self, value: &Scalar) -> String {
        let parsed = match value {
            Scalar::Number(number) => Some(*number),
            other => parse_leading_float(&other.to_text()),
        };
        match parsed {
            Some(number) => format_plain_number(self.currency.locale(), number),
            None => value.to_text(),
        }
    }

    /// Sums `key` across `rows` and formats the result as currency. Missing or
    /// unparsable cells count as zero.
    pub fn sum_column(&self, rows: &[Row], key: &str) -> String {
        self.currency.format_value(column_total(rows, key))
    }
}

/// Numeric total of `key` across `rows`.
pub fn column_total(rows: &[Row], key: &str) -> f64 {
    let texts: Vec<String> = rows
        .iter()
        .map(|row| row.get(key).map(Scalar::to_text).unwrap_or_default())
        .collect();
    sum_loose(texts.iter().map(String::as_str))
}

/// Whether a column may show a total: currency typed, and neither its key nor
/// its label looks like an identifier.
pub fn is_total_eligible(column: &DisplayColumn) -> bool {
    if column.field_type != FieldType::Currency {
        return false;
    }
    let key = column.key.to_lowercase();
    let label = column.label.to_lowercase();
    !EXCLUDED_TOTAL_TERMS
        .iter()
        .any(|term| key.contains(term) || label.contains(term))
}

/// `totalPettyCash` → `Total Petty Cash`, `leave_type` → `Leave Type`.
pub fn format_field_name(field_name: &str) -> String {
    let spaced = CAMEL_BOUNDARY.replace_all(field_name, "$1 $2");
    let spaced = spaced.replace(['_', '-'], " ");

    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.chars() {
        let is_word = ch.is_alphanumeric() || ch == '_';
        if is_word && at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !is_word;
    }
    out
}

/// Keys whose values are shown as badges rather than plain fields.
pub fn is_badge_key(key: &str) -> bool {
    contains_any(
        &key.to_lowercase(),
        &["status", "type", "category", "priority", "urgency"],
    )
}

/// Tone for a badge value such as a status or priority.
pub fn badge_tone(value: &str) -> Tone {
    match value.to_lowercase().as_str() {
        "urgent" | "high" | "critical" | "rejected" | "cancelled" => Tone::Danger,
        "medium" | "normal" | "pending" | "review" => Tone::Warning,
        "low" | "minor" | "approved" | "active" | "completed" => Tone::Success,
        _ => Tone::Primary,
    }
}
