use once_cell::sync::Lazy;
use regex::Regex;

use super::model::FieldType;
use crate::form::Scalar;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid date pattern"));
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("valid url pattern"));
static CURRENCY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$?\d+(\.\d{2})?$|^\d{1,3}(,\d{3})*(\.\d{2})?$")
        .expect("valid currency pattern")
});

/// Field-name fragments marking identifiers. Checked before anything else so
/// that numeric ids never read as money.
pub const ID_KEYWORDS: &[&str] = &["id", "number", "code", "ref", "index", "sequence", "order"];

/// Field-name fragments that allow a numeric-looking string to be currency.
pub const CURRENCY_KEYWORDS: &[&str] = &[
    "amount", "price", "cost", "total", "sum", "cash", "money", "fee", "charge",
];

/// Classifies a scalar by its value and, optionally, the key it was found under.
pub fn detect_type(value: &Scalar, field_name: Option<&str>) -> FieldType {
    if value.is_null() {
        return FieldType::Text;
    }

    let lower_name = field_name.map(str::to_lowercase);
    if let Some(name) = lower_name.as_deref() {
        if contains_any(name, ID_KEYWORDS) {
            return match value {
                Scalar::Number(_) => FieldType::Number,
                _ => FieldType::Text,
            };
        }
    }

    match value {
        Scalar::Number(_) => FieldType::Number,
        Scalar::Bool(_) => FieldType::Boolean,
        Scalar::Text(text) => detect_text_type(text.trim(), lower_name.as_deref()),
        Scalar::Null => FieldType::Text,
    }
}

fn detect_text_type(text: &str, lower_name: Option<&str>) -> FieldType {
    if DATE_PATTERN.is_match(text) {
        FieldType::Date
    } else if EMAIL_PATTERN.is_match(text) {
        FieldType::Email
    } else if URL_PATTERN.is_match(text) {
        FieldType::Url
    } else if CURRENCY_PATTERN.is_match(text)
        && lower_name.is_some_and(|name| contains_any(name, CURRENCY_KEYWORDS))
    {
        FieldType::Currency
    } else {
        FieldType::Text
    }
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
