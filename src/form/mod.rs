//! Typed view over arbitrary form-submission JSON.
//!
//! Upstream services attach free-form JSON to workflow tasks. Rather than
//! duck-typing that payload everywhere, it is checked once at the boundary and
//! turned into a [`FormSubmission`]: an ordered list of fields whose values are
//! either scalars, sequences of row objects, or an explicitly unrecognised shape.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// A single JSON leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Converts a JSON value, flattening nested arrays and objects to their
    /// compact JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(flag) => Scalar::Bool(*flag),
            Value::Number(number) => number
                .as_f64()
                .map(Scalar::Number)
                .unwrap_or_else(|| Scalar::Text(number.to_string())),
            Value::String(text) => Scalar::Text(text.clone()),
            Value::Array(_) | Value::Object(_) => Scalar::Text(value.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Whether the value renders as nothing (`null` or blank text).
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(flag) => *flag,
            Scalar::Number(number) => *number != 0.0 && !number.is_nan(),
            Scalar::Text(text) => !text.is_empty(),
        }
    }

    /// Short tag naming the JSON kind, used in cache keys.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Number(_) => "number",
            Scalar::Text(_) => "string",
        }
    }

    /// Text rendering of the raw value (`null` renders empty).
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(flag) => flag.to_string(),
            Scalar::Number(number) => number_text(*number),
            Scalar::Text(text) => text.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(number) => Some(*number),
            _ => None,
        }
    }
}

fn number_text(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::Text(text.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(number: f64) -> Self {
        Scalar::Number(number)
    }
}

impl From<bool> for Scalar {
    fn from(flag: bool) -> Self {
        Scalar::Bool(flag)
    }
}

/// One element of a row sequence: ordered `(column key, value)` pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, Scalar)>,
}

impl Row {
    pub fn new(cells: Vec<(String, Scalar)>) -> Self {
        Self { cells }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            cells: object
                .iter()
                .map(|(key, value)| (key.clone(), Scalar::from_json(value)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.cells
            .iter()
            .find(|(cell_key, _)| cell_key == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(key, _)| key.as_str())
    }

    pub fn cells(&self) -> &[(String, Scalar)] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The value held by a top-level form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Scalar(Scalar),
    /// An ordered sequence of row objects; a candidate table.
    Rows(Vec<Row>),
    /// Anything else (nested objects, arrays of scalars), kept verbatim.
    Unrecognized(Value),
}

impl FormValue {
    /// Shape-checks a JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                let rows: Option<Vec<Row>> = items
                    .iter()
                    .map(|item| item.as_object().map(Row::from_object))
                    .collect();
                match rows {
                    Some(rows) => FormValue::Rows(rows),
                    None => FormValue::Unrecognized(value.clone()),
                }
            }
            Value::Object(_) => FormValue::Unrecognized(value.clone()),
            other => FormValue::Scalar(Scalar::from_json(other)),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FormValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_rows(&self) -> Option<&[Row]> {
        match self {
            FormValue::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Presence test mirroring JavaScript truthiness; sequences are always
    /// truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            FormValue::Scalar(scalar) => scalar.is_truthy(),
            FormValue::Rows(_) | FormValue::Unrecognized(_) => true,
        }
    }

    /// Flattens the value to a display scalar: unrecognised shapes become their
    /// compact JSON text, row sequences are not scalars.
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            FormValue::Scalar(scalar) => Some(scalar.clone()),
            FormValue::Unrecognized(value) => Some(Scalar::Text(value.to_string())),
            FormValue::Rows(_) => None,
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Bool(flag) => serializer.serialize_bool(*flag),
            Scalar::Number(number) => serializer.serialize_f64(*number),
            Scalar::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A whole form submission in source key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormSubmission {
    fields: Vec<(String, FormValue)>,
}

impl FormSubmission {
    /// Builds a submission from a JSON object. Any other JSON shape yields
    /// `None`; callers treat that as "no form payload".
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let fields = object
            .iter()
            .map(|(key, value)| (key.clone(), FormValue::from_json(value)))
            .collect();
        Some(Self { fields })
    }

    pub fn new(fields: Vec<(String, FormValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.fields
            .iter()
            .find(|(field_key, _)| field_key == key)
            .map(|(_, value)| value)
    }

    pub fn scalar(&self, key: &str) -> Option<&Scalar> {
        self.get(key).and_then(FormValue::as_scalar)
    }

    pub fn rows(&self, key: &str) -> Option<&[Row]> {
        self.get(key).and_then(FormValue::as_rows)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// True when `key` is present with a truthy value.
    pub fn has_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(FormValue::is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
