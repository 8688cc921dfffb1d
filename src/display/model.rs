use serde::Serialize;

use crate::form::Row;

/// Semantic type inferred for a form value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Currency,
    Boolean,
    Email,
    Url,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Currency => "currency",
            FieldType::Boolean => "boolean",
            FieldType::Email => "email",
            FieldType::Url => "url",
        }
    }

    /// Numeric columns read best right-aligned.
    pub fn default_align(&self) -> Align {
        match self {
            FieldType::Currency | FieldType::Number => Align::Right,
            _ => Align::Left,
        }
    }
}

/// How a flat field is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Field,
    Badge,
    Date,
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Colour family for badges, buttons and summary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Danger,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Total,
    Subtotal,
    Balance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayField {
    pub label: String,
    /// Raw value text; formatting happens at render time.
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub display_type: DisplayType,
}

/// Column layout inferred for a row sequence (the `FieldDescriptor` of a
/// table).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayColumn {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub align: Align,
}

impl DisplayColumn {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
        align: Align,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            align,
        }
    }
}

impl From<ColumnDescriptor> for DisplayColumn {
    fn from(column: ColumnDescriptor) -> Self {
        let align = column.field_type.default_align();
        Self {
            key: column.key,
            label: column.label,
            field_type: column.field_type,
            align,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTable {
    pub title: String,
    #[serde(rename = "data")]
    pub rows: Vec<Row>,
    pub columns: Vec<DisplayColumn>,
}

impl DisplayTable {
    pub fn column(&self, key: &str) -> Option<&DisplayColumn> {
        self.columns.iter().find(|column| column.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryItem {
    pub label: String,
    /// Two-decimal amount, e.g. `800.00`.
    pub value: String,
    #[serde(rename = "type")]
    pub kind: SummaryKind,
}

/// Everything a renderer needs to present one ticket's form submission.
/// Built fresh for each ticket and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub header: Option<Header>,
    pub fields: Vec<DisplayField>,
    pub tables: Vec<DisplayTable>,
    pub summary: Vec<SummaryItem>,
    pub actions: Vec<String>,
}

impl DisplayModel {
    pub fn field(&self, label: &str) -> Option<&DisplayField> {
        self.fields.iter().find(|field| field.label == label)
    }

    pub fn summary_item(&self, label: &str) -> Option<&SummaryItem> {
        self.summary.iter().find(|item| item.label == label)
    }
}

/// Actions every form display offers to the approval board.
pub fn default_actions() -> Vec<String> {
    vec!["approve".to_string(), "reject".to_string()]
}
