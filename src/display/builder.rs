use serde_json::Value;

use super::classify::FormArchetype;
use super::field_type::contains_any;
use super::format::{column_total, is_badge_key, is_total_eligible};
use super::model::{
    default_actions, Align, DisplayColumn, DisplayField, DisplayModel, DisplayTable, DisplayType,
    FieldType, Header, SummaryItem, SummaryKind,
};
use super::DisplayEngine;
use crate::currency::{format_amount, parse_unsigned_amount};
use crate::form::{FormSubmission, FormValue, Row, Scalar};
use crate::ticket::Ticket;

/// Keys that describe the submission itself rather than its content.
const METADATA_KEYS: &[&str] = &[
    "id",
    "created_at",
    "updated_at",
    "createdAt",
    "updatedAt",
    "formTitle",
    "title",
];

const SUMMARY_KEYWORDS: &[&str] = &["total", "sum", "amount", "cost", "price"];
const FALLBACK_TITLE: &str = "FORM SUBMISSION";
const COPC_TABLE_TITLE: &str = "Petty Cash Breakdown";

impl DisplayEngine {
    /// Builds the display model for a ticket. Never fails: missing or odd
    /// sections come back empty.
    pub fn build_display(&self, ticket: &Ticket) -> DisplayModel {
        let Some(form) = ticket.form_data().and_then(FormSubmission::from_json) else {
            return self.default_display(ticket);
        };
        let structure = self.classify(&form);
        tracing::debug!(
            ticket = %ticket.id,
            form_type = structure.form_type.as_str(),
            "building form display"
        );

        match structure.form_type {
            FormArchetype::Copc => self.copc_display(&form),
            _ => self.generic_display(ticket, &form, &structure.array_fields),
        }
    }

    /// Tables for every non-empty row sequence in the ticket's form payload.
    pub fn form_data_arrays(&self, ticket: &Ticket) -> Vec<DisplayTable> {
        let Some(form) = ticket.form_data().and_then(FormSubmission::from_json) else {
            return Vec::new();
        };
        form.iter()
            .filter_map(|(key, value)| {
                let rows = value.as_rows()?;
                let first = rows.first()?;
                Some(DisplayTable {
                    title: self.format_field_name(key),
                    rows: rows.to_vec(),
                    columns: self.display_columns(first),
                })
            })
            .collect()
    }

    /// One-line summary for list views, specialised per archetype.
    pub fn adaptive_summary(&self, ticket: &Ticket) -> String {
        let Some(form) = ticket.form_data().and_then(FormSubmission::from_json) else {
            return ticket.description.clone();
        };
        let structure = self.classify(&form);

        let specialised = match structure.form_type {
            FormArchetype::Copc => both(&form, "totalPettyCash", "pettyCashHolder")
                .map(|(total, holder)| format!("Petty Cash: {} - Holder: {}", total, holder)),
            FormArchetype::PurchaseRequest => both(&form, "requestType", "totalAmount").map(
                |(request_type, total)| match truthy_text(&form, "vendor") {
                    Some(vendor) => format!("{}: {} - {}", request_type, total, vendor),
                    None => format!("{}: {}", request_type, total),
                },
            ),
            FormArchetype::LeaveRequest => both(&form, "leaveType", "days")
                .map(|(leave_type, days)| format!("{}: {} days", leave_type, days)),
            FormArchetype::ExpenseReport => both(&form, "totalAmount", "department")
                .map(|(total, department)| format!("Expense: {} - {}", total, department)),
            FormArchetype::Generic | FormArchetype::Unknown => None,
        };
        if let Some(summary) = specialised {
            return summary;
        }

        let summary = form
            .iter()
            .take(2)
            .map(|(key, value)| {
                let label = self.format_field_name(key);
                match sequence_len(value) {
                    Some(count) => format!("{}: {} items", label, count),
                    None => format!("{}: {}", label, scalar_text(value)),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        if summary.is_empty() {
            ticket.description.clone()
        } else {
            summary
        }
    }

    fn default_display(&self, ticket: &Ticket) -> DisplayModel {
        DisplayModel {
            header: Some(Header {
                title: ticket.title.clone(),
                status: ticket.status.as_str().to_string(),
            }),
            fields: vec![DisplayField {
                label: "Description".to_string(),
                value: ticket.description.clone(),
                field_type: FieldType::Text,
                display_type: DisplayType::Field,
            }],
            tables: Vec::new(),
            summary: Vec::new(),
            actions: default_actions(),
        }
    }

    fn copc_display(&self, form: &FormSubmission) -> DisplayModel {
        let mut fields = Vec::new();
        let known = [
            ("date", "Date", FieldType::Date, DisplayType::Date),
            ("pettyCashHolder", "Petty Cash Holder", FieldType::Text, DisplayType::Field),
            ("department", "Department", FieldType::Text, DisplayType::Field),
        ];
        for (key, label, field_type, display_type) in known {
            if let Some(value) = truthy_text(form, key) {
                fields.push(DisplayField {
                    label: label.to_string(),
                    value,
                    field_type,
                    display_type,
                });
            }
        }

        let transactions = form.rows("transactions");
        let mut tables = Vec::new();
        if let Some(rows) = transactions {
            tables.push(DisplayTable {
                title: COPC_TABLE_TITLE.to_string(),
                rows: rows.to_vec(),
                columns: vec![
                    DisplayColumn::new("date", "DATE OF TRANSACTION", FieldType::Date, Align::Left),
                    DisplayColumn::new("invoiceNumber", "INVOICE NUMBER", FieldType::Text, Align::Left),
                    DisplayColumn::new("copcNumber", "COPC NUMBER", FieldType::Text, Align::Left),
                    DisplayColumn::new("description", "DESCRIPTION", FieldType::Text, Align::Left),
                    DisplayColumn::new("amount", "AMOUNT", FieldType::Currency, Align::Right),
                ],
            });
        }

        let spent = transactions
            .map(|rows| column_total(rows, "amount"))
            .unwrap_or(0.0);
        let petty_cash = truthy_text(form, "totalPettyCash");
        let petty_cash_total = petty_cash
            .as_deref()
            .and_then(parse_unsigned_amount)
            .unwrap_or(0.0);

        let mut summary = vec![SummaryItem {
            label: "Total Amount".to_string(),
            value: format_amount(spent),
            kind: SummaryKind::Subtotal,
        }];
        if petty_cash.is_some() {
            summary.push(SummaryItem {
                label: "Total Petty Cash".to_string(),
                value: format_amount(petty_cash_total),
                kind: SummaryKind::Total,
            });
        }
        summary.push(SummaryItem {
            label: "Remaining Balance".to_string(),
            value: format_amount(petty_cash_total - spent),
            kind: SummaryKind::Balance,
        });

        DisplayModel {
            header: None,
            fields,
            tables,
            summary,
            actions: default_actions(),
        }
    }

    fn generic_display(
        &self,
        ticket: &Ticket,
        form: &FormSubmission,
        array_fields: &[String],
    ) -> DisplayModel {
        let title = truthy_text(form, "formTitle")
            .or_else(|| truthy_text(form, "title"))
            .or_else(|| Some(ticket.title.clone()).filter(|title| !title.is_empty()))
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let header = Header {
            title,
            status: ticket.status.as_str().to_string(),
        };

        let fields = form
            .iter()
            .filter(|(key, value)| !METADATA_KEYS.contains(key) && sequence_len(value).is_none())
            .filter_map(|(key, value)| {
                let scalar = value.to_scalar()?;
                Some(self.generic_field(key, &scalar))
            })
            .collect();

        let tables: Vec<DisplayTable> = array_fields
            .iter()
            .filter_map(|key| {
                let rows = form.rows(key)?;
                let first = rows.first()?;
                Some(DisplayTable {
                    title: self.format_field_name(key),
                    rows: rows.to_vec(),
                    columns: self.display_columns(first),
                })
            })
            .collect();

        let mut summary = self.provided_totals(form);
        if summary.is_empty() {
            summary = computed_totals(&tables);
        }

        DisplayModel {
            header: Some(header),
            fields,
            tables,
            summary,
            actions: default_actions(),
        }
    }

    fn generic_field(&self, key: &str, value: &Scalar) -> DisplayField {
        let field_type = self.detect_type(value, Some(key));
        let display_type = match field_type {
            FieldType::Date => DisplayType::Date,
            FieldType::Currency => DisplayType::Currency,
            _ if is_badge_key(key) => DisplayType::Badge,
            _ => DisplayType::Field,
        };
        DisplayField {
            label: self.format_field_name(key),
            value: value.to_text(),
            field_type,
            display_type,
        }
    }

    /// Summary rows taken from scalar fields whose names imply an amount.
    fn provided_totals(&self, form: &FormSubmission) -> Vec<SummaryItem> {
        form.iter()
            .filter_map(|(key, value)| {
                let lower = key.to_lowercase();
                if !contains_any(&lower, SUMMARY_KEYWORDS) || sequence_len(value).is_some() {
                    return None;
                }
                let scalar = value.to_scalar().filter(|scalar| !scalar.is_null())?;
                let amount = parse_unsigned_amount(&scalar.to_text())?;
                Some(SummaryItem {
                    label: self.format_field_name(key),
                    value: format_amount(amount),
                    kind: summary_kind(&lower),
                })
            })
            .collect()
    }

    fn display_columns(&self, first_row: &Row) -> Vec<DisplayColumn> {
        self.columns_for_row(first_row)
            .into_iter()
            .map(DisplayColumn::from)
            .collect()
    }
}

/// Auto-summed totals for every eligible currency column with a positive sum.
fn computed_totals(tables: &[DisplayTable]) -> Vec<SummaryItem> {
    tables
        .iter()
        .flat_map(|table| {
            table
                .columns
                .iter()
                .filter(|column| is_total_eligible(column))
                .filter_map(move |column| {
                    let total = column_total(&table.rows, &column.key);
                    (total > 0.0).then(|| SummaryItem {
                        label: format!("Total {}", column.label),
                        value: format_amount(total),
                        kind: SummaryKind::Total,
                    })
                })
        })
        .collect()
}

fn summary_kind(lower_key: &str) -> SummaryKind {
    if lower_key.contains("balance") {
        SummaryKind::Balance
    } else if lower_key.contains("total") || lower_key.contains("grand") {
        SummaryKind::Total
    } else {
        SummaryKind::Subtotal
    }
}

/// Length of a JSON array value, whether or not it holds row objects.
fn sequence_len(value: &FormValue) -> Option<usize> {
    match value {
        FormValue::Rows(rows) => Some(rows.len()),
        FormValue::Unrecognized(Value::Array(items)) => Some(items.len()),
        _ => None,
    }
}

fn scalar_text(value: &FormValue) -> String {
    value
        .to_scalar()
        .map(|scalar| scalar.to_text())
        .unwrap_or_default()
}

/// Text of `key` when present with a truthy value.
fn truthy_text(form: &FormSubmission, key: &str) -> Option<String> {
    form.get(key)
        .filter(|value| value.is_truthy())
        .and_then(FormValue::to_scalar)
        .map(|scalar| scalar.to_text())
}

fn both(form: &FormSubmission, first: &str, second: &str) -> Option<(String, String)> {
    Some((truthy_text(form, first)?, truthy_text(form, second)?))
}
