use colored::{ColoredString, Colorize};

use super::table::{Table, TextColumn};
use crate::currency::parse_loose_number;
use crate::display::format::{badge_tone, is_total_eligible};
use crate::display::model::{
    DisplayField, DisplayModel, DisplayTable, DisplayType, FieldType, SummaryItem, SummaryKind,
    Tone,
};
use crate::display::DisplayEngine;
use crate::form::Scalar;

/// Widest a table cell may grow before it is truncated.
const MAX_CELL_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// No colours and ASCII-only rules.
    pub plain: bool,
}

impl RenderOptions {
    pub fn plain() -> Self {
        Self { plain: true }
    }
}

/// Renders a display model as terminal text.
pub fn render_display(model: &DisplayModel, engine: &DisplayEngine, options: RenderOptions) -> String {
    let mut sections = Vec::new();

    if let Some(header) = &model.header {
        let title = style(format!("=== {} ===", header.title), None, true, options);
        let badge = style(
            format!("[{}]", header.status.to_uppercase()),
            Some(badge_tone(&header.status)),
            false,
            options,
        );
        sections.push(format!("{} {}", title, badge));
    }

    if !model.fields.is_empty() {
        let width = model
            .fields
            .iter()
            .map(|field| field.label.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = model
            .fields
            .iter()
            .map(|field| {
                format!(
                    "{:<width$}  {}",
                    format!("{}:", field.label),
                    render_field_value(field, engine, options),
                    width = width + 1
                )
            })
            .collect();
        sections.push(lines.join("\n"));
    }

    for table in &model.tables {
        sections.push(render_table(table, engine, options));
    }

    if !model.summary.is_empty() {
        let mut lines = vec![style("Summary".to_string(), None, true, options)];
        lines.extend(
            model
                .summary
                .iter()
                .map(|item| render_summary_item(item, engine, options)),
        );
        sections.push(lines.join("\n"));
    }

    sections.join("\n\n")
}

fn render_field_value(field: &DisplayField, engine: &DisplayEngine, options: RenderOptions) -> String {
    let value = match field.field_type {
        FieldType::Boolean => Scalar::Bool(field.value.eq_ignore_ascii_case("true")),
        _ => Scalar::Text(field.value.clone()),
    };
    let text = engine.format_cell(&value, field.field_type);
    match field.display_type {
        DisplayType::Badge => {
            style(format!("[{}]", text), Some(badge_tone(&field.value)), false, options)
        }
        DisplayType::Field | DisplayType::Date | DisplayType::Currency => text,
    }
}

/// A titled table with a totals row for every column that may be totalled.
pub fn render_table(table: &DisplayTable, engine: &DisplayEngine, options: RenderOptions) -> String {
    let columns: Vec<TextColumn> = table
        .columns
        .iter()
        .map(|column| TextColumn::new(column.label.clone(), column.align).max_width(MAX_CELL_WIDTH))
        .collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .map(|column| {
                    engine
                        .formatter()
                        .format_optional(row.get(&column.key), column.field_type)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let mut text_table = Table::new(columns, rows);
    text_table.plain = options.plain;

    if table.columns.iter().any(is_total_eligible) {
        let totals: Vec<String> = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                if is_total_eligible(column) {
                    engine.sum_column(&table.rows, &column.key)
                } else if idx == 0 {
                    "Total".to_string()
                } else {
                    String::new()
                }
            })
            .collect();
        text_table.footer.push(totals);
    }

    let title = style(table.title.clone(), None, true, options);
    format!("{}\n{}", title, text_table.render())
}

fn render_summary_item(item: &SummaryItem, engine: &DisplayEngine, options: RenderOptions) -> String {
    let amount = engine.format_currency(&Scalar::Text(item.value.clone()));
    let tone = match item.kind {
        SummaryKind::Balance => match parse_loose_number(&item.value) {
            Some(value) if value < 0.0 => Some(Tone::Danger),
            Some(value) if value > 0.0 => Some(Tone::Success),
            _ => None,
        },
        SummaryKind::Total | SummaryKind::Subtotal => None,
    };
    let amount = style(amount, tone, item.kind == SummaryKind::Total, options);
    format!("  {}: {}", item.label, amount)
}

fn style(text: String, tone: Option<Tone>, bold: bool, options: RenderOptions) -> String {
    if options.plain {
        return text;
    }
    let painted = paint(text, tone);
    if bold {
        painted.bold().to_string()
    } else {
        painted.to_string()
    }
}

fn paint(text: String, tone: Option<Tone>) -> ColoredString {
    match tone {
        Some(Tone::Success) => text.green(),
        Some(Tone::Danger) => text.red(),
        Some(Tone::Warning) => text.yellow(),
        Some(Tone::Info) => text.cyan(),
        Some(Tone::Primary) => text.blue(),
        Some(Tone::Secondary) | Some(Tone::Light) => text.dimmed(),
        None => text.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::model::{default_actions, Header};

    fn model() -> DisplayModel {
        DisplayModel {
            header: Some(Header {
                title: "Leave".into(),
                status: "pending".into(),
            }),
            fields: vec![DisplayField {
                label: "Paid".into(),
                value: "false".into(),
                field_type: FieldType::Boolean,
                display_type: DisplayType::Field,
            }],
            tables: Vec::new(),
            summary: vec![SummaryItem {
                label: "Remaining Balance".into(),
                value: "-200.00".into(),
                kind: SummaryKind::Balance,
            }],
            actions: default_actions(),
        }
    }

    #[test]
    fn plain_rendering_has_no_escapes() {
        let text = render_display(&model(), &DisplayEngine::default(), RenderOptions::plain());
        assert!(!text.contains('\u{1b}'));
        assert!(text.starts_with("=== Leave === [PENDING]"));
        assert!(text.contains("Paid:  No"));
        assert!(text.contains("  Remaining Balance: -₱200.00"));
    }
}
