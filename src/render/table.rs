use crate::display::model::Align;

/// A single column of a text table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub align: Align,
}

impl TextColumn {
    pub fn new(header: impl Into<String>, align: Align) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            max_width: None,
            align,
        }
    }

    pub fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Column metadata plus pre-formatted cells, rendered as aligned text.
#[derive(Clone, Debug)]
pub struct Table {
    pub columns: Vec<TextColumn>,
    pub rows: Vec<Vec<String>>,
    /// Rows printed below a second rule, e.g. column totals.
    pub footer: Vec<Vec<String>>,
    pub show_headers: bool,
    pub padding: usize,
    /// Use ASCII rules instead of box-drawing characters.
    pub plain: bool,
}

impl Table {
    pub fn new(columns: Vec<TextColumn>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            footer: Vec::new(),
            show_headers: true,
            padding: 1,
            plain: false,
        }
    }

    /// Content width of every column: the widest of header, cells and
    /// `min_width`, capped at `max_width`.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in self.rows.iter().chain(self.footer.iter()) {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                if let Some(max_width) = column.max_width {
                    width = width.min(max_width);
                }
                width
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(cell, widths[idx], column.align, self.padding)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let rule = horizontal_rule(&widths, self.padding, self.plain);
        let mut lines = Vec::new();

        if self.show_headers {
            let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
            lines.push(self.render_row(&header, &widths));
            lines.push(rule.clone());
        }
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        if !self.footer.is_empty() {
            lines.push(rule);
            lines.extend(self.footer.iter().map(|row| self.render_row(row, &widths)));
        }
        lines.join("\n")
    }
}

/// Character count of `text`, ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            skip_escape(&mut chars);
            continue;
        }
        width += 1;
    }
    width
}

fn skip_escape(chars: &mut std::str::Chars<'_>) -> String {
    let mut sequence = String::from('\u{1b}');
    let mut lookahead = chars.clone();
    if lookahead.next() != Some('[') {
        return sequence;
    }
    for ch in chars.by_ref() {
        sequence.push(ch);
        if ch != '[' && ('\u{40}'..='\u{7e}').contains(&ch) {
            break;
        }
    }
    sequence
}

/// Cuts `text` to `width` visible characters, ending in `…`. Escape sequences
/// are kept and a reset is appended when any were seen.
pub fn truncate_text(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 1 {
        return "…".to_string();
    }

    let target = width - 1;
    let mut result = String::new();
    let mut visible = 0;
    let mut saw_ansi = false;
    let mut chars = text.chars();
    while visible < target {
        let Some(ch) = chars.next() else {
            break;
        };
        if ch == '\u{1b}' {
            result.push_str(&skip_escape(&mut chars));
            saw_ansi = true;
            continue;
        }
        result.push(ch);
        visible += 1;
    }

    result.push('…');
    if saw_ansi {
        result.push_str("\u{1b}[0m");
    }
    result
}

pub fn render_cell(text: &str, width: usize, align: Align, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    let (left, right) = match align {
        Align::Left => (0, remaining),
        Align::Right => (remaining, 0),
        Align::Center => (remaining / 2, remaining - remaining / 2),
    };

    let mut cell = String::with_capacity(fitted.len() + width + padding * 2);
    cell.push_str(&" ".repeat(padding + left));
    cell.push_str(&fitted);
    cell.push_str(&" ".repeat(right + padding));
    cell
}

pub fn horizontal_rule(widths: &[usize], padding: usize, plain: bool) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let total: usize =
        widths.iter().map(|w| w + padding * 2).sum::<usize>() + widths.len().saturating_sub(1);
    let ch = if plain { '-' } else { '─' };
    ch.to_string().repeat(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_respect_constraints() {
        let mut table = Table::new(
            vec![
                TextColumn::new("Item", Align::Left).max_width(8),
                TextColumn {
                    min_width: 10,
                    ..TextColumn::new("Notes", Align::Left)
                },
            ],
            vec![
                vec!["AlphaBetaGamma".into(), "Short".into()],
                vec!["BB".into(), "Detailed overview entry".into()],
            ],
        );
        assert_eq!(table.compute_widths(), vec![8, 23]);

        table.footer = vec![vec![String::new(), "x".repeat(30)]];
        assert_eq!(table.compute_widths(), vec![8, 30]);
    }

    #[test]
    fn cells_align_and_pad() {
        assert_eq!(render_cell("AB", 4, Align::Left, 1), " AB   ");
        assert_eq!(render_cell("AB", 4, Align::Right, 1), "   AB ");
        assert_eq!(render_cell("X", 5, Align::Center, 1), "   X   ");
    }

    #[test]
    fn truncation_keeps_escapes_and_resets() {
        let colored = "\u{1b}[31mExtremelyLongValue\u{1b}[0m";
        assert_eq!(visible_width(colored), 18);
        let cut = truncate_text(colored, 5);
        assert_eq!(visible_width(&cut), 5);
        assert!(cut.starts_with("\u{1b}[31mExtr…"));
        assert!(cut.ends_with("\u{1b}[0m"));
        assert_eq!(truncate_text("abc", 1), "…");
    }

    #[test]
    fn rule_switches_character_in_plain_mode() {
        assert_eq!(horizontal_rule(&[2, 3], 1, false), "─".repeat(10));
        assert_eq!(horizontal_rule(&[2, 3], 1, true), "-".repeat(10));
        assert_eq!(horizontal_rule(&[], 1, true), "");
    }

    #[test]
    fn footer_sits_below_second_rule() {
        let mut table = Table::new(
            vec![TextColumn::new("Amount", Align::Right)],
            vec![vec!["₱5.00".into()]],
        );
        table.plain = true;
        table.footer = vec![vec!["₱5.00".into()]];
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "--------");
        assert_eq!(lines[3], "--------");
        assert_eq!(lines[4], "  ₱5.00");
    }
}
