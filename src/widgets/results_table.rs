use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Widget},
};

use crate::table::ResultsTable;

const MAX_COLUMN_WIDTH: u16 = 28;

/// Renders the results table: wide mode as a regular column grid, narrow mode
/// as a label-per-cell stack where every value carries its column header.
pub struct ResultsTableView<'a> {
    table: &'a ResultsTable,
    narrow: bool,
    col_cursor: usize,
    offset: usize,
}

impl<'a> ResultsTableView<'a> {
    pub fn new(table: &'a ResultsTable) -> Self {
        Self {
            table,
            narrow: false,
            col_cursor: 0,
            offset: 0,
        }
    }

    pub fn with_narrow(mut self, narrow: bool) -> Self {
        self.narrow = narrow;
        self
    }

    pub fn with_col_cursor(mut self, col_cursor: usize) -> Self {
        self.col_cursor = col_cursor;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    fn column_widths(&self, visible: &[usize]) -> Vec<u16> {
        self.table
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                // Leave room for the sort indicator after the header
                let mut width = column.name.chars().count() + 2;
                for &row in visible {
                    width = width.max(self.table.cell(row, idx).chars().count());
                }
                (width as u16).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    fn header_cell(&self, idx: usize) -> Cell<'a> {
        let column = &self.table.columns()[idx];
        let active = self.table.sort().filter(|s| s.column == idx);
        let text = match active {
            Some(state) => format!("{} {}", column.name, state.direction.indicator()),
            None => column.name.clone(),
        };
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if active.is_some() {
            style = style.fg(Color::Cyan);
        }
        if idx == self.col_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Cell::from(text).style(style)
    }

    fn render_wide(&self, area: Rect, buf: &mut Buffer) {
        let visible = self.table.visible_rows();
        let widths = self.column_widths(&visible);

        let header = Row::new(
            (0..self.table.columns().len())
                .map(|idx| self.header_cell(idx))
                .collect::<Vec<_>>(),
        );

        let capacity = area.height.saturating_sub(1) as usize;
        let rows = visible
            .iter()
            .skip(self.offset)
            .take(capacity)
            .map(|&row| {
                Row::new(
                    (0..self.table.columns().len())
                        .map(|idx| Cell::from(self.table.cell(row, idx).to_string()))
                        .collect::<Vec<_>>(),
                )
            });

        Table::new(rows, widths.into_iter().map(Constraint::Length))
            .header(header)
            .column_spacing(2)
            .render(area, buf);
    }

    fn render_narrow(&self, area: Rect, buf: &mut Buffer) {
        let visible = self.table.visible_rows();
        let label_style = Style::default().fg(Color::DarkGray);
        let mut lines: Vec<Line> = Vec::new();

        for &row in visible.iter().skip(self.offset) {
            for (label, value) in self.table.labeled_cells(row) {
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", label), label_style),
                    Span::raw(value.to_string()),
                ]));
            }
            lines.push(Line::default());
            if lines.len() > area.height as usize {
                break;
            }
        }

        Paragraph::new(lines).render(area, buf);
    }
}

impl Widget for ResultsTableView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.table.visible_len() == 0 && !self.table.is_empty() {
            Paragraph::new("No rows match the filter")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }
        if self.narrow {
            self.render_narrow(area, buf);
        } else {
            self.render_wide(area, buf);
        }
    }
}
