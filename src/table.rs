//! Results table model: sorting, filtering, and visibility of server rows.
//!
//! The table owns a permutation over the server-supplied rows rather than the
//! rows themselves, so the base order survives every sort and the display
//! order is always a pure function of (base order, sort state, filter query).

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Percentage,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub sortable: bool,
}

impl Column {
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Text,
            sortable: true,
        }
    }

    pub fn integer(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Integer,
            sortable: true,
        }
    }

    pub fn percentage(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Percentage,
            sortable: true,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// The single active sort: at most one column carries a direction at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// Parse a cell for numeric comparison. A trailing percent sign is ignored.
/// Empty or unparseable cells yield None, which sorts as the minimum value.
fn numeric_key(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    let trimmed = trimmed.strip_suffix('%').map(str::trim_end).unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn compare_cells(a: &str, b: &str, kind: ColumnKind) -> Ordering {
    match kind {
        // Plain codepoint ordering, locale-independent
        ColumnKind::Text => a.cmp(b),
        ColumnKind::Integer | ColumnKind::Percentage => {
            match (numeric_key(a), numeric_key(b)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => x.total_cmp(&y),
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ResultsTable {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    order: Vec<usize>,
    sort: Option<SortState>,
    filter: String,
    export_ready: bool,
}

impl ResultsTable {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<String>>) -> Self {
        let order = (0..rows.len()).collect();
        Self {
            columns,
            rows,
            order,
            sort: None,
            filter: String::new(),
            export_ready: false,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows[row]
            .get(column)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Sort by a column. Re-sorting the active column flips its direction;
    /// a new column takes over ascending, clearing the previous indicator.
    /// Returns the direction now in effect, or None for an unsortable column.
    pub fn sort_by(&mut self, column: usize) -> Option<SortDirection> {
        let kind = match self.columns.get(column) {
            Some(c) if c.sortable => c.kind,
            _ => return None,
        };
        let direction = match self.sort {
            Some(state) if state.column == column => state.direction.toggled(),
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortState { column, direction });

        // Always sort from the base order so equal keys keep the
        // server-supplied relative order regardless of sort history.
        let rows = &self.rows;
        self.order = (0..rows.len()).collect();
        self.order.sort_by(|&a, &b| {
            let a_cell = rows[a].get(column).map(String::as_str).unwrap_or_default();
            let b_cell = rows[b].get(column).map(String::as_str).unwrap_or_default();
            let ordering = compare_cells(a_cell, b_cell, kind);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        self.export_ready = true;
        Some(direction)
    }

    /// Set the filter query. Visibility only; the display order is untouched.
    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
    }

    fn row_matches(&self, row: usize) -> bool {
        if self.filter.is_empty() {
            return true;
        }
        let needle = self.filter.to_lowercase();
        let text = self.rows[row].join(" ").to_lowercase();
        text.contains(&needle)
    }

    /// Row indices in display order, filtered rows hidden
    pub fn visible_rows(&self) -> Vec<usize> {
        self.order
            .iter()
            .copied()
            .filter(|&row| self.row_matches(row))
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.order
            .iter()
            .filter(|&&row| self.row_matches(row))
            .count()
    }

    /// Cells of one row paired with their column headers, for the narrow
    /// label-per-cell layout
    pub fn labeled_cells(&self, row: usize) -> Vec<(&str, &str)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.name.as_str(), self.cell(row, idx)))
            .collect()
    }

    /// Whether the export control is usable. Set by the first completed sort
    /// or marked externally when a result set arrives.
    pub fn export_ready(&self) -> bool {
        self.export_ready
    }

    pub fn mark_export_ready(&mut self) {
        self.export_ready = true;
    }
}
