//! Table layout state: the column cursor, row spans still covering
//! columns, and the styles rows and columns hand down to their cells.

use crate::context::ProcessContext;
use crate::diagnostic::DiagnosticKind;
use crate::sosofo::TableCellSpec;
use galley_fot::TableCellNic;
use galley_grove::GroveNode;
use galley_style::Style;
use std::sync::Arc;

/// Columns past this index are not tracked for spans or styles.
pub const MAX_TABLE_COLUMNS: usize = 1 << 16;

/// Per-table bookkeeping. One frame per open table; nested tables stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFrame {
    current_column: usize,
    /// `column_styles[i][span - 1]` is the style of the column declared at
    /// index `i` spanning `span` columns.
    column_styles: Vec<Vec<Option<Arc<Style>>>>,
    /// Rows each column is still covered for by cells of earlier rows.
    covered: Vec<usize>,
    n_columns: usize,
    row_style: Option<Arc<Style>>,
    in_table_row: bool,
    row_connectable_level: usize,
    rows_since_reconcile: bool,
}

impl TableFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets columns and spans; a new table part starts afresh.
    pub fn reset_part(&mut self) {
        self.current_column = 0;
        self.column_styles.clear();
        self.covered.clear();
        self.n_columns = 0;
        self.row_style = None;
    }

    pub fn add_column(&mut self, index: usize, span: usize, style: Option<Arc<Style>>) {
        self.current_column = index.saturating_add(span);
        if span == 0 || index >= MAX_TABLE_COLUMNS {
            return;
        }
        if self.column_styles.len() <= index {
            self.column_styles.resize_with(index + 1, Vec::new);
        }
        let styles = &mut self.column_styles[index];
        if styles.len() < span {
            styles.resize(span, None);
        }
        styles[span - 1] = style;
    }

    pub fn begin_row(&mut self, style: Option<Arc<Style>>, connectable_level: usize) {
        self.current_column = 0;
        self.row_style = style;
        self.in_table_row = true;
        self.row_connectable_level = connectable_level;
        self.rows_since_reconcile = true;
    }

    /// Records a placed cell and moves the cursor past it.
    ///
    /// Coverage is recorded only up to `MAX_TABLE_COLUMNS`.
    pub fn note_cell(&mut self, column: usize, n_columns_spanned: usize, n_rows_spanned: usize) {
        let end = column.saturating_add(n_columns_spanned);
        self.current_column = end;
        let end = end.min(MAX_TABLE_COLUMNS);
        let start = column.min(end);
        if self.covered.len() < end {
            self.covered.resize(end, 0);
        }
        for covered in &mut self.covered[start..end] {
            *covered = n_rows_spanned;
        }
        if start < end {
            self.n_columns = self.n_columns.max(end);
        }
    }

    /// Columns of the current row no cell has claimed.
    pub fn unfilled_columns(&self) -> Vec<usize> {
        (0..self.n_columns)
            .filter(|&i| self.covered.get(i).copied().unwrap_or(0) == 0)
            .collect()
    }

    /// Moves the row span counters on by one row.
    pub fn finish_row(&mut self) {
        let n = self.n_columns.min(self.covered.len());
        for covered in &mut self.covered[..n] {
            *covered = covered.saturating_sub(1);
        }
        self.in_table_row = false;
    }

    /// The next column not covered by a row span, advancing the cursor to it.
    pub fn next_column(&mut self) -> usize {
        while self
            .covered
            .get(self.current_column)
            .is_some_and(|&c| c > 0)
        {
            self.current_column += 1;
        }
        self.current_column
    }

    pub fn column_style(&self, index: usize, span: usize) -> Option<&Arc<Style>> {
        if span == 0 {
            return None;
        }
        self.column_styles
            .get(index)
            .and_then(|styles| styles.get(span - 1))
            .and_then(Option::as_ref)
    }

    pub fn row_style(&self) -> Option<&Arc<Style>> {
        self.row_style.as_ref()
    }

    /// Rows still needed to close every outstanding row span.
    pub fn outstanding_rows(&self) -> usize {
        self.covered.iter().copied().max().unwrap_or(0)
    }

    pub fn in_table_row(&self) -> bool {
        self.in_table_row
    }

    pub fn row_connectable_level(&self) -> usize {
        self.row_connectable_level
    }

    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    pub fn covered(&self) -> &[usize] {
        &self.covered
    }

    pub fn cursor(&self) -> usize {
        self.current_column
    }
}

impl<'a, N: GroveNode> ProcessContext<'a, N> {
    pub fn start_table(&mut self) {
        self.tables.push(TableFrame::new());
    }

    pub fn end_table(&mut self) {
        self.close_open_row();
        self.cover_spanned_rows();
        self.tables.pop();
    }

    pub fn start_table_part(&mut self) {
        if let Some(table) = self.tables.last_mut() {
            table.reset_part();
        }
    }

    pub fn end_table_part(&mut self) {
        self.close_open_row();
        self.cover_spanned_rows();
    }

    pub fn in_table(&self) -> bool {
        !self.tables.is_empty()
    }

    pub fn in_table_row(&self) -> bool {
        self.tables.last().is_some_and(TableFrame::in_table_row)
    }

    fn close_open_row(&mut self) {
        if self.in_table_row() {
            self.end_table_row();
        }
    }

    pub fn add_table_column(&mut self, index: usize, span: usize, style: Option<Arc<Style>>) {
        if let Some(table) = self.tables.last_mut() {
            table.add_column(index, span, style);
        }
    }

    pub fn current_table_column(&mut self) -> usize {
        self.tables.last_mut().map_or(0, TableFrame::next_column)
    }

    pub fn note_table_cell(&mut self, column: usize, n_columns_spanned: usize, n_rows_spanned: usize) {
        if let Some(table) = self.tables.last_mut() {
            table.note_cell(column, n_columns_spanned, n_rows_spanned);
        }
    }

    /// Opens a row, closing any row still open.
    pub fn start_table_row(&mut self, style: Option<Arc<Style>>) {
        self.close_open_row();
        let level = self.connectables.len();
        if let Some(table) = self.tables.last_mut() {
            table.begin_row(style, level);
        }
        self.sink().start_table_row();
    }

    /// Closes the open row, first filling every unclaimed column with a
    /// synthesized empty cell.
    pub fn end_table_row(&mut self) {
        let Some(table) = self.tables.last() else {
            return;
        };
        if !table.in_table_row() {
            return;
        }
        for column in table.unfilled_columns() {
            self.missing_cell(column);
        }
        if let Some(table) = self.tables.last_mut() {
            table.finish_row();
        }
        self.sink().end_table_row();
    }

    fn missing_cell(&mut self, column: usize) {
        let spec = TableCellSpec {
            column_index: Some(column),
            ..TableCellSpec::default()
        };
        self.start_flow_obj();
        self.table_cell(&spec, true, |_| {});
        self.end_flow_obj();
    }

    /// Closes row spans that reach past the end of a table part.
    ///
    /// Only parts that opened a row count as a reconciliation.
    fn cover_spanned_rows(&mut self) {
        let Some(table) = self.tables.last_mut() else {
            return;
        };
        if !table.rows_since_reconcile {
            return;
        }
        table.rows_since_reconcile = false;
        let outstanding = table.outstanding_rows();
        self.stats.span_reconciliations += 1;
        if outstanding == 0 {
            return;
        }
        if !self.config.synthesize_filler_rows {
            self.report(
                DiagnosticKind::RowSpanOverflow,
                format!("row spans extend {outstanding} row(s) past the end of the table part"),
            );
            return;
        }
        log::debug!("Adding {} filler rows to close row spans", outstanding);
        for _ in 0..outstanding {
            self.start_table_row(None);
            self.end_table_row();
            self.stats.filler_rows += 1;
        }
        if let Some(table) = self.tables.last_mut() {
            table.rows_since_reconcile = false;
        }
    }

    /// Emits one table cell.
    ///
    /// Outside any table the content is processed as if the cell were not
    /// there. A cell outside a row opens one; `starts_row` forces a new one.
    /// Column and row styles wrap the cell in sequences so they apply
    /// underneath the cell's own style.
    pub(crate) fn table_cell(
        &mut self,
        spec: &TableCellSpec,
        missing: bool,
        content: impl FnOnce(&mut Self),
    ) {
        if !self.in_table() {
            self.report(DiagnosticKind::NotInTable, "table cell outside a table");
            content(self);
            return;
        }
        if !self.in_table_row() {
            self.start_table_row(None);
        } else if spec.starts_row {
            self.end_table_row();
            self.start_table_row(None);
        }
        let column_index = match spec.column_index {
            Some(index) => index,
            None => self.current_table_column(),
        };
        let nic = TableCellNic {
            column_index,
            n_columns_spanned: spec.n_columns_spanned,
            n_rows_spanned: spec.n_rows_spanned,
            missing,
        };
        let (column_style, row_style) = match self.tables.last() {
            Some(table) => (
                table.column_style(column_index, spec.n_columns_spanned).cloned(),
                table.row_style().cloned(),
            ),
            None => (None, None),
        };
        for style in [&column_style, &row_style].into_iter().flatten() {
            self.push_style(style);
            self.sink().start_sequence();
        }
        self.sink().start_table_cell(&nic);
        if !missing {
            self.note_table_cell(column_index, spec.n_columns_spanned, spec.n_rows_spanned);
        }
        content(self);
        self.sink().end_table_cell();
        for _ in [&row_style, &column_style].into_iter().flatten() {
            self.sink().end_sequence();
            self.pop_style();
        }
        if spec.ends_row {
            self.end_table_row();
        }
    }
}
