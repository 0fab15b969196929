//! Display table.
//!
//! Projects fetched rows through the registered columns and pairs them with
//! the page window for the rendering layer.

mod column;

pub use column::{CellCallback, CellSource, ColumnHeader, ColumnSpec, TableColumn};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ListingError, ListingResult};
use crate::pager::{self, PageWindow};

/// One rendered cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cell {
    pub column: String,
    pub value: String,
}

/// One rendered row, cells in column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

impl TableRow {
    /// Cell text by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.value.as_str())
    }
}

/// A rendered page of the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TablePage {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<TableRow>,
    pub window: PageWindow,
}

/// Registered display columns, in display order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<TableColumn>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column. Duplicate names are rejected.
    pub fn add(&mut self, column: TableColumn) -> ListingResult<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            tracing::warn!(column = %column.name, "table column already registered; ignoring");
            return Err(ListingError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Render one page of rows.
    ///
    /// `rows` is the page already fetched by the caller; `total_items` and
    /// `offset` describe the full result set.
    pub fn render(
        &self,
        rows: &[Value],
        total_items: u64,
        offset: u64,
        page_size: u64,
        max_buttons: u64,
    ) -> ListingResult<TablePage> {
        let window = pager::compute(total_items, offset, page_size, max_buttons)?;

        let rows = rows
            .iter()
            .map(|row| TableRow {
                cells: self
                    .columns
                    .iter()
                    .map(|column| Cell {
                        column: column.name.clone(),
                        value: column.source.render(row),
                    })
                    .collect(),
            })
            .collect();

        Ok(TablePage {
            columns: self.columns.iter().map(TableColumn::header).collect(),
            rows,
            window,
        })
    }
}
