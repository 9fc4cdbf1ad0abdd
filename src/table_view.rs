use crate::models::{Table, AUTOMATION_COLUMN, AUTOMATION_YES, HOW_TO_COLUMN, TASK_ID_COLUMN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    Text(String),
    /// Automation affordance; opens the prompt modal for `task_key`.
    Action { task_key: String },
}

impl GridCell {
    pub fn task_key(&self) -> Option<&str> {
        match self {
            GridCell::Action { task_key } => Some(task_key),
            GridCell::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrid {
    pub table_id: u32,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<GridCell>>,
}

impl TableGrid {
    /// Task key of the first action in a row, if the row has one.
    pub fn row_action(&self, row: usize) -> Option<&str> {
        self.rows.get(row)?.iter().find_map(GridCell::task_key)
    }
}

pub fn header_label(column: &str, index: usize) -> String {
    if column.is_empty() {
        format!("Column {}", index + 1)
    } else {
        column.to_string()
    }
}

/// Lookup key the modal uses for a row: its `Task Id` cell, else the 1-based row index.
pub fn task_key(table: &Table, row: usize) -> String {
    match table.column_index(TASK_ID_COLUMN) {
        Some(column) => table.cell_text(row, column),
        None => (row + 1).to_string(),
    }
}

pub fn find_row(table: &Table, key: &str) -> Option<usize> {
    match table.column_index(TASK_ID_COLUMN) {
        Some(column) => (0..table.rows.len()).find(|&row| table.cell_text(row, column) == key),
        None => key
            .parse::<usize>()
            .ok()
            .filter(|&index| index >= 1 && index <= table.rows.len())
            .map(|index| index - 1),
    }
}

pub fn is_automatable(table: &Table, row: usize) -> bool {
    table
        .column_index(AUTOMATION_COLUMN)
        .and_then(|column| table.cell(row, column))
        .and_then(|cell| cell.as_str())
        .is_some_and(|value| value == AUTOMATION_YES)
}

pub fn project(table: &Table) -> TableGrid {
    let headers = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| header_label(column, index))
        .collect();

    let how_to = table.column_index(HOW_TO_COLUMN);
    let rows = (0..table.rows.len())
        .map(|row| {
            let automatable = is_automatable(table, row);
            (0..table.columns.len())
                .map(|column| {
                    if automatable && Some(column) == how_to {
                        GridCell::Action {
                            task_key: task_key(table, row),
                        }
                    } else {
                        GridCell::Text(table.cell_text(row, column))
                    }
                })
                .collect()
        })
        .collect();

    TableGrid {
        table_id: table.id,
        title: table.title.clone(),
        headers,
        rows,
    }
}
