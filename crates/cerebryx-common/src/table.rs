//! In-memory tabular data with CSV I/O.
//!
//! Every stage of the KG build reads, transforms, and writes row-oriented
//! tables. `Table` keeps the header order explicit (column order is load
//! bearing for the bulk-import format) and treats all cells as strings;
//! numeric interpretation happens at the point of use.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{KgError, Result};

#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    col_index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

/// Read-only view of one row, indexed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell value for `col`, or "" if the column does not exist.
    pub fn get(&self, col: &str) -> &'a str {
        match self.table.col_index.get(col) {
            Some(&i) => self.cells.get(i).map(String::as_str).unwrap_or(""),
            None => "",
        }
    }

    /// Like `get`, but trimmed and `None` when empty.
    pub fn get_non_empty(&self, col: &str) -> Option<&'a str> {
        let v = self.get(col).trim();
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    }
}

impl Table {
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let col_index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            columns,
            col_index,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, col: &str) -> bool {
        self.col_index.contains_key(col)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }

    /// Append a row given as (column, value) pairs.
    /// Unknown columns are ignored; unset columns stay empty.
    pub fn push_record(&mut self, record: &[(&str, String)]) {
        let mut row = vec![String::new(); self.columns.len()];
        for (k, v) in record {
            if let Some(&i) = self.col_index.get(*k) {
                row[i] = v.clone();
            }
        }
        self.rows.push(row);
    }

    /// All non-empty values of one column, in row order.
    pub fn column_values(&self, col: &str) -> Vec<&str> {
        self.iter()
            .filter_map(|r| r.get_non_empty(col))
            .collect()
    }

    /// Reshape into exactly `columns`: existing columns are carried over,
    /// missing ones are padded with "", undeclared ones are dropped.
    pub fn with_columns(&self, columns: &[String]) -> Table {
        let mut out = Table::new(columns.to_vec());
        for row in self.iter() {
            let cells: Vec<String> = columns.iter().map(|c| row.get(c).to_string()).collect();
            out.rows.push(cells);
        }
        out
    }

    /// Same rows under a new header. The header length must match.
    pub fn with_renamed_columns(&self, columns: Vec<String>) -> Result<Table> {
        if columns.len() != self.columns.len() {
            return Err(KgError::SchemaViolation(format!(
                "Column rename expects {} names, got {}",
                self.columns.len(),
                columns.len()
            )));
        }
        let mut out = Table::new(columns);
        out.rows = self.rows.clone();
        Ok(out)
    }

    // ── CSV I/O ───────────────────────────────────────────────────────────────

    /// Load a CSV with headers. A missing file is reported as
    /// `KgError::MissingInput` so callers can apply their skip policy.
    pub fn read_csv(path: &Path) -> Result<Table> {
        if !path.exists() {
            return Err(KgError::MissingInput(path.to_path_buf()));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = Table::new(columns);
        let width = table.columns.len();
        for result in reader.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            table.rows.push(row);
        }
        Ok(table)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
