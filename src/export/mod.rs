//! Flat-table export
//!
//! Writes any materialized table as delimited text with a header line,
//! using the schema recorded in the store's catalog.

use crate::clean::quote;
use crate::storage::{StorageError, StorageResult, TableStore};
use std::io::Write;

/// Field separator of an exported table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Self::Tab => '\t',
            Self::Comma => ',',
        }
    }

    /// Comma for `.csv` paths, tab otherwise
    pub fn for_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Comma,
            _ => Self::Tab,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: Delimiter,
    /// Double single quotes so values can be loaded as SQL literals
    pub sql_escape: bool,
    pub header: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Tab,
            sql_escape: false,
            header: true,
        }
    }
}

/// Whether `value` is one double-quoted token with every inner quote doubled
fn is_quoted_token(value: &str) -> bool {
    value.len() >= 2
        && value.starts_with('"')
        && value.ends_with('"')
        && !value[1..value.len() - 1].replace("\"\"", "").contains('"')
}

fn export_value(value: &str, options: &ExportOptions) -> String {
    let quoted = quote(value, options.sql_escape);
    let separator = options.delimiter.as_char();
    if !(quoted.contains(separator) || quoted.contains('\n')) || is_quoted_token(&quoted) {
        quoted
    } else {
        format!("\"{}\"", quoted.replace('"', "\"\""))
    }
}

fn write_line(out: &mut dyn Write, values: &[String], options: &ExportOptions) -> std::io::Result<()> {
    let line = values
        .iter()
        .map(|v| export_value(v, options))
        .collect::<Vec<_>>()
        .join(&options.delimiter.as_char().to_string());
    writeln!(out, "{}", line)
}

/// Write the table at `path` to `out`. Returns the number of data rows.
pub fn export_table(
    store: &dyn TableStore,
    path: &str,
    out: &mut dyn Write,
    options: &ExportOptions,
) -> StorageResult<usize> {
    let info = store
        .table_info(path)?
        .ok_or_else(|| StorageError::TableNotFound(path.to_string()))?;
    let rows = store.read_rows(path, &info.schema)?;

    if options.header {
        write_line(out, &info.schema.fields, options)?;
    }
    for row in &rows {
        write_line(out, row, options)?;
    }
    out.flush()?;
    Ok(rows.len())
}
