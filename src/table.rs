//! Tabular results as returned by the query engine.

use std::fmt;

use crate::datatype::Value;
use crate::error::{OqlError, Result};

/// Whether a column carries references to persisted objects or plain scalars.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Reference,
    Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    name: String,
    kind: ColumnKind,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self { name: name.into(), kind }
    }
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Scalar)
    }
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Reference)
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }
}
impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ColumnKind::Reference => write!(f, "{} (reference)", self.name),
            ColumnKind::Scalar => write!(f, "{}", self.name),
        }
    }
}

/// One result row; `None` is a null value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row(pub Vec<Option<Value>>);

impl Row {
    pub fn value(&self, column: usize) -> Option<&Value> {
        self.0.get(column).and_then(Option::as_ref)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Row>,
}

impl ResultTable {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns, rows: Vec::new() }
    }
    /// Appends a row, which must have one value per column.
    pub fn push(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(OqlError::RowArity { expected: self.columns.len(), found: row.len() });
        }
        self.rows.push(row);
        Ok(())
    }
    pub fn with_rows(columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push(row)?;
        }
        Ok(table)
    }
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
