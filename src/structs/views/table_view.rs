//! # **TableView Module** - *Windowed View over a Table*
//!
//! Non-owning window `[offset .. offset + len)` over a [`Table`]: field
//! metadata plus one [`ArrayV`] per column. This is the table-kernel input
//! currency.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::{ArrayV, Field, FieldArray, Table};

/// # TableView
///
/// Windowed, read-only view over a table's columns.
#[derive(Clone, PartialEq)]
pub struct TableV {
    /// Table name.
    pub name: String,
    /// Field metadata per column.
    pub fields: Vec<Arc<Field>>,
    /// Column windows.
    pub cols: Vec<ArrayV>,
    /// Row offset from the start of the parent table.
    pub offset: usize,
    /// Number of rows in the view.
    pub len: usize,
}

impl TableV {
    /// Creates a view over `table[offset .. offset + len)`.
    pub fn from_table(table: &Table, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= table.n_rows,
            "TableView: window out of bounds (offset + len = {}, n_rows = {})",
            offset + len,
            table.n_rows
        );
        let mut fields = Vec::with_capacity(table.cols.len());
        let mut cols = Vec::with_capacity(table.cols.len());
        for fa in &table.cols {
            fields.push(fa.field.clone());
            cols.push(ArrayV::new(fa.array.clone(), offset, len));
        }
        Self {
            name: table.name.clone(),
            fields,
            cols,
            offset,
            len,
        }
    }

    /// Builds a view from parallel column windows of equal length.
    pub fn from_cols(name: String, fields: Vec<Arc<Field>>, cols: Vec<ArrayV>) -> Self {
        let len = cols.first().map(|c| c.len()).unwrap_or(0);
        for c in &cols {
            assert_eq!(c.len(), len, "TableView columns must be equal length");
        }
        Self {
            name,
            fields,
            cols,
            offset: 0,
            len,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.len
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.cols.len()
    }

    /// Returns true when the view has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Column window at `idx`.
    #[inline]
    pub fn col(&self, idx: usize) -> &ArrayV {
        &self.cols[idx]
    }

    /// Sub-window of this view.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len, "TableView::slice out of bounds");
        Self {
            name: self.name.clone(),
            fields: self.fields.clone(),
            cols: self.cols.iter().map(|c| c.slice(offset, len)).collect(),
            offset: self.offset + offset,
            len,
        }
    }

    /// Materialises the window as an owned `Table`.
    pub fn to_table(&self) -> Table {
        let cols = self
            .fields
            .iter()
            .zip(self.cols.iter())
            .map(|(field, col)| FieldArray {
                field: field.clone(),
                array: col.to_array(),
                null_count: col.null_count(),
            })
            .collect();
        Table {
            cols,
            n_rows: self.len,
            name: self.name.clone(),
        }
    }
}

impl Debug for TableV {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableV")
            .field("name", &self.name)
            .field("n_rows", &self.len)
            .field("n_cols", &self.cols.len())
            .field("offset", &self.offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldArray, arr_i32, arr_str32};

    fn table() -> Table {
        Table::new(
            "t".into(),
            Some(vec![
                FieldArray::from_arr("a", arr_i32![1, 2, 3, 4]),
                FieldArray::from_arr("b", arr_str32!["w", "x", "y", "z"]),
            ]),
        )
    }

    #[test]
    fn test_window_and_materialise() {
        let t = table();
        let v = t.view_range(1, 2);
        assert_eq!(v.n_rows(), 2);
        assert_eq!(v.n_cols(), 2);
        let owned = v.to_table();
        assert_eq!(owned.n_rows, 2);
        assert_eq!(owned.col(0).array.i32().unwrap().data.as_slice(), &[2, 3]);
        assert_eq!(owned.col(1).array.str32().unwrap().get_str(1), Some("y"));
    }

    #[test]
    fn test_nested_slice_offsets_compose() {
        let t = table();
        let v = t.view().slice(1, 3).slice(1, 2);
        assert_eq!(v.offset, 2);
        let owned = v.to_table();
        assert_eq!(owned.col(0).array.i32().unwrap().data.as_slice(), &[3, 4]);
    }
}
