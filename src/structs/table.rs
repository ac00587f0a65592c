//! # **Table Module** - *Columnar Table for Analytics Kernels*
//!
//! Columnar data container pairing a fixed number of rows with named, typed
//! `FieldArray` columns. All columns are equal length; column identity is
//! positional, names are a convenience.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{FieldArray, KernelError, Result, TableV};

// Global counter for unnamed table instances
static UNNAMED_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// # Table
///
/// ## Description
/// - Standard columnar table with named columns (`FieldArray`), a fixed
///   number of rows, and an optional logical table name.
/// - All columns are required to be equal length.
/// - Kernels take [`TableV`] views as input and return owned `Table`s.
///
/// # Example
/// ```rust
/// use minframe::{FieldArray, Table, arr_i32, arr_str32};
///
/// let col1 = FieldArray::from_arr("numbers", arr_i32![1, 2, 3]);
/// let col2 = FieldArray::from_arr("letters", arr_str32!["x", "y", "z"]);
/// let tbl = Table::new("demo".into(), Some(vec![col1, col2]));
/// assert_eq!(tbl.n_rows, 3);
/// assert_eq!(tbl.n_cols(), 2);
/// ```
#[derive(Default, PartialEq, Clone, Debug)]
pub struct Table {
    /// FieldArrays representing named columns.
    pub cols: Vec<FieldArray>,
    /// Number of rows in the table.
    pub n_rows: usize,
    /// Table name.
    pub name: String,
}

impl Table {
    /// Constructs a new Table with a specified name and optional columns.
    /// The number of rows is inferred from the first column.
    ///
    /// Panics if columns disagree on length; use [`Table::try_new`] for the
    /// fallible form.
    pub fn new(name: String, cols: Option<Vec<FieldArray>>) -> Self {
        Self::try_new(name, cols.unwrap_or_default()).expect("column length mismatch")
    }

    /// Fallible constructor validating equal column lengths.
    pub fn try_new(name: String, cols: Vec<FieldArray>) -> Result<Self> {
        let n_rows = cols.first().map(|col| col.len()).unwrap_or(0);
        for (i, col) in cols.iter().enumerate() {
            if col.len() != n_rows {
                return Err(KernelError::invalid_argument(format!(
                    "column {} has {} rows, expected {}",
                    i,
                    col.len(),
                    n_rows
                )));
            }
        }
        let name = if name.trim().is_empty() {
            let id = UNNAMED_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("UnnamedTable{}", id)
        } else {
            name
        };
        Ok(Self { cols, n_rows, name })
    }

    /// Constructs a new, empty Table with a globally unique name.
    pub fn new_empty() -> Self {
        let id = UNNAMED_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            cols: Vec::new(),
            n_rows: 0,
            name: format!("UnnamedTable{}", id),
        }
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.cols.len()
    }

    /// Column at `idx`.
    #[inline]
    pub fn col(&self, idx: usize) -> &FieldArray {
        &self.cols[idx]
    }

    /// First column with the given name.
    pub fn col_by_name(&self, name: &str) -> Option<&FieldArray> {
        self.cols.iter().find(|c| c.name() == name)
    }

    /// Appends a column, enforcing the row-count invariant.
    pub fn add_col(&mut self, col: FieldArray) -> Result<()> {
        if !self.cols.is_empty() && col.len() != self.n_rows {
            return Err(KernelError::invalid_argument(format!(
                "column '{}' has {} rows, table has {}",
                col.name(),
                col.len(),
                self.n_rows
            )));
        }
        if self.cols.is_empty() {
            self.n_rows = col.len();
        }
        self.cols.push(col);
        Ok(())
    }

    /// Full-range view over the table.
    #[inline]
    pub fn view(&self) -> TableV {
        TableV::from_table(self, 0, self.n_rows)
    }

    /// Windowed view over `[offset, offset + len)`.
    #[inline]
    pub fn view_range(&self, offset: usize, len: usize) -> TableV {
        TableV::from_table(self, offset, len)
    }

    /// Owned copy of rows `[offset, offset + len)`.
    pub fn slice_clone(&self, offset: usize, len: usize) -> Table {
        let cols = self
            .cols
            .iter()
            .map(|c| c.slice_clone(offset, len))
            .collect();
        Table {
            cols,
            n_rows: len,
            name: self.name.clone(),
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Table \"{}\" [{} rows x {} cols]",
            self.name,
            self.n_rows,
            self.n_cols()
        )?;
        for col in &self.cols {
            writeln!(f, "  {}", col.field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldArray, arr_i32, arr_str32};

    #[test]
    fn test_new_and_access() {
        let t = Table::new(
            "t".into(),
            Some(vec![
                FieldArray::from_arr("a", arr_i32![1, 2]),
                FieldArray::from_arr("b", arr_str32!["x", "y"]),
            ]),
        );
        assert_eq!(t.n_rows, 2);
        assert_eq!(t.col(1).name(), "b");
        assert!(t.col_by_name("a").is_some());
        assert!(t.col_by_name("zzz").is_none());
    }

    #[test]
    fn test_try_new_rejects_ragged_columns() {
        let r = Table::try_new(
            "t".into(),
            vec![
                FieldArray::from_arr("a", arr_i32![1, 2]),
                FieldArray::from_arr("b", arr_i32![1]),
            ],
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_add_col_and_slice() {
        let mut t = Table::new_empty();
        t.add_col(FieldArray::from_arr("a", arr_i32![1, 2, 3])).unwrap();
        assert_eq!(t.n_rows, 3);
        assert!(t.add_col(FieldArray::from_arr("b", arr_i32![1])).is_err());
        let s = t.slice_clone(1, 2);
        assert_eq!(s.n_rows, 2);
        assert_eq!(s.col(0).array.i32().unwrap().data.as_slice(), &[2, 3]);
    }
}
