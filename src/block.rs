use crate::column::column_value::{append_column_item, ColumnValue};
use crate::column::ColumnRef;
use crate::types::Type;
use crate::{Error, Result};
use std::sync::Arc;

/// Block metadata
#[derive(Debug, Clone, Default)]
pub struct BlockInfo {
    pub is_overflows: u8,
    pub bucket_num: i32,
}

/// A block is a collection of named columns with the same number of rows,
/// plus a per-cell staging row used to build up rows before `append_row`
/// commits them.
///
/// The staging row has one cell per column. `set_const` binds a value that
/// is reused by every future `append_row` (the cell is never cleared after a
/// commit); `set_placeholder` binds a one-shot value that is cleared once
/// `append_row` consumes it. `placeholder_indexes` maps a placeholder's
/// positional index to the staging-row column it currently targets: binding
/// a const at column `k` shifts every placeholder at or past `k` one column
/// to the right, so callers filling placeholders positionally skip over
/// already-bound consts.
#[derive(Clone)]
pub struct Block {
    columns: Vec<ColumnItem>,
    rows: usize,
    info: BlockInfo,
    staging_row: Vec<Option<ColumnValue>>,
    staging_is_const: Vec<bool>,
    placeholder_indexes: Vec<usize>,
    poisoned: bool,
}

#[derive(Clone)]
struct ColumnItem {
    name: String,
    column: ColumnRef,
}

impl Block {
    /// Create a new empty block
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: 0,
            info: BlockInfo::default(),
            staging_row: Vec::new(),
            staging_is_const: Vec::new(),
            placeholder_indexes: Vec::new(),
            poisoned: false,
        }
    }

    /// Create a block with reserved capacity
    pub fn with_capacity(cols: usize, rows: usize) -> Self {
        Self {
            columns: Vec::with_capacity(cols),
            rows,
            info: BlockInfo::default(),
            staging_row: Vec::with_capacity(cols),
            staging_is_const: Vec::with_capacity(cols),
            placeholder_indexes: Vec::with_capacity(cols),
            poisoned: false,
        }
    }

    /// Append a named column to the block
    pub fn append_column(&mut self, name: impl Into<String>, column: ColumnRef) -> Result<()> {
        let name = name.into();

        if self.columns.is_empty() {
            self.rows = column.size();
        } else if column.size() != self.rows {
            return Err(Error::Validation(format!(
                "All columns in block must have same count of rows. Name: '{}', expected rows: {}, got: {}",
                name,
                self.rows,
                column.size()
            )));
        }

        self.columns.push(ColumnItem { name, column });
        self.staging_row.push(None);
        self.staging_is_const.push(false);
        self.placeholder_indexes.push(self.placeholder_indexes.len());
        Ok(())
    }

    /// Bind a literal to a column that every future `append_row` reuses.
    ///
    /// Shifts `placeholder_indexes[column_idx..]` by +1, so positional
    /// placeholder binding via `set_placeholder` skips this column from now
    /// on.
    pub fn set_const(&mut self, column_idx: usize, value: ColumnValue) -> Result<()> {
        if column_idx >= self.columns.len() {
            return Err(Error::InvalidArgument(format!(
                "Column index out of range: {} >= {}",
                column_idx,
                self.columns.len()
            )));
        }

        self.staging_row[column_idx] = Some(value);
        self.staging_is_const[column_idx] = true;

        for idx in self.placeholder_indexes.iter_mut() {
            if *idx >= column_idx {
                *idx += 1;
            }
        }

        Ok(())
    }

    /// Write a value into the staging row at the column currently mapped to
    /// positional placeholder `placeholder_idx`.
    pub fn set_placeholder(&mut self, placeholder_idx: usize, value: ColumnValue) -> Result<()> {
        let column_idx = *self.placeholder_indexes.get(placeholder_idx).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Placeholder index out of range: {} >= {}",
                placeholder_idx,
                self.placeholder_indexes.len()
            ))
        })?;

        if column_idx >= self.columns.len() {
            return Err(Error::InvalidArgument(format!(
                "Placeholder {} maps past the last column ({} >= {})",
                placeholder_idx,
                column_idx,
                self.columns.len()
            )));
        }

        self.staging_row[column_idx] = Some(value);
        Ok(())
    }

    /// Commit the staging row into every column and increment `row_count`.
    ///
    /// On any per-column append failure the block is poisoned: earlier
    /// columns in this row have already been appended and are not rolled
    /// back, so the block must be discarded rather than reused.
    pub fn append_row(&mut self) -> Result<()> {
        if self.poisoned {
            return Err(Error::Usage(
                "Block is poisoned by a previous append_row failure and must be discarded".to_string(),
            ));
        }

        for i in 0..self.columns.len() {
            let name = self.columns[i].name.clone();

            let value = self.staging_row[i].as_ref().ok_or_else(|| {
                Error::Usage(format!("Column '{}' has no staged value for append_row", name))
            })?;

            let column_mut = Arc::get_mut(&mut self.columns[i].column).ok_or_else(|| {
                Error::Protocol(format!(
                    "Cannot append to shared column '{}' - column has multiple references",
                    name
                ))
            })?;

            if let Err(_e) = append_column_item(column_mut, value) {
                self.poisoned = true;
                return Err(Error::AppendFailed {
                    column: name,
                    row_index: self.rows,
                });
            }
        }

        self.rows += 1;
        for i in 0..self.staging_row.len() {
            if !self.staging_is_const[i] {
                self.staging_row[i] = None;
            }
        }

        Ok(())
    }

    /// Get the number of columns in the block
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows in the block
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Get column by index
    pub fn column(&self, index: usize) -> Option<ColumnRef> {
        self.columns.get(index).map(|item| item.column.clone())
    }

    /// Get column name by index
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|item| item.name.as_str())
    }

    /// Get column by name
    pub fn column_by_name(&self, name: &str) -> Option<ColumnRef> {
        self.columns
            .iter()
            .find(|item| item.name == name)
            .map(|item| item.column.clone())
    }

    /// Get block info
    pub fn info(&self) -> &BlockInfo {
        &self.info
    }

    /// Set block info
    pub fn set_info(&mut self, info: BlockInfo) {
        self.info = info;
    }

    /// Clear all data from all columns, keeping the column schema
    pub fn clear(&mut self) -> Result<()> {
        for item in &mut self.columns {
            let column_mut = Arc::get_mut(&mut item.column).ok_or_else(|| {
                Error::Protocol(format!(
                    "Cannot clear shared column '{}' - column has multiple references",
                    item.name
                ))
            })?;
            column_mut.clear();
        }
        self.rows = 0;
        for cell in &mut self.staging_row {
            *cell = None;
        }
        self.poisoned = false;
        Ok(())
    }

    /// Reserve capacity for at least `new_cap` rows in every column
    pub fn reserve(&mut self, new_cap: usize) -> Result<()> {
        for item in &mut self.columns {
            let column_mut = Arc::get_mut(&mut item.column).ok_or_else(|| {
                Error::Protocol(format!(
                    "Cannot reserve on shared column '{}' - column has multiple references",
                    item.name
                ))
            })?;
            column_mut.reserve(new_cap);
        }
        Ok(())
    }

    /// Refresh and validate row count
    pub fn refresh_row_count(&mut self) -> Result<usize> {
        if self.columns.is_empty() {
            self.rows = 0;
            return Ok(0);
        }

        let first_rows = self.columns[0].column.size();

        for item in &self.columns {
            let col_rows = item.column.size();
            if col_rows != first_rows {
                return Err(Error::Validation(format!(
                    "All columns in block must have same count of rows. Name: '{}', expected: {}, got: {}",
                    item.name, first_rows, col_rows
                )));
            }
        }

        self.rows = first_rows;
        Ok(first_rows)
    }

    /// Iterate over columns
    pub fn iter(&self) -> BlockIterator<'_> {
        BlockIterator {
            block: self,
            index: 0,
        }
    }

    /// Check if block is empty
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns.is_empty()
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over block columns
pub struct BlockIterator<'a> {
    block: &'a Block,
    index: usize,
}

impl<'a> Iterator for BlockIterator<'a> {
    type Item = (&'a str, &'a Type, ColumnRef);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.block.columns.len() {
            let item = &self.block.columns[self.index];
            self.index += 1;
            Some((
                &item.name,
                item.column.column_type(),
                item.column.clone(),
            ))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = (&'a str, &'a Type, ColumnRef);
    type IntoIter = BlockIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::ops::Index<usize> for Block {
    type Output = ColumnRef;

    fn index(&self, index: usize) -> &Self::Output {
        &self.columns[index].column
    }
}
