use std::collections::HashMap;
use std::fmt;

use log::debug;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::column::{AnySeries, ColumnReadGuard, Element};
use crate::error::{FrameError, FrameResult};
use crate::iterator::{RowCursor, RowSource};
use crate::options::{IteratorOptions, RangeOptions};
use crate::series::{resolve_position, resolve_row, Series, SeriesData};
use crate::value::{Value, ValueKind};

/// A row read back from a frame, keyed by series name.
pub type Row = HashMap<String, Value>;

/// Addresses a column by name or by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Name(String),
    Index(usize),
}

impl From<&str> for ColumnKey {
    fn from(name: &str) -> Self {
        ColumnKey::Name(name.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(name: String) -> Self {
        ColumnKey::Name(name)
    }
}

impl From<usize> for ColumnKey {
    fn from(index: usize) -> Self {
        ColumnKey::Index(index)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Name(name) => write!(f, "'{}'", name),
            ColumnKey::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// Values for one row, addressed in one of several ways.
///
/// Every variant must supply exactly one value per column.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// In column order.
    Positional(Vec<Value>),
    /// By series name.
    Named(HashMap<String, Value>),
    /// By column position.
    Indexed(HashMap<usize, Value>),
    /// By erased key: a string names a series, an integer is a position.
    Keyed(Vec<(Value, Value)>),
}

impl RowValues {
    pub fn len(&self) -> usize {
        match self {
            RowValues::Positional(values) => values.len(),
            RowValues::Named(values) => values.len(),
            RowValues::Indexed(values) => values.len(),
            RowValues::Keyed(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for RowValues {
    fn from(values: Vec<Value>) -> Self {
        RowValues::Positional(values)
    }
}

impl From<HashMap<String, Value>> for RowValues {
    fn from(values: HashMap<String, Value>) -> Self {
        RowValues::Named(values)
    }
}

impl From<HashMap<usize, Value>> for RowValues {
    fn from(values: HashMap<usize, Value>) -> Self {
        RowValues::Indexed(values)
    }
}

impl From<Vec<(Value, Value)>> for RowValues {
    fn from(values: Vec<(Value, Value)>) -> Self {
        RowValues::Keyed(values)
    }
}

/// Unlocked state of a frame: equal-length, uniquely named columns.
///
/// Methods taking `&mut self` reach the columns through
/// [`AnySeries::get_mut`] and never lock them. Methods taking `&self` take
/// each column's shared lock for the duration of the read.
#[derive(Debug, Default)]
pub struct FrameData {
    pub(crate) columns: Vec<Box<dyn AnySeries>>,
    n: usize,
}

impl FrameData {
    /// Builds a frame from columns that must have equal row counts and unique names.
    pub fn new(mut columns: Vec<Box<dyn AnySeries>>) -> FrameResult<Self> {
        let mut n = 0;
        let mut names: Vec<String> = Vec::with_capacity(columns.len());
        for (position, column) in columns.iter_mut().enumerate() {
            let column = column.get_mut();
            if position == 0 {
                n = column.len();
            } else if column.len() != n {
                return Err(FrameError::row_count(column.name(), n, column.len()));
            }
            if names.iter().any(|name| name == column.name()) {
                return Err(FrameError::DuplicateName(column.name().to_string()));
            }
            names.push(column.name().to_string());
        }
        Ok(Self { columns, n })
    }

    /// Returns the cached row count shared by every column.
    pub fn n_rows(&self) -> usize {
        self.n
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Series names in column order.
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name()).collect()
    }

    /// Position of the series called `name`.
    pub fn name_to_column(&self, name: &str) -> FrameResult<usize> {
        self.columns
            .iter()
            .position(|column| column.read().name() == name)
            .ok_or_else(|| FrameError::NameNotFound(name.to_string()))
    }

    pub(crate) fn resolve_key(&self, key: &ColumnKey) -> FrameResult<usize> {
        match key {
            ColumnKey::Name(name) => self.name_to_column(name),
            ColumnKey::Index(index) => self.check_column(*index),
        }
    }

    fn check_column(&self, index: usize) -> FrameResult<usize> {
        if index >= self.columns.len() {
            return Err(FrameError::index_out_of_range(index as isize, self.columns.len()));
        }
        Ok(index)
    }

    fn resolve_value_key(&self, key: &Value) -> FrameResult<usize> {
        match key {
            Value::Str(name) => self.name_to_column(name),
            other => match other.as_position() {
                Some(index) => self.check_column(index),
                None => Err(FrameError::MixedKeyType(format!("{} ({})", other, other.kind()))),
            },
        }
    }

    /// Shared views of the columns, in order, behind the type-erased façade.
    ///
    /// Columns owned by a frame are never handed out for writing: row counts
    /// and names only change through the frame's own operations.
    pub fn columns(&self) -> impl Iterator<Item = ColumnReadGuard<'_>> + '_ {
        self.columns.iter().map(|column| column.read())
    }

    /// Shared view of one column.
    pub fn column(&self, key: impl Into<ColumnKey>) -> FrameResult<ColumnReadGuard<'_>> {
        let index = self.resolve_key(&key.into())?;
        Ok(self.columns[index].read())
    }

    /// Renames a column; the new name must not belong to another column.
    pub fn rename_column(&mut self, key: impl Into<ColumnKey>, name: &str) -> FrameResult<()> {
        let index = self.resolve_key(&key.into())?;
        if let Ok(existing) = self.name_to_column(name) {
            if existing != index {
                return Err(FrameError::DuplicateName(name.to_string()));
            }
        }
        let column = self.columns[index].get_mut();
        debug!("column '{}' renamed to '{}'", column.name(), name);
        column.rename(name);
        Ok(())
    }

    /// Typed, read-only access to a column; fails with
    /// [`FrameError::TypeMismatch`] when the column does not hold `T`.
    pub fn series<T: Element>(
        &self,
        key: impl Into<ColumnKey>,
    ) -> FrameResult<RwLockReadGuard<'_, SeriesData<T>>> {
        let index = self.resolve_key(&key.into())?;
        let column = &self.columns[index];
        match column.as_any().downcast_ref::<Series<T>>() {
            Some(series) => Ok(series.read()),
            None => {
                let found = column.read();
                Err(FrameError::type_mismatch(found.name(), T::KIND, found.kind()))
            }
        }
    }

    /// Reads the row at `row` (negative counts from the end).
    pub fn row(&self, row: isize) -> FrameResult<Row> {
        let index = resolve_row(row, self.n)? as isize;
        self.columns
            .iter()
            .map(|column| -> FrameResult<(String, Value)> {
                let column = column.read();
                Ok((column.name().to_string(), column.value(index)?))
            })
            .collect()
    }

    /// Orders `values` by column, checking arity and key validity.
    fn resolve_values(&self, values: RowValues) -> FrameResult<Vec<Value>> {
        let width = self.columns.len();
        if values.len() != width {
            return Err(FrameError::arity(width, values.len()));
        }
        match values {
            RowValues::Positional(values) => Ok(values),
            RowValues::Named(values) => self.place(values.into_iter().map(
                |(name, value)| -> FrameResult<(usize, Value)> {
                    Ok((self.name_to_column(&name)?, value))
                },
            )),
            RowValues::Indexed(values) => self.place(values.into_iter().map(
                |(index, value)| -> FrameResult<(usize, Value)> {
                    Ok((self.check_column(index)?, value))
                },
            )),
            RowValues::Keyed(values) => self.place(values.into_iter().map(
                |(key, value)| -> FrameResult<(usize, Value)> {
                    Ok((self.resolve_value_key(&key)?, value))
                },
            )),
        }
    }

    fn place(&self, cells: impl Iterator<Item = FrameResult<(usize, Value)>>) -> FrameResult<Vec<Value>> {
        let width = self.columns.len();
        let mut slots: Vec<Option<Value>> = vec![None; width];
        for cell in cells {
            let (index, value) = cell?;
            if slots[index].is_some() {
                return Err(FrameError::DuplicateName(self.columns[index].name()));
            }
            slots[index] = Some(value);
        }
        let filled = slots.iter().filter(|slot| slot.is_some()).count();
        slots
            .into_iter()
            .collect::<Option<Vec<Value>>>()
            .ok_or_else(|| FrameError::arity(width, filled))
    }

    fn check_types(&self, cells: &[Value]) -> FrameResult<()> {
        for (column, value) in self.columns.iter().zip(cells) {
            let column = column.read();
            if !column.accepts(value) {
                return Err(FrameError::type_mismatch(column.name(), column.kind(), value.kind()));
            }
        }
        Ok(())
    }

    /// Checks that every column holds `expected` rows and caches the count.
    fn sync_row_count(&mut self, expected: usize) -> FrameResult<()> {
        for column in self.columns.iter_mut() {
            let column = column.get_mut();
            if column.len() != expected {
                return Err(FrameError::row_count(column.name(), expected, column.len()));
            }
        }
        if let Some(last) = self.columns.last_mut() {
            self.n = last.get_mut().len();
        }
        Ok(())
    }

    /// Inserts one row before `row`; `row == n_rows()` appends.
    ///
    /// Arity, keys, value types and the row counts of all columns are checked
    /// before any column changes. Should a column still refuse its value, or
    /// the columns end up uneven, the inserted cells are removed again before
    /// the error is returned.
    pub fn insert(&mut self, row: isize, values: impl Into<RowValues>) -> FrameResult<()> {
        let cells = self.resolve_values(values.into())?;
        let position = resolve_position(row, self.n)?;
        self.check_types(&cells)?;
        self.sync_row_count(self.n)?;

        for (index, value) in cells.into_iter().enumerate() {
            if let Err(err) = self.columns[index].get_mut().insert_value(position as isize, value) {
                debug!("insert at row {} failed on column {}, rolling back", position, index);
                self.undo_insert(position, index)?;
                return Err(err);
            }
        }
        if let Err(err) = self.sync_row_count(self.n + 1) {
            debug!("insert at row {} left uneven columns, rolling back", position);
            self.undo_insert(position, self.columns.len())?;
            return Err(err);
        }
        Ok(())
    }

    /// Removes the cell inserted at `position` from the first `count` columns.
    fn undo_insert(&mut self, position: usize, count: usize) -> FrameResult<()> {
        for column in self.columns[..count].iter_mut() {
            column.get_mut().remove(position as isize)?;
        }
        Ok(())
    }

    /// Adds one row after the last.
    pub fn append(&mut self, values: impl Into<RowValues>) -> FrameResult<()> {
        self.insert(self.n as isize, values)
    }

    /// Adds one row before the first.
    pub fn prepend(&mut self, values: impl Into<RowValues>) -> FrameResult<()> {
        self.insert(0, values)
    }

    /// Removes the row at `row` from every column.
    pub fn remove(&mut self, row: isize) -> FrameResult<()> {
        let index = resolve_row(row, self.n)? as isize;
        self.sync_row_count(self.n)?;
        for column in self.columns.iter_mut() {
            column.get_mut().remove(index)?;
        }
        self.sync_row_count(self.n - 1)
    }

    /// Overwrites one cell.
    pub fn update(&mut self, row: isize, key: impl Into<ColumnKey>, value: Value) -> FrameResult<()> {
        let index = resolve_row(row, self.n)? as isize;
        let column = self.resolve_key(&key.into())?;
        self.columns[column].get_mut().update_value(index, value)
    }

    /// Overwrites every cell of one row.
    pub fn update_row(&mut self, row: isize, values: impl Into<RowValues>) -> FrameResult<()> {
        let index = resolve_row(row, self.n)? as isize;
        let cells = self.resolve_values(values.into())?;
        self.write_row(index, cells)
    }

    /// Writes cells already ordered by column.
    pub(crate) fn write_row(&mut self, row: isize, cells: Vec<Value>) -> FrameResult<()> {
        self.check_types(&cells)?;
        for (column, value) in self.columns.iter_mut().zip(cells) {
            column.get_mut().update_value(row, value)?;
        }
        Ok(())
    }

    pub(crate) fn prepare_row(&self, values: RowValues) -> FrameResult<Vec<Value>> {
        let cells = self.resolve_values(values)?;
        self.check_types(&cells)?;
        Ok(cells)
    }

    /// Swaps two rows across every column.
    pub fn swap(&mut self, a: isize, b: isize) -> FrameResult<()> {
        let a = resolve_row(a, self.n)? as isize;
        let b = resolve_row(b, self.n)? as isize;
        for column in self.columns.iter_mut() {
            column.get_mut().swap(a, b)?;
        }
        Ok(())
    }

    /// Rearranges the columns into the order given by `names`, which must name
    /// every column exactly once.
    pub fn reorder_columns<S: AsRef<str>>(&mut self, names: &[S]) -> FrameResult<()> {
        if names.len() != self.columns.len() {
            return Err(FrameError::arity(self.columns.len(), names.len()));
        }
        let mut order = Vec::with_capacity(names.len());
        for name in names {
            let index = self.name_to_column(name.as_ref())?;
            if order.contains(&index) {
                return Err(FrameError::DuplicateName(name.as_ref().to_string()));
            }
            order.push(index);
        }

        let mut slots: Vec<Option<Box<dyn AnySeries>>> = self.columns.drain(..).map(Some).collect();
        self.columns = order.iter().filter_map(|&index| slots[index].take()).collect();
        debug!("columns reordered to {:?}", self.names());
        Ok(())
    }

    /// Adds a column at `position`, or last when `None`.
    ///
    /// The column must have `n_rows()` rows, unless the frame has no columns
    /// yet, in which case it sets the row count.
    pub fn add_column(
        &mut self,
        column: impl Into<Box<dyn AnySeries>>,
        position: Option<usize>,
    ) -> FrameResult<()> {
        let mut column = column.into();
        let (name, rows) = {
            let data = column.get_mut();
            (data.name().to_string(), data.len())
        };
        if !self.columns.is_empty() && rows != self.n {
            return Err(FrameError::row_count(name, self.n, rows));
        }
        if self.name_to_column(&name).is_ok() {
            return Err(FrameError::DuplicateName(name));
        }
        let position = position.unwrap_or(self.columns.len());
        if position > self.columns.len() {
            return Err(FrameError::index_out_of_range(position as isize, self.columns.len()));
        }

        if self.columns.is_empty() {
            self.n = rows;
        }
        self.columns.insert(position, column);
        debug!("column '{}' added at position {}", name, position);
        Ok(())
    }

    /// Detaches a column and hands it back.
    pub fn remove_column(&mut self, key: impl Into<ColumnKey>) -> FrameResult<Box<dyn AnySeries>> {
        let index = self.resolve_key(&key.into())?;
        let mut column = self.columns.remove(index);
        if self.columns.is_empty() {
            self.n = 0;
        }
        debug!("column '{}' removed", column.get_mut().name());
        Ok(column)
    }

    /// Copies the rows selected by `range` into an independent frame.
    pub fn copy(&self, range: RangeOptions) -> FrameResult<DataFrame> {
        let columns = if self.n == 0 {
            self.clone_empty(0)
        } else {
            self.columns
                .iter()
                .map(|column| column.read().copy_range(range))
                .collect::<FrameResult<Vec<_>>>()?
        };
        DataFrame::new(columns)
    }

    /// Empty columns of the same types, names and comparators.
    pub(crate) fn clone_empty(&self, capacity: usize) -> Vec<Box<dyn AnySeries>> {
        self.columns
            .iter()
            .map(|column| column.read().clone_empty(capacity))
            .collect()
    }

    /// Overwrites every cell with values from `fill`, which receives the
    /// element kind of the column being filled.
    pub fn fill_with(&mut self, mut fill: impl FnMut(ValueKind) -> Value) -> FrameResult<()> {
        for column in self.columns.iter_mut() {
            let column = column.get_mut();
            let kind = column.kind();
            column.fill_with(&mut || fill(kind))?;
        }
        Ok(())
    }

    /// Cursor over the rows; the caller is expected to hold the frame lock.
    pub fn iter(&self, options: IteratorOptions) -> RowCursor<&Self> {
        RowCursor::new(self, options)
    }
}

impl<'a> RowSource for &'a FrameData {
    type Item = Row;

    fn row_count(&self) -> usize {
        self.n
    }

    fn fetch(&self, row: usize) -> Option<Row> {
        if row >= self.n {
            return None;
        }
        self.row(row as isize).ok()
    }
}

/// A frame guarded by its own read/write lock.
///
/// Each method locks the frame for the duration of that call only. Take
/// [`read`](DataFrame::read) or [`write`](DataFrame::write) once to run several
/// steps against the guarded [`FrameData`] without re-locking.
#[derive(Default)]
pub struct DataFrame {
    data: RwLock<FrameData>,
}

impl DataFrame {
    /// Builds a frame from equal-length, uniquely named columns.
    ///
    /// ```
    /// use rustframe::{DataFrame, Series};
    ///
    /// let df = DataFrame::new(vec![
    ///     Series::from_values("a", vec![1, 2, 3]).into(),
    ///     Series::from_values("b", vec![1.5, 2.5, 3.5]).into(),
    /// ])?;
    /// assert_eq!(df.n_rows(), 3);
    /// # Ok::<(), rustframe::FrameError>(())
    /// ```
    pub fn new(columns: Vec<Box<dyn AnySeries>>) -> FrameResult<Self> {
        Ok(Self::from_data(FrameData::new(columns)?))
    }

    /// Wraps already validated frame data.
    pub fn from_data(data: FrameData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Takes the shared lock until the guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, FrameData> {
        self.data.read()
    }

    /// Takes the exclusive lock until the guard is dropped.
    pub fn write(&self) -> RwLockWriteGuard<'_, FrameData> {
        self.data.write()
    }

    /// Lock-free access through an exclusive borrow.
    pub fn get_mut(&mut self) -> &mut FrameData {
        self.data.get_mut()
    }

    /// Unwraps the frame data, consuming the lock.
    pub fn into_data(self) -> FrameData {
        self.data.into_inner()
    }

    /// Returns the number of rows.
    pub fn n_rows(&self) -> usize {
        self.read().n_rows()
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.read().column_count()
    }

    /// Series names in column order.
    pub fn names(&self) -> Vec<String> {
        self.read().names()
    }

    /// Position of the series called `name`.
    pub fn name_to_column(&self, name: &str) -> FrameResult<usize> {
        self.read().name_to_column(name)
    }

    /// Reads one row keyed by series name.
    pub fn row(&self, row: isize) -> FrameResult<Row> {
        self.read().row(row)
    }

    /// Inserts one row before `row`. See [`FrameData::insert`].
    pub fn insert(&self, row: isize, values: impl Into<RowValues>) -> FrameResult<()> {
        self.write().insert(row, values)
    }

    /// Adds one row after the last.
    pub fn append(&self, values: impl Into<RowValues>) -> FrameResult<()> {
        self.write().append(values)
    }

    /// Adds one row before the first.
    pub fn prepend(&self, values: impl Into<RowValues>) -> FrameResult<()> {
        self.write().prepend(values)
    }

    /// Removes the row at `row` from every column.
    pub fn remove(&self, row: isize) -> FrameResult<()> {
        self.write().remove(row)
    }

    /// Overwrites one cell.
    pub fn update(&self, row: isize, key: impl Into<ColumnKey>, value: Value) -> FrameResult<()> {
        self.write().update(row, key, value)
    }

    /// Overwrites every cell of one row.
    pub fn update_row(&self, row: isize, values: impl Into<RowValues>) -> FrameResult<()> {
        self.write().update_row(row, values)
    }

    /// Swaps two rows across every column.
    pub fn swap(&self, a: isize, b: isize) -> FrameResult<()> {
        self.write().swap(a, b)
    }

    /// Rearranges the columns into the order given by `names`.
    pub fn reorder_columns<S: AsRef<str>>(&self, names: &[S]) -> FrameResult<()> {
        self.write().reorder_columns(names)
    }

    /// Adds a column at `position`, or last when `None`.
    pub fn add_column(
        &self,
        column: impl Into<Box<dyn AnySeries>>,
        position: Option<usize>,
    ) -> FrameResult<()> {
        self.write().add_column(column, position)
    }

    /// Renames a column. See [`FrameData::rename_column`].
    pub fn rename_column(&self, key: impl Into<ColumnKey>, name: &str) -> FrameResult<()> {
        self.write().rename_column(key, name)
    }

    /// Detaches a column and hands it back.
    pub fn remove_column(&self, key: impl Into<ColumnKey>) -> FrameResult<Box<dyn AnySeries>> {
        self.write().remove_column(key)
    }

    /// Copies the rows selected by `range` into an independent frame.
    pub fn copy(&self, range: RangeOptions) -> FrameResult<DataFrame> {
        self.read().copy(range)
    }

    /// Overwrites every cell with values from `fill`.
    pub fn fill_with(&self, fill: impl FnMut(ValueKind) -> Value) -> FrameResult<()> {
        self.write().fill_with(fill)
    }

    /// Cursor that takes the shared frame lock for every step.
    pub fn iter(&self, options: IteratorOptions) -> RowCursor<&Self> {
        RowCursor::new(self, options)
    }
}

impl fmt::Debug for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.try_read() {
            Some(data) => fmt::Debug::fmt(&*data, f),
            None => f.write_str("DataFrame { <locked> }"),
        }
    }
}

impl<'a> RowSource for &'a DataFrame {
    type Item = Row;

    fn row_count(&self) -> usize {
        self.read().n_rows()
    }

    fn fetch(&self, row: usize) -> Option<Row> {
        let data = self.read();
        (&*data).fetch(row)
    }
}

impl From<FrameData> for DataFrame {
    fn from(data: FrameData) -> Self {
        DataFrame::from_data(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> FrameResult<FrameData> {
        FrameData::new(vec![
            Series::from_values("name", vec!["ann".to_string(), "bob".to_string()]).into(),
            Series::from_values("age", vec![31, 25]).into(),
        ])
    }

    fn lengths(data: &mut FrameData) -> Vec<usize> {
        data.columns.iter_mut().map(|column| column.get_mut().len()).collect()
    }

    #[test]
    fn insert_refuses_uneven_columns_before_writing() -> FrameResult<()> {
        let mut data = people()?;
        data.columns[1].get_mut().append_value(Value::Int(99))?;

        let result = data.append(vec![Value::from("cy"), Value::Int(47)]);
        assert!(matches!(
            result,
            Err(FrameError::RowCountMismatch { ref column, expected: 2, found: 3 }) if column == "age"
        ));
        assert_eq!(lengths(&mut data), vec![2, 3]);
        assert_eq!(data.n_rows(), 2);
        Ok(())
    }

    #[test]
    fn remove_refuses_uneven_columns() -> FrameResult<()> {
        let mut data = people()?;
        data.columns[0].get_mut().remove(0)?;

        assert!(matches!(data.remove(0), Err(FrameError::RowCountMismatch { .. })));
        assert_eq!(lengths(&mut data), vec![1, 2]);
        Ok(())
    }
}
