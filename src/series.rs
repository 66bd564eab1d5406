use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cancel::CancelToken;
use crate::column::{AnySeries, Column, ColumnReadGuard, ColumnWriteGuard, Element};
use crate::compare::{is_equal_default, CompareFn};
use crate::error::{FrameError, FrameResult};
use crate::iterator::{RowCursor, RowSource};
use crate::options::{IsEqualOptions, IteratorOptions, RangeOptions, SeriesInit, SortOptions};
use crate::value::{Value, ValueKind};

/// Renders one value of a series as text.
pub type ValueFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Formatter used until [`SeriesData::set_formatter`] installs another one.
/// `Null` renders as `NaN`.
pub fn default_value_formatter(value: &Value) -> String {
    value.to_string()
}

/// Unlocked state of a series: name, comparators and the ordered values.
///
/// Every method here runs without locking. Reach it through
/// [`Series::read`], [`Series::write`] or [`Series::get_mut`] when composing
/// several steps under one lock.
pub struct SeriesData<T: Element> {
    name: String,
    type_name: String,
    formatter: ValueFormatter,
    is_equal: CompareFn<T>,
    is_less_than: Option<CompareFn<T>>,
    values: Vec<T>,
}

impl<T: Element> SeriesData<T> {
    /// Creates an empty series with the given `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_values(name, Vec::new())
    }

    pub fn from_values(name: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            type_name: T::type_name(),
            formatter: Arc::new(default_value_formatter),
            is_equal: Arc::new(is_equal_default::<T>),
            is_less_than: None,
            values,
        }
    }

    /// Creates a series holding `values`, padded with the fill value up to
    /// `init.size` rows and reserving at least `init.capacity` slots.
    pub fn with_init(name: impl Into<String>, init: SeriesInit, mut values: Vec<T>) -> Self {
        let size = init.size.max(values.len());
        let capacity = init.capacity.max(size);
        values.reserve_exact(capacity - values.len());
        values.resize_with(size, T::fill_value);
        Self::from_values(name, values)
    }

    /// Creates an empty series sharing this one's name, formatter and comparators.
    pub fn empty_like(&self, capacity: usize) -> Self {
        Self {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            formatter: Arc::clone(&self.formatter),
            is_equal: Arc::clone(&self.is_equal),
            is_less_than: self.is_less_than.clone(),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Returns the series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view of the values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Translates `row` (negative counts from the end) into an index in `[0, len)`.
    pub fn resolve(&self, row: isize) -> FrameResult<usize> {
        resolve_row(row, self.values.len())
    }

    /// Borrows the value at `row` (negative counts from the end).
    pub fn value(&self, row: isize) -> FrameResult<&T> {
        let index = self.resolve(row)?;
        Ok(&self.values[index])
    }

    pub fn value_string(&self, row: isize) -> FrameResult<String> {
        let value = self.value(row)?.clone().into_value();
        Ok((self.formatter)(&value))
    }

    /// Inserts `values` before `row`, shifting the following rows down.
    /// `row == len` appends.
    pub fn insert(&mut self, row: isize, values: impl IntoIterator<Item = T>) -> FrameResult<()> {
        let position = resolve_position(row, self.values.len())?;
        self.values.splice(position..position, values);
        Ok(())
    }

    /// Appends `values` and returns the row of the first appended value.
    pub fn append(&mut self, values: impl IntoIterator<Item = T>) -> usize {
        let row = self.values.len();
        self.values.extend(values);
        row
    }

    pub fn prepend(&mut self, values: impl IntoIterator<Item = T>) {
        self.values.splice(0..0, values);
    }

    /// Removes and returns the value at `row`, shifting the following rows up.
    pub fn remove(&mut self, row: isize) -> FrameResult<T> {
        let index = self.resolve(row)?;
        Ok(self.values.remove(index))
    }

    /// Drops every value.
    pub fn reset(&mut self) {
        self.values = Vec::new();
    }

    /// Overwrites the value at `row`.
    pub fn update(&mut self, row: isize, value: T) -> FrameResult<()> {
        let index = self.resolve(row)?;
        self.values[index] = value;
        Ok(())
    }

    /// Swaps the values at rows `a` and `b`.
    pub fn swap(&mut self, a: isize, b: isize) -> FrameResult<()> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        self.values.swap(a, b);
        Ok(())
    }

    /// Installs a formatter; `None` restores [`default_value_formatter`].
    pub fn set_formatter(&mut self, formatter: Option<ValueFormatter>) {
        self.formatter = formatter.unwrap_or_else(|| Arc::new(default_value_formatter));
    }

    /// Installs an equality comparator; `None` restores [`is_equal_default`].
    pub fn set_is_equal(&mut self, compare: Option<CompareFn<T>>) {
        self.is_equal = compare.unwrap_or_else(|| Arc::new(is_equal_default::<T>));
    }

    /// Installs or clears the ordering comparator required for sorting.
    pub fn set_is_less_than(&mut self, compare: Option<CompareFn<T>>) {
        self.is_less_than = compare;
    }

    pub fn is_equal_fn(&self, a: &T, b: &T) -> bool {
        (self.is_equal)(a, b)
    }

    pub fn is_less_than_fn(&self, a: &T, b: &T) -> FrameResult<bool> {
        Ok(self.ordering()?(a, b))
    }

    pub(crate) fn ordering(&self) -> FrameResult<&CompareFn<T>> {
        self.is_less_than
            .as_ref()
            .ok_or_else(|| FrameError::MissingComparator(self.name.clone()))
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<T> {
        &mut self.values
    }

    /// Cursor over the values; the caller is expected to hold the lock.
    pub fn iter(&self, options: IteratorOptions) -> RowCursor<&Self> {
        RowCursor::new(self, options)
    }

    /// Copies the rows selected by `range` into an independent series.
    pub fn copy(&self, range: RangeOptions) -> FrameResult<Series<T>> {
        if self.values.is_empty() {
            return Ok(Series::from_data(self.empty_like(0)));
        }
        let (start, end) = range.limits(self.values.len())?;
        let mut copy = self.empty_like(end - start + 1);
        copy.values.extend_from_slice(&self.values[start..=end]);
        Ok(Series::from_data(copy))
    }

    /// Overwrites every row with a value produced by `fill`.
    pub fn fill_with(&mut self, mut fill: impl FnMut() -> T) {
        for slot in self.values.iter_mut() {
            *slot = fill();
        }
    }

    /// Converts an erased value for storage; `Null` becomes the fill value.
    pub fn coerce(&self, value: Value) -> FrameResult<T> {
        if value.is_null() {
            return Ok(T::fill_value());
        }
        T::from_value(value)
            .map_err(|found| FrameError::type_mismatch(self.name.clone(), T::KIND, found.kind()))
    }
}

pub(crate) fn resolve_row(row: isize, len: usize) -> FrameResult<usize> {
    let index = if row < 0 { len as isize + row } else { row };
    if index < 0 || index as usize >= len {
        return Err(FrameError::index_out_of_range(row, len));
    }
    Ok(index as usize)
}

/// Like [`resolve_row`], but `len` itself is accepted as the append position.
pub(crate) fn resolve_position(row: isize, len: usize) -> FrameResult<usize> {
    let position = if row < 0 { len as isize + row } else { row };
    if position < 0 || position as usize > len {
        return Err(FrameError::index_out_of_range(row, len));
    }
    Ok(position as usize)
}

impl<T: Element> fmt::Debug for SeriesData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesData")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("ordered", &self.is_less_than.is_some())
            .field("values", &self.values)
            .finish()
    }
}

/// Summary form: at most the first three and last three values.
impl<T: Element> fmt::Display for SeriesData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.values.len();
        write!(f, "{}: [ ", self.name)?;
        let render = |row: usize| (self.formatter)(&self.values[row].clone().into_value());
        if count > 6 {
            for (position, row) in [0, 1, 2, count - 3, count - 2, count - 1].into_iter().enumerate() {
                if position == 3 {
                    f.write_str("... ")?;
                }
                write!(f, "{} ", render(row))?;
            }
        } else {
            for row in 0..count {
                write!(f, "{} ", render(row))?;
            }
        }
        f.write_str("]")
    }
}

impl<'a, T: Element> RowSource for &'a SeriesData<T> {
    type Item = T;

    fn row_count(&self) -> usize {
        self.values.len()
    }

    fn fetch(&self, row: usize) -> Option<T> {
        self.values.get(row).cloned()
    }
}

impl<T: Element> Column for SeriesData<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn value(&self, row: isize) -> FrameResult<Value> {
        Ok(SeriesData::value(self, row)?.clone().into_value())
    }

    fn value_string(&self, row: isize) -> FrameResult<String> {
        SeriesData::value_string(self, row)
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is_null() || T::from_value(value.clone()).is_ok()
    }

    fn insert_value(&mut self, row: isize, value: Value) -> FrameResult<()> {
        let typed = self.coerce(value)?;
        self.insert(row, [typed])
    }

    fn append_value(&mut self, value: Value) -> FrameResult<usize> {
        let typed = self.coerce(value)?;
        Ok(self.append([typed]))
    }

    fn prepend_value(&mut self, value: Value) -> FrameResult<()> {
        let typed = self.coerce(value)?;
        self.prepend([typed]);
        Ok(())
    }

    fn update_value(&mut self, row: isize, value: Value) -> FrameResult<()> {
        let typed = self.coerce(value)?;
        self.update(row, typed)
    }

    fn remove(&mut self, row: isize) -> FrameResult<()> {
        SeriesData::remove(self, row).map(drop)
    }

    fn reset(&mut self) {
        SeriesData::reset(self);
    }

    fn swap(&mut self, a: isize, b: isize) -> FrameResult<()> {
        SeriesData::swap(self, a, b)
    }

    fn set_formatter(&mut self, formatter: Option<ValueFormatter>) {
        SeriesData::set_formatter(self, formatter);
    }

    fn set_is_equal_values(&mut self, compare: Option<CompareFn<Value>>) {
        self.set_is_equal(compare.map(erase_compare::<T>));
    }

    fn set_is_less_than_values(&mut self, compare: Option<CompareFn<Value>>) {
        self.set_is_less_than(compare.map(erase_compare::<T>));
    }

    fn is_equal_values(&self, a: &Value, b: &Value) -> FrameResult<bool> {
        let a = self.coerce(a.clone())?;
        let b = self.coerce(b.clone())?;
        Ok(self.is_equal_fn(&a, &b))
    }

    fn is_less_than_values(&self, a: &Value, b: &Value) -> FrameResult<bool> {
        let a = self.coerce(a.clone())?;
        let b = self.coerce(b.clone())?;
        self.is_less_than_fn(&a, &b)
    }

    fn has_ordering(&self) -> bool {
        self.is_less_than.is_some()
    }

    fn rows_equal(&self, a: usize, b: usize) -> bool {
        (self.is_equal)(&self.values[a], &self.values[b])
    }

    fn row_less(&self, a: usize, b: usize) -> FrameResult<bool> {
        Ok(self.ordering()?(&self.values[a], &self.values[b]))
    }

    fn permute(&mut self, order: &[usize]) {
        self.values = order.iter().map(|&row| self.values[row].clone()).collect();
    }

    fn sort(&mut self, token: &CancelToken, options: SortOptions) -> FrameResult<bool> {
        SeriesData::sort(self, token, options)
    }

    fn copy_range(&self, range: RangeOptions) -> FrameResult<Box<dyn AnySeries>> {
        Ok(Box::new(self.copy(range)?))
    }

    fn clone_empty(&self, capacity: usize) -> Box<dyn AnySeries> {
        Box::new(Series::from_data(self.empty_like(capacity)))
    }

    fn fill_with(&mut self, fill: &mut dyn FnMut() -> Value) -> FrameResult<()> {
        for row in 0..self.values.len() {
            self.values[row] = self.coerce(fill())?;
        }
        Ok(())
    }

    fn is_equal_column(
        &self,
        token: &CancelToken,
        other: &dyn Column,
        options: IsEqualOptions,
    ) -> FrameResult<bool> {
        match other.as_any().downcast_ref::<SeriesData<T>>() {
            Some(other) => self.is_equal(token, other, options),
            None => Ok(false),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn erase_compare<T: Element>(compare: CompareFn<Value>) -> CompareFn<T> {
    Arc::new(move |a: &T, b: &T| compare(&a.clone().into_value(), &b.clone().into_value()))
}

/// A named, typed column guarded by its own read/write lock.
///
/// Each method locks for the duration of that call only. To run several steps
/// atomically, take [`read`](Series::read) or [`write`](Series::write) once and
/// call the same operations on the guarded [`SeriesData`].
pub struct Series<T: Element> {
    data: RwLock<SeriesData<T>>,
}

impl<T: Element> Series<T> {
    /// Creates an empty series with the given `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_data(SeriesData::new(name))
    }

    /// Creates a series holding `values`.
    ///
    /// ```
    /// use rustframe::Series;
    ///
    /// let x = Series::from_values("x", vec![1.0, 2.0, 3.0]);
    /// assert_eq!(x.n_rows(), 3);
    /// ```
    pub fn from_values(name: impl Into<String>, values: Vec<T>) -> Self {
        Self::from_data(SeriesData::from_values(name, values))
    }

    /// Creates a pre-sized series. See [`SeriesData::with_init`].
    pub fn with_init(name: impl Into<String>, init: SeriesInit, values: Vec<T>) -> Self {
        Self::from_data(SeriesData::with_init(name, init, values))
    }

    /// Wraps series data in its own lock.
    pub fn from_data(data: SeriesData<T>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Builder-style variant of [`SeriesData::set_is_less_than`].
    pub fn with_is_less_than(mut self, compare: CompareFn<T>) -> Self {
        self.data.get_mut().set_is_less_than(Some(compare));
        self
    }

    /// Takes the shared lock until the guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, SeriesData<T>> {
        self.data.read()
    }

    /// Takes the exclusive lock until the guard is dropped.
    pub fn write(&self) -> RwLockWriteGuard<'_, SeriesData<T>> {
        self.data.write()
    }

    /// Lock-free access through an exclusive borrow.
    pub fn get_mut(&mut self) -> &mut SeriesData<T> {
        self.data.get_mut()
    }

    /// Unwraps the series data, consuming the lock.
    pub fn into_data(self) -> SeriesData<T> {
        self.data.into_inner()
    }

    /// Returns a copy of the series name.
    pub fn name(&self) -> String {
        self.read().name().to_string()
    }

    /// Renames the series.
    pub fn rename(&self, name: impl Into<String>) {
        self.write().rename(name);
    }

    /// Returns the element type tag, e.g. `f64`.
    pub fn type_name(&self) -> String {
        self.read().type_name().to_string()
    }

    /// Returns the number of rows.
    pub fn n_rows(&self) -> usize {
        self.read().len()
    }

    /// Returns a copy of the value at `row` (negative counts from the end).
    pub fn value(&self, row: isize) -> FrameResult<T> {
        self.read().value(row).cloned()
    }

    /// Renders the value at `row` through the series' formatter.
    pub fn value_string(&self, row: isize) -> FrameResult<String> {
        self.read().value_string(row)
    }

    /// Inserts `values` before `row`; `row == n_rows()` appends.
    pub fn insert(&self, row: isize, values: impl IntoIterator<Item = T>) -> FrameResult<()> {
        self.write().insert(row, values)
    }

    /// Appends `values` and returns the row of the first one.
    pub fn append(&self, values: impl IntoIterator<Item = T>) -> usize {
        self.write().append(values)
    }

    /// Inserts `values` before the first row.
    pub fn prepend(&self, values: impl IntoIterator<Item = T>) {
        self.write().prepend(values);
    }

    /// Removes and returns the value at `row`.
    pub fn remove(&self, row: isize) -> FrameResult<T> {
        self.write().remove(row)
    }

    /// Drops every value.
    pub fn reset(&self) {
        self.write().reset();
    }

    /// Overwrites the value at `row`.
    pub fn update(&self, row: isize, value: T) -> FrameResult<()> {
        self.write().update(row, value)
    }

    /// Swaps the values at rows `a` and `b`.
    pub fn swap(&self, a: isize, b: isize) -> FrameResult<()> {
        self.write().swap(a, b)
    }

    /// See [`SeriesData::set_formatter`].
    pub fn set_formatter(&self, formatter: Option<ValueFormatter>) {
        self.write().set_formatter(formatter);
    }

    /// See [`SeriesData::set_is_equal`].
    pub fn set_is_equal(&self, compare: Option<CompareFn<T>>) {
        self.write().set_is_equal(compare);
    }

    /// See [`SeriesData::set_is_less_than`].
    pub fn set_is_less_than(&self, compare: Option<CompareFn<T>>) {
        self.write().set_is_less_than(compare);
    }

    /// Cursor that takes the shared lock for every step.
    pub fn iter(&self, options: IteratorOptions) -> RowCursor<&Self> {
        RowCursor::new(self, options)
    }

    /// Copies the rows selected by `range` into an independent series.
    pub fn copy(&self, range: RangeOptions) -> FrameResult<Series<T>> {
        self.read().copy(range)
    }

    /// Overwrites every row with a value produced by `fill`.
    pub fn fill_with(&self, fill: impl FnMut() -> T) {
        self.write().fill_with(fill);
    }
}

impl<T: Element> fmt::Debug for Series<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.try_read() {
            Some(data) => fmt::Debug::fmt(&*data, f),
            None => f.write_str("Series { <locked> }"),
        }
    }
}

impl<T: Element> fmt::Display for Series<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.read(), f)
    }
}

impl<'a, T: Element> RowSource for &'a Series<T> {
    type Item = T;

    fn row_count(&self) -> usize {
        self.read().len()
    }

    fn fetch(&self, row: usize) -> Option<T> {
        self.read().values.get(row).cloned()
    }
}

fn as_column<T: Element>(data: &SeriesData<T>) -> &(dyn Column + 'static) {
    data
}

fn as_column_mut<T: Element>(data: &mut SeriesData<T>) -> &mut (dyn Column + 'static) {
    data
}

impl<T: Element> AnySeries for Series<T> {
    fn read(&self) -> ColumnReadGuard<'_> {
        RwLockReadGuard::map(self.data.read(), as_column::<T>)
    }

    fn write(&self) -> ColumnWriteGuard<'_> {
        RwLockWriteGuard::map(self.data.write(), as_column_mut::<T>)
    }

    fn get_mut(&mut self) -> &mut dyn Column {
        self.data.get_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: Element> From<Series<T>> for Box<dyn AnySeries> {
    fn from(series: Series<T>) -> Self {
        Box::new(series)
    }
}

impl<T: Element> From<SeriesData<T>> for Series<T> {
    fn from(data: SeriesData<T>) -> Self {
        Series::from_data(data)
    }
}
