use std::any::Any;
use std::fmt;

use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard};

use crate::cancel::CancelToken;
use crate::compare::CompareFn;
use crate::error::FrameResult;
use crate::options::{IsEqualOptions, RangeOptions, SortOptions};
use crate::series::ValueFormatter;
use crate::value::{Value, ValueKind};

/// Shared lock on a column held through the type-erased façade.
pub type ColumnReadGuard<'a> = MappedRwLockReadGuard<'a, dyn Column + 'static>;

/// Exclusive lock on a column held through the type-erased façade.
pub type ColumnWriteGuard<'a> = MappedRwLockWriteGuard<'a, dyn Column + 'static>;

/// Trait implemented by types that can be stored inside a [`Series`](crate::Series).
pub trait Element: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    /// Converts an erased value back, handing it back unchanged on a kind mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;

    fn type_name() -> String {
        Self::KIND.as_str().to_string()
    }

    fn is_nan(&self) -> bool {
        false
    }

    /// Value stored in pre-sized slots and for erased `Null` inserts.
    fn fill_value() -> Self {
        Self::default()
    }
}

macro_rules! impl_element {
    ($ty:ty, $kind:expr) => {
        impl Element for $ty {
            const KIND: ValueKind = $kind;

            fn into_value(self) -> Value {
                self.into()
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                <$ty>::try_from(value)
            }
        }
    };
    ($ty:ty, $kind:expr, float) => {
        impl Element for $ty {
            const KIND: ValueKind = $kind;

            fn into_value(self) -> Value {
                self.into()
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                <$ty>::try_from(value)
            }

            fn is_nan(&self) -> bool {
                <$ty>::is_nan(*self)
            }

            fn fill_value() -> Self {
                <$ty>::NAN
            }
        }
    };
}

impl_element!(i32, ValueKind::Int);
impl_element!(i64, ValueKind::Long);
impl_element!(u32, ValueKind::UInt);
impl_element!(u64, ValueKind::ULong);
impl_element!(f32, ValueKind::Float, float);
impl_element!(f64, ValueKind::Double, float);
impl_element!(bool, ValueKind::Bool);
impl_element!(u8, ValueKind::Byte);
impl_element!(char, ValueKind::Char);
impl_element!(String, ValueKind::Str);

/// Nullable elements: `None` travels as [`Value::Null`].
impl<T: Element> Element for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn into_value(self) -> Value {
        self.map_or(Value::Null, T::into_value)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }

    fn type_name() -> String {
        format!("Option<{}>", T::type_name())
    }

    fn is_nan(&self) -> bool {
        self.as_ref().is_some_and(T::is_nan)
    }

    fn fill_value() -> Self {
        None
    }
}

/// Type-erased operations on the unlocked state of a series.
///
/// Rows are addressed as in [`SeriesData`](crate::SeriesData): negative rows
/// count from the end. Values cross this boundary as [`Value`] and are checked
/// against the element type on the way in.
pub trait Column: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
    fn rename(&mut self, name: &str);
    fn kind(&self) -> ValueKind;
    /// Display tag of the element type, e.g. `f64` or `Option<i32>`.
    fn type_name(&self) -> &str;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn value(&self, row: isize) -> FrameResult<Value>;
    /// Renders the value at `row` through the series' formatter.
    fn value_string(&self, row: isize) -> FrameResult<String>;

    /// Returns `true` when `value` can be stored in this column.
    fn accepts(&self, value: &Value) -> bool;
    fn insert_value(&mut self, row: isize, value: Value) -> FrameResult<()>;
    /// Appends `value` and returns its row.
    fn append_value(&mut self, value: Value) -> FrameResult<usize>;
    fn prepend_value(&mut self, value: Value) -> FrameResult<()>;
    fn update_value(&mut self, row: isize, value: Value) -> FrameResult<()>;
    fn remove(&mut self, row: isize) -> FrameResult<()>;
    fn reset(&mut self);
    fn swap(&mut self, a: isize, b: isize) -> FrameResult<()>;

    fn set_formatter(&mut self, formatter: Option<ValueFormatter>);
    fn set_is_equal_values(&mut self, compare: Option<CompareFn<Value>>);
    fn set_is_less_than_values(&mut self, compare: Option<CompareFn<Value>>);
    fn is_equal_values(&self, a: &Value, b: &Value) -> FrameResult<bool>;
    fn is_less_than_values(&self, a: &Value, b: &Value) -> FrameResult<bool>;

    /// Returns `true` when an ordering comparator is configured.
    fn has_ordering(&self) -> bool;
    /// Compares two rows with the column's equality comparator.
    fn rows_equal(&self, a: usize, b: usize) -> bool;
    /// Compares two rows with the column's ordering comparator.
    fn row_less(&self, a: usize, b: usize) -> FrameResult<bool>;
    /// Rearranges the values so that new row `i` holds old row `order[i]`.
    fn permute(&mut self, order: &[usize]);
    /// Sorts the values; `Ok(false)` means the token fired before completion.
    fn sort(&mut self, token: &CancelToken, options: SortOptions) -> FrameResult<bool>;

    fn copy_range(&self, range: RangeOptions) -> FrameResult<Box<dyn AnySeries>>;
    /// Creates an empty series of the same element type, name and comparators.
    fn clone_empty(&self, capacity: usize) -> Box<dyn AnySeries>;
    /// Overwrites every row with values produced by `fill`.
    fn fill_with(&mut self, fill: &mut dyn FnMut() -> Value) -> FrameResult<()>;
    /// Compares with another column; columns of different element types are never equal.
    fn is_equal_column(
        &self,
        token: &CancelToken,
        other: &dyn Column,
        options: IsEqualOptions,
    ) -> FrameResult<bool>;

    fn as_any(&self) -> &dyn Any;
}

/// Lock control over a series whose element type is not known statically.
///
/// This is how a frame stores heterogeneous columns. `read` and `write` take
/// the column's own lock; `get_mut` proves exclusivity through the borrow and
/// skips locking entirely.
pub trait AnySeries: fmt::Debug + Send + Sync {
    fn read(&self) -> ColumnReadGuard<'_>;
    fn write(&self) -> ColumnWriteGuard<'_>;
    fn get_mut(&mut self) -> &mut dyn Column;
    fn as_any(&self) -> &dyn Any;

    fn name(&self) -> String {
        self.read().name().to_string()
    }

    fn n_rows(&self) -> usize {
        self.read().len()
    }
}
