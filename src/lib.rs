//! Typed, column-oriented data containers.
//!
//! This crate provides:
//! - [`Series`]: a named, typed column guarded by its own read/write lock.
//! - [`DataFrame`]: equal-length, uniquely named series addressed by row.
//! - [`Column`] and [`AnySeries`]: the type-erased façade through which a frame
//!   holds series of different element types.
//! - Sorting, filtering, row-wise transforms and equality checks on both, all
//!   of which honour a [`CancelToken`].
//!
//! Every method on [`Series`] and [`DataFrame`] locks for the duration of the
//! call. Callers composing several steps take the lock once through `read()` or
//! `write()` and work on the guarded [`SeriesData`] / [`FrameData`], which
//! expose the same operations without locking.

pub mod apply;
pub mod cancel;
pub mod column;
pub mod compare;
pub mod equal;
pub mod error;
pub mod filter;
pub mod frame;
pub mod iterator;
pub mod options;
pub mod series;
pub mod sort;
pub mod value;

pub use cancel::CancelToken;
pub use column::{AnySeries, Column, ColumnReadGuard, ColumnWriteGuard, Element};
pub use compare::{compare_fn, is_equal_default, is_equal_option, is_less_than, is_less_than_option, CompareFn};
pub use error::{CallbackError, FrameError, FrameResult};
pub use filter::FilterAction;
pub use frame::{ColumnKey, DataFrame, FrameData, Row, RowValues};
pub use iterator::{RowCursor, RowSource, RowStep};
pub use options::{
    range, ApplyOptions, FilterOptions, IsEqualOptions, IteratorOptions, RangeOptions, SeriesInit, SortOptions,
};
pub use series::{default_value_formatter, Series, SeriesData, ValueFormatter};
pub use sort::SortKey;
pub use value::{Value, ValueKind};
