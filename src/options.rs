//! Configuration records accepted by series and frame operations.
//!
//! Every record implements [`Default`]; the documented defaults are what an
//! operation does when called with `Default::default()`.

use crate::error::{FrameError, FrameResult};

/// Pre-sizing for a new series.
///
/// Defaults: `size = 0`, `capacity = 0`. Slots beyond the supplied values are
/// filled with the element's fill value (NaN for floats).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesInit {
    pub size: usize,
    pub capacity: usize,
}

/// Inclusive row range. Negative bounds count from the end, and `end = None`
/// stands for the last row.
///
/// Defaults: `start = 0`, `end = None` (the whole container).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeOptions {
    pub start: isize,
    pub end: Option<isize>,
}

/// Shorthand for `RangeOptions { start, end: Some(end) }`.
pub fn range(start: isize, end: isize) -> RangeOptions {
    RangeOptions {
        start,
        end: Some(end),
    }
}

impl RangeOptions {
    /// Starts at `start` and runs to the last row.
    pub fn starting_at(start: isize) -> Self {
        Self { start, end: None }
    }

    /// Resolves the range against `len`, returning inclusive `(start, end)` row indices.
    pub fn limits(&self, len: usize) -> FrameResult<(usize, usize)> {
        let signed_len = len as isize;
        let raw_end = self.end.unwrap_or(-1);
        let start = if self.start < 0 {
            signed_len + self.start
        } else {
            self.start
        };
        let end = if raw_end < 0 {
            signed_len + raw_end
        } else {
            raw_end
        };

        if start < 0 || end < 0 || start > end || start >= signed_len || end >= signed_len {
            return Err(FrameError::InvalidRange {
                start: self.start,
                end: raw_end,
                len,
            });
        }
        Ok((start as usize, end as usize))
    }
}

/// Cursor configuration.
///
/// Defaults: `initial_row = 0`, `step = 1`. A step of `0` is treated as `1`,
/// a negative step walks backwards and a negative initial row counts from the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IteratorOptions {
    pub initial_row: isize,
    pub step: isize,
}

impl IteratorOptions {
    /// Walks backwards from the last row.
    pub fn reverse() -> Self {
        Self {
            initial_row: -1,
            step: -1,
        }
    }
}

/// Defaults: unstable, ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub stable: bool,
    pub desc: bool,
}

/// Defaults: names are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsEqualOptions {
    pub check_name: bool,
}

/// Defaults: copy mode (`in_place = false`), the receiver is left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub in_place: bool,
}

pub type ApplyOptions = FilterOptions;

impl FilterOptions {
    pub fn in_place() -> Self {
        Self { in_place: true }
    }
}
