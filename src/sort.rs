//! Multi-key sorting for series and frames.
//!
//! Both entry points poll the cancellation token once per pairwise comparison.
//! A cancelled sort returns `Ok(false)` and leaves the values as some
//! permutation of the original rows:
//!
//! * frames sort a row permutation and only apply it once the sort completed,
//!   so a cancelled frame sort leaves the frame untouched;
//! * series sort their values in place, so a cancelled series sort may leave
//!   the values partially ordered.

use std::cmp::Ordering;

use log::debug;

use crate::cancel::CancelToken;
use crate::column::{Column, Element};
use crate::error::{FrameError, FrameResult};
use crate::frame::{ColumnKey, DataFrame, FrameData};
use crate::options::SortOptions;
use crate::series::{Series, SeriesData};

/// One sort criterion: a column reference and its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub key: ColumnKey,
    pub desc: bool,
}

impl SortKey {
    pub fn asc(key: impl Into<ColumnKey>) -> Self {
        Self {
            key: key.into(),
            desc: false,
        }
    }

    pub fn desc(key: impl Into<ColumnKey>) -> Self {
        Self {
            key: key.into(),
            desc: true,
        }
    }
}

/// Sorts `items` with a comparator that may fail.
///
/// A failing comparison aborts the sort; `items` is then still a permutation
/// of its original contents.
pub(crate) fn try_sort_by<E, F>(items: &mut [E], stable: bool, compare: &mut F) -> FrameResult<()>
where
    E: Clone,
    F: FnMut(&E, &E) -> FrameResult<Ordering>,
{
    if stable {
        merge_sort(items, compare)
    } else {
        quick_sort(items, compare)
    }
}

fn merge_sort<E, F>(items: &mut [E], compare: &mut F) -> FrameResult<()>
where
    E: Clone,
    F: FnMut(&E, &E) -> FrameResult<Ordering>,
{
    let len = items.len();
    if len <= 1 {
        return Ok(());
    }
    let mid = len / 2;
    merge_sort(&mut items[..mid], compare)?;
    merge_sort(&mut items[mid..], compare)?;

    // Merged into scratch space and copied back only when complete.
    let mut merged = Vec::with_capacity(len);
    let (mut left, mut right) = (0, mid);
    while left < mid && right < len {
        if compare(&items[right], &items[left])? == Ordering::Less {
            merged.push(items[right].clone());
            right += 1;
        } else {
            merged.push(items[left].clone());
            left += 1;
        }
    }
    merged.extend_from_slice(&items[left..mid]);
    merged.extend_from_slice(&items[right..]);
    items.clone_from_slice(&merged);
    Ok(())
}

fn quick_sort<E, F>(items: &mut [E], compare: &mut F) -> FrameResult<()>
where
    E: Clone,
    F: FnMut(&E, &E) -> FrameResult<Ordering>,
{
    let mut slice = items;
    while slice.len() > 1 {
        let pivot = slice[slice.len() / 2].clone();

        // Three-way partition: [..lt] < pivot, [lt..gt] == pivot, [gt..] > pivot.
        let (mut lt, mut cursor, mut gt) = (0, 0, slice.len());
        while cursor < gt {
            match compare(&slice[cursor], &pivot)? {
                Ordering::Less => {
                    slice.swap(lt, cursor);
                    lt += 1;
                    cursor += 1;
                }
                Ordering::Greater => {
                    gt -= 1;
                    slice.swap(cursor, gt);
                }
                Ordering::Equal => cursor += 1,
            }
        }

        let (lower, rest) = std::mem::take(&mut slice).split_at_mut(lt);
        let upper = &mut rest[gt - lt..];
        if lower.len() < upper.len() {
            quick_sort(lower, compare)?;
            slice = upper;
        } else {
            quick_sort(upper, compare)?;
            slice = lower;
        }
    }
    Ok(())
}

fn finish(result: FrameResult<()>, what: &str) -> FrameResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(FrameError::Cancelled) => {
            debug!("sort of {} cancelled before completion", what);
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

impl<T: Element> SeriesData<T> {
    /// Sorts the values with the series' ordering comparator.
    ///
    /// Returns `Ok(false)` when `token` fired before the sort completed and
    /// [`FrameError::MissingComparator`] when no ordering comparator is set.
    pub fn sort(&mut self, token: &CancelToken, options: SortOptions) -> FrameResult<bool> {
        let less = self.ordering()?.clone();
        let mut compare = |a: &T, b: &T| -> FrameResult<Ordering> {
            token.check()?;
            let ordering = if less(a, b) {
                Ordering::Less
            } else if less(b, a) {
                Ordering::Greater
            } else {
                Ordering::Equal
            };
            Ok(if options.desc {
                ordering.reverse()
            } else {
                ordering
            })
        };
        let name = self.name().to_string();
        let result = try_sort_by(self.values_mut(), options.stable, &mut compare);
        finish(result, &name)
    }
}

impl<T: Element> Series<T> {
    /// Sorts under the exclusive lock. See [`SeriesData::sort`].
    pub fn sort(&self, token: &CancelToken, options: SortOptions) -> FrameResult<bool> {
        self.write().sort(token, options)
    }
}

impl FrameData {
    /// Reorders the rows by `keys`.
    ///
    /// Rows are ordered by the first key; rows its equality comparator judges
    /// equal fall through to the next key. `options.stable` keeps fully tied
    /// rows in their original order. `options.desc` flips the direction of
    /// every key, so a [`SortKey::desc`] key sorts ascending under
    /// `desc: true`. Keys are resolved once, before any comparison, and an
    /// empty key list leaves the frame as it is.
    pub fn sort(
        &mut self,
        token: &CancelToken,
        keys: &[SortKey],
        options: SortOptions,
    ) -> FrameResult<bool> {
        if keys.is_empty() {
            return Ok(true);
        }
        let resolved = keys
            .iter()
            .map(|key| -> FrameResult<(usize, bool)> {
                Ok((self.resolve_key(&key.key)?, key.desc != options.desc))
            })
            .collect::<FrameResult<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        {
            let columns: Vec<&dyn Column> = self
                .columns
                .iter_mut()
                .map(|column| &*column.get_mut())
                .collect();
            for &(index, _) in &resolved {
                if !columns[index].has_ordering() {
                    return Err(FrameError::MissingComparator(columns[index].name().to_string()));
                }
            }

            let mut compare = |&a: &usize, &b: &usize| -> FrameResult<Ordering> {
                token.check()?;
                for &(index, desc) in &resolved {
                    let column = columns[index];
                    if !column.rows_equal(a, b) {
                        let less = column.row_less(a, b)?;
                        return Ok(if less != desc {
                            Ordering::Less
                        } else {
                            Ordering::Greater
                        });
                    }
                }
                Ok(Ordering::Equal)
            };
            let result = try_sort_by(&mut order, options.stable, &mut compare);
            if !finish(result, "frame")? {
                return Ok(false);
            }
        }

        for column in self.columns.iter_mut() {
            column.get_mut().permute(&order);
        }
        Ok(true)
    }
}

impl DataFrame {
    /// Sorts under the exclusive frame lock. See [`FrameData::sort`].
    pub fn sort(
        &self,
        token: &CancelToken,
        keys: &[SortKey],
        options: SortOptions,
    ) -> FrameResult<bool> {
        self.write().sort(token, keys, options)
    }
}
