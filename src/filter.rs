//! Row filtering for series and frames.
//!
//! The predicate sees every row once, in ascending order, together with the
//! row index and the row count. Dropped rows are collected first and removed
//! afterwards from the highest index down.
//!
//! In place, a predicate error or cancellation therefore surfaces before
//! anything is removed. A failure during the removal phase itself leaves the
//! rows removed so far removed; nothing is rolled back.

use log::trace;

use crate::cancel::CancelToken;
use crate::column::Element;
use crate::error::{CallbackError, FrameError, FrameResult};
use crate::frame::{DataFrame, FrameData, Row};
use crate::iterator::RowStep;
use crate::options::{FilterOptions, IteratorOptions};
use crate::series::{Series, SeriesData};

/// Verdict of a filter predicate for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterAction {
    Drop,
    Keep,
}

/// Runs `predicate` over a cursor and returns the rows it dropped.
fn dropped_rows<V, I, F, E>(
    token: &CancelToken,
    rows: I,
    predicate: &mut F,
) -> FrameResult<Vec<usize>>
where
    I: Iterator<Item = RowStep<V>>,
    F: FnMut(&V, usize, usize) -> Result<FilterAction, E>,
    E: Into<CallbackError>,
{
    let mut dropped = Vec::new();
    for step in rows {
        token.check()?;
        match predicate(&step.value, step.index, step.total).map_err(FrameError::predicate)? {
            FilterAction::Drop => dropped.push(step.index),
            FilterAction::Keep => {}
        }
    }
    Ok(dropped)
}

fn kept_rows(n_rows: usize, dropped: &[usize]) -> Vec<usize> {
    let mut dropped = dropped.iter().peekable();
    (0..n_rows)
        .filter(|row| {
            if dropped.peek() == Some(&row) {
                dropped.next();
                false
            } else {
                true
            }
        })
        .collect()
}

impl<T: Element> SeriesData<T> {
    /// Returns a new series holding only the rows `predicate` keeps.
    pub fn filter<F, E>(&self, token: &CancelToken, mut predicate: F) -> FrameResult<Series<T>>
    where
        F: FnMut(&T, usize, usize) -> Result<FilterAction, E>,
        E: Into<CallbackError>,
    {
        let dropped = dropped_rows(token, self.iter(IteratorOptions::default()), &mut predicate)?;
        let kept = kept_rows(self.len(), &dropped);
        trace!("filter on '{}' kept {} of {} rows", self.name(), kept.len(), self.len());

        let mut copy = self.empty_like(kept.len());
        copy.append(kept.iter().map(|&row| self.values()[row].clone()));
        Ok(Series::from_data(copy))
    }

    /// Removes the rows `predicate` drops.
    pub fn filter_in_place<F, E>(&mut self, token: &CancelToken, mut predicate: F) -> FrameResult<()>
    where
        F: FnMut(&T, usize, usize) -> Result<FilterAction, E>,
        E: Into<CallbackError>,
    {
        let dropped = dropped_rows(token, self.iter(IteratorOptions::default()), &mut predicate)?;
        trace!("filter on '{}' drops {} of {} rows", self.name(), dropped.len(), self.len());
        for &row in dropped.iter().rev() {
            self.remove(row as isize)?;
        }
        Ok(())
    }
}

impl<T: Element> Series<T> {
    /// Filters under the series lock: shared in copy mode, exclusive in place.
    ///
    /// Returns the new series in copy mode and `None` in place.
    pub fn filter<F, E>(
        &self,
        token: &CancelToken,
        predicate: F,
        options: FilterOptions,
    ) -> FrameResult<Option<Series<T>>>
    where
        F: FnMut(&T, usize, usize) -> Result<FilterAction, E>,
        E: Into<CallbackError>,
    {
        if options.in_place {
            self.write().filter_in_place(token, predicate)?;
            Ok(None)
        } else {
            self.read().filter(token, predicate).map(Some)
        }
    }
}

impl FrameData {
    /// Returns a new frame holding only the rows `predicate` keeps.
    pub fn filter<F, E>(&self, token: &CancelToken, mut predicate: F) -> FrameResult<DataFrame>
    where
        F: FnMut(&Row, usize, usize) -> Result<FilterAction, E>,
        E: Into<CallbackError>,
    {
        let dropped = dropped_rows(token, self.iter(IteratorOptions::default()), &mut predicate)?;
        let kept = kept_rows(self.n_rows(), &dropped);
        trace!("frame filter kept {} of {} rows", kept.len(), self.n_rows());

        let mut copy = FrameData::new(self.clone_empty(kept.len()))?;
        for &row in &kept {
            copy.append(self.row(row as isize)?)?;
        }
        Ok(DataFrame::from_data(copy))
    }

    /// Removes the rows `predicate` drops from every column.
    pub fn filter_in_place<F, E>(&mut self, token: &CancelToken, mut predicate: F) -> FrameResult<()>
    where
        F: FnMut(&Row, usize, usize) -> Result<FilterAction, E>,
        E: Into<CallbackError>,
    {
        let dropped = dropped_rows(token, self.iter(IteratorOptions::default()), &mut predicate)?;
        trace!("frame filter drops {} of {} rows", dropped.len(), self.n_rows());
        for &row in dropped.iter().rev() {
            self.remove(row as isize)?;
        }
        Ok(())
    }
}

impl DataFrame {
    /// Filters under the frame lock: shared in copy mode, exclusive in place.
    ///
    /// Returns the new frame in copy mode and `None` in place.
    pub fn filter<F, E>(
        &self,
        token: &CancelToken,
        predicate: F,
        options: FilterOptions,
    ) -> FrameResult<Option<DataFrame>>
    where
        F: FnMut(&Row, usize, usize) -> Result<FilterAction, E>,
        E: Into<CallbackError>,
    {
        if options.in_place {
            self.write().filter_in_place(token, predicate)?;
            Ok(None)
        } else {
            self.read().filter(token, predicate).map(Some)
        }
    }
}
