//! Row-wise transforms for series and frames.
//!
//! The transform sees every row once, in ascending order, and returns either a
//! replacement or `None` to keep the row as it is. In place, replacements are
//! collected during the traversal and written only once it finished, so an
//! error or cancellation leaves the target untouched.

use log::trace;

use crate::cancel::CancelToken;
use crate::column::Element;
use crate::error::{CallbackError, FrameError, FrameResult};
use crate::frame::{DataFrame, FrameData, Row, RowValues};
use crate::options::{ApplyOptions, IteratorOptions};
use crate::series::{Series, SeriesData};

impl<T: Element> SeriesData<T> {
    /// Returns a new series with `transform` applied to every value.
    pub fn apply<F, E>(&self, token: &CancelToken, mut transform: F) -> FrameResult<Series<T>>
    where
        F: FnMut(&T, usize, usize) -> Result<Option<T>, E>,
        E: Into<CallbackError>,
    {
        let mut copy = self.empty_like(self.len());
        for step in self.iter(IteratorOptions::default()) {
            token.check()?;
            let replaced = transform(&step.value, step.index, step.total).map_err(FrameError::predicate)?;
            copy.append([replaced.unwrap_or(step.value)]);
        }
        trace!("apply on '{}' produced {} rows", self.name(), copy.len());
        Ok(Series::from_data(copy))
    }

    /// Replaces every value for which `transform` returns `Some`.
    pub fn apply_in_place<F, E>(&mut self, token: &CancelToken, mut transform: F) -> FrameResult<()>
    where
        F: FnMut(&T, usize, usize) -> Result<Option<T>, E>,
        E: Into<CallbackError>,
    {
        let mut updates = Vec::new();
        for step in self.iter(IteratorOptions::default()) {
            token.check()?;
            if let Some(value) = transform(&step.value, step.index, step.total).map_err(FrameError::predicate)? {
                updates.push((step.index, value));
            }
        }
        trace!("apply on '{}' updates {} of {} rows", self.name(), updates.len(), self.len());
        for (row, value) in updates {
            self.update(row as isize, value)?;
        }
        Ok(())
    }
}

impl<T: Element> Series<T> {
    /// Applies under the series lock: shared in copy mode, exclusive in place.
    ///
    /// Returns the new series in copy mode and `None` in place.
    pub fn apply<F, E>(
        &self,
        token: &CancelToken,
        transform: F,
        options: ApplyOptions,
    ) -> FrameResult<Option<Series<T>>>
    where
        F: FnMut(&T, usize, usize) -> Result<Option<T>, E>,
        E: Into<CallbackError>,
    {
        if options.in_place {
            self.write().apply_in_place(token, transform)?;
            Ok(None)
        } else {
            self.read().apply(token, transform).map(Some)
        }
    }
}

impl FrameData {
    /// Returns a new frame built from the transformed rows.
    ///
    /// A returned row must supply a value for every column. Rows mapped to
    /// `None` are carried over unchanged.
    pub fn apply<F, E>(&self, token: &CancelToken, mut transform: F) -> FrameResult<DataFrame>
    where
        F: FnMut(&Row, usize, usize) -> Result<Option<RowValues>, E>,
        E: Into<CallbackError>,
    {
        let mut copy = FrameData::new(self.clone_empty(self.n_rows()))?;
        for step in self.iter(IteratorOptions::default()) {
            token.check()?;
            match transform(&step.value, step.index, step.total).map_err(FrameError::predicate)? {
                Some(values) => copy.append(values)?,
                None => copy.append(step.value)?,
            }
        }
        trace!("frame apply produced {} rows", copy.n_rows());
        Ok(DataFrame::from_data(copy))
    }

    /// Overwrites every row for which `transform` returns `Some`.
    ///
    /// Replacement rows are validated during the traversal; nothing is written
    /// unless every row was accepted.
    pub fn apply_in_place<F, E>(&mut self, token: &CancelToken, mut transform: F) -> FrameResult<()>
    where
        F: FnMut(&Row, usize, usize) -> Result<Option<RowValues>, E>,
        E: Into<CallbackError>,
    {
        let mut updates = Vec::new();
        for step in self.iter(IteratorOptions::default()) {
            token.check()?;
            if let Some(values) = transform(&step.value, step.index, step.total).map_err(FrameError::predicate)? {
                updates.push((step.index, self.prepare_row(values)?));
            }
        }
        trace!("frame apply updates {} of {} rows", updates.len(), self.n_rows());
        for (row, cells) in updates {
            self.write_row(row as isize, cells)?;
        }
        Ok(())
    }
}

impl DataFrame {
    /// Applies under the frame lock: shared in copy mode, exclusive in place.
    ///
    /// Returns the new frame in copy mode and `None` in place.
    pub fn apply<F, E>(
        &self,
        token: &CancelToken,
        transform: F,
        options: ApplyOptions,
    ) -> FrameResult<Option<DataFrame>>
    where
        F: FnMut(&Row, usize, usize) -> Result<Option<RowValues>, E>,
        E: Into<CallbackError>,
    {
        if options.in_place {
            self.write().apply_in_place(token, transform)?;
            Ok(None)
        } else {
            self.read().apply(token, transform).map(Some)
        }
    }
}
