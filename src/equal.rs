//! Equality between series and between frames.
//!
//! Frames compare column pairs by position, one task per pair on the rayon
//! pool. The first pair that differs or fails cancels the others through a
//! child token, and the scope joins every task before the result is returned.

use std::ptr;

use log::debug;
use parking_lot::Mutex;

use crate::cancel::CancelToken;
use crate::column::Element;
use crate::error::{FrameError, FrameResult};
use crate::frame::{DataFrame, FrameData};
use crate::options::IsEqualOptions;
use crate::series::{Series, SeriesData};

impl<T: Element> SeriesData<T> {
    /// Compares lengths, optionally names, then every row with this series'
    /// equality comparator.
    pub fn is_equal(
        &self,
        token: &CancelToken,
        other: &SeriesData<T>,
        options: IsEqualOptions,
    ) -> FrameResult<bool> {
        if self.len() != other.len() {
            return Ok(false);
        }
        if options.check_name && self.name() != other.name() {
            return Ok(false);
        }
        for (a, b) in self.values().iter().zip(other.values()) {
            token.check()?;
            if !self.is_equal_fn(a, b) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<T: Element> Series<T> {
    /// Compares under the shared locks of both series.
    pub fn is_equal(
        &self,
        token: &CancelToken,
        other: &Series<T>,
        options: IsEqualOptions,
    ) -> FrameResult<bool> {
        if ptr::eq(self, other) {
            let data = self.read();
            return data.is_equal(token, &data, options);
        }
        // Locks are always taken in address order.
        let swapped = (other as *const Self) < (self as *const Self);
        let (first, second) = if swapped { (other, self) } else { (self, other) };
        let first = first.read();
        let second = second.read();
        let (mine, theirs) = if swapped { (&second, &first) } else { (&first, &second) };
        mine.is_equal(token, theirs, options)
    }
}

enum Verdict {
    Different,
    Failed(FrameError),
}

impl FrameData {
    /// `true` when both frames have the same number of columns and every
    /// column pair, matched by position, is equal.
    pub fn is_equal(
        &self,
        token: &CancelToken,
        other: &FrameData,
        options: IsEqualOptions,
    ) -> FrameResult<bool> {
        if self.column_count() != other.column_count() {
            return Ok(false);
        }
        token.check()?;
        if ptr::eq(self, other) {
            return Ok(true);
        }

        let pairs = token.child();
        let verdict: Mutex<Option<Verdict>> = Mutex::new(None);
        rayon::scope(|scope| {
            for (left, right) in self.columns.iter().zip(other.columns.iter()) {
                let pairs = &pairs;
                let verdict = &verdict;
                scope.spawn(move |_| {
                    let outcome = if pairs.is_cancelled() {
                        Err(FrameError::Cancelled)
                    } else {
                        let left = left.read();
                        let right = right.read();
                        left.is_equal_column(pairs, &*right, options)
                    };
                    let settled = match outcome {
                        Ok(true) => return,
                        Ok(false) => Verdict::Different,
                        Err(err) => Verdict::Failed(err),
                    };
                    let mut slot = verdict.lock();
                    if slot.is_none() {
                        *slot = Some(settled);
                    }
                    pairs.cancel();
                });
            }
        });

        match verdict.into_inner() {
            None => Ok(true),
            Some(Verdict::Different) => Ok(false),
            Some(Verdict::Failed(err)) => {
                debug!("frame comparison aborted: {}", err);
                Err(err)
            }
        }
    }
}

impl DataFrame {
    /// Compares under the shared locks of both frames.
    pub fn is_equal(
        &self,
        token: &CancelToken,
        other: &DataFrame,
        options: IsEqualOptions,
    ) -> FrameResult<bool> {
        if ptr::eq(self, other) {
            let data = self.read();
            return data.is_equal(token, &data, options);
        }
        // Locks are always taken in address order.
        let swapped = (other as *const Self) < (self as *const Self);
        let (first, second) = if swapped { (other, self) } else { (self, other) };
        let first = first.read();
        let second = second.read();
        let (mine, theirs) = if swapped { (&second, &first) } else { (&first, &second) };
        mine.is_equal(token, theirs, options)
    }
}
