use crate::options::IteratorOptions;

/// Anything a [`RowCursor`] can walk: a series, a frame, or their locked wrappers.
///
/// Unlocked sources (`&SeriesData<T>`, `&FrameData`) read directly and rely on
/// the caller holding a guard; locked sources (`&Series<T>`, `&DataFrame`) take
/// a shared lock for every fetch.
pub trait RowSource {
    type Item;

    fn row_count(&self) -> usize;

    /// Returns the item at `row`, or `None` when `row` is past the end.
    fn fetch(&self, row: usize) -> Option<Self::Item>;
}

/// One position visited by a [`RowCursor`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowStep<V> {
    pub index: usize,
    pub value: V,
    /// Number of steps the cursor takes over its source.
    pub total: usize,
}

/// Restartable cursor with a configurable start row and step.
#[derive(Debug, Clone)]
pub struct RowCursor<S> {
    source: S,
    initial: isize,
    row: isize,
    step: isize,
}

impl<S: RowSource> RowCursor<S> {
    pub fn new(source: S, options: IteratorOptions) -> Self {
        let step = if options.step == 0 { 1 } else { options.step };
        let initial = if options.initial_row < 0 {
            source.row_count() as isize + options.initial_row
        } else {
            options.initial_row
        };
        Self {
            source,
            initial,
            row: initial,
            step,
        }
    }

    /// Total number of steps between the initial row and the edge of the source.
    pub fn total(&self) -> usize {
        let len = self.source.row_count() as isize;
        if self.initial < 0 || self.initial >= len {
            return 0;
        }
        let span = if self.step > 0 { len - self.initial - 1 } else { self.initial };
        span as usize / self.step.unsigned_abs() + 1
    }

    /// Rewinds to the initial row.
    pub fn reset(&mut self) {
        self.row = self.initial;
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: RowSource> Iterator for RowCursor<S> {
    type Item = RowStep<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row < 0 {
            return None;
        }
        let index = self.row as usize;
        let value = self.source.fetch(index)?;
        let total = self.total();
        // Overflow means the next row lies outside any source.
        self.row = self.row.checked_add(self.step).unwrap_or(-1);
        Some(RowStep {
            index,
            value,
            total,
        })
    }
}
