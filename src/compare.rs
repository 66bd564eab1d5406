//! Value comparators used by series equality and sorting.
//!
//! NaN handling deliberately departs from IEEE 754: two NaNs compare equal, and
//! NaN orders before every other value, negative infinity included.

use std::sync::Arc;

use crate::column::Element;

/// Pairwise comparison between two values of one element type.
pub type CompareFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Default equality: `==`, except that two NaNs are equal.
pub fn is_equal_default<T: Element>(a: &T, b: &T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    a == b
}

/// Strict less-than for ordered element types with NaN sorting first.
pub fn is_less_than<T: Element + PartialOrd>(a: &T, b: &T) -> bool {
    match (a.is_nan(), b.is_nan()) {
        (true, nan) => !nan,
        (false, true) => false,
        (false, false) => a < b,
    }
}

/// Equality for nullable values: `None` only equals `None`.
pub fn is_equal_option<T: Element>(a: &Option<T>, b: &Option<T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => is_equal_default(a, b),
        _ => false,
    }
}

/// Less-than for nullable values: `None` sorts before everything else.
pub fn is_less_than_option<T: Element + PartialOrd>(a: &Option<T>, b: &Option<T>) -> bool {
    match (a, b) {
        (None, b) => b.is_some(),
        (Some(_), None) => false,
        (Some(a), Some(b)) => is_less_than(a, b),
    }
}

/// Wraps a plain function as a shareable [`CompareFn`].
pub fn compare_fn<T, F>(f: F) -> CompareFn<T>
where
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}
