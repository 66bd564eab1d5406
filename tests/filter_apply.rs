use std::convert::Infallible;

use approx::assert_relative_eq;
use rustframe::{
    ApplyOptions, CancelToken, DataFrame, FilterAction, FilterOptions, FrameError, FrameResult, IsEqualOptions, Row,
    RowValues, Series, Value,
};

fn people() -> FrameResult<DataFrame> {
    DataFrame::new(vec![
        Series::from_values("name", vec!["ann".to_string(), "bob".to_string(), "cy".to_string()]).into(),
        Series::from_values("age", vec![31, 25, 47]).into(),
        Series::from_values("score", vec![1.5, 2.5, 3.5]).into(),
    ])
}

fn keep_even(value: &i32, _row: usize, _total: usize) -> Result<FilterAction, Infallible> {
    Ok(if value % 2 == 0 {
        FilterAction::Keep
    } else {
        FilterAction::Drop
    })
}

fn over_thirty(row: &Row, _index: usize, _total: usize) -> Result<FilterAction, Infallible> {
    Ok(match row["age"] {
        Value::Int(age) if age > 30 => FilterAction::Keep,
        _ => FilterAction::Drop,
    })
}

#[test]
fn series_filter_copy_and_in_place() -> FrameResult<()> {
    let token = CancelToken::new();
    let s = Series::from_values("x", vec![1, 2, 3, 4, 5, 6]);

    let evens = s.filter(&token, keep_even, FilterOptions::default())?;
    let evens = evens.expect("copy mode returns the filtered series");
    assert_eq!(evens.read().values(), &[2, 4, 6]);
    assert_eq!(s.n_rows(), 6);

    assert!(s.filter(&token, keep_even, FilterOptions::in_place())?.is_none());
    assert_eq!(s.read().values(), &[2, 4, 6]);
    Ok(())
}

#[test]
fn series_filter_sees_index_and_total() -> FrameResult<()> {
    let token = CancelToken::new();
    let s = Series::from_values("x", vec![10, 20, 30]);
    let mut seen = Vec::new();
    s.filter(
        &token,
        |_: &i32, row, total| -> Result<FilterAction, Infallible> {
            seen.push((row, total));
            Ok(FilterAction::Keep)
        },
        FilterOptions::default(),
    )?;
    assert_eq!(seen, vec![(0, 3), (1, 3), (2, 3)]);
    Ok(())
}

#[test]
fn predicate_error_aborts_without_removing_rows() -> FrameResult<()> {
    let token = CancelToken::new();
    let s = Series::from_values("x", vec![1, 2, 3, 4]);
    let result = s.filter(
        &token,
        |value: &i32, _, _| {
            if *value == 3 {
                Err("boom")
            } else {
                Ok(FilterAction::Drop)
            }
        },
        FilterOptions::in_place(),
    );

    match result {
        Err(err @ FrameError::Predicate(_)) => assert!(err.to_string().contains("boom")),
        other => panic!("expected a predicate error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(s.n_rows(), 4);
    Ok(())
}

#[test]
fn cancelled_filter_surfaces_cancellation() {
    let token = CancelToken::new();
    token.cancel();
    let s = Series::from_values("x", vec![1, 2]);
    assert!(matches!(
        s.filter(&token, keep_even, FilterOptions::in_place()),
        Err(FrameError::Cancelled)
    ));
    assert_eq!(s.n_rows(), 2);
}

#[test]
fn frame_filter_keep_all_and_drop_all() -> FrameResult<()> {
    let token = CancelToken::new();
    let df = people()?;

    let kept = df
        .filter(&token, |_: &Row, _, _| Ok::<_, Infallible>(FilterAction::Keep), FilterOptions::default())?
        .expect("copy mode returns a frame");
    assert!(kept.is_equal(&token, &df, IsEqualOptions { check_name: true })?);

    let dropped = df
        .filter(&token, |_: &Row, _, _| Ok::<_, Infallible>(FilterAction::Drop), FilterOptions::default())?
        .expect("copy mode returns a frame");
    assert_eq!(dropped.n_rows(), 0);
    assert_eq!(dropped.names(), df.names());
    assert_eq!(dropped.read().series::<i32>("age")?.len(), 0);
    assert_eq!(df.n_rows(), 3);
    Ok(())
}

#[test]
fn frame_filter_in_place_removes_dropped_rows() -> FrameResult<()> {
    let token = CancelToken::new();
    let df = people()?;

    let copy = df.filter(&token, over_thirty, FilterOptions::default())?.expect("copy mode returns a frame");
    assert!(df.filter(&token, over_thirty, FilterOptions::in_place())?.is_none());

    assert_eq!(df.n_rows(), 2);
    assert_eq!(df.row(0)?["name"], Value::from("ann"));
    assert_eq!(df.row(1)?["name"], Value::from("cy"));
    assert!(df.is_equal(&token, &copy, IsEqualOptions::default())?);
    Ok(())
}

#[test]
fn apply_square_copy_then_in_place() -> FrameResult<()> {
    let token = CancelToken::new();
    let s = Series::from_values("n", (1..=10).map(f64::from).collect::<Vec<f64>>());
    let square = |value: &f64, _: usize, _: usize| Ok::<_, Infallible>(Some(value * value));

    let squared = s
        .apply(&token, square, ApplyOptions::default())?
        .expect("copy mode returns a series");
    assert_relative_eq!(squared.value(-1)?, 100.0);
    assert_relative_eq!(s.value(-1)?, 10.0);

    assert!(s.apply(&token, square, ApplyOptions::in_place())?.is_none());
    assert!(s.is_equal(&token, &squared, IsEqualOptions::default())?);
    Ok(())
}

#[test]
fn apply_none_keeps_the_value() -> FrameResult<()> {
    let token = CancelToken::new();
    let s = Series::from_values("n", vec![1, 2, 3]);
    s.apply(
        &token,
        |value: &i32, row, _| Ok::<_, Infallible>(if row == 1 { Some(value * 10) } else { None }),
        ApplyOptions::in_place(),
    )?;
    assert_eq!(s.read().values(), &[1, 20, 3]);
    Ok(())
}

#[test]
fn frame_apply_replaces_rows() -> FrameResult<()> {
    let token = CancelToken::new();
    let df = people()?;
    let double_score = |row: &Row, _: usize, _: usize| -> Result<Option<RowValues>, Infallible> {
        let mut next = row.clone();
        if let Some(Value::Double(score)) = next.get_mut("score") {
            *score *= 2.0;
        }
        Ok(Some(next.into()))
    };

    let doubled = df.apply(&token, double_score, ApplyOptions::default())?.expect("copy mode returns a frame");
    assert_eq!(doubled.row(2)?["score"], Value::Double(7.0));
    assert_eq!(df.row(2)?["score"], Value::Double(3.5));

    df.apply(&token, double_score, ApplyOptions::in_place())?;
    assert!(df.is_equal(&token, &doubled, IsEqualOptions::default())?);
    Ok(())
}

#[test]
fn frame_apply_in_place_is_all_or_nothing() -> FrameResult<()> {
    let token = CancelToken::new();
    let df = people()?;
    let result = df.apply(
        &token,
        |_: &Row, row, _| -> Result<Option<RowValues>, Infallible> {
            Ok(Some(if row == 2 {
                RowValues::Positional(vec![Value::from("short")])
            } else {
                RowValues::Positional(vec![Value::from("x"), Value::Int(0), Value::Double(0.0)])
            }))
        },
        ApplyOptions::in_place(),
    );

    assert!(matches!(result, Err(FrameError::ArityMismatch { expected: 3, found: 1 })));
    assert_eq!(df.row(0)?["name"], Value::from("ann"));
    Ok(())
}

#[test]
fn cancelled_apply_processes_no_rows() {
    let token = CancelToken::new();
    token.cancel();
    let s = Series::from_values("n", vec![1, 2, 3]);
    let mut calls = 0;
    let result = s.apply(
        &token,
        |value: &i32, _, _| {
            calls += 1;
            Ok::<_, Infallible>(Some(value + 1))
        },
        ApplyOptions::default(),
    );
    assert!(matches!(result, Err(FrameError::Cancelled)));
    assert_eq!(calls, 0);
}
