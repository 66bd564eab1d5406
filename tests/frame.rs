use std::collections::HashMap;

use rustframe::{
    range, AnySeries, CancelToken, Column, DataFrame, FrameError, FrameResult, IsEqualOptions, IteratorOptions,
    RangeOptions, RowValues, Series, Value, ValueKind,
};

fn people() -> FrameResult<DataFrame> {
    DataFrame::new(vec![
        Series::from_values("name", vec!["ann".to_string(), "bob".to_string(), "cy".to_string()]).into(),
        Series::from_values("age", vec![31, 25, 47]).into(),
        Series::from_values("score", vec![1.5, 2.5, 3.5]).into(),
    ])
}

#[test]
fn frame_construction_validates_columns() {
    let uneven = DataFrame::new(vec![
        Series::from_values("a", vec![1, 2]).into(),
        Series::from_values("b", vec![1, 2, 3]).into(),
    ]);
    assert!(matches!(uneven, Err(FrameError::RowCountMismatch { expected: 2, found: 3, .. })));

    let duplicated = DataFrame::new(vec![
        Series::from_values("a", vec![1]).into(),
        Series::from_values("a", vec![2.0]).into(),
    ]);
    assert!(matches!(duplicated, Err(FrameError::DuplicateName(name)) if name == "a"));
}

#[test]
fn frame_reads_rows_by_name() -> FrameResult<()> {
    let df = people()?;
    assert_eq!(df.n_rows(), 3);
    assert_eq!(df.column_count(), 3);
    assert_eq!(df.names(), vec!["name", "age", "score"]);

    let last = df.row(-1)?;
    assert_eq!(last["name"], Value::from("cy"));
    assert_eq!(last["age"], Value::Int(47));
    assert_eq!(last["score"], Value::Double(3.5));

    assert_eq!(df.name_to_column("score")?, 2);
    assert!(matches!(df.name_to_column("nope"), Err(FrameError::NameNotFound(_))));
    assert!(df.row(3).is_err());
    Ok(())
}

#[test]
fn frame_accepts_every_row_bag_kind() -> FrameResult<()> {
    let df = people()?;
    df.append(vec![Value::from("dee"), Value::from(52), Value::from(4.5)])?;

    df.append(HashMap::from([
        ("score".to_string(), Value::from(5.5)),
        ("name".to_string(), Value::from("eve")),
        ("age".to_string(), Value::from(19)),
    ]))?;

    df.insert(
        0,
        HashMap::from([(2_usize, Value::from(0.5)), (0, Value::from("fay")), (1, Value::from(60))]),
    )?;

    df.prepend(vec![
        (Value::from("age"), Value::from(8)),
        (Value::Int(0), Value::from("gus")),
        (Value::ULong(2), Value::from(9.5)),
    ])?;

    assert_eq!(df.n_rows(), 7);
    assert_eq!(df.row(0)?["name"], Value::from("gus"));
    assert_eq!(df.row(1)?["age"], Value::Int(60));
    assert_eq!(df.row(-2)?["name"], Value::from("dee"));
    assert_eq!(df.row(-1)?["score"], Value::Double(5.5));
    Ok(())
}

#[test]
fn frame_rejects_bad_rows_without_changes() -> FrameResult<()> {
    let df = people()?;

    let short = df.append(vec![Value::from("x"), Value::from(1)]);
    assert!(matches!(short, Err(FrameError::ArityMismatch { expected: 3, found: 2 })));

    let wrong_type = df.append(vec![Value::from("x"), Value::from("old"), Value::from(1.0)]);
    assert!(matches!(wrong_type, Err(FrameError::TypeMismatch { .. })));

    let bad_key = df.append(vec![
        (Value::Bool(true), Value::from("x")),
        (Value::from("age"), Value::from(1)),
        (Value::from("score"), Value::from(1.0)),
    ]);
    assert!(matches!(bad_key, Err(FrameError::MixedKeyType(_))));

    let twice = df.append(vec![
        (Value::from("age"), Value::from(1)),
        (Value::Int(1), Value::from(2)),
        (Value::from("score"), Value::from(1.0)),
    ]);
    assert!(matches!(twice, Err(FrameError::DuplicateName(_))));

    let unknown = df.append(RowValues::Named(HashMap::from([
        ("name".to_string(), Value::from("x")),
        ("age".to_string(), Value::from(1)),
        ("points".to_string(), Value::from(1.0)),
    ])));
    assert!(matches!(unknown, Err(FrameError::NameNotFound(_))));

    assert_eq!(df.n_rows(), 3);
    for column in df.read().columns() {
        assert_eq!(column.len(), 3);
    }
    Ok(())
}

#[test]
fn frame_null_cells_take_the_fill_value() -> FrameResult<()> {
    let df = people()?;
    df.prepend(vec![Value::Null, Value::Null, Value::Null])?;

    let row = df.row(0)?;
    assert_eq!(row["name"], Value::from(""));
    assert_eq!(row["age"], Value::Int(0));
    assert!(row["score"].is_nan());
    Ok(())
}

#[test]
fn frame_updates_swaps_and_removes_rows() -> FrameResult<()> {
    let df = people()?;
    df.update(0, "age", Value::Int(32))?;
    df.update(-1, 2_usize, Value::Double(9.0))?;
    assert_eq!(df.row(0)?["age"], Value::Int(32));
    assert_eq!(df.row(2)?["score"], Value::Double(9.0));

    df.update_row(1, vec![Value::from("ben"), Value::from(26), Value::from(2.0)])?;
    assert_eq!(df.row(1)?["name"], Value::from("ben"));
    assert!(df.update_row(1, vec![Value::from("ben")]).is_err());

    df.swap(0, -1)?;
    assert_eq!(df.row(0)?["name"], Value::from("cy"));
    assert_eq!(df.row(2)?["name"], Value::from("ann"));

    df.remove(1)?;
    assert_eq!(df.n_rows(), 2);
    assert_eq!(df.row(1)?["name"], Value::from("ann"));
    assert!(matches!(df.remove(2), Err(FrameError::IndexOutOfRange { .. })));
    Ok(())
}

#[test]
fn frame_reorders_columns() -> FrameResult<()> {
    let df = people()?;
    df.reorder_columns(&["score", "name", "age"])?;
    assert_eq!(df.names(), vec!["score", "name", "age"]);

    assert!(matches!(df.reorder_columns(&["score", "name"]), Err(FrameError::ArityMismatch { .. })));
    assert!(matches!(
        df.reorder_columns(&["score", "name", "height"]),
        Err(FrameError::NameNotFound(_))
    ));
    assert!(matches!(
        df.reorder_columns(&["score", "score", "age"]),
        Err(FrameError::DuplicateName(_))
    ));
    assert_eq!(df.names(), vec!["score", "name", "age"]);
    Ok(())
}

#[test]
fn frame_adds_and_removes_columns() -> FrameResult<()> {
    let df = people()?;
    df.add_column(Series::from_values("flag", vec![true, false, true]), Some(0))?;
    assert_eq!(df.names(), vec!["flag", "name", "age", "score"]);

    let short = df.add_column(Series::from_values("short", vec![1_u8]), None);
    assert!(matches!(short, Err(FrameError::RowCountMismatch { expected: 3, found: 1, .. })));

    let again = df.add_column(Series::from_values("age", vec![1, 2, 3]), None);
    assert!(matches!(again, Err(FrameError::DuplicateName(_))));

    let removed = df.remove_column("flag")?;
    assert_eq!(removed.name(), "flag");
    assert_eq!(removed.n_rows(), 3);
    assert!(matches!(df.remove_column("flag"), Err(FrameError::NameNotFound(_))));
    assert_eq!(df.column_count(), 3);
    Ok(())
}

#[test]
fn frame_renames_columns_without_duplicates() -> FrameResult<()> {
    let df = people()?;
    assert!(matches!(
        df.rename_column("age", "name"),
        Err(FrameError::DuplicateName(name)) if name == "name"
    ));
    assert_eq!(df.names(), vec!["name", "age", "score"]);
    assert_eq!(df.row(0)?.len(), 3);

    df.rename_column(1_usize, "years")?;
    df.rename_column("score", "score")?;
    assert_eq!(df.names(), vec!["name", "years", "score"]);
    assert_eq!(df.row(0)?["years"], Value::Int(31));
    assert!(matches!(df.rename_column("age", "x"), Err(FrameError::NameNotFound(_))));
    Ok(())
}

#[test]
fn frame_typed_access_checks_element_type() -> FrameResult<()> {
    let df = people()?;
    assert_eq!(*df.read().series::<i32>("age")?.value(1)?, 25);
    assert!(matches!(
        df.read().series::<f64>("age"),
        Err(FrameError::TypeMismatch { expected: ValueKind::Double, found: ValueKind::Int, .. })
    ));
    assert_eq!(df.read().column(2_usize)?.name(), "score");
    Ok(())
}

#[test]
fn frame_copy_is_deep() -> FrameResult<()> {
    let token = CancelToken::new();
    let df = people()?;
    let copy = df.copy(RangeOptions::default())?;
    assert!(copy.is_equal(&token, &df, IsEqualOptions { check_name: true })?);

    copy.update(0, "age", Value::Int(99))?;
    assert_eq!(df.row(0)?["age"], Value::Int(31));
    assert!(!copy.is_equal(&token, &df, IsEqualOptions::default())?);

    let tail = df.copy(range(1, 2))?;
    assert_eq!(tail.n_rows(), 2);
    assert_eq!(tail.row(0)?["name"], Value::from("bob"));
    Ok(())
}

#[test]
fn frame_guards_compose_steps_without_relocking() -> FrameResult<()> {
    let df = people()?;
    {
        let mut data = df.write();
        data.append(vec![Value::from("dee"), Value::from(52), Value::from(4.5)])?;
        data.remove(0)?;
        let last = data.n_rows() as isize - 1;
        data.update(last, "age", Value::Int(53))?;
    }
    assert_eq!(df.n_rows(), 3);
    assert_eq!(df.row(-1)?["age"], Value::Int(53));

    let mut owned = people()?;
    owned.get_mut().rename_column("name", "who")?;
    assert_eq!(owned.names(), vec!["who", "age", "score"]);
    Ok(())
}

#[test]
fn frame_fill_with_follows_column_kinds() -> FrameResult<()> {
    let df = people()?;
    df.fill_with(|kind| match kind {
        ValueKind::Int => Value::Int(7),
        ValueKind::Double => Value::Double(0.25),
        _ => Value::from("z"),
    })?;
    for step in df.iter(IteratorOptions::default()) {
        assert_eq!(step.value["age"], Value::Int(7));
        assert_eq!(step.value["score"], Value::Double(0.25));
        assert_eq!(step.value["name"], Value::from("z"));
        assert_eq!(step.total, 3);
    }
    Ok(())
}

#[test]
fn frame_iterates_rows_backwards() -> FrameResult<()> {
    let df = people()?;
    let names: Vec<Value> = df
        .iter(IteratorOptions::reverse())
        .map(|step| step.value["name"].clone())
        .collect();
    assert_eq!(names, vec![Value::from("cy"), Value::from("bob"), Value::from("ann")]);
    Ok(())
}
