use rustframe::{FrameResult, IteratorOptions, Series};

#[test]
fn cursor_steps_forward_with_total() {
    let s = Series::from_values("x", vec![0, 1, 2, 3, 4, 5, 6]);
    let steps: Vec<(usize, i32, usize)> = s
        .iter(IteratorOptions { initial_row: 1, step: 2 })
        .map(|step| (step.index, step.value, step.total))
        .collect();
    assert_eq!(steps, vec![(1, 1, 3), (3, 3, 3), (5, 5, 3)]);
}

#[test]
fn cursor_walks_backwards_from_the_end() {
    let s = Series::from_values("x", vec![0, 1, 2, 3, 4, 5, 6]);
    let values: Vec<i32> = s.iter(IteratorOptions::reverse()).map(|step| step.value).collect();
    assert_eq!(values, vec![6, 5, 4, 3, 2, 1, 0]);

    let cursor = s.iter(IteratorOptions { initial_row: -2, step: -3 });
    assert_eq!(cursor.total(), 2);
    let rows: Vec<usize> = cursor.map(|step| step.index).collect();
    assert_eq!(rows, vec![5, 2]);
}

#[test]
fn cursor_defaults_to_every_row() {
    let s = Series::from_values("x", vec!['a', 'b', 'c']);
    let values: String = s.iter(IteratorOptions::default()).map(|step| step.value).collect();
    assert_eq!(values, "abc");
}

#[test]
fn cursor_outside_the_source_yields_nothing() {
    let s = Series::from_values("x", vec![1, 2, 3]);
    let mut cursor = s.iter(IteratorOptions { initial_row: 10, step: 1 });
    assert_eq!(cursor.total(), 0);
    assert!(cursor.next().is_none());

    let empty: Series<i32> = Series::new("e");
    assert_eq!(empty.iter(IteratorOptions::reverse()).count(), 0);
}

#[test]
fn cursor_restarts_after_reset() -> FrameResult<()> {
    let s = Series::from_values("x", vec![1.5, 2.5, 3.5]);
    let data = s.read();
    let mut cursor = data.iter(IteratorOptions::default());
    assert_eq!(cursor.next().map(|step| step.index), Some(0));
    assert_eq!(cursor.next().map(|step| step.index), Some(1));

    cursor.reset();
    let first = cursor.next().map(|step| step.value);
    assert_eq!(first, Some(1.5));
    Ok(())
}

#[test]
fn cursor_with_huge_steps_stops_after_one_row() {
    let s = Series::from_values("x", vec![10, 20, 30]);

    let forward = s.iter(IteratorOptions { initial_row: 1, step: isize::MAX });
    assert_eq!(forward.total(), 1);
    let rows: Vec<(usize, i32)> = forward.map(|step| (step.index, step.value)).collect();
    assert_eq!(rows, vec![(1, 20)]);

    let backward = s.iter(IteratorOptions { initial_row: -1, step: isize::MIN });
    assert_eq!(backward.total(), 1);
    let rows: Vec<usize> = backward.map(|step| step.index).collect();
    assert_eq!(rows, vec![2]);
}
