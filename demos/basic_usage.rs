use std::convert::Infallible;

use rustframe::{
    compare_fn, is_less_than, CancelToken, DataFrame, FilterAction, FilterOptions, FrameResult, IsEqualOptions,
    IteratorOptions, RangeOptions, Row, Series, SortKey, SortOptions, Value,
};

fn main() -> FrameResult<()> {
    let token = CancelToken::new();

    let accounts = DataFrame::new(vec![
        Series::from_values("account", vec!["Checking".to_string(), "Savings".to_string()]).into(),
        Series::from_values("balance", vec![1_250.45, 9_001.12])
            .with_is_less_than(compare_fn(is_less_than::<f64>))
            .into(),
    ])?;

    accounts.append(vec![Value::from("Brokerage"), Value::from(4_300.0)])?;
    accounts.prepend(vec![Value::from("Cash"), Value::Null])?;

    println!("Accounts:");
    for step in accounts.iter(IteratorOptions::default()) {
        println!("  {:>2}/{} {:?}", step.index + 1, step.total, step.value);
    }

    let snapshot = accounts.copy(RangeOptions::default())?;
    accounts.sort(&token, &[SortKey::desc("balance")], SortOptions { stable: true, desc: false })?;
    println!("\nSorted by balance: {}", accounts.read().series::<f64>("balance")?);
    println!(
        "Row order unchanged by the sort: {}",
        accounts.is_equal(&token, &snapshot, IsEqualOptions::default())?
    );

    let funded = |row: &Row, _: usize, _: usize| -> Result<FilterAction, Infallible> {
        Ok(match row["balance"] {
            Value::Double(balance) if balance >= 1_000.0 => FilterAction::Keep,
            _ => FilterAction::Drop,
        })
    };
    accounts.filter(&token, funded, FilterOptions::in_place())?;
    println!("\nFunded accounts: {:?}", accounts.names());
    for step in accounts.iter(IteratorOptions::reverse()) {
        println!("  {} {}", step.value["account"], step.value["balance"]);
    }
    Ok(())
}
