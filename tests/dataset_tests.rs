use std::collections::BTreeSet;

use subgroup_mcts::{Condition, Dataset, MCTSError, Value};

fn weather_dataset() -> Dataset {
    Dataset::new(
        vec![
            "WEATHER".to_string(),
            "ROAD".to_string(),
            "NUM_ACIDENTES".to_string(),
        ],
        vec![
            vec![Value::from("RAIN"), Value::from("WET"), Value::Integer(1)],
            vec![Value::from("RAIN"), Value::from("DRY"), Value::Integer(2)],
            vec![Value::from("CLEAR"), Value::from("DRY"), Value::Integer(3)],
            vec![Value::from("CLEAR"), Value::from("DRY"), Value::Null],
        ],
    )
    .unwrap()
}

#[test]
fn test_filter_keeps_matching_rows() {
    let data = weather_dataset();

    let rain = data.filter(&Condition::new("WEATHER", "RAIN")).unwrap();
    assert_eq!(rain.len(), 2);
    assert_eq!(rain.row_ids(), &[0, 1]);

    // The source view is untouched
    assert_eq!(data.len(), 4);
    assert_eq!(data.row_ids(), &[0, 1, 2, 3]);
}

#[test]
fn test_filter_all_is_a_fold_of_filters() {
    let data = weather_dataset();
    let conditions = vec![
        Condition::new("WEATHER", "CLEAR"),
        Condition::new("ROAD", "DRY"),
    ];

    let both = data.filter_all(&conditions).unwrap();
    assert_eq!(both.row_ids(), &[2, 3]);

    let none = data
        .filter_all(&[Condition::new("WEATHER", "RAIN"), Condition::new("WEATHER", "CLEAR")])
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_filtered_view_is_subset_of_source() {
    let data = weather_dataset();
    let dry = data.filter(&Condition::new("ROAD", "DRY")).unwrap();
    let dry_clear = dry.filter(&Condition::new("WEATHER", "CLEAR")).unwrap();

    assert!(dry.is_subset_of(&data));
    assert!(dry_clear.is_subset_of(&dry));
    assert!(dry_clear.is_subset_of(&data));
    assert!(!data.is_subset_of(&dry));

    // Views over a different table never count as subsets
    let other = weather_dataset();
    assert!(!dry.is_subset_of(&other));
}

#[test]
fn test_unique_values_are_ordered() {
    let data = weather_dataset();
    let values = data.unique_values("WEATHER").unwrap();

    let expected: BTreeSet<Value> = [Value::from("CLEAR"), Value::from("RAIN")]
        .into_iter()
        .collect();
    assert_eq!(values, expected);
    assert_eq!(
        values.into_iter().collect::<Vec<_>>(),
        vec![Value::from("CLEAR"), Value::from("RAIN")]
    );
}

#[test]
fn test_aggregate_sums_integers_and_skips_nulls() {
    let data = weather_dataset();
    assert_eq!(data.aggregate("NUM_ACIDENTES").unwrap(), 6.0);

    let clear = data.filter(&Condition::new("WEATHER", "CLEAR")).unwrap();
    assert_eq!(clear.aggregate("NUM_ACIDENTES").unwrap(), 3.0);

    let nothing = data.filter(&Condition::new("WEATHER", "SNOW")).unwrap();
    assert_eq!(nothing.aggregate("NUM_ACIDENTES").unwrap(), 0.0);
}

#[test]
fn test_aggregate_rejects_text() {
    let data = weather_dataset();
    match data.aggregate("WEATHER") {
        Err(MCTSError::NonNumericValue { column, .. }) => assert_eq!(column, "WEATHER"),
        other => panic!("Expected NonNumericValue, got {:?}", other),
    }
}

#[test]
fn test_unknown_column_errors() {
    let data = weather_dataset();

    assert!(matches!(
        data.filter(&Condition::new("SPEED", 60i64)),
        Err(MCTSError::UnknownColumn(c)) if c == "SPEED"
    ));
    assert!(matches!(
        data.unique_values("SPEED"),
        Err(MCTSError::UnknownColumn(_))
    ));
    assert!(matches!(
        data.aggregate("SPEED"),
        Err(MCTSError::UnknownColumn(_))
    ));
}

#[test]
fn test_new_rejects_malformed_tables() {
    let duplicate = Dataset::new(vec!["A".to_string(), "A".to_string()], vec![]);
    assert!(matches!(duplicate, Err(MCTSError::InvalidDataset(_))));

    let ragged = Dataset::new(
        vec!["A".to_string(), "B".to_string()],
        vec![vec![Value::Integer(1)]],
    );
    assert!(matches!(ragged, Err(MCTSError::InvalidDataset(_))));

    let empty = Dataset::empty(vec!["A".to_string()]).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.columns(), &["A".to_string()]);
}

#[test]
fn test_value_parse_coerces_cells() {
    assert_eq!(Value::parse(""), Value::Null);
    assert_eq!(Value::parse("   "), Value::Null);
    assert_eq!(Value::parse("TRUE"), Value::Boolean(true));
    assert_eq!(Value::parse("false"), Value::Boolean(false));
    assert_eq!(Value::parse(" 42 "), Value::Integer(42));
    assert_eq!(Value::parse("-7"), Value::Integer(-7));
    assert_eq!(Value::parse(" CHUVOSO "), Value::from("CHUVOSO"));
    assert_eq!(Value::parse("3.5"), Value::from("3.5"));
}

#[test]
fn test_with_column_derives_from_rows() {
    let data = weather_dataset();
    let wet = data.filter(&Condition::new("ROAD", "WET")).unwrap();

    let flagged = data
        .with_column("IS_RAIN", |row| {
            Value::Boolean(row.get("WEATHER") == Some(&Value::from("RAIN")))
        })
        .unwrap();

    assert_eq!(flagged.columns().len(), 4);
    assert_eq!(
        flagged.unique_values("IS_RAIN").unwrap().len(),
        2,
        "Both flag values should appear"
    );

    // Derived datasets only carry the rows of the view they came from
    let wet_flagged = wet.with_column("ONE", |_| Value::Integer(1)).unwrap();
    assert_eq!(wet_flagged.len(), 1);
    assert_eq!(wet_flagged.aggregate("ONE").unwrap(), 1.0);
}

#[test]
fn test_with_column_overwrites_existing_column() {
    let data = weather_dataset();

    let replaced = data
        .with_column("ROAD", |row| match row.get("ROAD") {
            Some(Value::Text(road)) => Value::from(road.to_lowercase()),
            _ => Value::Null,
        })
        .unwrap();

    assert_eq!(replaced.columns(), data.columns());
    let roads: Vec<Value> = replaced.unique_values("ROAD").unwrap().into_iter().collect();
    assert!(roads.contains(&Value::from("wet")));
    assert!(!roads.contains(&Value::from("WET")));
}

#[test]
fn test_with_columns_derives_in_one_pass() {
    let data = weather_dataset();

    let derived = data
        .with_columns(&["ROAD", "ONE"], |_| vec![Value::Null, Value::Integer(1)])
        .unwrap();

    assert_eq!(derived.columns().len(), data.columns().len() + 1);
    assert_eq!(derived.columns().last().map(String::as_str), Some("ONE"));
    assert_eq!(derived.aggregate("ONE").unwrap(), data.len() as f64);
    assert_eq!(
        derived.unique_values("ROAD").unwrap().into_iter().collect::<Vec<_>>(),
        vec![Value::Null]
    );

    let mismatched = data.with_columns(&["A", "B"], |_| vec![Value::Null]);
    assert!(matches!(mismatched, Err(MCTSError::InvalidDataset(_))));
}
