use colour_loaders::{DatasetSchema, FormatError, RawCondition, parse_records};
use proptest::prelude::*;

fn condition_strategy() -> impl Strategy<Value = (Vec<[i32; 3]>, String)> {
    (
        prop::collection::vec(any::<[i16; 3]>().prop_map(|r| r.map(i32::from)), 1..6),
        "[A-Za-z][A-Za-z -]{0,12}",
    )
}

fn raw(name: String, rows: &[[i32; 3]]) -> RawCondition {
    let mut condition = RawCondition::new(name);
    condition.rows = rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    condition
}

proptest! {
    #[test]
    fn records_keep_source_order_and_values(
        conditions in prop::collection::vec(condition_strategy(), 1..10)
    ) {
        let mut names = Vec::new();
        let mut input = Vec::new();
        for (idx, (rows, suffix)) in conditions.iter().enumerate() {
            let name = format!("{idx:02} {suffix}");
            names.push(name.clone());
            input.push(raw(name, rows));
        }

        let records = parse_records(&DatasetSchema::default(), input).unwrap();
        let keys: Vec<_> = records.keys().collect();
        prop_assert_eq!(keys, names.iter().map(String::as_str).collect::<Vec<_>>());

        for ((rows, _), record) in conditions.iter().zip(records.values()) {
            let expected: Vec<[f64; 3]> = rows.iter().map(|r| r.map(f64::from)).collect();
            prop_assert_eq!(record.coordinates(), expected.as_slice());
        }
    }

    #[test]
    fn rows_of_the_wrong_width_are_rejected(
        width in (0usize..8).prop_filter("not 3", |w| *w != 3)
    ) {
        let mut condition = RawCondition::new("A");
        condition.rows.push(vec!["1".to_string(); width]);

        let err = parse_records(&DatasetSchema::default(), vec![condition]).unwrap_err();
        let is_width_error = matches!(
            err,
            FormatError::RowWidth { expected: 3, found, row: 1, .. } if found == width
        );
        prop_assert!(is_width_error, "unexpected error: {}", err);
    }
}

#[test]
fn names_are_case_and_whitespace_sensitive() {
    let records = parse_records(
        &DatasetSchema::default(),
        vec![
            raw("CSAJ-C - da".to_string(), &[[1, 2, 3]]),
            raw("CSAJ-C - DA".to_string(), &[[4, 5, 6]]),
            raw("CSAJ-C-da".to_string(), &[[7, 8, 9]]),
        ],
    )
    .expect("distinct names");
    assert_eq!(records.len(), 3);
    assert_eq!(records["CSAJ-C - DA"].coordinates(), &[[4.0, 5.0, 6.0]]);
}
