mod common;

use common::{DISTANCES, table, text_cells, text_column};
use tidy_scrape::data::Direction;
use tidy_scrape::frame::{Column, ColumnData};
use tidy_scrape::report::{Action, RunReport};
use tidy_scrape::schema::ColumnType;
use tidy_scrape::split::{DEFAULT_MAX_VARIANTS, split, split_column_name, split_in_place};

#[test]
fn splits_trip_type_into_a_categorical_column() {
    let mut t = table(vec![text_column("Distance", &DISTANCES)]);
    let mut report = RunReport::new();
    let records = split_in_place(&mut t, &[], DEFAULT_MAX_VARIANTS, &mut report).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.direction, Direction::End);
    assert_eq!(record.new_column, "Distance_end");
    assert_eq!(
        record.patterns,
        vec![" miles, roundtrip", " miles, one-way", " miles of trails"]
    );

    assert_eq!(
        text_cells(&t, "Distance"),
        common::strings(&["3.2", "5.0", "1.1", "4.5", "2.5", "0.8", "6.0", "7.3", "9.3"])
    );
    let category = t.column("Distance_end").unwrap();
    assert_eq!(category.column_type(), ColumnType::Categorical);
    let expected = (0..9)
        .map(|row| Some(record.patterns[row % 3].clone()))
        .collect::<Vec<_>>();
    assert_eq!(category.data, ColumnData::Categorical(expected));
    assert_eq!(t.column_names(), vec!["Distance", "Distance_end"]);
    assert_eq!(report.count(Action::Split), 1);
}

#[test]
fn running_split_twice_adds_nothing() {
    let first = table(vec![text_column("Distance", &DISTANCES)]);
    let (once, _) = split(&first, &[], DEFAULT_MAX_VARIANTS, &mut RunReport::new()).unwrap();
    let (twice, records) = split(&once, &[], DEFAULT_MAX_VARIANTS, &mut RunReport::new()).unwrap();
    assert!(records.is_empty());
    assert_eq!(twice, once);
}

#[test]
fn copying_variant_leaves_input_unchanged() {
    let original = table(vec![text_column("Distance", &DISTANCES)]);
    let (split_table, _) =
        split(&original, &[], DEFAULT_MAX_VARIANTS, &mut RunReport::new()).unwrap();
    assert_eq!(original.columns().len(), 1);
    assert_eq!(text_cells(&original, "Distance"), common::strings(&DISTANCES));
    assert_eq!(split_table.columns().len(), 2);
}

#[test]
fn existing_target_column_skips_the_split() {
    let mut t = table(vec![
        text_column("Distance", &DISTANCES),
        Column::categorical("Distance_end", vec![None; 9]),
    ]);
    let mut report = RunReport::new();
    let records = split_in_place(&mut t, &[], DEFAULT_MAX_VARIANTS, &mut report).unwrap();

    assert!(records.is_empty());
    assert_eq!(text_cells(&t, "Distance"), common::strings(&DISTANCES));
    assert_eq!(report.count(Action::Skipped), 1);
}

#[test]
fn variant_limit_blocks_wider_groupings() {
    let mut t = table(vec![text_column("Distance", &DISTANCES)]);
    let records = split_in_place(&mut t, &[], 2, &mut RunReport::new()).unwrap();
    assert!(records.is_empty());
    assert_eq!(t.columns().len(), 1);
}

#[test]
fn excluded_columns_are_not_split() {
    let mut t = table(vec![text_column("Distance", &DISTANCES)]);
    let records = split_in_place(
        &mut t,
        &["Distance".to_string()],
        DEFAULT_MAX_VARIANTS,
        &mut RunReport::new(),
    )
    .unwrap();
    assert!(records.is_empty());
}

#[test]
fn flag_and_missing_rows_get_no_category() {
    let mut values = DISTANCES.to_vec();
    values.push("True");
    let mut cells = common::strings(&values);
    cells.push(None);
    let mut t = table(vec![Column::text("Distance", cells)]);
    split_in_place(&mut t, &[], DEFAULT_MAX_VARIANTS, &mut RunReport::new()).unwrap();

    let distance = text_cells(&t, "Distance");
    assert_eq!(distance[9].as_deref(), Some("True"));
    assert_eq!(distance[10], None);
    let category = t.column("Distance_end").unwrap();
    assert!(category.is_missing(9));
    assert!(category.is_missing(10));
}

#[test]
fn new_column_name_carries_the_direction() {
    assert_eq!(split_column_name("Distance", Direction::Start), "Distance_start");
    assert_eq!(split_column_name("Distance", Direction::End), "Distance_end");
}
