mod common;

use common::{DISTANCES, strings};
use tidy_scrape::data::Direction;
use tidy_scrape::frame::Column;
use tidy_scrape::pattern::{DetectOptions, detect, detect_column};

#[test]
fn single_variant_limit_rejects_unrelated_values() {
    let cells = strings(&["cat", "dog"]);
    let options = DetectOptions::unanimous(1);
    for direction in Direction::BOTH {
        assert_eq!(detect(&cells, direction, &options), None);
    }
}

#[test]
fn unanimous_suffix_is_found_at_end() {
    let cells = strings(&["4512 feet", "3207 feet", "6150 feet"]);
    let found = detect(&cells, Direction::End, &DetectOptions::unanimous(1)).unwrap();
    assert_eq!(found.unanimous_text(), Some(" feet"));
    assert_eq!(found.length, 5);
    assert_eq!(found.direction, Direction::End);
}

#[test]
fn empty_and_all_missing_columns_have_no_pattern() {
    let options = DetectOptions::unanimous(1);
    let empty: Vec<Option<String>> = Vec::new();
    assert_eq!(detect(&empty, Direction::Start, &options), None);

    let missing: Vec<Option<String>> = vec![None, None, None];
    assert_eq!(detect(&missing, Direction::Start, &options), None);
}

#[test]
fn a_single_distinct_value_has_no_pattern() {
    let cells = strings(&["Gain: 500 ft", "Gain: 500 ft"]);
    assert_eq!(
        detect(&cells, Direction::Start, &DetectOptions::unanimous(1)),
        None
    );
}

#[test]
fn missing_cells_are_ignored() {
    let cells = vec![
        Some("Gain: 500 ft".to_string()),
        None,
        Some("Gain: 80 ft".to_string()),
    ];
    let found = detect(&cells, Direction::Start, &DetectOptions::unanimous(1)).unwrap();
    assert_eq!(found.unanimous_text(), Some("Gain: "));
}

#[test]
fn grouping_finds_recurring_trip_types() {
    let cells = strings(&DISTANCES);
    let found = detect(&cells, Direction::End, &DetectOptions::grouping(5)).unwrap();
    assert_eq!(found.length, 15);
    assert_eq!(
        found.variants,
        vec![
            "iles, roundtrip".to_string(),
            " miles, one-way".to_string(),
            "miles of trails".to_string(),
        ]
    );
    assert_eq!(found.unanimous_text(), None);
}

#[test]
fn grouping_rejects_leading_numbers() {
    let cells = strings(&DISTANCES);
    assert_eq!(
        detect(&cells, Direction::Start, &DetectOptions::grouping(5)),
        None
    );
}

#[test]
fn min_length_bounds_the_scan() {
    let cells = strings(&["ab-1", "ab-2"]);
    let found = detect(&cells, Direction::Start, &DetectOptions::unanimous(3)).unwrap();
    assert_eq!(found.unanimous_text(), Some("ab-"));
    assert_eq!(
        detect(&cells, Direction::Start, &DetectOptions::unanimous(4)),
        None
    );
}

#[test]
fn lengths_are_counted_in_characters() {
    let cells = strings(&["Höhe: 12 m", "Höhe: 7 m"]);
    let found = detect(&cells, Direction::Start, &DetectOptions::unanimous(1)).unwrap();
    assert_eq!(found.length, 6);
    assert_eq!(found.unanimous_text(), Some("Höhe: "));
}

#[test]
fn detect_column_ignores_typed_columns() {
    let mut column = Column::from_strs("Rating", &[Some("1.5"), Some("1.7")]);
    assert!(detect_column(&column, Direction::Start, &DetectOptions::unanimous(1)).is_some());

    column.data = tidy_scrape::frame::ColumnData::Numeric(vec![Some(1.5), Some(1.7)]);
    assert_eq!(
        detect_column(&column, Direction::Start, &DetectOptions::unanimous(1)),
        None
    );
}
