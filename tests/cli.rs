mod common;

use assert_cmd::Command;
use common::{TestWorkspace, hike_triples, triples_csv};
use predicates::prelude::*;
use tidy_scrape::config::PipelineConfig;
use tidy_scrape::schema::{ColumnType, Schema};
use tidy_scrape::triples::Triple;

fn tidy() -> Command {
    Command::cargo_bin("tidy-scrape").expect("binary built")
}

fn read_rows(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[test]
fn clean_writes_table_schema_report_and_binary() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("triples.csv", &triples_csv(&hike_triples()));
    let output = workspace.file("hikes.csv");
    let schema = workspace.file("schema.json");
    let report = workspace.file("report.json");
    let binary = workspace.file("hikes.bin");

    tidy()
        .args(["clean", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--schema")
        .arg(&schema)
        .arg("--report")
        .arg(&report)
        .arg("--binary")
        .arg(&binary)
        .args(["--exclude", "URL", "--categorical-max-unique", "3"])
        .assert()
        .success();

    let (headers, rows) = read_rows(&output);
    assert_eq!(
        headers,
        vec![
            "ID",
            "Name",
            "Region",
            "URL",
            "Distance",
            "Elevation_Gain",
            "Rating",
            "Votes",
            "Lakes",
            "Elevation_Peak",
            "Distance_end",
        ]
    );
    assert_eq!(rows.len(), 9);
    assert_eq!(
        rows[0],
        vec![
            "hike-0",
            "Rattlesnake Ledge",
            "North Cascades",
            "https://www.wta.org/go-hiking/hikes/hike-0",
            "3.2",
            "1234",
            "3.5",
            "12",
            "True",
            "4512",
            " miles, roundtrip",
        ]
    );
    assert_eq!(rows[1][4], "5");
    assert_eq!(rows[1][8], "False");
    assert_eq!(rows[3][9], "");

    let schema = Schema::load(&schema).unwrap();
    assert_eq!(schema.column_type("Lakes"), Some(ColumnType::Boolean));
    assert_eq!(schema.column_type("Distance_end"), Some(ColumnType::Categorical));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    let actions = report["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["action"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert!(actions.contains(&"strip_start".to_string()));
    assert!(actions.contains(&"duplicate_of".to_string()));
    assert!(report["generated_at"].is_string());

    tidy()
        .args(["preview", "-i"])
        .arg(&binary)
        .args(["--rows", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Distance (numeric)"))
        .stdout(predicate::str::contains("Mailbox Peak"))
        .stdout(predicate::str::contains("Lake Serene").not());
}

#[test]
fn clean_reads_settings_from_config_file() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("triples.csv", &triples_csv(&hike_triples()));
    let config = workspace.write(
        "tidy.yaml",
        "index_column: Hike\nsplit:\n  enabled: false\ndedup:\n  enabled: false\n",
    );
    let output = workspace.file("hikes.csv");

    tidy()
        .args(["clean", "-i"])
        .arg(&input)
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let (headers, _) = read_rows(&output);
    assert_eq!(headers[0], "Hike");
    assert!(headers.contains(&"Rating_Count".to_string()));
    assert!(!headers.contains(&"Distance_end".to_string()));
}

#[test]
fn clean_fails_on_conflicting_values() {
    let workspace = TestWorkspace::new();
    let mut triples = hike_triples();
    triples.push(Triple::new("hike-4", "Rating", "1"));
    let input = workspace.write("triples.csv", &triples_csv(&triples));

    tidy()
        .args(["clean", "--duplicate-keys", "error", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate key collision"))
        .stderr(predicate::str::contains("'Rating'"));
}

#[test]
fn clean_keeps_the_first_of_conflicting_values_by_default() {
    let workspace = TestWorkspace::new();
    let mut triples = hike_triples();
    triples.push(Triple::new("hike-4", "Rating", "1"));
    let input = workspace.write("triples.csv", &triples_csv(&triples));
    let output = workspace.file("hikes.csv");

    tidy()
        .args(["clean", "--exclude", "URL", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let (headers, rows) = read_rows(&output);
    let rating = headers.iter().position(|h| h == "Rating").unwrap();
    assert_eq!(rows[4][rating], "5");
}

#[test]
fn clean_reports_missing_input() {
    let workspace = TestWorkspace::new();
    tidy()
        .args(["clean", "-i"])
        .arg(workspace.file("absent.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.csv"));
}

#[test]
fn pivot_prints_wide_table_to_stdout() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "triples.csv",
        "EntityID,Key,Value\nE1,K1,a\nE1,K2,b\nE2,K1,c\n",
    );
    tidy()
        .args(["pivot", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout("ID,K1,K2\nE1,a,b\nE2,c,\n");
}

#[test]
fn pivot_reads_tab_separated_input() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("triples.tsv", "ID\tKey\tValue\nE1\tGain\tGain: 10 ft\n");
    tidy()
        .args(["pivot", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout("ID\tElevation_Gain\nE1\tGain: 10 ft\n");
}

#[test]
fn detect_lists_variants() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "wide.csv",
        "ID,Elevation\nE1,Gain: 500 ft\nE2,Gain: 1200 ft\nE3,Gain: 80 ft\n",
    );
    tidy()
        .args(["detect", "-i"])
        .arg(&input)
        .args(["-C", "Elevation", "--direction", "prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Gain: \"  6       3"));
}

#[test]
fn detect_says_when_nothing_matches() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("wide.csv", "ID,Name\nE1,cat\nE2,dog\n");
    tidy()
        .args(["detect", "-i"])
        .arg(&input)
        .args(["-C", "Name", "--direction", "end"])
        .assert()
        .success()
        .stdout("no match\n");
}

#[test]
fn detect_rejects_unknown_column() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("wide.csv", "ID,Name\nE1,cat\n");
    tidy()
        .args(["detect", "-i"])
        .arg(&input)
        .args(["-C", "Elevation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column 'Elevation' not found"));
}

#[test]
fn config_prints_and_saves_defaults() {
    tidy()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_variants: 5"))
        .stdout(predicate::str::contains("canonical_key: Elevation_Gain"));

    let workspace = TestWorkspace::new();
    let path = workspace.file("tidy.yaml");
    tidy().args(["config", "-o"]).arg(&path).assert().success();
    assert_eq!(PipelineConfig::load(&path).unwrap(), PipelineConfig::default());
}
