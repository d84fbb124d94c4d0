#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};
use tidy_scrape::frame::{Column, Table};
use tidy_scrape::triples::Triple;

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Builds a table indexed `e0..eN` from the given columns.
pub fn table(columns: Vec<Column>) -> Table {
    let rows = columns.first().map(Column::len).unwrap_or(0);
    let index = (0..rows).map(|i| format!("e{i}")).collect();
    Table::new("ID", index, columns).expect("valid table")
}

pub fn text_column(name: &str, values: &[&str]) -> Column {
    Column::text(name, strings(values))
}

pub fn strings(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

pub fn text_cells(table: &Table, name: &str) -> Vec<Option<String>> {
    table
        .column(name)
        .unwrap_or_else(|| panic!("column {name} missing"))
        .as_text()
        .unwrap_or_else(|| panic!("column {name} is not text"))
        .to_vec()
}

/// Three trip types, three rows each, with varied mileage.
pub const DISTANCES: [&str; 9] = [
    "3.2 miles, roundtrip",
    "5.0 miles, one-way",
    "1.1 miles of trails",
    "4.5 miles, roundtrip",
    "2.5 miles, one-way",
    "0.8 miles of trails",
    "6.0 miles, roundtrip",
    "7.3 miles, one-way",
    "9.3 miles of trails",
];

pub const NAMES: [&str; 9] = [
    "Rattlesnake Ledge",
    "Mailbox Peak",
    "Lake Serene",
    "Mount Si",
    "Twin Falls",
    "Poo Poo Point",
    "Wallace Falls",
    "Heather Lake",
    "Snow Lake",
];
pub const REGIONS: [&str; 3] = ["North Cascades", "Olympic Peninsula", "Puget Sound"];
pub const GAINS: [&str; 9] = [
    "1234", "851", "2207", "3019", "415", "998", "1502", "663", "2780",
];
pub const RATINGS: [&str; 9] = ["3.5", "4", "4.5", "2", "5", "3", "4.25", "1.5", "3.75"];
pub const VOTES: [&str; 9] = ["12", "7", "30", "45", "3", "18", "27", "9", "61"];
pub const PEAKS: [&str; 3] = ["4512", "3207", "6150"];

/// Nine scraped hikes in long format. Elevation arrives under three key
/// spellings, one triple has no value, one is repeated verbatim, and
/// `Rating_Count` mirrors `Votes`.
pub fn hike_triples() -> Vec<Triple> {
    let mut triples = Vec::new();
    for i in 0..9 {
        let id = format!("hike-{i}");
        triples.push(Triple::new(&id, "Name", NAMES[i]));
        triples.push(Triple::new(&id, "Region", REGIONS[i % 3]));
        triples.push(Triple::new(
            &id,
            "URL",
            &format!("https://www.wta.org/go-hiking/hikes/{id}"),
        ));
        triples.push(Triple::new(&id, "Distance", DISTANCES[i]));
        let gain_key = if i % 2 == 0 { "Elevation" } else { "Gain" };
        triples.push(Triple::new(
            &id,
            gain_key,
            &format!("Gain: {} feet", GAINS[i]),
        ));
        triples.push(Triple::new(&id, "Rating", RATINGS[i]));
        triples.push(Triple::new(&id, "Votes", VOTES[i]));
        triples.push(Triple::new(&id, "Rating_Count", VOTES[i]));
        if i % 2 == 0 {
            triples.push(Triple::new(&id, "Lakes", "True"));
        }
        if i < 3 {
            let peak_key = if i == 0 { "Highest Point" } else { "Peak" };
            triples.push(Triple::new(
                &id,
                peak_key,
                &format!("Highest Point: {} feet", PEAKS[i]),
            ));
        }
    }
    triples.push(Triple {
        entity: Some("hike-0".to_string()),
        key: Some("Alerts".to_string()),
        value: None,
    });
    triples.push(Triple::new("hike-1", "Name", NAMES[1]));
    triples
}

/// Renders triples as a molten `ID,Key,Value` CSV body.
pub fn triples_csv(triples: &[Triple]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["ID", "Key", "Value"]).unwrap();
    for triple in triples {
        writer
            .write_record([
                triple.entity.as_deref().unwrap_or(""),
                triple.key.as_deref().unwrap_or(""),
                triple.value.as_deref().unwrap_or(""),
            ])
            .unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}
