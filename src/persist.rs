use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::{
    frame::{Column, Table},
    io_utils,
};

const TABLE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct StoredTableRef<'a> {
    version: u32,
    table: &'a Table,
}

#[derive(Deserialize)]
struct StoredTable {
    version: u32,
    table: Table,
}

/// Writes the table with a header row; missing cells are empty fields.
pub fn write_csv(table: &Table, path: Option<&Path>, delimiter: u8) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(path, delimiter)?;
    let mut headers = Vec::with_capacity(table.columns().len() + 1);
    headers.push(table.index_name().to_string());
    headers.extend(table.column_names());
    writer
        .write_record(&headers)
        .context("Writing output headers")?;
    for (idx, row) in table.display_rows(None).iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}

/// Native binary form; column types survive the round trip so inference is
/// not repeated on reload.
pub fn save_binary(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Creating table file {path:?}"))?;
    let mut writer = BufWriter::new(file);
    let stored = StoredTableRef {
        version: TABLE_FORMAT_VERSION,
        table,
    };
    bincode::serde::encode_into_std_write(&stored, &mut writer, bincode::config::standard())
        .context("Writing table file")?;
    writer.flush().context("Flushing table file")?;
    Ok(())
}

pub fn load_binary(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path).with_context(|| format!("Opening table file {path:?}"))?;
    let (stored, _): (StoredTable, usize) =
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .with_context(|| format!("Reading table file {path:?}"))?;
    if stored.version != TABLE_FORMAT_VERSION {
        return Err(anyhow!(
            "Unsupported table format version {} (expected {TABLE_FORMAT_VERSION})",
            stored.version
        ));
    }
    Ok(stored.table)
}

/// Loads a wide CSV as text columns; the first column becomes the index.
pub fn read_wide_csv(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Table> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let Some((index_name, column_names)) = headers.split_first() else {
        return Err(anyhow!("Input {path:?} has no header row"));
    };

    let mut index = Vec::new();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); column_names.len()];
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let mut decoded = io_utils::decode_record(&record, encoding)?.into_iter();
        index.push(decoded.next().unwrap_or_default());
        for (column, value) in cells.iter_mut().zip(decoded) {
            column.push(Some(value).filter(|v| !v.is_empty()));
        }
    }

    let columns = column_names
        .iter()
        .zip(cells)
        .map(|(name, values)| Column::text(name.clone(), values))
        .collect();
    Table::new(index_name.clone(), index, columns)
        .with_context(|| format!("Building table from {path:?}"))
}
