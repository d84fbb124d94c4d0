use anyhow::{Context, Result, anyhow};
use log::info;

use crate::{
    cli::DetectArgs,
    data::{Direction, ValueRef},
    io_utils,
    pattern::{DetectOptions, detect_column},
    persist, table,
};

pub fn execute(args: &DetectArgs) -> Result<()> {
    let delimiter = io_utils::resolve_delimiter(Some(args.input.as_path()), args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let frame = persist::read_wide_csv(&args.input, delimiter, encoding)
        .with_context(|| format!("Reading {:?}", args.input))?;
    let column = frame
        .column(&args.column)
        .ok_or_else(|| anyhow!("Column '{}' not found in {:?}", args.column, args.input))?;

    let direction = Direction::from(args.direction);
    let options = DetectOptions {
        min_unique: args.min_unique,
        max_unique: args.max_unique,
        ratio: args.ratio,
        min_length: args.min_length,
    };
    let Some(found) = detect_column(column, direction, &options) else {
        info!("No {direction} pattern in column '{}'", args.column);
        println!("no match");
        return Ok(());
    };

    let headers = vec![
        "variant".to_string(),
        "length".to_string(),
        "rows".to_string(),
    ];
    let rows = found
        .variants
        .iter()
        .map(|variant| {
            let count = (0..column.len())
                .filter_map(|row| column.value(row))
                .filter(|value| match value {
                    ValueRef::Text(text) => match direction {
                        Direction::Start => text.starts_with(variant.as_str()),
                        Direction::End => text.ends_with(variant.as_str()),
                    },
                    _ => false,
                })
                .count();
            vec![
                format!("\"{variant}\""),
                found.length.to_string(),
                count.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    info!(
        "Column '{}': {} variant(s) of length {} at {direction}",
        args.column,
        found.variants.len(),
        found.length
    );
    Ok(())
}
