use anyhow::{Context, Result};
use log::info;

use crate::{cli::PreviewArgs, persist, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let frame = persist::load_binary(&args.input)
        .with_context(|| format!("Loading table from {:?}", args.input))?;
    print!("{}", table::render_frame(&frame, args.rows));
    info!(
        "Displayed {} of {} row(s) from {:?}",
        frame.row_count().min(args.rows),
        frame.row_count(),
        args.input
    );
    Ok(())
}
