//! CSV export for rotation summaries.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::RotationSummary;

/// Column header of the summary export.
const HEADER: &str = "rotation_id,rotation_name,originating_depot_name,\
                      total_distance_m,minimum_soc,soc_below_zero";

/// Exports rotation summaries to a CSV file at the given path.
///
/// Writes a header row followed by one row per summary, in the order given.
/// Identical input produces identical bytes.
///
/// # Arguments
///
/// * `summaries` - Rotation summaries in output order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(summaries: &[RotationSummary], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(summaries, buf)?;
    log::info!("wrote {} rows to {}", summaries.len(), path.display());
    Ok(())
}

/// Writes rotation summaries as CSV to any writer.
///
/// # Arguments
///
/// * `summaries` - Rotation summaries in output order
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(summaries: &[RotationSummary], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for s in summaries {
        wtr.write_record(&[
            s.rotation_id.to_string(),
            s.rotation_name.clone(),
            s.originating_depot_name.clone(),
            format!("{:.1}", s.total_distance),
            format!("{:.6}", s.minimum_soc),
            s.soc_below_zero.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
