//! Record export.
//!
//! Streams expanded records to a writer as a JSON array, NDJSON or CSV. The
//! record iterator is drained one item at a time; nothing is collected.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult, PxResult};
use crate::models::Record;

/// Output format for expanded records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// One JSON object per line
    Ndjson,
    /// CSV with one column per dimension plus `data`
    Csv,
}

/// Write every record to `writer`.
///
/// `columns` is the CSV header (see [`crate::PxModel::columns`]); other
/// formats ignore it. Returns the number of records written. On a
/// [`crate::PxError`] the records before it stay written and the error is
/// returned.
pub fn export_records<I, W>(
    records: I,
    format: ExportFormat,
    columns: &[String],
    writer: W,
) -> PipelineResult<usize>
where
    I: IntoIterator<Item = PxResult<Record>>,
    W: Write,
{
    match format {
        ExportFormat::Json => write_json(records.into_iter(), writer),
        ExportFormat::Ndjson => write_ndjson(records.into_iter(), writer),
        ExportFormat::Csv => write_csv(records.into_iter(), columns, writer),
    }
}

fn write_json<I, W>(records: I, mut writer: W) -> PipelineResult<usize>
where
    I: Iterator<Item = PxResult<Record>>,
    W: Write,
{
    let mut count = 0;
    let outcome = (|| -> PipelineResult<()> {
        writer.write_all(b"[").map_err(io_err)?;
        for record in records {
            let record = record?;
            if count > 0 {
                writer.write_all(b",").map_err(io_err)?;
            }
            writer.write_all(b"\n  ").map_err(io_err)?;
            serde_json::to_writer(&mut writer, &record).map_err(json_err)?;
            count += 1;
        }
        if count > 0 {
            writer.write_all(b"\n").map_err(io_err)?;
        }
        writer.write_all(b"]\n").map_err(io_err)?;
        Ok(())
    })();
    finish(outcome, writer.flush().map_err(io_err), count)
}

fn write_ndjson<I, W>(records: I, mut writer: W) -> PipelineResult<usize>
where
    I: Iterator<Item = PxResult<Record>>,
    W: Write,
{
    let mut count = 0;
    let outcome = (|| -> PipelineResult<()> {
        for record in records {
            let record = record?;
            serde_json::to_writer(&mut writer, &record).map_err(json_err)?;
            writer.write_all(b"\n").map_err(io_err)?;
            count += 1;
        }
        Ok(())
    })();
    finish(outcome, writer.flush().map_err(io_err), count)
}

fn write_csv<I, W>(records: I, columns: &[String], writer: W) -> PipelineResult<usize>
where
    I: Iterator<Item = PxResult<Record>>,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut count = 0;
    let outcome = (|| -> PipelineResult<()> {
        csv_writer.write_record(columns).map_err(csv_err)?;
        for record in records {
            let record = record?;
            let row = columns.iter().map(|c| record.get(c).unwrap_or(""));
            csv_writer.write_record(row).map_err(csv_err)?;
            count += 1;
        }
        Ok(())
    })();
    finish(outcome, csv_writer.flush().map_err(io_err), count)
}

/// Flush even when the record stream failed, then report the first error.
fn finish(
    outcome: PipelineResult<()>,
    flushed: PipelineResult<()>,
    count: usize,
) -> PipelineResult<usize> {
    outcome?;
    flushed?;
    Ok(count)
}

fn io_err(e: std::io::Error) -> PipelineError {
    PipelineError::Export(e.into())
}

fn json_err(e: serde_json::Error) -> PipelineError {
    PipelineError::Export(e.into())
}

fn csv_err(e: csv::Error) -> PipelineError {
    PipelineError::Export(e.into())
}
