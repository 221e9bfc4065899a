//! High-level pipeline API: bytes or file → decoded text → model → export.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixy::pipeline::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ConvertOptions::default();
//!     let stdout = std::io::stdout();
//!     let summary = convert_file(Path::new("population.px"), &options, stdout.lock())?;
//!     eprintln!("Wrote {} records", summary.written);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ExportError, PipelineResult};
use crate::expand::PxModel;
use crate::export::{export_records, ExportFormat};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::parser::PxParser;
use crate::source::{read_bytes, read_file, Decoded};

/// Options for a conversion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Force an input encoding instead of detecting it
    pub encoding: Option<String>,

    /// Output format
    pub format: ExportFormat,

    /// Stop after this many records
    pub limit: Option<usize>,
}

/// Shape of a parsed PX file
#[derive(Debug, Clone, Serialize)]
pub struct PxInfo {
    pub encoding: String,
    /// Dimension titles with their label counts, in source order
    pub dimensions: Vec<(String, usize)>,
    /// Records a full expansion yields, `None` on overflow
    pub expected_records: Option<usize>,
    pub has_data: bool,
}

impl PxInfo {
    pub fn from_model(model: &PxModel, encoding: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
            dimensions: model
                .dimensions()
                .iter()
                .map(|d| (d.title.clone(), d.labels.len()))
                .collect(),
            expected_records: model.expected_len(),
            has_data: !model.data().is_missing(),
        }
    }
}

/// Result of a conversion run
#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
    pub info: PxInfo,
    /// Records written to the output
    pub written: usize,
    /// DATA values drawn from the data stream
    pub data_consumed: usize,
}

/// Decode a PX file and collate it.
pub fn inspect_file(path: &Path, encoding: Option<&str>) -> PipelineResult<(PxModel, PxInfo)> {
    log_info(format!("📖 Reading {}", path.display()));
    let decoded = read_file(path, encoding)?;
    inspect_decoded(decoded)
}

/// Decode PX bytes and collate them.
pub fn inspect_bytes(bytes: &[u8], encoding: Option<&str>) -> PipelineResult<(PxModel, PxInfo)> {
    let decoded = read_bytes(bytes, encoding)?;
    inspect_decoded(decoded)
}

fn inspect_decoded(decoded: Decoded) -> PipelineResult<(PxModel, PxInfo)> {
    log_success(format!("Encoding: {}", decoded.encoding));

    let model = PxParser::new(decoded.content).model()?;
    let info = PxInfo::from_model(&model, decoded.encoding);

    log_success(format!("Found {} dimensions", info.dimensions.len()));
    for (title, count) in &info.dimensions {
        log_info_indent(format!("{} ({} values)", title, count), 1);
    }
    if !info.has_data {
        log_warning("No DATA statement");
    }
    Ok((model, info))
}

/// Convert a PX file and write the records to `writer`.
pub fn convert_file<W: Write>(
    path: &Path,
    options: &ConvertOptions,
    writer: W,
) -> PipelineResult<ConvertSummary> {
    let (model, info) = inspect_file(path, options.encoding.as_deref())?;
    convert_model(model, info, options, writer)
}

/// Convert a PX file into the file at `output`.
///
/// Records are staged in a temporary file next to `output` and renamed over
/// it once the whole run succeeded. On any error `output` keeps its previous
/// content.
pub fn convert_file_to(
    path: &Path,
    options: &ConvertOptions,
    output: &Path,
) -> PipelineResult<ConvertSummary> {
    let (model, info) = inspect_file(path, options.encoding.as_deref())?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(ExportError::from)?;
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(ExportError::from)?;

    let summary = convert_model(model, info, options, BufWriter::new(staged.as_file_mut()))?;
    staged
        .persist(output)
        .map_err(|e| ExportError::from(e.error))?;

    log_success(format!("💾 Saved to: {}", output.display()));
    Ok(summary)
}

/// Convert PX bytes and write the records to `writer`.
pub fn convert_bytes<W: Write>(
    bytes: &[u8],
    options: &ConvertOptions,
    writer: W,
) -> PipelineResult<ConvertSummary> {
    let (model, info) = inspect_bytes(bytes, options.encoding.as_deref())?;
    convert_model(model, info, options, writer)
}

fn convert_model<W: Write>(
    model: PxModel,
    info: PxInfo,
    options: &ConvertOptions,
    writer: W,
) -> PipelineResult<ConvertSummary> {
    let columns = model.columns();
    let limit = options.limit.unwrap_or(usize::MAX);

    log_info(format!("⚙️  Expanding to {:?}", options.format));

    let mut records = model.into_records();
    let written = export_records(records.by_ref().take(limit), options.format, &columns, writer)?;
    let data_consumed = records.into_model().data().consumed();

    match info.expected_records {
        Some(expected) if expected != written => {
            log_success(format!("Wrote {} of {} records", written, expected));
        }
        _ => log_success(format!("Wrote {} records", written)),
    }

    Ok(ConvertSummary {
        info,
        written,
        data_consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, PxError};

    const POPULATION: &str = r#"CHARSET="ANSI";
TITLE="Population by year and sex";
STUB="year";
HEADING="sex";
VALUES("year")="2001","2002";
VALUES("sex")="men","women";
DATA=
100 110
120 130;
"#;

    #[test]
    fn test_convert_bytes_ndjson() {
        let content = POPULATION.replace("100 110\n120 130", "100,110\n120,130");
        let options = ConvertOptions {
            format: ExportFormat::Ndjson,
            ..Default::default()
        };
        let mut out = Vec::new();
        let summary = convert_bytes(content.as_bytes(), &options, &mut out).unwrap();

        assert_eq!(summary.written, 4);
        assert_eq!(summary.data_consumed, 4);
        assert_eq!(summary.info.expected_records, Some(4));
        assert_eq!(
            summary.info.dimensions,
            vec![("year".to_string(), 2), ("sex".to_string(), 2)]
        );

        let last = String::from_utf8(out).unwrap().lines().last().unwrap().to_string();
        assert_eq!(last, r#"{"year":"2002","sex":"women","data":"130"}"#);
    }

    #[test]
    fn test_space_separated_data_is_one_field_per_line() {
        // Only commas split values; each DATA line is a single field here
        let options = ConvertOptions {
            format: ExportFormat::Csv,
            ..Default::default()
        };
        let mut out = Vec::new();
        let err = convert_bytes(POPULATION.as_bytes(), &options, &mut out).unwrap_err();
        assert!(matches!(err, PipelineError::Px(PxError::ExhaustedData { record: 2 })));
    }

    #[test]
    fn test_limit() {
        let options = ConvertOptions {
            format: ExportFormat::Ndjson,
            limit: Some(1),
            ..Default::default()
        };
        let mut out = Vec::new();
        let content = br#"VALUES("q")="a","b","c";DATA=1,2,3"#;
        let summary = convert_bytes(content, &options, &mut out).unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.data_consumed, 1);
    }

    #[test]
    fn test_convert_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"VALUES("year")="1988","1989";DATA=5,6;"#).unwrap();

        let mut out = Vec::new();
        let summary = convert_file(file.path(), &ConvertOptions::default(), &mut out).unwrap();
        assert_eq!(summary.written, 2);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[1]["year"], "1989");
        assert_eq!(value[1]["data"], "6");
    }

    #[test]
    fn test_inspect_reports_missing_data() {
        let (_, info) = inspect_bytes(br#"VALUES("year")="1988""#, Some("utf-8")).unwrap();
        assert!(!info.has_data);
        assert_eq!(info.expected_records, Some(1));
    }

    #[test]
    fn test_malformed_statement() {
        let err = inspect_bytes(b"DATA=1;oops", None).unwrap_err();
        assert!(matches!(err, PipelineError::Px(PxError::MalformedStatement(_))));
    }

    fn px_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_convert_file_to_writes_output() {
        let input = px_file(br#"VALUES("year")="1988","1989";DATA=5,6;"#);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("out.json");

        let summary = convert_file_to(input.path(), &ConvertOptions::default(), &output).unwrap();
        assert_eq!(summary.written, 2);

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(value[0]["data"], "5");
        // Only the output itself is left behind
        assert_eq!(std::fs::read_dir(output.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_convert_file_to_keeps_output_on_parse_error() {
        let input = px_file(b"DATA=1;oops");
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");
        std::fs::write(&output, r#"[{"keep":"me"}]"#).unwrap();

        let err = convert_file_to(input.path(), &ConvertOptions::default(), &output).unwrap_err();
        assert!(matches!(err, PipelineError::Px(PxError::MalformedStatement(_))));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), r#"[{"keep":"me"}]"#);
    }

    #[test]
    fn test_convert_file_to_keeps_output_on_expansion_error() {
        let input = px_file(br#"VALUES("year")="1988","1989";DATA=5;"#);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");
        std::fs::write(&output, r#"[{"keep":"me"}]"#).unwrap();

        let err = convert_file_to(input.path(), &ConvertOptions::default(), &output).unwrap_err();
        assert!(matches!(err, PipelineError::Px(PxError::ExhaustedData { record: 1 })));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), r#"[{"keep":"me"}]"#);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
