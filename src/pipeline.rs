use crate::inspect::{FieldMap, Inspector};
use crate::loader;
use crate::normalize::normalize_fields;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default output path for write mode.
pub const DEFAULT_OUTPUT_PATH: &str = "extracted_data.json";

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the serialized dataset blob
    pub input: PathBuf,

    /// Write mode: when set, the extracted subset is normalized and written
    /// to `output_path` and the in-memory result is an empty mapping
    pub write_output: bool,

    /// Where write mode puts the extracted JSON
    pub output_path: PathBuf,
}

impl RunConfig {
    /// Report-only configuration for `input` with the default output path.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        RunConfig {
            input: input.into(),
            write_output: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Run the full pipeline: load, inspect, and optionally write.
///
/// A failed load is not an error: it is reported to the sink and the run
/// degrades to an empty result. In write mode the extracted subset lands in
/// `config.output_path` and the returned mapping is empty; otherwise the
/// extracted mapping itself is returned and nothing is written.
pub fn run<W: Write>(config: &RunConfig, report: &mut W) -> Result<FieldMap> {
    let dataset = match loader::load_path(&config.input) {
        Ok(dataset) => {
            log::info!("loaded dataset from {}", config.input.display());
            writeln!(report, "Successfully loaded dataset: {}", config.input.display())?;
            dataset
        }
        Err(err) => {
            log::error!("load failed for {}: {}", config.input.display(), err);
            writeln!(report, "Error reading dataset: {}", err)?;
            writeln!(report, "Failed to load dataset.")?;
            return Ok(FieldMap::new());
        }
    };

    let extraction = Inspector::new(&mut *report)
        .inspect(&dataset)
        .context("Failed to write inspection report")?;
    if !extraction.anomalies.is_empty() {
        log::warn!(
            "{} shape anomalies during inspection",
            extraction.anomalies.len()
        );
    }

    if !config.write_output {
        return Ok(extraction.fields);
    }

    let serializable = normalize_fields(&extraction.fields);
    write_json(&config.output_path, &serializable)?;
    writeln!(
        report,
        "Extracted dataset saved to {}",
        config.output_path.display()
    )?;

    Ok(FieldMap::new())
}

/// Encode a JSON value to `path` as UTF-8 with 4-space indentation.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value
        .serialize(&mut ser)
        .context("Failed to encode extracted dataset")?;

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
