use crate::value::DatasetValue;
use indexmap::IndexMap;
use std::io::{self, Write};
use thiserror::Error;

/// Sub-field names that survive extraction.
///
/// The allowlist is flat and global: the same six keys are checked for every
/// top-level field, whatever that field is called.
pub const ALLOWED_SUB_FIELDS: [&str; 6] = [
    "audio",
    "vision",
    "id",
    "text",
    "classification_labels",
    "regression_labels",
];

/// Extracted sub-fields of one top-level field.
pub type SubFieldMap = IndexMap<String, DatasetValue>;

/// The extracted dataset: top-level field -> allowlisted sub-fields.
pub type FieldMap = IndexMap<String, SubFieldMap>;

/// A non-fatal deviation from the expected two-level mapping shape.
///
/// Anomalies never abort traversal; each one degrades the affected entry to
/// an empty substitute and the walk continues with sibling keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Anomaly {
    #[error("the dataset is not a mapping (found {type_tag})")]
    DatasetNotMapping { type_tag: &'static str },

    #[error("field '{field}' is not a mapping (found {type_tag})")]
    FieldNotMapping {
        field: String,
        type_tag: &'static str,
    },

    #[error("field '{field}' has no subkeys")]
    FieldEmpty { field: String },
}

/// Result of inspecting a dataset: the filtered tree plus every anomaly
/// encountered along the way, so callers never have to parse report text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub fields: FieldMap,
    pub anomalies: Vec<Anomaly>,
}

/// Walks a two-level dataset mapping, writing a human-readable structure
/// report to its sink and extracting the allowlisted sub-fields.
pub struct Inspector<W: Write> {
    out: W,
}

impl<W: Write> Inspector<W> {
    pub fn new(out: W) -> Self {
        Inspector { out }
    }

    /// Inspect a dataset and build the filtered extraction.
    ///
    /// Every top-level field gets an entry in the result, empty when the
    /// field is not a mapping or has no subkeys. The only failure path is
    /// the report sink itself; malformed shapes become [`Anomaly`] records.
    pub fn inspect(&mut self, dataset: &DatasetValue) -> io::Result<Extraction> {
        let mut extraction = Extraction::default();

        let DatasetValue::Mapping(tree) = dataset else {
            let anomaly = Anomaly::DatasetNotMapping {
                type_tag: dataset.type_tag(),
            };
            writeln!(self.out, "The dataset provided is not a mapping.")?;
            extraction.anomalies.push(anomaly);
            return Ok(extraction);
        };

        let keys: Vec<&String> = tree.keys().collect();
        writeln!(self.out, "Top-level keys in dataset: {:?}", keys)?;
        writeln!(self.out)?;

        for (field, value) in tree {
            let DatasetValue::Mapping(sub_tree) = value else {
                writeln!(self.out, "Field '{}' is not a mapping. Skipping...", field)?;
                extraction.anomalies.push(Anomaly::FieldNotMapping {
                    field: field.clone(),
                    type_tag: value.type_tag(),
                });
                extraction.fields.insert(field.clone(), SubFieldMap::new());
                continue;
            };

            if sub_tree.is_empty() {
                writeln!(self.out, "Field '{}' has no subkeys.", field)?;
                extraction.anomalies.push(Anomaly::FieldEmpty {
                    field: field.clone(),
                });
                extraction.fields.insert(field.clone(), SubFieldMap::new());
                continue;
            }

            writeln!(self.out, "Field: {}", field)?;
            writeln!(self.out, "Number of sub-fields: {}", sub_tree.len())?;
            writeln!(
                self.out,
                "Sub-fields: {:?}",
                sub_tree.keys().collect::<Vec<_>>()
            )?;
            writeln!(self.out)?;

            let mut kept = SubFieldMap::new();
            for (sub_field, leaf) in sub_tree {
                writeln!(self.out, "\tSub-field: {}", sub_field)?;
                writeln!(self.out, "\tType of data: {}", leaf.type_tag())?;
                writeln!(self.out, "\tShape of data: {}", leaf.size_descriptor())?;
                writeln!(self.out)?;

                if ALLOWED_SUB_FIELDS.contains(&sub_field.as_str()) {
                    kept.insert(sub_field.clone(), leaf.clone());
                }
            }
            extraction.fields.insert(field.clone(), kept);

            writeln!(self.out, "{}", "-".repeat(100))?;
        }

        Ok(extraction)
    }
}
