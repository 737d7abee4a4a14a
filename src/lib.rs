//! # Datapeek - Dataset Inspection and Extraction
//!
//! A small toolkit for loading a serialized nested-mapping dataset blob,
//! reporting summary statistics about its structure, extracting a fixed
//! allowlist of sub-fields, and optionally writing the result as indented
//! JSON with every multi-dimensional array flattened into nested sequences.
//!
//! ## Modules
//!
//! - **value**: the closed dataset value union and its wire decoding
//! - **loader**: deserialize a blob from a byte source
//! - **inspect**: traverse a two-level mapping, report, and extract
//! - **normalize**: replace array leaves with nested plain sequences
//! - **pipeline**: top-level orchestration and the JSON writer
//!
//! ## Quick Start
//!
//! ```rust
//! use datapeek::{DatasetValue, Inspector};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let blob = json!({
//!     "train": {
//!         "audio": {"__ndarray__": {"shape": [2, 3], "data": [0.0, 0.1, 0.2, 1.0, 1.1, 1.2]}},
//!         "caption": "not extracted"
//!     }
//! });
//!
//! let dataset = DatasetValue::decode(blob)?;
//! let mut report = Vec::new();
//! let extraction = Inspector::new(&mut report).inspect(&dataset)?;
//!
//! assert!(extraction.fields["train"].contains_key("audio"));
//! assert!(!extraction.fields["train"].contains_key("caption"));
//! # Ok(())
//! # }
//! ```

pub mod inspect;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod value;

// Re-export commonly used types for convenience
pub use inspect::{Anomaly, Extraction, FieldMap, Inspector, SubFieldMap, ALLOWED_SUB_FIELDS};
pub use loader::{load_path, load_reader, LoadError};
pub use normalize::{normalize, normalize_fields};
pub use pipeline::{run, write_json, RunConfig, DEFAULT_OUTPUT_PATH};
pub use value::{ArrayError, DatasetValue, NdArray, SizeDescriptor, NDARRAY_KEY};
