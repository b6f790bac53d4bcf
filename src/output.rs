//! Results-file decoder.
//!
//! The toolkit writes one header line followed by one line per star:
//! identifier, the four input parameters, then exactly [`BC_SLOTS`]
//! bolometric-correction columns regardless of how many filters were
//! selected. Slots within the active filter count are labeled after the
//! filter (`BC_V`); the remaining slots are labeled by index (`BC_3`).
//! Five is a hard ceiling; a larger schema is never inferred.

use crate::errors::{BoloError, BoloResult};
use crate::registry::{FilterSet, Registry};
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Correction columns hard-reserved by the output format.
pub const BC_SLOTS: usize = 5;

/// Leading fields shared by every output record.
pub const LEADING_FIELDS: [&str; 5] = ["ID", "LOGG", "FE_H", "TEFF", "EBV"];

/// Column labels for one filter set's results.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputSchema {
    bc_labels: Vec<String>,
}

impl OutputSchema {
    pub fn for_set(registry: &Registry, set: &FilterSet) -> BoloResult<Self> {
        if set.len() > BC_SLOTS {
            return Err(BoloError::decode(
                0,
                format!(
                    "filter set '{}' selects {} filters, output reserves {}",
                    set.name,
                    set.len(),
                    BC_SLOTS
                ),
            ));
        }
        let mut bc_labels = Vec::with_capacity(BC_SLOTS);
        for slot in 0..BC_SLOTS {
            let label = match set.filters.get(slot) {
                Some(&code) => format!("BC_{}", registry.filter_name(code)?),
                None => format!("BC_{}", slot),
            };
            bc_labels.push(label);
        }
        Ok(Self { bc_labels })
    }

    /// The five correction-slot labels, in column order.
    pub fn bc_labels(&self) -> &[String] {
        &self.bc_labels
    }

    /// Slot index for a correction label, if present.
    pub fn slot(&self, label: &str) -> Option<usize> {
        self.bc_labels.iter().position(|l| l == label)
    }

    /// All column names in file order: the leading fields, then the slots.
    pub fn field_names(&self) -> Vec<&str> {
        LEADING_FIELDS
            .iter()
            .copied()
            .chain(self.bc_labels.iter().map(String::as_str))
            .collect()
    }
}

/// One decoded results line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputRecord {
    pub id: String,

    pub logg: f64,

    pub feh: f64,

    pub teff: f64,

    pub ebv: f64,

    pub bc: [f64; BC_SLOTS],
}

impl OutputRecord {
    /// Correction value for a labeled slot.
    pub fn bc_value(&self, schema: &OutputSchema, label: &str) -> Option<f64> {
        schema.slot(label).map(|slot| self.bc[slot])
    }
}

/// Decoded results: the schema for the active set plus the records in file
/// order.
#[derive(Debug, Clone)]
pub struct BcResults {
    pub schema: OutputSchema,

    pub records: Vec<OutputRecord>,
}

/// Read and decode the results file for `set`.
///
/// A missing file is a decode failure (the run did not produce results);
/// any other I/O failure is surfaced as [`BoloError::Io`].
pub fn read_results(path: &Path, registry: &Registry, set: &FilterSet) -> BoloResult<BcResults> {
    let schema = OutputSchema::for_set(registry, set)?;

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BoloError::decode(
                0,
                format!("results file missing: {}", path.display()),
            ));
        }
        Err(e) => return Err(BoloError::io(path, e)),
    };

    let mut lines = content.lines();
    if lines.next().is_none() {
        return Err(BoloError::decode(0, "results file is empty, header expected"));
    }

    let mut records = Vec::new();
    for (i, line) in lines.enumerate() {
        let line_no = i + 2;
        if line.trim().is_empty() {
            continue;
        }
        records.push(decode_line(line, line_no)?);
    }

    log::debug!("decoded {} result records from {}", records.len(), path.display());
    Ok(BcResults { schema, records })
}

fn decode_line(line: &str, line_no: usize) -> BoloResult<OutputRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let needed = LEADING_FIELDS.len() + BC_SLOTS;
    if fields.len() < needed {
        return Err(BoloError::decode(
            line_no,
            format!("{} fields present, {} required", fields.len(), needed),
        ));
    }

    let mut bc = [0.0; BC_SLOTS];
    for (slot, value) in bc.iter_mut().enumerate() {
        *value = parse_f64(fields[LEADING_FIELDS.len() + slot], line_no)?;
    }

    Ok(OutputRecord {
        id: fields[0].to_string(),
        logg: parse_f64(fields[1], line_no)?,
        feh: parse_f64(fields[2], line_no)?,
        teff: parse_f64(fields[3], line_no)?,
        ebv: parse_f64(fields[4], line_no)?,
        bc,
    })
}

fn parse_f64(field: &str, line_no: usize) -> BoloResult<f64> {
    field
        .parse::<f64>()
        .map_err(|_| BoloError::decode(line_no, format!("expected number, got '{}'", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn registry() -> Registry {
        Registry::standard().unwrap()
    }

    fn unique_temp_path(prefix: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "{}_{}_{}",
            prefix,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        path
    }

    #[test]
    fn test_schema_labels_for_three_filter_set() {
        let registry = registry();
        let set = registry.filter_set("jhk").unwrap();
        let schema = OutputSchema::for_set(&registry, set).unwrap();
        assert_eq!(
            schema.bc_labels(),
            &["BC_J", "BC_H", "BC_K_s", "BC_3", "BC_4"]
        );
    }

    #[test]
    fn test_schema_field_names_in_order() {
        let registry = registry();
        let set = registry.filter_set("ubv").unwrap();
        let schema = OutputSchema::for_set(&registry, set).unwrap();
        assert_eq!(
            schema.field_names(),
            vec!["ID", "LOGG", "FE_H", "TEFF", "EBV", "BC_U", "BC_B", "BC_V", "BC_3", "BC_4"]
        );
    }

    #[test]
    fn test_decode_file() {
        let registry = registry();
        let set = registry.filter_set("jhk").unwrap();
        let path = unique_temp_path("bolo_output_ok");
        std::fs::write(
            &path,
            "ID LOGG FE_H TEFF EBV BC1 BC2 BC3 BC4 BC5\n\
             S1 4.4 -0.2 5700 0.1 1.01 0.82 0.77 0 0\n\
             S2 2.1 0.0 4800 0.0 1.44 1.02 0.91 0 0\n",
        )
        .unwrap();

        let results = read_results(&path, &registry, set).unwrap();
        assert_eq!(results.records.len(), 2);
        let first = &results.records[0];
        assert_eq!(first.id, "S1");
        assert_eq!(first.teff, 5700.0);
        assert_eq!(first.bc, [1.01, 0.82, 0.77, 0.0, 0.0]);
        assert_eq!(first.bc_value(&results.schema, "BC_J"), Some(1.01));
        assert_eq!(first.bc_value(&results.schema, "BC_4"), Some(0.0));
        assert_eq!(first.bc_value(&results.schema, "BC_V"), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_short_line_fails_with_line_number() {
        let registry = registry();
        let set = registry.filter_set("jhk").unwrap();
        let path = unique_temp_path("bolo_output_short");
        std::fs::write(&path, "header\nS1 4.4 -0.2 5700 0.1 1.01\n").unwrap();

        let err = read_results(&path, &registry, set).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("10 required"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_non_numeric_field_fails() {
        let registry = registry();
        let set = registry.filter_set("jhk").unwrap();
        let path = unique_temp_path("bolo_output_nan");
        std::fs::write(&path, "header\nS1 4.4 -0.2 hot 0.1 1 2 3 4 5\n").unwrap();

        let err = read_results(&path, &registry, set).unwrap_err();
        assert!(err.to_string().contains("'hot'"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_decode_failure() {
        let registry = registry();
        let set = registry.filter_set("jhk").unwrap();
        let err =
            read_results(Path::new("/nonexistent/output.file.all"), &registry, set).unwrap_err();
        assert!(matches!(err, BoloError::Decode { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_empty_file_fails() {
        let registry = registry();
        let set = registry.filter_set("jhk").unwrap();
        let path = unique_temp_path("bolo_output_empty");
        std::fs::write(&path, "").unwrap();

        let err = read_results(&path, &registry, set).unwrap_err();
        assert!(err.to_string().contains("empty"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_header_only_file_yields_no_records() {
        let registry = registry();
        let set = registry.filter_set("jhk").unwrap();
        let path = unique_temp_path("bolo_output_header_only");
        std::fs::write(&path, "ID LOGG FE_H TEFF EBV BC1 BC2 BC3 BC4 BC5\n").unwrap();

        let results = read_results(&path, &registry, set).unwrap();
        assert!(results.records.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let registry = registry();
        let set = registry.filter_set("gaia").unwrap();
        let path = unique_temp_path("bolo_output_blank");
        std::fs::write(&path, "header\n\nS1 4.4 -0.2 5700 0.1 1 2 3 0 0\n\n").unwrap();

        let results = read_results(&path, &registry, set).unwrap();
        assert_eq!(results.records.len(), 1);
        assert_eq!(results.schema.bc_labels()[1], "BC_G_BP");

        let _ = std::fs::remove_file(&path);
    }
}
