//! Externally produced samples
//!
//! ```json
//! [{"sample": {"x-i0-r0": 1, "t-q0-r0": 1}, "energy": -5.0, "num_occurrences": 3}]
//! ```
//!
//! `energy` and `num_occurrences` are optional; a missing energy is recomputed
//! against the model. Names are parsed back into variable keys.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{Assignment, QuadraticModel, VarKey};
use crate::solver::{Sample, SampleSet};

use super::errors::{InterchangeError, InterchangeResult};

/// One sample as written by an external solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample: BTreeMap<String, i64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub num_occurrences: Option<usize>,
}

impl SampleRecord {
    pub fn into_sample(self, model: &QuadraticModel) -> InterchangeResult<Sample> {
        let mut assignment = Assignment::new();
        for (name, value) in self.sample {
            let key: VarKey = name.parse()?;
            if !(value == 0 || value == 1) {
                return Err(InterchangeError::InvalidValue {
                    variable: name,
                    value,
                });
            }
            assignment.insert(key, value as i8);
        }
        let energy = match self.energy {
            Some(energy) => energy,
            None => model.energy(&assignment),
        };
        Ok(Sample {
            assignment,
            energy,
            num_occurrences: self.num_occurrences.unwrap_or(1),
        })
    }
}

/// Parse a JSON array of sample records
pub fn parse_samples(text: &str, model: &QuadraticModel) -> InterchangeResult<SampleSet> {
    let records: Vec<SampleRecord> = serde_json::from_str(text)?;
    let samples = records
        .into_iter()
        .map(|record| record.into_sample(model))
        .collect::<InterchangeResult<Vec<_>>>()?;
    Ok(SampleSet::from_samples(samples))
}

/// Read sample records from `path`
pub fn import_samples(path: &Path, model: &QuadraticModel) -> InterchangeResult<SampleSet> {
    let text = fs::read_to_string(path)?;
    parse_samples(&text, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> QuadraticModel {
        let mut m = QuadraticModel::binary();
        m.add_linear(VarKey::select(0, 0), 2.0);
        m.add_linear(VarKey::route(0, 0), -5.0);
        m
    }

    #[test]
    fn test_missing_energy_is_recomputed() {
        let text = r#"[
            {"sample": {"x-i0-r0": 1, "t-q0-r0": 1}},
            {"sample": {"x-i0-r0": 0, "t-q0-r0": 1}, "energy": -5.0, "num_occurrences": 4}
        ]"#;
        let set = parse_samples(text, &model()).unwrap();
        assert_eq!(set.len(), 2);
        let best = set.first().unwrap();
        assert_eq!(best.energy, -5.0);
        assert_eq!(best.num_occurrences, 4);
        let energies: Vec<f64> = set.iter().map(|s| s.energy).collect();
        assert_eq!(energies, vec![-5.0, -3.0]);
    }

    #[test]
    fn test_unknown_name_rejected() {
        let text = r#"[{"sample": {"y-1": 1}}]"#;
        let err = parse_samples(text, &model()).unwrap_err();
        assert_eq!(err.code(), "QUBO_INVALID_VARIABLE_NAME");
    }

    #[test]
    fn test_non_binary_value_rejected() {
        let text = r#"[{"sample": {"x-i0-r0": -1}}]"#;
        let err = parse_samples(text, &model()).unwrap_err();
        assert_eq!(err.code(), "QUBO_INTERCHANGE_VALUE");
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_samples("{", &model()).unwrap_err();
        assert_eq!(err.code(), "QUBO_INTERCHANGE_FORMAT");
    }
}
