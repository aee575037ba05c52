//! QUBO export document
//!
//! ```json
//! {
//!   "vartype": "BINARY",
//!   "offset": 4.0,
//!   "linear": {"t-q0-r0": -3.0, "x-i0-r0": 0.0},
//!   "quadratic": [["t-q0-r0", "x-i0-r0", 2.0]],
//!   "digest": "<sha256 hex of the body>"
//! }
//! ```
//!
//! The digest covers the canonical serialization of every other field, so a
//! document edited by hand is rejected on import.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::{QuadraticModel, VarKey, Vartype};

use super::errors::{InterchangeError, InterchangeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Body {
    vartype: Vartype,
    offset: f64,
    linear: BTreeMap<VarKey, f64>,
    quadratic: Vec<(VarKey, VarKey, f64)>,
}

/// Serialized form of an assembled model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuboDocument {
    #[serde(flatten)]
    body: Body,
    pub digest: String,
}

impl QuboDocument {
    pub fn from_model(model: &QuadraticModel) -> InterchangeResult<Self> {
        let body = Body {
            vartype: model.vartype(),
            offset: model.offset(),
            linear: model.linear().map(|(v, bias)| (v.clone(), bias)).collect(),
            quadratic: model
                .quadratic()
                .map(|(u, v, bias)| (u.clone(), v.clone(), bias))
                .collect(),
        };
        let digest = digest(&body)?;
        Ok(Self { body, digest })
    }

    /// Rebuild the model after checking the digest
    pub fn to_model(&self) -> InterchangeResult<QuadraticModel> {
        let actual = digest(&self.body)?;
        if actual != self.digest {
            return Err(InterchangeError::DigestMismatch {
                expected: self.digest.clone(),
                actual,
            });
        }

        let mut model = QuadraticModel::new(self.body.vartype);
        for (v, bias) in &self.body.linear {
            model.add_linear(v.clone(), *bias);
        }
        for (u, v, bias) in &self.body.quadratic {
            model.add_quadratic(u.clone(), v.clone(), *bias);
        }
        model.set_offset(self.body.offset);
        Ok(model)
    }

    pub fn num_variables(&self) -> usize {
        self.body.linear.len()
    }

    pub fn to_json(&self) -> InterchangeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> InterchangeResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn digest(body: &Body) -> InterchangeResult<String> {
    let canonical = serde_json::to_vec(body)?;
    let hash = Sha256::digest(&canonical);
    Ok(hash.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Write `model` to `path` as a [`QuboDocument`]
pub fn export_model(model: &QuadraticModel, path: &Path) -> InterchangeResult<QuboDocument> {
    let document = QuboDocument::from_model(model)?;
    fs::write(path, document.to_json()?)?;
    Ok(document)
}

/// Read and verify a [`QuboDocument`] from `path`
pub fn import_model(path: &Path) -> InterchangeResult<QuadraticModel> {
    let text = fs::read_to_string(path)?;
    QuboDocument::from_json(&text)?.to_model()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SlackSpace;
    use tempfile::TempDir;

    fn model() -> QuadraticModel {
        let mut m = QuadraticModel::binary();
        m.add_linear(VarKey::route(0, 0), -3.0);
        m.add_variable(VarKey::select(0, 0));
        m.add_quadratic(
            VarKey::select(0, 0),
            VarKey::product(VarKey::route(0, 0), VarKey::slack(SlackSpace::Objective, 1)),
            2.0,
        );
        m.set_offset(4.0);
        m
    }

    #[test]
    fn test_document_shape() {
        let doc = QuboDocument::from_model(&model()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value["vartype"], "BINARY");
        assert_eq!(value["offset"], 4.0);
        assert_eq!(value["linear"]["t-q0-r0"], -3.0);
        assert_eq!(value["linear"]["x-i0-r0"], 0.0);
        assert_eq!(value["digest"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_file_export_and_import() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("qubo.json");
        let m = model();
        export_model(&m, &path).unwrap();
        assert_eq!(import_model(&path).unwrap(), m);
    }

    #[test]
    fn test_tampered_document_rejected() {
        let doc = QuboDocument::from_model(&model()).unwrap();
        let tampered = doc.to_json().unwrap().replace("-3.0", "-30.0");
        let err = QuboDocument::from_json(&tampered)
            .unwrap()
            .to_model()
            .unwrap_err();
        assert_eq!(err.code(), "QUBO_INTERCHANGE_DIGEST");
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = QuboDocument::from_model(&model()).unwrap();
        let b = QuboDocument::from_model(&model()).unwrap();
        assert_eq!(a.digest, b.digest);
    }
}
