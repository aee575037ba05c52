//! Index candidates

use std::fmt;

use serde::{Deserialize, Serialize};

/// A prospective single-column index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub column: String,
    pub table: String,
}

impl Candidate {
    pub fn new(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            table: table.into(),
        }
    }

    /// `CREATE INDEX` statement for this candidate
    pub fn create_statement(&self, name: &str) -> String {
        format!("CREATE INDEX {} ON {} ({})", name, self.table, self.column)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index on {} ({})", self.column, self.table)
    }
}
