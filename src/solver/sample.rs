//! Samples returned by a sampler

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Assignment, VarKey};

/// One assignment of every model variable with its energy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "sample")]
    pub assignment: Assignment,
    pub energy: f64,
    #[serde(default = "default_occurrences")]
    pub num_occurrences: usize,
}

fn default_occurrences() -> usize {
    1
}

impl Sample {
    pub fn new(assignment: Assignment, energy: f64) -> Self {
        Self {
            assignment,
            energy,
            num_occurrences: 1,
        }
    }

    /// Value of `v`, if the sample covers it
    pub fn value(&self, v: &VarKey) -> Option<i8> {
        self.assignment.get(v).copied()
    }

    /// True when `v` is present and set to 1
    pub fn is_set(&self, v: &VarKey) -> bool {
        self.value(v) == Some(1)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample(sample={{")?;
        for (n, (v, value)) in self.assignment.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", v, value)?;
        }
        write!(
            f,
            "}}, energy={}, num_occurrences={})",
            self.energy, self.num_occurrences
        )
    }
}

/// Samples ordered by ascending energy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Sort by energy, ties broken by assignment so the order is total
    pub fn from_samples(mut samples: Vec<Sample>) -> Self {
        samples.sort_by(|a, b| {
            a.energy
                .total_cmp(&b.energy)
                .then_with(|| a.assignment.cmp(&b.assignment))
        });
        Self { samples }
    }

    /// Merge identical assignments, summing their occurrence counts
    pub fn aggregate(samples: Vec<Sample>) -> Self {
        let mut sorted = Self::from_samples(samples).samples;
        sorted.dedup_by(|next, kept| {
            if next.assignment == kept.assignment {
                kept.num_occurrences += next.num_occurrences;
                true
            } else {
                false
            }
        });
        Self { samples: sorted }
    }

    /// Lowest-energy sample
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Sum of occurrence counts
    pub fn total_reads(&self) -> usize {
        self.samples.iter().map(|s| s.num_occurrences).sum()
    }
}

impl IntoIterator for SampleSet {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl fmt::Display for SampleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6} {:>24} {:>8}", "rank", "energy", "num_oc.")?;
        for (rank, sample) in self.samples.iter().enumerate() {
            writeln!(
                f,
                "{:>6} {:>24} {:>8}",
                rank, sample.energy, sample.num_occurrences
            )?;
        }
        write!(f, "['BINARY', {} rows, {} samples]", self.len(), self.total_reads())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(bits: &[i8], energy: f64) -> Sample {
        let assignment = bits
            .iter()
            .enumerate()
            .map(|(i, b)| (VarKey::select(i, 0), *b))
            .collect();
        Sample::new(assignment, energy)
    }

    #[test]
    fn test_sorted_ascending() {
        let set = SampleSet::from_samples(vec![
            sample(&[1, 0], 3.0),
            sample(&[0, 0], -1.0),
            sample(&[0, 1], 2.0),
        ]);
        let energies: Vec<f64> = set.iter().map(|s| s.energy).collect();
        assert_eq!(energies, vec![-1.0, 2.0, 3.0]);
        assert_eq!(set.first().unwrap().energy, -1.0);
    }

    #[test]
    fn test_aggregate_merges_duplicates() {
        let set = SampleSet::aggregate(vec![
            sample(&[1, 0], 3.0),
            sample(&[0, 1], 2.0),
            sample(&[1, 0], 3.0),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_reads(), 3);
        let last: Vec<&Sample> = set.iter().collect();
        assert_eq!(last[1].num_occurrences, 2);
    }

    #[test]
    fn test_display_lists_assignment() {
        let s = sample(&[1], -2.0);
        assert_eq!(
            s.to_string(),
            "Sample(sample={'x-i0-r0': 1}, energy=-2, num_occurrences=1)"
        );
    }

    #[test]
    fn test_empty_set_has_no_first() {
        assert!(SampleSet::default().first().is_none());
    }
}
