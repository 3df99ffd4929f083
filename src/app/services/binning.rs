//! Binning of continuous fields into ordered categorical buckets
//!
//! A [`Binner`] holds ascending boundaries `b0 < b1 < ... < bn` and one label
//! per half-open interval `[b_i, b_{i+1})`. Values below `b0`, at or above
//! `bn`, and NaN fall into an explicit out-of-range bucket, so every input maps
//! to exactly one label.

use crate::constants::OUT_OF_RANGE_LABEL;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The bucket a value was assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bin<'a> {
    /// A configured bucket, with its position in boundary order
    Bucket { index: usize, label: &'a str },
    /// The explicit sentinel for values outside all buckets
    OutOfRange { label: &'a str },
}

impl<'a> Bin<'a> {
    pub fn label(&self) -> &'a str {
        match self {
            Bin::Bucket { label, .. } | Bin::OutOfRange { label } => label,
        }
    }

    /// Natural-order rank; the out-of-range bucket sorts last
    pub fn rank(&self) -> u32 {
        match self {
            Bin::Bucket { index, .. } => *index as u32,
            Bin::OutOfRange { .. } => u32::MAX,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Bin::OutOfRange { .. })
    }
}

impl fmt::Display for Bin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serializable bucket definition, as found in configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    /// Ascending boundaries; infinite ends are allowed and written as "inf"/"-inf"
    #[serde(with = "boundary_serde")]
    pub boundaries: Vec<f64>,
    /// One label per interval between consecutive boundaries
    pub labels: Vec<String>,
    /// Label for values outside every interval
    #[serde(default = "default_out_of_range_label")]
    pub out_of_range_label: String,
}

/// JSON has no infinity, so infinite boundaries travel as strings
mod boundary_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Boundary {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        values
            .iter()
            .map(|&v| {
                if v == f64::INFINITY {
                    Boundary::Text("inf".to_string())
                } else if v == f64::NEG_INFINITY {
                    Boundary::Text("-inf".to_string())
                } else {
                    Boundary::Number(v)
                }
            })
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Boundary>::deserialize(deserializer)?
            .into_iter()
            .map(|b| match b {
                Boundary::Number(v) => Ok(v),
                Boundary::Text(t) => match t.trim().to_lowercase().as_str() {
                    "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
                    "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
                    other => Err(serde::de::Error::custom(format!(
                        "invalid boundary '{}'",
                        other
                    ))),
                },
            })
            .collect()
    }
}

fn default_out_of_range_label() -> String {
    OUT_OF_RANGE_LABEL.to_string()
}

impl BinSpec {
    pub fn new(boundaries: &[f64], labels: &[&str]) -> Self {
        Self {
            boundaries: boundaries.to_vec(),
            labels: labels.iter().map(|label| label.to_string()).collect(),
            out_of_range_label: default_out_of_range_label(),
        }
    }

    /// Build a validated binner from this definition
    pub fn build(&self) -> Result<Binner> {
        Binner::new(self.boundaries.clone(), self.labels.clone())
            .map(|binner| binner.with_out_of_range_label(self.out_of_range_label.clone()))
    }
}

/// Validated bucket assignment for a continuous field
#[derive(Debug, Clone, PartialEq)]
pub struct Binner {
    boundaries: Vec<f64>,
    labels: Vec<String>,
    out_of_range_label: String,
}

impl Binner {
    /// Create a binner from ascending boundaries and interval labels
    ///
    /// Fails when there are fewer than two boundaries, when any boundary is
    /// NaN, when boundaries are not strictly ascending, or when the label count
    /// is not one less than the boundary count.
    pub fn new(boundaries: Vec<f64>, labels: Vec<String>) -> Result<Self> {
        if boundaries.len() < 2 {
            return Err(Error::configuration(format!(
                "Binning needs at least two boundaries, got {}",
                boundaries.len()
            )));
        }

        if boundaries.iter().any(|b| b.is_nan()) {
            return Err(Error::configuration("Binning boundaries cannot be NaN"));
        }

        if let Some(pair) = boundaries.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(Error::configuration(format!(
                "Binning boundaries must be strictly ascending ({} >= {})",
                pair[0], pair[1]
            )));
        }

        if labels.len() != boundaries.len() - 1 {
            return Err(Error::configuration(format!(
                "Binning needs {} labels for {} boundaries, got {}",
                boundaries.len() - 1,
                boundaries.len(),
                labels.len()
            )));
        }

        Ok(Self {
            boundaries,
            labels,
            out_of_range_label: OUT_OF_RANGE_LABEL.to_string(),
        })
    }

    /// Create a binner from static tables
    pub fn from_static(boundaries: &[f64], labels: &[&str]) -> Result<Self> {
        Self::new(
            boundaries.to_vec(),
            labels.iter().map(|label| label.to_string()).collect(),
        )
    }

    pub fn with_out_of_range_label(mut self, label: impl Into<String>) -> Self {
        self.out_of_range_label = label.into();
        self
    }

    /// Assign a value to exactly one bucket
    pub fn assign(&self, value: f64) -> Bin<'_> {
        // partition_point finds the first boundary strictly greater than value
        let upper = self.boundaries.partition_point(|b| *b <= value);

        if value.is_nan() || upper == 0 || upper == self.boundaries.len() {
            return Bin::OutOfRange {
                label: &self.out_of_range_label,
            };
        }

        let index = upper - 1;
        Bin::Bucket {
            index,
            label: &self.labels[index],
        }
    }

    /// Label of the bucket a value falls into
    pub fn label_for(&self, value: f64) -> &str {
        self.assign(value).label()
    }

    /// All labels in natural order, the out-of-range label last
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.out_of_range_label.as_str()))
    }

    /// Labels of the configured buckets, without the out-of-range label
    pub fn bucket_labels(&self) -> &[String] {
        &self.labels
    }
}
