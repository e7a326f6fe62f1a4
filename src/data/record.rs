// src/data/record.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClassifyError, ClassifyResult};

/// Fixed code -> label lookup. Index is the raw class code in the input table.
const LABEL_TABLE: [DocLabel; 3] = [DocLabel::Uws, DocLabel::Mcs, DocLabel::Ma];

/// Disorder-of-consciousness category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocLabel {
    /// Unresponsive wakefulness syndrome (vegetative state).
    #[serde(rename = "UWS")]
    Uws,
    /// Minimally conscious state.
    #[serde(rename = "MCS")]
    Mcs,
    /// Minimally aware.
    #[serde(rename = "MA")]
    Ma,
}

impl DocLabel {
    /// Resolves a raw class code. Returns `None` when the code is outside the
    /// fixed label table.
    pub fn from_code(code: u8) -> Option<Self> {
        LABEL_TABLE.get(code as usize).copied()
    }

    pub fn code(&self) -> u8 {
        match self {
            DocLabel::Uws => 0,
            DocLabel::Mcs => 1,
            DocLabel::Ma => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocLabel::Uws => "UWS",
            DocLabel::Mcs => "MCS",
            DocLabel::Ma => "MA",
        }
    }
}

impl fmt::Display for DocLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four scalar measurements recorded per patient, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "LH_Occ")]
    LhOcc,
    #[serde(rename = "LH_Temp")]
    LhTemp,
    #[serde(rename = "RH_Occ")]
    RhOcc,
    #[serde(rename = "RH_Temp")]
    RhTemp,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::LhOcc,
        Feature::LhTemp,
        Feature::RhOcc,
        Feature::RhTemp,
    ];

    /// Position of the feature inside `Record::values`.
    pub fn index(&self) -> usize {
        match self {
            Feature::LhOcc => 0,
            Feature::LhTemp => 1,
            Feature::RhOcc => 2,
            Feature::RhTemp => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::LhOcc => "LH_Occ",
            Feature::LhTemp => "LH_Temp",
            Feature::RhOcc => "RH_Occ",
            Feature::RhTemp => "RH_Temp",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single patient observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    code: u8,
    label: DocLabel,
    values: [f64; 4],
}

impl Record {
    /// Builds a record, validating the class code against the label table.
    /// `row` is only used to identify the offending input line on failure.
    pub fn new(row: usize, code: u8, values: [f64; 4]) -> ClassifyResult<Self> {
        let label = DocLabel::from_code(code).ok_or_else(|| ClassifyError::MalformedRecord {
            row,
            reason: format!("class code {} is not one of 0, 1, 2", code),
        })?;
        Ok(Self {
            code,
            label,
            values,
        })
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn label(&self) -> DocLabel {
        self.label
    }

    pub fn value(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }
}
