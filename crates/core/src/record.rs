//! Decision records (HCLs) and their identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Identifier of a council decision, written `number/year` (e.g. `134/2024`).
///
/// Ordering is chronological: by year, then by number within the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HclId {
    pub number: u32,
    pub year: u32,
}

impl HclId {
    pub fn new(number: u32, year: u32) -> Self {
        Self { number, year }
    }

    /// Citation form used in answers: `HCL: nr.134/2024`.
    pub fn citation(&self) -> String {
        format!("HCL: nr.{}/{}", self.number, self.year)
    }
}

impl Ord for HclId {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.number).cmp(&(other.year, other.number))
    }
}

impl PartialOrd for HclId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.year)
    }
}

impl FromStr for HclId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StoreError::InvalidIdentifier(s.to_string());
        let (number, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        let number: u32 = number.trim().parse().map_err(|_| invalid())?;
        let year: u32 = year.trim().parse().map_err(|_| invalid())?;
        if number == 0 || year == 0 {
            return Err(invalid());
        }
        Ok(Self { number, year })
    }
}

impl Serialize for HclId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HclId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One administrative decision as stored in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Decision identifier, unique within a dataset
    pub identifier: HclId,

    /// Taxonomy label the decision was filed under
    pub category: String,

    /// Model-generated summary of the decision
    pub description: String,
}

impl Record {
    pub fn new(identifier: HclId, category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            identifier,
            category: category.into(),
            description: description.into(),
        }
    }
}
