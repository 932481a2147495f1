//! Read-only record store backed by a CSV dataset.
//!
//! Datasets are produced offline (one per language/domain) and are never
//! written by Consilium. A store is loaded fresh for every request and then
//! only queried.
//!
//! Expected columns (extra columns are ignored):
//!
//! | column | alias | meaning |
//! |---|---|---|
//! | `general_categories` | `category` | taxonomy label |
//! | `gpt_description` | `description` | summary of the decision |
//! | `hcl_id` | `identifier` | `number/year` |

use consilium_core::error::StoreError;
use consilium_core::record::{HclId, Record};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;
use tracing::debug;

/// An immutable collection of decision records with unique identifiers.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "general_categories", alias = "category")]
    category: String,

    #[serde(rename = "gpt_description", alias = "description", default)]
    description: String,

    #[serde(rename = "hcl_id", alias = "identifier")]
    identifier: String,
}

impl RecordStore {
    /// Build a store from records already in memory.
    pub fn from_records(records: Vec<Record>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.identifier) {
                return Err(StoreError::DuplicateIdentifier(record.identifier.to_string()));
            }
        }
        Ok(Self { records })
    }

    /// Load a CSV dataset from disk.
    pub fn load_csv(path: &Path) -> Result<Self, StoreError> {
        let file = std::fs::File::open(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let store = Self::from_csv_reader(file, path)?;
        debug!(path = %path.display(), records = store.len(), "Dataset loaded");
        Ok(store)
    }

    /// Parse CSV from any reader. `origin` is only used in error messages.
    pub fn from_csv_reader<R: io::Read>(reader: R, origin: &Path) -> Result<Self, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| StoreError::MalformedRow {
                path: origin.to_path_buf(),
                row: e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 2),
                reason: e.to_string(),
            })?;
            let identifier: HclId = row.identifier.parse()?;
            records.push(Record::new(identifier, row.category, row.description));
        }

        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Records whose category equals `label` exactly (case-sensitive).
    pub fn with_category<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.category == label)
    }

    /// Number of records per category label, sorted by label.
    pub fn category_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.category.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
hcl_id,general_categories,gpt_description,extra
12/2023,Resurse Umane,\"{\"\"Categorie\"\": \"\"Resurse Umane\"\"}\",x
3/2024,\"Sistem de parcare, Timpark\",Tarife noi de parcare,y
";

    fn parse(csv: &str) -> Result<RecordStore, StoreError> {
        RecordStore::from_csv_reader(csv.as_bytes(), Path::new("fixture.csv"))
    }

    #[test]
    fn parses_rows_and_ignores_extra_columns() {
        let store = parse(SAMPLE).unwrap();
        assert_eq!(store.len(), 2);
        let first = store.iter().next().unwrap();
        assert_eq!(first.identifier, HclId::new(12, 2023));
        assert_eq!(first.category, "Resurse Umane");
        assert!(first.description.contains("\"Categorie\""));
    }

    #[test]
    fn accepts_generic_column_names() {
        let store = parse("identifier,category,description\n1/2020,A,first\n").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter().next().unwrap().category, "A");
    }

    #[test]
    fn category_filter_is_exact() {
        let store = parse(SAMPLE).unwrap();
        assert_eq!(store.with_category("Sistem de parcare, Timpark").count(), 1);
        assert_eq!(store.with_category("sistem de parcare, timpark").count(), 0);
        assert_eq!(store.with_category("Sistem de parcare").count(), 0);
    }

    #[test]
    fn empty_description_is_kept() {
        let store = parse("hcl_id,general_categories,gpt_description\n4/2022,A,\n").unwrap();
        assert_eq!(store.iter().next().unwrap().description, "");
    }

    #[test]
    fn missing_column_is_malformed_row() {
        let err = parse("hcl_id,gpt_description\n4/2022,text\n").unwrap_err();
        assert!(matches!(err, StoreError::MalformedRow { .. }));
    }

    #[test]
    fn bad_identifier_rejected() {
        let err = parse("hcl_id,general_categories,gpt_description\n2022,A,text\n").unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentifier(ref raw) if raw == "2022"));
    }

    #[test]
    fn duplicate_identifier_rejected() {
        let err = parse(
            "hcl_id,general_categories,gpt_description\n4/2022,A,one\n4/2022,B,two\n",
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentifier(ref id) if id == "4/2022"));
    }

    #[test]
    fn category_counts_group_labels() {
        let store = parse(
            "hcl_id,general_categories,gpt_description\n1/2022,A,x\n2/2022,B,y\n3/2022,A,z\n",
        )
        .unwrap();
        let counts = store.category_counts();
        assert_eq!(counts.get("A"), Some(&2));
        assert_eq!(counts.get("B"), Some(&1));
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let store = RecordStore::load_csv(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = RecordStore::load_csv(Path::new("/nonexistent/dataset.csv")).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }
}
