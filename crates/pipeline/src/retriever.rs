//! Category-filtered retrieval over a record store.
//!
//! Retrieval is an exact match on the category label; there is no ranking
//! beyond recency. Results are ordered most recent first by `(year, number)`.

use consilium_core::record::{HclId, Record};
use consilium_core::taxonomy::Category;
use consilium_store::RecordStore;
use tracing::debug;

/// Records selected for one query, most recent first.
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    records: Vec<Record>,
}

impl Retrieval {
    fn ordered(mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| b.identifier.cmp(&a.identifier));
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Identifiers of every retrieved record, in retrieval order.
    pub fn identifiers(&self) -> Vec<HclId> {
        self.records.iter().map(|r| r.identifier).collect()
    }

    /// The `n` most recent identifiers.
    pub fn top_identifiers(&self, n: usize) -> Vec<HclId> {
        self.records.iter().take(n).map(|r| r.identifier).collect()
    }

    /// Non-blank descriptions in retrieval order.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .map(|r| r.description.as_str())
            .filter(|d| !d.trim().is_empty())
    }

    /// Descriptions joined into the text handed to the synthesizer.
    pub fn corpus(&self) -> String {
        self.descriptions().collect::<Vec<_>>().join("\n\n")
    }
}

/// Select the records filed under `category`.
pub fn retrieve(category: &Category, store: &RecordStore) -> Retrieval {
    let records: Vec<Record> = store.with_category(category.as_str()).cloned().collect();
    debug!(category = %category, matched = records.len(), total = store.len(), "Records retrieved");
    Retrieval::ordered(records)
}

/// Select every record in the store. Used for single-domain datasets.
pub fn retrieve_all(store: &RecordStore) -> Retrieval {
    Retrieval::ordered(store.iter().cloned().collect())
}
