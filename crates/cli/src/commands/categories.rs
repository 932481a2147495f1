//! `consilium categories`: Show the taxonomy queries are classified into.

use std::collections::BTreeMap;

use consilium_config::AppConfig;
use consilium_core::taxonomy::{Language, Taxonomy};
use consilium_store::RecordStore;

pub async fn run(english: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let language = Language::from_english_flag(english);
    let taxonomy = config.taxonomies.taxonomy(language);

    // Counts are best effort; the listing works without a dataset.
    let dataset = config.datasets.general(language);
    let store = RecordStore::load_csv(&dataset).ok();
    let counts = store.as_ref().map(RecordStore::category_counts);

    println!("📚 Categories ({language}, {} total)", taxonomy.len());
    println!("==========================");
    println!("{}", render(&taxonomy, counts.as_ref()));

    if store.is_none() {
        println!();
        println!("  ⚠️  Dataset not readable: {}", dataset.display());
    }

    Ok(())
}

fn render(taxonomy: &Taxonomy, counts: Option<&BTreeMap<&str, usize>>) -> String {
    taxonomy
        .iter()
        .map(|category| {
            let count = counts
                .map(|c| format!(" [{} records]", c.get(category.label.as_str()).copied().unwrap_or(0)))
                .unwrap_or_default();
            format!("  • {}{count}\n      {}", category.label, category.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
