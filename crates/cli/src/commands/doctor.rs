//! `consilium doctor`: Diagnose configuration, credentials and datasets.

use std::path::Path;

use consilium_config::AppConfig;
use consilium_core::taxonomy::{Language, Taxonomy};
use consilium_store::RecordStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Consilium Doctor: System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    // Check config
    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config loaded");
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            println!("\n  ⚠️  Fix the config file before running further checks.");
            return Ok(());
        }
    };

    if let Err(e) = config.validate() {
        println!("  ❌ {e}");
        issues += 1;
    }

    // Check API key and provider reachability
    if config.has_api_key() {
        println!("  ✅ API key configured");
        let provider = consilium_providers::default_from_config(&config);
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
            Ok(false) => {
                println!("  ⚠️  Provider '{}' answered with an error", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                issues += 1;
            }
        }
    } else {
        println!("  ⚠️  No API key configured: set CONSILIUM_API_KEY or OPENAI_API_KEY");
        issues += 1;
    }

    // Check datasets
    for language in [Language::Romanian, Language::English] {
        let taxonomy = config.taxonomies.taxonomy(language);
        let report = check_dataset(&config.datasets.general(language), Some(&taxonomy));
        issues += report.print(&format!("{language} dataset"));
    }
    let report = check_dataset(&config.datasets.timpark(), None);
    issues += report.print("TimPark dataset");

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Outcome of inspecting one dataset file.
#[derive(Debug, PartialEq)]
enum DatasetReport {
    Missing(String),
    Unreadable(String),
    Ok {
        path: String,
        records: usize,
        /// Categories present in the data but absent from the taxonomy.
        unknown_categories: Vec<String>,
    },
}

impl DatasetReport {
    /// Print the report, returning the number of issues it counts as.
    fn print(&self, name: &str) -> usize {
        match self {
            Self::Missing(path) => {
                println!("  ❌ {name} missing: {path}");
                1
            }
            Self::Unreadable(reason) => {
                println!("  ❌ {name} unreadable: {reason}");
                1
            }
            Self::Ok {
                path,
                records,
                unknown_categories,
            } => {
                println!("  ✅ {name}: {records} records ({path})");
                if unknown_categories.is_empty() {
                    0
                } else {
                    println!(
                        "  ⚠️  {name} has categories outside the taxonomy: {}",
                        unknown_categories.join("; ")
                    );
                    1
                }
            }
        }
    }
}

fn check_dataset(path: &Path, taxonomy: Option<&Taxonomy>) -> DatasetReport {
    if !path.exists() {
        return DatasetReport::Missing(path.display().to_string());
    }

    match RecordStore::load_csv(path) {
        Ok(store) => {
            let unknown_categories = match taxonomy {
                Some(taxonomy) => store
                    .category_counts()
                    .into_keys()
                    .filter(|label| taxonomy.resolve(label).is_none())
                    .map(str::to_string)
                    .collect(),
                None => Vec::new(),
            };
            DatasetReport::Ok {
                path: path.display().to_string(),
                records: store.len(),
                unknown_categories,
            }
        }
        Err(e) => DatasetReport::Unreadable(e.to_string()),
    }
}
