//! `consilium ask`: Answer one question from the terminal.

use consilium_config::AppConfig;
use consilium_core::record::HclId;
use consilium_core::taxonomy::Language;
use consilium_pipeline::{Answer, Pipeline};

pub async fn run(query: String, english: bool, timpark: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    CONSILIUM_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY    = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = consilium_providers::default_from_config(&config);
    let pipeline = Pipeline::from_config(provider, &config);

    let answer = if timpark {
        pipeline.answer_timpark(&query).await?
    } else {
        pipeline
            .answer(&query, Language::from_english_flag(english))
            .await?
    };

    println!("{}", render(&answer));
    Ok(())
}

/// Answer text followed by a footer naming the category and decisions used.
fn render(answer: &Answer) -> String {
    let mut out = answer.text.clone();
    out.push_str("\n\n---\n");
    if let Some(category) = &answer.category {
        out.push_str(&format!("Category:  {category}\n"));
    }
    let identifiers = if answer.identifiers.is_empty() {
        "(none)".to_string()
    } else {
        answer
            .identifiers
            .iter()
            .map(HclId::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    out.push_str(&format!("Decisions: {identifiers}"));
    out
}
