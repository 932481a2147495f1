//! End-to-end integration tests for the Consilium question-answering flow.
//!
//! These tests run the full pipeline from a CSV dataset on disk and a user
//! query to the formatted answer, with a scripted model standing in for the
//! provider.

use std::path::Path;
use std::sync::Arc;

use consilium_config::AppConfig;
use consilium_core::error::{Error, ProviderError};
use consilium_core::message::Message;
use consilium_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use consilium_core::record::HclId;
use consilium_core::taxonomy::{CategoryDef, Language};
use consilium_pipeline::{Pipeline, format_answer};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence and keeps
/// the prompts it was sent.
struct ScriptedProvider {
    responses: Vec<ProviderResponse>,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn texts(texts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: texts.iter().map(|t| text_response(t)).collect(),
            prompts: std::sync::Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut prompts = self.prompts.lock().unwrap();
        let index = prompts.len();
        if index >= self.responses.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                index,
                self.responses.len()
            );
        }
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        prompts.push(prompt);
        Ok(self.responses[index].clone())
    }
}

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "e2e-model".into(),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

fn config_for(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.datasets.data_dir = dir.to_path_buf();
    config.datasets.romanian = "ro.csv".into();
    config.datasets.english = "en.csv".into();
    config.datasets.timpark = "timpark.csv".into();
    config
}

fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

const ENGLISH_DATASET: &str = "hcl_id,general_categories,gpt_description\n\
    12/2024,\"Parking System, Timpark\",\"{\"\"Category\"\": \"\"Parking System, Timpark\"\", \"\"Summary\"\": \"\"Resident parking fees raised\"\"}\"\n\
    40/2023,Culture and Tourism,\"{\"\"Category\"\": \"\"Culture and Tourism\"\", \"\"Summary\"\": \"\"Autumn festival funding\"\"}\"\n";

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_parking_question_in_english() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "en.csv", ENGLISH_DATASET);
    let provider = ScriptedProvider::texts(&[
        "Sure! ```json\n{\"category\": \"Parking System, Timpark\"}\n```",
        "**Question**: Which parking decisions were adopted in 2024?**Answer**: Resident parking fees were raised.\n**Relevant HCLs**:\n- HCL: nr.12/2024",
    ]);
    let pipeline = Pipeline::from_config(provider.clone(), &config_for(dir.path()));

    let answer = pipeline
        .answer("What parking decisions were made in 2024?", Language::English)
        .await
        .unwrap();

    assert_eq!(provider.calls(), 2);
    assert_eq!(answer.category.as_ref().unwrap().as_str(), "Parking System, Timpark");
    assert_eq!(answer.identifiers, vec![HclId::new(12, 2024)]);

    let synthesis_prompt = provider.prompt(1);
    assert!(synthesis_prompt.contains("Resident parking fees raised"));
    assert!(!synthesis_prompt.contains("Autumn festival"));

    assert!(answer.text.starts_with("**Category**: Parking System, Timpark\n\n"));
    assert!(answer.text.contains("2024?\n\n**Answer**: Resident"));
    assert!(answer.text.ends_with("\n\n**Relevant HCLs**:\n- HCL: nr.12/2024"));
    assert_eq!(format_answer(&answer.text), answer.text);
}

#[tokio::test]
async fn e2e_category_without_records_answers_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "en.csv", ENGLISH_DATASET);
    let provider = ScriptedProvider::texts(&[r#"{"category": "Health and Safety"}"#]);
    let pipeline = Pipeline::from_config(provider.clone(), &config_for(dir.path()));

    let answer = pipeline
        .answer("Any hospital decisions?", Language::English)
        .await
        .unwrap();

    assert_eq!(provider.calls(), 1);
    assert!(answer.identifiers.is_empty());
    assert!(answer.text.contains("**Answer**: No local council decisions"));
}

#[tokio::test]
async fn e2e_unknown_category_fails_classification() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "en.csv", ENGLISH_DATASET);
    let provider = ScriptedProvider::texts(&[r#"{"category": "Sports"}"#]);
    let pipeline = Pipeline::from_config(provider, &config_for(dir.path()));

    let err = pipeline.answer("Stadium?", Language::English).await.unwrap_err();

    assert!(matches!(err, Error::Classification(_)));
}

#[tokio::test]
async fn e2e_missing_timpark_dataset_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::texts(&[]);
    let pipeline = Pipeline::from_config(provider.clone(), &config_for(dir.path()));

    let err = pipeline.answer_timpark("Cât costă parcarea?").await.unwrap_err();

    assert!(matches!(err, Error::MissingDataset { ref path } if path.ends_with("timpark.csv")));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn e2e_timpark_orders_whole_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "timpark.csv",
        "hcl_id,general_categories,gpt_description\n\
         3/2022,\"Sistem de parcare, Timpark\",Articole: zona 1\n\
         15/2024,\"Sistem de parcare, Timpark\",Articole: zona 2\n\
         9/2024,\"Sistem de parcare, Timpark\",Articole: zona 3\n",
    );
    let provider = ScriptedProvider::texts(&["**Răspuns**: Tarifele au crescut."]);
    let pipeline = Pipeline::from_config(provider.clone(), &config_for(dir.path()));

    let answer = pipeline.answer_timpark("Ce tarife s-au schimbat?").await.unwrap();

    assert!(answer.category.is_none());
    assert_eq!(
        answer.identifiers,
        vec![HclId::new(15, 2024), HclId::new(9, 2024), HclId::new(3, 2022)]
    );
    let prompt = provider.prompt(0);
    let newest = prompt.find("HCL: nr.15/2024").unwrap();
    let oldest = prompt.find("HCL: nr.3/2022").unwrap();
    assert!(newest < oldest);
    assert!(prompt.contains("cele mai relevante 2 HCL-uri"));
}

#[tokio::test]
async fn e2e_custom_taxonomy_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "ro.csv",
        "hcl_id,general_categories,gpt_description\n5/2024,Parcuri,Parc nou în cartier\n",
    );
    let mut config = config_for(dir.path());
    config.taxonomies.romanian = Some(vec![CategoryDef::new("Parcuri", "Spații verzi")]);
    let provider = ScriptedProvider::texts(&[
        r#"{"category": "Parcuri"}"#,
        "**Răspuns**: Se amenajează un parc nou.",
    ]);
    let pipeline = Pipeline::from_config(provider.clone(), &config);

    let answer = pipeline.answer("Parcuri noi?", Language::Romanian).await.unwrap();

    assert!(provider.prompt(0).contains("'Parcuri' - Spații verzi"));
    assert_eq!(answer.identifiers, vec![HclId::new(5, 2024)]);
    assert_eq!(
        answer.text,
        "**Categorie**: Parcuri\n\n**HCL-uri din categorie**: HCL: nr.5/2024\n\n**Răspuns**: Se amenajează un parc nou."
    );
}
