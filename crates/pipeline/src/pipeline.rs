//! End-to-end question answering: load, classify, retrieve, synthesize, format.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use consilium_config::{AppConfig, PipelineConfig};
use consilium_core::error::Error;
use consilium_core::provider::Provider;
use consilium_core::record::HclId;
use consilium_core::taxonomy::{Category, Language, Taxonomy};
use consilium_store::RecordStore;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::completion::ModelClient;
use crate::formatter::format_answer;
use crate::prompts;
use crate::retriever::{retrieve, retrieve_all};
use crate::synthesizer::{SynthesisStyle, Synthesizer};

/// Numeric knobs shared by both pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub recency_cutoff_year: u32,
    pub citation_count: usize,
    pub timpark_citation_count: usize,
    pub top_identifiers: usize,
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            recency_cutoff_year: config.recency_cutoff_year,
            citation_count: config.citation_count,
            timpark_citation_count: config.timpark_citation_count,
            top_identifiers: config.top_identifiers,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

/// Everything that differs between the language variants of the general
/// pipeline.
#[derive(Debug, Clone)]
pub struct VariantProfile {
    pub language: Language,
    pub taxonomy: Taxonomy,
    pub dataset: PathBuf,
}

impl VariantProfile {
    pub fn new(language: Language, taxonomy: Taxonomy, dataset: impl Into<PathBuf>) -> Self {
        Self {
            language,
            taxonomy,
            dataset: dataset.into(),
        }
    }

    pub fn from_config(config: &AppConfig, language: Language) -> Self {
        Self::new(
            language,
            config.taxonomies.taxonomy(language),
            config.datasets.general(language),
        )
    }
}

/// A finished, formatted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    /// Classified category; `None` for the TimPark domain.
    pub category: Option<Category>,
    /// Most recent identifiers among the retrieved records.
    pub identifiers: Vec<HclId>,
}

/// The question-answering pipeline. Immutable once built; share it behind
/// an `Arc`.
pub struct Pipeline {
    classifier: Classifier,
    synthesizer: Synthesizer,
    settings: PipelineSettings,
    romanian: VariantProfile,
    english: VariantProfile,
    timpark_dataset: PathBuf,
}

impl Pipeline {
    pub fn new(
        client: ModelClient,
        settings: PipelineSettings,
        romanian: VariantProfile,
        english: VariantProfile,
        timpark_dataset: impl Into<PathBuf>,
    ) -> Self {
        Self {
            classifier: Classifier::new(client.clone()),
            synthesizer: Synthesizer::new(client, settings.recency_cutoff_year),
            settings,
            romanian,
            english,
            timpark_dataset: timpark_dataset.into(),
        }
    }

    /// Build a pipeline from application config around `provider`.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        let client = ModelClient::new(provider, &config.default_model, config.sampling());
        Self::new(
            client,
            PipelineSettings::from(&config.pipeline),
            VariantProfile::from_config(config, Language::Romanian),
            VariantProfile::from_config(config, Language::English),
            config.datasets.timpark(),
        )
    }

    pub fn variant(&self, language: Language) -> &VariantProfile {
        match language {
            Language::Romanian => &self.romanian,
            Language::English => &self.english,
        }
    }

    /// Answer a general question in `language`.
    pub async fn answer(&self, query: &str, language: Language) -> Result<Answer, Error> {
        let store = load_dataset(&self.variant(language).dataset).await?;
        self.answer_with_store(query, language, &store).await
    }

    /// Answer a general question against an already loaded store.
    pub async fn answer_with_store(
        &self,
        query: &str,
        language: Language,
        store: &RecordStore,
    ) -> Result<Answer, Error> {
        let variant = self.variant(language);
        info!(%language, query_len = query.len(), records = store.len(), "Answering query");

        let category = self
            .classifier
            .classify(query, language, &variant.taxonomy)
            .await?;

        let retrieval = retrieve(&category, store);
        let identifiers = retrieval.top_identifiers(self.settings.top_identifiers);

        let synthesis = self
            .synthesizer
            .synthesize(
                query,
                &retrieval,
                self.settings.citation_count,
                SynthesisStyle::General(language),
            )
            .await?;

        let text = format_answer(&compose(language, &category, &identifiers, &synthesis.text));
        info!(
            category = %category,
            matched = retrieval.len(),
            grounded = synthesis.grounded,
            answer_len = text.len(),
            "Query answered"
        );

        Ok(Answer {
            text,
            category: Some(category),
            identifiers,
        })
    }

    /// Answer a parking-regulation question. Classification is skipped; the
    /// whole TimPark dataset is the retrieval set.
    pub async fn answer_timpark(&self, query: &str) -> Result<Answer, Error> {
        let store = load_dataset(&self.timpark_dataset).await?;
        self.answer_timpark_with_store(query, &store).await
    }

    pub async fn answer_timpark_with_store(
        &self,
        query: &str,
        store: &RecordStore,
    ) -> Result<Answer, Error> {
        info!(query_len = query.len(), records = store.len(), "Answering TimPark query");

        let retrieval = retrieve_all(store);
        let synthesis = self
            .synthesizer
            .synthesize(
                query,
                &retrieval,
                self.settings.timpark_citation_count,
                SynthesisStyle::Timpark,
            )
            .await?;

        let text = format_answer(&synthesis.text);
        info!(grounded = synthesis.grounded, answer_len = text.len(), "TimPark query answered");

        Ok(Answer {
            text,
            category: None,
            identifiers: retrieval.top_identifiers(self.settings.top_identifiers),
        })
    }
}

/// Load a dataset on the blocking pool. A path that does not exist is
/// reported as a missing dataset rather than a read error.
pub async fn load_dataset(path: &Path) -> Result<RecordStore, Error> {
    if !path.exists() {
        return Err(Error::MissingDataset {
            path: path.to_path_buf(),
        });
    }

    let owned = path.to_path_buf();
    let store = tokio::task::spawn_blocking(move || RecordStore::load_csv(&owned))
        .await
        .map_err(|e| Error::Internal(format!("dataset loader panicked: {e}")))??;

    debug!(path = %path.display(), records = store.len(), "Store ready");
    Ok(store)
}

/// Prefix the synthesized text with the category and its most recent
/// decisions.
fn compose(language: Language, category: &Category, identifiers: &[HclId], body: &str) -> String {
    let mut text = format!("**{}**: {}\n", prompts::category_heading(language), category);
    if !identifiers.is_empty() {
        let citations = identifiers
            .iter()
            .map(HclId::citation)
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!("**{}**: {}\n", prompts::decisions_heading(language), citations));
    }
    text.push_str(body);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use consilium_core::provider::SamplingConfig;
    use std::io::Write;

    fn pipeline(provider: Arc<dyn Provider>, dir: &Path) -> Pipeline {
        let client = ModelClient::new(provider, "mock-model", SamplingConfig::deterministic());
        Pipeline::new(
            client,
            PipelineSettings::default(),
            VariantProfile::new(Language::Romanian, Taxonomy::romanian(), dir.join("ro.csv")),
            VariantProfile::new(Language::English, Taxonomy::english(), dir.join("en.csv")),
            dir.join("timpark.csv"),
        )
    }

    fn write_csv(path: &Path, body: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[tokio::test]
    async fn parking_question_cites_only_parking_record() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            &dir.path().join("en.csv"),
            "hcl_id,general_categories,gpt_description\n\
             12/2024,\"Parking System, Timpark\",New parking fees for the city centre\n\
             40/2023,Culture and Tourism,Funding for the autumn festival\n",
        );
        let provider = Arc::new(SequentialMockProvider::texts(&[
            r#"{"category": "Parking System, Timpark"}"#,
            "**Answer**: In 2024 the council set new parking fees.**HCLs**: HCL: nr.12/2024",
        ]));
        let pipeline = pipeline(provider.clone(), dir.path());

        let answer = pipeline
            .answer("What parking decisions were made in 2024?", Language::English)
            .await
            .unwrap();

        assert_eq!(answer.category.unwrap().as_str(), "Parking System, Timpark");
        assert_eq!(answer.identifiers, vec![HclId::new(12, 2024)]);
        assert_eq!(
            answer.text,
            "**Category**: Parking System, Timpark\n\n\
             **HCLs in this category**: HCL: nr.12/2024\n\n\
             **Answer**: In 2024 the council set new parking fees.\n\n\
             **HCLs**: HCL: nr.12/2024"
        );

        let synthesis_prompt = &provider.requests()[1].messages[1].content;
        assert!(synthesis_prompt.contains("New parking fees"));
        assert!(!synthesis_prompt.contains("autumn festival"));
    }

    #[tokio::test]
    async fn both_calls_run_at_temperature_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "temperature = 0.7\ntop_p = 0.5\n").unwrap();
        let config = AppConfig::load_from(&config_path).unwrap();
        assert!(config.validate().is_ok());

        let store = RecordStore::from_records(vec![record(1, 2024, "Resurse Umane", "x")]).unwrap();
        let provider = Arc::new(SequentialMockProvider::texts(&[
            r#"{"category": "Resurse Umane"}"#,
            "**Răspuns**: da",
        ]));
        let pipeline = Pipeline::from_config(provider.clone(), &config);

        pipeline
            .answer_with_store("Angajări?", Language::Romanian, &store)
            .await
            .unwrap();

        let sampling: Vec<_> = provider.requests().iter().map(|r| r.sampling).collect();
        assert_eq!(sampling.len(), 2);
        for s in sampling {
            assert_eq!(s.temperature, 0.0);
            assert_eq!(s.top_p, Some(0.5));
        }
    }

    #[tokio::test]
    async fn empty_category_answers_without_second_call() {
        let store = RecordStore::from_records(vec![record(1, 2024, "Resurse Umane", "x")]).unwrap();
        let provider = Arc::new(SequentialMockProvider::texts(&[
            r#"{"category": "Cultură și Turism"}"#,
        ]));
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(provider.clone(), dir.path());

        let answer = pipeline
            .answer_with_store("Festivaluri?", Language::Romanian, &store)
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 1);
        assert!(answer.identifiers.is_empty());
        assert!(answer.text.starts_with("**Categorie**: Cultură și Turism\n\n**Răspuns**:"));
    }

    #[tokio::test]
    async fn unknown_category_is_classification_error() {
        let store = RecordStore::from_records(vec![record(1, 2024, "Resurse Umane", "x")]).unwrap();
        let provider = Arc::new(SequentialMockProvider::texts(&[r#"{"category": "Astronomie"}"#]));
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(provider.clone(), dir.path());

        let err = pipeline
            .answer_with_store("Stele?", Language::Romanian, &store)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Classification(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn missing_general_dataset_fails_before_model_call() {
        let provider = Arc::new(SequentialMockProvider::texts(&[]));
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(provider.clone(), dir.path());

        let err = pipeline.answer("q", Language::Romanian).await.unwrap_err();

        assert!(matches!(err, Error::MissingDataset { ref path } if path.ends_with("ro.csv")));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_timpark_dataset_is_error() {
        let provider = Arc::new(SequentialMockProvider::texts(&[]));
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(provider, dir.path());

        let err = pipeline.answer_timpark("tarife").await.unwrap_err();

        assert!(matches!(err, Error::MissingDataset { .. }));
    }

    #[tokio::test]
    async fn timpark_skips_classification() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            &dir.path().join("timpark.csv"),
            "hcl_id,general_categories,gpt_description\n\
             3/2023,\"Sistem de parcare, Timpark\",Articole: tarif vechi\n\
             8/2024,\"Sistem de parcare, Timpark\",Articole: tarif nou\n",
        );
        let provider = Arc::new(SequentialMockProvider::texts(&["Tarifele s-au schimbat.**Concluzii**: da"]));
        let pipeline = pipeline(provider.clone(), dir.path());

        let answer = pipeline.answer_timpark("Ce tarife sunt?").await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert!(answer.category.is_none());
        assert_eq!(answer.identifiers, vec![HclId::new(8, 2024), HclId::new(3, 2023)]);
        assert_eq!(answer.text, "Tarifele s-au schimbat.\n\n**Concluzii**: da");
    }

    #[tokio::test]
    async fn malformed_dataset_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            &dir.path().join("timpark.csv"),
            "hcl_id,general_categories,gpt_description\nnot-an-id,x,y\n",
        );
        let pipeline = pipeline(Arc::new(SequentialMockProvider::texts(&[])), dir.path());

        let err = pipeline.answer_timpark("q").await.unwrap_err();

        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn compose_omits_empty_decision_list() {
        let category = Taxonomy::english().resolve("Health and Safety").unwrap();
        assert_eq!(
            compose(Language::English, &category, &[], "body"),
            "**Category**: Health and Safety\nbody"
        );
    }
}
