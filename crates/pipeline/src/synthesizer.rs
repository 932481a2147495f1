//! Answer synthesis from retrieved records.

use consilium_core::error::ProviderError;
use consilium_core::taxonomy::Language;
use tracing::{debug, info};

use crate::completion::ModelClient;
use crate::prompts;
use crate::retriever::Retrieval;

/// Which prompt family a synthesis uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisStyle {
    /// Category-scoped answer in the given language.
    General(Language),
    /// Parking-regulation answer over article/motivation records (Romanian).
    Timpark,
}

impl SynthesisStyle {
    pub fn language(self) -> Language {
        match self {
            Self::General(language) => language,
            Self::Timpark => Language::Romanian,
        }
    }
}

/// The model's answer, or the fixed reply used when nothing was retrieved.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub text: String,
    /// False when no records were available and the model was not called.
    pub grounded: bool,
}

pub struct Synthesizer {
    client: ModelClient,
    recency_cutoff_year: u32,
}

impl Synthesizer {
    pub fn new(client: ModelClient, recency_cutoff_year: u32) -> Self {
        Self {
            client,
            recency_cutoff_year,
        }
    }

    /// Answer `query` from `retrieval`, asking for `citation_count` citations.
    ///
    /// The reply is returned verbatim. The citation count is an instruction
    /// to the model and is not checked.
    pub async fn synthesize(
        &self,
        query: &str,
        retrieval: &Retrieval,
        citation_count: usize,
        style: SynthesisStyle,
    ) -> Result<Synthesis, ProviderError> {
        let corpus = match style {
            SynthesisStyle::General(_) => retrieval.corpus(),
            SynthesisStyle::Timpark => timpark_corpus(retrieval),
        };
        let language = style.language();

        if corpus.is_empty() {
            info!(%language, "No records to synthesize from");
            return Ok(Synthesis {
                text: prompts::no_records(language, query),
                grounded: false,
            });
        }

        let prompt = match style {
            SynthesisStyle::General(language) => {
                prompts::synthesis(language, query, &corpus, citation_count, self.recency_cutoff_year)
            }
            SynthesisStyle::Timpark => {
                prompts::timpark_synthesis(query, &corpus, citation_count, self.recency_cutoff_year)
            }
        };
        debug!(records = retrieval.len(), corpus_len = corpus.len(), "Synthesizing answer");

        let text = self
            .client
            .complete(prompts::system_instruction(language), prompt)
            .await?;

        Ok(Synthesis { text, grounded: true })
    }
}

/// Each parking record is introduced by its citation so the model can
/// cite it back.
fn timpark_corpus(retrieval: &Retrieval) -> String {
    retrieval
        .records()
        .iter()
        .filter(|r| !r.description.trim().is_empty())
        .map(|r| format!("{}\n{}", r.identifier.citation(), r.description.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
