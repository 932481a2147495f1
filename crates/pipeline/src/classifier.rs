//! Query classification against a closed taxonomy.
//!
//! The model is asked for `{"category": "<label>"}`; anything that does not
//! resolve to a label of the active taxonomy is a [`ClassificationError`].
//! Failures are not retried.

use consilium_core::error::{ClassificationError, Error};
use consilium_core::taxonomy::{Category, Language, Taxonomy};
use serde::Deserialize;
use tracing::{info, warn};

use crate::completion::ModelClient;
use crate::extract::extract_as;
use crate::prompts;

pub struct Classifier {
    client: ModelClient,
}

impl Classifier {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Classify `query` into exactly one category of `taxonomy`.
    pub async fn classify(
        &self,
        query: &str,
        language: Language,
        taxonomy: &Taxonomy,
    ) -> Result<Category, Error> {
        let prompt = prompts::classification(language, query, taxonomy);
        let reply = self
            .client
            .complete(prompts::system_instruction(language), prompt)
            .await?;

        match parse_classification(&reply, taxonomy) {
            Ok(category) => {
                info!(%language, category = %category, "Query classified");
                Ok(category)
            }
            Err(e) => {
                warn!(%language, error = %e, reply = %reply, "Classification failed");
                Err(e.into())
            }
        }
    }
}

/// The JSON object the classification prompt asks for.
#[derive(Debug, Deserialize)]
struct ClassificationReply {
    #[serde(default)]
    category: Option<String>,
}

/// Read the category label out of a model reply.
pub fn parse_classification(reply: &str, taxonomy: &Taxonomy) -> Result<Category, ClassificationError> {
    let reply: ClassificationReply = extract_as(reply)?;
    let label = reply.category.ok_or(ClassificationError::MissingCategory)?;
    match taxonomy.resolve(&label) {
        Some(category) => Ok(category),
        None => Err(ClassificationError::UnknownCategory(label)),
    }
}
