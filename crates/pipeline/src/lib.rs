//! # Consilium Pipeline
//!
//! The retrieval-augmented question-answering flow over council decisions:
//!
//! 1. **Classify** the query into one label of a closed taxonomy (one model call)
//! 2. **Retrieve** the records filed under that label, most recent first
//! 3. **Synthesize** an answer citing the records (one model call)
//! 4. **Format** the answer so each `**Label**:` section starts a paragraph
//!
//! The TimPark variant skips step 1 and retrieves its whole dataset.

pub mod classifier;
pub mod completion;
pub mod extract;
pub mod formatter;
pub mod pipeline;
pub mod prompts;
pub mod retriever;
pub mod synthesizer;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use classifier::{Classifier, parse_classification};
pub use completion::ModelClient;
pub use extract::{extract_as, extract_object};
pub use formatter::format_answer;
pub use pipeline::{Answer, Pipeline, PipelineSettings, VariantProfile, load_dataset};
pub use retriever::{Retrieval, retrieve, retrieve_all};
pub use synthesizer::{Synthesis, SynthesisStyle, Synthesizer};
