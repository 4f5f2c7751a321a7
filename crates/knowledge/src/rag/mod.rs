//! Retrieval-augmented answering: context gathering, prompt, generation.

pub mod context;
pub mod pipeline;

pub use context::{document_fragment, truncate_chars, web_fragment};
pub use pipeline::{Answerer, RagPipeline, NO_RELEVANT_DOCUMENT};
