use thiserror::Error;

pub mod hf;

pub use hf::HfTokenizer;

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("unknown tokenizer '{0}': {1}")]
    Load(String, String),
    #[error("tokenizer backend error: {0}")]
    Backend(String),
}

/// Capability the chunker needs from a tokenizer.
///
/// `decode` must invert `encode` for any input the tokenizer can fully
/// represent; callers only pass back contiguous sub-slices of an id
/// sequence previously produced by `encode`.
pub trait Tokenize {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError>;
    fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError>;
}
