use tokenizers::Tokenizer;

use super::{Tokenize, TokenizerError};

#[derive(Debug, Clone)]
pub struct HfTokenizer {
    inner: Tokenizer,
}

impl HfTokenizer {
    /// Load a tokenizer by Hugging Face Hub id (e.g. "bert-base-cased").
    ///
    /// No truncation, no padding, no special tokens: the chunker needs the
    /// raw id sequence for the whole document, and decoded sub-slices must
    /// correspond to document text only.
    pub fn from_pretrained(name: &str) -> Result<Self, TokenizerError> {
        let tok = Tokenizer::from_pretrained(name, None)
            .map_err(|e| TokenizerError::Load(name.to_string(), e.to_string()))?;
        Ok(Self { inner: tok })
    }
}

impl Tokenize for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        let enc = self
            .inner
            .encode(text, false)
            .map_err(|e| TokenizerError::Backend(e.to_string()))?;
        Ok(enc.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError> {
        self.inner
            .decode(ids, true)
            .map_err(|e| TokenizerError::Backend(e.to_string()))
    }
}
