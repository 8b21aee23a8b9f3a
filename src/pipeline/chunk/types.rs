use serde::{Deserialize, Serialize};

/// One token window of a source document.
///
/// `char_start..char_end` is a half-open codepoint range into the original
/// document text; `token_start..token_end` is the matching half-open range
/// into the tokenizer's id sequence. `char_end - char_start` always equals
/// the codepoint length of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub source: String,
    pub char_start: usize,
    pub char_end: usize,
    pub token_start: usize,
    pub token_end: usize,
}
