// Core chunking: slide a fixed token window with overlap across the
// document's id sequence, decoding lazily per window.

use thiserror::Error;

use crate::tokenizer::{Tokenize, TokenizerError};

use super::types::Chunk;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("tokenization failed: {0}")]
    Tokenization(#[from] TokenizerError),
}

/// Check window parameters without doing any encoding work.
pub fn validate_params(chunk_size: usize, chunk_overlap: usize) -> Result<(), ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::InvalidParameter("chunk_size must be positive"));
    }
    if chunk_overlap >= chunk_size {
        return Err(ChunkError::InvalidParameter(
            "chunk_overlap must be smaller than chunk_size",
        ));
    }
    Ok(())
}

/// Split `text` into overlapping windows of at most `chunk_size` tokens.
///
/// The document is encoded exactly once. Each window decodes its own token
/// slice; character offsets come from decoding the prefix `[0, token_start)`
/// rather than a running counter, so a tokenizer whose decode is not
/// compositional at slice edges still yields consistent offsets. Offsets
/// count codepoints, not bytes.
pub fn chunk_text<T: Tokenize + ?Sized>(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    tokenizer: &T,
    source_name: &str,
) -> Result<Vec<Chunk>, ChunkError> {
    validate_params(chunk_size, chunk_overlap)?;

    // Encode once; windowing never re-encodes.
    let tokens = tokenizer.encode(text)?;
    let num_tokens = tokens.len();

    if num_tokens == 0 {
        return Ok(Vec::new());
    }

    if num_tokens <= chunk_size {
        // Single window: keep the original text verbatim instead of a
        // decode round-trip, preserving exact formatting.
        return Ok(vec![Chunk {
            id: format!("{source_name}-0000"),
            text: text.to_string(),
            source: source_name.to_string(),
            char_start: 0,
            char_end: text.chars().count(),
            token_start: 0,
            token_end: num_tokens,
        }]);
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut token_start = 0usize;
    let mut chunk_index = 0usize;

    while token_start < num_tokens {
        let token_end = (token_start + chunk_size).min(num_tokens);

        let window_text = tokenizer.decode(&tokens[token_start..token_end])?;
        let prefix_text = tokenizer.decode(&tokens[..token_start])?;

        let char_start = prefix_text.chars().count();
        let char_end = char_start + window_text.chars().count();

        chunks.push(Chunk {
            id: format!("{source_name}-{chunk_index:04}"),
            text: window_text,
            source: source_name.to_string(),
            char_start,
            char_end,
            token_start,
            token_end,
        });
        chunk_index += 1;

        // Sole termination guard: stop once the overlap step would not move
        // the window start forward. A shorter final window is still emitted
        // when the step does advance past the current start.
        let next_start = token_end.saturating_sub(chunk_overlap);
        if next_start <= token_start {
            break;
        }
        token_start = next_start;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One token per codepoint; decode is the exact inverse of encode.
    struct CharTokenizer;

    impl Tokenize for CharTokenizer {
        fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
            Ok(text.chars().map(|c| c as u32).collect())
        }

        fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError> {
            ids.iter()
                .map(|&id| {
                    char::from_u32(id)
                        .ok_or_else(|| TokenizerError::Backend(format!("bad id {id}")))
                })
                .collect()
        }
    }

    // One token per pair of ASCII chars, packed into the id. Exercises
    // windows whose char width differs from their token width.
    struct PairTokenizer;

    impl Tokenize for PairTokenizer {
        fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
            let chars: Vec<char> = text.chars().collect();
            if chars.len() % 2 != 0 || !text.is_ascii() {
                return Err(TokenizerError::Backend("even-length ascii only".into()));
            }
            Ok(chars
                .chunks(2)
                .map(|p| ((p[0] as u32) << 16) | (p[1] as u32))
                .collect())
        }

        fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError> {
            let mut out = String::with_capacity(ids.len() * 2);
            for &id in ids {
                let a = char::from_u32(id >> 16)
                    .ok_or_else(|| TokenizerError::Backend(format!("bad id {id}")))?;
                let b = char::from_u32(id & 0xFFFF)
                    .ok_or_else(|| TokenizerError::Backend(format!("bad id {id}")))?;
                out.push(a);
                out.push(b);
            }
            Ok(out)
        }
    }

    struct FailingTokenizer;

    impl Tokenize for FailingTokenizer {
        fn encode(&self, _text: &str) -> Result<Vec<u32>, TokenizerError> {
            Err(TokenizerError::Backend("boom".into()))
        }

        fn decode(&self, _ids: &[u32]) -> Result<String, TokenizerError> {
            Err(TokenizerError::Backend("boom".into()))
        }
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let err = chunk_text("abc", 0, 0, &CharTokenizer, "doc").unwrap_err();
        assert!(matches!(err, ChunkError::InvalidParameter(m) if m == "chunk_size must be positive"));
    }

    #[test]
    fn rejects_overlap_not_smaller_than_size() {
        let err = chunk_text("abc", 10, 10, &CharTokenizer, "doc").unwrap_err();
        assert!(matches!(
            err,
            ChunkError::InvalidParameter(m) if m == "chunk_overlap must be smaller than chunk_size"
        ));
        let err = chunk_text("abc", 10, 11, &CharTokenizer, "doc").unwrap_err();
        assert!(matches!(err, ChunkError::InvalidParameter(_)));
    }

    #[test]
    fn validation_happens_before_encoding() {
        // FailingTokenizer would error on encode; validation must win.
        let err = chunk_text("abc", 0, 0, &FailingTokenizer, "doc").unwrap_err();
        assert!(matches!(err, ChunkError::InvalidParameter(_)));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunks = chunk_text("", 50, 10, &CharTokenizer, "doc").unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn single_window_returns_text_verbatim() {
        let text = "héllo wörld\n";
        let chunks = chunk_text(text, 50, 10, &CharTokenizer, "doc").unwrap();
        assert_eq!(chunks.len(), 1);
        let c = &chunks[0];
        assert_eq!(c.id, "doc-0000");
        assert_eq!(c.text, text);
        assert_eq!(c.source, "doc");
        assert_eq!(c.char_start, 0);
        assert_eq!(c.char_end, text.chars().count());
        assert_eq!(c.token_start, 0);
        assert_eq!(c.token_end, text.chars().count());
    }

    #[test]
    fn exact_fit_is_still_a_single_window() {
        let text = "a".repeat(50);
        let chunks = chunk_text(&text, 50, 10, &CharTokenizer, "doc").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].token_end, 50);
    }

    #[test]
    fn windows_cover_120_tokens() {
        let text: String = ('a'..='z').cycle().take(120).collect();
        let chunks = chunk_text(&text, 50, 10, &CharTokenizer, "doc").unwrap();

        let ranges: Vec<(usize, usize)> =
            chunks.iter().map(|c| (c.token_start, c.token_end)).collect();
        assert_eq!(ranges, vec![(0, 50), (40, 90), (80, 120), (110, 120)]);

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["doc-0000", "doc-0001", "doc-0002", "doc-0003"]);

        // char tokenizer: char offsets coincide with token offsets
        for c in &chunks {
            assert_eq!(c.char_start, c.token_start);
            assert_eq!(c.char_end, c.token_end);
            assert_eq!(c.char_end - c.char_start, c.text.chars().count());
            assert_eq!(c.source, "doc");
        }
        assert_eq!(chunks.last().unwrap().token_end, 120);
    }

    #[test]
    fn consecutive_windows_overlap_by_configured_amount() {
        let text: String = ('a'..='z').cycle().take(120).collect();
        let chunks = chunk_text(&text, 50, 10, &CharTokenizer, "doc").unwrap();
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].token_start, pair[0].token_end - 10);
            assert!(pair[1].token_start > pair[0].token_start);
        }
    }

    #[test]
    fn chunk_text_matches_window_decode() {
        let text: String = "the quick brown fox jumps over the lazy dog "
            .chars()
            .cycle()
            .take(200)
            .collect();
        let tok = CharTokenizer;
        let ids = tok.encode(&text).unwrap();
        let chunks = chunk_text(&text, 64, 16, &tok, "fox").unwrap();
        for c in &chunks {
            assert_eq!(c.text, tok.decode(&ids[c.token_start..c.token_end]).unwrap());
        }
    }

    #[test]
    fn char_offsets_track_prefix_for_multichar_tokens() {
        // 40 chars -> 20 tokens; size 8, overlap 2 -> [0,8) [6,14) [12,20) [18,20)
        let text: String = ('a'..='z').cycle().take(40).collect();
        let chunks = chunk_text(&text, 8, 2, &PairTokenizer, "doc").unwrap();

        let ranges: Vec<(usize, usize)> =
            chunks.iter().map(|c| (c.token_start, c.token_end)).collect();
        assert_eq!(ranges, vec![(0, 8), (6, 14), (12, 20), (18, 20)]);

        for c in &chunks {
            assert_eq!(c.char_start, c.token_start * 2);
            assert_eq!(c.char_end, c.token_end * 2);
            assert_eq!(c.char_end - c.char_start, c.text.chars().count());
        }
    }

    #[test]
    fn near_full_overlap_terminates() {
        // 15 tokens, size 10, overlap 9: advances one token per window,
        // then stops when the step no longer moves forward.
        let text = "a".repeat(15);
        let chunks = chunk_text(&text, 10, 9, &CharTokenizer, "doc").unwrap();

        assert_eq!(chunks.len(), 7);
        let starts: Vec<usize> = chunks.iter().map(|c| c.token_start).collect();
        assert_eq!(starts, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(chunks.last().unwrap().token_end, 15);
        for pair in chunks.windows(2) {
            assert!(pair[1].token_start > pair[0].token_start);
        }
    }

    #[test]
    fn iteration_count_is_bounded_by_stride() {
        let text = "a".repeat(1000);
        let (size, overlap) = (50usize, 10usize);
        let chunks = chunk_text(&text, size, overlap, &CharTokenizer, "doc").unwrap();
        // stride bound, plus one possible short tail window
        let bound = 1000usize.div_ceil(size - overlap) + 1;
        assert!(chunks.len() <= bound, "{} > {}", chunks.len(), bound);
    }

    #[test]
    fn propagates_tokenizer_failure() {
        let err = chunk_text("abc", 10, 0, &FailingTokenizer, "doc").unwrap_err();
        assert!(matches!(err, ChunkError::Tokenization(_)));
    }

    #[test]
    fn ids_are_zero_padded_and_sequential() {
        let text = "a".repeat(30);
        let chunks = chunk_text(&text, 2, 0, &CharTokenizer, "src").unwrap();
        assert_eq!(chunks.len(), 15);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.id, format!("src-{i:04}"));
        }
        assert_eq!(chunks[0].id, "src-0000");
        assert_eq!(chunks[14].id, "src-0014");
    }
}
