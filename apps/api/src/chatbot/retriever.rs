//! Lexical retriever: keeps long uploaded documents inside a bounded prompt
//! budget without a vector index.
//!
//! Documents are split on paragraph boundaries, packed into chunks of at most
//! `chunk_size` characters, and ranked by how many distinct query terms each
//! chunk contains. Short documents, and documents that would not shrink, are
//! forwarded verbatim.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Below this many characters the whole document is always forwarded.
pub const SMALL_CONTEXT_LIMIT: usize = 6000;
pub const DEFAULT_MAX_CHUNKS: usize = 3;
pub const DEFAULT_CHUNK_SIZE: usize = 1500;
/// Marks omitted material between selected chunks.
pub const CHUNK_SEPARATOR: &str = "\n\n[...]\n\n";

const MIN_TERM_CHARS: usize = 4;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

/// A contiguous slice of a document, scored against a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in document order.
    pub index: usize,
    pub text: String,
    pub score: usize,
}

/// Returns the parts of `full_text` most relevant to `query`, or `full_text`
/// itself when chunking would not reduce the payload.
///
/// Algorithm:
/// 1. `full_text` under [`SMALL_CONTEXT_LIMIT`] chars → unchanged
/// 2. Pack paragraphs into chunks of ≤ `chunk_size` chars
/// 3. Chunk count ≤ `max_chunks` → unchanged
/// 4. Rank chunks by distinct query-term hits (stable, descending)
/// 5. Join the top `max_chunks` with [`CHUNK_SEPARATOR`]
pub fn retrieve(full_text: &str, query: &str, max_chunks: usize, chunk_size: usize) -> String {
    if full_text.chars().count() < SMALL_CONTEXT_LIMIT {
        return full_text.to_string();
    }

    let chunks = chunk_paragraphs(full_text, chunk_size);
    if chunks.len() <= max_chunks {
        return full_text.to_string();
    }

    let terms = query_terms(query);
    rank_chunks(chunks, &terms)
        .into_iter()
        .take(max_chunks)
        .map(|chunk| chunk.text)
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

/// Greedily packs consecutive paragraphs into chunks of at most `chunk_size`
/// characters. A paragraph longer than `chunk_size` becomes its own chunk
/// rather than being split mid-paragraph.
pub fn chunk_paragraphs(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for paragraph in PARAGRAPH_BREAK.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let paragraph_len = paragraph.chars().count();

        if current.is_empty() {
            current.push_str(paragraph);
            current_len = paragraph_len;
            continue;
        }

        // +2 for the "\n\n" joining paragraphs inside a chunk
        if current_len + 2 + paragraph_len <= chunk_size {
            current.push_str("\n\n");
            current.push_str(paragraph);
            current_len += 2 + paragraph_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(paragraph);
            current_len = paragraph_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Distinct lower-cased alphanumeric terms of at least four characters, in
/// first-seen order.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= MIN_TERM_CHARS)
        .filter(|term| seen.insert(term.to_string()))
        .map(String::from)
        .collect()
}

/// Scores every chunk by the number of `terms` it contains and returns them
/// highest score first. Equal scores keep document order.
pub fn rank_chunks(chunks: Vec<String>, terms: &[String]) -> Vec<Chunk> {
    let mut scored: Vec<Chunk> = chunks
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let lower = text.to_lowercase();
            let score = terms.iter().filter(|t| lower.contains(t.as_str())).count();
            Chunk { index, text, score }
        })
        .collect();

    // sort_by is stable: ties stay in document order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
