//! Word corpus loading and the word-length line index.
//!
//! The corpus is a plain text file, one word per line, sorted ascending by
//! word length. A single pass over the file builds an index from each
//! distinct word length to the 1-based line at which words of that length
//! begin, so the sampler can bound a random draw without re-scanning the
//! file per word. The lines themselves are kept in memory for O(1) lookup.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{KeywardenError, Result};

/// Length index over a length-sorted corpus.
///
/// Invariants: the keys are exactly the distinct word lengths present in
/// the corpus, and start lines strictly increase with length.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    start_lines: BTreeMap<usize, usize>,
    total_lines: usize,
}

impl CorpusIndex {
    /// 1-based line at which words of exactly `length` begin.
    pub fn start_line(&self, length: usize) -> Option<usize> {
        self.start_lines.get(&length).copied()
    }

    /// Whether any word of exactly `length` exists in the corpus.
    pub fn contains_length(&self, length: usize) -> bool {
        self.start_lines.contains_key(&length)
    }

    /// The greatest word length present, or 0 for an empty corpus.
    pub fn longest_length(&self) -> usize {
        self.start_lines.keys().next_back().copied().unwrap_or(0)
    }

    /// The greatest present length that is `<= length`.
    pub fn greatest_length_at_most(&self, length: usize) -> Option<usize> {
        self.start_lines.range(..=length).next_back().map(|(len, _)| *len)
    }

    /// Number of words in the corpus.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn is_empty(&self) -> bool {
        self.start_lines.is_empty()
    }
}

/// A word corpus held in memory together with its length index.
#[derive(Debug, Clone)]
pub struct Corpus {
    words: Vec<String>,
    index: CorpusIndex,
}

impl Corpus {
    /// Load a corpus file, building the length index in a single pass.
    ///
    /// # Errors
    ///
    /// Returns [`KeywardenError::CorpusUnreadable`] if the file cannot be
    /// opened or read.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| KeywardenError::CorpusUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut words = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| KeywardenError::CorpusUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
            words.push(line.trim_end_matches('\r').to_string());
        }

        Ok(Self::from_words(words))
    }

    /// Build a corpus from an in-memory word list, preserving line order.
    pub fn from_words(words: Vec<String>) -> Self {
        let mut start_lines = BTreeMap::new();
        let mut longest_seen = 0usize;

        for (i, word) in words.iter().enumerate() {
            if word.len() > longest_seen {
                start_lines.insert(word.len(), i + 1);
                longest_seen = word.len();
            }
        }

        let index = CorpusIndex {
            start_lines,
            total_lines: words.len(),
        };
        Self { words, index }
    }

    /// Word at the given 1-based line number.
    pub fn word_at(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        self.words.get(line - 1).map(String::as_str)
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }
}
