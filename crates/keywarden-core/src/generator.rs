//! Passphrase synthesis from a length-sorted word corpus.
//!
//! A passphrase is assembled from capitalized dictionary words, with
//! optional special characters and digits mixed in, until an exact
//! character budget is spent. Words are drawn uniformly over corpus
//! *lines* bounded by the length index, so shorter lengths (which occupy
//! fewer lines) are proportionally less likely. That mirrors natural
//! word-frequency by length and is intentional.

use std::path::Path;

use rand::Rng;

use crate::corpus::{Corpus, CorpusIndex};
use crate::error::Result;

/// Characters eligible for insertion when special characters are requested.
pub const SPECIAL_CHARACTERS: &str = ".,;:'!@#$%^&*-_=+?/|";

/// Probability of appending a special character or a digit per round.
const APPEND_PROBABILITY: f64 = 0.55;

/// Largest word length worth sampling for the remaining character budget.
///
/// Returns 0 when nothing fits: the budget is spent, the corpus is empty,
/// or the only lengths at or below the budget boundary cannot be bounded
/// by a present start line. A budget at or above the corpus's longest
/// length allows any word.
pub fn max_fitting_length(remaining: usize, index: &CorpusIndex) -> usize {
    if remaining == 0 || index.is_empty() {
        return 0;
    }

    let longest = index.longest_length();
    if remaining >= longest {
        return longest;
    }

    // Words of length <= remaining sit below the start line of
    // remaining + 1, so that length being present means an exact fit.
    if index.contains_length(remaining + 1) {
        return remaining;
    }

    match index.greatest_length_at_most(remaining + 1) {
        Some(length) => length - 1,
        None => 0,
    }
}

/// Draw a uniformly random word of length `<= max_length`.
///
/// `max_length` must come from [`max_fitting_length`]; the draw is bounded
/// by the start line of `max_length + 1`, or spans the whole corpus when
/// `max_length` is the longest present length. A draw of line 0 is
/// remapped to line 1. Returns `None` when no line falls inside the bound.
pub fn sample_word<'a, R: Rng>(
    max_length: usize,
    corpus: &'a Corpus,
    rng: &mut R,
) -> Option<&'a str> {
    let index = corpus.index();
    if index.is_empty() || max_length == 0 {
        return None;
    }

    let bound = match index.start_line(max_length + 1) {
        Some(start) => start,
        None => index.total_lines() + 1,
    };
    // No line below the bound means no word actually fits.
    if bound <= 1 {
        return None;
    }

    let line = rng.gen_range(0..bound).max(1);
    corpus.word_at(line)
}

/// Synthesize a passphrase of up to `target_length` characters.
///
/// Each round optionally appends a special character (only when
/// `include_special` is set) and a digit, each with probability 0.55,
/// then a capitalized word sized to the remaining budget. The result can
/// fall short of `target_length` when no word fits the remaining budget;
/// it never exceeds it.
pub fn synthesize<R: Rng>(
    target_length: usize,
    include_special: bool,
    corpus: &Corpus,
    rng: &mut R,
) -> String {
    let mut passphrase = String::new();
    let index = corpus.index();

    while passphrase.len() < target_length {
        if include_special && rng.gen_bool(APPEND_PROBABILITY) {
            let i = rng.gen_range(0..SPECIAL_CHARACTERS.len());
            passphrase.push(SPECIAL_CHARACTERS.as_bytes()[i] as char);
        }

        if passphrase.len() >= target_length {
            break;
        }

        if rng.gen_bool(APPEND_PROBABILITY) {
            passphrase.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }

        let max_length = max_fitting_length(target_length.saturating_sub(passphrase.len()), index);
        if max_length == 0 {
            break;
        }

        match sample_word(max_length, corpus, rng) {
            Some(word) => push_capitalized(&mut passphrase, word),
            None => break,
        }
    }

    passphrase
}

/// Load the corpus at `corpus_path` and synthesize one passphrase.
///
/// # Errors
///
/// Returns [`crate::error::KeywardenError::CorpusUnreadable`] if the word
/// list cannot be read.
pub fn generate(
    target_length: usize,
    include_special: bool,
    corpus_path: &Path,
) -> Result<String> {
    let corpus = Corpus::load(corpus_path)?;
    Ok(synthesize(
        target_length,
        include_special,
        &corpus,
        &mut rand::thread_rng(),
    ))
}

fn push_capitalized(passphrase: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        passphrase.extend(first.to_uppercase());
        passphrase.push_str(chars.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn boundary_corpus() -> Corpus {
        Corpus::from_words(
            ["a", "be", "cat", "door"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        )
    }

    fn word_corpus() -> Corpus {
        Corpus::from_words(
            [
                "a", "i", "an", "at", "be", "ant", "cat", "dog", "bird", "door", "gate",
                "apple", "haven", "copper", "lantern",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
        )
    }

    #[test]
    fn test_max_fitting_length_zero_budget() {
        let corpus = boundary_corpus();
        assert_eq!(max_fitting_length(0, corpus.index()), 0);
    }

    #[test]
    fn test_max_fitting_length_exact_boundary() {
        // Lengths 1..=4 present: a budget of 3 fits exactly because
        // length 4 starts right past it.
        let corpus = boundary_corpus();
        assert_eq!(max_fitting_length(3, corpus.index()), 3);
    }

    #[test]
    fn test_max_fitting_length_at_and_above_longest() {
        let corpus = boundary_corpus();
        assert_eq!(max_fitting_length(4, corpus.index()), 4);
        assert_eq!(max_fitting_length(100, corpus.index()), 4);
    }

    #[test]
    fn test_max_fitting_length_steps_down_over_gaps() {
        // Lengths 1 and 4 only: a budget of 3 has no bounding start line
        // past it, so the search steps down from length 4.
        let corpus = Corpus::from_words(
            ["a", "b", "door", "gate"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        );
        assert_eq!(max_fitting_length(3, corpus.index()), 3);
        assert_eq!(max_fitting_length(2, corpus.index()), 0);
    }

    #[test]
    fn test_max_fitting_length_empty_corpus() {
        let corpus = Corpus::from_words(Vec::new());
        assert_eq!(max_fitting_length(10, corpus.index()), 0);
    }

    #[test]
    fn test_sample_word_length_one_always_first_word() {
        let corpus = boundary_corpus();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            assert_eq!(sample_word(1, &corpus, &mut rng), Some("a"));
        }
    }

    #[test]
    fn test_sample_word_respects_bound() {
        let corpus = word_corpus();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let word = sample_word(4, &corpus, &mut rng).unwrap();
            assert!(word.len() <= 4, "sampled {:?} over bound", word);
        }
    }

    #[test]
    fn test_sample_word_longest_reaches_last_line() {
        let corpus = boundary_corpus();
        let mut rng = StdRng::seed_from_u64(3);

        let mut saw_last = false;
        for _ in 0..500 {
            if sample_word(4, &corpus, &mut rng) == Some("door") {
                saw_last = true;
                break;
            }
        }
        assert!(saw_last, "longest word never sampled");
    }

    #[test]
    fn test_synthesize_hits_target_length() {
        let corpus = word_corpus();

        for seed in 0..25u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let passphrase = synthesize(36, true, &corpus, &mut rng);
            assert_eq!(passphrase.len(), 36, "seed {} gave {:?}", seed, passphrase);
        }
    }

    #[test]
    fn test_synthesize_never_exceeds_target() {
        let corpus = word_corpus();

        for target in 1..=48usize {
            let mut rng = StdRng::seed_from_u64(target as u64);
            let passphrase = synthesize(target, true, &corpus, &mut rng);
            assert!(passphrase.len() <= target);
        }
    }

    #[test]
    fn test_synthesize_without_specials_has_none() {
        let corpus = word_corpus();

        for seed in 0..25u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let passphrase = synthesize(36, false, &corpus, &mut rng);
            assert!(
                !passphrase.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
                "seed {} leaked a special character: {:?}",
                seed,
                passphrase
            );
        }
    }

    #[test]
    fn test_synthesize_zero_target_is_empty() {
        let corpus = word_corpus();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(synthesize(0, true, &corpus, &mut rng), "");
    }

    #[test]
    fn test_synthesize_words_are_capitalized() {
        let corpus = word_corpus();
        let mut rng = StdRng::seed_from_u64(5);

        let passphrase = synthesize(36, false, &corpus, &mut rng);
        let first_alpha = passphrase.chars().find(|c| c.is_alphabetic());
        assert!(matches!(first_alpha, Some(c) if c.is_uppercase()));
    }

    #[test]
    fn test_generate_missing_wordlist_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        let result = generate(12, false, &missing);
        assert!(result.is_err());
    }
}
