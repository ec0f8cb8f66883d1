//! The list of words the game may guess.

use std::{
    collections::hash_map::DefaultHasher,
    fs,
    hash::{Hash, Hasher},
    ops::Deref,
    path::Path,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{constraint::PatternFilter, feedback::FeedbackLine, DictionaryError};

/// An ordered list of words that all have the same length.
///
/// Dictionary order matters: ties between equally good guesses go to the
/// word that comes first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dictionary {
    words: Vec<String>,
    word_length: usize,
}

impl Dictionary {
    /// Creates a dictionary, checking that every word has `word_length`
    /// lowercase ascii letters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wordle_guesser::Dictionary;
    ///
    /// let dictionary = Dictionary::new(vec!["fruit".into(), "crane".into()], 5)?;
    /// assert_eq!(dictionary.len(), 2);
    ///
    /// assert!(Dictionary::new(vec!["fruit".into(), "cranes".into()], 5).is_err());
    /// #
    /// # Ok::<_, wordle_guesser::DictionaryError>(())
    /// ```
    pub fn new(words: Vec<String>, word_length: usize) -> Result<Self, DictionaryError> {
        if words.is_empty() {
            return Err(DictionaryError::Empty);
        }

        for word in &words {
            if word.chars().count() != word_length {
                return Err(DictionaryError::WrongLength {
                    word: word.clone(),
                    expected: word_length,
                });
            }
            if !word.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(DictionaryError::InvalidWord(word.clone()));
            }
        }

        Ok(Dictionary { words, word_length })
    }

    /// Parses a dictionary from text.
    ///
    /// Text starting with `[` is read as a JSON array of strings. Anything
    /// else is read as one word per line, skipping blank lines. Words are
    /// lowercased either way.
    pub fn from_text(text: &str, word_length: usize) -> Result<Self, DictionaryError> {
        let words: Vec<String> = if text.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<String>>(text)?
                .into_iter()
                .map(|w| w.trim().to_lowercase())
                .collect()
        } else {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_lowercase)
                .collect()
        };

        Self::new(words, word_length)
    }

    /// Reads a dictionary file, see [`from_text()`](Dictionary::from_text()).
    pub fn load(path: impl AsRef<Path>, word_length: usize) -> Result<Self, DictionaryError> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text, word_length)
    }

    /// Returns the words in dictionary order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the length shared by every word.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Returns a short hex digest of the dictionary contents.
    ///
    /// Two dictionaries with the same words in the same order share a digest,
    /// which makes it usable as a cache key. The digest comes from the
    /// standard library's default hasher, so it is only stable for a given
    /// toolchain. A build with another Rust release may compute different
    /// digests, and entries cached under the old ones are then misses.
    pub fn digest(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.word_length.hash(&mut hasher);
        self.words.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Returns the words consistent with `history`, in dictionary order.
    pub fn candidates(&self, history: &[FeedbackLine]) -> Result<Vec<String>, regex::Error> {
        if history.is_empty() {
            return Ok(self.words.clone());
        }

        let filter = PatternFilter::new(history)?;

        #[cfg(feature = "parallel")]
        let candidates = self
            .words
            .par_iter()
            .filter(|word| filter.matches(word))
            .cloned()
            .collect();

        #[cfg(not(feature = "parallel"))]
        let candidates = self
            .words
            .iter()
            .filter(|word| filter.matches(word))
            .cloned()
            .collect();

        Ok(candidates)
    }
}

impl Deref for Dictionary {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.words
    }
}
