#![doc = include_str!("../README.md")]

use thiserror::Error;

pub mod feedback;
pub use feedback::{FeedbackLine, History, Mark, Verdict};

pub mod constraint;
pub use constraint::{Filter, PatternFilter, WordConstraint};

pub mod simulate;

pub mod score;
pub use score::GuessResult;

pub mod pool;
pub use pool::WorkerPool;

pub mod dictionary;
pub use dictionary::Dictionary;

pub mod cache;
pub use cache::{FileCache, GuessCache, MemoryCache};

pub mod game;
pub use game::{Emulator, Game, Outcome, Responder};

/// The word length of the standard game.
pub const WORD_LENGTH: usize = 5;

/// The number of guesses the standard game allows.
pub const MAX_TURNS: usize = 6;

/// Shorthand for results carrying a [`WordleError`].
pub type Result<T, E = WordleError> = std::result::Result<T, E>;

/// The errors that `wordle_guesser` can produce.
#[derive(Debug, Error)]
pub enum WordleError {
    #[error("the dictionary could not be used")]
    Dictionary {
        #[from]
        kind: DictionaryError,
    },

    #[error("invalid feedback")]
    Feedback {
        #[from]
        kind: FeedbackError,
    },

    #[error("the scoring workers failed")]
    Pool {
        #[from]
        kind: PoolError,
    },

    /// Every turn was used without an all-exact feedback line.
    #[error("failed to solve within {0} turns")]
    OutOfTurns(usize),

    /// The feedback so far rules out every word in the dictionary.
    #[error("no dictionary word is consistent with the feedback so far")]
    NoCandidates,

    #[error("could not compile the constraint pattern")]
    Pattern(#[from] regex::Error),

    /// The responder stopped providing feedback.
    #[error("the feedback input was closed")]
    Aborted,

    #[error("general IO error")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("the dictionary contains no words")]
    Empty,

    /// A word whose length differs from the dictionary's word length.
    #[error("the word \"{word}\" does not have {expected} letters")]
    WrongLength { word: String, expected: usize },

    /// A word containing something other than lowercase ascii letters.
    #[error("the word \"{0}\" must contain only lowercase ascii letters")]
    InvalidWord(String),

    #[error("could not read the dictionary file")]
    Io(#[from] std::io::Error),

    #[error("could not parse the dictionary as a JSON array of words")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("expected {expected} verdicts but found {found}")]
    WrongLength { expected: usize, found: usize },

    /// A response character other than `x`, `-` or `.`.
    #[error("invalid response: {code}({position})")]
    InvalidCode { code: char, position: usize },

    #[error("the letter '{0}' is not a lowercase ascii letter")]
    InvalidLetter(char),
}

#[derive(Debug, Error)]
pub enum PoolError {
    /// A worker stopped before reporting its chunk.
    #[error("a scoring worker stopped before reporting its results")]
    WorkerLost,

    /// A worker panicked while scoring a chunk.
    #[error("a scoring worker failed on chunk {0}")]
    WorkerFailed(usize),

    /// The request channel of a worker is closed.
    #[error("scoring worker {0} is no longer accepting work")]
    Disconnected(usize),

    #[error("could not spawn a scoring worker")]
    Spawn(#[source] std::io::Error),
}
