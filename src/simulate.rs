//! Enumerating the feedback a guess could receive.
//!
//! Scoring a guess means asking, for every feedback line it could possibly
//! get, how many candidates would survive that line. This is the inner loop
//! of the whole crate: `k^L` outcomes per guess, each tested against every
//! candidate.

use itertools::Itertools;

use crate::{
    constraint::WordConstraint,
    feedback::{FeedbackLine, Mark},
    Verdict,
};

/// The verdicts an outcome may hold at each position.
///
/// Before any feedback has been received no letter is ever assumed exact, so
/// the first turn only enumerates [`Verdict::Elsewhere`] and
/// [`Verdict::Absent`].
pub fn outcome_verdicts(history_len: usize) -> &'static [Verdict] {
    if history_len == 0 {
        &[Verdict::Elsewhere, Verdict::Absent]
    } else {
        &Verdict::ALL
    }
}

/// Lists every feedback line `word` could receive, each exactly once.
///
/// There are `2^L` outcomes when `history_len` is zero and `3^L` otherwise.
///
/// # Examples
///
/// ```rust
/// use wordle_guesser::simulate::possible_outcomes;
///
/// assert_eq!(possible_outcomes("fruit", 0).len(), 32);
/// assert_eq!(possible_outcomes("fruit", 1).len(), 243);
/// ```
pub fn possible_outcomes(word: &str, history_len: usize) -> Vec<FeedbackLine> {
    let verdicts = outcome_verdicts(history_len);

    word.chars()
        .map(|letter| {
            verdicts
                .iter()
                .map(move |&verdict| Mark { letter, verdict })
        })
        .multi_cartesian_product()
        .map(FeedbackLine::from_marks)
        .collect()
}

/// Counts the members of `pool` that would still be candidates if `outcome`
/// were appended to `history`.
pub fn remaining_count(history: &[FeedbackLine], outcome: &FeedbackLine, pool: &[String]) -> usize {
    let constraint = WordConstraint::build(history.iter().chain(std::iter::once(outcome)));
    pool.iter().filter(|word| constraint.matches(word)).count()
}

/// Returns [`remaining_count()`] for every outcome of `word`, in the order of
/// [`possible_outcomes()`].
pub fn remaining_counts(word: &str, history: &[FeedbackLine], pool: &[String]) -> Vec<usize> {
    possible_outcomes(word, history.len())
        .iter()
        .map(|outcome| remaining_count(history, outcome, pool))
        .collect()
}
