//! Scoring prospective guesses and picking the best one.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{feedback::FeedbackLine, simulate::remaining_counts};

/// A guess together with how confident the scorer is in it.
///
/// A confidence of `1` means the guess is the only remaining candidate.
/// Otherwise confidences only rank guesses against each other: higher is
/// better.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessResult {
    pub word: String,
    pub confidence: f64,
}

impl GuessResult {
    /// The result for a word that is the only remaining candidate.
    pub fn certain(word: impl Into<String>) -> Self {
        GuessResult {
            word: word.into(),
            confidence: 1.0,
        }
    }
}

/// A guess and its score, or `None` when the score is undefined.
pub type Scored = (String, Option<f64>);

/// Scores `word` against the candidates in `pool`.
///
/// Every outcome of `word` that leaves `n > 0` candidates is weighted by
/// `n / |pool|` and is worth `|pool| - n` removed candidates. The score is the
/// weighted mean of the removed candidates over those outcomes. Outcomes that
/// leave nothing cannot happen and do not count.
///
/// Returns `None` if no outcome leaves any candidate, which is always the case
/// for an empty pool.
pub fn score(word: &str, history: &[FeedbackLine], pool: &[String]) -> Option<f64> {
    let total = pool.len() as f64;

    let (weighted, possibility) = remaining_counts(word, history, pool)
        .into_iter()
        .filter(|&remaining| remaining > 0)
        .fold((0.0, 0.0), |(weighted, possibility), remaining| {
            let likelihood = remaining as f64 / total;
            let reduction = total - remaining as f64;
            (weighted + reduction * likelihood, possibility + likelihood)
        });

    if possibility > 0.0 {
        Some(weighted / possibility)
    } else {
        None
    }
}

fn by_confidence(a: &GuessResult, b: &GuessResult) -> Ordering {
    b.confidence
        .partial_cmp(&a.confidence)
        .unwrap_or(Ordering::Equal)
}

/// Orders scored guesses from best to worst.
///
/// Guesses without a score are dropped. Equal scores keep their input order.
pub fn rank(scored: impl IntoIterator<Item = Scored>) -> Vec<GuessResult> {
    let mut ranked: Vec<GuessResult> = scored
        .into_iter()
        .filter_map(|(word, confidence)| {
            confidence.map(|confidence| GuessResult { word, confidence })
        })
        .collect();
    ranked.sort_by(by_confidence);
    ranked
}

/// Returns the best scored guess, preferring the earliest on ties.
///
/// Returns `None` if no guess has a score.
pub fn select_best(scored: impl IntoIterator<Item = Scored>) -> Option<GuessResult> {
    scored
        .into_iter()
        .filter_map(|(word, confidence)| {
            confidence.map(|confidence| GuessResult { word, confidence })
        })
        .fold(None, |best: Option<GuessResult>, next| match best {
            Some(best) if by_confidence(&next, &best) != Ordering::Less => Some(best),
            _ => Some(next),
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::FeedbackError;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn weighted_reduction_on_first_turn() {
        let pool = words(&["ab", "ba", "cd"]);

        // "ab" splits the pool into {ba} and {cd}: each 1/3 likely, each removes 2
        assert_eq!(score("ab", &[], &pool), Some(2.0));
        assert_eq!(score("ba", &[], &pool), Some(2.0));
        // "cd" only ever leaves {ab, ba}
        assert_eq!(score("cd", &[], &pool), Some(1.0));
    }

    #[test]
    fn weighted_reduction_on_later_turn() -> Result<(), FeedbackError> {
        let pool = words(&["ab", "ba"]);
        let history = [FeedbackLine::parse("cd", "..")?];

        assert_eq!(score("ab", &history, &pool), Some(1.0));
        Ok(())
    }

    #[test]
    fn empty_pool_has_no_score() -> Result<(), FeedbackError> {
        let history = [FeedbackLine::emulate("crane", "fruit")?];
        assert_eq!(score("fruit", &[], &[]), None);
        assert_eq!(score("fruit", &history, &[]), None);
        Ok(())
    }

    #[test]
    fn ties_keep_input_order() {
        let scored = vec![
            ("zz".to_string(), None),
            ("cd".to_string(), Some(1.0)),
            ("ab".to_string(), Some(2.0)),
            ("ba".to_string(), Some(2.0)),
        ];

        let ranked = rank(scored.clone());
        let order: Vec<_> = ranked.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(order, ["ab", "ba", "cd"]);

        let best = select_best(scored).unwrap();
        assert_eq!(best.word, "ab");
        assert_eq!(best.confidence, 2.0);
    }

    #[test]
    fn nothing_scored_selects_nothing() {
        assert_eq!(select_best(vec![("zz".to_string(), None)]), None);
        assert_eq!(select_best(Vec::new()), None);
    }

    #[test]
    fn scoring_is_deterministic() -> Result<(), FeedbackError> {
        let pool = words(&["crane", "slate", "trace", "crate", "raise", "stare"]);
        let history = [FeedbackLine::emulate("toast", "crate")?];
        let run = || {
            select_best(
                pool.iter()
                    .map(|w| (w.clone(), score(w, &history, &pool)))
                    .collect::<Vec<_>>(),
            )
        };
        assert_eq!(run(), run());
        Ok(())
    }
}
