//! Playing a whole game, one turn at a time.

use std::collections::HashSet;

use log::{debug, log_enabled, trace, Level};

use crate::{
    cache::GuessCache,
    dictionary::Dictionary,
    feedback::{FeedbackLine, History},
    pool::WorkerPool,
    score::{rank, select_best, GuessResult},
    FeedbackError, Result, WordleError, MAX_TURNS,
};

/// Whatever answers the guesses of a game.
///
/// This is usually a person at a terminal or an [`Emulator`] that knows the
/// secret word. Any `FnMut(usize, &GuessResult) -> Result<FeedbackLine>`
/// closure is a responder too.
pub trait Responder {
    /// Called at the start of `turn`, before the guess is scored.
    fn guessing(&mut self, _turn: usize, _candidates: &[String]) {}

    /// Returns the feedback for `guess` on `turn`.
    fn respond(&mut self, turn: usize, guess: &GuessResult) -> Result<FeedbackLine>;
}

impl<F> Responder for F
where
    F: FnMut(usize, &GuessResult) -> Result<FeedbackLine>,
{
    fn respond(&mut self, turn: usize, guess: &GuessResult) -> Result<FeedbackLine> {
        self(turn, guess)
    }
}

/// A responder that already knows the secret word.
///
/// By default a guessed letter is exact when it matches the secret at the same
/// position and elsewhere when the secret contains it at all, see
/// [`FeedbackLine::emulate()`]. Switch to [`official()`](Emulator::official())
/// grading to count repeated letters the way the real game does.
#[derive(Clone, Debug)]
pub struct Emulator {
    secret: String,
    official: bool,
}

impl Emulator {
    /// Creates an emulator for `secret`, which must contain only lowercase
    /// ascii letters.
    pub fn new(secret: impl Into<String>) -> Result<Self, FeedbackError> {
        let secret = secret.into();
        if let Some(letter) = secret.chars().find(|c| !c.is_ascii_lowercase()) {
            return Err(FeedbackError::InvalidLetter(letter));
        }

        Ok(Emulator {
            secret,
            official: false,
        })
    }

    /// Grades guesses with [`FeedbackLine::grade()`] instead.
    pub fn official(self) -> Self {
        Emulator {
            official: true,
            ..self
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl Responder for Emulator {
    fn respond(&mut self, _turn: usize, guess: &GuessResult) -> Result<FeedbackLine> {
        let line = if self.official {
            FeedbackLine::grade(&guess.word, &self.secret)?
        } else {
            FeedbackLine::emulate(&guess.word, &self.secret)?
        };
        Ok(line)
    }
}

/// How a won game ended.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// The solved word.
    pub word: String,

    /// Every feedback line of the game, the winning one last.
    pub history: History,
}

impl Outcome {
    /// Returns the number of turns the game took.
    pub fn turns(&self) -> usize {
        self.history.len()
    }
}

/// A single game against one [`Responder`].
///
/// Create a game with [`new()`](Game::new()) and configure it with the
/// builder methods, which consume the existing [`Game`] and return a new one.
///
/// # Examples
///
/// ```rust
/// use wordle_guesser::{Dictionary, Emulator, Game, MemoryCache, WorkerPool};
///
/// let dictionary = Dictionary::from_text("fruit\ncable\ncamel\nsable\n", 5)?;
/// let pool = WorkerPool::new(2)?;
/// let mut cache = MemoryCache::new();
///
/// let outcome = Game::new(&dictionary, &pool)
///     .max_turns(6)
///     .cache(&mut cache)
///     .play(&mut Emulator::new("fruit")?)?;
///
/// assert_eq!(outcome.word, "fruit");
/// assert_eq!(cache.len(), 1);
/// #
/// # Ok::<_, wordle_guesser::WordleError>(())
/// ```
pub struct Game<'a> {
    dictionary: &'a Dictionary,
    pool: &'a WorkerPool,
    cache: Option<&'a mut dyn GuessCache>,
    history: History,
    max_turns: usize,
}

impl<'a> Game<'a> {
    /// Creates a game over `dictionary` that scores guesses on `pool`.
    ///
    /// The game starts with an empty history, no cache and [`MAX_TURNS`]
    /// turns.
    pub fn new(dictionary: &'a Dictionary, pool: &'a WorkerPool) -> Self {
        Game {
            dictionary,
            pool,
            cache: None,
            history: History::new(),
            max_turns: MAX_TURNS,
        }
    }

    /// Sets the number of turns before the game is lost.
    pub fn max_turns(self, max_turns: usize) -> Self {
        Game { max_turns, ..self }
    }

    /// Remembers the opening guess in `cache`.
    pub fn cache(self, cache: &'a mut dyn GuessCache) -> Self {
        Game {
            cache: Some(cache),
            ..self
        }
    }

    /// Continues a game that already received the feedback in `history`.
    ///
    /// The first turn played is `history.len() + 1`.
    pub fn resume(self, history: History) -> Self {
        Game { history, ..self }
    }

    /// Returns the feedback received so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the number of the turn about to be played.
    pub fn turn(&self) -> usize {
        self.history.len() + 1
    }

    /// Dictionary words that have not been guessed yet, in dictionary order.
    fn eligible(&self) -> Vec<String> {
        let guessed: HashSet<String> = self.history.guessed().collect();
        self.dictionary
            .iter()
            .filter(|word| !guessed.contains(*word))
            .cloned()
            .collect()
    }

    /// Picks the next guess given the current `candidates`.
    ///
    /// A lone candidate is returned with confidence `1` without scoring
    /// anything, and no candidates at all give `None`. On the first turn the
    /// cache is consulted before scoring and updated after it.
    ///
    /// If no guess has a defined score the first candidate is returned with
    /// confidence `0`. That guess is never cached.
    pub fn guess(&mut self, candidates: &[String]) -> Result<Option<GuessResult>> {
        match candidates {
            [] => return Ok(None),
            [only] => return Ok(Some(GuessResult::certain(only.as_str()))),
            _ => {}
        }

        let key = match (self.history.is_empty(), &self.cache) {
            (true, Some(cache)) => {
                let key = self.dictionary.digest();
                match cache.get(&key) {
                    Some(hit) if self.dictionary.contains(&hit.word) => {
                        debug!("cache hit for {}: {}", key, hit.word);
                        return Ok(Some(hit));
                    }
                    Some(stale) => debug!("cached guess {} is not in the dictionary", stale.word),
                    None => debug!("cache miss for {}", key),
                }
                Some(key)
            }
            _ => None,
        };

        let eligible = self.eligible();
        let scored = self.pool.evaluate(&eligible, &self.history, candidates)?;

        if log_enabled!(Level::Trace) {
            for (i, result) in rank(scored.iter().cloned()).iter().take(20).enumerate() {
                trace!("{:>2}. {} {:.4}", i + 1, result.word, result.confidence);
            }
        }

        match select_best(scored) {
            Some(best) => {
                if let (Some(key), Some(cache)) = (key, self.cache.as_mut()) {
                    cache.set(&key, &best);
                }
                Ok(Some(best))
            }
            None => {
                debug!("no guess has a defined score, falling back to the first candidate");
                Ok(Some(GuessResult {
                    word: candidates[0].clone(),
                    confidence: 0.0,
                }))
            }
        }
    }

    /// Plays until `responder` reports an all-exact line or the turns run
    /// out.
    ///
    /// Returns [`WordleError::OutOfTurns`] when the last turn is not a win and
    /// [`WordleError::NoCandidates`] when the feedback rules out every word.
    pub fn play(mut self, responder: &mut impl Responder) -> Result<Outcome> {
        for turn in self.turn()..=self.max_turns {
            let candidates = self.dictionary.candidates(&self.history)?;
            debug!("turn {}: {} candidates", turn, candidates.len());
            if candidates.len() <= 20 {
                debug!("candidates: {}", candidates.join(", "));
            }

            responder.guessing(turn, &candidates);
            let guess = self.guess(&candidates)?.ok_or(WordleError::NoCandidates)?;
            debug!(
                "guessing {} with confidence {:.4}",
                guess.word, guess.confidence
            );

            let line = responder.respond(turn, &guess)?;
            let expected = self.dictionary.word_length();
            if line.len() != expected {
                return Err(FeedbackError::WrongLength {
                    expected,
                    found: line.len(),
                }
                .into());
            }

            let won = line.is_win();
            self.history.push(line);
            if won {
                let word = candidates.into_iter().next().unwrap_or(guess.word);
                return Ok(Outcome {
                    word,
                    history: self.history,
                });
            }
        }

        Err(WordleError::OutOfTurns(self.max_turns))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::MemoryCache;

    fn dictionary() -> Dictionary {
        Dictionary::from_text("fruit\ncrane\nplane\ncable\ncamel\n", 5).unwrap()
    }

    #[test]
    fn emulator_grades_guesses() -> Result<()> {
        let guess = GuessResult::certain("spool");

        let mut simple = Emulator::new("sober")?;
        assert_eq!(simple.respond(1, &guess)?.codes(), "x.--.");

        let mut official = Emulator::new("sober")?.official();
        assert_eq!(official.respond(1, &guess)?.codes(), "x.-..");

        assert!(matches!(
            simple.respond(1, &GuessResult::certain("spoo")),
            Err(WordleError::Feedback {
                kind: FeedbackError::WrongLength {
                    expected: 5,
                    found: 4
                }
            })
        ));
        assert!(matches!(
            Emulator::new("Sober"),
            Err(FeedbackError::InvalidLetter('S'))
        ));
        Ok(())
    }

    #[test]
    fn lone_candidate_is_certain() -> Result<()> {
        let dictionary = dictionary();
        let pool = WorkerPool::new(2)?;
        let history: History = vec![FeedbackLine::parse("plane", ".....")?]
            .into_iter()
            .collect();

        let mut game = Game::new(&dictionary, &pool).resume(history);
        let candidates = dictionary.candidates(game.history())?;
        assert_eq!(candidates, ["fruit"]);
        assert_eq!(
            game.guess(&candidates)?,
            Some(GuessResult::certain("fruit"))
        );
        assert_eq!(game.guess(&[])?, None);
        Ok(())
    }

    #[test]
    fn resumed_game_continues_turn_count() -> Result<()> {
        let dictionary = dictionary();
        let pool = WorkerPool::new(2)?;
        let history: History = vec![FeedbackLine::parse("plane", ".....")?]
            .into_iter()
            .collect();

        let game = Game::new(&dictionary, &pool).resume(history);
        assert_eq!(game.turn(), 2);
        assert!(!game.eligible().contains(&"plane".to_string()));

        let outcome = game.play(&mut Emulator::new("fruit")?)?;
        assert_eq!(outcome.word, "fruit");
        assert_eq!(outcome.turns(), 2);
        assert_eq!(outcome.history[0].word(), "plane");
        Ok(())
    }

    #[test]
    fn cache_only_serves_the_first_turn() -> Result<()> {
        let dictionary = dictionary();
        let pool = WorkerPool::new(2)?;
        let planted = GuessResult {
            word: "camel".to_string(),
            confidence: 99.0,
        };
        let mut cache = MemoryCache::new();
        cache.set(&dictionary.digest(), &planted);

        let candidates = dictionary.candidates(&[])?;
        let mut game = Game::new(&dictionary, &pool).cache(&mut cache);
        assert_eq!(game.guess(&candidates)?, Some(planted.clone()));

        let history: History = vec![FeedbackLine::parse("fruit", ".....")?]
            .into_iter()
            .collect();
        let candidates = dictionary.candidates(&history)?;
        assert_eq!(candidates, ["plane", "cable", "camel"]);
        let mut game = Game::new(&dictionary, &pool)
            .cache(&mut cache)
            .resume(history);
        let guess = game.guess(&candidates)?.unwrap();
        assert!(guess.confidence < planted.confidence);
        Ok(())
    }

    #[test]
    fn cache_entries_under_another_digest_are_misses() -> Result<()> {
        let dictionary = dictionary();
        let pool = WorkerPool::new(2)?;
        let foreign = GuessResult {
            word: "camel".to_string(),
            confidence: 99.0,
        };
        let mut cache = MemoryCache::new();
        cache.set("0123456789abcdef", &foreign);

        let candidates = dictionary.candidates(&[])?;
        let guess = Game::new(&dictionary, &pool)
            .cache(&mut cache)
            .guess(&candidates)?;
        let guess = guess.unwrap();
        assert!(guess.confidence < foreign.confidence);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&dictionary.digest()), Some(guess));
        Ok(())
    }

    #[test]
    fn cache_ignores_words_outside_the_dictionary() -> Result<()> {
        let dictionary = dictionary();
        let pool = WorkerPool::new(2)?;
        let mut cache = MemoryCache::new();
        cache.set(&dictionary.digest(), &GuessResult::certain("zzzzz"));

        let candidates = dictionary.candidates(&[])?;
        let guess = Game::new(&dictionary, &pool)
            .cache(&mut cache)
            .guess(&candidates)?;
        let guess = guess.unwrap();
        assert!(dictionary.contains(&guess.word));
        assert_eq!(cache.get(&dictionary.digest()), Some(guess));
        Ok(())
    }

    #[test]
    fn unscorable_guesses_fall_back_without_caching() -> Result<()> {
        // every word starts with "sa", so no first-turn outcome leaves a candidate
        let dictionary = Dictionary::from_text("sab\nsac\nsad\n", 3)?;
        let pool = WorkerPool::new(2)?;
        let mut cache = MemoryCache::new();

        let candidates = dictionary.candidates(&[])?;
        let guess = Game::new(&dictionary, &pool)
            .cache(&mut cache)
            .guess(&candidates)?;
        assert_eq!(
            guess,
            Some(GuessResult {
                word: "sab".to_string(),
                confidence: 0.0,
            })
        );
        assert!(cache.is_empty());

        let outcome = Game::new(&dictionary, &pool)
            .cache(&mut cache)
            .play(&mut Emulator::new("sad")?)?;
        assert_eq!(outcome.word, "sad");
        assert_eq!(outcome.history[0].word(), "sab");
        assert_eq!(
            outcome.history.last().map(FeedbackLine::word),
            Some("sad".to_string())
        );
        assert!(cache.is_empty());
        Ok(())
    }

    #[test]
    fn running_out_of_turns_fails() -> Result<()> {
        let dictionary = dictionary();
        let pool = WorkerPool::new(2)?;
        let mut never = |_: usize, guess: &GuessResult| -> Result<FeedbackLine> {
            Ok(FeedbackLine::parse(&guess.word, "-----")?)
        };

        assert!(matches!(
            Game::new(&dictionary, &pool).max_turns(1).play(&mut never),
            Err(WordleError::OutOfTurns(1))
        ));
        Ok(())
    }

    #[test]
    fn contradictory_history_has_no_candidates() -> Result<()> {
        let dictionary = dictionary();
        let pool = WorkerPool::new(2)?;
        let history: History = vec![
            FeedbackLine::parse("crane", "x....")?,
            FeedbackLine::parse("fruit", "x....")?,
        ]
        .into_iter()
        .collect();

        assert!(matches!(
            Game::new(&dictionary, &pool)
                .resume(history)
                .play(&mut Emulator::new("fruit")?),
            Err(WordleError::NoCandidates)
        ));
        Ok(())
    }

    #[test]
    fn responder_errors_end_the_game() -> Result<()> {
        let dictionary = dictionary();
        let pool = WorkerPool::new(2)?;
        fn closed(_: usize, _: &GuessResult) -> Result<FeedbackLine> {
            Err(WordleError::Aborted)
        }
        assert!(matches!(
            Game::new(&dictionary, &pool).play(&mut closed),
            Err(WordleError::Aborted)
        ));

        let mut short = |_: usize, _: &GuessResult| -> Result<FeedbackLine> {
            Ok(FeedbackLine::parse("abc", "xxx")?)
        };
        assert!(matches!(
            Game::new(&dictionary, &pool).play(&mut short),
            Err(WordleError::Feedback { .. })
        ));
        Ok(())
    }
}
