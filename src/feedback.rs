//! Feedback lines and the history of a game.
//!
//! A [`FeedbackLine`] holds one [`Mark`] per letter of a guess, and a
//! [`History`] holds the lines of every turn played so far in turn order.

use std::{
    fmt::{Display, Write},
    ops::Deref,
};

use crate::FeedbackError;

/// How a single guessed letter compares to the secret word.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Verdict {
    /// The letter is in the secret at this exact position.
    Exact,

    /// The letter is in the secret, but not at this position.
    Elsewhere,

    /// The letter is not in the secret, beyond any copies already accounted
    /// for elsewhere in the guess.
    Absent,
}

impl Verdict {
    /// Every verdict, in the order the prompt lists them.
    pub const ALL: [Verdict; 3] = [Verdict::Exact, Verdict::Elsewhere, Verdict::Absent];

    /// The character used for this verdict in a typed response.
    pub fn code(self) -> char {
        match self {
            Verdict::Exact => 'x',
            Verdict::Elsewhere => '-',
            Verdict::Absent => '.',
        }
    }

    /// Parses a response character: `x` is exact, `-` is elsewhere and `.`
    /// is absent.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'x' => Some(Verdict::Exact),
            '-' => Some(Verdict::Elsewhere),
            '.' => Some(Verdict::Absent),
            _ => None,
        }
    }
}

/// A guessed letter together with its verdict.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Mark {
    pub letter: char,
    pub verdict: Verdict,
}

/// The verdicts for one guess, one [`Mark`] per position.
///
/// Lines are immutable once created. Every letter is a lowercase ascii
/// letter.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct FeedbackLine {
    marks: Vec<Mark>,
}

impl FeedbackLine {
    /// Pairs each letter of `guess` with a verdict.
    ///
    /// Returns an error if the counts differ or if `guess` contains anything
    /// other than lowercase ascii letters.
    pub fn new(
        guess: &str,
        verdicts: impl IntoIterator<Item = Verdict>,
    ) -> Result<Self, FeedbackError> {
        let verdicts: Vec<Verdict> = verdicts.into_iter().collect();
        let expected = guess.chars().count();
        if verdicts.len() != expected {
            return Err(FeedbackError::WrongLength {
                expected,
                found: verdicts.len(),
            });
        }

        let marks = guess
            .chars()
            .zip(verdicts)
            .map(|(letter, verdict)| {
                if letter.is_ascii_lowercase() {
                    Ok(Mark { letter, verdict })
                } else {
                    Err(FeedbackError::InvalidLetter(letter))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeedbackLine { marks })
    }

    /// Builds a line from marks whose letters are already known to be valid.
    pub(crate) fn from_marks(marks: Vec<Mark>) -> Self {
        FeedbackLine { marks }
    }

    /// Parses a typed response such as `x-.-x` for `guess`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wordle_guesser::{FeedbackLine, Verdict};
    ///
    /// let line = FeedbackLine::parse("abcde", "x-.-x")?;
    /// assert_eq!(line.marks()[1].verdict, Verdict::Elsewhere);
    /// assert!(FeedbackLine::parse("abcde", "x-?-x").is_err());
    /// #
    /// # Ok::<_, wordle_guesser::FeedbackError>(())
    /// ```
    pub fn parse(guess: &str, response: &str) -> Result<Self, FeedbackError> {
        let expected = guess.chars().count();
        let found = response.chars().count();
        if found != expected {
            return Err(FeedbackError::WrongLength { expected, found });
        }

        let verdicts = response
            .chars()
            .enumerate()
            .map(|(position, code)| {
                Verdict::from_code(code).ok_or(FeedbackError::InvalidCode { code, position })
            })
            .collect::<Result<Vec<_>, _>>()?;

        FeedbackLine::new(guess, verdicts)
    }

    /// Compares `guess` to `secret` letter by letter.
    ///
    /// A letter is exact when it matches the secret at the same position,
    /// elsewhere when the secret contains it anywhere, and absent otherwise.
    /// Repeated letters are not counted against each other.
    ///
    /// Returns an error if the words differ in length or if either contains
    /// anything other than lowercase ascii letters.
    pub fn emulate(guess: &str, secret: &str) -> Result<Self, FeedbackError> {
        check_pair(guess, secret)?;

        let marks = guess
            .chars()
            .zip(secret.chars())
            .map(|(letter, answer)| {
                let verdict = if letter == answer {
                    Verdict::Exact
                } else if secret.contains(letter) {
                    Verdict::Elsewhere
                } else {
                    Verdict::Absent
                };
                Mark { letter, verdict }
            })
            .collect();

        Ok(FeedbackLine { marks })
    }

    /// Grades `guess` against `secret` the way the official game does.
    ///
    /// Exact matches are assigned first. Each remaining copy of a letter in
    /// the secret then turns at most one other copy in the guess into
    /// [`Verdict::Elsewhere`], from left to right, and the leftover copies are
    /// [`Verdict::Absent`]. The words are checked as in
    /// [`emulate()`](FeedbackLine::emulate()).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wordle_guesser::FeedbackLine;
    ///
    /// assert_eq!(FeedbackLine::grade("spool", "sober")?.codes(), "x.-..");
    /// assert!(FeedbackLine::grade("SPOOL", "sober").is_err());
    /// #
    /// # Ok::<_, wordle_guesser::FeedbackError>(())
    /// ```
    pub fn grade(guess: &str, secret: &str) -> Result<Self, FeedbackError> {
        check_pair(guess, secret)?;

        let guess = guess.as_bytes();
        let secret = secret.as_bytes();
        let mut remaining = [0_u8; 26];
        let mut verdicts = vec![Verdict::Absent; guess.len()];

        for (i, (&g, &s)) in guess.iter().zip(secret).enumerate() {
            if g == s {
                verdicts[i] = Verdict::Exact;
            } else {
                remaining[(s - b'a') as usize] += 1;
            }
        }

        for (i, &g) in guess.iter().enumerate() {
            if verdicts[i] == Verdict::Exact {
                continue;
            }
            let left = &mut remaining[(g - b'a') as usize];
            if *left > 0 {
                *left -= 1;
                verdicts[i] = Verdict::Elsewhere;
            }
        }

        let marks = guess
            .iter()
            .zip(verdicts)
            .map(|(&g, verdict)| Mark {
                letter: g as char,
                verdict,
            })
            .collect();

        Ok(FeedbackLine { marks })
    }

    /// Returns the marks in position order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Returns the number of positions in the line.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Returns true if every verdict is [`Verdict::Exact`].
    pub fn is_win(&self) -> bool {
        !self.marks.is_empty() && self.marks.iter().all(|m| m.verdict == Verdict::Exact)
    }

    /// Returns the guessed word this line describes.
    pub fn word(&self) -> String {
        self.marks.iter().map(|m| m.letter).collect()
    }

    /// Returns the typed response for this line, such as `x-.-x`.
    pub fn codes(&self) -> String {
        self.marks.iter().map(|m| m.verdict.code()).collect()
    }
}

/// Checks that a guess can be compared to a secret.
fn check_pair(guess: &str, secret: &str) -> Result<(), FeedbackError> {
    if let Some(letter) = guess
        .chars()
        .chain(secret.chars())
        .find(|c| !c.is_ascii_lowercase())
    {
        return Err(FeedbackError::InvalidLetter(letter));
    }
    if guess.len() != secret.len() {
        return Err(FeedbackError::WrongLength {
            expected: secret.len(),
            found: guess.len(),
        });
    }
    Ok(())
}

impl Display for FeedbackLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.word())?;
        for mark in &self.marks {
            f.write_char(mark.verdict.code())?;
        }
        Ok(())
    }
}

/// The feedback lines of a game, in turn order.
///
/// A history only ever grows by [`push()`](History::push()).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct History {
    lines: Vec<FeedbackLine>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the feedback of the latest turn.
    pub fn push(&mut self, line: FeedbackLine) {
        self.lines.push(line);
    }

    /// Returns the words that have already been guessed.
    pub fn guessed(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(FeedbackLine::word)
    }
}

impl Deref for History {
    type Target = [FeedbackLine];

    fn deref(&self) -> &Self::Target {
        &self.lines
    }
}

impl FromIterator<FeedbackLine> for History {
    fn from_iter<T: IntoIterator<Item = FeedbackLine>>(iter: T) -> Self {
        History {
            lines: iter.into_iter().collect(),
        }
    }
}

impl Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some((last, rest)) = self.lines.split_last() {
            for line in rest {
                writeln!(f, "{}", line)?;
            }
            write!(f, "{}", last)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! feedback_test {
        ($name:ident[$guess:expr, $secret:expr => emulate $emulated:expr, grade $graded:expr]) => {
            #[test]
            fn $name() -> Result<(), FeedbackError> {
                assert_eq!(
                    FeedbackLine::emulate($guess, $secret)?,
                    FeedbackLine::parse($guess, $emulated)?
                );
                assert_eq!(
                    FeedbackLine::grade($guess, $secret)?,
                    FeedbackLine::parse($guess, $graded)?
                );
                Ok(())
            }
        };
    }

    feedback_test! { all_exact ["crane", "crane" => emulate "xxxxx", grade "xxxxx"] }

    feedback_test! { all_absent ["quick", "dream" => emulate ".....", grade "....."] }

    feedback_test! { mixed ["crane", "charm" => emulate "x-x..", grade "x-x.."] }

    feedback_test! { repeat_letter_guess ["spool", "sober" => emulate "x.--.", grade "x.-.."] }

    feedback_test! { repeat_after_exact ["soaks", "sober" => emulate "xx..-", grade "xx..."] }

    feedback_test! { repeat_letter_answer ["odors", "spoon" => emulate "-.x.-", grade "-.x.-"] }

    feedback_test! { repeat_letter_both ["speed", "creep" => emulate ".-xx.", grade ".-xx."] }

    feedback_test! { repeat_letter_limited ["geese", "creep" => emulate ".-x.-", grade ".-x.."] }

    feedback_test! { repeat_letter_elsewhere ["sores", "those" => emulate "--.--", grade "--.-."] }

    #[test]
    fn comparing_rejects_mismatched_words() {
        assert!(matches!(
            FeedbackLine::emulate("spoo", "sober"),
            Err(FeedbackError::WrongLength {
                expected: 5,
                found: 4
            })
        ));
        assert!(matches!(
            FeedbackLine::grade("spools", "sober"),
            Err(FeedbackError::WrongLength {
                expected: 5,
                found: 6
            })
        ));
        assert!(matches!(
            FeedbackLine::grade("Spool", "sober"),
            Err(FeedbackError::InvalidLetter('S'))
        ));
        assert!(matches!(
            FeedbackLine::emulate("spool", "sob3r"),
            Err(FeedbackError::InvalidLetter('3'))
        ));
    }

    #[test]
    fn parse_codes() -> Result<(), FeedbackError> {
        let line = FeedbackLine::parse("abcde", "x-.-x")?;
        let verdicts: Vec<_> = line.marks().iter().map(|m| m.verdict).collect();
        assert_eq!(
            verdicts,
            [
                Verdict::Exact,
                Verdict::Elsewhere,
                Verdict::Absent,
                Verdict::Elsewhere,
                Verdict::Exact
            ]
        );
        assert_eq!(line.word(), "abcde");
        assert_eq!(line.codes(), "x-.-x");
        Ok(())
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            FeedbackLine::parse("abcde", "x-.-"),
            Err(FeedbackError::WrongLength {
                expected: 5,
                found: 4
            })
        ));
        assert!(matches!(
            FeedbackLine::parse("abcde", "x-?-x"),
            Err(FeedbackError::InvalidCode {
                code: '?',
                position: 2
            })
        ));
        assert!(matches!(
            FeedbackLine::parse("abCde", "....."),
            Err(FeedbackError::InvalidLetter('C'))
        ));
    }

    #[test]
    fn win_needs_every_position() -> Result<(), FeedbackError> {
        assert!(FeedbackLine::parse("fruit", "xxxxx")?.is_win());
        assert!(!FeedbackLine::parse("fruit", "xxxx-")?.is_win());
        assert!(!FeedbackLine::from_marks(Vec::new()).is_win());
        Ok(())
    }

    #[test]
    fn history_lists_guesses_in_order() -> Result<(), FeedbackError> {
        let mut history = History::new();
        history.push(FeedbackLine::parse("crane", ".....")?);
        history.push(FeedbackLine::parse("pilot", "..-.x")?);

        assert_eq!(history.len(), 2);
        assert_eq!(history.guessed().collect::<Vec<_>>(), ["crane", "pilot"]);
        assert_eq!(format!("{}", history), "crane .....\npilot ..-.x");
        Ok(())
    }
}
