//! Turning a feedback history into a test over candidate words.
//!
//! [`WordConstraint::build()`] folds every line of a history into positional
//! and word-level letter sets. The constraint is then evaluated once per
//! dictionary word, either directly through [`Filter`] or through the
//! precompiled regular expression of [`PatternFilter`]. Both accept exactly
//! the same words.

use regex::bytes::{Regex, RegexBuilder};

use crate::{feedback::FeedbackLine, Verdict};

/// A set of lowercase ascii letters.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct LetterSet(u32);

impl LetterSet {
    fn bit(letter: char) -> u32 {
        if letter.is_ascii_lowercase() {
            1 << (letter as u32 - 'a' as u32)
        } else {
            0
        }
    }

    /// Adds a letter. Anything other than a lowercase ascii letter is ignored.
    pub fn insert(&mut self, letter: char) {
        self.0 |= Self::bit(letter);
    }

    pub fn remove(&mut self, letter: char) {
        self.0 &= !Self::bit(letter);
    }

    pub fn contains(self, letter: char) -> bool {
        self.0 & Self::bit(letter) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the letters in both sets.
    pub fn union(self, other: LetterSet) -> LetterSet {
        LetterSet(self.0 | other.0)
    }

    /// Returns the letters of `self` that are not in `other`.
    pub fn difference(self, other: LetterSet) -> LetterSet {
        LetterSet(self.0 & !other.0)
    }

    /// Returns true if every letter of `self` is also in `other`.
    pub fn is_subset(self, other: LetterSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterates over the letters in alphabetical order.
    pub fn iter(self) -> impl Iterator<Item = char> {
        ('a'..='z').filter(move |&c| self.contains(c))
    }
}

impl FromIterator<char> for LetterSet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        let mut set = LetterSet::default();
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

/// What is known about one position of the secret.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct Slot {
    /// The letter the position must hold, if it has been confirmed.
    pub exact: Option<char>,

    /// Letters the position cannot hold.
    pub excluded: LetterSet,
}

/// Everything a history says about the secret word.
///
/// A word satisfies the constraint when it holds every confirmed letter at
/// its position, holds no excluded letter at a position, contains every
/// required letter somewhere, and contains no forbidden letter anywhere.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct WordConstraint {
    slots: Vec<Slot>,
    required: LetterSet,
    forbidden: LetterSet,
    satisfiable: bool,
}

impl WordConstraint {
    /// Folds feedback lines, oldest first, into a constraint.
    ///
    /// The first [`Verdict::Exact`] seen for a position fixes that position.
    /// A later exact verdict naming a different letter for the same position
    /// cannot be met by any word, so the constraint rejects everything.
    ///
    /// Absent letters only become forbidden after every line has been
    /// folded, and only if they were never marked exact or elsewhere in any
    /// line. The official game marks a repeated letter absent once all of its
    /// copies are accounted for, so an absent verdict says nothing about a
    /// letter that is confirmed elsewhere.
    pub fn build<'a>(lines: impl IntoIterator<Item = &'a FeedbackLine>) -> Self {
        let mut slots: Vec<Slot> = Vec::new();
        let mut required = LetterSet::default();
        let mut absent = LetterSet::default();
        let mut satisfiable = true;

        for line in lines {
            if slots.len() < line.len() {
                slots.resize(line.len(), Slot::default());
            }
            for (slot, mark) in slots.iter_mut().zip(line.marks()) {
                match mark.verdict {
                    Verdict::Exact => match slot.exact {
                        None => slot.exact = Some(mark.letter),
                        Some(fixed) if fixed != mark.letter => satisfiable = false,
                        Some(_) => {}
                    },
                    Verdict::Elsewhere => {
                        slot.excluded.insert(mark.letter);
                        required.insert(mark.letter);
                    }
                    Verdict::Absent => absent.insert(mark.letter),
                }
            }
        }

        let mut confirmed = required;
        for slot in slots.iter_mut() {
            if let Some(letter) = slot.exact {
                slot.excluded.remove(letter);
                confirmed.insert(letter);
            }
        }

        WordConstraint {
            slots,
            required,
            forbidden: absent.difference(confirmed),
            satisfiable,
        }
    }

    /// Returns the per-position knowledge, one slot per position.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Letters the secret contains somewhere.
    pub fn required(&self) -> LetterSet {
        self.required
    }

    /// Letters the secret does not contain at all.
    pub fn forbidden(&self) -> LetterSet {
        self.forbidden
    }

    /// Returns false if the folded lines contradict each other.
    pub fn is_satisfiable(&self) -> bool {
        self.satisfiable
    }

    /// Tests a single word against the constraint.
    pub fn matches(&self, word: &str) -> bool {
        if !self.satisfiable || word.len() < self.slots.len() {
            return false;
        }

        let mut seen = LetterSet::default();
        for (i, letter) in word.chars().enumerate() {
            if self.forbidden.contains(letter) {
                return false;
            }
            if let Some(slot) = self.slots.get(i) {
                if matches!(slot.exact, Some(exact) if exact != letter) {
                    return false;
                }
                if slot.excluded.contains(letter) {
                    return false;
                }
            }
            seen.insert(letter);
        }

        self.required.is_subset(seen)
    }

    /// Returns the constraint as a reusable predicate.
    pub fn predicate(&self) -> impl Fn(&str) -> bool + '_ {
        move |word| self.matches(word)
    }
}

/// A predicate over candidate words built from a history.
///
/// With an empty history every word passes.
///
/// # Examples
///
/// ```rust
/// use wordle_guesser::{FeedbackLine, Filter};
///
/// let history = [FeedbackLine::emulate("crane", "fruit")?];
/// let filter = Filter::new(&history);
/// assert!(filter.matches("fruit"));
/// assert!(!filter.matches("crane"));
/// assert!(Filter::new(&[]).matches("crane"));
/// # Ok::<_, wordle_guesser::FeedbackError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Filter {
    constraint: Option<WordConstraint>,
}

impl Filter {
    pub fn new(history: &[FeedbackLine]) -> Self {
        if history.is_empty() {
            return Filter::default();
        }
        Filter {
            constraint: Some(WordConstraint::build(history)),
        }
    }

    pub fn matches(&self, word: &str) -> bool {
        match &self.constraint {
            Some(constraint) => constraint.matches(word),
            None => true,
        }
    }
}

/// A [`Filter`] compiled into a single anchored regular expression.
///
/// Each position becomes either its confirmed letter or a negated class of
/// every letter it cannot hold. Required letters are still checked one by
/// one, since a regular expression cannot express "somewhere" cheaply.
#[derive(Clone, Debug)]
pub struct PatternFilter {
    pattern: Option<Regex>,
    required: LetterSet,
    satisfiable: bool,
}

impl PatternFilter {
    pub fn new(history: &[FeedbackLine]) -> Result<Self, regex::Error> {
        if history.is_empty() {
            return Ok(PatternFilter {
                pattern: None,
                required: LetterSet::default(),
                satisfiable: true,
            });
        }
        Self::from_constraint(&WordConstraint::build(history))
    }

    pub fn from_constraint(constraint: &WordConstraint) -> Result<Self, regex::Error> {
        let mut builder = RegexBuilder::new(&generate_pattern(constraint));
        builder.unicode(false);

        Ok(PatternFilter {
            pattern: Some(builder.build()?),
            required: constraint.required(),
            satisfiable: constraint.is_satisfiable(),
        })
    }

    pub fn matches(&self, word: &str) -> bool {
        if !self.satisfiable {
            return false;
        }
        match &self.pattern {
            Some(pattern) => {
                pattern.is_match(word.as_bytes()) && self.required.iter().all(|c| word.contains(c))
            }
            None => true,
        }
    }
}

fn generate_pattern(constraint: &WordConstraint) -> String {
    let mut pattern = String::from("^");

    for slot in constraint.slots() {
        if let Some(exact) = slot.exact {
            pattern.push(exact);
            continue;
        }

        let excluded = constraint.forbidden().union(slot.excluded);
        if excluded.is_empty() {
            pattern.push('.');
        } else {
            pattern.push_str("[^");
            pattern.extend(excluded.iter());
            pattern.push(']');
        }
    }

    // Letters after the last known position only need to avoid forbidden ones.
    if constraint.forbidden().is_empty() {
        pattern.push_str(".*");
    } else {
        pattern.push_str("[^");
        pattern.extend(constraint.forbidden().iter());
        pattern.push_str("]*");
    }

    pattern.push('$');
    pattern
}
