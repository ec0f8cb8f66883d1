//! Asking a person at a terminal for feedback.

use std::io::{BufRead, Write};

use owo_colors::{OwoColorize, Stream, Style};
use wordle_guesser::{FeedbackLine, GuessResult, Responder, Result, Verdict, WordleError};

fn verdict_style(verdict: Verdict) -> Style {
    match verdict {
        Verdict::Exact => Style::new().black().on_green(),
        Verdict::Elsewhere => Style::new().black().on_yellow(),
        Verdict::Absent => Style::new().white().on_bright_black(),
    }
}

/// Colors every letter of `line` by its verdict.
pub fn highlight(line: &FeedbackLine) -> String {
    line.marks()
        .iter()
        .map(|mark| {
            mark.letter
                .if_supports_color(Stream::Stdout, |letter| {
                    letter.style(verdict_style(mark.verdict))
                })
                .to_string()
        })
        .collect()
}

fn legend() -> String {
    Verdict::ALL
        .iter()
        .map(|&verdict| {
            verdict
                .code()
                .if_supports_color(Stream::Stdout, |code| code.style(verdict_style(verdict)))
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// A responder that reads feedback typed in by a person.
///
/// For every guess it asks for the word that was actually entered (blank
/// keeps the suggested guess), then for one code per letter, and finally for
/// a confirmation. Invalid answers are reported and asked again.
pub struct Prompt<R, W> {
    input: R,
    output: W,
    word_length: usize,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W, word_length: usize) -> Self {
        Prompt {
            input,
            output,
            word_length,
        }
    }

    /// Asks `text` until `validate` accepts the answer.
    ///
    /// Returns [`WordleError::Aborted`] if the input ends first.
    fn question<T>(
        &mut self,
        text: &str,
        validate: impl Fn(&str) -> std::result::Result<T, String>,
    ) -> Result<T> {
        loop {
            write!(
                self.output,
                "{}",
                format!("> {}", text).if_supports_color(Stream::Stdout, |text| text.dimmed())
            )?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                writeln!(self.output)?;
                return Err(WordleError::Aborted);
            }

            match validate(answer.trim()) {
                Ok(value) => return Ok(value),
                Err(message) => writeln!(
                    self.output,
                    "{}",
                    message.if_supports_color(Stream::Stdout, |message| message.red())
                )?,
            }
        }
    }

    /// Reads one feedback line for `guess`.
    ///
    /// Returns `None` if the line was not confirmed.
    pub fn read_feedback(&mut self, guess: &GuessResult) -> Result<Option<FeedbackLine>> {
        let length = self.word_length;

        let input = self.question(&format!("enter input [{}]: ", guess.word), |answer| {
            if answer.is_empty() {
                Ok(guess.word.clone())
            } else if answer.len() == length && answer.bytes().all(|b| b.is_ascii_lowercase()) {
                Ok(answer.to_string())
            } else {
                Err(format!(
                    "input length must be {} and all chars must be lower case alphabets",
                    length
                ))
            }
        })?;

        let line = self.question(&format!("enter response ({}): ", legend()), |answer| {
            if answer.is_empty() {
                return Err("input is required".to_string());
            }
            FeedbackLine::parse(&input, answer).map_err(|e| e.to_string())
        })?;

        let confirmed = self.question(
            &format!("Is this correct? {} [Y/n] ", highlight(&line)),
            |answer| Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y")),
        )?;

        Ok(if confirmed { Some(line) } else { None })
    }
}

impl<R: BufRead, W: Write> Responder for Prompt<R, W> {
    fn respond(&mut self, _turn: usize, guess: &GuessResult) -> Result<FeedbackLine> {
        loop {
            if let Some(line) = self.read_feedback(guess)? {
                return Ok(line);
            }
        }
    }
}
