mod prompt;

use std::{error::Error, io, path::PathBuf, process};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use owo_colors::{OwoColorize, Stream, Style};
use wordle_guesser::{
    Dictionary, Emulator, FeedbackLine, FileCache, Game, GuessResult, Responder, Result,
    WorkerPool, MAX_TURNS, WORD_LENGTH,
};

use crate::prompt::{highlight, Prompt};

/// Plays Wordle, choosing every guess by itself
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Play against this secret word instead of asking for feedback
    #[clap(short, long)]
    emulate: Option<String>,

    /// Path to the dictionary, one word per line or a JSON array
    #[clap(short, long, default_value = "words.txt")]
    words: PathBuf,

    /// Directory holding cached opening guesses
    #[clap(short, long, default_value = ".cache")]
    cache: PathBuf,

    /// Never read or write the cache
    #[clap(long)]
    no_cache: bool,

    /// Number of scoring workers [default: available cores minus one]
    #[clap(long)]
    workers: Option<usize>,

    /// Number of guesses before giving up
    #[clap(short, long, default_value_t = MAX_TURNS)]
    max_turns: usize,

    /// Length of every word
    #[clap(short, long, default_value_t = WORD_LENGTH)]
    length: usize,

    /// Emulate feedback the way the official game counts repeated letters
    #[clap(long, requires = "emulate")]
    official: bool,

    /// Log every turn
    #[clap(short, long)]
    verbose: bool,
}

/// Shows a spinner while a guess is being scored.
///
/// The spinner is cleared once the guess is answered, or when the game ends
/// before that.
struct Spinner<R> {
    inner: R,
    bar: Option<ProgressBar>,
}

impl<R> Spinner<R> {
    fn new(inner: R) -> Self {
        Spinner { inner, bar: None }
    }

    fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl<R> Drop for Spinner<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<R: Responder> Responder for Spinner<R> {
    fn guessing(&mut self, turn: usize, candidates: &[String]) {
        self.inner.guessing(turn, candidates);

        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
        bar.set_message(format!(
            "turn {}: choosing among {} candidates",
            turn,
            candidates.len()
        ));
        bar.enable_steady_tick(100);
        self.bar = Some(bar);
    }

    fn respond(&mut self, turn: usize, guess: &GuessResult) -> Result<FeedbackLine> {
        self.stop();
        println!(
            "#{} {} ({:.3})",
            turn,
            guess
                .word
                .if_supports_color(Stream::Stdout, |word| word.bold()),
            guess.confidence
        );

        let line = self.inner.respond(turn, guess)?;
        debug!("feedback: {}", highlight(&line));
        Ok(line)
    }
}

fn run(args: Args) -> Result<()> {
    let dictionary = Dictionary::load(&args.words, args.length)?;
    debug!(
        "loaded {} words from {}",
        dictionary.len(),
        args.words.display()
    );

    let pool = match args.workers {
        Some(workers) => WorkerPool::new(workers)?,
        None => WorkerPool::with_default_size()?,
    };
    let mut cache = FileCache::new(&args.cache);

    let mut game = Game::new(&dictionary, &pool).max_turns(args.max_turns);
    if !args.no_cache {
        game = game.cache(&mut cache);
    }

    let outcome = match args.emulate {
        Some(secret) => {
            let mut emulator = Emulator::new(secret.trim().to_lowercase())?;
            if args.official {
                emulator = emulator.official();
            }
            game.play(&mut Spinner::new(emulator))?
        }
        None => {
            let stdin = io::stdin();
            let prompt = Prompt::new(stdin.lock(), io::stdout(), dictionary.word_length());
            game.play(&mut Spinner::new(prompt))?
        }
    };

    println!(
        "WIN! The answer is {}",
        outcome.word.if_supports_color(Stream::Stdout, |word| word
            .style(Style::new().bold().bright_white()))
    );
    for line in outcome.history.iter() {
        debug!("{}", highlight(line));
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(args) {
        eprintln!(
            "{} {}",
            "error:".if_supports_color(Stream::Stderr, |text| text.red()),
            e
        );
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}
