//! A fixed pool of scoring workers.
//!
//! Each worker is a long-lived thread with its own request channel. A
//! dispatch splits the guess list into one contiguous chunk per worker, sends
//! every chunk along with a shared read-only snapshot of the history and the
//! candidates, and waits until every chunk has been reported back.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, trace};

use crate::{
    feedback::FeedbackLine,
    score::{self, Scored},
    PoolError,
};

/// The function a worker runs for every word of its chunk.
pub type Scorer = fn(&str, &[FeedbackLine], &[String]) -> Option<f64>;

/// What every worker sees during one dispatch.
struct Snapshot {
    history: Vec<FeedbackLine>,
    candidates: Vec<String>,
}

struct Job {
    chunk: usize,
    words: Vec<String>,
    snapshot: Arc<Snapshot>,
    reply: Sender<(usize, Option<Vec<Scored>>)>,
}

struct Worker {
    requests: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

/// A fixed-size pool of scoring threads.
///
/// Workers share no mutable state and keep nothing between dispatches, so a
/// single pool can serve every turn of every game.
///
/// # Examples
///
/// ```rust
/// use wordle_guesser::WorkerPool;
///
/// let pool = WorkerPool::new(2)?;
/// let words = vec!["ab".to_string(), "ba".to_string(), "cd".to_string()];
/// let scored = pool.evaluate(&words, &[], &words)?;
/// assert_eq!(scored.len(), 3);
/// assert_eq!(scored[0], ("ab".to_string(), Some(2.0)));
/// #
/// # Ok::<_, wordle_guesser::PoolError>(())
/// ```
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Spawns `size` workers that score with [`score::score()`].
    ///
    /// A size of zero is treated as one.
    pub fn new(size: usize) -> Result<Self, PoolError> {
        Self::with_scorer(size, score::score)
    }

    /// Spawns one worker per available core, minus one for the caller.
    pub fn with_default_size() -> Result<Self, PoolError> {
        Self::new(Self::default_size())
    }

    /// Returns the number of available cores minus one, and at least one.
    pub fn default_size() -> usize {
        thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(1)
            .max(1)
    }

    /// Spawns `size` workers that score with `scorer`.
    pub fn with_scorer(size: usize, scorer: Scorer) -> Result<Self, PoolError> {
        let size = size.max(1);
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let (requests, inbox) = crossbeam_channel::unbounded();
            let handle = thread::Builder::new()
                .name(format!("scorer-{}", id))
                .spawn(move || work(id, inbox, scorer))
                .map_err(PoolError::Spawn)?;
            workers.push(Worker {
                requests: Some(requests),
                handle: Some(handle),
            });
        }

        debug!("started {} scoring workers", size);
        Ok(WorkerPool { workers })
    }

    /// Returns the number of workers.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Scores every word of `words` against `candidates`.
    ///
    /// The words are split into contiguous chunks of `ceil(len / size)` and
    /// the results come back in the same order as `words`. If any chunk
    /// fails or goes unreported, the whole dispatch fails: a ranking with a
    /// chunk missing could pick the wrong guess without anyone noticing.
    pub fn evaluate(
        &self,
        words: &[String],
        history: &[FeedbackLine],
        candidates: &[String],
    ) -> Result<Vec<Scored>, PoolError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let snapshot = Arc::new(Snapshot {
            history: history.to_vec(),
            candidates: candidates.to_vec(),
        });
        let (reply, results) = crossbeam_channel::unbounded();

        let chunk_size = (words.len() + self.size() - 1) / self.size();
        let mut dispatched = 0;
        for (chunk, (words, worker)) in words.chunks(chunk_size).zip(&self.workers).enumerate() {
            let job = Job {
                chunk,
                words: words.to_vec(),
                snapshot: Arc::clone(&snapshot),
                reply: reply.clone(),
            };
            worker
                .requests
                .as_ref()
                .ok_or(PoolError::Disconnected(chunk))?
                .send(job)
                .map_err(|_| PoolError::Disconnected(chunk))?;
            dispatched += 1;
        }
        drop(reply);
        trace!(
            "dispatched {} chunks of up to {} words",
            dispatched, chunk_size
        );

        let mut merged: Vec<Option<Vec<Scored>>> = vec![None; dispatched];
        for _ in 0..dispatched {
            let (chunk, scored) = results.recv().map_err(|_| PoolError::WorkerLost)?;
            merged[chunk] = Some(scored.ok_or(PoolError::WorkerFailed(chunk))?);
        }

        Ok(merged.into_iter().flatten().flatten().collect())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            worker.requests.take();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

fn work(id: usize, inbox: Receiver<Job>, scorer: Scorer) {
    for job in inbox.iter() {
        let Snapshot {
            history,
            candidates,
        } = job.snapshot.as_ref();
        let words = &job.words;
        let scored = panic::catch_unwind(AssertUnwindSafe(|| {
            words
                .iter()
                .map(|word| (word.clone(), scorer(word, history, candidates)))
                .collect::<Vec<Scored>>()
        }));
        let report = match scored {
            Ok(scored) => Some(scored),
            Err(_) => {
                error!("worker {} panicked while scoring chunk {}", id, job.chunk);
                None
            }
        };

        if job.reply.send((job.chunk, report)).is_err() {
            trace!("worker {} finished a chunk nobody is waiting for", id);
        }
    }
}
