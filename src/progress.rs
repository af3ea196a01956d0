// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Shared progress state and the reporter loop.
//!
//! Each worker owns exactly one cell on the board and is the only
//! writer of it; the reporter reads all the cells without any
//! locking.  Stale reads are fine for a progress display, but the
//! reads still have to be defined behavior, so the fractions are
//! stored as `f64` bit patterns in `AtomicU64`s with relaxed
//! ordering.  The completion counter is the reporter's termination
//! condition: it stops polling exactly when every worker of the
//! phase has checked in.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// How often the reporter redraws.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One progress cell per worker plus the phase's completion counter.
pub struct ProgressBoard {
    cells: Vec<AtomicU64>,
    completed: AtomicUsize,
    started: Instant,
}

impl ProgressBoard {
    /// A fresh board with every fraction at zero.
    pub fn new(workers: usize) -> ProgressBoard {
        ProgressBoard {
            cells: (0..workers).map(|_| AtomicU64::new(0)).collect(),
            completed: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    /// Zeroes the board for the next phase and restarts the clock.
    /// Takes `&mut self`, so it cannot race with a live phase.
    pub fn reset(&mut self) {
        for cell in &self.cells {
            cell.store(0, Ordering::Relaxed);
        }
        self.completed.store(0, Ordering::Relaxed);
        self.started = Instant::now();
    }

    /// Number of workers on the board.
    pub fn workers(&self) -> usize {
        self.cells.len()
    }

    /// Advances a worker's own fraction.  Only the owning worker may
    /// call this for its index; the fraction never exceeds 1.0 even
    /// when float drift makes the increments sum slightly past it.
    pub fn add(&self, worker: usize, delta: f64) {
        let current = f64::from_bits(self.cells[worker].load(Ordering::Relaxed));
        let next = (current + delta).min(1.0);
        self.cells[worker].store(next.to_bits(), Ordering::Relaxed);
    }

    /// A worker's current fraction, possibly stale.
    pub fn fraction(&self, worker: usize) -> f64 {
        f64::from_bits(self.cells[worker].load(Ordering::Relaxed))
    }

    /// Called once by each worker when it finishes its rows.
    pub fn complete_worker(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Workers that have finished the phase so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// A point-in-time copy of the whole board for rendering.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            fractions: (0..self.cells.len()).map(|k| self.fraction(k)).collect(),
            completed: self.completed(),
            elapsed: self.started.elapsed(),
        }
    }
}

/// What the reporter hands to the sink on every poll.
#[derive(Clone, Debug)]
pub struct ProgressSnapshot {
    /// Per-worker completion fractions in [0, 1].
    pub fractions: Vec<f64>,
    /// Workers that have finished the phase.
    pub completed: usize,
    /// Time since the phase started.
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Mean fraction across all workers.
    pub fn mean(&self) -> f64 {
        if self.fractions.is_empty() {
            return 0.0;
        }
        self.fractions.iter().sum::<f64>() / (self.fractions.len() as f64)
    }

    /// The slowest worker's fraction; drives the remaining-time
    /// estimate, since the phase ends when the slowest worker does.
    pub fn min_fraction(&self) -> f64 {
        self.fractions.iter().cloned().fold(1.0, f64::min)
    }

    /// Estimated time to phase completion, extrapolated from the
    /// slowest worker's rate.  `None` until that worker has made
    /// measurable progress.
    pub fn estimated_remaining(&self) -> Option<Duration> {
        let slowest = self.min_fraction();
        if slowest <= 0.0 {
            return None;
        }
        let elapsed = self.elapsed.as_secs_f64();
        Some(Duration::from_secs_f64(elapsed / slowest - elapsed))
    }
}

/// Where progress snapshots go.  The computation core only ever
/// talks to this trait; the terminal renderer in `term` is one
/// implementation, and anything else (a log file, a test) can be
/// swapped in without touching the pipeline.
pub trait ProgressSink {
    /// A phase is starting with the given worker count.
    fn begin_phase(&mut self, name: &str, workers: usize);
    /// Render one snapshot.
    fn render(&mut self, snapshot: &ProgressSnapshot);
    /// The phase's workers have all finished.
    fn end_phase(&mut self);
}

/// A sink that discards everything; used by tests and by headless
/// callers of the library.
#[derive(Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn begin_phase(&mut self, _name: &str, _workers: usize) {}
    fn render(&mut self, _snapshot: &ProgressSnapshot) {}
    fn end_phase(&mut self) {}
}

/// The reporter body.  Runs on its own thread beside the phase's
/// workers, polling the board and feeding the sink, and returns
/// exactly when the completion counter reaches the worker count.
/// The final snapshot is rendered before returning so the display
/// always ends at 100%.
pub fn report_loop<S: ProgressSink>(sink: &mut S, board: &ProgressBoard) {
    let workers = board.workers();
    loop {
        let snapshot = board.snapshot();
        sink.render(&snapshot);
        if snapshot.completed == workers {
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_accumulate_and_clamp() {
        let board = ProgressBoard::new(2);
        for _ in 0..7 {
            board.add(0, 0.2);
        }
        assert_eq!(board.fraction(0), 1.0);
        assert_eq!(board.fraction(1), 0.0);
    }

    #[test]
    fn reset_zeroes_the_board() {
        let mut board = ProgressBoard::new(2);
        board.add(1, 0.5);
        board.complete_worker();
        board.reset();
        assert_eq!(board.fraction(1), 0.0);
        assert_eq!(board.completed(), 0);
    }

    #[test]
    fn snapshot_aggregates() {
        let board = ProgressBoard::new(4);
        board.add(0, 1.0);
        board.add(1, 0.5);
        board.add(2, 0.25);
        board.add(3, 0.25);
        let snap = board.snapshot();
        assert_eq!(snap.mean(), 0.5);
        assert_eq!(snap.min_fraction(), 0.25);
    }

    #[test]
    fn no_estimate_before_any_progress() {
        let board = ProgressBoard::new(2);
        assert!(board.snapshot().estimated_remaining().is_none());
    }

    #[test]
    fn report_loop_terminates_on_completion() {
        struct Counting(usize);
        impl ProgressSink for Counting {
            fn begin_phase(&mut self, _: &str, _: usize) {}
            fn render(&mut self, _: &ProgressSnapshot) {
                self.0 += 1;
            }
            fn end_phase(&mut self) {}
        }
        let board = ProgressBoard::new(1);
        board.add(0, 1.0);
        board.complete_worker();
        let mut sink = Counting(0);
        report_loop(&mut sink, &board);
        assert_eq!(sink.0, 1);
    }
}
