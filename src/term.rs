//! The terminal progress display.  This is the only module in the
//! crate that is allowed to emit cursor-control escape codes; the
//! pipeline only ever sees the `ProgressSink` trait, so a headless
//! consumer can substitute `NullSink` and no escape code is printed
//! anywhere.

use progress::{ProgressSink, ProgressSnapshot};
use std::io::{self, Write};
use std::time::Duration;

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_LINE: &str = "\r\x1b[K";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Width of each progress bar, in columns.
const BAR_COLUMNS: usize = 40;

/// Renders one fixed-width bar per worker, a bold aggregate line,
/// and an elapsed/remaining clock, redrawing in place on every poll.
pub struct TermSink {
    workers: usize,
}

impl TermSink {
    /// Hides the cursor for the duration of the run; the cursor
    /// comes back when the sink is dropped.
    pub fn new() -> TermSink {
        print!("{}", HIDE_CURSOR);
        TermSink { workers: 0 }
    }

    fn cursor_up(lines: usize) {
        print!("\x1b[{}A", lines);
    }
}

impl Default for TermSink {
    fn default() -> TermSink {
        TermSink::new()
    }
}

impl Drop for TermSink {
    fn drop(&mut self) {
        print!("\r{}", SHOW_CURSOR);
        let _ = io::stdout().flush();
    }
}

fn bar(fraction: f64) -> String {
    let fill = (fraction * (BAR_COLUMNS as f64)).round() as usize;
    let fill = fill.min(BAR_COLUMNS);
    format!("{:#<fill$}{:empty$}", "", "", fill = fill, empty = BAR_COLUMNS - fill)
}

fn clock(duration: Duration) -> String {
    let total = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

impl ProgressSink for TermSink {
    fn begin_phase(&mut self, name: &str, workers: usize) {
        self.workers = workers;
        println!("{}{}{}", BOLD, name, RESET);
        // Reserve one line per worker plus the total and clock lines,
        // so the first redraw has somewhere to move up to.
        for _ in 0..workers + 2 {
            println!();
        }
    }

    fn render(&mut self, snapshot: &ProgressSnapshot) {
        Self::cursor_up(self.workers + 2);
        for (k, fraction) in snapshot.fractions.iter().enumerate() {
            println!(
                "{}Worker {:2}: [{}] ({:6.2}% done)",
                CLEAR_LINE,
                k + 1,
                bar(*fraction),
                fraction * 100.0
            );
        }
        let mean = snapshot.mean();
        println!(
            "{}{}Total:     [{}] ({:6.2}% done){}",
            CLEAR_LINE,
            BOLD,
            bar(mean),
            mean * 100.0,
            RESET
        );
        let remaining = match snapshot.estimated_remaining() {
            Some(eta) => clock(eta),
            None => "--:--:--".to_string(),
        };
        print!(
            "{}{} ({} remaining)",
            CLEAR_LINE,
            clock(snapshot.elapsed),
            remaining
        );
        println!();
        let _ = io::stdout().flush();
    }

    fn end_phase(&mut self) {
        println!();
    }
}
