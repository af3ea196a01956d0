//! The renderer's failure taxonomy.  There are only two ways this
//! program fails gracefully: a configuration that cannot produce a
//! well-formed partition or grid, and an output sink that cannot be
//! written.  Everything else (a worker panicking mid-phase) is fatal
//! with no partial-result recovery.

use std::io;

/// Errors surfaced by the renderer and the output path.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The configuration was degenerate: zero workers, an empty or
    /// inverted viewport, a bad acceptance probability, an empty
    /// iteration window, or fewer rows than workers.
    #[fail(display = "configuration error: {}", _0)]
    Config(String),

    /// The output sink could not be opened or written.  The
    /// computation that produced the buffer is still intact.
    #[fail(display = "could not write output: {}", _0)]
    Output(#[cause] io::Error),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> RenderError {
        RenderError::Output(err)
    }
}
