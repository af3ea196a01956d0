#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Nebulabrot renderer
//!
//! The Buddhabrot takes the points of the complex plane whose orbits
//! under z = z² + c *do* escape to infinity, and instead of painting
//! the starting point with its escape velocity, replays the whole
//! orbit and paints every pixel the orbit passes through.  Orbits
//! that wander for a long time before escaping hug the border of the
//! Mandelbrot set, and accumulating enough of them produces the
//! familiar seated-figure density cloud.
//!
//! This crate renders the colored ("Nebulabrot") variant in three
//! strictly sequential phases over a fixed pool of worker threads:
//!
//! 1. **Sampling**: every pixel of the grid is considered with a
//!    configured probability; those whose orbits escape only after a
//!    long wander are recorded as samples.
//! 2. **Computing**: the samples are sorted by row, and each worker
//!    replays the orbits of the samples on its rows, depositing hue,
//!    saturation and value into a shared HSV buffer.
//! 3. **Post-processing**: a power-curve remap compresses the dynamic
//!    range of the accumulated channels so lightly-visited regions
//!    stay visible next to the hot spots.
//!
//! A reporter thread runs alongside each phase and draws one progress
//! bar per worker; the terminal plumbing lives entirely in the `term`
//! module so the computation never touches an escape code.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate rand;

pub mod color;
pub mod config;
pub mod error;
pub mod orbit;
pub mod partition;
pub mod planes;
pub mod progress;
pub mod render;
pub mod samples;
pub mod term;

pub use config::RenderConfig;
pub use error::RenderError;
pub use planes::{Pixel, PlaneMapper, Viewport};
pub use progress::{NullSink, ProgressSink};
pub use render::Renderer;
pub use term::TermSink;
