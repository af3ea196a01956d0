// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render context and the three-phase pipeline.
//!
//! Each phase gets its own `crossbeam::scope`: the scope join is the
//! barrier, so by construction no accumulation starts before every
//! sampler (and the phase's reporter) has finished.  The orchestrating
//! thread doubles as the reporter inside the scope, polling the
//! progress board until every worker has checked in.
//!
//! Synchronization discipline: the sample list and the HSV buffer
//! each sit behind a `Mutex`, and every cross-worker write goes
//! through it — orbit replay can land on any pixel of the grid, so
//! ownership partitioning is not available in stage 2 and we use the
//! same coarse lock uniformly in stage 3.  Progress cells are the
//! one exception: they are owner-written atomics, read unsynchronized
//! by the reporter.

use std::sync::Mutex;
use std::time::Instant;

use crossbeam;
use itertools::iproduct;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use color::{HsvCell, Rgb};
use config::RenderConfig;
use error::RenderError;
use orbit;
use partition::striped_rows;
use planes::{Pixel, PlaneMapper};
use progress::{report_loop, ProgressBoard, ProgressSink};
use samples;

/// Owns one render: the validated configuration, the plane mapper,
/// and the row partition.  The shared buffers live only for the
/// duration of [`Renderer::render`].
pub struct Renderer {
    config: RenderConfig,
    plane: PlaneMapper,
    parts: Vec<Vec<usize>>,
}

impl Renderer {
    /// Validates the configuration and fixes the row partition.
    pub fn new(config: RenderConfig) -> Result<Renderer, RenderError> {
        let plane = config.validate()?;
        let parts = striped_rows(plane.height(), config.workers);
        Ok(Renderer {
            config,
            plane,
            parts,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.plane.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.plane.height()
    }

    /// Runs the full pipeline and returns the finished row-major
    /// RGB8 buffer, three bytes per pixel, ready for an encoder.
    pub fn render<S: ProgressSink>(&self, sink: &mut S) -> Result<Vec<u8>, RenderError> {
        let workers = self.config.workers;
        let mut board = ProgressBoard::new(workers);

        // Stage 1: find pixels whose orbits wander long before
        // escaping.
        let samples_lock = Mutex::new(Vec::new());
        let started = Instant::now();
        self.run_phase("Sampling", sink, &mut board, |k, board| {
            self.sample_rows(k, board, &samples_lock)
        });
        let mut samples = samples_lock.into_inner().unwrap();
        info!(
            "sampling found {} long orbits in {:.1?}",
            samples.len(),
            started.elapsed()
        );

        // The barrier above makes the list complete; sort it once and
        // it is immutable from here on.
        samples::sort_by_row(&mut samples);

        // Stage 2: replay every sample's orbit into the shared
        // histogram.
        let buffer = Mutex::new(vec![HsvCell::unlit(); self.plane.len()]);
        let started = Instant::now();
        self.run_phase("Computing", sink, &mut board, |k, board| {
            self.accumulate_rows(k, board, &samples, &buffer)
        });
        info!("accumulation finished in {:.1?}", started.elapsed());

        // Stage 3: compress the dynamic range.
        let started = Instant::now();
        self.run_phase("Post-processing", sink, &mut board, |k, board| {
            self.post_process_rows(k, board, &buffer)
        });
        info!("post-processing finished in {:.1?}", started.elapsed());

        let buffer = buffer.into_inner().unwrap();
        let mut pixels = Vec::with_capacity(buffer.len() * 3);
        for cell in &buffer {
            let Rgb { r, g, b } = cell.to_rgb();
            pixels.push(r);
            pixels.push(g);
            pixels.push(b);
        }
        Ok(pixels)
    }

    /// Runs one phase: N workers under a single scope, whose join is
    /// the inter-phase barrier, while the orchestrating thread serves
    /// as the phase's reporter until the completion counter says
    /// every worker has checked in.  A worker panic propagates out of
    /// the scope and aborts the run; there is no partial-result
    /// recovery.
    fn run_phase<S, W>(&self, name: &str, sink: &mut S, board: &mut ProgressBoard, work: W)
    where
        S: ProgressSink,
        W: Fn(usize, &ProgressBoard) + Sync,
    {
        board.reset();
        sink.begin_phase(name, self.config.workers);
        {
            let board = &*board;
            let work = &work;
            crossbeam::scope(|spawner| {
                for k in 0..self.config.workers {
                    spawner.spawn(move |_| {
                        work(k, board);
                        board.complete_worker();
                    });
                }
                report_loop(&mut *sink, board);
            })
            .unwrap();
        }
        sink.end_phase();
    }

    /// Stage 1 worker body.  Row-major over the worker's stripes,
    /// each pixel considered with the configured probability, the
    /// interior shortcut applied before the expensive iteration, and
    /// only escapes inside the long-orbit window recorded.
    fn sample_rows(&self, worker: usize, board: &ProgressBoard, out: &Mutex<Vec<Pixel>>) {
        let rows = &self.parts[worker];
        let width = self.plane.width();
        if rows.is_empty() {
            board.add(worker, 1.0);
            return;
        }
        let area = (rows.len() * width) as f64;
        let mut rng = StdRng::seed_from_u64(self.config.seed + worker as u64);
        let unit = Uniform::new(0.0_f64, 1.0);

        for (row, col) in iproduct!(rows.iter().cloned(), 0..width) {
            board.add(worker, 1.0 / area);
            if unit.sample(&mut rng) >= self.config.sample_probability {
                continue;
            }
            let c = self.plane.pixel_to_point(&Pixel { row, col });
            if orbit::in_main_bulbs(c) {
                continue;
            }
            if let Some(i) = orbit::escape_time(c, self.config.max_iterations) {
                if i >= self.config.min_iterations {
                    out.lock().unwrap().push(Pixel { row, col });
                }
            }
        }
    }

    /// Stage 2 worker body.  For each owned row, the sample index
    /// hands back the first matching sample; the worker replays each
    /// matching orbit and deposits into every in-viewport iterate's
    /// cell under the buffer lock.  Iterates outside the viewport are
    /// skipped, not fatal: the orbit keeps running and may re-enter.
    fn accumulate_rows(
        &self,
        worker: usize,
        board: &ProgressBoard,
        samples: &[Pixel],
        buffer: &Mutex<Vec<HsvCell>>,
    ) {
        let rows = &self.parts[worker];
        let palette = &self.config.palette;
        let mut palette_idx = 0;
        if rows.is_empty() {
            board.add(worker, 1.0);
            return;
        }

        for &row in rows {
            board.add(worker, 1.0 / (rows.len() as f64));
            let first = match samples::first_with_row(samples, row) {
                Some(first) => first,
                None => continue,
            };
            for sample in samples[first..].iter().take_while(|s| s.row == row) {
                let c = self.plane.pixel_to_point(sample);
                orbit::trace_orbit(c, self.config.max_iterations, |z| {
                    if let Some(offset) = self.plane.point_to_offset(z) {
                        let mut cells = buffer.lock().unwrap();
                        cells[offset].deposit(palette[palette_idx]);
                    }
                });
                palette_idx = (palette_idx + 1) % palette.len();
            }
        }
    }

    /// Stage 3 worker body.  Applies the modulation curve to every
    /// cell of the worker's rows, locking the buffer once per row.
    fn post_process_rows(
        &self,
        worker: usize,
        board: &ProgressBoard,
        buffer: &Mutex<Vec<HsvCell>>,
    ) {
        let rows = &self.parts[worker];
        let width = self.plane.width();
        if rows.is_empty() {
            board.add(worker, 1.0);
            return;
        }
        let area = (rows.len() * width) as f64;
        let k = self.config.modulation_factor;

        for &row in rows {
            let mut cells = buffer.lock().unwrap();
            for col in 0..width {
                cells[row * width + col].modulate(k);
            }
            drop(cells);
            board.add(worker, (width as f64) / area);
        }
    }
}
