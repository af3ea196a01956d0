// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The runtime configuration surface.  Everything the original
//! hard-coded — viewport, step sizes, acceptance probability,
//! iteration window, modulation factor, worker count — lives here
//! and is validated before any partitioning happens.

use color::DEFAULT_PALETTE;
use error::RenderError;
use num_cpus;
use planes::{PlaneMapper, Viewport};

/// Parameters for one render.  Construct with [`RenderConfig::default`]
/// and adjust; [`RenderConfig::validate`] (called by the renderer)
/// rejects degenerate combinations up front.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// The rectangle of the complex plane to render.
    pub viewport: Viewport,
    /// Grid step along the real axis; the image width is the number
    /// of steps that fit across the viewport.
    pub re_step: f64,
    /// Grid step along the imaginary axis.
    pub im_step: f64,
    /// Probability that any given pixel is considered during the
    /// sampling phase, in (0, 1].
    pub sample_probability: f64,
    /// Orbits escaping before this many iterations are discarded as
    /// uninteresting.
    pub min_iterations: usize,
    /// The iteration cap: orbits still bounded here are abandoned.
    pub max_iterations: usize,
    /// Exponent of the post-processing power curve.
    pub modulation_factor: f32,
    /// Worker thread count.  Defaults to the hardware parallelism,
    /// never below 1.
    pub workers: usize,
    /// Base RNG seed; worker k draws from a stream seeded
    /// `seed + k`, so runs are reproducible but workers are not
    /// correlated with each other.
    pub seed: u64,
    /// Hue cycle for painting samples, in degrees.
    pub palette: Vec<u16>,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            viewport: Viewport {
                min_re: -2.0,
                max_re: 1.0,
                min_im: -1.125,
                max_im: 1.125,
            },
            re_step: 0.005,
            im_step: 0.005,
            sample_probability: 0.25,
            min_iterations: 500,
            max_iterations: 20_000,
            modulation_factor: 10.0,
            workers: num_cpus::get().max(1),
            seed: 0,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl RenderConfig {
    /// Checks the configuration and builds the plane mapper.  Every
    /// degenerate input named in the failure taxonomy is rejected
    /// here, before a single thread is spawned: a silent empty
    /// partition is worse than an error.
    pub fn validate(&self) -> Result<PlaneMapper, RenderError> {
        if self.workers == 0 {
            return Err(RenderError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if !(self.sample_probability > 0.0 && self.sample_probability <= 1.0) {
            return Err(RenderError::Config(format!(
                "sample probability {} is not in (0, 1]",
                self.sample_probability
            )));
        }
        if self.min_iterations >= self.max_iterations {
            return Err(RenderError::Config(format!(
                "iteration window [{}, {}) is empty",
                self.min_iterations, self.max_iterations
            )));
        }
        if !(self.modulation_factor > 0.0) {
            return Err(RenderError::Config(
                "modulation factor must be positive".to_string(),
            ));
        }
        if self.palette.is_empty() {
            return Err(RenderError::Config("palette is empty".to_string()));
        }
        let plane = PlaneMapper::new(self.viewport, self.re_step, self.im_step)?;
        if plane.height() < self.workers {
            return Err(RenderError::Config(format!(
                "{} rows cannot keep {} workers busy; lower the worker \
                 count or shrink the step",
                plane.height(),
                self.workers
            )));
        }
        Ok(plane)
    }
}
