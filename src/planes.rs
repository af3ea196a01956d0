//! Maps between the integral pixel grid and the complex viewport.
//!
//! The grid is not given directly: the configuration supplies the
//! viewport corners and a step size per axis, and the grid dimensions
//! fall out of how many steps fit along each axis.  Row indices run
//! along the imaginary axis, columns along the real axis, so a buffer
//! offset is `row * width + col`.

use error::RenderError;
use num::Complex;

/// The rectangle of the complex plane being rendered, as min/max
/// bounds per axis.  `min_re`/`max_re` bound the real axis (columns),
/// `min_im`/`max_im` the imaginary axis (rows).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge of the real axis.
    pub min_re: f64,
    /// Right edge of the real axis.
    pub max_re: f64,
    /// Bottom edge of the imaginary axis.
    pub min_im: f64,
    /// Top edge of the imaginary axis.
    pub max_im: f64,
}

impl Viewport {
    /// True when a point lies inside the viewport, edges included.
    pub fn contains(&self, point: &Complex<f64>) -> bool {
        point.re >= self.min_re
            && point.re <= self.max_re
            && point.im >= self.min_im
            && point.im <= self.max_im
    }
}

/// A grid coordinate.  Rows count up the imaginary axis, columns
/// along the real axis; both are zero-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel {
    /// Row index (imaginary axis).
    pub row: usize,
    /// Column index (real axis).
    pub col: usize,
}

/// Relates the pixel grid to the complex viewport.  Built once from a
/// validated configuration and shared read-only by every worker.
#[derive(Debug)]
pub struct PlaneMapper {
    viewport: Viewport,
    re_step: f64,
    im_step: f64,
    width: usize,
    height: usize,
}

impl PlaneMapper {
    /// Derives the grid from the viewport and the per-axis steps.
    /// Rejects inverted or empty viewports and non-positive steps;
    /// the renderer relies on both dimensions being at least 1.
    pub fn new(
        viewport: Viewport,
        re_step: f64,
        im_step: f64,
    ) -> Result<PlaneMapper, RenderError> {
        if !(re_step > 0.0) || !(im_step > 0.0) {
            return Err(RenderError::Config(
                "step sizes must be positive".to_string(),
            ));
        }
        if viewport.max_re <= viewport.min_re || viewport.max_im <= viewport.min_im {
            return Err(RenderError::Config(
                "viewport is empty or inverted".to_string(),
            ));
        }
        let width = ((viewport.max_re - viewport.min_re) / re_step) as usize;
        let height = ((viewport.max_im - viewport.min_im) / im_step) as usize;
        if width == 0 || height == 0 {
            return Err(RenderError::Config(
                "viewport is smaller than one step on some axis".to_string(),
            ));
        }
        Ok(PlaneMapper {
            viewport,
            re_step,
            im_step,
            width,
            height,
        })
    }

    /// Columns in the grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows in the grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count, for sizing the shared buffer.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True only for a degenerate grid; `new` never produces one.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The viewport this mapper was built from.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Maps a grid coordinate to the complex point at its lower-left
    /// corner.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            (pixel.col as f64) * self.re_step + self.viewport.min_re,
            (pixel.row as f64) * self.im_step + self.viewport.min_im,
        )
    }

    /// Maps a complex point back to the grid, or `None` when the
    /// point lies outside the viewport.  The index can only be too
    /// large, never negative, so only the upper bound needs an
    /// explicit check after the division.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        if !self.viewport.contains(point) {
            return None;
        }
        let col = ((point.re - self.viewport.min_re) / self.re_step) as usize;
        let row = ((point.im - self.viewport.min_im) / self.im_step) as usize;
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(Pixel { row, col })
    }

    /// Linear buffer offset for an in-viewport point.
    pub fn point_to_offset(&self, point: &Complex<f64>) -> Option<usize> {
        self.point_to_pixel(point)
            .map(|p| p.row * self.width + p.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> PlaneMapper {
        let viewport = Viewport {
            min_re: -2.0,
            max_re: 2.0,
            min_im: -2.0,
            max_im: 2.0,
        };
        PlaneMapper::new(viewport, 1.0, 1.0).unwrap()
    }

    #[test]
    fn planemapper_fails_on_inverted_viewport() {
        let viewport = Viewport {
            min_re: 1.0,
            max_re: -1.0,
            min_im: -1.0,
            max_im: 1.0,
        };
        assert!(PlaneMapper::new(viewport, 0.1, 0.1).is_err());
    }

    #[test]
    fn planemapper_fails_on_bad_steps() {
        let viewport = Viewport {
            min_re: -1.0,
            max_re: 1.0,
            min_im: -1.0,
            max_im: 1.0,
        };
        assert!(PlaneMapper::new(viewport, 0.0, 0.1).is_err());
        assert!(PlaneMapper::new(viewport, 0.1, -0.1).is_err());
    }

    #[test]
    fn grid_dimensions_follow_the_steps() {
        let pm = unit_square();
        assert_eq!(pm.width(), 4);
        assert_eq!(pm.height(), 4);
        assert_eq!(pm.len(), 16);
        assert!(!pm.is_empty());
    }

    #[test]
    fn pixel_to_point_hits_the_corners() {
        let pm = unit_square();
        assert_eq!(
            pm.pixel_to_point(&Pixel { row: 0, col: 0 }),
            Complex::new(-2.0, -2.0)
        );
        assert_eq!(
            pm.pixel_to_point(&Pixel { row: 2, col: 2 }),
            Complex::new(0.0, 0.0)
        );
    }

    #[test]
    fn point_to_pixel_round_trips_inside() {
        let pm = unit_square();
        assert_eq!(
            pm.point_to_pixel(&Complex::new(0.0, 0.0)),
            Some(Pixel { row: 2, col: 2 })
        );
        assert_eq!(
            pm.point_to_pixel(&Complex::new(-2.0, -2.0)),
            Some(Pixel { row: 0, col: 0 })
        );
        assert_eq!(
            pm.point_to_pixel(&Complex::new(1.5, -0.5)),
            Some(Pixel { row: 1, col: 3 })
        );
    }

    #[test]
    fn point_to_pixel_rejects_outside() {
        let pm = unit_square();
        assert_eq!(pm.point_to_pixel(&Complex::new(2.5, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, -2.01)), None);
    }

    #[test]
    fn point_on_the_top_edge_stays_in_bounds() {
        // max_re/max_im are inside the viewport but would index one
        // past the last cell without the upper-bound check.
        let pm = unit_square();
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 2.0)), None);
    }

    #[test]
    fn point_to_offset_is_row_major() {
        let pm = unit_square();
        assert_eq!(pm.point_to_offset(&Complex::new(-2.0, -2.0)), Some(0));
        assert_eq!(pm.point_to_offset(&Complex::new(-1.0, -2.0)), Some(1));
        assert_eq!(pm.point_to_offset(&Complex::new(-2.0, -1.0)), Some(4));
    }
}
