// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The HSV histogram cell and the conversion to output RGB.
//!
//! Accumulation happens in HSV because the update rule is simple
//! there: the first orbit through a pixel stamps it with a hue from
//! the palette, and every visit after that bleaches saturation and
//! brightens value by a fixed step.  Heavily-trafficked pixels drift
//! towards white, lightly-trafficked ones keep their color.

use num::clamp;

/// How much one orbit visit moves the saturation and value channels.
pub const CHANNEL_STEP: f32 = 0.2;

/// Saturation at or below this gets the compression curve in
/// post-processing; anything above keeps its color.
pub const SATURATION_KNEE: f32 = 0.4;

/// The default hue cycle, in degrees.  Samples are painted with
/// these in round-robin order, so neighboring orbits tend to get
/// distinguishable colors.
pub const DEFAULT_PALETTE: [u16; 5] = [0, 30, 120, 200, 280];

/// One cell of the shared histogram buffer.  The hue is `None` until
/// the first orbit passes through and is never overwritten after
/// that; saturation and value are clamped to [0, 1] on every update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HsvCell {
    /// Hue in degrees, unset until the first visit.
    pub hue: Option<u16>,
    /// Saturation in [0, 1].
    pub sat: f32,
    /// Value in [0, 1].
    pub val: f32,
}

impl HsvCell {
    /// A cell no orbit has touched: fully saturated, fully dark, so
    /// untouched regions render black.
    pub fn unlit() -> HsvCell {
        HsvCell {
            hue: None,
            sat: 1.0,
            val: 0.0,
        }
    }

    /// Records one orbit visit.  The hue is set only if still unset.
    pub fn deposit(&mut self, hue: u16) {
        if self.hue.is_none() {
            self.hue = Some(hue);
        }
        self.sat = clamp(self.sat - CHANNEL_STEP, 0.0, 1.0);
        self.val = clamp(self.val + CHANNEL_STEP, 0.0, 1.0);
    }

    /// The post-processing remap: washed-out cells get their
    /// saturation driven towards zero with `sat^k`, and every cell's
    /// value is lifted with `val^(1/k)`.  Together these push the
    /// high-visit-count regions towards full brightness while keeping
    /// separation among the barely-visited ones.
    pub fn modulate(&mut self, k: f32) {
        if self.sat <= SATURATION_KNEE {
            self.sat = self.sat.powf(k);
        }
        self.val = self.val.powf(1.0 / k);
    }

    /// Converts to an output triple.  An unset hue falls back to 0;
    /// with the initial value of 0.0 such cells are black regardless.
    pub fn to_rgb(&self) -> Rgb {
        hsv_to_rgb(self.hue.unwrap_or(0), self.sat, self.val)
    }
}

/// An 8-bit output triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// The standard hexcone HSV→RGB conversion.  Hue is in degrees (any
/// value; reduced mod 360), saturation and value in [0, 1].  Pure
/// and stateless; the pipeline calls it exactly once per pixel when
/// assembling the output buffer.
pub fn hsv_to_rgb(hue: u16, sat: f32, val: f32) -> Rgb {
    let sat = clamp(sat, 0.0, 1.0);
    let val = clamp(val, 0.0, 1.0);
    let h = f32::from(hue % 360) / 60.0;
    let chroma = val * sat;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = val - chroma;
    let byte = |channel: f32| ((channel + m) * 255.0).round() as u8;
    Rgb {
        r: byte(r),
        g: byte(g),
        b: byte(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors_convert() {
        assert_eq!(hsv_to_rgb(0, 1.0, 1.0), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(hsv_to_rgb(120, 1.0, 1.0), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(hsv_to_rgb(240, 1.0, 1.0), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(
            hsv_to_rgb(0, 0.0, 1.0),
            Rgb {
                r: 255,
                g: 255,
                b: 255
            }
        );
        assert_eq!(hsv_to_rgb(57, 0.3, 0.0), Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn unlit_cell_renders_black() {
        assert_eq!(HsvCell::unlit().to_rgb(), Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn hue_is_set_once_and_kept() {
        let mut cell = HsvCell::unlit();
        cell.deposit(120);
        assert_eq!(cell.hue, Some(120));
        cell.deposit(280);
        assert_eq!(cell.hue, Some(120));
    }

    #[test]
    fn channels_stay_clamped_under_any_update_sequence() {
        let mut cell = HsvCell::unlit();
        for _ in 0..50 {
            cell.deposit(30);
            assert!(cell.sat >= 0.0 && cell.sat <= 1.0);
            assert!(cell.val >= 0.0 && cell.val <= 1.0);
        }
        // Saturated endpoint: many visits drive sat to 0, val to 1.
        assert_eq!(cell.sat, 0.0);
        assert_eq!(cell.val, 1.0);
        // The emitted bytes are in range by construction.
        let rgb = cell.to_rgb();
        assert_eq!(
            rgb,
            Rgb {
                r: 255,
                g: 255,
                b: 255
            }
        );
    }

    #[test]
    fn modulation_compresses_the_channels() {
        let mut washed = HsvCell {
            hue: Some(30),
            sat: 0.2,
            val: 0.8,
        };
        washed.modulate(10.0);
        assert!(washed.sat < 1e-6);
        assert!(washed.val > 0.97);

        let mut colorful = HsvCell {
            hue: Some(30),
            sat: 0.8,
            val: 0.2,
        };
        colorful.modulate(10.0);
        // Above the knee the saturation survives.
        assert_eq!(colorful.sat, 0.8);
        assert!(colorful.val > 0.2 && colorful.val <= 1.0);
    }
}
