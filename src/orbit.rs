// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The numeric kernel: the quadratic recurrence shared by the
//! sampling and accumulation phases, plus the closed-form test for
//! the two big interior regions.

use num::Complex;

/// Iterates z = z² + c starting from z₀ = c and reports the number
/// of completed iterations before the orbit escaped (squared
/// magnitude at least 4), or `None` when it stayed bounded through
/// `limit` iterations.  The count is zero-based: a point already
/// outside the radius after one application escapes "at 0".
pub fn escape_time(c: Complex<f64>, limit: usize) -> Option<usize> {
    let mut z = c;
    for i in 0..limit {
        z = z * z + c;
        if z.norm_sqr() >= 4.0 {
            return Some(i);
        }
    }
    None
}

/// Replays the orbit of `c`, calling `visit` with every iterate that
/// has not yet escaped, and stopping at escape or at `limit`.  The
/// escaping iterate itself is not visited; whether an iterate lands
/// inside the viewport is the caller's concern, so the orbit keeps
/// running even when it wanders out of frame.
pub fn trace_orbit<F>(c: Complex<f64>, limit: usize, mut visit: F)
where
    F: FnMut(&Complex<f64>),
{
    let mut z = c;
    for _ in 0..limit {
        z = z * z + c;
        if z.norm_sqr() >= 4.0 {
            break;
        }
        visit(&z);
    }
}

/// True when `c` lies in the main cardioid or the period-2 bulb, the
/// two interior regions with closed-form boundaries.  Points inside
/// them never escape, so the sampler can skip the full iteration.
/// The converse does not hold: a `false` here proves nothing, and
/// this must never be used to claim escape.
///
/// Cardioid test: q = (a − 1/4)² + b², interior iff
/// q·(q + a − 1/4) ≤ b²/4.  Bulb test: (a + 1)² + b² ≤ 1/16.
pub fn in_main_bulbs(c: Complex<f64>) -> bool {
    let (a, b) = (c.re, c.im);
    if (a + 1.0) * (a + 1.0) + b * b <= 1.0 / 16.0 {
        return true;
    }
    let q = (a - 0.25) * (a - 0.25) + b * b;
    q * (q + a - 0.25) <= 0.25 * b * b
}
