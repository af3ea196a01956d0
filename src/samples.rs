// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The sample index.
//!
//! During the sampling phase the sample list is append-only behind a
//! lock.  Between phases it is sorted by row, once, and from then on
//! the accumulation workers treat it as immutable: each worker binary
//! searches for the first sample on one of its rows, then walks
//! forward while the row matches.  Column order within a row carries
//! no meaning, so the sort does not bother breaking ties.

use planes::Pixel;

/// Sorts the sample list by row ascending.  After this, samples with
/// equal rows are contiguous, which is all the lookup needs.
pub fn sort_by_row(samples: &mut Vec<Pixel>) {
    samples.sort_by_key(|s| s.row);
}

/// Returns the index of the first sample whose row equals `row`, or
/// `None` when no sample has that row.  Classic lower-bound binary
/// search over the row-sorted invariant, O(log n); the caller scans
/// forward linearly from the returned index.
pub fn first_with_row(samples: &[Pixel], row: usize) -> Option<usize> {
    let mut lo = 0;
    let mut hi = samples.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if samples[mid].row < row {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    if lo < samples.len() && samples[lo].row == row {
        Some(lo)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<Pixel> {
        [2, 2, 5, 7, 7, 7]
            .iter()
            .enumerate()
            .map(|(col, &row)| Pixel { row, col })
            .collect()
    }

    #[test]
    fn sort_produces_nondecreasing_rows() {
        let mut samples: Vec<Pixel> = [7, 2, 5, 2, 7, 7]
            .iter()
            .map(|&row| Pixel { row, col: 0 })
            .collect();
        sort_by_row(&mut samples);
        for pair in samples.windows(2) {
            assert!(pair[0].row <= pair[1].row);
        }
    }

    #[test]
    fn lookup_finds_first_of_a_run() {
        let samples = fixture();
        assert_eq!(first_with_row(&samples, 2), Some(0));
        assert_eq!(first_with_row(&samples, 7), Some(3));
        assert_eq!(first_with_row(&samples, 5), Some(2));
    }

    #[test]
    fn lookup_misses_return_none() {
        let samples = fixture();
        assert_eq!(first_with_row(&samples, 4), None);
        assert_eq!(first_with_row(&samples, 0), None);
        assert_eq!(first_with_row(&samples, 9), None);
    }

    #[test]
    fn lookup_on_empty_list() {
        assert_eq!(first_with_row(&[], 3), None);
    }
}
