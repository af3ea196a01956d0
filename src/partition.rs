//! Splits the grid's rows across the worker pool.
//!
//! The rows are striped rather than chunked: worker k takes rows k,
//! k+N, k+2N and so on.  Rows near the set boundary cost orders of
//! magnitude more iterations than rows deep inside or outside it, and
//! interleaving spreads the expensive band across every worker
//! instead of handing it whole to whichever worker drew the middle
//! chunk.

/// Assigns rows `[0, rows)` to `workers` stripes.  Worker k owns
/// every row congruent to k modulo the worker count, so the stripes
/// partition the range exactly: no row is shared, no row is dropped.
/// Callers validate that `workers` is nonzero before partitioning.
pub fn striped_rows(rows: usize, workers: usize) -> Vec<Vec<usize>> {
    assert!(workers > 0, "cannot partition rows across zero workers");
    (0..workers)
        .map(|k| (k..rows).step_by(workers).collect())
        .collect()
}
