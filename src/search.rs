use std::cell::Cell;

/// Interval of `grid` containing `x`, starting the search from `last`.
///
/// Returns `i` with `grid[i] <= x <= grid[i+1]` whenever `x` lies inside the
/// grid; points left of the grid map to `0` and points right of it to
/// `grid.len() - 2`. The interval `last` is tested first, then its right and
/// left neighbours, and only then the grid is bisected. When several abscissae
/// coincide the rightmost one wins, so zero width intervals are never
/// returned for interior points.
///
/// Grids with fewer than 3 points always give interval `0`.
pub fn update_interval(last: usize, x: f64, grid: &[f64]) -> usize {
    let npts = grid.len();
    if npts <= 2 {
        return 0;
    }
    let last = last.min(npts - 2);

    if grid[last + 1] <= x {
        if x >= grid[npts - 2] {
            npts - 2
        } else if x < grid[last + 2] {
            last + 1
        } else {
            log::trace!("interval search moved right of {} for x = {}", last, x);
            let offset = grid[last + 2..npts - 1].partition_point(|v| *v <= x);
            last + 1 + offset
        }
    } else if x < grid[last] {
        if x < grid[1] {
            0
        } else if grid[last - 1] <= x {
            last - 1
        } else {
            log::trace!("interval search moved left of {} for x = {}", last, x);
            grid[..last].partition_point(|v| *v <= x) - 1
        }
    } else {
        last
    }
}

/// Last visited interval of a spline, used to accelerate [update_interval].
///
/// The cursor is a pure cache: it never changes the value returned by a query,
/// only how fast the interval is found. It is interior mutable so that
/// evaluation can take `&self`, which also makes every spline `!Sync`: sharing
/// one spline between threads requires external synchronization, while
/// distinct splines can be used concurrently.
#[derive(Debug, Clone, Default)]
pub struct IntervalCursor {
    last: Cell<usize>,
}

impl IntervalCursor {
    pub fn new() -> Self {
        IntervalCursor { last: Cell::new(0) }
    }

    /// Finds the interval of `x` in `grid` and remembers it.
    pub fn find(&self, x: f64, grid: &[f64]) -> usize {
        let interval = update_interval(self.last.get(), x, grid);
        self.last.set(interval);
        interval
    }

    pub fn last(&self) -> usize {
        self.last.get()
    }

    pub fn reset(&self) {
        self.last.set(0);
    }
}

/// Cursors never take part in the comparison of the objects owning them.
impl PartialEq for IntervalCursor {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn rng_fixed_seed() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn small_grids() {
        assert_eq!(update_interval(0, 5.0, &[0.0, 1.0]), 0);
        assert_eq!(update_interval(3, -5.0, &[0.0]), 0);
    }

    #[test]
    fn sequential_scan() {
        let grid = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let cursor = IntervalCursor::new();

        assert_eq!(cursor.find(0.0, &grid), 0);
        assert_eq!(cursor.find(0.5, &grid), 0);
        assert_eq!(cursor.find(1.0, &grid), 1);
        assert_eq!(cursor.find(1.5, &grid), 1);
        assert_eq!(cursor.find(3.7, &grid), 3);
        assert_eq!(cursor.find(4.0, &grid), 3);
        assert_eq!(cursor.find(2.5, &grid), 2);
        assert_eq!(cursor.find(0.2, &grid), 0);
        assert_eq!(cursor.last(), 0);
    }

    #[test]
    fn out_of_range_is_clamped() {
        let grid = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(update_interval(2, -1.0, &grid), 0);
        assert_eq!(update_interval(0, 10.0, &grid), 3);
        assert_eq!(update_interval(3, -10.0, &grid), 0);
    }

    #[test]
    fn repeated_abscissae_prefer_following_interval() {
        let grid = vec![0.0, 1.0, 2.0, 2.0, 3.0, 4.0];

        for last in 0..grid.len() - 1 {
            assert_eq!(update_interval(last, 2.0, &grid), 3);
            assert_eq!(update_interval(last, 1.5, &grid), 1);
            assert_eq!(update_interval(last, 2.5, &grid), 3);
        }
    }

    #[test]
    fn stale_cursor_is_clamped() {
        let grid = vec![0.0, 1.0, 2.0];
        assert_eq!(update_interval(10, 0.5, &grid), 0);
        assert_eq!(update_interval(10, 1.5, &grid), 1);
    }

    #[test]
    fn random_queries() {
        let mut rng = rng_fixed_seed();

        for _ in 0..50 {
            let npts = rng.gen_range(3..60);
            let mut grid: Vec<f64> = (0..npts).map(|_| rng.gen_range(-10.0..10.0)).collect();
            grid.sort_by(|a, b| a.total_cmp(b));
            let cursor = IntervalCursor::new();

            for _ in 0..200 {
                let x = match rng.gen_range(0..3) {
                    0 => grid[rng.gen_range(0..npts)],
                    1 => rng.gen_range(-12.0..12.0),
                    _ => rng.gen_range(grid[0]..=grid[npts - 1]),
                };
                let i = cursor.find(x, &grid);
                assert!(i < npts - 1);
                if grid[0] <= x && x <= grid[npts - 1] {
                    assert!(grid[i] <= x && x <= grid[i + 1], "x = {} i = {} grid = {:?}", x, i, grid);
                } else if x < grid[0] {
                    assert_eq!(i, 0);
                } else {
                    assert_eq!(i, npts - 2);
                }
            }
        }
    }

    #[test]
    fn cursor_does_not_affect_equality() {
        let a = IntervalCursor::new();
        let b = IntervalCursor::new();
        b.find(2.5, &[0.0, 1.0, 2.0, 3.0]);
        assert_ne!(a.last(), b.last());
        assert_eq!(a, b);
    }
}
