use std::fmt;

use crate::error::SplineResult;

use super::{surface_interpolant, Grid, SurfaceKind};

/// Bilinear interpolation on each grid cell.
///
/// Second derivatives are reported as zero, the mixed one included.
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearSpline {
    grid: Grid,
}

impl BilinearSpline {
    pub(crate) fn from_grid(grid: Grid) -> Self {
        BilinearSpline { grid }
    }

    fn blend(&self, x: f64, y: f64, ox: usize, oy: usize) -> SplineResult<f64> {
        let (i, j) = self.grid.search(x, y)?;
        if ox + oy > 1 {
            return Ok(0.0);
        }
        let g = &self.grid;
        let hx = g.x[i + 1] - g.x[i];
        let hy = g.y[j + 1] - g.y[j];
        let u = (x - g.x[i]) / hx;
        let v = (y - g.y[j]) / hy;
        let z00 = g.z[g.at(i, j)];
        let z01 = g.z[g.at(i, j + 1)];
        let z10 = g.z[g.at(i + 1, j)];
        let z11 = g.z[g.at(i + 1, j + 1)];
        Ok(match (ox, oy) {
            (1, 0) => ((z10 - z00) * (1.0 - v) + (z11 - z01) * v) / hx,
            (0, 1) => ((z01 - z00) * (1.0 - u) + (z11 - z10) * u) / hy,
            _ => (1.0 - u) * (z00 * (1.0 - v) + z01 * v) + u * (z10 * (1.0 - v) + z11 * v),
        })
    }
}

surface_interpolant!(BilinearSpline, SurfaceKind::Bilinear, grid);

impl fmt::Display for BilinearSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.grid.write_patches(f, |_, _| Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use crate::surface::{Surface, SurfaceBuilder, SurfaceKind};

    #[test]
    fn cell_values_and_slopes() {
        let eps = 1e-12;
        // z = 1 + x + 2 y + 3 x y on the unit square
        let surface = SurfaceBuilder::new(SurfaceKind::Bilinear)
            .build(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 3.0, 2.0, 7.0])
            .unwrap();
        let [z, dx, dy] = surface.d(0.25, 0.5).unwrap();
        assert_approx_eq!(z, 1.0 + 0.25 + 1.0 + 0.375, eps);
        assert_approx_eq!(dx, 1.0 + 1.5, eps);
        assert_approx_eq!(dy, 2.0 + 0.75, eps);
        assert_eq!(surface.dxy(0.25, 0.5).unwrap(), 0.0);
        assert_eq!(surface.dxx(0.25, 0.5).unwrap(), 0.0);
        // the boundary cell continues outside the grid
        assert_approx_eq!(surface.eval(2.0, 0.0).unwrap(), 3.0, eps);
    }

    #[test]
    fn display_lists_patches() {
        let surface = SurfaceBuilder::new(SurfaceKind::Bilinear)
            .build(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        let text = surface.to_string();
        assert!(text.starts_with("Nx = 3 Ny = 2\n"));
        assert!(text.contains("patch (1,1)"));
        assert!(text.contains("patch (2,1)"));
        assert!(!text.contains("patch (1,2)"));
    }
}
