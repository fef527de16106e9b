use std::fmt;

use crate::{error::SplineResult, spline::pchip_slopes};

use super::{bicubic_base::BiCubicBase, surface_interpolant, Axis, Grid, SurfaceKind};

/// Bicubic Hermite surface with PCHIP slopes along each grid line and zero
/// twist.
///
/// Planes are reproduced exactly, bilinear terms are not.
#[derive(Debug, Clone, PartialEq)]
pub struct BiCubicSpline {
    pub(crate) base: BiCubicBase,
}

fn pchip_line(x: &[f64], z: &[f64]) -> [Vec<f64>; 1] {
    let mut zp = vec![0.0; x.len()];
    pchip_slopes(x, z, &mut zp);
    [zp]
}

impl BiCubicSpline {
    pub(crate) fn from_grid(grid: Grid) -> Self {
        let [dx] = grid.along_lines(&grid.z, Axis::X, pchip_line);
        let [dy] = grid.along_lines(&grid.z, Axis::Y, pchip_line);
        let dxy = vec![0.0; grid.z.len()];
        BiCubicSpline {
            base: BiCubicBase { grid, dx, dy, dxy },
        }
    }

    fn blend(&self, x: f64, y: f64, ox: usize, oy: usize) -> SplineResult<f64> {
        self.base.blend(x, y, ox, oy)
    }
}

surface_interpolant!(BiCubicSpline, SurfaceKind::BiCubic, base.grid);

impl fmt::Display for BiCubicSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.base.fmt(f)
    }
}
