use std::fmt;

use crate::{
    error::{check_nan, SplineResult},
    hermite::{bilinear3, hermite3, hermite3_d, hermite3_dd},
};

use super::Grid;

fn basis(order: usize, t: f64, h: f64) -> [f64; 4] {
    match order {
        0 => hermite3(t, h),
        1 => hermite3_d(t, h),
        _ => hermite3_dd(t, h),
    }
}

/// Bicubic Hermite patches from the nodal values of `z`, `Dx`, `Dy` and
/// `Dxy`. The surfaces only differ by how the derivatives are estimated.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BiCubicBase {
    pub(crate) grid: Grid,
    pub(crate) dx: Vec<f64>,
    pub(crate) dy: Vec<f64>,
    pub(crate) dxy: Vec<f64>,
}

impl BiCubicBase {
    pub(crate) fn check_nan(&self) -> SplineResult<()> {
        check_nan(&self.dx, &self.grid.name, "DX")?;
        check_nan(&self.dy, &self.grid.name, "DY")?;
        check_nan(&self.dxy, &self.grid.name, "DXY")
    }

    fn patch(&self, i: usize, j: usize) -> [[f64; 4]; 4] {
        let g = &self.grid;
        let row = |i: usize, value: &[f64], cross: &[f64]| {
            [value[g.at(i, j)], value[g.at(i, j + 1)], cross[g.at(i, j)], cross[g.at(i, j + 1)]]
        };
        [
            row(i, &g.z, &self.dy),
            row(i + 1, &g.z, &self.dy),
            row(i, &self.dx, &self.dxy),
            row(i + 1, &self.dx, &self.dxy),
        ]
    }

    pub(crate) fn blend(&self, x: f64, y: f64, ox: usize, oy: usize) -> SplineResult<f64> {
        let (i, j) = self.grid.search(x, y)?;
        let g = &self.grid;
        let u = basis(ox, x - g.x[i], g.x[i + 1] - g.x[i]);
        let v = basis(oy, y - g.y[j], g.y[j + 1] - g.y[j]);
        Ok(bilinear3(&u, &self.patch(i, j), &v))
    }
}

impl fmt::Display for BiCubicBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.grid.write_patches(f, |f, [c00, c01, c10, c11]| {
            writeln!(
                f,
                " Dx00 = {:<10} Dx01 = {:<10} Dx10 = {:<10} Dx11 = {:<10}",
                self.dx[c00], self.dx[c01], self.dx[c10], self.dx[c11]
            )?;
            writeln!(
                f,
                " Dy00 = {:<10} Dy01 = {:<10} Dy10 = {:<10} Dy11 = {:<10}",
                self.dy[c00], self.dy[c01], self.dy[c10], self.dy[c11]
            )
        })
    }
}
