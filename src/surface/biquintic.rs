use std::fmt;

use crate::{
    error::{check_nan, SplineResult},
    hermite::{bilinear5, hermite5, hermite5_d, hermite5_dd},
    spline::quintic_slopes,
};

use super::{surface_interpolant, Axis, Grid, SurfaceKind};

fn basis(order: usize, t: f64, h: f64) -> [f64; 6] {
    match order {
        0 => hermite5(t, h),
        1 => hermite5_d(t, h),
        _ => hermite5_dd(t, h),
    }
}

fn quintic_line(x: &[f64], z: &[f64]) -> [Vec<f64>; 2] {
    let mut zp = vec![0.0; x.len()];
    let mut zpp = vec![0.0; x.len()];
    quintic_slopes(x, z, &mut zp, &mut zpp);
    [zp, zpp]
}

/// Biquintic Hermite surface.
///
/// Slopes and curvatures along x and y come from the quintic rule on each
/// grid line. Mixed terms repeat the rule along y on the x derivatives, so
/// bilinear data are reproduced exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct BiQuinticSpline {
    grid: Grid,
    dx: Vec<f64>,
    dy: Vec<f64>,
    dxx: Vec<f64>,
    dyy: Vec<f64>,
    dxy: Vec<f64>,
    dxxy: Vec<f64>,
    dxyy: Vec<f64>,
    dxxyy: Vec<f64>,
}

impl BiQuinticSpline {
    pub(crate) fn from_grid(grid: Grid) -> Self {
        let [dx, dxx] = grid.along_lines(&grid.z, Axis::X, quintic_line);
        let [dy, dyy] = grid.along_lines(&grid.z, Axis::Y, quintic_line);
        let [dxy, dxyy] = grid.along_lines(&dx, Axis::Y, quintic_line);
        let [dxxy, dxxyy] = grid.along_lines(&dxx, Axis::Y, quintic_line);
        BiQuinticSpline {
            grid,
            dx,
            dy,
            dxx,
            dyy,
            dxy,
            dxxy,
            dxyy,
            dxxyy,
        }
    }

    pub(crate) fn check_nan(&self) -> SplineResult<()> {
        let name = &self.grid.name;
        for (values, array) in [
            (&self.dx, "DX"),
            (&self.dy, "DY"),
            (&self.dxx, "DXX"),
            (&self.dyy, "DYY"),
            (&self.dxy, "DXY"),
            (&self.dxxy, "DXXY"),
            (&self.dxyy, "DXYY"),
            (&self.dxxyy, "DXXYY"),
        ] {
            check_nan(values, name, array)?;
        }
        Ok(())
    }

    /// Rows follow the x bases `[H0, H1, dH0, dH1, ddH0, ddH1]`, columns the
    /// y bases in the same order.
    fn patch(&self, i: usize, j: usize) -> [[f64; 6]; 6] {
        let g = &self.grid;
        let blocks: [[&[f64]; 3]; 3] = [
            [&g.z, &self.dy, &self.dyy],
            [&self.dx, &self.dxy, &self.dxyy],
            [&self.dxx, &self.dxxy, &self.dxxyy],
        ];
        let mut m = [[0.0; 6]; 6];
        for (bx, row) in blocks.iter().enumerate() {
            for (by, values) in row.iter().enumerate() {
                for (di, dj) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                    m[2 * bx + di][2 * by + dj] = values[g.at(i + di, j + dj)];
                }
            }
        }
        m
    }

    fn blend(&self, x: f64, y: f64, ox: usize, oy: usize) -> SplineResult<f64> {
        let (i, j) = self.grid.search(x, y)?;
        let g = &self.grid;
        let u = basis(ox, x - g.x[i], g.x[i + 1] - g.x[i]);
        let v = basis(oy, y - g.y[j], g.y[j + 1] - g.y[j]);
        Ok(bilinear5(&u, &self.patch(i, j), &v))
    }
}

surface_interpolant!(BiQuinticSpline, SurfaceKind::BiQuintic, grid);

impl fmt::Display for BiQuinticSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.grid.write_patches(f, |f, [c00, c01, c10, c11]| {
            writeln!(
                f,
                " Dxx00 = {:<10} Dxx01 = {:<10} Dxx10 = {:<10} Dxx11 = {:<10}",
                self.dxx[c00], self.dxx[c01], self.dxx[c10], self.dxx[c11]
            )?;
            writeln!(
                f,
                " Dyy00 = {:<10} Dyy01 = {:<10} Dyy10 = {:<10} Dyy11 = {:<10}",
                self.dyy[c00], self.dyy[c01], self.dyy[c10], self.dyy[c11]
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use crate::surface::{Surface, SurfaceBuilder, SurfaceKind};

    #[test]
    fn linear_columns_are_exact() {
        let eps = 1e-10;
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0];
        // z = x^2 + y
        let z: Vec<f64> = x.iter().flat_map(|x| y.iter().map(move |y| x * x + y)).collect();
        let surface = SurfaceBuilder::new(SurfaceKind::BiQuintic).build(&x, &y, &z).unwrap();
        for (i, xi) in x.iter().enumerate() {
            assert_approx_eq!(surface.eval(*xi, 0.5).unwrap(), xi * xi + 0.5, eps);
            assert_eq!(surface.z_node(i, 1), Some(xi * xi + 1.0));
        }
        assert_approx_eq!(surface.dy(1.5, 0.3).unwrap(), 1.0, eps);
        assert_approx_eq!(surface.dyy(1.5, 0.3).unwrap(), 0.0, eps);
        assert!(surface.to_string().contains("Dxx00"));
    }
}
