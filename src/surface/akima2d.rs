use std::fmt;

use crate::error::SplineResult;

use super::{bicubic_base::BiCubicBase, surface_interpolant, Grid, SurfaceKind};

/// Akima's revised bivariate interpolation (ACM 760).
///
/// Node derivatives are weighted averages of the estimates given by every
/// 4 point stencil around the node along x, along y and across both. The
/// weights are the inverse residuals of a least squares plane through the
/// stencil, so smooth stencils dominate near a jump.
#[derive(Debug, Clone, PartialEq)]
pub struct Akima2DSpline {
    pub(crate) base: BiCubicBase,
}

/// Stencils of the local window, as offsets from its center.
const STENCILS: [[isize; 3]; 4] = [[-3, -2, -1], [-2, -1, 1], [-1, 1, 2], [1, 2, 3]];
const CENTER: usize = 4;

/// Value of the Lagrange polynomial through `(xs, zs)` at `at`.
fn lagrange(xs: &[f64], zs: &[f64], at: f64) -> f64 {
    let mut value = 0.0;
    for (k, (xk, zk)) in xs.iter().zip(zs).enumerate() {
        let mut weight = 1.0;
        for (m, xm) in xs.iter().enumerate() {
            if m != k {
                weight *= (at - xm) / (xk - xm);
            }
        }
        value += weight * zk;
    }
    value
}

/// Window of 9 x 9 nodes centered on one grid node, in local coordinates.
struct Window {
    x: [f64; 9],
    y: [f64; 9],
    z: [[f64; 9]; 9],
    ix: (usize, usize),
    iy: (usize, usize),
}

impl Window {
    fn new(grid: &Grid, i0: usize, j0: usize) -> Self {
        let bounds = |k0: usize, n: usize| {
            let lo = CENTER.saturating_sub(k0);
            let hi = (CENTER - 1 + n - k0).min(8);
            (lo, hi)
        };
        let ix = bounds(i0, grid.nx());
        let iy = bounds(j0, grid.ny());
        let mut window = Window {
            x: [0.0; 9],
            y: [0.0; 9],
            z: [[0.0; 9]; 9],
            ix,
            iy,
        };
        let node = |k: usize, k0: usize| k + k0 - CENTER;
        for i in ix.0..=ix.1 {
            window.x[i] = grid.x[node(i, i0)] - grid.x[i0];
        }
        for j in iy.0..=iy.1 {
            window.y[j] = grid.y[node(j, j0)] - grid.y[j0];
        }
        for i in ix.0..=ix.1 {
            for j in iy.0..=iy.1 {
                window.z[i][j] = grid.z[grid.at(node(i, i0), node(j, j0))];
            }
        }
        window.widen_x();
        window.widen_y();
        window
    }

    /// Short axes get one extrapolated node on each side so that at least
    /// one stencil fits.
    fn widen_x(&mut self) {
        let (lo, hi) = self.ix;
        if hi >= lo + 3 {
            return;
        }
        let xs: Vec<f64> = self.x[lo..=hi].to_vec();
        let left = 2.0 * self.x[lo] - self.x[hi];
        let right = 2.0 * self.x[hi] - self.x[lo];
        for j in self.iy.0..=self.iy.1 {
            let zs: Vec<f64> = (lo..=hi).map(|i| self.z[i][j]).collect();
            self.z[lo - 1][j] = lagrange(&xs, &zs, left);
            self.z[hi + 1][j] = lagrange(&xs, &zs, right);
        }
        self.x[lo - 1] = left;
        self.x[hi + 1] = right;
        self.ix = (lo - 1, hi + 1);
    }

    fn widen_y(&mut self) {
        let (lo, hi) = self.iy;
        if hi >= lo + 3 {
            return;
        }
        let ys: Vec<f64> = self.y[lo..=hi].to_vec();
        let bottom = 2.0 * self.y[lo] - self.y[hi];
        let top = 2.0 * self.y[hi] - self.y[lo];
        for i in self.ix.0..=self.ix.1 {
            let zs: Vec<f64> = self.z[i][lo..=hi].to_vec();
            self.z[i][lo - 1] = lagrange(&ys, &zs, bottom);
            self.z[i][hi + 1] = lagrange(&ys, &zs, top);
        }
        self.y[lo - 1] = bottom;
        self.y[hi + 1] = top;
        self.iy = (lo - 1, hi + 1);
    }

    /// Indices of stencil `k` when it lies inside `range`.
    fn stencil(k: usize, range: (usize, usize)) -> Option<[usize; 3]> {
        let at = |offset: isize| CENTER as isize + offset;
        let [a, b, c] = STENCILS[k];
        if at(a) < range.0 as isize || at(c) > range.1 as isize {
            return None;
        }
        Some([at(a) as usize, at(b) as usize, at(c) as usize])
    }
}

/// One directional estimate and its least squares line.
struct Estimate {
    /// Weights of the divided differences in the derivative.
    c: [f64; 3],
    h: [f64; 3],
    derivative: f64,
    sum: f64,
    sum_sq: f64,
    b0: f64,
    b1: f64,
    volatility: f64,
    epsi: f64,
}

impl Estimate {
    fn new(h: [f64; 3], z0: f64, z: [f64; 3]) -> Self {
        let [h1, h2, h3] = h;
        let c = [
            h2 * h3 / ((h1 - h2) * (h1 - h3)),
            h3 * h1 / ((h2 - h3) * (h2 - h1)),
            h1 * h2 / ((h3 - h1) * (h3 - h2)),
        ];
        let derivative = (0..3).map(|k| c[k] * (z[k] - z0) / h[k]).sum::<f64>();
        let sum = h1 + h2 + h3;
        let sum_z = z0 + z[0] + z[1] + z[2];
        let sum_sq = h1 * h1 + h2 * h2 + h3 * h3;
        let sum_hz = h1 * z[0] + h2 * z[1] + h3 * z[2];
        let denominator = 4.0 * sum_sq - sum * sum;
        let b0 = (sum_sq * sum_z - sum * sum_hz) / denominator;
        let b1 = (4.0 * sum_hz - sum * sum_z) / denominator;
        let volatility = (z0 - b0).powi(2) + (0..3).map(|k| (z[k] - (b0 + b1 * h[k])).powi(2)).sum::<f64>();
        let epsi = (z0 * z0 + z.iter().map(|v| v * v).sum::<f64>()) * 1e-12;
        Estimate {
            c,
            h,
            derivative,
            sum,
            sum_sq,
            b0,
            b1,
            volatility,
            epsi,
        }
    }
}

/// Weighted mean of estimates. Stencils fitting their plane exactly take
/// precedence over the weighted ones.
#[derive(Default)]
struct Average {
    weighted: f64,
    weights: f64,
    exact: f64,
    exact_count: f64,
}

impl Average {
    fn add(&mut self, value: f64, volatility: f64, epsi: f64, scale: f64) {
        if volatility > epsi {
            let weight = 1.0 / (volatility * scale);
            self.weighted += weight * value;
            self.weights += weight;
        } else {
            self.exact += value;
            self.exact_count += 1.0;
        }
    }

    fn value(&self) -> f64 {
        if self.exact_count >= 0.5 {
            self.exact / self.exact_count
        } else {
            self.weighted / self.weights
        }
    }
}

/// `[Dx, Dy, Dxy]` at node `(i0, j0)`.
fn node_derivatives(grid: &Grid, i0: usize, j0: usize) -> [f64; 3] {
    let w = Window::new(grid, i0, j0);
    let z00 = w.z[CENTER][CENTER];

    let along_y: Vec<Option<([usize; 3], Estimate)>> = (0..4)
        .map(|k| {
            Window::stencil(k, w.iy).map(|jb| {
                let h = jb.map(|j| w.y[j]);
                let z = jb.map(|j| w.z[CENTER][j]);
                (jb, Estimate::new(h, z00, z))
            })
        })
        .collect();

    let mut dy = Average::default();
    for (_, ey) in along_y.iter().flatten() {
        dy.add(ey.derivative, ey.volatility, ey.epsi, ey.sum_sq);
    }

    let mut dx = Average::default();
    let mut dxy = Average::default();
    for k in 0..4 {
        let Some(ia) = Window::stencil(k, w.ix) else {
            continue;
        };
        let ex = Estimate::new(ia.map(|i| w.x[i]), z00, ia.map(|i| w.z[i][CENTER]));
        dx.add(ex.derivative, ex.volatility, ex.epsi, ex.sum_sq);

        for (jb, ey) in along_y.iter().flatten() {
            let mut cross = 0.0;
            let mut sum_hkz = 0.0;
            for (a, &i) in ia.iter().enumerate() {
                for (b, &j) in jb.iter().enumerate() {
                    let zab = w.z[i][j];
                    let twist = (zab - w.z[i][CENTER] - w.z[CENTER][j] + z00) / (ex.h[a] * ey.h[b]);
                    cross += ex.c[a] * ey.c[b] * twist;
                    sum_hkz += ex.h[a] * ey.h[b] * zab;
                }
            }

            let b00 = (ex.b0 + ey.b0) / 2.0;
            let (b10, b01) = (ex.b1, ey.b1);
            let b11 = (sum_hkz - b00 * ex.sum * ey.sum - b10 * ex.sum_sq * ey.sum - b01 * ex.sum * ey.sum_sq)
                / (ex.sum_sq * ey.sum_sq);

            let mut volatility = (z00 - b00).powi(2);
            let mut epsi = z00 * z00;
            for (b, &j) in jb.iter().enumerate() {
                let z0b = w.z[CENTER][j];
                volatility += (z0b - (b00 + b01 * ey.h[b])).powi(2);
                epsi += z0b * z0b;
            }
            for (a, &i) in ia.iter().enumerate() {
                let za0 = w.z[i][CENTER];
                volatility += (za0 - (b00 + b10 * ex.h[a])).powi(2);
                epsi += za0 * za0;
                for (b, &j) in jb.iter().enumerate() {
                    let zab = w.z[i][j];
                    let fit = b00 + b01 * ey.h[b] + ex.h[a] * (b10 + b11 * ey.h[b]);
                    volatility += (zab - fit).powi(2);
                    epsi += zab * zab;
                }
            }
            dxy.add(cross, volatility, epsi * 1e-12, ex.sum_sq * ey.sum_sq);
        }
    }
    [dx.value(), dy.value(), dxy.value()]
}

impl Akima2DSpline {
    pub(crate) fn from_grid(grid: Grid) -> Self {
        let size = grid.z.len();
        let (mut dx, mut dy, mut dxy) = (vec![0.0; size], vec![0.0; size], vec![0.0; size]);
        for i in 0..grid.nx() {
            for j in 0..grid.ny() {
                let k = grid.at(i, j);
                [dx[k], dy[k], dxy[k]] = node_derivatives(&grid, i, j);
            }
        }
        Akima2DSpline {
            base: BiCubicBase { grid, dx, dy, dxy },
        }
    }

    fn blend(&self, x: f64, y: f64, ox: usize, oy: usize) -> SplineResult<f64> {
        self.base.blend(x, y, ox, oy)
    }
}

surface_interpolant!(Akima2DSpline, SurfaceKind::Akima2D, base.grid);

impl fmt::Display for Akima2DSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.base.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::*;
    use crate::surface::{Surface, SurfaceBuilder, SurfaceSpline};

    #[test]
    fn lagrange_extrapolates_lines_and_parabolas() {
        let eps = 1e-12;
        assert_approx_eq!(lagrange(&[0.0, 1.0], &[1.0, 3.0], -1.0), -1.0, eps);
        assert_approx_eq!(lagrange(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], 4.0), 16.0, eps);
    }

    #[rstest]
    #[case(2, 2)]
    #[case(3, 2)]
    #[case(3, 5)]
    #[case(6, 7)]
    fn bilinear_data_give_exact_derivatives(#[case] nx: usize, #[case] ny: usize) {
        let eps = 1e-9;
        let f = |x: f64, y: f64| 1.0 - 2.0 * x + 0.5 * y + 3.0 * x * y;
        let x: Vec<f64> = (0..nx).map(|i| i as f64 * 0.7 + (i * i) as f64 * 0.1).collect();
        let y: Vec<f64> = (0..ny).map(|j| j as f64 * 1.3 - 2.0).collect();
        let z: Vec<f64> = x.iter().flat_map(|x| y.iter().map(move |y| f(*x, *y))).collect();
        let surface = SurfaceBuilder::new(SurfaceKind::Akima2D).build(&x, &y, &z).unwrap();
        let SurfaceSpline::Akima2D(akima) = &surface else {
            panic!("wrong variant");
        };
        for (i, xi) in x.iter().enumerate() {
            for (j, yj) in y.iter().enumerate() {
                let k = i * ny + j;
                assert_approx_eq!(akima.base.dx[k], -2.0 + 3.0 * yj, eps);
                assert_approx_eq!(akima.base.dy[k], 0.5 + 3.0 * xi, eps);
                assert_approx_eq!(akima.base.dxy[k], 3.0, eps);
            }
        }
        let (px, py) = (x[nx - 1] * 0.4, y[0] + 0.3);
        assert_approx_eq!(surface.eval(px, py).unwrap(), f(px, py), eps);
    }

    #[test]
    fn step_stays_flat_away_from_the_jump() {
        let eps = 1e-12;
        let x: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let y = [0.0, 1.0, 2.0];
        let z: Vec<f64> = x
            .iter()
            .flat_map(|x| y.iter().map(move |_| if *x < 4.0 { 0.0 } else { 1.0 }))
            .collect();
        let surface = SurfaceBuilder::new(SurfaceKind::Akima2D).build(&x, &y, &z).unwrap();
        assert_approx_eq!(surface.eval(1.5, 1.0).unwrap(), 0.0, eps);
        assert_approx_eq!(surface.eval(5.5, 0.5).unwrap(), 1.0, eps);
        assert_approx_eq!(surface.dx(1.0, 1.0).unwrap(), 0.0, eps);
    }
}
