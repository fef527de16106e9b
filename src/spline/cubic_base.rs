use std::fmt;

use crate::{
    error::{SplineError, SplineResult},
    hermite::{hermite3, hermite3_d, hermite3_dd, hermite3_ddd},
    polynomial::{PiecewisePolynomial, Polynomial},
};

use super::{extrapolate_quadratic, write_segments, Samples};

fn basis(t: f64, h: f64, order: usize) -> [f64; 4] {
    match order {
        0 => hermite3(t, h),
        1 => hermite3_d(t, h),
        2 => hermite3_dd(t, h),
        3 => hermite3_ddd(t, h),
        _ => [0.0; 4],
    }
}

fn blend(t: f64, h: f64, order: usize, data: &[f64; 4]) -> f64 {
    basis(t, h, order).iter().zip(data.iter()).map(|(b, d)| b * d).sum()
}

fn segment(y: &[f64], yp: &[f64], i: usize) -> [f64; 4] {
    [y[i], y[i + 1], yp[i], yp[i + 1]]
}

/// Value, slope and curvature of segment `i` at local coordinate `t`.
fn jet(x: &[f64], y: &[f64], yp: &[f64], i: usize, t: f64) -> [f64; 3] {
    let h = x[i + 1] - x[i];
    if h <= 0.0 {
        return [y[i + 1], yp[i + 1], 0.0];
    }
    let data = segment(y, yp, i);
    [0, 1, 2].map(|order| blend(t, h, order, &data))
}

/// Derivative of order `order` of the cubic Hermite interpolant of
/// `(x, y, yp)` at `at`, using `interval` as the containing segment.
///
/// Outside the grid the boundary segment is continued by its second order
/// Taylor polynomial.
pub(crate) fn eval_cubic(
    x: &[f64],
    y: &[f64],
    yp: &[f64],
    interval: usize,
    at: f64,
    order: usize,
) -> f64 {
    let n = x.len();
    if at < x[0] {
        return extrapolate_quadratic(at - x[0], jet(x, y, yp, 0, 0.0), order);
    }
    if at > x[n - 1] {
        let i = n - 2;
        let boundary = jet(x, y, yp, i, x[n - 1] - x[i]);
        return extrapolate_quadratic(at - x[n - 1], boundary, order);
    }
    let i = interval;
    let h = x[i + 1] - x[i];
    if h <= 0.0 {
        return extrapolate_quadratic(0.0, jet(x, y, yp, i, 0.0), order);
    }
    blend(at - x[i], h, order, &segment(y, yp, i))
}

/// Cubic pieces `a + b t + c t^2 + d t^3` of each segment.
pub(crate) fn cubic_coeffs(x: &[f64], y: &[f64], yp: &[f64]) -> SplineResult<PiecewisePolynomial> {
    let pieces = (0..x.len() - 1)
        .map(|i| {
            let h = x[i + 1] - x[i];
            if h <= 0.0 {
                return Polynomial::with_origin(vec![y[i + 1], 0.0, 0.0, 0.0], x[i]);
            }
            let dy = (y[i + 1] - y[i]) / h;
            let c = (3.0 * dy - 2.0 * yp[i] - yp[i + 1]) / h;
            let d = (yp[i + 1] + yp[i] - 2.0 * dy) / (h * h);
            Polynomial::with_origin(vec![y[i], yp[i], c, d], x[i])
        })
        .collect();
    PiecewisePolynomial::new(x.to_vec(), pieces)
}

/// Samples plus node slopes, shared by every cubic Hermite variant.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CubicSplineBase {
    pub(crate) samples: Samples,
    pub(crate) yp: Vec<f64>,
}

impl CubicSplineBase {
    pub(crate) fn new(samples: Samples, yp: Vec<f64>) -> SplineResult<Self> {
        if yp.len() != samples.len() {
            return Err(SplineError::shape(
                samples.len(),
                yp.len(),
                &format!("{}::build", samples.name),
            ));
        }
        Ok(CubicSplineBase { samples, yp })
    }

    /// Base with zero slopes, to be filled by a derivative rule.
    pub(crate) fn unset(samples: Samples) -> Self {
        let yp = vec![0.0; samples.len()];
        CubicSplineBase { samples, yp }
    }

    pub(crate) fn evaluate(&self, at: f64, order: usize) -> SplineResult<f64> {
        let i = self.samples.search(at)?;
        Ok(eval_cubic(&self.samples.x, &self.samples.y, &self.yp, i, at, order))
    }

    pub(crate) fn coeffs(&self) -> SplineResult<PiecewisePolynomial> {
        cubic_coeffs(&self.samples.x, &self.samples.y, &self.yp)
    }

    pub(crate) fn set_range(&mut self, xmin: f64, xmax: f64) -> SplineResult<()> {
        let scale = self.samples.set_range(xmin, xmax)?;
        self.yp.iter_mut().for_each(|d| *d /= scale);
        Ok(())
    }

    pub(crate) fn write_segments(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_segments(f, &self.samples, &[("Yp", &self.yp)])
    }
}

/// Implements [Interpolant](crate::Interpolant) and `Display` for a wrapper
/// around a `base: CubicSplineBase` field.
macro_rules! cubic_interpolant {
    ($spline:ty, $kind:expr) => {
        impl $crate::spline::Interpolant for $spline {
            fn name(&self) -> &str {
                &self.base.samples.name
            }

            fn kind(&self) -> $crate::spline::SplineKind {
                $kind
            }

            fn order(&self) -> usize {
                4
            }

            fn x_nodes(&self) -> &[f64] {
                &self.base.samples.x
            }

            fn y_nodes(&self) -> &[f64] {
                &self.base.samples.y
            }

            fn eval(&self, x: f64) -> $crate::error::SplineResult<f64> {
                self.base.evaluate(x, 0)
            }

            fn eval_d(&self, x: f64) -> $crate::error::SplineResult<f64> {
                self.base.evaluate(x, 1)
            }

            fn eval_dd(&self, x: f64) -> $crate::error::SplineResult<f64> {
                self.base.evaluate(x, 2)
            }

            fn eval_ddd(&self, x: f64) -> $crate::error::SplineResult<f64> {
                self.base.evaluate(x, 3)
            }

            fn coeffs(&self) -> $crate::error::SplineResult<$crate::polynomial::PiecewisePolynomial> {
                self.base.coeffs()
            }

            fn check_range(&self) -> bool {
                self.base.samples.check_range
            }

            fn set_check_range(&mut self, check_range: bool) {
                self.base.samples.check_range = check_range;
            }

            fn set_origin(&mut self, x0: f64) {
                self.base.samples.set_origin(x0);
            }

            fn set_range(&mut self, xmin: f64, xmax: f64) -> $crate::error::SplineResult<()> {
                self.base.set_range(xmin, xmax)
            }
        }

        impl std::fmt::Display for $spline {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.base.write_segments(f)
            }
        }

        impl $spline {
            /// Node slopes.
            pub fn yp_nodes(&self) -> &[f64] {
                &self.base.yp
            }

            pub fn yp_node(&self, i: usize) -> Option<f64> {
                self.base.yp.get(i).copied()
            }
        }
    };
}

pub(crate) use cubic_interpolant;
