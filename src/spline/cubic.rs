use crate::error::SplineResult;

use super::{
    cubic_base::{cubic_interpolant, CubicSplineBase},
    monotone_runs, Samples, SplineKind,
};

/// Cubic spline with continuous second derivative.
///
/// Each monotone run solves its own tridiagonal system. The curvatures at
/// the two ends of the grid are prescribed (`0` gives the natural spline),
/// interior run boundaries are natural.
/// # Example
/// ```
/// use piecewise_spline::{CubicSpline, Interpolant};
/// use assert_approx_eq::assert_approx_eq;
///
/// // x^3 with its exact end curvatures
/// let x = vec![0.0, 1.0, 2.0, 3.0];
/// let y = vec![0.0, 1.0, 8.0, 27.0];
/// let spline = CubicSpline::with_end_conditions(&x, &y, 0.0, 18.0).unwrap();
///
/// assert_approx_eq!(spline.eval(1.5).unwrap(), 3.375, 1e-12);
/// assert_approx_eq!(spline.eval_d(1.0).unwrap(), 3.0, 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    pub(crate) base: CubicSplineBase,
    ddy0: f64,
    ddyn: f64,
}

impl CubicSpline {
    /// Natural cubic spline.
    pub fn new(x: &[f64], y: &[f64]) -> SplineResult<Self> {
        CubicSpline::with_end_conditions(x, y, 0.0, 0.0)
    }

    pub fn with_end_conditions(x: &[f64], y: &[f64], ddy0: f64, ddyn: f64) -> SplineResult<Self> {
        let samples = Samples::new("CubicSpline", x.to_vec(), y.to_vec(), 2, "CubicSpline::build")?;
        CubicSpline::from_samples(samples, ddy0, ddyn)
    }

    pub(crate) fn from_samples(samples: Samples, ddy0: f64, ddyn: f64) -> SplineResult<Self> {
        log::debug!(
            "building cubic spline `{}` on {} points, end curvatures ({}, {})",
            samples.name,
            samples.len(),
            ddy0,
            ddyn
        );
        let mut base = CubicSplineBase::unset(samples);
        cubic_slopes(&base.samples.x, &base.samples.y, &mut base.yp, ddy0, ddyn);
        Ok(CubicSpline { base, ddy0, ddyn })
    }

    pub(crate) fn from_base(base: CubicSplineBase) -> Self {
        CubicSpline {
            base,
            ddy0: 0.0,
            ddyn: 0.0,
        }
    }

    /// Prescribed curvatures at the first and last node.
    pub fn end_conditions(&self) -> (f64, f64) {
        (self.ddy0, self.ddyn)
    }
}

cubic_interpolant!(CubicSpline, SplineKind::Cubic);

/// Slopes of the C2 cubic spline through every monotone run of `(x, y)`.
pub(crate) fn cubic_slopes(x: &[f64], y: &[f64], yp: &mut [f64], ddy0: f64, ddyn: f64) {
    let runs = monotone_runs(x);
    let last = runs.len().saturating_sub(1);
    for (k, run) in runs.into_iter().enumerate() {
        let d0 = if k == 0 { ddy0 } else { 0.0 };
        let d1 = if k == last { ddyn } else { 0.0 };
        cubic_run(&x[run.clone()], &y[run.clone()], &mut yp[run], d0, d1);
    }
}

fn cubic_run(x: &[f64], y: &[f64], yp: &mut [f64], ddy0: f64, ddyn: f64) {
    let npts = x.len();
    if npts < 2 {
        yp.fill(0.0);
        return;
    }
    let n = npts - 1;

    let mut lower = vec![0.0; npts];
    let mut diag = vec![1.0; npts];
    let mut upper = vec![0.0; npts];
    let mut z = vec![0.0; npts];

    for i in 1..n {
        let span = x[i + 1] - x[i - 1];
        lower[i] = (x[i] - x[i - 1]) / span;
        upper[i] = (x[i + 1] - x[i]) / span;
        diag[i] = 2.0;
        z[i] = 6.0 * ((y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1])) / span;
    }
    z[0] = ddy0;
    z[n] = ddyn;

    // z <- node curvatures
    for i in 0..n {
        z[i] /= diag[i];
        upper[i] /= diag[i];
        diag[i + 1] -= lower[i + 1] * upper[i];
        z[i + 1] -= lower[i + 1] * z[i];
    }
    z[n] /= diag[n];
    for i in (0..n).rev() {
        z[i] -= upper[i] * z[i + 1];
    }

    for i in 0..n {
        let dx = x[i + 1] - x[i];
        yp[i] = (y[i + 1] - y[i]) / dx - (z[i] / 3.0 + z[i + 1] / 6.0) * dx;
    }
    let dx = x[n] - x[n - 1];
    yp[n] = yp[n - 1] + dx * 0.5 * (z[n - 1] + z[n]);
}
