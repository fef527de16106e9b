use std::fmt;

use crate::{
    error::{check_nan, SplineError, SplineResult},
    hermite::{hermite5, hermite5_d, hermite5_dd, hermite5_ddd, hermite5_dddd, hermite5_ddddd},
    polynomial::{PiecewisePolynomial, Polynomial},
};

use super::{
    extrapolate_quadratic, monotone_runs, pchip::pchip_slopes, write_segments, Interpolant, Samples,
    SplineKind,
};

/// Quintic Hermite spline with continuous curvature.
///
/// Slopes come from the shape preserving cubic rule, curvatures from a
/// min-mod limiter of the one sided curvatures of the cubic segments.
/// # Example
/// ```
/// use piecewise_spline::{QuinticSpline, Interpolant};
///
/// let x = vec![0.0, 1.0, 2.0, 3.0];
/// let y = vec![0.0, 1.0, 3.0, 3.5];
/// let spline = QuinticSpline::new(&x, &y).unwrap();
///
/// assert_eq!(spline.order(), 6);
/// assert!(spline.eval(1.5).unwrap() > 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuinticSpline {
    samples: Samples,
    yp: Vec<f64>,
    ypp: Vec<f64>,
}

impl QuinticSpline {
    pub fn new(x: &[f64], y: &[f64]) -> SplineResult<Self> {
        let samples = Samples::new("QuinticSpline", x.to_vec(), y.to_vec(), 2, "QuinticSpline::build")?;
        QuinticSpline::from_samples(samples)
    }

    /// Quintic Hermite spline through supplied slopes and curvatures.
    pub fn from_derivatives(x: &[f64], y: &[f64], yp: &[f64], ypp: &[f64]) -> SplineResult<Self> {
        let samples = Samples::new("QuinticSpline", x.to_vec(), y.to_vec(), 2, "QuinticSpline::build")?;
        check_nan(yp, &samples.name, "Yp")?;
        check_nan(ypp, &samples.name, "Ypp")?;
        QuinticSpline::from_parts(samples, yp.to_vec(), ypp.to_vec())
    }

    pub(crate) fn from_samples(samples: Samples) -> SplineResult<Self> {
        log::debug!("building quintic spline `{}` on {} points", samples.name, samples.len());
        let mut yp = vec![0.0; samples.len()];
        let mut ypp = vec![0.0; samples.len()];
        quintic_slopes(&samples.x, &samples.y, &mut yp, &mut ypp);
        Ok(QuinticSpline { samples, yp, ypp })
    }

    pub(crate) fn from_parts(samples: Samples, yp: Vec<f64>, ypp: Vec<f64>) -> SplineResult<Self> {
        let context = format!("{}::build", samples.name);
        for values in [&yp, &ypp] {
            if values.len() != samples.len() {
                return Err(SplineError::shape(samples.len(), values.len(), &context));
            }
        }
        Ok(QuinticSpline { samples, yp, ypp })
    }

    pub fn yp_nodes(&self) -> &[f64] {
        &self.yp
    }

    pub fn yp_node(&self, i: usize) -> Option<f64> {
        self.yp.get(i).copied()
    }

    /// Node curvatures.
    pub fn ypp_nodes(&self) -> &[f64] {
        &self.ypp
    }

    pub fn ypp_node(&self, i: usize) -> Option<f64> {
        self.ypp.get(i).copied()
    }

    fn evaluate(&self, at: f64, order: usize) -> SplineResult<f64> {
        let i = self.samples.search(at)?;
        Ok(eval_quintic(&self.samples.x, &self.samples.y, &self.yp, &self.ypp, i, at, order))
    }

    pub fn eval_dddd(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 4)
    }

    pub fn eval_ddddd(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 5)
    }
}

fn basis(t: f64, h: f64, order: usize) -> [f64; 6] {
    match order {
        0 => hermite5(t, h),
        1 => hermite5_d(t, h),
        2 => hermite5_dd(t, h),
        3 => hermite5_ddd(t, h),
        4 => hermite5_dddd(t, h),
        5 => hermite5_ddddd(t, h),
        _ => [0.0; 6],
    }
}

/// Derivative of order `order` of the quintic Hermite interpolant of
/// `(x, y, yp, ypp)` at `at`. Outside the grid the end node jet is continued
/// quadratically.
pub(crate) fn eval_quintic(
    x: &[f64],
    y: &[f64],
    yp: &[f64],
    ypp: &[f64],
    interval: usize,
    at: f64,
    order: usize,
) -> f64 {
    let n = x.len();
    let node = |k: usize| [y[k], yp[k], ypp[k]];
    if at < x[0] {
        return extrapolate_quadratic(at - x[0], node(0), order);
    }
    if at > x[n - 1] {
        return extrapolate_quadratic(at - x[n - 1], node(n - 1), order);
    }
    let i = interval;
    let h = x[i + 1] - x[i];
    if h <= 0.0 {
        return extrapolate_quadratic(0.0, node(i + 1), order);
    }
    let data = [y[i], y[i + 1], yp[i], yp[i + 1], ypp[i], ypp[i + 1]];
    basis(at - x[i], h, order)
        .iter()
        .zip(data.iter())
        .map(|(b, d)| b * d)
        .sum()
}

fn min_mod(a: f64, b: f64) -> f64 {
    if a * b < 0.0 {
        0.0
    } else if a.abs() < b.abs() {
        a
    } else {
        b
    }
}

/// Shape preserving slopes and limited curvatures for every monotone run.
pub(crate) fn quintic_slopes(x: &[f64], y: &[f64], yp: &mut [f64], ypp: &mut [f64]) {
    pchip_slopes(x, y, yp);
    for run in monotone_runs(x) {
        let (begin, end) = (run.start, run.end - 1);
        ypp[begin] = 0.0;
        ypp[end] = 0.0;
        for i in begin + 1..end {
            let h1 = x[i] - x[i - 1];
            let h2 = x[i + 1] - x[i];
            let left = (6.0 * (y[i - 1] - y[i]) / h1 + 4.0 * yp[i] + 2.0 * yp[i - 1]) / h1;
            let right = (6.0 * (y[i + 1] - y[i]) / h2 - 4.0 * yp[i] - 2.0 * yp[i + 1]) / h2;
            ypp[i] = min_mod(left, right);
        }
    }
}

impl Interpolant for QuinticSpline {
    fn name(&self) -> &str {
        &self.samples.name
    }

    fn kind(&self) -> SplineKind {
        SplineKind::Quintic
    }

    fn order(&self) -> usize {
        6
    }

    fn x_nodes(&self) -> &[f64] {
        &self.samples.x
    }

    fn y_nodes(&self) -> &[f64] {
        &self.samples.y
    }

    fn eval(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 0)
    }

    fn eval_d(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 1)
    }

    fn eval_dd(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 2)
    }

    fn eval_ddd(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 3)
    }

    fn coeffs(&self) -> SplineResult<PiecewisePolynomial> {
        let (x, y, yp, ypp) = (&self.samples.x, &self.samples.y, &self.yp, &self.ypp);
        let pieces = (0..x.len() - 1)
            .map(|i| {
                let h = x[i + 1] - x[i];
                if h <= 0.0 {
                    return Polynomial::with_origin(vec![y[i + 1], 0.0, 0.0, 0.0, 0.0, 0.0], x[i]);
                }
                let dy = (y[i + 1] - y[i]) / h;
                let c = ypp[i] / 2.0;
                let d = ((10.0 * dy - 6.0 * yp[i] - 4.0 * yp[i + 1]) / h - 1.5 * ypp[i] + 0.5 * ypp[i + 1]) / h;
                let e = ((-15.0 * dy + 8.0 * yp[i] + 7.0 * yp[i + 1]) / h + 1.5 * ypp[i] - ypp[i + 1]) / (h * h);
                let f = ((6.0 * dy - 3.0 * (yp[i] + yp[i + 1])) / h - 0.5 * ypp[i] + 0.5 * ypp[i + 1]) / (h * h * h);
                Polynomial::with_origin(vec![y[i], yp[i], c, d, e, f], x[i])
            })
            .collect();
        PiecewisePolynomial::new(x.clone(), pieces)
    }

    fn check_range(&self) -> bool {
        self.samples.check_range
    }

    fn set_check_range(&mut self, check_range: bool) {
        self.samples.check_range = check_range;
    }

    fn set_origin(&mut self, x0: f64) {
        self.samples.set_origin(x0);
    }

    fn set_range(&mut self, xmin: f64, xmax: f64) -> SplineResult<()> {
        let scale = self.samples.set_range(xmin, xmax)?;
        self.yp.iter_mut().for_each(|d| *d /= scale);
        self.ypp.iter_mut().for_each(|d| *d /= scale * scale);
        Ok(())
    }
}

impl fmt::Display for QuinticSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_segments(f, &self.samples, &[("Yp", &self.yp), ("Ypp", &self.ypp)])
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn quintic(x: f64) -> [f64; 6] {
        let p = [1.0, -0.5, 0.25, 2.0, -1.0, 0.3];
        let mut jet = [0.0; 6];
        for (order, value) in jet.iter_mut().enumerate() {
            *value = (order..6)
                .map(|k| {
                    let falling: f64 = ((k - order + 1)..=k).map(|j| j as f64).product();
                    falling * p[k] * x.powi((k - order) as i32)
                })
                .sum();
        }
        jet
    }

    #[test]
    fn exact_derivatives_reproduce_quintic() {
        let eps = 1e-9;
        let x = vec![-1.0, -0.2, 0.5, 1.0, 2.0];
        let y: Vec<f64> = x.iter().map(|&v| quintic(v)[0]).collect();
        let yp: Vec<f64> = x.iter().map(|&v| quintic(v)[1]).collect();
        let ypp: Vec<f64> = x.iter().map(|&v| quintic(v)[2]).collect();
        let spline = QuinticSpline::from_derivatives(&x, &y, &yp, &ypp).unwrap();

        for at in [-0.7, 0.1, 0.75, 1.9] {
            let jet = quintic(at);
            assert_approx_eq!(spline.eval(at).unwrap(), jet[0], eps);
            assert_approx_eq!(spline.eval_d(at).unwrap(), jet[1], eps);
            assert_approx_eq!(spline.eval_dd(at).unwrap(), jet[2], eps);
            assert_approx_eq!(spline.eval_ddd(at).unwrap(), jet[3], eps);
            assert_approx_eq!(spline.eval_dddd(at).unwrap(), jet[4], eps);
            assert_approx_eq!(spline.eval_ddddd(at).unwrap(), jet[5], eps);
        }

        let coeffs = spline.coeffs().unwrap();
        assert_eq!(coeffs.order(), 6);
        for at in [-0.5, 0.3, 1.5] {
            assert_approx_eq!(coeffs.evaluate(at), quintic(at)[0], eps);
        }
    }

    #[test]
    fn curvature_is_limited() {
        let eps = 1e-12;
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = vec![0.0, 1.0, 1.0, 2.0, 4.0];
        let spline = QuinticSpline::new(&x, &y).unwrap();
        let ypp = spline.ypp_nodes();

        assert_eq!(ypp[0], 0.0);
        assert_eq!(ypp[4], 0.0);
        // plateau nodes have zero slope and opposite one sided curvatures
        assert_eq!(ypp[1], 0.0);
        assert_eq!(ypp[2], 0.0);
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert_approx_eq!(spline.eval(*xi).unwrap(), *yi, eps);
        }
    }

    #[test]
    fn extrapolation_uses_end_jet() {
        let eps = 1e-12;
        let spline = QuinticSpline::from_derivatives(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 2.0], &[0.5, 4.0]).unwrap();
        assert_approx_eq!(spline.eval(2.0).unwrap(), 1.0 + 2.0 + 2.0, eps);
        assert_approx_eq!(spline.eval_d(-1.0).unwrap(), 1.0 - 0.5, eps);
        assert_eq!(spline.eval_ddd(3.0).unwrap(), 0.0);
    }

    #[test]
    fn set_range_rescales_curvature() {
        let eps = 1e-10;
        let x = vec![0.0, 1.0, 2.0];
        let mut spline = QuinticSpline::new(&x, &[0.0, 1.0, 4.0]).unwrap();
        let before = (spline.eval_d(1.5).unwrap(), spline.eval_dd(1.5).unwrap());

        spline.set_range(0.0, 4.0).unwrap();
        assert_approx_eq!(spline.eval_d(3.0).unwrap(), before.0 / 2.0, eps);
        assert_approx_eq!(spline.eval_dd(3.0).unwrap(), before.1 / 4.0, eps);
    }
}
