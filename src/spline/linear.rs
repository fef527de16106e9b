use std::fmt;

use crate::{
    error::SplineResult,
    polynomial::{PiecewisePolynomial, Polynomial},
};

use super::{Interpolant, Samples, SplineKind};

/// Piecewise linear interpolation, constant outside the samples.
/// # Example
/// ```
/// use piecewise_spline::{LinearSpline, Interpolant};
/// use assert_approx_eq::assert_approx_eq;
///
/// let spline = LinearSpline::new(&[0.0, 1.0, 3.0], &[0.0, 2.0, 3.0]).unwrap();
///
/// assert_approx_eq!(spline.eval(0.25).unwrap(), 0.5, 1e-12);
/// assert_approx_eq!(spline.eval(2.0).unwrap(), 2.5, 1e-12);
/// assert_approx_eq!(spline.eval(5.0).unwrap(), 3.0, 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSpline {
    samples: Samples,
}

impl LinearSpline {
    pub fn new(x: &[f64], y: &[f64]) -> SplineResult<Self> {
        let samples = Samples::new("LinearSpline", x.to_vec(), y.to_vec(), 2, "LinearSpline::build")?;
        LinearSpline::from_samples(samples)
    }

    pub(crate) fn from_samples(samples: Samples) -> SplineResult<Self> {
        log::debug!("building linear spline `{}` on {} points", samples.name, samples.len());
        Ok(LinearSpline { samples })
    }

    fn evaluate(&self, at: f64, order: usize) -> SplineResult<f64> {
        let i = self.samples.search(at)?;
        Ok(eval_linear(&self.samples.x, &self.samples.y, i, at, order))
    }
}

/// Value (`order == 0`) or slope of the broken line through `(x, y)`.
pub(crate) fn eval_linear(x: &[f64], y: &[f64], interval: usize, at: f64, order: usize) -> f64 {
    let n = x.len();
    if at < x[0] {
        return if order == 0 { y[0] } else { 0.0 };
    }
    if at > x[n - 1] {
        return if order == 0 { y[n - 1] } else { 0.0 };
    }
    let i = interval;
    let h = x[i + 1] - x[i];
    if h <= 0.0 {
        return if order == 0 { y[i + 1] } else { 0.0 };
    }
    match order {
        0 => {
            let s = (at - x[i]) / h;
            (1.0 - s) * y[i] + s * y[i + 1]
        }
        1 => (y[i + 1] - y[i]) / h,
        _ => 0.0,
    }
}

impl Interpolant for LinearSpline {
    fn name(&self) -> &str {
        &self.samples.name
    }

    fn kind(&self) -> SplineKind {
        SplineKind::Linear
    }

    fn order(&self) -> usize {
        2
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
        self.samples.check(x)?;
        Ok(0.0)
    }

    fn eval_ddd(&self, x: f64) -> SplineResult<f64> {
        self.samples.check(x)?;
        Ok(0.0)
    }

    fn coeffs(&self) -> SplineResult<PiecewisePolynomial> {
        let (x, y) = (&self.samples.x, &self.samples.y);
        let pieces = x
            .windows(2)
            .zip(y.windows(2))
            .map(|(xs, ys)| {
                let h = xs[1] - xs[0];
                let slope = if h > 0.0 { (ys[1] - ys[0]) / h } else { 0.0 };
                let start = if h > 0.0 { ys[0] } else { ys[1] };
                Polynomial::with_origin(vec![start, slope], xs[0])
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
        self.samples.set_range(xmin, xmax).map(|_| ())
    }
}

impl fmt::Display for LinearSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = (&self.samples.x, &self.samples.y);
        for i in 0..x.len() - 1 {
            writeln!(
                f,
                "segment N.{:4} X:[ {}, {} ] Y:[ {}, {} ] slope: {}",
                i,
                x[i],
                x[i + 1],
                y[i],
                y[i + 1],
                (y[i + 1] - y[i]) / (x[i + 1] - x[i])
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::error::SplineError;

    #[test]
    fn interpolate() {
        let eps = 1e-12;
        let spline = LinearSpline::new(&[-1.0, 0.0, 2.0], &[1.0, 0.0, 4.0]).unwrap();

        assert_approx_eq!(spline.eval(-0.5).unwrap(), 0.5, eps);
        assert_approx_eq!(spline.eval(1.5).unwrap(), 3.0, eps);
        assert_approx_eq!(spline.eval_d(-0.5).unwrap(), -1.0, eps);
        assert_approx_eq!(spline.eval_d(0.5).unwrap(), 2.0, eps);
        assert_eq!(spline.eval_dd(0.5).unwrap(), 0.0);
    }

    #[test]
    fn flat_outside() {
        let spline = LinearSpline::new(&[0.0, 1.0], &[2.0, 3.0]).unwrap();
        assert_eq!(spline.eval(-3.0).unwrap(), 2.0);
        assert_eq!(spline.eval(7.0).unwrap(), 3.0);
        assert_eq!(spline.eval_d(7.0).unwrap(), 0.0);
    }

    #[test]
    fn check_range_rejects_outside() {
        let mut spline = LinearSpline::new(&[0.0, 1.0], &[2.0, 3.0]).unwrap();
        spline.set_check_range(true);
        assert!(spline.check_range());
        assert!(matches!(spline.eval(1.5), Err(SplineError::OutOfRange { .. })));
        assert!(matches!(spline.eval_dd(-0.5), Err(SplineError::OutOfRange { .. })));
        assert!(spline.eval(1.0).is_ok());
    }

    #[test]
    fn discontinuity_at_repeated_abscissa() {
        let spline = LinearSpline::new(&[0.0, 1.0, 1.0, 2.0], &[0.0, 1.0, 5.0, 6.0]).unwrap();
        assert_eq!(spline.eval(1.0).unwrap(), 5.0);
        assert_eq!(spline.eval(0.5).unwrap(), 0.5);
        assert_eq!(spline.eval(1.5).unwrap(), 5.5);
    }

    #[test]
    fn coefficients_and_display() {
        let eps = 1e-12;
        let spline = LinearSpline::new(&[0.0, 2.0], &[1.0, 2.0]).unwrap();
        let coeffs = spline.coeffs().unwrap();
        assert_eq!(coeffs.pieces()[0].coefficients(), &[1.0, 0.5]);
        assert_approx_eq!(coeffs.evaluate(1.0), 1.5, eps);
        assert_eq!(spline.to_string(), "segment N.   0 X:[ 0, 2 ] Y:[ 1, 2 ] slope: 0.5\n");
    }
}
