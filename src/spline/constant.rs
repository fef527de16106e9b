use std::fmt;

use crate::{
    error::SplineResult,
    polynomial::{PiecewisePolynomial, Polynomial},
};

use super::{Interpolant, Samples, SplineKind};

/// Right continuous step function: `y[i]` holds on `[x[i], x[i+1])`.
///
/// The last sample only closes the last step, its value is returned right of
/// the grid and otherwise ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantSpline {
    samples: Samples,
}

impl ConstantSpline {
    pub fn new(x: &[f64], y: &[f64]) -> SplineResult<Self> {
        let samples = Samples::new("ConstantSpline", x.to_vec(), y.to_vec(), 2, "ConstantSpline::build")?;
        ConstantSpline::from_samples(samples)
    }

    pub(crate) fn from_samples(samples: Samples) -> SplineResult<Self> {
        log::debug!("building constant spline `{}` on {} points", samples.name, samples.len());
        Ok(ConstantSpline { samples })
    }

    fn evaluate(&self, at: f64, order: usize) -> SplineResult<f64> {
        let i = self.samples.search(at)?;
        Ok(eval_constant(&self.samples.x, &self.samples.y, i, at, order))
    }
}

pub(crate) fn eval_constant(x: &[f64], y: &[f64], interval: usize, at: f64, order: usize) -> f64 {
    if order > 0 {
        return 0.0;
    }
    let n = x.len();
    if at < x[0] {
        y[0]
    } else if at > x[n - 1] {
        y[n - 1]
    } else {
        y[interval]
    }
}

impl Interpolant for ConstantSpline {
    fn name(&self) -> &str {
        &self.samples.name
    }

    fn kind(&self) -> SplineKind {
        SplineKind::Constant
    }

    fn order(&self) -> usize {
        1
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
        let (x, y) = (&self.samples.x, &self.samples.y);
        let pieces = (0..x.len() - 1)
            .map(|i| Polynomial::with_origin(vec![y[i]], x[i]))
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

impl fmt::Display for ConstantSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = (&self.samples.x, &self.samples.y);
        for i in 0..x.len() - 1 {
            writeln!(f, "segment N.{:4} X:[ {}, {} ] Y:{}", i, x[i], x[i + 1], y[i])?;
        }
        Ok(())
    }
}
