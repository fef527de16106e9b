use crate::error::SplineResult;

use super::{
    cubic_base::{cubic_interpolant, CubicSplineBase},
    slopes_by_run, Samples, SplineKind,
};

/// Bessel spline: the slope at a node is the slope of the parabola through
/// the node and its two neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct BesselSpline {
    pub(crate) base: CubicSplineBase,
}

impl BesselSpline {
    pub fn new(x: &[f64], y: &[f64]) -> SplineResult<Self> {
        let samples = Samples::new("BesselSpline", x.to_vec(), y.to_vec(), 2, "BesselSpline::build")?;
        BesselSpline::from_samples(samples)
    }

    pub(crate) fn from_samples(samples: Samples) -> SplineResult<Self> {
        log::debug!("building bessel spline `{}` on {} points", samples.name, samples.len());
        let mut base = CubicSplineBase::unset(samples);
        bessel_slopes(&base.samples.x, &base.samples.y, &mut base.yp);
        Ok(BesselSpline { base })
    }
}

cubic_interpolant!(BesselSpline, SplineKind::Bessel);

fn bessel_run(x: &[f64], y: &[f64], yp: &mut [f64]) {
    let n = x.len() - 1;
    let m: Vec<f64> = (0..n).map(|i| (y[i + 1] - y[i]) / (x[i + 1] - x[i])).collect();
    if n == 1 {
        yp.fill(m[0]);
        return;
    }
    for i in 1..n {
        let dl = x[i] - x[i - 1];
        let dr = x[i + 1] - x[i];
        yp[i] = (dr * m[i - 1] + dl * m[i]) / (dl + dr);
    }
    yp[0] = 1.5 * m[0] - 0.5 * m[1];
    yp[n] = 1.5 * m[n - 1] - 0.5 * m[n - 2];
}

pub(crate) fn bessel_slopes(x: &[f64], y: &[f64], yp: &mut [f64]) {
    slopes_by_run(x, y, yp, bessel_run);
}
