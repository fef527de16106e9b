use crate::error::SplineResult;

use super::{
    cubic_base::{cubic_interpolant, CubicSplineBase},
    slopes_by_run, Samples, SplineKind,
};

/// Akima spline: node slopes are weighted averages of the neighbouring
/// secants, which suppresses the wiggles of the C2 spline near outliers.
/// # Example
/// ```
/// use piecewise_spline::{AkimaSpline, Interpolant};
/// use assert_approx_eq::assert_approx_eq;
///
/// let x = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
/// let spline = AkimaSpline::new(&x, &y).unwrap();
///
/// // flat away from the step
/// assert_approx_eq!(spline.eval(1.5).unwrap(), 0.0, 1e-12);
/// assert_approx_eq!(spline.eval(4.5).unwrap(), 1.0, 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AkimaSpline {
    pub(crate) base: CubicSplineBase,
}

impl AkimaSpline {
    pub fn new(x: &[f64], y: &[f64]) -> SplineResult<Self> {
        let samples = Samples::new("AkimaSpline", x.to_vec(), y.to_vec(), 2, "AkimaSpline::build")?;
        AkimaSpline::from_samples(samples)
    }

    pub(crate) fn from_samples(samples: Samples) -> SplineResult<Self> {
        log::debug!("building akima spline `{}` on {} points", samples.name, samples.len());
        let mut base = CubicSplineBase::unset(samples);
        akima_slopes(&base.samples.x, &base.samples.y, &mut base.yp);
        Ok(AkimaSpline { base })
    }
}

cubic_interpolant!(AkimaSpline, SplineKind::Akima);

fn akima_one(epsi: f64, d_m2: f64, d_m1: f64, d: f64, d_p1: f64) -> f64 {
    let mut wl = (d_p1 - d).abs();
    let mut wr = (d_m1 - d_m2).abs();
    let mut den = wl + wr;
    if den <= epsi {
        wl = 0.5;
        wr = 0.5;
        den = 1.0;
    }
    (wl * d_m1 + wr * d) / den
}

fn akima_run(x: &[f64], y: &[f64], yp: &mut [f64]) {
    let npts = x.len();
    if npts == 2 {
        let secant = (y[1] - y[0]) / (x[1] - x[0]);
        yp.fill(secant);
        return;
    }

    // m[i + 1] is the secant of segment i, two ghost slopes on each side
    let mut m = vec![0.0; npts + 3];
    for i in 1..npts {
        m[i + 1] = (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
    }
    m[1] = 2.0 * m[2] - m[3];
    m[0] = 2.0 * m[1] - m[2];
    m[npts + 1] = 2.0 * m[npts] - m[npts - 1];
    m[npts + 2] = 2.0 * m[npts + 1] - m[npts];

    let epsi = 1e-8 * m.windows(2).map(|w| (w[1] - w[0]).abs()).fold(0.0, f64::max);

    for (i, d) in yp.iter_mut().enumerate() {
        *d = akima_one(epsi, m[i], m[i + 1], m[i + 2], m[i + 3]);
    }
}

pub(crate) fn akima_slopes(x: &[f64], y: &[f64], yp: &mut [f64]) {
    slopes_by_run(x, y, yp, akima_run);
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::spline::Interpolant;

    #[test]
    fn two_points_use_secant() {
        let spline = AkimaSpline::new(&[1.0, 3.0], &[0.0, 1.0]).unwrap();
        assert_eq!(spline.yp_nodes(), &[0.5, 0.5]);
    }

    #[test]
    fn reproduces_linear_data() {
        let eps = 1e-12;
        let x = vec![0.0, 0.5, 1.7, 2.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 - 2.0 * v).collect();
        let spline = AkimaSpline::new(&x, &y).unwrap();

        for d in spline.yp_nodes() {
            assert_approx_eq!(*d, -2.0, eps);
        }
        assert_approx_eq!(spline.eval(3.3).unwrap(), 3.0 - 6.6, eps);
        assert_approx_eq!(spline.eval_dd(1.0).unwrap(), 0.0, eps);
    }

    #[test]
    fn slope_weights() {
        let eps = 1e-12;
        // secants 0, 0, 1, 1
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = vec![0.0, 0.0, 0.0, 1.0, 2.0];
        let spline = AkimaSpline::new(&x, &y).unwrap();
        let yp = spline.yp_nodes();

        assert_approx_eq!(yp[1], 0.0, eps);
        // wl = |1 - 1|, wr = |0 - 0|: equal weights
        assert_approx_eq!(yp[2], 0.5, eps);
        assert_approx_eq!(yp[3], 1.0, eps);
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert_approx_eq!(spline.eval(*xi).unwrap(), *yi, eps);
        }
    }
}
