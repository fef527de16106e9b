use crate::error::SplineResult;

use super::{
    cubic_base::{cubic_interpolant, CubicSplineBase},
    Samples, SplineKind,
};

/// Cubic Hermite spline with slopes supplied by the caller.
/// # Example
/// ```
/// use piecewise_spline::{HermiteSpline, Interpolant};
/// use assert_approx_eq::assert_approx_eq;
///
/// let x = vec![0.0, 1.0, 2.0, 3.0];
/// let y: Vec<f64> = x.iter().map(|v| v * v * v).collect();
/// let yp: Vec<f64> = x.iter().map(|v| 3.0 * v * v).collect();
/// let spline = HermiteSpline::new(&x, &y, &yp).unwrap();
///
/// assert_approx_eq!(spline.eval(1.5).unwrap(), 3.375, 1e-12);
/// assert_approx_eq!(spline.eval_d(1.0).unwrap(), 3.0, 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HermiteSpline {
    pub(crate) base: CubicSplineBase,
}

impl HermiteSpline {
    pub fn new(x: &[f64], y: &[f64], yp: &[f64]) -> SplineResult<Self> {
        let samples = Samples::new("HermiteSpline", x.to_vec(), y.to_vec(), 2, "HermiteSpline::build")?;
        HermiteSpline::from_samples(samples, yp.to_vec())
    }

    pub(crate) fn from_samples(samples: Samples, yp: Vec<f64>) -> SplineResult<Self> {
        log::debug!("building hermite spline `{}` on {} points", samples.name, samples.len());
        crate::error::check_nan(&yp, &samples.name, "Yp")?;
        let base = CubicSplineBase::new(samples, yp)?;
        Ok(HermiteSpline { base })
    }
}

cubic_interpolant!(HermiteSpline, SplineKind::Hermite);

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::{error::SplineError, spline::Interpolant};

    #[test]
    fn slopes_must_match_samples() {
        assert!(matches!(
            HermiteSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0], &[1.0, 1.0]),
            Err(SplineError::ShapeMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(matches!(
            HermiteSpline::new(&[0.0, 1.0], &[0.0, 1.0], &[1.0, f64::INFINITY]),
            Err(SplineError::NotFinite { array: "Yp", index: 1, .. })
        ));
    }

    #[test]
    fn set_range_rescales_slopes() {
        let eps = 1e-12;
        let f = |x: f64| x * x * x - x;
        let df = |x: f64| 3.0 * x * x - 1.0;
        let x = vec![0.0, 1.0, 2.0];
        let y: Vec<f64> = x.iter().map(|&v| f(v)).collect();
        let yp: Vec<f64> = x.iter().map(|&v| df(v)).collect();
        let mut spline = HermiteSpline::new(&x, &y, &yp).unwrap();

        spline.set_range(10.0, 14.0).unwrap();
        assert_eq!(spline.x_nodes(), &[10.0, 12.0, 14.0]);
        // new(t) = old((t - 10) / 2)
        assert_approx_eq!(spline.eval(13.0).unwrap(), f(1.5), eps);
        assert_approx_eq!(spline.eval_d(13.0).unwrap(), df(1.5) / 2.0, eps);
        assert_approx_eq!(spline.eval_dd(13.0).unwrap(), 6.0 * 1.5 / 4.0, eps);

        spline.set_origin(0.0);
        assert_approx_eq!(spline.eval(3.0).unwrap(), f(1.5), eps);
    }

    #[test]
    fn display_describes_segments() {
        let spline = HermiteSpline::new(&[0.0, 2.0], &[1.0, 3.0], &[0.5, 1.5]).unwrap();
        let text = spline.to_string();
        assert_eq!(text, "segment N.   0 X:[0, 2] Y:[1, 3] Yp:[0.5, 1.5] slope: 1\n");
    }
}
