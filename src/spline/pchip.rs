use std::cmp::Ordering;

use crate::error::SplineResult;

use super::{
    cubic_base::{cubic_interpolant, CubicSplineBase},
    slopes_by_run, Samples, SplineKind,
};

/// Shape preserving piecewise cubic (Fritsch–Carlson, Fritsch–Butland).
///
/// Monotone data give a monotone interpolant and local extrema of the data
/// stay extrema of the spline.
/// # Example
/// ```
/// use piecewise_spline::{PchipSpline, Interpolant};
///
/// let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
/// let y = vec![0.0, 1.0, 1.0, 2.0, 2.0];
/// let spline = PchipSpline::new(&x, &y).unwrap();
///
/// assert_eq!(&spline.yp_nodes()[1..4], &[0.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PchipSpline {
    pub(crate) base: CubicSplineBase,
}

impl PchipSpline {
    pub fn new(x: &[f64], y: &[f64]) -> SplineResult<Self> {
        let samples = Samples::new("PchipSpline", x.to_vec(), y.to_vec(), 2, "PchipSpline::build")?;
        PchipSpline::from_samples(samples)
    }

    pub(crate) fn from_samples(samples: Samples) -> SplineResult<Self> {
        log::debug!("building pchip spline `{}` on {} points", samples.name, samples.len());
        let mut base = CubicSplineBase::unset(samples);
        pchip_slopes(&base.samples.x, &base.samples.y, &mut base.yp);
        Ok(PchipSpline { base })
    }
}

cubic_interpolant!(PchipSpline, SplineKind::Pchip);

/// Product of the signs of `a` and `b`, zero counts as its own sign.
fn sign_test(a: f64, b: f64) -> i32 {
    let sign = |v: f64| match v.partial_cmp(&0.0) {
        Some(Ordering::Greater) => 1,
        Some(Ordering::Less) => -1,
        _ => 0,
    };
    sign(a) * sign(b)
}

/// Three point end slope, forced to agree in sign with the end secant and
/// limited to three times it when the data turn.
fn end_slope(w1: f64, del1: f64, w2: f64, del2: f64, near: f64) -> f64 {
    let slope = w1 * del1 + w2 * del2;
    if sign_test(slope, near) <= 0 {
        0.0
    } else if sign_test(del1, del2) < 0 && slope.abs() > (3.0 * near).abs() {
        3.0 * near
    } else {
        slope
    }
}

fn pchip_run(x: &[f64], y: &[f64], yp: &mut [f64]) {
    let n = x.len() - 1;
    let mut h1 = x[1] - x[0];
    let mut del1 = (y[1] - y[0]) / h1;
    if n == 1 {
        yp.fill(del1);
        return;
    }

    let mut h2 = x[2] - x[1];
    let mut del2 = (y[2] - y[1]) / h2;
    let mut hsum = h1 + h2;
    yp[0] = end_slope((h1 + hsum) / hsum, del1, -h1 / hsum, del2, del1);

    for i in 1..n {
        if i > 1 {
            h1 = h2;
            h2 = x[i + 1] - x[i];
            hsum = h1 + h2;
            del1 = del2;
            del2 = (y[i + 1] - y[i]) / h2;
        }
        yp[i] = if sign_test(del1, del2) > 0 {
            // Brodlie modification of the Butland formula
            let w1 = (1.0 + h1 / hsum) / 3.0;
            let w2 = (1.0 + h2 / hsum) / 3.0;
            let dmax = del1.abs().max(del2.abs());
            let dmin = del1.abs().min(del2.abs());
            dmin / (w1 * del1 / dmax + w2 * del2 / dmax)
        } else {
            0.0
        };
    }

    yp[n] = end_slope(-h2 / hsum, del1, (h2 + hsum) / hsum, del2, del2);
}

pub(crate) fn pchip_slopes(x: &[f64], y: &[f64], yp: &mut [f64]) {
    slopes_by_run(x, y, yp, pchip_run);
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::spline::Interpolant;

    #[test]
    fn plateaus_have_zero_slope() {
        let spline = PchipSpline::new(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 1.0, 1.0, 2.0, 2.0]).unwrap();
        let yp = spline.yp_nodes();
        assert_eq!(&yp[1..4], &[0.0, 0.0, 0.0]);
        assert!(yp[0] > 0.0);
        assert_eq!(yp[4], 0.0);
    }

    #[test]
    fn reproduces_linear_data() {
        let eps = 1e-12;
        let x = vec![0.0, 0.3, 1.0, 2.5];
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v + 1.0).collect();
        let spline = PchipSpline::new(&x, &y).unwrap();
        for d in spline.yp_nodes() {
            assert_approx_eq!(*d, 0.5, eps);
        }
    }

    #[test]
    fn end_slope_is_limited() {
        let eps = 1e-12;
        // del1 = 1, del2 = -10: the three point formula overshoots
        let spline = PchipSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, -9.0]).unwrap();
        let yp = spline.yp_nodes();
        assert_approx_eq!(yp[0], 3.0, eps);
        assert_eq!(yp[1], 0.0);
        assert_approx_eq!(yp[2], -15.5, eps);
    }

    #[test]
    fn preserves_monotonicity() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut x = vec![0.0];
        let mut y = vec![0.0];
        for _ in 0..30 {
            x.push(x[x.len() - 1] + rng.gen_range(0.01..2.0));
            let step = if rng.gen_bool(0.3) { 0.0 } else { rng.gen_range(0.0..5.0) };
            y.push(y[y.len() - 1] + step);
        }
        let spline = PchipSpline::new(&x, &y).unwrap();

        let n = 2000;
        let dx = (spline.x_max() - spline.x_min()) / n as f64;
        let mut previous = spline.eval(spline.x_min()).unwrap();
        for i in 1..=n {
            let value = spline.eval((spline.x_min() + i as f64 * dx).min(spline.x_max())).unwrap();
            assert!(value >= previous - 1e-12);
            previous = value;
        }
    }
}
