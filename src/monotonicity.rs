//! Shape classification of splines used by [SplineSet](crate::SplineSet)
//! to decide which members may serve as independent variable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonicity class of a spline, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Monotonicity {
    /// Some sample decreases.
    NonMonotoneData,
    /// Samples are non-decreasing but the interpolant is not.
    NotMonotone,
    /// Non-decreasing with flat parts.
    Weakly,
    Strictly,
}

impl Monotonicity {
    /// Numeric code `-2 ..= 1`.
    pub fn code(self) -> i32 {
        match self {
            Monotonicity::NonMonotoneData => -2,
            Monotonicity::NotMonotone => -1,
            Monotonicity::Weakly => 0,
            Monotonicity::Strictly => 1,
        }
    }

    /// Only strictly monotone splines can be inverted.
    pub fn is_invertible(self) -> bool {
        self == Monotonicity::Strictly
    }

    /// Wording used by the spline set report.
    pub fn describe(self) -> &'static str {
        match self {
            Monotonicity::NonMonotoneData => "with NON monotone data",
            Monotonicity::NotMonotone => "is NOT monotone",
            Monotonicity::Weakly => "is monotone",
            Monotonicity::Strictly => "is strictly monotone",
        }
    }
}

impl fmt::Display for Monotonicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Classifies the cubic Hermite interpolant of `(x, y, yp)` as non-decreasing.
///
/// Each segment is tested against the Fritsch–Carlson monotonicity region
/// of the normalized end slopes. A flat segment is monotone only when both
/// its end slopes vanish.
/// # Example
/// ```
/// use piecewise_spline::{check_cubic_spline_monotonicity, Monotonicity};
///
/// let x = [0.0, 1.0, 2.0];
/// let y = [0.0, 1.0, 2.0];
/// assert_eq!(check_cubic_spline_monotonicity(&x, &y, &[1.0, 1.0, 1.0]), Monotonicity::Strictly);
/// assert_eq!(check_cubic_spline_monotonicity(&x, &y, &[1.0, 5.0, 1.0]), Monotonicity::NotMonotone);
/// assert_eq!(check_cubic_spline_monotonicity(&x, &[0.0, 2.0, 1.0], &[0.0; 3]), Monotonicity::NonMonotoneData);
/// ```
pub fn check_cubic_spline_monotonicity(x: &[f64], y: &[f64], yp: &[f64]) -> Monotonicity {
    let npts = x.len();
    let mut flag = Monotonicity::Strictly;
    for i in 1..npts {
        if y[i - 1] > y[i] {
            return Monotonicity::NonMonotoneData;
        }
        if y[i - 1] == y[i] && x[i - 1] < x[i] {
            flag = Monotonicity::Weakly;
        }
    }

    // Methods of Shape-Preserving Spline Approximation, p. 146
    for i in 1..npts {
        if x[i] <= x[i - 1] {
            continue;
        }
        let dd = (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
        if dd == 0.0 {
            if yp[i - 1] != 0.0 || yp[i] != 0.0 {
                return Monotonicity::NotMonotone;
            }
            continue;
        }
        let m0 = yp[i - 1] / dd;
        let m1 = yp[i] / dd;
        if m0 < 0.0 || m1 < 0.0 {
            return Monotonicity::NotMonotone;
        }
        if m0 <= 3.0 && m1 <= 3.0 {
            let touches = |m: f64| m == 0.0 || m == 3.0;
            if (i > 1 && touches(m0)) || (i < npts - 1 && touches(m1)) {
                flag = flag.min(Monotonicity::Weakly);
            }
        } else {
            let tmp1 = 2.0 * m0 + m1 - 3.0;
            let tmp2 = 2.0 * (m0 + m1 - 2.0);
            let tmp3 = m0 * tmp2 - tmp1 * tmp1;
            if (tmp2 >= 0.0 && tmp3 < 0.0) || (tmp2 < 0.0 && tmp3 > 0.0) {
                return Monotonicity::NotMonotone;
            }
            if tmp3 == 0.0 {
                flag = flag.min(Monotonicity::Weakly);
            }
        }
    }
    flag
}

/// Classification from the samples alone, used for broken lines.
pub fn check_data_monotonicity(x: &[f64], y: &[f64]) -> Monotonicity {
    let mut flag = Monotonicity::Strictly;
    for i in 1..x.len() {
        if y[i - 1] > y[i] {
            return Monotonicity::NotMonotone;
        }
        if y[i - 1] == y[i] && x[i - 1] < x[i] {
            flag = Monotonicity::Weakly;
        }
    }
    flag
}
