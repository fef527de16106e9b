//! One dimensional piecewise polynomial interpolants.
//!
//! Every variant implements [Interpolant]. The closed set of variants is
//! collected in the [Spline] sum type, usually obtained from a
//! [SplineBuilder].

use std::{fmt, io, ops::Range, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{SplineError, SplineResult},
    polynomial::PiecewisePolynomial,
    search::IntervalCursor,
};

mod akima;
mod bessel;
mod bspline;
mod builder;
mod constant;
mod cubic;
mod cubic_base;
mod hermite;
mod linear;
mod pchip;
mod quintic;

pub use akima::AkimaSpline;
pub use bessel::BesselSpline;
pub use bspline::BSpline;
pub use builder::SplineBuilder;
pub use constant::ConstantSpline;
pub use cubic::CubicSpline;
pub use hermite::HermiteSpline;
pub use linear::LinearSpline;
pub use pchip::PchipSpline;
pub use quintic::QuinticSpline;

pub(crate) use akima::akima_slopes;
pub(crate) use bessel::bessel_slopes;
pub(crate) use constant::eval_constant;
pub(crate) use cubic::cubic_slopes;
pub(crate) use cubic_base::eval_cubic;
pub(crate) use linear::eval_linear;
pub(crate) use pchip::pchip_slopes;
pub(crate) use quintic::{eval_quintic, quintic_slopes};

/// Type tag of a one dimensional spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplineKind {
    Constant,
    Linear,
    Cubic,
    Akima,
    Bessel,
    Pchip,
    Hermite,
    Quintic,
    #[serde(alias = "b-spline")]
    BSpline,
}

impl SplineKind {
    pub const ALL: [SplineKind; 9] = [
        SplineKind::Constant,
        SplineKind::Linear,
        SplineKind::Cubic,
        SplineKind::Akima,
        SplineKind::Bessel,
        SplineKind::Pchip,
        SplineKind::Hermite,
        SplineKind::Quintic,
        SplineKind::BSpline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SplineKind::Constant => "constant",
            SplineKind::Linear => "linear",
            SplineKind::Cubic => "cubic",
            SplineKind::Akima => "akima",
            SplineKind::Bessel => "bessel",
            SplineKind::Pchip => "pchip",
            SplineKind::Hermite => "hermite",
            SplineKind::Quintic => "quintic",
            SplineKind::BSpline => "bspline",
        }
    }

    /// True for the variants evaluated through cubic Hermite segments.
    pub fn is_cubic_family(self) -> bool {
        matches!(
            self,
            SplineKind::Cubic
                | SplineKind::Akima
                | SplineKind::Bessel
                | SplineKind::Pchip
                | SplineKind::Hermite
        )
    }
}

impl fmt::Display for SplineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SplineKind {
    type Err = SplineError;

    /// Case insensitive, `b-spline` is accepted as an alias of `bspline`.
    /// # Example
    /// ```
    /// use piecewise_spline::SplineKind;
    ///
    /// assert_eq!("PCHIP".parse::<SplineKind>().unwrap(), SplineKind::Pchip);
    /// assert_eq!("b-spline".parse::<SplineKind>().unwrap(), SplineKind::BSpline);
    /// assert!("spline set".parse::<SplineKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "b-spline" {
            return Ok(SplineKind::BSpline);
        }
        SplineKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == lower)
            .ok_or(SplineError::UnknownKind(s.to_string()))
    }
}

/// Capability set shared by every one dimensional spline.
///
/// Evaluation never mutates the logical state of a spline, only its private
/// interval cache, which is why splines are not `Sync`.
pub trait Interpolant {
    fn name(&self) -> &str;

    fn kind(&self) -> SplineKind;

    /// Number of coefficients of each polynomial piece (degree + 1).
    fn order(&self) -> usize;

    fn x_nodes(&self) -> &[f64];

    fn y_nodes(&self) -> &[f64];

    fn eval(&self, x: f64) -> SplineResult<f64>;

    fn eval_d(&self, x: f64) -> SplineResult<f64>;

    fn eval_dd(&self, x: f64) -> SplineResult<f64>;

    fn eval_ddd(&self, x: f64) -> SplineResult<f64>;

    /// Piecewise polynomial description of the spline inside its range.
    fn coeffs(&self) -> SplineResult<PiecewisePolynomial>;

    fn check_range(&self) -> bool;

    /// When enabled, evaluation outside `[x_min, x_max]` is an error instead
    /// of an extrapolation.
    fn set_check_range(&mut self, check_range: bool);

    /// Translates the abscissae so that the first one equals `x0`.
    fn set_origin(&mut self, x0: f64);

    /// Maps `[x_min, x_max]` affinely onto `[xmin, xmax]`.
    ///
    /// Derivative data is rescaled so that the new spline is the old one
    /// composed with the affine map.
    fn set_range(&mut self, xmin: f64, xmax: f64) -> SplineResult<()>;

    fn num_points(&self) -> usize {
        self.x_nodes().len()
    }

    fn x_node(&self, i: usize) -> Option<f64> {
        self.x_nodes().get(i).copied()
    }

    fn y_node(&self, i: usize) -> Option<f64> {
        self.y_nodes().get(i).copied()
    }

    fn x_min(&self) -> f64 {
        self.x_nodes().first().copied().unwrap_or(f64::NAN)
    }

    fn x_max(&self) -> f64 {
        self.x_nodes().last().copied().unwrap_or(f64::NAN)
    }

    /// Smallest sample value. Step splines ignore their last sample.
    fn y_min(&self) -> f64 {
        sample_values(self.kind(), self.y_nodes())
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    fn y_max(&self) -> f64 {
        sample_values(self.kind(), self.y_nodes())
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Writes `nintervals + 1` equispaced rows `x\ty\tDy\tDDy` preceded by
    /// `header`.
    fn dump(&self, out: &mut dyn io::Write, nintervals: usize, header: &str) -> io::Result<()> {
        writeln!(out, "{}", header)?;
        let nintervals = nintervals.max(1);
        let dx = (self.x_max() - self.x_min()) / nintervals as f64;
        for i in 0..=nintervals {
            let x = (self.x_min() + i as f64 * dx).min(self.x_max());
            let row = [self.eval(x), self.eval_d(x), self.eval_dd(x)]
                .into_iter()
                .collect::<SplineResult<Vec<f64>>>()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            writeln!(out, "{}\t{}\t{}\t{}", x, row[0], row[1], row[2])?;
        }
        Ok(())
    }

    fn info(&self, out: &mut dyn io::Write) -> io::Result<()> {
        write!(
            out,
            "Spline `{}` of type: {} of order: {}",
            self.name(),
            self.kind(),
            self.order()
        )?;
        if self.num_points() > 0 {
            write!(
                out,
                "\nx_min = {} x_max = {}\ny_min = {} y_max = {}",
                self.x_min(),
                self.x_max(),
                self.y_min(),
                self.y_max()
            )?;
        }
        writeln!(out)
    }
}

/// Values that take part in `y_min`/`y_max`.
pub(crate) fn sample_values(kind: SplineKind, y: &[f64]) -> &[f64] {
    if kind == SplineKind::Constant && !y.is_empty() {
        &y[..y.len() - 1]
    } else {
        y
    }
}

/// Value or derivative of the quadratic `v + d dx + dd dx^2 / 2`.
pub(crate) fn extrapolate_quadratic(dx: f64, jet: [f64; 3], order: usize) -> f64 {
    let [v, d, dd] = jet;
    match order {
        0 => v + dx * (d + 0.5 * dd * dx),
        1 => d + dd * dx,
        2 => dd,
        _ => 0.0,
    }
}

/// Maximal strictly increasing runs of `x`. A repeated abscissa closes a
/// run and starts the next one.
pub(crate) fn monotone_runs(x: &[f64]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut begin = 0;
    while begin < x.len() {
        let mut end = begin + 1;
        while end < x.len() && x[end - 1] < x[end] {
            end += 1;
        }
        runs.push(begin..end);
        begin = end;
    }
    runs
}

/// Applies a slope rule to every monotone run of `(x, y)`. Runs made of a
/// single point get a zero slope.
pub(crate) fn slopes_by_run<F>(x: &[f64], y: &[f64], yp: &mut [f64], rule: F)
where
    F: Fn(&[f64], &[f64], &mut [f64]),
{
    for run in monotone_runs(x) {
        if run.len() < 2 {
            yp[run].fill(0.0);
        } else {
            rule(&x[run.clone()], &y[run.clone()], &mut yp[run]);
        }
    }
}

/// Checks that `x` is finite and non-decreasing.
pub(crate) fn check_grid(x: &[f64], name: &str, context: &str) -> SplineResult<()> {
    crate::error::check_nan(x, name, "X")?;
    for w in x.windows(2) {
        if w[1] < w[0] {
            return Err(SplineError::NotIncreasing {
                previous: w[0],
                x: w[1],
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

/// Gathers `n` values `v[0], v[inc], v[2 inc], ...`.
pub(crate) fn gather_strided(v: &[f64], inc: usize, n: usize, context: &str) -> SplineResult<Vec<f64>> {
    if inc == 0 {
        return Err(SplineError::invalid("stride must be positive", context));
    }
    if n > 0 && (n - 1) * inc >= v.len() {
        return Err(SplineError::shape((n - 1) * inc + 1, v.len(), context));
    }
    Ok(v.iter().step_by(inc).take(n).copied().collect())
}

/// Grid and samples owned by a spline, with its range policy and search
/// cache.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Samples {
    pub(crate) name: String,
    pub(crate) x: Vec<f64>,
    pub(crate) y: Vec<f64>,
    pub(crate) check_range: bool,
    cursor: IntervalCursor,
}

impl Samples {
    pub(crate) fn new(
        name: impl Into<String>,
        x: Vec<f64>,
        y: Vec<f64>,
        required: usize,
        context: &str,
    ) -> SplineResult<Self> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(SplineError::shape(x.len(), y.len(), context));
        }
        if x.len() < required {
            return Err(SplineError::insufficient(required, x.len(), context));
        }
        check_grid(&x, &name, context)?;
        crate::error::check_nan(&y, &name, "Y")?;
        Ok(Samples {
            name,
            x,
            y,
            check_range: false,
            cursor: IntervalCursor::new(),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.x.len()
    }

    pub(crate) fn check(&self, at: f64) -> SplineResult<()> {
        let (min, max) = (self.x[0], self.x[self.x.len() - 1]);
        if self.check_range && !(min <= at && at <= max) {
            return Err(SplineError::OutOfRange {
                point: at,
                min,
                max,
                context: format!("{}::search", self.name),
            });
        }
        Ok(())
    }

    /// Interval containing `at`, after the optional range check.
    pub(crate) fn search(&self, at: f64) -> SplineResult<usize> {
        self.check(at)?;
        Ok(self.cursor.find(at, &self.x))
    }

    pub(crate) fn set_origin(&mut self, x0: f64) {
        let shift = x0 - self.x[0];
        self.x.iter_mut().for_each(|x| *x += shift);
        self.cursor.reset();
    }

    /// Remaps the grid and returns the scale factor `S` of the affine map.
    pub(crate) fn set_range(&mut self, xmin: f64, xmax: f64) -> SplineResult<f64> {
        if !(xmax > xmin) {
            return Err(SplineError::invalid(
                format!("bad range [{}, {}]", xmin, xmax),
                "set_range",
            ));
        }
        let (x0, xn) = (self.x[0], self.x[self.x.len() - 1]);
        if !(xn > x0) {
            return Err(SplineError::invalid("spline has an empty range", "set_range"));
        }
        let scale = (xmax - xmin) / (xn - x0);
        self.x.iter_mut().for_each(|x| *x = xmin + (*x - x0) * scale);
        self.cursor.reset();
        Ok(scale)
    }
}

/// Writes the per segment description shared by the Hermite family.
pub(crate) fn write_segments(
    f: &mut fmt::Formatter<'_>,
    samples: &Samples,
    derivatives: &[(&str, &[f64])],
) -> fmt::Result {
    let (x, y) = (&samples.x, &samples.y);
    for i in 0..x.len().saturating_sub(1) {
        write!(f, "segment N.{:4} X:[{}, {}] Y:[{}, {}]", i, x[i], x[i + 1], y[i], y[i + 1])?;
        for (label, values) in derivatives {
            write!(f, " {}:[{}, {}]", label, values[i], values[i + 1])?;
        }
        writeln!(f, " slope: {}", (y[i + 1] - y[i]) / (x[i + 1] - x[i]))?;
    }
    Ok(())
}

/// Any one dimensional spline.
#[derive(Debug, Clone, PartialEq)]
pub enum Spline {
    Constant(ConstantSpline),
    Linear(LinearSpline),
    Cubic(CubicSpline),
    Akima(AkimaSpline),
    Bessel(BesselSpline),
    Pchip(PchipSpline),
    Hermite(HermiteSpline),
    Quintic(QuinticSpline),
    BSpline(BSpline),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Spline::Constant($s) => $body,
            Spline::Linear($s) => $body,
            Spline::Cubic($s) => $body,
            Spline::Akima($s) => $body,
            Spline::Bessel($s) => $body,
            Spline::Pchip($s) => $body,
            Spline::Hermite($s) => $body,
            Spline::Quintic($s) => $body,
            Spline::BSpline($s) => $body,
        }
    };
}

impl Spline {
    /// First derivatives at the nodes, for the Hermite based variants.
    pub fn yp_nodes(&self) -> Option<&[f64]> {
        match self {
            Spline::Cubic(s) => Some(s.yp_nodes()),
            Spline::Akima(s) => Some(s.yp_nodes()),
            Spline::Bessel(s) => Some(s.yp_nodes()),
            Spline::Pchip(s) => Some(s.yp_nodes()),
            Spline::Hermite(s) => Some(s.yp_nodes()),
            Spline::Quintic(s) => Some(s.yp_nodes()),
            _ => None,
        }
    }

    pub fn ypp_nodes(&self) -> Option<&[f64]> {
        match self {
            Spline::Quintic(s) => Some(s.ypp_nodes()),
            _ => None,
        }
    }

    /// Scans the derivative data computed by the build for non finite values.
    pub fn check_nan(&self) -> SplineResult<()> {
        if let Some(yp) = self.yp_nodes() {
            crate::error::check_nan(yp, self.name(), "Yp")?;
        }
        if let Some(ypp) = self.ypp_nodes() {
            crate::error::check_nan(ypp, self.name(), "Ypp")?;
        }
        if let Spline::BSpline(s) = self {
            crate::error::check_nan(s.control_polygon(), self.name(), "yPolygon")?;
        }
        Ok(())
    }

    /// Rebuilds a spline from data whose derivatives are already known.
    pub(crate) fn from_parts(
        kind: SplineKind,
        samples: Samples,
        yp: Option<Vec<f64>>,
        ypp: Option<Vec<f64>>,
    ) -> SplineResult<Spline> {
        let missing = |array: &str| {
            SplineError::invalid(format!("missing {} data", array), "Spline::from_parts")
        };
        Ok(match kind {
            SplineKind::Constant => Spline::Constant(ConstantSpline::from_samples(samples)?),
            SplineKind::Linear => Spline::Linear(LinearSpline::from_samples(samples)?),
            SplineKind::Quintic => Spline::Quintic(QuinticSpline::from_parts(
                samples,
                yp.ok_or_else(|| missing("Yp"))?,
                ypp.ok_or_else(|| missing("Ypp"))?,
            )?),
            SplineKind::BSpline => {
                return Err(SplineError::Unsupported(
                    "bspline can't be rebuilt from node derivatives".to_string(),
                ))
            }
            _ => {
                let base = cubic_base::CubicSplineBase::new(samples, yp.ok_or_else(|| missing("Yp"))?)?;
                match kind {
                    SplineKind::Cubic => Spline::Cubic(CubicSpline::from_base(base)),
                    SplineKind::Akima => Spline::Akima(AkimaSpline { base }),
                    SplineKind::Bessel => Spline::Bessel(BesselSpline { base }),
                    SplineKind::Pchip => Spline::Pchip(PchipSpline { base }),
                    _ => Spline::Hermite(HermiteSpline { base }),
                }
            }
        })
    }
}

impl Interpolant for Spline {
    fn name(&self) -> &str {
        dispatch!(self, s => s.name())
    }

    fn kind(&self) -> SplineKind {
        dispatch!(self, s => s.kind())
    }

    fn order(&self) -> usize {
        dispatch!(self, s => s.order())
    }

    fn x_nodes(&self) -> &[f64] {
        dispatch!(self, s => s.x_nodes())
    }

    fn y_nodes(&self) -> &[f64] {
        dispatch!(self, s => s.y_nodes())
    }

    fn eval(&self, x: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.eval(x))
    }

    fn eval_d(&self, x: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.eval_d(x))
    }

    fn eval_dd(&self, x: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.eval_dd(x))
    }

    fn eval_ddd(&self, x: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.eval_ddd(x))
    }

    fn coeffs(&self) -> SplineResult<PiecewisePolynomial> {
        dispatch!(self, s => s.coeffs())
    }

    fn check_range(&self) -> bool {
        dispatch!(self, s => s.check_range())
    }

    fn set_check_range(&mut self, check_range: bool) {
        dispatch!(self, s => s.set_check_range(check_range))
    }

    fn set_origin(&mut self, x0: f64) {
        dispatch!(self, s => s.set_origin(x0))
    }

    fn set_range(&mut self, xmin: f64, xmax: f64) -> SplineResult<()> {
        dispatch!(self, s => s.set_range(xmin, xmax))
    }

    fn y_min(&self) -> f64 {
        dispatch!(self, s => s.y_min())
    }

    fn y_max(&self) -> f64 {
        dispatch!(self, s => s.y_max())
    }
}

impl fmt::Display for Spline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, s => fmt::Display::fmt(s, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in SplineKind::ALL {
            assert_eq!(kind.name().parse::<SplineKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
        assert_eq!(" Akima ".parse::<SplineKind>().unwrap(), SplineKind::Akima);
        assert_eq!(
            "foo".parse::<SplineKind>(),
            Err(SplineError::UnknownKind("foo".to_string()))
        );
    }

    #[test]
    fn runs_split_on_repeated_abscissae() {
        assert_eq!(monotone_runs(&[0.0, 1.0, 2.0]), vec![0..3]);
        assert_eq!(monotone_runs(&[0.0, 1.0, 1.0, 2.0]), vec![0..2, 2..4]);
        assert_eq!(monotone_runs(&[0.0, 1.0, 1.0, 1.0, 2.0]), vec![0..2, 2..3, 3..5]);
        assert!(monotone_runs(&[]).is_empty());
    }

    #[test]
    fn strided_gather() {
        let v = [0.0, 10.0, 1.0, 11.0, 2.0, 12.0];
        assert_eq!(gather_strided(&v, 2, 3, "t").unwrap(), vec![0.0, 1.0, 2.0]);
        assert_eq!(gather_strided(&v[1..], 2, 3, "t").unwrap(), vec![10.0, 11.0, 12.0]);
        assert!(gather_strided(&v, 2, 4, "t").is_err());
        assert!(gather_strided(&v, 0, 1, "t").is_err());
    }

    #[test]
    fn samples_validation() {
        assert!(matches!(
            Samples::new("s", vec![0.0, 1.0], vec![0.0], 2, "t"),
            Err(SplineError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Samples::new("s", vec![0.0], vec![0.0], 2, "t"),
            Err(SplineError::InsufficientData { .. })
        ));
        assert!(matches!(
            Samples::new("s", vec![0.0, 2.0, 1.0], vec![0.0; 3], 2, "t"),
            Err(SplineError::NotIncreasing { .. })
        ));
        assert!(matches!(
            Samples::new("s", vec![0.0, 1.0], vec![0.0, f64::NAN], 2, "t"),
            Err(SplineError::NotFinite { array: "Y", .. })
        ));
    }

    #[test]
    fn samples_range() {
        let mut samples = Samples::new("s", vec![1.0, 2.0, 4.0], vec![0.0; 3], 2, "t").unwrap();
        assert_eq!(samples.search(3.0).unwrap(), 1);
        samples.check_range = true;
        assert!(samples.search(5.0).is_err());

        samples.set_origin(0.0);
        assert_eq!(samples.x, vec![0.0, 1.0, 3.0]);
        let scale = samples.set_range(10.0, 16.0).unwrap();
        assert_eq!(scale, 2.0);
        assert_eq!(samples.x, vec![10.0, 12.0, 16.0]);
        assert!(samples.set_range(1.0, 1.0).is_err());
    }

    #[test]
    fn quadratic_extrapolation() {
        let jet = [1.0, 2.0, 4.0];
        assert_eq!(extrapolate_quadratic(0.5, jet, 0), 1.0 + 1.0 + 0.5);
        assert_eq!(extrapolate_quadratic(0.5, jet, 1), 4.0);
        assert_eq!(extrapolate_quadratic(0.5, jet, 2), 4.0);
        assert_eq!(extrapolate_quadratic(0.5, jet, 3), 0.0);
    }
}
