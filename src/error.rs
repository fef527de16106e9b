/// Result type used by every fallible operation of the crate.
pub type SplineResult<T> = Result<T, SplineError>;

/// Errors raised while building or querying splines, surfaces and spline sets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    /// Too few points to build the requested interpolant.
    #[error("Error in {context}: need at least {required} points, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize,
        context: String,
    },

    /// Input arrays have mismatched lengths.
    #[error("Error in {context}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },

    /// Abscissae decrease, either in the supplied grid or in an append.
    #[error("Error in {context}: x = {x} follows {previous}, abscissae must be non-decreasing")]
    NotIncreasing {
        previous: f64,
        x: f64,
        context: String,
    },

    /// Query point outside `[min, max]` while range checking is enabled.
    #[error("Error in {context}: {point} is out of range [{min}, {max}]")]
    OutOfRange {
        point: f64,
        min: f64,
        max: f64,
        context: String,
    },

    #[error("Error in {context}: {message}")]
    InvalidParameter { message: String, context: String },

    /// The spline designated as independent variable is not strictly monotone.
    #[error("spline `{name}` is not strictly monotone and can't be used as independent")]
    NotMonotone { name: String },

    /// No point of the independent spline reaches the requested value.
    #[error("no intersection of spline `{name}` with value {zeta}")]
    NoIntersection { name: String, zeta: f64 },

    /// A build produced NaN or infinite values.
    #[error("found non finite value in {array}[{index}] of `{name}`")]
    NotFinite {
        name: String,
        array: &'static str,
        index: usize,
    },

    #[error("unknown spline type `{0}`")]
    UnknownKind(String),

    #[error("spline `{0}` not found")]
    UnknownSpline(String),

    /// Operation that a given variant does not provide.
    #[error("{0}")]
    Unsupported(String),

    #[error("arena exhausted: requested {requested} values, {available} available")]
    ArenaExhausted { requested: usize, available: usize },

    #[error("{0} is not built")]
    NotBuilt(String),
}

impl SplineError {
    pub(crate) fn insufficient(required: usize, actual: usize, context: &str) -> Self {
        SplineError::InsufficientData {
            required,
            actual,
            context: context.to_string(),
        }
    }

    pub(crate) fn shape(expected: usize, actual: usize, context: &str) -> Self {
        SplineError::ShapeMismatch {
            expected,
            actual,
            context: context.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>, context: &str) -> Self {
        SplineError::InvalidParameter {
            message: message.into(),
            context: context.to_string(),
        }
    }
}

/// Scans `values` for NaN or infinities.
///
/// Used after a build to surface bad input data early instead of letting
/// non finite derivatives propagate into every evaluation.
/// # Example
/// ```
/// use piecewise_spline::check_nan;
///
/// assert!(check_nan(&[1.0, 2.0], "spline", "Yp").is_ok());
/// assert!(check_nan(&[1.0, f64::NAN], "spline", "Yp").is_err());
/// ```
pub fn check_nan(values: &[f64], name: &str, array: &'static str) -> SplineResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => {
            log::warn!("found non finite value in {}[{}] of `{}`", array, index, name);
            Err(SplineError::NotFinite {
                name: name.to_string(),
                array,
                index,
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let error = SplineError::insufficient(2, 1, "CubicSpline::build");
        assert_eq!(
            error.to_string(),
            "Error in CubicSpline::build: need at least 2 points, got 1"
        );

        let error = SplineError::OutOfRange {
            point: 3.0,
            min: 0.0,
            max: 2.0,
            context: "search".to_string(),
        };
        assert_eq!(error.to_string(), "Error in search: 3 is out of range [0, 2]");
    }

    #[test]
    fn check_nan_reports_first_bad_index() {
        let values = vec![0.0, 1.0, f64::INFINITY, f64::NAN];
        let error = check_nan(&values, "s", "Ypp").unwrap_err();
        assert_eq!(
            error,
            SplineError::NotFinite {
                name: "s".to_string(),
                array: "Ypp",
                index: 2
            }
        );
        assert!(check_nan(&[], "s", "Y").is_ok());
    }
}
