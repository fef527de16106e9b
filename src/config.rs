//! Serializable build descriptions.
//!
//! Each description deserializes from any serde format and builds the
//! runtime object with the matching builder.
//! # Example
//! ```
//! use piecewise_spline::{Interpolant, SplineConfig};
//!
//! let config: SplineConfig = serde_json::from_str(
//!     r#"{ "kind": "cubic", "x": [0, 1, 2], "y": [0, 1, 0], "ddy0": 1.0 }"#,
//! ).unwrap();
//! let spline = config.build().unwrap();
//! assert_eq!(spline.num_points(), 3);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{SplineError, SplineResult},
    spline::{Spline, SplineBuilder, SplineKind},
    spline_set::{SplineSet, SplineSetBuilder},
    surface::{SurfaceBuilder, SurfaceKind, SurfaceSpline},
};

/// One dimensional spline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineConfig {
    pub kind: SplineKind,
    #[serde(default)]
    pub name: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Slopes, Hermite splines only.
    #[serde(default)]
    pub yp: Option<Vec<f64>>,
    #[serde(default)]
    pub check_range: bool,
    #[serde(default)]
    pub ddy0: Option<f64>,
    #[serde(default)]
    pub ddyn: Option<f64>,
    #[serde(default)]
    pub degree: Option<usize>,
}

impl SplineConfig {
    pub fn build(&self) -> SplineResult<Spline> {
        let mut builder = SplineBuilder::new(self.kind)
            .check_range(self.check_range)
            .end_conditions(self.ddy0.unwrap_or(0.0), self.ddyn.unwrap_or(0.0));
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(degree) = self.degree {
            builder = builder.degree(degree);
        }
        match &self.yp {
            Some(yp) => builder.build_hermite(&self.x, &self.y, yp),
            None => builder.build_from(&self.x, &self.y),
        }
    }
}

/// Sample values of the members of a spline set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnData {
    /// Matrix with one row per grid point and one column per member.
    Rows { rows: Vec<Vec<f64>> },
    /// One list per member, in header order.
    Columns(Vec<Vec<f64>>),
    /// Lists keyed by header. Headers and types follow the key order.
    ByHeader(BTreeMap<String, Vec<f64>>),
}

/// Spline set, laid out like the tables it usually comes from.
/// # Example
/// ```
/// use piecewise_spline::SplineSetConfig;
///
/// let config: SplineSetConfig = serde_json::from_str(r#"{
///     "name": "track",
///     "headers": ["s", "k"],
///     "spline_type": ["linear", "pchip"],
///     "xdata": [0, 1, 2],
///     "ydata": { "rows": [[0, 1], [1, 3], [2, 4]] }
/// }"#).unwrap();
/// let set = config.build().unwrap();
/// assert_eq!(set.y_nodes("k").unwrap(), &[1.0, 3.0, 4.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineSetConfig {
    #[serde(default)]
    pub name: String,
    /// Required unless `ydata` is keyed by header.
    #[serde(default)]
    pub headers: Vec<String>,
    pub spline_type: Vec<SplineKind>,
    pub xdata: Vec<f64>,
    pub ydata: ColumnData,
    /// Slopes of the Hermite members, keyed by header.
    #[serde(default)]
    pub ypdata: Option<BTreeMap<String, Vec<f64>>>,
    #[serde(default)]
    pub check_range: bool,
}

impl SplineSetConfig {
    /// Headers and sample columns in member order.
    fn columns(&self, context: &str) -> SplineResult<(Vec<String>, Vec<Vec<f64>>)> {
        let nspl = self.spline_type.len();
        let check_headers = || {
            if self.headers.len() != nspl {
                return Err(SplineError::invalid(
                    format!("expected {} headers, found {}", nspl, self.headers.len()),
                    context,
                ));
            }
            Ok(self.headers.clone())
        };
        match &self.ydata {
            ColumnData::Rows { rows } => {
                let headers = check_headers()?;
                if rows.len() != self.xdata.len() {
                    return Err(SplineError::shape(self.xdata.len(), rows.len(), context));
                }
                let mut columns = vec![Vec::with_capacity(rows.len()); nspl];
                for row in rows {
                    if row.len() != nspl {
                        return Err(SplineError::shape(nspl, row.len(), context));
                    }
                    for (column, value) in columns.iter_mut().zip(row) {
                        column.push(*value);
                    }
                }
                Ok((headers, columns))
            }
            ColumnData::Columns(columns) => {
                let headers = check_headers()?;
                if columns.len() != nspl {
                    return Err(SplineError::shape(nspl, columns.len(), context));
                }
                Ok((headers, columns.clone()))
            }
            ColumnData::ByHeader(map) => {
                if map.len() != nspl {
                    return Err(SplineError::shape(nspl, map.len(), context));
                }
                Ok(map.iter().map(|(h, y)| (h.clone(), y.clone())).unzip())
            }
        }
    }

    pub fn build(&self) -> SplineResult<SplineSet> {
        let context = format!("SplineSet[{}]::setup", self.name);
        let (headers, columns) = self.columns(&context)?;
        let npts = self.xdata.len();

        let mut slopes = self.ypdata.clone().unwrap_or_default();
        let mut builder = SplineSetBuilder::new(self.name.clone())
            .x(&self.xdata)
            .check_range(self.check_range);
        for ((header, kind), mut y) in headers.into_iter().zip(&self.spline_type).zip(columns) {
            // step splines may omit the value after the last step
            if *kind == SplineKind::Constant && npts > 0 && y.len() + 1 == npts {
                if let Some(&last) = y.last() {
                    y.push(last);
                }
            }
            builder = match slopes.remove(&header) {
                Some(yp) if *kind == SplineKind::Hermite => builder.hermite_column(header, &y, &yp),
                Some(_) => {
                    return Err(SplineError::invalid(
                        format!("`ypdata` given for {} spline `{}`", kind, header),
                        &context,
                    ))
                }
                None => builder.column(header, *kind, &y),
            };
        }
        if let Some(header) = slopes.keys().next() {
            return Err(SplineError::UnknownSpline(header.clone()));
        }
        builder.build()
    }
}

/// Surface on a rectangular grid, `z` given as one row per x node unless
/// the storage flags say otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub kind: SurfaceKind,
    #[serde(default)]
    pub name: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
    #[serde(default)]
    pub fortran_storage: bool,
    #[serde(default)]
    pub transposed: bool,
    #[serde(default)]
    pub check_range: bool,
}

impl SurfaceConfig {
    pub fn build(&self) -> SplineResult<SurfaceSpline> {
        let mut builder = SurfaceBuilder::new(self.kind)
            .fortran_storage(self.fortran_storage)
            .transposed(self.transposed)
            .check_range(self.check_range);
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        let ldz = self.z.first().map_or(0, Vec::len);
        if let Some(row) = self.z.iter().find(|row| row.len() != ldz) {
            return Err(SplineError::shape(ldz, row.len(), "SurfaceConfig::build"));
        }
        let flat: Vec<f64> = self.z.concat();
        builder.build_strided(&self.x, 1, &self.y, 1, &flat, ldz.max(1), self.x.len(), self.y.len())
    }
}
