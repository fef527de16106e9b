//! Several splines sharing one grid, with evaluation through any strictly
//! monotone member used as independent variable.

use std::{collections::BTreeMap, io};

use crate::{
    arena::{ArenaBlock, ValueArena},
    error::{check_nan, SplineError, SplineResult},
    monotonicity::{check_cubic_spline_monotonicity, check_data_monotonicity, Monotonicity},
    roots::cubic_roots,
    search::IntervalCursor,
    spline::{
        akima_slopes, bessel_slopes, check_grid, cubic_slopes, eval_constant, eval_cubic, eval_linear,
        eval_quintic, pchip_slopes, quintic_slopes, sample_values, Interpolant, Samples, Spline, SplineKind,
    },
};

const MAX_ORDER: usize = 3;
const NEWTON_STEPS: usize = 8;

/// Selects a member of a [SplineSet] by position or by header.
pub trait SplineIndex {
    fn position_in(&self, set: &SplineSet) -> SplineResult<usize>;
}

impl SplineIndex for usize {
    fn position_in(&self, set: &SplineSet) -> SplineResult<usize> {
        if *self < set.num_splines() {
            Ok(*self)
        } else {
            Err(SplineError::UnknownSpline(format!("n.{} of SplineSet[{}]", self, set.name)))
        }
    }
}

impl SplineIndex for &str {
    fn position_in(&self, set: &SplineSet) -> SplineResult<usize> {
        set.position(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Member {
    header: String,
    kind: SplineKind,
    y: ArenaBlock,
    yp: Option<ArenaBlock>,
    ypp: Option<ArenaBlock>,
    y_min: f64,
    y_max: f64,
    monotonicity: Monotonicity,
}

/// Splines of several kinds built on a common abscissa grid.
///
/// Grid, samples and derivative data of every member live in one
/// [ValueArena]. Besides the plain evaluation at `x`, the `eval2` family
/// evaluates every member at the `x` where a strictly monotone member takes
/// the value `zeta`, optionally differentiating with respect to `zeta`.
/// # Example
/// ```
/// use piecewise_spline::{SplineKind, SplineSetBuilder};
/// use assert_approx_eq::assert_approx_eq;
///
/// let set = SplineSetBuilder::new("track")
///     .x(&[0.0, 1.0, 2.0, 3.0])
///     .column("s", SplineKind::Pchip, &[0.0, 1.0, 3.0, 4.0])
///     .column("v", SplineKind::Linear, &[2.0, 2.0, 4.0, 0.0])
///     .build()
///     .unwrap();
///
/// assert_approx_eq!(set.eval_at(1.5, "v").unwrap(), 3.0, 1e-12);
/// // x where s = 3 is 2
/// assert_approx_eq!(set.eval2_at(3.0, "s", "v").unwrap(), 4.0, 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SplineSet {
    name: String,
    arena: ValueArena,
    x: ArenaBlock,
    members: Vec<Member>,
    positions: BTreeMap<String, usize>,
    check_range: bool,
    cursor: IntervalCursor,
}

impl SplineSet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_points(&self) -> usize {
        self.x.len()
    }

    pub fn num_splines(&self) -> usize {
        self.members.len()
    }

    pub fn header(&self, spl: usize) -> Option<&str> {
        self.members.get(spl).map(|m| m.header.as_str())
    }

    pub fn headers(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.header.as_str()).collect()
    }

    pub fn position(&self, header: &str) -> SplineResult<usize> {
        self.positions
            .get(header)
            .copied()
            .ok_or_else(|| SplineError::UnknownSpline(format!("`{}` of SplineSet[{}]", header, self.name)))
    }

    pub fn kind(&self, spl: impl SplineIndex) -> SplineResult<SplineKind> {
        Ok(self.member(spl)?.kind)
    }

    pub fn monotonicity(&self, spl: impl SplineIndex) -> SplineResult<Monotonicity> {
        Ok(self.member(spl)?.monotonicity)
    }

    /// True when the member is non-decreasing, possibly with flat parts.
    pub fn is_monotone(&self, spl: impl SplineIndex) -> SplineResult<bool> {
        Ok(self.monotonicity(spl)? >= Monotonicity::Weakly)
    }

    pub fn x_nodes(&self) -> &[f64] {
        self.arena.slice(self.x)
    }

    pub fn y_nodes(&self, spl: impl SplineIndex) -> SplineResult<&[f64]> {
        Ok(self.arena.slice(self.member(spl)?.y))
    }

    /// Node slopes of the members that carry them.
    pub fn yp_nodes(&self, spl: impl SplineIndex) -> SplineResult<Option<&[f64]>> {
        Ok(self.member(spl)?.yp.map(|block| self.arena.slice(block)))
    }

    pub fn x_node(&self, npt: usize) -> Option<f64> {
        self.x_nodes().get(npt).copied()
    }

    pub fn y_node(&self, npt: usize, spl: impl SplineIndex) -> SplineResult<f64> {
        let y = self.y_nodes(spl)?;
        y.get(npt).copied().ok_or_else(|| {
            SplineError::invalid(
                format!("node {} out of {} points", npt, y.len()),
                &format!("SplineSet[{}]::y_node", self.name),
            )
        })
    }

    pub fn x_min(&self) -> f64 {
        self.x_nodes()[0]
    }

    pub fn x_max(&self) -> f64 {
        self.x_nodes()[self.x.len() - 1]
    }

    pub fn y_min(&self, spl: impl SplineIndex) -> SplineResult<f64> {
        Ok(self.member(spl)?.y_min)
    }

    pub fn y_max(&self, spl: impl SplineIndex) -> SplineResult<f64> {
        Ok(self.member(spl)?.y_max)
    }

    pub fn check_range(&self) -> bool {
        self.check_range
    }

    pub fn set_check_range(&mut self, check_range: bool) {
        self.check_range = check_range;
    }

    /// Stand-alone copy of a member.
    pub fn spline(&self, spl: impl SplineIndex) -> SplineResult<Spline> {
        let member = self.member(spl)?;
        let context = format!("SplineSet[{}]::spline", self.name);
        let samples = Samples::new(
            member.header.clone(),
            self.x_nodes().to_vec(),
            self.arena.slice(member.y).to_vec(),
            2,
            &context,
        )?;
        let copy = |block: Option<ArenaBlock>| block.map(|b| self.arena.slice(b).to_vec());
        let mut spline = Spline::from_parts(member.kind, samples, copy(member.yp), copy(member.ypp))?;
        spline.set_check_range(self.check_range);
        Ok(spline)
    }

    fn member(&self, spl: impl SplineIndex) -> SplineResult<&Member> {
        Ok(&self.members[spl.position_in(self)?])
    }

    fn locate(&self, x: f64) -> SplineResult<usize> {
        let grid = self.x_nodes();
        let (min, max) = (grid[0], grid[grid.len() - 1]);
        if self.check_range && !(min <= x && x <= max) {
            return Err(SplineError::OutOfRange {
                point: x,
                min,
                max,
                context: format!("SplineSet[{}]::eval", self.name),
            });
        }
        Ok(self.cursor.find(x, grid))
    }

    fn member_value(&self, member: &Member, interval: usize, at: f64, order: usize) -> f64 {
        let x = self.x_nodes();
        let y = self.arena.slice(member.y);
        match member.kind {
            SplineKind::Constant => eval_constant(x, y, interval, at, order),
            SplineKind::Linear => eval_linear(x, y, interval, at, order),
            _ => match (member.yp, member.ypp) {
                (Some(yp), Some(ypp)) => eval_quintic(
                    x,
                    y,
                    self.arena.slice(yp),
                    self.arena.slice(ypp),
                    interval,
                    at,
                    order,
                ),
                (Some(yp), None) => eval_cubic(x, y, self.arena.slice(yp), interval, at, order),
                _ => eval_linear(x, y, interval, at, order),
            },
        }
    }

    fn check_order(&self, order: usize) -> SplineResult<()> {
        if order > MAX_ORDER {
            return Err(SplineError::invalid(
                format!("derivative order {} not in 0..={}", order, MAX_ORDER),
                &format!("SplineSet[{}]::eval", self.name),
            ));
        }
        Ok(())
    }

    fn value_at(&self, x: f64, spl: impl SplineIndex, order: usize) -> SplineResult<f64> {
        let member = self.member(spl)?;
        let interval = self.locate(x)?;
        Ok(self.member_value(member, interval, x, order))
    }

    fn values(&self, x: f64, order: usize) -> SplineResult<Vec<f64>> {
        self.check_order(order)?;
        let interval = self.locate(x)?;
        Ok(self
            .members
            .iter()
            .map(|m| self.member_value(m, interval, x, order))
            .collect())
    }

    pub fn eval_at(&self, x: f64, spl: impl SplineIndex) -> SplineResult<f64> {
        self.value_at(x, spl, 0)
    }

    pub fn eval_d_at(&self, x: f64, spl: impl SplineIndex) -> SplineResult<f64> {
        self.value_at(x, spl, 1)
    }

    pub fn eval_dd_at(&self, x: f64, spl: impl SplineIndex) -> SplineResult<f64> {
        self.value_at(x, spl, 2)
    }

    pub fn eval_ddd_at(&self, x: f64, spl: impl SplineIndex) -> SplineResult<f64> {
        self.value_at(x, spl, 3)
    }

    /// Values of every member at `x`, in header order.
    pub fn eval(&self, x: f64) -> SplineResult<Vec<f64>> {
        self.values(x, 0)
    }

    pub fn eval_d(&self, x: f64) -> SplineResult<Vec<f64>> {
        self.values(x, 1)
    }

    pub fn eval_dd(&self, x: f64) -> SplineResult<Vec<f64>> {
        self.values(x, 2)
    }

    pub fn eval_ddd(&self, x: f64) -> SplineResult<Vec<f64>> {
        self.values(x, 3)
    }

    /// Writes the derivative of order `order` of member `k` to `out[k * incy]`.
    pub fn eval_into(&self, x: f64, order: usize, out: &mut [f64], incy: usize) -> SplineResult<()> {
        let values = self.values(x, order)?;
        self.scatter(&values, out, incy)
    }

    /// Name keyed values of all members, or of `columns` only.
    pub fn eval_map(&self, x: f64, order: usize, columns: Option<&[&str]>) -> SplineResult<BTreeMap<String, f64>> {
        let values = self.values(x, order)?;
        self.keyed(&values, columns)
    }

    /// Name keyed columns of values at every point of `xs`.
    pub fn eval_batch(
        &self,
        xs: &[f64],
        order: usize,
        columns: Option<&[&str]>,
    ) -> SplineResult<BTreeMap<String, Vec<f64>>> {
        self.batch(xs, columns, |x| self.values(x, order))
    }

    /// Abscissa where the strictly monotone member `indep` equals `zeta`.
    ///
    /// The bracketing segment is found by bisection of the member's samples,
    /// then the cubic Hermite segment is inverted in closed form. Quintic
    /// members refine that estimate with a few Newton steps.
    pub fn intersect(&self, zeta: f64, indep: impl SplineIndex) -> SplineResult<f64> {
        let member = self.member(indep)?;
        let context = format!("SplineSet[{}]::intersect", self.name);
        if !member.monotonicity.is_invertible() {
            log::warn!("SplineSet[{}]: `{}` {}", self.name, member.header, member.monotonicity);
            return Err(SplineError::NotMonotone {
                name: member.header.clone(),
            });
        }
        let x = self.x_nodes();
        let y = self.arena.slice(member.y);
        let n = y.len();
        if !(y[0] <= zeta && zeta <= y[n - 1]) {
            log::warn!("SplineSet[{}]: zeta = {} out of the range of `{}`", self.name, zeta, member.header);
            return Err(SplineError::OutOfRange {
                point: zeta,
                min: y[0],
                max: y[n - 1],
                context,
            });
        }

        let mut i = y.partition_point(|v| *v < zeta).saturating_sub(1).min(n - 2);
        if y[i] == y[i + 1] {
            i = (i + 1).min(n - 2);
        }
        let (a, b, ya, yb) = (x[i], x[i + 1], y[i], y[i + 1]);
        if !(a < b) {
            return Err(SplineError::invalid(format!("bad x interval [{}, {}]", a, b), &context));
        }
        let dx = b - a;
        let dy = yb - ya;
        let yp = match member.yp {
            Some(yp) if member.kind != SplineKind::Linear => self.arena.slice(yp),
            _ => return Ok(a + dx * (zeta - ya) / dy),
        };

        let (dya, dyb) = (yp[i], yp[i + 1]);
        let coefficients = [
            ya - zeta,
            dya,
            (3.0 * dy / dx - 2.0 * dya - dyb) / dx,
            (dyb + dya - 2.0 * dy / dx) / (dx * dx),
        ];
        let tolerance = 1e-10 * dx;
        let s = cubic_roots(&coefficients)
            .real_in(-tolerance, dx + tolerance)
            .ok_or_else(|| {
                log::warn!("SplineSet[{}]: no intersection of `{}` with {}", self.name, member.header, zeta);
                SplineError::NoIntersection {
                    name: member.header.clone(),
                    zeta,
                }
            })?;
        let root = a + s.clamp(0.0, dx);
        if member.kind == SplineKind::Quintic {
            return Ok(self.newton(member, i, root, zeta));
        }
        Ok(root)
    }

    fn newton(&self, member: &Member, interval: usize, mut root: f64, zeta: f64) -> f64 {
        let (a, b) = (self.x_nodes()[interval], self.x_nodes()[interval + 1]);
        for _ in 0..NEWTON_STEPS {
            let residual = self.member_value(member, interval, root, 0) - zeta;
            let slope = self.member_value(member, interval, root, 1);
            if slope <= 0.0 {
                break;
            }
            let next = (root - residual / slope).clamp(a, b);
            let step = (next - root).abs();
            root = next;
            if step <= f64::EPSILON * (b - a) {
                break;
            }
        }
        root
    }

    /// Chain rule factors `[x', x'', x''']` of `x(zeta)` from the derivatives
    /// of the independent member at `x`.
    fn inverse_jet(&self, member: &Member, interval: usize, x: f64) -> [f64; 3] {
        let dt = 1.0 / self.member_value(member, interval, x, 1);
        let ddt = -self.member_value(member, interval, x, 2) * dt.powi(3);
        let dddt = 3.0 * ddt * ddt / dt - self.member_value(member, interval, x, 3) * dt.powi(4);
        [dt, ddt, dddt]
    }

    fn value2(&self, member: &Member, interval: usize, x: f64, jet: [f64; 3], order: usize) -> f64 {
        let [dt, ddt, dddt] = jet;
        let f = |k: usize| self.member_value(member, interval, x, k);
        match order {
            0 => f(0),
            1 => f(1) * dt,
            2 => f(2) * dt * dt + f(1) * ddt,
            _ => f(3) * dt.powi(3) + 3.0 * f(2) * dt * ddt + f(1) * dddt,
        }
    }

    fn values2(&self, zeta: f64, indep: impl SplineIndex, order: usize) -> SplineResult<Vec<f64>> {
        self.check_order(order)?;
        let indep = indep.position_in(self)?;
        let x = self.intersect(zeta, indep)?;
        let interval = self.cursor.find(x, self.x_nodes());
        let jet = self.inverse_jet(&self.members[indep], interval, x);
        Ok(self
            .members
            .iter()
            .map(|m| self.value2(m, interval, x, jet, order))
            .collect())
    }

    fn value2_at(&self, zeta: f64, indep: impl SplineIndex, spl: impl SplineIndex, order: usize) -> SplineResult<f64> {
        let indep = indep.position_in(self)?;
        let member = self.member(spl)?;
        let x = self.intersect(zeta, indep)?;
        let interval = self.cursor.find(x, self.x_nodes());
        let jet = self.inverse_jet(&self.members[indep], interval, x);
        Ok(self.value2(member, interval, x, jet, order))
    }

    /// Values of every member where `indep` equals `zeta`.
    pub fn eval2(&self, zeta: f64, indep: impl SplineIndex) -> SplineResult<Vec<f64>> {
        self.values2(zeta, indep, 0)
    }

    /// Derivatives of every member with respect to `zeta`.
    pub fn eval2_d(&self, zeta: f64, indep: impl SplineIndex) -> SplineResult<Vec<f64>> {
        self.values2(zeta, indep, 1)
    }

    pub fn eval2_dd(&self, zeta: f64, indep: impl SplineIndex) -> SplineResult<Vec<f64>> {
        self.values2(zeta, indep, 2)
    }

    pub fn eval2_ddd(&self, zeta: f64, indep: impl SplineIndex) -> SplineResult<Vec<f64>> {
        self.values2(zeta, indep, 3)
    }

    pub fn eval2_at(&self, zeta: f64, indep: impl SplineIndex, spl: impl SplineIndex) -> SplineResult<f64> {
        self.value2_at(zeta, indep, spl, 0)
    }

    pub fn eval2_d_at(&self, zeta: f64, indep: impl SplineIndex, spl: impl SplineIndex) -> SplineResult<f64> {
        self.value2_at(zeta, indep, spl, 1)
    }

    pub fn eval2_dd_at(&self, zeta: f64, indep: impl SplineIndex, spl: impl SplineIndex) -> SplineResult<f64> {
        self.value2_at(zeta, indep, spl, 2)
    }

    pub fn eval2_ddd_at(&self, zeta: f64, indep: impl SplineIndex, spl: impl SplineIndex) -> SplineResult<f64> {
        self.value2_at(zeta, indep, spl, 3)
    }

    pub fn eval2_into(
        &self,
        zeta: f64,
        indep: impl SplineIndex,
        order: usize,
        out: &mut [f64],
        incy: usize,
    ) -> SplineResult<()> {
        let values = self.values2(zeta, indep, order)?;
        self.scatter(&values, out, incy)
    }

    pub fn eval2_map(
        &self,
        zeta: f64,
        indep: impl SplineIndex,
        order: usize,
        columns: Option<&[&str]>,
    ) -> SplineResult<BTreeMap<String, f64>> {
        let values = self.values2(zeta, indep, order)?;
        self.keyed(&values, columns)
    }

    pub fn eval2_batch(
        &self,
        zetas: &[f64],
        indep: impl SplineIndex,
        order: usize,
        columns: Option<&[&str]>,
    ) -> SplineResult<BTreeMap<String, Vec<f64>>> {
        let indep = indep.position_in(self)?;
        self.batch(zetas, columns, |zeta| self.values2(zeta, indep, order))
    }

    fn scatter(&self, values: &[f64], out: &mut [f64], incy: usize) -> SplineResult<()> {
        let context = format!("SplineSet[{}]::eval", self.name);
        if incy == 0 {
            return Err(SplineError::invalid("stride must be positive", &context));
        }
        let required = values.len().saturating_sub(1) * incy + 1;
        if out.len() < required {
            return Err(SplineError::shape(required, out.len(), &context));
        }
        for (k, value) in values.iter().enumerate() {
            out[k * incy] = *value;
        }
        Ok(())
    }

    fn selected(&self, columns: Option<&[&str]>) -> SplineResult<Vec<usize>> {
        match columns {
            Some(columns) => columns.iter().map(|c| self.position(c)).collect(),
            None => Ok((0..self.members.len()).collect()),
        }
    }

    fn keyed(&self, values: &[f64], columns: Option<&[&str]>) -> SplineResult<BTreeMap<String, f64>> {
        Ok(self
            .selected(columns)?
            .into_iter()
            .map(|k| (self.members[k].header.clone(), values[k]))
            .collect())
    }

    fn batch<F>(&self, points: &[f64], columns: Option<&[&str]>, values: F) -> SplineResult<BTreeMap<String, Vec<f64>>>
    where
        F: Fn(f64) -> SplineResult<Vec<f64>>,
    {
        let selected = self.selected(columns)?;
        let mut result: BTreeMap<String, Vec<f64>> = selected
            .iter()
            .map(|k| (self.members[*k].header.clone(), Vec::with_capacity(points.len())))
            .collect();
        for point in points {
            let row = values(*point)?;
            for k in &selected {
                if let Some(column) = result.get_mut(&self.members[*k].header) {
                    column.push(row[*k]);
                }
            }
        }
        Ok(result)
    }

    /// Writes the set description followed by the description of each member.
    pub fn info(&self, out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(
            out,
            "SplineSet[{}] n.points = {} n.splines = {}",
            self.name,
            self.num_points(),
            self.num_splines()
        )?;
        for (i, member) in self.members.iter().enumerate() {
            writeln!(out, "\nSpline n.{} {}", i, member.monotonicity)?;
            let spline = self
                .spline(i)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            spline.info(out)?;
        }
        Ok(())
    }

    /// Writes `num_points` equispaced rows `s\t<value of each member>`.
    pub fn dump_table(&self, out: &mut dyn io::Write, num_points: usize) -> io::Result<()> {
        write!(out, "s")?;
        for member in &self.members {
            write!(out, "\t{}", member.header)?;
        }
        writeln!(out)?;
        let num_points = num_points.max(2);
        let (xmin, xmax) = (self.x_min(), self.x_max());
        for j in 0..num_points {
            let s = xmin + (xmax - xmin) * j as f64 / (num_points - 1) as f64;
            let values = self
                .eval(s)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            write!(out, "{}", s)?;
            for value in values {
                write!(out, "\t{}", value)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    header: String,
    kind: SplineKind,
    y: Vec<f64>,
    yp: Option<Vec<f64>>,
}

impl Column {
    /// Derivative arrays stored next to the samples.
    fn num_derivatives(&self) -> usize {
        match self.kind {
            SplineKind::Constant | SplineKind::Linear => 0,
            SplineKind::Quintic => 2,
            _ => 1,
        }
    }

    fn derivatives(&self, x: &[f64]) -> (Option<Vec<f64>>, Option<Vec<f64>>) {
        let n = x.len();
        let mut yp = vec![0.0; n];
        match self.kind {
            SplineKind::Constant | SplineKind::Linear | SplineKind::BSpline => return (None, None),
            SplineKind::Hermite => return (self.yp.clone(), None),
            SplineKind::Quintic => {
                let mut ypp = vec![0.0; n];
                quintic_slopes(x, &self.y, &mut yp, &mut ypp);
                return (Some(yp), Some(ypp));
            }
            SplineKind::Cubic => cubic_slopes(x, &self.y, &mut yp, 0.0, 0.0),
            SplineKind::Akima => akima_slopes(x, &self.y, &mut yp),
            SplineKind::Bessel => bessel_slopes(x, &self.y, &mut yp),
            SplineKind::Pchip => pchip_slopes(x, &self.y, &mut yp),
        }
        (Some(yp), None)
    }
}

/// Collects the grid and the columns of a [SplineSet].
#[derive(Debug, Clone, PartialEq)]
pub struct SplineSetBuilder {
    name: String,
    x: Vec<f64>,
    columns: Vec<Column>,
    arena: Option<ValueArena>,
    check_range: bool,
    check_nan: bool,
}

impl SplineSetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        SplineSetBuilder {
            name: name.into(),
            x: Vec::new(),
            columns: Vec::new(),
            arena: None,
            check_range: false,
            check_nan: true,
        }
    }

    /// The shared grid.
    pub fn x(mut self, x: &[f64]) -> Self {
        self.x = x.to_vec();
        self
    }

    pub fn column(mut self, header: impl Into<String>, kind: SplineKind, y: &[f64]) -> Self {
        self.columns.push(Column {
            header: header.into(),
            kind,
            y: y.to_vec(),
            yp: None,
        });
        self
    }

    pub fn hermite_column(mut self, header: impl Into<String>, y: &[f64], yp: &[f64]) -> Self {
        self.columns.push(Column {
            header: header.into(),
            kind: SplineKind::Hermite,
            y: y.to_vec(),
            yp: Some(yp.to_vec()),
        });
        self
    }

    /// Storage for the set. Without one a growable arena sized for the set
    /// is used.
    pub fn arena(mut self, arena: ValueArena) -> Self {
        self.arena = Some(arena);
        self
    }

    pub fn check_range(mut self, check_range: bool) -> Self {
        self.check_range = check_range;
        self
    }

    pub fn check_nan(mut self, check_nan: bool) -> Self {
        self.check_nan = check_nan;
        self
    }

    fn validate(&self, context: &str) -> SplineResult<BTreeMap<String, usize>> {
        if self.columns.is_empty() {
            return Err(SplineError::invalid("expected at least one spline", context));
        }
        let npts = self.x.len();
        if npts < 2 {
            return Err(SplineError::insufficient(2, npts, context));
        }
        check_grid(&self.x, &self.name, context)?;

        let mut positions = BTreeMap::new();
        for (i, column) in self.columns.iter().enumerate() {
            if column.y.len() != npts {
                return Err(SplineError::shape(npts, column.y.len(), context));
            }
            check_nan(&column.y, &column.header, "Y")?;
            match (column.kind, &column.yp) {
                (SplineKind::BSpline, _) => {
                    return Err(SplineError::Unsupported(format!(
                        "{}: bspline `{}` can't be a member of a spline set",
                        context, column.header
                    )))
                }
                (SplineKind::Hermite, None) => {
                    return Err(SplineError::invalid(
                        format!("hermite spline `{}` needs Yp", column.header),
                        context,
                    ))
                }
                (SplineKind::Hermite, Some(yp)) if yp.len() != npts => {
                    return Err(SplineError::shape(npts, yp.len(), context));
                }
                _ => {}
            }
            if positions.insert(column.header.clone(), i).is_some() {
                return Err(SplineError::invalid(format!("duplicated header `{}`", column.header), context));
            }
        }
        Ok(positions)
    }

    pub fn build(self) -> SplineResult<SplineSet> {
        let context = format!("SplineSet[{}]::build", self.name);
        let positions = self.validate(&context)?;
        let npts = self.x.len();

        let required = npts + self.columns.iter().map(|c| npts * (1 + c.num_derivatives())).sum::<usize>();
        let mut arena = self.arena.unwrap_or_default();
        arena.reserve(required)?;
        log::debug!(
            "building SplineSet[{}] with {} splines on {} points, {} values",
            self.name,
            self.columns.len(),
            npts,
            required
        );

        let x = arena.allocate_copy(&self.x)?;
        let mut members = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let (yp, ypp) = column.derivatives(&self.x);
            if self.check_nan {
                if let Some(yp) = &yp {
                    check_nan(yp, &column.header, "Yp")?;
                }
                if let Some(ypp) = &ypp {
                    check_nan(ypp, &column.header, "Ypp")?;
                }
            }
            let monotonicity = match (column.kind, &yp) {
                (SplineKind::Constant, _) => Monotonicity::NotMonotone,
                (_, Some(yp)) => check_cubic_spline_monotonicity(&self.x, &column.y, yp),
                (_, None) => check_data_monotonicity(&self.x, &column.y),
            };
            let values = sample_values(column.kind, &column.y);
            members.push(Member {
                header: column.header.clone(),
                kind: column.kind,
                y: arena.allocate_copy(&column.y)?,
                yp: yp.map(|yp| arena.allocate_copy(&yp)).transpose()?,
                ypp: ypp.map(|ypp| arena.allocate_copy(&ypp)).transpose()?,
                y_min: values.iter().copied().fold(f64::INFINITY, f64::min),
                y_max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                monotonicity,
            });
        }

        Ok(SplineSet {
            name: self.name,
            arena,
            x,
            members,
            positions,
            check_range: self.check_range,
            cursor: IntervalCursor::new(),
        })
    }
}
