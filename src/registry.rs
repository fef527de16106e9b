//! Named splines with a current selection, for embedders that drive the
//! library through plain function calls.

use std::{collections::BTreeMap, io};

use crate::{
    error::{SplineError, SplineResult},
    spline::{Interpolant, Spline, SplineBuilder, SplineKind},
};

const NONE_SELECTED: &str = "(none selected)";

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    builder: SplineBuilder,
    spline: Option<Spline>,
}

/// Owns splines by id and forwards point collection, builds and
/// evaluations to the selected one.
///
/// Creating a spline selects it. Deleting the selected spline leaves
/// nothing selected, and every forwarding call then fails.
/// # Example
/// ```
/// use piecewise_spline::{SplineKind, SplineRegistry};
/// use assert_approx_eq::assert_approx_eq;
///
/// let mut registry = SplineRegistry::new();
/// registry.new_spline("speed", SplineKind::Linear);
/// registry.push(0.0, 0.0).unwrap();
/// registry.push(2.0, 4.0).unwrap();
/// registry.build().unwrap();
///
/// assert_eq!(registry.selected_kind_name().unwrap(), "linear");
/// assert_approx_eq!(registry.eval(0.5).unwrap(), 1.0, 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplineRegistry {
    entries: BTreeMap<String, Entry>,
    selected: Option<String>,
}

impl SplineRegistry {
    pub fn new() -> Self {
        SplineRegistry::default()
    }

    /// Creates an empty spline of type `kind` under `id`, replacing any
    /// spline already stored there, and selects it.
    pub fn new_spline(&mut self, id: &str, kind: SplineKind) {
        if self.entries.contains_key(id) {
            log::debug!("replacing spline `{}` with a new {} spline", id, kind);
        }
        let entry = Entry {
            builder: SplineBuilder::new(kind).name(id),
            spline: None,
        };
        self.entries.insert(id.to_string(), entry);
        self.selected = Some(id.to_string());
    }

    pub fn select(&mut self, id: &str) -> SplineResult<()> {
        if !self.entries.contains_key(id) {
            return Err(SplineError::UnknownSpline(id.to_string()));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> SplineResult<()> {
        if self.entries.remove(id).is_none() {
            return Err(SplineError::UnknownSpline(id.to_string()));
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Built spline stored under `id`.
    pub fn get(&self, id: &str) -> SplineResult<&Spline> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| SplineError::UnknownSpline(id.to_string()))?;
        entry.spline.as_ref().ok_or_else(|| SplineError::NotBuilt(id.to_string()))
    }

    fn current(&self) -> SplineResult<&Entry> {
        self.selected
            .as_ref()
            .and_then(|id| self.entries.get(id))
            .ok_or_else(|| SplineError::UnknownSpline(NONE_SELECTED.to_string()))
    }

    fn current_mut(&mut self) -> SplineResult<&mut Entry> {
        match self.selected.as_ref() {
            Some(id) => self
                .entries
                .get_mut(id)
                .ok_or_else(|| SplineError::UnknownSpline(id.clone())),
            None => Err(SplineError::UnknownSpline(NONE_SELECTED.to_string())),
        }
    }

    fn built(&self) -> SplineResult<&Spline> {
        let entry = self.current()?;
        entry
            .spline
            .as_ref()
            .ok_or_else(|| SplineError::NotBuilt(format!("spline `{}`", self.selected().unwrap_or(NONE_SELECTED))))
    }

    pub fn selected_kind_name(&self) -> SplineResult<&'static str> {
        Ok(self.current()?.builder.kind().name())
    }

    /// Writes the segments of the selected spline.
    pub fn print(&self, out: &mut dyn io::Write) -> io::Result<()> {
        match self.built() {
            Ok(spline) => {
                spline.info(out)?;
                write!(out, "{}", spline)
            }
            Err(error) => writeln!(out, "No Spline! ({})", error),
        }
    }

    /// Forgets the points and the build of the selected spline.
    pub fn init(&mut self) -> SplineResult<()> {
        let entry = self.current_mut()?;
        entry.builder.clear();
        entry.spline = None;
        Ok(())
    }

    pub fn push(&mut self, x: f64, y: f64) -> SplineResult<()> {
        self.current_mut()?.builder.push_back(x, y)
    }

    /// Builds the selected spline from the pushed points.
    pub fn build(&mut self) -> SplineResult<()> {
        let entry = self.current_mut()?;
        entry.spline = Some(entry.builder.build()?);
        Ok(())
    }

    /// Builds the selected spline from `x` and `y`, ignoring pushed points.
    pub fn build_from(&mut self, x: &[f64], y: &[f64]) -> SplineResult<()> {
        let entry = self.current_mut()?;
        entry.spline = Some(entry.builder.build_from(x, y)?);
        Ok(())
    }

    pub fn eval(&self, x: f64) -> SplineResult<f64> {
        self.built()?.eval(x)
    }

    pub fn eval_d(&self, x: f64) -> SplineResult<f64> {
        self.built()?.eval_d(x)
    }

    pub fn eval_dd(&self, x: f64) -> SplineResult<f64> {
        self.built()?.eval_dd(x)
    }

    pub fn eval_ddd(&self, x: f64) -> SplineResult<f64> {
        self.built()?.eval_ddd(x)
    }
}
