//! Operand and action expressions: dotted value paths and literals.

use std::{fmt, str::FromStr};

use serde_yaml::Value;

use crate::error::ResolveError;

/// An operand of a condition or the body of an action marker.
///
/// Only field lookups and literals are understood:
///
/// ```text
/// {{ .Values.image.tag }}
/// #  ^^^^^^^^^^^^^^^^^ a path, walked one segment at a time
///
/// {{ .Chart.Name }}
/// #  ^^^^^^^^^^^ paths into the chart metadata start at .Chart
///
/// {{ "literal" }} {{ 42 }} {{ true }}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Path(Path),
    Literal(Value),
}

/// A dotted path such as `.Values.service.port`.
///
/// The first segment names the tree to look in (`Values` or `Chart`). An empty path is `.`,
/// the whole value set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    pub segments: Vec<String>,
}

impl Path {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Path {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn root(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(".");
        }
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Expr {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsing::expr(s.trim())
    }
}

mod parsing;
