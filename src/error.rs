use thiserror::Error;

/// Errors that abort rendering of a single document.
///
/// Unterminated markers and unterminated conditionals are never reported here: they are
/// closed at end of input and the render carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The words following `if` do not form a single, prefix or infix condition.
    #[error("malformed condition `{condition}` on line {line}: {reason}")]
    MalformedCondition {
        line: usize,
        condition: String,
        reason: ConditionError,
    },

    /// An operand or action could not be resolved against the value context.
    #[error("unable to resolve `{expression}` on line {line}: {source}")]
    UnresolvedExpression {
        line: usize,
        expression: String,
        #[source]
        source: ResolveError,
    },
}

impl RenderError {
    /// The source line the error was raised for.
    pub fn line(&self) -> usize {
        match self {
            RenderError::MalformedCondition { line, .. } => *line,
            RenderError::UnresolvedExpression { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("not expects one expression")]
    NotArity,

    #[error("expected expression after {0}")]
    ExpectedExpression(&'static str),

    #[error("invalid condition structure")]
    InvalidStructure,
}

/// Failure to turn an expression into a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unsupported expression `{0}`")]
    Unsupported(String),

    #[error("unknown root `{0}`, expected .Values or .Chart")]
    UnknownRoot(String),

    #[error("missing `{segment}` while walking `{path}`")]
    MissingIntermediate { path: String, segment: String },

    #[error("can't evaluate field `{segment}` in {kind} at `{path}`")]
    NotTraversable {
        path: String,
        segment: String,
        kind: &'static str,
    },
}
