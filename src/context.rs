//! The data expressions are resolved against.

use serde_yaml::{Mapping, Value};

use crate::{
    error::ResolveError,
    expr::{Expr, Path},
};

pub const VALUES_ROOT: &str = "Values";
pub const METADATA_ROOT: &str = "Chart";

/// Resolves expression text to a value.
///
/// Implementations must be free of side effects: the same expression resolves the same way for
/// the whole of a render, and a context may be shared between threads rendering different
/// documents.
pub trait Resolve {
    fn resolve(&self, expression: &str) -> Result<Value, ResolveError>;
}

/// Read-only view over a values tree and a metadata tree, reachable as `.Values` and `.Chart`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueContext {
    pub values: Value,
    pub metadata: Value,
}

impl ValueContext {
    pub fn new(values: Value, metadata: Value) -> Self {
        ValueContext {
            values: empty_if_null(values),
            metadata: empty_if_null(metadata),
        }
    }

    /// Builds a context from YAML text. Empty text is an empty mapping.
    pub fn from_yaml(values: &str, metadata: &str) -> Result<Self, serde_yaml::Error> {
        Ok(ValueContext::new(parse_tree(values)?, parse_tree(metadata)?))
    }

    pub fn lookup(&self, path: &Path) -> Result<Value, ResolveError> {
        let Some(root) = path.root() else {
            let mut top = Mapping::new();
            top.insert(VALUES_ROOT.into(), self.values.clone());
            top.insert(METADATA_ROOT.into(), self.metadata.clone());
            return Ok(Value::Mapping(top));
        };

        let (tree, lenient_case) = match root {
            VALUES_ROOT => (&self.values, false),
            METADATA_ROOT => (&self.metadata, true),
            other => return Err(ResolveError::UnknownRoot(other.to_string())),
        };

        walk(tree, path, lenient_case)
    }
}

impl Resolve for ValueContext {
    fn resolve(&self, expression: &str) -> Result<Value, ResolveError> {
        match expression.parse::<Expr>()? {
            Expr::Path(path) => self.lookup(&path),
            Expr::Literal(value) => Ok(value),
        }
    }
}

fn parse_tree(yaml: &str) -> Result<Value, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    serde_yaml::from_str(yaml)
}

fn empty_if_null(value: Value) -> Value {
    match value {
        Value::Null => Value::Mapping(Mapping::new()),
        value => value,
    }
}

// Walks everything after the root segment. A missing final key is null, anything missing on
// the way there is an error.
fn walk(tree: &Value, path: &Path, lenient_case: bool) -> Result<Value, ResolveError> {
    let segments = &path.segments[1..];
    let mut current = tree;

    for (idx, segment) in segments.iter().enumerate() {
        let is_last = idx + 1 == segments.len();

        let next = match current {
            Value::Mapping(mapping) => mapping.get(segment.as_str()).or_else(|| {
                lenient_case
                    .then(|| lower_first(segment))
                    .and_then(|lowered| mapping.get(lowered.as_str()))
            }),
            Value::Sequence(seq) => segment.parse::<usize>().ok().and_then(|n| seq.get(n)),
            Value::Null => {
                return Err(ResolveError::MissingIntermediate {
                    path: path.to_string(),
                    segment: segment.clone(),
                })
            }
            other => {
                return Err(ResolveError::NotTraversable {
                    path: path.to_string(),
                    segment: segment.clone(),
                    kind: kind_of(other),
                })
            }
        };

        match next {
            Some(value) => current = value,
            None if is_last => return Ok(Value::Null),
            None => {
                return Err(ResolveError::MissingIntermediate {
                    path: path.to_string(),
                    segment: segment.clone(),
                })
            }
        }
    }

    Ok(current.clone())
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Whether a resolved value selects the `then` branch of a conditional.
///
/// Booleans are themselves, `"true"`/`"false"` mean what they say, other strings are truthy
/// unless empty and null is falsy. Every other value is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => match s.as_str() {
            "true" => true,
            "false" => false,
            s => !s.is_empty(),
        },
        Value::Null => false,
        _ => true,
    }
}

/// The text a resolved value is substituted with.
pub fn to_text(value: &Value) -> String {
    let mut output = String::new();
    write_text(&mut output, value);
    output
}

fn write_text(output: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => output.push_str(&n.to_string()),
        Value::String(s) => output.push_str(s),
        Value::Sequence(seq) => {
            output.push('[');
            for (idx, item) in seq.iter().enumerate() {
                if idx > 0 {
                    output.push_str(", ");
                }
                write_text(output, item);
            }
            output.push(']');
        }
        Value::Mapping(mapping) => {
            output.push('{');
            for (idx, (key, value)) in mapping.iter().enumerate() {
                if idx > 0 {
                    output.push_str(", ");
                }
                write_text(output, key);
                output.push_str(": ");
                write_text(output, value);
            }
            output.push('}');
        }
        Value::Tagged(tagged) => {
            output.push_str(&tagged.tag.to_string());
            output.push(' ');
            write_text(output, &tagged.value);
        }
    }
}
