use crate::ValueContext;

/// A context over the given values YAML, with chart metadata `name: test`.
pub fn build_test_context(values: &str) -> ValueContext {
    ValueContext::from_yaml(values, "name: test\n")
        .unwrap_or_else(|e| panic!("invalid test values {values:?}: {e}"))
}
