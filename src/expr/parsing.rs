use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::{Number, Value};

use super::*;

fn path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$?(?:\.[\w-]+)+$").expect("path pattern is a valid regex")
    })
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?$")
            .expect("number pattern is a valid regex")
    })
}

pub fn expr(input: &str) -> Result<Expr, ResolveError> {
    path(input)
        .map(Expr::Path)
        .or_else(|| literal(input).map(Expr::Literal))
        .ok_or_else(|| ResolveError::Unsupported(input.to_string()))
}

// .Values.a.b, $.Values.a, . or $
fn path(input: &str) -> Option<Path> {
    if input == "." || input == "$" {
        return Some(Path::default());
    }
    if !path_pattern().is_match(input) {
        return None;
    }

    let segments = input
        .trim_start_matches('$')
        .split('.')
        .skip(1)
        .map(str::to_string)
        .collect();
    Some(Path { segments })
}

fn literal(input: &str) -> Option<Value> {
    match input {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "nil" => return Some(Value::Null),
        _ => {}
    }

    if number_pattern().is_match(input) {
        if let Ok(n) = input.parse::<i64>() {
            return Some(Value::Number(Number::from(n)));
        }
        return input.parse::<f64>().ok().map(|n| Value::Number(Number::from(n)));
    }

    string(input).map(Value::String)
}

// "double quoted" with the usual escapes, or `raw`
fn string(input: &str) -> Option<String> {
    if input.len() >= 2 && input.starts_with('`') && input.ends_with('`') {
        let inner = &input[1..input.len() - 1];
        return (!inner.contains('`')).then(|| inner.to_string());
    }

    let inner = input.strip_prefix('"')?.strip_suffix('"')?;
    let mut output = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => output.push('\n'),
                't' => output.push('\t'),
                'r' => output.push('\r'),
                esc @ ('"' | '\\') => output.push(esc),
                _ => return None,
            },
            // an unescaped quote means this was more than one string
            '"' => return None,
            c => output.push(c),
        }
    }
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parse_match(input: &str, expected_match: Expr) {
        let matched = expr(input)
            .unwrap_or_else(|_| panic!("expected: {expected_match:?} for input: {input}"));
        assert_eq!(matched, expected_match, "for input: {input}");
    }

    fn assert_parse_fails(input: &str, reason: &str) {
        let result = expr(input);
        assert!(
            result.is_err(),
            r#"expected parse to fail due to: "{reason}" for input: {input}"#
        );
    }

    #[test]
    fn test_path() {
        assert_parse_match(".Values.a", Expr::Path(Path::new(["Values", "a"])));
        assert_parse_match(
            ".Values.image.tag",
            Expr::Path(Path::new(["Values", "image", "tag"])),
        );
        assert_parse_match(".Chart.Name", Expr::Path(Path::new(["Chart", "Name"])));
        assert_parse_match(".Values.list.0", Expr::Path(Path::new(["Values", "list", "0"])));
        assert_parse_match(
            ".Values.my-key",
            Expr::Path(Path::new(["Values", "my-key"])),
        );
        assert_parse_match("$.Values.a", Expr::Path(Path::new(["Values", "a"])));
        assert_parse_match(".", Expr::Path(Path::default()));
        assert_parse_match("$", Expr::Path(Path::default()));

        assert_parse_fails(".Values.", "trailing dot");
        assert_parse_fails("..Values", "empty segment");
        assert_parse_fails("Values.a", "missing leading dot");
        assert_parse_fails(".Values.a | quote", "pipelines are not supported");
    }

    #[test]
    fn test_literals() {
        assert_parse_match("true", Expr::Literal(Value::Bool(true)));
        assert_parse_match("false", Expr::Literal(Value::Bool(false)));
        assert_parse_match("nil", Expr::Literal(Value::Null));
        assert_parse_match("42", Expr::Literal(Value::Number(Number::from(42))));
        assert_parse_match("-1.5", Expr::Literal(Value::Number(Number::from(-1.5))));
        assert_parse_match(
            r#""a \"quoted\" word""#,
            Expr::Literal(Value::String(r#"a "quoted" word"#.into())),
        );
        assert_parse_match("`raw\\n`", Expr::Literal(Value::String("raw\\n".into())));
        assert_parse_match(r#""""#, Expr::Literal(Value::String(String::new())));

        assert_parse_fails(r#""a" "b""#, "two strings");
        assert_parse_fails(r#""unterminated"#, "missing closing quote");
        assert_parse_fails("1.2.3", "not a number");
    }

    #[test]
    fn test_functions_are_unsupported() {
        assert_parse_fails(r#"include "chart.labels" ."#, "function call");
        assert_parse_fails("default 1 .Values.a", "function call");
        assert_parse_fails("", "empty expression");
    }

    #[test]
    fn test_path_display() {
        assert_eq!(Path::new(["Values", "a", "b"]).to_string(), ".Values.a.b");
        assert_eq!(Path::default().to_string(), ".");
    }
}
