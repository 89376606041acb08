//! Tokens produced by the [lexer](crate::lexer) and the classifier that tags template markers.

use std::fmt;

pub const OPEN: &str = "{{";
pub const CLOSE: &str = "}}";

/// What a [`Token`] represents.
///
/// Conditional kinds only exist between lexing and parsing; a rendered token is always
/// [`TokenKind::Text`] or [`TokenKind::Action`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    Text,
    ConditionalOpen,
    ConditionalElse,
    ConditionalClose,
    Action,
}

impl TokenKind {
    pub fn is_conditional(self) -> bool {
        matches!(
            self,
            TokenKind::ConditionalOpen | TokenKind::ConditionalElse | TokenKind::ConditionalClose
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Text => "Text",
            TokenKind::ConditionalOpen => "If",
            TokenKind::ConditionalElse => "Else",
            TokenKind::ConditionalClose => "End",
            TokenKind::Action => "Action",
        };
        f.write_str(name)
    }
}

/// A slice of a document together with where it came from.
///
/// `line` is the 1-based line the token starts on, `indent` the indentation of the physical
/// line its block started on.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub indent: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize, indent: usize) -> Self {
        Token {
            kind,
            value: value.into(),
            line,
            indent,
        }
    }

    pub fn text(value: impl Into<String>, line: usize, indent: usize) -> Self {
        Token::new(TokenKind::Text, value, line, indent)
    }

    pub fn action(value: impl Into<String>, line: usize, indent: usize) -> Self {
        Token::new(TokenKind::Action, value, line, indent)
    }
}

/// Returns the trimmed instruction between the `{{` and `}}` of a marker, or `None` if the
/// text is not a complete marker.
///
/// Surrounding whitespace (including a newline absorbed by the lexer) is ignored and the
/// `{{-`/`-}}` trim markers are reduced to their instruction.
pub fn marker_inner(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    if raw.len() < OPEN.len() + CLOSE.len() || !raw.starts_with(OPEN) || !raw.ends_with(CLOSE) {
        return None;
    }

    let mut inner = &raw[OPEN.len()..raw.len() - CLOSE.len()];
    if let Some(rest) = inner.strip_prefix('-') {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            inner = rest;
        }
    }
    if let Some(rest) = inner.strip_suffix('-') {
        if rest.is_empty() || rest.ends_with(char::is_whitespace) {
            inner = rest;
        }
    }

    Some(inner.trim())
}

/// Tags a marker by its instruction. Anything malformed is an [`TokenKind::Action`] and is left
/// for evaluation to deal with.
pub fn classify(raw: &str) -> TokenKind {
    let Some(inner) = marker_inner(raw) else {
        return TokenKind::Action;
    };

    match inner {
        "else" => TokenKind::ConditionalElse,
        "end" => TokenKind::ConditionalClose,
        _ if condition_text(inner).is_some() => TokenKind::ConditionalOpen,
        _ => TokenKind::Action,
    }
}

/// The text following the `if` keyword of a marker instruction, if it is one.
pub fn condition_text(inner: &str) -> Option<&str> {
    let rest = inner.strip_prefix("if")?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        Some(_) => Some(rest.trim()),
    }
}

/// Whether a marker instruction chains a condition onto an `else`, which is not supported and
/// is left as an action.
pub fn is_else_chain(inner: &str) -> bool {
    inner
        .strip_prefix("else")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("{{if .Values.a}}"), TokenKind::ConditionalOpen);
        assert_eq!(classify("{{ if .Values.a }}"), TokenKind::ConditionalOpen);
        assert_eq!(classify("{{if}}"), TokenKind::ConditionalOpen);
        assert_eq!(classify("{{ else }}"), TokenKind::ConditionalElse);
        assert_eq!(classify("{{end}}"), TokenKind::ConditionalClose);
        assert_eq!(classify("{{ .Values.name }}"), TokenKind::Action);

        assert_eq!(
            classify("{{ iffy }}"),
            TokenKind::Action,
            "`if` must be followed by a word boundary"
        );
        assert_eq!(classify("{{ else if .Values.a }}"), TokenKind::Action);
        assert_eq!(classify("{{ endif }}"), TokenKind::Action);
    }

    #[test]
    fn test_classify_trim_markers() {
        assert_eq!(classify("{{- if .Values.a }}"), TokenKind::ConditionalOpen);
        assert_eq!(classify("{{- else -}}"), TokenKind::ConditionalElse);
        assert_eq!(classify("{{- end }}"), TokenKind::ConditionalClose);
        assert_eq!(marker_inner("{{-3}}"), Some("-3"));
    }

    #[test]
    fn test_classify_malformed() {
        assert_eq!(classify("{{"), TokenKind::Action);
        assert_eq!(classify("{{end"), TokenKind::Action);
        assert_eq!(classify("end}}"), TokenKind::Action);
        assert_eq!(classify("{}"), TokenKind::Action);
    }

    #[test]
    fn test_marker_inner_ignores_absorbed_whitespace() {
        assert_eq!(marker_inner("  {{ end }}\n"), Some("end"));
        assert_eq!(
            condition_text("if   .Values.a and .Values.b "),
            Some(".Values.a and .Values.b")
        );
        assert_eq!(condition_text("if"), Some(""));
        assert_eq!(condition_text("ifx"), None);
    }

    #[test]
    fn test_is_else_chain() {
        assert!(is_else_chain("else if .Values.b"));
        assert!(is_else_chain("else\tif .Values.b"));
        assert!(!is_else_chain("else"));
        assert!(!is_else_chain("elsewhere"));
        assert!(!is_else_chain(".Values.else"));
    }
}
