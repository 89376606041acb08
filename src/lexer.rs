//! Turns document text into [`Token`]s.

use crate::{
    document::Document,
    token::{classify, Token, TokenKind, CLOSE, OPEN},
};

/// Lexes every block of `document`, each with its own line number and indentation.
pub fn tokenize(document: &Document) -> Vec<Token> {
    let tokens: Vec<Token> = document
        .blocks()
        .into_iter()
        .flat_map(|block| lex(block.raw, block.line, block.indent))
        .collect();

    log::trace!(
        "tokenized document at line {} into {} tokens",
        document.line,
        tokens.len()
    );
    tokens
}

/// Lexes `content` into text and marker tokens covering all of it.
///
/// Text tokens end after a newline or before the next `{{`. A marker runs until its braces
/// balance, so markers nested inside a marker (and newlines) stay part of it; a marker that never
/// closes runs to the end of `content`.
///
/// A conditional marker standing alone on its line swallows the whitespace before it and the
/// newline after it, so it leaves no blank line behind.
pub fn lex(content: &str, start_line: usize, indent: usize) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    let mut i = 0;
    let mut line = start_line;
    let mut line_start = 0;
    // where the most recent text token began
    let mut text_start = 0;

    while i < content.len() {
        let rest = &content[i..];

        if rest.starts_with(OPEN) {
            let mut start = i;
            let marker_line = line;
            let marker_line_start = line_start;

            i += OPEN.len();
            let mut depth = 1;
            while i < content.len() && depth > 0 {
                let rest = &content[i..];
                if rest.starts_with('\n') {
                    i += 1;
                    line += 1;
                    line_start = i;
                } else if rest.starts_with(OPEN) {
                    depth += 1;
                    i += OPEN.len();
                } else if rest.starts_with(CLOSE) {
                    depth -= 1;
                    i += CLOSE.len();
                } else {
                    i += rest.chars().next().map_or(1, char::len_utf8);
                }
            }

            if depth > 0 {
                log::debug!(
                    "unterminated marker on line {marker_line}, closing it at end of input"
                );
            }

            let kind = classify(&content[start..i]);
            if kind.is_conditional() {
                let after = &content[i..];
                let newline = if after.starts_with("\r\n") {
                    2
                } else if after.starts_with('\n') {
                    1
                } else {
                    0
                };
                let ends_line = after.is_empty() || newline > 0;

                let leading_whitespace = match tokens.last() {
                    Some(last) if start > marker_line_start => {
                        last.kind == TokenKind::Text
                            && text_start == marker_line_start
                            && last.value.chars().all(|c| c == ' ' || c == '\t')
                    }
                    _ => false,
                };
                let starts_line = start == marker_line_start || leading_whitespace;

                if starts_line && ends_line {
                    if leading_whitespace {
                        tokens.pop();
                        start = text_start;
                    }
                    if newline > 0 {
                        i += newline;
                        line += 1;
                        line_start = i;
                    }
                }
            }

            tokens.push(Token::new(kind, &content[start..i], marker_line, indent));
        } else {
            let start = i;
            let token_line = line;

            let mut end = rest.len();
            for (idx, c) in rest.char_indices() {
                if c == '\n' {
                    end = idx + 1;
                    break;
                }
                if rest[idx..].starts_with(OPEN) {
                    end = idx;
                    break;
                }
            }

            i += end;
            if content[start..i].ends_with('\n') {
                line += 1;
                line_start = i;
            }

            text_start = start;
            tokens.push(Token::text(&content[start..i], token_line, indent));
        }
    }

    tokens
}
