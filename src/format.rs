//! Turns rendered tokens back into text for display.

use std::collections::BTreeMap;

use crate::Token;

pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// The rendered text of each document, separated by `---` lines.
pub fn raw(documents: &[Vec<Token>]) -> String {
    let mut output = String::new();

    for (idx, tokens) in documents.iter().enumerate() {
        if idx > 0 {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(DOCUMENT_SEPARATOR);
        }
        for token in tokens {
            output.push_str(&token.value);
        }
    }

    output
}

/// One line per source line, showing the kind and text of every token on it.
///
/// ```text
///   Text:   name: Action: web
/// ```
///
/// The first token of a line is indented by the indentation it was lexed with. The newline a
/// text token ends with is left out, the line break between entries stands in for it.
pub fn tokens(documents: &[Vec<Token>]) -> String {
    let documents: Vec<String> = documents
        .iter()
        .map(|tokens| {
            let mut lines: BTreeMap<usize, (usize, String)> = BTreeMap::new();
            for token in tokens {
                let (_, line) = lines
                    .entry(token.line)
                    .or_insert_with(|| (token.indent, String::new()));
                let value = token.value.strip_suffix('\n').unwrap_or(&token.value);
                line.push_str(&format!("{}: {value}", token.kind));
            }

            lines
                .into_values()
                .map(|(indent, line)| format!("{}{line}", " ".repeat(indent)))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();

    documents.join(&format!("\n{DOCUMENT_SEPARATOR}"))
}
