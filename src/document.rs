//! Splits a template file into documents and each document into line blocks.
//!
//! A block is one physical line, or several when a marker opened on a line is only closed on a
//! later one. Blocks carry the 1-based line number and indentation of their first line, which
//! every token lexed from the block inherits.

use crate::token::{CLOSE, OPEN};

/// A single YAML document out of a (possibly multi-document) template file.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Document<'a> {
    /// Line number of the document's first line within the source file
    pub line: usize,
    pub text: &'a str,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Block<'a> {
    pub line: usize,
    pub indent: usize,
    /// The block's text including its trailing newline
    pub raw: &'a str,
}

/// Splits `source` on lines consisting of `---`. Documents that are only whitespace are dropped.
pub fn split_documents(source: &str) -> Vec<Document<'_>> {
    let mut documents = Vec::new();

    let mut start = 0;
    let mut start_line = 1;
    let mut offset = 0;

    for (idx, line) in source.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        if line.trim() == "---" {
            push_document(&mut documents, &source[start..offset], start_line);
            start = offset + line.len();
            start_line = line_no + 1;
        }
        offset += line.len();
    }
    push_document(&mut documents, &source[start..], start_line);

    log::debug!("split source into {} document(s)", documents.len());
    documents
}

fn push_document<'a>(documents: &mut Vec<Document<'a>>, text: &'a str, line: usize) {
    if text.trim().is_empty() {
        return;
    }
    documents.push(Document { line, text });
}

impl<'a> Document<'a> {
    pub fn new(text: &'a str) -> Self {
        Document { line: 1, text }
    }

    pub fn blocks(&self) -> Vec<Block<'a>> {
        collect_blocks(self.text, self.line)
    }
}

/// Groups the lines of `text` into [`Block`]s, merging lines that belong to a multi-line marker.
///
/// Concatenating the `raw` text of the returned blocks gives back `text`.
pub fn collect_blocks(text: &str, first_line: usize) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();

    let mut block: Option<(usize, usize, usize)> = None; // (start offset, line, indent)
    let mut depth = 0;
    let mut offset = 0;

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let (start, line_no, indent) =
            *block.get_or_insert((offset, first_line + idx, indentation(line)));

        depth = marker_depth(line, depth);
        offset += line.len();

        if depth == 0 {
            blocks.push(Block {
                line: line_no,
                indent,
                raw: &text[start..offset],
            });
            block = None;
        }
    }

    // a marker left open at the end of the document still forms a block
    if let Some((start, line, indent)) = block {
        log::debug!("marker opened on line {line} is never closed");
        blocks.push(Block {
            line,
            indent,
            raw: &text[start..],
        });
    }

    blocks
}

/// Number of leading spaces.
fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Marker nesting depth after scanning `line`, starting from `depth`.
fn marker_depth(line: &str, mut depth: usize) -> usize {
    let mut rest = line;
    while !rest.is_empty() {
        if rest.starts_with(OPEN) {
            depth += 1;
            rest = &rest[OPEN.len()..];
        } else if depth > 0 && rest.starts_with(CLOSE) {
            depth -= 1;
            rest = &rest[CLOSE.len()..];
        } else {
            let skip = rest.chars().next().map_or(1, char::len_utf8);
            rest = &rest[skip..];
        }
    }
    depth
}
