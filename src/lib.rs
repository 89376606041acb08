//! Previews how a templated YAML manifest renders for a set of values, without a full template
//! engine.
//!
//! Rendering a document runs a small pipeline:
//!
//! * [`lexer`] - document text -> [`Token`]s, each tagged with its line and indentation
//! * [`Template::parse`] - tokens -> a tree with `if`/`else`/`end` resolved into nodes
//! * [`Template::eval`] - tree + [`ValueContext`] -> the tokens that survive, actions substituted
//!
//! ```
//! use helmish::{render, ValueContext};
//!
//! let ctx = ValueContext::from_yaml("debug: false\nname: web\n", "name: demo\n").unwrap();
//! let source = "name: {{ .Values.name }}\n{{ if .Values.debug }}\nlog: debug\n{{ end }}\n";
//! let tokens = render(source, &ctx).unwrap();
//!
//! let text: String = tokens.iter().map(|t| t.value.as_str()).collect();
//! assert_eq!(text, "name: web\n");
//! ```

mod chart;
mod condition;
mod context;
mod document;
mod error;
mod expr;
pub mod format;
pub mod lexer;
mod template;
mod token;

#[cfg(test)]
mod test_utils;

pub use chart::{merge_values, Chart};
pub use condition::{Condition, Operator};
pub use context::{is_truthy, to_text, Resolve, ValueContext};
pub use document::{collect_blocks, split_documents, Block, Document};
pub use error::{ConditionError, RenderError, ResolveError};
pub use expr::{Expr, Path};
pub use template::{Conditional, Node, RenderOptions, Template};
pub use token::{classify, Token, TokenKind};

/// Renders `document` as a single document with default options.
pub fn render<R: Resolve + ?Sized>(document: &str, ctx: &R) -> Result<Vec<Token>, RenderError> {
    render_document(&Document::new(document), ctx, &RenderOptions::default())
}

pub fn render_document<R: Resolve + ?Sized>(
    document: &Document,
    ctx: &R,
    options: &RenderOptions,
) -> Result<Vec<Token>, RenderError> {
    let tokens = lexer::tokenize(document);
    let template = Template::parse(tokens)?;
    template.eval(ctx, options)
}

/// The outcome of rendering one document of a template file.
#[derive(Debug, PartialEq)]
pub struct RenderedDocument {
    /// Line of the document's first line in the template file
    pub line: usize,
    pub result: Result<Vec<Token>, RenderError>,
}

/// Renders every document of a template file. A document that fails does not stop the others.
pub fn render_file<R: Resolve + ?Sized>(
    source: &str,
    ctx: &R,
    options: &RenderOptions,
) -> Vec<RenderedDocument> {
    split_documents(source)
        .iter()
        .map(|document| {
            let result = render_document(document, ctx, options);
            if let Err(e) = &result {
                log::debug!("document at line {} failed: {e}", document.line);
            }
            RenderedDocument {
                line: document.line,
                result,
            }
        })
        .collect()
}
