use std::{iter::Peekable, vec};

use super::*;
use crate::token::{condition_text, is_else_chain, TokenKind};

pub type Tokens = Peekable<vec::IntoIter<Token>>;

// Parses nodes until one of `terminators` (left unconsumed) or the end of input
pub fn nodes(tokens: &mut Tokens, terminators: &[TokenKind]) -> Result<Vec<Node>, RenderError> {
    let mut nodes = Vec::new();

    while let Some(token) = tokens.next_if(|t| !terminators.contains(&t.kind)) {
        match token.kind {
            TokenKind::Text => nodes.push(Node::Text(token)),
            TokenKind::Action => {
                if marker_inner(&token.value).is_some_and(is_else_chain) {
                    log::warn!(
                        "line {}: `{}` is not a conditional, its branch only renders as an action",
                        token.line,
                        token.value.trim()
                    );
                }
                nodes.push(Node::Action(token))
            }
            TokenKind::ConditionalOpen => {
                nodes.push(Node::Conditional(conditional(token, tokens)?))
            }
            TokenKind::ConditionalElse | TokenKind::ConditionalClose => {
                log::warn!(
                    "line {}: dropping `{}` with no matching if",
                    token.line,
                    token.value.trim()
                );
            }
        }
    }

    Ok(nodes)
}

// {{ if ... }} <then> [{{ else }} <else>] {{ end }} - **recursive via nodes()**
fn conditional(open: Token, tokens: &mut Tokens) -> Result<Conditional, RenderError> {
    let text = marker_inner(&open.value)
        .and_then(condition_text)
        .unwrap_or_default();
    let condition = Condition::parse(text, open.line)?;

    let then_branch = nodes(
        tokens,
        &[TokenKind::ConditionalElse, TokenKind::ConditionalClose],
    )?;

    let else_branch = match tokens.next_if(|t| t.kind == TokenKind::ConditionalElse) {
        Some(_) => nodes(tokens, &[TokenKind::ConditionalClose])?,
        None => Vec::new(),
    };

    if tokens
        .next_if(|t| t.kind == TokenKind::ConditionalClose)
        .is_none()
    {
        log::debug!("line {}: if is never closed, ending it at end of input", open.line);
    }

    Ok(Conditional {
        condition,
        line: open.line,
        then_branch,
        else_branch,
    })
}
