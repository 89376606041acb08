//! Builds a tree of [`Node`]s out of tokens and evaluates it against a value context.
//!
//! * lex document -> Vec<Token>
//! * parse -> Template (conditionals resolved into [`Conditional`] nodes)
//! * eval -> Vec<Token> with every conditional decided and every action substituted

use crate::{
    condition::Condition,
    context::{to_text, Resolve},
    error::RenderError,
    token::{marker_inner, Token},
};

/// A parsed document: an ordered list of [`Node`]s rendered in order.
#[derive(PartialEq, Debug)]
pub struct Template {
    nodes: Vec<Node>,
}

#[derive(PartialEq, Debug)]
pub enum Node {
    Text(Token),
    Action(Token),
    Conditional(Conditional),
}

/// An `if` block. The `else_branch` is empty when there is no `else`.
#[derive(PartialEq, Debug)]
pub struct Conditional {
    pub condition: Condition,
    /// Line of the `if` marker
    pub line: usize,
    pub then_branch: Vec<Node>,
    pub else_branch: Vec<Node>,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct RenderOptions {
    /// Echo the expression of an action that cannot be resolved instead of failing
    pub lenient: bool,
}

impl Template {
    /// Parses a token stream. Fails only when a condition is malformed; stray `else`/`end`
    /// markers are dropped and an `if` without `end` closes at the end of the input.
    pub fn parse(tokens: Vec<Token>) -> Result<Self, RenderError> {
        let mut tokens = tokens.into_iter().peekable();
        let nodes = parsing::nodes(&mut tokens, &[])?;
        Ok(Template { nodes })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Renders the template, stopping at the first error.
    pub fn eval<R: Resolve + ?Sized>(
        &self,
        ctx: &R,
        options: &RenderOptions,
    ) -> Result<Vec<Token>, RenderError> {
        let mut output = Vec::new();

        for node in self.nodes.iter() {
            node.eval(&mut output, ctx, options)?;
        }

        Ok(output)
    }
}

impl Node {
    pub fn eval<R: Resolve + ?Sized>(
        &self,
        output: &mut Vec<Token>,
        ctx: &R,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        match self {
            Node::Text(token) => {
                output.push(token.clone());
                Ok(())
            }
            Node::Action(token) => {
                output.push(eval_action(token, ctx, options)?);
                Ok(())
            }
            Node::Conditional(conditional) => {
                let branch = if conditional.condition.eval(ctx, conditional.line)? {
                    &conditional.then_branch
                } else {
                    &conditional.else_branch
                };
                for node in branch {
                    node.eval(output, ctx, options)?;
                }
                Ok(())
            }
        }
    }
}

fn eval_action<R: Resolve + ?Sized>(
    token: &Token,
    ctx: &R,
    options: &RenderOptions,
) -> Result<Token, RenderError> {
    // already rendered, or never a complete marker
    let Some(inner) = marker_inner(&token.value) else {
        return Ok(token.clone());
    };

    if inner.starts_with("/*") && inner.ends_with("*/") {
        return Ok(Token::action("", token.line, token.indent));
    }

    let value = match ctx.resolve(inner) {
        Ok(value) => to_text(&value),
        Err(source) if options.lenient => {
            log::warn!("line {}: leaving `{inner}` unresolved: {source}", token.line);
            inner.to_string()
        }
        Err(source) => {
            return Err(RenderError::UnresolvedExpression {
                line: token.line,
                expression: inner.to_string(),
                source,
            })
        }
    };

    Ok(Token::action(value, token.line, token.indent))
}

mod parsing;
