//! Recursive-descent parser for connector formulas.
//!
//! ```text
//! or_expr  := and_expr ( "or" and_expr )*
//! and_expr := unary ( "&" unary )*
//! unary    := "(" or_expr? ")" | "{" or_expr? "}" | "[" or_expr? "]" number?
//!           | CONNECTOR
//! ```
//!
//! Empty groups (`()`, `{}`, `[]`) are the dictionary's null placeholder. They
//! are folded away while parsing: an `or` with a null operand becomes an
//! optional group, and a null operand of `&` is dropped. The returned tree
//! therefore never contains an explicit "empty" node.

use super::FormulaTree;
use crate::error::FormulaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Open(char),
    Close(char),
    And,
    Or,
    Word,
}

#[derive(Debug, Clone, Copy)]
struct Tok<'a> {
    kind: Kind,
    text: &'a str,
    offset: usize,
}

fn tokenize(formula: &str) -> Vec<Tok<'_>> {
    regex!(r"[()\[\]{}&]|[^\s()\[\]{}&]+")
        .find_iter(formula)
        .map(|m| {
            let text = m.as_str();
            let kind = match text {
                "(" | "[" | "{" => Kind::Open(text.chars().next().unwrap_or('(')),
                ")" | "]" | "}" => Kind::Close(text.chars().next().unwrap_or(')')),
                "&" => Kind::And,
                "or" => Kind::Or,
                _ => Kind::Word,
            };
            Tok { kind, text, offset: m.start() }
        })
        .collect()
}

fn closer(open: char) -> char {
    match open {
        '[' => ']',
        '{' => '}',
        _ => ')',
    }
}

struct Parser<'a> {
    formula: &'a str,
    tokens: Vec<Tok<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Tok<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn unexpected(&self, tok: Option<Tok<'a>>) -> FormulaError {
        FormulaError::Unexpected {
            formula: self.formula.to_string(),
            token: tok.map(|t| t.text.to_string()).unwrap_or_else(|| "<end>".to_string()),
        }
    }

    fn or_expr(&mut self) -> Result<Option<FormulaTree>, FormulaError> {
        let mut operands = vec![self.and_expr()?];
        while matches!(self.peek(), Some(Tok { kind: Kind::Or, .. })) {
            self.pos += 1;
            operands.push(self.and_expr()?);
        }
        if operands.len() == 1 {
            return Ok(operands.pop().flatten());
        }

        let nullable = operands.iter().any(Option::is_none);
        let mut present: Vec<FormulaTree> = operands.into_iter().flatten().collect();
        let tree = match present.len() {
            0 => return Ok(None),
            1 => present.remove(0),
            _ => FormulaTree::Or(present),
        };
        Ok(Some(if nullable { optional(tree) } else { tree }))
    }

    fn and_expr(&mut self) -> Result<Option<FormulaTree>, FormulaError> {
        let mut operands = vec![self.unary()?];
        while matches!(self.peek(), Some(Tok { kind: Kind::And, .. })) {
            self.pos += 1;
            operands.push(self.unary()?);
        }
        let mut present: Vec<FormulaTree> = operands.into_iter().flatten().collect();
        Ok(match present.len() {
            0 => None,
            1 => present.pop(),
            _ => Some(FormulaTree::And(present)),
        })
    }

    fn unary(&mut self) -> Result<Option<FormulaTree>, FormulaError> {
        let tok = self.peek();
        match tok {
            Some(Tok { kind: Kind::Word, text, .. }) => {
                self.pos += 1;
                Ok(Some(FormulaTree::Leaf(text.to_string())))
            }
            Some(Tok { kind: Kind::Open(open), offset, .. }) => {
                self.pos += 1;
                let close = closer(open);
                let inner = if matches!(self.peek(), Some(Tok { kind: Kind::Close(c), .. }) if c == close) {
                    None
                } else {
                    self.or_expr()?
                };
                match self.peek() {
                    Some(Tok { kind: Kind::Close(c), .. }) if c == close => self.pos += 1,
                    _ => {
                        return Err(FormulaError::Unbalanced {
                            formula: self.formula.to_string(),
                            delimiter: open,
                            offset,
                        });
                    }
                }
                Ok(match open {
                    '{' => inner.map(optional),
                    '[' => {
                        self.skip_cost_weight();
                        inner.map(|t| FormulaTree::Cost(Box::new(t)))
                    }
                    _ => inner,
                })
            }
            Some(Tok { kind: Kind::Close(c), offset, .. }) => {
                Err(FormulaError::Unbalanced { formula: self.formula.to_string(), delimiter: c, offset })
            }
            _ => Err(self.unexpected(tok)),
        }
    }

    /// Newer dictionaries write explicit weights after a cost group: `[A+]0.5`.
    fn skip_cost_weight(&mut self) {
        if let Some(Tok { kind: Kind::Word, text, .. }) = self.peek() {
            if regex!(r"^-?\d+(\.\d+)?$").is_match(text) {
                self.pos += 1;
            }
        }
    }
}

/// Mark `tree` optional. A tree that is already optional, directly or under a
/// cost group, is not wrapped a second time.
fn optional(tree: FormulaTree) -> FormulaTree {
    match tree {
        FormulaTree::Optional(_) => tree,
        FormulaTree::Cost(inner) => match *inner {
            FormulaTree::Optional(body) => FormulaTree::Optional(Box::new(FormulaTree::Cost(body))),
            other => FormulaTree::Optional(Box::new(FormulaTree::Cost(Box::new(other)))),
        },
        other => FormulaTree::Optional(Box::new(other)),
    }
}

/// Parse formula text into a tree. Blank text (or text consisting only of
/// null placeholders) yields `None`.
pub fn parse(formula: &str) -> Result<Option<FormulaTree>, FormulaError> {
    let mut parser = Parser { formula, tokens: tokenize(formula), pos: 0 };
    if parser.tokens.is_empty() {
        return Ok(None);
    }
    let tree = parser.or_expr()?;
    match parser.peek() {
        None => Ok(tree),
        Some(Tok { kind: Kind::Close(c), offset, .. }) => {
            Err(FormulaError::Unbalanced { formula: formula.to_string(), delimiter: c, offset })
        }
        other => Err(parser.unexpected(other)),
    }
}
