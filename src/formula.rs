//! Connector formulas.
//!
//! A lexicon entry describes how a word may link to its neighbours with a
//! formula such as:
//!
//! ```text
//! (D- or [()]) & (Ss+ or ({@MV+} & O-))
//! ```
//!
//! This module turns that text into something the matcher can compare:
//!
//! ```text
//! raw text ──▶ canonicalize_null_alternatives   (parser.rs: text -> FormulaTree -> text)
//!          ──▶ extract_balanced('{','}') loop   (normalize.rs: optional groups to a side list)
//!          ──▶ cleanup                          (normalize.rs: degenerate patterns removed)
//!          ──▶ NormalizedFormula { required, optionals }
//!                       │
//!                       └─ disjuncts()  (DNF: ordered connector lists)
//! ```
//!
//! ## Operators
//!
//! - `&`: all operands are required (ordered).
//! - `or`: exactly one operand is used.
//! - `(...)`: grouping; the literal `()` is the dictionary's "may be absent"
//!   placeholder and becomes an optional group.
//! - `{...}`: optional group.
//! - `[...]`: cost group: still valid, just less preferred.
//!
//! `&` binds tighter than `or`. Canonical rendering always parenthesizes
//! compound operands, so rendering then re-parsing yields the same tree.

#[path = "formula/normalize.rs"]
mod normalize;
#[path = "formula/parser.rs"]
mod parser;

pub use normalize::{
    NormalizedFormula, OptionalGroup, canonicalize_null_alternatives, cleanup, extract_balanced, flatten, normalize,
};
pub use parser::parse;

use std::fmt;

/// Upper bound on the disjuncts expanded from a single tree.
///
/// DNF expansion is exponential in the number of optional groups; real
/// dictionaries contain verb entries that would otherwise expand to millions.
pub const MAX_DISJUNCTS: usize = 2048;

/// Parsed connector formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaTree {
    Leaf(String),
    And(Vec<FormulaTree>),
    Or(Vec<FormulaTree>),
    Optional(Box<FormulaTree>),
    Cost(Box<FormulaTree>),
}

impl FormulaTree {
    /// Expand into disjunctive normal form: every ordered connector list this
    /// formula admits. Optional groups contribute an empty alternative, so the
    /// result may contain an empty list.
    pub fn disjuncts(&self) -> Vec<Vec<String>> {
        let mut truncated = false;
        let out = self.expand(&mut truncated);
        if truncated {
            tracing::warn!(formula = %self, limit = MAX_DISJUNCTS, "disjunct expansion truncated");
        }
        out.into_iter().map(|d| d.into_iter().map(str::to_string).collect()).collect()
    }

    fn expand(&self, truncated: &mut bool) -> Vec<Vec<&str>> {
        match self {
            FormulaTree::Leaf(name) => vec![vec![name.as_str()]],
            FormulaTree::Cost(child) => child.expand(truncated),
            FormulaTree::Optional(child) => {
                let mut out = vec![Vec::new()];
                out.extend(child.expand(truncated));
                cap(out, truncated)
            }
            FormulaTree::Or(children) => {
                let mut out = Vec::new();
                for child in children {
                    out.extend(child.expand(truncated));
                    if out.len() >= MAX_DISJUNCTS {
                        break;
                    }
                }
                cap(out, truncated)
            }
            FormulaTree::And(children) => {
                let mut acc: Vec<Vec<&str>> = vec![Vec::new()];
                for child in children {
                    let rhs = child.expand(truncated);
                    let mut next = Vec::with_capacity(acc.len().saturating_mul(rhs.len()).min(MAX_DISJUNCTS));
                    'product: for prefix in &acc {
                        for suffix in &rhs {
                            if next.len() >= MAX_DISJUNCTS {
                                *truncated = true;
                                break 'product;
                            }
                            let mut d = prefix.clone();
                            d.extend_from_slice(suffix);
                            next.push(d);
                        }
                    }
                    acc = next;
                }
                acc
            }
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, FormulaTree::And(_) | FormulaTree::Or(_))
    }
}

fn cap<T>(mut v: Vec<T>, truncated: &mut bool) -> Vec<T> {
    if v.len() > MAX_DISJUNCTS {
        v.truncate(MAX_DISJUNCTS);
        *truncated = true;
    }
    v
}

impl fmt::Display for FormulaTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn operands(f: &mut fmt::Formatter<'_>, children: &[FormulaTree], op: &str) -> fmt::Result {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                if child.is_compound() { write!(f, "({child})")? } else { write!(f, "{child}")? }
            }
            Ok(())
        }

        match self {
            FormulaTree::Leaf(name) => f.write_str(name),
            FormulaTree::And(children) => operands(f, children, "&"),
            FormulaTree::Or(children) => operands(f, children, "or"),
            FormulaTree::Optional(child) => write!(f, "{{{child}}}"),
            FormulaTree::Cost(child) => write!(f, "[{child}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> FormulaTree {
        FormulaTree::Leaf(s.to_string())
    }

    #[test]
    fn disjuncts_distribute_and_over_or() {
        let tree = FormulaTree::And(vec![FormulaTree::Or(vec![leaf("A-"), leaf("B-")]), leaf("C+")]);
        assert_eq!(tree.disjuncts(), vec![vec!["A-", "C+"], vec!["B-", "C+"]]);
    }

    #[test]
    fn optional_adds_an_empty_alternative() {
        let tree = FormulaTree::And(vec![leaf("S-"), FormulaTree::Optional(Box::new(leaf("O+")))]);
        assert_eq!(tree.disjuncts(), vec![vec!["S-"], vec!["S-", "O+"]]);
    }

    #[test]
    fn cost_is_transparent_to_expansion() {
        let tree = FormulaTree::Or(vec![FormulaTree::Cost(Box::new(leaf("A+"))), leaf("B+")]);
        assert_eq!(tree.disjuncts(), vec![vec!["A+"], vec!["B+"]]);
    }

    #[test]
    fn expansion_is_capped() {
        let optionals: Vec<FormulaTree> =
            (0..16).map(|i| FormulaTree::Optional(Box::new(leaf(&format!("X{i}+"))))).collect();
        let tree = FormulaTree::And(optionals);
        assert_eq!(tree.disjuncts().len(), MAX_DISJUNCTS);
    }

    #[test]
    fn display_parenthesizes_compound_operands() {
        let tree = FormulaTree::Or(vec![
            FormulaTree::And(vec![leaf("A+"), leaf("B-")]),
            FormulaTree::Optional(Box::new(leaf("C+"))),
            FormulaTree::Cost(Box::new(leaf("D-"))),
        ]);
        assert_eq!(tree.to_string(), "(A+ & B-) or {C+} or [D-]");
    }
}
