//! Formula normalization.
//!
//! The matcher never looks at raw dictionary text. It looks at a
//! [`NormalizedFormula`]: the formula's required part as a tree, plus a side
//! list of every `{...}` optional group pulled out of it. Inside each group,
//! nested optional groups are dropped, and a second "uncosted" view also drops
//! `[...]` cost alternatives.
//!
//! ```text
//! "(D- or ()) & Ss+ & {[@MV+] or O+}"
//!     canonicalize  -> "{D-} & Ss+ & {[@MV+] or O+}"
//!     extract '{'   -> required "  & Ss+ & "   groups ["{D-}", "{[@MV+] or O+}"]
//!     cleanup       -> required "Ss+"
//!     uncosted      -> group 2: "O+"
//! ```

use std::fmt;

use super::FormulaTree;
use super::parser::parse;
use crate::error::FormulaError;

/// Rewrite degenerate structural patterns until nothing changes.
///
/// Every rewrite strictly shortens the text (or leaves it alone), so the loop
/// always reaches a fixed point.
pub fn cleanup(text: &str) -> String {
    let mut current = regex!(r"\s+").replace_all(text.trim(), " ").into_owned();
    loop {
        let next = cleanup_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn cleanup_once(text: &str) -> String {
    let s = regex!(r"\(\s*\)|\[\s*\]").replace_all(text, "");
    let s = regex!(r"([(\[{])\s*(?:&\s*|or\s+)").replace_all(&s, "$1");
    let s = regex!(r"(?:\s*&|\s+or)\s*([)\]}])").replace_all(&s, "$1");
    let s = regex!(r"&\s*&").replace_all(&s, "&");
    let s = regex!(r"(^|\s)or\s+or(\s|$)").replace_all(&s, "${1}or${2}");
    let s = regex!(r"^\s*(?:&\s*|or(?:\s+|$))").replace_all(&s, "");
    let s = regex!(r"(?:\s*&|(?:^|\s+)or)\s*$").replace_all(&s, "");
    regex!(r"\s+").replace_all(s.trim(), " ").into_owned()
}

/// Replace the dictionary's empty-parenthesis placeholder with explicit
/// optional groups, returning canonical formula text.
///
/// `"(A+ or ())"` becomes `"{A+}"`; an empty group joined by `&` disappears.
/// Malformed input is an error rather than a non-terminating rewrite.
pub fn canonicalize_null_alternatives(text: &str) -> Result<String, FormulaError> {
    Ok(parse(text)?.map(|tree| tree.to_string()).unwrap_or_default())
}

/// Find the first top-level `open ... close` region in `text`.
///
/// Returns the region (delimiters included) and the text with that region
/// cut out, or `None` when `text` contains no `open`.
pub fn extract_balanced(text: &str, open: char, close: char) -> Result<Option<(String, String)>, FormulaError> {
    let Some(start) = text.find(open) else {
        return Ok(None);
    };

    let mut depth = 0usize;
    for (i, c) in text[start..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                let end = start + i + c.len_utf8();
                let span = text[start..end].to_string();
                let remainder = format!("{}{}", &text[..start], &text[end..]);
                return Ok(Some((span, remainder)));
            }
        }
    }

    Err(FormulaError::Unbalanced { formula: text.to_string(), delimiter: open, offset: start })
}

/// Strip every grouping delimiter, leaving a flat `&`/`or` token stream.
pub fn flatten(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !matches!(c, '(' | ')' | '[' | ']' | '{' | '}')).collect();
    regex!(r"\s+").replace_all(stripped.trim(), " ").into_owned()
}

/// Remove every `open ... close` region from `text` and tidy what is left.
fn strip_groups(text: &str, open: char, close: char) -> Result<String, FormulaError> {
    let mut rest = text.to_string();
    while let Some((_, remainder)) = extract_balanced(&rest, open, close)? {
        rest = remainder;
    }
    Ok(cleanup(&rest))
}

/// One `{...}` group pulled out of a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalGroup {
    body: FormulaTree,
    uncosted: Option<FormulaTree>,
}

impl OptionalGroup {
    fn from_span(span: &str) -> Result<Option<Self>, FormulaError> {
        let inner = span.get(1..span.len().saturating_sub(1)).unwrap_or("");
        let body_text = strip_groups(inner, '{', '}')?;
        let Some(body) = parse(&body_text)? else {
            return Ok(None);
        };
        let uncosted = parse(&strip_groups(&body_text, '[', ']')?)?;
        Ok(Some(OptionalGroup { body, uncosted }))
    }

    /// The group's formula, cost alternatives included.
    pub fn body(&self) -> &FormulaTree {
        &self.body
    }

    /// The group's formula with cost alternatives removed; `None` when the
    /// group consisted of cost alternatives only.
    pub fn uncosted(&self) -> Option<&FormulaTree> {
        self.uncosted.as_ref()
    }
}

/// A formula split into its required part and its optional groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedFormula {
    required: Option<FormulaTree>,
    optionals: Vec<OptionalGroup>,
}

impl NormalizedFormula {
    pub fn required(&self) -> Option<&FormulaTree> {
        self.required.as_ref()
    }

    pub fn optionals(&self) -> &[OptionalGroup] {
        &self.optionals
    }

    /// Flat token stream of the whole normalized formula (diagnostics).
    pub fn flat(&self) -> String {
        flatten(&self.to_string())
    }
}

/// Normalize raw formula text. See the module docs for the pipeline.
pub fn normalize(text: &str) -> Result<NormalizedFormula, FormulaError> {
    let mut remainder = canonicalize_null_alternatives(text)?;
    let mut optionals = Vec::new();
    while let Some((span, rest)) = extract_balanced(&remainder, '{', '}')? {
        if let Some(group) = OptionalGroup::from_span(&span)? {
            optionals.push(group);
        }
        remainder = rest;
    }
    let required = parse(&cleanup(&remainder))?;
    Ok(NormalizedFormula { required, optionals })
}

impl fmt::Display for NormalizedFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.optionals.len() + 1);
        if let Some(required) = &self.required {
            let wrap = matches!(required, FormulaTree::Or(_)) && !self.optionals.is_empty();
            parts.push(if wrap { format!("({required})") } else { required.to_string() });
        }
        parts.extend(self.optionals.iter().map(|g| format!("{{{}}}", g.body)));
        f.write_str(&parts.join(" & "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> FormulaTree {
        FormulaTree::Leaf(s.to_string())
    }

    #[test]
    fn cleanup_removes_degenerate_patterns() {
        let cases = [
            ("(A+ & ) or C-", "(A+) or C-"),
            ("( & A+) & B-", "(A+) & B-"),
            ("A+ & ", "A+"),
            (" & A+", "A+"),
            ("A+ or  or C+", "A+ or C+"),
            ("A+ & & B-", "A+ & B-"),
            ("() or D-", "D-"),
            ("( & ) or D-", "D-"),
            ("[ or ] & X+", "X+"),
            ("A+   &\tB-", "A+ & B-"),
        ];
        for (input, expected) in cases {
            assert_eq!(cleanup(input), expected, "cleanup({input:?})");
        }
    }

    #[test]
    fn cleanup_leaves_connectors_that_start_with_or_alone() {
        assert_eq!(cleanup("(ORx+ & B-)"), "(ORx+ & B-)");
    }

    #[test]
    fn canonicalize_rewrites_placeholders() {
        assert_eq!(canonicalize_null_alternatives("(A+ or ())").unwrap(), "{A+}");
        assert_eq!(canonicalize_null_alternatives("(D- or ()) & Ss+").unwrap(), "{D-} & Ss+");
        assert_eq!(canonicalize_null_alternatives("()").unwrap(), "");
        assert!(canonicalize_null_alternatives("((A+ or ())").is_err());
    }

    #[test]
    fn extract_balanced_takes_outermost_region() {
        let (span, rest) = extract_balanced("A+ & {B- & {C+}} & D-", '{', '}').unwrap().unwrap();
        assert_eq!(span, "{B- & {C+}}");
        assert_eq!(rest, "A+ &  & D-");
        assert_eq!(extract_balanced("A+ & B-", '{', '}').unwrap(), None);
        assert!(extract_balanced("A+ & {B-", '{', '}').is_err());
    }

    #[test]
    fn flatten_strips_grouping() {
        assert_eq!(flatten("(A+ & [B-]) or {C+}"), "A+ & B- or C+");
    }

    #[test]
    fn normalize_splits_required_and_optional_parts() {
        let n = normalize("(D- or ()) & Ss+ & {[@MV+] or O+}").unwrap();
        assert_eq!(n.required(), Some(&leaf("Ss+")));
        assert_eq!(n.optionals().len(), 2);
        assert_eq!(n.optionals()[0].body(), &leaf("D-"));
        assert_eq!(n.optionals()[1].uncosted(), Some(&leaf("O+")));
        assert_eq!(
            n.optionals()[1].body(),
            &FormulaTree::Or(vec![FormulaTree::Cost(Box::new(leaf("@MV+"))), leaf("O+")])
        );
    }

    #[test]
    fn nested_optionals_are_dropped_from_group_bodies() {
        let n = normalize("S- & {O+ & {MV+}}").unwrap();
        assert_eq!(n.optionals()[0].body(), &leaf("O+"));
    }

    #[test]
    fn doubly_optional_groups_keep_their_connectors() {
        let expected = normalize("{Ss+}").unwrap();
        for text in ["({Ss+} or ())", "{Ss+ or ()}", "{{Ss+}}"] {
            assert_eq!(normalize(text).unwrap(), expected, "{text:?}");
        }

        let costed = normalize("{[{Ss+}]}").unwrap();
        assert_eq!(costed.required(), None);
        assert_eq!(costed.optionals()[0].body(), &FormulaTree::Cost(Box::new(leaf("Ss+"))));
        assert_eq!(costed.optionals()[0].uncosted(), None);
    }

    #[test]
    fn normalize_is_idempotent() {
        let formulas = [
            "D+",
            "(D- or ()) & Ss+",
            "S- & {O+} & {@MV+}",
            "(A+ or B+) & {C-}",
            "({B+} & {C+}) or D-",
            "[A+] or (B- & {[C+] or D+})",
            "()",
            "({Ss+} or ())",
        ];
        for text in formulas {
            let once = normalize(text).unwrap();
            let twice = normalize(&once.to_string()).unwrap();
            assert_eq!(once, twice, "normalize not idempotent for {text:?} (rendered {once})");
            assert_eq!(once.to_string(), twice.to_string());
        }
    }

    #[test]
    fn flat_view_lists_every_connector() {
        let n = normalize("S- & {O+}").unwrap();
        assert_eq!(n.flat(), "S- & O+");
    }
}
