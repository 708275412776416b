//! Connector matching between words.
//!
//! Every check reads the two (or more) words' rules from the [`Grammar`] and
//! compares connector conjuncts. A rightward connector (`X+`) on an earlier
//! word links with a leftward connector (`X-`) of the same name on a later
//! word; links are never symmetric.
//!
//! ## Pair search
//!
//! For each left rule × right rule, alternatives are tried in this order and
//! the first link wins:
//!
//! ```text
//! (a) required part      vs required part
//! (b) optional group     vs optional group
//! (c) optional (uncosted) vs required part
//! (d) required part      vs optional (uncosted)
//! ```
//!
//! An alternative contributes its rightward connectors (left word) or its
//! leftward connectors (right word); both sides must be non-empty.
//!
//! ## Ordinals
//!
//! [`Matcher::connects_indexed`] also reports where the link was found: the
//! 1-based alternative index for a required part, or the 1-based group index
//! for an optional group. The idiom checks compare these ordinals to decide
//! which of two words attaches first.

use super::connector::{conjuncts_equal, equals};
use crate::error::GenerateError;
use crate::lexicon::{Disjunct, Grammar, Overlay, Rule, Shape, tags};
use crate::{Polarity, flip_connector};

/// Which word of a pair an ordinal refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// 1-based positions of a link on both words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    left: usize,
    right: usize,
}

impl Link {
    fn ordinal(self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// First link between two rule shapes, trying the passes in order.
fn link_between(left: &Shape, right: &Shape) -> Option<Link> {
    for (li, l) in left.required.iter().enumerate() {
        for (ri, r) in right.required.iter().enumerate() {
            if links(l, r) {
                return Some(Link { left: li + 1, right: ri + 1 });
            }
        }
    }

    for (gi, lg) in left.groups.iter().enumerate() {
        for (gj, rg) in right.groups.iter().enumerate() {
            if lg.iter().any(|l| rg.iter().any(|r| links(l, r))) {
                return Some(Link { left: gi + 1, right: gj + 1 });
            }
        }
    }

    for (gi, lg) in left.uncosted.iter().enumerate() {
        for (ri, r) in right.required.iter().enumerate() {
            if lg.iter().any(|l| links(l, r)) {
                return Some(Link { left: gi + 1, right: ri + 1 });
            }
        }
    }

    for (gj, rg) in right.uncosted.iter().enumerate() {
        for (li, l) in left.required.iter().enumerate() {
            if rg.iter().any(|r| links(l, r)) {
                return Some(Link { left: li + 1, right: gj + 1 });
            }
        }
    }

    None
}

/// Rightward connectors of `left` (flipped) against leftward connectors of
/// `right`.
fn links(left: &[String], right: &[String]) -> bool {
    let outgoing: Vec<String> =
        left.iter().filter(|c| Polarity::of(c) == Some(Polarity::Right)).map(|c| flip_connector(c)).collect();
    let incoming: Vec<&str> =
        right.iter().filter(|c| Polarity::of(c) == Some(Polarity::Left)).map(String::as_str).collect();
    conjuncts_equal(&outgoing, &incoming)
}

/// The only leftward connector of `d`, if it has exactly one.
fn sole_leftward(d: &Disjunct) -> Option<&str> {
    let mut it = d.leftward();
    match (it.next(), it.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Connector checks over a borrowed grammar.
///
/// Words are looked up exactly as given; callers lowercase them first. A
/// word without rules fails the check with [`GenerateError::UnknownWord`].
#[derive(Clone, Copy)]
pub struct Matcher<'g> {
    grammar: &'g dyn Grammar,
}

impl<'g> Matcher<'g> {
    pub fn new(grammar: &'g dyn Grammar) -> Self {
        Matcher { grammar }
    }

    pub fn grammar(&self) -> &'g dyn Grammar {
        self.grammar
    }

    fn rules(&self, word: &str) -> Result<&'g [Rule], GenerateError> {
        let rules = self.grammar.rules(word);
        if rules.is_empty() { Err(GenerateError::unknown(word)) } else { Ok(rules) }
    }

    /// Word-level agreement checked before any connector comparison.
    fn agree(&self, left: &str, right: &str) -> bool {
        if left == right || (left == "a" && right == "is") {
            return false;
        }
        if left == "a" || right == "a" {
            return true;
        }

        let g = self.grammar;
        let clash = |noun: &str, other: &str| {
            g.has_tag(noun, tags::NOUN_UNCOUNTABLE) && (g.has_tag(other, tags::MODIFIER) || g.has_tag(other, tags::FEMININE))
        };
        !(clash(left, right) || clash(right, left))
    }

    fn find_link(&self, left: &str, right: &str) -> Result<Option<Link>, GenerateError> {
        let (left_rules, right_rules) = (self.rules(left)?, self.rules(right)?);
        if !self.agree(left, right) {
            return Ok(None);
        }

        for rule in left_rules {
            if let Some(link) = right_rules.iter().find_map(|r| link_between(rule.shape(), r.shape())) {
                tracing::trace!(left, right, ?link, "link found");
                return Ok(Some(link));
            }
        }
        Ok(None)
    }

    /// Whether `left` can link rightward to `right`.
    pub fn connects(&self, left: &str, right: &str) -> Result<bool, GenerateError> {
        Ok(self.find_link(left, right)?.is_some())
    }

    /// Like [`connects`](Self::connects), also returning the 1-based ordinal
    /// of the link on `side`. `(false, 0)` when there is no link.
    pub fn connects_indexed(&self, left: &str, right: &str, side: Side) -> Result<(bool, usize), GenerateError> {
        Ok(match self.find_link(left, right)? {
            Some(link) => (true, link.ordinal(side)),
            None => (false, 0),
        })
    }

    /// Article window: both `left` and `mid` link to `right`, and `left`
    /// attaches at an earlier ordinal of `right` than `mid` does.
    pub fn connects_through(&self, left: &str, mid: &str, right: &str) -> Result<bool, GenerateError> {
        if left == mid || left == right || mid == right {
            return Ok(false);
        }
        if mid == "a" && right == "is" {
            return Ok(false);
        }
        let (left_ok, left_at) = self.connects_indexed(left, right, Side::Right)?;
        let (mid_ok, mid_at) = self.connects_indexed(mid, right, Side::Right)?;
        Ok(left_ok && mid_ok && left_at < mid_at)
    }

    /// `left` links to both `mid` and `right`, using an earlier ordinal of
    /// its own formula for `mid`.
    pub fn connects_left(&self, left: &str, mid: &str, right: &str) -> Result<bool, GenerateError> {
        if left == mid || left == right || mid == right {
            return Ok(false);
        }
        let (mid_ok, mid_at) = self.connects_indexed(left, mid, Side::Left)?;
        let (right_ok, right_at) = self.connects_indexed(left, right, Side::Left)?;
        Ok(mid_ok && right_ok && mid_at < right_at)
    }

    /// Disjunct-level check: any single rightward connector of a `left`
    /// disjunct matches any single leftward connector of a `right` disjunct.
    /// No agreement gate.
    pub fn connects_min(&self, left: &str, right: &str) -> Result<bool, GenerateError> {
        let (left_rules, right_rules) = (self.rules(left)?, self.rules(right)?);
        for dl in left_rules.iter().flat_map(Rule::disjuncts) {
            let outgoing: Vec<String> = dl.rightward().map(flip_connector).collect();
            if outgoing.is_empty() {
                continue;
            }
            for dr in right_rules.iter().flat_map(Rule::disjuncts) {
                if outgoing.iter().any(|o| dr.leftward().any(|c| equals(o, c))) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// `left` (e.g. "wants") has a disjunct with several rightward connectors,
    /// and `mid`, `right` and `next` attach to them in that order.
    ///
    /// `mid` and `right` count only through a disjunct with exactly one
    /// leftward connector; `next` may use any of its leftward connectors.
    /// The first position found for each word is kept.
    pub fn connects_four(&self, left: &str, mid: &str, right: &str, next: &str) -> Result<bool, GenerateError> {
        let left_rules = self.rules(left)?;
        let (mid_rules, right_rules, next_rules) = (self.rules(mid)?, self.rules(right)?, self.rules(next)?);

        let single = |rules: &[Rule], part: &str| {
            rules.iter().flat_map(Rule::disjuncts).any(|d| sole_leftward(d).is_some_and(|c| equals(&flip_connector(c), part)))
        };
        let any = |rules: &[Rule], part: &str| {
            rules.iter().flat_map(Rule::disjuncts).any(|d| d.leftward().any(|c| equals(&flip_connector(c), part)))
        };

        let (mut mid_at, mut right_at, mut next_at) = (None, None, None);
        for dl in left_rules.iter().flat_map(Rule::disjuncts) {
            let parts: Vec<&str> = dl.rightward().collect();
            if parts.len() < 2 {
                continue;
            }
            for (idx, part) in parts.into_iter().enumerate() {
                if mid_at.is_none() && single(mid_rules, part) {
                    mid_at = Some(idx);
                }
                if right_at.is_none() && single(right_rules, part) {
                    right_at = Some(idx);
                }
                if next_at.is_none() && any(next_rules, part) {
                    next_at = Some(idx);
                }
            }
        }

        tracing::trace!(left, mid, right, next, ?mid_at, ?right_at, ?next_at, "four-word window");
        Ok(matches!((mid_at, right_at, next_at), (Some(m), Some(r), Some(n)) if m < r && r < n))
    }

    /// Split each multi-connector disjunct of `left` into single connectors
    /// and treat each connector as a word of its own. True when, within one
    /// of `left`'s rules, some connector links through `mid` to `right` and
    /// some connector links to `next`.
    ///
    /// The connector words live in a call-scoped [`Overlay`]; the grammar
    /// itself is never modified.
    pub fn connects_all(&self, left: &str, mid: &str, right: &str, next: &str) -> Result<bool, GenerateError> {
        let left_rules = self.rules(left)?;
        for word in [mid, right, next] {
            self.rules(word)?;
        }

        let (mut through, mut onward) = (false, false);
        for rule in left_rules {
            for dl in rule.disjuncts() {
                let parts: Vec<&str> = dl.rightward().collect();
                if parts.len() < 2 {
                    continue;
                }
                for part in parts {
                    let mut overlay = Overlay::new(self.grammar);
                    overlay.add_word(part, Rule::new(part)?);
                    let scoped = Matcher::new(&overlay);
                    through |= scoped.connects_through(part, mid, right)?;
                    onward |= scoped.connects(part, next)?;
                }
            }
            if through && onward {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;

    fn lexicon(entries: &[(&str, &str)]) -> Lexicon {
        let mut b = Lexicon::builder();
        for (word, formula) in entries {
            b.entry(word, formula).unwrap();
        }
        b.build()
    }

    #[test]
    fn links_are_directional() {
        let lex = lexicon(&[("john", "Ss+"), ("runs", "Ss-")]);
        let m = Matcher::new(&lex);
        assert!(m.connects("john", "runs").unwrap());
        assert!(!m.connects("runs", "john").unwrap());
    }

    #[test]
    fn unknown_words_are_errors() {
        let lex = lexicon(&[("john", "Ss+")]);
        let err = Matcher::new(&lex).connects("john", "zzz").unwrap_err();
        assert_eq!(err, GenerateError::UnknownWord { word: "zzz".to_string() });
    }

    #[test]
    fn optional_groups_link_with_each_other() {
        let lex = lexicon(&[("x", "{Ox+}"), ("y", "{Ox-}")]);
        let m = Matcher::new(&lex);
        assert_eq!(m.connects_indexed("x", "y", Side::Left).unwrap(), (true, 1));
    }

    #[test]
    fn costed_alternatives_of_an_optional_group_do_not_reach_required_parts() {
        let lex = lexicon(&[("left", "A- & {[Q+] or O+}"), ("obj", "O-"), ("costly", "Q-")]);
        let m = Matcher::new(&lex);
        assert!(m.connects("left", "obj").unwrap());
        assert!(!m.connects("left", "costly").unwrap());
    }

    #[test]
    fn agreement_gate() {
        let mut b = Lexicon::builder();
        b.entry("big.m", "A+").unwrap().entry("milk.n-u", "A- & Ss+").unwrap();
        b.entry("a", "Ss+").unwrap().entry("is", "Ss-").unwrap();
        b.entry("echo", "X+ & X-").unwrap();
        let lex = b.build();
        let m = Matcher::new(&lex);

        assert!(!m.connects("big", "milk").unwrap());
        assert!(!m.connects("a", "is").unwrap());
        assert!(!m.connects("echo", "echo").unwrap());
        assert!(m.connects("milk", "is").unwrap());
    }

    #[test]
    fn nested_null_placeholders_still_link() {
        let lex = lexicon(&[("x1", "{Ss+}"), ("x2", "({Ss+} or ())"), ("x3", "{Ss+ or ()}"), ("y", "Ss-")]);
        let m = Matcher::new(&lex);
        for word in ["x1", "x2", "x3"] {
            assert!(m.connects(word, "y").unwrap(), "{word} -> y");
        }
    }

    #[test]
    fn indexed_reports_the_requested_side() {
        let lex = lexicon(&[("l", "A+ or B+"), ("r", "B-")]);
        let m = Matcher::new(&lex);
        assert_eq!(m.connects_indexed("l", "r", Side::Left).unwrap(), (true, 2));
        assert_eq!(m.connects_indexed("l", "r", Side::Right).unwrap(), (true, 1));
        assert_eq!(m.connects_indexed("r", "l", Side::Right).unwrap(), (false, 0));
    }

    #[test]
    fn through_orders_attachments_on_the_right_word() {
        let lex = lexicon(&[("l", "X+ or Y+"), ("m", "Y+"), ("r", "X- or Y-")]);
        let m = Matcher::new(&lex);
        assert!(m.connects_through("l", "m", "r").unwrap());
        assert!(!m.connects_through("m", "l", "r").unwrap());
        assert!(!m.connects_through("l", "l", "r").unwrap());
    }

    #[test]
    fn left_orders_attachments_on_the_left_word() {
        let lex = lexicon(&[("l", "A+ or B+"), ("m", "A-"), ("r", "B-")]);
        let m = Matcher::new(&lex);
        assert!(m.connects_left("l", "m", "r").unwrap());
        assert!(!m.connects_left("l", "r", "m").unwrap());
    }

    #[test]
    fn min_matches_single_connectors_only() {
        let lex = lexicon(&[("l", "A+ & B+"), ("r", "B- & C-")]);
        let m = Matcher::new(&lex);
        assert!(!m.connects("l", "r").unwrap());
        assert!(m.connects_min("l", "r").unwrap());
        assert!(!m.connects_min("r", "l").unwrap());
    }

    #[test]
    fn four_word_window_follows_connector_order() {
        let lex = lexicon(&[("wants", "Ss- & O+ & TO+ & I+"), ("it", "O-"), ("to", "TO-"), ("eat", "I- & {O+}")]);
        let m = Matcher::new(&lex);
        assert!(m.connects_four("wants", "it", "to", "eat").unwrap());
        assert!(!m.connects_four("wants", "to", "it", "eat").unwrap());
    }

    #[test]
    fn connector_words_are_scoped_to_the_check() {
        let lex = lexicon(&[
            ("saw", "Ss- & O+ & MV+"),
            ("the", "D+"),
            ("man", "{O-} & {D-}"),
            ("with", "MV- & J+"),
            ("scope", "J-"),
        ]);
        let m = Matcher::new(&lex);
        assert!(m.connects_all("saw", "the", "man", "with").unwrap());
        assert!(!m.connects_all("saw", "the", "man", "scope").unwrap());
        assert!(lex.rules("O+").is_empty());
    }
}
