//! Adjacency validation of one token ordering.
//!
//! An ordering is accepted when it passes three global checks and a single
//! left-to-right scan in which every position either links to its right
//! neighbour or is covered by one of a handful of multi-word idiom windows.
//! The scan never backtracks: each matched pattern decides how far the scan
//! jumps, and the first position with no match rejects the ordering.
//!
//! ```text
//! position i ──▶ instrument verb ... "with"   connects_left / connects / connects_all
//!            ──▶ x "a"|"the" y                connects_through
//!            ──▶ ... "a"|"with" x "on"        connects_left / connects_min
//!            ──▶ "wants" [x [y]] "to" v       connects_left / connects_four
//!            ──▶ x y                          connects
//!            ──▶ x "with" (... "on")          connects_left
//! ```

use super::matcher::Matcher;
use super::trigger::IdiomMask;
use crate::error::GenerateError;
use crate::lexicon::{Grammar, Rule, tags};

/// Capitalized article placeholder. Allowed only as the first token.
pub const PLACEHOLDER: &str = "A";

/// Words whose first rule marks an instrument verb ("saw ... with").
const INSTRUMENT_EXEMPLAR: &str = "sawed";
/// As above, but only when "to" is also in the sentence.
const INSTRUMENT_EXEMPLAR_TO: &str = "writes";

/// Checks orderings against a grammar.
pub struct Validator<'g> {
    matcher: Matcher<'g>,
    idioms: IdiomMask,
    instrument: Option<&'g Rule>,
    instrument_to: Option<&'g Rule>,
}

impl<'g> Validator<'g> {
    pub fn new(grammar: &'g dyn Grammar) -> Self {
        Self::with_idioms(grammar, IdiomMask::all())
    }

    /// Restrict idiom windows to the keywords in `idioms`. Windows whose
    /// keyword is absent could never fire, so this only saves work.
    pub fn with_idioms(grammar: &'g dyn Grammar, idioms: IdiomMask) -> Self {
        Validator {
            matcher: Matcher::new(grammar),
            idioms,
            instrument: grammar.rules(INSTRUMENT_EXEMPLAR).first(),
            instrument_to: grammar.rules(INSTRUMENT_EXEMPLAR_TO).first(),
        }
    }

    /// Whether `tokens`, in this order, form an acceptable sentence.
    ///
    /// Only [`PLACEHOLDER`] is compared case-sensitively; every other
    /// decision uses lowercased tokens.
    pub fn is_valid<S: AsRef<str>>(&self, tokens: &[S]) -> Result<bool, GenerateError> {
        if tokens.is_empty() || tokens.iter().skip(1).any(|t| t.as_ref() == PLACEHOLDER) {
            return Ok(false);
        }

        let words: Vec<String> = tokens.iter().map(|t| t.as_ref().trim().to_lowercase()).collect();
        let g = self.matcher.grammar();

        let first = words[0].as_str();
        let verb = g.has_tag(first, tags::VERB) || g.has_tag(first, tags::VERB_PAST);
        let noun = g.has_tag(first, tags::NOUN) || g.has_tag(first, tags::NOUN_UNCOUNTABLE);
        if verb && !noun {
            tracing::trace!(first, "rejected: sentence starts with a verb");
            return Ok(false);
        }

        let last = words[words.len() - 1].as_str();
        let can_end = [tags::NOUN, tags::ADVERB, tags::NOUN_UNCOUNTABLE].iter().any(|t| g.has_tag(last, t));
        if last == "a" || (!g.subscripts(last).is_empty() && !can_end) {
            tracing::trace!(last, "rejected: sentence cannot end here");
            return Ok(false);
        }

        let mut i = 0;
        while i + 1 < words.len() {
            if words[i] == words[i + 1] {
                return Ok(false);
            }
            match self.step(&words, i)? {
                Some(next) => i = next,
                None => {
                    tracing::trace!(?words, at = i, "rejected: no link");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn is_instrument_verb(&self, word: &str, words: &[String]) -> bool {
        if word == "saw" {
            return true;
        }
        let Some(rule) = self.matcher.grammar().rules(word).first() else {
            return false;
        };
        self.instrument == Some(rule) || (self.instrument_to == Some(rule) && words.iter().any(|w| w == "to"))
    }

    /// Try every pattern at position `i`. Returns where the scan continues,
    /// or `None` when nothing matched.
    fn step(&self, w: &[String], i: usize) -> Result<Option<usize>, GenerateError> {
        let m = &self.matcher;
        let n = w.len();
        let (left, right) = (w[i].as_str(), w[i + 1].as_str());

        if self.idioms.contains(IdiomMask::WITH) {
            let with_at = position(w, "with").filter(|&k| k == i + 2 || k == i + 3);
            if let Some(k) = with_at {
                if self.is_instrument_verb(left, w) {
                    let ok = if k == i + 2 {
                        m.connects_left(left, right, &w[k])?
                    } else if right == "to" {
                        m.connects_left(left, right, &w[k])? && m.connects(right, &w[k - 1])?
                    } else if right == "the" {
                        m.connects_all(left, right, &w[k - 1], &w[k])?
                    } else {
                        false
                    };
                    return Ok(ok.then_some(k));
                }
            }
        }

        if self.idioms.contains(IdiomMask::ARTICLE) && (right == "a" || right == "the") && i + 2 < n {
            return Ok(m.connects_through(left, right, &w[i + 2])?.then_some(i + 2));
        }

        if self.idioms.contains(IdiomMask::ON) && right == "on" && i >= 2 && (w[i - 1] == "a" || w[i - 1] == "with") {
            let ok = if w[i - 1] == "a" && i >= 3 {
                m.connects_left(&w[i - 3], &w[i - 2], right)?
            } else {
                m.connects_left(&w[i - 2], &w[i - 1], right)? || (i >= 4 && m.connects_min(&w[i - 4], right)?)
            };
            return Ok(ok.then_some(i + 1));
        }

        if self.idioms.contains(IdiomMask::WANTS) && left == "wants" && i + 2 < n {
            let next = if right == "to" {
                m.connects_left(left, right, &w[i + 2])?.then_some(i + 3)
            } else if w[i + 2] == "to" {
                if i + 3 < n { m.connects_four(left, right, &w[i + 2], &w[i + 3])?.then_some(i + 4) } else { None }
            } else if i + 3 < n && w[i + 3] == "to" {
                if i + 4 < n { m.connects_four(left, &w[i + 2], &w[i + 3], &w[i + 4])?.then_some(i + 5) } else { None }
            } else {
                None
            };
            return Ok(next);
        }

        if m.connects(left, right)? {
            return Ok(Some(i + 1));
        }

        // "with" may hang off a later "on" instead of its left neighbour.
        if right == "with" && position(w, "on").is_some_and(|k| k > i) && m.connects_left(left, right, "on")? {
            return Ok(Some(i + 1));
        }

        Ok(None)
    }
}

fn position(words: &[String], word: &str) -> Option<usize> {
    words.iter().position(|w| w == word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::testing::fixture;

    #[test]
    fn accepts_a_plain_sentence() {
        let lex = fixture();
        let v = Validator::new(&lex);
        assert!(v.is_valid(&["the", "cat", "sat"]).unwrap());
        assert!(v.is_valid(&["The", "cat", "sat"]).unwrap());
        assert!(!v.is_valid(&["cat", "the", "sat"]).unwrap());
        assert!(!v.is_valid(&["sat", "the", "cat"]).unwrap());
    }

    #[test]
    fn placeholder_only_leads() {
        let lex = fixture();
        let v = Validator::new(&lex);
        assert!(v.is_valid(&["A", "cat", "sat"]).unwrap());
        assert!(!v.is_valid(&["cat", "A", "sat"]).unwrap());
    }

    #[test]
    fn first_and_last_token_rules() {
        let mut b = Lexicon::builder();
        b.entry("ran.v-d", "Ss- & {MV+}").unwrap();
        b.entry("fast.r", "MV-").unwrap();
        b.entry("dogs.n", "Ss+").unwrap();
        b.entry("a", "Ds+").unwrap();
        let lex = b.build();
        let v = Validator::new(&lex);

        assert!(v.is_valid(&["dogs", "ran", "fast"]).unwrap());
        assert!(!v.is_valid(&["dogs", "ran"]).unwrap());
        assert!(!v.is_valid(&["ran", "fast"]).unwrap());
        assert!(!v.is_valid(&["dogs", "a"]).unwrap());
    }

    #[test]
    fn repeated_neighbours_reject() {
        let lex = fixture();
        assert!(!Validator::new(&lex).is_valid(&["the", "the", "cat", "sat"]).unwrap());
    }

    #[test]
    fn wants_to_window() {
        let mut b = Lexicon::builder();
        b.entry("he.n", "Ss+").unwrap();
        b.entry("wants", "Ss- & (TO+ or (O+ & TO+ & I+))").unwrap();
        b.entry("to", "TO- & I+").unwrap();
        b.entry("it.n", "O-").unwrap();
        b.entry("eat.n", "I-").unwrap();
        let lex = b.build();
        let v = Validator::new(&lex);

        assert!(v.is_valid(&["he", "wants", "it", "to", "eat"]).unwrap());
        assert!(!v.is_valid(&["he", "wants", "eat", "to", "it"]).unwrap());
    }

    fn lexicon(entries: &[(&str, &str)]) -> Lexicon {
        let mut b = Lexicon::builder();
        for (word, formula) in entries {
            b.entry(word, formula).unwrap();
        }
        b.build()
    }

    fn check(entries: &[(&str, &str)], cases: &[(&str, bool)]) {
        let lex = lexicon(entries);
        let v = Validator::new(&lex);
        for (sentence, expected) in cases {
            let words: Vec<&str> = sentence.split(' ').collect();
            assert_eq!(v.is_valid(&words).unwrap(), *expected, "{sentence:?}");
        }
    }

    #[test]
    fn instrument_verb_window_with_article() {
        let entries = [
            ("he.n", "Ss+"),
            ("saw.v", "Ss- & O+ & MV+"),
            ("sawed.v-d", "Ss- & O+ & MV+"),
            ("cut.v-d", "Ss- & O+ & MV+"),
            ("hit.v-d", "Ss- & (O+ & MV+)"),
            ("the", "D+"),
            ("man.n", "O- or D-"),
            ("with", "MV- & J+"),
            ("scope.n", "J- or D-"),
        ];
        check(
            &entries,
            &[
                ("he saw the man with the scope", true),
                ("he cut the man with the scope", true),
                ("he hit the man with the scope", false),
                ("he saw man with the scope", false),
            ],
        );
    }

    #[test]
    fn instrument_verb_window_through_to() {
        let entries = [
            ("he.n", "Ss+"),
            ("writes.v", "Ss- & (TO+ or MV+)"),
            ("to", "TO- & J+"),
            ("her.n", "J-"),
            ("with", "MV- & J+"),
            ("ink.n", "J-"),
        ];
        check(&entries, &[("he writes to her with ink", true)]);

        let mut reversed = entries;
        reversed[1] = ("writes.v", "Ss- & (MV+ or TO+)");
        check(&reversed, &[("he writes to her with ink", false)]);
    }

    #[test]
    fn on_window_after_article() {
        let entries = [("he.n", "Ss+ or K+"), ("put.v", "Ss- & O+"), ("a", "D+"), ("hat.n", "O- or D-"), ("on", "K-")];
        check(&entries, &[("he put a hat on", true)]);

        let mut reversed = entries;
        reversed[0] = ("he.n", "K+ or Ss+");
        check(&reversed, &[("he put a hat on", false)]);
    }

    #[test]
    fn on_window_after_with() {
        let entries =
            [("he.n", "Ss+"), ("sat.v", "Ss- & (MV+ or K+)"), ("with", "MV- & J+"), ("her.n", "J-"), ("on", "K-")];
        check(&entries, &[("he sat with her on", true)]);

        let mut reversed = entries;
        reversed[1] = ("sat.v", "Ss- & (K+ or MV+)");
        check(&reversed, &[("he sat with her on", false)]);
    }

    #[test]
    fn on_window_falls_back_to_the_sentence_head() {
        let entries = [
            ("he.n", "Ss+ or (Ss+ & K+)"),
            ("she.n", "Ss+"),
            ("sat.v", "Ss- & MV+"),
            ("down", "MV- & MV+"),
            ("with", "MV- & J+"),
            ("her.n", "J-"),
            ("on", "K-"),
        ];
        check(&entries, &[("he sat down with her on", true), ("she sat down with her on", false)]);
    }

    #[test]
    fn later_on_does_not_rescue_an_unlinked_with() {
        let entries = [("he.n", "Ss+"), ("with", "MV- & J+"), ("her.n", "J-"), ("on", "K-")];
        check(&entries, &[("he with her on", false)]);
    }

    #[test]
    fn unknown_word_surfaces_from_the_scan() {
        let lex = fixture();
        let err = Validator::new(&lex).is_valid(&["the", "dog", "sat"]).unwrap_err();
        assert_eq!(err, GenerateError::UnknownWord { word: "dog".to_string() });
    }
}
