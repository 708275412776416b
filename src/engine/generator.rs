//! Permutation-driven sentence generation.
//!
//! ```text
//! bag ── TriggerInfo::scan ── strip "not"/"now" ── lexicon check
//!     ── original order, then every distinct arrangement (sorted, next-permutation)
//!     ── ArrangementFilter ── Validator ── render ── BTreeSet<String>
//! ```

use std::collections::BTreeSet;
use std::time::Instant;

use super::metrics::GenerationMetrics;
use super::trigger::{ModifierFlags, TriggerInfo};
use super::validator::Validator;
use crate::Options;
use crate::error::GenerateError;
use crate::lexicon::Grammar;

/// Bags above this size still run, but enumeration gets slow.
const LARGE_BAG: usize = 8;

/// Pre-filter applied to each arrangement before validation.
pub trait ArrangementFilter {
    fn admit(&self, arrangement: &[&str]) -> bool;
}

/// Admits every arrangement.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ArrangementFilter for AcceptAll {
    fn admit(&self, _arrangement: &[&str]) -> bool {
        true
    }
}

impl<F> ArrangementFilter for F
where
    F: Fn(&[&str]) -> bool,
{
    fn admit(&self, arrangement: &[&str]) -> bool {
        self(arrangement)
    }
}

/// Output of [`Generator::run`].
#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub sentences: BTreeSet<String>,
    pub modifiers: ModifierFlags,
    pub metrics: GenerationMetrics,
}

/// Generates every acceptable sentence for a bag of words.
pub struct Generator<'g, F = AcceptAll> {
    grammar: &'g dyn Grammar,
    filter: F,
}

impl<'g> Generator<'g> {
    pub fn new(grammar: &'g dyn Grammar) -> Self {
        Generator { grammar, filter: AcceptAll }
    }
}

impl<'g, F: ArrangementFilter> Generator<'g, F> {
    /// Replace the arrangement pre-filter.
    pub fn with_filter<G: ArrangementFilter>(self, filter: G) -> Generator<'g, G> {
        Generator { grammar: self.grammar, filter }
    }

    pub fn run<S: AsRef<str>>(&self, tokens: &[S], options: &Options) -> Result<Generation, GenerateError> {
        let start = Instant::now();
        let trigger = TriggerInfo::scan(tokens);
        let modifiers = if options.modifiers { trigger.modifiers } else { ModifierFlags::empty() };

        let mut bag: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        if modifiers.contains(ModifierFlags::NEGATED) {
            remove_first(&mut bag, "not");
        }
        if modifiers.contains(ModifierFlags::PRESENT) {
            remove_first(&mut bag, "now");
        }

        let mut out = Generation { modifiers, ..Generation::default() };
        if bag.is_empty() {
            out.metrics.total = start.elapsed();
            return Ok(out);
        }
        if let Some(limit) = options.max_bag_size {
            if bag.len() > limit {
                return Err(GenerateError::BagTooLarge { size: bag.len(), limit });
            }
        }
        if bag.len() > LARGE_BAG {
            tracing::warn!(size = bag.len(), "large bag; enumeration is factorial in its size");
        }
        if let Some(unknown) = bag.iter().find(|t| self.grammar.rules(&t.to_lowercase()).is_empty()) {
            return Err(GenerateError::unknown(unknown));
        }

        let validator = Validator::with_idioms(self.grammar, trigger.idioms);
        self.consider(&validator, &bag, &mut out)?;

        let mut arrangement = bag.clone();
        arrangement.sort_unstable();
        loop {
            if arrangement != bag {
                self.consider(&validator, &arrangement, &mut out)?;
            }
            if !next_permutation(&mut arrangement) {
                break;
            }
        }

        out.metrics.total = start.elapsed();
        tracing::debug!(
            tokens = bag.len(),
            arrangements = out.metrics.arrangements,
            accepted = out.metrics.accepted,
            sentences = out.sentences.len(),
            elapsed = ?out.metrics.total,
            "generation finished"
        );
        Ok(out)
    }

    fn consider(&self, validator: &Validator<'_>, arrangement: &[&str], out: &mut Generation) -> Result<(), GenerateError> {
        out.metrics.arrangements += 1;
        if !self.filter.admit(arrangement) {
            out.metrics.filtered += 1;
            return Ok(());
        }
        if validator.is_valid(arrangement)? {
            out.metrics.accepted += 1;
            let sentence = render(arrangement, out.modifiers);
            tracing::debug!(%sentence, "arrangement accepted");
            out.sentences.insert(sentence);
        }
        Ok(())
    }
}

fn remove_first(bag: &mut Vec<&str>, word: &str) {
    if let Some(idx) = bag.iter().position(|t| t.eq_ignore_ascii_case(word)) {
        bag.remove(idx);
    }
}

/// Advance `v` to its next lexicographic arrangement. Returns `false` (and
/// leaves `v` untouched) when `v` is already the last one.
fn next_permutation<T: Ord>(v: &mut [T]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// Join an accepted arrangement into a sentence, splicing modifiers back in.
///
/// "not" goes before the first "a"; "now" goes after the word following
/// that "a", or to the front when "a" leads. Terminal punctuation follows the
/// arrangement's own first word.
pub(crate) fn render(arrangement: &[&str], modifiers: ModifierFlags) -> String {
    let question = arrangement.first().is_some_and(|w| w.eq_ignore_ascii_case("is") || w.eq_ignore_ascii_case("was"));
    let mut words: Vec<&str> = arrangement.to_vec();

    if let Some(article) = words.iter().position(|w| w.eq_ignore_ascii_case("a")) {
        let mut at = article;
        if modifiers.contains(ModifierFlags::NEGATED) {
            words.insert(at, "not");
            at += 1;
        }
        if modifiers.contains(ModifierFlags::PRESENT) {
            let slot = if article == 0 { 0 } else { (at + 2).min(words.len()) };
            words.insert(slot, "now");
        }
    }

    let mut sentence = capitalize(&words.join(" "));
    sentence.push(if question { '?' } else { '.' });
    sentence
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_permutation_visits_each_distinct_arrangement_once() {
        let mut v = vec!["a", "b", "b"];
        let mut seen = vec![v.clone()];
        while next_permutation(&mut v) {
            seen.push(v.clone());
        }
        assert_eq!(seen, vec![vec!["a", "b", "b"], vec!["b", "a", "b"], vec!["b", "b", "a"]]);
    }

    #[test]
    fn render_punctuates_and_capitalizes() {
        assert_eq!(render(&["the", "cat", "sat"], ModifierFlags::empty()), "The cat sat.");
        assert_eq!(render(&["is", "it", "red"], ModifierFlags::empty()), "Is it red?");
        assert_eq!(render(&["Was", "it"], ModifierFlags::empty()), "Was it?");
    }

    #[test]
    fn render_splices_modifiers() {
        let words = ["he", "is", "a", "cat", "there"];
        assert_eq!(render(&words, ModifierFlags::NEGATED), "He is not a cat there.");
        assert_eq!(render(&words, ModifierFlags::PRESENT), "He is a cat now there.");
        assert_eq!(render(&words, ModifierFlags::all()), "He is not a cat now there.");
        assert_eq!(render(&["a", "cat", "sat"], ModifierFlags::PRESENT), "Now a cat sat.");
        assert_eq!(render(&["is", "a", "cat"], ModifierFlags::NEGATED), "Is not a cat?");
    }
}
