//! Sentence generation from an unordered bag of words against a
//! Link-Grammar-style lexicon.
//!
//! ```text
//! bag ── modifier scan ── permutations ── Validator ── Matcher ── formulas
//!                                              │
//!                                  accepted orderings ── rendered sentences
//! ```
//!
//! ```
//! use linkgen::{Lexicon, generate_sentence};
//!
//! let mut builder = Lexicon::builder();
//! builder.entry("the", "D+").unwrap();
//! builder.entry("cat.n", "D- & Ss+").unwrap();
//! builder.entry("sat", "Ss-").unwrap();
//! let lexicon = builder.build();
//!
//! let out = generate_sentence(&lexicon, &["sat", "the", "cat"]).unwrap();
//! assert!(out.contains("The cat sat."));
//! ```
//!
//! ## Performance boundaries
//!
//! - Enumeration is factorial in the bag size. Bags above 8 tokens log a
//!   warning; [`Options::max_bag_size`] optionally refuses larger bags with
//!   [`GenerateError::BagTooLarge`]. There is no limit by default.
//! - A formula's disjunctive normal form is capped at
//!   [`formula::MAX_DISJUNCTS`] alternatives per tree. Alternatives past the
//!   cap are dropped with a warning, so a word whose formula hits the cap
//!   can miss links that only the dropped alternatives would make.
//! - Formulas are expanded once, when a [`Rule`] is built.

extern crate self as linkgen;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
pub mod formula;
pub mod lexicon;

#[cfg(test)]
mod testing;

pub use api::{
    GenerateResult, GenerateResultVerbose, GenerationDetails, Options, generate_sentence, generate_verbose_with,
    generate_with,
};
pub use engine::{
    AcceptAll, ArrangementFilter, Generation, GenerationMetrics, Generator, IdiomMask, Matcher, ModifierFlags,
    PLACEHOLDER, Side, TriggerInfo, Validator, equals,
};
pub use error::{FormulaError, GenerateError, LoadError};
pub use lexicon::{Grammar, Lexicon, LexiconBuilder, Overlay, Rule};

/// Direction a connector points in, taken from its trailing mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// `-`: links to an earlier word.
    Left,
    /// `+`: links to a later word.
    Right,
}

impl Polarity {
    /// Polarity of `connector`, or `None` when it carries no mark.
    pub fn of(connector: &str) -> Option<Self> {
        match connector.as_bytes().last() {
            Some(b'+') => Some(Polarity::Right),
            Some(b'-') => Some(Polarity::Left),
            _ => None,
        }
    }

    pub fn mark(self) -> char {
        match self {
            Polarity::Left => '-',
            Polarity::Right => '+',
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Polarity::Left => Polarity::Right,
            Polarity::Right => Polarity::Left,
        }
    }
}

/// `connector` with its polarity mark reversed. Unmarked connectors are
/// returned unchanged.
pub(crate) fn flip_connector(connector: &str) -> String {
    match Polarity::of(connector) {
        Some(p) => {
            let mut out = connector[..connector.len() - 1].to_string();
            out.push(p.flip().mark());
            out
        }
        None => connector.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_comes_from_the_trailing_mark() {
        assert_eq!(Polarity::of("Ss+"), Some(Polarity::Right));
        assert_eq!(Polarity::of("D-"), Some(Polarity::Left));
        assert_eq!(Polarity::of("MV"), None);
        assert_eq!(Polarity::of(""), None);
    }

    #[test]
    fn flip_connector_reverses_only_the_mark() {
        assert_eq!(flip_connector("Ss+"), "Ss-");
        assert_eq!(flip_connector("MV-"), "MV+");
        assert_eq!(flip_connector("S*-"), "S*+");
        assert_eq!(flip_connector("X"), "X");
    }
}
