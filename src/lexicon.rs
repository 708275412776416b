//! Lexicon: word → rules and subscript tags.
//!
//! The engine never owns dictionary state. Every core call receives a
//! [`Grammar`], which is normally an immutable [`Lexicon`]. When an idiom
//! check needs to treat a bare connector as a word of its own, it layers an
//! [`Overlay`] over the shared grammar for the duration of that check instead
//! of registering the word globally.
//!
//! ```text
//! dictionary text ── loader.rs ──▶ LexiconBuilder ──▶ Lexicon (read-only)
//!                                                      │
//!                                 Overlay { base: &Lexicon, local rules }
//! ```

#[path = "lexicon/loader.rs"]
mod loader;

use std::collections::HashMap;

use crate::Polarity;
use crate::error::FormulaError;
use crate::formula::{FormulaTree, NormalizedFormula, normalize, parse};

/// Subscript tags the engine consults. Tags are opaque labels otherwise and
/// compare by exact string.
pub mod tags {
    pub const NOUN: &str = "n";
    pub const NOUN_UNCOUNTABLE: &str = "n-u";
    pub const VERB: &str = "v";
    pub const VERB_PAST: &str = "v-d";
    pub const ADVERB: &str = "r";
    pub const MODIFIER: &str = "m";
    pub const FEMININE: &str = "f";
}

/// Read access to a lexicon.
pub trait Grammar {
    /// Rules for `word`, looked up exactly as given. Empty means unknown.
    fn rules(&self, word: &str) -> &[Rule];

    /// Subscript tags for `word`, looked up exactly as given.
    fn subscripts(&self, word: &str) -> &[String];

    fn has_tag(&self, word: &str, tag: &str) -> bool {
        self.subscripts(word).iter().any(|t| t == tag)
    }
}

/// One admissible ordered set of connectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disjunct {
    connectors: Vec<String>,
}

impl Disjunct {
    pub fn new(connectors: Vec<String>) -> Self {
        Disjunct { connectors }
    }

    pub fn connectors(&self) -> &[String] {
        &self.connectors
    }

    /// Connectors pointing at later words.
    pub fn rightward(&self) -> impl Iterator<Item = &str> {
        self.with_polarity(Polarity::Right)
    }

    /// Connectors pointing at earlier words.
    pub fn leftward(&self) -> impl Iterator<Item = &str> {
        self.with_polarity(Polarity::Left)
    }

    fn with_polarity(&self, polarity: Polarity) -> impl Iterator<Item = &str> {
        self.connectors.iter().map(String::as_str).filter(move |c| Polarity::of(c) == Some(polarity))
    }
}

type Alternatives = Vec<Vec<String>>;

/// A normalized formula expanded into the alternatives the matcher compares:
/// the required part, each optional group, and each group without its cost
/// alternatives.
#[derive(Debug, Clone, Default)]
pub(crate) struct Shape {
    pub(crate) required: Alternatives,
    pub(crate) groups: Vec<Alternatives>,
    pub(crate) uncosted: Vec<Alternatives>,
}

impl Shape {
    fn of(normalized: &NormalizedFormula) -> Self {
        fn dnf(tree: Option<&FormulaTree>) -> Alternatives {
            tree.map(FormulaTree::disjuncts).unwrap_or_default()
        }

        Shape {
            required: dnf(normalized.required()),
            groups: normalized.optionals().iter().map(|g| dnf(Some(g.body()))).collect(),
            uncosted: normalized.optionals().iter().map(|g| dnf(g.uncosted())).collect(),
        }
    }
}

/// A lexicon entry: raw formula text plus the forms derived from it.
///
/// Derived forms are computed once here, so a malformed formula is reported
/// when the entry is built and matching never re-expands a formula.
#[derive(Debug, Clone)]
pub struct Rule {
    formula: String,
    normalized: NormalizedFormula,
    shape: Shape,
    disjuncts: Vec<Disjunct>,
}

impl Rule {
    pub fn new(formula: &str) -> Result<Self, FormulaError> {
        let normalized = normalize(formula)?;
        let shape = Shape::of(&normalized);
        let disjuncts = parse(formula)?
            .map(|tree| tree.disjuncts())
            .unwrap_or_default()
            .into_iter()
            .filter(|d| !d.is_empty())
            .map(Disjunct::new)
            .collect();
        Ok(Rule { formula: formula.trim().to_string(), normalized, shape, disjuncts })
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn normalized(&self) -> &NormalizedFormula {
        &self.normalized
    }

    pub fn disjuncts(&self) -> &[Disjunct] {
        &self.disjuncts
    }

    pub(crate) fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.formula == other.formula
    }
}

impl Eq for Rule {}

#[derive(Debug, Clone, Default)]
struct Entry {
    rules: Vec<Rule>,
    tags: Vec<String>,
}

/// Immutable word → rules mapping. Keys are lowercase.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashMap<String, Entry>,
}

impl Lexicon {
    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }
}

impl Grammar for Lexicon {
    fn rules(&self, word: &str) -> &[Rule] {
        self.words.get(word).map(|e| e.rules.as_slice()).unwrap_or(&[])
    }

    fn subscripts(&self, word: &str) -> &[String] {
        self.words.get(word).map(|e| e.tags.as_slice()).unwrap_or(&[])
    }
}

/// Split `cat.n` into `("cat", Some("n"))`.
pub(crate) fn split_subscript(token: &str) -> (&str, Option<&str>) {
    match regex!(r"^(.+?)\.([A-Za-z][A-Za-z0-9_-]*)$").captures(token) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(word), Some(tag)) => (word.as_str(), Some(tag.as_str())),
            _ => (token, None),
        },
        None => (token, None),
    }
}

/// Accumulates entries before freezing them into a [`Lexicon`].
#[derive(Debug, Default)]
pub struct LexiconBuilder {
    words: HashMap<String, Entry>,
}

impl LexiconBuilder {
    /// Add `rule` to `word`. A `.tag` subscript on `word` (`sat.v-d`) is split
    /// off and recorded as a tag.
    pub fn insert(&mut self, word: &str, rule: Rule) -> &mut Self {
        let (bare, tag) = split_subscript(word);
        let entry = self.words.entry(bare.to_lowercase()).or_default();
        entry.rules.push(rule);
        if let Some(tag) = tag {
            if !entry.tags.iter().any(|t| t == tag) {
                entry.tags.push(tag.to_string());
            }
        }
        self
    }

    /// Parse `formula` and add it to `word`.
    pub fn entry(&mut self, word: &str, formula: &str) -> Result<&mut Self, FormulaError> {
        let rule = Rule::new(formula)?;
        Ok(self.insert(word, rule))
    }

    /// Attach an extra tag to an existing or future word.
    pub fn tag(&mut self, word: &str, tag: &str) -> &mut Self {
        let entry = self.words.entry(word.to_lowercase()).or_default();
        if !entry.tags.iter().any(|t| t == tag) {
            entry.tags.push(tag.to_string());
        }
        self
    }

    pub fn build(self) -> Lexicon {
        Lexicon { words: self.words }
    }
}

/// Call-scoped rules layered over a shared grammar.
///
/// Lookups hit the local rules first (exact key), then the base grammar.
/// Nothing is ever written to the base.
pub struct Overlay<'a> {
    base: &'a dyn Grammar,
    words: HashMap<String, Vec<Rule>>,
}

impl<'a> Overlay<'a> {
    pub fn new(base: &'a dyn Grammar) -> Self {
        Overlay { base, words: HashMap::new() }
    }

    pub fn add_word(&mut self, word: &str, rule: Rule) {
        self.words.entry(word.to_string()).or_default().push(rule);
    }
}

impl Grammar for Overlay<'_> {
    fn rules(&self, word: &str) -> &[Rule] {
        match self.words.get(word) {
            Some(rules) => rules,
            None => self.base.rules(word),
        }
    }

    fn subscripts(&self, word: &str) -> &[String] {
        self.base.subscripts(word)
    }
}
