use crate::engine::{Generator, ModifierFlags};
use crate::error::GenerateError;
use crate::lexicon::Grammar;
use std::collections::BTreeSet;
use std::time::Duration;

/// Options that affect generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Largest bag (after modifier extraction) that will be enumerated, or
    /// `None` for no limit. Enumeration is factorial in the bag size.
    pub max_bag_size: Option<usize>,
    /// Treat "not"/"now" as modifiers when "a" is in the bag.
    pub modifiers: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { max_bag_size: None, modifiers: true }
    }
}

/// Result from [`generate_with`].
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// The input bag, as given.
    pub tokens: Vec<String>,
    /// Every accepted sentence, deduplicated and sorted.
    pub sentences: BTreeSet<String>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Counters returned by [`generate_verbose_with`].
#[derive(Debug, Clone)]
pub struct GenerationDetails {
    pub total: Duration,
    /// Distinct arrangements examined.
    pub arrangements: usize,
    pub accepted: usize,
    /// Arrangements dropped by the pre-filter.
    pub filtered: usize,
    /// Modifier words extracted from the bag.
    pub modifiers: ModifierFlags,
}

/// Result from [`generate_verbose_with`].
#[derive(Debug, Clone)]
pub struct GenerateResultVerbose {
    pub tokens: Vec<String>,
    pub sentences: BTreeSet<String>,
    pub elapsed: Duration,
    pub details: GenerationDetails,
}

/// Generate every acceptable sentence for `tokens` with default [`Options`].
///
/// # Example
/// ```
/// use linkgen::{Lexicon, generate_sentence};
///
/// let lexicon = Lexicon::from_dict_str("john.n: Ss+; runs: Ss-;").unwrap();
/// let out = generate_sentence(&lexicon, &["runs", "john"]).unwrap();
/// assert_eq!(out.into_iter().collect::<Vec<_>>(), vec!["John runs."]);
/// ```
pub fn generate_sentence<S: AsRef<str>>(grammar: &dyn Grammar, tokens: &[S]) -> Result<BTreeSet<String>, GenerateError> {
    Ok(generate_with(grammar, tokens, &Options::default())?.sentences)
}

/// Generate with explicit `options`, also reporting elapsed time.
pub fn generate_with<S: AsRef<str>>(
    grammar: &dyn Grammar,
    tokens: &[S],
    options: &Options,
) -> Result<GenerateResult, GenerateError> {
    let run = Generator::new(grammar).run(tokens, options)?;
    Ok(GenerateResult { tokens: owned(tokens), sentences: run.sentences, elapsed: run.metrics.total })
}

/// Like [`generate_with`], plus arrangement counters and modifier flags.
pub fn generate_verbose_with<S: AsRef<str>>(
    grammar: &dyn Grammar,
    tokens: &[S],
    options: &Options,
) -> Result<GenerateResultVerbose, GenerateError> {
    let run = Generator::new(grammar).run(tokens, options)?;
    let details = GenerationDetails {
        total: run.metrics.total,
        arrangements: run.metrics.arrangements,
        accepted: run.metrics.accepted,
        filtered: run.metrics.filtered,
        modifiers: run.modifiers,
    };
    Ok(GenerateResultVerbose { tokens: owned(tokens), sentences: run.sentences, elapsed: run.metrics.total, details })
}

fn owned<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens.iter().map(|t| t.as_ref().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;

    #[test]
    fn generate_with_returns_sentences() {
        let lex = fixture();
        let res = generate_with(&lex, &["sat", "the", "cat"], &Options::default()).unwrap();
        assert_eq!(res.tokens, vec!["sat", "the", "cat"]);
        assert!(res.sentences.contains("The cat sat."));
    }

    #[test]
    fn verbose_reports_counters() {
        let lex = fixture();
        let res = generate_verbose_with(&lex, &["sat", "the", "cat"], &Options::default()).unwrap();
        assert_eq!(res.details.arrangements, 6);
        assert_eq!(res.details.accepted, res.sentences.len());
        assert_eq!(res.details.filtered, 0);
        assert!(res.details.modifiers.is_empty());
    }

    #[test]
    fn bag_limit_is_enforced() {
        let lex = fixture();
        let opts = Options { max_bag_size: Some(2), ..Options::default() };
        let err = generate_with(&lex, &["the", "cat", "sat"], &opts).unwrap_err();
        assert_eq!(err, GenerateError::BagTooLarge { size: 3, limit: 2 });
    }

    #[test]
    fn large_bags_are_not_refused_by_default() {
        let mut bag = vec!["the"; 10];
        bag.push("zzz");
        let err = generate_with(&fixture(), &bag, &Options::default()).unwrap_err();
        assert_eq!(err, GenerateError::UnknownWord { word: "zzz".to_string() });
    }
}
