//! Shared fixtures for unit tests.

use crate::lexicon::Lexicon;

/// Determiner + noun + intransitive verb. "sat" carries no tag so it may end
/// a sentence.
pub(crate) fn fixture() -> Lexicon {
    fixture_with(&[])
}

/// [`fixture`] plus extra `(word, formula)` entries.
pub(crate) fn fixture_with(extra: &[(&str, &str)]) -> Lexicon {
    let mut b = Lexicon::builder();
    let base = [("the", "D+"), ("a", "D+"), ("cat.n", "D- & Ss+"), ("sat", "Ss-")];
    for (word, formula) in base.iter().chain(extra) {
        b.entry(word, formula).expect("fixture formula");
    }
    b.build()
}
