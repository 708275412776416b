//! Error types.
//!
//! ```text
//! LoadError ──▶ dictionary text could not be turned into a Lexicon
//! FormulaError ──▶ a connector formula is malformed (corrupt lexicon entry)
//! GenerateError ──▶ a generation call aborted (no partial results)
//! ```
//!
//! A permutation that fails validation is not an error: it is simply left
//! out of the result set.

use std::path::PathBuf;

/// A connector formula that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    /// An opening delimiter without its partner, or a stray closer.
    #[error("unbalanced '{delimiter}' at byte {offset} in formula '{formula}'")]
    Unbalanced { formula: String, delimiter: char, offset: usize },

    /// A token that cannot appear where it was found (e.g. `& &`, `( or`).
    #[error("unexpected '{token}' in formula '{formula}'")]
    Unexpected { formula: String, token: String },
}

/// Failure of a single generation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("word '{word}' not found in lexicon")]
    UnknownWord { word: String },

    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// Enumeration is factorial in the bag size; refuse instead of stalling.
    #[error("bag of {size} tokens exceeds the enumeration limit of {limit}")]
    BagTooLarge { size: usize, limit: usize },
}

impl GenerateError {
    pub(crate) fn unknown(word: &str) -> Self {
        GenerateError::UnknownWord { word: word.to_string() }
    }
}

/// Failure while loading a dictionary file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read dictionary '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: macro <{name}> used before it was defined")]
    UndefinedMacro { line: usize, name: String },

    #[error("entry for '{word}' has a malformed formula: {source}")]
    Formula {
        word: String,
        #[source]
        source: FormulaError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_word_names_the_word() {
        let err = GenerateError::unknown("foo");
        assert_eq!(err.to_string(), "word 'foo' not found in lexicon");
    }

    #[test]
    fn formula_errors_convert_transparently() {
        let inner = FormulaError::Unbalanced { formula: "(A+".to_string(), delimiter: '(', offset: 0 };
        let err: GenerateError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert!(matches!(err, GenerateError::Formula(_)));
    }
}
