//! Dictionary loader for the Link Grammar text format.
//!
//! ```text
//! % comment to end of line
//! #define dictionary-version-number 5.9.0;     (directives are skipped)
//! <det>: D+;                                   (macro definition)
//! the a.d: <det> or [()];                      (words, optional .tag subscript)
//! cat.n dog.n: (D- or ()) & (Ss+ or O-);
//! /en/words/words.n.1: ...;                    (file word-lists are skipped)
//! ```
//!
//! Macro references (`<det>`) expand to the macro body wrapped in
//! parentheses. Macros must be defined before use.

use std::collections::HashMap;
use std::path::Path;

use super::{Lexicon, LexiconBuilder, Rule};
use crate::error::LoadError;

struct Statement {
    line: usize,
    text: String,
}

impl Lexicon {
    /// Load a dictionary file.
    pub fn load(path: impl AsRef<Path>) -> Result<Lexicon, LoadError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        let lexicon = Self::from_dict_str(&text)?;
        tracing::debug!(path = %path.display(), words = lexicon.len(), "dictionary loaded");
        Ok(lexicon)
    }

    /// Build a lexicon from dictionary text.
    pub fn from_dict_str(text: &str) -> Result<Lexicon, LoadError> {
        let mut builder = Lexicon::builder();
        let mut macros: HashMap<String, String> = HashMap::new();

        for stmt in statements(text) {
            load_statement(&stmt, &mut macros, &mut builder)?;
        }

        Ok(builder.build())
    }
}

/// Split dictionary text into `;`-terminated statements, dropping comments
/// and directives. Quoted words may contain any of `%;:`.
fn statements(text: &str) -> Vec<Statement> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut start_line = 1;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if buf.trim().is_empty() && raw.trim_start().starts_with('#') {
            continue;
        }

        let mut in_quotes = false;
        for c in raw.chars() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    buf.push(c);
                }
                '%' if !in_quotes => break,
                ';' if !in_quotes => {
                    if !buf.trim().is_empty() {
                        out.push(Statement { line: start_line, text: std::mem::take(&mut buf) });
                    }
                    buf.clear();
                }
                _ => {
                    if buf.trim().is_empty() && !c.is_whitespace() {
                        start_line = line_no;
                    }
                    buf.push(c);
                }
            }
        }
        buf.push(' ');
    }

    if !buf.trim().is_empty() {
        out.push(Statement { line: start_line, text: buf });
    }
    out
}

/// Position of the first `:` outside double quotes.
fn find_colon(text: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

fn expand_macros(rhs: &str, macros: &HashMap<String, String>, line: usize) -> Result<String, LoadError> {
    let mut out = String::with_capacity(rhs.len());
    let mut last = 0;
    for m in regex!(r"<[^<>\s]+>").find_iter(rhs) {
        let name = &rhs[m.start() + 1..m.end() - 1];
        let body = macros.get(name).ok_or_else(|| LoadError::UndefinedMacro { line, name: name.to_string() })?;
        out.push_str(&rhs[last..m.start()]);
        out.push('(');
        out.push_str(body);
        out.push(')');
        last = m.end();
    }
    out.push_str(&rhs[last..]);
    Ok(out)
}

fn load_statement(
    stmt: &Statement,
    macros: &mut HashMap<String, String>,
    builder: &mut LexiconBuilder,
) -> Result<(), LoadError> {
    let colon = find_colon(&stmt.text).ok_or_else(|| LoadError::Syntax {
        line: stmt.line,
        message: format!("expected ':' in entry '{}'", stmt.text.trim()),
    })?;
    let (lhs, rhs) = (&stmt.text[..colon], &stmt.text[colon + 1..]);
    let formula = expand_macros(rhs.trim(), macros, stmt.line)?;

    let mut rule: Option<Rule> = None;
    for token in regex!(r#""[^"]*"|\S+"#).find_iter(lhs).map(|m| m.as_str()) {
        if token.len() > 2 && token.starts_with('<') && token.ends_with('>') {
            macros.insert(token[1..token.len() - 1].to_string(), formula.clone());
            continue;
        }
        if token.starts_with('/') {
            tracing::debug!(line = stmt.line, list = token, "skipping file word-list");
            continue;
        }

        let word = token.trim_matches('"');
        if word.is_empty() {
            return Err(LoadError::Syntax { line: stmt.line, message: "empty word".to_string() });
        }
        if rule.is_none() {
            let parsed = Rule::new(&formula)
                .map_err(|source| LoadError::Formula { word: word.to_string(), source })?;
            rule = Some(parsed);
        }
        if let Some(rule) = &rule {
            builder.insert(word, rule.clone());
        }
    }
    Ok(())
}
