//! Atomic connector comparison.
//!
//! Both arguments are expected in the same orientation: the matcher flips the
//! left word's rightward connectors before comparing them with the right
//! word's leftward connectors, so a real link compares `X-` with `X-`.

use crate::Polarity;

/// Whether connector `a` is compatible with connector `b`.
///
/// In order:
///
/// 1. differing polarity marks never match;
/// 2. identical strings match;
/// 3. a `*` in either string matches when the text before the first `*` and
///    after the last `*` agrees with the other string (equal lengths), or,
///    for differing lengths, when the other string fits inside the part
///    before the `*` and agrees with it up to its own length;
/// 4. with marks removed, a shorter name that is a prefix of the longer one
///    matches (`Ss` links with `Ssm`).
///
/// Empty strings never match.
pub fn equals(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() || Polarity::of(a) != Polarity::of(b) {
        return false;
    }
    if a == b || wildcard(a, b) || wildcard(b, a) {
        return true;
    }

    let (a, b) = (strip_mark(a), strip_mark(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let (short, long) = if a.len() < b.len() { (a, b) } else { (b, a) };
    short.len() < long.len() && long.starts_with(short)
}

/// Elementwise comparison for multi-connector conjuncts: exact or wildcard
/// matches only, no truncation.
pub(crate) fn strict_equals(a: &str, b: &str) -> bool {
    !a.is_empty() && Polarity::of(a) == Polarity::of(b) && (a == b || wildcard(a, b) || wildcard(b, a))
}

/// Compare two connector conjuncts. Single connectors use [`equals`]; longer
/// conjuncts need equal length and [`strict_equals`] at every position.
pub(crate) fn conjuncts_equal<A, B>(left: &[A], right: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    match (left, right) {
        ([], _) | (_, []) => false,
        ([a], [b]) => equals(a.as_ref(), b.as_ref()),
        _ => left.len() == right.len() && left.iter().zip(right).all(|(a, b)| strict_equals(a.as_ref(), b.as_ref())),
    }
}

fn wildcard(pattern: &str, other: &str) -> bool {
    let (Some(first), Some(last)) = (pattern.find('*'), pattern.rfind('*')) else {
        return false;
    };
    let prefix = &pattern[..first];

    if pattern.len() == other.len() {
        other.get(..first) == Some(prefix) && other.get(last + 1..) == Some(&pattern[last + 1..])
    } else {
        first >= other.len() && prefix.get(..other.len()) == Some(other)
    }
}

fn strip_mark(connector: &str) -> &str {
    connector.strip_suffix(['+', '-']).unwrap_or(connector)
}
