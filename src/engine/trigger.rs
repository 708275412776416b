//! Bag pre-scan.
//!
//! Runs once per generation call, before any permutation is built, and
//! records which modifier words are in play and which idiom keywords occur
//! in the bag at all. The validator uses the keyword mask to skip idiom
//! branches that cannot fire for this bag.
//!
//! False positives are fine: a set bit only means the branch is tried.

bitflags::bitflags! {
    /// Modifier words that are pulled out of the bag before permutation and
    /// spliced back into every accepted sentence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u8 {
        /// "not", spliced before the first "a".
        const NEGATED = 1 << 0;
        /// "now", spliced after the word following the first "a".
        const PRESENT = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Idiom keywords present in the bag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IdiomMask: u8 {
        const WITH    = 1 << 0;
        const ON      = 1 << 1;
        const WANTS   = 1 << 2;
        const ARTICLE = 1 << 3;
    }
}

/// Result of [`TriggerInfo::scan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerInfo {
    pub modifiers: ModifierFlags,
    pub idioms: IdiomMask,
}

impl TriggerInfo {
    /// Scan a bag. Comparisons are case-insensitive.
    ///
    /// "not" and "now" only count as modifiers when "a" is also in the bag;
    /// otherwise they are ordinary words.
    pub fn scan<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut modifiers = ModifierFlags::empty();
        let mut idioms = IdiomMask::empty();
        let mut has_article = false;

        for token in tokens {
            match token.as_ref().to_lowercase().as_str() {
                "not" => modifiers |= ModifierFlags::NEGATED,
                "now" => modifiers |= ModifierFlags::PRESENT,
                "with" => idioms |= IdiomMask::WITH,
                "on" => idioms |= IdiomMask::ON,
                "wants" => idioms |= IdiomMask::WANTS,
                "a" => {
                    has_article = true;
                    idioms |= IdiomMask::ARTICLE;
                }
                "the" => idioms |= IdiomMask::ARTICLE,
                _ => {}
            }
        }

        if !has_article {
            modifiers = ModifierFlags::empty();
        }
        TriggerInfo { modifiers, idioms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_need_an_article() {
        let info = TriggerInfo::scan(&["cat", "not", "now"]);
        assert!(info.modifiers.is_empty());

        let info = TriggerInfo::scan(&["A", "cat", "Not", "now"]);
        assert_eq!(info.modifiers, ModifierFlags::NEGATED | ModifierFlags::PRESENT);
    }

    #[test]
    fn idiom_keywords_are_collected() {
        let info = TriggerInfo::scan(&["he", "wants", "to", "eat", "with", "the", "fork"]);
        assert_eq!(info.idioms, IdiomMask::WANTS | IdiomMask::WITH | IdiomMask::ARTICLE);
        assert!(!info.idioms.contains(IdiomMask::ON));
    }
}
