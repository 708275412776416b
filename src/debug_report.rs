use crate::Tally;
use linkgen::{GenerateError, GenerateResultVerbose, ModifierFlags};
use std::collections::BTreeSet;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(res: &GenerateResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Bag: {:?}", res.tokens), ansi::CYAN)));

    if !details.modifiers.is_empty() {
        println!("  {} {}", palette.dim("modifiers:"), palette.paint(modifier_names(details.modifiers), ansi::YELLOW));
    }

    println!("\n{}", palette.paint("━━━ Sentences ━━━", ansi::GRAY));
    if res.sentences.is_empty() {
        println!("{}", palette.dim("  No valid ordering"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No adjacent pair shares a connector in the right direction");
        println!("  • The first or last word carries a tag that cannot open or close a sentence");
        println!("  • An idiom window (article, \"with\", \"on\", \"wants to\") did not line up");
        println!("\n{}", palette.dim("  Tip: set LINKGEN_LOG=linkgen=trace to see why each ordering was rejected"));
    } else {
        for (idx, sentence) in res.sentences.iter().enumerate() {
            println!("  {} {}", palette.paint(format!("[{idx}]"), ansi::GRAY), palette.bold(palette.paint(sentence, ansi::GREEN)));
        }
    }

    println!("\n{}", palette.paint("━━━ Search ━━━", ansi::GRAY));
    println!(
        "  Arrangements: {}  │  Accepted: {}  │  Filtered: {}",
        palette.paint(details.arrangements.to_string(), ansi::BLUE),
        palette.paint(details.accepted.to_string(), ansi::GREEN),
        palette.dim(details.filtered.to_string()),
    );
    println!("  Total: {}", palette.paint(format!("{:?}", details.total), ansi::GREEN));
    println!();
}

pub fn print_benchmark_line(reference: &str, sentences: &BTreeSet<String>, color: bool) {
    let palette = ansi::Palette::new(color);
    let (mark, tint) = match sentences.len() {
        0 => ("✗", ansi::RED),
        1 => ("✓", ansi::GREEN),
        _ if sentences.contains(reference) => ("≈", ansi::YELLOW),
        _ => ("✗", ansi::YELLOW),
    };
    println!("{} {} {}", palette.paint(mark, tint), palette.bold(reference), palette.dim(format!("({})", sentences.len())));

    if sentences.len() > 1 {
        for sentence in sentences.iter().filter(|s| s.as_str() != reference) {
            let misplaced = misplaced_words(reference, sentence);
            println!(
                "    {} {}",
                palette.paint(sentence, ansi::CYAN),
                palette.dim(format!("misplaced: {}", misplaced.join(", "))),
            );
        }
    }
}

pub fn print_benchmark_error(reference: &str, err: &GenerateError, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("{} {} {}", palette.paint("!", ansi::RED), palette.bold(reference), palette.paint(err.to_string(), ansi::RED));
}

pub fn print_tally(tally: &Tally, color: bool) {
    let palette = ansi::Palette::new(color);
    let total = tally.total;
    println!("\n{}", palette.paint("━━━ Benchmark ━━━", ansi::GRAY));
    println!("  Single result:               {}/{total}", palette.paint(tally.single.to_string(), ansi::GREEN));
    println!("  Multiple with one correct:   {}/{total}", palette.paint(tally.multiple_one_correct.to_string(), ansi::YELLOW));
    println!("  Multiple with none correct:  {}/{total}", palette.paint(tally.multiple_none_correct.to_string(), ansi::YELLOW));
    println!("  None:                        {}/{total}", palette.paint(tally.none.to_string(), ansi::RED));
    if tally.errors > 0 {
        println!("  Errors:                      {}/{total}", palette.paint(tally.errors.to_string(), ansi::RED));
    }
    println!("  Accuracy:                    {}", palette.bold(format!("{:.3}", tally.accuracy())));
    println!();
}

fn modifier_names(flags: ModifierFlags) -> String {
    let mut names = Vec::new();
    if flags.contains(ModifierFlags::NEGATED) {
        names.push("not");
    }
    if flags.contains(ModifierFlags::PRESENT) {
        names.push("now");
    }
    names.join(", ")
}

/// Words of `candidate` that sit at a different position than in `reference`.
fn misplaced_words<'a>(reference: &str, candidate: &'a str) -> Vec<&'a str> {
    let strip = |s: &str| s.trim_end_matches(['.', '?', '!']).to_lowercase();
    let reference = strip(reference);
    let reference: Vec<&str> = reference.split(' ').collect();
    candidate
        .trim_end_matches(['.', '?', '!'])
        .split(' ')
        .enumerate()
        .filter(|(i, w)| reference.get(*i).is_none_or(|r| !r.eq_ignore_ascii_case(w)))
        .map(|(_, w)| w)
        .collect()
}
