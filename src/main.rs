mod debug_report;

use linkgen::{GenerateError, Lexicon, Options, generate_verbose_with, generate_with};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_ENV: &str = "LINKGEN_LOG";

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let lexicon = match Lexicon::load(&config.dict) {
        Ok(lexicon) => lexicon,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let outcome = match &config.mode {
        Mode::Words(words) => generate_words(&lexicon, words, &config),
        Mode::Benchmark(path) => run_benchmark(&lexicon, path, &config),
    };
    if let Err(err) = outcome {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn generate_words(lexicon: &Lexicon, words: &[String], config: &CliConfig) -> Result<(), String> {
    let res = generate_verbose_with(lexicon, words, &config.options).map_err(|err| err.to_string())?;
    debug_report::print_run(&res, config.color);
    Ok(())
}

/// Outcome counts for a benchmark file.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    pub total: usize,
    pub single: usize,
    pub multiple_one_correct: usize,
    pub multiple_none_correct: usize,
    pub none: usize,
    pub errors: usize,
}

impl Tally {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.single as f64 / self.total as f64 }
    }
}

fn run_benchmark(lexicon: &Lexicon, path: &Path, config: &CliConfig) -> Result<(), String> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read sentences '{}': {err}", path.display()))?;

    let mut tally = Tally::default();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        tally.total += 1;
        let words = tokenize_sentence(line);
        match generate_with(lexicon, &words, &config.options) {
            Ok(res) => {
                match res.sentences.len() {
                    0 => tally.none += 1,
                    1 => tally.single += 1,
                    _ if res.sentences.contains(line) => tally.multiple_one_correct += 1,
                    _ => tally.multiple_none_correct += 1,
                }
                debug_report::print_benchmark_line(line, &res.sentences, config.color);
            }
            Err(err @ (GenerateError::UnknownWord { .. } | GenerateError::BagTooLarge { .. })) => {
                tally.errors += 1;
                debug_report::print_benchmark_error(line, &err, config.color);
            }
            Err(err) => return Err(err.to_string()),
        }
    }

    debug_report::print_tally(&tally, config.color);
    Ok(())
}

/// Split a reference sentence into a bag: space-separated words with the
/// terminal punctuation removed.
fn tokenize_sentence(line: &str) -> Vec<String> {
    let mut words: Vec<String> = line.split(' ').filter(|w| !w.is_empty()).map(str::to_string).collect();
    if let Some(last) = words.last_mut() {
        let trimmed = last.trim_end_matches(['.', '?', '!']).len();
        last.truncate(trimmed);
        if last.is_empty() {
            words.pop();
        }
    }
    words
}

enum Mode {
    Words(Vec<String>),
    Benchmark(PathBuf),
}

struct CliConfig {
    dict: PathBuf,
    mode: Mode,
    options: Options,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut dict: Option<PathBuf> = None;
    let mut sentences: Option<PathBuf> = None;
    let mut words: Vec<String> = Vec::new();
    let mut options = Options::default();
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("linkgen {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--no-modifiers" => options.modifiers = false,
            "--dict" | "-d" => {
                let value = args.next().ok_or_else(|| "error: --dict expects a value".to_string())?;
                dict = Some(PathBuf::from(value));
            }
            "--sentences" | "-s" => {
                let value = args.next().ok_or_else(|| "error: --sentences expects a value".to_string())?;
                sentences = Some(PathBuf::from(value));
            }
            "--max-bag" => {
                let value = args.next().ok_or_else(|| "error: --max-bag expects a value".to_string())?;
                options.max_bag_size = Some(parse_max_bag(&value)?);
            }
            "--" => {
                words.extend(args.by_ref());
                break;
            }
            _ if arg.starts_with("--dict=") => dict = Some(PathBuf::from(arg.trim_start_matches("--dict="))),
            _ if arg.starts_with("--sentences=") => {
                sentences = Some(PathBuf::from(arg.trim_start_matches("--sentences=")));
            }
            _ if arg.starts_with("--max-bag=") => {
                options.max_bag_size = Some(parse_max_bag(arg.trim_start_matches("--max-bag="))?);
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => words.push(arg),
        }
    }

    let dict = dict.ok_or_else(|| format!("error: --dict is required\n\n{}", help_text()))?;
    let mode = match (sentences, words.is_empty()) {
        (Some(_), false) => return Err("error: give either --sentences or words, not both".to_string()),
        (Some(path), true) => Mode::Benchmark(path),
        (None, false) => Mode::Words(words),
        (None, true) => return Err(format!("error: no words provided\n\n{}", help_text())),
    };

    Ok(CliConfig { dict, mode, options, color })
}

fn parse_max_bag(value: &str) -> Result<usize, String> {
    value.parse::<usize>().map_err(|_| format!("error: invalid --max-bag '{value}' (expected a positive integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "linkgen {version}

Generate sentences from a bag of words using a Link Grammar dictionary.

Usage:
  linkgen --dict <file> [OPTIONS] [--] <word...>
  linkgen --dict <file> --sentences <file> [OPTIONS]

Options:
  -d, --dict <file>          Dictionary in Link Grammar text format.
  -s, --sentences <file>     Benchmark mode: one reference sentence per line.
  --max-bag <n>              Refuse bags larger than <n>. Default: no limit
  --no-modifiers             Treat \"not\"/\"now\" as ordinary words.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}=<filter>         Log filter for stderr output (default: warn).

Exit codes:
  0  Success.
  1  Dictionary or generation error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_strips_terminal_punctuation() {
        assert_eq!(tokenize_sentence("The cat sat."), vec!["The", "cat", "sat"]);
        assert_eq!(tokenize_sentence("Is it red?"), vec!["Is", "it", "red"]);
        assert_eq!(tokenize_sentence("no  stop"), vec!["no", "stop"]);
    }

    #[test]
    fn tally_accuracy_counts_single_results() {
        let tally = Tally { total: 4, single: 3, none: 1, ..Tally::default() };
        assert_eq!(tally.accuracy(), 0.75);
    }
}
