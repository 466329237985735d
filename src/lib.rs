use std::{
    error,
    fmt::Display,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::Parser;

pub mod divisor;
pub mod plot;
pub mod report;
pub mod sequence;

pub use divisor::{aliquot_sum, proper_divisors, NumberKind};
pub use sequence::{AliquotRun, AliquotSequence, SequenceConfig, State};

#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    EmptyInput,
    InvalidStartText(String),
    InvalidStart(u64),
    TermOverflow(u64),
    Plot(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IOError(ioe) => write!(f, "I/O error: {}", ioe),
            Error::EmptyInput => write!(f, "No starting number given, input ended before any text."),
            Error::InvalidStartText(s) => write!(
                f,
                "Invalid text({}) for starting number, expect a positive integer.",
                s
            ),
            Error::InvalidStart(n) => write!(
                f,
                "Invalid starting number({}), aliquot sequences start from positive integers.",
                n
            ),
            Error::TermOverflow(n) => write!(
                f,
                "The aliquot sum of {} doesn't fit in 64 bits.",
                n
            ),
            Error::Plot(s) => write!(f, "Failed to render plot: {}", s),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
#[command(
    name = "aliquot",
    version,
    about = "Print and plot the aliquot sequence of a starting number"
)]
pub struct CLIArgs {
    /// Starting number, prompted for on standard input when omitted.
    pub start: Option<String>,

    /// Number of terms to compute for a special starting number before stopping.
    #[arg(long, default_value_t = sequence::SPECIAL_CAP)]
    pub special_cap: usize,

    /// Upper bound on the number of terms for any starting number.
    #[arg(long, default_value_t = sequence::MAX_STEPS)]
    pub max_steps: usize,

    /// Comma separated starting numbers to treat as special, replacing the built-in set.
    #[arg(long, value_delimiter = ',')]
    pub special: Option<Vec<u64>>,

    /// Terms printed per line.
    #[arg(long, default_value_t = report::COLUMNS)]
    pub columns: usize,

    /// Path of the PNG plot of log10(term) by step.
    #[arg(long, default_value = "aliquot.png")]
    pub plot: PathBuf,

    /// Skip rendering the plot.
    #[arg(long)]
    pub no_plot: bool,

    /// One of off, error, warn, info, debug, trace.
    #[arg(long, short, default_value = "warn")]
    pub log_level: String,
}

pub const PROMPT: &str = "Please input a starting number: ";

pub fn parse_start(s: &str) -> Result<u64, Error> {
    let text = s.trim();
    let n = text
        .parse::<u64>()
        .map_err(|_| Error::InvalidStartText(text.to_string()))?;
    if n == 0 {
        return Err(Error::InvalidStart(n));
    }

    Ok(n)
}

/// Writes the prompt to `output`, then reads one line from `input` as the starting number.
pub fn read_start<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<u64, Error> {
    write!(output, "{}", PROMPT).map_err(Error::IOError)?;
    output.flush().map_err(Error::IOError)?;

    let mut line = String::new();
    let read_n = input.read_line(&mut line).map_err(Error::IOError)?;
    if read_n == 0 {
        return Err(Error::EmptyInput);
    }

    parse_start(&line)
}

#[test]
fn test_parse_start() {
    assert_eq!(parse_start("276").unwrap(), 276);
    assert_eq!(parse_start("  12\n").unwrap(), 12);
    assert!(matches!(parse_start("0"), Err(Error::InvalidStart(0))));
    assert!(matches!(parse_start("-5"), Err(Error::InvalidStartText(s)) if s == "-5"));
    assert!(matches!(parse_start("twelve"), Err(Error::InvalidStartText(_))));
}

#[test]
fn test_read_start_prompts() {
    let mut output = Vec::new();
    let n = read_start("138\n".as_bytes(), &mut output).unwrap();
    assert_eq!(n, 138);
    assert_eq!(String::from_utf8(output).unwrap(), PROMPT);

    assert!(matches!(
        read_start("".as_bytes(), Vec::new()),
        Err(Error::EmptyInput)
    ));
}
