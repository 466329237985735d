use std::io::{self, Write};

use crate::{AliquotRun, State};

pub const COLUMNS: usize = 8;
const TERM_WIDTH: usize = 21;
const MAX_WIDTH: usize = 16;

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (ind, c) in digits.chars().enumerate() {
        if ind > 0 && (digits.len() - ind) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// Writes terms as they arrive in fixed width columns, `columns` per line.
pub struct TermColumns<W: Write> {
    out: W,
    columns: usize,
    written: usize,
}

impl<W: Write> TermColumns<W> {
    pub fn new(out: W, columns: usize) -> Self {
        Self {
            out,
            columns: columns.max(1),
            written: 0,
        }
    }

    pub fn push(&mut self, term: u64) -> io::Result<()> {
        write!(
            self.out,
            "{:>width$} ",
            group_thousands(term),
            width = TERM_WIDTH
        )?;
        self.written += 1;
        if self.written % self.columns == 0 {
            writeln!(self.out)?;
        }

        self.out.flush()
    }

    /// Ends a partially filled row, so later output starts on its own line.
    pub fn end_row(&mut self) -> io::Result<()> {
        if self.written % self.columns != 0 {
            writeln!(self.out)?;
            self.written = 0;
        }

        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn write_summary<W: Write>(mut out: W, run: &AliquotRun) -> io::Result<()> {
    writeln!(
        out,
        "\nThere were {} terms. Maximum was: {:>width$}",
        run.count(),
        group_thousands(run.max()),
        width = MAX_WIDTH
    )?;

    match run.outcome() {
        State::Capped => writeln!(
            out,
            "Stopped after {} term(s): {} is a special number with no known end.",
            run.count(),
            run.start()
        ),
        State::Exceeded => writeln!(
            out,
            "Sequence did not terminate within {} term(s) (non-terminating, exceeded iteration bound).",
            run.count()
        ),
        _ => Ok(()),
    }
}

#[test]
fn test_group_thousands() {
    assert_eq!(group_thousands(0), "0");
    assert_eq!(group_thousands(999), "999");
    assert_eq!(group_thousands(1000), "1,000");
    assert_eq!(group_thousands(1_234_567), "1,234,567");
    assert_eq!(group_thousands(u64::MAX), "18,446,744,073,709,551,615");
}

#[cfg(test)]
fn write_terms(terms: &[u64], columns: usize) -> String {
    let mut writer = TermColumns::new(Vec::new(), columns);
    for &term in terms {
        writer.push(term).unwrap();
    }

    String::from_utf8(writer.into_inner()).unwrap()
}

#[test]
fn test_term_columns() {
    let text = write_terms(&[16, 15, 9], 2);
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("{:>21} {:>21} ", "16", "15"));
    assert_eq!(lines[1], format!("{:>21} ", "9"));
}

#[test]
fn test_term_columns_default_width() {
    let terms = (1..=10).map(|n| n * 1_000).collect::<Vec<u64>>();
    let text = write_terms(&terms, COLUMNS);
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), 8 * 22);
    assert!(lines[0].starts_with(&format!("{:>21} ", "1,000")));
    assert_eq!(lines[1], format!("{:>21} {:>21} ", "9,000", "10,000"));
}

#[test]
fn test_term_columns_end_row() {
    let mut writer = TermColumns::new(Vec::new(), 2);
    writer.push(7).unwrap();
    writer.end_row().unwrap();
    writer.end_row().unwrap();
    writer.push(6).unwrap();
    writer.push(6).unwrap();
    writer.end_row().unwrap();
    assert_eq!(
        String::from_utf8(writer.into_inner()).unwrap(),
        format!("{:>21} \n{:>21} {:>21} \n", "7", "6", "6")
    );
}

#[test]
fn test_write_summary() {
    let run = AliquotRun::new(1_230, vec![1_794, 2_238, 2_250, 3_834], State::Running);
    let mut out = Vec::new();
    write_summary(&mut out, &run).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("\nThere were 4 terms. Maximum was: {:>16}\n", "3,834")
    );

    let run = AliquotRun::new(6, vec![6; 4], State::Exceeded);
    let mut out = Vec::new();
    write_summary(&mut out, &run).unwrap();
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("did not terminate within 4 term(s)"));
}
