use std::io::{self, Write};

use aliquot::{plot, report, AliquotRun, CLIArgs, NumberKind, SequenceConfig, State};
use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level.parse().unwrap_or(LevelFilter::Warn))
        .init();

    let start = match &args.start {
        Some(s) => aliquot::parse_start(s)
            .with_context(|| format!("Failed to parse starting number from argument({}).", s))?,
        None => aliquot::read_start(io::stdin().lock(), io::stdout())
            .context("Failed to read starting number from standard input.")?,
    };

    if log::log_enabled!(log::Level::Info) {
        if let Ok(kind) = NumberKind::of(start) {
            log::info!("{} is {:?}.", start, kind);
        }
    }

    let config = SequenceConfig::from(&args);
    log::info!(
        "Starting from {}, special cap {} for {:?}, at most {} terms.",
        start,
        config.special_cap,
        config.special,
        config.max_steps
    );

    let mut seq = config.sequence(start)?;
    let mut columns = report::TermColumns::new(io::stdout().lock(), args.columns);
    let mut terms = Vec::new();
    for term in seq.by_ref() {
        let term = match term {
            Ok(term) => term,
            Err(e) => {
                columns.end_row().context("Failed to write term.")?;
                return Err(e).with_context(|| {
                    format!(
                        "Failed to compute term #{} of the aliquot sequence from {}.",
                        terms.len() + 1,
                        start
                    )
                });
            }
        };
        columns.push(term).context("Failed to write term.")?;
        terms.push(term);
    }

    let run = AliquotRun::new(start, terms, seq.state());
    let mut out = columns.into_inner();
    report::write_summary(&mut out, &run).context("Failed to write summary.")?;
    out.flush().context("Failed to flush standard output.")?;
    drop(out);

    log::info!("Sequence from {} is {} after {} term(s).", start, run.outcome(), run.count());
    if run.outcome() == State::Exceeded {
        log::warn!(
            "Sequence from {} exceeded the bound of {} terms, it may be perfect or cyclic.",
            start,
            config.max_steps
        );
    }

    if args.no_plot {
        return Ok(());
    }

    if run.is_empty() {
        log::warn!("No terms computed from {}, skip plotting.", start);
        return Ok(());
    }

    plot::render(&run, &args.plot)
        .with_context(|| format!("Failed to plot sequence to file({}).", args.plot.display()))?;
    println!("Plot of log10(term) by step written to {}.", args.plot.display());

    Ok(())
}
