use std::{collections::BTreeSet, fmt::Display, iter};

use crate::{divisor, CLIArgs, Error};

/// Starting numbers whose sequences have no known end.
pub const SPECIAL_NUMBERS: [u64; 6] = [276, 552, 564, 660, 966, 996];
pub const SPECIAL_CAP: usize = 81;
pub const MAX_STEPS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    /// Reached 1.
    Terminated,
    /// Started from a special number and hit the special cap.
    Capped,
    /// Hit the iteration bound without reaching 1, e.g. a perfect number.
    Exceeded,
    /// The next term didn't fit in u64.
    Overflowed,
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            State::Running => "running",
            State::Terminated => "terminated",
            State::Capped => "capped",
            State::Exceeded => "non-terminating",
            State::Overflowed => "overflowed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceConfig {
    pub special: BTreeSet<u64>,
    pub special_cap: usize,
    pub max_steps: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            special: SPECIAL_NUMBERS.into_iter().collect(),
            special_cap: SPECIAL_CAP,
            max_steps: MAX_STEPS,
        }
    }
}

impl From<&CLIArgs> for SequenceConfig {
    fn from(args: &CLIArgs) -> Self {
        let special = match &args.special {
            Some(list) => list.iter().copied().collect(),
            None => SPECIAL_NUMBERS.into_iter().collect(),
        };

        Self {
            special,
            special_cap: args.special_cap,
            max_steps: args.max_steps,
        }
    }
}

impl SequenceConfig {
    pub fn is_special(&self, n: u64) -> bool {
        self.special.contains(&n)
    }

    /// A fresh lazy sequence of the terms after `start`.
    pub fn sequence(&self, start: u64) -> Result<AliquotSequence<'_>, Error> {
        if start == 0 {
            return Err(Error::InvalidStart(start));
        }

        Ok(AliquotSequence {
            config: self,
            start,
            current: start,
            steps: 0,
            state: State::Running,
        })
    }

    pub fn run(&self, start: u64) -> Result<AliquotRun, Error> {
        let mut seq = self.sequence(start)?;
        let terms = seq.by_ref().collect::<Result<Vec<_>, _>>()?;

        Ok(AliquotRun::new(start, terms, seq.state()))
    }
}

/// Iterator over the terms following a starting number. Each item is one application of the
/// aliquot sum; the iterator ends once the state leaves `Running`.
#[derive(Debug, Clone)]
pub struct AliquotSequence<'a> {
    config: &'a SequenceConfig,
    start: u64,
    current: u64,
    steps: usize,
    state: State,
}

impl Iterator for AliquotSequence<'_> {
    type Item = Result<u64, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::Running {
            return None;
        }

        if self.current == 1 {
            self.state = State::Terminated;
            return None;
        }

        let term = match divisor::aliquot_sum(self.current) {
            Ok(term) => term,
            Err(e) => {
                self.state = State::Overflowed;
                return Some(Err(e));
            }
        };
        self.steps += 1;
        self.current = term;
        log::debug!("Step #{}: {}", self.steps, term);

        self.state = if term == 1 {
            State::Terminated
        } else if self.config.is_special(self.start) && self.steps >= self.config.special_cap {
            State::Capped
        } else if self.steps >= self.config.max_steps {
            State::Exceeded
        } else {
            State::Running
        };

        Some(Ok(term))
    }
}

impl AliquotSequence<'_> {
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn state(&self) -> State {
        self.state
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliquotRun {
    start: u64,
    terms: Vec<u64>,
    max: u64,
    outcome: State,
}

impl AliquotRun {
    pub fn new(start: u64, terms: Vec<u64>, outcome: State) -> Self {
        let max = terms.iter().copied().max().unwrap_or(0);
        Self {
            start,
            terms,
            max,
            outcome,
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    /// Computed terms, the starting number excluded.
    pub fn terms(&self) -> &[u64] {
        &self.terms
    }

    pub fn count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Largest computed term, 0 if nothing was computed.
    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn outcome(&self) -> State {
        self.outcome
    }

    /// The starting number followed by every computed term.
    pub fn sequence(&self) -> impl Iterator<Item = u64> + '_ {
        iter::once(self.start).chain(self.terms.iter().copied())
    }

    /// (step, log10(term)) for each computed term, steps counted from 1.
    pub fn log10_points(&self) -> Vec<(usize, f64)> {
        self.terms
            .iter()
            .enumerate()
            .map(|(ind, &term)| (ind + 1, (term as f64).log10()))
            .collect()
    }
}

#[test]
fn test_run_from_8() {
    let run = SequenceConfig::default().run(8).unwrap();
    assert_eq!(run.sequence().collect::<Vec<_>>(), vec![8, 7, 1]);
    assert_eq!(run.count(), 2);
    assert_eq!(run.max(), 7);
    assert_eq!(run.outcome(), State::Terminated);
}

#[test]
fn test_run_from_12() {
    let run = SequenceConfig::default().run(12).unwrap();
    assert_eq!(
        run.sequence().collect::<Vec<_>>(),
        vec![12, 16, 15, 9, 4, 3, 1]
    );
    assert_eq!(run.max(), 16);
    assert_eq!(run.outcome(), State::Terminated);
}

#[test]
fn test_run_from_1() {
    let run = SequenceConfig::default().run(1).unwrap();
    assert!(run.is_empty());
    assert_eq!(run.max(), 0);
    assert_eq!(run.outcome(), State::Terminated);
}

#[test]
fn test_zero_start_rejected() {
    assert!(matches!(
        SequenceConfig::default().sequence(0),
        Err(Error::InvalidStart(0))
    ));
}

#[test]
fn test_special_numbers_capped() {
    let config = SequenceConfig::default();
    for start in SPECIAL_NUMBERS {
        let run = config.run(start).unwrap();
        assert_eq!(run.count(), SPECIAL_CAP, "start = {}", start);
        assert_eq!(run.outcome(), State::Capped, "start = {}", start);
        assert!(run.terms().iter().all(|&term| term != 1));
    }
}

#[test]
fn test_special_cap_configurable() {
    let config = SequenceConfig {
        special_cap: 5,
        ..SequenceConfig::default()
    };
    let run = config.run(276).unwrap();
    assert_eq!(run.terms(), &[396, 696, 1104, 1872, 3770]);
    assert_eq!(run.outcome(), State::Capped);

    // Not special any more, so only the iteration bound applies.
    let config = SequenceConfig {
        special: BTreeSet::new(),
        max_steps: 10,
        ..SequenceConfig::default()
    };
    assert_eq!(config.run(276).unwrap().outcome(), State::Exceeded);
}

#[test]
fn test_perfect_number_exceeds_bound() {
    let config = SequenceConfig {
        max_steps: 1000,
        ..SequenceConfig::default()
    };
    let run = config.run(6).unwrap();
    assert_eq!(run.count(), 1000);
    assert!(run.terms().iter().all(|&term| term == 6));
    assert_eq!(run.outcome(), State::Exceeded);

    // 25 -> 6 -> 6 -> ...
    assert_eq!(config.run(25).unwrap().outcome(), State::Exceeded);
}

#[test]
fn test_sequence_is_lazy_and_restartable() {
    let config = SequenceConfig::default();
    let mut seq = config.sequence(12).unwrap();
    let restart = seq.clone();
    assert_eq!(seq.next().unwrap().unwrap(), 16);
    assert_eq!(seq.steps(), 1);
    assert_eq!(seq.state(), State::Running);

    let rest = seq.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(rest, vec![15, 9, 4, 3, 1]);
    assert_eq!(seq.state(), State::Terminated);
    assert!(seq.next().is_none());

    let again = restart.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(again, vec![16, 15, 9, 4, 3, 1]);
}

#[test]
fn test_sequence_fused_after_overflow() {
    let config = SequenceConfig::default();
    let mut seq = config.sequence(3_767_835_263_520_968_640).unwrap();
    assert!(matches!(seq.next(), Some(Err(Error::TermOverflow(_)))));
    assert_eq!(seq.state(), State::Overflowed);
    assert!(seq.next().is_none());
}

#[test]
fn test_log10_points() {
    let run = SequenceConfig::default().run(12).unwrap();
    let points = run.log10_points();
    assert_eq!(points.len(), 6);
    assert_eq!(points[0].0, 1);
    assert!((points[0].1 - 16f64.log10()).abs() < 1e-12);
    assert_eq!(points[5], (6, 0.0));
}
