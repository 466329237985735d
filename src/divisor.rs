use std::cmp::Ordering;

use crate::Error;

/// Every divisor of `n` strictly less than `n`, ascending. Empty for 0 and 1.
pub fn proper_divisors(n: u64) -> Vec<u64> {
    let mut divisors = Vec::new();
    if n < 2 {
        return divisors;
    }

    let mut complements = Vec::new();
    let mut i = 1;
    while i <= n / i {
        if n % i == 0 {
            divisors.push(i);
            let j = n / i;
            if j != n && j != i {
                complements.push(j);
            }
        }
        i += 1;
    }
    divisors.extend(complements.into_iter().rev());

    divisors
}

/// Prime factorization of `n` as (prime, exponent) pairs, by trial division up to the
/// square root of the unfactored part.
pub fn prime_factors(mut n: u64) -> Vec<(u64, u32)> {
    let mut factors = Vec::new();
    let mut candidate = 2;
    while candidate <= n / candidate {
        if n % candidate == 0 {
            let mut exp = 0;
            while n % candidate == 0 {
                n /= candidate;
                exp += 1;
            }
            factors.push((candidate, exp));
        }
        candidate += if candidate == 2 { 1 } else { 2 };
    }

    if n > 1 {
        factors.push((n, 1));
    }

    factors
}

/// Sum of the proper divisors of `n`.
///
/// Computed as sigma(n) - n from the prime factorization. Returns 0 for 0 and 1.
pub fn aliquot_sum(n: u64) -> Result<u64, Error> {
    if n < 2 {
        return Ok(0);
    }

    let sigma = prime_factors(n)
        .into_iter()
        .map(|(p, exp)| {
            let p = u128::from(p);
            let mut power = 1u128;
            let mut sum = 1u128;
            for _ in 0..exp {
                power *= p;
                sum += power;
            }
            sum
        })
        .product::<u128>();

    u64::try_from(sigma - u128::from(n)).map_err(|_| Error::TermOverflow(n))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Deficient,
    Perfect,
    Abundant,
}

impl NumberKind {
    pub fn of(n: u64) -> Result<Self, Error> {
        Ok(match aliquot_sum(n)?.cmp(&n) {
            Ordering::Less => NumberKind::Deficient,
            Ordering::Equal => NumberKind::Perfect,
            Ordering::Greater => NumberKind::Abundant,
        })
    }
}

#[cfg(test)]
fn brute_aliquot_sum(n: u64) -> u64 {
    (1..n).filter(|d| n % d == 0).sum()
}

#[test]
fn test_aliquot_sum_matches_brute_force() {
    for n in 1..=2000 {
        assert_eq!(aliquot_sum(n).unwrap(), brute_aliquot_sum(n), "n = {}", n);
        assert_eq!(proper_divisors(n).iter().sum::<u64>(), brute_aliquot_sum(n), "n = {}", n);
    }
}

#[test]
fn test_aliquot_sum_edges() {
    assert_eq!(aliquot_sum(1).unwrap(), 0);
    for p in [2, 3, 5, 7, 97, 7919, 1_000_000_007] {
        assert_eq!(aliquot_sum(p).unwrap(), 1);
    }
    for perfect in [6, 28, 496, 8128, 33_550_336] {
        assert_eq!(aliquot_sum(perfect).unwrap(), perfect);
    }
}

#[test]
fn test_proper_divisors() {
    assert!(proper_divisors(1).is_empty());
    assert_eq!(proper_divisors(7), vec![1]);
    assert_eq!(proper_divisors(16), vec![1, 2, 4, 8]);
    assert_eq!(proper_divisors(36), vec![1, 2, 3, 4, 6, 9, 12, 18]);
}

#[test]
fn test_prime_factors() {
    assert!(prime_factors(1).is_empty());
    assert_eq!(prime_factors(276), vec![(2, 2), (3, 1), (23, 1)]);
    assert_eq!(prime_factors(1 << 40), vec![(2, 40)]);
}

#[test]
fn test_term_overflow() {
    // 2^6 * 3^3 * 5 * 7 * 11 * 13 * 17 * 19 * 23 * 29 * 31 * 37 * 41 * 43 fits in u64 but its
    // aliquot sum doesn't.
    let n = 64 * 27 * 5 * 7 * 11 * 13 * 17 * 19 * 23 * 29 * 31 * 37 * 41 * 43u64;
    assert_eq!(n, 3_767_835_263_520_968_640);
    assert!(matches!(aliquot_sum(n), Err(Error::TermOverflow(m)) if m == n));
}

#[test]
fn test_number_kind() {
    assert_eq!(NumberKind::of(8).unwrap(), NumberKind::Deficient);
    assert_eq!(NumberKind::of(28).unwrap(), NumberKind::Perfect);
    assert_eq!(NumberKind::of(12).unwrap(), NumberKind::Abundant);
}
