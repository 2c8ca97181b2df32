//! Process-wide cache of the powers 10^(2^k) used by decimal conversion.
//!
//! The cache is append-only: entry `k` holds 10^(2^k) and a missing entry is
//! computed by squaring the previous one. Existing entries are never mutated
//! or removed; the mutex covers the whole grow-and-read sequence so
//! concurrent conversions see a consistent table.

use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::big_int::BigInt;
use crate::big_int_ops as ops;

lazy_static! {
    static ref POWER_OF_TEN_CACHE: Mutex<Vec<BigInt>> =
        Mutex::new(vec![BigInt::from(10u64)]);
}

/// Returns 10^(2^k), growing the cache on demand.
pub(crate) fn power_of_ten(k: usize) -> BigInt {
    let mut cache = POWER_OF_TEN_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    while cache.len() <= k {
        let mut next = cache[cache.len() - 1].clone();
        let limit = next.mag.len();
        ops::square(&mut next, limit);
        cache.push(next);
    }
    cache[k].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_entries_match_direct_exponentiation() {
        assert_eq!(power_of_ten(0), BigInt::from(10u64));
        assert_eq!(power_of_ten(1), BigInt::from(100u64));
        assert_eq!(power_of_ten(2), BigInt::from(10_000u64));
        assert_eq!(power_of_ten(3), BigInt::from(100_000_000u64));
        assert_eq!(power_of_ten(4), BigInt::from(10u64).pow(16));
    }

    #[test]
    fn grows_past_the_word_boundary() {
        // 10^(2^7) = 10^128 spans several words.
        let entry = power_of_ten(7);
        assert_eq!(entry, BigInt::from(10u64).pow(128));
        // Out-of-order access still sees consistent entries.
        assert_eq!(power_of_ten(5), BigInt::from(10u64).pow(32));
    }
}
