//! Karatsuba multiplication and squaring.
//!
//! Both operands are split at half the larger effective length into high and
//! low parts, trading one multiplication for extra additions:
//! `z0 = low_a * low_b`, `z2 = high_a * high_b`,
//! `z1 = (low_a + high_a) * (low_b + high_b) - z0 - z2`, and the result is
//! `z0 + (z1 << 64m) + (z2 << 128m)`.

use crate::big_int::BigInt;
use crate::big_int_constants::KARATSUBA_THRESHOLD;
use crate::big_int_ops as ops;

/// Splits the prefix `a[..a_limit]` at word `m`. Returns the high part as an
/// owned value and the length of the low prefix that stays in `a`.
fn split_abs(a: &BigInt, m: usize, a_limit: usize) -> (BigInt, usize) {
    if a_limit <= m {
        return (BigInt::zero(), a_limit);
    }
    let mut high = BigInt {
        sign: false,
        mag: a.mag[m..a_limit].to_vec(),
    };
    ops::normalize(&mut high);
    (high, m)
}

pub(crate) fn karatsuba(a: &BigInt, b: &BigInt, a_limit: usize, b_limit: usize) -> BigInt {
    if a_limit <= KARATSUBA_THRESHOLD || b_limit <= KARATSUBA_THRESHOLD {
        return ops::schoolbook_multiply(a, b, a_limit, b_limit);
    }
    let m = (a_limit.max(b_limit) + 1) / 2;
    let (mut a1, a0_limit) = split_abs(a, m, a_limit);
    let (mut b1, b0_limit) = split_abs(b, m, b_limit);

    let z2 = karatsuba(&a1, &b1, a1.mag.len(), b1.mag.len());
    let mut z0 = karatsuba(a, b, a0_limit, b0_limit);
    // Reuse the high parts as (low + high) sums for the middle product.
    ops::add_abs_slice(&mut a1, &a.mag[..a0_limit], 0);
    ops::add_abs_slice(&mut b1, &b.mag[..b0_limit], 0);
    let mut z1 = karatsuba(&a1, &b1, a1.mag.len(), b1.mag.len());
    ops::sub_abs_slice(&mut z1, &z2.mag);
    ops::sub_abs_slice(&mut z1, &z0.mag);

    ops::add_abs_slice(&mut z0, &z1.mag, m);
    ops::add_abs_slice(&mut z0, &z2.mag, 2 * m);
    z0.sign = a.sign != b.sign;
    ops::normalize(&mut z0);
    z0
}

/// Squares the prefix `a[..a_limit]` in place with three recursive squarings:
/// `low^2`, `high^2` and `(low + high)^2`.
pub(crate) fn karatsuba_square(a: &mut BigInt, a_limit: usize) {
    if a_limit <= KARATSUBA_THRESHOLD {
        let result = ops::schoolbook_square(a, a_limit);
        *a = result;
        return;
    }
    let m = (a_limit + 1) / 2;
    let mut high = BigInt {
        sign: false,
        mag: a.mag[m..a_limit].to_vec(),
    };
    ops::normalize(&mut high);
    a.sign = false;
    a.mag.truncate(m);
    ops::normalize(a);

    let mut sum = high.clone();
    ops::add_abs_slice(&mut sum, &a.mag, 0);
    let high_limit = high.mag.len();
    ops::square(&mut high, high_limit);
    let sum_limit = sum.mag.len();
    ops::square(&mut sum, sum_limit);
    let low_limit = a.mag.len();
    ops::square(a, low_limit);

    ops::sub_abs_slice(&mut sum, &high.mag);
    ops::sub_abs_slice(&mut sum, &a.mag);
    ops::add_abs_slice(a, &sum.mag, m);
    ops::add_abs_slice(a, &high.mag, 2 * m);
    ops::normalize(a);
}
