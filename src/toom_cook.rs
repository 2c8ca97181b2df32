//! Toom-Cook-3 multiplication and squaring.
//!
//! Operands split into three parts of `m = ceil(max_len / 3)` words. Each
//! operand is evaluated at the points {0, 1, -1, -2, inf}, the five pointwise
//! products recurse through the dispatcher, and the product coefficients come
//! back out of a fixed interpolation that contains one exact division by 3.
//! Intermediate evaluations can go negative, so this module works on signed
//! values until the final recombination.

use crate::big_int::BigInt;
use crate::big_int_ops as ops;

/// Splits the prefix `a[..a_limit]` into (low, mid, high) parts of `m` words,
/// zero-filling the parts a short operand does not reach.
fn split_abs_3way(a: &BigInt, m: usize, a_limit: usize) -> (BigInt, BigInt, BigInt) {
    let part = |range: std::ops::Range<usize>| {
        let mut part = BigInt {
            sign: false,
            mag: a.mag[range].to_vec(),
        };
        ops::normalize(&mut part);
        part
    };
    if a_limit <= m {
        (part(0..a_limit), BigInt::zero(), BigInt::zero())
    } else if a_limit <= 2 * m {
        (part(0..m), part(m..a_limit), BigInt::zero())
    } else {
        (part(0..m), part(m..2 * m), part(2 * m..a_limit))
    }
}

/// In-place variant for squaring: extracts mid and high, truncating `a` to
/// its low `m` words. The operand must actually have three parts.
fn split_abs_3way_inplace(a: &mut BigInt, a_limit: usize, m: usize) -> (BigInt, BigInt) {
    if a_limit <= 2 * m {
        panic!("split_abs_3way_inplace: operand has fewer than three parts");
    }
    let mut a2 = BigInt {
        sign: false,
        mag: a.mag[2 * m..a_limit].to_vec(),
    };
    ops::normalize(&mut a2);
    let mut a1 = BigInt {
        sign: false,
        mag: a.mag[m..2 * m].to_vec(),
    };
    ops::normalize(&mut a1);
    a.sign = false;
    a.mag.truncate(m);
    ops::normalize(a);
    (a1, a2)
}

/// Exact in-place division of the magnitude by three; a nonzero remainder
/// means the interpolation identities were violated and is fatal.
fn div3_exact_assign(a: &mut BigInt) {
    let mut rem: u128 = 0;
    for i in (0..a.mag.len()).rev() {
        let current = rem << 64 | a.mag[i] as u128;
        a.mag[i] = (current / 3) as u64;
        rem = current % 3;
    }
    if rem != 0 {
        panic!("div3_exact_assign: division by three left remainder {}", rem);
    }
    ops::normalize(a);
}

pub(crate) fn toom3(a: &BigInt, b: &BigInt, a_limit: usize, b_limit: usize) -> BigInt {
    let m = (a_limit.max(b_limit) + 2) / 3;
    let (a0, a1, a2) = split_abs_3way(a, m, a_limit);
    let (b0, b1, b2) = split_abs_3way(b, m, b_limit);

    // Evaluate both operands at 1, -1 and -2; 0 and inf are the end parts.
    let p0 = ops::add(&a0, &a2);
    let p_1 = ops::add(&p0, &a1);
    let p_m1 = ops::sub(&p0, &a1);
    let mut p_m2 = ops::add(&p_m1, &a2);
    ops::shl_abs(&mut p_m2, 1);
    let p_m2 = ops::sub(&p_m2, &a0);

    let q0 = ops::add(&b0, &b2);
    let q_1 = ops::add(&q0, &b1);
    let q_m1 = ops::sub(&q0, &b1);
    let mut q_m2 = ops::add(&q_m1, &b2);
    ops::shl_abs(&mut q_m2, 1);
    let q_m2 = ops::sub(&q_m2, &b0);

    let r_0 = ops::multiply(&a0, &b0, a0.mag.len(), b0.mag.len());
    let r_1 = ops::multiply(&p_1, &q_1, p_1.mag.len(), q_1.mag.len());
    let r_m1 = ops::multiply(&p_m1, &q_m1, p_m1.mag.len(), q_m1.mag.len());
    let r_m2 = ops::multiply(&p_m2, &q_m2, p_m2.mag.len(), q_m2.mag.len());
    let r_inf = ops::multiply(&a2, &b2, a2.mag.len(), b2.mag.len());

    let (r1, r2, r3) = interpolate(&r_0, &r_1, &r_m1, &r_m2, &r_inf);

    let mut result = r_0;
    ops::add_abs_slice(&mut result, &r1.mag, m);
    ops::add_abs_slice(&mut result, &r2.mag, 2 * m);
    ops::add_abs_slice(&mut result, &r3.mag, 3 * m);
    ops::add_abs_slice(&mut result, &r_inf.mag, 4 * m);
    result.sign = a.sign != b.sign;
    ops::normalize(&mut result);
    result
}

/// Squares the prefix `a[..a_limit]` in place with five recursive squarings.
pub(crate) fn toom3_square(a: &mut BigInt, a_limit: usize) {
    let m = (a_limit + 2) / 3;
    let (a1, mut a2) = split_abs_3way_inplace(a, a_limit, m);

    let p0 = ops::add(a, &a2);
    let mut p_1 = ops::add(&p0, &a1);
    let mut p_m1 = ops::sub(&p0, &a1);
    let mut p_m2 = ops::add(&p_m1, &a2);
    ops::shl_abs(&mut p_m2, 1);
    let mut p_m2 = ops::sub(&p_m2, a);

    let limit = a.mag.len();
    ops::square(a, limit);
    let limit = p_1.mag.len();
    ops::square(&mut p_1, limit);
    let limit = p_m1.mag.len();
    ops::square(&mut p_m1, limit);
    let limit = p_m2.mag.len();
    ops::square(&mut p_m2, limit);
    let limit = a2.mag.len();
    ops::square(&mut a2, limit);

    // a now holds the point-0 square and a2 the point-inf square.
    let (r1, r2, r3) = interpolate(a, &p_1, &p_m1, &p_m2, &a2);

    ops::add_abs_slice(a, &r1.mag, m);
    ops::add_abs_slice(a, &r2.mag, 2 * m);
    ops::add_abs_slice(a, &r3.mag, 3 * m);
    ops::add_abs_slice(a, &a2.mag, 4 * m);
    ops::normalize(a);
}

/// Recovers the middle coefficients (c1, c2, c3) from the five pointwise
/// products. Every returned coefficient is non-negative for genuine products,
/// even though the intermediate combinations pass through negative values.
fn interpolate(
    r_0: &BigInt,
    r_1: &BigInt,
    r_m1: &BigInt,
    r_m2: &BigInt,
    r_inf: &BigInt,
) -> (BigInt, BigInt, BigInt) {
    let mut r3 = ops::sub(r_m2, r_1);
    div3_exact_assign(&mut r3);
    let mut r1 = ops::sub(r_1, r_m1);
    ops::shr_abs(&mut r1, 1);
    let r2 = ops::sub(r_m1, r_0);
    let mut r3 = ops::sub(&r2, &r3);
    ops::shr_abs(&mut r3, 1);
    let mut doubled_inf = r_inf.clone();
    ops::shl_abs(&mut doubled_inf, 1);
    let r3 = ops::add(&r3, &doubled_inf);
    let r2 = ops::sub(&ops::add(&r2, &r1), r_inf);
    let r1 = ops::sub(&r1, &r3);
    debug_assert!(
        !r1.sign && !r2.sign && !r3.sign,
        "interpolate: negative product coefficient"
    );
    (r1, r2, r3)
}
