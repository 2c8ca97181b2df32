//! Burnikel-Ziegler recursive division for very large operands.
//!
//! The divisor is padded to `n` words, a power-of-two multiple of the tier
//! threshold, by a common left shift that also sets its top bit. The dividend
//! is then consumed high block first: each step divides a two-block prefix by
//! the divisor (`divide2n1n`), which recurses through three-halves-by-one
//! subdivisions (`divide3n2n`) down to Knuth's Algorithm D.

use std::cmp::Ordering;

use crate::big_int::BigInt;
use crate::big_int_constants::BURNIKEL_ZIEGLER_THRESHOLD;
use crate::big_int_ops as ops;

/// Copies `chunk_index`-th block of `chunk_size` words out of the magnitude.
/// Blocks past the top are zero.
fn get_chunk(a: &BigInt, chunk_size: usize, chunk_index: usize) -> BigInt {
    let start = chunk_index * chunk_size;
    if start >= a.mag.len() {
        return BigInt::zero();
    }
    let end = (start + chunk_size).min(a.mag.len());
    let mut chunk = BigInt {
        sign: false,
        mag: a.mag[start..end].to_vec(),
    };
    ops::normalize(&mut chunk);
    chunk
}

fn set_ones(a: &mut BigInt, n: usize) {
    a.sign = false;
    a.mag.clear();
    a.mag.resize(n, u64::MAX);
}

/// Divides three half-blocks `[a1, a2, a3]` by the full divisor `b`;
/// `a` becomes the quotient block and the remainder is returned.
fn divide3n2n(a: &mut BigInt, b: &BigInt) -> BigInt {
    let n_half = b.mag.len() / 2;
    let a3 = get_chunk(a, n_half, 0);
    let mut b1 = get_chunk(b, n_half, 1);
    ops::shr_abs(a, 64 * n_half as u64); // now a = [a1, a2]
    let mut rem;
    if ops::compare_abs(a, &b1, n_half) == Ordering::Less {
        rem = divide2n1n(a, &b1);
    } else {
        // The quotient block is the maximum word value everywhere; correct
        // the remainder as a + b1 - (b1 << half) to stay non-negative.
        rem = a.clone();
        ops::add_abs_slice(&mut rem, &b1.mag, 0);
        ops::shl_abs(&mut b1, 64 * n_half as u64);
        ops::sub_abs_slice(&mut rem, &b1.mag);
        set_ones(a, n_half);
    }
    // a now holds the quotient estimate.
    let d = ops::multiply(a, b, a.mag.len(), n_half);
    ops::shl_abs(&mut rem, 64 * n_half as u64);
    ops::add_abs_slice(&mut rem, &a3.mag, 0);
    while ops::compare_abs(&rem, &d, 0) == Ordering::Less {
        ops::add_abs_slice(&mut rem, &b.mag, 0);
        ops::sub_abs_slice(a, &[1]);
    }
    ops::sub_abs_slice(&mut rem, &d.mag);
    rem
}

/// Divides two blocks `[a1, a2]` (each `n` words) by the `n`-word divisor;
/// `a` becomes the quotient and the remainder is returned.
fn divide2n1n(a: &mut BigInt, b: &BigInt) -> BigInt {
    let n = b.mag.len();
    if n % 2 != 0 || n < BURNIKEL_ZIEGLER_THRESHOLD {
        return ops::divide_knuth_abs(a, b);
    }
    let n_half = n / 2;
    let mut a4 = get_chunk(a, n_half, 0);
    ops::shr_abs(a, 64 * n_half as u64); // now a = [a1, a2, a3]

    let rem = divide3n2n(a, b); // a = high quotient half
    ops::add_abs_slice(&mut a4, &rem.mag, n_half); // a4 = [r1, r2, a4]
    let rem = divide3n2n(&mut a4, b); // a4 = low quotient half

    ops::shl_abs(a, 64 * n_half as u64);
    ops::add_abs_slice(a, &a4.mag, 0);
    rem
}

/// Divides `|a|` by `|b|`; `a` becomes the quotient and the remainder is
/// returned. Requires the divisor to be at least the tier threshold long.
pub(crate) fn divide_burnikel_ziegler(a: &mut BigInt, b: &BigInt) -> BigInt {
    let r = a.mag.len();
    let s = b.mag.len();
    debug_assert!(s >= BURNIKEL_ZIEGLER_THRESHOLD);
    if r < s {
        let mut rem = BigInt {
            sign: false,
            mag: std::mem::take(&mut a.mag),
        };
        a.mag.push(0);
        ops::normalize(&mut rem);
        return rem;
    }

    // Smallest power of two m with m * threshold > s.
    let m = 1usize << (64 - (s as u64 / BURNIKEL_ZIEGLER_THRESHOLD as u64).leading_zeros());
    let j = (s + m - 1) / m;
    let n = j * m;
    let n64 = 64 * n as u64;

    // Shift both operands so the divisor fills n words with its top bit set.
    let sigma = n64 - ops::count_bits(b);
    let mut new_b = BigInt {
        sign: false,
        mag: b.mag.clone(),
    };
    ops::shl_abs(&mut new_b, sigma);
    ops::shl_abs(a, sigma);

    // Number of dividend blocks, at least two.
    let t = (((ops::count_bits(a) + n64) / n64) as usize).max(2);

    let mut result = BigInt::zero();
    let mut z = get_chunk(a, n, t - 2);
    let high_start = (n * (t - 1)).min(a.mag.len());
    let high_end = (n * t).min(a.mag.len());
    ops::add_abs_slice(&mut z, &a.mag[high_start..high_end], n);

    let mut rem = BigInt::zero();
    for i in (0..=t - 2).rev() {
        rem = divide2n1n(&mut z, &new_b);
        ops::add_abs_slice(&mut result, &z.mag, n * i);
        if i > 0 {
            z = rem;
            ops::shl_abs(&mut z, n64);
            let start = (n * (i - 1)).min(a.mag.len());
            let end = (n * i).min(a.mag.len());
            ops::add_abs_slice(&mut z, &a.mag[start..end], 0);
            rem = BigInt::zero();
        }
    }
    ops::shr_abs(&mut rem, sigma);
    a.mag = result.mag;
    ops::normalize(a);
    ops::normalize(&mut rem);
    rem
}
