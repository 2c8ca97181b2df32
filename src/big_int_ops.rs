//! Magnitude arithmetic shared by every tier: carry/borrow-exact word loops,
//! shifting, the schoolbook multiplication and squaring base cases, Knuth's
//! Algorithm D, and the dispatchers that pick a tier by operand length.
//!
//! Magnitudes are little-endian `u64` words. Unless a function says otherwise
//! it expects normalized inputs and returns normalized outputs; the handful of
//! raw steps that may leave a value unnormalized (`add_abs_slice_overflowing`,
//! `sub_mul_word`) are only ever paired with a finalizing step by their
//! callers.

use std::cmp::Ordering;

use crate::big_int::BigInt;
use crate::big_int_constants::*;
use crate::burnikel_ziegler;
use crate::karatsuba;
use crate::toom_cook;

/// Strips most-significant zero words down to length one and clears the sign
/// if the remaining value is zero.
pub(crate) fn normalize(a: &mut BigInt) {
    while a.mag.len() > 1 && a.mag[a.mag.len() - 1] == 0 {
        a.mag.pop();
    }
    if a.mag.len() == 1 && a.mag[0] == 0 {
        a.sign = false;
    }
}

pub(crate) fn is_normalized(a: &BigInt) -> bool {
    !a.mag.is_empty() && (a.mag.len() == 1 || a.mag[a.mag.len() - 1] != 0)
}

/// Compares `|a|` against `|b| << (64 * b_shift)` without materializing the
/// shifted value. Both magnitudes must be normalized.
pub(crate) fn compare_abs(a: &BigInt, b: &BigInt, b_shift: usize) -> Ordering {
    assert!(
        is_normalized(a) && is_normalized(b),
        "compare_abs: operand is not normalized"
    );
    let a_len = a.mag.len();
    let b_len = b.mag.len() + b_shift;
    if a_len != b_len {
        return a_len.cmp(&b_len);
    }
    for i in (0..a_len).rev() {
        let a_word = a.mag[i];
        let b_word = if i >= b_shift { b.mag[i - b_shift] } else { 0 };
        if a_word != b_word {
            return a_word.cmp(&b_word);
        }
    }
    Ordering::Equal
}

/// Number of significant bits in the magnitude; zero has zero bits.
pub(crate) fn count_bits(a: &BigInt) -> u64 {
    assert!(is_normalized(a), "count_bits: value is not normalized");
    a.mag.len() as u64 * 64 - a.mag[a.mag.len() - 1].leading_zeros() as u64
}

/// Raw ripple-carry step of `|a| += |b| << (64 * b_shift)`.
///
/// Returns the final carry instead of growing `a`, which deliberately leaves
/// `a` holding a truncated value when the carry is nonzero. Knuth's add-back
/// needs exactly that; everyone else goes through [`add_abs_slice`].
pub(crate) fn add_abs_slice_overflowing(a: &mut BigInt, b: &[u64], b_shift: usize) -> u64 {
    let mut carry = false;
    let mut i = b_shift.min(a.mag.len());
    while i < a.mag.len() || i < b_shift + b.len() {
        let a_word = if i < a.mag.len() { a.mag[i] } else { 0 };
        let b_word = if i >= b_shift && i - b_shift < b.len() {
            b[i - b_shift]
        } else {
            0
        };
        let (sum, c1) = a_word.overflowing_add(b_word);
        let (sum, c2) = sum.overflowing_add(carry as u64);
        carry = c1 || c2;
        if i < a.mag.len() {
            a.mag[i] = sum;
        } else {
            a.mag.push(sum);
        }
        i += 1;
    }
    carry as u64
}

/// `|a| += |b| << (64 * b_shift)`, growing `a` on final carry.
pub(crate) fn add_abs_slice(a: &mut BigInt, b: &[u64], b_shift: usize) {
    let carry = add_abs_slice_overflowing(a, b, b_shift);
    if carry != 0 {
        a.mag.push(carry);
    }
}

/// `|a| -= |b|`. The caller must guarantee `|a| >= |b|`; a borrow escaping
/// the top word means that guarantee was broken and is fatal.
pub(crate) fn sub_abs_slice(a: &mut BigInt, b: &[u64]) {
    let mut borrow = false;
    for i in 0..a.mag.len() {
        let b_word = if i < b.len() { b[i] } else { 0 };
        let (diff, b1) = a.mag[i].overflowing_sub(b_word);
        let (diff, b2) = diff.overflowing_sub(borrow as u64);
        borrow = b1 || b2;
        a.mag[i] = diff;
    }
    if borrow {
        panic!("sub_abs_slice: borrow escaped the top word");
    }
    normalize(a);
}

/// `|a| + |b|` as a fresh non-negative value.
pub(crate) fn add_abs(a: &BigInt, b: &BigInt) -> BigInt {
    let mut result = BigInt {
        sign: false,
        mag: a.mag.clone(),
    };
    add_abs_slice(&mut result, &b.mag, 0);
    result
}

/// `|a| - |b|` as a signed value: negative when `|a| < |b|`.
pub(crate) fn sub_abs(a: &BigInt, b: &BigInt) -> BigInt {
    if compare_abs(a, b, 0) == Ordering::Less {
        let mut result = sub_abs(b, a);
        result.sign = true;
        result
    } else {
        let mut result = BigInt {
            sign: false,
            mag: a.mag.clone(),
        };
        sub_abs_slice(&mut result, &b.mag);
        result
    }
}

/// Signed addition.
pub(crate) fn add(a: &BigInt, b: &BigInt) -> BigInt {
    match (a.sign, b.sign) {
        (false, false) => add_abs(a, b),
        (true, true) => {
            let mut result = add_abs(a, b);
            result.sign = true;
            result
        }
        (true, false) => sub_abs(b, a),
        (false, true) => sub_abs(a, b),
    }
}

/// Signed subtraction.
pub(crate) fn sub(a: &BigInt, b: &BigInt) -> BigInt {
    match (a.sign, b.sign) {
        (false, false) => sub_abs(a, b),
        (true, true) => sub_abs(b, a),
        (true, false) => {
            let mut result = add_abs(a, b);
            result.sign = true;
            result
        }
        (false, true) => add_abs(a, b),
    }
}

/// Sign-aware comparison. Canonical zero carries a cleared sign, so the
/// sign check alone already orders mixed-sign operands.
pub(crate) fn compare(a: &BigInt, b: &BigInt) -> Ordering {
    match (a.sign, b.sign) {
        (false, true) => Ordering::Greater,
        (true, false) => Ordering::Less,
        (false, false) => compare_abs(a, b, 0),
        (true, true) => compare_abs(b, a, 0),
    }
}

/// Multiplies a magnitude prefix by a single word.
pub(crate) fn mul_word(a: &[u64], b: u64) -> BigInt {
    let mut mag = Vec::with_capacity(a.len() + 1);
    let mut carry: u64 = 0;
    for &word in a {
        let current = word as u128 * b as u128 + carry as u128;
        mag.push(current as u64);
        carry = (current >> 64) as u64;
    }
    if carry != 0 {
        mag.push(carry);
    }
    let mut result = BigInt { sign: false, mag };
    normalize(&mut result);
    result
}

/// `result += (b * w) << (64 * shift)`; the carry must die inside `result`.
fn add_mul_word(result: &mut BigInt, b: &[u64], w: u64, shift: usize) {
    let mut carry: u64 = 0;
    for (j, &word) in b.iter().enumerate() {
        let current = result.mag[shift + j] as u128 + word as u128 * w as u128 + carry as u128;
        result.mag[shift + j] = current as u64;
        carry = (current >> 64) as u64;
    }
    let mut i = shift + b.len();
    while carry != 0 && i < result.mag.len() {
        let (sum, c) = result.mag[i].overflowing_add(carry);
        result.mag[i] = sum;
        carry = c as u64;
        i += 1;
    }
    debug_assert!(carry == 0, "add_mul_word: carry escaped the result buffer");
}

/// `a -= (b * w) << (64 * shift)` over the window `a[shift..shift+b.len()+1]`.
///
/// Returns true when a borrow escapes the window's top word, which tells
/// Knuth's loop that the quotient estimate was one too large.
fn sub_mul_word(a: &mut BigInt, b: &[u64], w: u64, shift: usize) -> bool {
    let mut borrow: u64 = 0;
    for (j, &word) in b.iter().enumerate() {
        let product = word as u128 * w as u128 + borrow as u128;
        let current = (a.mag[shift + j] as u128).wrapping_sub(product);
        a.mag[shift + j] = current as u64;
        borrow = ((current >> 64) as u64).wrapping_neg();
    }
    let top = shift + b.len();
    let (diff, escaped) = a.mag[top].overflowing_sub(borrow);
    a.mag[top] = diff;
    escaped
}

/// Schoolbook product of two magnitude prefixes.
pub(crate) fn schoolbook_multiply(a: &BigInt, b: &BigInt, a_limit: usize, b_limit: usize) -> BigInt {
    let mut result = BigInt {
        sign: a.sign != b.sign,
        mag: vec![0; a_limit + b_limit],
    };
    for i in 0..b_limit {
        let factor = b.mag[i];
        if factor == 0 {
            continue;
        }
        let mut carry: u64 = 0;
        for j in 0..a_limit {
            let current = result.mag[i + j] as u128 + a.mag[j] as u128 * factor as u128 + carry as u128;
            result.mag[i + j] = current as u64;
            carry = (current >> 64) as u64;
        }
        result.mag[a_limit + i] = carry;
    }
    normalize(&mut result);
    result
}

/// Schoolbook square of a magnitude prefix.
///
/// Stores every 128-bit diagonal square shifted right by one bit so the
/// doubled cross products can be added without overflowing, then shifts the
/// whole buffer left once and restores the dropped low bit of `a[0]^2`.
pub(crate) fn schoolbook_square(a: &BigInt, a_limit: usize) -> BigInt {
    let mut result = BigInt {
        sign: false,
        mag: vec![0; 2 * a_limit],
    };
    let mut last_low_word: u64 = 0;
    for i in (0..a_limit).rev() {
        let square = a.mag[i] as u128 * a.mag[i] as u128;
        result.mag[2 * i + 1] = last_low_word << 63 | (square >> 65) as u64;
        result.mag[2 * i] = (square >> 1) as u64;
        last_low_word = square as u64;
    }
    for i in 0..a_limit.saturating_sub(1) {
        add_mul_word(&mut result, &a.mag[i + 1..a_limit], a.mag[i], 2 * i + 1);
    }
    shl_abs(&mut result, 1);
    result.mag[0] |= a.mag[0] & 1;
    normalize(&mut result);
    result
}

/// Multiplies two magnitude prefixes, picking a tier by the larger of the two
/// effective lengths. The sign of the result is the XOR of the operand signs
/// (cleared for zero).
pub(crate) fn multiply(a: &BigInt, b: &BigInt, a_limit: usize, b_limit: usize) -> BigInt {
    if a_limit == 1 || b_limit == 1 {
        let (long, long_limit, word) = if a_limit == 1 {
            (b, b_limit, a.mag[0])
        } else {
            (a, a_limit, b.mag[0])
        };
        let mut result = mul_word(&long.mag[..long_limit], word);
        result.sign = a.sign != b.sign && !result.is_zero();
        return result;
    }
    let max_limit = a_limit.max(b_limit);
    if max_limit < KARATSUBA_THRESHOLD {
        schoolbook_multiply(a, b, a_limit, b_limit)
    } else if max_limit < TOOM_COOK_THRESHOLD {
        karatsuba::karatsuba(a, b, a_limit, b_limit)
    } else {
        toom_cook::toom3(a, b, a_limit, b_limit)
    }
}

/// Squares the prefix `a[..a_limit]` in place. The result is non-negative.
pub(crate) fn square(a: &mut BigInt, a_limit: usize) {
    a.sign = false;
    if a_limit < KARATSUBA_SQUARE_THRESHOLD {
        let result = schoolbook_square(a, a_limit);
        *a = result;
    } else if a_limit < TOOM_COOK_SQUARE_THRESHOLD {
        karatsuba::karatsuba_square(a, a_limit);
    } else {
        toom_cook::toom3_square(a, a_limit);
    }
}

/// Long division by a single word; `a` becomes the quotient and the word
/// remainder is returned.
pub(crate) fn div_abs_word(a: &mut BigInt, b: u64) -> u64 {
    debug_assert!(b != 0, "div_abs_word: zero divisor");
    let mut rem: u64 = 0;
    for i in (0..a.mag.len()).rev() {
        let current = (rem as u128) << 64 | a.mag[i] as u128;
        a.mag[i] = (current / b as u128) as u64;
        rem = (current % b as u128) as u64;
    }
    normalize(a);
    rem
}

/// Knuth's Algorithm D over normalized operands: `b` has at least two words
/// and its top bit set, and `a` has at least as many words as `b`.
///
/// Each quotient digit is estimated from the top two remainder words, then
/// corrected by at most two decrements before the fused multiply-subtract;
/// an estimate that still exceeds one word afterwards is impossible for a
/// normalized divisor and treated as fatal. The remainder prefix stays
/// unnormalized between digits; only the final remainder is normalized.
fn divide_knuth_abs_inner(a: &mut BigInt, b: &BigInt) -> BigInt {
    let n = b.mag.len();
    debug_assert!(n >= 2 && a.mag.len() >= n);
    debug_assert!(b.mag[n - 1] >> 63 == 1, "divisor top bit not set");
    let m = a.mag.len() - n;
    let b_high = b.mag[n - 1];
    let b_second = b.mag[n - 2];
    a.mag.push(0);
    let mut quotient = Vec::with_capacity(m + 1);
    for i in (0..=m).rev() {
        let a_part = (a.mag[i + n] as u128) << 64 | a.mag[i + n - 1] as u128;
        let mut qhat = a_part / b_high as u128;
        let mut rhat = a_part % b_high as u128;
        while qhat >> 64 != 0
            || qhat * b_second as u128 > (rhat << 64 | a.mag[i + n - 2] as u128)
        {
            qhat -= 1;
            rhat += b_high as u128;
            if rhat >> 64 != 0 {
                break;
            }
        }
        if qhat >> 64 != 0 {
            panic!("divide_knuth_abs_inner: quotient digit exceeds word range");
        }
        let mut q = qhat as u64;
        if sub_mul_word(a, &b.mag, q, i) {
            q -= 1;
            // The discarded carry cancels the escaped borrow exactly.
            add_abs_slice_overflowing(a, &b.mag, i);
        }
        if a.mag[i + n] != 0 {
            panic!("divide_knuth_abs_inner: nonzero word above the remainder prefix");
        }
        a.mag.pop();
        quotient.push(q);
    }
    let mut rem = BigInt {
        sign: false,
        mag: std::mem::take(&mut a.mag),
    };
    normalize(&mut rem);
    quotient.reverse();
    a.mag = quotient;
    normalize(a);
    rem
}

/// Divides `|a|` by `|b|` with Knuth's Algorithm D, normalizing the divisor's
/// top bit first. `a` becomes the quotient; the remainder is returned.
pub(crate) fn divide_knuth_abs(a: &mut BigInt, b: &BigInt) -> BigInt {
    if b.mag.len() == 1 {
        let rem = div_abs_word(a, b.mag[0]);
        return BigInt::from(rem);
    }
    if a.mag.len() < b.mag.len() {
        let mut rem = BigInt {
            sign: false,
            mag: std::mem::take(&mut a.mag),
        };
        a.mag.push(0);
        normalize(&mut rem);
        return rem;
    }
    let shift = b.mag[b.mag.len() - 1].leading_zeros() as u64;
    let mut b_norm = BigInt {
        sign: false,
        mag: b.mag.clone(),
    };
    shl_abs(a, shift);
    shl_abs(&mut b_norm, shift);
    let mut rem = divide_knuth_abs_inner(a, &b_norm);
    shr_abs(&mut rem, shift);
    rem
}

/// Unsigned-magnitude division dispatcher: `a` becomes `|a| / |b|` and
/// `|a| % |b|` is returned, both with cleared signs. The signed façade
/// applies floor semantics on top of this.
pub(crate) fn divide_abs(a: &mut BigInt, b: &BigInt) -> BigInt {
    debug_assert!(!b.is_zero(), "divide_abs: zero divisor");
    a.sign = false;
    if b.mag.len() == 1 {
        let rem = div_abs_word(a, b.mag[0]);
        return BigInt::from(rem);
    }
    // Burnikel-Ziegler requires a divisor of at least the threshold length;
    // below that its divide2n1n base case lands in Knuth immediately, so a
    // short divisor dispatches to Knuth whatever the dividend length.
    if a.mag.len() < BURNIKEL_ZIEGLER_THRESHOLD || b.mag.len() < BURNIKEL_ZIEGLER_THRESHOLD {
        divide_knuth_abs(a, b)
    } else {
        burnikel_ziegler::divide_burnikel_ziegler(a, b)
    }
}

/// Shifts the magnitude left by `shift` bits, sign untouched.
pub(crate) fn shl_abs(a: &mut BigInt, shift: u64) {
    if a.is_zero() {
        return;
    }
    let blocks = (shift / 64) as usize;
    let bits = (shift % 64) as u32;
    if blocks > 0 {
        let old_len = a.mag.len();
        a.mag.resize(old_len + blocks, 0);
        a.mag.rotate_right(blocks);
    }
    if bits > 0 {
        let mut carry: u64 = 0;
        for word in a.mag.iter_mut() {
            let shifted = *word << bits | carry;
            carry = *word >> (64 - bits);
            *word = shifted;
        }
        if carry != 0 {
            a.mag.push(carry);
        }
    }
}

/// Shifts the magnitude right by `shift` bits; shifting everything out
/// yields canonical zero.
pub(crate) fn shr_abs(a: &mut BigInt, shift: u64) {
    let blocks = (shift / 64).min(a.mag.len() as u64) as usize;
    if blocks == a.mag.len() {
        a.sign = false;
        a.mag.clear();
        a.mag.push(0);
        return;
    }
    if blocks > 0 {
        a.mag.drain(..blocks);
    }
    let bits = (shift % 64) as u32;
    if bits > 0 {
        let len = a.mag.len();
        for i in 0..len {
            let high = if i + 1 < len { a.mag[i + 1] } else { 0 };
            a.mag[i] = a.mag[i] >> bits | high << (64 - bits);
        }
        if len > 1 && a.mag[len - 1] == 0 {
            a.mag.pop();
        }
    }
    if a.mag.len() == 1 && a.mag[0] == 0 {
        a.sign = false;
    }
}

/// Signed shift count; a negative count shifts the other way.
pub(crate) fn shift_left(a: &mut BigInt, shift: i64) {
    if shift < 0 {
        shr_abs(a, shift.unsigned_abs());
    } else {
        shl_abs(a, shift as u64);
    }
}

/// Signed shift count; a negative count shifts the other way.
pub(crate) fn shift_right(a: &mut BigInt, shift: i64) {
    if shift < 0 {
        shl_abs(a, shift.unsigned_abs());
    } else {
        shr_abs(a, shift as u64);
    }
}

/// Binary exponentiation in place.
///
/// An exponent that is a power of two needs nothing but repeated squaring.
/// Otherwise the accumulator starts at the base and walks the exponent from
/// its second-most-significant bit downward, squaring each step and
/// multiplying the base back in on set bits; the last step is a plain square
/// exactly when the exponent is even, so a negative base keeps the right sign.
pub(crate) fn fast_pow_assign(a: &mut BigInt, n: u64) {
    if n == 0 {
        *a = BigInt::one();
        return;
    }
    if n.is_power_of_two() {
        for _ in 0..n.trailing_zeros() {
            let limit = a.mag.len();
            square(a, limit);
        }
        return;
    }
    let base = a.clone();
    let top_bit = 63 - n.leading_zeros();
    for i in (0..top_bit).rev() {
        let limit = a.mag.len();
        square(a, limit);
        if n >> i & 1 == 1 {
            *a = multiply(a, &base, a.mag.len(), base.mag.len());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    pub(crate) fn from_words(words: &[u64]) -> BigInt {
        let mut value = BigInt {
            sign: false,
            mag: words.to_vec(),
        };
        normalize(&mut value);
        value
    }

    pub(crate) fn random_magnitude(rng: &mut StdRng, words: usize) -> BigInt {
        let mut mag: Vec<u64> = (0..words).map(|_| rng.gen()).collect();
        let last = mag.len() - 1;
        mag[last] |= 1;
        BigInt { sign: false, mag }
    }

    #[test]
    fn add_carry_crosses_words() {
        let mut a = from_words(&[u64::MAX, u64::MAX]);
        add_abs_slice(&mut a, &[1], 0);
        assert_eq!(a.mag, vec![0, 0, 1]);
    }

    #[test]
    fn add_with_shift_pads_zero_words() {
        let mut a = from_words(&[7]);
        add_abs_slice(&mut a, &[9], 3);
        assert_eq!(a.mag, vec![7, 0, 0, 9]);
    }

    #[test]
    fn overflowing_add_reports_escaped_carry() {
        let mut a = from_words(&[u64::MAX]);
        let carry = add_abs_slice_overflowing(&mut a, &[1], 0);
        assert_eq!(carry, 1);
        assert_eq!(a.mag, vec![0]);
    }

    #[test]
    fn sub_borrows_across_words() {
        let mut a = from_words(&[0, 0, 1]);
        sub_abs_slice(&mut a, &[1]);
        assert_eq!(a.mag, vec![u64::MAX, u64::MAX]);
    }

    #[test]
    #[should_panic(expected = "borrow escaped")]
    fn sub_underflow_is_fatal() {
        let mut a = from_words(&[1]);
        sub_abs_slice(&mut a, &[2]);
    }

    #[test]
    fn signed_add_sub_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let a_words = rng.gen_range(1..8);
            let b_words = rng.gen_range(1..8);
            let mut a = random_magnitude(&mut rng, a_words);
            let mut b = random_magnitude(&mut rng, b_words);
            a.sign = rng.gen();
            b.sign = rng.gen();
            normalize(&mut a);
            normalize(&mut b);
            let sum = add(&a, &b);
            assert_eq!(sub(&sum, &b), a);
            assert_eq!(sub(&sum, &a), b);
        }
    }

    #[test]
    fn compare_abs_with_word_shift() {
        let a = from_words(&[0, 0, 5]);
        let b = from_words(&[5]);
        assert_eq!(compare_abs(&a, &b, 2), Ordering::Equal);
        assert_eq!(compare_abs(&a, &b, 1), Ordering::Greater);
        let c = from_words(&[1, 0, 5]);
        assert_eq!(compare_abs(&c, &b, 2), Ordering::Greater);
    }

    #[test]
    fn count_bits_values() {
        assert_eq!(count_bits(&from_words(&[0])), 0);
        assert_eq!(count_bits(&from_words(&[1])), 1);
        assert_eq!(count_bits(&from_words(&[u64::MAX])), 64);
        assert_eq!(count_bits(&from_words(&[0, 1])), 65);
    }

    #[test]
    fn normalize_clears_sign_of_zero() {
        let mut a = BigInt {
            sign: true,
            mag: vec![0, 0, 0],
        };
        normalize(&mut a);
        assert!(!a.sign);
        assert_eq!(a.mag, vec![0]);
    }

    #[test]
    fn mul_word_matches_u128() {
        let a = from_words(&[0x8000_0000_0000_0001, 3]);
        let product = mul_word(&a.mag, 4);
        // (3 * 2^64 + 2^63 + 1) * 4 = 14 * 2^64 + 4
        assert_eq!(product.mag, vec![4, 14]);
        assert_eq!(mul_word(&[5, 6], 0).mag, vec![0]);
    }

    #[test]
    fn schoolbook_matches_u128_products() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a: u64 = rng.gen();
            let b: u64 = rng.gen();
            let product = schoolbook_multiply(&from_words(&[a]), &from_words(&[b]), 1, 1);
            let expected = a as u128 * b as u128;
            let mut expected_words = vec![expected as u64, (expected >> 64) as u64];
            while expected_words.len() > 1 && *expected_words.last().unwrap() == 0 {
                expected_words.pop();
            }
            assert_eq!(product.mag, expected_words);
        }
    }

    #[test]
    fn schoolbook_square_matches_multiply() {
        let mut rng = StdRng::seed_from_u64(13);
        for words in [1usize, 2, 3, 7, 16, 31] {
            let a = random_magnitude(&mut rng, words);
            let squared = schoolbook_square(&a, a.mag.len());
            let product = schoolbook_multiply(&a, &a, a.mag.len(), a.mag.len());
            assert_eq!(squared, product);
        }
    }

    #[test]
    fn single_word_dispatch_keeps_sign() {
        let mut a = from_words(&[10]);
        a.sign = true;
        let b = from_words(&[3]);
        let product = multiply(&a, &b, 1, 1);
        assert!(product.sign);
        assert_eq!(product.mag, vec![30]);
        let zero = multiply(&a, &from_words(&[0]), 1, 1);
        assert!(!zero.sign);
        assert!(zero.is_zero());
    }

    #[test]
    fn knuth_division_reconstructs_dividend() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let a_words = rng.gen_range(2..40);
            let b_words = rng.gen_range(2..10);
            let a = random_magnitude(&mut rng, a_words);
            let b = random_magnitude(&mut rng, b_words);
            let mut quotient = a.clone();
            let rem = divide_knuth_abs(&mut quotient, &b);
            assert!(compare_abs(&rem, &b, 0) == Ordering::Less);
            let mut reconstructed = multiply(&quotient, &b, quotient.mag.len(), b.mag.len());
            add_abs_slice(&mut reconstructed, &rem.mag, 0);
            assert_eq!(reconstructed, a);
        }
    }

    #[test]
    fn knuth_smaller_dividend_short_circuits() {
        let b = from_words(&[1, 1, 1]);
        let mut a = from_words(&[42, 7]);
        let rem = divide_knuth_abs(&mut a, &b);
        assert!(a.is_zero());
        assert_eq!(rem, from_words(&[42, 7]));
    }

    #[test]
    fn word_division_matches_knuth() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..100 {
            let a_words = rng.gen_range(1..12);
            let a = random_magnitude(&mut rng, a_words);
            let b: u64 = rng.gen_range(1..u64::MAX);
            let mut quotient = a.clone();
            let rem = div_abs_word(&mut quotient, b);
            let mut reconstructed = mul_word(&quotient.mag, b);
            add_abs_slice(&mut reconstructed, &[rem], 0);
            assert_eq!(reconstructed, a);
            assert!(rem < b);
        }
    }

    #[test]
    fn shifts_cross_word_boundaries() {
        let mut a = from_words(&[1]);
        shl_abs(&mut a, 65);
        assert_eq!(a.mag, vec![0, 2]);
        shr_abs(&mut a, 65);
        assert_eq!(a.mag, vec![1]);

        let mut b = from_words(&[0b1011]);
        shl_abs(&mut b, 62);
        assert_eq!(b.mag, vec![0b11 << 62, 0b10]);
        shr_abs(&mut b, 62);
        assert_eq!(b.mag, vec![0b1011]);
    }

    #[test]
    fn shift_out_everything_yields_zero() {
        let mut a = from_words(&[u64::MAX, u64::MAX]);
        a.sign = true;
        shr_abs(&mut a, 128);
        assert!(a.is_zero());
        assert!(!a.sign);
        let mut b = from_words(&[1]);
        shr_abs(&mut b, 1);
        assert!(b.is_zero());
    }

    #[test]
    fn negative_shift_counts_delegate() {
        let mut a = from_words(&[4]);
        shift_left(&mut a, -2);
        assert_eq!(a.mag, vec![1]);
        shift_right(&mut a, -64);
        assert_eq!(a.mag, vec![0, 1]);
    }

    #[test]
    fn pow_matches_u128() {
        for (base, exp) in [(3u64, 5u32), (2, 10), (7, 3), (10, 19), (1, 63)] {
            let mut value = from_words(&[base]);
            fast_pow_assign(&mut value, exp as u64);
            let expected = (base as u128).pow(exp);
            let mut expected_words = vec![expected as u64, (expected >> 64) as u64];
            while expected_words.len() > 1 && *expected_words.last().unwrap() == 0 {
                expected_words.pop();
            }
            assert_eq!(value.mag, expected_words);
        }
    }

    #[test]
    fn pow_zero_exponent_is_one() {
        let mut a = from_words(&[0]);
        fast_pow_assign(&mut a, 0);
        assert_eq!(a.mag, vec![1]);
        let mut b = from_words(&[17]);
        b.sign = true;
        fast_pow_assign(&mut b, 0);
        assert_eq!(b, BigInt::one());
    }

    #[test]
    fn pow_sign_follows_exponent_parity() {
        let mut a = from_words(&[2]);
        a.sign = true;
        let mut even = a.clone();
        fast_pow_assign(&mut even, 6);
        assert!(!even.sign);
        assert_eq!(even.mag, vec![64]);
        fast_pow_assign(&mut a, 5);
        assert!(a.sign);
        assert_eq!(a.mag, vec![32]);
    }

    #[test]
    fn pow_power_of_two_exponent() {
        let mut a = from_words(&[3]);
        fast_pow_assign(&mut a, 8);
        assert_eq!(a.mag, vec![6561]);
        let mut b = from_words(&[5]);
        fast_pow_assign(&mut b, 1);
        assert_eq!(b.mag, vec![5]);
    }
}
