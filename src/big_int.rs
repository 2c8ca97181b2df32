//! The signed arbitrary-precision integer type and its operator surface.
//!
//! `BigInt` is a sign + magnitude pair; the magnitude is a little-endian
//! vector of 64-bit words with no most-significant zero word (zero is the
//! single word `[0]` with a cleared sign). The operators resolve signs here
//! and delegate all magnitude work to the dispatchers in [`crate::big_int_ops`].
//!
//! # Example
//! ```
//! use big_int::BigInt;
//!
//! let a: BigInt = "10000000000000".parse().unwrap();
//! let b: BigInt = "900000000000".parse().unwrap();
//! assert_eq!((&a + &b).to_string(), "10900000000000");
//! assert_eq!((&a * &b).to_string(), "9000000000000000000000000");
//! assert_eq!((&a / &b).to_string(), "11");
//! assert_eq!((&a % &b).to_string(), "100000000000");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{
    Add, AddAssign,
    Sub, SubAssign,
    Mul, MulAssign,
    Div, DivAssign,
    Rem, RemAssign,
    Shl, ShlAssign,
    Shr, ShrAssign,
    Neg,
};
use std::str::FromStr;

use crate::big_int_cache;
use crate::big_int_constants::*;
use crate::big_int_ops as ops;
use crate::error::BigIntError;

/// A signed integer of unbounded magnitude.
///
/// All value-returning operators leave their operands untouched; every
/// operator also exists in an in-place `*Assign` form. Division and modulo
/// use floor semantics: the quotient rounds toward negative infinity and the
/// remainder takes the divisor's sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInt {
    pub(crate) sign: bool,
    pub(crate) mag: Vec<u64>,
}

impl BigInt {
    /// Canonical zero.
    pub fn zero() -> BigInt {
        BigInt {
            sign: false,
            mag: vec![0],
        }
    }

    pub fn one() -> BigInt {
        BigInt {
            sign: false,
            mag: vec![1],
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mag.len() == 1 && self.mag[0] == 0
    }

    pub fn is_negative(&self) -> bool {
        self.sign
    }

    /// Number of significant bits in the magnitude; zero has bit length 0.
    pub fn bit_length(&self) -> u64 {
        ops::count_bits(self)
    }

    /// The absolute value.
    pub fn abs(&self) -> BigInt {
        BigInt {
            sign: false,
            mag: self.mag.clone(),
        }
    }

    /// Flips the sign in place; zero stays canonical.
    pub fn negate(&mut self) {
        if !self.is_zero() {
            self.sign = !self.sign;
        }
    }

    /// `self` raised to the non-negative exponent `n`; `pow(x, 0) == 1` for
    /// every `x`, including zero.
    pub fn pow(&self, n: u64) -> BigInt {
        let mut result = self.clone();
        result.pow_assign(n);
        result
    }

    pub fn pow_assign(&mut self, n: u64) {
        ops::fast_pow_assign(self, n);
    }

    /// `self * self` through the dedicated squaring tiers, which skip the
    /// symmetric cross products a general multiplication would recompute.
    pub fn square(&self) -> BigInt {
        let mut result = self.clone();
        result.square_assign();
        result
    }

    pub fn square_assign(&mut self) {
        let limit = self.mag.len();
        ops::square(self, limit);
    }

    /// Floor division that reports a zero divisor instead of panicking.
    pub fn checked_div(&self, divisor: &BigInt) -> Result<BigInt, BigIntError> {
        if divisor.is_zero() {
            return Err(BigIntError::DivisionByZero);
        }
        let negative = self.sign != divisor.sign;
        let mut quotient = self.clone();
        let rem = ops::divide_abs(&mut quotient, divisor);
        if negative && !rem.is_zero() {
            // Floor rounding: the truncated quotient is one too close to zero.
            ops::add_abs_slice(&mut quotient, &[1], 0);
        }
        quotient.sign = negative && !quotient.is_zero();
        Ok(quotient)
    }

    /// Floor modulo that reports a zero divisor instead of panicking. The
    /// result is zero or carries the divisor's sign.
    pub fn checked_rem(&self, divisor: &BigInt) -> Result<BigInt, BigIntError> {
        if divisor.is_zero() {
            return Err(BigIntError::DivisionByZero);
        }
        let mut scratch = self.clone();
        let rem = ops::divide_abs(&mut scratch, divisor);
        if rem.is_zero() {
            return Ok(BigInt::zero());
        }
        let mut rem = if self.sign != divisor.sign {
            ops::sub_abs(divisor, &rem)
        } else {
            rem
        };
        rem.sign = divisor.sign;
        Ok(rem)
    }
}

impl Default for BigInt {
    fn default() -> Self {
        BigInt::zero()
    }
}

macro_rules! impl_unsigned_to_big_int {
    ($($u: ty),*) => {
    $(
    impl From<$u> for BigInt {
        fn from(value: $u) -> Self {
            BigInt {
                sign: false,
                mag: vec![value as u64],
            }
        }
    }
    )*
    };
}

macro_rules! impl_signed_to_big_int {
    ($($i: ty),*) => {
    $(
    impl From<$i> for BigInt {
        fn from(value: $i) -> Self {
            BigInt {
                sign: value < 0,
                mag: vec![value.unsigned_abs() as u64],
            }
        }
    }
    )*
    };
}

impl_unsigned_to_big_int!(u8, u16, u32, u64, usize);
impl_signed_to_big_int!(i8, i16, i32, i64, isize);

/// Folds a 19-digit decimal group into the magnitude: `mag = mag * mul + add`.
fn destructive_mul_add(mag: &mut Vec<u64>, mul: u64, add: u64) {
    let mut carry = add as u128;
    for word in mag.iter_mut() {
        let current = *word as u128 * mul as u128 + carry;
        *word = current as u64;
        carry = current >> 64;
    }
    if carry != 0 {
        mag.push(carry as u64);
    }
}

impl FromStr for BigInt {
    type Err = BigIntError;

    /// Parses a decimal integer: an optional leading `-`, then at least one
    /// ASCII digit and nothing else. Digits are consumed in groups of up to
    /// 19, each folded in with one multiply-add over the magnitude.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            _ => (false, s),
        };
        if digits.is_empty() {
            return Err(BigIntError::InvalidInput("no digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BigIntError::InvalidInput("unexpected character"));
        }

        let mut mag = Vec::with_capacity(digits.len() / DIGITS_PER_WORD + 1);
        mag.push(0);
        let mut cursor = 0;
        let mut group_len = digits.len() % DIGITS_PER_WORD;
        if group_len == 0 {
            group_len = DIGITS_PER_WORD;
        }
        while cursor < digits.len() {
            let group = &digits[cursor..cursor + group_len];
            // Up to 19 digits always fit a u64 and were checked above.
            let group_val: u64 = group.parse().map_err(|_| {
                BigIntError::InvalidInput("digit group out of range")
            })?;
            let radix_pow = if group_len == DIGITS_PER_WORD {
                TEN_POW_19
            } else {
                10u64.pow(group_len as u32)
            };
            destructive_mul_add(&mut mag, radix_pow, group_val);
            cursor += group_len;
            group_len = DIGITS_PER_WORD;
        }

        let mut value = BigInt { sign, mag };
        ops::normalize(&mut value);
        Ok(value)
    }
}

/// Chunked conversion for small magnitudes: repeated division by 10^19,
/// emitting each remainder as a 19-digit group. A nonzero `digits` budget
/// left-pads the result with zeros up to that width; exceeding the budget
/// means a caller miscounted and is fatal.
fn small_to_string(a: &BigInt, buffer: &mut String, digits: usize) {
    let mut reversed: Vec<u8> = Vec::new();
    let mut current = a.clone();
    if current.is_zero() {
        reversed.push(b'0');
    }
    while !current.is_zero() {
        let mut rem = ops::div_abs_word(&mut current, TEN_POW_19);
        for _ in 0..DIGITS_PER_WORD {
            reversed.push(b'0' + (rem % 10) as u8);
            rem /= 10;
        }
    }
    while reversed.len() > 1 && *reversed.last().unwrap() == b'0' {
        reversed.pop();
    }
    if digits > 0 {
        if reversed.len() > digits {
            panic!(
                "small_to_string: {} digits exceed the budget of {}",
                reversed.len(),
                digits
            );
        }
        for _ in reversed.len()..digits {
            buffer.push('0');
        }
    }
    buffer.extend(reversed.iter().rev().map(|&b| b as char));
}

/// Recursive conversion: splits the value by the cached power 10^(2^k)
/// closest to its square root and converts both halves, the low one padded
/// to exactly 2^k digits.
fn to_string_split(a: &BigInt, buffer: &mut String, digits: usize) {
    if a.mag.len() < TO_STRING_THRESHOLD {
        return small_to_string(a, buffer, digits);
    }
    let digit_estimate = ops::count_bits(a) as f64 * LOG10_2;
    let k = (digit_estimate / 2.0).log2() as u32;
    let chunk = 1usize << k;

    let mut high = a.clone();
    let low = ops::divide_abs(&mut high, &big_int_cache::power_of_ten(k as usize));
    to_string_split(&high, buffer, digits.saturating_sub(chunk));
    to_string_split(&low, buffer, chunk);
}

impl fmt::Display for BigInt {
    /// Canonical decimal rendering: no leading zeros except a lone `"0"`,
    /// a leading `-` iff the value is negative.
    ///
    /// Supported up to a magnitude bit length of 2^53; beyond that the
    /// floating-point digit estimates driving the recursion lose exactness
    /// (such a value could not be allocated anyway).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_assert!(ops::count_bits(self) <= 1 << 53);
        let expected_digits = (ops::count_bits(self) as f64 * LOG10_2) as usize + 1;
        let mut buffer = String::with_capacity(expected_digits + self.sign as usize);
        if self.sign {
            buffer.push('-');
        }
        to_string_split(self, &mut buffer, 0);
        f.write_str(&buffer)
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        ops::compare(self, other)
    }
}

impl Add for BigInt {
    type Output = BigInt;

    fn add(self, rhs: Self) -> Self::Output {
        ops::add(&self, &rhs)
    }
}

impl Add for &BigInt {
    type Output = BigInt;

    fn add(self, rhs: Self) -> Self::Output {
        ops::add(self, rhs)
    }
}

impl AddAssign for BigInt {
    fn add_assign(&mut self, rhs: Self) {
        *self = ops::add(self, &rhs);
    }
}

impl AddAssign<&BigInt> for BigInt {
    fn add_assign(&mut self, rhs: &BigInt) {
        *self = ops::add(self, rhs);
    }
}

impl Sub for BigInt {
    type Output = BigInt;

    fn sub(self, rhs: Self) -> Self::Output {
        ops::sub(&self, &rhs)
    }
}

impl Sub for &BigInt {
    type Output = BigInt;

    fn sub(self, rhs: Self) -> Self::Output {
        ops::sub(self, rhs)
    }
}

impl SubAssign for BigInt {
    fn sub_assign(&mut self, rhs: Self) {
        *self = ops::sub(self, &rhs);
    }
}

impl SubAssign<&BigInt> for BigInt {
    fn sub_assign(&mut self, rhs: &BigInt) {
        *self = ops::sub(self, rhs);
    }
}

impl Neg for BigInt {
    type Output = BigInt;

    fn neg(mut self) -> Self::Output {
        self.negate();
        self
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    fn neg(self) -> Self::Output {
        let mut result = self.clone();
        result.negate();
        result
    }
}

impl Mul for BigInt {
    type Output = BigInt;

    fn mul(self, rhs: Self) -> Self::Output {
        ops::multiply(&self, &rhs, self.mag.len(), rhs.mag.len())
    }
}

impl Mul for &BigInt {
    type Output = BigInt;

    fn mul(self, rhs: Self) -> Self::Output {
        ops::multiply(self, rhs, self.mag.len(), rhs.mag.len())
    }
}

impl MulAssign for BigInt {
    fn mul_assign(&mut self, rhs: Self) {
        *self = ops::multiply(self, &rhs, self.mag.len(), rhs.mag.len());
    }
}

impl MulAssign<&BigInt> for BigInt {
    fn mul_assign(&mut self, rhs: &BigInt) {
        *self = ops::multiply(self, rhs, self.mag.len(), rhs.mag.len());
    }
}

impl Div for BigInt {
    type Output = BigInt;

    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(&rhs)
            .unwrap_or_else(|_| panic!("attempt to divide by zero"))
    }
}

impl Div for &BigInt {
    type Output = BigInt;

    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(rhs)
            .unwrap_or_else(|_| panic!("attempt to divide by zero"))
    }
}

impl DivAssign for BigInt {
    fn div_assign(&mut self, rhs: Self) {
        *self = self
            .checked_div(&rhs)
            .unwrap_or_else(|_| panic!("attempt to divide by zero"));
    }
}

impl DivAssign<&BigInt> for BigInt {
    fn div_assign(&mut self, rhs: &BigInt) {
        *self = self
            .checked_div(rhs)
            .unwrap_or_else(|_| panic!("attempt to divide by zero"));
    }
}

impl Rem for BigInt {
    type Output = BigInt;

    fn rem(self, rhs: Self) -> Self::Output {
        self.checked_rem(&rhs)
            .unwrap_or_else(|_| panic!("attempt to calculate the remainder with a divisor of zero"))
    }
}

impl Rem for &BigInt {
    type Output = BigInt;

    fn rem(self, rhs: Self) -> Self::Output {
        self.checked_rem(rhs)
            .unwrap_or_else(|_| panic!("attempt to calculate the remainder with a divisor of zero"))
    }
}

impl RemAssign for BigInt {
    fn rem_assign(&mut self, rhs: Self) {
        *self = self
            .checked_rem(&rhs)
            .unwrap_or_else(|_| panic!("attempt to calculate the remainder with a divisor of zero"));
    }
}

impl RemAssign<&BigInt> for BigInt {
    fn rem_assign(&mut self, rhs: &BigInt) {
        *self = self
            .checked_rem(rhs)
            .unwrap_or_else(|_| panic!("attempt to calculate the remainder with a divisor of zero"));
    }
}

impl Shl<i64> for BigInt {
    type Output = BigInt;

    fn shl(mut self, n: i64) -> Self::Output {
        ops::shift_left(&mut self, n);
        self
    }
}

impl Shl<i64> for &BigInt {
    type Output = BigInt;

    fn shl(self, n: i64) -> Self::Output {
        let mut result = self.clone();
        ops::shift_left(&mut result, n);
        result
    }
}

impl ShlAssign<i64> for BigInt {
    fn shl_assign(&mut self, n: i64) {
        ops::shift_left(self, n);
    }
}

impl Shr<i64> for BigInt {
    type Output = BigInt;

    fn shr(mut self, n: i64) -> Self::Output {
        ops::shift_right(&mut self, n);
        self
    }
}

impl Shr<i64> for &BigInt {
    type Output = BigInt;

    fn shr(self, n: i64) -> Self::Output {
        let mut result = self.clone();
        ops::shift_right(&mut result, n);
        result
    }
}

impl ShrAssign<i64> for BigInt {
    fn shr_assign(&mut self, n: i64) {
        ops::shift_right(self, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> BigInt {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_displays_word_boundary_values() {
        for s in [
            "0",
            "1",
            "-1",
            "9223372036854775807",
            "18446744073709551615",
            "18446744073709551616",
            "-18446744073709551616",
            "340282366920938463463374607431768211456",
        ] {
            assert_eq!(parse(s).to_string(), s);
        }
    }

    #[test]
    fn parse_strips_leading_zeros() {
        assert_eq!(parse("007"), BigInt::from(7u64));
        assert_eq!(parse("-007"), BigInt::from(-7i64));
        assert_eq!(parse("000"), BigInt::zero());
    }

    #[test]
    fn minus_zero_parses_to_canonical_zero() {
        let zero = parse("-0");
        assert!(!zero.sign);
        assert_eq!(zero.mag, vec![0]);
        assert_eq!(zero.to_string(), "0");
    }

    #[test]
    fn rejects_malformed_input() {
        for s in ["", "-", "+7", "12a3", " 12", "1 2", "--5", "12-"] {
            assert_eq!(
                s.parse::<BigInt>().map_err(|e| matches!(e, BigIntError::InvalidInput(_))),
                Err(true),
                "input {:?}",
                s
            );
        }
    }

    #[test]
    fn from_native_integers() {
        assert_eq!(BigInt::from(0u8), BigInt::zero());
        assert_eq!(BigInt::from(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(BigInt::from(i64::MIN).to_string(), "-9223372036854775808");
        assert_eq!(BigInt::from(-1i32) + BigInt::from(1u32), BigInt::zero());
    }

    #[test]
    fn floor_division_grid() {
        let cases: [(i64, i64, i64, i64); 4] = [
            (100, 7, 14, 2),
            (-100, 7, -15, 5),
            (100, -7, -15, -5),
            (-100, -7, 14, -2),
        ];
        for (a, b, q, r) in cases {
            let a = BigInt::from(a);
            let b = BigInt::from(b);
            assert_eq!(&a / &b, BigInt::from(q), "{} / {}", a, b);
            assert_eq!(&a % &b, BigInt::from(r), "{} % {}", a, b);
        }
    }

    #[test]
    fn exact_division_has_zero_remainder_any_sign() {
        let a = BigInt::from(-21i64);
        let b = BigInt::from(7i64);
        assert_eq!(&a / &b, BigInt::from(-3i64));
        assert_eq!(&a % &b, BigInt::zero());
        let neg_b = -&b;
        assert_eq!(&a % &neg_b, BigInt::zero());
    }

    #[test]
    fn comparison_is_sign_aware() {
        let values: Vec<BigInt> = ["-100", "-7", "0", "7", "100"]
            .iter()
            .map(|s| parse(s))
            .collect();
        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                assert_eq!(a.cmp(b), i.cmp(&j), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn negate_keeps_zero_canonical() {
        let mut zero = BigInt::zero();
        zero.negate();
        assert!(!zero.sign);
        let minus_five = -BigInt::from(5u64);
        assert!(minus_five.sign);
        assert_eq!(-&minus_five, BigInt::from(5u64));
    }

    #[test]
    fn square_matches_multiply() {
        let x = parse("123456789012345678901234567890");
        assert_eq!(x.square(), &x * &x);
        let mut y = x.clone();
        y.square_assign();
        assert_eq!(y, &x * &x);
        assert_eq!(BigInt::zero().square(), BigInt::zero());
    }

    #[test]
    fn checked_division_reports_zero_divisor() {
        let a = BigInt::from(5u64);
        assert_eq!(a.checked_div(&BigInt::zero()), Err(BigIntError::DivisionByZero));
        assert_eq!(a.checked_rem(&BigInt::zero()), Err(BigIntError::DivisionByZero));
    }

    #[test]
    #[should_panic(expected = "divide by zero")]
    fn division_operator_panics_on_zero() {
        let _ = BigInt::from(5u64) / BigInt::zero();
    }

    #[test]
    #[should_panic(expected = "divisor of zero")]
    fn modulo_operator_panics_on_zero() {
        let _ = BigInt::from(5u64) % BigInt::zero();
    }

    #[test]
    fn large_to_string_round_trips_through_parse() {
        // 64 words is well above the recursive-conversion threshold.
        let x = (BigInt::from(3u64).pow(2700) + BigInt::one()) * parse("-1");
        let rendered = x.to_string();
        assert!(rendered.starts_with('-'));
        assert_eq!(rendered.parse::<BigInt>().unwrap(), x);
    }

    #[test]
    fn display_pads_interior_zero_chunks() {
        // 10^2000 + 1: everything between the outer digits is zeros, which
        // exercises the digit-budget padding of both conversion paths.
        let x = BigInt::from(10u64).pow(2000) + BigInt::one();
        let rendered = x.to_string();
        assert_eq!(rendered.len(), 2001);
        assert!(rendered.starts_with('1'));
        assert!(rendered.ends_with('1'));
        assert!(rendered[1..2000].bytes().all(|b| b == b'0'));
    }
}
