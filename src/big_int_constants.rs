//! Tuning thresholds and radix constants.
//!
//! Thresholds are word counts (64-bit words). They were tuned on x86-64; the
//! exact values only affect speed, never results, and the differential tests
//! exercise every tier boundary.

/// Largest operand length multiplied with the schoolbook loop.
pub(crate) const KARATSUBA_THRESHOLD: usize = 50;
/// Largest operand length squared with the schoolbook loop.
pub(crate) const KARATSUBA_SQUARE_THRESHOLD: usize = 80;
/// Smallest operand length handed to Toom-Cook-3.
pub(crate) const TOOM_COOK_THRESHOLD: usize = 220;
/// Smallest operand length squared with Toom-Cook-3.
pub(crate) const TOOM_COOK_SQUARE_THRESHOLD: usize = 240;
/// Smallest operand lengths divided with Burnikel-Ziegler.
pub(crate) const BURNIKEL_ZIEGLER_THRESHOLD: usize = 100;
/// Largest magnitude converted to decimal by plain chunking.
pub(crate) const TO_STRING_THRESHOLD: usize = 20;

/// Decimal digits that always fit in one 64-bit word.
pub(crate) const DIGITS_PER_WORD: usize = 19;
/// 10^19, the chunk divisor for decimal conversion and parsing.
pub(crate) const TEN_POW_19: u64 = 10_000_000_000_000_000_000;
/// log10(2), for estimating decimal digit counts from bit lengths.
pub(crate) const LOG10_2: f64 = 0.301_029_995_663_981_2;
