//! Arbitrary-precision signed integer arithmetic.
//!
//! This crate provides [`BigInt`], a sign + magnitude integer over 64-bit
//! words with:
//! - tiered multiplication (schoolbook, Karatsuba, Toom-Cook-3) with
//!   dedicated squaring paths,
//! - tiered division (single-word, Knuth's Algorithm D, Burnikel-Ziegler),
//! - bit shifts, binary exponentiation and a total ordering,
//! - floor division and modulo (the remainder takes the divisor's sign),
//! - decimal parsing and asymptotically fast decimal rendering backed by a
//!   process-wide cache of the powers 10^(2^k).
//!
//! ```
//! use big_int::BigInt;
//!
//! let a: BigInt = "10000000000000".parse().unwrap();
//! let b: BigInt = "900000000000".parse().unwrap();
//! assert_eq!((&a + &b).to_string(), "10900000000000");
//! assert_eq!((&a - &b).to_string(), "9100000000000");
//! assert_eq!((&a / &b).to_string(), "11");
//! assert_eq!((&a << 10).to_string(), "10240000000000000");
//! ```

mod big_int;
mod big_int_cache;
mod big_int_constants;
mod big_int_ops;
mod burnikel_ziegler;
mod error;
mod karatsuba;
mod toom_cook;

pub use big_int::BigInt;
pub use error::BigIntError;
