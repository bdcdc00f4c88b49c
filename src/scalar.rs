//! The payoff scalar abstraction.
//!
//! Every payoff and probability in the engine is generic over [`AggNumber`],
//! so the same game can be evaluated with `f64` (fast, approximate) or
//! [`Rational64`] (slower, exact). The trait is deliberately small: ring
//! arithmetic, comparison against zero, construction from integer ratios,
//! and parsing of the numeric tokens that appear in AGG game files.

use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use num_rational::Rational64;
use num_traits::{One, Zero};

/// Numeric type usable as a payoff or probability.
pub trait AggNumber:
    Clone
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + Zero
    + One
    + 'static
{
    /// Builds the value `numer / denom`. `denom` must be nonzero.
    fn from_ratio(numer: i64, denom: i64) -> Self;

    /// Converts a count into the scalar type.
    fn from_usize(n: usize) -> Self;

    /// Parses a numeric token from a game file.
    ///
    /// Accepts plain integers (`3`, `-2`), decimals (`0.25`) and fractions
    /// (`1/3`). Returns `None` on anything else.
    fn parse_token(token: &str) -> Option<Self>;

    /// Raises the value to a nonnegative integer power by repeated squaring.
    fn ipow(&self, exp: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result * base.clone();
            }
            e >>= 1;
            if e > 0 {
                base = base.clone() * base;
            }
        }
        result
    }
}

impl AggNumber for f64 {
    fn from_ratio(numer: i64, denom: i64) -> Self {
        numer as f64 / denom as f64
    }

    fn from_usize(n: usize) -> Self {
        n as f64
    }

    fn parse_token(token: &str) -> Option<Self> {
        if let Some((numer, denom)) = token.split_once('/') {
            let n: f64 = numer.parse().ok()?;
            let d: f64 = denom.parse().ok()?;
            if d == 0.0 {
                return None;
            }
            Some(n / d)
        } else {
            token.parse().ok()
        }
    }
}

impl AggNumber for Rational64 {
    fn from_ratio(numer: i64, denom: i64) -> Self {
        Rational64::new(numer, denom)
    }

    fn from_usize(n: usize) -> Self {
        Rational64::from_integer(n as i64)
    }

    fn parse_token(token: &str) -> Option<Self> {
        if let Some((numer, denom)) = token.split_once('/') {
            let n: i64 = numer.parse().ok()?;
            let d: i64 = denom.parse().ok()?;
            if d == 0 {
                return None;
            }
            Some(Rational64::new(n, d))
        } else if let Some((int_part, frac_part)) = token.split_once('.') {
            // Decimal: digits after the point become a power-of-ten denominator.
            if frac_part.is_empty() || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let negative = int_part.starts_with('-');
            let int_digits = int_part.trim_start_matches(['-', '+']);
            let whole: i64 = if int_digits.is_empty() {
                0
            } else {
                int_digits.parse().ok()?
            };
            let frac: i64 = frac_part.parse().ok()?;
            let denom = 10i64.checked_pow(frac_part.len() as u32)?;
            let numer = whole.checked_mul(denom)?.checked_add(frac)?;
            let value = Rational64::new(numer, denom);
            Some(if negative { -value } else { value })
        } else {
            let n: i64 = token.parse().ok()?;
            Some(Rational64::from_integer(n))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64() {
        assert_eq!(f64::parse_token("3"), Some(3.0));
        assert_eq!(f64::parse_token("-2.5"), Some(-2.5));
        assert_eq!(f64::parse_token("1/4"), Some(0.25));
        assert_eq!(f64::parse_token("1/0"), None);
        assert_eq!(f64::parse_token("abc"), None);
    }

    #[test]
    fn test_parse_rational() {
        assert_eq!(
            Rational64::parse_token("3"),
            Some(Rational64::from_integer(3))
        );
        assert_eq!(Rational64::parse_token("1/3"), Some(Rational64::new(1, 3)));
        assert_eq!(Rational64::parse_token("0.25"), Some(Rational64::new(1, 4)));
        assert_eq!(
            Rational64::parse_token("-1.5"),
            Some(Rational64::new(-3, 2))
        );
        assert_eq!(Rational64::parse_token("1/0"), None);
        assert_eq!(Rational64::parse_token("x"), None);
    }

    #[test]
    fn test_ipow() {
        assert_eq!(AggNumber::ipow(&2.0f64, 10), 1024.0);
        assert_eq!(AggNumber::ipow(&0.5f64, 0), 1.0);
        assert_eq!(
            AggNumber::ipow(&Rational64::new(1, 2), 3),
            Rational64::new(1, 8)
        );
    }
}
