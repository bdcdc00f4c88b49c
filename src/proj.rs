//! Projection functions: the aggregation rules attached to function nodes.
//!
//! A projection function maps a multiset of action-node indices to a single
//! integer contribution. The same variant also acts as a binary composer
//! when two partial contributions are merged into one configuration entry.

/// A projection-function variant with its parameters.
///
/// Equality is by variant and parameters; it is what the builder checks
/// along chains of function-node neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjFunc {
    /// Size of the multiset.
    Sum,
    /// 1 if the multiset is nonempty.
    Exist,
    /// 1 if `target` occurs in the multiset.
    Match { target: u32 },
    /// Size of the multiset modulo `modulus`.
    SumMod { modulus: u32 },
    /// Size of the multiset raised to `exponent`.
    Power { exponent: u32 },
}

impl ProjFunc {
    /// Applies the projection to a multiset of action-node indices.
    pub fn apply(&self, multiset: &[u32]) -> u32 {
        match *self {
            ProjFunc::Sum => multiset.len() as u32,
            ProjFunc::Exist => u32::from(!multiset.is_empty()),
            ProjFunc::Match { target } => u32::from(multiset.contains(&target)),
            ProjFunc::SumMod { modulus } => multiset.len() as u32 % modulus,
            ProjFunc::Power { exponent } => (multiset.len() as u32).pow(exponent),
        }
    }

    /// Merges two contributions into one configuration entry.
    ///
    /// For `Power` the operands are perfect `exponent`-th powers of counts
    /// (that is how contributions are constructed), so the merge recovers
    /// the counts, adds them, and re-raises.
    pub fn compose(&self, x: u32, y: u32) -> u32 {
        match *self {
            ProjFunc::Sum => x + y,
            ProjFunc::Exist | ProjFunc::Match { .. } => u32::from(x + y > 0),
            ProjFunc::SumMod { modulus } => (x + y) % modulus,
            ProjFunc::Power { exponent } => {
                (iroot(x, exponent) + iroot(y, exponent)).pow(exponent)
            }
        }
    }

    /// The integer tag used by the file format.
    pub fn tag(&self) -> u32 {
        match self {
            ProjFunc::Sum => 0,
            ProjFunc::Exist => 1,
            ProjFunc::Match { .. } => 2,
            ProjFunc::SumMod { .. } => 3,
            ProjFunc::Power { .. } => 4,
        }
    }

    /// The variant parameter, if any, as it appears in the file format.
    pub fn param(&self) -> Option<u32> {
        match *self {
            ProjFunc::Sum | ProjFunc::Exist => None,
            ProjFunc::Match { target } => Some(target),
            ProjFunc::SumMod { modulus } => Some(modulus),
            ProjFunc::Power { exponent } => Some(exponent),
        }
    }
}

/// Largest `r` with `r^k <= x` (`k >= 1`).
fn iroot(x: u32, k: u32) -> u32 {
    if k == 1 || x <= 1 {
        return x;
    }
    let mut r = (x as f64).powf(1.0 / k as f64).round() as u32;
    while r > 0 && r.checked_pow(k).map_or(true, |v| v > x) {
        r -= 1;
    }
    while (r + 1).checked_pow(k).is_some_and(|v| v <= x) {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let m = [3, 3, 5];
        assert_eq!(ProjFunc::Sum.apply(&m), 3);
        assert_eq!(ProjFunc::Exist.apply(&m), 1);
        assert_eq!(ProjFunc::Exist.apply(&[]), 0);
        assert_eq!(ProjFunc::Match { target: 5 }.apply(&m), 1);
        assert_eq!(ProjFunc::Match { target: 4 }.apply(&m), 0);
        assert_eq!(ProjFunc::SumMod { modulus: 2 }.apply(&m), 1);
        assert_eq!(ProjFunc::Power { exponent: 2 }.apply(&m), 9);
    }

    #[test]
    fn test_compose() {
        assert_eq!(ProjFunc::Sum.compose(2, 3), 5);
        assert_eq!(ProjFunc::Exist.compose(0, 0), 0);
        assert_eq!(ProjFunc::Exist.compose(1, 0), 1);
        assert_eq!(ProjFunc::Match { target: 9 }.compose(1, 1), 1);
        assert_eq!(ProjFunc::SumMod { modulus: 3 }.compose(2, 2), 1);
        // 2^2 and 3^2 merge into 5^2
        assert_eq!(ProjFunc::Power { exponent: 2 }.compose(4, 9), 25);
    }

    #[test]
    fn test_equality() {
        assert_eq!(ProjFunc::Match { target: 2 }, ProjFunc::Match { target: 2 });
        assert_ne!(ProjFunc::Match { target: 2 }, ProjFunc::Match { target: 3 });
        assert_ne!(ProjFunc::Sum, ProjFunc::Exist);
    }

    #[test]
    fn test_iroot() {
        assert_eq!(iroot(27, 3), 3);
        assert_eq!(iroot(26, 3), 2);
        assert_eq!(iroot(0, 5), 0);
        assert_eq!(iroot(1, 7), 1);
        assert_eq!(iroot(1024, 2), 32);
    }
}
