//! Distributions and payoff tables over neighbor configurations.
//!
//! A *configuration* is the fixed-length vector of integer counts indexing a
//! payoff at some action node (one entry per neighbor). [`ConfigDistrib`]
//! maps configurations to weights and supports the arithmetic the payoff
//! oracle is built from: weight-accumulating insertion, products under
//! per-position composers, self-powers, and inner products with a payoff
//! table. Entries iterate in ascending lexicographic key order, which is
//! also the order the COMPLETE payoff form is consumed in.

use std::collections::BTreeMap;

use crate::error::{AggError, Result};
use crate::proj::ProjFunc;
use crate::scalar::AggNumber;

/// A neighbor configuration: one count per neighbor of the owning node.
pub type Config = Vec<u32>;

/// A weighted set of configurations sharing one key length.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDistrib<T> {
    entries: BTreeMap<Config, T>,
}

impl<T: AggNumber> Default for ConfigDistrib<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AggNumber> ConfigDistrib<T> {
    /// Creates an empty distribution.
    pub fn new() -> Self {
        ConfigDistrib {
            entries: BTreeMap::new(),
        }
    }

    /// Creates a distribution holding `key` with weight 1.
    pub fn singleton(key: Config) -> Self {
        let mut d = Self::new();
        d.add(key, T::one());
        d
    }

    /// Number of distinct configurations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Adds `weight` to the entry at `key`, inserting it if absent.
    pub fn add(&mut self, key: Config, weight: T) {
        *self.entries.entry(key).or_insert_with(T::zero) += weight;
    }

    /// Adds every entry of `other`, scaled by `scale`.
    pub fn add_scaled(&mut self, other: &Self, scale: &T) {
        for (key, weight) in &other.entries {
            self.add(key.clone(), scale.clone() * weight.clone());
        }
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Config, &T)> {
        self.entries.iter()
    }

    /// The keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &Config> {
        self.entries.keys()
    }

    /// The weight at `key`, if present.
    pub fn get_weight(&self, key: &Config) -> Option<&T> {
        self.entries.get(key)
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> T {
        let mut total = T::zero();
        for weight in self.entries.values() {
            total += weight.clone();
        }
        total
    }

    /// Replaces `self` with the product of `a` and `b`.
    ///
    /// Every pair of keys is merged position by position through the
    /// composers of the owning node, and the weights multiply.
    pub fn assign_product(&mut self, a: &Self, b: &Self, composers: &[ProjFunc]) {
        self.entries.clear();
        for (ka, wa) in &a.entries {
            for (kb, wb) in &b.entries {
                let key = compose_key(ka, kb, composers);
                self.add(key, wa.clone() * wb.clone());
            }
        }
    }

    /// Multiplies `self` by `other` in place.
    pub fn mul_assign_with(&mut self, other: &Self, composers: &[ProjFunc]) {
        let lhs = std::mem::take(&mut self.entries);
        for (ka, wa) in &lhs {
            for (kb, wb) in &other.entries {
                let key = compose_key(ka, kb, composers);
                self.add(key, wa.clone() * wb.clone());
            }
        }
    }

    /// Writes the `exp`-fold product of `self` with itself into `out`.
    ///
    /// Uses squaring, with `scratch` as the single intermediate buffer.
    /// `exp == 0` produces the identity: the all-zero key with weight 1,
    /// which every composer family leaves other keys unchanged under.
    pub fn power_into(&self, exp: usize, out: &mut Self, scratch: &mut Self, composers: &[ProjFunc]) {
        out.reset();
        out.add(vec![0; composers.len()], T::one());
        if exp == 0 {
            return;
        }
        let bits = usize::BITS - exp.leading_zeros();
        for bit in (0..bits).rev() {
            scratch.assign_product(out, out, composers);
            std::mem::swap(out, scratch);
            if exp >> bit & 1 == 1 {
                scratch.assign_product(out, self, composers);
                std::mem::swap(out, scratch);
            }
        }
    }

    /// Inner product with a payoff table: `Σ_k w(k) · U(k)`.
    ///
    /// Keys absent from the table contribute zero.
    pub fn inner_prod(&self, table: &PayoffTable<T>) -> T {
        let mut total = T::zero();
        for (key, weight) in &self.entries {
            if let Some(u) = table.get(key) {
                total += weight.clone() * u.clone();
            }
        }
        total
    }

    /// Inner product with a final composition against a fixed `kernel` key.
    ///
    /// Equivalent to multiplying by the singleton distribution of `kernel`
    /// and then taking [`inner_prod`](Self::inner_prod), without building
    /// the intermediate distribution.
    pub fn inner_prod_with_kernel(
        &self,
        kernel: &Config,
        composers: &[ProjFunc],
        table: &PayoffTable<T>,
    ) -> T {
        let mut total = T::zero();
        for (key, weight) in &self.entries {
            let composed = compose_key(key, kernel, composers);
            if let Some(u) = table.get(&composed) {
                total += weight.clone() * u.clone();
            }
        }
        total
    }
}

fn compose_key(a: &Config, b: &Config, composers: &[ProjFunc]) -> Config {
    debug_assert_eq!(a.len(), composers.len());
    debug_assert_eq!(b.len(), composers.len());
    composers
        .iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(f, (&x, &y))| f.compose(x, y))
        .collect()
}

/// A payoff table: configuration keys to payoff values.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffTable<T> {
    entries: BTreeMap<Config, T>,
}

impl<T: AggNumber> PayoffTable<T> {
    /// Builds a table from values listed in ascending key order over the
    /// acceptance set.
    pub fn from_complete(
        node: usize,
        acceptance: impl ExactSizeIterator<Item = Config>,
        values: Vec<T>,
    ) -> Result<Self> {
        if values.len() != acceptance.len() {
            return Err(AggError::PayoffCountMismatch {
                node,
                expected: acceptance.len(),
                got: values.len(),
            });
        }
        Ok(PayoffTable {
            entries: acceptance.zip(values).collect(),
        })
    }

    /// Builds a table from explicit (configuration, value) pairs.
    ///
    /// Every configuration in the acceptance set must appear exactly once.
    /// Pairs outside the acceptance set are retained; they are never
    /// produced by a strategy profile, so they are never read back.
    pub fn from_mapping<'a>(
        node: usize,
        acceptance: impl Iterator<Item = &'a Config>,
        pairs: Vec<(Config, T)>,
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (key, value) in pairs {
            if entries.insert(key.clone(), value).is_some() {
                return Err(AggError::DuplicatePayoff { node, config: key });
            }
        }
        for key in acceptance {
            if !entries.contains_key(key) {
                return Err(AggError::MissingPayoff {
                    node,
                    config: key.clone(),
                });
            }
        }
        Ok(PayoffTable { entries })
    }

    /// Looks up the payoff at `key`.
    pub fn get(&self, key: &Config) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Config, &T)> {
        self.entries.iter()
    }

    /// The smallest value in the table.
    pub fn min_value(&self) -> Option<&T> {
        self.entries
            .values()
            .reduce(|best, v| if v < best { v } else { best })
    }

    /// The largest value in the table.
    pub fn max_value(&self) -> Option<&T> {
        self.entries
            .values()
            .reduce(|best, v| if v > best { v } else { best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_composers(arity: usize) -> Vec<ProjFunc> {
        vec![ProjFunc::Sum; arity]
    }

    #[test]
    fn test_insert_accumulates() {
        let mut d: ConfigDistrib<f64> = ConfigDistrib::new();
        d.add(vec![1, 0], 0.25);
        d.add(vec![1, 0], 0.5);
        d.add(vec![0, 1], 0.25);
        assert_eq!(d.len(), 2);
        assert_eq!(d.iter().find(|(k, _)| *k == &vec![1, 0]).unwrap().1, &0.75);
        assert_eq!(d.total_weight(), 1.0);
    }

    #[test]
    fn test_add_scaled() {
        let mut a: ConfigDistrib<f64> = ConfigDistrib::new();
        a.add(vec![1], 1.0);
        a.add(vec![2], 3.0);
        let mut b: ConfigDistrib<f64> = ConfigDistrib::new();
        b.add(vec![1], 4.0);
        b.add_scaled(&a, &0.5);
        assert_eq!(b.get_weight(&vec![1]), Some(&4.5));
        assert_eq!(b.get_weight(&vec![2]), Some(&1.5));
    }

    #[test]
    fn test_iteration_order_is_lexicographic() {
        let mut d: ConfigDistrib<f64> = ConfigDistrib::new();
        d.add(vec![1, 1], 1.0);
        d.add(vec![0, 2], 1.0);
        d.add(vec![2, 0], 1.0);
        let keys: Vec<_> = d.keys().cloned().collect();
        assert_eq!(keys, vec![vec![0, 2], vec![1, 1], vec![2, 0]]);
    }

    #[test]
    fn test_product_under_sum_is_convolution() {
        let composers = sum_composers(1);
        let mut a: ConfigDistrib<f64> = ConfigDistrib::new();
        a.add(vec![0], 0.5);
        a.add(vec![1], 0.5);
        let mut c = ConfigDistrib::new();
        c.assign_product(&a, &a, &composers);
        assert_eq!(c.len(), 3);
        assert_eq!(c.get_weight(&vec![0]), Some(&0.25));
        assert_eq!(c.get_weight(&vec![1]), Some(&0.5));
        assert_eq!(c.get_weight(&vec![2]), Some(&0.25));
    }

    #[test]
    fn test_power_matches_repeated_product() {
        let composers = sum_composers(1);
        let mut a: ConfigDistrib<f64> = ConfigDistrib::new();
        a.add(vec![0], 0.5);
        a.add(vec![1], 0.5);

        let mut expected = ConfigDistrib::singleton(vec![0]);
        for _ in 0..5 {
            expected.mul_assign_with(&a, &composers);
        }

        let mut out = ConfigDistrib::new();
        let mut scratch = ConfigDistrib::new();
        a.power_into(5, &mut out, &mut scratch, &composers);

        for (key, w) in expected.iter() {
            let got = out.get_weight(key).unwrap();
            assert!((got - w).abs() < 1e-12, "key {:?}: {} vs {}", key, got, w);
        }
        assert_eq!(out.len(), expected.len());
    }

    #[test]
    fn test_power_zero_is_identity() {
        let composers = sum_composers(2);
        let a: ConfigDistrib<f64> = ConfigDistrib::singleton(vec![1, 1]);
        let mut out = ConfigDistrib::new();
        let mut scratch = ConfigDistrib::new();
        a.power_into(0, &mut out, &mut scratch, &composers);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get_weight(&vec![0, 0]), Some(&1.0));
    }

    #[test]
    fn test_inner_prod() {
        let acceptance = [vec![0u32], vec![1], vec![2]];
        let table =
            PayoffTable::from_complete(0, acceptance.iter().cloned(), vec![1.0, 10.0, 100.0])
                .unwrap();
        let mut d: ConfigDistrib<f64> = ConfigDistrib::new();
        d.add(vec![1], 0.5);
        d.add(vec![2], 0.5);
        d.add(vec![9], 0.25); // absent from the table: contributes zero
        assert_eq!(d.inner_prod(&table), 55.0);
    }

    #[test]
    fn test_inner_prod_with_kernel() {
        let composers = sum_composers(1);
        let acceptance = [vec![1u32], vec![2]];
        let table =
            PayoffTable::from_complete(0, acceptance.iter().cloned(), vec![10.0, 100.0]).unwrap();
        let mut d: ConfigDistrib<f64> = ConfigDistrib::new();
        d.add(vec![0], 0.5);
        d.add(vec![1], 0.5);
        // shifting every key by the kernel [1] before lookup
        assert_eq!(d.inner_prod_with_kernel(&vec![1], &composers, &table), 55.0);
    }

    #[test]
    fn test_mapping_duplicate_and_missing() {
        let acceptance = vec![vec![0u32], vec![1]];
        let err = PayoffTable::<f64>::from_mapping(
            3,
            acceptance.iter(),
            vec![(vec![0], 1.0), (vec![0], 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, AggError::DuplicatePayoff { node: 3, .. }));

        let err =
            PayoffTable::<f64>::from_mapping(3, acceptance.iter(), vec![(vec![0], 1.0)])
                .unwrap_err();
        assert!(matches!(err, AggError::MissingPayoff { node: 3, .. }));
    }

    #[test]
    fn test_min_max() {
        let acceptance = [vec![0u32], vec![1], vec![2]];
        let table =
            PayoffTable::from_complete(0, acceptance.iter().cloned(), vec![3.0, -1.0, 2.0])
                .unwrap();
        assert_eq!(table.min_value(), Some(&-1.0));
        assert_eq!(table.max_value(), Some(&3.0));
    }
}
