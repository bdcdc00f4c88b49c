//! Gray-code enumeration of weak compositions.
//!
//! Enumerates every way of writing a total `n` as an ordered sum of `k`
//! nonnegative parts, in an order where consecutive compositions differ by
//! moving a single unit from one part (`d`) to another (`i`). Symmetric
//! payoff integration relies on this: the multinomial probability of a
//! composition can be updated in O(1) from the previous one using `d` and
//! `i`, instead of being recomputed.
//!
//! The order is the reflected one: the first part descends from `n` to 0,
//! and the remainder is enumerated recursively, alternating direction so
//! that adjacent compositions stay one transfer apart. The first
//! composition is `[n, 0, …, 0]`.

/// Enumerator over the weak compositions of `n` into `k` parts.
#[derive(Debug, Clone)]
pub struct GrayComposition {
    total: u32,
    parts: Vec<u32>,
    finished: bool,
    /// Index of the part decremented by the last [`incr`](Self::incr).
    pub d: usize,
    /// Index of the part incremented by the last [`incr`](Self::incr).
    pub i: usize,
}

impl GrayComposition {
    /// Starts at the composition `[n, 0, …, 0]`.
    pub fn new(n: u32, k: usize) -> Self {
        let mut parts = vec![0; k];
        if k > 0 {
            parts[0] = n;
        }
        GrayComposition {
            total: n,
            parts,
            finished: k == 0,
            d: 0,
            i: 0,
        }
    }

    /// The current composition.
    pub fn get(&self) -> &[u32] {
        &self.parts
    }

    /// True once every composition has been produced.
    pub fn eof(&self) -> bool {
        self.finished
    }

    /// Advances to the next composition, recording the changed indices in
    /// `d` and `i`. After the last composition, [`eof`](Self::eof) turns
    /// true and the parts are left unchanged.
    pub fn incr(&mut self) {
        let k = self.parts.len();
        if k <= 1 {
            self.finished = true;
            return;
        }

        // Deepest position whose part can still move in the direction its
        // level is currently traversing. `remaining` is the total held by
        // positions j.. and `forward` whether that level descends.
        let mut remaining = self.total;
        let mut forward = true;
        let mut found: Option<(usize, bool, bool)> = None;
        for j in 0..k - 1 {
            let x = self.parts[j];
            let movable = if forward { x > 0 } else { x < remaining };
            let tail_forward = forward == ((remaining - x) % 2 == 0);
            if movable {
                found = Some((j, forward, tail_forward));
            }
            remaining -= x;
            forward = tail_forward;
        }

        match found {
            None => self.finished = true,
            Some((j, fwd, tail_forward)) => {
                // The tail beyond j sits at its final element: a single
                // nonzero entry at its first position (reversed tail) or
                // its last (forward tail). That entry absorbs the unit.
                let b = if tail_forward { k - 1 } else { j + 1 };
                if fwd {
                    self.parts[j] -= 1;
                    self.parts[b] += 1;
                    self.d = j;
                    self.i = b;
                } else {
                    self.parts[j] += 1;
                    self.parts[b] -= 1;
                    self.d = b;
                    self.i = j;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(n: u32, k: usize) -> Vec<Vec<u32>> {
        let mut gc = GrayComposition::new(n, k);
        let mut all = Vec::new();
        loop {
            all.push(gc.get().to_vec());
            gc.incr();
            if gc.eof() {
                break;
            }
        }
        all
    }

    fn binomial(n: u64, k: u64) -> u64 {
        if k > n {
            return 0;
        }
        let mut result = 1u64;
        for j in 0..k.min(n - k) {
            result = result * (n - j) / (j + 1);
        }
        result
    }

    #[test]
    fn test_three_into_two() {
        let mut gc = GrayComposition::new(3, 2);
        assert_eq!(gc.get(), &[3, 0]);
        let mut transitions = Vec::new();
        let mut seen = vec![gc.get().to_vec()];
        loop {
            gc.incr();
            if gc.eof() {
                break;
            }
            transitions.push((gc.d, gc.i));
            seen.push(gc.get().to_vec());
        }
        assert_eq!(
            seen,
            vec![vec![3, 0], vec![2, 1], vec![1, 2], vec![0, 3]]
        );
        assert_eq!(transitions, vec![(0, 1), (0, 1), (0, 1)]);
    }

    #[test]
    fn test_counts_and_sums() {
        for (n, k) in [(0, 3), (1, 1), (2, 3), (3, 2), (4, 3), (5, 4), (3, 5)] {
            let all = collect(n, k);
            let expected = binomial(n as u64 + k as u64 - 1, k as u64 - 1);
            assert_eq!(all.len() as u64, expected, "count for n={}, k={}", n, k);
            for comp in &all {
                assert_eq!(comp.iter().sum::<u32>(), n, "sum for n={}, k={}", n, k);
            }
            let mut distinct = all.clone();
            distinct.sort();
            distinct.dedup();
            assert_eq!(distinct.len(), all.len(), "distinct for n={}, k={}", n, k);
        }
    }

    #[test]
    fn test_adjacent_compositions_differ_by_one_transfer() {
        for (n, k) in [(2, 3), (4, 3), (5, 4), (3, 5)] {
            let mut gc = GrayComposition::new(n, k);
            let mut prev = gc.get().to_vec();
            loop {
                gc.incr();
                if gc.eof() {
                    break;
                }
                let cur = gc.get().to_vec();
                let changed: Vec<usize> =
                    (0..k).filter(|&j| cur[j] != prev[j]).collect();
                assert_eq!(changed.len(), 2, "n={}, k={}", n, k);
                assert_eq!(cur[gc.i], prev[gc.i] + 1);
                assert_eq!(cur[gc.d] + 1, prev[gc.d]);
                prev = cur;
            }
        }
    }

    #[test]
    fn test_terminal_composition() {
        let all = collect(4, 3);
        assert_eq!(all.first().unwrap(), &vec![4, 0, 0]);
        assert_eq!(all.last().unwrap(), &vec![0, 0, 4]);
    }

    #[test]
    fn test_single_part() {
        let all = collect(5, 1);
        assert_eq!(all, vec![vec![5]]);
    }

    #[test]
    fn test_zero_total() {
        let all = collect(0, 4);
        assert_eq!(all, vec![vec![0, 0, 0, 0]]);
    }
}
