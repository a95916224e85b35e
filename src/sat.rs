use std::collections::HashMap;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Returns one satisfying path through the BDD, if any exists.
    ///
    /// The path is a list of signed variable literals (`v` or `-v`).
    /// Variables that do not occur on the path are unconstrained.
    pub fn one_sat(&self, node: Ref) -> Option<Vec<i32>> {
        if self.is_zero(node) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = node;

        while !self.is_one(current) {
            let var = self.variable(current.index()) as i32;
            let high = self.high_node(current);
            let low = self.low_node(current);

            // Prefer the high branch if satisfiable, otherwise take low
            if !self.is_zero(high) {
                path.push(var);
                current = high;
            } else {
                path.push(-var);
                current = low;
            }
        }

        Some(path)
    }

    /// Number of satisfying assignments over `num_vars` variables.
    ///
    /// `node` must not depend on more than `num_vars` distinct variables.
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(1u32) << num_vars;
        self.sat_count_(node, &max, &mut cache)
    }

    fn sat_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let low = self.low(node.index());
        let high = self.high(node.index());

        let count_low = self.sat_count_(low, max, cache);
        let count_high = self.sat_count_(high, max, cache);

        let count: BigUint = (count_low + count_high) >> 1;
        let count = if node.is_negated() { max - count } else { count };

        cache.insert(node, count.clone());
        count
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_one_sat() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);
        let f = bdd.apply_and_many([x1, -x2, -x3]);

        assert_eq!(bdd.one_sat(f), Some(vec![1, -2, -3]));
        assert_eq!(bdd.one_sat(bdd.zero), None);
        assert_eq!(bdd.one_sat(bdd.one), Some(vec![]));
    }

    #[test]
    fn test_sat_count() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        assert_eq!(bdd.sat_count(bdd.one, 3), BigUint::from(8u32));
        assert_eq!(bdd.sat_count(bdd.zero, 3), BigUint::ZERO);
        assert_eq!(bdd.sat_count(x1, 3), BigUint::from(4u32));
        assert_eq!(bdd.sat_count(-x1, 3), BigUint::from(4u32));

        let f = bdd.apply_or(bdd.apply_and(x1, x2), x3);
        assert_eq!(bdd.sat_count(f, 3), BigUint::from(5u32));
        assert_eq!(bdd.sat_count(-f, 3), BigUint::from(3u32));
    }
}
