//! Multi-component card costs and cost sets.
//!
//! A [`Cost`] packs coin/potion/debt into one value. The ordering defined
//! here is a strict total order used only for keying [`CostSet`]s; it is not
//! the game's partial "cheaper than" relation and must never be used to rank
//! cards by affordability.

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Sentinel for an absent cost component.
const NOCOST: i32 = -1;

/// Upper bound on a coin-only cost considered by `cost>=N` targets.
pub const MAX_COIN_COST: i32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cost {
    coin: i32,
    potion: i32,
    debt: i32,
}

impl Cost {
    pub const fn new(coin: i32, potion: i32, debt: i32) -> Self {
        Cost { coin, potion, debt }
    }

    pub const fn coin_only(coin: i32) -> Self {
        Cost::new(coin, NOCOST, NOCOST)
    }

    pub const fn empty() -> Self {
        Cost::new(NOCOST, NOCOST, NOCOST)
    }

    pub fn valid(&self) -> bool {
        self.coin != NOCOST || self.potion != NOCOST || self.debt != NOCOST
    }

    pub fn has_coin(&self) -> bool {
        self.coin != NOCOST
    }

    pub fn has_potion(&self) -> bool {
        self.potion != NOCOST
    }

    pub fn has_debt(&self) -> bool {
        self.debt != NOCOST
    }

    pub fn is_coin_only(&self) -> bool {
        self.has_coin() && !self.has_potion() && !self.has_debt()
    }

    pub fn coin(&self) -> Option<i32> {
        self.has_coin().then_some(self.coin)
    }

    /// Shifts the coin component by `delta`, clamped at zero; potion and
    /// debt pass through unchanged.
    pub fn rel_cost(&self, delta: i32) -> Cost {
        let coin = if self.has_coin() {
            (self.coin + delta).max(0)
        } else {
            self.coin
        };
        Cost::new(coin, self.potion, self.debt)
    }

    /// Packs the triple into a small, deterministic integer for hashing use
    /// outside of `Hash`/`Eq` (mirrors the original's `costHash`).
    pub fn compact_hash(&self) -> u32 {
        let coin = self.coin.max(0) as u32;
        let potion = if self.has_potion() { 1 } else { 0 };
        let debt = self.debt.max(0) as u32;
        ((coin * 21 + debt) * 2 + potion) % 882
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{}P,{}D)", self.coin, self.potion, self.debt)
    }
}

/// Strict total order used only for `CostSet` keying.
impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.coin, self.potion, self.debt).cmp(&(other.coin, other.potion, other.debt))
    }
}

/// An ordered set of costs, keyed by [`Cost`]'s strict total order.
pub type CostSet = BTreeSet<Cost>;

/// Coin-only costs `0..=coin`.
pub fn cost_set_up_to(coin: i32) -> CostSet {
    (0..=coin).map(Cost::coin_only).collect()
}

/// Shifts every coin-bearing cost in `basis` by `±delta`. When `exact` is
/// true only the two boundary shifts are produced per source cost;
/// otherwise every shift in `[-delta, delta]` is produced (clamped at zero).
pub fn cost_set_diff(delta: i32, exact: bool, basis: &CostSet) -> CostSet {
    let mut res = CostSet::new();
    for c in basis.iter().filter(|c| c.has_coin()) {
        if exact {
            res.insert(c.rel_cost(delta));
            res.insert(c.rel_cost(-delta));
        } else {
            for d in -delta..=delta {
                res.insert(c.rel_cost(d));
            }
        }
    }
    res
}

/// True as soon as the ordered merge finds an equal element in both sets.
pub fn intersects(a: &CostSet, b: &CostSet) -> bool {
    let mut ai = a.iter();
    let mut bi = b.iter();
    let (mut x, mut y) = (ai.next(), bi.next());
    while let (Some(cx), Some(cy)) = (x, y) {
        match cx.cmp(cy) {
            Ordering::Equal => return true,
            Ordering::Less => x = ai.next(),
            Ordering::Greater => y = bi.next(),
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rel_cost_clamps_at_zero() {
        let c = Cost::coin_only(2);
        assert_eq!(c.rel_cost(-5), Cost::coin_only(0));
    }

    #[test]
    fn rel_cost_round_trip_without_clamping() {
        let c = Cost::coin_only(5);
        assert_eq!(c.rel_cost(2).rel_cost(-2), c);
    }

    #[test]
    fn cost_set_diff_exact_yields_two_shifts() {
        let basis: CostSet = [Cost::coin_only(5)].into_iter().collect();
        let diff = cost_set_diff(2, true, &basis);
        assert!(diff.contains(&Cost::coin_only(7)));
        assert!(diff.contains(&Cost::coin_only(3)));
        assert_eq!(diff.len(), 2);
    }

    #[test]
    fn cost_set_diff_non_exact_yields_full_range() {
        let basis: CostSet = [Cost::coin_only(3)].into_iter().collect();
        let diff = cost_set_diff(1, false, &basis);
        assert_eq!(diff.len(), 3);
        assert!(diff.contains(&Cost::coin_only(2)));
        assert!(diff.contains(&Cost::coin_only(3)));
        assert!(diff.contains(&Cost::coin_only(4)));
    }

    #[test]
    fn intersects_detects_shared_cost() {
        let a: CostSet = [Cost::coin_only(3), Cost::coin_only(5)].into_iter().collect();
        let b: CostSet = [Cost::coin_only(5)].into_iter().collect();
        assert!(intersects(&a, &b));
        let c: CostSet = [Cost::coin_only(9)].into_iter().collect();
        assert!(!intersects(&a, &c));
    }

    #[test]
    fn compact_hash_matches_packing_formula() {
        let c = Cost::new(4, NOCOST, 1);
        assert_eq!(c.compact_hash(), (4 * 21 + 1) * 2);
    }
}
