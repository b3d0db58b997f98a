//! Per-card cost preferences and the weighted-vote aggregator that turns
//! them into a preferred set of costs for the next pile to add.

use std::collections::{BTreeSet, HashMap};

use crate::cost::{Cost, CostSet, MAX_COIN_COST};

const MATCHES_REQUIRED_WIDE: u32 = 6;
const MATCHES_REQUIRED_NARROW: u32 = 3;
const UNMET_WEIGHT: f64 = 3.0;
const MET_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CostTarget {
    /// Match: a coin-only cost `<= limit` is present among supply costs.
    Upto { limit: i32 },
    /// Match: a supply cost lies in `set`.
    InSet { set: Vec<Cost> },
    /// Match: a supply cost `c` such that `c + delta` is also present.
    Relative { delta: i32, strict: bool },
}

impl CostTarget {
    /// Casts votes into `votes` for the costs this target prefers, and
    /// returns whether the target is still unmet.
    pub fn add_votes(&self, supply_costs: &CostSet, votes: &mut CostVotes) -> bool {
        match self {
            CostTarget::Upto { limit } => {
                let matched = supply_costs
                    .iter()
                    .filter(|c| c.is_coin_only() && c.coin().unwrap() <= *limit)
                    .count() as u32;
                let unmet = matched < MATCHES_REQUIRED_NARROW;
                let weight = if unmet { UNMET_WEIGHT } else { MET_WEIGHT } / (*limit).max(1) as f64;
                for coin in 1..=*limit {
                    votes.add_vote(Cost::coin_only(coin), weight);
                }
                unmet
            }
            CostTarget::InSet { set } => {
                let matched = supply_costs.iter().filter(|c| set.contains(c)).count() as u32;
                let unmet = matched < MATCHES_REQUIRED_NARROW;
                let weight = if unmet { UNMET_WEIGHT } else { MET_WEIGHT } / set.len().max(1) as f64;
                for c in set {
                    votes.add_vote(*c, weight);
                }
                unmet
            }
            CostTarget::Relative { delta, strict } => {
                let matched = supply_costs
                    .iter()
                    .filter(|c| supply_costs.contains(&c.rel_cost(*delta)))
                    .count() as u32;
                let unmet = matched < MATCHES_REQUIRED_WIDE;
                let weight = if unmet { UNMET_WEIGHT } else { MET_WEIGHT }
                    / supply_costs.len().max(1) as f64;
                if *delta == 0 {
                    return unmet;
                }
                let boost = (UNMET_WEIGHT - MET_WEIGHT) / (*delta).abs() as f64;
                for c in supply_costs.iter().filter(|c| c.has_coin()) {
                    let basis_coin = c.coin().unwrap();
                    let target_coin = basis_coin + delta;
                    if *strict {
                        if target_coin >= 0 {
                            votes.add_vote(Cost::coin_only(target_coin), weight + boost);
                        }
                        continue;
                    }
                    if *delta > 0 {
                        let mut coin = target_coin;
                        while coin > basis_coin {
                            if coin >= 0 {
                                votes.add_vote(Cost::coin_only(coin), weight + boost);
                            }
                            coin -= 1;
                        }
                        let mut coin = basis_coin;
                        while coin >= 1 {
                            votes.add_vote(Cost::coin_only(coin), weight);
                            coin -= 1;
                        }
                    } else {
                        let mut coin = target_coin;
                        while coin >= 0 {
                            votes.add_vote(Cost::coin_only(coin), weight);
                            coin -= 1;
                        }
                    }
                }
                unmet
            }
        }
    }
}

/// Parses a `cost…` other-interaction token into a [`CostTarget`].
pub fn parse_cost_target(token: &str) -> Option<CostTarget> {
    if let Some(rest) = token.strip_prefix("cost<=") {
        return if let Some(n) = rest.strip_prefix('+').or_else(|| rest.strip_prefix('-')) {
            let delta: i32 = n.parse().ok()?;
            let delta = if rest.starts_with('-') { -delta } else { delta };
            Some(CostTarget::Relative {
                delta,
                strict: false,
            })
        } else {
            Some(CostTarget::Upto {
                limit: rest.parse().ok()?,
            })
        };
    }
    if let Some(rest) = token.strip_prefix("cost=") {
        let (sign, digits) = rest.split_at(1);
        let mag: i32 = digits.parse().ok()?;
        let delta = if sign == "-" { -mag } else { mag };
        return Some(CostTarget::Relative {
            delta,
            strict: true,
        });
    }
    if let Some(rest) = token.strip_prefix("cost>=") {
        let n: i32 = rest.parse().ok()?;
        let set: Vec<Cost> = (n..=MAX_COIN_COST).map(Cost::coin_only).collect();
        return Some(CostTarget::InSet { set });
    }
    if let Some(rest) = token.strip_prefix("cost_in(") {
        let rest = rest.strip_suffix(')')?;
        let (lo, hi) = rest.split_once('.')?;
        let lo: i32 = lo.parse().ok()?;
        let hi: i32 = hi.parse().ok()?;
        let set: Vec<Cost> = (lo..=hi).map(Cost::coin_only).collect();
        return Some(CostTarget::InSet { set });
    }
    None
}

/// Weighted votes over the catalog's legal cost universe.
pub struct CostVotes<'a> {
    legal_costs: &'a BTreeSet<Cost>,
    weights: HashMap<Cost, f64>,
}

impl<'a> CostVotes<'a> {
    pub fn new(legal_costs: &'a BTreeSet<Cost>) -> Self {
        CostVotes {
            legal_costs,
            weights: HashMap::new(),
        }
    }

    pub fn add_vote(&mut self, cost: Cost, delta: f64) {
        if !self.legal_costs.contains(&cost) {
            return;
        }
        *self.weights.entry(cost).or_insert(0.0) += delta;
    }

    /// Costs within `tolerance` of the maximum weight, or empty if the
    /// maximum is below `threshold`.
    pub fn get_max_weighted(&self, threshold: f64, tolerance: f64) -> CostSet {
        let Some(max) = self.weights.values().cloned().fold(None, |acc, w| {
            Some(acc.map_or(w, |m: f64| m.max(w)))
        }) else {
            return CostSet::new();
        };
        if max < threshold {
            return CostSet::new();
        }
        self.weights
            .iter()
            .filter(|(_, w)| (max - **w).abs() <= tolerance)
            .map(|(c, _)| *c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_grammar_forms() {
        assert_eq!(parse_cost_target("cost<=5"), Some(CostTarget::Upto { limit: 5 }));
        assert_eq!(
            parse_cost_target("cost<=+2"),
            Some(CostTarget::Relative {
                delta: 2,
                strict: false
            })
        );
        assert_eq!(
            parse_cost_target("cost=-3"),
            Some(CostTarget::Relative {
                delta: -3,
                strict: true
            })
        );
        assert_eq!(
            parse_cost_target("cost>=4"),
            Some(CostTarget::InSet {
                set: (4..=MAX_COIN_COST).map(Cost::coin_only).collect()
            })
        );
        assert_eq!(
            parse_cost_target("cost_in(2.5)"),
            Some(CostTarget::InSet {
                set: (2..=5).map(Cost::coin_only).collect()
            })
        );
    }

    #[test]
    fn rejects_malformed_token() {
        assert_eq!(parse_cost_target("cost<=abc"), None);
        assert_eq!(parse_cost_target("notacost"), None);
    }

    #[test]
    fn get_max_weighted_empty_below_threshold() {
        let legal: BTreeSet<Cost> = [Cost::coin_only(3)].into_iter().collect();
        let mut votes = CostVotes::new(&legal);
        votes.add_vote(Cost::coin_only(3), 0.1);
        assert!(votes.get_max_weighted(0.5, 0.21).is_empty());
    }

    #[test]
    fn get_max_weighted_includes_ties_within_tolerance() {
        let legal: BTreeSet<Cost> = [Cost::coin_only(3), Cost::coin_only(4)].into_iter().collect();
        let mut votes = CostVotes::new(&legal);
        votes.add_vote(Cost::coin_only(3), 1.0);
        votes.add_vote(Cost::coin_only(4), 0.9);
        let result = votes.get_max_weighted(0.5, 0.21);
        assert!(result.contains(&Cost::coin_only(3)));
        assert!(result.contains(&Cost::coin_only(4)));
    }

    #[test]
    fn ignores_votes_outside_legal_universe() {
        let legal: BTreeSet<Cost> = [Cost::coin_only(3)].into_iter().collect();
        let mut votes = CostVotes::new(&legal);
        votes.add_vote(Cost::coin_only(9), 5.0);
        assert!(votes.get_max_weighted(0.0, 0.21).is_empty());
    }
}
