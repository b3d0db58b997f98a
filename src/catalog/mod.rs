//! The card/pile catalog: an immutable arena with a memoised property index.

pub mod card;
pub mod loader;

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use crate::cost::Cost;
use crate::property::Property;
use crate::rand_stream::RandStream;

pub use card::{Card, Pile};

/// Index into [`Catalog::piles`]. Stable for the catalog's lifetime.
pub type PileId = usize;

pub struct Catalog {
    piles: Vec<Pile>,
    /// `piles` indices in shuffled order; the general-pile stream walks this.
    shuffled_order: Vec<PileId>,
    legal_costs: BTreeSet<Cost>,
    index: RefCell<HashMap<Property, Vec<PileId>>>,
}

impl Catalog {
    pub fn from_piles(piles: Vec<Pile>, rand: &mut dyn RandStream) -> Self {
        let legal_costs = piles.iter().flat_map(|p| p.costs.iter().copied()).collect();
        let mut shuffled_order: Vec<PileId> = (0..piles.len()).collect();
        three_pass_shuffle(&mut shuffled_order, rand);
        Catalog {
            piles,
            shuffled_order,
            legal_costs,
            index: RefCell::new(HashMap::new()),
        }
    }

    pub fn pile(&self, id: PileId) -> &Pile {
        &self.piles[id]
    }

    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    pub fn legal_costs(&self) -> &BTreeSet<Cost> {
        &self.legal_costs
    }

    pub fn shuffled_order(&self) -> &[PileId] {
        &self.shuffled_order
    }

    pub fn pile_for_card(&self, card_name: &str) -> Option<PileId> {
        self.piles
            .iter()
            .position(|p| p.cards.iter().any(|c| c.name == card_name))
    }

    pub fn pile_id_by_name(&self, name: &str) -> Option<PileId> {
        self.piles.iter().position(|p| p.name == name)
    }

    pub fn pile_ids_by_group(&self, group: &str) -> Vec<PileId> {
        self.piles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.card_group == group)
            .map(|(i, _)| i)
            .collect()
    }

    /// Pile ids matching `property`, memoised. Returns `None` for a
    /// selection-scoped property (pile-scoped lookups only).
    pub fn get_iterators(&self, property: &Property) -> Option<Vec<PileId>> {
        if property.is_selection_property() {
            return None;
        }
        if let Some(cached) = self.index.borrow().get(property) {
            return Some(cached.clone());
        }
        let matches: Vec<PileId> = self
            .piles
            .iter()
            .enumerate()
            .filter(|(_, p)| property.meets_pile(p))
            .map(|(i, _)| i)
            .collect();
        self.index
            .borrow_mut()
            .insert(property.clone(), matches.clone());
        Some(matches)
    }

    /// Every card's `card(X)`/`group(X)` reference that names no existing
    /// card or group. Non-fatal; returned as human-readable warnings.
    pub fn validate(&self) -> Vec<String> {
        let card_names: BTreeSet<&str> =
            self.piles.iter().flat_map(|p| p.cards.iter()).map(|c| c.name.as_str()).collect();
        let group_names: BTreeSet<&str> =
            self.piles.iter().map(|p| p.card_group.as_str()).collect();
        let mut warnings = Vec::new();
        for pile in &self.piles {
            for token in &pile.other_interactions {
                if let Some(name) = token.strip_prefix("card(").and_then(|s| s.strip_suffix(')')) {
                    if !card_names.contains(name) {
                        warnings.push(format!(
                            "{}: references unknown card \"{}\"",
                            pile.name, name
                        ));
                    }
                } else if let Some(name) =
                    token.strip_prefix("group(").and_then(|s| s.strip_suffix(')'))
                {
                    if !group_names.contains(name) {
                        warnings.push(format!(
                            "{}: references unknown group \"{}\"",
                            pile.name, name
                        ));
                    }
                }
            }
        }
        warnings
    }
}

/// Three-pass Fisher-Yates-like shuffle: three full sweeps, each swapping
/// the current slot with one drawn from the whole range.
fn three_pass_shuffle(order: &mut [PileId], rand: &mut dyn RandStream) {
    let n = order.len();
    if n == 0 {
        return;
    }
    for _ in 0..3 {
        for j in 0..n {
            let k = (rand.next_u32() as usize) % n;
            order.swap(j, k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::card::Card;
    use crate::rand_stream::SystemRand;

    fn simple_card(name: &str, group: &str, supply: bool, kingdom: bool) -> Card {
        Card {
            name: name.to_string(),
            pile: String::new(),
            card_group: group.to_string(),
            supply,
            kingdom,
            types: BTreeSet::new(),
            cost: Cost::coin_only(3),
            keywords: BTreeSet::new(),
            interacted_keywords: BTreeSet::new(),
            other_interactions: Vec::new(),
            targets: Vec::new(),
        }
    }

    #[test]
    fn get_iterators_rejects_selection_scoped_property() {
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(
            vec![Pile::from_cards("Moat".into(), vec![simple_card("Moat", "Base", true, true)])],
            &mut rand,
        );
        assert!(catalog.get_iterators(&Property::MissingPotion).is_none());
    }

    #[test]
    fn get_iterators_is_memoised_and_stable() {
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(
            vec![Pile::from_cards("Moat".into(), vec![simple_card("Moat", "Base", true, true)])],
            &mut rand,
        );
        let prop = Property::CardGroup {
            group: "Base".into(),
        };
        let first = catalog.get_iterators(&prop).unwrap();
        let second = catalog.get_iterators(&prop).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn shuffle_is_deterministic_for_a_given_seed() {
        let mut r1 = SystemRand::from_seed(7);
        let mut r2 = SystemRand::from_seed(7);
        let piles = |name: &str| Pile::from_cards(name.into(), vec![simple_card(name, "K", true, true)]);
        let c1 = Catalog::from_piles(vec![piles("A"), piles("B"), piles("C")], &mut r1);
        let c2 = Catalog::from_piles(vec![piles("A"), piles("B"), piles("C")], &mut r2);
        assert_eq!(c1.shuffled_order(), c2.shuffled_order());
    }
}
