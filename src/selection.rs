//! A partial, growable selection of piles drawn from a [`Catalog`].
//!
//! Selections are cheap to clone: cloning is how the build engine forks a
//! backtracking frame. The constraint list is shared via `Rc` across every
//! clone descended from the same search; everything else is a shallow copy
//! of small maps and sets.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::catalog::{Catalog, Pile, PileId};
use crate::constraint::Constraint;
use crate::cost::{Cost, CostSet};
use crate::costtarget::CostTarget;

pub const DEFAULT_MARKET_CAP: u32 = 10;

#[derive(Clone)]
pub struct Selection<'c> {
    catalog: &'c Catalog,
    pile_ids: BTreeSet<PileId>,
    keyword_counts: HashMap<String, u32>,
    interacted_keyword_counts: HashMap<String, u32>,
    costs_in_supply: CostSet,
    targets: Vec<CostTarget>,
    blame: String,
    notes: BTreeSet<String>,
    tags: HashMap<PileId, Vec<String>>,
    items: BTreeSet<String>,
    pub required_cards: u32,
    pub current_normal_pile_count: u32,
    pub target_check_required: bool,
    cursor: usize,
    constraints: Rc<Vec<Constraint>>,
}

impl<'c> Selection<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Selection {
            catalog,
            pile_ids: BTreeSet::new(),
            keyword_counts: HashMap::new(),
            interacted_keyword_counts: HashMap::new(),
            costs_in_supply: CostSet::new(),
            targets: Vec::new(),
            blame: String::new(),
            notes: BTreeSet::new(),
            tags: HashMap::new(),
            items: BTreeSet::new(),
            required_cards: DEFAULT_MARKET_CAP,
            current_normal_pile_count: 0,
            target_check_required: false,
            cursor: 0,
            constraints: Rc::new(Vec::new()),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn attach_constraints(&mut self, constraints: Vec<Constraint>) {
        self.constraints = Rc::new(constraints);
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn contains(&self, pile_id: PileId) -> bool {
        self.pile_ids.contains(&pile_id)
    }

    pub fn pile_ids(&self) -> impl Iterator<Item = PileId> + '_ {
        self.pile_ids.iter().copied()
    }

    pub fn piles(&self) -> impl Iterator<Item = &'c Pile> + '_ {
        self.pile_ids.iter().map(move |id| self.catalog.pile(*id))
    }

    pub fn cards(&self) -> impl Iterator<Item = &'c crate::catalog::Card> + '_ {
        self.piles().flat_map(|p| p.cards.iter())
    }

    pub fn cost_set_in_supply(&self) -> &CostSet {
        &self.costs_in_supply
    }

    pub fn targets(&self) -> &[CostTarget] {
        &self.targets
    }

    pub fn has_note(&self, note: &str) -> bool {
        self.notes.contains(note)
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.insert(note.into());
    }

    pub fn add_item(&mut self, item: impl Into<String>) {
        self.items.insert(item.into());
    }

    pub fn items(&self) -> &BTreeSet<String> {
        &self.items
    }

    pub fn keyword_present(&self, keyword: &str) -> bool {
        self.keyword_counts.get(keyword).copied().unwrap_or(0) > 0
    }

    pub fn interacted_keyword_present(&self, keyword: &str) -> bool {
        self.interacted_keyword_counts
            .get(keyword)
            .copied()
            .unwrap_or(0)
            > 0
    }

    pub fn tag_pile(&mut self, pile_id: PileId, tag: impl Into<String>) {
        self.tags.entry(pile_id).or_default().push(tag.into());
    }

    pub fn tags_for(&self, pile_id: PileId) -> &[String] {
        self.tags.get(&pile_id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn increase_required_piles(&mut self) {
        self.required_cards += 1;
    }

    /// Adds `pile_id`. Returns `false` (without mutating) on a duplicate, or
    /// when the supply/kingdom cap has already been reached for a
    /// supply-and-kingdom pile.
    pub fn add_pile(&mut self, pile_id: PileId) -> bool {
        if self.pile_ids.contains(&pile_id) {
            return false;
        }
        let pile = self.catalog.pile(pile_id);
        if pile.is_kingdom_and_supply() && self.current_normal_pile_count >= self.required_cards {
            return false;
        }
        self.pile_ids.insert(pile_id);
        if pile.is_kingdom_and_supply() {
            self.current_normal_pile_count += 1;
        }
        for card in &pile.cards {
            if card.supply {
                self.costs_in_supply.insert(card.cost);
            }
        }
        for kw in &pile.keywords {
            *self.keyword_counts.entry(kw.clone()).or_insert(0) += 1;
        }
        for kw in &pile.interacted_keywords {
            *self
                .interacted_keyword_counts
                .entry(kw.clone())
                .or_insert(0) += 1;
        }
        if !pile.targets.is_empty() {
            self.target_check_required = true;
            if self.blame.is_empty() {
                self.blame = pile.name.clone();
            } else {
                self.blame.push(',');
                self.blame.push_str(&pile.name);
            }
            for t in &pile.targets {
                if !self.targets.contains(t) {
                    self.targets.push(t.clone());
                }
            }
        }
        for token in &pile.other_interactions {
            if let Some(kw) = token.strip_prefix("react(").and_then(|s| s.strip_suffix(')')) {
                *self
                    .interacted_keyword_counts
                    .entry(kw.to_string())
                    .or_insert(0) += 1;
            }
        }
        true
    }

    pub fn blame(&self) -> &str {
        &self.blame
    }

    /// Advances the general-pile cursor, returning the next unconsidered
    /// pile in the catalog's shuffled order, or `None` once exhausted.
    pub fn next_general_pile(&mut self) -> Option<PileId> {
        let order = self.catalog.shuffled_order();
        if self.cursor >= order.len() {
            return None;
        }
        let id = order[self.cursor];
        self.cursor += 1;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::card::Card;
    use crate::rand_stream::SystemRand;

    fn card(name: &str, supply: bool, kingdom: bool) -> Card {
        Card {
            name: name.to_string(),
            pile: String::new(),
            card_group: "Base".into(),
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
    fn add_pile_is_idempotent() {
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(
            vec![Pile::from_cards("Moat".into(), vec![card("Moat", true, true)])],
            &mut rand,
        );
        let mut sel = Selection::new(&catalog);
        assert!(sel.add_pile(0));
        assert!(!sel.add_pile(0));
        assert_eq!(sel.current_normal_pile_count, 1);
    }

    #[test]
    fn add_pile_respects_supply_and_kingdom_cap() {
        let mut rand = SystemRand::from_seed(1);
        let piles = vec![
            Pile::from_cards("A".into(), vec![card("A", true, true)]),
            Pile::from_cards("B".into(), vec![card("B", true, true)]),
            Pile::from_cards("C".into(), vec![card("C", false, true)]),
        ];
        let catalog = Catalog::from_piles(piles, &mut rand);
        let mut sel = Selection::new(&catalog);
        sel.required_cards = 1;
        assert!(sel.add_pile(0));
        assert!(!sel.add_pile(1));
        // non-supply pile is exempt from the cap
        assert!(sel.add_pile(2));
    }

    #[test]
    fn costs_in_supply_is_the_union_of_supply_pile_costs() {
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(
            vec![Pile::from_cards("A".into(), vec![card("A", true, true)])],
            &mut rand,
        );
        let mut sel = Selection::new(&catalog);
        sel.add_pile(0);
        assert!(sel.cost_set_in_supply().contains(&Cost::coin_only(3)));
    }

    #[test]
    fn clone_after_noop_add_is_unchanged() {
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(
            vec![Pile::from_cards("A".into(), vec![card("A", true, true)])],
            &mut rand,
        );
        let mut sel = Selection::new(&catalog);
        sel.add_pile(0);
        let before = sel.clone();
        let mut after = sel.clone();
        after.add_pile(0);
        assert_eq!(before.current_normal_pile_count, after.current_normal_pile_count);
        assert_eq!(before.pile_ids().collect::<Vec<_>>(), after.pile_ids().collect::<Vec<_>>());
    }
}
