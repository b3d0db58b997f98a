//! Immutable card and pile data, and the catalog that owns them.

use std::collections::BTreeSet;

use crate::cost::Cost;
use crate::costtarget::CostTarget;

/// A single catalog entry. Immutable once built by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    /// Empty means "this card is its own pile".
    pub pile: String,
    pub card_group: String,
    pub supply: bool,
    pub kingdom: bool,
    pub types: BTreeSet<String>,
    pub cost: Cost,
    pub keywords: BTreeSet<String>,
    pub interacted_keywords: BTreeSet<String>,
    pub other_interactions: Vec<String>,
    pub targets: Vec<CostTarget>,
}

impl Card {
    pub fn pile_name(&self) -> &str {
        if self.pile.is_empty() {
            &self.name
        } else {
            &self.pile
        }
    }
}

/// A named group of cards sharing a pile name; attributes are the union (or
/// logical OR, for the two flags) of the member cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pile {
    pub name: String,
    pub card_group: String,
    pub supply: bool,
    pub kingdom: bool,
    pub types: BTreeSet<String>,
    pub costs: BTreeSet<Cost>,
    pub keywords: BTreeSet<String>,
    pub interacted_keywords: BTreeSet<String>,
    pub other_interactions: BTreeSet<String>,
    pub targets: Vec<CostTarget>,
    pub cards: Vec<Card>,
}

impl Pile {
    pub fn from_cards(name: String, cards: Vec<Card>) -> Self {
        let mut pile = Pile {
            name,
            card_group: String::new(),
            supply: false,
            kingdom: false,
            types: BTreeSet::new(),
            costs: BTreeSet::new(),
            keywords: BTreeSet::new(),
            interacted_keywords: BTreeSet::new(),
            other_interactions: BTreeSet::new(),
            targets: Vec::new(),
            cards: Vec::new(),
        };
        for card in cards {
            if pile.card_group.is_empty() {
                pile.card_group = card.card_group.clone();
            }
            pile.supply |= card.supply;
            pile.kingdom |= card.kingdom;
            pile.types.extend(card.types.iter().cloned());
            pile.costs.insert(card.cost);
            pile.keywords.extend(card.keywords.iter().cloned());
            pile.interacted_keywords
                .extend(card.interacted_keywords.iter().cloned());
            pile.other_interactions
                .extend(card.other_interactions.iter().cloned());
            for t in &card.targets {
                if !pile.targets.contains(t) {
                    pile.targets.push(t.clone());
                }
            }
            pile.cards.push(card);
        }
        pile
    }

    pub fn has_type_prefix(&self, prefix: &str) -> bool {
        self.types.iter().any(|t| t.starts_with(prefix))
    }

    pub fn is_kingdom_and_supply(&self) -> bool {
        self.kingdom && self.supply
    }

    pub fn is_optional_extra(&self) -> bool {
        const LANDSCAPE_TYPES: [&str; 4] = ["Event", "Project", "Landmark", "Way"];
        !self.kingdom
            && !self.supply
            && LANDSCAPE_TYPES.iter().any(|t| self.types.contains(*t))
    }
}
