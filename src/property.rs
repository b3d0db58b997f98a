//! Predicates over a single pile or over a whole selection.
//!
//! The original models these as a class hierarchy with hand-rolled equality
//! and hashing via `dynamic_cast`. Expressed here as one tagged enum so
//! `#[derive(PartialEq, Eq, Hash)]` gives structurally-correct equality and
//! hashing for free, which is what the catalog's memoised index relies on.

use crate::catalog::card::Pile;
use crate::cost::{Cost, CostSet};
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CostSpec {
    Single(Cost),
    Set(CostSetKey),
}

/// `CostSet` (a `BTreeSet<Cost>`) isn't `Hash`; wrap it in a sorted vec so
/// `Property` as a whole can derive `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CostSetKey(pub Vec<Cost>);

impl From<&CostSet> for CostSetKey {
    fn from(s: &CostSet) -> Self {
        CostSetKey(s.iter().copied().collect())
    }
}

impl CostSpec {
    fn intersects_costs(&self, costs: &std::collections::BTreeSet<Cost>) -> bool {
        match self {
            CostSpec::Single(c) => costs.contains(c),
            CostSpec::Set(set) => set.0.iter().any(|c| costs.contains(c)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    Type {
        type_name: String,
        restrict_to_kingdom_and_supply: bool,
    },
    Keyword {
        keyword: String,
        kingdom_and_supply: bool,
    },
    KeywordInteraction {
        keyword: String,
    },
    Cost {
        spec: CostSpec,
        supply_only: bool,
    },
    CostAndType {
        type_name: String,
        spec: CostSpec,
    },
    KingdomAndSupply,
    OptionalExtra,
    CardGroup {
        group: String,
    },
    Name {
        name: String,
    },
    OtherInteraction {
        token: String,
        kingdom_and_supply: bool,
    },
    Note {
        note: String,
    },
    MissingPotion,
    MissingInteractingCard,
    MissingInteractingCardGroup,
    MissingGroupForKeyword {
        type_prefix: String,
        group: String,
    },
    RepeatedCost {
        max_repeats: u32,
    },
    HangingInteractsWith {
        interacts_with: String,
        keyword: String,
        alt_keyword: Option<String>,
    },
    Either(Box<Property>, Box<Property>),
    Fail,
    NeedProsperity {
        threshold: u32,
    },
}

impl Property {
    /// Smart constructor enforcing same-scope children; mismatched scopes
    /// collapse to `Fail` rather than being checked on every `meets` call.
    pub fn either(a: Property, b: Property) -> Property {
        if a.is_selection_property() == b.is_selection_property() {
            Property::Either(Box::new(a), Box::new(b))
        } else {
            Property::Fail
        }
    }

    pub fn is_selection_property(&self) -> bool {
        matches!(
            self,
            Property::Note { .. }
                | Property::MissingPotion
                | Property::MissingInteractingCard
                | Property::MissingInteractingCardGroup
                | Property::MissingGroupForKeyword { .. }
                | Property::RepeatedCost { .. }
                | Property::HangingInteractsWith { .. }
                | Property::NeedProsperity { .. }
        ) || matches!(self, Property::Either(a, _) if a.is_selection_property())
    }

    pub fn meets_pile(&self, pile: &Pile) -> bool {
        match self {
            Property::Type {
                type_name,
                restrict_to_kingdom_and_supply,
            } => {
                (!restrict_to_kingdom_and_supply || pile.is_kingdom_and_supply())
                    && pile.types.contains(type_name)
            }
            Property::Keyword {
                keyword,
                kingdom_and_supply,
            } => {
                (!kingdom_and_supply || pile.is_kingdom_and_supply())
                    && pile.keywords.contains(keyword)
            }
            Property::KeywordInteraction { keyword } => {
                pile.interacted_keywords.contains(keyword)
            }
            Property::Cost { spec, supply_only } => {
                (!supply_only || pile.supply) && spec.intersects_costs(&pile.costs)
            }
            Property::CostAndType { type_name, spec } => {
                pile.types.contains(type_name) && spec.intersects_costs(&pile.costs)
            }
            Property::KingdomAndSupply => pile.is_kingdom_and_supply(),
            Property::OptionalExtra => pile.is_optional_extra(),
            Property::CardGroup { group } => &pile.card_group == group,
            Property::Name { name } => &pile.name == name,
            Property::OtherInteraction {
                token,
                kingdom_and_supply,
            } => {
                (!kingdom_and_supply || pile.is_kingdom_and_supply())
                    && pile.other_interactions.contains(token)
            }
            Property::Either(a, b) => a.meets_pile(pile) || b.meets_pile(pile),
            Property::Fail => false,
            _ => false,
        }
    }

    pub fn meets_selection(&self, selection: &Selection) -> bool {
        match self {
            Property::Note { note } => selection.has_note(note),
            Property::MissingPotion => {
                let have_potion = selection
                    .piles()
                    .any(|p| p.name == "Potion");
                let needs_potion = selection.piles().any(|p| p.costs.iter().any(|c| c.has_potion()));
                needs_potion && !have_potion
            }
            Property::MissingInteractingCard => {
                let need: Vec<&str> = selection
                    .piles()
                    .flat_map(|p| p.other_interactions.iter())
                    .filter_map(|token| token.strip_prefix("card(").and_then(|s| s.strip_suffix(')')))
                    .collect();
                if need.is_empty() {
                    return false;
                }
                need.iter()
                    .any(|name| !selection.cards().any(|c| c.name == *name))
            }
            Property::MissingInteractingCardGroup => {
                let groups: Vec<&str> = selection
                    .piles()
                    .flat_map(|p| p.other_interactions.iter())
                    .filter_map(|token| token.strip_prefix("group(").and_then(|s| s.strip_suffix(')')))
                    .collect();
                groups
                    .iter()
                    .any(|g| !selection.has_note(&format!("added{g}")))
            }
            Property::MissingGroupForKeyword { type_prefix, group } => {
                let added_note = format!("added{group}");
                selection.piles().any(|p| {
                    p.types.iter().any(|t| t.starts_with(type_prefix.as_str()))
                        && !selection.has_note(&added_note)
                })
            }
            Property::RepeatedCost { max_repeats } => {
                let mut counts: std::collections::HashMap<Cost, u32> = selection
                    .cost_set_in_supply()
                    .iter()
                    .map(|c| (*c, 0))
                    .collect();
                for pile in selection.piles() {
                    for c in &pile.costs {
                        *counts.entry(*c).or_insert(0) += 1;
                    }
                }
                counts.values().any(|n| *n > *max_repeats)
            }
            Property::HangingInteractsWith {
                interacts_with,
                keyword,
                alt_keyword,
            } => {
                if !selection.interacted_keyword_present(interacts_with) {
                    return false;
                }
                if selection.keyword_present(keyword) {
                    return false;
                }
                if let Some(alt) = alt_keyword {
                    if selection.keyword_present(alt) {
                        return false;
                    }
                }
                true
            }
            Property::NeedProsperity { threshold } => {
                let has_colony = selection.piles().any(|p| p.name == "Colony");
                let has_platinum = selection.piles().any(|p| p.name == "Platinum");
                if has_colony && has_platinum {
                    return false;
                }
                if has_colony != has_platinum {
                    return true;
                }
                let count = selection
                    .piles()
                    .filter(|p| p.card_group.starts_with("Prosperity"))
                    .count() as u32;
                count >= *threshold
            }
            Property::Either(a, b) => a.meets_selection(selection) || b.meets_selection(selection),
            Property::Fail => false,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn either_of_mismatched_scopes_collapses_to_fail() {
        let pile_scoped = Property::Name {
            name: "Moat".into(),
        };
        let sel_scoped = Property::MissingPotion;
        assert_eq!(Property::either(pile_scoped, sel_scoped), Property::Fail);
    }

    #[test]
    fn fail_property_never_meets_anything() {
        assert_eq!(Property::Fail, Property::Fail);
    }

    #[test]
    fn equal_properties_hash_equal() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = Property::CardGroup {
            group: "Prosperity".into(),
        };
        let b = Property::CardGroup {
            group: "Prosperity".into(),
        };
        assert_eq!(a, b);
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }
}
