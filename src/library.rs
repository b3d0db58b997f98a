//! Factory for the standard constraint list (§4.10): bane, prosperity,
//! potion, the interaction-dependency constraints, anti-curser/anti-attack
//! counters, repeated-cost and type-quota caps.

use std::collections::{BTreeMap, BTreeSet};

use crate::actions::ConstraintAction;
use crate::catalog::Catalog;
use crate::constraint::Constraint;
use crate::property::{CostSpec, Property};
use crate::rand_stream::RandStream;

const MANY: u32 = u32::MAX - 1;

pub struct LibraryOptions {
    pub disable_anti_cursor: bool,
    pub disable_attack_react: bool,
    pub max_cost_repeat: u32,
    pub min_types: BTreeMap<String, u32>,
    pub max_types: BTreeMap<String, u32>,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        LibraryOptions {
            disable_anti_cursor: false,
            disable_attack_react: false,
            max_cost_repeat: 0,
            min_types: BTreeMap::new(),
            max_types: BTreeMap::new(),
        }
    }
}

pub fn build_standard_constraints(
    catalog: &Catalog,
    rand: &mut dyn RandStream,
    opts: &LibraryOptions,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();

    constraints.push(bane_constraint());
    constraints.push(prosperity_base_constraint());

    constraints.push(Constraint::full(
        "add-potion",
        Some(Property::MissingPotion),
        Property::Fail,
        Some(ConstraintAction::AddGroup {
            group: "Alchemy-base".into(),
        }),
        1,
        MANY,
        MANY,
        MANY,
    ));

    let prosperity_threshold = rand.next_u32() % 10;
    constraints.push(Constraint::full(
        "add-prosperity",
        Some(Property::NeedProsperity {
            threshold: prosperity_threshold,
        }),
        Property::Fail,
        Some(ConstraintAction::AddProsperity),
        1,
        MANY,
        MANY,
        MANY,
    ));

    constraints.push(Constraint::full(
        "add-interacting-group",
        Some(Property::MissingInteractingCardGroup),
        Property::Fail,
        Some(ConstraintAction::AddMissingDependencyGroup),
        1,
        MANY,
        MANY,
        MANY,
    ));

    constraints.push(Constraint::full(
        "add-interacting-card",
        Some(Property::MissingInteractingCard),
        Property::Fail,
        Some(ConstraintAction::AddMissingDependency),
        1,
        MANY,
        MANY,
        MANY,
    ));

    constraints.push(Constraint::full(
        "add-hex-for-doom",
        Some(Property::MissingGroupForKeyword {
            type_prefix: "Doom".into(),
            group: "Nocturne-Hexes".into(),
        }),
        Property::Fail,
        Some(ConstraintAction::AddGroup {
            group: "Nocturne-Hexes".into(),
        }),
        1,
        MANY,
        MANY,
        MANY,
    ));

    constraints.push(Constraint::full(
        "add-boon-for-fate",
        Some(Property::MissingGroupForKeyword {
            type_prefix: "Fate".into(),
            group: "Nocturne-Boons".into(),
        }),
        Property::Fail,
        Some(ConstraintAction::AddGroup {
            group: "Nocturne-Boons".into(),
        }),
        1,
        MANY,
        MANY,
        MANY,
    ));

    if !opts.disable_anti_cursor {
        constraints.push(counter_curser_constraint());
    }
    if !opts.disable_attack_react {
        constraints.push(counter_attack_constraint());
    }

    if opts.max_cost_repeat > 0 {
        constraints.push(Constraint::simple(
            "repeated-costs",
            Property::RepeatedCost {
                max_repeats: opts.max_cost_repeat,
            },
            None,
            0,
            0,
        ));
    }

    for (type_name, &min) in &opts.min_types {
        let search_property = Property::Type {
            type_name: type_name.clone(),
            restrict_to_kingdom_and_supply: true,
        };
        let counting_property = Property::Type {
            type_name: type_name.clone(),
            restrict_to_kingdom_and_supply: false,
        };
        constraints.push(Constraint::full(
            format!("min-type-{type_name}"),
            None,
            counting_property,
            Some(ConstraintAction::FindPile {
                search: Box::new(search_property),
            }),
            0,
            min,
            min,
            MANY,
        ));
    }

    for (type_name, &max) in &opts.max_types {
        constraints.push(Constraint::simple(
            format!("max-type-{type_name}"),
            Property::Type {
                type_name: type_name.clone(),
                restrict_to_kingdom_and_supply: false,
            },
            None,
            0,
            max,
        ));
    }

    let mut interacts_with: BTreeSet<String> = BTreeSet::new();
    for pile in catalog.piles() {
        interacts_with.extend(pile.interacted_keywords.iter().cloned());
    }
    for keyword in interacts_with {
        constraints.push(hanging_interacts_constraint(&keyword));
    }

    constraints
}

/// `gain`/`trash` reactions accept either of two concrete keywords; every
/// other interacted keyword is matched against itself.
fn hanging_interacts_alternatives(interacts_with: &str) -> (String, Option<String>) {
    match interacts_with {
        "gain" => ("gain".into(), Some("+buy".into())),
        "trash" => ("trash_any".into(), Some("trash_limited".into())),
        other => (other.to_string(), None),
    }
}

fn hanging_interacts_constraint(interacts_with: &str) -> Constraint {
    let (keyword, alt_keyword) = hanging_interacts_alternatives(interacts_with);
    let search = match &alt_keyword {
        Some(alt) => Property::either(
            Property::Keyword {
                keyword: keyword.clone(),
                kingdom_and_supply: true,
            },
            Property::Keyword {
                keyword: alt.clone(),
                kingdom_and_supply: true,
            },
        ),
        None => Property::Keyword {
            keyword: keyword.clone(),
            kingdom_and_supply: true,
        },
    };
    Constraint::full(
        format!("hanging-interacts-{interacts_with}"),
        Some(Property::HangingInteractsWith {
            interacts_with: interacts_with.to_string(),
            keyword,
            alt_keyword,
        }),
        Property::Fail,
        Some(ConstraintAction::FindPile {
            search: Box::new(search),
        }),
        1,
        MANY,
        MANY,
        MANY,
    )
}

fn bane_constraint() -> Constraint {
    Constraint::full(
        "bane",
        Some(Property::Name {
            name: "Young Witch".into(),
        }),
        Property::Note {
            note: "hasBane".into(),
        },
        Some(ConstraintAction::FindBane),
        1,
        1,
        1,
        MANY,
    )
}

fn prosperity_base_constraint() -> Constraint {
    Constraint::full(
        "prosperity-base",
        Some(Property::CardGroup {
            group: "Prosperity".into(),
        }),
        Property::Note {
            note: "addedProsperity-base".into(),
        },
        Some(ConstraintAction::AddGroup {
            group: "Prosperity-base".into(),
        }),
        5,
        1,
        1,
        MANY,
    )
}

fn counter_curser_constraint() -> Constraint {
    Constraint::full(
        "counter-curser",
        Some(Property::Keyword {
            keyword: "curser".into(),
            kingdom_and_supply: false,
        }),
        Property::Keyword {
            keyword: "trash_any".into(),
            kingdom_and_supply: true,
        },
        Some(ConstraintAction::FindPile {
            search: Box::new(Property::Keyword {
                keyword: "trash_any".into(),
                kingdom_and_supply: true,
            }),
        }),
        1,
        1,
        1,
        MANY,
    )
}

fn counter_attack_constraint() -> Constraint {
    Constraint::full(
        "counter-attack",
        Some(Property::Type {
            type_name: "Attack".into(),
            restrict_to_kingdom_and_supply: false,
        }),
        Property::OtherInteraction {
            token: "react(Attack)".into(),
            kingdom_and_supply: true,
        },
        Some(ConstraintAction::FindPile {
            search: Box::new(Property::OtherInteraction {
                token: "react(Attack)".into(),
                kingdom_and_supply: true,
            }),
        }),
        2,
        1,
        1,
        MANY,
    )
}

/// Cost specification for bane candidates: an Action costing coin-only 2 or 3.
pub fn bane_cost_property() -> Property {
    let costs: crate::cost::CostSet = [crate::cost::Cost::coin_only(2), crate::cost::Cost::coin_only(3)]
        .into_iter()
        .collect();
    Property::CostAndType {
        type_name: "Action".into(),
        spec: CostSpec::Set((&costs).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand_stream::SystemRand;

    #[test]
    fn disabling_anti_cursor_omits_the_constraint() {
        let piles = Vec::new();
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(piles, &mut rand);
        let mut rand2 = SystemRand::from_seed(1);
        let opts = LibraryOptions {
            disable_anti_cursor: true,
            ..Default::default()
        };
        let constraints = build_standard_constraints(&catalog, &mut rand2, &opts);
        assert!(!constraints.iter().any(|c| c.label == "counter-curser"));
    }

    #[test]
    fn max_cost_repeat_zero_omits_repeated_costs_constraint() {
        let piles = Vec::new();
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(piles, &mut rand);
        let mut rand2 = SystemRand::from_seed(1);
        let constraints = build_standard_constraints(&catalog, &mut rand2, &LibraryOptions::default());
        assert!(!constraints.iter().any(|c| c.label == "repeated-costs"));
    }
}
