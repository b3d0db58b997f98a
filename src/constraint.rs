//! Constraints pair a property with four count thresholds and, optionally,
//! a remediation action to run when the count falls below requirement.

use crate::actions::ConstraintAction;
use crate::property::Property;
use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsResult {
    Ok,
    ActionReq,
    MorePossible,
    Fail,
}

pub struct Constraint {
    pub label: String,
    pub precondition: Option<Property>,
    pub property: Property,
    pub action: Option<ConstraintAction>,
    /// `(x, a, b, c)`: precondition-active / satisfied / inactive / broken.
    pub x: u32,
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Constraint {
    /// Shorthand matching the original's two-argument constructor: no
    /// precondition, `x = 0`, `a = b = min`, `c = max + 1`.
    pub fn simple(
        label: impl Into<String>,
        property: Property,
        action: Option<ConstraintAction>,
        min: u32,
        max: u32,
    ) -> Self {
        Constraint {
            label: label.into(),
            precondition: None,
            property,
            action,
            x: 0,
            a: min,
            b: min,
            c: max + 1,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn full(
        label: impl Into<String>,
        precondition: Option<Property>,
        property: Property,
        action: Option<ConstraintAction>,
        x: u32,
        a: u32,
        b: u32,
        c: u32,
    ) -> Self {
        Constraint {
            label: label.into(),
            precondition,
            property,
            action,
            x,
            a,
            b,
            c,
        }
    }

    fn count(&self, property: &Property, selection: &Selection) -> u32 {
        if property.is_selection_property() {
            return property.meets_selection(selection) as u32;
        }
        selection
            .piles()
            .filter(|p| property.meets_pile(p))
            .count() as u32
    }

    pub fn status(&self, selection: &Selection) -> ConsResult {
        if let Some(pre) = &self.precondition {
            if self.count(pre, selection) < self.x {
                return ConsResult::Ok;
            }
        }
        let n = self.count(&self.property, selection);
        if n >= self.c {
            ConsResult::Fail
        } else if n >= self.b {
            ConsResult::Ok
        } else if n >= self.a {
            ConsResult::MorePossible
        } else {
            ConsResult::ActionReq
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::card::{Card, Pile};
    use crate::rand_stream::SystemRand;
    use std::collections::BTreeSet;

    fn card(name: &str) -> Card {
        Card {
            name: name.to_string(),
            pile: String::new(),
            card_group: "Base".into(),
            supply: true,
            kingdom: true,
            types: BTreeSet::new(),
            cost: crate::cost::Cost::coin_only(3),
            keywords: BTreeSet::new(),
            interacted_keywords: BTreeSet::new(),
            other_interactions: Vec::new(),
            targets: Vec::new(),
        }
    }

    #[test]
    fn precondition_below_threshold_is_ok() {
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(
            vec![Pile::from_cards("Moat".into(), vec![card("Moat")])],
            &mut rand,
        );
        let selection = Selection::new(&catalog);
        let k = Constraint::full(
            "test",
            Some(Property::Name {
                name: "Young Witch".into(),
            }),
            Property::Note {
                note: "hasBane".into(),
            },
            None,
            1,
            1,
            1,
            100,
        );
        assert_eq!(k.status(&selection), ConsResult::Ok);
    }

    #[test]
    fn no_precondition_under_min_is_action_required() {
        let mut rand = SystemRand::from_seed(1);
        let catalog = Catalog::from_piles(
            vec![Pile::from_cards("Moat".into(), vec![card("Moat")])],
            &mut rand,
        );
        let selection = Selection::new(&catalog);
        let k = Constraint::simple(
            "test",
            Property::CardGroup {
                group: "Prosperity".into(),
            },
            None,
            5,
            100,
        );
        assert_eq!(k.status(&selection), ConsResult::ActionReq);
    }
}
