//! Remediation strategies a [`Constraint`](crate::constraint::Constraint)
//! fires when its status is `ActionReq`. Each variant clones the selection,
//! mutates the clone, and tail-recurses into the build engine itself.

use crate::catalog::PileId;
use crate::engine::build_selection;
use crate::property::Property;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintAction {
    /// Finds a bane pile (coin-only cost 2 or 3, Action type) and bumps the
    /// market cap by one.
    FindBane,
    /// Finds any pile matching `search` not already present.
    FindPile { search: Box<Property> },
    /// Adds every addable pile from `group`, tagging and noting it.
    AddGroup { group: String },
    /// Adds the single pile satisfying a `card(X)` dependency not yet met.
    AddMissingDependency,
    /// Adds every pile in the group satisfying a `group(X)` dependency.
    AddMissingDependencyGroup,
    /// Adds Platinum and Colony to the current (not cloned) selection.
    AddProsperity,
}

impl ConstraintAction {
    pub fn apply<'c>(
        &self,
        label: &str,
        start: &mut Selection<'c>,
    ) -> Result<Option<Selection<'c>>, String> {
        match self {
            ConstraintAction::FindBane => find_bane(label, start),
            ConstraintAction::FindPile { search } => find_pile(label, start, search),
            ConstraintAction::AddGroup { group } => add_group(label, start, group),
            ConstraintAction::AddMissingDependency => add_missing_dependency(label, start),
            ConstraintAction::AddMissingDependencyGroup => {
                add_missing_dependency_group(label, start)
            }
            ConstraintAction::AddProsperity => add_prosperity(label, start),
        }
    }
}

fn find_bane<'c>(label: &str, start: &mut Selection<'c>) -> Result<Option<Selection<'c>>, String> {
    let bane_property = crate::library::bane_cost_property();
    let Some(candidates) = start.catalog().get_iterators(&bane_property) else {
        return Ok(None);
    };
    for pile_id in candidates {
        if start.contains(pile_id) {
            continue;
        }
        let mut clone = start.clone();
        clone.increase_required_piles();
        if !clone.add_pile(pile_id) {
            continue;
        }
        clone.tag_pile(pile_id, "Bane");
        clone.tag_pile(pile_id, format!("<why?{label}>"));
        clone.add_note("hasBane");
        if let Some(result) = build_selection(clone)? {
            return Ok(Some(result));
        }
    }
    Ok(None)
}

fn find_pile<'c>(
    label: &str,
    start: &mut Selection<'c>,
    search: &Property,
) -> Result<Option<Selection<'c>>, String> {
    let Some(candidates) = start.catalog().get_iterators(search) else {
        return Ok(None);
    };
    for pile_id in candidates {
        if start.contains(pile_id) {
            continue;
        }
        let mut clone = start.clone();
        if !clone.add_pile(pile_id) {
            continue;
        }
        clone.tag_pile(pile_id, format!("<why?{label}>"));
        if let Some(result) = build_selection(clone)? {
            return Ok(Some(result));
        }
    }
    Ok(None)
}

fn add_group<'c>(
    label: &str,
    start: &mut Selection<'c>,
    group: &str,
) -> Result<Option<Selection<'c>>, String> {
    let mut clone = start.clone();
    for pile_id in clone.catalog().pile_ids_by_group(group) {
        if clone.add_pile(pile_id) {
            clone.tag_pile(pile_id, format!("<why?{label}>"));
        }
    }
    clone.add_note(format!("added{group}"));
    build_selection(clone)
}

fn add_missing_dependency<'c>(
    label: &str,
    start: &mut Selection<'c>,
) -> Result<Option<Selection<'c>>, String> {
    let catalog = start.catalog();
    let mut needed: Vec<(String, PileId)> = Vec::new();
    for pile in start.piles() {
        for token in &pile.other_interactions {
            if let Some(name) = token.strip_prefix("card(").and_then(|s| s.strip_suffix(')')) {
                needed.push((name.to_string(), catalog.pile_id_by_name(&pile.name).unwrap()));
            }
        }
    }
    for (name, _requester) in needed {
        if start.cards().any(|c| c.name == name) {
            continue;
        }
        let Some(pile_id) = catalog.pile_for_card(&name) else {
            continue;
        };
        if start.contains(pile_id) {
            continue;
        }
        let mut clone = start.clone();
        if !clone.add_pile(pile_id) {
            continue;
        }
        clone.tag_pile(pile_id, format!("<why?{label}>"));
        return build_selection(clone);
    }
    Ok(None)
}

fn add_missing_dependency_group<'c>(
    label: &str,
    start: &mut Selection<'c>,
) -> Result<Option<Selection<'c>>, String> {
    let catalog = start.catalog();
    let mut missing_groups: Vec<String> = Vec::new();
    for pile in start.piles() {
        for token in &pile.other_interactions {
            if let Some(group) = token.strip_prefix("group(").and_then(|s| s.strip_suffix(')')) {
                if !start.has_note(&format!("added{group}")) && !missing_groups.iter().any(|g| g == group) {
                    missing_groups.push(group.to_string());
                }
            }
        }
    }
    if missing_groups.is_empty() {
        return Ok(None);
    }
    let mut clone = start.clone();
    for group in missing_groups {
        for pile_id in catalog.pile_ids_by_group(&group) {
            if clone.add_pile(pile_id) {
                clone.tag_pile(pile_id, format!("<why?{label}>"));
            }
        }
        clone.add_note(format!("added{group}"));
    }
    build_selection(clone)
}

fn add_prosperity<'c>(
    label: &str,
    start: &mut Selection<'c>,
) -> Result<Option<Selection<'c>>, String> {
    let catalog = start.catalog();
    for name in ["Platinum", "Colony"] {
        if let Some(pile_id) = catalog.pile_id_by_name(name) {
            if start.add_pile(pile_id) {
                start.tag_pile(pile_id, format!("<why?{label}>"));
            }
        }
    }
    build_selection(start.clone())
}
