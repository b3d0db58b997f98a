//! The recursive backtracking search that drives properties, constraints,
//! cost-target voting, and the general-pile stream to a finished selection.

use crate::catalog::{Catalog, PileId};
use crate::constraint::ConsResult;
use crate::costtarget::CostVotes;
use crate::property::{CostSpec, Property};
use crate::rand_stream::RandStream;
use crate::selection::Selection;

const COST_TARGET_THRESHOLD: f64 = 0.5;
const COST_TARGET_TOLERANCE: f64 = 0.21;
const HAVE_COST_PENALTY: f64 = -3.0;

/// Seeds a selection with the catalog's "base" group plus up to
/// `landscapes` optional-extra piles. Returns `None` if there is no "base"
/// group to seed from.
pub fn start_selection<'c>(
    catalog: &'c Catalog,
    landscapes: u32,
    rand: &mut dyn RandStream,
) -> Option<Selection<'c>> {
    let base = catalog.pile_ids_by_group("base");
    if base.is_empty() {
        return None;
    }
    let mut selection = Selection::new(catalog);
    for pile_id in base {
        selection.add_pile(pile_id);
    }
    if let Some(mut pool) = catalog.get_iterators(&Property::OptionalExtra) {
        let n = pool.len();
        if n > 0 {
            for j in 0..n {
                let k = (rand.next_u32() as usize) % n;
                pool.swap(j, k);
            }
        }
        for pile_id in pool.into_iter().take(landscapes as usize) {
            selection.add_pile(pile_id);
        }
    }
    Some(selection)
}

/// The core recursive search. Consumes `start` and returns the first
/// successful completion reachable from it, or `None` if this branch is
/// exhausted. `Err` carries the blame message of a hard constraint failure.
pub fn build_selection<'c>(mut start: Selection<'c>) -> Result<Option<Selection<'c>>, String> {
    let constraints = start.constraints().len();
    for idx in 0..constraints {
        let status = start.constraints()[idx].status(&start);
        if status == ConsResult::Fail {
            return Err("Constraint Fail".to_string());
        }
    }

    let cap_reached = start.current_normal_pile_count >= start.required_cards;

    for idx in 0..constraints {
        if start.constraints()[idx].status(&start) == ConsResult::ActionReq {
            let label = start.constraints()[idx].label.clone();
            let action = start.constraints()[idx].action.clone();
            if let Some(action) = action {
                return action.apply(&label, &mut start);
            }
            log::warn!("constraint \"{label}\" has no action to satisfy it");
            return Ok(None);
        }
    }

    if cap_reached {
        return Ok(Some(start));
    }

    if start.target_check_required {
        let catalog = start.catalog();
        let mut votes = CostVotes::new(catalog.legal_costs());
        let mut need_target_action = false;
        for target in start.targets().to_vec() {
            let unmet = target.add_votes(start.cost_set_in_supply(), &mut votes);
            need_target_action |= unmet;
        }
        for cost in start.cost_set_in_supply().clone() {
            votes.add_vote(cost, HAVE_COST_PENALTY);
        }
        let preferred = votes.get_max_weighted(COST_TARGET_THRESHOLD, COST_TARGET_TOLERANCE);
        if !preferred.is_empty() {
            let prop = Property::Cost {
                spec: CostSpec::Set((&preferred).into()),
                supply_only: true,
            };
            if let Some(candidates) = catalog.get_iterators(&prop) {
                let mut exhausted_gracefully = false;
                for pile_id in candidates {
                    if start.contains(pile_id) {
                        continue;
                    }
                    let mut clone = start.clone();
                    if !need_target_action {
                        clone.target_check_required = false;
                    }
                    if !clone.add_pile(pile_id) {
                        if !need_target_action {
                            start.target_check_required = false;
                            exhausted_gracefully = true;
                            break;
                        } else {
                            return Ok(None);
                        }
                    }
                    let blame = clone.blame().to_string();
                    clone.tag_pile(pile_id, format!("<why?cost-target:{blame}>"));
                    if let Some(result) = build_selection(clone)? {
                        return Ok(Some(result));
                    }
                }
                if !exhausted_gracefully && need_target_action {
                    return Ok(None);
                }
            } else if need_target_action {
                return Ok(None);
            }
        } else if need_target_action {
            return Ok(None);
        }
    }

    start.target_check_required = false;

    loop {
        let Some(pile_id) = start.next_general_pile() else {
            return Ok(None);
        };
        if start.contains(pile_id) {
            continue;
        }
        let mut clone = start.clone();
        if !clone.add_pile(pile_id) {
            return Ok(None);
        }
        clone.tag_pile(pile_id, "<why?general>");
        if let Some(result) = build_selection(clone)? {
            return Ok(Some(result));
        }
    }
}

/// Post-pass adding tokens/mats/base-pile replacements implied by the
/// chosen cards.
pub fn finish_selection(selection: &mut Selection<'_>, rand: &mut dyn RandStream) {
    let catalog = selection.catalog();
    let ks_count = selection
        .piles()
        .filter(|p| p.is_kingdom_and_supply())
        .count() as u32;
    let da_count = selection
        .piles()
        .filter(|p| p.card_group == "DarkAges")
        .count() as u32;
    if ks_count > 0 && (rand.next_u32() % ks_count) < da_count {
        for pile_id in catalog.pile_ids_by_group("DarkAges-base") {
            if selection.add_pile(pile_id) {
                selection.tag_pile(pile_id, "Replaces Estate in starting deck");
            }
        }
        selection.add_note("addedDarkAges-base");
    }

    let mut needs_point_tokens = false;
    let mut needs_debt_tokens = false;
    let mut needs_coffers_villagers = false;
    for pile in selection.piles() {
        if pile.keywords.contains("+point") {
            needs_point_tokens = true;
        }
        if pile.costs.iter().any(|c| c.has_debt()) {
            needs_debt_tokens = true;
        }
        if pile.keywords.contains("+coffers") || pile.keywords.contains("+villagers") {
            needs_coffers_villagers = true;
        }
    }
    if needs_point_tokens {
        selection.add_item("point tokens");
    }
    if needs_debt_tokens {
        selection.add_item("debt tokens");
    }
    if needs_coffers_villagers {
        selection.add_item("coin tokens");
        selection.add_item("coffers/villagers mat");
    }

    let heirloom_piles: Vec<PileId> = selection
        .piles()
        .enumerate()
        .filter(|(_, p)| p.types.contains("Heirloom"))
        .map(|(i, _)| i)
        .collect();
    for (offset, pile_id) in selection.pile_ids().enumerate() {
        if heirloom_piles.contains(&offset) {
            selection.tag_pile(pile_id, "Replaces one Copper in starting deck");
        }
    }
}

/// Top-level orchestration: seed, attach constraints, add includes, search,
/// finalise.
pub fn generate_selection<'c>(
    catalog: &'c Catalog,
    market_cap: u32,
    landscapes: u32,
    includes: &[PileId],
    constraints: Vec<crate::constraint::Constraint>,
    rand: &mut dyn RandStream,
) -> Result<Option<Selection<'c>>, String> {
    let Some(mut selection) = start_selection(catalog, landscapes, rand) else {
        return Ok(None);
    };
    selection.required_cards = market_cap;
    selection.attach_constraints(constraints);
    for &pile_id in includes {
        selection.add_pile(pile_id);
    }
    let result = build_selection(selection)?;
    if let Some(mut result) = result {
        finish_selection(&mut result, rand);
        Ok(Some(result))
    } else {
        Ok(None)
    }
}
