//! Parses the on-disk card-catalog and box files.
//!
//! The grammar is deliberately the original tool's own comma/semicolon
//! splitting, not RFC 4180 CSV: no quoting, no escaping.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::catalog::card::{Card, Pile};
use crate::cost::Cost;
use crate::costtarget::parse_cost_target;
use crate::error::CatalogError;

const EXPECTED_COLUMNS: usize = 14;

fn parens_ok(token: &str) -> bool {
    match token.find('(') {
        None => true,
        Some(_) => token.ends_with(')'),
    }
}

fn bool_value(s: &str) -> bool {
    matches!(s, "Y" | "y")
}

fn int_value(s: &str) -> Option<i32> {
    if s.is_empty() {
        None
    } else {
        s.parse().ok()
    }
}

fn split_multi(s: &str) -> BTreeSet<String> {
    s.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_row(line: &str) -> Result<Card, CatalogError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < EXPECTED_COLUMNS {
        return Err(CatalogError::MalformedRow {
            line: line.to_string(),
        });
    }
    let name = fields[0].trim().to_string();
    let pile = fields[1].trim().to_string();
    let card_group = fields[2].trim().to_string();
    let supply = bool_value(fields[3].trim());
    let kingdom = bool_value(fields[4].trim());
    let types = split_multi(fields[5]);
    let coin = int_value(fields[6].trim());
    let debt = int_value(fields[8].trim());
    let potion = int_value(fields[9].trim());
    let keywords = split_multi(fields[11]);
    let interacted_keywords = split_multi(fields[12]);
    let other_interactions: Vec<String> = fields[13]
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    for token in &other_interactions {
        if !parens_ok(token) {
            return Err(CatalogError::UnbalancedParens {
                card: name.clone(),
                token: token.clone(),
            });
        }
    }

    let mut targets = Vec::new();
    for token in &other_interactions {
        if token.starts_with("cost") {
            let parsed = parse_cost_target(token).ok_or_else(|| CatalogError::CostTargetParse {
                card: name.clone(),
                token: token.clone(),
            })?;
            targets.push(parsed);
        }
    }

    let cost = Cost::new(coin.unwrap_or(-1), potion.unwrap_or(-1), debt.unwrap_or(-1));

    Ok(Card {
        name,
        pile,
        card_group,
        supply,
        kingdom,
        types,
        cost,
        keywords,
        interacted_keywords,
        other_interactions,
        targets,
    })
}

/// Loads the card catalog file (header line skipped) into grouped piles.
pub fn load_catalog(path: &Path) -> Result<Vec<Pile>, CatalogError> {
    let contents =
        fs::read_to_string(path).map_err(|e| CatalogError::Io(path.display().to_string(), e.to_string()))?;
    let mut lines = contents.lines();
    lines.next(); // header

    let mut by_pile: BTreeMap<String, Vec<Card>> = BTreeMap::new();
    for line in lines {
        if line.is_empty() || line.starts_with(',') {
            continue;
        }
        let card = parse_row(line)?;
        by_pile
            .entry(card.pile_name().to_string())
            .or_default()
            .push(card);
    }

    let mut piles: Vec<Pile> = by_pile
        .into_iter()
        .map(|(name, cards)| Pile::from_cards(name, cards))
        .collect();
    piles.sort_by(|a, b| (a.card_group.as_str(), a.name.as_str()).cmp(&(b.card_group.as_str(), b.name.as_str())));
    Ok(piles)
}

/// Loads a box file: `name=group1;group2`, `#` comments, blank lines ignored.
pub fn load_boxes(path: &Path) -> Result<BTreeMap<String, Vec<String>>, CatalogError> {
    let contents =
        fs::read_to_string(path).map_err(|e| CatalogError::Io(path.display().to_string(), e.to_string()))?;
    let mut boxes = BTreeMap::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, groups) = line.split_once('=').ok_or_else(|| CatalogError::MalformedBoxLine {
            line: lineno + 1,
            text: line.to_string(),
        })?;
        let groups = groups.split(';').map(str::to_string).collect();
        boxes.insert(name.to_string(), groups);
    }
    Ok(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_row_with_too_few_columns() {
        let line = "Moat,,Base,Y,Y";
        assert!(matches!(
            parse_row(line),
            Err(CatalogError::MalformedRow { .. })
        ));
    }

    #[test]
    fn rejects_unbalanced_paren_interaction() {
        let line = "Moat,,Base,Y,Y,Action;Reaction,2,,,,,,react(Attack";
        assert!(matches!(
            parse_row(line),
            Err(CatalogError::UnbalancedParens { .. })
        ));
    }

    #[test]
    fn accepts_cost_target_tokens() {
        let line = "Workshop,,Base,Y,Y,Action,3,,,,,,cost<=4";
        let card = parse_row(line).expect("valid row");
        assert_eq!(card.targets.len(), 1);
    }

    #[test]
    fn rejects_malformed_cost_token() {
        let line = "Workshop,,Base,Y,Y,Action,3,,,,,,cost<=abc";
        assert!(matches!(
            parse_row(line),
            Err(CatalogError::CostTargetParse { .. })
        ));
    }

    #[test]
    fn parses_box_file_skipping_comments_and_blanks() {
        let dir = std::env::temp_dir().join(format!("kingdomsmith-box-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("boxes.txt");
        std::fs::write(&path, "# a comment\n\nFirstGame=Base;Intrigue-base\n").unwrap();
        let boxes = load_boxes(&path).expect("parses");
        assert_eq!(boxes.get("FirstGame").unwrap(), &vec!["Base", "Intrigue-base"]);
        std::fs::remove_dir_all(&dir).ok();
    }
}
