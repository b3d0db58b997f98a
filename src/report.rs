//! Renders a finished [`Selection`] as a terminal report grouped by
//! card-group, mirroring the `dump()` output of the original tool.

use std::fmt::Write as _;

use crate::selection::Selection;

pub struct ReportOptions {
    pub show_why: bool,
    pub show_info: bool,
}

pub fn render(selection: &Selection<'_>, opts: &ReportOptions) -> String {
    let mut out = String::new();
    let mut piles: Vec<_> = selection
        .pile_ids()
        .map(|id| (id, selection.catalog().pile(id)))
        .collect();
    piles.sort_by(|(_, a), (_, b)| {
        (a.card_group.as_str(), a.name.as_str()).cmp(&(b.card_group.as_str(), b.name.as_str()))
    });

    let mut current_group = None;
    for (offset, pile) in piles.iter().map(|(id, p)| (*id, p)) {
        if current_group.as_deref() != Some(pile.card_group.as_str()) {
            let _ = writeln!(out, "\n== {} ==", pile.card_group);
            current_group = Some(pile.card_group.clone());
        }
        let tags = selection.tags_for(offset);
        let visible_tags: Vec<&String> = tags
            .iter()
            .filter(|t| opts.show_why || !t.starts_with('<'))
            .collect();
        let tag_suffix = if visible_tags.is_empty() {
            String::new()
        } else {
            format!(
                " [{}]",
                visible_tags
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        let _ = write!(out, "{}{}", pile.name, tag_suffix);
        if opts.show_info {
            let types = pile.types.iter().cloned().collect::<Vec<_>>().join("/");
            let costs = pile
                .costs
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let _ = write!(out, "  ({types}) costs {costs}");
        }
        out.push('\n');
    }

    if !selection.items().is_empty() {
        out.push_str("\nNeed the following items:\n");
        for item in selection.items() {
            let _ = writeln!(out, "  {item}");
        }
    }

    out
}
