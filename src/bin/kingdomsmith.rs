use std::process::ExitCode;

use clap::Parser;
use kingdomsmith::catalog::{loader, Catalog};
use kingdomsmith::cli::{parse_type_quotas, Args};
use kingdomsmith::engine::generate_selection;
use kingdomsmith::library::{build_standard_constraints, LibraryOptions};
use kingdomsmith::rand_stream::get_rand_stream;
use kingdomsmith::report::{render, ReportOptions};

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut piles = match loader::load_catalog(&args.cardfile) {
        Ok(piles) => piles,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    if !args.groups.is_empty() {
        piles.retain(|p| args.groups.contains(&p.card_group));
    }
    if !args.boxes.is_empty() {
        let Some(boxfile) = &args.boxfile else {
            eprintln!("error: --boxes requires --boxfile");
            return ExitCode::from(1);
        };
        let box_map = match loader::load_boxes(boxfile) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(1);
            }
        };
        let mut allowed_groups = std::collections::BTreeSet::new();
        for b in &args.boxes {
            match box_map.get(b) {
                Some(groups) => allowed_groups.extend(groups.iter().cloned()),
                None => {
                    eprintln!("error: unknown box \"{b}\"");
                    return ExitCode::from(1);
                }
            }
        }
        piles.retain(|p| allowed_groups.contains(&p.card_group));
    }
    if !args.exclude.is_empty() {
        piles.retain(|p| !args.exclude.contains(&p.name));
    }

    if args.list {
        for pile in &piles {
            println!("{}", pile.name);
        }
        return ExitCode::from(0);
    }

    let mut rand = get_rand_stream(args.seed, piles.len().max(1) as u32, args.badrand);
    let catalog = Catalog::from_piles(piles, rand.as_mut());

    if !args.no_validate {
        let warnings = catalog.validate();
        if !warnings.is_empty() {
            for w in &warnings {
                eprintln!("warning: {w}");
            }
            return ExitCode::from(3);
        }
    }

    let min_types = match parse_type_quotas(&args.min_type) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(4);
        }
    };
    let max_types = match parse_type_quotas(&args.max_type) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(4);
        }
    };

    let lib_opts = LibraryOptions {
        disable_anti_cursor: args.no_anti_cursor,
        disable_attack_react: args.no_attack_react,
        max_cost_repeat: args.max_cost_repeat,
        min_types,
        max_types,
    };
    let constraints = build_standard_constraints(&catalog, rand.as_mut(), &lib_opts);

    let includes: Vec<_> = args
        .include
        .iter()
        .filter_map(|name| catalog.pile_id_by_name(name))
        .collect();

    let result = generate_selection(&catalog, 10, args.landscape_count, &includes, constraints, rand.as_mut());

    match result {
        Ok(Some(selection)) => {
            let report = render(
                &selection,
                &ReportOptions {
                    show_why: args.why,
                    show_info: args.info,
                },
            );
            println!("{report}");
            ExitCode::from(0)
        }
        Ok(None) => {
            eprintln!("error: no selection satisfies the given constraints");
            ExitCode::from(2)
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}
