//! Command-line surface. Mirrors every flag in the on-disk catalog/box file
//! format documentation: multi-value options accept either repetition or a
//! single comma-separated list.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "kingdomsmith", about = "Generates a legal kingdom selection")]
pub struct Args {
    /// RNG seed; 0 draws from wall-clock time.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Use the deterministic cross-platform stepper instead of the platform RNG.
    #[arg(long, default_value_t = false)]
    pub badrand: bool,

    /// Only load cards whose box is in this list.
    #[arg(long, value_delimiter = ',')]
    pub boxes: Vec<String>,

    /// Only load cards whose card-group is in this list.
    #[arg(long, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Path to the box-to-groups file.
    #[arg(long)]
    pub boxfile: Option<PathBuf>,

    /// Path to the card catalog file.
    #[arg(long, default_value = "cards.csv")]
    pub cardfile: PathBuf,

    /// List the resolved catalog and exit.
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Number of landscape (Event/Project/Landmark/Way) piles to add.
    #[arg(long, default_value_t = 2)]
    pub landscape_count: u32,

    /// Show the `<why?...>` reasoning tags in the report.
    #[arg(long, default_value_t = false)]
    pub why: bool,

    /// Skip the dangling-interaction validation pass.
    #[arg(long, default_value_t = false)]
    pub no_validate: bool,

    /// Cards to exclude from the catalog before searching.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Cards to force into the selection before searching.
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Print per-pile types and costs in the report.
    #[arg(long, default_value_t = false)]
    pub info: bool,

    /// Disable the counter-attack-reaction constraint.
    #[arg(long, default_value_t = false)]
    pub no_attack_react: bool,

    /// Disable the anti-curser constraint.
    #[arg(long, default_value_t = false)]
    pub no_anti_cursor: bool,

    /// Maximum number of piles allowed to share a cost (0 disables the cap).
    #[arg(long, default_value_t = 0)]
    pub max_cost_repeat: u32,

    /// `Type:N` minimum quota; may repeat.
    #[arg(long = "min-type", value_delimiter = ',')]
    pub min_type: Vec<String>,

    /// `Type:N` maximum quota; may repeat.
    #[arg(long = "max-type", value_delimiter = ',')]
    pub max_type: Vec<String>,

    /// Number of general-pile prefixes considered before falling back
    /// further into the shuffled stream.
    #[arg(long, default_value_t = 0)]
    pub max_prefixes: u32,
}

/// Parses `Type:N` pairs from repeated/comma-separated `--min-type`/
/// `--max-type` values.
pub fn parse_type_quotas(
    values: &[String],
) -> Result<std::collections::BTreeMap<String, u32>, crate::error::ConfigError> {
    let mut quotas = std::collections::BTreeMap::new();
    for value in values {
        let (type_name, n) = value
            .split_once(':')
            .ok_or_else(|| crate::error::ConfigError::MalformedTypeQuota(value.clone()))?;
        let n: u32 = n
            .parse()
            .map_err(|_| crate::error::ConfigError::MalformedTypeQuota(value.clone()))?;
        quotas.insert(type_name.to_string(), n);
    }
    Ok(quotas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type_quotas_accepts_type_colon_n() {
        let quotas = parse_type_quotas(&["Action:3".to_string(), "Treasure:1".to_string()]).unwrap();
        assert_eq!(quotas.get("Action"), Some(&3));
        assert_eq!(quotas.get("Treasure"), Some(&1));
    }

    #[test]
    fn parse_type_quotas_rejects_missing_colon() {
        assert!(parse_type_quotas(&["Action3".to_string()]).is_err());
    }
}
