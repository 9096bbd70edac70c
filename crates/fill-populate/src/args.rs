//! Common CLI argument definitions shared by all populate commands.

use clap::Args;
use fill_core::Locale;
use std::path::PathBuf;

/// Per-model count override given as `MODEL=N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountOverride {
    pub model: String,
    pub count: i64,
}

impl std::str::FromStr for CountOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (model, count) = s
            .split_once('=')
            .ok_or_else(|| format!("expected MODEL=COUNT, got '{s}'"))?;
        let model = model.trim();
        if model.is_empty() {
            return Err(format!("missing model name in '{s}'"));
        }
        let count = count
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid count in '{s}': {e}"))?;
        Ok(Self {
            model: model.to_string(),
            count,
        })
    }
}

/// Common arguments shared by all populate commands.
///
/// Used by every backend subcommand (memory, PostgreSQL, MySQL) so they
/// share one CLI surface.
#[derive(Args, Clone, Debug)]
pub struct CommonPopulateArgs {
    /// Path to fill plan YAML file
    #[arg(long, short = 'p')]
    pub plan: PathBuf,

    /// Random seed for deterministic generation (overrides the plan's seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the count of one model, e.g. `--count users=100` (repeatable)
    #[arg(long = "count", value_name = "MODEL=N")]
    pub counts: Vec<CountOverride>,

    /// Faker locale for every model, e.g. `fr_FR` (overrides the plan's)
    #[arg(long)]
    pub locale: Option<Locale>,
}
