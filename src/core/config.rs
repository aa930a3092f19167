//! Tactics configuration with documented policy constants
//!
//! Everything the turn pipeline treats as policy rather than mechanism lives
//! here: which objectives are considered, how their travel costs are
//! weighted, and how the combat sweep picks a target.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, TacticsError};
use crate::core::types::Team;

/// Largest squad the exhaustive assignment search will accept.
///
/// The search enumerates `U^U` rank combinations; 6^6 is already ~47k.
pub const MAX_SEARCH_UNITS_LIMIT: usize = 6;

/// A provider of non-combat candidate objectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveSource {
    /// Ordinary control points not held by our team
    ControlPoints,
    /// Mainframe control points not held by our team
    Mainframes,
    /// Every pickup currently on the map
    Pickups,
}

/// How the combat sweep chooses between several enemies in range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatTargeting {
    /// Every in-range enemy overwrites the previous choice; the last one in
    /// roster order wins.
    #[default]
    LastInRoster,
    /// The in-range enemy with the shortest path wins; earlier roster slots
    /// win ties.
    NearestByPath,
}

/// Travel-cost multipliers per objective kind.
///
/// Lower multipliers win ties on raw distance, which gives the preference
/// order pickups > mainframes > control points > combat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostMultipliers {
    pub pickup: f64,
    pub mainframe: f64,
    pub control_point: f64,
    /// Reserved. Combat objectives are picked by the combat sweep and the idle
    /// fallback, never by the optimizer, so this weight is validated but not
    /// applied.
    pub shoot: f64,
}

impl Default for CostMultipliers {
    fn default() -> Self {
        Self {
            pickup: 1.0,
            mainframe: 1.1,
            control_point: 1.2,
            shoot: 1.3,
        }
    }
}

impl CostMultipliers {
    fn all(&self) -> [(&'static str, f64); 4] {
        [
            ("pickup", self.pickup),
            ("mainframe", self.mainframe),
            ("control_point", self.control_point),
            ("shoot", self.shoot),
        ]
    }
}

/// Complete configuration for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TacticsConfig {
    /// The team we are playing. Supplied at session start, never inferred,
    /// so a config file without it does not load.
    pub team: Team,

    /// Candidate providers, concatenated in this order.
    ///
    /// Listing a source twice makes its objectives appear twice in the
    /// candidate list (see [`TacticsConfig::legacy`]).
    #[serde(default = "default_objective_sources")]
    pub objective_sources: Vec<ObjectiveSource>,

    /// Weighting applied to path lengths during assignment
    #[serde(default)]
    pub multipliers: CostMultipliers,

    /// Target choice when several enemies are in range
    #[serde(default)]
    pub combat_targeting: CombatTargeting,

    /// Upper bound on units handed to the exhaustive assignment search
    #[serde(default = "default_max_search_units")]
    pub max_search_units: usize,
}

fn default_objective_sources() -> Vec<ObjectiveSource> {
    vec![
        ObjectiveSource::ControlPoints,
        ObjectiveSource::Mainframes,
        ObjectiveSource::Pickups,
    ]
}

fn default_max_search_units() -> usize {
    4
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            team: Team::Blue,
            objective_sources: default_objective_sources(),
            multipliers: CostMultipliers::default(),
            combat_targeting: CombatTargeting::LastInRoster,
            max_search_units: default_max_search_units(),
        }
    }
}

impl TacticsConfig {
    /// Create a new config with default values for `team`
    pub fn new(team: Team) -> Self {
        Self {
            team,
            ..Self::default()
        }
    }

    /// Candidate list as the first tournament build assembled it: control
    /// points twice and no mainframes.
    pub fn legacy(team: Team) -> Self {
        Self {
            team,
            objective_sources: vec![
                ObjectiveSource::ControlPoints,
                ObjectiveSource::ControlPoints,
                ObjectiveSource::Pickups,
            ],
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: TacticsConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.objective_sources.is_empty() {
            return Err(TacticsError::InvalidConfig(
                "objective_sources must list at least one source".into(),
            ));
        }

        for (name, value) in self.multipliers.all() {
            if !value.is_finite() || value <= 0.0 {
                return Err(TacticsError::InvalidConfig(format!(
                    "multiplier {} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        if self.max_search_units == 0 || self.max_search_units > MAX_SEARCH_UNITS_LIMIT {
            return Err(TacticsError::InvalidConfig(format!(
                "max_search_units ({}) must be in 1..={}",
                self.max_search_units, MAX_SEARCH_UNITS_LIMIT
            )));
        }

        Ok(())
    }
}

/// Load and validate a config from a TOML file
pub fn load_config(path: &Path) -> Result<TacticsConfig> {
    let contents = fs::read_to_string(path)?;
    let config = TacticsConfig::from_toml_str(&contents)?;
    tracing::debug!("Loaded tactics config from {:?}", path);
    Ok(config)
}
