pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, CombatTargeting, CostMultipliers, ObjectiveSource, TacticsConfig};
pub use error::{Result, TacticsError};
pub use types::{CallSign, Direction, Point, Team, SQUAD_SIZE};
