pub mod config;
pub mod paths;

pub use config::{EngineConfig, LogRecordConfig, ModerationConfig, OverrideConfig, PosterConfig, RankingConfig};
pub use paths::PathManager;
