pub mod constraints;
pub mod export;
pub mod orchestrator;

pub use constraints::{
    sanitize_theme, BuildConstraints, BuildError, Diagnostics, ATTEMPT_BUDGET,
    DEFAULT_MIN_THEME_FRACTION, MAX_ATTEMPTS, THEME_MAX_LEN,
};
pub use export::{BuildArtifacts, BuildSummary, ComplianceRecord};
pub use orchestrator::{full_build, reroll, BuildRequest, BuildResult, RerollMode, DECK_SIZE};
