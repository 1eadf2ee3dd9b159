pub mod canon;
pub mod matcher;
pub mod types;

pub use canon::{canon, canon_fold};
pub use matcher::{detect_combos, detect_synergies, DetectedCombo, DetectedSynergy};
pub use types::{ComboList, ComboPair, ComboTableError, SynergyList, SynergyPair};
