use crate::card::{Card, CandidatePool};
use crate::combos::canon_fold;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Attempt cap for the soft-constraint selection loop. Twenty redraws is
/// enough for the theme-fraction target on realistic pools, and the cap is
/// the sole bound that shapes the returned decklist.
pub const MAX_ATTEMPTS: u32 = 20;

/// Wall-clock budget for the selection loop. Overrunning it is surfaced
/// through the `timeout_hit` diagnostic; it never cuts the loop short,
/// which would tie the decklist to machine load.
pub const ATTEMPT_BUDGET: Duration = Duration::from_millis(250);

/// Share of non-land picks that should carry the active theme.
pub const DEFAULT_MIN_THEME_FRACTION: f64 = 0.33;

/// Themes longer than this are rejected outright.
pub const THEME_MAX_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("constraints impossible: only {pool_size} candidates after filtering")]
    ConstraintsImpossible { pool_size: usize },
    #[error("commander not in pool: {0}")]
    UnknownCommander(String),
    #[error("keep-commander reroll requires a commander")]
    MissingCommanderLock,
    #[error("state codec error: {0}")]
    Codec(#[from] crate::state::StateCodecError),
}

impl BuildError {
    /// HTTP-style status for the web layer.
    pub fn status(&self) -> u16 {
        match self {
            BuildError::ConstraintsImpossible { .. } => 422,
            BuildError::UnknownCommander(_) => 422,
            BuildError::MissingCommanderLock => 422,
            BuildError::Codec(_) => 400,
        }
    }

    /// Structured error body in the shape the web layer reports.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            BuildError::ConstraintsImpossible { pool_size } => serde_json::json!({
                "status": self.status(),
                "detail": {"error": "constraints_impossible", "pool_size": pool_size},
            }),
            BuildError::UnknownCommander(name) => serde_json::json!({
                "status": self.status(),
                "detail": {"error": "unknown_commander", "commander": name},
            }),
            BuildError::MissingCommanderLock => serde_json::json!({
                "status": self.status(),
                "detail": {"error": "missing_commander_lock"},
            }),
            BuildError::Codec(e) => serde_json::json!({
                "status": self.status(),
                "detail": {"error": "invalid_token", "message": e.to_string()},
            }),
        }
    }
}

/// Soft requirements for one build call. Immutable once passed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_min_candidates: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_theme_fraction: Option<f64>,
}

/// Selection loop outcome, reported on every build regardless of result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub attempts: u32,
    pub timeout_hit: bool,
    pub retries_exhausted: bool,
}

/// Validate a requested theme. Returns the trimmed value if acceptable,
/// None if it should be treated as absent. Rejection is absorbed, never an
/// error: themes arrive from query strings and must not take a build down.
pub fn sanitize_theme(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > THEME_MAX_LEN {
        return None;
    }
    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '\'' | ',' | '&'));
    if allowed {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// How a requested theme was resolved against the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeResolution {
    /// The active theme, echoed back to the caller. None when no theme was
    /// requested, the request was rejected, or the pool does not know it.
    pub theme: Option<String>,
    /// Canon-folded form used for matching while the theme is active.
    pub folded: Option<String>,
    pub fallback: bool,
    /// The requested value when a known-good string fell back; never echoes
    /// a sanitization-rejected value.
    pub original_theme: Option<String>,
}

impl ThemeResolution {
    fn none() -> Self {
        ThemeResolution {
            theme: None,
            folded: None,
            fallback: false,
            original_theme: None,
        }
    }
}

/// Resolve an optional requested theme: sanitize, then check the pool
/// actually carries it. Unknown or rejected themes put the build on the
/// themeless fallback path instead of failing it.
pub fn resolve_theme(pool: &CandidatePool, requested: Option<&str>) -> ThemeResolution {
    let raw = match requested {
        Some(r) => r,
        None => return ThemeResolution::none(),
    };

    let sanitized = match sanitize_theme(raw) {
        Some(s) => s,
        None => {
            return ThemeResolution {
                theme: None,
                folded: None,
                fallback: true,
                original_theme: None,
            }
        }
    };

    let folded = canon_fold(&sanitized);
    if pool.knows_theme(&folded) {
        ThemeResolution {
            theme: Some(sanitized),
            folded: Some(folded),
            fallback: false,
            original_theme: None,
        }
    } else {
        ThemeResolution {
            theme: None,
            folded: None,
            fallback: true,
            original_theme: Some(sanitized),
        }
    }
}

/// Filter the pool down to commander candidates under the active theme and
/// enforce any declared minimum. A post-filter pool smaller than
/// `require_min_candidates` (or empty) is a hard, caller-reportable failure.
pub fn commander_candidates<'a>(
    pool: &'a CandidatePool,
    folded_theme: Option<&str>,
    constraints: &BuildConstraints,
) -> Result<Vec<&'a Card>, BuildError> {
    let candidates: Vec<&Card> = pool
        .cards()
        .iter()
        .filter(|c| c.legal && c.can_command)
        .filter(|c| match folded_theme {
            Some(theme) => c.has_theme(theme),
            None => true,
        })
        .collect();

    let minimum = constraints.require_min_candidates.unwrap_or(1);
    if candidates.len() < minimum.max(1) {
        return Err(BuildError::ConstraintsImpossible {
            pool_size: candidates.len(),
        });
    }

    Ok(candidates)
}
