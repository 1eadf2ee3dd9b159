use crate::build::constraints::{
    commander_candidates, resolve_theme, BuildConstraints, BuildError, Diagnostics,
    ATTEMPT_BUDGET, DEFAULT_MIN_THEME_FRACTION, MAX_ATTEMPTS,
};
use crate::build::export::{export_artifacts, BuildArtifacts};
use crate::card::{Card, CandidatePool};
use crate::combos::{canon_fold, ComboList, SynergyList};
use crate::rng::{derive_seed, generate_seed, BuildRng, SeedInput, SEED_MASK};
use crate::state::{self, BuildState, RandomState};
use serde::Serialize;
use std::time::Instant;

/// Cards drawn alongside the commander.
pub const DECK_SIZE: usize = 99;

/// A build request as it arrives from the web layer.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub seed: Option<SeedInput>,
    pub theme: Option<String>,
    pub constraints: Option<BuildConstraints>,
}

/// Reroll behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerollMode {
    /// Advance the seed and rebuild everything.
    NewCommander,
    /// Advance the seed but pin the caller's commander; only the decklist
    /// is redrawn.
    KeepCommander,
}

/// A completed build, ready for the web layer to render or export.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub seed: u64,
    pub commander: String,
    pub decklist: Vec<String>,
    pub theme: Option<String>,
    pub fallback: bool,
    pub original_theme: Option<String>,
    pub diagnostics: Diagnostics,
    pub permalink: String,
    pub artifacts: BuildArtifacts,
}

/// Build a full deck for the request. A pure function of (seed, theme,
/// constraints, pool): equal inputs over an unchanged pool give the
/// identical commander and ordered decklist.
pub fn full_build(
    request: &BuildRequest,
    pool: &CandidatePool,
    combo_table: &ComboList,
    synergy_table: &SynergyList,
) -> Result<BuildResult, BuildError> {
    let seed = request
        .seed
        .as_ref()
        .map(derive_seed)
        .unwrap_or_else(generate_seed);
    build_with_seed(
        seed,
        request.theme.as_deref(),
        request.constraints.as_ref(),
        None,
        pool,
        combo_table,
        synergy_table,
    )
}

/// Reroll a prior build: the seed advances by exactly one, and in
/// `KeepCommander` mode the supplied commander is carried through unchanged
/// while the decklist is redrawn.
pub fn reroll(
    prior_seed: u64,
    commander: Option<&str>,
    mode: RerollMode,
    theme: Option<&str>,
    constraints: Option<&BuildConstraints>,
    pool: &CandidatePool,
    combo_table: &ComboList,
    synergy_table: &SynergyList,
) -> Result<BuildResult, BuildError> {
    let seed = prior_seed.wrapping_add(1) & SEED_MASK;
    let pinned = match mode {
        RerollMode::NewCommander => None,
        RerollMode::KeepCommander => {
            Some(commander.ok_or(BuildError::MissingCommanderLock)?)
        }
    };
    build_with_seed(seed, theme, constraints, pinned, pool, combo_table, synergy_table)
}

fn build_with_seed(
    seed: u64,
    theme: Option<&str>,
    constraints: Option<&BuildConstraints>,
    pinned_commander: Option<&str>,
    pool: &CandidatePool,
    combo_table: &ComboList,
    synergy_table: &SynergyList,
) -> Result<BuildResult, BuildError> {
    let default_constraints = BuildConstraints::default();
    let active = constraints.unwrap_or(&default_constraints);
    let resolution = resolve_theme(pool, theme);

    // One continuous stream drives the whole build: commander first, then
    // the decklist. Splitting streams would silently change every permalink.
    let mut rng = BuildRng::new(Some(seed));

    let commander: Card = match pinned_commander {
        Some(name) => {
            let card = pool
                .get_card(name)
                .map_err(|_| BuildError::UnknownCommander(name.to_string()))?;
            // Byte-identical echo of the caller's lock, not the pool casing.
            let mut card = card.clone();
            card.name = name.to_string();
            card
        }
        None => {
            let candidates = commander_candidates(pool, resolution.folded.as_deref(), active)?;
            let chosen = rng
                .choose(&candidates)
                .ok_or(BuildError::ConstraintsImpossible { pool_size: 0 })?;
            (*chosen).clone()
        }
    };

    let (decklist, diagnostics) = draw_decklist(
        pool,
        &commander,
        resolution.folded.as_deref(),
        active.min_theme_fraction.unwrap_or(DEFAULT_MIN_THEME_FRACTION),
        &mut rng,
    );

    let permalink = state::encode(&BuildState {
        commander: Some(commander.name.clone()),
        locks: match pinned_commander {
            Some(name) => vec![name.to_string()],
            None => Vec::new(),
        },
        random: Some(RandomState {
            seed,
            theme: resolution.theme.clone(),
            constraints: constraints.cloned(),
        }),
        ..Default::default()
    })?;

    let artifacts = export_artifacts(
        &commander,
        &decklist,
        seed,
        resolution.theme.as_deref(),
        combo_table,
        synergy_table,
    );

    Ok(BuildResult {
        seed,
        commander: commander.name,
        decklist,
        theme: resolution.theme,
        fallback: resolution.fallback,
        original_theme: resolution.original_theme,
        diagnostics,
        permalink,
        artifacts,
    })
}

/// Draw one decklist under the bounded-attempt soft-constraint loop.
///
/// Each attempt shuffles the candidate order and takes unique cards until
/// the deck is full, topping up with basic lands when the pool runs short.
/// With a theme active, attempts repeat until the themed share of non-land
/// picks reaches `min_fraction` or the attempt cap is hit; the best attempt
/// seen is returned either way. The attempt cap is the only bound that
/// shapes the result: each attempt is one pass over the pool, so the cap is
/// already a hard work bound, and letting wall-clock time cut the loop
/// short would make the decklist depend on machine load instead of
/// (seed, theme, constraints, pool). The time budget is reported through
/// `timeout_hit` only.
fn draw_decklist(
    pool: &CandidatePool,
    commander: &Card,
    folded_theme: Option<&str>,
    min_fraction: f64,
    rng: &mut BuildRng,
) -> (Vec<String>, Diagnostics) {
    let commander_key = canon_fold(&commander.name);
    let candidates: Vec<&Card> = pool
        .cards()
        .iter()
        .filter(|c| c.legal)
        .filter(|c| c.fits_identity(&commander.color_identity))
        .filter(|c| canon_fold(&c.name) != commander_key)
        .collect();

    let start = Instant::now();
    let mut attempts = 0u32;
    let mut retries_exhausted = false;
    let mut best: Option<(Vec<String>, f64)> = None;

    loop {
        attempts += 1;
        let picks = draw_once(&candidates, rng);
        let fraction = theme_fraction(&picks, folded_theme);
        let satisfied = folded_theme.is_none() || fraction >= min_fraction;

        let names: Vec<String> = picks.iter().map(|c| c.name.clone()).collect();
        if best.as_ref().map_or(true, |(_, f)| fraction > *f) {
            best = Some((names, fraction));
        }

        if satisfied {
            break;
        }
        if attempts >= MAX_ATTEMPTS {
            retries_exhausted = true;
            break;
        }
    }

    let timeout_hit = start.elapsed() >= ATTEMPT_BUDGET;
    let (decklist, _) = best.unwrap_or_default();
    (
        decklist,
        Diagnostics {
            attempts,
            timeout_hit,
            retries_exhausted,
        },
    )
}

/// One pass over a shuffled candidate order: unique cards first, then basic
/// lands repeated round-robin if the pool cannot fill the deck. Basics are
/// the only duplicates a deck may contain.
fn draw_once<'a>(candidates: &[&'a Card], rng: &mut BuildRng) -> Vec<&'a Card> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    rng.shuffle(&mut order);

    let mut deck: Vec<&Card> = Vec::with_capacity(DECK_SIZE);
    for &idx in &order {
        if deck.len() == DECK_SIZE {
            return deck;
        }
        deck.push(candidates[idx]);
    }

    let basics: Vec<&Card> = order
        .iter()
        .map(|&i| candidates[i])
        .filter(|c| c.is_basic_land)
        .collect();
    if !basics.is_empty() {
        let mut i = 0;
        while deck.len() < DECK_SIZE {
            deck.push(basics[i % basics.len()]);
            i += 1;
        }
    }

    deck
}

fn theme_fraction(picks: &[&Card], folded_theme: Option<&str>) -> f64 {
    let theme = match folded_theme {
        Some(t) => t,
        None => return 1.0,
    };
    let nonland: Vec<&&Card> = picks.iter().filter(|c| !c.is_basic_land).collect();
    if nonland.is_empty() {
        return 0.0;
    }
    let themed = nonland.iter().filter(|c| c.has_theme(theme)).count();
    themed as f64 / nonland.len() as f64
}
