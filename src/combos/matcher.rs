use crate::combos::canon::canon_fold;
use crate::combos::types::{ComboList, ComboPair, SynergyList, SynergyPair};
use serde::Serialize;
use std::collections::HashSet;

/// A combo found in a deck, carrying the table's original casing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedCombo {
    pub card_a: String,
    pub card_b: String,
    pub tags: Vec<String>,
    pub cheap_early: bool,
    pub setup_dependent: bool,
}

/// A synergy found in a deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedSynergy {
    pub card_a: String,
    pub card_b: String,
    pub tags: Vec<String>,
}

fn fold_names<'a, I>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(canon_fold)
        .filter(|n| !n.is_empty())
        .collect()
}

fn pair_present(set: &HashSet<String>, a: &str, b: &str) -> bool {
    set.contains(&canon_fold(a)) && set.contains(&canon_fold(b))
}

/// Match a deck's card names against a combo table.
///
/// Membership testing is canonicalized and case-insensitive; output keeps
/// table order and the table's own casing. Pair orientation is irrelevant:
/// the deck holding (b, a) still matches a table entry (a, b).
pub fn detect_combos<'a, I>(names: I, table: &ComboList) -> Vec<DetectedCombo>
where
    I: IntoIterator<Item = &'a str>,
{
    let set = fold_names(names);
    if set.is_empty() {
        return Vec::new();
    }

    table
        .pairs
        .iter()
        .filter(|p| pair_present(&set, &p.a, &p.b))
        .map(|p: &ComboPair| DetectedCombo {
            card_a: p.a.clone(),
            card_b: p.b.clone(),
            tags: p.tags.clone(),
            cheap_early: p.cheap_early,
            setup_dependent: p.setup_dependent,
        })
        .collect()
}

/// Match a deck's card names against a synergy table.
pub fn detect_synergies<'a, I>(names: I, table: &SynergyList) -> Vec<DetectedSynergy>
where
    I: IntoIterator<Item = &'a str>,
{
    let set = fold_names(names);
    if set.is_empty() {
        return Vec::new();
    }

    table
        .pairs
        .iter()
        .filter(|p| pair_present(&set, &p.a, &p.b))
        .map(|p: &SynergyPair| DetectedSynergy {
            card_a: p.a.clone(),
            card_b: p.b.clone(),
            tags: p.tags.clone(),
        })
        .collect()
}
