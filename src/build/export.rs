use crate::card::Card;
use crate::combos::{detect_combos, detect_synergies, ComboList, DetectedCombo, DetectedSynergy, SynergyList};
use chrono::Utc;
use serde::Serialize;

/// Deck-facing summary of one build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub seed: u64,
    pub commander: String,
    pub theme: Option<String>,
    pub color_identity: String,
    pub card_count: usize,
    pub generated_at: String,
}

/// Combos and synergies present in the finished deck, with a coarse score
/// used for bracket/legality review. Combos weigh double.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceRecord {
    pub combos: Vec<DetectedCombo>,
    pub synergies: Vec<DetectedSynergy>,
    pub score: u32,
}

/// The one artifact set a successful build emits.
#[derive(Debug, Clone, Serialize)]
pub struct BuildArtifacts {
    pub decklist_text: String,
    pub summary: BuildSummary,
    pub compliance: ComplianceRecord,
}

/// Render the decklist in "N Card Name" export form, commander first,
/// duplicates (basic lands) aggregated in first-appearance order.
fn render_decklist(commander: &str, decklist: &[String]) -> String {
    let mut counts: Vec<(usize, &str)> = Vec::new();
    for name in decklist {
        match counts.iter_mut().find(|(_, n)| n == name) {
            Some((count, _)) => *count += 1,
            None => counts.push((1, name)),
        }
    }

    let mut out = String::new();
    out.push_str(&format!("// Commander\n1 {}\n\n// Deck\n", commander));
    for (count, name) in counts {
        out.push_str(&format!("{} {}\n", count, name));
    }
    out
}

/// Produce the artifacts for one build. Called exactly once per successful
/// build; rerolls get a fresh set for the new deck, never a duplicate pair.
pub fn export_artifacts(
    commander: &Card,
    decklist: &[String],
    seed: u64,
    theme: Option<&str>,
    combo_table: &ComboList,
    synergy_table: &SynergyList,
) -> BuildArtifacts {
    let names: Vec<&str> = std::iter::once(commander.name.as_str())
        .chain(decklist.iter().map(|s| s.as_str()))
        .collect();
    let combos = detect_combos(names.iter().copied(), combo_table);
    let synergies = detect_synergies(names.iter().copied(), synergy_table);
    let score = combos.len() as u32 * 2 + synergies.len() as u32;

    BuildArtifacts {
        decklist_text: render_decklist(&commander.name, decklist),
        summary: BuildSummary {
            seed,
            commander: commander.name.clone(),
            theme: theme.map(|t| t.to_string()),
            color_identity: commander.color_identity.clone(),
            card_count: decklist.len() + 1,
            generated_at: Utc::now().to_rfc3339(),
        },
        compliance: ComplianceRecord {
            combos,
            synergies,
            score,
        },
    }
}
