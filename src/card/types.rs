use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// A selectable card record as supplied by the external card-data source.
///
/// The core never mutates these; a pool is an immutable snapshot for the
/// duration of one build call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    /// Color identity as a WUBRG string, e.g. "UR" or "" for colorless.
    #[serde(default)]
    pub color_identity: String,
    pub type_line: String,
    /// Themes this card supports (e.g. "Tokens", "Aristocrats").
    #[serde(default)]
    pub themes: Vec<String>,
    /// Legal in the target format. Illegal cards never enter a build.
    #[serde(default = "default_true")]
    pub legal: bool,
    /// Eligible to lead the deck (legendary creature or equivalent).
    #[serde(default)]
    pub can_command: bool,
    /// Basic lands are the one exception to the no-duplicates rule.
    #[serde(default)]
    pub is_basic_land: bool,
}

impl Card {
    /// Whether every color in this card's identity appears in `identity`.
    pub fn fits_identity(&self, identity: &str) -> bool {
        self.color_identity.chars().all(|c| identity.contains(c))
    }

    /// Whether this card carries the given canon-folded theme.
    pub fn has_theme(&self, folded_theme: &str) -> bool {
        self.themes
            .iter()
            .any(|t| crate::combos::canon_fold(t) == folded_theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, identity: &str) -> Card {
        Card {
            name: name.to_string(),
            color_identity: identity.to_string(),
            type_line: "Creature".to_string(),
            themes: vec!["Tokens".to_string()],
            legal: true,
            can_command: false,
            is_basic_land: false,
        }
    }

    #[test]
    fn test_fits_identity() {
        assert!(card("x", "UR").fits_identity("WUBRG"));
        assert!(card("x", "UR").fits_identity("UR"));
        assert!(!card("x", "UR").fits_identity("U"));
        assert!(card("x", "").fits_identity(""));
        assert!(card("x", "").fits_identity("G"));
    }

    #[test]
    fn test_has_theme_is_case_insensitive() {
        let c = card("x", "G");
        assert!(c.has_theme("tokens"));
        assert!(!c.has_theme("aristocrats"));
    }

    #[test]
    fn test_legal_defaults_to_true() {
        let c: Card = serde_json::from_str(
            r#"{"name":"Llanowar Elves","type_line":"Creature — Elf Druid","color_identity":"G"}"#,
        )
        .unwrap();
        assert!(c.legal);
        assert!(!c.can_command);
        assert!(!c.is_basic_land);
    }
}
