use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComboTableError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid combo table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A curated two-card combo. Identity is the unordered canonicalized pair
/// of names; everything else is annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboPair {
    pub a: String,
    pub b: String,
    #[serde(default)]
    pub cheap_early: bool,
    #[serde(default)]
    pub setup_dependent: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A softer two-card relationship without the timing flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyPair {
    pub a: String,
    pub b: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Versioned combo table as published by the curation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboList {
    pub list_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub pairs: Vec<ComboPair>,
}

/// Versioned synergy table, same envelope as the combo table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyList {
    pub list_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub pairs: Vec<SynergyPair>,
}

impl ComboList {
    /// Parse a combo table document. Missing `list_version`, missing or
    /// null `a`/`b`, or wrong field types fail hard rather than skipping.
    pub fn from_json(content: &str) -> Result<Self, ComboTableError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ComboTableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl SynergyList {
    pub fn from_json(content: &str) -> Result<Self, ComboTableError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ComboTableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let list = ComboList::from_json(
            r#"{
                "list_version": "2025-08-01",
                "generated_at": "2025-08-01T00:00:00Z",
                "pairs": [
                    {"a": "Kiki-Jiki, Mirror Breaker", "b": "Zealous Conscripts",
                     "cheap_early": false, "setup_dependent": true,
                     "tags": ["infinite-creatures"], "notes": "classic"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(list.list_version, "2025-08-01");
        assert_eq!(list.pairs.len(), 1);
        assert!(list.pairs[0].setup_dependent);
    }

    #[test]
    fn test_absent_booleans_and_tags_default() {
        let list = ComboList::from_json(
            r#"{"list_version": "1", "pairs": [{"a": "A", "b": "B"}]}"#,
        )
        .unwrap();
        let pair = &list.pairs[0];
        assert!(!pair.cheap_early);
        assert!(!pair.setup_dependent);
        assert!(pair.tags.is_empty());
        assert!(pair.notes.is_none());
    }

    #[test]
    fn test_missing_list_version_fails() {
        let err = ComboList::from_json(r#"{"pairs": []}"#);
        assert!(matches!(err, Err(ComboTableError::Parse(_))));
    }

    #[test]
    fn test_null_member_name_fails() {
        let err = ComboList::from_json(
            r#"{"list_version": "1", "pairs": [{"a": null, "b": "B"}]}"#,
        );
        assert!(matches!(err, Err(ComboTableError::Parse(_))));
    }

    #[test]
    fn test_wrong_type_fails() {
        let err = ComboList::from_json(r#"{"list_version": 3, "pairs": []}"#);
        assert!(matches!(err, Err(ComboTableError::Parse(_))));
    }

    #[test]
    fn test_synergy_document() {
        let list = SynergyList::from_json(
            r#"{"list_version": "1",
                "pairs": [{"a": "Skullclamp", "b": "Krenko, Mob Boss",
                           "tags": ["card-advantage"]}]}"#,
        )
        .unwrap();
        assert_eq!(list.pairs[0].tags, vec!["card-advantage"]);
    }
}
