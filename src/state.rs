use crate::build::constraints::BuildConstraints;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateCodecError {
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The randomness parameters of a build: everything needed to reproduce the
/// exact decklist against an unchanged pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomState {
    pub seed: u64,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub constraints: Option<BuildConstraints>,
}

/// The full reproducible state behind a permalink token.
///
/// Field order is fixed by the struct and maps are BTreeMaps, so the JSON
/// body is canonical: the same state always encodes to the same token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildState {
    #[serde(default)]
    pub commander: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bracket: Option<u8>,
    #[serde(default)]
    pub ideals: BTreeMap<String, u32>,
    #[serde(default)]
    pub tag_mode: Option<String>,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub locks: Vec<String>,
    #[serde(default)]
    pub random: Option<RandomState>,
}

/// Encode a build state as a URL-safe opaque token with no padding.
pub fn encode(state: &BuildState) -> Result<String, StateCodecError> {
    let json = serde_json::to_string(state)?;
    Ok(URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

/// Decode a permalink token back into its build state.
///
/// Tolerates padded input by stripping trailing `=` before decoding, so
/// tokens that passed through a re-padding proxy still parse.
pub fn decode(token: &str) -> Result<BuildState, StateCodecError> {
    let stripped = token.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(stripped.as_bytes())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}
