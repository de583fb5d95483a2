//! Client configuration.
//!
//! Fetched once at startup from a static JSON path; every field has a
//! default matching the deployed site so a missing or partial file still
//! yields a working client.

use crate::donation::DEFAULT_DONATION_STEP;
use crate::view::ReviewWindow;
use db_api_types::Wei;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Deployed DragonBlock contract address.
    pub dragonblock_address: String,
    /// Static path of the DragonBlock interface descriptor (JSON with `abi`).
    pub dragonblock_descriptor: String,
    /// Deployed DragonBlockOracle contract address.
    pub oracle_address: String,
    pub oracle_descriptor: String,
    /// Base URL of the metadata store; empty means same-origin.
    pub metadata_base_url: String,
    /// Donation amounts must be positive multiples of this step.
    pub donation_step: Wei,
    pub review_window: ReviewWindow,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            dragonblock_address: "0x3FD241aeE6Fc04d898f4f2b3fCC838A2b19f6949".to_owned(),
            dragonblock_descriptor: "/static/ContractsJSON/DragonBlock.json".to_owned(),
            oracle_address: "0x95cA6d20eB60Cc40E25c0b043ce1f8940eF4daB2".to_owned(),
            oracle_descriptor: "/static/ContractsJSON/DragonBlockOracle.json".to_owned(),
            metadata_base_url: String::new(),
            donation_step: DEFAULT_DONATION_STEP,
            review_window: ReviewWindow::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a config document, falling back to defaults when the text is
    /// missing or malformed (the page must still come up).
    pub fn from_json_or_default(text: Option<&str>) -> ClientConfig {
        text.and_then(|t| serde_json::from_str(t).ok())
            .unwrap_or_default()
    }

    pub fn metadata_url(&self, path: &str) -> String {
        format!("{}{}", self.metadata_base_url.trim_end_matches('/'), path)
    }
}
