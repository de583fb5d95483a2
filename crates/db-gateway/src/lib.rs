//! Contract gateway seam.
//!
//! Defines the traits the domain layer talks through, the chain error
//! taxonomy, and the revert-reason decoding shared by every implementation.
//! The browser frontend provides the wallet-backed implementation; tests use
//! in-memory fakes.

use async_trait::async_trait;
use db_api_types::{AccountAddress, CampaignId, CampaignMetadata, SaveCampaignRequest, Wei};
use serde_json::Value;
use thiserror::Error;

/// Marker the node embeds before the contract-supplied require() message.
pub const REVERT_REASON_MARKER: &str = "Reason given: ";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("no wallet provider is installed")]
    ProviderUnavailable,
    #[error("wallet authorization was denied")]
    AuthorizationDenied,
    #[error("failed to load contract interface: {0}")]
    InterfaceFetch(String),
    #[error("transaction rejected in the wallet")]
    TransactionRejected,
    #[error("contract reverted: {reason}")]
    Revert { reason: String },
    #[error("network error: {0}")]
    Network(String),
}

impl ChainError {
    /// Classify a provider error message.
    ///
    /// Revert messages carry the contract's require() text after a known
    /// marker; everything else is treated as a network-level failure. User
    /// rejection is signalled by the EIP-1193 error code, which callers map
    /// before reaching here.
    pub fn from_provider_message(message: &str) -> ChainError {
        if message.contains("revert") {
            let reason = message
                .split_once(REVERT_REASON_MARKER)
                .map(|(_, tail)| tail.trim().trim_end_matches('.').to_owned())
                .unwrap_or_else(|| message.to_owned());
            ChainError::Revert { reason }
        } else {
            ChainError::Network(message.to_owned())
        }
    }

    /// Only validation-style failures keep the page state; everything in this
    /// taxonomy is surfaced and control returns to the user for retry.
    pub fn user_message(&self) -> String {
        match self {
            ChainError::Revert { reason } => format!("Error: {reason}"),
            other => format!("Error: {other}"),
        }
    }
}

/// Options for a state-changing transaction.
#[derive(Debug, Clone)]
pub struct SendOpts {
    pub from: AccountAddress,
    pub value: Option<Wei>,
}

impl SendOpts {
    pub fn from_account(account: &AccountAddress) -> SendOpts {
        SendOpts {
            from: account.clone(),
            value: None,
        }
    }

    pub fn with_value(account: &AccountAddress, value: Wei) -> SendOpts {
        SendOpts {
            from: account.clone(),
            value: Some(value),
        }
    }
}

/// Events emitted by a mined transaction, keyed by event name.
#[derive(Debug, Clone, Default)]
pub struct TxOutcome {
    pub events: Value,
}

impl TxOutcome {
    /// Pull a named field out of an emitted event's return values.
    pub fn event_field(&self, event: &str, field: &str) -> Option<&Value> {
        self.events.get(event)?.get("returnValues")?.get(field)
    }

    /// Decode an emitted campaign id (`CampaignCreation.campaignId`-style
    /// fields arrive as decimal strings).
    pub fn event_campaign_id(&self, event: &str, field: &str) -> Option<CampaignId> {
        match self.event_field(event, field)? {
            Value::String(s) => s.trim().parse().ok().map(CampaignId),
            Value::Number(n) => n.as_u64().map(CampaignId),
            _ => None,
        }
    }
}

/// A bound contract: interface descriptor plus deployed address.
///
/// `call` is a read-only invocation; `send` signs, submits, and awaits
/// inclusion. Not `Send` because the browser implementation wraps JS values.
#[async_trait(?Send)]
pub trait ContractApi {
    async fn call(&self, method: &str, args: &[Value]) -> Result<Value, ChainError>;
    async fn send(&self, method: &str, args: &[Value], opts: SendOpts) -> Result<TxOutcome, ChainError>;
}

/// Client for the off-chain metadata store.
///
/// Plain request/response, no retry or backoff; HTTP failures map to
/// `ChainError::Network` and callers log rather than surface them.
#[async_trait(?Send)]
pub trait MetadataApi {
    async fn save_campaign(&self, request: &SaveCampaignRequest) -> Result<(), ChainError>;
    async fn campaigns_by_ids(&self, ids: &[CampaignId]) -> Result<Vec<CampaignMetadata>, ChainError>;
    async fn is_registered(&self, address: &AccountAddress) -> Result<bool, ChainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_reason_is_extracted_after_marker() {
        let message = "Returned error: VM Exception while processing transaction: \
                       revert Campaign limit reached -- Reason given: Campaign limit reached.";
        let err = ChainError::from_provider_message(message);
        assert_eq!(
            err,
            ChainError::Revert {
                reason: "Campaign limit reached".to_owned()
            }
        );
    }

    #[test]
    fn revert_without_marker_keeps_full_message() {
        let message = "execution revert without a reason string";
        match ChainError::from_provider_message(message) {
            ChainError::Revert { reason } => assert_eq!(reason, message),
            other => panic!("expected revert, got {other:?}"),
        }
    }

    #[test]
    fn non_revert_messages_become_network_errors() {
        let err = ChainError::from_provider_message("connection refused");
        assert_eq!(err, ChainError::Network("connection refused".to_owned()));
    }

    #[test]
    fn tx_outcome_decodes_emitted_campaign_id() {
        let outcome = TxOutcome {
            events: serde_json::json!({
                "CampaignCreation": {
                    "returnValues": { "campaignId": "17" }
                }
            }),
        };
        assert_eq!(
            outcome.event_campaign_id("CampaignCreation", "campaignId"),
            Some(CampaignId(17))
        );
        assert_eq!(outcome.event_campaign_id("CampaignCreation", "owner"), None);
        assert_eq!(outcome.event_campaign_id("Missing", "campaignId"), None);
    }
}
