use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wei per ETH (18 decimals).
pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AccountAddress(pub String);

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CampaignId(pub u64);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount in wei. Wei is the canonical unit at every interface boundary;
/// ETH appears only at the display edge.
///
/// Serialized as a decimal string because the wallet provider and the web3
/// stack stringify uint256 values, and u128 would lose precision in JSON
/// number form anyway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wei(pub u128);

impl Wei {
    pub fn checked_add(self, other: Wei) -> Option<Wei> {
        self.0.checked_add(other.0).map(Wei)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Wei {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u128>().map(Wei)
    }
}

impl Serialize for Wei {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct WeiVisitor;

impl Visitor<'_> for WeiVisitor {
    type Value = Wei;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal wei string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Wei, E> {
        v.parse().map_err(|_| E::custom(format!("invalid wei amount: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Wei, E> {
        Ok(Wei(v as u128))
    }
}

impl<'de> Deserialize<'de> for Wei {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Wei, D::Error> {
        deserializer.deserialize_any(WeiVisitor)
    }
}

/// Campaign lifecycle status, decoded from the contract's numeric code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CampaignStatus {
    Pending,
    Active,
    Disapproved,
    Revision,
    Banned,
    Ended,
}

impl CampaignStatus {
    /// Decode the uint code the contract stores (web3 stringifies it).
    pub fn from_code(code: &str) -> Option<CampaignStatus> {
        match code.trim() {
            "0" => Some(CampaignStatus::Pending),
            "1" => Some(CampaignStatus::Active),
            "2" => Some(CampaignStatus::Disapproved),
            "3" => Some(CampaignStatus::Revision),
            "4" => Some(CampaignStatus::Banned),
            "5" => Some(CampaignStatus::Ended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Pending => "Pending",
            CampaignStatus::Active => "Active",
            CampaignStatus::Disapproved => "Disapproved",
            CampaignStatus::Revision => "Revision",
            CampaignStatus::Banned => "Banned",
            CampaignStatus::Ended => "Ended",
        }
    }

    /// Terminal statuses expose no mutating actions and never transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CampaignStatus::Disapproved | CampaignStatus::Banned | CampaignStatus::Ended
        )
    }

    /// The monotonic lifecycle state machine.
    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Disapproved)
                | (Pending, Revision)
                | (Pending, Banned)
                | (Revision, Active)
                | (Revision, Banned)
                | (Active, Ended)
        )
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A campaign record as the contract returns it. All uint fields arrive as
/// decimal strings through the provider's JSON bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainCampaign {
    pub id: String,
    pub creation_time: String,
    pub week_duration: String,
    pub wei_limit: Wei,
    pub donated_wei: Wei,
    pub status: String,
    #[serde(default)]
    pub revision_time: Option<String>,
}

/// Off-chain title/description row keyed by the on-chain campaign id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampaignMetadata {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCampaignRequest {
    pub title: String,
    pub description: String,
    pub id: CampaignId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCampaignsRequest {
    pub campaign_ids: Vec<CampaignId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsRegisteredRequest {
    pub ethereum_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsRegisteredResponse {
    pub success: bool,
}
