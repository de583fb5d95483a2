//! The campaign entity: on-chain fields merged with off-chain metadata.

use db_api_types::{CampaignId, CampaignStatus, ChainCampaign, Wei};

const SECS_PER_WEEK: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: CampaignId,
    /// Off-chain, empty when the metadata store has no row for this id.
    pub title: String,
    /// Off-chain, empty when the metadata store has no row for this id.
    pub description: String,
    /// Unix seconds, set by the contract at creation.
    pub creation_time: u64,
    pub week_duration: u64,
    pub wei_limit: Wei,
    pub donated_wei: Wei,
    pub status: CampaignStatus,
    /// Unix seconds of the last disapproval-with-remediation, when any.
    pub revision_time: Option<u64>,
}

impl Campaign {
    /// Decode a contract record. Returns `None` when a numeric field or the
    /// status code is malformed; callers skip such rows rather than fail the
    /// whole batch.
    pub fn from_chain(raw: &ChainCampaign) -> Option<Campaign> {
        let revision_time = match raw.revision_time.as_deref() {
            None => None,
            Some(s) => match s.trim().parse::<u64>().ok()? {
                0 => None,
                t => Some(t),
            },
        };

        Some(Campaign {
            id: CampaignId(raw.id.trim().parse().ok()?),
            title: String::new(),
            description: String::new(),
            creation_time: raw.creation_time.trim().parse().ok()?,
            week_duration: raw.week_duration.trim().parse().ok()?,
            wei_limit: raw.wei_limit,
            donated_wei: raw.donated_wei,
            status: CampaignStatus::from_code(&raw.status)?,
            revision_time,
        })
    }

    /// Unix seconds at which the campaign's funding period closes.
    pub fn end_time(&self) -> u64 {
        self.creation_time + self.week_duration * SECS_PER_WEEK
    }

    /// Wei still acceptable before the contribution limit is reached.
    pub fn remaining_wei(&self) -> Wei {
        Wei(self.wei_limit.0.saturating_sub(self.donated_wei.0))
    }

    /// The timestamp the review window is measured from: revision time for
    /// campaigns under revision, creation time otherwise.
    pub fn review_anchor(&self) -> u64 {
        match self.status {
            CampaignStatus::Revision => self.revision_time.unwrap_or(self.creation_time),
            _ => self.creation_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: &str) -> ChainCampaign {
        ChainCampaign {
            id: "3".to_owned(),
            creation_time: "1700000000".to_owned(),
            week_duration: "8".to_owned(),
            wei_limit: Wei(1_000_000_000_000_000_000),
            donated_wei: Wei(400_000_000_000_000_000),
            status: status.to_owned(),
            revision_time: Some("0".to_owned()),
        }
    }

    #[test]
    fn decodes_a_well_formed_chain_record() {
        let campaign = Campaign::from_chain(&raw("1")).unwrap();
        assert_eq!(campaign.id, CampaignId(3));
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.creation_time, 1_700_000_000);
        assert_eq!(campaign.revision_time, None);
        assert_eq!(campaign.end_time(), 1_700_000_000 + 8 * 7 * 86_400);
        assert_eq!(campaign.remaining_wei(), Wei(600_000_000_000_000_000));
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let mut bad_id = raw("1");
        bad_id.id = "not-a-number".to_owned();
        assert!(Campaign::from_chain(&bad_id).is_none());

        let bad_status = raw("9");
        assert!(Campaign::from_chain(&bad_status).is_none());
    }

    #[test]
    fn review_anchor_follows_revision_status() {
        let mut record = raw("3");
        record.revision_time = Some("1700600000".to_owned());
        let campaign = Campaign::from_chain(&record).unwrap();
        assert_eq!(campaign.review_anchor(), 1_700_600_000);

        let pending = Campaign::from_chain(&raw("0")).unwrap();
        assert_eq!(pending.review_anchor(), pending.creation_time);
    }
}
