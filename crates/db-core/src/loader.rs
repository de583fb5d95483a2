//! Campaign batch loading.
//!
//! Reads the on-chain batch through the gateway, collects ids, fetches the
//! off-chain title/description rows, and merges the two positionally: the
//! metadata store answers in the same order as the ids it was given.

use crate::campaign::Campaign;
use db_api_types::{AccountAddress, CampaignId, ChainCampaign};
use db_gateway::{ChainError, ContractApi, MetadataApi};
use serde_json::json;

/// Which on-chain enumeration to read.
#[derive(Debug, Clone)]
pub enum CampaignSource {
    /// `getCampaigns()`, the public batch.
    All,
    /// `getOwnedCampaigns(owner)`, campaigns created by one account.
    OwnedBy(AccountAddress),
}

/// Load and enrich a campaign batch. Output order matches the chain's
/// enumeration order. Malformed chain rows are skipped; a metadata failure
/// degrades every row to empty title/description instead of failing the
/// batch (the caller logs it).
pub async fn load_campaigns(
    chain: &dyn ContractApi,
    metadata: &dyn MetadataApi,
    source: CampaignSource,
) -> Result<Vec<Campaign>, ChainError> {
    let raw = match &source {
        CampaignSource::All => chain.call("getCampaigns", &[]).await?,
        CampaignSource::OwnedBy(owner) => {
            chain.call("getOwnedCampaigns", &[json!(owner.0)]).await?
        }
    };

    let rows: Vec<ChainCampaign> = serde_json::from_value(raw)
        .map_err(|err| ChainError::Network(format!("malformed campaign batch: {err}")))?;

    let mut campaigns: Vec<Campaign> = rows.iter().filter_map(Campaign::from_chain).collect();
    let ids: Vec<CampaignId> = campaigns.iter().map(|c| c.id).collect();
    if ids.is_empty() {
        return Ok(campaigns);
    }

    if let Ok(rows) = metadata.campaigns_by_ids(&ids).await {
        // Positional merge: the store echoes the input id order. Short or
        // reordered responses fall back to id matching per row.
        for (index, campaign) in campaigns.iter_mut().enumerate() {
            let row = match rows.get(index) {
                Some(row) if row.id == campaign.id => Some(row),
                _ => rows.iter().find(|row| row.id == campaign.id),
            };
            if let Some(row) = row {
                campaign.title = row.title.clone();
                campaign.description = row.description.clone();
            }
        }
    }

    Ok(campaigns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use db_api_types::{CampaignMetadata, SaveCampaignRequest, Wei};
    use db_gateway::{SendOpts, TxOutcome};
    use serde_json::Value;
    use std::cell::RefCell;

    struct FakeChain {
        batch: Value,
        calls: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl ContractApi for FakeChain {
        async fn call(&self, method: &str, _args: &[Value]) -> Result<Value, ChainError> {
            self.calls.borrow_mut().push(method.to_owned());
            Ok(self.batch.clone())
        }

        async fn send(
            &self,
            _method: &str,
            _args: &[Value],
            _opts: SendOpts,
        ) -> Result<TxOutcome, ChainError> {
            panic!("loading must never send a transaction");
        }
    }

    struct FakeMetadata {
        rows: Result<Vec<CampaignMetadata>, ChainError>,
        asked: RefCell<Vec<CampaignId>>,
    }

    #[async_trait(?Send)]
    impl MetadataApi for FakeMetadata {
        async fn save_campaign(&self, _request: &SaveCampaignRequest) -> Result<(), ChainError> {
            Ok(())
        }

        async fn campaigns_by_ids(
            &self,
            ids: &[CampaignId],
        ) -> Result<Vec<CampaignMetadata>, ChainError> {
            self.asked.borrow_mut().extend_from_slice(ids);
            self.rows.clone()
        }

        async fn is_registered(&self, _address: &AccountAddress) -> Result<bool, ChainError> {
            Ok(true)
        }
    }

    fn chain_row(id: u64, status: &str) -> Value {
        json!({
            "id": id.to_string(),
            "creationTime": "1700000000",
            "weekDuration": "8",
            "weiLimit": "1000000000000000000",
            "donatedWei": "0",
            "status": status,
            "revisionTime": "0"
        })
    }

    fn meta(id: u64, title: &str) -> CampaignMetadata {
        CampaignMetadata {
            id: CampaignId(id),
            title: title.to_owned(),
            description: format!("about {title}"),
        }
    }

    #[tokio::test]
    async fn merge_preserves_chain_enumeration_order() {
        let chain = FakeChain {
            batch: json!([chain_row(9, "1"), chain_row(2, "0"), chain_row(5, "1")]),
            calls: RefCell::new(Vec::new()),
        };
        let metadata = FakeMetadata {
            rows: Ok(vec![meta(9, "nine"), meta(2, "two"), meta(5, "five")]),
            asked: RefCell::new(Vec::new()),
        };

        let campaigns = load_campaigns(&chain, &metadata, CampaignSource::All)
            .await
            .unwrap();

        assert_eq!(
            campaigns.iter().map(|c| c.id.0).collect::<Vec<_>>(),
            vec![9, 2, 5]
        );
        assert_eq!(campaigns[0].title, "nine");
        assert_eq!(campaigns[2].title, "five");
        assert_eq!(
            metadata.asked.borrow().clone(),
            vec![CampaignId(9), CampaignId(2), CampaignId(5)]
        );
        assert_eq!(chain.calls.borrow().clone(), vec!["getCampaigns".to_owned()]);
    }

    #[tokio::test]
    async fn owned_source_calls_the_owner_enumeration() {
        let chain = FakeChain {
            batch: json!([]),
            calls: RefCell::new(Vec::new()),
        };
        let metadata = FakeMetadata {
            rows: Ok(Vec::new()),
            asked: RefCell::new(Vec::new()),
        };

        let owner = AccountAddress("0xabc".to_owned());
        let campaigns = load_campaigns(&chain, &metadata, CampaignSource::OwnedBy(owner))
            .await
            .unwrap();

        assert!(campaigns.is_empty());
        assert_eq!(
            chain.calls.borrow().clone(),
            vec!["getOwnedCampaigns".to_owned()]
        );
        // No ids, so the metadata store is never asked.
        assert!(metadata.asked.borrow().is_empty());
    }

    #[tokio::test]
    async fn metadata_failure_degrades_to_empty_text() {
        let chain = FakeChain {
            batch: json!([chain_row(1, "1")]),
            calls: RefCell::new(Vec::new()),
        };
        let metadata = FakeMetadata {
            rows: Err(ChainError::Network("store down".to_owned())),
            asked: RefCell::new(Vec::new()),
        };

        let campaigns = load_campaigns(&chain, &metadata, CampaignSource::All)
            .await
            .unwrap();

        assert_eq!(campaigns.len(), 1);
        assert!(campaigns[0].title.is_empty());
        assert!(campaigns[0].description.is_empty());
        assert_eq!(campaigns[0].wei_limit, Wei(1_000_000_000_000_000_000));
    }

    #[tokio::test]
    async fn malformed_chain_rows_are_skipped() {
        let chain = FakeChain {
            batch: json!([chain_row(1, "1"), chain_row(2, "42"), chain_row(3, "0")]),
            calls: RefCell::new(Vec::new()),
        };
        let metadata = FakeMetadata {
            rows: Ok(vec![meta(1, "one"), meta(3, "three")]),
            asked: RefCell::new(Vec::new()),
        };

        let campaigns = load_campaigns(&chain, &metadata, CampaignSource::All)
            .await
            .unwrap();

        assert_eq!(
            campaigns.iter().map(|c| c.id.0).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(campaigns[1].title, "three");
    }
}
