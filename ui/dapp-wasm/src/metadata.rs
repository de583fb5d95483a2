//! Metadata store client.
//!
//! Persists and retrieves the off-chain campaign title/description rows and
//! answers the registration check. Plain request/response: no retry, no
//! backoff; callers log failures rather than surface them.

use crate::api;
use async_trait::async_trait;
use db_api_types::{
    AccountAddress, CampaignId, CampaignMetadata, GetCampaignsRequest, IsRegisteredRequest,
    IsRegisteredResponse, SaveCampaignRequest,
};
use db_core::ClientConfig;
use db_gateway::{ChainError, MetadataApi};

pub struct MetadataClient {
    base_url: String,
}

impl MetadataClient {
    pub fn new(config: &ClientConfig) -> MetadataClient {
        MetadataClient {
            base_url: config.metadata_base_url.trim_end_matches('/').to_owned(),
        }
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: String,
    ) -> Result<T, ChainError> {
        let url = format!("{}{}", self.base_url, path);
        let value = api::request(&url, "POST", Some(body))
            .await
            .map_err(ChainError::Network)?;
        serde_json::from_value(value)
            .map_err(|err| ChainError::Network(format!("unexpected {path} response: {err}")))
    }
}

#[async_trait(?Send)]
impl MetadataApi for MetadataClient {
    async fn save_campaign(&self, request: &SaveCampaignRequest) -> Result<(), ChainError> {
        let body = serde_json::to_string(request)
            .map_err(|err| ChainError::Network(err.to_string()))?;
        // The store's success body is opaque; reaching it is enough.
        let url = format!("{}/save-campaign", self.base_url);
        api::request(&url, "POST", Some(body))
            .await
            .map(|_| ())
            .map_err(ChainError::Network)
    }

    async fn campaigns_by_ids(&self, ids: &[CampaignId]) -> Result<Vec<CampaignMetadata>, ChainError> {
        let body = serde_json::to_string(&GetCampaignsRequest {
            campaign_ids: ids.to_vec(),
        })
        .map_err(|err| ChainError::Network(err.to_string()))?;
        self.post("/get-campaigns", body).await
    }

    async fn is_registered(&self, address: &AccountAddress) -> Result<bool, ChainError> {
        let body = serde_json::to_string(&IsRegisteredRequest {
            ethereum_address: address.0.clone(),
        })
        .map_err(|err| ChainError::Network(err.to_string()))?;
        let response: IsRegisteredResponse = self.post("/is-registered", body).await?;
        Ok(response.success)
    }
}
