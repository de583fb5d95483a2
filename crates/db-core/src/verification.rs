//! User verification flows.
//!
//! Login checks the on-chain verification flag and requests verification
//! when it is unset; the oracle listener answers verification requests with
//! a vote derived from the metadata store's registration check.

use db_api_types::AccountAddress;
use db_gateway::{ChainError, ContractApi, MetadataApi, SendOpts};
use serde_json::{Value, json};

/// A `VerificationRequest(userAddress, requestId)` oracle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub account: AccountAddress,
    pub request_id: u64,
}

impl VerificationRequest {
    /// Decode an event payload's `returnValues`. Request ids arrive as
    /// decimal strings like every other uint.
    pub fn from_event(event: &Value) -> Option<VerificationRequest> {
        let values = event.get("returnValues")?;
        let account = values.get("userAddress")?.as_str()?;
        let request_id = match values.get("requestId")? {
            Value::String(s) => s.trim().parse().ok()?,
            Value::Number(n) => n.as_u64()?,
            _ => return None,
        };
        Some(VerificationRequest {
            account: AccountAddress(account.to_owned()),
            request_id,
        })
    }
}

/// Check the account's on-chain verification flag and, when unset, issue the
/// verification transaction. Returns `true` when a transaction was sent.
pub async fn ensure_verified(
    chain: &dyn ContractApi,
    account: &AccountAddress,
) -> Result<bool, ChainError> {
    let verified = chain
        .call("isVerified", &[json!(account.0)])
        .await?
        .as_bool()
        .unwrap_or(false);
    if verified {
        return Ok(false);
    }
    chain
        .send("requestVerification", &[], SendOpts::from_account(account))
        .await?;
    Ok(true)
}

/// Answer one oracle verification request: look the account up in the
/// registration store and cast the boolean vote keyed by the request id.
/// Returns the vote that was cast. Repeated events are voted on again;
/// de-duplication is the oracle contract's concern.
pub async fn cast_registration_vote(
    oracle: &dyn ContractApi,
    metadata: &dyn MetadataApi,
    voter: &AccountAddress,
    request: &VerificationRequest,
) -> Result<bool, ChainError> {
    let approved = metadata.is_registered(&request.account).await?;
    oracle
        .send(
            "castVote",
            &[json!(request.request_id), json!(approved)],
            SendOpts::from_account(voter),
        )
        .await?;
    Ok(approved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use db_api_types::{CampaignId, CampaignMetadata, SaveCampaignRequest};
    use db_gateway::TxOutcome;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeContract {
        verified: bool,
        sent: RefCell<Vec<(String, Vec<Value>)>>,
    }

    #[async_trait(?Send)]
    impl ContractApi for FakeContract {
        async fn call(&self, method: &str, _args: &[Value]) -> Result<Value, ChainError> {
            assert_eq!(method, "isVerified");
            Ok(json!(self.verified))
        }

        async fn send(
            &self,
            method: &str,
            args: &[Value],
            _opts: SendOpts,
        ) -> Result<TxOutcome, ChainError> {
            self.sent
                .borrow_mut()
                .push((method.to_owned(), args.to_vec()));
            Ok(TxOutcome::default())
        }
    }

    struct FakeRegistry {
        registered: bool,
    }

    #[async_trait(?Send)]
    impl MetadataApi for FakeRegistry {
        async fn save_campaign(&self, _request: &SaveCampaignRequest) -> Result<(), ChainError> {
            Ok(())
        }

        async fn campaigns_by_ids(
            &self,
            _ids: &[CampaignId],
        ) -> Result<Vec<CampaignMetadata>, ChainError> {
            Ok(Vec::new())
        }

        async fn is_registered(&self, _address: &AccountAddress) -> Result<bool, ChainError> {
            Ok(self.registered)
        }
    }

    fn account() -> AccountAddress {
        AccountAddress("0x3FD241aeE6Fc04d898f4f2b3fCC838A2b19f6949".to_owned())
    }

    #[test]
    fn event_payload_decodes_to_a_request() {
        let event = json!({
            "returnValues": { "userAddress": "0xabc", "requestId": "12" }
        });
        assert_eq!(
            VerificationRequest::from_event(&event),
            Some(VerificationRequest {
                account: AccountAddress("0xabc".to_owned()),
                request_id: 12,
            })
        );
        assert_eq!(VerificationRequest::from_event(&json!({})), None);
    }

    #[tokio::test]
    async fn unverified_accounts_get_a_verification_transaction() {
        let chain = FakeContract::default();
        assert!(ensure_verified(&chain, &account()).await.unwrap());
        assert_eq!(
            chain.sent.borrow().clone(),
            vec![("requestVerification".to_owned(), Vec::new())]
        );
    }

    #[tokio::test]
    async fn verified_accounts_send_nothing() {
        let chain = FakeContract {
            verified: true,
            ..FakeContract::default()
        };
        assert!(!ensure_verified(&chain, &account()).await.unwrap());
        assert!(chain.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn votes_follow_the_registration_check() {
        let request = VerificationRequest {
            account: AccountAddress("0xabc".to_owned()),
            request_id: 7,
        };

        for registered in [true, false] {
            let oracle = FakeContract::default();
            let registry = FakeRegistry { registered };
            let vote = cast_registration_vote(&oracle, &registry, &account(), &request)
                .await
                .unwrap();
            assert_eq!(vote, registered);
            assert_eq!(
                oracle.sent.borrow().clone(),
                vec![("castVote".to_owned(), vec![json!(7), json!(registered)])]
            );
        }
    }
}
