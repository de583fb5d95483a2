//! Per-page session state.
//!
//! A session bundles the connected account, the main contract handle, and the
//! metadata client. It is built once when a page boots and passed to whatever
//! needs it, so no module keeps its own connection globals.

use crate::contract::{self, Contract};
use crate::eth;
use crate::metadata::MetadataClient;
use db_api_types::AccountAddress;
use db_core::ClientConfig;
use db_gateway::ChainError;
use std::rc::Rc;

pub struct Session {
    pub account: AccountAddress,
    pub dragonblock: Rc<Contract>,
    pub metadata: Rc<MetadataClient>,
    pub config: ClientConfig,
}

impl Session {
    /// Connects the wallet and binds the main contract. `None` means the user
    /// has no injected provider or refused the connection; the caller leaves
    /// the page in its signed-out state.
    pub async fn establish(config: ClientConfig) -> Option<Session> {
        let account = eth::connect().await?;
        match Session::with_account(config, account).await {
            Ok(session) => Some(session),
            Err(err) => {
                gloo_console::error!(format!("contract binding failed: {err}"));
                None
            }
        }
    }

    pub async fn with_account(
        config: ClientConfig,
        account: AccountAddress,
    ) -> Result<Session, ChainError> {
        let dragonblock =
            contract::load(&config.dragonblock_descriptor, &config.dragonblock_address).await?;
        let metadata = Rc::new(MetadataClient::new(&config));
        Ok(Session {
            account,
            dragonblock: Rc::new(dragonblock),
            metadata,
            config,
        })
    }

    /// Binds the oracle contract named in the config. Only the oracle
    /// dashboard needs it, so it is loaded on demand.
    pub async fn oracle_contract(&self) -> Result<Contract, ChainError> {
        contract::load(&self.config.oracle_descriptor, &self.config.oracle_address).await
    }
}
