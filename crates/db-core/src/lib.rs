//! DragonBlock domain logic.
//!
//! Everything here is UI- and transport-free: the campaign model and its
//! lifecycle, donation rules, form validation, unit conversion, view-model
//! construction, and the batch loading that merges on-chain records with
//! off-chain metadata. The browser layer in `ui/dapp-wasm` only wires these
//! into the DOM and the wallet provider.

pub mod campaign;
pub mod config;
pub mod donation;
pub mod forms;
pub mod loader;
pub mod units;
pub mod verification;
pub mod view;

pub use campaign::Campaign;
pub use config::ClientConfig;
pub use forms::ValidationError;
pub use view::{CampaignAction, CampaignCard, ReviewWindow, Viewer};
