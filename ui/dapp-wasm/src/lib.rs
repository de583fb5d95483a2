//! DragonBlock WASM Frontend
//!
//! Pure Rust + WASM client for the crowdfunding dApp: wallet connection,
//! contract gateway, campaign rendering, form validation, and the oracle
//! verification listener. Modularised for extensibility: each concern lives
//! in its own module.

pub mod api;
pub mod campaigns;
pub mod contract;
pub mod dom;
pub mod eth;
pub mod forms;
pub mod metadata;
pub mod oracle;
pub mod scroll;
pub mod session;

use dom::Page;
use session::Session;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence: load config, detect the page, connect the
/// wallet where the page needs one, and hand off to the page's module.
async fn init() -> Result<(), JsValue> {
    let config = db_core::ClientConfig::from_json_or_default(
        api::fetch_text("/static/config.json").await.ok().as_deref(),
    );

    scroll::bind();

    match Page::detect()? {
        Page::Landing => {}
        Page::Home(els) => {
            if let Some(session) = Session::establish(config).await {
                campaigns::show_home(Rc::new(session), &els).await;
            }
        }
        Page::Profile(els) => {
            if let Some(session) = Session::establish(config).await {
                campaigns::show_profile(Rc::new(session), &els).await;
            }
        }
        Page::CreateCampaign(els) => {
            if let Some(session) = Session::establish(config).await {
                forms::wire_create_campaign(Rc::new(session), els);
            }
        }
        Page::Signup(els) => {
            // Signup only needs the account for the address field; the
            // validators run without a contract binding.
            let account = eth::connect().await;
            forms::wire_signup(els, account.as_ref());
        }
        Page::Login(els) => {
            if let Some(session) = Session::establish(config).await {
                forms::wire_login(Rc::new(session), els);
            }
        }
        Page::OracleDashboard => {
            if let Some(session) = Session::establish(config).await {
                oracle::listen(Rc::new(session)).await;
            }
        }
    }

    Ok(())
}
