//! Form submission handlers.
//!
//! Signup and login validate and then let the form post to the site as
//! usual; campaign creation is fully client-side and talks to the contract
//! and the metadata store itself. Validation failures go into an alert
//! banner inserted above the form, re-using the same element on repeated
//! attempts.

use crate::dom::{self, AuthEls, CreateEls};
use crate::session::Session;
use db_api_types::SaveCampaignRequest;
use db_core::forms::{
    CampaignForm, LoginForm, SignupForm, validate_campaign, validate_login, validate_signup,
};
use db_core::verification::ensure_verified;
use db_gateway::{ChainError, ContractApi, MetadataApi, SendOpts};
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlFormElement};

const ERROR_ALERT_ID: &str = "error-alert";
const SUCCESS_ALERT_ID: &str = "success-alert";

fn now_secs() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

/// Show a message in the banner above `form`, creating the banner element
/// on first use and re-filling it afterwards.
fn show_banner(form: &HtmlFormElement, id: &str, class: &str, message: &str) {
    let el = match dom::by_id(id) {
        Some(el) => el,
        None => {
            let el = dom::create_element("div");
            el.set_id(id);
            el.set_class_name(class);
            let form_el: &Element = form.as_ref();
            if let Some(parent) = form_el.parent_element() {
                let _ = parent.insert_before(&el, Some(form_el));
            }
            el
        }
    };
    dom::set_text(&el, message);
}

fn show_error(form: &HtmlFormElement, message: &str) {
    if let Some(success) = dom::by_id(SUCCESS_ALERT_ID) {
        success.remove();
    }
    show_banner(form, ERROR_ALERT_ID, "alert alert-danger", message);
}

fn show_success(form: &HtmlFormElement, message: &str) {
    if let Some(error) = dom::by_id(ERROR_ALERT_ID) {
        error.remove();
    }
    show_banner(form, SUCCESS_ALERT_ID, "alert alert-success", message);
}

fn read_signup(els: &AuthEls) -> SignupForm {
    SignupForm {
        email: dom::get_input_value(&els.email),
        username: els.username.as_ref().map(dom::get_input_value).unwrap_or_default(),
        birthday: els.birthday.as_ref().map(dom::get_input_value).unwrap_or_default(),
        wallet_address: els
            .metamask_address
            .as_ref()
            .map(dom::get_input_value)
            .unwrap_or_default(),
        password: els.password.value(),
        password_confirm: els
            .password_confirm
            .as_ref()
            .map(|e| e.value())
            .unwrap_or_default(),
    }
}

/// Signup page. The wallet address field is pre-filled from the connected
/// account and left editable; submission is blocked until the whole form
/// validates, then the browser posts it normally.
pub fn wire_signup(els: AuthEls, account: Option<&db_api_types::AccountAddress>) {
    if let (Some(address_input), Some(account)) = (&els.metamask_address, account) {
        if address_input.value().trim().is_empty() {
            address_input.set_value(&account.0);
        }
    }

    let form = els.form.clone();
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let form_data = read_signup(&els);
        if let Err(err) = validate_signup(&form_data, now_secs()) {
            event.prevent_default();
            show_error(&els.form, err.message());
        }
    });
    let _ = form.add_event_listener_with_callback("submit", handler.as_ref().unchecked_ref());
    handler.forget();
}

/// Login page. On a valid form the on-chain verification flag is checked
/// (issuing the verification transaction when unset) before the credentials
/// are posted.
pub fn wire_login(session: Rc<Session>, els: AuthEls) {
    let form = els.form.clone();
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let form_data = LoginForm {
            email: dom::get_input_value(&els.email),
            password: els.password.value(),
        };
        if let Err(err) = validate_login(&form_data) {
            show_error(&els.form, err.message());
            return;
        }

        let session = Rc::clone(&session);
        let els = els.clone();
        spawn_local(async move {
            match ensure_verified(session.dragonblock.as_ref(), &session.account).await {
                Ok(requested) => {
                    if requested {
                        gloo_console::log!("verification requested for", &session.account.0);
                    }
                    let _ = els.form.submit();
                }
                Err(ChainError::TransactionRejected) => {
                    show_error(&els.form, &ChainError::TransactionRejected.user_message());
                }
                Err(err) => {
                    gloo_console::error!(format!("verification check failed: {err}"));
                    let _ = els.form.submit();
                }
            }
        });
    });
    let _ = form.add_event_listener_with_callback("submit", handler.as_ref().unchecked_ref());
    handler.forget();
}

/// Campaign creation page. The whole flow is client-side: validate against
/// the creator's combat level, send the creation transaction with the 5%
/// deposit attached, then persist title and description under the campaign
/// id the creation event reports.
pub fn wire_create_campaign(session: Rc<Session>, els: CreateEls) {
    let form = els.form.clone();
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let session = Rc::clone(&session);
        let els = els.clone();
        spawn_local(async move {
            match submit_campaign(&session, &els).await {
                Ok(()) => {
                    show_success(&els.form, "Campaign created!");
                    els.form.reset();
                }
                Err(SubmitError::Validation(message)) => show_error(&els.form, &message),
                Err(SubmitError::Chain(err)) => dom::alert(&err.user_message()),
            }
        });
    });
    let _ = form.add_event_listener_with_callback("submit", handler.as_ref().unchecked_ref());
    handler.forget();
}

enum SubmitError {
    Validation(String),
    Chain(ChainError),
}

async fn submit_campaign(session: &Session, els: &CreateEls) -> Result<(), SubmitError> {
    let form = CampaignForm {
        title: dom::get_input_value(&els.title),
        description: dom::get_textarea_value(&els.description),
        eth_limit: dom::get_input_value(&els.eth_limit),
        week_duration: dom::get_input_value(&els.week_duration),
    };

    let combat_raw = session
        .dragonblock
        .call("getUserCombactLvl", &[json!(session.account.0)])
        .await
        .map_err(SubmitError::Chain)?;
    let combat_lvl = match &combat_raw {
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    };

    let valid = validate_campaign(&form, combat_lvl)
        .map_err(|err| SubmitError::Validation(err.message().to_owned()))?;

    let outcome = session
        .dragonblock
        .send(
            "createCampaign",
            &[json!(valid.wei_limit), json!(valid.week_duration)],
            SendOpts::with_value(&session.account, valid.deposit),
        )
        .await
        .map_err(SubmitError::Chain)?;

    let Some(id) = outcome.event_campaign_id("CampaignCreation", "campaignId") else {
        // The chain accepted the campaign but never told us its id, so the
        // metadata row cannot be written.
        gloo_console::error!("creation receipt carried no CampaignCreation event");
        return Ok(());
    };

    let request = SaveCampaignRequest {
        title: form.title,
        description: form.description,
        id,
    };
    if let Err(err) = session.metadata.save_campaign(&request).await {
        gloo_console::error!(format!("metadata save failed for campaign {}: {err}", id.0));
    }
    Ok(())
}
