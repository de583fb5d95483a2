//! Campaign rendering and action wiring.
//!
//! Loads a campaign batch through the gateway, turns each campaign into a
//! precomputed card, renders the cards, and binds one click handler per
//! action button. Every action sends its transaction and reloads the page
//! on success; failures surface through a blocking alert.

use crate::dom::{self, HomeEls, ProfileEls};
use crate::session::Session;
use db_api_types::{CampaignId, CampaignStatus, Wei};
use db_core::donation::check_donation;
use db_core::loader::{CampaignSource, load_campaigns};
use db_core::units::wei_from_eth_str;
use db_core::view::{self, CampaignAction, CampaignCard, Viewer};
use db_core::Campaign;
use db_gateway::{ContractApi, SendOpts};
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

fn now_secs() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

/// Home feed: every campaign, rendered for a visitor.
pub async fn show_home(session: Rc<Session>, els: &HomeEls) {
    let campaigns = match load_campaigns(
        session.dragonblock.as_ref(),
        session.metadata.as_ref(),
        CampaignSource::All,
    )
    .await
    {
        Ok(campaigns) => campaigns,
        Err(err) => {
            gloo_console::error!(format!("campaign load failed: {err}"));
            return;
        }
    };

    els.campaigns.set_inner_html("");
    for campaign in &campaigns {
        let card = view::card(campaign, Viewer::Visitor, session.config.review_window, now_secs());
        render_card(&session, &els.campaigns, campaign, &card);
    }
}

/// Profile page: the account's own campaigns, rendered for the owner and
/// bucketed by lifecycle stage.
pub async fn show_profile(session: Rc<Session>, els: &ProfileEls) {
    let campaigns = match load_campaigns(
        session.dragonblock.as_ref(),
        session.metadata.as_ref(),
        CampaignSource::OwnedBy(session.account.clone()),
    )
    .await
    {
        Ok(campaigns) => campaigns,
        Err(err) => {
            gloo_console::error!(format!("campaign load failed: {err}"));
            return;
        }
    };

    els.pending_campaigns.set_inner_html("");
    els.active_campaigns.set_inner_html("");
    els.ended_campaigns.set_inner_html("");
    for campaign in &campaigns {
        let container = match campaign.status {
            CampaignStatus::Pending | CampaignStatus::Revision => &els.pending_campaigns,
            CampaignStatus::Active => &els.active_campaigns,
            CampaignStatus::Ended | CampaignStatus::Disapproved | CampaignStatus::Banned => {
                &els.ended_campaigns
            }
        };
        let card = view::card(campaign, Viewer::Owner, session.config.review_window, now_secs());
        render_card(&session, container, campaign, &card);
    }
}

/// Append one card and wire its action buttons.
fn render_card(session: &Rc<Session>, container: &Element, campaign: &Campaign, card: &CampaignCard) {
    let el = dom::create_element("div");
    el.set_class_name("campaign animated");
    dom::set_inner_html(&el, &card_html(card));
    let _ = container.append_child(&el);

    for button in dom::query_all_within(&el, "button[data-action]") {
        let action = match button.get_attribute("data-action").as_deref() {
            Some("approve") => CampaignAction::Approve,
            Some("disapprove") => CampaignAction::Disapprove,
            Some("finalize") => CampaignAction::Finalize,
            Some("finalize-revision") => CampaignAction::FinalizeRevision,
            Some("donate") => CampaignAction::Donate,
            Some("report") => CampaignAction::Report,
            Some("terminate") => CampaignAction::Terminate,
            _ => continue,
        };

        let session = Rc::clone(session);
        let id = campaign.id;
        let donated = campaign.donated_wei;
        let limit = campaign.wei_limit;
        let handler = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_| {
            let session = Rc::clone(&session);
            spawn_local(async move {
                run_action(&session, action, id, donated, limit).await;
            });
        });
        let _ = button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        // The handler lives as long as the page.
        handler.forget();
    }
}

fn card_html(card: &CampaignCard) -> String {
    let mut html = format!(
        "<h3 class=\"campaign-title\">{}</h3>\
         <p class=\"campaign-description\">{}</p>\
         <p class=\"campaign-status\">{}</p>",
        dom::escape_html(&card.title),
        dom::escape_html(&card.description),
        dom::escape_html(&card.status_line),
    );
    if let Some(period) = &card.period {
        html.push_str(&format!("<p class=\"campaign-period\">{period}</p>"));
    }
    if let Some(progress) = &card.progress {
        html.push_str(&format!("<p class=\"campaign-progress\">{progress}</p>"));
    }
    for action in &card.actions {
        html.push_str(&format!(
            "<button type=\"button\" class=\"btn campaign-btn\" data-action=\"{}\">{}</button>",
            action_attr(*action),
            action.label(),
        ));
    }
    html
}

fn action_attr(action: CampaignAction) -> &'static str {
    match action {
        CampaignAction::Approve => "approve",
        CampaignAction::Disapprove => "disapprove",
        CampaignAction::Finalize => "finalize",
        CampaignAction::FinalizeRevision => "finalize-revision",
        CampaignAction::Donate => "donate",
        CampaignAction::Report => "report",
        CampaignAction::Terminate => "terminate",
    }
}

async fn run_action(
    session: &Session,
    action: CampaignAction,
    id: CampaignId,
    donated: Wei,
    limit: Wei,
) {
    let result = match action {
        CampaignAction::Donate => donate(session, id, donated, limit).await,
        CampaignAction::Approve => send_simple(session, "approveCampaign", id).await,
        CampaignAction::Disapprove => send_simple(session, "disapproveCampaign", id).await,
        CampaignAction::Finalize => send_simple(session, "finalizeCampaign", id).await,
        CampaignAction::FinalizeRevision => {
            send_simple(session, "finalizeRevisionCampaign", id).await
        }
        CampaignAction::Report => send_simple(session, "reportCampaign", id).await,
        CampaignAction::Terminate => send_simple(session, "terminateCampaign", id).await,
    };

    match result {
        Ok(true) => dom::window().location().reload().unwrap_or(()),
        Ok(false) => {} // the user backed out, nothing to refresh
        Err(message) => dom::alert(&message),
    }
}

async fn send_simple(session: &Session, method: &str, id: CampaignId) -> Result<bool, String> {
    session
        .dragonblock
        .send(method, &[json!(id.0)], SendOpts::from_account(&session.account))
        .await
        .map(|_| true)
        .map_err(|err| err.user_message())
}

/// Donation flow: prompt for an ETH amount, validate it against the step
/// and the campaign's remaining headroom, then send it as the transaction
/// value.
async fn donate(session: &Session, id: CampaignId, donated: Wei, limit: Wei) -> Result<bool, String> {
    let step = session.config.donation_step;
    let Some(input) = dom::prompt(&format!(
        "How much ETH do you want to donate? (multiples of {})",
        db_core::units::eth_from_wei(step)
    )) else {
        return Ok(false);
    };

    let amount = wei_from_eth_str(&input)
        .ok_or_else(|| "Please enter a valid ETH amount.".to_string())?;
    check_donation(amount, step, donated, limit).map_err(|err| err.message().to_string())?;

    session
        .dragonblock
        .send(
            "donateCampaign",
            &[json!(id.0)],
            SendOpts::with_value(&session.account, amount),
        )
        .await
        .map(|_| true)
        .map_err(|err| err.user_message())
}
