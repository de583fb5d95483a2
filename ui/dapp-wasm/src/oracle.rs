//! Oracle verification listener.
//!
//! Subscribes to the oracle contract's `VerificationRequest` stream and
//! answers each request with a registration vote. Listener errors are
//! logged and the stream stays attached; the subscription is torn down
//! explicitly when the page unloads.

use crate::contract::{Contract, Subscription};
use crate::session::Session;
use db_core::verification::{VerificationRequest, cast_registration_vote};
use db_gateway::ChainError;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

thread_local! {
    static LISTENER: RefCell<Option<Subscription>> = const { RefCell::new(None) };
}

/// Start answering verification requests with this session's account.
pub async fn listen(session: Rc<Session>) {
    let oracle = match session.oracle_contract().await {
        Ok(oracle) => Rc::new(oracle),
        Err(err) => {
            gloo_console::error!(format!("oracle contract binding failed: {err}"));
            return;
        }
    };

    match subscribe_votes(&session, &oracle) {
        Ok(subscription) => {
            LISTENER.with(|slot| *slot.borrow_mut() = Some(subscription));
            bind_unload();
            gloo_console::log!("oracle listener attached");
        }
        Err(err) => gloo_console::error!(format!("oracle subscription failed: {err}")),
    }
}

fn subscribe_votes(
    session: &Rc<Session>,
    oracle: &Rc<Contract>,
) -> Result<Subscription, ChainError> {
    let session = Rc::clone(session);
    let voter_oracle = Rc::clone(oracle);
    oracle.subscribe("VerificationRequest", move |event: JsValue| {
        let Some(request) = decode(&event) else {
            gloo_console::error!("undecodable VerificationRequest event");
            return;
        };
        let session = Rc::clone(&session);
        let oracle = Rc::clone(&voter_oracle);
        spawn_local(async move {
            match cast_registration_vote(
                oracle.as_ref(),
                session.metadata.as_ref(),
                &session.account,
                &request,
            )
            .await
            {
                Ok(approved) => gloo_console::log!(format!(
                    "voted {approved} on request {} for {}",
                    request.request_id, request.account.0
                )),
                Err(err) => gloo_console::error!(format!(
                    "vote failed for request {}: {err}",
                    request.request_id
                )),
            }
        });
    })
}

/// Detach the listener. Idempotent.
pub fn shutdown() {
    LISTENER.with(|slot| {
        if slot.borrow_mut().take().is_some() {
            gloo_console::log!("oracle listener detached");
        }
    });
}

fn decode(event: &JsValue) -> Option<VerificationRequest> {
    let text = js_sys::JSON::stringify(event).ok()?.as_string()?;
    let value: serde_json::Value = serde_json::from_str(&text).ok()?;
    VerificationRequest::from_event(&value)
}

fn bind_unload() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let handler = Closure::<dyn FnMut()>::new(shutdown);
    let _ = window
        .add_event_listener_with_callback("beforeunload", handler.as_ref().unchecked_ref());
    handler.forget();
}
