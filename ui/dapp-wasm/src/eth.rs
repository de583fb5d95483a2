//! Wallet connector.
//!
//! Talks to the browser-injected wallet provider (`window.ethereum`,
//! EIP-1193). Detection and authorization are separate steps so an absent
//! extension is reported without ever throwing into the page.

use db_api_types::AccountAddress;
use db_gateway::ChainError;
use gloo_console::error;
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// EIP-1193 "user rejected the request" error code.
pub(crate) const USER_REJECTED: f64 = 4001.0;

pub struct Provider {
    inner: JsValue,
}

/// Detect the injected wallet provider, if any.
pub fn provider() -> Option<Provider> {
    let window = web_sys::window()?;
    let inner = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    if inner.is_undefined() || inner.is_null() {
        return None;
    }
    Some(Provider { inner })
}

impl Provider {
    pub(crate) fn as_js(&self) -> &JsValue {
        &self.inner
    }

    /// Request account authorization (prompts the wallet) and return the
    /// first authorized account. Every call re-prompts; there is no retry.
    pub async fn request_account(&self) -> Result<AccountAddress, ChainError> {
        let request: Function = Reflect::get(&self.inner, &JsValue::from_str("request"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or(ChainError::ProviderUnavailable)?;

        let params = Object::new();
        Reflect::set(
            &params,
            &JsValue::from_str("method"),
            &JsValue::from_str("eth_requestAccounts"),
        )
        .map_err(|_| ChainError::ProviderUnavailable)?;

        let promise: Promise = request
            .call1(&self.inner, &params)
            .map_err(|e| connect_error(&e))?
            .dyn_into()
            .map_err(|_| ChainError::Network("provider request did not return a promise".into()))?;

        let accounts = JsFuture::from(promise).await.map_err(|e| connect_error(&e))?;
        first_account(&accounts).ok_or(ChainError::AuthorizationDenied)
    }
}

/// Connect to the wallet. Failures are logged to the console and swallowed,
/// matching the page contract: an absent provider or a denied prompt never
/// throws, it just leaves the page without an account.
pub async fn connect() -> Option<AccountAddress> {
    let Some(provider) = provider() else {
        error!("MetaMask is not installed. Please install MetaMask to use this DApp.");
        return None;
    };

    match provider.request_account().await {
        Ok(account) => Some(account),
        Err(err) => {
            error!(format!("User denied account access or there was an error: {err}"));
            None
        }
    }
}

fn first_account(accounts: &JsValue) -> Option<AccountAddress> {
    let array = js_sys::Array::from(accounts);
    let first = array.get(0).as_string()?;
    if first.is_empty() {
        return None;
    }
    Some(AccountAddress(first))
}

/// Map a JS error from the provider into the chain taxonomy.
pub fn connect_error(err: &JsValue) -> ChainError {
    if error_code(err) == Some(USER_REJECTED) {
        return ChainError::AuthorizationDenied;
    }
    ChainError::from_provider_message(&error_message(err))
}

pub(crate) fn error_code(err: &JsValue) -> Option<f64> {
    Reflect::get(err, &JsValue::from_str("code")).ok()?.as_f64()
}

pub(crate) fn error_message(err: &JsValue) -> String {
    Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}
