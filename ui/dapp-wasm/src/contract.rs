//! Provider-backed contract gateway.
//!
//! Binds a fetched interface descriptor to a deployed address through the
//! page's web3 bundle and implements `ContractApi` over it. All values cross
//! the JS boundary as plain JSON, which is also how the provider stringifies
//! uint256 results.

use crate::api;
use crate::eth;
use async_trait::async_trait;
use db_gateway::{ChainError, ContractApi, SendOpts, TxOutcome};
use js_sys::{Array, Function, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::eth::USER_REJECTED;

/// A bound contract: interface descriptor plus deployed address.
pub struct Contract {
    inner: JsValue,
}

/// Fetch an interface descriptor and bind it to `address`.
pub async fn load(descriptor_url: &str, address: &str) -> Result<Contract, ChainError> {
    let text = api::fetch_text(descriptor_url)
        .await
        .map_err(ChainError::InterfaceFetch)?;
    let descriptor = js_sys::JSON::parse(&text)
        .map_err(|_| ChainError::InterfaceFetch(format!("{descriptor_url} is not JSON")))?;
    let abi = Reflect::get(&descriptor, &JsValue::from_str("abi"))
        .ok()
        .filter(|abi| !abi.is_undefined() && !abi.is_null())
        .ok_or_else(|| ChainError::InterfaceFetch(format!("{descriptor_url} has no abi field")))?;

    let window = web_sys::window().ok_or(ChainError::ProviderUnavailable)?;
    let web3_ctor: Function = Reflect::get(&window, &JsValue::from_str("Web3"))
        .ok()
        .and_then(|c| c.dyn_into().ok())
        .ok_or_else(|| ChainError::Network("the web3 bundle is not loaded".into()))?;

    let provider = eth::provider()
        .map(|p| p.as_js().clone())
        .unwrap_or(JsValue::UNDEFINED);
    let web3 = Reflect::construct(&web3_ctor, &Array::of1(&provider))
        .map_err(|e| ChainError::Network(eth::error_message(&e)))?;

    let eth_ns = Reflect::get(&web3, &JsValue::from_str("eth"))
        .map_err(|e| ChainError::Network(eth::error_message(&e)))?;
    let contract_ctor: Function = Reflect::get(&eth_ns, &JsValue::from_str("Contract"))
        .ok()
        .and_then(|c| c.dyn_into().ok())
        .ok_or_else(|| ChainError::Network("web3.eth.Contract is unavailable".into()))?;

    let inner = Reflect::construct(&contract_ctor, &Array::of2(&abi, &JsValue::from_str(address)))
        .map_err(|e| ChainError::Network(eth::error_message(&e)))?;

    Ok(Contract { inner })
}

impl Contract {
    /// Build `contract.methods.<method>(args...)`.
    fn tx_builder(&self, method: &str, args: &[Value]) -> Result<JsValue, ChainError> {
        let methods = Reflect::get(&self.inner, &JsValue::from_str("methods"))
            .map_err(|e| ChainError::Network(eth::error_message(&e)))?;
        let method_fn: Function = Reflect::get(&methods, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| ChainError::Network(format!("contract has no method {method}")))?;

        let js_args = Array::new();
        for arg in args {
            js_args.push(&json_to_js(arg)?);
        }
        method_fn
            .apply(&methods, &js_args)
            .map_err(|e| ChainError::Network(eth::error_message(&e)))
    }

    async fn invoke(&self, builder: &JsValue, verb: &str, arg: Option<&JsValue>) -> Result<JsValue, ChainError> {
        let f: Function = Reflect::get(builder, &JsValue::from_str(verb))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| ChainError::Network(format!("invocation has no {verb}()")))?;

        let result = match arg {
            Some(arg) => f.call1(builder, arg),
            None => f.call0(builder),
        }
        .map_err(|e| send_error(&e))?;

        let promise: Promise = result
            .dyn_into()
            .map_err(|_| ChainError::Network(format!("{verb}() did not return a promise")))?;
        JsFuture::from(promise).await.map_err(|e| send_error(&e))
    }

    /// Subscribe to a contract event stream. The returned handle detaches
    /// the JS listener when dropped or explicitly unsubscribed.
    pub fn subscribe(
        &self,
        event: &str,
        callback: impl FnMut(JsValue) + 'static,
    ) -> Result<Subscription, ChainError> {
        let events_ns = Reflect::get(&self.inner, &JsValue::from_str("events"))
            .map_err(|e| ChainError::Network(eth::error_message(&e)))?;
        let event_fn: Function = Reflect::get(&events_ns, &JsValue::from_str(event))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| ChainError::Network(format!("contract emits no event {event}")))?;
        let emitter = event_fn
            .call0(&events_ns)
            .map_err(|e| ChainError::Network(eth::error_message(&e)))?;

        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(JsValue)>);
        let on: Function = Reflect::get(&emitter, &JsValue::from_str("on"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| ChainError::Network("event emitter has no on()".into()))?;
        on.call2(&emitter, &JsValue::from_str("data"), closure.as_ref())
            .map_err(|e| ChainError::Network(eth::error_message(&e)))?;

        Ok(Subscription {
            emitter,
            _closure: closure,
        })
    }
}

#[async_trait(?Send)]
impl ContractApi for Contract {
    async fn call(&self, method: &str, args: &[Value]) -> Result<Value, ChainError> {
        let builder = self.tx_builder(method, args)?;
        let result = self.invoke(&builder, "call", None).await?;
        js_to_json(&result)
    }

    async fn send(&self, method: &str, args: &[Value], opts: SendOpts) -> Result<TxOutcome, ChainError> {
        let builder = self.tx_builder(method, args)?;

        let send_opts = js_sys::Object::new();
        Reflect::set(
            &send_opts,
            &JsValue::from_str("from"),
            &JsValue::from_str(&opts.from.0),
        )
        .map_err(|e| ChainError::Network(eth::error_message(&e)))?;
        if let Some(value) = opts.value {
            Reflect::set(
                &send_opts,
                &JsValue::from_str("value"),
                &JsValue::from_str(&value.to_string()),
            )
            .map_err(|e| ChainError::Network(eth::error_message(&e)))?;
        }

        let receipt = self.invoke(&builder, "send", Some(&send_opts)).await?;
        let events = Reflect::get(&receipt, &JsValue::from_str("events"))
            .ok()
            .filter(|e| !e.is_undefined() && !e.is_null())
            .map(|e| js_to_json(&e))
            .transpose()?
            .unwrap_or(Value::Null);

        Ok(TxOutcome { events })
    }
}

/// An active event subscription. Dropping it detaches the JS listener, so a
/// page teardown cannot leak handlers.
pub struct Subscription {
    emitter: JsValue,
    _closure: Closure<dyn FnMut(JsValue)>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Ok(f) = Reflect::get(&self.emitter, &JsValue::from_str("removeAllListeners")) {
            if let Ok(f) = f.dyn_into::<Function>() {
                let _ = f.call1(&self.emitter, &JsValue::from_str("data"));
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn send_error(err: &JsValue) -> ChainError {
    if eth::error_code(err) == Some(USER_REJECTED) {
        return ChainError::TransactionRejected;
    }
    ChainError::from_provider_message(&eth::error_message(err))
}

/// serde_json value to a plain JS value. The json-compatible serializer
/// keeps objects as ordinary objects rather than `Map`s, which is what the
/// web3 method builders expect.
fn json_to_js(value: &Value) -> Result<JsValue, ChainError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| ChainError::Network(format!("unencodable argument: {err}")))
}

fn js_to_json(value: &JsValue) -> Result<Value, ChainError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let text = js_sys::JSON::stringify(value)
        .map_err(|e| ChainError::Network(eth::error_message(&e)))?
        .as_string()
        .unwrap_or_default();
    serde_json::from_str(&text)
        .map_err(|err| ChainError::Network(format!("undecodable contract result: {err}")))
}
