//! DOM element bindings.
//!
//! Helpers plus one element struct per page. All references are resolved
//! once at startup; `Page::detect()` decides which page the bundle woke up
//! on by probing for that page's marker elements.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    doc().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    collect_nodes(doc().query_selector_all(selector).ok())
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    collect_nodes(parent.query_selector_all(selector).ok())
}

fn collect_nodes(list: Option<web_sys::NodeList>) -> Vec<Element> {
    let mut v = Vec::new();
    if let Some(nl) = list {
        for i in 0..nl.length() {
            if let Some(e) = nl.item(i) {
                if let Ok(el) = e.dyn_into::<Element>() {
                    v.push(el);
                }
            }
        }
    }
    v
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn get_textarea_value(el: &HtmlTextAreaElement) -> String {
    el.value().trim().to_string()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

/// Blocking pop-up for chain/transaction errors.
pub fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

/// Prompt the user for a value; `None` when dismissed or left empty.
pub fn prompt(message: &str) -> Option<String> {
    window()
        .prompt_with_message(message)
        .ok()
        .flatten()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Escape user-supplied text before it is interpolated into card HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// ── Page element structs ──

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_textarea {
    ($id:expr) => {
        by_id_typed::<HtmlTextAreaElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing textarea #{}", $id)))?
    };
}

macro_rules! get_form {
    ($id:expr) => {
        by_id_typed::<HtmlFormElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing form #{}", $id)))?
    };
}

/// Home page: the public campaign feed.
#[derive(Clone)]
pub struct HomeEls {
    pub campaigns: Element,
}

/// Profile page: the user's own campaigns split by lifecycle bucket.
#[derive(Clone)]
pub struct ProfileEls {
    pub pending_campaigns: Element,
    pub active_campaigns: Element,
    pub ended_campaigns: Element,
}

/// Campaign creation form.
#[derive(Clone)]
pub struct CreateEls {
    pub form: HtmlFormElement,
    pub title: HtmlInputElement,
    pub description: HtmlTextAreaElement,
    pub eth_limit: HtmlInputElement,
    pub week_duration: HtmlInputElement,
}

/// Login and signup forms share the email/password skeleton; signup adds the
/// identity fields.
#[derive(Clone)]
pub struct AuthEls {
    pub form: HtmlFormElement,
    pub email: HtmlInputElement,
    pub password: HtmlInputElement,
    pub username: Option<HtmlInputElement>,
    pub password_confirm: Option<HtmlInputElement>,
    pub birthday: Option<HtmlInputElement>,
    pub metamask_address: Option<HtmlInputElement>,
}

/// Which page this bundle woke up on.
pub enum Page {
    /// Landing page: scroll animations only.
    Landing,
    Home(HomeEls),
    Profile(ProfileEls),
    CreateCampaign(CreateEls),
    Signup(AuthEls),
    Login(AuthEls),
    /// Oracle operator dashboard: runs the verification listener.
    OracleDashboard,
}

impl Page {
    pub fn detect() -> Result<Page, JsValue> {
        if by_id("pending-campaigns").is_some() {
            return Ok(Page::Profile(ProfileEls {
                pending_campaigns: by_id("pending-campaigns")
                    .ok_or_else(|| JsValue::from_str("missing #pending-campaigns"))?,
                active_campaigns: by_id("active-campaigns")
                    .ok_or_else(|| JsValue::from_str("missing #active-campaigns"))?,
                ended_campaigns: by_id("ended-campaigns")
                    .ok_or_else(|| JsValue::from_str("missing #ended-campaigns"))?,
            }));
        }

        if by_id("title").is_some() {
            return Ok(Page::CreateCampaign(CreateEls {
                form: get_form!("form"),
                title: get_input!("title"),
                description: get_textarea!("description"),
                eth_limit: get_input!("eth-limit"),
                week_duration: get_input!("week-duration"),
            }));
        }

        if by_id("password-confirm").is_some() {
            return Ok(Page::Signup(AuthEls {
                form: get_form!("form"),
                email: get_input!("email"),
                password: get_input!("password"),
                username: by_id_typed("username"),
                password_confirm: by_id_typed("password-confirm"),
                birthday: by_id_typed("birthday"),
                metamask_address: by_id_typed("metamask-address"),
            }));
        }

        if by_id("email").is_some() {
            return Ok(Page::Login(AuthEls {
                form: get_form!("form"),
                email: get_input!("email"),
                password: get_input!("password"),
                username: None,
                password_confirm: None,
                birthday: None,
                metamask_address: None,
            }));
        }

        if by_id("oracle-dashboard").is_some() {
            return Ok(Page::OracleDashboard);
        }

        if let Some(campaigns) = query(".campaigns") {
            return Ok(Page::Home(HomeEls { campaigns }));
        }

        Ok(Page::Landing)
    }
}
