//! Form validation.
//!
//! Each form is a synchronous rule chain: the first failing rule halts
//! validation and its message is the one the banner shows. Rule order is
//! part of the contract with the UI and is pinned by tests.

use crate::units::{civil_from_days, wei_from_eth_str};
use db_api_types::{WEI_PER_ETH, Wei};
use thiserror::Error;

const MIN_SIGNUP_AGE_YEARS: i64 = 18;
const MIN_CAMPAIGN_WEEKS: u64 = 8;
/// 0.05 ETH, the smallest campaign limit the contract accepts.
const MIN_CAMPAIGN_LIMIT: Wei = Wei(50_000_000_000_000_000);
/// Deposit due at creation: 5% of the campaign limit.
const DEPOSIT_DIVISOR: u128 = 20;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> ValidationError {
        ValidationError(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub username: String,
    /// `YYYY-MM-DD`, as the date input submits it.
    pub birthday: String,
    pub wallet_address: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct CampaignForm {
    pub title: String,
    pub description: String,
    /// ETH amount string from the limit input.
    pub eth_limit: String,
    pub week_duration: String,
}

/// A validated campaign-creation request, with the deposit the contract
/// expects attached to the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCampaign {
    pub wei_limit: Wei,
    pub week_duration: u64,
    pub deposit: Wei,
}

/// Rule order: email → username → birthday → wallet address → password pair
/// → password match.
pub fn validate_signup(form: &SignupForm, now_secs: u64) -> Result<(), ValidationError> {
    if form.email.trim().is_empty() {
        return Err(ValidationError::new("Please enter your email."));
    }
    if form.username.trim().is_empty() {
        return Err(ValidationError::new("Please enter your username."));
    }
    if form.birthday.trim().is_empty() {
        return Err(ValidationError::new("Please enter your birthday."));
    }
    let birth = parse_birthday(&form.birthday)
        .ok_or_else(|| ValidationError::new("Please enter a valid birth date (YYYY-MM-DD)."))?;
    if !is_at_least_age(birth, now_secs, MIN_SIGNUP_AGE_YEARS) {
        return Err(ValidationError::new(
            "You must be at least 18 years old to sign up.",
        ));
    }
    if !is_wallet_address(form.wallet_address.trim()) {
        return Err(ValidationError::new("Please enter a valid wallet address."));
    }
    if form.password.is_empty() || form.password_confirm.is_empty() {
        return Err(ValidationError::new("Please enter both password fields."));
    }
    if form.password != form.password_confirm {
        return Err(ValidationError::new("Passwords do not match."));
    }
    Ok(())
}

pub fn validate_login(form: &LoginForm) -> Result<(), ValidationError> {
    if form.email.trim().is_empty() {
        return Err(ValidationError::new("Please enter your email."));
    }
    if form.password.is_empty() {
        return Err(ValidationError::new("Please enter your password."));
    }
    Ok(())
}

/// Validate campaign creation. `combat_lvl` is the caller's on-chain combat
/// level; the requested limit may not exceed a tenth of it, in ETH.
pub fn validate_campaign(form: &CampaignForm, combat_lvl: u64) -> Result<ValidCampaign, ValidationError> {
    if form.title.trim().is_empty() {
        return Err(ValidationError::new("Please enter the campaign title."));
    }
    if form.description.trim().is_empty() {
        return Err(ValidationError::new("Please enter the campaign description."));
    }
    let wei_limit = wei_from_eth_str(&form.eth_limit)
        .filter(|limit| *limit >= MIN_CAMPAIGN_LIMIT)
        .ok_or_else(|| ValidationError::new("The wei limit must be greater than 0.05 ETH."))?;
    if wei_limit.0 > combat_lvl as u128 * WEI_PER_ETH / 10 {
        return Err(ValidationError::new(
            "Your combact level is too low for the requested ETH!",
        ));
    }
    let week_duration: u64 = form
        .week_duration
        .trim()
        .parse()
        .ok()
        .filter(|weeks| *weeks >= MIN_CAMPAIGN_WEEKS)
        .ok_or_else(|| ValidationError::new("The campaign duration must be at least 8 week."))?;

    Ok(ValidCampaign {
        wei_limit,
        week_duration,
        deposit: Wei(wei_limit.0 / DEPOSIT_DIVISOR),
    })
}

fn parse_birthday(input: &str) -> Option<(i64, u32, u32)> {
    let mut parts = input.trim().splitn(3, '-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || !(1900..=2200).contains(&year) {
        return None;
    }
    Some((year, month, day))
}

fn is_at_least_age(birth: (i64, u32, u32), now_secs: u64, years: i64) -> bool {
    let today = civil_from_days((now_secs / 86_400) as i64);
    let threshold = (birth.0 + years, birth.1, birth.2);
    (today.0, today.1, today.2) >= threshold
}

fn is_wallet_address(input: &str) -> bool {
    let hex = match input.strip_prefix("0x") {
        Some(hex) => hex,
        None => return false,
    };
    hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}
