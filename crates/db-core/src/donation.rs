//! Client-side donation checks.
//!
//! Every rule here runs before any transaction is issued; the contract
//! enforces the same limits again on-chain.

use crate::forms::ValidationError;
use crate::units::eth_from_wei;
use db_api_types::Wei;

/// Default donation step: 0.0005 ETH, expressed in wei.
pub const DEFAULT_DONATION_STEP: Wei = Wei(500_000_000_000_000);

/// Validate a donation of `amount` against the configured step size and the
/// campaign's contribution limit.
///
/// Rejects, in order: non-positive amounts, amounts that are not a positive
/// multiple of `step`, and amounts that would push `donated` past `limit`.
pub fn check_donation(amount: Wei, step: Wei, donated: Wei, limit: Wei) -> Result<(), ValidationError> {
    if amount.0 == 0 {
        return Err(ValidationError::new("The donation must be greater than zero."));
    }
    if step.0 == 0 || amount.0 % step.0 != 0 {
        return Err(ValidationError::new(format!(
            "The donation must be a multiple of {} ETH.",
            eth_from_wei(step)
        )));
    }
    match donated.checked_add(amount) {
        Some(total) if total <= limit => Ok(()),
        _ => Err(ValidationError::new(format!(
            "The donation exceeds the campaign limit ({} ETH remaining).",
            eth_from_wei(Wei(limit.0.saturating_sub(donated.0)))
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: Wei = Wei(1_000_000_000_000_000_000);

    #[test]
    fn accepts_step_multiples_under_the_limit() {
        assert!(check_donation(DEFAULT_DONATION_STEP, DEFAULT_DONATION_STEP, Wei(0), LIMIT).is_ok());
        assert!(
            check_donation(Wei(DEFAULT_DONATION_STEP.0 * 40), DEFAULT_DONATION_STEP, Wei(0), LIMIT)
                .is_ok()
        );
    }

    #[test]
    fn rejects_amounts_off_the_step_grid() {
        for off_grid in [1, DEFAULT_DONATION_STEP.0 - 1, DEFAULT_DONATION_STEP.0 + 1] {
            assert!(
                check_donation(Wei(off_grid), DEFAULT_DONATION_STEP, Wei(0), LIMIT).is_err(),
                "{off_grid} wei should not pass the step check"
            );
        }
    }

    #[test]
    fn rejects_zero_donations() {
        assert!(check_donation(Wei(0), DEFAULT_DONATION_STEP, Wei(0), LIMIT).is_err());
    }

    #[test]
    fn rejects_donations_past_the_campaign_limit() {
        // Step-valid, but cumulative total would exceed the limit.
        let donated = Wei(LIMIT.0 - DEFAULT_DONATION_STEP.0);
        let amount = Wei(DEFAULT_DONATION_STEP.0 * 2);
        let err = check_donation(amount, DEFAULT_DONATION_STEP, donated, LIMIT).unwrap_err();
        assert!(err.message().contains("exceeds the campaign limit"));

        // Filling exactly to the limit is fine.
        assert!(check_donation(DEFAULT_DONATION_STEP, DEFAULT_DONATION_STEP, donated, LIMIT).is_ok());
    }

    #[test]
    fn overflowing_totals_are_rejected_not_wrapped() {
        let donated = Wei(u128::MAX - 1);
        assert!(check_donation(DEFAULT_DONATION_STEP, DEFAULT_DONATION_STEP, donated, LIMIT).is_err());
    }
}
