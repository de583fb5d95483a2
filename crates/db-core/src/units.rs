//! Wei/ETH conversion and date formatting.
//!
//! Wei is canonical everywhere; ETH strings exist only at the input/display
//! edge, so both directions live here and nowhere else.

use db_api_types::{WEI_PER_ETH, Wei};

/// Parse a user-supplied ETH amount ("0.05", "1", "2.5") into wei.
///
/// Returns `None` for empty, negative, malformed, or over-precise input
/// (more than 18 fractional digits cannot be represented in wei).
pub fn wei_from_eth_str(input: &str) -> Option<Wei> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('-') || input.starts_with('+') {
        return None;
    }

    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if frac.len() > 18 {
        return None;
    }
    if whole.is_empty() && frac.is_empty() {
        return None;
    }

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let frac_wei: u128 = if frac.is_empty() {
        0
    } else {
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let scale = 10u128.pow(18 - frac.len() as u32);
        frac.parse::<u128>().ok()?.checked_mul(scale)?
    };

    whole
        .checked_mul(WEI_PER_ETH)?
        .checked_add(frac_wei)
        .map(Wei)
}

/// Format a wei amount as an ETH string with trailing zeros trimmed,
/// e.g. `1500000000000000000` → `"1.5"`, `0` → `"0"`.
pub fn eth_from_wei(amount: Wei) -> String {
    let whole = amount.0 / WEI_PER_ETH;
    let frac = amount.0 % WEI_PER_ETH;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:018}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Format a Unix timestamp (seconds) as `YYYY/MM/DD`, the page's date style.
pub fn format_date(unix_secs: u64) -> String {
    let (year, month, day) = civil_from_days((unix_secs / 86_400) as i64);
    format!("{year:04}/{month:02}/{day:02}")
}

// Gregorian date from days since the Unix epoch (Hinnant's civil_from_days).
pub(crate) fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eth_strings_parse_to_wei() {
        assert_eq!(wei_from_eth_str("1"), Some(Wei(WEI_PER_ETH)));
        assert_eq!(wei_from_eth_str("0.05"), Some(Wei(50_000_000_000_000_000)));
        assert_eq!(wei_from_eth_str("0.0005"), Some(Wei(500_000_000_000_000)));
        assert_eq!(wei_from_eth_str("2.5"), Some(Wei(2_500_000_000_000_000_000)));
        assert_eq!(wei_from_eth_str(".5"), Some(Wei(500_000_000_000_000_000)));
    }

    #[test]
    fn malformed_eth_strings_are_rejected() {
        assert_eq!(wei_from_eth_str(""), None);
        assert_eq!(wei_from_eth_str("-1"), None);
        assert_eq!(wei_from_eth_str("1.2.3"), None);
        assert_eq!(wei_from_eth_str("abc"), None);
        assert_eq!(wei_from_eth_str("."), None);
        // 19 fractional digits cannot be represented in wei
        assert_eq!(wei_from_eth_str("0.0000000000000000001"), None);
    }

    #[test]
    fn wei_formats_back_to_trimmed_eth() {
        assert_eq!(eth_from_wei(Wei(WEI_PER_ETH)), "1");
        assert_eq!(eth_from_wei(Wei(1_500_000_000_000_000_000)), "1.5");
        assert_eq!(eth_from_wei(Wei(500_000_000_000_000)), "0.0005");
        assert_eq!(eth_from_wei(Wei(0)), "0");
    }

    #[test]
    fn dates_format_like_the_campaign_cards() {
        // 2023-11-14 22:13:20 UTC
        assert_eq!(format_date(1_700_000_000), "2023/11/14");
        assert_eq!(format_date(0), "1970/01/01");
        // leap day
        assert_eq!(format_date(1_709_164_800), "2024/02/29");
    }
}
