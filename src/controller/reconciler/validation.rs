//! # Duration Validation
//!
//! Parses the certificate lifetime fields of an `EtcdProxy`.

use crate::constants::CERT_DURATION_PATTERN;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static DURATION_FORMAT: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(CERT_DURATION_PATTERN));

static DURATION_SEGMENT: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?P<whole>\d+)(?:\.(?P<fraction>\d*))?|\.(?P<bare_fraction>\d+))(?P<unit>ns|us|µs|μs|ms|s|m|h|d)",
    )
});

/// Fraction digits beyond nanosecond resolution of the largest unit are dropped
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse a Kubernetes (Go `metav1.Duration`) duration string.
///
/// Accepts the `time.ParseDuration` grammar: an optional `+`, then one or more
/// decimal `<number><unit>` segments with units `ns`, `us` (or `µs`), `ms`,
/// `s`, `m` and `h`, plus `d` for days. "1.5h", "500us" and "8760h0m0.5s" are
/// valid. A bare "0" and zero totals such as "0s" give [`Duration::ZERO`].
/// Negative durations are rejected.
pub fn parse_kubernetes_duration(duration_str: &str) -> Result<Duration> {
    let duration_trimmed = duration_str.trim();

    if duration_trimmed.is_empty() {
        return Err(anyhow::anyhow!("Duration string cannot be empty"));
    }

    let format = DURATION_FORMAT
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to compile regex: {e}"))?;
    let segment = DURATION_SEGMENT
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to compile regex: {e}"))?;

    if !format.is_match(duration_trimmed) {
        return Err(anyhow::anyhow!(
            "Invalid duration format '{}'. Expected <number><unit> segments (e.g., '30m', '1.5h', '8760h')",
            duration_trimmed
        ));
    }

    let too_large = || anyhow::anyhow!("Duration '{}' is too large", duration_trimmed);

    let mut total_nanos: u128 = 0;
    for captures in segment.captures_iter(duration_trimmed) {
        let unit_nanos: u128 = match &captures["unit"] {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60_000_000_000,
            "h" => 3_600_000_000_000,
            "d" => 86_400_000_000_000,
            unit => {
                return Err(anyhow::anyhow!(
                    "Invalid unit '{}' in duration '{}'. Expected: ns, us, ms, s, m, h, or d",
                    unit,
                    duration_trimmed
                ));
            }
        };

        let whole: u128 = match captures.name("whole") {
            Some(number) => number.as_str().parse().map_err(|e| {
                anyhow::anyhow!("Invalid duration number in '{}': {}", duration_trimmed, e)
            })?,
            None => 0,
        };
        let mut segment_nanos = whole.checked_mul(unit_nanos).ok_or_else(too_large)?;

        let fraction = captures
            .name("fraction")
            .or_else(|| captures.name("bare_fraction"))
            .map_or("", |digits| digits.as_str());
        let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
        if !digits.is_empty() {
            let numerator: u128 = digits.parse().map_err(|e| {
                anyhow::anyhow!("Invalid duration fraction in '{}': {}", duration_trimmed, e)
            })?;
            let scale = digits.chars().fold(1_u128, |acc, _| acc * 10);
            segment_nanos = segment_nanos
                .checked_add(numerator * unit_nanos / scale)
                .ok_or_else(too_large)?;
        }

        total_nanos = total_nanos
            .checked_add(segment_nanos)
            .ok_or_else(too_large)?;
    }

    let nanos = u64::try_from(total_nanos)
        .map_err(|e| anyhow::anyhow!("Duration '{}' is too large: {}", duration_trimmed, e))?;
    Ok(Duration::from_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_unit_durations() {
        assert_eq!(
            parse_kubernetes_duration("30s").unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            parse_kubernetes_duration("5m").unwrap(),
            Duration::from_secs(300)
        );
        assert_eq!(
            parse_kubernetes_duration("8760h").unwrap(),
            Duration::from_secs(8760 * 3600)
        );
        assert_eq!(
            parse_kubernetes_duration("2d").unwrap(),
            Duration::from_secs(2 * 86400)
        );
        assert_eq!(
            parse_kubernetes_duration("250ms").unwrap(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_compound_go_style_durations() {
        assert_eq!(
            parse_kubernetes_duration("1h30m").unwrap(),
            Duration::from_secs(5400)
        );
        assert_eq!(
            parse_kubernetes_duration("8760h0m0s").unwrap(),
            Duration::from_secs(8760 * 3600)
        );
        assert_eq!(
            parse_kubernetes_duration("+1m30s").unwrap(),
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_fractional_durations() {
        assert_eq!(
            parse_kubernetes_duration("1.5h").unwrap(),
            Duration::from_secs(5400)
        );
        assert_eq!(
            parse_kubernetes_duration("8760h0m0.5s").unwrap(),
            Duration::from_secs(8760 * 3600) + Duration::from_millis(500)
        );
        assert_eq!(
            parse_kubernetes_duration(".5m").unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            parse_kubernetes_duration("2.s").unwrap(),
            Duration::from_secs(2)
        );
        assert_eq!(
            parse_kubernetes_duration("1.0000000000000000000001s").unwrap(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_sub_millisecond_units() {
        assert_eq!(
            parse_kubernetes_duration("500us").unwrap(),
            Duration::from_micros(500)
        );
        assert_eq!(
            parse_kubernetes_duration("500µs").unwrap(),
            Duration::from_micros(500)
        );
        assert_eq!(
            parse_kubernetes_duration("1ms250ns").unwrap(),
            Duration::from_nanos(1_000_250)
        );
    }

    #[test]
    fn test_zero_durations_parse_to_zero() {
        for input in ["0", "0s", "0h0m", "0.0s"] {
            assert_eq!(
                parse_kubernetes_duration(input).unwrap(),
                Duration::ZERO,
                "'{input}'"
            );
        }
    }

    #[test]
    fn test_invalid_durations() {
        for input in [
            "", "   ", "1", "h", "1w", "-1h", "1h 30m", "abc", ".s", "1..5s", "1H",
        ] {
            assert!(
                parse_kubernetes_duration(input).is_err(),
                "'{input}' should be rejected"
            );
        }
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert!(parse_kubernetes_duration("99999999999999999999h").is_err());
        assert!(parse_kubernetes_duration("9999999999999999d").is_err());
    }
}
