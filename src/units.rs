// Textual quantity normalization: byte sizes, percentages, rounding, uptime.

use crate::error::{AgentError, Result};
use std::fmt;
use tracing::warn;

const KB: u128 = 1000;
const KIB: u128 = 1024;

/// Recognized byte-size suffixes, longest first. Case-sensitive.
const BYTE_UNITS: &[(&str, u128)] = &[
    ("KiB", KIB),
    ("MiB", KIB * KIB),
    ("GiB", KIB * KIB * KIB),
    ("kB", KB),
    ("MB", KB * KB),
    ("GB", KB * KB * KB),
    ("B", 1),
];

/// Fraction digits beyond this cannot change the result for any multiplier above.
const MAX_FRACTION_DIGITS: usize = 18;

/// Multiplier for a byte-size suffix, or `UnrecognizedUnit`.
pub fn byte_multiplier(suffix: &str) -> Result<u128> {
    BYTE_UNITS
        .iter()
        .find(|(unit, _)| *unit == suffix)
        .map(|(_, mult)| *mult)
        .ok_or_else(|| AgentError::UnrecognizedUnit(suffix.to_string()))
}

/// Converts `(numeric-text, unit-suffix)` into a byte count.
///
/// The decimal text is scaled with integer arithmetic, so `"1.5"` + `"kB"` is
/// exactly 1500. A fractional byte left over after scaling is truncated.
pub fn to_bytes(number: &str, suffix: &str) -> Result<u64> {
    let (numerator, denominator) = parse_decimal(number)?;
    let mult = byte_multiplier(suffix)?;
    let scaled = numerator
        .checked_mul(mult)
        .ok_or_else(|| AgentError::parse(format!("byte size out of range: {number}{suffix}")))?
        / denominator;
    u64::try_from(scaled)
        .map_err(|_| AgentError::parse(format!("byte size out of range: {number}{suffix}")))
}

/// Parses a byte size such as `"100MiB"` or `"1.5 kB"`.
pub fn parse_bytes(text: &str) -> Result<u64> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);
    to_bytes(number, suffix.trim())
}

/// Like [`parse_bytes`], but an unrecognized unit is logged and yields 0.
///
/// Malformed numbers still fail.
pub fn parse_bytes_or_zero(text: &str) -> Result<u64> {
    match parse_bytes(text) {
        Err(AgentError::UnrecognizedUnit(unit)) => {
            warn!(unit = %unit, input = text, "unrecognized byte unit, using 0");
            Ok(0)
        }
        other => other,
    }
}

/// Splits decimal text into `numerator / 10^fraction_digits`.
fn parse_decimal(text: &str) -> Result<(u128, u128)> {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty())
        || !digits_only(int_part)
        || !digits_only(frac_part)
    {
        return Err(AgentError::parse(format!("invalid number '{text}'")));
    }
    let frac_part = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
    let denominator = 10u128.pow(frac_part.len() as u32);
    let out_of_range = || AgentError::parse(format!("number out of range '{text}'"));
    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| out_of_range())?
    };
    let frac_value: u128 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse().map_err(|_| out_of_range())?
    };
    let numerator = int_value
        .checked_mul(denominator)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(out_of_range)?;
    Ok((numerator, denominator))
}

/// Parses `"12.34%"` (the `%` is optional) into `12.34`.
pub fn parse_percent(text: &str) -> Result<f64> {
    let text = text.trim();
    let number = text.strip_suffix('%').unwrap_or(text).trim();
    number
        .parse::<f64>()
        .map_err(|_| AgentError::parse(format!("invalid percentage '{text}'")))
}

/// Rounds to `places` decimal places, ties to even.
///
/// `round_to(0.125, 2) == 0.12`, `round_to(0.375, 2) == 0.38`.
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places as i32);
    (value * scale).round_ties_even() / scale
}

/// Uptime split into days, hours, minutes and seconds.
///
/// `Display` renders only the strictly positive components, so zero seconds
/// render as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Uptime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Uptime {
    pub fn from_secs(total: u64) -> Self {
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The collector backend expects these unit labels.
        for (value, label) in [
            (self.days, "天"),
            (self.hours, "小时"),
            (self.minutes, "分钟"),
            (self.seconds, "秒"),
        ] {
            if value > 0 {
                write!(f, "{value}{label}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bytes_applies_decimal_and_binary_multipliers() {
        assert_eq!(parse_bytes("7B").unwrap(), 7);
        assert_eq!(parse_bytes("3kB").unwrap(), 3_000);
        assert_eq!(parse_bytes("2MB").unwrap(), 2_000_000);
        assert_eq!(parse_bytes("4GB").unwrap(), 4_000_000_000);
        assert_eq!(parse_bytes("1KiB").unwrap(), 1024);
        assert_eq!(parse_bytes("100MiB").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_bytes("2GiB").unwrap(), 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn parse_bytes_is_exact_for_fractional_input() {
        assert_eq!(parse_bytes("1.5kB").unwrap(), 1_500);
        assert_eq!(parse_bytes("12.3kB").unwrap(), 12_300);
        assert_eq!(parse_bytes("0.1GB").unwrap(), 100_000_000);
        assert_eq!(parse_bytes("1.5GiB").unwrap(), 1_610_612_736);
        // 0.5 B truncates
        assert_eq!(parse_bytes("0.5B").unwrap(), 0);
    }

    #[test]
    fn parse_bytes_accepts_space_between_number_and_unit() {
        assert_eq!(parse_bytes(" 512 KiB ").unwrap(), 512 * 1024);
    }

    #[test]
    fn binary_suffix_is_not_mistaken_for_plain_bytes() {
        assert_eq!(parse_bytes("1KiB").unwrap(), 1024);
        assert_ne!(parse_bytes("1KiB").unwrap(), 1);
    }

    #[test]
    fn suffixes_are_case_sensitive() {
        assert!(matches!(
            parse_bytes("1kb"),
            Err(AgentError::UnrecognizedUnit(u)) if u == "kb"
        ));
        assert!(matches!(
            parse_bytes("1KB"),
            Err(AgentError::UnrecognizedUnit(u)) if u == "KB"
        ));
    }

    #[test]
    fn unrecognized_unit_is_reported_and_lenient_variant_yields_zero() {
        assert!(matches!(
            parse_bytes("5TB"),
            Err(AgentError::UnrecognizedUnit(u)) if u == "TB"
        ));
        assert_eq!(parse_bytes_or_zero("5TB").unwrap(), 0);
    }

    #[test]
    fn malformed_numbers_fail_even_when_lenient() {
        assert!(matches!(parse_bytes("--"), Err(AgentError::Parse(_))));
        assert!(matches!(parse_bytes("1.2.3MB"), Err(AgentError::Parse(_))));
        assert!(matches!(parse_bytes_or_zero("MiB"), Err(AgentError::Parse(_))));
    }

    #[test]
    fn parse_percent_strips_trailing_sign() {
        assert_eq!(parse_percent("12.34%").unwrap(), 12.34);
        assert_eq!(parse_percent(" 0.00% ").unwrap(), 0.0);
        assert_eq!(parse_percent("56.78").unwrap(), 56.78);
        assert!(parse_percent("--").is_err());
    }

    #[test]
    fn round_to_uses_ties_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(87.654321, 2), 87.65);
    }

    #[test]
    fn round_to_is_idempotent() {
        for v in [0.125, 3.14159, 99.995, 12.3456, 100.0, 0.0, 45.678] {
            let once = round_to(v, 2);
            assert_eq!(round_to(once, 2), once, "value {v}");
        }
    }

    #[test]
    fn uptime_of_zero_renders_empty() {
        let u = Uptime::from_secs(0);
        assert_eq!(u, Uptime::default());
        assert_eq!(u.to_string(), "");
    }

    #[test]
    fn uptime_renders_every_positive_component() {
        let u = Uptime::from_secs(90_061);
        assert_eq!(
            u,
            Uptime {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
        assert_eq!(u.to_string(), "1天1小时1分钟1秒");
    }

    #[test]
    fn uptime_omits_zero_components() {
        assert_eq!(Uptime::from_secs(59).to_string(), "59秒");
        assert_eq!(Uptime::from_secs(3_600).to_string(), "1小时");
        assert_eq!(Uptime::from_secs(86_400 + 120).to_string(), "1天2分钟");
    }
}
