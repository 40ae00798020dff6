//! Threshold predicates, guarded ratios and display formatting shared by the rules.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a derived dedup key.
const DEDUP_KEY_PREFIX_LEN: usize = 24;

static RE_NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Z0-9]+").unwrap());

/// `numerator / denominator` when both are present and the denominator is non-zero.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// `value >= threshold`; false when absent.
pub fn at_least(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v >= threshold)
}

/// `value > threshold`; false when absent.
pub fn above(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

/// `value < threshold`; false when absent.
pub fn below(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v < threshold)
}

pub fn count_true(conditions: &[bool]) -> usize {
    conditions.iter().filter(|c| **c).count()
}

/// Display a metric the way clinicians type it: `32`, `17.5`.
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// Display an optional metric, `—` when absent.
pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_else(|| "—".to_string())
}

/// Ratios are shown with one decimal.
pub fn format_ratio(value: f64) -> String {
    format!("{:.1}", value)
}

/// Derive a dedup key from free text: upper-cased, punctuation collapsed to
/// `-`, truncated to a fixed prefix.
pub fn default_dedup_key(text: &str) -> String {
    let upper = text.trim().to_uppercase();
    let collapsed = RE_NON_ALNUM.replace_all(&upper, "-");
    let prefix: String = collapsed
        .trim_matches('-')
        .chars()
        .take(DEDUP_KEY_PREFIX_LEN)
        .collect();
    prefix.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_missing_and_zero_denominator() {
        assert_eq!(ratio(Some(20.0), Some(5.0)), Some(4.0));
        assert_eq!(ratio(Some(20.0), Some(0.0)), None);
        assert_eq!(ratio(None, Some(5.0)), None);
        assert_eq!(ratio(Some(20.0), None), None);
        assert_eq!(ratio(Some(0.0), Some(5.0)), Some(0.0));
    }

    #[test]
    fn comparisons_are_false_when_absent() {
        assert!(!at_least(None, 0.0));
        assert!(!above(None, -1.0));
        assert!(!below(None, 100.0));
        assert!(at_least(Some(30.0), 30.0));
        assert!(!at_least(Some(29.999), 30.0));
        assert!(!above(Some(2.0), 2.0));
        assert!(below(Some(84.9), 85.0));
    }

    #[test]
    fn count_true_counts() {
        assert_eq!(count_true(&[true, false, true, true]), 3);
        assert_eq!(count_true(&[]), 0);
    }

    #[test]
    fn format_value_drops_trailing_zero() {
        assert_eq!(format_value(32.0), "32");
        assert_eq!(format_value(17.5), "17.5");
        assert_eq!(format_optional(None), "—");
        assert_eq!(format_ratio(20.0), "20.0");
        assert_eq!(format_ratio(2.345), "2.3");
    }

    #[test]
    fn default_dedup_key_normalizes_prefix() {
        assert_eq!(default_dedup_key("  Start CPAP/APAP now."), "START-CPAP-APAP-NOW");
        assert_eq!(
            default_dedup_key("Start CPAP/APAP now."),
            default_dedup_key("start cpap / apap now")
        );
        let long = default_dedup_key("Consider a structured weight-loss program with dietitian support");
        assert!(long.len() <= DEDUP_KEY_PREFIX_LEN);
        assert!(!long.ends_with('-'));
    }
}
