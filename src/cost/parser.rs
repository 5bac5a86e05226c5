//! Cost description parser

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cost::Cost;

static BLESSING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(-?\d+)\s*BP").expect("blessing pattern is valid"));

static FORTUNE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(-?\d+)\s*FP").expect("fortune pattern is valid"));

/// "use -3 BP" style amounts
static USE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)use\s+(-?\d+)").expect("use pattern is valid"));

/// Alternative pricing separator
static ALTERNATIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bor\b").expect("alternative pattern is valid"));

/// Parse a cost description into a signed cost
///
/// Descriptions starting with "grants" give currency to the user and
/// produce negative amounts; everything else is a spend. Only the part
/// before an alternative ("... or ...") is priced.
pub fn parse_cost(text: &str) -> Cost {
    let lower = text.to_lowercase();
    if lower.trim().is_empty()
        || lower.contains("free")
        || lower.contains("costs 0")
        || lower.contains("variable")
    {
        return Cost::ZERO;
    }

    let is_grant = lower.trim_start().starts_with("grants");
    let primary = ALTERNATIVE_RE.split(text).next().unwrap_or(text);
    let normalized = USE_RE.replace_all(primary, "$1");

    let sign = if is_grant { -1 } else { 1 };
    Cost {
        blessing: sign * first_amount(&BLESSING_RE, &normalized),
        fortune: sign * first_amount(&FORTUNE_RE, &normalized),
    }
}

/// Magnitude of the first amount matched by `pattern`
fn first_amount(pattern: &Regex, text: &str) -> i32 {
    pattern
        .captures(text)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .map(|value| value.unsigned_abs().min(i32::MAX as u32) as i32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend() {
        assert_eq!(parse_cost("Costs -3 FP"), Cost::new(0, 3));
        assert_eq!(parse_cost("Costs -10 BP"), Cost::new(10, 0));
        assert_eq!(parse_cost("costs 4bp"), Cost::new(4, 0));
    }

    #[test]
    fn test_grant() {
        assert_eq!(parse_cost("Grants +5 FP"), Cost::new(0, -5));
        assert_eq!(parse_cost("GRANTS 2 BP"), Cost::new(-2, 0));
        assert_eq!(parse_cost("  grants -7 FP"), Cost::new(0, -7));
    }

    #[test]
    fn test_both_currencies() {
        assert_eq!(parse_cost("Costs -2 BP and -6 FP"), Cost::new(2, 6));
    }

    #[test]
    fn test_free_forms() {
        assert_eq!(parse_cost(""), Cost::ZERO);
        assert_eq!(parse_cost("   "), Cost::ZERO);
        assert_eq!(parse_cost("Free"), Cost::ZERO);
        assert_eq!(parse_cost("Costs 0 FP"), Cost::ZERO);
        assert_eq!(parse_cost("Variable"), Cost::ZERO);
    }

    #[test]
    fn test_alternative_pricing_uses_first_segment() {
        assert_eq!(parse_cost("Costs -2 BP or -4 FP"), Cost::new(2, 0));
        assert_eq!(parse_cost("Costs -4 FP OR -2 BP"), Cost::new(0, 4));
        // "for" is not an alternative
        assert_eq!(parse_cost("Costs -3 FP for each"), Cost::new(0, 3));
    }

    #[test]
    fn test_use_form() {
        assert_eq!(parse_cost("Use -3 BP"), Cost::new(3, 0));
        assert_eq!(parse_cost("use 2 FP"), Cost::new(0, 2));
    }

    #[test]
    fn test_no_currency() {
        assert_eq!(parse_cost("Costs one favour"), Cost::ZERO);
    }
}
