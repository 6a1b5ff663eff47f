//! Normalizers for loosely-typed product fields.
//!
//! Every function here is total: it inspects a raw JSON value and returns
//! either a canonical value or a signal that the input was unusable.

use serde_json::{Number, Value};

use crate::database::models::Brand;

/// Outcome of normalizing a field that may be omitted on partial updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalized<T> {
    Valid(T),
    Invalid,
    Absent,
}

/// True iff `value` is a string naming one of the known brands exactly
pub fn is_brand(value: &Value) -> bool {
    parse_brand(value).is_some()
}

pub fn parse_brand(value: &Value) -> Option<Brand> {
    value.as_str()?.parse().ok()
}

/// Numbers become their decimal text; strings are trimmed and must be a
/// plain finite decimal (`12`, `-3.50`, `.5`). Anything else is rejected.
pub fn normalize_price(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => number_to_decimal(n),
        Value::String(s) => {
            let trimmed = s.trim();
            is_plain_decimal(trimmed).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

// Optional sign, digits, optional fraction. No exponent, NaN or infinity.
fn is_plain_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    (!whole.is_empty() || !fraction.is_empty()) && digits(whole) && digits(fraction)
}

fn number_to_decimal(n: &Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return Some(i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    // f64's Display is the shortest round-trip form and never uses exponents
    n.as_f64().filter(|f| f.is_finite()).map(|f| f.to_string())
}

/// An array whose every element is a string; `[]` is fine
pub fn normalize_images(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect()
}

/// `None` (key not sent) is `Absent`. Numbers and numeric strings are
/// truncated toward zero and must not be negative; anything else, including
/// `null`, is `Invalid`.
pub fn normalize_stock(value: Option<&Value>) -> Normalized<i32> {
    match value {
        None => Normalized::Absent,
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).map_or(Normalized::Invalid, non_negative);
            }
            if n.is_u64() {
                // Larger than i64::MAX, certainly out of range
                return Normalized::Invalid;
            }
            n.as_f64().map_or(Normalized::Invalid, truncate_to_i32)
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Normalized::Invalid;
            }
            trimmed
                .parse::<f64>()
                .map_or(Normalized::Invalid, truncate_to_i32)
        }
        Some(_) => Normalized::Invalid,
    }
}

fn truncate_to_i32(f: f64) -> Normalized<i32> {
    if !f.is_finite() {
        return Normalized::Invalid;
    }
    let truncated = f.trunc();
    if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
        return Normalized::Invalid;
    }
    non_negative(truncated as i32)
}

fn non_negative(stock: i32) -> Normalized<i32> {
    if stock < 0 {
        Normalized::Invalid
    } else {
        Normalized::Valid(stock)
    }
}

/// A string field; blank strings are rejected unless `allow_empty`
pub fn normalize_text(value: &Value, allow_empty: bool) -> Option<String> {
    let s = value.as_str()?;
    if !allow_empty && s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_brand_accepts_known_brands() {
        assert!(is_brand(&json!("Cuisinart")));
        assert!(is_brand(&json!("Kitchenaid")));
    }

    #[test]
    fn is_brand_rejects_everything_else() {
        assert!(!is_brand(&json!("InvalidBrand")));
        assert!(!is_brand(&json!("cuisinart")));
        assert!(!is_brand(&json!(123)));
        assert!(!is_brand(&Value::Null));
        assert!(!is_brand(&json!({})));
        assert!(!is_brand(&json!(["Cuisinart"])));
    }

    #[test]
    fn normalize_price_formats_numbers() {
        assert_eq!(normalize_price(&json!(99.99)).as_deref(), Some("99.99"));
        assert_eq!(normalize_price(&json!(0)).as_deref(), Some("0"));
        assert_eq!(normalize_price(&json!(1000)).as_deref(), Some("1000"));
        assert_eq!(normalize_price(&json!(149.5)).as_deref(), Some("149.5"));
        assert_eq!(normalize_price(&json!(-3)).as_deref(), Some("-3"));
    }

    #[test]
    fn normalize_price_trims_strings() {
        assert_eq!(normalize_price(&json!("  99.99  ")).as_deref(), Some("99.99"));
        assert_eq!(normalize_price(&json!("50")).as_deref(), Some("50"));
        assert_eq!(normalize_price(&json!("-3.50")).as_deref(), Some("-3.50"));
        assert_eq!(normalize_price(&json!(".5")).as_deref(), Some(".5"));
        assert_eq!(normalize_price(&json!("12.")).as_deref(), Some("12."));
    }

    #[test]
    fn normalize_price_rejects_non_decimal_strings() {
        for bad in ["NaN", "nan", "Infinity", "-inf", "abc", "1e3", "12.3.4", "1,000", ".", "-", "+.", "0x10"] {
            assert_eq!(normalize_price(&json!(bad)), None, "{}", bad);
        }
    }

    #[test]
    fn normalize_price_rejects_blank_and_non_numbers() {
        assert_eq!(normalize_price(&json!("")), None);
        assert_eq!(normalize_price(&json!("   ")), None);
        // serde_json turns non-finite floats into null
        assert_eq!(normalize_price(&json!(f64::NAN)), None);
        assert_eq!(normalize_price(&json!(f64::INFINITY)), None);
        assert_eq!(normalize_price(&Value::Null), None);
        assert_eq!(normalize_price(&json!({})), None);
        assert_eq!(normalize_price(&json!(true)), None);
    }

    #[test]
    fn normalize_images_keeps_string_arrays() {
        assert_eq!(
            normalize_images(&json!(["image1.jpg", "image2.jpg"])),
            Some(vec!["image1.jpg".to_string(), "image2.jpg".to_string()])
        );
        assert_eq!(normalize_images(&json!([])), Some(vec![]));
    }

    #[test]
    fn normalize_images_rejects_non_arrays() {
        assert_eq!(normalize_images(&json!("not an array")), None);
        assert_eq!(normalize_images(&json!(123)), None);
        assert_eq!(normalize_images(&Value::Null), None);
        assert_eq!(normalize_images(&json!({})), None);
    }

    #[test]
    fn normalize_images_rejects_mixed_arrays() {
        assert_eq!(normalize_images(&json!(["image1.jpg", 123])), None);
        assert_eq!(normalize_images(&json!([null, "image1.jpg"])), None);
        assert_eq!(normalize_images(&json!([{}, "image1.jpg"])), None);
    }

    #[test]
    fn normalize_stock_absent_is_absent() {
        assert_eq!(normalize_stock(None), Normalized::Absent);
    }

    #[test]
    fn normalize_stock_truncates_numbers() {
        assert_eq!(normalize_stock(Some(&json!(10))), Normalized::Valid(10));
        assert_eq!(normalize_stock(Some(&json!(0))), Normalized::Valid(0));
        assert_eq!(normalize_stock(Some(&json!(10.7))), Normalized::Valid(10));
        assert_eq!(normalize_stock(Some(&json!(99.99))), Normalized::Valid(99));
        assert_eq!(normalize_stock(Some(&json!(-0.5))), Normalized::Valid(0));
    }

    #[test]
    fn normalize_stock_rejects_negatives() {
        assert_eq!(normalize_stock(Some(&json!(-1))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!(-2.5))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!("-5"))), Normalized::Invalid);
    }

    #[test]
    fn normalize_stock_parses_numeric_strings() {
        assert_eq!(normalize_stock(Some(&json!("10"))), Normalized::Valid(10));
        assert_eq!(normalize_stock(Some(&json!("0"))), Normalized::Valid(0));
        assert_eq!(normalize_stock(Some(&json!("100"))), Normalized::Valid(100));
        assert_eq!(normalize_stock(Some(&json!(" 7.9 "))), Normalized::Valid(7));
    }

    #[test]
    fn normalize_stock_rejects_invalid_values() {
        assert_eq!(normalize_stock(Some(&json!(f64::NAN))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!("not a number"))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!(""))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!("Infinity"))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!("NaN"))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&Value::Null)), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!({}))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!([1]))), Normalized::Invalid);
    }

    #[test]
    fn normalize_stock_rejects_out_of_range() {
        assert_eq!(normalize_stock(Some(&json!(3_000_000_000u64))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!("1e12"))), Normalized::Invalid);
        assert_eq!(normalize_stock(Some(&json!(u64::MAX))), Normalized::Invalid);
    }

    #[test]
    fn normalize_text_respects_empty_policy() {
        assert_eq!(normalize_text(&json!("T"), false).as_deref(), Some("T"));
        assert_eq!(normalize_text(&json!(""), false), None);
        assert_eq!(normalize_text(&json!(""), true).as_deref(), Some(""));
        assert_eq!(normalize_text(&json!(12), true), None);
    }
}
