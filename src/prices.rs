//! Price coercion, resolution against the hidden variant blob, and display
//! formatting.

use serde_json::Value;

use crate::types::{RawProduct, VariantRecord};

/// Coerce a loosely-typed price field to a number.
///
/// Numbers pass through; strings are stripped of currency symbols, commas
/// and surrounding whitespace before parsing. Anything else is None.
pub fn to_numeric_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse().ok()
            }
        }
        _ => None,
    }
}

/// Resolve the (original, sale) price pair for one item.
///
/// Defaults come from the item's top-level fields. When the decoded variant
/// list is non-empty its first element is treated as representative of the
/// base product: a positive numeric price replaces the original, a positive
/// numeric special price replaces the sale value. The embedded block is the
/// more authoritative source when it parses; the top-level fields are
/// frequently stale. A candidate that fails conversion keeps the default.
///
/// Inspecting only the first element is inherited vendor behavior and is
/// order-dependent on the upstream response, not a guaranteed contract.
pub fn resolve_prices(
    item: &RawProduct,
    variants: &[VariantRecord],
) -> (Option<f64>, Option<f64>) {
    let mut original = to_numeric_price(&item.price);
    let mut sale = to_numeric_price(&item.sale_price);

    if let Some(first) = variants.first() {
        if let Some(p) = to_numeric_price(&first.price).filter(|p| *p > 0.0) {
            original = Some(p);
        }
        if let Some(p) = to_numeric_price(&first.special_price).filter(|p| *p > 0.0) {
            sale = Some(p);
        }
    }

    (original, sale)
}

/// Format a price for display: currency prefix, thousands separators, two
/// decimals ("$1,234.56"). Absent prices render as an empty string.
pub fn fmt_price(value: Option<f64>) -> String {
    let Some(v) = value else {
        return String::new();
    };
    let cents = (v.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if v < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}

/// Discount percentage: `(original - sale) / original * 100`.
///
/// 0 when either side is missing or non-positive, or when the sale price is
/// not actually below the original; always in [0, 100).
pub fn discount_pct(original: Option<f64>, sale: Option<f64>) -> f64 {
    match (original, sale) {
        (Some(o), Some(s)) if o > 0.0 && s > 0.0 && s < o => (o - s) / o * 100.0,
        _ => 0.0,
    }
}
