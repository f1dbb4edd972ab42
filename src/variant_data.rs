//! Decoding of the hidden variant blob carried in `additionalDataToReturn`.
//!
//! The field is a string-encoded list of variant sub-records, frequently
//! double-escaped and sometimes written with single-quoted literal syntax
//! rather than strict JSON. Decoding degrades rather than fails: any input
//! this module cannot make sense of becomes "no variant data available".

use serde_json::Value;

use crate::types::VariantRecord;

/// Decode the hidden blob into variant records. Never errors.
///
/// Strings go through unescape → strict parse → permissive literal pass;
/// an already-structured array is decoded element by element; everything
/// else is an empty list.
pub fn parse_additional_data(value: &Value) -> Vec<VariantRecord> {
    match value {
        Value::Array(items) => decode_items(items),
        Value::String(s) => parse_encoded(s),
        _ => Vec::new(),
    }
}

/// Best-effort element decode: entries that are not variant-shaped objects
/// are dropped, not fatal.
fn decode_items(items: &[Value]) -> Vec<VariantRecord> {
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

fn parse_encoded(raw: &str) -> Vec<VariantRecord> {
    let mut cleaned = raw.trim().replace("\\\"", "\"").replace("\\/", "/");
    if cleaned.len() >= 2 && cleaned.starts_with('"') && cleaned.ends_with('"') {
        cleaned = cleaned[1..cleaned.len() - 1].to_string();
    }
    if cleaned.is_empty() {
        return Vec::new();
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&cleaned) {
        return decode_items(&items);
    }

    match serde_json::from_str::<Value>(&relax_literals(&cleaned)) {
        Ok(Value::Array(items)) => decode_items(&items),
        _ => Vec::new(),
    }
}

/// Rewrite literal-syntax payloads into strict JSON: single-quoted strings
/// become double-quoted (escaping any embedded double quotes), and bare
/// `True` / `False` / `None` outside strings become their JSON spellings.
fn relax_literals(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut delim: Option<char> = None;
    let mut i = 0;

    while let Some(c) = input[i..].chars().next() {
        let rest = &input[i..];

        if let Some(d) = delim {
            if c == '\\' {
                let mut chars = rest.chars();
                chars.next();
                match chars.next() {
                    // \' is not a valid JSON escape; the quote is literal.
                    Some('\'') => {
                        out.push('\'');
                        i += 2;
                    }
                    Some(next) => {
                        out.push('\\');
                        out.push(next);
                        i += 1 + next.len_utf8();
                    }
                    None => {
                        out.push('\\');
                        i += 1;
                    }
                }
                continue;
            }
            if c == d {
                out.push('"');
                delim = None;
            } else if c == '"' {
                out.push_str("\\\"");
            } else {
                out.push(c);
            }
            i += c.len_utf8();
        } else if c == '\'' || c == '"' {
            delim = Some(c);
            out.push('"');
            i += 1;
        } else if rest.starts_with("True") {
            out.push_str("true");
            i += 4;
        } else if rest.starts_with("False") {
            out.push_str("false");
            i += 5;
        } else if rest.starts_with("None") {
            out.push_str("null");
            i += 4;
        } else {
            out.push(c);
            i += c.len_utf8();
        }
    }

    out
}
