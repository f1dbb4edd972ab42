//! Expansion of raw API records into normalized CSV rows.
//!
//! Configurable products fan out to one row per decoded variant; everything
//! else emits a single row. Failures here are per-item: the caller skips the
//! record and keeps the batch going.

use anyhow::{bail, Result};
use scraper::Html;

use crate::prices::{resolve_prices, to_numeric_price};
use crate::types::{ProductRow, RawProduct};
use crate::variant_data::parse_additional_data;

/// Strip HTML from a description, collapsing whitespace runs to single
/// spaces.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let text: String = document.root_element().text().collect::<Vec<_>>().join(" ");

    let mut cleaned = String::with_capacity(text.len());
    let mut prev_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_was_space && !cleaned.is_empty() {
                cleaned.push(' ');
                prev_was_space = true;
            }
        } else {
            cleaned.push(c);
            prev_was_space = false;
        }
    }
    cleaned.trim_end().to_string()
}

/// Variant row title: base name plus a parenthetical of whichever of
/// color/size are present, e.g. "Frypan - (Red, 28cm)". No suffix when the
/// variant has neither.
fn variant_title(base: &str, color: Option<&str>, size: Option<&str>) -> String {
    let parts: Vec<&str> = [color, size]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        base.to_string()
    } else {
        format!("{} - ({})", base, parts.join(", "))
    }
}

/// Expand one raw record into its normalized rows.
///
/// Errors on records that cannot satisfy the row invariants (non-empty title
/// and link); every row shares the item's category, description and stock
/// status. Variant rows use the variant's own identifier and fall back to
/// the item-level resolved prices when the variant lacks its own.
pub fn expand_product(item: &RawProduct) -> Result<Vec<ProductRow>> {
    let title = item.display_title.as_deref().map(str::trim).unwrap_or("");
    if title.is_empty() {
        bail!("missing display title");
    }
    let link = item.url.as_deref().map(str::trim).unwrap_or("");
    if link.is_empty() {
        bail!("missing product url");
    }

    let variants = parse_additional_data(&item.additional_data_to_return);
    let (original, sale) = resolve_prices(item, &variants);

    let category = item.category.clone().unwrap_or_default();
    let description = item
        .short_desc
        .as_deref()
        .map(html_to_text)
        .unwrap_or_default();
    let stock_status = item.in_stock.clone().unwrap_or_default();
    let item_id = item
        .productplu
        .clone()
        .or_else(|| item.sku.clone())
        .unwrap_or_default();

    if item.is_configurable() && !variants.is_empty() {
        let rows = variants
            .iter()
            .map(|variant| ProductRow {
                title: variant_title(title, variant.color.as_deref(), variant.size.as_deref()),
                original_price: to_numeric_price(&variant.price)
                    .filter(|p| *p > 0.0)
                    .or(original),
                sale_price: to_numeric_price(&variant.special_price)
                    .filter(|p| *p > 0.0)
                    .or(sale),
                category: category.clone(),
                product_id: variant.id_string().unwrap_or_else(|| item_id.clone()),
                link: link.to_string(),
                description: description.clone(),
                stock_status: stock_status.clone(),
            })
            .collect();
        return Ok(rows);
    }

    Ok(vec![ProductRow {
        title: title.to_string(),
        original_price: original,
        sale_price: sale,
        category,
        product_id: item_id,
        link: link.to_string(),
        description,
        stock_status,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawProduct {
        serde_json::from_value(value).unwrap()
    }

    fn base_item() -> serde_json::Value {
        json!({
            "displayTitle": "Ceramic Frypan",
            "price": "199.99",
            "salePrice": "149.99",
            "url": "https://example.com/frypan",
            "category": "Kitchenware;;Cookware",
            "productplu": "123456",
            "type": "simple",
            "inStock": "yes",
            "shortDesc": "<p>Non-stick <b>ceramic</b> frypan.</p>"
        })
    }

    #[test]
    fn test_simple_product_emits_one_row() {
        let rows = expand_product(&raw(base_item())).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.title, "Ceramic Frypan");
        assert_eq!(row.original_price, Some(199.99));
        assert_eq!(row.sale_price, Some(149.99));
        assert_eq!(row.product_id, "123456");
        assert_eq!(row.description, "Non-stick ceramic frypan.");
        assert_eq!(row.stock_status, "yes");
    }

    #[test]
    fn test_configurable_emits_one_row_per_variant() {
        let mut item = base_item();
        item["type"] = json!("configurable");
        item["additionalDataToReturn"] = json!(
            r#"[{"color":"Red","size":"28cm","price":"59.99","variantId":"v1"},
                {"color":"Black","price":"69.99","specialPrice":"39.99","variantId":"v2"},
                {"variantId":"v3"}]"#
        );
        let rows = expand_product(&raw(item)).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].title, "Ceramic Frypan - (Red, 28cm)");
        assert_eq!(rows[0].product_id, "v1");
        // First variant's price also became the resolved base price.
        assert_eq!(rows[0].original_price, Some(59.99));

        assert_eq!(rows[1].title, "Ceramic Frypan - (Black)");
        assert_eq!(rows[1].sale_price, Some(39.99));

        // No color/size: no suffix; no price: item-level resolved fallback.
        assert_eq!(rows[2].title, "Ceramic Frypan");
        assert_eq!(rows[2].product_id, "v3");
        assert_eq!(rows[2].original_price, Some(59.99));
        assert_eq!(rows[2].sale_price, Some(149.99));
    }

    #[test]
    fn test_configurable_without_variant_data_emits_one_row() {
        let mut item = base_item();
        item["type"] = json!("configurable");
        item["additionalDataToReturn"] = json!("total garbage");
        let rows = expand_product(&raw(item)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id, "123456");
    }

    #[test]
    fn test_variant_without_id_inherits_item_id() {
        let mut item = base_item();
        item["type"] = json!("configurable");
        item["additionalDataToReturn"] = json!(r#"[{"color":"Red"}]"#);
        let rows = expand_product(&raw(item)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id, "123456");
    }

    #[test]
    fn test_missing_title_or_link_is_an_error() {
        let mut item = base_item();
        item["displayTitle"] = json!("   ");
        assert!(expand_product(&raw(item)).is_err());

        let mut item = base_item();
        item.as_object_mut().unwrap().remove("url");
        assert!(expand_product(&raw(item)).is_err());
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(
            html_to_text("<p>Soft &amp; plush</p>\n<ul><li>400gsm</li></ul>"),
            "Soft & plush 400gsm"
        );
        assert_eq!(html_to_text("plain text"), "plain text");
        assert_eq!(html_to_text(""), "");
    }
}
