//! Product record types: raw API records, decoded variants, the normalized
//! CSV row, and the payload entries embedded in the generated page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One product record from the Klevu search API, as returned per page.
///
/// The feed is loosely typed: prices arrive as strings or numbers depending
/// on the product, and `additionalDataToReturn` is usually a string-encoded
/// blob of variant sub-records. Those fields are captured as raw JSON values
/// and interpreted downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub display_title: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub sale_price: Value,
    pub url: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub productplu: Option<String>,
    /// Product type tag from the store backend ("simple" or "configurable").
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub in_stock: Option<String>,
    pub short_desc: Option<String>,
    #[serde(default)]
    pub additional_data_to_return: Value,
}

impl RawProduct {
    /// Configurable products carry per-variant pricing in the hidden blob
    /// and expand to one row per variant.
    pub fn is_configurable(&self) -> bool {
        self.product_type
            .as_deref()
            .map(|t| t.trim().eq_ignore_ascii_case("configurable"))
            .unwrap_or(false)
    }

    /// Best identifier available for log lines.
    pub fn id_for_log(&self) -> &str {
        self.productplu
            .as_deref()
            .or(self.sku.as_deref())
            .unwrap_or("<no id>")
    }
}

/// One decoded element of the hidden variant blob.
///
/// Price and id fields stay as raw values since the blob mixes strings and
/// numbers freely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    pub color: Option<String>,
    pub size: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub special_price: Value,
    #[serde(default, alias = "id")]
    pub variant_id: Value,
}

impl VariantRecord {
    /// The variant's own identifier, if it has a usable one.
    pub fn id_string(&self) -> Option<String> {
        match &self.variant_id {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// The normalized row persisted to the CSV table.
///
/// Column order matches the published header; consumers key by header name.
/// Absent prices serialize as empty fields, not a sentinel string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Original Price", with = "price_field")]
    pub original_price: Option<f64>,
    #[serde(rename = "Sale Price", with = "price_field")]
    pub sale_price: Option<f64>,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Product ID")]
    pub product_id: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Stock Status")]
    pub stock_status: String,
}

/// CSV price cells: plain number or empty on write; tolerant of currency
/// formatting ("$1,299.00") on read, unparseable cells degrade to blank.
mod price_field {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Option<f64>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => ser.serialize_f64(*v),
            None => ser.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(crate::prices::to_numeric_price(&Value::String(raw)))
    }
}

/// One entry of the payload embedded in the generated page.
///
/// Short keys keep the inline JSON compact; the in-page script indexes them
/// directly, so the key set is a published contract.
#[derive(Debug, Clone, Serialize)]
pub struct Deal {
    /// Title.
    pub n: String,
    /// Product id.
    pub p: String,
    /// Product link.
    pub l: String,
    /// Formatted original price, or empty.
    pub o: String,
    /// Formatted sale price, or empty.
    pub d: String,
    /// Discount percentage, 0 when unknown.
    pub v: f64,
    /// Price used for numeric sorting: sale, else original, else 0.
    pub vp: f64,
    /// Super category.
    pub c: String,
    /// Specific category (first segment of the vendor category path).
    pub sc: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> ProductRow {
        ProductRow {
            title: "Ceramic Frypan".to_string(),
            original_price: Some(199.99),
            sale_price: None,
            category: "Kitchenware;;Cookware".to_string(),
            product_id: "123456".to_string(),
            link: "https://example.com/frypan".to_string(),
            description: "A pan".to_string(),
            stock_status: "yes".to_string(),
        }
    }

    #[test]
    fn test_csv_header_order() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(sample_row()).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(
            header,
            "Title,Original Price,Sale Price,Category,Product ID,Link,Description,Stock Status"
        );
    }

    #[test]
    fn test_csv_blank_price_round_trips_as_none() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(sample_row()).unwrap();
        let out = writer.into_inner().unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let row: ProductRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.original_price, Some(199.99));
        assert_eq!(row.sale_price, None);
        assert_eq!(row.stock_status, "yes");
    }

    #[test]
    fn test_raw_product_configurable_tag() {
        let item: RawProduct = serde_json::from_value(json!({
            "displayTitle": "Towel",
            "type": "Configurable"
        }))
        .unwrap();
        assert!(item.is_configurable());

        let item: RawProduct = serde_json::from_value(json!({
            "displayTitle": "Towel",
            "type": "simple"
        }))
        .unwrap();
        assert!(!item.is_configurable());

        let item: RawProduct = serde_json::from_value(json!({ "displayTitle": "Towel" })).unwrap();
        assert!(!item.is_configurable());
    }

    #[test]
    fn test_variant_id_accepts_strings_and_numbers() {
        let v: VariantRecord = serde_json::from_value(json!({ "variantId": "AB-12" })).unwrap();
        assert_eq!(v.id_string().as_deref(), Some("AB-12"));

        let v: VariantRecord = serde_json::from_value(json!({ "id": 884213 })).unwrap();
        assert_eq!(v.id_string().as_deref(), Some("884213"));

        let v: VariantRecord = serde_json::from_value(json!({ "color": "Red" })).unwrap();
        assert_eq!(v.id_string(), None);
    }
}
