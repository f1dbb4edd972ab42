//! Paginated harvest of the vendor search API into the normalized CSV.
//!
//! Best-effort bulk fetch: the loop walks offsets until the target count,
//! an empty page, or the first failure. Whatever was collected before a
//! failure is kept and written out; there is no retry and no resume.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::thread;
use std::time::Duration;

use crate::expand::expand_product;
use crate::types::{ProductRow, RawProduct};
use crate::{API_KEY, SEARCH_API_URL};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Polite pause between successive batch requests.
const BATCH_DELAY: Duration = Duration::from_millis(500);

/// Fields requested per product record.
const RECORD_FIELDS: &[&str] = &[
    "displayTitle",
    "price",
    "salePrice",
    "url",
    "category",
    "sku",
    "productplu",
    "type",
    "inStock",
    "shortDesc",
    "additionalDataToReturn",
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, rename = "queryResults")]
    query_results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    records: Vec<RawProduct>,
}

/// One page worth of search request body.
fn search_payload(batch: usize, offset: usize) -> Value {
    json!({
        "context": { "apiKeys": [API_KEY] },
        "recordQueries": [{
            "id": "productList",
            "typeOfRequest": "SEARCH",
            "settings": {
                "query": { "term": "*" },
                "id": "productList",
                "limit": batch,
                "typeOfRecords": ["KLEVU_PRODUCT"],
                "offset": offset,
                "searchPrefs": ["searchCompoundsAsAndQuery", "hideOutOfStockProducts"],
                "sort": "RELEVANCE",
                "fields": RECORD_FIELDS,
            }
        }]
    })
}

/// Fetch up to `total` raw records in `batch`-sized pages.
///
/// Stops at the first empty page, non-success status, or network/decode
/// error. Partial results are returned, not discarded.
pub fn fetch_products(
    client: &reqwest::blocking::Client,
    total: usize,
    batch: usize,
) -> Vec<RawProduct> {
    let mut collected: Vec<RawProduct> = Vec::new();
    let mut offset = 0;

    while offset < total {
        println!("Fetching records {} to {}...", offset, offset + batch);

        let response = match client
            .post(SEARCH_API_URL)
            .json(&search_payload(batch, offset))
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Network error: {}", e);
                break;
            }
        };

        if !response.status().is_success() {
            eprintln!("Failed request. Status: {}", response.status());
            break;
        }

        let page: SearchResponse = match response.json() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error parsing response: {}", e);
                break;
            }
        };

        let records = page
            .query_results
            .into_iter()
            .next()
            .map(|q| q.records)
            .unwrap_or_default();
        if records.is_empty() {
            break;
        }
        collected.extend(records);

        offset += batch;
        if offset < total {
            thread::sleep(BATCH_DELAY);
        }
    }

    collected
}

/// Write the normalized rows to the CSV table.
fn write_rows(path: &str, rows: &[ProductRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run_scrape(total: usize, batch: usize, output: &str) -> Result<()> {
    ensure!(batch > 0, "batch size must be positive");

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()?;

    println!("Starting scrape for {} products...", total);
    let raw = fetch_products(&client, total, batch);
    println!("Fetched {} raw records", raw.len());

    let mut rows: Vec<ProductRow> = Vec::new();
    let mut skipped = 0usize;
    for item in &raw {
        match expand_product(item) {
            Ok(mut expanded) => rows.append(&mut expanded),
            Err(e) => {
                skipped += 1;
                eprintln!("  Skipping {}: {}", item.id_for_log(), e);
            }
        }
    }

    write_rows(output, &rows)?;
    println!(
        "Wrote {} rows to {} ({} items skipped)",
        rows.len(),
        output,
        skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_payload_shape() {
        let payload = search_payload(1000, 3000);
        assert_eq!(payload["context"]["apiKeys"][0], API_KEY);

        let settings = &payload["recordQueries"][0]["settings"];
        assert_eq!(settings["limit"], 1000);
        assert_eq!(settings["offset"], 3000);
        assert_eq!(settings["query"]["term"], "*");
        assert_eq!(settings["sort"], "RELEVANCE");
        assert_eq!(settings["typeOfRecords"][0], "KLEVU_PRODUCT");
        assert_eq!(
            settings["searchPrefs"],
            json!(["searchCompoundsAsAndQuery", "hideOutOfStockProducts"])
        );
        assert_eq!(payload["recordQueries"][0]["typeOfRequest"], "SEARCH");
    }

    #[test]
    fn test_response_envelope_tolerates_missing_pieces() {
        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.query_results.is_empty());

        let no_records: SearchResponse =
            serde_json::from_str(r#"{"queryResults":[{"id":"productList"}]}"#).unwrap();
        assert!(no_records.query_results[0].records.is_empty());

        let page: SearchResponse = serde_json::from_str(
            r#"{"queryResults":[{"records":[{"displayTitle":"Kettle","price":"89.99"}]}]}"#,
        )
        .unwrap();
        assert_eq!(page.query_results[0].records.len(), 1);
        assert_eq!(
            page.query_results[0].records[0].display_title.as_deref(),
            Some("Kettle")
        );
    }
}
