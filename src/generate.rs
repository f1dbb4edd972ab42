//! Static deal-finder page generation from the scraped CSV table.
//!
//! Reads the normalized rows, re-derives discount percentages and categories,
//! and emits one self-contained HTML document with the deal payload embedded.
//! All filtering, sorting and paging happens client-side in the page script;
//! the payload schema (short keys n/p/l/o/d/v/vp/c/sc) is the contract.

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Pacific::Auckland;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::category::{specific_category, super_category, NO_MATCH_LABEL};
use crate::prices::{discount_pct, fmt_price};
use crate::types::{Deal, ProductRow};

/// Candidate names for the optional announcement sidecar.
const WHATS_NEW_FILES: &[&str] = &["whatsnew.txt", "WhatsNew.txt", "Whatsnew.txt"];

const DEFAULT_WHATS_NEW: &str = "No updates found.";

/// Load rows from the CSV, keyed by header name. A missing file is not an
/// error: the page is still generated, just empty. Unreadable rows are
/// skipped with a warning.
fn load_rows(path: &str) -> Vec<ProductRow> {
    if !Path::new(path).exists() {
        eprintln!("Warning: {} not found. Generating an empty page.", path);
        return Vec::new();
    }

    let mut reader = match csv::Reader::from_path(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Warning: failed to open {}: {}", path, e);
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => eprintln!("Warning: skipping unreadable row: {}", e),
        }
    }
    rows
}

/// Derive the embedded payload from the normalized rows.
///
/// Discount percentage is computed from the prices as stored; a missing
/// original price is backfilled from the sale price afterwards (so a
/// sale-only row displays a price but shows 0% off). `vp` carries the value
/// the page sorts on.
pub fn build_deals(rows: &[ProductRow]) -> Vec<Deal> {
    rows.iter()
        .map(|row| {
            let mut original = row.original_price;
            let sale = row.sale_price;

            let pct = discount_pct(original, sale);
            if original.is_none() && sale.is_some() {
                original = sale;
            }

            let sc = specific_category(Some(&row.category));
            let c = super_category(Some(&sc));

            let title = if row.title.is_empty() {
                "Unknown Product".to_string()
            } else {
                row.title.clone()
            };
            let link = if row.link.is_empty() {
                "#".to_string()
            } else {
                row.link.clone()
            };

            Deal {
                n: title,
                p: row.product_id.clone(),
                l: link,
                o: fmt_price(original),
                d: fmt_price(sale),
                v: pct,
                vp: sale.or(original).unwrap_or(0.0),
                c: c.to_string(),
                sc,
            }
        })
        .collect()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Filter pill row for the super categories present in the payload, sorted
/// with the no-match bucket forced last.
fn category_filter_buttons(categories: &BTreeSet<String>) -> String {
    if categories.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&String> = categories
        .iter()
        .filter(|c| c.as_str() != NO_MATCH_LABEL)
        .collect();
    let fallback = NO_MATCH_LABEL.to_string();
    if categories.contains(&fallback) {
        sorted.push(&fallback);
    }

    let mut out = String::from(r#"<div class="controls-promo-filters">"#);
    out.push_str(
        r#"<span class="small" style="color: var(--muted); font-size: 14px; margin-right: 5px;">Filter By Section:</span>"#,
    );
    out.push_str(r#"<button class="btn toggle active" data-cat="all">All</button>"#);
    for cat in sorted {
        let escaped = html_escape(cat);
        out.push_str(&format!(
            r#"<button class="btn toggle cat-filter-btn" data-cat="{}">{}</button>"#,
            escaped.to_lowercase(),
            escaped
        ));
    }
    out.push_str("</div>");
    out
}

/// Read the announcement sidecar if any candidate file exists. Absence is
/// not an error; newlines become `<br>` for display in the modal.
fn load_whats_new() -> String {
    for name in WHATS_NEW_FILES {
        if Path::new(name).exists() {
            match fs::read_to_string(name) {
                Ok(content) => return content.replace('\n', "<br>"),
                Err(e) => {
                    eprintln!("Error reading {}: {}", name, e);
                    return DEFAULT_WHATS_NEW.to_string();
                }
            }
        }
    }
    println!("Notice: whatsnew.txt not found. Using default text.");
    DEFAULT_WHATS_NEW.to_string()
}

/// Generation timestamp in store-local (New Zealand) time.
fn nz_timestamp() -> String {
    Utc::now()
        .with_timezone(&Auckland)
        .format("%d/%m/%Y @ %I:%M %p")
        .to_string()
}

/// Theme bootstrap, runs before first paint so dark mode does not flash.
const THEME_INIT: &str = r##"<script>
  (function() {
    const theme = localStorage.getItem('theme');
    if (theme === 'dark') {
      document.documentElement.classList.add('dark');
    }
  })();
</script>
"##;

fn css_styles() -> &'static str {
    r##"
  :root {
    --accent: #004B8D;
    --accent-dark: #003366;
    --highlight: #FFCE00;
    --highlight-hover: #e6b800;
    --bg: #f4f6f8;
    --card: #ffffff;
    --text: #222;
    --muted: #666;
    --border: #ddd;
    --header-bg: #ffffff;
    --row-even: #f8f9fa;
    --row-hover: #eef1f5;
    --btn-text: #fff;
    --btn-highlight-text: #222;
  }
  :root.dark {
    --accent: #4a90e2;
    --accent-dark: #357abd;
    --highlight: #FFCE00;
    --highlight-hover: #e6b800;
    --bg: #121212;
    --card: #1E1E1E;
    --text: #E0E0E0;
    --muted: #9E9E9E;
    --border: #333;
    --header-bg: #1E1E1E;
    --row-even: #252525;
    --row-hover: #303030;
    --btn-text: #fff;
    --btn-highlight-text: #000;
  }
  html, body { width: 100%; margin: 0; padding: 0; }
  body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
    background: var(--bg);
    color: var(--text);
    padding: 16px;
  }
  .container { max-width: 1200px; margin: 0 auto; }
  header {
      background: var(--header-bg);
      border-radius: 8px;
      padding: 20px;
      box-shadow: 0 4px 12px rgba(0,0,0,0.05);
      border: 1px solid var(--border);
      display: flex; flex-direction: column; gap: 15px; margin-bottom: 24px;
  }
  .header-top { display: flex; align-items: center; justify-content: space-between; flex-wrap: wrap; gap: 10px; }
  .header-titles h1 { margin: 0; font-size: 24px; font-weight: 700; color: var(--accent); }
  :root.dark .header-titles h1 { color: var(--text); }
  .scrape-time { font-size: 13px; color: var(--muted); font-family: monospace; margin-top: 4px; }
  .header-actions { display: flex; gap: 8px; align-items: center; }
  .btn { background: var(--accent); color: var(--btn-text); border: none; padding: 8px 16px; border-radius: 6px; cursor: pointer; font-size: 14px; font-weight: 600; text-decoration: none; display: inline-flex; align-items: center; gap: 6px; transition: all 0.2s; white-space: nowrap; }
  .btn:hover { background: var(--accent-dark); }
  .btn.action { background: var(--highlight); color: var(--btn-highlight-text); }
  .btn.action:hover { background: var(--highlight-hover); }
  .btn.secondary { background: transparent; color: var(--text); border: 1px solid var(--border); }
  .btn.secondary:hover { background: var(--row-hover); }
  .btn.coffee { background: #FF813F; color: #fff; }
  .btn.coffee:hover { background: #E57339; }
  .btn.icon-btn { padding: 8px; width: 36px; justify-content: center; }
  .controls-main { display: flex; flex-wrap: wrap; gap: 10px; align-items: center; margin-top: 10px; }
  input, select { padding: 10px 12px; border: 1px solid var(--border); border-radius: 6px; background: var(--bg); color: var(--text); font-size: 14px; outline: none; }
  input:focus { border-color: var(--accent); }
  input[type="search"] { min-width: 250px; flex-grow: 1; }
  .pct-inputs { display: flex; align-items: center; gap: 5px; }
  .pct-inputs input { width: 60px; text-align: center; }
  .checkbox-label { display: flex; align-items: center; gap: 6px; font-size: 14px; color: var(--muted); cursor: pointer; user-select: none; font-weight: 500; }
  .controls-promo-filters { display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin-top: 15px; border-top: 1px solid var(--border); padding-top:15px; }
  .btn.toggle { background: var(--bg); color: var(--muted); border: 1px solid var(--border); font-size: 13px; padding: 5px 12px; border-radius: 20px; }
  .btn.toggle:hover { background: var(--row-hover); color: var(--text); }
  .btn.toggle.active { background: var(--accent); color: white; border-color: var(--accent); }
  .table-container { overflow-x: auto; border-radius: 8px; border: 1px solid var(--border); background: var(--card); margin-bottom: 20px; }
  table { width: 100%; border-collapse: collapse; min-width: 700px; }
  thead th { text-align: left; padding: 14px 16px; background: var(--header-bg); border-bottom: 1px solid var(--border); cursor: pointer; font-weight: 600; font-size: 13px; text-transform: uppercase; color: var(--muted); user-select: none; }
  thead th:hover { color: var(--text); }
  tbody td { padding: 14px 16px; border-top: 1px solid var(--border); font-size: 14px; vertical-align: middle; }
  tbody tr:nth-child(even) { background: var(--row-even); }
  tbody tr:hover { background: var(--row-hover); }
  .price { font-family: monospace; font-size: 14px; color: var(--text); white-space: nowrap; }
  .discount { color: #D32F2F; font-weight: 700; white-space: nowrap; }
  :root.dark .discount { color: #FF5252; }
  .google-icon { width: 20px; height: 20px; fill: var(--muted); vertical-align: middle; transition: fill 0.2s; }
  tr:hover .google-icon { fill: var(--accent); }
  a.product-link { color: var(--text); text-decoration: none; font-weight: 600; display: block; transition: color 0.15s; }
  a.product-link:hover { color: var(--accent); text-decoration: underline; }
  .pagination-bar { display: flex; justify-content: space-between; align-items: center; padding: 12px; background: var(--header-bg); border: 1px solid var(--border); border-radius: 8px; color: var(--muted); font-size: 14px; }
  .modal-overlay { position: fixed; top: 0; left: 0; right: 0; bottom: 0; background: rgba(0,0,0,0.7); display: none; align-items: center; justify-content: center; z-index: 1000; backdrop-filter: blur(2px); }
  .modal-content { background: var(--card); padding: 25px; border-radius: 12px; width: 90%; max-width: 600px; max-height: 80vh; display: flex; flex-direction: column; box-shadow: 0 10px 25px rgba(0,0,0,0.5); border: 1px solid var(--border); }
  .modal-header { display: flex; justify-content: space-between; border-bottom: 1px solid var(--border); padding-bottom: 15px; margin-bottom: 15px; }
  .modal-close-btn { background: none; border: none; font-size: 24px; cursor: pointer; color: var(--muted); }
  @media (max-width: 768px) {
    .header-top { flex-direction: column; align-items: flex-start; }
    .header-actions { width: 100%; justify-content: space-between; margin-top: 10px; }
    .controls-main { flex-direction: column; align-items: stretch; }
    input[type="search"] { width: 100%; }
    .pct-inputs { justify-content: space-between; }
    .pct-inputs input { width: 45%; }
    thead th:nth-child(1), tbody td:nth-child(1) { display: none; }
    thead th:nth-child(3), tbody td:nth-child(3) { display: none; }
    .pagination-bar { flex-direction: column; gap: 10px; text-align: center; }
  }
"##
}

/// Everything after the embedded payload: table rendering, filtering,
/// sorting, paging, theme toggle and the what's-new modal.
fn page_script() -> &'static str {
    r##"const googleIconSvg = '<svg class="google-icon" viewBox="0 0 24 24"><path d="M12.48 10.92v3.28h7.84c-.24 1.84-.853 3.187-1.787 4.133-1.147 1.147-2.933 2.4-6.053 2.4-4.827 0-8.6-3.893-8.6-8.72s3.773-8.72 8.6-8.72c2.6 0 4.507 1.027 5.907 2.347l2.307-2.307C18.747 1.44 16.133 0 12.48 0 5.867 0 .533 5.333.533 12S5.867 24 12.48 24c3.44 0 6.04-1.133 8.147-3.333 2.147-2.147 2.813-5.013 2.813-7.387 0-.747-.053-1.44-.16-2.107H12.48z"/></svg>';
let state = { filtered: [], currentPage: 1, rowsPerPage: 100, sortCol: 'v', sortDir: 'desc', search: '', minPct: 0, maxPct: 100, activeCategory: 'all', hideZero: true };
const tbody = document.getElementById('tableBody');
const countEl = document.getElementById('visibleCount');
function init() { state.filtered = [...allData]; applyFilters(); setupListeners(); renderPage(); }
function escapeHtml(text) { if (!text) return ''; return text.replace(/&/g, "&amp;").replace(/</g, "&lt;").replace(/>/g, "&gt;").replace(/"/g, "&quot;").replace(/'/g, "&#039;"); }
function renderPage() {
    const start = (state.currentPage - 1) * state.rowsPerPage;
    const end = start + state.rowsPerPage;
    const slice = state.filtered.slice(start, end);
    let html = '';
    slice.forEach(d => {
        const googleLink = `https://www.google.com/search?q=${encodeURIComponent(d.n)}`;
        let linkHtml = `<span class="product-link">${escapeHtml(d.n)}</span>`;
        if (d.l && d.l !== '#') { linkHtml = `<a class="product-link" href="${d.l}" target="_blank">${escapeHtml(d.n)}</a>`; }
        let pctDisplay = '';
        if (d.v > 0) { pctDisplay = `${Math.round(d.v)}%`; }
        html += `<tr><td style="font-family:monospace; color:var(--muted); font-size:12px;">${escapeHtml(d.p)}</td><td>${linkHtml}</td><td class="price" style="text-decoration:line-through; color:var(--muted);">${d.o}</td><td class="price" style="font-weight:bold;">${d.d}</td><td class="discount">${pctDisplay}</td><td><span style="background:var(--row-hover); padding:2px 8px; border-radius:4px; font-size:12px; white-space:nowrap;">${escapeHtml(d.sc)}</span></td><td style="text-align:center;"><a href="${googleLink}" target="_blank">${googleIconSvg}</a></td></tr>`;
    });
    if (slice.length === 0) { html = '<tr><td colspan="7" style="text-align:center; padding:20px;">No deals found matching filters.</td></tr>'; }
    tbody.innerHTML = html;
    const total = state.filtered.length;
    const maxPage = Math.ceil(total / state.rowsPerPage) || 1;
    document.getElementById('pageInfo').innerText = `Page ${state.currentPage} of ${maxPage}`;
    document.getElementById('btnPrev').disabled = state.currentPage === 1;
    document.getElementById('btnNext').disabled = state.currentPage >= maxPage;
    countEl.innerText = total;
}
function applyFilters() {
    const term = state.search.toLowerCase();
    state.filtered = allData.filter(d => {
        if (state.activeCategory !== 'all' && (!d.c || d.c.toLowerCase() !== state.activeCategory)) return false;
        if (state.hideZero && d.v <= 0) return false;
        if (d.v < state.minPct || d.v > state.maxPct) return false;
        if (term && !(d.n + ' ' + d.sc + ' ' + d.p).toLowerCase().includes(term)) return false;
        return true;
    });
    state.currentPage = 1; sortData();
}
function sortData() {
    const col = state.sortCol; const dir = state.sortDir === 'asc' ? 1 : -1;
    state.filtered.sort((a, b) => {
        let valA = a[col]; let valB = b[col];
        if (typeof valA === 'string') valA = valA.toLowerCase(); if (typeof valB === 'string') valB = valB.toLowerCase();
        if (col === 'vp') { valA = a.vp; valB = b.vp; }
        if (valA < valB) return -1 * dir; if (valA > valB) return 1 * dir; return 0;
    });
    renderPage();
}
function setupListeners() {
    const debounce = (fn, delay) => { let t; return (...args) => { clearTimeout(t); t = setTimeout(()=>fn(...args), delay); }; };
    const runFilter = debounce(() => { applyFilters(); renderPage(); }, 200);
    document.getElementById('searchInput').addEventListener('input', e => { state.search = e.target.value; runFilter(); });
    document.getElementById('minPct').addEventListener('input', e => { state.minPct = parseFloat(e.target.value) || 0; runFilter(); });
    document.getElementById('maxPct').addEventListener('input', e => { state.maxPct = parseFloat(e.target.value) || 100; runFilter(); });
    document.getElementById('hideZero').addEventListener('change', e => { state.hideZero = e.target.checked; applyFilters(); renderPage(); });
    document.querySelectorAll('.cat-filter-btn, [data-cat="all"]').forEach(btn => { btn.addEventListener('click', (e) => { document.querySelectorAll('.cat-filter-btn, [data-cat="all"]').forEach(b => b.classList.remove('active')); e.currentTarget.classList.add('active'); state.activeCategory = e.currentTarget.getAttribute('data-cat'); applyFilters(); renderPage(); }); });
    document.getElementById('resetBtn').addEventListener('click', () => { state.search = ''; state.minPct = 0; state.maxPct = 100; state.activeCategory = 'all'; state.hideZero = true; document.getElementById('searchInput').value = ''; document.getElementById('minPct').value = 0; document.getElementById('maxPct').value = 100; document.getElementById('hideZero').checked = true; document.querySelectorAll('.cat-filter-btn').forEach(b => b.classList.remove('active')); document.querySelector('[data-cat="all"]').classList.add('active'); applyFilters(); renderPage(); });
    document.querySelectorAll('th[data-sort]').forEach(th => { th.addEventListener('click', () => { const col = th.dataset.sort; if (state.sortCol === col) { state.sortDir = state.sortDir === 'asc' ? 'desc' : 'asc'; } else { state.sortCol = col; state.sortDir = 'desc'; } sortData(); }); });
    document.getElementById('rowsPerPage').addEventListener('change', e => { state.rowsPerPage = parseInt(e.target.value); state.currentPage = 1; renderPage(); });
    document.getElementById('btnPrev').addEventListener('click', () => { if(state.currentPage > 1) { state.currentPage--; renderPage(); } });
    document.getElementById('btnNext').addEventListener('click', () => { const max = Math.ceil(state.filtered.length / state.rowsPerPage); if(state.currentPage < max) { state.currentPage++; renderPage(); } });
    const toggleTheme = document.getElementById('toggleThemeBtn');
    function updateThemeIcon(isDark) { toggleTheme.textContent = isDark ? '\u{1F319}' : '\u{2600}\u{FE0F}'; }
    toggleTheme.addEventListener('click', () => { const isDark = document.documentElement.classList.toggle('dark'); localStorage.setItem('theme', isDark ? 'dark' : 'light'); updateThemeIcon(isDark); });
    updateThemeIcon(document.documentElement.classList.contains('dark'));
    const modal = document.getElementById('whatsNewModal');
    document.getElementById('whatsNewBtn').addEventListener('click', () => modal.style.display = 'flex');
    document.getElementById('closeWhatsNewBtn').addEventListener('click', () => modal.style.display = 'none');
    modal.addEventListener('click', (e) => { if (e.target === modal) modal.style.display = 'none'; });
}
init();
"##
}

/// Assemble the full document around the embedded payload.
fn render_page(json_data: &str, filters_html: &str, timestamp: &str, whats_new: &str) -> String {
    let mut html = String::with_capacity(96 * 1024 + json_data.len());

    html.push_str(
        r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<title>Briscoes Deal Finder</title>
<meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1, user-scalable=0"/>
"##,
    );
    html.push_str(THEME_INIT);
    html.push_str("<style>");
    html.push_str(css_styles());
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n  <header>\n");

    html.push_str(&format!(
        r##"    <div class="header-top">
      <div class="header-titles">
        <h1>Briscoes Deal Finder</h1>
        <div class="scrape-time">Last updated: {}</div>
      </div>
      <div class="header-actions">
        <button class="btn secondary" id="whatsNewBtn">What's New</button>
        <a href="https://www.buymeacoffee.com/polobaggyo" target="_blank" class="btn coffee">&#9749; Coffee</a>
        <button class="btn icon-btn secondary" id="toggleThemeBtn" title="Toggle Theme">&#9728;&#65039;</button>
      </div>
    </div>
"##,
        timestamp
    ));

    html.push_str(
        r##"    <div class="controls-main">
      <input id="searchInput" type="search" placeholder="Search products..." />
      <button class="btn action" id="searchBtn">Search</button>
      <div class="pct-inputs">
        <span style="font-size:13px; color:var(--muted)">Discount %</span>
        <input id="minPct" type="number" min="0" max="100" placeholder="0" value="0" />
        <input id="maxPct" type="number" min="0" max="100" placeholder="100" value="100" />
      </div>
      <label class="checkbox-label"><input type="checkbox" id="hideZero" checked> Hide 0% Off</label>
      <button class="btn secondary" id="resetBtn">Reset</button>
    </div>
    <div style="display:flex; justify-content:flex-end; margin-top:5px; gap:15px; font-size:13px; color:var(--muted);">
         <span>Found: <strong id="visibleCount" style="color:var(--text)">0</strong></span>
    </div>
"##,
    );
    html.push_str(filters_html);
    html.push_str(
        r##"
  </header>
  <div class="table-container">
    <table id="dealsTable">
      <thead>
        <tr>
          <th data-sort="p">ID</th>
          <th data-sort="n">Title</th>
          <th data-sort="vp">Original</th>
          <th data-sort="vp">Sale Price</th>
          <th data-sort="v">% Off</th>
          <th data-sort="c">Category</th>
          <th>G</th>
        </tr>
      </thead>
      <tbody id="tableBody"></tbody>
    </table>
  </div>
  <div class="pagination-bar">
    <div>
        Rows:
        <select id="rowsPerPage">
            <option value="50">50</option>
            <option value="100" selected>100</option>
            <option value="200">200</option>
            <option value="1000">All</option>
        </select>
    </div>
    <div id="pageInfo">Page 1</div>
    <div style="display:flex; gap:5px;">
        <button class="btn secondary" id="btnPrev">Prev</button>
        <button class="btn secondary" id="btnNext">Next</button>
    </div>
  </div>
</div>
"##,
    );

    html.push_str(&format!(
        r##"<div id="whatsNewModal" class="modal-overlay">
  <div class="modal-content">
    <div class="modal-header">
      <h2 style="color:var(--text)">What's New</h2>
      <button id="closeWhatsNewBtn" class="modal-close-btn">&times;</button>
    </div>
    <div class="modal-body">{}</div>
  </div>
</div>
"##,
        whats_new
    ));

    html.push_str("<script>\nconst allData = ");
    html.push_str(json_data);
    html.push_str(";\n");
    html.push_str(page_script());
    html.push_str("</script>\n</body>\n</html>\n");

    html
}

pub fn run_generate(input: &str, output: &str) -> Result<()> {
    let rows = load_rows(input);
    println!("Loaded {} rows from {}", rows.len(), input);

    let deals = build_deals(&rows);
    let categories: BTreeSet<String> = deals.iter().map(|d| d.c.clone()).collect();

    let json_data = serde_json::to_string(&deals)?;
    let filters_html = category_filter_buttons(&categories);
    let timestamp = nz_timestamp();
    let whats_new = load_whats_new();

    let html = render_page(&json_data, &filters_html, &timestamp, &whats_new);
    fs::write(output, html).with_context(|| format!("Failed to write {}", output))?;

    println!("Generated {} ({} deals)", output, deals.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    fn row(
        title: &str,
        original: Option<f64>,
        sale: Option<f64>,
        category: &str,
    ) -> ProductRow {
        ProductRow {
            title: title.to_string(),
            original_price: original,
            sale_price: sale,
            category: category.to_string(),
            product_id: "p1".to_string(),
            link: "https://example.com/x".to_string(),
            description: String::new(),
            stock_status: "yes".to_string(),
        }
    }

    #[test]
    fn test_two_row_payload_end_to_end() {
        let rows = vec![
            row("Air Fryer", Some(199.99), Some(49.0), "Appliances;;Small Kitchen"),
            row("Duvet Set", None, Some(20.0), "Bedding"),
        ];
        let deals = build_deals(&rows);
        assert_eq!(deals.len(), 2);

        let a = &deals[0];
        assert!(approx_eq(a.v, 75.5));
        assert_eq!(a.o, "$199.99");
        assert_eq!(a.d, "$49.00");
        assert!(approx_eq(a.vp, 49.0));
        assert_eq!(a.c, "Kitchen & Cooking");
        assert_eq!(a.sc, "Appliances");

        // Original backfilled from sale, so the discount stays 0.
        let b = &deals[1];
        assert_eq!(b.v, 0.0);
        assert_eq!(b.o, "$20.00");
        assert_eq!(b.d, "$20.00");
        assert!(approx_eq(b.vp, 20.0));
        assert_eq!(b.c, "Bedroom & Bedding");
        assert_eq!(b.sc, "Bedding");
    }

    #[test]
    fn test_payload_keys_are_the_short_schema() {
        let deals = build_deals(&[row("X", Some(10.0), None, "Towels")]);
        let value = serde_json::to_value(&deals[0]).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["n", "p", "l", "o", "d", "v", "vp", "c", "sc"] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert_eq!(obj.len(), 9);
    }

    #[test]
    fn test_priceless_row_sorts_at_zero() {
        let deals = build_deals(&[row("X", None, None, "Towels")]);
        assert_eq!(deals[0].o, "");
        assert_eq!(deals[0].d, "");
        assert_eq!(deals[0].v, 0.0);
        assert_eq!(deals[0].vp, 0.0);
    }

    #[test]
    fn test_blank_title_and_link_get_placeholders() {
        let mut r = row("", Some(10.0), None, "Towels");
        r.link = String::new();
        let deals = build_deals(&[r]);
        assert_eq!(deals[0].n, "Unknown Product");
        assert_eq!(deals[0].l, "#");
    }

    #[test]
    fn test_filter_buttons_put_fallback_last() {
        let categories: BTreeSet<String> = [
            "Other / Brands",
            "Bedroom & Bedding",
            "Kitchen & Cooking",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let html = category_filter_buttons(&categories);

        let bedding = html.find("Bedroom &amp; Bedding").unwrap();
        let kitchen = html.find("Kitchen &amp; Cooking").unwrap();
        let fallback = html.find("Other / Brands").unwrap();
        assert!(bedding < kitchen);
        assert!(kitchen < fallback);
        assert!(html.starts_with(r#"<div class="controls-promo-filters">"#));
        assert!(html.contains(r#"data-cat="all""#));
        assert!(html.contains(r#"data-cat="kitchen &amp; cooking""#));
    }

    #[test]
    fn test_no_categories_no_filter_row() {
        assert_eq!(category_filter_buttons(&BTreeSet::new()), "");
    }

    #[test]
    fn test_rendered_page_embeds_payload() {
        let deals = build_deals(&[row("Kettle", Some(89.99), Some(44.99), "Kitchenware")]);
        let json = serde_json::to_string(&deals).unwrap();
        let page = render_page(&json, "", "01/01/2026 @ 09:00 AM", "No updates found.");

        assert!(page.contains("const allData = [{"));
        assert!(page.contains("\"n\":\"Kettle\""));
        assert!(page.contains("Last updated: 01/01/2026 @ 09:00 AM"));
        assert!(page.contains("No updates found."));
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.trim_end().ends_with("</html>"));
    }
}
