//! HTML pages for the file viewer.

use std::fmt::Write;

use serde_json::Value;

use super::view::TableView;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:.3rem .6rem;text-align:left}\
th{background:#f4f4f4}\
.error{background:#fde8e8;border:1px solid #f5a3a3;padding:1rem;color:#8a1f1f}";

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Percent-encode a file name for use in a URL path segment or an RFC 5987 header value.
pub(super) fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title>\
<style>{STYLE}</style></head><body>{body}</body></html>\n",
        title = escape(title),
    )
}

fn error_panel(message: &str) -> String {
    format!("<div class=\"error\">{}</div>", escape(message))
}

pub fn index_page(files: &[String]) -> String {
    let mut body = String::from("<h1>Data files</h1>");
    if files.is_empty() {
        body.push_str("<p>No JSON, CSV or spreadsheet files found.</p>");
    } else {
        body.push_str("<ul>");
        for name in files {
            let href = encode_segment(name);
            let is_json = name.to_ascii_lowercase().ends_with(".json");
            let _ = write!(
                body,
                "<li>{label} &middot; <a href=\"/view/{href}\">view</a> \
&middot; <a href=\"/download/{href}\">download</a>",
                label = escape(name),
            );
            if is_json {
                let _ = write!(body, " &middot; <a href=\"/json_keys/{href}\">keys</a>");
            }
            body.push_str("</li>");
        }
        body.push_str("</ul>");
    }
    page("Data files", &body)
}

pub fn table_page(filename: &str, view: &TableView) -> String {
    let mut body = format!("<h1>{}</h1><p><a href=\"/\">back</a></p>", escape(filename));
    match view {
        TableView::Records { columns, rows } => {
            body.push_str("<table><thead><tr>");
            for col in columns {
                let _ = write!(body, "<th>{}</th>", escape(col));
            }
            body.push_str("</tr></thead><tbody>");
            for row in rows {
                body.push_str("<tr>");
                for col in columns {
                    let text = row.get(col).map(cell_text).unwrap_or_default();
                    let _ = write!(body, "<td>{}</td>", escape(&text));
                }
                body.push_str("</tr>");
            }
            body.push_str("</tbody></table>");
        }
        TableView::Values(values) if values.is_empty() => {
            body.push_str("<p>No rows.</p>");
        }
        TableView::Values(values) => {
            body.push_str("<ul>");
            for value in values {
                let _ = write!(body, "<li>{}</li>", escape(&cell_text(value)));
            }
            body.push_str("</ul>");
        }
    }
    page(filename, &body)
}

pub fn table_error_page(filename: &str, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1><p><a href=\"/\">back</a></p>{}",
        escape(filename),
        error_panel(message)
    );
    page(filename, &body)
}

pub fn keys_page(filename: &str, keys: &[String]) -> String {
    let mut body = format!(
        "<h1>Keys in {}</h1><p><a href=\"/\">back</a></p>",
        escape(filename)
    );
    if keys.is_empty() {
        body.push_str("<p>No keys.</p>");
    } else {
        body.push_str("<ul>");
        for key in keys {
            let _ = write!(body, "<li><code>{}</code></li>", escape(key));
        }
        body.push_str("</ul>");
    }
    page(filename, &body)
}

pub fn keys_error_page(filename: &str, message: &str) -> String {
    let body = format!(
        "<h1>Keys in {}</h1><p><a href=\"/\">back</a></p>{}",
        escape(filename),
        error_panel(message)
    );
    page(filename, &body)
}
