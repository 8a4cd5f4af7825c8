//! Stored-XSS defence: every string value in an incoming JSON body is
//! HTML-escaped before any extractor or handler sees it, so markup submitted
//! in a title or description is persisted and echoed back inert.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::error::AppError;

/// Matches the JSON body ceiling applied at the routing layer.
pub const JSON_BODY_LIMIT: usize = 10 * 1024;

pub async fn sanitize_json_body(req: Request, next: Next) -> Result<Response, AppError> {
    let is_json = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, JSON_BODY_LIMIT)
        .await
        .map_err(|_| AppError::Validation("request body too large".into()))?;

    let bytes = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) => {
            escape_value(&mut value);
            Bytes::from(serde_json::to_vec(&value).map_err(anyhow::Error::from)?)
        }
        // malformed JSON passes through; the Json extractor reports it
        Err(_) => bytes,
    };

    parts.headers.insert(CONTENT_LENGTH, bytes.len().into());
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn escape_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            if s.contains(['&', '<', '>', '"', '\'']) {
                *s = escape_html(s);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(escape_value),
        Value::Object(map) => map.values_mut().for_each(escape_value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn script_tags_are_neutralized() {
        assert_eq!(
            escape_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn ampersand_is_escaped_first() {
        assert_eq!(escape_html("a & <b>"), "a &amp; &lt;b&gt;");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_html("Buy milk"), "Buy milk");
    }

    #[test]
    fn escaping_recurses_through_objects_and_arrays() {
        let mut value = json!({
            "title": "<b>bold</b>",
            "tags": ["<i>", "plain"],
            "nested": { "note": "a < b" },
            "count": 3
        });
        escape_value(&mut value);
        assert_eq!(value["title"], "&lt;b&gt;bold&lt;/b&gt;");
        assert_eq!(value["tags"][0], "&lt;i&gt;");
        assert_eq!(value["tags"][1], "plain");
        assert_eq!(value["nested"]["note"], "a &lt; b");
        assert_eq!(value["count"], 3);
    }
}
