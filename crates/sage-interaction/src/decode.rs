//! Decoding of dialogue runtime replies.
//!
//! The runtime answers with a JSON array of items whose payload fields come
//! and go depending on how the conversation flow was authored: the text may
//! sit directly on the payload, inside a nested text payload, or inside a
//! rich-text "slate" tree. Decoding therefore cascades from a typed parse
//! down to raw text scans and never fails outright; the worst case is an
//! empty string.

use serde::Deserialize;
use serde_json::Value;

const MESSAGE_MARKER: &str = "\"message\":\"";
const TEXT_MARKER: &str = "\"text\":\"";

/// One element of the reply sequence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseItem {
    /// Item kind tag; only `"text"` items carry user-visible content.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<ItemPayload>,
}

/// Payload of a reply item. Every field is optional; absence is normal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub text: Option<TextPayload>,
    #[serde(default)]
    pub slate: Option<SlatePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub slate: Option<SlatePayload>,
}

/// Rich-text block: ordered content blocks of ordered child fragments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlatePayload {
    #[serde(default)]
    pub content: Vec<SlateBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlateBlock {
    #[serde(default)]
    pub children: Vec<SlateChild>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlateChild {
    #[serde(default)]
    pub text: Option<String>,
}

/// Extracts the user-visible text from a raw reply body.
///
/// Strategies cascade, each tried only when the previous produced nothing:
///
/// 1. typed parse of the body as an item array;
/// 2. typed parse of the first array field when the body is an object
///    wrapper around the same shape;
/// 3. scan for the first `"message"` field in the raw text;
/// 4. scan for every `"text"` field in the raw text;
/// 5. give up and return the empty string.
///
/// Never panics, whatever the input.
///
/// # Examples
///
/// ```
/// use sage_interaction::decode_response;
///
/// let raw = r#"[{"type":"text","payload":{"message":"Hello"}}]"#;
/// assert_eq!(decode_response(raw), "Hello");
/// assert_eq!(decode_response("definitely not json"), "");
/// ```
pub fn decode_response(raw: &str) -> String {
    let items = parse_items(raw).or_else(|| parse_wrapped_items(raw));
    if let Some(items) = items {
        let combined = extract_items_text(&items);
        if !combined.is_empty() {
            return combined;
        }
        tracing::debug!(target: "dialogue", "structured parse yielded no text, trying raw scans");
    }

    if let Some(message) = scan_message_field(raw) {
        return message;
    }

    let fragments = scan_text_fragments(raw);
    if !fragments.is_empty() {
        return fragments.join(" ");
    }

    String::new()
}

/// Primary parse: the body is the item array itself.
fn parse_items(raw: &str) -> Option<Vec<ResponseItem>> {
    serde_json::from_str::<Vec<ResponseItem>>(raw)
        .ok()
        .filter(|items| !items.is_empty())
}

/// Secondary parse: the body is an object wrapping the item array under
/// some field. Same item shape, different wrapping convention.
fn parse_wrapped_items(raw: &str) -> Option<Vec<ResponseItem>> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    object
        .values()
        .filter(|v| v.is_array())
        .find_map(|v| serde_json::from_value::<Vec<ResponseItem>>(v.clone()).ok())
        .filter(|items| !items.is_empty())
}

/// Collects the text carried by a successfully parsed item sequence.
///
/// For each `"text"` item the four optional locations are checked in fixed
/// priority order, and every present one contributes: direct message,
/// nested text-payload message, the item's own slate, the nested
/// text-payload's slate. Item order is preserved throughout.
fn extract_items_text(items: &[ResponseItem]) -> String {
    let mut all_texts: Vec<String> = Vec::new();

    for item in items {
        if item.kind != "text" {
            continue;
        }
        let Some(payload) = &item.payload else {
            continue;
        };

        if let Some(message) = &payload.message {
            push_trimmed(&mut all_texts, message);
        }
        if let Some(message) = payload.text.as_ref().and_then(|t| t.message.as_ref()) {
            push_trimmed(&mut all_texts, message);
        }
        if let Some(slate) = &payload.slate {
            push_trimmed(&mut all_texts, &extract_slate_text(slate));
        }
        if let Some(slate) = payload.text.as_ref().and_then(|t| t.slate.as_ref()) {
            push_trimmed(&mut all_texts, &extract_slate_text(slate));
        }
    }

    all_texts.join(" ").trim().to_string()
}

fn push_trimmed(texts: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        texts.push(trimmed.to_string());
    }
}

/// Flattens a slate tree: blocks in order, children in order, non-blank
/// trimmed fragments joined with single spaces.
fn extract_slate_text(slate: &SlatePayload) -> String {
    let fragments: Vec<&str> = slate
        .content
        .iter()
        .flat_map(|block| block.children.iter())
        .filter_map(|child| child.text.as_deref())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect();
    fragments.join(" ")
}

/// Scoped fallback: the first `"message"` value in the raw text, with the
/// common escapes undone (`\n` becomes a space, `\"` a quote).
fn scan_message_field(raw: &str) -> Option<String> {
    let value = scan_quoted_values(raw, MESSAGE_MARKER).next()?;
    let unescaped = value.replace("\\n", " ").replace("\\\"", "\"");
    if unescaped.trim().is_empty() {
        None
    } else {
        Some(unescaped)
    }
}

/// Unscoped fallback: every `"text"` value in the raw text, blanks dropped.
fn scan_text_fragments(raw: &str) -> Vec<&str> {
    scan_quoted_values(raw, TEXT_MARKER)
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Yields the quoted value following each occurrence of `marker`, cut at
/// the next unescaped quote. Occurrences without a terminator end the scan.
fn scan_quoted_values<'a>(raw: &'a str, marker: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let mut pos = 0_usize;
    std::iter::from_fn(move || {
        let found = raw[pos..].find(marker)?;
        let start = pos + found + marker.len();
        let len = find_unescaped_quote(&raw[start..])?;
        pos = start + len + 1;
        Some(&raw[start..start + len])
    })
}

/// Byte offset of the first `"` not preceded by an odd run of backslashes.
fn find_unescaped_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'\\' if !escaped => escaped = true,
            b'"' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}
