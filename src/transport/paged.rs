//! Paged listing envelopes: `{ "page", "page_size", "count", "<content>": [...] }`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::Page;

pub(crate) const BATCHES: &str = "batches";
pub(crate) const GROUPS: &str = "groups";
pub(crate) const INBOUNDS: &str = "inbounds";
pub(crate) const DELIVERY_REPORTS: &str = "delivery_reports";

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    page: u32,
    #[serde(default)]
    count: u64,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

/// Decode one page whose elements live under `content_field`.
///
/// A missing or `null` content field is read as an empty page.
pub(crate) fn decode_page<T: DeserializeOwned>(
    body: &[u8],
    content_field: &str,
) -> Result<Page<T>, serde_json::Error> {
    let mut envelope: PageEnvelope = serde_json::from_slice(body)?;
    let content = match envelope.rest.remove(content_field) {
        Some(serde_json::Value::Null) | None => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<T>>(value)?,
    };
    Ok(Page::new(envelope.page, envelope.count, content))
}
