//! Transport layer: HTTP and wire-format details (serialization/deserialization).

pub(crate) mod http;
pub(crate) mod json;
pub(crate) mod paged;
pub(crate) mod query;
pub(crate) mod response;
