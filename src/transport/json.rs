use serde::Serialize;
use serde::de::DeserializeOwned;

/// JSON settings owned by a connection.
///
/// Unknown fields are always ignored on read and absent optional fields are
/// omitted on write; those rules live on the types themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct JsonConfig {
    pretty_print: bool,
}

impl JsonConfig {
    pub(crate) fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    pub(crate) fn pretty_print(self) -> bool {
        self.pretty_print
    }

    pub(crate) fn encode<T: Serialize>(self, value: &T) -> Result<Vec<u8>, serde_json::Error> {
        if self.pretty_print {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
    }

    pub(crate) fn decode<T: DeserializeOwned>(self, body: &[u8]) -> Result<T, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
