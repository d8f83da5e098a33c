use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::codec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Fields shared by every mobile-originated message.
pub struct MoMetadata {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<FixedOffset>>,
    pub received_at: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoText {
    #[serde(flatten)]
    pub metadata: MoMetadata,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoBinary {
    #[serde(flatten)]
    pub metadata: MoMetadata,
    #[serde(with = "codec::hex_bytes")]
    pub udh: Vec<u8>,
    #[serde(with = "codec::base64_bytes")]
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoMedia {
    #[serde(flatten)]
    pub metadata: MoMetadata,
    pub body: MoMediaBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoMediaBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub media: Vec<MoMediaItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoMediaItem {
    pub url: String,
    #[serde(rename = "contentType", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub status: MediaStatus,
    #[serde(default)]
    pub code: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaStatus {
    Uploaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
/// Mobile-originated (inbound) message, tagged on the wire by `"type"`.
pub enum MoSms {
    #[serde(rename = "mo_text")]
    Text(MoText),
    #[serde(rename = "mo_binary")]
    Binary(MoBinary),
    #[serde(rename = "mo_media")]
    Media(MoMedia),
}

impl MoSms {
    pub fn metadata(&self) -> &MoMetadata {
        match self {
            Self::Text(message) => &message.metadata,
            Self::Binary(message) => &message.metadata,
            Self::Media(message) => &message.metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata().id
    }
}
