use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::value::BatchId;

/// Kind of delivery report requested for a batch.
///
/// Values the client does not know are preserved in [`ReportType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportType {
    None,
    Summary,
    Full,
    PerRecipient,
    Other(String),
}

impl ReportType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Summary => "summary",
            Self::Full => "full",
            Self::PerRecipient => "per_recipient",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for ReportType {
    fn from(value: &str) -> Self {
        match value {
            "none" => Self::None,
            "summary" => Self::Summary,
            "full" => Self::Full,
            "per_recipient" => Self::PerRecipient,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReportType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value.as_str()))
    }
}

/// Delivery state of a message.
///
/// Values the client does not know are preserved in [`DeliveryStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeliveryStatus {
    Queued,
    Dispatched,
    Aborted,
    Cancelled,
    Rejected,
    Delivered,
    Failed,
    Expired,
    Unknown,
    Other(String),
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "Queued",
            Self::Dispatched => "Dispatched",
            Self::Aborted => "Aborted",
            Self::Cancelled => "Cancelled",
            Self::Rejected => "Rejected",
            Self::Delivered => "Delivered",
            Self::Failed => "Failed",
            Self::Expired => "Expired",
            Self::Unknown => "Unknown",
            Self::Other(value) => value,
        }
    }

    /// Whether the message has reached a state it will not leave.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Aborted
                | Self::Cancelled
                | Self::Rejected
                | Self::Delivered
                | Self::Failed
                | Self::Expired
        )
    }
}

impl From<&str> for DeliveryStatus {
    fn from(value: &str) -> Self {
        match value {
            "Queued" => Self::Queued,
            "Dispatched" => Self::Dispatched,
            "Aborted" => Self::Aborted,
            "Cancelled" => Self::Cancelled,
            "Rejected" => Self::Rejected,
            "Delivered" => Self::Delivered,
            "Failed" => Self::Failed,
            "Expired" => Self::Expired,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeliveryStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeliveryStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchDeliveryReportKind {
    DeliveryReportSms,
    DeliveryReportMms,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Aggregated delivery report of a batch.
pub struct BatchDeliveryReport {
    #[serde(rename = "type")]
    pub kind: BatchDeliveryReportKind,
    pub batch_id: BatchId,
    pub total_message_count: u32,
    #[serde(default)]
    pub statuses: Vec<DeliveryStatusCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Number of messages that share a status code.
///
/// `recipients` is only populated for `full` reports.
pub struct DeliveryStatusCount {
    pub code: i32,
    pub status: DeliveryStatus,
    pub count: u32,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub recipients: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientDeliveryReportKind {
    RecipientDeliveryReportSms,
    RecipientDeliveryReportMms,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Delivery report of a single recipient within a batch.
pub struct RecipientDeliveryReport {
    #[serde(rename = "type")]
    pub kind: RecipientDeliveryReportKind,
    pub batch_id: BatchId,
    pub recipient: String,
    pub code: i32,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub at: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_status_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Delivery feedback for a batch sent with `feedback_enabled`.
///
/// An empty recipient list marks every recipient of the batch as delivered.
pub struct DeliveryFeedback {
    pub recipients: Vec<String>,
}

impl DeliveryFeedback {
    pub fn new(recipients: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            recipients: recipients.into_iter().map(Into::into).collect(),
        }
    }
}
