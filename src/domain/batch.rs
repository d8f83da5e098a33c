use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::codec;
use crate::domain::report::ReportType;
use crate::domain::validation::{ValidationError, reject_commas};
use crate::domain::value::{BatchId, UpdateValue};

/// Maximum combined size of `udh` and `body` in a binary message.
pub const MAX_BINARY_LENGTH: usize = 140;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Per-recipient substitutions for one template parameter.
///
/// On the wire this is a flat object keyed by recipient, with the fallback
/// stored under `"default"`.
pub struct ParameterValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(flatten)]
    pub substitutions: BTreeMap<String, String>,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn substitution(mut self, recipient: impl Into<String>, value: impl Into<String>) -> Self {
        self.substitutions.insert(recipient.into(), value.into());
        self
    }
}

pub type Parameters = BTreeMap<String, ParameterValues>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Body of an MMS batch.
pub struct MediaBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub url: Url,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Options shared by all batch kinds when creating or replacing a batch.
pub struct BatchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_report: Option<ReportType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_message: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_number_of_message_parts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_ton: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_npi: Option<u8>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl BatchOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(from) = &self.from {
            non_empty("from", from)?;
        }
        reject_commas("tags", &self.tags)
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

fn collect_recipients(
    to: impl IntoIterator<Item = impl Into<String>>,
) -> Result<Vec<String>, ValidationError> {
    let to = to.into_iter().map(Into::into).collect::<Vec<String>>();
    if to.is_empty() {
        return Err(ValidationError::Empty { field: "to" });
    }
    for recipient in &to {
        non_empty("to", recipient)?;
    }
    Ok(to)
}

fn check_binary_length(udh: &[u8], body: &[u8]) -> Result<(), ValidationError> {
    let actual = udh.len() + body.len();
    if actual > MAX_BINARY_LENGTH {
        return Err(ValidationError::BinaryTooLong {
            max: MAX_BINARY_LENGTH,
            actual,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A text batch to create.
///
/// Invariants: at least one recipient, no empty recipient, sender non-empty when set.
pub struct MtBatchTextCreate {
    to: Vec<String>,
    body: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    parameters: Parameters,
    #[serde(flatten)]
    options: BatchOptions,
}

impl MtBatchTextCreate {
    pub fn new(
        to: impl IntoIterator<Item = impl Into<String>>,
        body: impl Into<String>,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        let to = collect_recipients(to)?;
        options.validate()?;
        Ok(Self {
            to,
            body: body.into(),
            parameters: Parameters::new(),
            options,
        })
    }

    /// Add a template parameter referenced as `${name}` in the body.
    pub fn with_parameter(mut self, name: impl Into<String>, values: ParameterValues) -> Self {
        self.parameters.insert(name.into(), values);
        self
    }

    pub fn to(&self) -> &[String] {
        &self.to
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A binary batch to create.
///
/// Invariants: as for text batches, plus `udh` and `body` fit in [`MAX_BINARY_LENGTH`] bytes.
pub struct MtBatchBinaryCreate {
    to: Vec<String>,
    #[serde(with = "codec::hex_bytes")]
    udh: Vec<u8>,
    #[serde(with = "codec::base64_bytes")]
    body: Vec<u8>,
    #[serde(flatten)]
    options: BatchOptions,
}

impl MtBatchBinaryCreate {
    pub fn new(
        to: impl IntoIterator<Item = impl Into<String>>,
        udh: impl Into<Vec<u8>>,
        body: impl Into<Vec<u8>>,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        let to = collect_recipients(to)?;
        options.validate()?;
        let udh = udh.into();
        let body = body.into();
        check_binary_length(&udh, &body)?;
        Ok(Self {
            to,
            udh,
            body,
            options,
        })
    }

    pub fn to(&self) -> &[String] {
        &self.to
    }

    pub fn udh(&self) -> &[u8] {
        &self.udh
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// An MMS batch to create.
pub struct MtBatchMediaCreate {
    to: Vec<String>,
    body: MediaBody,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    strict_validation: Option<bool>,
    #[serde(flatten)]
    options: BatchOptions,
}

impl MtBatchMediaCreate {
    pub fn new(
        to: impl IntoIterator<Item = impl Into<String>>,
        body: MediaBody,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        let to = collect_recipients(to)?;
        options.validate()?;
        Ok(Self {
            to,
            body,
            parameters: Parameters::new(),
            strict_validation: None,
            options,
        })
    }

    pub fn with_parameter(mut self, name: impl Into<String>, values: ParameterValues) -> Self {
        self.parameters.insert(name.into(), values);
        self
    }

    /// Ask the server to validate the media against carrier constraints.
    pub fn strict_validation(mut self, enabled: bool) -> Self {
        self.strict_validation = Some(enabled);
        self
    }

    pub fn to(&self) -> &[String] {
        &self.to
    }

    pub fn body(&self) -> &MediaBody {
        &self.body
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
/// Batch creation request, tagged on the wire by `"type"`.
pub enum MtBatchCreate {
    #[serde(rename = "mt_text")]
    Text(MtBatchTextCreate),
    #[serde(rename = "mt_binary")]
    Binary(MtBatchBinaryCreate),
    #[serde(rename = "mt_media")]
    Media(MtBatchMediaCreate),
}

impl MtBatchCreate {
    pub fn options(&self) -> &BatchOptions {
        match self {
            Self::Text(batch) => batch.options(),
            Self::Binary(batch) => batch.options(),
            Self::Media(batch) => batch.options(),
        }
    }
}

impl From<MtBatchTextCreate> for MtBatchCreate {
    fn from(value: MtBatchTextCreate) -> Self {
        Self::Text(value)
    }
}

impl From<MtBatchBinaryCreate> for MtBatchCreate {
    fn from(value: MtBatchBinaryCreate) -> Self {
        Self::Binary(value)
    }
}

impl From<MtBatchMediaCreate> for MtBatchCreate {
    fn from(value: MtBatchMediaCreate) -> Self {
        Self::Media(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Fields shared by all batch update kinds.
///
/// `None` leaves a field untouched; `Some(UpdateValue::Unset)` resets it.
pub struct BatchUpdateOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to_add: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to_remove: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_report: Option<UpdateValue<ReportType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_at: Option<UpdateValue<DateTime<FixedOffset>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<UpdateValue<DateTime<FixedOffset>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<UpdateValue<Url>>,
}

impl BatchUpdateOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(from) = &self.from {
            non_empty("from", from)?;
        }
        for recipient in self.to_add.iter().chain(&self.to_remove) {
            non_empty("to", recipient)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MtBatchTextUpdate {
    #[serde(flatten)]
    pub options: BatchUpdateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<UpdateValue<Parameters>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MtBatchBinaryUpdate {
    #[serde(flatten)]
    pub options: BatchUpdateOptions,
    #[serde(skip_serializing_if = "Option::is_none", with = "codec::hex_bytes_opt")]
    pub udh: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "codec::base64_bytes_opt")]
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MtBatchMediaUpdate {
    #[serde(flatten)]
    pub options: BatchUpdateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<MediaBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<UpdateValue<Parameters>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_validation: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
/// Partial batch update. Only configured fields are written.
///
/// The default is an empty text update, which serializes as `{"type":"mt_text"}`.
pub enum MtBatchUpdate {
    #[serde(rename = "mt_text")]
    Text(MtBatchTextUpdate),
    #[serde(rename = "mt_binary")]
    Binary(MtBatchBinaryUpdate),
    #[serde(rename = "mt_media")]
    Media(MtBatchMediaUpdate),
}

impl Default for MtBatchUpdate {
    fn default() -> Self {
        Self::Text(MtBatchTextUpdate::default())
    }
}

impl MtBatchUpdate {
    /// Check the invariants that cannot be expressed through the field types.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Text(update) => update.options.validate(),
            Self::Binary(update) => {
                update.options.validate()?;
                if let (Some(udh), Some(body)) = (&update.udh, &update.body) {
                    check_binary_length(udh, body)?;
                }
                Ok(())
            }
            Self::Media(update) => update.options.validate(),
        }
    }
}

impl From<MtBatchTextUpdate> for MtBatchUpdate {
    fn from(value: MtBatchTextUpdate) -> Self {
        Self::Text(value)
    }
}

impl From<MtBatchBinaryUpdate> for MtBatchUpdate {
    fn from(value: MtBatchBinaryUpdate) -> Self {
        Self::Binary(value)
    }
}

impl From<MtBatchMediaUpdate> for MtBatchUpdate {
    fn from(value: MtBatchMediaUpdate) -> Self {
        Self::Media(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Server-side view of a batch, common to all batch kinds.
pub struct BatchMetadata {
    pub id: BatchId,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default)]
    pub canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_report: Option<ReportType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash_message: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_number_of_message_parts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_ton: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_npi: Option<u8>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtBatchTextResult {
    #[serde(flatten)]
    pub metadata: BatchMetadata,
    pub body: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtBatchBinaryResult {
    #[serde(flatten)]
    pub metadata: BatchMetadata,
    #[serde(with = "codec::hex_bytes")]
    pub udh: Vec<u8>,
    #[serde(with = "codec::base64_bytes")]
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtBatchMediaResult {
    #[serde(flatten)]
    pub metadata: BatchMetadata,
    pub body: MediaBody,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_validation: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
/// A batch as returned by the server, tagged on the wire by `"type"`.
pub enum MtBatchResult {
    #[serde(rename = "mt_text")]
    Text(MtBatchTextResult),
    #[serde(rename = "mt_binary")]
    Binary(MtBatchBinaryResult),
    #[serde(rename = "mt_media")]
    Media(MtBatchMediaResult),
}

impl MtBatchResult {
    pub fn metadata(&self) -> &BatchMetadata {
        match self {
            Self::Text(batch) => &batch.metadata,
            Self::Binary(batch) => &batch.metadata,
            Self::Media(batch) => &batch.metadata,
        }
    }

    pub fn id(&self) -> &BatchId {
        &self.metadata().id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Outcome of a dry run: how a batch would be split without sending it.
pub struct MtBatchDryRunResult {
    pub number_of_recipients: u32,
    pub number_of_messages: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub per_recipient: Vec<DryRunPerRecipient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunPerRecipient {
    pub recipient: String,
    pub number_of_parts: u32,
    pub body: String,
    pub encoding: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn offset_time(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    #[test]
    fn text_create_requires_recipients() {
        let err = MtBatchTextCreate::new(Vec::<String>::new(), "hi", BatchOptions::default())
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "to" });

        let err = MtBatchTextCreate::new(["123", " "], "hi", BatchOptions::default()).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "to" });
    }

    #[test]
    fn create_rejects_blank_sender_and_comma_tags() {
        let options = BatchOptions {
            from: Some("  ".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            MtBatchTextCreate::new(["123"], "hi", options).unwrap_err(),
            ValidationError::Empty { field: "from" }
        );

        let options = BatchOptions {
            tags: BTreeSet::from(["a,b".to_owned()]),
            ..Default::default()
        };
        assert!(matches!(
            MtBatchTextCreate::new(["123"], "hi", options),
            Err(ValidationError::ContainsComma { field: "tags", .. })
        ));
    }

    #[test]
    fn text_create_serializes_with_type_tag_and_omits_unset_fields() {
        let options = BatchOptions {
            from: Some("12345".to_owned()),
            send_at: Some(offset_time("2016-12-01T11:03:13.192+01:00")),
            delivery_report: Some(ReportType::Summary),
            ..Default::default()
        };
        let batch = MtBatchTextCreate::new(["987654321", "123456789"], "Hello, ${name}!", options)
            .unwrap()
            .with_parameter(
                "name",
                ParameterValues::new()
                    .substitution("987654321", "Mary")
                    .with_default("world"),
            );

        let value = serde_json::to_value(MtBatchCreate::from(batch)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "mt_text",
                "from": "12345",
                "to": ["987654321", "123456789"],
                "body": "Hello, ${name}!",
                "delivery_report": "summary",
                "send_at": "2016-12-01T11:03:13.192+01:00",
                "parameters": {
                    "name": { "987654321": "Mary", "default": "world" }
                }
            })
        );
    }

    #[test]
    fn binary_create_checks_length_and_encodes_payloads() {
        let too_long = MtBatchBinaryCreate::new(
            ["123"],
            vec![0u8; 10],
            vec![0u8; 131],
            BatchOptions::default(),
        );
        assert_eq!(
            too_long.unwrap_err(),
            ValidationError::BinaryTooLong {
                max: MAX_BINARY_LENGTH,
                actual: 141
            }
        );

        let batch = MtBatchBinaryCreate::new(
            ["123"],
            vec![0x05, 0x00, 0x03],
            b"hello".to_vec(),
            BatchOptions::default(),
        )
        .unwrap();
        let value = serde_json::to_value(MtBatchCreate::from(batch)).unwrap();
        assert_eq!(
            value,
            json!({ "type": "mt_binary", "to": ["123"], "udh": "050003", "body": "aGVsbG8=" })
        );
    }

    #[test]
    fn empty_update_is_just_the_type_tag() {
        let value = serde_json::to_value(MtBatchUpdate::default()).unwrap();
        assert_eq!(value, json!({ "type": "mt_text" }));
    }

    #[test]
    fn update_writes_null_for_unset_and_omits_untouched_fields() {
        let update = MtBatchUpdate::Text(MtBatchTextUpdate {
            options: BatchUpdateOptions {
                to_add: vec!["555".to_owned()],
                delivery_report: Some(UpdateValue::Unset),
                ..Default::default()
            },
            body: Some("new body".to_owned()),
            parameters: Some(UpdateValue::Unset),
        });

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "mt_text",
                "to_add": ["555"],
                "delivery_report": null,
                "body": "new body",
                "parameters": null
            })
        );
    }

    #[test]
    fn binary_update_validation() {
        let update = MtBatchUpdate::Binary(MtBatchBinaryUpdate {
            udh: Some(vec![1; 100]),
            body: Some(vec![2; 41]),
            ..Default::default()
        });
        assert!(matches!(
            update.validate(),
            Err(ValidationError::BinaryTooLong { actual: 141, .. })
        ));

        let update = MtBatchUpdate::Binary(MtBatchBinaryUpdate {
            udh: Some(vec![0xff]),
            ..Default::default()
        });
        assert!(update.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "type": "mt_binary", "udh": "ff" })
        );

        let update = MtBatchUpdate::Text(MtBatchTextUpdate {
            options: BatchUpdateOptions {
                from: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(
            update.validate(),
            Err(ValidationError::Empty { field: "from" })
        );
    }

    #[test]
    fn text_result_parses_with_unknown_fields() {
        let json = r#"{
          "type": "mt_text",
          "id": "5Z8QsIRsk86f-jHB",
          "to": ["123456789", "987654321"],
          "from": "12345",
          "canceled": false,
          "body": "Hello, world!",
          "delivery_report": "none",
          "created_at": "2016-12-01T11:03:13.192Z",
          "modified_at": "2016-12-01T11:03:13.192Z",
          "some_future_field": { "x": 1 }
        }"#;

        let result: MtBatchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.id().as_str(), "5Z8QsIRsk86f-jHB");
        assert_eq!(result.metadata().delivery_report, Some(ReportType::None));
        match result {
            MtBatchResult::Text(text) => {
                assert_eq!(text.body, "Hello, world!");
                assert_eq!(text.metadata.to.len(), 2);
                assert!(text.parameters.is_empty());
            }
            other => panic!("unexpected batch kind: {other:?}"),
        }
    }

    #[test]
    fn binary_result_decodes_payloads() {
        let json = r#"{
          "type": "mt_binary",
          "id": "5Z8QsIRsk86f-jHB",
          "to": ["123456789"],
          "from": "12345",
          "canceled": true,
          "udh": "fffefd",
          "body": "AQID"
        }"#;

        let result: MtBatchResult = serde_json::from_str(json).unwrap();
        match result {
            MtBatchResult::Binary(binary) => {
                assert_eq!(binary.udh, vec![0xff, 0xfe, 0xfd]);
                assert_eq!(binary.body, vec![1, 2, 3]);
                assert!(binary.metadata.canceled);
            }
            other => panic!("unexpected batch kind: {other:?}"),
        }
    }

    #[test]
    fn dry_run_result_parses_per_recipient_details() {
        let json = r#"{
          "number_of_recipients": 2,
          "number_of_messages": 2,
          "per_recipient": [
            { "recipient": "987654321", "number_of_parts": 1, "body": "Hello", "encoding": "text" }
          ]
        }"#;
        let result: MtBatchDryRunResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.number_of_messages, 2);
        assert_eq!(result.per_recipient[0].encoding, "text");
    }
}
